use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use supervisor_conf::install::{self, LocalFs, LogOnlyInstaller};
use supervisor_conf::{OptionSet, RecipeContext, Result, generate};
use tracing::debug;

#[derive(Parser)]
#[command(name = "supervisor-conf")]
#[command(about = "Generate a supervisord configuration from a set of options", long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// TOML file whose top-level keys are options.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Set or override one option (repeatable).
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Directory the var/ and parts/ defaults live under [default: current directory].
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Part name, used for launcher names and the default config location.
    #[arg(long, default_value = "supervisor")]
    name: String,
}

impl InputArgs {
    fn load(&self) -> Result<(OptionSet, RecipeContext)> {
        let mut options = match &self.options {
            Some(path) => OptionSet::load(path)?,
            None => OptionSet::new(),
        };
        for raw in &self.set {
            options.apply_override(raw)?;
        }
        options.warn_unknown();

        let base_dir = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("failed to read current directory")?,
        };
        Ok((options, RecipeContext::new(base_dir, self.name.clone())))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configuration document to stdout without writing anything.
    Render {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Write the configuration, create runtime directories and request launchers.
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.cmd {
        Commands::Render { input } => {
            let (options, ctx) = input.load()?;
            let generation = generate(&options, &ctx)?;
            print!("{}", generation.text());
        }
        Commands::Generate { input, json } => {
            let (options, ctx) = input.load()?;

            // 1) Build the whole document first; nothing touches disk on failure.
            let generation = generate(&options, &ctx)?;
            debug!(sections = generation.document.sections().len(), "document ready");

            // 2) Write it out and request launchers.
            let requests = install::script_requests(&options, &ctx, &generation.conf_path);
            let report = install::materialize(&generation, &requests, &LocalFs, &LogOnlyInstaller)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for path in &report.artifacts {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}
