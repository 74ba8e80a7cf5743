//! Option layer: the raw `name -> value` input and the settings resolved from it.
//!
//! This module owns:
//! - `OptionSet` (loaded from TOML plus `KEY=VALUE` overrides)
//! - `RecipeContext` (base directory and part name used for path defaults)
//! - the section selector
//! - global daemon settings and the transport / control client pair

pub mod global;
pub mod transport;

pub use global::{ChildLogLimits, GlobalOptions};
pub use transport::{ControlClientSpec, TransportKind, TransportSpec};

use crate::Result;
use anyhow::{Context, bail};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Every option name the generator reads.
pub const KNOWN_OPTIONS: &[&str] = &[
    "sections",
    "logfile",
    "pidfile",
    "childlogdir",
    "http-socket",
    "logfile-maxbytes",
    "logfile-backups",
    "childstdout-logfile-maxbytes",
    "childstderr-logfile-maxbytes",
    "loglevel",
    "umask",
    "nodaemon",
    "nocleanup",
    "supervisord-user",
    "supervisord-directory",
    "supervisord-environment",
    "env-path",
    "port",
    "user",
    "password",
    "file",
    "chmod",
    "serverurl",
    "ctlplugins",
    "rpcplugins",
    "programs",
    "eventlisteners",
    "groups",
    "include",
    "supervisord-conf",
    "d_plugins",
    "ctl_plugins",
    "plugins",
];

/// Flat option mapping. Later inserts replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    values: BTreeMap<String, String>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Raw value, present even when empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Value only when it is present and non-empty.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Multi-line block; missing options read as empty.
    pub fn block(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Non-blank trimmed lines of a block.
    pub fn block_lines(&self, key: &str) -> Vec<String> {
        self.block(key)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Apply a `KEY=VALUE` override.
    pub fn apply_override(&mut self, raw: &str) -> Result<()> {
        let Some((key, value)) = raw.split_once('=') else {
            bail!("override must look like KEY=VALUE: {:?}", raw);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("override has an empty key: {:?}", raw);
        }
        self.insert(key, value);
        Ok(())
    }

    /// Parse a TOML document whose top-level keys are options.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(text)?;
        let mut out = OptionSet::new();
        for (key, value) in table {
            let value = option_value(&key, value)?;
            out.insert(key, value);
        }
        Ok(out)
    }

    /// Load an options file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read options file {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("failed to parse options file {}", path.display()))
    }

    /// Option names that are not read by the generator.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|k| !KNOWN_OPTIONS.contains(k))
            .collect()
    }

    /// Log a warning for each unknown option.
    pub fn warn_unknown(&self) {
        for key in self.unknown_keys() {
            warn!(option = key, "ignoring unknown option");
        }
    }
}

fn option_value(key: &str, value: toml::Value) -> Result<String> {
    use toml::Value;

    Ok(match value {
        Value::String(s) => s,
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(items) => {
            let mut lines = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => lines.push(s),
                    other => bail!(
                        "option {} must be a list of strings, found {}",
                        key,
                        other.type_str()
                    ),
                }
            }
            lines.join("\n")
        }
        other => bail!(
            "option {} must be a string, number, boolean or list of strings, found {}",
            key,
            other.type_str()
        ),
    })
}

/// Where generated paths default to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeContext {
    /// Root for `var/` and `parts/` defaults.
    pub base_dir: PathBuf,
    /// Part name; names the launchers and the config's parts directory.
    pub name: String,
}

impl RecipeContext {
    pub fn new(base_dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            name: name.into(),
        }
    }

    /// `supervisord-conf`, or `<base>/parts/<name>/supervisord.conf`.
    pub fn conf_path(&self, options: &OptionSet) -> PathBuf {
        match options.get("supervisord-conf") {
            Some(path) => PathBuf::from(path),
            None => self
                .base_dir
                .join("parts")
                .join(&self.name)
                .join("supervisord.conf"),
        }
    }
}

/// Optional section families the caller can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    /// `[supervisorctl]` and `[ctlplugin:*]`.
    Ctl,
    /// `[inet_http_server]` or `[unix_http_server]`.
    Http,
    /// `[rpcinterface:*]`.
    Rpc,
}

/// Parsed `sections` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections {
    pub ctl: bool,
    pub http: bool,
    pub rpc: bool,
}

impl Sections {
    pub const DEFAULT: &'static str = "ctl http rpc";

    pub fn parse(raw: &str) -> Self {
        let mut out = Sections {
            ctl: false,
            http: false,
            rpc: false,
        };
        for token in raw.split_whitespace() {
            match token {
                "ctl" => out.ctl = true,
                "http" => out.http = true,
                "rpc" => out.rpc = true,
                other => warn!(section = other, "ignoring unknown section selector"),
            }
        }
        out
    }

    pub fn resolve(options: &OptionSet) -> Self {
        Self::parse(options.get("sections").unwrap_or(Self::DEFAULT))
    }

    pub fn contains(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Ctl => self.ctl,
            SectionKind::Http => self.http,
            SectionKind::Rpc => self.rpc,
        }
    }
}
