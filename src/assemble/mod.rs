//! Document assembly: options in, ordered configuration document out.
//!
//! Section order is fixed regardless of how the options were written:
//! supervisord, http server, supervisorctl, ctl plugins, rpc interfaces,
//! programs, event listeners, groups, include.

use crate::error::GenerateError;
use crate::lines::{
    EventListenerSpec, GroupSpec, LineKind, PluginSpec, ProgramSpec, parse_block,
};
use crate::options::{
    ControlClientSpec, GlobalOptions, OptionSet, RecipeContext, SectionKind, Sections,
    TransportSpec,
};
use crate::render::{Document, Section, process, supervisord};
use std::path::PathBuf;
use tracing::debug;

/// Result of one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub document: Document,
    pub global: GlobalOptions,
    pub control: ControlClientSpec,
    /// Where the document belongs.
    pub conf_path: PathBuf,
}

impl Generation {
    pub fn text(&self) -> String {
        self.document.to_string()
    }
}

/// Parsed blocks, all validated before anything is rendered.
struct Blocks {
    ctl_plugins: Vec<PluginSpec>,
    rpc_plugins: Vec<PluginSpec>,
    programs: Vec<ProgramSpec>,
    listeners: Vec<EventListenerSpec>,
    groups: Vec<GroupSpec>,
    include: Vec<String>,
}

impl Blocks {
    fn parse(options: &OptionSet, sections: Sections) -> Result<Self, GenerateError> {
        let ctl_plugins = if sections.contains(SectionKind::Ctl) {
            parse_block(LineKind::CtlPlugin, options.block("ctlplugins"))?
        } else {
            Vec::new()
        };
        let rpc_plugins = if sections.contains(SectionKind::Rpc) {
            parse_block(LineKind::RpcPlugin, options.block("rpcplugins"))?
        } else {
            Vec::new()
        };

        Ok(Blocks {
            ctl_plugins,
            rpc_plugins,
            programs: parse_block(LineKind::Program, options.block("programs"))?,
            listeners: parse_block(LineKind::EventListener, options.block("eventlisteners"))?,
            groups: parse_block(LineKind::Group, options.block("groups"))?,
            include: options.block_lines("include"),
        })
    }
}

/// Build the configuration document for `options`.
pub fn generate(options: &OptionSet, ctx: &RecipeContext) -> Result<Generation, GenerateError> {
    // 1) Resolve everything that can fail before rendering.
    let sections = Sections::resolve(options);
    let global = GlobalOptions::resolve(options, ctx);
    let transport = TransportSpec::resolve(options)?;
    let control = ControlClientSpec::resolve(options, &transport);
    let blocks = Blocks::parse(options, sections)?;

    // 2) Render in canonical order.
    let mut document = Document::new();
    let mut push = |section: Section| {
        debug!(section = section.header(), "rendered section");
        document.push(section);
    };

    push(supervisord::supervisord(&global));

    if sections.contains(SectionKind::Http) {
        push(supervisord::http_server(&transport));
    }

    if sections.contains(SectionKind::Ctl) {
        push(supervisord::supervisorctl(&control));
        for plugin in &blocks.ctl_plugins {
            push(supervisord::ctl_plugin(plugin));
        }
    }

    if sections.contains(SectionKind::Rpc) {
        push(supervisord::main_rpc_interface());
        for plugin in &blocks.rpc_plugins {
            push(supervisord::rpc_plugin(plugin));
        }
    }

    for spec in &blocks.programs {
        push(process::program(spec, &global.child_log_limits));
    }

    for spec in &blocks.listeners {
        push(process::event_listener(spec, &control));
    }

    for spec in &blocks.groups {
        push(process::group(spec));
    }

    if let Some(section) = supervisord::include(&blocks.include) {
        push(section);
    }

    Ok(Generation {
        document,
        global,
        control,
        conf_path: ctx.conf_path(options),
    })
}
