//! Daemon-level sections: `[supervisord]`, the HTTP transport, the control
//! client, RPC interfaces, ctl plugins and `[include]`.

use crate::lines::PluginSpec;
use crate::options::{ControlClientSpec, GlobalOptions, TransportSpec};
use crate::render::Section;

/// Factory for the built-in supervisor RPC interface.
pub const MAIN_RPC_FACTORY: &str = "supervisor.rpcinterface:make_main_rpcinterface";

pub fn supervisord(global: &GlobalOptions) -> Section {
    Section::new("supervisord")
        .entry("childlogdir", &global.childlogdir)
        .entry("logfile", &global.logfile)
        .entry("logfile_maxbytes", &global.logfile_maxbytes)
        .entry("logfile_backups", &global.logfile_backups)
        .entry("loglevel", &global.loglevel)
        .entry("pidfile", &global.pidfile)
        .entry("umask", &global.umask)
        .entry("nodaemon", &global.nodaemon)
        .entry("nocleanup", &global.nocleanup)
        .entry_opt("user", global.user.as_deref())
        .entry_opt("directory", global.directory.as_deref())
        .entry_opt("environment", global.environment_directive())
}

pub fn http_server(transport: &TransportSpec) -> Section {
    match transport {
        TransportSpec::Inet {
            port,
            username,
            password,
        } => Section::new("inet_http_server")
            .entry("port", port)
            .entry("username", username)
            .entry("password", password),
        TransportSpec::Unix {
            socket_path,
            permissions,
            username,
            password,
        } => Section::new("unix_http_server")
            .entry("file", socket_path)
            .entry("username", username)
            .entry("password", password)
            .entry("chmod", permissions),
    }
}

pub fn supervisorctl(ctl: &ControlClientSpec) -> Section {
    Section::new("supervisorctl")
        .entry("serverurl", &ctl.server_url)
        .entry("username", &ctl.username)
        .entry("password", &ctl.password)
}

pub fn ctl_plugin(plugin: &PluginSpec) -> Section {
    Section::new(format!("ctlplugin:{}", plugin.name))
        .entry("supervisor.ctl_factory", &plugin.callable)
}

pub fn main_rpc_interface() -> Section {
    Section::new("rpcinterface:supervisor")
        .entry("supervisor.rpcinterface_factory", MAIN_RPC_FACTORY)
}

pub fn rpc_plugin(plugin: &PluginSpec) -> Section {
    Section::new(format!("rpcinterface:{}", plugin.name))
        .entry("supervisor.rpcinterface_factory", &plugin.callable)
}

/// `[include]` listing every path, or nothing when there are none.
pub fn include(files: &[String]) -> Option<Section> {
    if files.is_empty() {
        return None;
    }
    Some(Section::new("include").entry("files", files.join(" ")))
}
