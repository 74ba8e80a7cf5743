//! Process sections: programs, event listeners and groups.

use crate::lines::{EventListenerSpec, GroupSpec, ProgramSpec};
use crate::options::{ChildLogLimits, ControlClientSpec};
use crate::render::Section;

fn command_line(command: &str, args: Option<&str>) -> String {
    match args {
        Some(args) => format!("{} {}", command, args),
        None => command.to_string(),
    }
}

/// `[program:<name>]`.
///
/// Explicit extras come after the fixed fields, in input order. The child log
/// limits are appended only for keys the program did not set itself.
pub fn program(spec: &ProgramSpec, limits: &ChildLogLimits) -> Section {
    let mut section = Section::new(format!("program:{}", spec.name))
        .entry("command", command_line(&spec.command, spec.args.as_deref()))
        .entry("process_name", &spec.name)
        .entry_opt("directory", spec.directory())
        .entry("priority", &spec.priority)
        .entry("redirect_stderr", spec.redirect_stderr.to_string())
        .entry_opt("user", spec.user.as_deref());

    for (key, value) in spec.extras.iter() {
        section = section.entry(key, value);
    }
    for (key, value) in limits.settings() {
        if !spec.extras.contains_key(key) {
            section = section.entry(key, value);
        }
    }
    section
}

/// Environment handed to an event listener so it can call back into the
/// daemon, followed by the listener's own `environment` option if any.
pub fn listener_environment(spec: &EventListenerSpec, ctl: &ControlClientSpec) -> String {
    let injected = format!(
        "SUPERVISOR_USERNAME='{}',SUPERVISOR_PASSWORD='{}',SUPERVISOR_SERVER_URL='{}'",
        ctl.username, ctl.password, ctl.server_url
    );
    match spec.extras.get("environment") {
        Some(own) => format!("{},{}", injected, own),
        None => injected,
    }
}

/// `[eventlistener:<name>]`.
pub fn event_listener(spec: &EventListenerSpec, ctl: &ControlClientSpec) -> Section {
    let mut section = Section::new(format!("eventlistener:{}", spec.name))
        .entry("command", command_line(&spec.command, spec.args.as_deref()))
        .entry("events", &spec.events)
        .entry("process_name", &spec.name)
        .entry("environment", listener_environment(spec, ctl));

    for (key, value) in spec.extras.iter().filter(|(k, _)| *k != "environment") {
        section = section.entry(key, value);
    }
    section
}

/// `[group:<name>]`.
pub fn group(spec: &GroupSpec) -> Section {
    Section::new(format!("group:{}", spec.name))
        .entry("programs", spec.programs.join(","))
        .entry("priority", &spec.priority)
}
