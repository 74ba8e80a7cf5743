//! Records produced by the line grammars.

/// Ordered `key = value` settings attached to a process beyond its fixed
/// fields. Insertion order is preserved and drives rendering order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extras(Vec<(String, String)>);

impl Extras {
    /// Parse the inside of a `(key=value ...)` block.
    ///
    /// Tokens are whitespace-separated and split on the first `=`. A token
    /// without `=`, or with an empty key or value, is dropped.
    pub fn parse(block: &str) -> Self {
        let pairs = block
            .split_whitespace()
            .filter_map(|token| token.split_once('='))
            .filter(|(key, value)| !key.is_empty() && !value.is_empty())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self(pairs)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `<priority> <name> [(<opts>)] <command> [[<args>]] [<dir>] [<true|false>] [<user>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSpec {
    /// Digits exactly as written.
    pub priority: String,
    pub name: String,
    pub command: String,
    pub args: Option<String>,
    /// Explicit working directory; see `ProgramSpec::directory`.
    pub directory: Option<String>,
    pub redirect_stderr: bool,
    pub user: Option<String>,
    pub extras: Extras,
}

impl ProgramSpec {
    /// Working directory to render: the explicit one, else the directory part
    /// of the command. `None` when the command is a bare name.
    pub fn directory(&self) -> Option<String> {
        match &self.directory {
            Some(dir) => Some(dir.clone()),
            None => Some(dirname(&self.command)).filter(|d| !d.is_empty()),
        }
    }
}

/// `<name> [(<opts>)] <events> <command> [[<args>]]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListenerSpec {
    pub name: String,
    pub events: String,
    pub command: String,
    pub args: Option<String>,
    pub extras: Extras,
}

/// `<priority> <name> <program>[,<program>...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub priority: String,
    pub name: String,
    pub programs: Vec<String>,
}

/// `<name> <callable>`, shared by ctl and rpc plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSpec {
    pub name: String,
    pub callable: String,
}

/// Directory component of a slash-separated path.
///
/// `/usr/bin/foo` gives `/usr/bin`, `/foo` gives `/`, `foo` gives an empty
/// string. Redundant trailing slashes on the head are dropped unless the head
/// is all slashes.
pub fn dirname(path: &str) -> String {
    let head = match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => return String::new(),
    };
    if head.bytes().all(|b| b == b'/') {
        head.to_string()
    } else {
        head.trim_end_matches('/').to_string()
    }
}
