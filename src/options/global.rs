//! `[supervisord]` settings with their defaults resolved.

use crate::options::{OptionSet, RecipeContext};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalOptions {
    pub childlogdir: String,
    pub logfile: String,
    pub logfile_maxbytes: String,
    pub logfile_backups: String,
    pub loglevel: String,
    pub pidfile: String,
    pub umask: String,
    pub nodaemon: String,
    pub nocleanup: String,
    pub user: Option<String>,
    pub directory: Option<String>,
    pub environment: Option<String>,
    /// `PATH` handed to the daemon's environment.
    pub env_path: Option<String>,
    pub child_log_limits: ChildLogLimits,
}

/// Per-child log size limits applied to every program that does not set its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildLogLimits {
    pub stdout_maxbytes: Option<String>,
    pub stderr_maxbytes: Option<String>,
}

impl ChildLogLimits {
    /// `(program key, value)` pairs to inject.
    pub fn settings(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("stdout_logfile_maxbytes", self.stdout_maxbytes.as_deref()),
            ("stderr_logfile_maxbytes", self.stderr_maxbytes.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
    }
}

fn path_string(path: PathBuf) -> String {
    path.display().to_string()
}

impl GlobalOptions {
    pub fn resolve(options: &OptionSet, ctx: &RecipeContext) -> Self {
        let var = ctx.base_dir.join("var");
        let owned = |key: &str| options.non_empty(key).map(str::to_string);

        GlobalOptions {
            childlogdir: options
                .get("childlogdir")
                .map(str::to_string)
                .unwrap_or_else(|| path_string(var.join("log"))),
            logfile: options
                .get("logfile")
                .map(str::to_string)
                .unwrap_or_else(|| path_string(var.join("log").join("supervisord.log"))),
            logfile_maxbytes: options.get_or("logfile-maxbytes", "50MB"),
            logfile_backups: options.get_or("logfile-backups", "10"),
            loglevel: options.get_or("loglevel", "info"),
            pidfile: options
                .get("pidfile")
                .map(str::to_string)
                .unwrap_or_else(|| path_string(var.join("supervisord.pid"))),
            umask: options.get_or("umask", "022"),
            nodaemon: options.get_or("nodaemon", "false"),
            nocleanup: options.get_or("nocleanup", "false"),
            user: owned("supervisord-user"),
            directory: owned("supervisord-directory"),
            environment: owned("supervisord-environment"),
            env_path: options.get("env-path").map(str::to_string),
            child_log_limits: ChildLogLimits {
                stdout_maxbytes: owned("childstdout-logfile-maxbytes"),
                stderr_maxbytes: owned("childstderr-logfile-maxbytes"),
            },
        }
    }

    /// Single `environment` value for the daemon: the configured environment
    /// followed by `PATH=<env-path>`.
    pub fn environment_directive(&self) -> Option<String> {
        let path = self.env_path.as_ref().map(|p| format!("PATH={}", p));
        match (&self.environment, path) {
            (Some(env), Some(path)) => Some(format!("{},{}", env, path)),
            (Some(env), None) => Some(env.clone()),
            (None, path) => path,
        }
    }

    /// Directories the daemon expects to exist: the child log directory and
    /// the parents of the log and pid files.
    pub fn runtime_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![PathBuf::from(&self.childlogdir)];
        for file in [&self.logfile, &self.pidfile] {
            let dir = match Path::new(file).parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }
}
