//! Writing a generation to disk and requesting launcher scripts.
//!
//! Directory creation and the document write go through `Filesystem`; script
//! installation goes through `ScriptInstaller`. Both are traits so callers
//! (and tests) can swap them out.

use crate::assemble::Generation;
use crate::options::{OptionSet, RecipeContext};
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub trait Filesystem {
    /// Create `path` and its parents. Succeeds if it already exists.
    fn ensure_dir(&self, path: &Path) -> Result<()>;

    /// Replace the contents of `path`.
    fn write_file(&self, path: &Path, contents: &str) -> Result<()>;
}

/// The real filesystem. Files are written to a temp file next to the target
/// and renamed into place. A replaced file keeps its mode; a new one gets the
/// mode a plain create would give it under the current umask.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn ensure_dir(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory {}", path.display()))
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let existing = std::fs::metadata(path).ok().map(|m| m.permissions());

        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder
            .tempfile_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        if let Some(perms) = existing {
            tmp.as_file()
                .set_permissions(perms)
                .with_context(|| format!("failed to copy permissions of {}", path.display()))?;
        }
        tmp.write_all(contents.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        tmp.persist(path)
            .with_context(|| format!("failed to move config into place at {}", path.display()))?;
        Ok(())
    }
}

/// A script that starts one supervisor entry point with our config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub script_name: String,
    pub entry_point: String,
    /// `-c <conf>` to pass, and where.
    pub config_arg: ConfigArg,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigArg {
    None,
    /// Appended after the user's arguments.
    Trailing(PathBuf),
    /// Inserted before the user's arguments, so subcommands still parse.
    Leading(PathBuf),
}

/// Packages to make available, optionally with a launcher script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRequest {
    pub packages: Vec<String>,
    pub launcher: Option<Launcher>,
}

/// Installs packages and launcher scripts, returning every file it created.
pub trait ScriptInstaller {
    fn install(&self, request: &ScriptRequest) -> Result<Vec<PathBuf>>;
}

/// Installer that creates nothing and only logs what was asked for.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlyInstaller;

impl ScriptInstaller for LogOnlyInstaller {
    fn install(&self, request: &ScriptRequest) -> Result<Vec<PathBuf>> {
        match &request.launcher {
            Some(launcher) => info!(
                script = %launcher.script_name,
                entry_point = %launcher.entry_point,
                packages = ?request.packages,
                "launcher requested; not installed"
            ),
            None => info!(packages = ?request.packages, "packages requested; not installed"),
        }
        Ok(Vec::new())
    }
}

fn packages(base: &str, options: &OptionSet, key: &str) -> Vec<String> {
    std::iter::once(base.to_string())
        .chain(options.block_lines(key))
        .collect()
}

/// Launchers for a part: `<name>d`, `memmon`, `<name>ctl`, then a plain
/// request for the extra `plugins` packages if any.
pub fn script_requests(
    options: &OptionSet,
    ctx: &RecipeContext,
    conf_path: &Path,
) -> Vec<ScriptRequest> {
    let mut requests = vec![
        ScriptRequest {
            packages: packages("supervisor", options, "d_plugins"),
            launcher: Some(Launcher {
                script_name: format!("{}d", ctx.name),
                entry_point: "supervisord".into(),
                config_arg: ConfigArg::Trailing(conf_path.to_path_buf()),
            }),
        },
        ScriptRequest {
            packages: vec!["supervisor".into()],
            launcher: Some(Launcher {
                script_name: "memmon".into(),
                entry_point: "memmon".into(),
                config_arg: ConfigArg::None,
            }),
        },
        ScriptRequest {
            packages: packages("supervisor", options, "ctl_plugins"),
            launcher: Some(Launcher {
                script_name: format!("{}ctl", ctx.name),
                entry_point: "supervisorctl".into(),
                config_arg: ConfigArg::Leading(conf_path.to_path_buf()),
            }),
        },
    ];

    let extra = options.block_lines("plugins");
    if !extra.is_empty() {
        requests.push(ScriptRequest {
            packages: extra,
            launcher: None,
        });
    }
    requests
}

/// What a `materialize` call left on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub conf_file: PathBuf,
    /// Where `<name>ctl` will connect.
    pub server_url: String,
    pub directories: Vec<PathBuf>,
    /// Installer outputs followed by the config file.
    pub artifacts: Vec<PathBuf>,
}

/// Create runtime directories, write the document, then install launchers.
pub fn materialize(
    generation: &Generation,
    requests: &[ScriptRequest],
    fs: &impl Filesystem,
    installer: &impl ScriptInstaller,
) -> Result<Report> {
    let mut directories = generation.global.runtime_dirs();
    let conf_dir = generation
        .conf_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = conf_dir {
        if !directories.iter().any(|d| d == parent) {
            directories.push(parent.to_path_buf());
        }
    }
    for dir in &directories {
        fs.ensure_dir(dir)?;
    }

    fs.write_file(&generation.conf_path, &generation.text())?;
    info!(path = %generation.conf_path.display(), "wrote supervisor config");

    let mut artifacts = Vec::new();
    for request in requests {
        artifacts.extend(installer.install(request)?);
    }
    artifacts.push(generation.conf_path.clone());

    Ok(Report {
        conf_file: generation.conf_path.clone(),
        server_url: generation.control.server_url.clone(),
        directories,
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::generate;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingFs {
        dirs: RefCell<Vec<PathBuf>>,
        files: RefCell<Vec<(PathBuf, String)>>,
    }

    impl Filesystem for RecordingFs {
        fn ensure_dir(&self, path: &Path) -> Result<()> {
            self.dirs.borrow_mut().push(path.to_path_buf());
            Ok(())
        }

        fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
            self.files
                .borrow_mut()
                .push((path.to_path_buf(), contents.to_string()));
            Ok(())
        }
    }

    struct FakeInstaller;

    impl ScriptInstaller for FakeInstaller {
        fn install(&self, request: &ScriptRequest) -> Result<Vec<PathBuf>> {
            Ok(request
                .launcher
                .iter()
                .map(|l| PathBuf::from("/srv/bin").join(&l.script_name))
                .collect())
        }
    }

    #[test]
    fn requests_follow_part_name_and_plugins() {
        let opts = OptionSet::new()
            .with("d_plugins", "superlance\n")
            .with("plugins", "collective.extra");
        let ctx = RecipeContext::new("/srv", "web");
        let conf = PathBuf::from("/srv/parts/web/supervisord.conf");
        let requests = script_requests(&opts, &ctx, &conf);

        let names: Vec<_> = requests
            .iter()
            .map(|r| r.launcher.as_ref().map(|l| l.script_name.as_str()))
            .collect();
        assert_eq!(names, vec![Some("webd"), Some("memmon"), Some("webctl"), None]);
        assert_eq!(requests[0].packages, vec!["supervisor", "superlance"]);
        assert_eq!(requests[2].packages, vec!["supervisor"]);
        assert_eq!(requests[3].packages, vec!["collective.extra"]);
        assert_eq!(
            requests[2].launcher.as_ref().unwrap().config_arg,
            ConfigArg::Leading(conf)
        );
    }

    #[test]
    fn materialize_orders_dirs_write_and_artifacts() {
        let opts = OptionSet::new();
        let ctx = RecipeContext::new("/srv", "supervisor");
        let generation = generate(&opts, &ctx).unwrap();
        let requests = script_requests(&opts, &ctx, &generation.conf_path);
        let fs = RecordingFs::default();

        let report = materialize(&generation, &requests, &fs, &FakeInstaller).unwrap();

        assert_eq!(
            *fs.dirs.borrow(),
            vec![
                PathBuf::from("/srv/var/log"),
                PathBuf::from("/srv/var"),
                PathBuf::from("/srv/parts/supervisor"),
            ]
        );
        let files = fs.files.borrow();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, generation.conf_path);
        assert_eq!(files[0].1, generation.text());
        assert_eq!(
            report.artifacts,
            vec![
                PathBuf::from("/srv/bin/supervisord"),
                PathBuf::from("/srv/bin/memmon"),
                PathBuf::from("/srv/bin/supervisorctl"),
                PathBuf::from("/srv/parts/supervisor/supervisord.conf"),
            ]
        );
        assert_eq!(report.server_url, "http://127.0.0.1:9001");
    }

    #[test]
    fn local_fs_is_idempotent_and_replaces_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a/b");
        LocalFs.ensure_dir(&dir).unwrap();
        LocalFs.ensure_dir(&dir).unwrap();

        let file = dir.join("supervisord.conf");
        LocalFs.write_file(&file, "first").unwrap();
        LocalFs.write_file(&file, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "second");
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn local_fs_new_file_gets_plain_create_mode() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let reference = tmp.path().join("reference");
        std::fs::write(&reference, "x").unwrap();
        let file = tmp.path().join("supervisord.conf");
        LocalFs.write_file(&file, "x").unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&file), mode(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn local_fs_keeps_mode_of_replaced_file() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("supervisord.conf");
        std::fs::write(&file, "old").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o640)).unwrap();

        LocalFs.write_file(&file, "new").unwrap();
        let mode = std::fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "new");
    }
}
