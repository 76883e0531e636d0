//! Discovery of the modules belonging to the current project.
//!
//! A project is either a multi-module workspace described by `go.work`, or a
//! single module described by the nearest enclosing `go.mod`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{BuoyError, Result};
use crate::gomod::manifest::{GoMod, GoWork};

/// A module of the current project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    /// Directory holding the module's `go.mod`
    pub path: PathBuf,
}

/// Where to look for workspace descriptors, and the `GOWORK`/`GO111MODULE`
/// settings that steer the search.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub cwd: PathBuf,
    pub gowork: Option<String>,
    pub go111module: Option<String>,
}

impl Workspace {
    /// Workspace rooted at `cwd` with no environment overrides.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Workspace {
            cwd: cwd.into(),
            ..Workspace::default()
        }
    }

    /// Workspace of the running process.
    pub fn from_env() -> Result<Self> {
        Ok(Workspace {
            cwd: std::env::current_dir()?,
            gowork: std::env::var("GOWORK").ok(),
            go111module: std::env::var("GO111MODULE").ok(),
        })
    }

    /// Modules listed by the enclosing `go.work`.
    ///
    /// Fails with [`BuoyError::InvalidGowork`] when there is no usable
    /// `go.work` or one of its modules cannot be read.
    pub fn list(&self) -> Result<Vec<Module>> {
        let gowork = self.find_workfile()?;
        let data = fs::read_to_string(&gowork).map_err(|e| invalid_gowork(&gowork, e))?;
        let work = GoWork::parse(&gowork.display().to_string(), &data)
            .map_err(|e| invalid_gowork(&gowork, e))?;

        let workdir = gowork.parent().unwrap_or(Path::new("/"));
        work.uses
            .iter()
            .map(|dir| {
                let dir = workdir.join(dir);
                let modfile = dir.join("go.mod");
                let data =
                    fs::read_to_string(&modfile).map_err(|e| invalid_gowork(&modfile, e))?;
                let gomod = GoMod::parse_lax(&modfile.display().to_string(), &data)
                    .map_err(|e| invalid_gowork(&modfile, e))?;
                Ok(Module {
                    name: gomod.module,
                    path: dir,
                })
            })
            .collect()
    }

    /// The module described by the nearest enclosing `go.mod`.
    ///
    /// Fails with [`BuoyError::NoGomod`] when there is none, and with
    /// [`BuoyError::InvalidGomod`] when modules are disabled or the file is
    /// unusable.
    pub fn current(&self) -> Result<Module> {
        match self.go111module.as_deref() {
            None | Some("") | Some("auto") | Some("on") => {}
            Some(other) => {
                return Err(BuoyError::InvalidGomod(format!(
                    "unsupported value of GO111MODULE={} (supported are '', 'auto', 'on')",
                    other
                )))
            }
        }

        let modfile = find_enclosing_file(&self.cwd, "go.mod", |_| false)
            .ok_or_else(|| BuoyError::NoGomod(self.cwd.display().to_string()))?;
        let data = fs::read_to_string(&modfile)
            .map_err(|e| BuoyError::InvalidGomod(format!("{}: {}", modfile.display(), e)))?;
        let gomod = GoMod::parse_lax(&modfile.display().to_string(), &data)
            .map_err(|e| BuoyError::InvalidGomod(e.to_string()))?;

        Ok(Module {
            name: gomod.module,
            path: modfile.parent().map(Path::to_path_buf).unwrap_or_default(),
        })
    }

    /// Modules of the current project: the workspace's modules, else the
    /// current module, else none at all when no descriptor exists. A
    /// descriptor that exists but cannot be used is an error.
    pub fn current_project_modules(&self) -> Result<Vec<Module>> {
        match self.list() {
            Ok(mods) => Ok(mods),
            Err(BuoyError::InvalidGowork(reason)) => {
                debug!(%reason, "no usable go.work, falling back to go.mod");
                match self.current() {
                    Ok(m) => Ok(vec![m]),
                    Err(BuoyError::NoGomod(dir)) => {
                        warn!(%dir, "no workspace descriptor found, assuming no project modules");
                        Ok(Vec::new())
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    fn find_workfile(&self) -> Result<PathBuf> {
        match self.gowork.as_deref() {
            Some("off") => Err(BuoyError::InvalidGowork("disabled by GOWORK=off".to_string())),
            None | Some("") | Some("auto") => {
                let goroot = std::env::var_os("GOROOT").map(PathBuf::from);
                find_enclosing_file(&self.cwd, "go.work", |d| {
                    goroot.as_deref().is_some_and(|root| root == d)
                })
                .ok_or_else(|| BuoyError::InvalidGowork("file not found".to_string()))
            }
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.is_absolute() {
                    return Err(BuoyError::InvalidGowork(
                        "GOWORK must be an absolute path".to_string(),
                    ));
                }
                Ok(path)
            }
        }
    }
}

fn invalid_gowork(path: &Path, err: impl std::fmt::Display) -> BuoyError {
    BuoyError::InvalidGowork(format!("{}: {}", path.display(), err))
}

/// Walk from `start` up to the filesystem root looking for `file`. The walk
/// stops early at any directory for which `stop` returns true.
fn find_enclosing_file(start: &Path, file: &str, stop: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(d) = dir {
        let candidate = d.join(file);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = d.parent();
        if dir.is_some_and(&stop) {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// code/foo is a workspace of `foo` and `foo/a`; code/bar is a lone module.
    fn example_fs() -> TempDir {
        let td = tempfile::tempdir().unwrap();
        let root = td.path();
        let write = |rel: &str, data: &str| {
            let p = root.join(rel);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(p, data).unwrap();
        };
        write("code/foo/go.work", "go 1.18\n\nuse (\n\t.\n\ta\n)\n");
        write("code/foo/go.mod", "module foo\n\ngo 1.18\n");
        write("code/foo/a/go.mod", "module foo/a\n\ngo 1.18\n");
        write("code/foo/b/go.mod", "module foo/b\n\ngo 1.18\n");
        write("code/bar/go.mod", "module bar\n\ngo 1.18\n");
        fs::create_dir_all(root.join("srv")).unwrap();
        td
    }

    fn names(mods: &[Module]) -> Vec<&str> {
        mods.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_list_in_workspace_root_and_subdir() {
        let td = example_fs();
        for dir in ["code/foo", "code/foo/a", "code/foo/b"] {
            let ws = Workspace::new(td.path().join(dir));
            assert_eq!(names(&ws.list().unwrap()), vec!["foo", "foo/a"], "{}", dir);
        }
    }

    #[test]
    fn test_list_without_gowork() {
        let td = example_fs();
        let ws = Workspace::new(td.path().join("code/bar"));
        assert!(matches!(ws.list(), Err(BuoyError::InvalidGowork(_))));
    }

    #[test]
    fn test_list_gowork_off() {
        let td = example_fs();
        let ws = Workspace {
            gowork: Some("off".to_string()),
            ..Workspace::new(td.path().join("code/foo"))
        };
        assert!(matches!(ws.list(), Err(BuoyError::InvalidGowork(_))));
    }

    #[test]
    fn test_list_relative_gowork_rejected() {
        let td = example_fs();
        let ws = Workspace {
            gowork: Some("code/foo/go.work".to_string()),
            ..Workspace::new(td.path())
        };
        assert!(matches!(ws.list(), Err(BuoyError::InvalidGowork(_))));
    }

    #[test]
    fn test_list_absolute_gowork() {
        let td = example_fs();
        let ws = Workspace {
            gowork: Some(td.path().join("code/foo/go.work").display().to_string()),
            ..Workspace::new(td.path().join("srv"))
        };
        assert_eq!(names(&ws.list().unwrap()), vec!["foo", "foo/a"]);
    }

    #[test]
    fn test_current() {
        let td = example_fs();
        let cases = [
            ("code/foo", "foo"),
            ("code/foo/a", "foo/a"),
            ("code/bar", "bar"),
        ];
        for (dir, want) in cases {
            let ws = Workspace::new(td.path().join(dir));
            assert_eq!(ws.current().unwrap().name, want, "{}", dir);
        }
    }

    #[test]
    fn test_current_go111module_off() {
        let td = example_fs();
        let ws = Workspace {
            go111module: Some("off".to_string()),
            ..Workspace::new(td.path().join("code/foo"))
        };
        assert!(matches!(ws.current(), Err(BuoyError::InvalidGomod(_))));
    }

    #[test]
    fn test_current_project_modules_fallbacks() {
        let td = example_fs();

        let ws = Workspace::new(td.path().join("code/foo/a"));
        assert_eq!(names(&ws.current_project_modules().unwrap()), vec!["foo", "foo/a"]);

        let ws = Workspace::new(td.path().join("code/bar"));
        assert_eq!(names(&ws.current_project_modules().unwrap()), vec!["bar"]);

        let ws = Workspace::new(td.path().join("srv"));
        assert!(matches!(ws.current(), Err(BuoyError::NoGomod(_))));
        assert!(ws.current_project_modules().unwrap().is_empty());
    }

    #[test]
    fn test_current_project_modules_unusable_gomod() {
        let td = tempfile::tempdir().unwrap();
        fs::write(td.path().join("go.mod"), "modul knative.dev/serving\n").unwrap();
        let ws = Workspace::new(td.path());
        assert!(matches!(
            ws.current_project_modules(),
            Err(BuoyError::InvalidGomod(_))
        ));

        fs::write(td.path().join("go.mod"), "module knative.dev/serving\n").unwrap();
        let ws = Workspace {
            go111module: Some("off".to_string()),
            ..Workspace::new(td.path())
        };
        assert!(matches!(
            ws.current_project_modules(),
            Err(BuoyError::InvalidGomod(_))
        ));
    }
}
