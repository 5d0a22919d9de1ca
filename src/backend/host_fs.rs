//! This module provides the backend that materializes a tree on the host filesystem.
//!
//! ### Key Features:
//! - **Rooted**: every relative name is resolved against the backend's own current
//!   directory, which starts at the root given to `HostFS::new`.
//! - **No process state**: entering and leaving directories moves the backend's
//!   current directory only; the process working directory is never changed.
//! - **Best-effort metadata**: mode and ownership changes map onto unix
//!   `chmod`/`chown`; other platforms log a warning and carry on.

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::debug;

use crate::core::{FsBackend, Owner, Result, utils};

/// A backend that creates real directories and files under a root directory.
///
/// ### Example:
/// ```
/// use yamldirs::{FsBackend, HostFS};
///
/// let tmp = tempdir::TempDir::new("host_fs_doc").unwrap();
/// let root = tmp.path();
///
/// let mut fs = HostFS::new(root).unwrap();
/// fs.mkdir("docs").unwrap();
/// fs.pushd("docs").unwrap();
/// fs.mkfile("note.txt", "Hello").unwrap();
/// fs.popd().unwrap();
/// assert_eq!(std::fs::read_to_string(root.join("docs/note.txt")).unwrap(), "Hello");
/// // `tmp` removes the directory when dropped
/// ```
#[derive(Debug)]
pub struct HostFS {
    root: PathBuf,       // host absolute canonical path
    cwd: PathBuf,        // host absolute normalized path
    stack: Vec<PathBuf>, // previously current directories
}

impl HostFS {
    /// Creates a new HostFS rooted at `root`.
    /// * `root` must be an existing directory. Relative paths are resolved
    /// against the process working directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();

        if root.as_os_str().is_empty() {
            return Err(anyhow!("invalid root path: empty"));
        }
        if !root.is_dir() {
            return Err(anyhow!("{:?} is not a directory", root));
        }

        let root = root
            .canonicalize()
            .with_context(|| format!("cannot resolve root {}", root.display()))?;

        Ok(Self {
            cwd: root.clone(),
            root,
            stack: Vec::new(),
        })
    }

    /// Returns the root directory on the host.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    fn host_path(&self, name: &str) -> PathBuf {
        utils::normalize(self.cwd.join(name))
    }
}

impl FsBackend for HostFS {
    fn cwd(&self) -> &Path {
        self.cwd.as_path()
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Creates directory `name` in the current directory.
    /// Fails if it already exists or its parent is missing.
    fn mkdir(&mut self, name: &str) -> Result<()> {
        let host = self.host_path(name);
        debug!(path = %host.display(), "mkdir");
        std::fs::create_dir(&host)
            .with_context(|| format!("cannot create directory {}", host.display()))?;
        Ok(())
    }

    /// Makes `name` the current directory. `name` must be an existing directory.
    fn pushd(&mut self, name: &str) -> Result<()> {
        let target = self.host_path(name);
        if !target.is_dir() {
            return Err(anyhow!("{} is not a directory", target.display()));
        }
        debug!(path = %target.display(), "pushd");
        let previous = std::mem::replace(&mut self.cwd, target);
        self.stack.push(previous);
        Ok(())
    }

    fn popd(&mut self) -> Result<()> {
        let previous = self
            .stack
            .pop()
            .ok_or_else(|| anyhow!("directory stack is empty"))?;
        debug!(path = %previous.display(), "popd");
        self.cwd = previous;
        Ok(())
    }

    /// Creates `name` (truncating an existing file) with `content` as its whole body.
    fn mkfile(&mut self, name: &str, content: &str) -> Result<()> {
        let host = self.host_path(name);
        debug!(path = %host.display(), bytes = content.len(), "create file");
        std::fs::write(&host, content)
            .with_context(|| format!("cannot write file {}", host.display()))?;
        Ok(())
    }

    #[cfg(unix)]
    fn set_mode(&mut self, name: &str, mode: u32) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let host = self.host_path(name);
        debug!(path = %host.display(), mode = %format_args!("{:o}", mode), "chmod");
        std::fs::set_permissions(&host, std::fs::Permissions::from_mode(mode))
            .with_context(|| format!("cannot set mode {:o} on {}", mode, host.display()))?;
        Ok(())
    }

    #[cfg(unix)]
    fn set_user(&mut self, name: &str, user: &Owner) -> Result<()> {
        use nix::unistd::{Uid, User, chown};

        let uid = match user {
            Owner::Id(id) => Uid::from_raw(*id),
            Owner::Name(user_name) => {
                User::from_name(user_name)
                    .map_err(std::io::Error::from)?
                    .ok_or_else(|| anyhow!("no such user: {}", user_name))?
                    .uid
            }
        };
        let host = self.host_path(name);
        debug!(path = %host.display(), %user, "chown");
        chown(host.as_path(), Some(uid), None)
            .map_err(std::io::Error::from)
            .with_context(|| format!("cannot set user {} on {}", user, host.display()))?;
        Ok(())
    }

    #[cfg(unix)]
    fn set_group(&mut self, name: &str, group: &Owner) -> Result<()> {
        use nix::unistd::{Gid, Group, chown};

        let gid = match group {
            Owner::Id(id) => Gid::from_raw(*id),
            Owner::Name(group_name) => {
                Group::from_name(group_name)
                    .map_err(std::io::Error::from)?
                    .ok_or_else(|| anyhow!("no such group: {}", group_name))?
                    .gid
            }
        };
        let host = self.host_path(name);
        debug!(path = %host.display(), %group, "chgrp");
        chown(host.as_path(), None, Some(gid))
            .map_err(std::io::Error::from)
            .with_context(|| format!("cannot set group {} on {}", group, host.display()))?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn set_mode(&mut self, name: &str, mode: u32) -> Result<()> {
        tracing::warn!(name, mode, "setting a mode is not supported on this platform");
        Ok(())
    }

    #[cfg(not(unix))]
    fn set_user(&mut self, name: &str, user: &Owner) -> Result<()> {
        tracing::warn!(name, %user, "setting a user is not supported on this platform");
        Ok(())
    }

    #[cfg(not(unix))]
    fn set_group(&mut self, name: &str, group: &Owner) -> Result<()> {
        tracing::warn!(name, %group, "setting a group is not supported on this platform");
        Ok(())
    }
}
