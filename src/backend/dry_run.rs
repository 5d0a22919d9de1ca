//! A backend that performs no I/O: it records and logs the operations a tree
//! would produce.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use tracing::info;

use crate::core::{FsBackend, Owner, Result, utils};

/// An operation issued by a dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Mkdir(String),
    Pushd(String),
    Popd,
    CreateFile { name: String, content: String },
    SetMode { name: String, mode: u32 },
    SetUser { name: String, user: Owner },
    SetGroup { name: String, group: Owner },
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Mkdir(name) => write!(f, "mkdir {}", name),
            Op::Pushd(name) => write!(f, "pushd {}", name),
            Op::Popd => f.write_str("popd"),
            Op::CreateFile { name, content } => write!(f, "create file: {} {:?}", name, content),
            Op::SetMode { name, mode } => write!(f, "chmod {:o} {}", mode, name),
            Op::SetUser { name, user } => write!(f, "chown {} {}", user, name),
            Op::SetGroup { name, group } => write!(f, "chgrp {} {}", group, name),
        }
    }
}

/// Records every operation instead of touching a filesystem.
///
/// The current directory is tracked as a virtual path starting at `/`, so
/// the Directory Stack behaves exactly as with `HostFS`, but nothing is
/// checked for existence.
///
/// ### Example
///
/// ```
/// use yamldirs::{DryRun, Implicit, Node, materialize};
///
/// let tree = Node::from_yaml_str("a:\n  b: hello").unwrap();
/// let mut dry = DryRun::new();
/// materialize(&mut dry, &Implicit, &tree).unwrap();
///
/// let lines: Vec<String> = dry.ops().iter().map(|op| op.to_string()).collect();
/// assert_eq!(lines, ["mkdir a", "pushd a", r#"create file: b "hello""#, "popd"]);
/// ```
#[derive(Debug)]
pub struct DryRun {
    cwd: PathBuf,
    stack: Vec<PathBuf>,
    ops: Vec<Op>,
    deny_metadata: bool,
}

impl DryRun {
    pub fn new() -> Self {
        Self {
            cwd: PathBuf::from("/"),
            stack: Vec::new(),
            ops: Vec::new(),
            deny_metadata: false,
        }
    }

    /// Makes `set_mode`, `set_user` and `set_group` fail with a permission
    /// error, as they would for an unprivileged user.
    pub fn deny_metadata(mut self, deny: bool) -> Self {
        self.deny_metadata = deny;
        self
    }

    /// Returns recorded operations in the order they were issued.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    fn record(&mut self, op: Op) {
        info!(cwd = %self.cwd.display(), "{}", op);
        self.ops.push(op);
    }

    fn record_metadata(&mut self, op: Op) -> Result<()> {
        if self.deny_metadata {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("operation not permitted: {}", op),
            )
            .into());
        }
        self.record(op);
        Ok(())
    }
}

impl Default for DryRun {
    fn default() -> Self {
        Self::new()
    }
}

impl FsBackend for DryRun {
    fn cwd(&self) -> &Path {
        self.cwd.as_path()
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn mkdir(&mut self, name: &str) -> Result<()> {
        self.record(Op::Mkdir(name.to_string()));
        Ok(())
    }

    fn pushd(&mut self, name: &str) -> Result<()> {
        self.record(Op::Pushd(name.to_string()));
        let target = utils::normalize(self.cwd.join(name));
        let previous = std::mem::replace(&mut self.cwd, target);
        self.stack.push(previous);
        Ok(())
    }

    fn popd(&mut self) -> Result<()> {
        self.cwd = self
            .stack
            .pop()
            .ok_or_else(|| anyhow!("directory stack is empty"))?;
        self.record(Op::Popd);
        Ok(())
    }

    fn mkfile(&mut self, name: &str, content: &str) -> Result<()> {
        self.record(Op::CreateFile {
            name: name.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }

    fn set_mode(&mut self, name: &str, mode: u32) -> Result<()> {
        self.record_metadata(Op::SetMode {
            name: name.to_string(),
            mode,
        })
    }

    fn set_user(&mut self, name: &str, user: &Owner) -> Result<()> {
        self.record_metadata(Op::SetUser {
            name: name.to_string(),
            user: user.clone(),
        })
    }

    fn set_group(&mut self, name: &str, group: &Owner) -> Result<()> {
        self.record_metadata(Op::SetGroup {
            name: name.to_string(),
            group: group.clone(),
        })
    }
}
