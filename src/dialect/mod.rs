//! Interpretation of a tree as backend operations.
//!
//! A `Dialect` decides what a mapping means; the walk over sequences and bare
//! scalars is shared by every dialect through `Dialect::make_item`.

mod explicit;
mod implicit;

use std::path::Path;

use anyhow::anyhow;
use tracing::debug;

use crate::backend::HostFS;
use crate::core::{FsBackend, Result};
use crate::tree::Node;

pub use explicit::Explicit;
pub use implicit::Implicit;

/// A convention for turning a tree into filesystem operations.
pub trait Dialect {
    /// Interprets the entries of a mapping node.
    fn make_mapping(&self, fs: &mut dyn FsBackend, entries: &[(Node, Node)]) -> Result<()>;

    /// Walks `node`: mappings go to `make_mapping`, sequence items are
    /// siblings in the current directory, and a bare scalar becomes an empty
    /// file named after it.
    fn make_item(&self, fs: &mut dyn FsBackend, node: &Node) -> Result<()> {
        match node {
            Node::Mapping(entries) => self.make_mapping(fs, entries),
            Node::Sequence(items) => {
                for item in items {
                    self.make_item(fs, item)?;
                }
                Ok(())
            }
            Node::Scalar(_) => fs.mkfile(&node.to_text()?, ""),
        }
    }
}

/// Selects a dialect at run time.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum DialectKind {
    /// Mapping values decide: containers and empty values are directories,
    /// scalars are file contents.
    #[default]
    Implicit,
    /// Every node names itself with a `file` or `directory` key.
    Explicit,
}

impl DialectKind {
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            DialectKind::Implicit => &Implicit,
            DialectKind::Explicit => &Explicit,
        }
    }
}

/// Walks `tree` with `dialect`, issuing operations on `fs` starting from its
/// current directory.
///
/// Returns an error if the walk leaves the Directory Stack at a different
/// depth than it found it.
pub fn materialize(fs: &mut dyn FsBackend, dialect: &dyn Dialect, tree: &Node) -> Result<()> {
    let depth = fs.depth();
    debug!(cwd = %fs.cwd().display(), "materializing tree");
    dialect.make_item(fs, tree)?;
    if fs.depth() != depth {
        return Err(anyhow!(
            "unbalanced directory stack: expected depth {}, found {}",
            depth,
            fs.depth()
        ));
    }
    Ok(())
}

/// Creates `tree` under `root` using the implicit dialect.
pub fn build<P: AsRef<Path>>(root: P, tree: &Node) -> Result<HostFS> {
    build_with(root, DialectKind::Implicit, tree)
}

/// Creates `tree` under `root` using the explicit dialect.
pub fn build_explicit<P: AsRef<Path>>(root: P, tree: &Node) -> Result<HostFS> {
    build_with(root, DialectKind::Explicit, tree)
}

pub(crate) fn build_with<P: AsRef<Path>>(root: P, kind: DialectKind, tree: &Node) -> Result<HostFS> {
    let mut fs = HostFS::new(root)?;
    materialize(&mut fs, kind.dialect(), tree)?;
    Ok(fs)
}
