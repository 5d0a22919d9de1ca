//! Create directory trees from YAML descriptions.
//! Describe a file layout once and get it on disk, optionally in a temporary
//! sandbox that disappears when you are done. Ideal for test fixtures.
//!
//! ### Overview
//!
//! A tree description (`Node`) is walked by a `Dialect`, which issues primitive
//! operations (`mkdir`, `pushd`, `popd`, `mkfile`, metadata changes) on an
//! `FsBackend`. `HostFS` performs them on the real filesystem; `DryRun` only
//! records them.
//!
//! **Dialects**:
//! - `Implicit`: a key is a directory when its value is a mapping, a sequence or
//!   empty, and a file (with the value as content) otherwise.
//! - `Explicit`: every node names itself with `file` or `directory` and may carry
//!   `content`, `children`, `mode`, `user` and `group`.
//!
//! ```
//! use yamldirs::{Node, Sandbox};
//!
//! let tree = Node::from_yaml_str("
//! a:
//!   b: hello
//!   c: [1, 2]
//! ").unwrap();
//!
//! let sandbox = Sandbox::new(&tree).unwrap();
//! let b = std::fs::read_to_string(sandbox.root().join("a/b")).unwrap();
//! assert_eq!(b, "hello");
//! assert!(sandbox.root().join("a/c/1").is_file());
//! ```

mod backend;
mod core;
mod dialect;
mod error;
mod sandbox;
mod tree;

pub use backend::{DryRun, HostFS, Op};
pub use crate::core::{FsBackend, Owner, Result};
pub use dialect::{Dialect, DialectKind, Explicit, Implicit, build, build_explicit, materialize};
pub use error::YamlDirsError;
pub use sandbox::{Sandbox, SandboxBuilder, create_files};
pub use tree::{Node, Scalar};

/// Serializes tests that depend on the process working directory.
#[cfg(test)]
pub(crate) static CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
