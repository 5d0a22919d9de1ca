//! Temporary directories holding a materialized tree for the duration of a scope.
//!
//! A `Sandbox` is created from a tree, becomes the process working directory
//! while it lives and, on drop, restores the previous working directory and
//! removes itself. Teardown runs on every exit path: normal return, `?`
//! propagation, panic unwinding, and failures while the tree is still being
//! built.
//!
//! Because the working directory is process-wide, only one sandbox should be
//! alive at a time.

use std::path::{Path, PathBuf};

use tempdir::TempDir;
use tracing::{debug, info, warn};

use crate::core::{Result, utils};
use crate::dialect::{DialectKind, build_with};
use crate::tree::Node;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Unstarted,
    Active,
    TornDown,
}

/// Sandbox settings.
///
/// By default the sandbox is removed on drop, its directory name starts with
/// `yamldirs` and the tree is read with the implicit dialect.
#[derive(Debug, Clone)]
pub struct SandboxBuilder {
    cleanup: bool,
    prefix: String,
    dialect: DialectKind,
}

impl Default for SandboxBuilder {
    fn default() -> Self {
        Self {
            cleanup: true,
            prefix: "yamldirs".to_string(),
            dialect: DialectKind::Implicit,
        }
    }
}

impl SandboxBuilder {
    /// When `false` the directory is left on disk after the scope ends.
    pub fn cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Prefix of the temporary directory name.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    /// Creates a temporary directory, builds `tree` inside it and makes it
    /// the process working directory.
    pub fn create(&self, tree: &Node) -> Result<Sandbox> {
        let previous_cwd = std::env::current_dir()?;
        let root = TempDir::new(&self.prefix)?.into_path();

        // From here on, dropping `sandbox` undoes everything done so far.
        let mut sandbox = Sandbox {
            root,
            previous_cwd,
            cleanup: self.cleanup,
            state: State::Unstarted,
        };
        sandbox.root = sandbox.root.canonicalize()?;

        build_with(&sandbox.root, self.dialect, tree)?;

        std::env::set_current_dir(&sandbox.root)?;
        sandbox.state = State::Active;

        if self.cleanup {
            debug!(root = %sandbox.root.display(), "sandbox created");
        } else {
            info!(root = %sandbox.root.display(), "sandbox created, it will be kept");
        }
        Ok(sandbox)
    }

    /// Parses `yaml` and creates a sandbox from it.
    pub fn create_from_yaml(&self, yaml: &str) -> Result<Sandbox> {
        self.create(&Node::from_yaml_str(yaml)?)
    }
}

/// A materialized tree in a temporary directory.
///
/// ### Example
///
/// ```no_run
/// use yamldirs::Sandbox;
///
/// let sandbox = Sandbox::from_yaml("src:\n  lib.rs: pub fn f() {}").unwrap();
/// assert!(sandbox.root().join("src/lib.rs").is_file());
/// assert!(std::path::Path::new("src/lib.rs").is_file());
/// drop(sandbox); // the directory is gone, the working directory restored
/// ```
#[derive(Debug)]
pub struct Sandbox {
    root: PathBuf,         // host absolute canonical path
    previous_cwd: PathBuf, // working directory before the sandbox was created
    cleanup: bool,
    state: State,
}

impl Sandbox {
    /// Creates a sandbox with default settings.
    pub fn new(tree: &Node) -> Result<Self> {
        Self::builder().create(tree)
    }

    /// Parses `yaml` and creates a sandbox with default settings.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::builder().create_from_yaml(yaml)
    }

    pub fn builder() -> SandboxBuilder {
        SandboxBuilder::default()
    }

    /// Returns the absolute path of the sandbox root.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    fn teardown(&mut self) {
        if self.state == State::TornDown {
            return;
        }

        if let Err(e) = std::env::set_current_dir(&self.previous_cwd) {
            warn!(
                "Unable to restore working directory {}: {}",
                self.previous_cwd.display(),
                e
            );
        }

        if self.cleanup {
            if let Err(e) = utils::rm_on_host(&self.root) {
                debug!("Unable to remove {}: {}", self.root.display(), e);
            }
        }

        self.state = State::TornDown;
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Runs `body` inside a sandbox built from `tree` and tears the sandbox down
/// afterwards, whatever the outcome.
///
/// `body` receives the sandbox root, which is also the working directory
/// while it runs.
pub fn create_files<T, F>(tree: &Node, cleanup: bool, body: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let sandbox = Sandbox::builder().cleanup(cleanup).create(tree)?;
    body(sandbox.root())
}
