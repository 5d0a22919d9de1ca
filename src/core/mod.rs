use std::fmt;
use std::path::Path;

pub mod utils;

/// Primitive operations a dialect issues while walking a tree.
///
/// Names passed to the methods are resolved against the backend's current
/// directory, which moves with `pushd`/`popd` (the Directory Stack).
/// Implementations must keep `depth()` equal to the number of `pushd` calls
/// not yet matched by a `popd`.
pub trait FsBackend {
    /// Returns the current directory of the backend.
    fn cwd(&self) -> &Path;

    /// Returns the number of directories currently on the Directory Stack.
    fn depth(&self) -> usize;

    /// Creates a directory `name` inside the current directory.
    fn mkdir(&mut self, name: &str) -> Result<()>;

    /// Enters `name`, remembering the current directory.
    fn pushd(&mut self, name: &str) -> Result<()>;

    /// Returns to the directory that was current before the last `pushd`.
    fn popd(&mut self) -> Result<()>;

    /// Creates (or truncates) file `name` and writes `content` into it.
    fn mkfile(&mut self, name: &str, content: &str) -> Result<()>;

    /// Sets permission bits of `name`.
    fn set_mode(&mut self, name: &str, mode: u32) -> Result<()>;

    /// Sets the owning user of `name`.
    fn set_user(&mut self, name: &str, user: &Owner) -> Result<()>;

    /// Sets the owning group of `name`.
    fn set_group(&mut self, name: &str, group: &Owner) -> Result<()>;
}

/// A user or group, either by name or by numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    Name(String),
    Id(u32),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Name(name) => f.write_str(name),
            Owner::Id(id) => write!(f, "{}", id),
        }
    }
}

pub type Result<T> = std::result::Result<T, anyhow::Error>;
