use crate::core::{FsBackend, Result};
use crate::dialect::Dialect;
use crate::tree::Node;

/// The shorthand dialect: the shape of a mapping value decides what its key
/// names.
///
/// ```yaml
/// src:
///   main.rs: fn main() {}
///   empty:
/// README: hello
/// ```
///
/// Mappings, sequences and empty values make a directory and are walked
/// inside it; any other value is the content of a file.
#[derive(Debug, Copy, Clone, Default)]
pub struct Implicit;

impl Dialect for Implicit {
    fn make_mapping(&self, fs: &mut dyn FsBackend, entries: &[(Node, Node)]) -> Result<()> {
        for (key, value) in entries {
            let name = key.to_text()?;
            if value.is_directory_like() {
                fs.mkdir(&name)?;
                fs.pushd(&name)?;
                if !value.is_null() {
                    self.make_item(fs, value)?;
                }
                fs.popd()?;
            } else {
                fs.mkfile(&name, &value.to_text()?)?;
            }
        }
        Ok(())
    }
}
