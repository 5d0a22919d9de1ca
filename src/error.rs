/// Errors raised while interpreting a tree description.
#[derive(Debug, thiserror::Error)]
pub enum YamlDirsError {
    /// A value has a type the interpreter doesn't know how to turn into a
    /// name, a content or a node.
    #[error("don't know what to do with {value} of type {type_name}")]
    UnknownType { value: String, type_name: String },
}

impl YamlDirsError {
    pub(crate) fn unknown_type(value: impl Into<String>, type_name: impl Into<String>) -> Self {
        YamlDirsError::UnknownType {
            value: value.into(),
            type_name: type_name.into(),
        }
    }
}
