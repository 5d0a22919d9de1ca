//! The in-memory tree value every dialect walks.
//!
//! A `Node` is decided once, where the external value is ingested (see
//! `tree::yaml`), and matched exhaustively afterwards.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// A tree description: a mapping, a sequence or a scalar leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(Vec<(Node, Node)>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

/// A leaf value.
///
/// Only `Text`, `Integer`, `Float`, `Date` and `DateTime` can become names or
/// contents; the other variants exist so that unsupported input is reported
/// instead of silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i128),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Node {
    /// Creates an empty mapping.
    pub fn mapping() -> Self {
        Node::Mapping(Vec::new())
    }

    /// Appends `key: value` to a mapping. Does nothing for other node kinds.
    pub fn with(mut self, key: impl Into<Node>, value: impl Into<Node>) -> Self {
        if let Node::Mapping(entries) = &mut self {
            entries.push((key.into(), value.into()));
        }
        self
    }

    /// Creates a sequence from `items`.
    pub fn sequence<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Node>,
    {
        Node::Sequence(items.into_iter().map(Into::into).collect())
    }

    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    /// A mapping value is directory-like when it is a mapping, a sequence or
    /// empty; everything else describes a file.
    pub fn is_directory_like(&self) -> bool {
        matches!(self, Node::Mapping(_) | Node::Sequence(_)) || self.is_null()
    }

    /// Returns the text of a `Text` scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Looks up the value of a text key in a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => lookup(entries, key),
            _ => None,
        }
    }

    /// Returns the runtime type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Scalar(scalar) => scalar.type_name(),
        }
    }
}

/// Finds the value of the first entry whose key is the text `key`.
pub(crate) fn lookup<'a>(entries: &'a [(Node, Node)], key: &str) -> Option<&'a Node> {
    entries
        .iter()
        .find(|(k, _)| k.as_str() == Some(key))
        .map(|(_, v)| v)
}

impl Scalar {
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Integer(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "str",
            Scalar::Date(_) => "date",
            Scalar::DateTime(_) => "datetime",
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Node::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Node::Scalar(scalar) => write!(f, "{}", scalar),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::Text(s) => write!(f, "{:?}", s),
            Scalar::Date(d) => write!(f, "{}", d),
            Scalar::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::Text(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::Text(s))
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Scalar(Scalar::Integer(n.into()))
    }
}

impl From<i32> for Node {
    fn from(n: i32) -> Self {
        Node::Scalar(Scalar::Integer(n.into()))
    }
}

impl From<u32> for Node {
    fn from(n: u32) -> Self {
        Node::Scalar(Scalar::Integer(n.into()))
    }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Node::Scalar(Scalar::Float(x))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<NaiveDate> for Node {
    fn from(d: NaiveDate) -> Self {
        Node::Scalar(Scalar::Date(d))
    }
}

impl From<NaiveDateTime> for Node {
    fn from(dt: NaiveDateTime) -> Self {
        Node::Scalar(Scalar::DateTime(dt))
    }
}
