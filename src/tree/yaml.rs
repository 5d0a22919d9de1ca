//! Ingestion of decoded YAML into `Node`.
//!
//! Decoding is done by `serde_yaml`; this module only maps its `Value` onto the
//! tree types. `serde_yaml` hands timestamps over as strings, so strings shaped
//! like a YAML timestamp (`2001-12-14`, `2001-12-14 21:59:43.10`,
//! `2001-12-14T21:59:43-05:00`) are resolved here, as are values tagged
//! `!timestamp`. The scalar style is lost by then, so a quoted timestamp is
//! resolved too.

use anyhow::{Context, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_yaml::Value;

use crate::core::Result;
use crate::tree::{Node, Scalar};

impl Node {
    /// Parses a YAML document and converts it into a tree.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text).context("invalid YAML document")?;
        Self::from_yaml(value)
    }

    /// Converts an already decoded YAML value into a tree.
    pub fn from_yaml(value: Value) -> Result<Self> {
        let node = match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Scalar(Scalar::Integer(i.into()))
                } else if let Some(u) = n.as_u64() {
                    Node::Scalar(Scalar::Integer(u.into()))
                } else {
                    let x = n.as_f64().ok_or_else(|| anyhow!("unsupported number: {}", n))?;
                    Node::Scalar(Scalar::Float(x))
                }
            }
            Value::String(s) => match looks_like_timestamp(&s)
                .then(|| parse_timestamp(&s).ok())
                .flatten()
            {
                Some(timestamp) => Node::Scalar(timestamp),
                None => Node::Scalar(Scalar::Text(s)),
            },
            Value::Sequence(items) => Node::Sequence(
                items
                    .into_iter()
                    .map(Self::from_yaml)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Mapping(mapping) => Node::Mapping(
                mapping
                    .into_iter()
                    .map(|(k, v)| Ok((Self::from_yaml(k)?, Self::from_yaml(v)?)))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Tagged(tagged) => {
                let tag = tagged.tag.to_string();
                let name = tag.trim_start_matches('!');
                if name != "timestamp" && !name.ends_with(":timestamp") {
                    return Err(anyhow!("unsupported YAML tag: {}", tag));
                }
                match tagged.value {
                    Value::String(s) => Node::Scalar(parse_timestamp(&s)?),
                    other => return Err(anyhow!("invalid timestamp: {:?}", other)),
                }
            }
        };
        Ok(node)
    }
}

/// Checks the `YYYY-MM-DD` prefix every YAML timestamp starts with, and that
/// anything after it starts a time part.
fn looks_like_timestamp(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() < 10 {
        return false;
    }
    let date_shape = bytes[..10].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    date_shape && matches!(bytes.get(10), None | Some(b'T' | b't' | b' '))
}

fn parse_timestamp(text: &str) -> Result<Scalar> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Scalar::Date(date));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Scalar::DateTime(dt.naive_local()));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dt%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Scalar::DateTime(dt));
        }
    }
    Err(anyhow!("invalid timestamp: {}", text))
}
