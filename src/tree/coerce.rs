//! Conversion of leaf values into the text written on disk.

use crate::core::Result;
use crate::error::YamlDirsError;
use crate::tree::{Node, Scalar};

impl Node {
    /// Returns the on-disk text form of a leaf, used both for names and for
    /// file contents.
    ///
    /// Date-times lose their time of day: only the calendar date is kept.
    /// Booleans, nulls, mappings and sequences are rejected with
    /// `YamlDirsError::UnknownType`.
    pub fn to_text(&self) -> Result<String> {
        match self {
            Node::Scalar(scalar) => scalar.to_text(),
            other => Err(YamlDirsError::unknown_type(other.to_string(), other.type_name()).into()),
        }
    }
}

impl Scalar {
    pub fn to_text(&self) -> Result<String> {
        match self {
            Scalar::Text(s) => Ok(s.clone()),
            Scalar::Integer(n) => Ok(n.to_string()),
            Scalar::Float(x) => Ok(float_to_text(*x)),
            Scalar::Date(d) => Ok(d.format("%Y-%m-%d").to_string()),
            Scalar::DateTime(dt) => Ok(dt.date().format("%Y-%m-%d").to_string()),
            Scalar::Null | Scalar::Bool(_) => {
                Err(YamlDirsError::unknown_type(self.to_string(), self.type_name()).into())
            }
        }
    }
}

fn float_to_text(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else {
        // `{:?}` keeps a trailing `.0` and switches to exponent form for very
        // large or small magnitudes, but writes the exponent bare (`1e20`,
        // `1e-5`); the on-disk form is signed and two digits wide.
        let text = format!("{:?}", x);
        match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn unknown_type_of(node: &Node) -> (String, String) {
        let err = node.to_text().unwrap_err();
        match err.downcast_ref::<YamlDirsError>() {
            Some(YamlDirsError::UnknownType { value, type_name }) => {
                (value.clone(), type_name.clone())
            }
            None => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn test_text_is_unmodified() {
        let node = Node::from("  hello\nworld  ");
        assert_eq!(node.to_text().unwrap(), "  hello\nworld  ");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Node::from(42).to_text().unwrap(), "42");
        assert_eq!(Node::from(-7).to_text().unwrap(), "-7");
        assert_eq!(
            Node::Scalar(Scalar::Integer(u64::MAX.into())).to_text().unwrap(),
            "18446744073709551615"
        );
        assert_eq!(Node::from(1.0).to_text().unwrap(), "1.0");
        assert_eq!(Node::from(0.25).to_text().unwrap(), "0.25");
        assert_eq!(Node::from(f64::INFINITY).to_text().unwrap(), "inf");
        assert_eq!(Node::from(f64::NAN).to_text().unwrap(), "nan");
    }

    #[test]
    fn test_float_exponent_form() {
        assert_eq!(Node::from(1e20).to_text().unwrap(), "1e+20");
        assert_eq!(Node::from(1e-5).to_text().unwrap(), "1e-05");
        assert_eq!(Node::from(-2.5e-7).to_text().unwrap(), "-2.5e-07");
        assert_eq!(Node::from(1.5e300).to_text().unwrap(), "1.5e+300");
        assert_eq!(Node::from(123456.0).to_text().unwrap(), "123456.0");
    }

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(Node::from(date).to_text().unwrap(), "2020-02-29");

        let datetime = date.and_hms_opt(23, 59, 1).unwrap();
        assert_eq!(Node::from(datetime).to_text().unwrap(), "2020-02-29");
    }

    #[test]
    fn test_same_value_same_text() {
        let node = Node::from(3.5);
        assert_eq!(node.to_text().unwrap(), node.to_text().unwrap());
    }

    #[test]
    fn test_bool_is_unknown_type() {
        let (value, type_name) = unknown_type_of(&Node::from(true));
        assert_eq!(value, "true");
        assert_eq!(type_name, "bool");
    }

    #[test]
    fn test_null_and_containers_are_unknown_type() {
        assert_eq!(unknown_type_of(&Node::null()).1, "null");
        assert_eq!(unknown_type_of(&Node::mapping().with("a", 1)).1, "mapping");
        assert_eq!(unknown_type_of(&Node::sequence([1])).1, "sequence");
    }

    #[test]
    fn test_error_message_names_value_and_type() {
        let err = Node::from(false).to_text().unwrap_err();
        assert_eq!(
            err.to_string(),
            "don't know what to do with false of type bool"
        );
    }
}
