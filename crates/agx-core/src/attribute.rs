//! Key/value attributes attached to types, nodes, and the graph itself.

use std::fmt;

/// A typed attribute value: exactly one of string, number, or boolean.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl AttributeValue {
    /// Returns `true` if this value is a string.
    pub fn is_string(&self) -> bool {
        matches!(self, AttributeValue::String(_))
    }

    /// Returns `true` if this value is a number.
    pub fn is_number(&self) -> bool {
        matches!(self, AttributeValue::Number(_))
    }

    /// Returns `true` if this value is a boolean.
    pub fn is_boolean(&self) -> bool {
        matches!(self, AttributeValue::Boolean(_))
    }

    /// Borrow the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Renders the value in its bare form: strings unquoted, numbers without a
/// trailing `.0` for integral values, booleans as `true`/`false`.
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{s}"),
            AttributeValue::Number(n) => write!(f, "{n}"),
            AttributeValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

/// A named attribute. Duplicate names are allowed; lookups return the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    value: AttributeValue,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Get the attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the attribute value.
    pub fn value(&self) -> &AttributeValue {
        &self.value
    }
}

/// Renders as `name = value` with string values quoted.
impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            AttributeValue::String(s) => write!(f, "{} = {s:?}", self.name),
            value => write!(f, "{} = {value}", self.name),
        }
    }
}

/// Find the value of the first attribute named `name`.
pub fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a AttributeValue> {
    attributes
        .iter()
        .find(|attr| attr.name() == name)
        .map(Attribute::value)
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_value_predicates() {
        let s = AttributeValue::from("web");
        let n = AttributeValue::from(8080.0);
        let b = AttributeValue::from(true);

        assert!(s.is_string() && !s.is_number() && !s.is_boolean());
        assert!(n.is_number() && !n.is_string());
        assert!(b.is_boolean() && !b.is_number());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(AttributeValue::from("web").as_str(), Some("web"));
        assert!(approx_eq!(
            f64,
            AttributeValue::from(2.5).as_number().unwrap(),
            2.5
        ));
        assert_eq!(AttributeValue::from(false).as_bool(), Some(false));
        assert_eq!(AttributeValue::from(1.0).as_str(), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(AttributeValue::from(8080.0).to_string(), "8080");
        assert_eq!(AttributeValue::from(0.5).to_string(), "0.5");
        assert_eq!(AttributeValue::from(true).to_string(), "true");
        assert_eq!(AttributeValue::from("web-server").to_string(), "web-server");
    }

    #[test]
    fn test_attribute_display() {
        let name = Attribute::new("Name", AttributeValue::from("web-server"));
        let port = Attribute::new("Port", AttributeValue::from(8080.0));

        assert_eq!(name.to_string(), "Name = \"web-server\"");
        assert_eq!(port.to_string(), "Port = 8080");
    }

    #[test]
    fn test_find_attribute_returns_first_match() {
        let attrs = vec![
            Attribute::new("Port", AttributeValue::from(80.0)),
            Attribute::new("Port", AttributeValue::from(443.0)),
        ];

        assert_eq!(
            find_attribute(&attrs, "Port"),
            Some(&AttributeValue::Number(80.0))
        );
        assert_eq!(find_attribute(&attrs, "Host"), None);
    }
}
