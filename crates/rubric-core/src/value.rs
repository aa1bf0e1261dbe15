//! Attribute values passed to templates.
//!
//! Templates see a flat set of named [`Attributes`]. A value is either a
//! scalar or a [`Fragment`]: an already rendered template that still exposes
//! the attributes it was rendered with, so `<message.id>` can reach inside the
//! `message` fragment while `<message>` prints its text.

use std::fmt;

use indexmap::IndexMap;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Bool(bool),
    Fragment(Fragment),
}

impl Value {
    /// Whether a conditional over this value takes its `if` branch.
    ///
    /// Only an explicit boolean `false` is falsy; absent attributes are
    /// handled by the caller.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    /// Attributes carried by a fragment value.
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Value::Fragment(fragment) => Some(fragment.attributes()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Fragment(fragment) => f.write_str(fragment.text()),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Fragment> for Value {
    fn from(fragment: Fragment) -> Self {
        Value::Fragment(fragment)
    }
}

/// Rendered template text together with the attributes that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    text: String,
    attributes: Attributes,
}

impl Fragment {
    pub fn new(text: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            text: text.into(),
            attributes,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// An ordered set of named attribute values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: IndexMap<String, Value>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`Attributes::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Resolve a dotted attribute path such as `message.id`.
    ///
    /// Every segment but the last must name a [`Fragment`].
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut value = self.get(first.as_ref())?;
        for segment in rest {
            value = value.attributes()?.get(segment.as_ref())?;
        }
        Some(value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::from("text").to_string(), "text");
        assert_eq!(Value::from(42u32).to_string(), "42");
        assert_eq!(Value::from(true).to_string(), "true");
    }

    #[test]
    fn test_fragment_displays_its_text() {
        let fragment = Fragment::new("(5) boom", Attributes::new().with("id", 5u32));
        assert_eq!(Value::from(fragment).to_string(), "(5) boom");
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::from("").is_truthy());
        assert!(Value::from(0i64).is_truthy());
        assert!(Value::from(true).is_truthy());
        assert!(!Value::from(false).is_truthy());
    }

    #[test]
    fn test_resolve_nested_path() {
        let message = Fragment::new("(5) boom", Attributes::new().with("id", 5u32));
        let attrs = Attributes::new().with("message", message);

        assert_eq!(attrs.resolve(&["message", "id"]), Some(&Value::Int(5)));
        assert!(attrs.resolve(&["message", "missing"]).is_none());
        assert!(attrs.resolve(&["missing"]).is_none());
        assert!(attrs.resolve::<&str>(&[]).is_none());
    }

    #[test]
    fn test_resolve_through_scalar_fails() {
        let attrs = Attributes::new().with("id", 5u32);
        assert!(attrs.resolve(&["id", "inner"]).is_none());
    }

    #[test]
    fn test_insert_replaces_and_keeps_order() {
        let mut attrs = Attributes::new().with("a", 1u32).with("b", 2u32);
        attrs.insert("a", 3u32);

        let names: Vec<_> = attrs.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(attrs.get("a"), Some(&Value::Int(3)));
        assert_eq!(attrs.len(), 2);
    }
}
