//! Free-form metadata values for the unstructured map.

use indexmap::IndexMap;

/// A nested metadata value.
///
/// Values own all of their contents, so `clone()` is a deep copy.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Text.
    Text(String),
    /// Ordered sequence of values.
    Seq(Vec<Value>),
    /// Nested map, in insertion order.
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Look up `key` if this is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(m) => m.get(key),
            _ => None,
        }
    }

    /// Text content, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Elements, if this is a sequence.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(m: IndexMap<String, Value>) -> Self {
        Self::Map(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_of_str_becomes_text_seq() {
        let v = Value::from(vec!["#000000", "#FFFFFF"]);
        let seq = v.as_seq().unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq[1].as_str(), Some("#FFFFFF"));
    }

    #[test]
    fn clone_is_deep() {
        let mut inner = IndexMap::new();
        inner.insert("k".to_owned(), Value::from(1i64));
        let original = Value::Map(inner);
        let mut copy = original.clone();
        if let Value::Map(m) = &mut copy {
            m.insert("k".to_owned(), Value::from(2i64));
        }
        assert_eq!(original.get("k"), Some(&Value::Int(1)));
        assert_eq!(copy.get("k"), Some(&Value::Int(2)));
    }
}
