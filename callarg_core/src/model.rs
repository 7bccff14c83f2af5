/// A value bound to a parameter.
///
/// Defaults are declared as `Value`s, and the variant of a default decides how command line tokens are cast for that parameter.
/// See [`Cast`](crate::Cast) for the inference rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value (ex: an optional parameter whose default is "nothing").
    /// Parameters defaulting to `None` take the token text as is.
    None,
    /// A boolean; parameters defaulting to a `Bool` become toggles.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Text(String),
    /// A list of strings; parameters defaulting to a `List` accept comma separated values.
    List(Vec<String>),
}

impl Value {
    /// Whether this is the `None` variant.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Text(value) => write!(f, "{value:?}"),
            Value::List(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(values: Vec<String>) -> Self {
        Value::List(values)
    }
}

impl From<Vec<&str>> for Value {
    fn from(values: Vec<&str>) -> Self {
        Value::List(values.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Value::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::None, "None")]
    #[case(Value::Bool(false), "false")]
    #[case(Value::Integer(-3), "-3")]
    #[case(Value::Float(2.0), "2.0")]
    #[case(Value::Text("world".to_string()), "\"world\"")]
    #[case(Value::List(vec![]), "[]")]
    #[case(Value::from(vec!["a", "b"]), "[a, b]")]
    fn display(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn from_option() {
        assert_eq!(Value::from(Some(1)), Value::Integer(1));
        assert_eq!(Value::from(None::<&str>), Value::None);
        assert!(Value::from(None::<bool>).is_none());
    }
}
