//! Traits which, typically, may be imported without concern: `use callarg::prelude::*`.
use crate::model::Value;

/// Behaviour for extracting a typed `T` out of a bound [`Value`].
// Needs to be imported in order to implement a custom extraction.
pub trait FromValue: Sized {
    /// Extract `Self`, or `None` when the value has a different shape.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(inner) => Some(*inner),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(inner) => Some(*inner),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        i64::from_value(value).and_then(|inner| i32::try_from(inner).ok())
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value) -> Option<Self> {
        i64::from_value(value).and_then(|inner| u32::try_from(inner).ok())
    }
}

impl FromValue for usize {
    fn from_value(value: &Value) -> Option<Self> {
        i64::from_value(value).and_then(|inner| usize::try_from(inner).ok())
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(inner) => Some(*inner),
            Value::Integer(inner) => Some(*inner as f64),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(inner) => Some(inner.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<String> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(inner) => Some(inner.clone()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::None => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(i64::from_value(&Value::Integer(-1)), Some(-1));
        assert_eq!(u32::from_value(&Value::Integer(-1)), None);
        assert_eq!(usize::from_value(&Value::Integer(3)), Some(3));
        assert_eq!(i32::from_value(&Value::Text("3".to_string())), None);
    }

    #[test]
    fn float_widens_integer() {
        assert_eq!(f64::from_value(&Value::Integer(2)), Some(2.0));
        assert_eq!(f64::from_value(&Value::Float(0.5)), Some(0.5));
    }

    #[test]
    fn optional() {
        assert_eq!(Option::<String>::from_value(&Value::None), Some(None));
        assert_eq!(
            Option::<String>::from_value(&Value::Text("a".to_string())),
            Some(Some("a".to_string()))
        );
        assert_eq!(Option::<bool>::from_value(&Value::Integer(1)), None);
    }
}
