use std::rc::Rc;
use thiserror::Error;

use crate::model::Value;

type CastFn = dyn Fn(&str) -> Result<Value, String>;
type ValidateFn = dyn Fn(&Value) -> Result<(), String>;

/// How a command line token is converted into a [`Value`].
///
/// Unless a cast is attached explicitly (see [`Metadata::cast`](crate::Metadata::cast)), it is inferred from the parameter's default:
/// * `Value::Bool` → [`Cast::Toggle`]
/// * `Value::List` → [`Cast::Array`]
/// * `Value::Integer` → [`Cast::Integer`]
/// * `Value::Float` → [`Cast::Float`]
/// * `Value::Text` → [`Cast::Text`]
/// * `Value::None` → no cast; the token is taken as text.
#[derive(Clone)]
pub enum Cast {
    /// A boolean switch.
    /// A bare `--name` negates the default, while `--name=VALUE` parses `VALUE` (`true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`).
    Toggle,
    /// A comma separated list: `a,b,c`.
    Array,
    /// A signed integer.
    Integer,
    /// A floating point number.
    Float,
    /// The token text, as is.
    Text,
    /// A user supplied conversion.
    Custom(Rc<CastFn>),
}

impl Cast {
    /// Create a custom cast from a conversion function.
    ///
    /// ### Example
    /// ```
    /// # use callarg_core as callarg;
    /// use callarg::{Cast, Value};
    ///
    /// let even = Cast::custom(|token| match token.parse::<i64>() {
    ///     Ok(n) if n % 2 == 0 => Ok(Value::Integer(n)),
    ///     _ => Err("Should be an even integer.".to_string()),
    /// });
    /// ```
    pub fn custom(conversion: impl Fn(&str) -> Result<Value, String> + 'static) -> Self {
        Cast::Custom(Rc::new(conversion))
    }

    pub(crate) fn infer(default: &Value) -> Option<Cast> {
        match default {
            Value::None => None,
            Value::Bool(_) => Some(Cast::Toggle),
            Value::Integer(_) => Some(Cast::Integer),
            Value::Float(_) => Some(Cast::Float),
            Value::Text(_) => Some(Cast::Text),
            Value::List(_) => Some(Cast::Array),
        }
    }

    pub(crate) fn is_toggle(&self) -> bool {
        matches!(self, Cast::Toggle)
    }

    pub(crate) fn apply(&self, token: &str) -> Result<Value, InvalidCapture> {
        match self {
            Cast::Toggle => boolean(token).map(Value::Bool).ok_or_else(|| {
                InvalidCapture::InvalidConversion {
                    token: token.to_string(),
                    type_name: "bool",
                }
            }),
            Cast::Array => Ok(Value::List(array(token))),
            Cast::Integer => token.trim().parse::<i64>().map(Value::Integer).map_err(|_| {
                InvalidCapture::InvalidConversion {
                    token: token.to_string(),
                    type_name: "integer",
                }
            }),
            Cast::Float => token.trim().parse::<f64>().map(Value::Float).map_err(|_| {
                InvalidCapture::InvalidConversion {
                    token: token.to_string(),
                    type_name: "float",
                }
            }),
            Cast::Text => Ok(Value::Text(token.to_string())),
            Cast::Custom(conversion) => {
                conversion(token).map_err(|message| InvalidCapture::CustomConversion {
                    token: token.to_string(),
                    message,
                })
            }
        }
    }
}

impl std::fmt::Debug for Cast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cast::Toggle => write!(f, "Toggle"),
            Cast::Array => write!(f, "Array"),
            Cast::Integer => write!(f, "Integer"),
            Cast::Float => write!(f, "Float"),
            Cast::Text => write!(f, "Text"),
            Cast::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl PartialEq for Cast {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cast::Custom(a), Cast::Custom(b)) => Rc::ptr_eq(a, b),
            (Cast::Toggle, Cast::Toggle)
            | (Cast::Array, Cast::Array)
            | (Cast::Integer, Cast::Integer)
            | (Cast::Float, Cast::Float)
            | (Cast::Text, Cast::Text) => true,
            _ => false,
        }
    }
}

/// A check applied to a parameter's value after it has been cast.
/// A rejected value makes the arguments malformed.
#[derive(Clone)]
pub struct Validator(Rc<ValidateFn>);

impl Validator {
    /// Create a validator from a predicate; `Err(message)` rejects the value.
    pub fn new(check: impl Fn(&Value) -> Result<(), String> + 'static) -> Self {
        Validator(Rc::new(check))
    }

    pub(crate) fn check(&self, name: &str, value: &Value) -> Result<(), InvalidCapture> {
        (self.0)(value).map_err(|message| InvalidCapture::Rejected {
            name: name.to_string(),
            message,
        })
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validator(..)")
    }
}

impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[doc(hidden)]
pub enum InvalidCapture {
    #[error("cannot convert '{token}' to {type_name}.")]
    InvalidConversion {
        token: String,
        type_name: &'static str,
    },
    #[error("cannot convert '{token}': {message}")]
    CustomConversion { token: String, message: String },
    #[error("invalid value for '{name}': {message}")]
    Rejected { name: String, message: String },
}

fn boolean(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

fn array(token: &str) -> Vec<String> {
    token
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
