//! Values that can be interpolated into a template

use std::borrow::Cow;

/// A typed value interleaved between template fragments
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Presence-style attribute toggle
    Bool(bool),
    /// Name of a handler method, embedded in an `@event=` binding
    Handler(&'static str),
    /// Plain text, including the output of nested templates
    Text(String),
    /// Numeric value, rendered without a trailing `.0` when integral
    Number(f64),
    /// Renders as empty text
    None,
}

impl Value {
    /// Text form of the value, as used outside of boolean/handler positions
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Bool(value) => Cow::Owned(value.to_string()),
            Value::Handler(name) => Cow::Borrowed(name),
            Value::Text(text) => Cow::Borrowed(text),
            Value::Number(number) => Cow::Owned(format_number(*number)),
            Value::None => Cow::Borrowed(""),
        }
    }
}

/// Format a number the way markup expects it: `12`, `-76`, `1.5`
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
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

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(value: Cow<'_, str>) -> Self {
        Value::Text(value.into_owned())
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&f64> for Value {
    fn from(value: &f64) -> Self {
        Value::Number(*value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(f64::from(value))
    }
}

macro_rules! integer_values {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Text(value.to_string())
                }
            }

            impl From<&$ty> for Value {
                fn from(value: &$ty) -> Self {
                    Value::Text(value.to_string())
                }
            }
        )*
    };
}

integer_values!(i32, i64, u32, u64, usize);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}
