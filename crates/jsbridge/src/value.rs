//! Host-side representation of JavaScript values

use crate::error::{Error, Result};
use crate::function::Function;
use crate::object::Object;

/// A value exchanged with the interpreter
///
/// `undefined` and `null` both arrive as [`Value::Null`]. Numbers keep the
/// engine's int/float tag. Every non-primitive is an [`Object`] handle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Float(f64),
    String(String),
    Object(Object),
}

impl Value {
    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value of either number variant
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(f64::from(*n)),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<Object> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Callable view of this value, if it wraps a function
    pub fn into_function(self) -> Option<Function> {
        self.into_object()?.into_function().ok()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Self::Object(obj)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Self::Object(func.into_object())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

fn conversion_error(expected: &'static str, value: &Value) -> Error {
    Error::Conversion {
        expected,
        actual: value.type_name(),
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| conversion_error("boolean", &value))
    }
}

impl TryFrom<Value> for i32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.as_i32().ok_or_else(|| conversion_error("int", &value))
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| conversion_error("number", &value))
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(conversion_error("string", &other)),
        }
    }
}

impl TryFrom<Value> for Object {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(obj) => Ok(obj),
            other => Err(conversion_error("object", &other)),
        }
    }
}

impl TryFrom<Value> for Function {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(obj) => obj.into_function().map_err(|_| Error::Conversion {
                expected: "function",
                actual: "object",
            }),
            other => Err(conversion_error("function", &other)),
        }
    }
}

/// Conversion of host data into a [`Value`] the interpreter can receive
///
/// Only primitives and existing handles cross the bridge. Host composites
/// (JSON arrays and objects) are rejected with `Unsupported type` instead of
/// being converted structurally.
pub trait IntoValue {
    fn into_value(self) -> Result<Value>;
}

impl IntoValue for Value {
    fn into_value(self) -> Result<Value> {
        Ok(self)
    }
}

impl IntoValue for &Value {
    fn into_value(self) -> Result<Value> {
        Ok(self.clone())
    }
}

impl IntoValue for Object {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Object(self))
    }
}

impl IntoValue for &Object {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Object(self.clone()))
    }
}

impl IntoValue for Function {
    fn into_value(self) -> Result<Value> {
        Ok(Value::from(self))
    }
}

impl IntoValue for &Function {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Object(self.as_object().clone()))
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Bool(self))
    }
}

/// Integers that fit in `i32` keep the int tag; larger ones become floats
macro_rules! impl_into_value_for_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Result<Value> {
                    Ok(match i32::try_from(self) {
                        Ok(n) => Value::Int(n),
                        Err(_) => Value::Float(self as f64),
                    })
                }
            }
        )*
    };
}

impl_into_value_for_int!(i64, isize, u32, u64, usize);

impl IntoValue for i32 {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Int(self))
    }
}

macro_rules! impl_into_value_for_small_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Result<Value> {
                    Ok(Value::Int(i32::from(self)))
                }
            }
        )*
    };
}

impl_into_value_for_small_int!(i8, i16, u8, u16);

impl IntoValue for f32 {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Float(f64::from(self)))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Float(self))
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Result<Value> {
        Ok(Value::String(self.to_string()))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Result<Value> {
        Ok(Value::String(self))
    }
}

impl IntoValue for &String {
    fn into_value(self) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }
}

impl IntoValue for char {
    fn into_value(self) -> Result<Value> {
        Ok(Value::String(self.to_string()))
    }
}

impl IntoValue for () {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Null)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Result<Value> {
        match self {
            Some(value) => value.into_value(),
            None => Ok(Value::Null),
        }
    }
}

impl IntoValue for serde_json::Value {
    fn into_value(self) -> Result<Value> {
        (&self).into_value()
    }
}

impl IntoValue for &serde_json::Value {
    fn into_value(self) -> Result<Value> {
        use serde_json::Value as Json;

        match self {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => i.into_value(),
                (None, Some(f)) => Ok(Value::Float(f)),
                (None, None) => Err(Error::unsupported("JSON number")),
            },
            Json::String(s) => Ok(Value::String(s.clone())),
            Json::Array(_) => Err(Error::unsupported("JSON array")),
            Json::Object(_) => Err(Error::unsupported("JSON object")),
        }
    }
}
