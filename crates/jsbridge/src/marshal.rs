//! Conversion between engine values and host [`Value`]s
//!
//! Primitives are copied across. Objects never are: they travel as
//! [`Object`] handles that share the engine's reference count.

use jsbridge_core::{QjsContext, QjsError, QjsValue, ValueKind};

use crate::error::Result;
use crate::object::Object;
use crate::value::Value;

/// Convert an engine value into a host value, taking ownership of it
///
/// `undefined` and `null` both become [`Value::Null`]. Symbols, BigInts and
/// engine-internal tags have no host form and fail with `Unsupported`.
pub fn to_host(value: QjsValue) -> Result<Value> {
    let kind = value.kind();
    let converted = match kind {
        ValueKind::Undefined | ValueKind::Null => Some(Value::Null),
        ValueKind::Bool => value.as_bool().map(Value::Bool),
        ValueKind::Int => value.as_int().map(Value::Int),
        ValueKind::Float => value.as_float().map(Value::Float),
        ValueKind::String => Some(Value::String(value.to_string()?)),
        ValueKind::Object => Some(Value::Object(Object::from_raw(value))),
        _ => None,
    };

    converted.ok_or_else(|| QjsError::unsupported(kind.type_name()).into())
}

/// Convert a host value into an engine value of `ctx`
///
/// `Float` keeps the float64 tag even for integral values. Objects are
/// shared by taking one more reference, and must belong to `ctx`.
pub fn to_interpreter(ctx: &QjsContext, value: &Value) -> Result<QjsValue> {
    Ok(match value {
        Value::Null => ctx.null(),
        Value::Bool(b) => ctx.boolean(*b),
        Value::Int(n) => ctx.int(*n),
        Value::Float(n) => ctx.float(*n),
        Value::String(s) => ctx.string(s)?,
        Value::Object(obj) => {
            if !obj.context().same_context(ctx) {
                return Err(QjsError::ForeignValue.into());
            }
            obj.raw().clone()
        }
    })
}

/// Convert every argument, stopping at the first failure
pub fn to_interpreter_all(ctx: &QjsContext, values: &[Value]) -> Result<Vec<QjsValue>> {
    values
        .iter()
        .map(|value| to_interpreter(ctx, value))
        .collect()
}
