//! Translation of pending interpreter exceptions into [`QjsError`]

use rquickjs_sys::*;
use std::ffi::CStr;
use tracing::{debug, warn};

use crate::context::QjsContext;
use crate::error::QjsError;
use crate::string::QjsCString;
use crate::value::{QjsValue, ValueKind};

/// Message used when the thrown value cannot be converted to a string
pub const UNRENDERABLE_EXCEPTION: &str = "<exception could not be converted to string>";

/// Take the pending exception and convert it into an owned error
///
/// Call only after an engine operation reported failure. The pending
/// exception is always cleared, including any secondary exception raised
/// while rendering it, and no engine reference survives in the result.
pub fn take_exception(ctx: &QjsContext) -> QjsError {
    // SAFETY: JS_GetException moves the pending exception out, leaving
    // JS_UNINITIALIZED behind; we adopt the returned reference
    let exception = unsafe { QjsValue::from_owned(ctx, JS_GetException(ctx.raw())) };

    if exception.kind() == ValueKind::Uninitialized {
        return QjsError::internal("no pending exception");
    }

    let message = match QjsCString::from_value(&exception) {
        Some(rendered) => rendered.to_string_lossy().into_owned(),
        None => {
            discard_pending(ctx);
            warn!(
                kind = %exception.kind(),
                "Thrown value could not be converted to string"
            );
            UNRENDERABLE_EXCEPTION.to_string()
        }
    };

    let (error_type, stack) = if exception.is_object() {
        (
            property_string(&exception, c"name"),
            property_string(&exception, c"stack").map(|s| s.trim_end().to_string()),
        )
    } else {
        (None, None)
    };

    debug!(message = %message, error_type = ?error_type, "Translated script exception");
    QjsError::script_error_with_details(message, error_type, stack)
}

/// Drop whatever exception is pending without translating it
fn discard_pending(ctx: &QjsContext) {
    // SAFETY: adopting and immediately releasing the pending exception
    drop(unsafe { QjsValue::from_owned(ctx, JS_GetException(ctx.raw())) });
}

/// Read a property as a string, swallowing getter and conversion errors
fn property_string(object: &QjsValue, name: &CStr) -> Option<String> {
    let ctx = object.context();
    // SAFETY: ctx and object are valid; the result is a new reference
    let raw = unsafe { JS_GetPropertyStr(ctx.raw(), object.raw(), name.as_ptr()) };
    // SAFETY: inspecting the tag only
    if unsafe { JS_IsException(raw) } {
        discard_pending(ctx);
        return None;
    }

    // SAFETY: raw is a non-exception value we own
    let value = unsafe { QjsValue::from_owned(ctx, raw) };
    if value.is_undefined() || value.is_null() {
        return None;
    }

    match QjsCString::from_value(&value) {
        Some(rendered) => Some(rendered.to_string_lossy().into_owned()),
        None => {
            discard_pending(ctx);
            None
        }
    }
}
