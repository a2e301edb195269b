//! RAII wrapper for C strings produced by QuickJS

use rquickjs_sys::*;
use std::borrow::Cow;
use std::fmt;

use crate::error::QjsResult;
use crate::exception::take_exception;
use crate::value::QjsValue;

/// UTF-8 rendering of a value, released with `JS_FreeCString` on drop
///
/// Borrows the source value so its context stays alive while the buffer
/// is in use.
pub struct QjsCString<'a> {
    ptr: *const std::ffi::c_char,
    len: usize,
    value: &'a QjsValue,
}

impl<'a> QjsCString<'a> {
    /// Convert a value with JavaScript `ToString`
    ///
    /// Returns `None` when the conversion threw; the exception is left
    /// pending for the caller to take.
    pub fn from_value(value: &'a QjsValue) -> Option<Self> {
        let mut len = 0usize;
        // SAFETY: ctx and value are valid; len receives the byte length
        let ptr = unsafe { JS_ToCStringLen(value.context().raw(), &mut len, value.raw()) };
        if ptr.is_null() {
            return None;
        }
        Some(Self { ptr, len, value })
    }

    /// Raw bytes without the trailing NUL
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: QuickJS guarantees ptr points to len initialized bytes
        unsafe { std::slice::from_raw_parts(self.ptr.cast::<u8>(), self.len) }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Decode as UTF-8, replacing invalid sequences (lone surrogates)
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl Drop for QjsCString<'_> {
    fn drop(&mut self) {
        // SAFETY: ptr came from JS_ToCStringLen on this context
        unsafe { JS_FreeCString(self.value.context().raw(), self.ptr) }
    }
}

impl fmt::Display for QjsCString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// Convert a value to an owned Rust `String` with JavaScript `ToString`
pub fn js_string_to_rust(value: &QjsValue) -> QjsResult<String> {
    match QjsCString::from_value(value) {
        Some(s) => Ok(s.to_string_lossy().into_owned()),
        None => Err(take_exception(value.context())),
    }
}
