//! Owned QuickJS values with reference counting

use rquickjs_sys::*;
use std::ffi::{CString, c_int};
use std::fmt;

use crate::context::QjsContext;
use crate::error::{QjsError, QjsResult};
use crate::exception::take_exception;
use crate::string::js_string_to_rust;

/// Category of a value as reported by its engine tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Bool,
    Int,
    Float,
    String,
    Symbol,
    BigInt,
    Object,
    Exception,
    Uninitialized,
    Other,
}

impl ValueKind {
    fn from_tag(tag: i32) -> Self {
        match tag {
            JS_TAG_UNDEFINED => Self::Undefined,
            JS_TAG_NULL => Self::Null,
            JS_TAG_BOOL => Self::Bool,
            JS_TAG_INT => Self::Int,
            JS_TAG_FLOAT64 => Self::Float,
            JS_TAG_STRING => Self::String,
            JS_TAG_SYMBOL => Self::Symbol,
            JS_TAG_BIG_INT | JS_TAG_SHORT_BIG_INT => Self::BigInt,
            JS_TAG_OBJECT => Self::Object,
            JS_TAG_EXCEPTION => Self::Exception,
            JS_TAG_UNINITIALIZED => Self::Uninitialized,
            _ => Self::Other,
        }
    }

    /// Name used in error messages
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::BigInt => "bigint",
            Self::Object => "object",
            Self::Exception => "exception",
            Self::Uninitialized => "uninitialized",
            Self::Other => "internal",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A JavaScript value holding exactly one reference count
///
/// Cloning duplicates the reference (`JS_DupValue`), dropping releases it
/// (`JS_FreeValue`). Every value keeps its context alive.
///
/// # Thread Safety
///
/// This type is `!Send` and `!Sync` because QuickJS values are tied to their
/// runtime. Cross-thread access causes undefined behavior.
pub struct QjsValue {
    value: JSValue,
    ctx: QjsContext,
}

impl QjsValue {
    /// Adopt a reference returned by the engine without incrementing it
    ///
    /// # Safety
    /// `value` must be a valid value of `ctx` whose reference the caller owns
    /// and hands over to the new `QjsValue`.
    pub unsafe fn from_owned(ctx: &QjsContext, value: JSValue) -> Self {
        Self {
            value,
            ctx: ctx.clone(),
        }
    }

    /// Take a new reference to a value owned elsewhere
    ///
    /// # Safety
    /// `value` must be a valid value of `ctx`.
    pub unsafe fn from_borrowed(ctx: &QjsContext, value: JSValue) -> Self {
        // SAFETY: value is valid per caller contract
        unsafe { Self::from_owned(ctx, JS_DupValue(ctx.raw(), value)) }
    }

    /// Adopt an engine result, translating `JS_EXCEPTION` into an error
    ///
    /// # Safety
    /// Same contract as [`QjsValue::from_owned`].
    pub unsafe fn from_result(ctx: &QjsContext, value: JSValue) -> QjsResult<Self> {
        // SAFETY: value is valid per caller contract
        unsafe {
            if JS_IsException(value) {
                Err(take_exception(ctx))
            } else {
                Ok(Self::from_owned(ctx, value))
            }
        }
    }

    /// Get the raw value (still owned by `self`)
    pub fn raw(&self) -> JSValue {
        self.value
    }

    /// Get the owning context
    pub fn context(&self) -> &QjsContext {
        &self.ctx
    }

    /// Category of this value
    pub fn kind(&self) -> ValueKind {
        // SAFETY: reading the tag of an owned value
        ValueKind::from_tag(unsafe { JS_VALUE_GET_NORM_TAG(self.value) })
    }

    pub fn is_undefined(&self) -> bool {
        self.kind() == ValueKind::Undefined
    }

    pub fn is_null(&self) -> bool {
        self.kind() == ValueKind::Null
    }

    pub fn is_bool(&self) -> bool {
        self.kind() == ValueKind::Bool
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind(), ValueKind::Int | ValueKind::Float)
    }

    pub fn is_string(&self) -> bool {
        self.kind() == ValueKind::String
    }

    pub fn is_object(&self) -> bool {
        self.kind() == ValueKind::Object
    }

    /// Check if the value can be called
    pub fn is_function(&self) -> bool {
        // SAFETY: ctx and value are valid
        unsafe { JS_IsFunction(self.ctx.raw(), self.value) }
    }

    /// Check if the value is an Array
    pub fn is_array(&self) -> bool {
        // SAFETY: value is valid
        unsafe { JS_IsArray(self.value) }
    }

    /// Check if the value is an Error instance
    pub fn is_error(&self) -> bool {
        // SAFETY: value is valid
        unsafe { JS_IsError(self.value) }
    }

    /// Boolean payload, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        // SAFETY: tag checked before reading the payload
        self.is_bool()
            .then(|| unsafe { JS_VALUE_GET_BOOL(self.value) })
    }

    /// Int payload, if this value carries the int tag
    pub fn as_int(&self) -> Option<i32> {
        // SAFETY: tag checked before reading the payload
        (self.kind() == ValueKind::Int).then(|| unsafe { JS_VALUE_GET_INT(self.value) })
    }

    /// Float payload, if this value carries the float64 tag
    pub fn as_float(&self) -> Option<f64> {
        // SAFETY: tag checked before reading the payload
        (self.kind() == ValueKind::Float).then(|| unsafe { JS_VALUE_GET_FLOAT64(self.value) })
    }

    /// Convert to number using JavaScript semantics
    pub fn to_number(&self) -> QjsResult<f64> {
        let mut result = 0.0;
        // SAFETY: ctx and value are valid
        let status = unsafe { JS_ToFloat64(self.ctx.raw(), &mut result, self.value) };
        if status < 0 {
            return Err(take_exception(&self.ctx));
        }
        Ok(result)
    }

    /// Convert to string using JavaScript semantics
    pub fn to_string(&self) -> QjsResult<String> {
        js_string_to_rust(self)
    }

    /// Serialize with `JSON.stringify`
    ///
    /// Returns `Ok(None)` when the value has no JSON form (functions,
    /// symbols, undefined).
    pub fn to_json(&self) -> QjsResult<Option<String>> {
        // SAFETY: ctx and value are valid; the result is a new reference
        let json = unsafe {
            let raw = JS_JSONStringify(self.ctx.raw(), self.value, JS_UNDEFINED, JS_UNDEFINED);
            Self::from_result(&self.ctx, raw)?
        };

        if json.is_undefined() {
            return Ok(None);
        }
        json.to_string().map(Some)
    }

    /// Deserialize from JSON to Rust type
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> QjsResult<T> {
        let json = self.to_json()?.ok_or_else(|| QjsError::NotSerializable {
            type_name: self.kind().type_name().to_string(),
        })?;
        serde_json::from_str(&json).map_err(QjsError::JsonError)
    }

    /// Read a named property
    pub fn get(&self, name: &str) -> QjsResult<QjsValue> {
        let name_cstr = property_name(name)?;
        // SAFETY: ctx and value are valid; JS_GetPropertyStr returns a new reference
        unsafe {
            let raw = JS_GetPropertyStr(self.ctx.raw(), self.value, name_cstr.as_ptr());
            Self::from_result(&self.ctx, raw)
        }
    }

    /// Write a named property
    pub fn set(&self, name: &str, value: &QjsValue) -> QjsResult<()> {
        self.check_same_context(value)?;
        let name_cstr = property_name(name)?;
        // SAFETY: JS_SetPropertyStr consumes one reference, so hand it a dup
        let status = unsafe {
            let val = JS_DupValue(self.ctx.raw(), value.value);
            JS_SetPropertyStr(self.ctx.raw(), self.value, name_cstr.as_ptr(), val)
        };
        if status < 0 {
            return Err(take_exception(&self.ctx));
        }
        Ok(())
    }

    /// Call this value as a function
    ///
    /// Arguments are borrowed for the duration of the call.
    pub fn call(&self, this: &QjsValue, args: &[QjsValue]) -> QjsResult<QjsValue> {
        self.check_same_context(this)?;
        for arg in args {
            self.check_same_context(arg)?;
        }

        let argc = c_int::try_from(args.len())
            .map_err(|_| QjsError::internal(format!("Too many arguments: {}", args.len())))?;
        let mut argv: Vec<JSValue> = args.iter().map(|arg| arg.value).collect();

        // SAFETY: all values belong to ctx and stay alive for the call;
        // JS_Call does not take ownership of this or argv
        unsafe {
            let raw = JS_Call(
                self.ctx.raw(),
                self.value,
                this.value,
                argc,
                argv.as_mut_ptr(),
            );
            Self::from_result(&self.ctx, raw)
        }
    }

    /// Check whether both values are the same heap object
    pub fn same_object(&self, other: &QjsValue) -> bool {
        self.is_object()
            && other.is_object()
            // SAFETY: both tags are object, so the payload is a pointer
            && unsafe { JS_VALUE_GET_PTR(self.value) == JS_VALUE_GET_PTR(other.value) }
    }

    fn check_same_context(&self, other: &QjsValue) -> QjsResult<()> {
        if self.ctx.same_context(&other.ctx) {
            Ok(())
        } else {
            Err(QjsError::ForeignValue)
        }
    }
}

fn property_name(name: &str) -> QjsResult<CString> {
    CString::new(name).map_err(|_| QjsError::InvalidName(name.to_string()))
}

impl Clone for QjsValue {
    fn clone(&self) -> Self {
        // SAFETY: self.value is a live value of self.ctx
        unsafe { Self::from_borrowed(&self.ctx, self.value) }
    }
}

impl Drop for QjsValue {
    fn drop(&mut self) {
        // SAFETY: self owns one reference; ctx outlives this call because
        // the Rc in self.ctx is dropped after this body
        unsafe { JS_FreeValue(self.ctx.raw(), self.value) }
    }
}

impl fmt::Debug for QjsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ValueKind::Int => write!(f, "QjsValue(int {})", self.as_int().unwrap_or_default()),
            ValueKind::Float => {
                write!(f, "QjsValue(float {})", self.as_float().unwrap_or_default())
            }
            ValueKind::Bool => {
                write!(f, "QjsValue(boolean {})", self.as_bool().unwrap_or_default())
            }
            kind => write!(f, "QjsValue({kind})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_kinds() {
        let ctx = QjsContext::new().unwrap();
        assert_eq!(ctx.eval("undefined").unwrap().kind(), ValueKind::Undefined);
        assert_eq!(ctx.eval("null").unwrap().kind(), ValueKind::Null);
        assert_eq!(ctx.eval("true").unwrap().kind(), ValueKind::Bool);
        assert_eq!(ctx.eval("1").unwrap().kind(), ValueKind::Int);
        assert_eq!(ctx.eval("1.5").unwrap().kind(), ValueKind::Float);
        assert_eq!(ctx.eval("'s'").unwrap().kind(), ValueKind::String);
        assert_eq!(ctx.eval("Symbol('s')").unwrap().kind(), ValueKind::Symbol);
        assert_eq!(ctx.eval("10n").unwrap().kind(), ValueKind::BigInt);
        assert_eq!(ctx.eval("({})").unwrap().kind(), ValueKind::Object);
    }

    #[test]
    fn test_capability_queries() {
        let ctx = QjsContext::new().unwrap();
        let func = ctx.eval("(function () {})").unwrap();
        let array = ctx.eval("[1, 2]").unwrap();
        let error = ctx.eval("new TypeError('x')").unwrap();

        assert!(func.is_function() && !func.is_array());
        assert!(array.is_array() && !array.is_function());
        assert!(error.is_error() && !error.is_array());
    }

    #[test]
    fn test_clone_and_identity() {
        let ctx = QjsContext::new().unwrap();
        let obj = ctx.eval("({ a: 1 })").unwrap();
        let copy = obj.clone();
        assert!(obj.same_object(&copy));

        drop(obj);
        assert_eq!(copy.get("a").unwrap().as_int(), Some(1));

        let other = ctx.eval("({ a: 1 })").unwrap();
        assert!(!copy.same_object(&other));
    }

    #[test]
    fn test_get_set_property() {
        let ctx = QjsContext::new().unwrap();
        let obj = ctx.eval("({})").unwrap();
        obj.set("answer", &ctx.int(42)).unwrap();
        assert_eq!(obj.get("answer").unwrap().as_int(), Some(42));
        assert!(obj.get("missing").unwrap().is_undefined());

        let err = obj.get("bad\0name").unwrap_err();
        assert!(matches!(err, QjsError::InvalidName(_)));
    }

    #[test]
    fn test_set_on_frozen_object_throws() {
        let ctx = QjsContext::new().unwrap();
        let obj = ctx.eval("Object.freeze({ a: 1 })").unwrap();
        let err = obj.set("a", &ctx.int(2)).unwrap_err();
        assert_eq!(err.error_type(), "TypeError");
        assert_eq!(obj.get("a").unwrap().as_int(), Some(1));
    }

    #[test]
    fn test_call() {
        let ctx = QjsContext::new().unwrap();
        let func = ctx.eval("(function (a, b) { return a * b; })").unwrap();
        let result = func
            .call(&ctx.undefined(), &[ctx.int(6), ctx.int(7)])
            .unwrap();
        assert_eq!(result.as_int(), Some(42));
    }

    #[test]
    fn test_call_throws() {
        let ctx = QjsContext::new().unwrap();
        let func = ctx.eval("(function () { throw new RangeError('nope'); })").unwrap();
        let err = func.call(&ctx.undefined(), &[]).unwrap_err();
        assert_eq!(err.to_string(), "RangeError: nope");
        assert_eq!(err.error_type(), "RangeError");

        // pending exception was cleared
        assert_eq!(ctx.eval("1 + 1").unwrap().as_int(), Some(2));
    }

    #[test]
    fn test_call_non_function() {
        let ctx = QjsContext::new().unwrap();
        let obj = ctx.eval("({})").unwrap();
        let err = obj.call(&ctx.undefined(), &[]).unwrap_err();
        assert_eq!(err.error_type(), "TypeError");
    }

    #[test]
    fn test_foreign_values_rejected() {
        let ctx = QjsContext::new().unwrap();
        let other = QjsContext::new().unwrap();
        let func = ctx.eval("(function (x) { return x; })").unwrap();

        let err = func.call(&ctx.undefined(), &[other.int(1)]).unwrap_err();
        assert!(matches!(err, QjsError::ForeignValue));

        let obj = ctx.eval("({})").unwrap();
        let err = obj.set("x", &other.int(1)).unwrap_err();
        assert!(matches!(err, QjsError::ForeignValue));
    }

    #[test]
    fn test_to_number_and_string() {
        let ctx = QjsContext::new().unwrap();
        assert_eq!(ctx.eval("'12.5'").unwrap().to_number().unwrap(), 12.5);
        assert_eq!(ctx.eval("[1, 2]").unwrap().to_string().unwrap(), "1,2");

        let err = ctx.eval("Symbol('s')").unwrap().to_number().unwrap_err();
        assert_eq!(err.error_type(), "TypeError");
    }

    #[test]
    fn test_to_json() {
        let ctx = QjsContext::new().unwrap();
        let obj = ctx.eval("({ data: 42 })").unwrap();
        assert_eq!(obj.to_json().unwrap().as_deref(), Some(r#"{"data":42}"#));

        let func = ctx.eval("(function () {})").unwrap();
        assert_eq!(func.to_json().unwrap(), None);
    }

    #[test]
    fn test_deserialize() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Point {
            x: i32,
            y: i32,
        }

        let ctx = QjsContext::new().unwrap();
        let point: Point = ctx.eval("({ x: 1, y: 2 })").unwrap().deserialize().unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });

        let err = ctx
            .eval("(function () {})")
            .unwrap()
            .deserialize::<Point>()
            .unwrap_err();
        assert!(matches!(err, QjsError::NotSerializable { .. }));
    }

    #[test]
    fn test_debug_output() {
        let ctx = QjsContext::new().unwrap();
        assert_eq!(format!("{:?}", ctx.int(3)), "QjsValue(int 3)");
        assert_eq!(format!("{:?}", ctx.null()), "QjsValue(null)");
    }
}
