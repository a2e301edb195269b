//! Host handle to an interpreter-owned object

use jsbridge_core::{QjsContext, QjsError, QjsValue};
use serde::de::DeserializeOwned;
use std::fmt;

use crate::error::{Error, Result};
use crate::function::Function;
use crate::marshal;
use crate::value::{IntoValue, Value};

/// A JavaScript object (plain object, array, function, error, ...)
///
/// Holds one reference to the object for as long as the handle lives.
/// Cloning takes another reference; equality is object identity.
///
/// Handles keep their context alive and stay usable after the
/// [`Context`](crate::Context) that produced them is dropped.
#[derive(Clone)]
pub struct Object {
    value: QjsValue,
}

impl Object {
    /// Wrap an object value; callers guarantee the value is an object
    pub(crate) fn from_raw(value: QjsValue) -> Self {
        debug_assert!(value.is_object());
        Self { value }
    }

    /// Underlying engine value
    pub fn raw(&self) -> &QjsValue {
        &self.value
    }

    /// Context this object belongs to
    pub fn context(&self) -> &QjsContext {
        self.value.context()
    }

    /// Serialize with the engine's `JSON.stringify`
    ///
    /// Cyclic structures fail with the engine's `TypeError`. Values that
    /// have no JSON form (functions) fail with `NotSerializable`.
    pub fn json(&self) -> Result<String> {
        self.value.to_json()?.ok_or_else(|| {
            QjsError::NotSerializable {
                type_name: self.type_name().to_string(),
            }
            .into()
        })
    }

    /// Deserialize the object's JSON form into a Rust type
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.json()?)?)
    }

    /// Check if the object can be called
    pub fn is_function(&self) -> bool {
        self.value.is_function()
    }

    pub fn is_array(&self) -> bool {
        self.value.is_array()
    }

    pub fn is_error(&self) -> bool {
        self.value.is_error()
    }

    /// Callable view sharing this object, if it is a function
    pub fn as_function(&self) -> Option<Function> {
        self.is_function()
            .then(|| Function::from_object(self.clone()))
    }

    /// Convert into a callable view, handing the object back if it is not one
    pub fn into_function(self) -> std::result::Result<Function, Object> {
        if self.is_function() {
            Ok(Function::from_object(self))
        } else {
            Err(self)
        }
    }

    /// Read a property
    pub fn get(&self, key: &str) -> Result<Value> {
        marshal::to_host(self.value.get(key)?)
    }

    /// Write a property
    pub fn set(&self, key: &str, value: impl IntoValue) -> Result<()> {
        let value = marshal::to_interpreter(self.context(), &value.into_value()?)?;
        self.value.set(key, &value)?;
        Ok(())
    }

    /// Value of the `length` property for arrays and array-likes
    pub fn len(&self) -> Result<usize> {
        let length = self.value.get("length")?;
        let n = length.to_number()?;
        if n.is_finite() && n >= 0.0 {
            Ok(n as usize)
        } else {
            Err(Error::Conversion {
                expected: "length",
                actual: length.kind().type_name(),
            })
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Short description of the object's category
    pub fn type_name(&self) -> &'static str {
        if self.is_function() {
            "function"
        } else if self.is_array() {
            "array"
        } else if self.is_error() {
            "error"
        } else {
            "object"
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.value.same_object(&other.value)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", self.type_name())
    }
}
