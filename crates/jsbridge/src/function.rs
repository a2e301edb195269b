//! Calling JavaScript functions from Rust

use std::fmt;
use std::ops::Deref;
use tracing::{debug, trace};

use crate::error::Result;
use crate::marshal;
use crate::object::Object;
use crate::value::{IntoValue, Value};

/// An [`Object`] known to be callable
///
/// Obtained through [`Object::as_function`], [`Object::into_function`] or
/// [`Value::into_function`]. Dereferences to the underlying object.
///
/// # Example
///
/// ```
/// use jsbridge::Context;
///
/// let ctx = Context::new().unwrap();
/// let add = ctx.eval("(a, b) => a + b").unwrap().into_function().unwrap();
/// assert_eq!(add.call([2, 40]).unwrap().as_i32(), Some(42));
/// ```
#[derive(Clone, PartialEq)]
pub struct Function {
    object: Object,
}

impl Function {
    pub(crate) fn from_object(object: Object) -> Self {
        Self { object }
    }

    /// Borrow the underlying object
    pub fn as_object(&self) -> &Object {
        &self.object
    }

    /// Convert back into the underlying object
    pub fn into_object(self) -> Object {
        self.object
    }

    /// Call with any host values that convert into [`Value`]
    ///
    /// Every argument is converted before the interpreter is entered, so an
    /// unsupported argument leaves no side effects behind.
    pub fn call<I>(&self, args: I) -> Result<Value>
    where
        I: IntoIterator,
        I::Item: IntoValue,
    {
        let args = args
            .into_iter()
            .map(IntoValue::into_value)
            .collect::<Result<Vec<_>>>()?;
        self.invoke(&args)
    }

    /// Call with already converted arguments
    ///
    /// `this` is the context's global object.
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        let ctx = self.object.context();
        let raw_args = marshal::to_interpreter_all(ctx, args)?;
        let this = ctx.global_object();

        trace!(argc = args.len(), "Calling function");
        let result = self
            .object
            .raw()
            .call(&this, &raw_args)
            .inspect_err(|e| debug!(error = %e, "Function call failed"))?;

        marshal::to_host(result)
    }
}

impl Deref for Function {
    type Target = Object;

    fn deref(&self) -> &Object {
        &self.object
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}
