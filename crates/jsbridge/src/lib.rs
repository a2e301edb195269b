//! jsbridge - embed the QuickJS interpreter in Rust.
//!
//! This crate evaluates JavaScript inside the host process and moves values
//! across the language boundary without leaking or double-freeing engine
//! references.
//!
//! # Features
//!
//! - **Persistent global scope**: declarations survive between `eval` calls
//! - **Typed values**: `undefined`/`null`, booleans, int and float numbers,
//!   strings and object handles map onto one closed [`Value`] enum
//! - **Object handles**: reference-counted [`Object`]s that can be passed
//!   back into calls, serialized to JSON and deserialized with serde
//! - **Function calls**: [`Function::call`] converts every argument before
//!   entering the engine, so a bad argument never causes a partial call
//! - **Faithful errors**: script exceptions keep the engine's own message,
//!   e.g. `ReferenceError: missing is not defined`
//!
//! # Example
//!
//! ```
//! use jsbridge::{Context, Value};
//!
//! let ctx = Context::new().unwrap();
//! ctx.eval("function special(x) { return x + 40; }").unwrap();
//!
//! assert_eq!(ctx.eval("special(2)").unwrap(), Value::Int(42));
//!
//! let special = ctx.get("special").unwrap().into_function().unwrap();
//! assert_eq!(special.call([2]).unwrap(), Value::Int(42));
//!
//! let err = ctx.eval("missing + 1").unwrap_err();
//! assert_eq!(err.to_string(), "ReferenceError: missing is not defined");
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Context                                   │
//! │  - eval / get / set / parse_json                             │
//! │  - ContextConfig limits, pending jobs, GC                    │
//! └─────────────────────────────────────────────────────────────┘
//!                           ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    marshal                                   │
//! │  QjsValue ──to_host──▶ Value ◀──IntoValue── Rust data        │
//! │  Value ──to_interpreter──▶ QjsValue                          │
//! └─────────────────────────────────────────────────────────────┘
//!                           ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Object / Function                         │
//! │  - one engine reference per handle                           │
//! │  - json(), get/set, call(args)                               │
//! └─────────────────────────────────────────────────────────────┘
//!                           ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    jsbridge-core                             │
//! │  QjsContext (Rc-shared runtime) · QjsValue · take_exception  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod function;
pub mod marshal;
pub mod object;
pub mod value;

pub use config::{ContextBuilder, ContextConfig};
pub use context::Context;
pub use error::{Error, Result};
pub use function::Function;
pub use jsbridge_core::MemoryUsage;
pub use object::Object;
pub use value::{IntoValue, Value};

pub mod prelude {
    pub use crate::config::{ContextBuilder, ContextConfig};
    pub use crate::context::Context;
    pub use crate::error::{Error, Result};
    pub use crate::function::Function;
    pub use crate::object::Object;
    pub use crate::value::{IntoValue, Value};
    pub use jsbridge_core::MemoryUsage;
}
