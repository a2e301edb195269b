//! Memory usage snapshot for a QuickJS runtime.

use rquickjs_sys::JSMemoryUsage;
use serde::Serialize;

/// Allocation counters reported by `JS_ComputeMemoryUsage`
///
/// A `malloc_limit` of `0` means the runtime has no memory limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    pub malloc_size: i64,
    pub malloc_limit: i64,
    pub memory_used_size: i64,
    pub malloc_count: i64,
    pub atom_count: i64,
    pub str_count: i64,
    pub obj_count: i64,
    pub prop_count: i64,
    pub js_func_count: i64,
    pub array_count: i64,
}

impl From<JSMemoryUsage> for MemoryUsage {
    fn from(raw: JSMemoryUsage) -> Self {
        Self {
            malloc_size: raw.malloc_size,
            malloc_limit: raw.malloc_limit,
            memory_used_size: raw.memory_used_size,
            malloc_count: raw.malloc_count,
            atom_count: raw.atom_count,
            str_count: raw.str_count,
            obj_count: raw.obj_count,
            prop_count: raw.prop_count,
            js_func_count: raw.js_func_count,
            array_count: raw.array_count,
        }
    }
}
