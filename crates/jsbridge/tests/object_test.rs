//! Integration tests for object handles and function calls

use jsbridge::{Context, Function, Object, Value};
use serde_json::json;

fn function(ctx: &Context, source: &str) -> Function {
    ctx.eval(source).unwrap().into_function().unwrap()
}

#[test]
fn test_function_is_object() {
    let ctx = Context::new().unwrap();
    let value = ctx
        .eval(
            r#"
            a = function(x) {
                return 40 + x;
            }
            "#,
        )
        .unwrap();

    let obj: Object = value.try_into().unwrap();
    assert!(obj.is_function());
}

#[test]
fn test_function_call_int() {
    let ctx = Context::new().unwrap();
    let f = function(&ctx, "f = function(x) { return 40 + x; }");
    assert_eq!(f.call([2]).unwrap(), Value::Int(42));
}

#[test]
fn test_function_call_int_two_args() {
    let ctx = Context::new().unwrap();
    let f = function(&ctx, "f = function(x, y) { return 40 + x + y; }");
    assert_eq!(f.call([3, -1]).unwrap(), Value::Int(42));
}

#[test]
fn test_function_call_str() {
    let ctx = Context::new().unwrap();
    let f = function(&ctx, r#"f = function(a) { return a + " hej"; }"#);
    assert_eq!(f.call(["1"]).unwrap(), Value::from("1 hej"));
}

#[test]
fn test_function_call_str_three_args() {
    let ctx = Context::new().unwrap();
    let f = function(
        &ctx,
        r#"f = function(a, b, c) { return a + " hej " + b + " ho " + c; }"#,
    );
    assert_eq!(f.call(["1", "2", "3"]).unwrap(), Value::from("1 hej 2 ho 3"));
}

#[test]
fn test_function_call_object() {
    let ctx = Context::new().unwrap();
    let d = ctx.eval("d = {data: 42};").unwrap().into_object().unwrap();
    let f = function(&ctx, "f = function(d) { return d.data; }");

    // repeated calls share the same reference without consuming it
    assert_eq!(f.call([&d]).unwrap(), Value::Int(42));
    assert_eq!(f.call([&d]).unwrap(), Value::Int(42));
    assert_eq!(f.call([&d]).unwrap(), Value::Int(42));
    assert_eq!(d.get("data").unwrap(), Value::Int(42));
}

#[test]
fn test_function_call_unsupported_arg() {
    let ctx = Context::new().unwrap();
    ctx.eval("var calls = 0;").unwrap();
    let f = function(&ctx, "f = function(x) { calls += 1; return 40 + x; }");

    let err = f.call([json!(1), json!({})]).unwrap_err();
    assert!(err.is_unsupported());
    assert!(err.to_string().contains("Unsupported type"));

    // no partial call happened
    assert_eq!(ctx.get("calls").unwrap(), Value::Int(0));

    assert_eq!(f.call([json!(2)]).unwrap(), Value::Int(42));
    assert_eq!(ctx.get("calls").unwrap(), Value::Int(1));
}

#[test]
fn test_json() {
    let ctx = Context::new().unwrap();
    let d = ctx.eval("d = {data: 42};").unwrap().into_object().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&d.json().unwrap()).unwrap();
    assert_eq!(parsed, json!({"data": 42}));
}

#[test]
fn test_json_cycle_is_script_error() {
    let ctx = Context::new().unwrap();
    let obj = ctx
        .eval("const o = {}; o.self = o; o")
        .unwrap()
        .into_object()
        .unwrap();

    let err = obj.json().unwrap_err();
    assert!(err.is_script_error());
    assert!(err.to_string().contains("circular reference"));

    assert_eq!(ctx.eval("1").unwrap(), Value::Int(1));
}

#[test]
fn test_handles_outlive_context() {
    let (obj, f) = {
        let ctx = Context::new().unwrap();
        let obj = ctx.eval("({ data: 42 })").unwrap().into_object().unwrap();
        let f = function(&ctx, "(o => o.data + 1)");
        (obj, f)
    };

    assert_eq!(obj.json().unwrap(), r#"{"data":42}"#);
    assert_eq!(f.call([&obj]).unwrap(), Value::Int(43));
}

#[test]
fn test_foreign_handle_rejected() {
    let first = Context::new().unwrap();
    let second = Context::new().unwrap();

    let obj = first.eval("({ data: 1 })").unwrap().into_object().unwrap();
    let f = function(&second, "(o => o.data)");

    let err = f.call([&obj]).unwrap_err();
    assert_eq!(err.error_type(), "ForeignValueError");

    let err = second.set("stolen", &obj).unwrap_err();
    assert_eq!(err.error_type(), "ForeignValueError");
}

#[test]
fn test_primitive_round_trip_keeps_subtype() {
    let ctx = Context::new().unwrap();
    let identity = function(&ctx, "(x => x)");

    for value in [
        Value::Null,
        Value::Bool(false),
        Value::Int(-5),
        Value::Float(42.0),
        Value::Float(0.5),
        Value::from("text"),
    ] {
        assert_eq!(identity.invoke(&[value.clone()]).unwrap(), value);
    }
}

#[test]
fn test_object_round_trip_keeps_identity() {
    let ctx = Context::new().unwrap();
    let identity = function(&ctx, "(x => x)");
    let obj = ctx.eval("({})").unwrap().into_object().unwrap();

    let back = identity.call([&obj]).unwrap().into_object().unwrap();
    assert_eq!(back, obj);
}

#[test]
fn test_many_handles_are_released() {
    let ctx = Context::new().unwrap();
    drop(ctx.eval("({ payload: [1, 2, 3] })").unwrap());
    ctx.gc();
    let baseline = ctx.memory_usage().obj_count;

    for _ in 0..100 {
        let obj = ctx.eval("({ payload: [1, 2, 3] })").unwrap();
        drop(obj);
    }
    ctx.gc();

    assert_eq!(ctx.memory_usage().obj_count, baseline);
}

#[test]
fn test_returned_function_can_be_called() {
    let ctx = Context::new().unwrap();
    let make_adder = function(&ctx, "(n => (x => x + n))");
    let add_two = make_adder.call([2]).unwrap().into_function().unwrap();
    assert_eq!(add_two.call([40]).unwrap(), Value::Int(42));
}
