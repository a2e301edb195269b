//! Single-thread ownership of contexts and values
//!
//! The `!Send`/`!Sync` compile checks live in the crate docs.

use jsbridge_core::QjsContext;

#[test]
fn values_keep_context_alive_on_one_thread() {
    let value = {
        let ctx = QjsContext::new().unwrap();
        ctx.eval("({ answer: 42 })").unwrap()
    };
    assert_eq!(value.get("answer").unwrap().as_int(), Some(42));
}

#[test]
fn cloned_contexts_share_one_global_scope() {
    let ctx = QjsContext::new().unwrap();
    let clone = ctx.clone();
    assert!(ctx.same_context(&clone));

    ctx.eval("var shared = 7;").unwrap();
    drop(ctx);
    assert_eq!(clone.eval("shared * 6").unwrap().as_int(), Some(42));
}
