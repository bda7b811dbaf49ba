//! include 端到端测试

mod common;

use common::Harness;
use hearth_core::{HostError, Value};

#[test]
fn test_include_runs_in_callers_scope() {
    let mut h = Harness::new(&[("lib/a.js", "let answer 42")]);
    h.eval("call include \"lib/a.js\"").unwrap();
    assert_eq!(h.engine.global("answer"), Some(Value::Number(42.0)));
}

#[test]
fn test_later_files_see_earlier_state() {
    let mut h = Harness::new(&[
        ("a.js", "let greeting \"hello\""),
        ("b.js", "let copy $greeting"),
    ]);
    h.eval("call include \"a.js\" \"b.js\"").unwrap();
    assert_eq!(h.engine.global("copy"), Some(Value::from("hello")));
}

#[test]
fn test_stops_at_first_missing_file() {
    let mut h = Harness::new(&[("a.js", "let a 1"), ("c.js", "let c 1")]);
    let err = h
        .eval("call include \"a.js\" \"missing.js\" \"c.js\"")
        .unwrap_err();
    assert_eq!(err.to_string(), "include file not found missing.js");
    assert_eq!(h.engine.global("a"), Some(Value::Number(1.0)));
    assert_eq!(h.engine.global("c"), None);
}

#[test]
fn test_missing_error_lists_candidates() {
    let mut h = Harness::new(&[]);
    match h.eval("call include \"nope.js\"").unwrap_err() {
        HostError::Resolution(err) => assert_eq!(err.tried.len(), 3),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_fallback_prefixes() {
    let mut h = Harness::new(&[
        ("/usr/local/hearth/x.js", "let from \"local\""),
        ("/usr/share/hearth/y.js", "let other \"share\""),
    ]);
    h.eval("call include \"x.js\" \"y.js\"").unwrap();
    assert_eq!(h.engine.global("from"), Some(Value::from("local")));
    assert_eq!(h.engine.global("other"), Some(Value::from("share")));
}

#[test]
fn test_compile_error_propagates_with_origin() {
    let mut h = Harness::new(&[("broken.js", "let ok 1\n!oops")]);
    match h.eval("call include \"broken.js\"").unwrap_err() {
        HostError::Compile(err) => {
            assert_eq!(err.origin, "broken.js");
            assert_eq!(err.line, Some(2));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(h.engine.global("ok"), None);
}

#[test]
fn test_runtime_error_propagates() {
    let mut h = Harness::new(&[("boom.js", "let before 1\nthrow kaboom here\nlet after 1")]);
    let err = h.eval("call include \"boom.js\"").unwrap_err();
    assert_eq!(err, HostError::Runtime("kaboom here".to_string()));
    assert_eq!(h.engine.global("before"), Some(Value::Number(1.0)));
    assert_eq!(h.engine.global("after"), None);
}

#[test]
fn test_nested_include() {
    let mut h = Harness::new(&[
        ("outer.js", "call include \"inner.js\"\nlet outer $inner"),
        ("inner.js", "let inner \"deep\""),
    ]);
    h.eval("call include \"outer.js\"").unwrap();
    assert_eq!(h.engine.global("outer"), Some(Value::from("deep")));
}

#[test]
fn test_include_returns_undefined() {
    let mut h = Harness::new(&[("a.js", "return 5")]);
    h.eval("set result include \"a.js\"").unwrap();
    assert_eq!(h.engine.global("result"), Some(Value::Undefined));
}

#[test]
fn test_include_rejects_non_string() {
    let mut h = Harness::new(&[]);
    let err = h.eval("call include 12").unwrap_err();
    assert!(matches!(err, HostError::Type(_)));
}

#[test]
fn test_include_with_no_arguments_is_noop() {
    let mut h = Harness::new(&[]);
    h.eval("call include").unwrap();
    assert_eq!(h.engine.compile_count(), 0);
}
