use serde_json::{json, Value};

use document_merge_functions::generators::{
    generate_document, substitute_nested_paths, substitute_scalars, PlaceholderEngine,
    TemplateEngine,
};

#[test]
fn test_template_without_placeholders_is_unchanged() {
    let template = "Plain text with [brackets] and a lone } brace";
    for data in [json!({}), json!({"name": "Ada"}), json!({"list": [1, 2]})] {
        assert_eq!(generate_document(template, &data), template);
    }
}

#[test]
fn test_scalar_placeholders_replace_every_occurrence() {
    let data = json!({"name": "Ada", "age": 36, "admin": true});
    let template = "{name} is {age}. {name} admin: {admin}. {unknown} stays.";
    assert_eq!(
        generate_document(template, &data),
        "Ada is 36. Ada admin: true. {unknown} stays."
    );
}

#[test]
fn test_composite_values_leave_bare_placeholder() {
    let data = json!({"k": {"a": 1}, "items": [1, 2]});
    assert_eq!(generate_document("{k} and {items}", &data), "{k} and {items}");
}

#[test]
fn test_nested_path_resolves_from_root() {
    let data = json!({"a": {"b": "X"}});
    assert_eq!(generate_document("Value: {foo[a.b]}", &data), "Value: X");
}

#[test]
fn test_missing_intermediate_key_blanks_placeholder() {
    assert_eq!(generate_document("[{x[missing.field]}]", &json!({})), "[]");
    assert_eq!(
        generate_document("[{x[a.b.c]}]", &json!({"a": {"b": null}})),
        "[]"
    );
}

#[test]
fn test_falsy_nested_values_blank_placeholder() {
    let data = json!({"n": {"zero": 0, "empty": "", "off": false}});
    assert_eq!(
        generate_document("<{v[n.zero]}|{v[n.empty]}|{v[n.off]}>", &data),
        "<||>"
    );
}

#[test]
fn test_end_to_end_scenario() {
    let data = json!({"name": "Ada", "list": {"items": "a,b,c"}});
    assert_eq!(
        generate_document("Hello {name}, items: {list[items]}", &data),
        "Hello Ada, items: a,b,c"
    );
}

#[test]
fn test_scalar_pass_runs_before_path_pass() {
    let data = json!({"key": "a.b", "a": {"b": "deep"}});
    let first = substitute_scalars("{x[{key}]}", &data);
    assert_eq!(first, "{x[a.b]}");
    assert_eq!(substitute_nested_paths(&first, &data), "deep");
}

#[test]
fn test_generation_is_idempotent() {
    let engine = PlaceholderEngine::new();
    let data = json!({"name": "Ada", "tags": {"list": ["x", "y"]}});
    let template = b"{name}: {t[tags.list]}";

    let first = engine.generate(template, &data).unwrap();
    let second = engine.generate(template, &data).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, b"Ada: x,y");
}

#[test]
fn test_scalar_values_can_introduce_later_placeholders() {
    let data: Value = serde_json::from_str(r#"{"greeting": "Dear {name}", "name": "Ada"}"#).unwrap();
    assert_eq!(generate_document("{greeting},", &data), "Dear Ada,");
}
