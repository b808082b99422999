mod common;

use common::fixtures::{ITEMS_TEMPLATES, book_store, items};
use common::{TestResult, init_logger};
use jxt::tree::parse_str;
use jxt::{JxtError, TransformConfig, TransformError, Transformer, transform_str};

#[test]
fn test_apply_template_copies_each_item() -> TestResult {
    init_logger();
    let transformer = Transformer::from_json(ITEMS_TEMPLATES)?;
    let source = items();
    let output = transformer.render(&source)?.ok_or("no output")?;

    let root = output.root();
    assert!(root.is_array());
    assert_eq!(root.child_count(), 2);
    for (copy, original) in root.children().zip(source.root().child_by_name("items").ok_or("items")?.children()) {
        assert!(copy.deep_eq(original));
        assert_eq!(copy.parent(), Some(root));
    }
    assert_eq!(output.to_json(), r#"[{"price":5},{"price":15}]"#);
    Ok(())
}

#[test]
fn test_first_template_wins_over_more_specific() -> TestResult {
    init_logger();
    let templates = r#"[
        {"$template": {"$match": "/", "$value": {"$apply-template": {"$select": "/a/b", "$array": false}}}},
        {"$template": {"$match": "b", "$value": "general"}},
        {"$template": {"$match": "/a/b", "$value": "specific"}}
    ]"#;
    let output = transform_str(templates, r#"{"a": {"b": 1}}"#)?.ok_or("no output")?;
    assert_eq!(output.to_json(), r#""general""#);
    Ok(())
}

#[test]
fn test_book_catalogue() -> TestResult {
    init_logger();
    let templates = r#"[
        {"$template": {"$match": "/",
            "$variable": {"$name": "limit", "$select": "/limit"},
            "$value": {
                "shop": {"$value-of": {"$select": "/store/name"}},
                "cheap": {"$apply-template": {"$select": "/store/book/*[price lt $limit]"}},
                "bicycle": {"$copy-of": {"$select": "/store/bicycle"}},
                "unicycle": {"$copy-of": {"$select": "/store/unicycle"}}
            }}},
        {"$template": {"$match": "/store/book/*", "$value": {
            "label": {"$value-of": [{"$select": "title"}, " by ", {"$select": "author"}]},
            "price": {"$value-of": {"$select": "price"}}
        }}}
    ]"#;
    let transformer = Transformer::from_json(templates)?;
    let output = transformer.render(&book_store())?.ok_or("no output")?;
    assert_eq!(
        output.to_json(),
        concat!(
            r#"{"shop":"Corner Books","cheap":["#,
            r#"{"label":"Sayings of the Century by Nigel Rees","price":8.95},"#,
            r#"{"label":"Moby Dick by Herman Melville","price":8.99}],"#,
            r#""bicycle":{"color":"red","price":19.95}}"#
        )
    );
    Ok(())
}

#[test]
fn test_pretty_output() -> TestResult {
    let output = transform_str(ITEMS_TEMPLATES, r#"{"items": [{"price": 5}]}"#)?.ok_or("no output")?;
    assert_eq!(output.to_pretty_json(2), "[\n  {\n    \"price\": 5\n  }\n]");
    Ok(())
}

#[test]
fn test_strict_config_from_json() -> TestResult {
    init_logger();
    let config = TransformConfig::from_json(r#"{"strict": true}"#)?;
    assert_eq!(config.max_depth, jxt::transform::DEFAULT_MAX_DEPTH);

    let templates = r#"[{"$template": {"$match": "/", "$value": {"$copy-of": {"$select": "/missing"}}}}]"#;
    let lenient = Transformer::from_json(templates)?;
    assert_eq!(lenient.process_str("{}")?, None);

    let strict = Transformer::with_config(parse_str(templates)?, config)?;
    assert!(matches!(
        strict.process_str("{}"),
        Err(TransformError::EmptySelection { .. })
    ));
    Ok(())
}

#[test]
fn test_errors_surface_through_top_level() {
    assert!(matches!(
        transform_str("[", "{}"),
        Err(JxtError::Transform(TransformError::Parse(_)))
    ));
    assert!(matches!(
        transform_str(r#"[{"$template": {}}]"#, "{}"),
        Err(JxtError::Transform(TransformError::InvalidTemplate(_)))
    ));
    assert!(matches!(
        transform_str(ITEMS_TEMPLATES, r#"{"items": [1,]}"#),
        Err(JxtError::Transform(TransformError::Parse(_)))
    ));
}

#[test]
fn test_config_type_errors() {
    assert!(TransformConfig::from_json(r#"{"maxDepth": 4}"#).is_ok());
    assert!(matches!(
        TransformConfig::from_json(r#"{"maxDepth": "deep"}"#),
        Err(TransformError::Config(_))
    ));
}
