mod common;

use common::fixtures::{book_store, items};
use common::{TestResult, init_logger, texts};
use jxt::tree::{NodeType, Scalar, parse_str};
use jxt::jpath::{Axis, ComparisonOperator, Segment};
use jxt::{compile, compile_strict, evaluate, select};

#[test]
fn test_child_path_selects_value() -> TestResult {
    init_logger();
    let doc = parse_str(r#"{"a":{"b":1,"c":2}}"#)?;
    let result = select("/a/b", doc.root(), None);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].scalar(), Some(&Scalar::Integer(1)));
    Ok(())
}

#[test]
fn test_positional_array_step() -> TestResult {
    init_logger();
    let doc = parse_str(r#"{"a":[1,2,3]}"#)?;
    let result = select("/a/1", doc.root(), None);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].scalar(), Some(&Scalar::Integer(2)));
    Ok(())
}

#[test]
fn test_descent_in_document_order() -> TestResult {
    init_logger();
    let doc = parse_str(r#"{"x":{"y":5},"z":{"y":9}}"#)?;
    let result = select("//y", doc.root(), None);
    let values: Vec<_> = result.iter().map(|n| n.scalar().cloned()).collect();
    assert_eq!(values, vec![Some(Scalar::Integer(5)), Some(Scalar::Integer(9))]);
    assert_eq!(result[0].path(), vec!["x", "y"]);
    assert_eq!(result[1].path(), vec!["z", "y"]);
    Ok(())
}

#[test]
fn test_wildcard_with_predicate() {
    init_logger();
    let doc = items();
    let result = select("/items/*[price gt 10]", doc.root(), None);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].to_json(), r#"{"price":15}"#);
    assert_eq!(result[0].index(), Some(1));
}

#[test]
fn test_book_store_queries() {
    init_logger();
    let doc = book_store();
    let root = doc.root();
    assert_eq!(
        texts(&select("/store/book/*[category eq \"fiction\"]/title", root, None)),
        vec!["Sword of Honour", "Moby Dick", "The Lord of the Rings"]
    );
    assert_eq!(
        texts(&select("/store/book/*[price lt /limit]/author", root, None)),
        vec!["Nigel Rees", "Herman Melville"]
    );
    assert_eq!(
        texts(&select("/store/book/*[isbn = isbn]/title", root, None)),
        vec!["Moby Dick", "The Lord of the Rings"]
    );
    assert_eq!(select("/store//price", root, None).len(), 5);
    assert_eq!(
        texts(&select("/store/bicycle/color/../price", root, None)),
        vec!["19.95"]
    );
}

#[test]
fn test_variables_in_predicates() -> TestResult {
    init_logger();
    let doc = book_store();
    let vars = parse_str(r#"{"max": 9, "who": "Nigel Rees"}"#)?;
    assert_eq!(
        texts(&select("/store/book/*[price le $max]/title", doc.root(), Some(vars.root()))),
        vec!["Sayings of the Century", "Moby Dick"]
    );
    assert_eq!(
        texts(&select("/store/book/*[not(author eq $who)]/price", doc.root(), Some(vars.root()))),
        vec!["12.99", "8.99", "22.99"]
    );
    assert!(select("/store/book/*[price le $missing]", doc.root(), Some(vars.root())).is_empty());
    Ok(())
}

#[test]
fn test_named_axes() {
    init_logger();
    let doc = book_store();
    let book = select("/store/book/1", doc.root(), None)[0];
    assert_eq!(
        texts(&select("preceding-sibling::./title", book, None)),
        vec!["Sayings of the Century"]
    );
    assert_eq!(
        texts(&select("following-sibling::./title", book, None)),
        vec!["Moby Dick", "The Lord of the Rings"]
    );
    let ancestors: Vec<_> = select("ancestor::.", book, None).iter().map(|n| n.node_type()).collect();
    assert_eq!(ancestors, vec![NodeType::Array, NodeType::Object, NodeType::Object]);
    assert_eq!(select("ancestor-or-self::.", book, None)[0], book);
}

#[test]
fn test_wildcard_selects_children_on_any_axis() {
    init_logger();
    let doc = book_store();
    let store = select("/store", doc.root(), None)[0];
    let children = select("child::.", store, None);
    for path in ["*", "child::*", "descendant::*", "parent::*", "following-sibling::*"] {
        assert_eq!(select(path, store, None), children, "{}", path);
    }
}

#[test]
fn test_compiled_structure() {
    let path = compile("/store/descendant::.[price gt 10]");
    assert!(path.is_absolute);
    assert_eq!(path.steps.len(), 2);
    let step = &path.steps[1];
    assert_eq!(step.axis, Axis::Descendant);
    assert_eq!(step.segment, Segment::Current);
    let predicate = step.predicate.as_ref().unwrap();
    assert_eq!(predicate.operator, ComparisonOperator::Gt);
    assert!(!predicate.negated);
}

#[test]
fn test_lenient_and_strict_compilation() {
    init_logger();
    let doc = book_store();
    let lenient = compile("/store/a:b/book");
    assert!(evaluate(&lenient, doc.root(), None).is_empty());
    assert!(compile_strict("/store/a:b/book").is_err());
    assert!(compile_strict("/store/book/*[price gt 10]").is_ok());
}
