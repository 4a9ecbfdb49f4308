use std::rc::Rc;

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::{AttributeSpec, Attrs, DomElement, DomOutput, MarkSpec, NodeSpec, ParseRule, Schema, SchemaError};

fn heading() -> NodeSpec {
	let mut attrs = IndexMap::new();
	attrs.insert("level".to_string(), AttributeSpec::with_default(json!(1)));
	NodeSpec {
		content: Some("inline*".into()),
		group: Some("block".into()),
		attrs,
		parse_dom: vec![
			ParseRule::tag("h2").with_get_attrs(|_| Some(Attrs::from([("level".to_string(), json!(2))]))),
			ParseRule::tag("h1"),
		],
		to_dom: Some(Rc::new(|attrs: &Attrs| {
			DomOutput::new(format!("h{}", attrs.get("level").and_then(|v| v.as_u64()).unwrap_or(1)))
		})),
		..NodeSpec::default()
	}
}

#[test]
fn test_parse_fills_defaults() {
	let mut nodes = IndexMap::new();
	nodes.insert("heading".to_string(), heading());
	let schema = Schema::new(nodes, IndexMap::new()).unwrap();

	let h1 = schema.parse_node("heading", &DomElement::new("H1")).unwrap();
	assert_eq!(h1, Attrs::from([("level".to_string(), json!(1))]));

	let h2 = schema.parse_node("heading", &DomElement::new("h2")).unwrap();
	assert_eq!(h2.get("level"), Some(&json!(2)));

	assert!(schema.parse_node("heading", &DomElement::new("p")).is_none());
	assert_eq!(
		schema.serialize_node("heading", &h2),
		Some(DomOutput::new("h2"))
	);
}

#[test]
fn test_higher_priority_rule_wins() {
	let spec = NodeSpec {
		parse_dom: vec![
			ParseRule::tag("p").with_get_attrs(|_| Some(Attrs::from([("from".to_string(), json!("low"))]))),
			ParseRule::tag("p")
				.with_priority(10)
				.with_get_attrs(|_| Some(Attrs::from([("from".to_string(), json!("high"))]))),
		],
		..NodeSpec::default()
	};
	let schema = Schema::new(IndexMap::from([("paragraph".to_string(), spec)]), IndexMap::new()).unwrap();
	let attrs = schema.parse_node("paragraph", &DomElement::new("p")).unwrap();
	assert_eq!(attrs.get("from"), Some(&json!("high")));
}

#[test]
fn test_name_clash_is_rejected() {
	let nodes = IndexMap::from([("bold".to_string(), NodeSpec::default())]);
	let marks = IndexMap::from([("bold".to_string(), MarkSpec::default())]);
	assert_eq!(
		Schema::new(nodes, marks).unwrap_err(),
		SchemaError::NameClash { name: "bold".into() }
	);
}

#[test]
fn test_empty_name_is_rejected() {
	let nodes = IndexMap::from([(" ".to_string(), NodeSpec::default())]);
	assert_eq!(Schema::new(nodes, IndexMap::new()).unwrap_err(), SchemaError::EmptyName);
}

#[test]
fn test_top_node_prefers_doc() {
	let nodes = IndexMap::from([
		("paragraph".to_string(), NodeSpec::default()),
		("doc".to_string(), NodeSpec::default()),
	]);
	let schema = Schema::new(nodes, IndexMap::new()).unwrap();
	assert_eq!(schema.top_node(), Some("doc"));
}
