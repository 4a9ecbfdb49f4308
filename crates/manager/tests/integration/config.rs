use std::rc::Rc;

use pretty_assertions::assert_eq;
use quire_manager::{Extension, ExtensionCore, ExtensionKind, ExtensionSettings, Manager, ManagerSettings};
use quire_primitives::{Attrs, DomElement, DomOutput, NodeSpec, ParseRule};
use serde_json::json;

use crate::common::{Fixture, init_tracing};

struct Paragraph {
	core: ExtensionCore,
}

impl Extension for Paragraph {
	quire_manager::extension_core!();

	fn kind(&self) -> ExtensionKind {
		ExtensionKind::Node(NodeSpec {
			parse_dom: vec![ParseRule::tag("p")],
			to_dom: Some(Rc::new(|_: &Attrs| DomOutput::new("p"))),
			..NodeSpec::default()
		})
	}
}

fn paragraph(settings: &str) -> Paragraph {
	Paragraph {
		core: ExtensionCore::new("paragraph").with_settings(ExtensionSettings::from_toml_str(settings).unwrap()),
	}
}

#[test]
fn test_settings_files_drive_construction() {
	init_tracing();
	let settings = ManagerSettings::from_toml_str(
		r#"
		[[schema_attributes]]
		identifiers = "nodes"
		attributes = [["dir", "ltr"]]
		"#,
	)
	.unwrap();
	let paragraph = paragraph(
		r#"
		priority = 1
		extra_attributes = [["align", "left", "data-align"]]
		"#,
	);
	let manager = Manager::create(
		vec![Fixture::new("history", 50).module(), quire_manager::module(paragraph)],
		settings,
	)
	.unwrap();

	let order: Vec<_> = manager.extensions().map(|extension| extension.name()).collect();
	assert_eq!(order, ["paragraph", "history"]);

	let schema = manager.store().schema().unwrap();
	let attrs = schema
		.parse_node("paragraph", &DomElement::new("p").with_attribute("data-align", "center"))
		.unwrap();
	assert_eq!(attrs["align"], json!("center"));
	assert_eq!(attrs["dir"], json!("ltr"));

	let output = schema.serialize_node("paragraph", &attrs).unwrap();
	assert_eq!(output.attributes["data-align"], "center");
	assert_eq!(output.attributes["dir"], "ltr");
}

#[test]
fn test_excluded_capabilities_from_settings_file() {
	let settings = ManagerSettings::from_toml_str(
		r#"
		[exclude]
		attributes = true
		"#,
	)
	.unwrap();
	let manager = Manager::create(
		vec![quire_manager::module(paragraph(r#"extra_attributes = ["id"]"#))],
		settings,
	)
	.unwrap();
	let schema = manager.store().schema().unwrap();
	assert!(schema.node("paragraph").unwrap().attrs.is_empty());
}

#[test]
fn test_malformed_settings_are_rejected() {
	let err = ManagerSettings::from_toml_str("[exclude]\nkeymaps = true").unwrap_err();
	assert!(err.to_string().contains("keymaps"), "{err}");
}
