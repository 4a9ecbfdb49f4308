use std::collections::BTreeMap;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

mod dom;

pub use dom::{DomElement, DomOutput};

#[cfg(test)]
mod tests;

/// Attribute values of a node or mark.
pub type Attrs = BTreeMap<String, Value>;

/// Reads attributes from a DOM element. `None` means the rule does not match.
pub type GetAttrsFn = Rc<dyn Fn(&DomElement) -> Option<Attrs>>;

/// Serializes attributes to a DOM shape.
pub type ToDomFn = Rc<dyn Fn(&Attrs) -> DomOutput>;

/// Errors raised by [`Schema::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
	#[error("schema entries must have a non-empty name")]
	EmptyName,
	#[error("`{name}` is declared both as a node and as a mark")]
	NameClash { name: String },
}

/// Declaration of a single attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSpec {
	/// Default value; `None` makes the attribute required.
	pub default: Option<Value>,
}

impl AttributeSpec {
	pub fn with_default(default: Value) -> Self {
		Self {
			default: Some(default),
		}
	}
}

/// A rule that recognises a DOM element as a node or mark.
#[derive(Clone, Default)]
pub struct ParseRule {
	/// Tag name the rule matches.
	pub tag: Option<String>,
	/// Higher priority rules are tried first.
	pub priority: i32,
	pub get_attrs: Option<GetAttrsFn>,
}

impl ParseRule {
	/// A rule matching elements with the given tag.
	pub fn tag(tag: impl Into<String>) -> Self {
		Self {
			tag: Some(tag.into()),
			..Self::default()
		}
	}

	pub fn with_get_attrs(mut self, get_attrs: impl Fn(&DomElement) -> Option<Attrs> + 'static) -> Self {
		self.get_attrs = Some(Rc::new(get_attrs));
		self
	}

	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	pub fn matches(&self, element: &DomElement) -> bool {
		self.tag.as_deref().is_none_or(|tag| tag.eq_ignore_ascii_case(element.tag()))
	}

	/// Parses `element`, returning the attributes if the rule applies.
	pub fn parse(&self, element: &DomElement) -> Option<Attrs> {
		if !self.matches(element) {
			return None;
		}
		match &self.get_attrs {
			Some(get_attrs) => get_attrs(element),
			None => Some(Attrs::new()),
		}
	}
}

impl std::fmt::Debug for ParseRule {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ParseRule")
			.field("tag", &self.tag)
			.field("priority", &self.priority)
			.field("get_attrs", &self.get_attrs.is_some())
			.finish()
	}
}

/// Specification of a node type.
#[derive(Clone, Default)]
pub struct NodeSpec {
	/// Content expression, e.g. `"inline*"`.
	pub content: Option<String>,
	pub group: Option<String>,
	pub inline: bool,
	pub atom: bool,
	pub attrs: IndexMap<String, AttributeSpec>,
	pub parse_dom: Vec<ParseRule>,
	pub to_dom: Option<ToDomFn>,
}

impl std::fmt::Debug for NodeSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NodeSpec")
			.field("content", &self.content)
			.field("group", &self.group)
			.field("inline", &self.inline)
			.field("atom", &self.atom)
			.field("attrs", &self.attrs)
			.field("parse_dom", &self.parse_dom)
			.field("to_dom", &self.to_dom.is_some())
			.finish()
	}
}

/// Specification of a mark type.
#[derive(Clone)]
pub struct MarkSpec {
	pub attrs: IndexMap<String, AttributeSpec>,
	/// Whether the mark extends to text typed at its end.
	pub inclusive: bool,
	/// Space-separated names of marks this one excludes.
	pub excludes: Option<String>,
	pub parse_dom: Vec<ParseRule>,
	pub to_dom: Option<ToDomFn>,
}

impl Default for MarkSpec {
	fn default() -> Self {
		Self {
			attrs: IndexMap::new(),
			inclusive: true,
			excludes: None,
			parse_dom: Vec::new(),
			to_dom: None,
		}
	}
}

impl std::fmt::Debug for MarkSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MarkSpec")
			.field("attrs", &self.attrs)
			.field("inclusive", &self.inclusive)
			.field("excludes", &self.excludes)
			.field("parse_dom", &self.parse_dom)
			.field("to_dom", &self.to_dom.is_some())
			.finish()
	}
}

/// The named set of node and mark specifications.
///
/// Declaration order is preserved; the first node is the top node unless one
/// is named `doc`.
#[derive(Debug, Clone, Default)]
pub struct Schema {
	nodes: IndexMap<String, NodeSpec>,
	marks: IndexMap<String, MarkSpec>,
}

impl Schema {
	pub fn new(
		nodes: IndexMap<String, NodeSpec>,
		marks: IndexMap<String, MarkSpec>,
	) -> Result<Self, SchemaError> {
		if nodes.keys().chain(marks.keys()).any(|name| name.trim().is_empty()) {
			return Err(SchemaError::EmptyName);
		}
		if let Some(name) = nodes.keys().find(|name| marks.contains_key(*name)) {
			return Err(SchemaError::NameClash { name: name.clone() });
		}
		Ok(Self { nodes, marks })
	}

	pub fn node(&self, name: &str) -> Option<&NodeSpec> {
		self.nodes.get(name)
	}

	pub fn mark(&self, name: &str) -> Option<&MarkSpec> {
		self.marks.get(name)
	}

	pub fn nodes(&self) -> &IndexMap<String, NodeSpec> {
		&self.nodes
	}

	pub fn marks(&self) -> &IndexMap<String, MarkSpec> {
		&self.marks
	}

	/// Name of the top node.
	pub fn top_node(&self) -> Option<&str> {
		if self.nodes.contains_key("doc") {
			return Some("doc");
		}
		self.nodes.keys().next().map(String::as_str)
	}

	/// Parses `element` as the node `name`, filling in attribute defaults.
	pub fn parse_node(&self, name: &str, element: &DomElement) -> Option<Attrs> {
		let spec = self.nodes.get(name)?;
		let attrs = parse_with_rules(&spec.parse_dom, element)?;
		Some(with_defaults(&spec.attrs, attrs))
	}

	/// Parses `element` as the mark `name`, filling in attribute defaults.
	pub fn parse_mark(&self, name: &str, element: &DomElement) -> Option<Attrs> {
		let spec = self.marks.get(name)?;
		let attrs = parse_with_rules(&spec.parse_dom, element)?;
		Some(with_defaults(&spec.attrs, attrs))
	}

	/// Serializes the node `name` with `attrs`.
	pub fn serialize_node(&self, name: &str, attrs: &Attrs) -> Option<DomOutput> {
		let to_dom = self.nodes.get(name)?.to_dom.as_ref()?;
		Some(to_dom(attrs))
	}

	/// Serializes the mark `name` with `attrs`.
	pub fn serialize_mark(&self, name: &str, attrs: &Attrs) -> Option<DomOutput> {
		let to_dom = self.marks.get(name)?.to_dom.as_ref()?;
		Some(to_dom(attrs))
	}
}

fn parse_with_rules(rules: &[ParseRule], element: &DomElement) -> Option<Attrs> {
	let mut ordered: Vec<&ParseRule> = rules.iter().collect();
	ordered.sort_by(|a, b| b.priority.cmp(&a.priority));
	ordered.into_iter().find_map(|rule| rule.parse(element))
}

fn with_defaults(specs: &IndexMap<String, AttributeSpec>, mut attrs: Attrs) -> Attrs {
	for (name, spec) in specs {
		if !attrs.contains_key(name)
			&& let Some(default) = &spec.default
		{
			attrs.insert(name.clone(), default.clone());
		}
	}
	attrs
}
