use std::collections::BTreeMap;

/// A parsed DOM element as seen by parse rules.
///
/// Only the tag and attributes are modelled; DOM parsing itself belongs to the
/// host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomElement {
	tag: String,
	attributes: BTreeMap<String, String>,
}

impl DomElement {
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attributes: BTreeMap::new(),
		}
	}

	/// Builder-style attribute setter.
	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	pub fn tag(&self) -> &str {
		&self.tag
	}

	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.get(name).map(String::as_str)
	}

	pub fn attributes(&self) -> &BTreeMap<String, String> {
		&self.attributes
	}
}

/// The DOM shape a node or mark serializes to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomOutput {
	pub tag: String,
	pub attributes: BTreeMap<String, String>,
	/// Whether child content is rendered inside the element.
	pub has_content: bool,
}

impl DomOutput {
	/// An element that renders child content.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attributes: BTreeMap::new(),
			has_content: true,
		}
	}

	/// A leaf element without content (e.g. `<hr>`).
	pub fn leaf(tag: impl Into<String>) -> Self {
		Self {
			has_content: false,
			..Self::new(tag)
		}
	}

	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}
}
