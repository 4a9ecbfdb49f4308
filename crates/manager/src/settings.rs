//! Extension and manager settings.
//!
//! Settings are fixed once a module is constructed. Everything here derives
//! `serde::Deserialize` so hosts can keep them in TOML; closure-valued entries
//! can only be supplied from code.

use std::rc::Rc;

use quire_primitives::{DomElement, Plugin};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::priority::Priority;

/// Contributions an extension (or the whole manager) opts out of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Exclude {
	pub plugins: bool,
	pub keymap: bool,
	pub attributes: bool,
	pub node_views: bool,
	pub input_rules: bool,
	pub paste_rules: bool,
	pub suggestions: bool,
}

impl Exclude {
	/// Excluded by either side.
	pub fn union(self, other: Self) -> Self {
		Self {
			plugins: self.plugins || other.plugins,
			keymap: self.keymap || other.keymap,
			attributes: self.attributes || other.attributes,
			node_views: self.node_views || other.node_views,
			input_rules: self.input_rules || other.input_rules,
			paste_rules: self.paste_rules || other.paste_rules,
			suggestions: self.suggestions || other.suggestions,
		}
	}
}

/// Reads an extra attribute's value from a DOM element.
#[derive(Clone)]
pub enum ParseDom {
	/// Read the named DOM attribute as a string.
	Attribute(String),
	Custom(Rc<dyn Fn(&DomElement) -> Option<Value>>),
}

/// Produces the DOM attribute for an extra attribute's value.
#[derive(Clone)]
pub enum ToDom {
	/// Write the value to the named DOM attribute.
	Attribute(String),
	/// Returns `(dom_attribute, value)`, or `None` to omit the attribute.
	Custom(Rc<dyn Fn(&Value) -> Option<(String, String)>>),
}

impl std::fmt::Debug for ParseDom {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

impl std::fmt::Debug for ToDom {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

/// An attribute added to a node or mark on top of those its spec declares.
///
/// Deserializes from any of:
///
/// ```toml
/// extra_attributes = [
///     "id",                                  # bare name
///     ["level", 1],                          # name and default
///     ["align", "left", "data-align"],       # name, default, DOM attribute
///     { name = "dir", default = "ltr", dom = "dir" },
/// ]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawExtraAttribute")]
pub struct ExtraAttribute {
	pub name: String,
	/// `None` makes the attribute required.
	pub default: Option<Value>,
	pub parse_dom: ParseDom,
	pub to_dom: ToDom,
}

impl ExtraAttribute {
	/// An attribute parsed from and serialized to the DOM attribute of the same name.
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			parse_dom: ParseDom::Attribute(name.clone()),
			to_dom: ToDom::Attribute(name.clone()),
			name,
			default: None,
		}
	}

	pub fn with_default(mut self, default: Value) -> Self {
		self.default = Some(default);
		self
	}

	/// Uses `dom_attribute` for both parsing and serialization.
	pub fn with_dom_attribute(mut self, dom_attribute: impl Into<String>) -> Self {
		let dom_attribute = dom_attribute.into();
		self.parse_dom = ParseDom::Attribute(dom_attribute.clone());
		self.to_dom = ToDom::Attribute(dom_attribute);
		self
	}

	pub fn with_parse_dom(mut self, parse: impl Fn(&DomElement) -> Option<Value> + 'static) -> Self {
		self.parse_dom = ParseDom::Custom(Rc::new(parse));
		self
	}

	pub fn with_to_dom(mut self, to_dom: impl Fn(&Value) -> Option<(String, String)> + 'static) -> Self {
		self.to_dom = ToDom::Custom(Rc::new(to_dom));
		self
	}

	/// Reads the value from `element`, falling back to the default.
	pub fn parse(&self, element: &DomElement) -> Option<Value> {
		let parsed = match &self.parse_dom {
			ParseDom::Attribute(name) => element.attribute(name).map(|value| Value::String(value.into())),
			ParseDom::Custom(parse) => parse(element),
		};
		parsed.or_else(|| self.default.clone())
	}

	/// The DOM attribute for `value`, if any.
	pub fn serialize(&self, value: &Value) -> Option<(String, String)> {
		match &self.to_dom {
			ToDom::Attribute(name) => match value {
				Value::Null => None,
				Value::String(text) => Some((name.clone(), text.clone())),
				other => Some((name.clone(), other.to_string())),
			},
			ToDom::Custom(to_dom) => to_dom(value),
		}
	}

	/// Equality that treats any two custom closures as equal.
	pub fn eq_ignoring_functions(&self, other: &Self) -> bool {
		let parse_eq = match (&self.parse_dom, &other.parse_dom) {
			(ParseDom::Attribute(a), ParseDom::Attribute(b)) => a == b,
			(ParseDom::Custom(_), ParseDom::Custom(_)) => true,
			_ => false,
		};
		let to_dom_eq = match (&self.to_dom, &other.to_dom) {
			(ToDom::Attribute(a), ToDom::Attribute(b)) => a == b,
			(ToDom::Custom(_), ToDom::Custom(_)) => true,
			_ => false,
		};
		self.name == other.name && self.default == other.default && parse_eq && to_dom_eq
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExtraAttribute {
	Name(String),
	Triple((String, Value, String)),
	Pair((String, Value)),
	Object {
		name: String,
		#[serde(default)]
		default: Option<Value>,
		#[serde(default)]
		dom: Option<String>,
	},
}

impl From<RawExtraAttribute> for ExtraAttribute {
	fn from(raw: RawExtraAttribute) -> Self {
		match raw {
			RawExtraAttribute::Name(name) => Self::new(name),
			RawExtraAttribute::Pair((name, default)) => Self::new(name).with_default(default),
			RawExtraAttribute::Triple((name, default, dom)) => {
				Self::new(name).with_default(default).with_dom_attribute(dom)
			}
			RawExtraAttribute::Object { name, default, dom } => {
				let mut attribute = Self::new(name);
				attribute.default = default;
				match dom {
					Some(dom) => attribute.with_dom_attribute(dom),
					None => attribute,
				}
			}
		}
	}
}

/// Keyword selectors for [`Identifiers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
	All,
	Nodes,
	Marks,
}

/// Selects the nodes and marks an [`AttributeGroup`] applies to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Identifiers {
	Kind(IdentifierKind),
	Names(Vec<String>),
	Tags { tags: Vec<String> },
}

impl Identifiers {
	/// Whether a node (`is_node`) or mark with `name` and `tags` is selected.
	pub fn matches(&self, name: &str, is_node: bool, tags: &[String]) -> bool {
		match self {
			Self::Kind(IdentifierKind::All) => true,
			Self::Kind(IdentifierKind::Nodes) => is_node,
			Self::Kind(IdentifierKind::Marks) => !is_node,
			Self::Names(names) => names.iter().any(|candidate| candidate == name),
			Self::Tags { tags: wanted } => wanted.iter().any(|tag| tags.contains(tag)),
		}
	}
}

/// Extra attributes applied to every node or mark selected by `identifiers`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeGroup {
	pub identifiers: Identifiers,
	pub attributes: Vec<ExtraAttribute>,
}

impl AttributeGroup {
	pub fn new(identifiers: Identifiers, attributes: Vec<ExtraAttribute>) -> Self {
		Self {
			identifiers,
			attributes,
		}
	}
}

/// Construction-time settings of one extension.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionSettings {
	/// Overrides the extension's default priority.
	pub priority: Option<Priority>,
	pub exclude: Exclude,
	pub extra_attributes: Vec<ExtraAttribute>,
	/// Extension-specific options.
	pub options: Map<String, Value>,
}

impl ExtensionSettings {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Equality that treats any two custom closures as equal.
	pub fn eq_ignoring_functions(&self, other: &Self) -> bool {
		self.priority == other.priority
			&& self.exclude == other.exclude
			&& self.options == other.options
			&& self.extra_attributes.len() == other.extra_attributes.len()
			&& self
				.extra_attributes
				.iter()
				.zip(&other.extra_attributes)
				.all(|(a, b)| a.eq_ignoring_functions(b))
	}
}

/// Settings of the manager itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManagerSettings {
	/// Applied to every extension on top of its own exclusions.
	pub exclude: Exclude,
	pub schema_attributes: Vec<AttributeGroup>,
	/// Plugins placed ahead of every extension plugin.
	#[serde(skip)]
	pub plugins: Vec<Plugin>,
}

impl ManagerSettings {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	pub fn with_plugin(mut self, plugin: Plugin) -> Self {
		self.plugins.push(plugin);
		self
	}
}
