//! The extension contract.
//!
//! An extension is a trait object carrying an [`ExtensionCore`] (identity,
//! priority, settings, properties) and overriding whichever contribution
//! methods and lifecycle hooks it needs. Every contribution has an empty default.

use std::any::Any;
use std::rc::Rc;

use quire_primitives::{EditorState, EditorView, InputRule, MarkSpec, NodeSpec, PasteRule, Plugin, Transaction};
use serde_json::{Map, Value};

use crate::attributes::EditorAttributes;
use crate::commands::CommandFn;
use crate::helpers::HelperFn;
use crate::keymap::KeyBindings;
use crate::lifecycle::LifecycleHandler;
use crate::node_views::NodeViewFactory;
use crate::priority::Priority;
use crate::settings::{AttributeGroup, ExtensionSettings};
use crate::store::ManagerStore;
use crate::suggest::Suggester;

mod preset;

pub use preset::{Module, Preset, PresetRef, module};


/// What an extension contributes to the schema.
#[derive(Debug, Clone)]
pub enum ExtensionKind {
	/// Behaviour only.
	Plain,
	/// Declares the node named after the extension.
	Node(NodeSpec),
	/// Declares the mark named after the extension.
	Mark(MarkSpec),
}

impl ExtensionKind {
	pub fn label(&self) -> &'static str {
		match self {
			Self::Plain => "plain",
			Self::Node(_) => "node",
			Self::Mark(_) => "mark",
		}
	}
}

/// Identity and configuration shared by every extension.
#[derive(Debug, Clone)]
pub struct ExtensionCore {
	name: &'static str,
	default_priority: Priority,
	settings: ExtensionSettings,
	properties: Map<String, Value>,
	required: Vec<&'static str>,
	tags: Vec<String>,
}

impl ExtensionCore {
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			default_priority: Priority::DEFAULT,
			settings: ExtensionSettings::default(),
			properties: Map::new(),
			required: Vec::new(),
			tags: Vec::new(),
		}
	}

	/// Priority used when the settings carry none.
	pub fn with_default_priority(mut self, priority: Priority) -> Self {
		self.default_priority = priority;
		self
	}

	pub fn with_settings(mut self, settings: ExtensionSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
		self.properties = properties;
		self
	}

	pub fn with_required(mut self, required: &[&'static str]) -> Self {
		self.required = required.to_vec();
		self
	}

	pub fn with_tags<I, S>(mut self, tags: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.tags = tags.into_iter().map(Into::into).collect();
		self
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Effective priority: the settings override, else the default.
	pub fn priority(&self) -> Priority {
		self.settings.priority.unwrap_or(self.default_priority)
	}

	pub fn settings(&self) -> &ExtensionSettings {
		&self.settings
	}

	pub fn properties(&self) -> &Map<String, Value> {
		&self.properties
	}

	pub fn required(&self) -> &[&'static str] {
		&self.required
	}

	pub fn tags(&self) -> &[String] {
		&self.tags
	}

	/// Merges `update` into the properties, returning the keys whose value changed.
	pub fn set_properties(&mut self, update: Map<String, Value>) -> Vec<String> {
		let mut changed = Vec::new();
		for (key, value) in update {
			if self.properties.get(&key) == Some(&value) {
				continue;
			}
			changed.push(key.clone());
			self.properties.insert(key, value);
		}
		changed
	}
}

/// A composable unit of editor behaviour.
///
/// Implementors embed an [`ExtensionCore`] and usually expand
/// [`extension_core!`](crate::extension_core) for the four required methods.
pub trait Extension: Any {
	fn core(&self) -> &ExtensionCore;
	fn core_mut(&mut self) -> &mut ExtensionCore;
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;

	fn name(&self) -> &'static str {
		self.core().name()
	}

	fn priority(&self) -> Priority {
		self.core().priority()
	}

	fn settings(&self) -> &ExtensionSettings {
		self.core().settings()
	}

	fn properties(&self) -> &Map<String, Value> {
		self.core().properties()
	}

	fn required_extensions(&self) -> &[&'static str] {
		self.core().required()
	}

	fn tags(&self) -> &[String] {
		self.core().tags()
	}

	fn kind(&self) -> ExtensionKind {
		ExtensionKind::Plain
	}

	fn create_schema_attributes(&self) -> Vec<AttributeGroup> {
		Vec::new()
	}

	fn create_commands(&self, _store: &ManagerStore) -> Vec<(String, CommandFn)> {
		Vec::new()
	}

	fn create_helpers(&self, _store: &ManagerStore) -> Vec<(String, HelperFn)> {
		Vec::new()
	}

	fn create_plugin(&self, _store: &ManagerStore) -> Option<Plugin> {
		None
	}

	fn create_input_rules(&self, _store: &ManagerStore) -> Vec<InputRule> {
		Vec::new()
	}

	fn create_paste_rules(&self, _store: &ManagerStore) -> Vec<PasteRule> {
		Vec::new()
	}

	fn create_keymap(&self, _store: &ManagerStore) -> KeyBindings {
		KeyBindings::new()
	}

	fn create_attributes(&self, _store: &ManagerStore) -> EditorAttributes {
		EditorAttributes::new()
	}

	fn create_node_views(&self, _store: &ManagerStore) -> Vec<(String, NodeViewFactory)> {
		Vec::new()
	}

	fn create_suggesters(&self, _store: &ManagerStore) -> Vec<Suggester> {
		Vec::new()
	}

	/// Handler joining the `Create` phase after the built-in ones.
	fn on_create(&mut self) -> Option<Box<dyn LifecycleHandler>> {
		None
	}

	/// Handler joining the `Initialize` phase after the built-in ones.
	fn on_initialize(&mut self) -> Option<Box<dyn LifecycleHandler>> {
		None
	}

	/// Handler joining the `AddView` phase after the built-in ones.
	fn on_view(&mut self, _view: &Rc<dyn EditorView>) -> Option<Box<dyn LifecycleHandler>> {
		None
	}

	/// Called for every transaction the host reports, in priority order.
	fn on_transaction(&mut self, _tr: &Transaction, _state: &EditorState) {}

	/// Called after `set_properties` with the keys that changed.
	fn on_set_properties(&mut self, _changed: &[String]) {}

	fn on_destroy(&mut self) {}
}

impl dyn Extension {
	pub fn downcast_ref<T: Extension>(&self) -> Option<&T> {
		self.as_any().downcast_ref()
	}

	pub fn downcast_mut<T: Extension>(&mut self) -> Option<&mut T> {
		self.as_any_mut().downcast_mut()
	}
}

impl std::fmt::Debug for dyn Extension {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Extension")
			.field("name", &self.name())
			.field("priority", &self.priority())
			.finish_non_exhaustive()
	}
}

/// Implements the accessor methods of [`Extension`] for a type with a `core` field.
///
/// ```ignore
/// impl Extension for Bold {
///     quire_manager::extension_core!();
/// }
/// ```
#[macro_export]
macro_rules! extension_core {
	() => {
		fn core(&self) -> &$crate::ExtensionCore {
			&self.core
		}

		fn core_mut(&mut self) -> &mut $crate::ExtensionCore {
			&mut self.core
		}

		fn as_any(&self) -> &dyn ::std::any::Any {
			self
		}

		fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
			self
		}
	};
}
