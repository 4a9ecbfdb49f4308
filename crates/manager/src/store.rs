//! The manager store.
//!
//! Every artifact the phases produce lands in a write-once [`Slot`]. Reading
//! a slot before the phase that produces it has written it is an error rather
//! than an empty value.

use std::any::Any;
use std::rc::Rc;

use quire_primitives::{EditorView, Plugin, Schema};
use rustc_hash::FxHashMap;

use crate::attributes::EditorAttributes;
use crate::commands::CommandRegistry;
use crate::error::ManagerError;
use crate::helpers::HelperRegistry;
use crate::node_views::NodeViews;
use crate::phase::ManagerPhase;
use crate::settings::AttributeGroup;
use crate::suggest::Suggester;
use crate::tags::ExtensionTags;

/// A write-once value produced during a known phase.
#[derive(Debug)]
pub struct Slot<T> {
	key: &'static str,
	produced_in: ManagerPhase,
	value: Option<T>,
}

impl<T> Slot<T> {
	pub const fn new(key: &'static str, produced_in: ManagerPhase) -> Self {
		Self {
			key,
			produced_in,
			value: None,
		}
	}

	pub fn key(&self) -> &'static str {
		self.key
	}

	pub fn produced_in(&self) -> ManagerPhase {
		self.produced_in
	}

	pub fn is_set(&self) -> bool {
		self.value.is_some()
	}

	pub fn get(&self) -> Result<&T, ManagerError> {
		self.value.as_ref().ok_or(ManagerError::StoreKeyUnavailable {
			key: self.key,
			produced_in: self.produced_in,
		})
	}

	pub(crate) fn set(&mut self, value: T) -> Result<(), ManagerError> {
		if self.value.is_some() {
			return Err(ManagerError::StoreKeyAlreadySet { key: self.key });
		}
		self.value = Some(value);
		Ok(())
	}

	pub(crate) fn take(&mut self) -> Option<T> {
		self.value.take()
	}
}

/// Artifacts produced by the lifecycle phases.
pub struct ManagerStore {
	pub(crate) schema: Slot<Rc<Schema>>,
	pub(crate) tags: Slot<ExtensionTags>,
	pub(crate) commands: Slot<CommandRegistry>,
	pub(crate) helpers: Slot<HelperRegistry>,
	pub(crate) plugins: Slot<Vec<Plugin>>,
	pub(crate) attributes: Slot<EditorAttributes>,
	pub(crate) node_views: Slot<NodeViews>,
	pub(crate) suggesters: Slot<Vec<Suggester>>,
	pub(crate) view: Slot<Rc<dyn EditorView>>,
	/// Attribute groups added by lifecycle handlers during `Create`.
	pub(crate) schema_attributes: Vec<AttributeGroup>,
	custom: FxHashMap<&'static str, Box<dyn Any>>,
}

impl Default for ManagerStore {
	fn default() -> Self {
		Self {
			schema: Slot::new("schema", ManagerPhase::Create),
			tags: Slot::new("tags", ManagerPhase::Create),
			commands: Slot::new("commands", ManagerPhase::Initialize),
			helpers: Slot::new("helpers", ManagerPhase::Initialize),
			plugins: Slot::new("plugins", ManagerPhase::Initialize),
			attributes: Slot::new("attributes", ManagerPhase::Initialize),
			node_views: Slot::new("node_views", ManagerPhase::Initialize),
			suggesters: Slot::new("suggesters", ManagerPhase::Initialize),
			view: Slot::new("view", ManagerPhase::AddView),
			schema_attributes: Vec::new(),
			custom: FxHashMap::default(),
		}
	}
}

impl ManagerStore {
	pub fn schema(&self) -> Result<&Rc<Schema>, ManagerError> {
		self.schema.get()
	}

	pub fn tags(&self) -> Result<&ExtensionTags, ManagerError> {
		self.tags.get()
	}

	pub fn commands(&self) -> Result<&CommandRegistry, ManagerError> {
		self.commands.get()
	}

	pub fn helpers(&self) -> Result<&HelperRegistry, ManagerError> {
		self.helpers.get()
	}

	pub fn plugins(&self) -> Result<&[Plugin], ManagerError> {
		self.plugins.get().map(Vec::as_slice)
	}

	pub fn attributes(&self) -> Result<&EditorAttributes, ManagerError> {
		self.attributes.get()
	}

	pub fn node_views(&self) -> Result<&NodeViews, ManagerError> {
		self.node_views.get()
	}

	pub fn suggesters(&self) -> Result<&[Suggester], ManagerError> {
		self.suggesters.get().map(Vec::as_slice)
	}

	pub fn view(&self) -> Result<&Rc<dyn EditorView>, ManagerError> {
		self.view.get()
	}

	/// Reads an extension-defined key.
	pub fn get<T: Any>(&self, key: &'static str) -> Result<&T, ManagerError> {
		let value = self.custom.get(key).ok_or(ManagerError::StoreKeyUnavailable {
			key,
			produced_in: ManagerPhase::Initialize,
		})?;
		value
			.downcast_ref()
			.ok_or(ManagerError::StoreKeyType { key })
	}

	pub(crate) fn insert<T: Any>(&mut self, key: &'static str, value: T) -> Result<(), ManagerError> {
		if self.custom.contains_key(key) {
			return Err(ManagerError::StoreKeyAlreadySet { key });
		}
		self.custom.insert(key, Box::new(value));
		Ok(())
	}
}

impl std::fmt::Debug for ManagerStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ManagerStore")
			.field("schema", &self.schema.is_set())
			.field("tags", &self.tags.is_set())
			.field("commands", &self.commands.is_set())
			.field("helpers", &self.helpers.is_set())
			.field("plugins", &self.plugins.is_set())
			.field("attributes", &self.attributes.is_set())
			.field("node_views", &self.node_views.is_set())
			.field("suggesters", &self.suggesters.is_set())
			.field("view", &self.view.is_set())
			.field("custom", &self.custom.keys().collect::<Vec<_>>())
			.finish()
	}
}
