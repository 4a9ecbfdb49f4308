//! Phase orchestration.
//!
//! Every phase runs a list of [`LifecycleHandler`]s: the built-in handlers for
//! that phase followed by the handlers extensions returned from their phase
//! hook. All `before_extension_loop` calls run first, then every handler sees
//! every extension in priority order, then all `after_extension_loop` calls.

use std::any::Any;
use std::rc::Rc;

use quire_primitives::EditorView;
use tracing::trace;

use crate::error::ManagerError;
use crate::extension::Extension;
use crate::phase::{ManagerPhase, PhaseRequirement, ensure_phase};
use crate::settings::{AttributeGroup, ManagerSettings};
use crate::store::ManagerStore;


/// A participant in one lifecycle phase.
pub trait LifecycleHandler {
	fn before_extension_loop(&mut self, _ctx: &mut LifecycleContext<'_>) -> Result<(), ManagerError> {
		Ok(())
	}

	fn for_each_extension(
		&mut self,
		_extension: &dyn Extension,
		_ctx: &mut LifecycleContext<'_>,
	) -> Result<(), ManagerError> {
		Ok(())
	}

	fn after_extension_loop(&mut self, _ctx: &mut LifecycleContext<'_>) -> Result<(), ManagerError> {
		Ok(())
	}
}

/// What a handler can see and touch while a phase runs.
pub struct LifecycleContext<'a> {
	phase: ManagerPhase,
	settings: &'a ManagerSettings,
	store: &'a mut ManagerStore,
}

impl<'a> LifecycleContext<'a> {
	pub(crate) fn new(phase: ManagerPhase, settings: &'a ManagerSettings, store: &'a mut ManagerStore) -> Self {
		Self { phase, settings, store }
	}

	pub fn phase(&self) -> ManagerPhase {
		self.phase
	}

	pub fn settings(&self) -> &ManagerSettings {
		self.settings
	}

	pub fn store(&self) -> &ManagerStore {
		self.store
	}

	pub(crate) fn store_mut(&mut self) -> &mut ManagerStore {
		self.store
	}

	/// Publishes an extension-defined store key. Keys are write-once.
	pub fn set_store_key<T: Any>(&mut self, key: &'static str, value: T) -> Result<(), ManagerError> {
		ensure_phase(
			self.phase,
			PhaseRequirement::AtLeast(ManagerPhase::Initialize),
			"set_store_key",
		)?;
		self.store.insert(key, value)
	}

	pub fn get_store_key<T: Any>(&self, key: &'static str) -> Result<&T, ManagerError> {
		ensure_phase(
			self.phase,
			PhaseRequirement::AtLeast(ManagerPhase::Initialize),
			"get_store_key",
		)?;
		self.store.get(key)
	}

	/// Adds extra attributes for the nodes and marks `group` selects.
	///
	/// Only possible during `Create`, before the schema has been built.
	pub fn add_schema_attributes(&mut self, group: AttributeGroup) -> Result<(), ManagerError> {
		ensure_phase(
			self.phase,
			PhaseRequirement::Exactly(ManagerPhase::Create),
			"add_schema_attributes",
		)?;
		if self.store.schema.is_set() {
			return Err(ManagerError::SchemaAlreadyBuilt);
		}
		self.store.schema_attributes.push(group);
		Ok(())
	}
}

/// Runs one phase over the sorted extensions.
pub(crate) fn run_phase(
	extensions: &[Box<dyn Extension>],
	handlers: &mut [Box<dyn LifecycleHandler>],
	ctx: &mut LifecycleContext<'_>,
) -> Result<(), ManagerError> {
	trace!(phase = %ctx.phase(), handlers = handlers.len(), "running phase");
	for handler in handlers.iter_mut() {
		handler.before_extension_loop(ctx)?;
	}
	for extension in extensions {
		for handler in handlers.iter_mut() {
			handler.for_each_extension(extension.as_ref(), ctx)?;
		}
	}
	for handler in handlers.iter_mut() {
		handler.after_extension_loop(ctx)?;
	}
	Ok(())
}

/// Stores the attached view during `AddView`.
pub(crate) struct ViewHandler {
	view: Option<Rc<dyn EditorView>>,
}

impl ViewHandler {
	pub(crate) fn new(view: Rc<dyn EditorView>) -> Self {
		Self { view: Some(view) }
	}
}

impl LifecycleHandler for ViewHandler {
	fn after_extension_loop(&mut self, ctx: &mut LifecycleContext<'_>) -> Result<(), ManagerError> {
		match self.view.take() {
			Some(view) => ctx.store_mut().view.set(view),
			None => Ok(()),
		}
	}
}
