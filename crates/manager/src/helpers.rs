use std::rc::Rc;

use indexmap::IndexMap;
use quire_primitives::{EditorState, EditorView};
use serde_json::Value;

use crate::commands::CommandArgs;
use crate::error::ManagerError;
use crate::extension::Extension;
use crate::lifecycle::{LifecycleContext, LifecycleHandler};
use crate::phase::{ManagerPhase, PhaseRequirement, ensure_phase};

/// A read-only query over the editor state.
pub type HelperFn = Rc<dyn Fn(&EditorState, &CommandArgs) -> Value>;

/// Names helpers can never take.
pub const RESERVED_HELPER_NAMES: &[&str] = &["helpers", "new"];

#[derive(Clone)]
pub struct HelperEntry {
	pub extension: &'static str,
	pub helper: HelperFn,
}

impl std::fmt::Debug for HelperEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HelperEntry")
			.field("extension", &self.extension)
			.finish_non_exhaustive()
	}
}

#[derive(Debug, Clone, Default)]
pub struct HelperRegistry {
	entries: IndexMap<String, HelperEntry>,
}

impl HelperRegistry {
	pub fn insert(&mut self, name: String, extension: &'static str, helper: HelperFn) -> Result<(), ManagerError> {
		if RESERVED_HELPER_NAMES.contains(&name.as_str()) {
			return Err(ManagerError::ReservedHelperName { helper: name, extension });
		}
		if let Some(existing) = self.entries.get(&name) {
			return Err(ManagerError::DuplicateHelper {
				helper: name,
				extension,
				existing: existing.extension,
			});
		}
		self.entries.insert(name, HelperEntry { extension, helper });
		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<&HelperEntry> {
		self.entries.get(name)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}
}

#[derive(Default)]
pub(crate) struct HelpersHandler {
	registry: HelperRegistry,
}

impl LifecycleHandler for HelpersHandler {
	fn for_each_extension(
		&mut self,
		extension: &dyn Extension,
		ctx: &mut LifecycleContext<'_>,
	) -> Result<(), ManagerError> {
		for (name, helper) in extension.create_helpers(ctx.store()) {
			self.registry.insert(name, extension.name(), helper)?;
		}
		Ok(())
	}

	fn after_extension_loop(&mut self, ctx: &mut LifecycleContext<'_>) -> Result<(), ManagerError> {
		ctx.store_mut().helpers.set(std::mem::take(&mut self.registry))
	}
}

/// Helper invocation against the view's current state.
pub struct Helpers<'m> {
	registry: &'m HelperRegistry,
	view: &'m Rc<dyn EditorView>,
}

impl<'m> Helpers<'m> {
	pub(crate) fn new(
		phase: ManagerPhase,
		registry: Result<&'m HelperRegistry, ManagerError>,
		view: Result<&'m Rc<dyn EditorView>, ManagerError>,
	) -> Result<Self, ManagerError> {
		ensure_phase(phase, PhaseRequirement::Exactly(ManagerPhase::Done), "helpers")?;
		Ok(Self {
			registry: registry?,
			view: view?,
		})
	}

	pub fn call(&self, name: &str, args: CommandArgs) -> Result<Value, ManagerError> {
		let entry = self
			.registry
			.get(name)
			.ok_or_else(|| ManagerError::UnknownHelper(name.to_string()))?;
		let state = self.view.state();
		Ok((entry.helper)(&state, &args))
	}

	pub fn names(&self) -> impl Iterator<Item = &'m str> + use<'m> {
		self.registry.names()
	}
}

impl std::fmt::Debug for Helpers<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Helpers")
			.field("registry", self.registry)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn noop() -> HelperFn {
		Rc::new(|_: &EditorState, _: &CommandArgs| json!(null))
	}

	#[test]
	fn test_helper_names_are_unique() {
		let mut registry = HelperRegistry::default();
		registry.insert("word_count".into(), "stats", noop()).unwrap();
		let err = registry.insert("word_count".into(), "other", noop()).unwrap_err();
		assert_eq!(
			err,
			ManagerError::DuplicateHelper {
				helper: "word_count".into(),
				extension: "other",
				existing: "stats",
			}
		);
	}

	#[test]
	fn test_reserved_helper_names() {
		let mut registry = HelperRegistry::default();
		for name in RESERVED_HELPER_NAMES {
			assert!(matches!(
				registry.insert((*name).into(), "ext", noop()),
				Err(ManagerError::ReservedHelperName { .. })
			));
		}
	}
}
