use std::rc::Rc;

use quire_primitives::{EditorState, EditorView, Rope, Transaction};
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::attributes::AttributesHandler;
use crate::commands::{Chain, Commands, CommandsHandler};
use crate::error::ManagerError;
use crate::extension::{Extension, Module, Preset, PresetRef};
use crate::helpers::{Helpers, HelpersHandler};
use crate::lifecycle::{LifecycleContext, LifecycleHandler, ViewHandler, run_phase};
use crate::node_views::NodeViewsHandler;
use crate::phase::{ManagerPhase, PhaseRequirement, ensure_phase};
use crate::plugins::PluginsHandler;
use crate::resolver::resolve;
use crate::schema::SchemaBuilder;
use crate::settings::ManagerSettings;
use crate::store::ManagerStore;
use crate::suggest::SuggestersHandler;
use crate::tags::TagsHandler;


/// Owns the resolved extensions and everything built from them.
///
/// [`Manager::create`] resolves the modules and runs the `Create` and
/// `Initialize` phases. [`Manager::add_view`] binds the host view and finishes
/// construction; commands and helpers are only available after that.
/// Dropping a constructed manager destroys it.
pub struct Manager {
	extensions: Vec<Box<dyn Extension>>,
	extension_index: FxHashMap<&'static str, usize>,
	presets: Vec<Preset>,
	preset_index: FxHashMap<&'static str, usize>,
	settings: ManagerSettings,
	store: ManagerStore,
	phase: ManagerPhase,
	constructed: bool,
}

impl Manager {
	pub fn create(
		modules: impl IntoIterator<Item = Module>,
		settings: ManagerSettings,
	) -> Result<Self, ManagerError> {
		let resolved = resolve(modules.into_iter().collect())?;
		let mut manager = Self {
			extensions: resolved.extensions,
			extension_index: resolved.extension_index,
			presets: resolved.presets,
			preset_index: resolved.preset_index,
			settings,
			store: ManagerStore::default(),
			phase: ManagerPhase::None,
			constructed: false,
		};

		let create: Vec<Box<dyn LifecycleHandler>> =
			vec![Box::<TagsHandler>::default(), Box::<SchemaBuilder>::default()];
		manager.run(ManagerPhase::Create, create, |extension| extension.on_create())?;

		let initialize: Vec<Box<dyn LifecycleHandler>> = vec![
			Box::<CommandsHandler>::default(),
			Box::<HelpersHandler>::default(),
			Box::<PluginsHandler>::default(),
			Box::<AttributesHandler>::default(),
			Box::<NodeViewsHandler>::default(),
			Box::<SuggestersHandler>::default(),
		];
		manager.run(ManagerPhase::Initialize, initialize, |extension| extension.on_initialize())?;

		manager.constructed = true;
		Ok(manager)
	}

	fn run(
		&mut self,
		phase: ManagerPhase,
		mut handlers: Vec<Box<dyn LifecycleHandler>>,
		mut hook: impl FnMut(&mut dyn Extension) -> Option<Box<dyn LifecycleHandler>>,
	) -> Result<(), ManagerError> {
		self.phase = phase;
		for extension in &mut self.extensions {
			handlers.extend(hook(extension.as_mut()));
		}
		let mut ctx = LifecycleContext::new(phase, &self.settings, &mut self.store);
		run_phase(&self.extensions, &mut handlers, &mut ctx)?;
		debug!(%phase, extensions = self.extensions.len(), "phase complete");
		Ok(())
	}

	pub fn phase(&self) -> ManagerPhase {
		self.phase
	}

	pub fn settings(&self) -> &ManagerSettings {
		&self.settings
	}

	pub fn store(&self) -> &ManagerStore {
		&self.store
	}

	/// Extensions in priority order.
	pub fn extensions(&self) -> impl Iterator<Item = &dyn Extension> {
		self.extensions.iter().map(|extension| &**extension)
	}

	pub fn presets(&self) -> impl Iterator<Item = PresetRef<'_>> {
		self.presets
			.iter()
			.map(|preset| PresetRef::new(preset, &self.extensions))
	}

	/// The first extension of type `T`.
	pub fn get_extension<T: Extension>(&self) -> Result<&T, ManagerError> {
		self.extensions
			.iter()
			.find_map(|extension| extension.downcast_ref::<T>())
			.ok_or_else(|| ManagerError::ExtensionNotFound(std::any::type_name::<T>().to_string()))
	}

	pub fn get_extension_mut<T: Extension>(&mut self) -> Result<&mut T, ManagerError> {
		self.extensions
			.iter_mut()
			.find_map(|extension| extension.downcast_mut::<T>())
			.ok_or_else(|| ManagerError::ExtensionNotFound(std::any::type_name::<T>().to_string()))
	}

	pub fn get_extension_by_name(&self, name: &str) -> Result<&dyn Extension, ManagerError> {
		self.extension_index
			.get(name)
			.map(|&index| &*self.extensions[index])
			.ok_or_else(|| ManagerError::ExtensionNotFound(name.to_string()))
	}

	pub fn get_preset(&self, name: &str) -> Result<PresetRef<'_>, ManagerError> {
		self.preset_index
			.get(name)
			.map(|&index| PresetRef::new(&self.presets[index], &self.extensions))
			.ok_or_else(|| ManagerError::PresetNotFound(name.to_string()))
	}

	/// Binds the host view. Possible once, right after construction.
	pub fn add_view(&mut self, view: Rc<dyn EditorView>) -> Result<(), ManagerError> {
		if self.store.view.is_set() {
			return Err(ManagerError::ViewAlreadyAttached);
		}
		ensure_phase(
			self.phase,
			PhaseRequirement::Exactly(ManagerPhase::Initialize),
			"add_view",
		)?;
		let handlers: Vec<Box<dyn LifecycleHandler>> = vec![Box::new(ViewHandler::new(Rc::clone(&view)))];
		self.run(ManagerPhase::AddView, handlers, |extension| extension.on_view(&view))?;
		self.phase = ManagerPhase::Done;
		debug!("manager ready");
		Ok(())
	}

	/// A fresh editor state over `text` using the manager's schema and plugins.
	pub fn create_state(&self, text: &str) -> Result<EditorState, ManagerError> {
		ensure_phase(
			self.phase,
			PhaseRequirement::AtLeast(ManagerPhase::Initialize),
			"create_state",
		)?;
		let schema = Rc::clone(self.store.schema()?);
		let plugins = self.store.plugins()?.to_vec();
		Ok(EditorState::create(schema, Rope::from(text), plugins))
	}

	pub fn commands(&self) -> Result<Commands<'_>, ManagerError> {
		Commands::new(self.phase, self.store.commands(), self.store.view())
	}

	pub fn chain(&self) -> Result<Chain<'_>, ManagerError> {
		Ok(self.commands()?.chain())
	}

	pub fn helpers(&self) -> Result<Helpers<'_>, ManagerError> {
		Helpers::new(self.phase, self.store.helpers(), self.store.view())
	}

	/// State of the plugin with `key` in the view's current state.
	pub fn get_plugin_state(&self, key: &str) -> Result<Value, ManagerError> {
		ensure_phase(
			self.phase,
			PhaseRequirement::Exactly(ManagerPhase::Done),
			"get_plugin_state",
		)?;
		self.store
			.view()?
			.state()
			.plugin_state(key)
			.cloned()
			.ok_or_else(|| ManagerError::PluginStateNotFound(key.to_string()))
	}

	/// Reports an applied transaction to every extension, in priority order.
	pub fn on_transaction(&mut self, tr: &Transaction, state: &EditorState) -> Result<(), ManagerError> {
		ensure_phase(
			self.phase,
			PhaseRequirement::Exactly(ManagerPhase::Done),
			"on_transaction",
		)?;
		trace!(tx = %tr.id(), "transaction");
		for extension in &mut self.extensions {
			extension.on_transaction(tr, state);
		}
		Ok(())
	}

	/// Updates an extension's properties and notifies it of the keys that changed.
	pub fn set_properties(&mut self, name: &str, update: Map<String, Value>) -> Result<Vec<String>, ManagerError> {
		ensure_phase(
			self.phase,
			PhaseRequirement::AtLeast(ManagerPhase::Initialize),
			"set_properties",
		)?;
		let index = *self
			.extension_index
			.get(name)
			.ok_or_else(|| ManagerError::ExtensionNotFound(name.to_string()))?;
		let extension = &mut self.extensions[index];
		let changed = extension.core_mut().set_properties(update);
		if !changed.is_empty() {
			extension.on_set_properties(&changed);
		}
		Ok(changed)
	}

	/// Tears the manager down. Later calls do nothing.
	pub fn destroy(&mut self) {
		if self.phase == ManagerPhase::Destroy {
			return;
		}
		for extension in &mut self.extensions {
			extension.on_destroy();
		}
		self.phase = ManagerPhase::Destroy;
		self.store.view.take();
		debug!(extensions = self.extensions.len(), "manager destroyed");
	}

	/// Same extensions and presets in the same order with equal settings.
	///
	/// Closure-valued settings are not compared.
	pub fn is_equal(&self, other: &Self) -> bool {
		self.extensions.len() == other.extensions.len()
			&& self.presets.len() == other.presets.len()
			&& self
				.extensions
				.iter()
				.zip(&other.extensions)
				.all(|(a, b)| a.name() == b.name() && a.settings().eq_ignoring_functions(b.settings()))
			&& self
				.presets
				.iter()
				.zip(&other.presets)
				.all(|(a, b)| a.same_settings(b))
	}
}

impl Drop for Manager {
	fn drop(&mut self) {
		if self.constructed {
			self.destroy();
		}
	}
}

impl std::fmt::Debug for Manager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Manager")
			.field("phase", &self.phase)
			.field(
				"extensions",
				&self.extensions.iter().map(|e| e.name()).collect::<Vec<_>>(),
			)
			.field(
				"presets",
				&self.presets.iter().map(Preset::name).collect::<Vec<_>>(),
			)
			.field("store", &self.store)
			.finish()
	}
}
