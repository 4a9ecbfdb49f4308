//! Configurable extension used by unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use quire_primitives::{EditorView, HeadlessView, Plugin};

use crate::commands::{CommandArgs, CommandFn, CommandProps};
use crate::error::CommandError;
use crate::extension::{Extension, ExtensionCore, ExtensionKind};
use crate::keymap::KeyBindings;
use crate::lifecycle::LifecycleHandler;
use crate::priority::Priority;
use crate::settings::AttributeGroup;
use crate::store::ManagerStore;
use crate::{EditorAttributes, Manager, Module, NodeViewFactory};

pub(crate) type EventLog = Rc<RefCell<Vec<String>>>;

pub(crate) struct Stub {
	pub core: ExtensionCore,
	pub kind: ExtensionKind,
	pub commands: Vec<(String, CommandFn)>,
	pub plugin_key: Option<&'static str>,
	pub keymap: KeyBindings,
	pub attributes: EditorAttributes,
	pub node_views: Vec<(String, NodeViewFactory)>,
	pub schema_attributes: Vec<AttributeGroup>,
	pub create_handler: Option<Box<dyn Fn() -> Box<dyn LifecycleHandler>>>,
	pub initialize_handler: Option<Box<dyn Fn() -> Box<dyn LifecycleHandler>>>,
	pub log: EventLog,
}

impl Stub {
	pub fn new(name: &'static str, priority: i32) -> Self {
		Self {
			core: ExtensionCore::new(name).with_default_priority(Priority(priority)),
			kind: ExtensionKind::Plain,
			commands: Vec::new(),
			plugin_key: None,
			keymap: KeyBindings::new(),
			attributes: EditorAttributes::new(),
			node_views: Vec::new(),
			schema_attributes: Vec::new(),
			create_handler: None,
			initialize_handler: None,
			log: EventLog::default(),
		}
	}

	pub fn with_kind(mut self, kind: ExtensionKind) -> Self {
		self.kind = kind;
		self
	}

	pub fn required(mut self, required: &[&'static str]) -> Self {
		self.core = self.core.with_required(required);
		self
	}

	pub fn command(mut self, name: &str, command: CommandFn) -> Self {
		self.commands.push((name.to_string(), command));
		self
	}

	pub fn plugin(mut self, key: &'static str) -> Self {
		self.plugin_key = Some(key);
		self
	}

	pub fn log(mut self, log: &EventLog) -> Self {
		self.log = Rc::clone(log);
		self
	}

	pub fn module(self) -> Module {
		Module::Extension(Box::new(self))
	}
}

impl Extension for Stub {
	crate::extension_core!();

	fn kind(&self) -> ExtensionKind {
		self.kind.clone()
	}

	fn create_schema_attributes(&self) -> Vec<AttributeGroup> {
		self.schema_attributes.clone()
	}

	fn create_commands(&self, _store: &ManagerStore) -> Vec<(String, CommandFn)> {
		self.commands.clone()
	}

	fn create_plugin(&self, _store: &ManagerStore) -> Option<Plugin> {
		self.plugin_key.map(Plugin::new)
	}

	fn create_keymap(&self, _store: &ManagerStore) -> KeyBindings {
		self.keymap.clone()
	}

	fn create_attributes(&self, _store: &ManagerStore) -> EditorAttributes {
		self.attributes.clone()
	}

	fn create_node_views(&self, _store: &ManagerStore) -> Vec<(String, NodeViewFactory)> {
		self.node_views.clone()
	}

	fn on_create(&mut self) -> Option<Box<dyn LifecycleHandler>> {
		self.create_handler.as_ref().map(|make| make())
	}

	fn on_initialize(&mut self) -> Option<Box<dyn LifecycleHandler>> {
		self.initialize_handler.as_ref().map(|make| make())
	}

	fn on_view(&mut self, _view: &Rc<dyn EditorView>) -> Option<Box<dyn LifecycleHandler>> {
		self.log.borrow_mut().push(format!("{}:view", self.core.name()));
		None
	}

	fn on_destroy(&mut self) {
		self.log.borrow_mut().push(format!("{}:destroy", self.core.name()));
	}
}

/// Attaches a headless view over `text`.
pub(crate) fn with_view(manager: &mut Manager, text: &str) -> Rc<HeadlessView> {
	let view = Rc::new(HeadlessView::new(manager.create_state(text).unwrap()));
	manager.add_view(view.clone()).unwrap();
	view
}

/// Inserts the string argument at the cursor.
pub(crate) fn insert_command() -> CommandFn {
	Rc::new(|args: &CommandArgs, props: &mut CommandProps<'_>| {
		let Some(text) = args.as_str() else {
			return Err(CommandError::InvalidArgs("expected a string".into()));
		};
		if props.is_dry_run() {
			return Ok(true);
		}
		let pos = props.tr.selection().head();
		props.tr.insert_text(pos, text)?;
		props.dispatch_tr()?;
		Ok(true)
	})
}

/// Enabled only when the document is empty.
pub(crate) fn only_when_empty() -> CommandFn {
	Rc::new(|_: &CommandArgs, props: &mut CommandProps<'_>| {
		if props.state.doc().len_chars() > 0 {
			return Ok(false);
		}
		props.dispatch_tr()?;
		Ok(true)
	})
}

/// Dispatches an edit of its own instead of the one it was given.
pub(crate) fn rogue_command() -> CommandFn {
	Rc::new(|_: &CommandArgs, props: &mut CommandProps<'_>| {
		let mut own = props.state.tr();
		own.insert_text(0, "!")?;
		if let Some(dispatch) = &props.dispatch {
			dispatch.call(&own)?;
		}
		Ok(true)
	})
}

/// Writes to the shared edit, then gives up.
pub(crate) fn half_done_command() -> CommandFn {
	Rc::new(|_: &CommandArgs, props: &mut CommandProps<'_>| {
		if props.is_dry_run() {
			return Ok(true);
		}
		props.tr.insert_text(0, "X")?;
		Err(CommandError::Failed("gave up".into()))
	})
}

/// Writes to the shared edit, then dispatches a different one.
pub(crate) fn meddling_command() -> CommandFn {
	Rc::new(|_: &CommandArgs, props: &mut CommandProps<'_>| {
		props.tr.insert_text(0, "X")?;
		let mut own = props.state.tr();
		own.insert_text(0, "!")?;
		if let Some(dispatch) = &props.dispatch {
			dispatch.call(&own)?;
		}
		Ok(true)
	})
}
