//! Shared fixtures for manager integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use quire_manager::{
	CommandArgs, CommandError, CommandFn, CommandProps, Extension, ExtensionCore, KeyBindings, Manager, ManagerSettings,
	Module, Priority, module,
};
use quire_primitives::HeadlessView;

pub type Log = Rc<RefCell<Vec<String>>>;

/// A plain extension assembled from parts.
pub struct Fixture {
	pub core: ExtensionCore,
	pub commands: Vec<(String, CommandFn)>,
	pub keymap: KeyBindings,
	pub log: Log,
}

impl Fixture {
	pub fn new(name: &'static str, priority: i32) -> Self {
		Self {
			core: ExtensionCore::new(name).with_default_priority(Priority(priority)),
			commands: Vec::new(),
			keymap: KeyBindings::new(),
			log: Log::default(),
		}
	}

	pub fn requires(mut self, required: &[&'static str]) -> Self {
		self.core = self.core.with_required(required);
		self
	}

	pub fn command(mut self, name: &str, command: CommandFn) -> Self {
		self.commands.push((name.into(), command));
		self
	}

	pub fn logging_to(mut self, log: &Log) -> Self {
		self.log = Rc::clone(log);
		self
	}

	pub fn module(self) -> Module {
		module(self)
	}
}

impl Extension for Fixture {
	quire_manager::extension_core!();

	fn create_commands(&self, _store: &quire_manager::ManagerStore) -> Vec<(String, CommandFn)> {
		self.commands.clone()
	}

	fn create_keymap(&self, _store: &quire_manager::ManagerStore) -> KeyBindings {
		self.keymap.clone()
	}

	fn on_destroy(&mut self) {
		self.log.borrow_mut().push(format!("{}:destroy", self.core.name()));
	}
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Builds a manager and binds a headless view over `text`.
pub fn ready(modules: Vec<Module>, text: &str) -> (Manager, Rc<HeadlessView>) {
	init_tracing();
	let mut manager = Manager::create(modules, ManagerSettings::default()).unwrap();
	let view = Rc::new(HeadlessView::new(manager.create_state(text).unwrap()));
	manager.add_view(view.clone()).unwrap();
	(manager, view)
}

/// Inserts the string argument at the cursor.
pub fn insert() -> CommandFn {
	Rc::new(|args: &CommandArgs, props: &mut CommandProps<'_>| {
		let text = args
			.as_str()
			.ok_or_else(|| CommandError::InvalidArgs("expected a string".into()))?;
		if props.is_dry_run() {
			return Ok(true);
		}
		let head = props.tr.selection().head();
		props.tr.insert_text(head, text)?;
		props.dispatch_tr()?;
		Ok(true)
	})
}

/// Deletes the whole document; disabled when it is already empty.
pub fn clear() -> CommandFn {
	Rc::new(|_: &CommandArgs, props: &mut CommandProps<'_>| {
		let len = props.state.doc().len_chars();
		if len == 0 {
			return Ok(false);
		}
		if props.is_dry_run() {
			return Ok(true);
		}
		props.tr.delete(0, len)?;
		props.dispatch_tr()?;
		Ok(true)
	})
}
