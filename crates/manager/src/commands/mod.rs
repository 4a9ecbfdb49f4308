//! Command registry and invocation.
//!
//! A command receives its arguments and a [`CommandProps`]. Without a
//! dispatch it is a dry run: it reports whether it could run and must leave
//! the document alone. With a dispatch it records its changes in `props.tr` and
//! hands the edit to [`CommandProps::dispatch_tr`].

use std::cell::Cell;
use std::rc::Rc;

use indexmap::IndexMap;
use quire_primitives::{EditorState, EditorView, Transaction, TxId};
use serde_json::Value;
use tracing::trace;

use crate::error::{CommandError, ManagerError};
use crate::extension::Extension;
use crate::lifecycle::{LifecycleContext, LifecycleHandler};
use crate::phase::{ManagerPhase, PhaseRequirement, ensure_phase};

mod chain;

pub use chain::Chain;


/// Arguments passed to a command.
pub type CommandArgs = Value;

/// A command executor.
pub type CommandFn = Rc<dyn Fn(&CommandArgs, &mut CommandProps<'_>) -> Result<bool, CommandError>>;

/// Names commands can never take.
pub const RESERVED_COMMAND_NAMES: &[&str] = &["run", "chain", "new", "tr", "enabled"];

/// Where a dispatched edit goes.
#[derive(Clone, Copy)]
enum DispatchTarget<'a> {
	/// Applied to the view immediately.
	View(&'a dyn EditorView),
	/// Accepted only if it is the chain's shared edit; the chain dispatches later.
	Chain {
		shared: TxId,
		violation: &'a Cell<Option<TxId>>,
	},
}

/// Handle a command uses to dispatch its edit.
#[derive(Clone, Copy)]
pub struct Dispatch<'a> {
	target: DispatchTarget<'a>,
}

impl<'a> Dispatch<'a> {
	pub(crate) fn view(view: &'a dyn EditorView) -> Self {
		Self {
			target: DispatchTarget::View(view),
		}
	}

	pub(crate) fn chain(shared: TxId, violation: &'a Cell<Option<TxId>>) -> Self {
		Self {
			target: DispatchTarget::Chain { shared, violation },
		}
	}

	pub fn call(&self, tr: &Transaction) -> Result<(), CommandError> {
		match self.target {
			DispatchTarget::View(view) => Ok(view.dispatch(tr.clone())?),
			DispatchTarget::Chain { shared, violation } => {
				if tr.id() == shared {
					return Ok(());
				}
				violation.set(Some(tr.id()));
				Err(CommandError::ForeignTransaction {
					expected: shared,
					received: tr.id(),
				})
			}
		}
	}
}

impl std::fmt::Debug for Dispatch<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.target {
			DispatchTarget::View(_) => f.write_str("Dispatch::View"),
			DispatchTarget::Chain { shared, .. } => write!(f, "Dispatch::Chain({shared})"),
		}
	}
}

/// Everything a command sees while it runs.
pub struct CommandProps<'a> {
	/// State the command reads. In a chain this already includes the shared edit.
	pub state: &'a EditorState,
	/// Edit the command records its changes in.
	pub tr: &'a mut Transaction,
	/// `None` during a dry run.
	pub dispatch: Option<Dispatch<'a>>,
	pub view: Option<&'a dyn EditorView>,
}

impl CommandProps<'_> {
	pub fn is_dry_run(&self) -> bool {
		self.dispatch.is_none()
	}

	/// Dispatches `tr` unless this is a dry run.
	pub fn dispatch_tr(&self) -> Result<(), CommandError> {
		match &self.dispatch {
			Some(dispatch) => dispatch.call(&*self.tr),
			None => Ok(()),
		}
	}
}

/// A registered command and the extension that contributed it.
#[derive(Clone)]
pub struct CommandEntry {
	pub extension: &'static str,
	pub command: CommandFn,
}

impl std::fmt::Debug for CommandEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CommandEntry")
			.field("extension", &self.extension)
			.finish_non_exhaustive()
	}
}

/// All commands, keyed by name in registration order.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
	entries: IndexMap<String, CommandEntry>,
}

impl CommandRegistry {
	/// Registers `command`. Names are global across extensions.
	pub fn insert(&mut self, name: String, extension: &'static str, command: CommandFn) -> Result<(), ManagerError> {
		if RESERVED_COMMAND_NAMES.contains(&name.as_str()) {
			return Err(ManagerError::ReservedCommandName {
				command: name,
				extension,
			});
		}
		if let Some(existing) = self.entries.get(&name) {
			return Err(ManagerError::DuplicateCommand {
				command: name,
				extension,
				existing: existing.extension,
			});
		}
		self.entries.insert(name, CommandEntry { extension, command });
		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<&CommandEntry> {
		self.entries.get(name)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub(crate) fn lookup(&self, name: &str) -> Result<&CommandEntry, ManagerError> {
		self.get(name)
			.ok_or_else(|| ManagerError::UnknownCommand(name.to_string()))
	}
}

/// The `Initialize` handler producing the [`CommandRegistry`].
#[derive(Default)]
pub(crate) struct CommandsHandler {
	registry: CommandRegistry,
}

impl LifecycleHandler for CommandsHandler {
	fn for_each_extension(
		&mut self,
		extension: &dyn Extension,
		ctx: &mut LifecycleContext<'_>,
	) -> Result<(), ManagerError> {
		for (name, command) in extension.create_commands(ctx.store()) {
			self.registry.insert(name, extension.name(), command)?;
		}
		Ok(())
	}

	fn after_extension_loop(&mut self, ctx: &mut LifecycleContext<'_>) -> Result<(), ManagerError> {
		ctx.store_mut().commands.set(std::mem::take(&mut self.registry))
	}
}

/// Unchained command invocation, bound to the manager's view.
pub struct Commands<'m> {
	registry: &'m CommandRegistry,
	view: &'m Rc<dyn EditorView>,
}

impl<'m> Commands<'m> {
	pub(crate) fn new(
		phase: ManagerPhase,
		registry: Result<&'m CommandRegistry, ManagerError>,
		view: Result<&'m Rc<dyn EditorView>, ManagerError>,
	) -> Result<Self, ManagerError> {
		ensure_phase(phase, PhaseRequirement::Exactly(ManagerPhase::Done), "commands")?;
		Ok(Self {
			registry: registry?,
			view: view?,
		})
	}

	/// Runs `name` against the current view state.
	///
	/// Focuses the view, starts a fresh edit and lets the command dispatch it.
	/// Returns whether the command reported success.
	pub fn run(&self, name: &str, args: CommandArgs) -> Result<bool, ManagerError> {
		let entry = self.registry.lookup(name)?;
		let view: &dyn EditorView = self.view.as_ref();
		view.focus();
		let state = view.state();
		let mut tr = state.tr();
		let mut props = CommandProps {
			state: &state,
			tr: &mut tr,
			dispatch: Some(Dispatch::view(view)),
			view: Some(view),
		};
		let handled = (entry.command)(&args, &mut props).map_err(|source| ManagerError::Command {
			command: name.to_string(),
			source,
		})?;
		trace!(command = name, handled, "ran command");
		Ok(handled)
	}

	/// Dry-runs `name`; the document is never touched.
	pub fn is_enabled(&self, name: &str, args: CommandArgs) -> Result<bool, ManagerError> {
		let entry = self.registry.lookup(name)?;
		let view: &dyn EditorView = self.view.as_ref();
		let state = view.state();
		let mut tr = state.tr();
		let mut props = CommandProps {
			state: &state,
			tr: &mut tr,
			dispatch: None,
			view: Some(view),
		};
		(entry.command)(&args, &mut props).map_err(|source| ManagerError::Command {
			command: name.to_string(),
			source,
		})
	}

	pub fn names(&self) -> impl Iterator<Item = &'m str> + use<'m> {
		self.registry.names()
	}

	/// Starts a chain sharing one edit across commands.
	pub fn chain(&self) -> Chain<'m> {
		Chain::new(self.registry, self.view)
	}
}

impl std::fmt::Debug for Commands<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Commands")
			.field("registry", self.registry)
			.finish_non_exhaustive()
	}
}
