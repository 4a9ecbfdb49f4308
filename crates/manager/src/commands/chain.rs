use std::cell::Cell;
use std::rc::Rc;

use quire_primitives::{EditorState, EditorView, Transaction};
use tracing::{trace, warn};

use super::{CommandArgs, CommandProps, CommandRegistry, Dispatch};
use crate::error::ManagerError;

/// Commands composed into one edit.
///
/// Every call records its changes in the same shared transaction. Nothing
/// reaches the view until [`Chain::run`], which dispatches the accumulated
/// edit once and starts over with a fresh one.
///
/// ```ignore
/// manager.chain()?.call("insert_text", json!("a"))?.call("select_all", json!(null))?.run()?;
/// ```
pub struct Chain<'m> {
	registry: &'m CommandRegistry,
	view: &'m Rc<dyn EditorView>,
	tr: Transaction,
	queued: Vec<(String, CommandArgs)>,
}

impl<'m> Chain<'m> {
	pub(crate) fn new(registry: &'m CommandRegistry, view: &'m Rc<dyn EditorView>) -> Self {
		let tr = view.state().tr();
		Self {
			registry,
			view,
			tr,
			queued: Vec::new(),
		}
	}

	/// The shared edit accumulated so far.
	pub fn transaction(&self) -> &Transaction {
		&self.tr
	}

	/// Names of the commands called since the last run.
	pub fn queued(&self) -> impl Iterator<Item = &str> {
		self.queued.iter().map(|(name, _)| name.as_str())
	}

	fn is_stale(&self, state: &EditorState) -> bool {
		self.tr.before() != state.doc()
	}

	/// Runs `name` against the shared edit.
	///
	/// If the view's document changed since the shared edit was started, the
	/// edit is discarded and a fresh one started first. A command that
	/// dispatches any edit other than the shared one fails the chain. When
	/// the command fails, whatever it wrote to the shared edit is rolled back.
	pub fn call(&mut self, name: &str, args: CommandArgs) -> Result<&mut Self, ManagerError> {
		let entry = self.registry.lookup(name)?;
		let view: &dyn EditorView = self.view.as_ref();
		let base = view.state();
		if self.is_stale(&base) {
			warn!(
				command = name,
				discarded = %self.tr.id(),
				steps = self.tr.steps().len(),
				"chained edit is stale; starting a new one"
			);
			self.tr = base.tr();
			self.queued.clear();
		}

		let state = base.apply(&self.tr)?;
		let shared = self.tr.id();
		let checkpoint = self.tr.clone();
		let violation = Cell::new(None);
		let mut props = CommandProps {
			state: &state,
			tr: &mut self.tr,
			dispatch: Some(Dispatch::chain(shared, &violation)),
			view: Some(view),
		};
		let result = (entry.command)(&args, &mut props);

		if let Some(received) = violation.get() {
			self.tr = checkpoint;
			return Err(ManagerError::ChainDiscipline {
				command: name.to_string(),
				expected: shared,
				received,
			});
		}
		let handled = match result {
			Ok(handled) => handled,
			Err(source) => {
				trace!(command = name, tx = %shared, "rolling back failed chained command");
				self.tr = checkpoint;
				return Err(ManagerError::Command {
					command: name.to_string(),
					source,
				});
			}
		};
		trace!(command = name, handled, tx = %shared, "chained command");
		self.queued.push((name.to_string(), args));
		Ok(self)
	}

	/// Dry-runs `name` against the state including the shared edit.
	pub fn is_enabled(&self, name: &str, args: CommandArgs) -> Result<bool, ManagerError> {
		let entry = self.registry.lookup(name)?;
		let view: &dyn EditorView = self.view.as_ref();
		let base = view.state();
		let (state, mut scratch) = if self.is_stale(&base) {
			let scratch = base.tr();
			(base, scratch)
		} else {
			(base.apply(&self.tr)?, self.tr.clone())
		};
		let mut props = CommandProps {
			state: &state,
			tr: &mut scratch,
			dispatch: None,
			view: Some(view),
		};
		(entry.command)(&args, &mut props).map_err(|source| ManagerError::Command {
			command: name.to_string(),
			source,
		})
	}

	/// Dry-runs every command called since the last run against the view's
	/// current state. True only if all of them are enabled.
	pub fn enabled(&self) -> Result<bool, ManagerError> {
		let view: &dyn EditorView = self.view.as_ref();
		let state = view.state();
		for (name, args) in &self.queued {
			let entry = self.registry.lookup(name)?;
			let mut scratch = state.tr();
			let mut props = CommandProps {
				state: &state,
				tr: &mut scratch,
				dispatch: None,
				view: Some(view),
			};
			let enabled = (entry.command)(args, &mut props).map_err(|source| ManagerError::Command {
				command: name.clone(),
				source,
			})?;
			if !enabled {
				return Ok(false);
			}
		}
		Ok(true)
	}

	/// Dispatches the shared edit and starts a fresh one.
	///
	/// Returns whether anything was dispatched. An empty edit is dropped, and
	/// so is a stale one whose base no longer matches the view's document; in
	/// both cases the result is `false` and the queued commands are forgotten.
	/// Calling `run` again right away therefore returns `false`.
	pub fn run(&mut self) -> Result<bool, ManagerError> {
		let state = self.view.state();
		let fresh = state.tr();
		let tr = std::mem::replace(&mut self.tr, fresh);
		let commands = std::mem::take(&mut self.queued).len();
		if tr.is_empty() {
			trace!(commands, "chain run with nothing to dispatch");
			return Ok(false);
		}
		if tr.before() != state.doc() {
			warn!(tx = %tr.id(), commands, "dropping stale chained edit");
			return Ok(false);
		}
		trace!(tx = %tr.id(), commands, "dispatching chain");
		self.view.dispatch(tr)?;
		let state = self.view.state();
		self.tr = state.tr();
		Ok(true)
	}
}

impl std::fmt::Debug for Chain<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Chain")
			.field("tr", &self.tr.id())
			.field("queued", &self.queued)
			.finish_non_exhaustive()
	}
}
