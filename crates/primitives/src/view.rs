use std::cell::{Cell, RefCell};

use tracing::trace;

use crate::selection::Selection;
use crate::state::{EditorState, StateError};
use crate::transaction::Transaction;

/// The host view contract.
///
/// The host owns the view. Methods take `&self`; implementations keep their
/// state behind interior mutability so plugins can re-enter the view while a
/// key press or command is being handled.
pub trait EditorView {
	/// Returns the current state.
	fn state(&self) -> EditorState;
	/// Applies `tr` to the current state and makes the result current.
	fn dispatch(&self, tr: Transaction) -> Result<(), StateError>;
	/// Moves input focus into the editor.
	fn focus(&self);
	/// Whether the editor currently accepts edits.
	fn editable(&self) -> bool;
}

/// A view without rendering, used by tests and non-visual hosts.
///
/// Key presses, typed text and pastes are routed through the plugin chain of
/// the current state in plugin order.
#[derive(Debug)]
pub struct HeadlessView {
	state: RefCell<EditorState>,
	focused: Cell<bool>,
	editable: Cell<bool>,
	dispatched: RefCell<Vec<Transaction>>,
}

impl HeadlessView {
	pub fn new(state: EditorState) -> Self {
		Self {
			state: RefCell::new(state),
			focused: Cell::new(false),
			editable: Cell::new(true),
			dispatched: RefCell::new(Vec::new()),
		}
	}

	pub fn is_focused(&self) -> bool {
		self.focused.get()
	}

	pub fn set_editable(&self, editable: bool) {
		self.editable.set(editable);
	}

	/// Drains the transactions dispatched since the last call.
	///
	/// Hosts forward these to the manager's transaction hook once the
	/// triggering command has returned.
	pub fn take_dispatched(&self) -> Vec<Transaction> {
		std::mem::take(&mut *self.dispatched.borrow_mut())
	}

	/// Routes a named key press through the plugins.
	pub fn press_key(&self, key: &str) -> bool {
		if !self.editable.get() {
			return false;
		}
		let plugins = self.state.borrow().plugins_shared();
		let handled = plugins
			.iter()
			.filter_map(|plugin| plugin.key_down())
			.any(|handler| handler(self, key));
		trace!(key, handled, "key press");
		handled
	}

	/// Types `text` over the current selection.
	///
	/// Text input handlers get the first chance; unhandled text is inserted.
	pub fn type_text(&self, text: &str) -> Result<(), StateError> {
		if !self.editable.get() {
			return Ok(());
		}
		let (plugins, selection) = {
			let state = self.state.borrow();
			(state.plugins_shared(), state.selection())
		};
		let handled = plugins
			.iter()
			.filter_map(|plugin| plugin.text_input())
			.any(|handler| handler(self, selection.from(), selection.to(), text));
		if handled {
			return Ok(());
		}
		let mut tr = self.state().tr();
		tr.replace(selection.from(), selection.to(), text)?;
		self.dispatch(tr)
	}

	/// Pastes plain text over the current selection.
	pub fn paste(&self, text: &str) -> Result<(), StateError> {
		if !self.editable.get() {
			return Ok(());
		}
		let plugins = self.state.borrow().plugins_shared();
		let handled = plugins
			.iter()
			.filter_map(|plugin| plugin.paste())
			.any(|handler| handler(self, text));
		if handled {
			return Ok(());
		}
		let state = self.state();
		let selection = state.selection();
		let mut tr = state.tr();
		tr.replace(selection.from(), selection.to(), text)?;
		self.dispatch(tr)
	}

	/// Moves the selection without changing the document.
	pub fn select(&self, selection: Selection) -> Result<(), StateError> {
		let mut tr = self.state().tr();
		tr.set_selection(selection);
		self.dispatch(tr)
	}
}

impl EditorView for HeadlessView {
	fn state(&self) -> EditorState {
		self.state.borrow().clone()
	}

	fn dispatch(&self, tr: Transaction) -> Result<(), StateError> {
		let next = self.state.borrow().apply(&tr)?;
		*self.state.borrow_mut() = next;
		trace!(tx = %tr.id(), steps = tr.steps().len(), "dispatched");
		self.dispatched.borrow_mut().push(tr);
		Ok(())
	}

	fn focus(&self) {
		self.focused.set(true);
	}

	fn editable(&self) -> bool {
		self.editable.get()
	}
}
