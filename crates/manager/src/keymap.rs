//! Keymap merging.
//!
//! Every extension may bind handlers to key names. Bindings for the same key
//! from different extensions form a chain in priority order. A handler that
//! returns true stops the chain; one that returns false lets the next handler
//! try. Calling [`KeyBindingProps::next`] runs the rest of the chain right
//! away, and the handler's own return value then decides the outcome.

use std::cell::Cell;
use std::rc::Rc;

use indexmap::IndexMap;
use quire_primitives::{EditorState, EditorView, Plugin, StateError, Transaction};
use smallvec::SmallVec;
use tracing::trace;

/// Key of the merged keymap plugin.
pub const KEYMAP_PLUGIN_KEY: &str = "keymap";

/// A key handler. Returns true when the key was handled.
pub type KeyBindingFn = Rc<dyn Fn(&KeyBindingProps<'_>) -> bool>;

/// Key name to handler, as contributed by one extension.
pub type KeyBindings = IndexMap<String, KeyBindingFn>;

type HandlerChain = SmallVec<[KeyBindingFn; 2]>;

/// What a key handler sees.
pub struct KeyBindingProps<'a> {
	pub state: &'a EditorState,
	pub view: &'a dyn EditorView,
	next: &'a dyn Fn() -> bool,
}

impl KeyBindingProps<'_> {
	/// Runs the lower-priority handlers bound to the same key.
	pub fn next(&self) -> bool {
		(self.next)()
	}

	pub fn dispatch(&self, tr: Transaction) -> Result<(), StateError> {
		self.view.dispatch(tr)
	}
}

/// Merges keymaps from every extension into a single plugin.
#[derive(Default)]
pub struct KeymapBuilder {
	chains: IndexMap<String, HandlerChain>,
}

impl KeymapBuilder {
	/// Appends `bindings`. Call in priority order, highest precedence first.
	pub fn add(&mut self, bindings: KeyBindings) {
		for (key, handler) in bindings {
			self.chains.entry(key).or_default().push(handler);
		}
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.chains.keys().map(String::as_str)
	}

	pub fn build(self) -> Plugin {
		let chains = Rc::new(self.chains);
		Plugin::new(KEYMAP_PLUGIN_KEY).with_key_down(move |view, key| {
			let Some(chain) = chains.get(key) else {
				return false;
			};
			let handled = run_chain(chain, view);
			trace!(key, handled, handlers = chain.len(), "keymap");
			handled
		})
	}
}

fn run_chain(handlers: &[KeyBindingFn], view: &dyn EditorView) -> bool {
	let Some((first, rest)) = handlers.split_first() else {
		return false;
	};
	let next_result = Cell::new(None);
	let next = || {
		if let Some(handled) = next_result.get() {
			return handled;
		}
		let handled = run_chain(rest, view);
		next_result.set(Some(handled));
		handled
	};
	let state = view.state();
	let props = KeyBindingProps {
		state: &state,
		view,
		next: &next,
	};
	let handled = first(&props);
	if next_result.get().is_some() || handled {
		return handled;
	}
	run_chain(rest, view)
}
