use std::borrow::Borrow;
use std::rc::Rc;

use ropey::Rope;
use serde_json::Value;

use crate::range::CharIdx;
use crate::transaction::Transaction;
use crate::view::EditorView;

/// Unique key of a plugin within an editor state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PluginKey(String);

impl PluginKey {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for PluginKey {
	fn from(key: &str) -> Self {
		Self(key.to_string())
	}
}

impl From<String> for PluginKey {
	fn from(key: String) -> Self {
		Self(key)
	}
}

impl Borrow<str> for PluginKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for PluginKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// Handles a named key press. Returns true when the key was consumed.
pub type KeyDownHandler = Rc<dyn Fn(&dyn EditorView, &str) -> bool>;

/// Handles text about to replace `[from, to)`. Returns true when handled.
pub type TextInputHandler = Rc<dyn Fn(&dyn EditorView, CharIdx, CharIdx, &str) -> bool>;

/// Handles pasted plain text. Returns true when handled.
pub type PasteHandler = Rc<dyn Fn(&dyn EditorView, &str) -> bool>;

/// Plugin state carried by editor states.
#[derive(Clone)]
pub struct PluginState {
	/// Computes the initial value from the document.
	pub init: Rc<dyn Fn(&Rope) -> Value>,
	/// Computes the next value from an applied transaction and the previous value.
	pub apply: Rc<dyn Fn(&Transaction, &Value) -> Value>,
}

/// An editor plugin: a keyed bundle of props and optional state.
#[derive(Clone)]
pub struct Plugin {
	key: PluginKey,
	key_down: Option<KeyDownHandler>,
	text_input: Option<TextInputHandler>,
	paste: Option<PasteHandler>,
	state: Option<PluginState>,
}

impl Plugin {
	pub fn new(key: impl Into<PluginKey>) -> Self {
		Self {
			key: key.into(),
			key_down: None,
			text_input: None,
			paste: None,
			state: None,
		}
	}

	pub fn with_key_down(mut self, handler: impl Fn(&dyn EditorView, &str) -> bool + 'static) -> Self {
		self.key_down = Some(Rc::new(handler));
		self
	}

	pub fn with_text_input(
		mut self,
		handler: impl Fn(&dyn EditorView, CharIdx, CharIdx, &str) -> bool + 'static,
	) -> Self {
		self.text_input = Some(Rc::new(handler));
		self
	}

	pub fn with_paste(mut self, handler: impl Fn(&dyn EditorView, &str) -> bool + 'static) -> Self {
		self.paste = Some(Rc::new(handler));
		self
	}

	pub fn with_state(
		mut self,
		init: impl Fn(&Rope) -> Value + 'static,
		apply: impl Fn(&Transaction, &Value) -> Value + 'static,
	) -> Self {
		self.state = Some(PluginState {
			init: Rc::new(init),
			apply: Rc::new(apply),
		});
		self
	}

	pub fn key(&self) -> &PluginKey {
		&self.key
	}

	pub fn key_down(&self) -> Option<&KeyDownHandler> {
		self.key_down.as_ref()
	}

	pub fn text_input(&self) -> Option<&TextInputHandler> {
		self.text_input.as_ref()
	}

	pub fn paste(&self) -> Option<&PasteHandler> {
		self.paste.as_ref()
	}

	pub fn state(&self) -> Option<&PluginState> {
		self.state.as_ref()
	}
}

impl std::fmt::Debug for Plugin {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Plugin")
			.field("key", &self.key)
			.field("key_down", &self.key_down.is_some())
			.field("text_input", &self.text_input.is_some())
			.field("paste", &self.paste.is_some())
			.field("state", &self.state.is_some())
			.finish()
	}
}
