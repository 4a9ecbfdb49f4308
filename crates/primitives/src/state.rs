use std::rc::Rc;

use ropey::Rope;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::plugin::{Plugin, PluginKey};
use crate::schema::Schema;
use crate::selection::Selection;
use crate::transaction::{StepError, Transaction, TxId};

/// Errors raised while applying edits to a state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
	/// The transaction was started from a different document.
	#[error("{tx} was built against a different document than the current state")]
	MismatchedBase { tx: TxId },
	#[error(transparent)]
	Step(#[from] StepError),
}

/// An immutable snapshot of the editor: document, selection and plugin state.
#[derive(Debug, Clone)]
pub struct EditorState {
	schema: Rc<Schema>,
	doc: Rope,
	selection: Selection,
	stored_marks: Vec<String>,
	plugins: Rc<[Plugin]>,
	plugin_states: FxHashMap<PluginKey, Value>,
}

impl EditorState {
	/// Creates a state with the cursor at the start of `doc`.
	pub fn create(schema: Rc<Schema>, doc: Rope, plugins: Vec<Plugin>) -> Self {
		let plugin_states = plugins
			.iter()
			.filter_map(|plugin| {
				let spec = plugin.state()?;
				Some((plugin.key().clone(), (spec.init)(&doc)))
			})
			.collect();
		Self {
			schema,
			doc,
			selection: Selection::default(),
			stored_marks: Vec::new(),
			plugins: plugins.into(),
			plugin_states,
		}
	}

	/// Returns a copy of this state with another selection.
	pub fn with_selection(mut self, selection: Selection) -> Self {
		self.selection = selection.clamp(self.doc.len_chars());
		self
	}

	pub fn schema(&self) -> &Rc<Schema> {
		&self.schema
	}

	pub fn doc(&self) -> &Rope {
		&self.doc
	}

	pub fn selection(&self) -> Selection {
		self.selection
	}

	pub fn stored_marks(&self) -> &[String] {
		&self.stored_marks
	}

	pub fn plugins(&self) -> &[Plugin] {
		&self.plugins
	}

	/// Shared handle to the plugin list, for callers that re-enter the view.
	pub fn plugins_shared(&self) -> Rc<[Plugin]> {
		Rc::clone(&self.plugins)
	}

	pub fn plugin_state(&self, key: &str) -> Option<&Value> {
		self.plugin_states.get(key)
	}

	/// Starts a transaction against this state.
	pub fn tr(&self) -> Transaction {
		Transaction::new(&self.doc, self.selection)
	}

	/// Produces the state that results from applying `tr`.
	pub fn apply(&self, tr: &Transaction) -> Result<Self, StateError> {
		if tr.before() != &self.doc {
			return Err(StateError::MismatchedBase { tx: tr.id() });
		}

		let stored_marks = match tr.stored_marks() {
			Some(marks) => marks.to_vec(),
			None if tr.doc_changed() => Vec::new(),
			None => self.stored_marks.clone(),
		};

		let mut plugin_states = FxHashMap::default();
		for plugin in self.plugins.iter() {
			let Some(spec) = plugin.state() else {
				continue;
			};
			let next = match self.plugin_states.get(plugin.key().as_str()) {
				Some(previous) => (spec.apply)(tr, previous),
				None => (spec.init)(tr.doc()),
			};
			plugin_states.insert(plugin.key().clone(), next);
		}

		Ok(Self {
			schema: Rc::clone(&self.schema),
			doc: tr.doc().clone(),
			selection: tr.selection(),
			stored_marks,
			plugins: Rc::clone(&self.plugins),
			plugin_states,
		})
	}
}
