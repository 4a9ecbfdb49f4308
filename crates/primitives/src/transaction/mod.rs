use std::sync::atomic::{AtomicU64, Ordering};

use ropey::Rope;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::range::CharIdx;
use crate::selection::Selection;

mod step;

pub use step::{Step, StepError};

#[cfg(test)]
mod tests;

static NEXT_TX_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a transaction.
///
/// Every [`Transaction::new`] call allocates a fresh id; clones share it. The
/// manager's chained commands use it to recognise the shared edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxId(u64);

impl TxId {
	fn next() -> Self {
		Self(NEXT_TX_ID.fetch_add(1, Ordering::Relaxed))
	}

	/// Returns the underlying value.
	pub fn as_u64(self) -> u64 {
		self.0
	}
}

impl std::fmt::Display for TxId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "tx#{}", self.0)
	}
}

/// An atomic, composable description of a document mutation.
///
/// A transaction remembers the document it was started from (`before`) and
/// accumulates steps against a working copy. States only accept transactions
/// whose `before` document equals their own document.
#[derive(Debug, Clone)]
pub struct Transaction {
	id: TxId,
	before: Rope,
	doc: Rope,
	steps: Vec<Step>,
	selection: Selection,
	selection_set: bool,
	stored_marks: Option<Vec<String>>,
	meta: FxHashMap<String, Value>,
}

impl Transaction {
	/// Starts a transaction against `doc` with the given selection.
	pub fn new(doc: &Rope, selection: Selection) -> Self {
		Self {
			id: TxId::next(),
			before: doc.clone(),
			doc: doc.clone(),
			steps: Vec::new(),
			selection: selection.clamp(doc.len_chars()),
			selection_set: false,
			stored_marks: None,
			meta: FxHashMap::default(),
		}
	}

	pub fn id(&self) -> TxId {
		self.id
	}

	/// The document this transaction was started from.
	pub fn before(&self) -> &Rope {
		&self.before
	}

	/// The document with every step applied.
	pub fn doc(&self) -> &Rope {
		&self.doc
	}

	pub fn steps(&self) -> &[Step] {
		&self.steps
	}

	/// The selection after every step, mapped or explicitly set.
	pub fn selection(&self) -> Selection {
		self.selection
	}

	/// Returns true if the selection was set explicitly.
	pub fn selection_set(&self) -> bool {
		self.selection_set
	}

	pub fn stored_marks(&self) -> Option<&[String]> {
		self.stored_marks.as_deref()
	}

	/// Returns true if any step changed the document.
	pub fn doc_changed(&self) -> bool {
		!self.steps.is_empty()
	}

	/// Returns true if applying the transaction would change nothing at all.
	pub fn is_empty(&self) -> bool {
		!self.doc_changed()
			&& !self.selection_set
			&& self.stored_marks.is_none()
			&& self.meta.is_empty()
	}

	/// Applies a step to the working document and maps the selection through it.
	pub fn step(&mut self, step: Step) -> Result<&mut Self, StepError> {
		if step.is_noop() {
			return Ok(self);
		}
		step.apply(&mut self.doc)?;
		self.selection = self.selection.map(&step);
		self.steps.push(step);
		Ok(self)
	}

	/// Replaces `[from, to)` with `text`.
	pub fn replace(&mut self, from: CharIdx, to: CharIdx, text: &str) -> Result<&mut Self, StepError> {
		self.step(Step::replace(from, to, text))
	}

	/// Inserts `text` at `pos`.
	pub fn insert_text(&mut self, pos: CharIdx, text: &str) -> Result<&mut Self, StepError> {
		self.replace(pos, pos, text)
	}

	/// Deletes `[from, to)`.
	pub fn delete(&mut self, from: CharIdx, to: CharIdx) -> Result<&mut Self, StepError> {
		self.replace(from, to, "")
	}

	/// Sets the selection explicitly. Later steps still map it.
	pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
		self.selection = selection.clamp(self.doc.len_chars());
		self.selection_set = true;
		self
	}

	/// Sets the marks applied to the next typed text.
	pub fn set_stored_marks(&mut self, marks: Vec<String>) -> &mut Self {
		self.stored_marks = Some(marks);
		self
	}

	/// Attaches metadata for plugins and transaction hooks.
	pub fn set_meta(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
		self.meta.insert(key.into(), value);
		self
	}

	pub fn meta(&self, key: &str) -> Option<&Value> {
		self.meta.get(key)
	}
}
