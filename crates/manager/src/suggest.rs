//! Trigger-character suggesters (mentions, tags, slash commands).

use quire_primitives::{CharIdx, EditorState, Range};
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::error::ManagerError;
use crate::extension::Extension;
use crate::lifecycle::{LifecycleContext, LifecycleHandler};

/// Watches for a trigger character followed by a query at the cursor.
#[derive(Debug, Clone)]
pub struct Suggester {
	name: String,
	trigger: char,
	/// Characters allowed in the query; word characters when `None`.
	supported: Option<Regex>,
	start_of_line: bool,
}

/// An active suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestMatch {
	pub suggester: String,
	/// Text typed after the trigger.
	pub query: String,
	/// From the trigger to the cursor.
	pub range: Range,
}

impl Suggester {
	pub fn new(name: impl Into<String>, trigger: char) -> Self {
		Self {
			name: name.into(),
			trigger,
			supported: None,
			start_of_line: false,
		}
	}

	/// Restricts query characters to those matching `pattern`.
	pub fn with_supported_characters(mut self, pattern: Regex) -> Self {
		self.supported = Some(pattern);
		self
	}

	/// Only match when the trigger starts a line.
	pub fn at_start_of_line(mut self) -> Self {
		self.start_of_line = true;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn trigger(&self) -> char {
		self.trigger
	}

	fn supports(&self, ch: char) -> bool {
		match &self.supported {
			Some(pattern) => pattern.is_match(ch.encode_utf8(&mut [0; 4])),
			None => ch.is_alphanumeric() || ch == '_',
		}
	}

	/// Looks for this suggester's trigger before the cursor.
	pub fn find_match(&self, state: &EditorState) -> Option<SuggestMatch> {
		let selection = state.selection();
		if !selection.is_empty() {
			return None;
		}
		let doc = state.doc();
		let cursor: CharIdx = selection.head();
		let mut pos = cursor;
		while pos > 0 {
			let ch = doc.char(pos - 1);
			if ch == self.trigger {
				let start = pos - 1;
				let boundary = start == 0 || {
					let before = doc.char(start - 1);
					before == '\n' || (!self.start_of_line && before.is_whitespace())
				};
				if !boundary {
					return None;
				}
				return Some(SuggestMatch {
					suggester: self.name.clone(),
					query: doc.slice(pos..cursor).to_string(),
					range: Range::new(start, cursor),
				});
			}
			if ch == '\n' || !self.supports(ch) {
				return None;
			}
			pos -= 1;
		}
		None
	}
}

/// First active suggestion among `suggesters`, in priority order.
pub fn find_active(suggesters: &[Suggester], state: &EditorState) -> Option<SuggestMatch> {
	suggesters.iter().find_map(|suggester| suggester.find_match(state))
}

#[derive(Default)]
pub(crate) struct SuggestersHandler {
	suggesters: Vec<Suggester>,
	names: FxHashSet<String>,
}

impl LifecycleHandler for SuggestersHandler {
	fn for_each_extension(
		&mut self,
		extension: &dyn Extension,
		ctx: &mut LifecycleContext<'_>,
	) -> Result<(), ManagerError> {
		if extension.settings().exclude.union(ctx.settings().exclude).suggestions {
			return Ok(());
		}
		for suggester in extension.create_suggesters(ctx.store()) {
			if !self.names.insert(suggester.name.clone()) {
				return Err(ManagerError::DuplicateSuggester {
					name: suggester.name,
					extension: extension.name(),
				});
			}
			self.suggesters.push(suggester);
		}
		Ok(())
	}

	fn after_extension_loop(&mut self, ctx: &mut LifecycleContext<'_>) -> Result<(), ManagerError> {
		ctx.store_mut().suggesters.set(std::mem::take(&mut self.suggesters))
	}
}
