//! Input rules rewrite text as it is typed; paste rules rewrite pasted text.

use std::rc::Rc;

use regex::{Captures, Regex};
use tracing::warn;

use crate::plugin::Plugin;
use crate::range::CharIdx;
use crate::selection::Selection;
use crate::state::EditorState;
use crate::transaction::Transaction;
use crate::view::EditorView;

/// How far back (in characters) input rules look for a match.
const MAX_MATCH: usize = 500;

/// Builds the edit for a matched input rule.
///
/// Receives the state before the typed text is inserted, the captures, and the
/// `[start, end)` range of the match in the current document. The typed text is
/// part of the match but not of the document; returning `None` lets the text be
/// inserted normally.
pub type InputRuleHandler = Rc<dyn Fn(&EditorState, &Captures<'_>, CharIdx, CharIdx) -> Option<Transaction>>;

/// Rewrites matched pasted text.
pub type PasteTransform = Rc<dyn Fn(&Captures<'_>) -> String>;

#[derive(Clone)]
pub struct InputRule {
	pattern: Regex,
	handler: InputRuleHandler,
}

impl InputRule {
	/// The pattern should be anchored with `$`; only matches ending at the
	/// cursor are considered.
	pub fn new(
		pattern: Regex,
		handler: impl Fn(&EditorState, &Captures<'_>, CharIdx, CharIdx) -> Option<Transaction> + 'static,
	) -> Self {
		Self {
			pattern,
			handler: Rc::new(handler),
		}
	}

	/// A rule replacing the whole match with fixed text.
	pub fn text(pattern: Regex, replacement: impl Into<String>) -> Self {
		let replacement = replacement.into();
		Self::new(pattern, move |state, _, start, end| {
			let mut tr = state.tr();
			tr.replace(start, end, &replacement).ok()?;
			Some(tr)
		})
	}

	pub fn pattern(&self) -> &Regex {
		&self.pattern
	}
}

impl std::fmt::Debug for InputRule {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("InputRule").field("pattern", &self.pattern.as_str()).finish()
	}
}

#[derive(Clone)]
pub struct PasteRule {
	pattern: Regex,
	transform: PasteTransform,
}

impl PasteRule {
	pub fn new(pattern: Regex, transform: impl Fn(&Captures<'_>) -> String + 'static) -> Self {
		Self {
			pattern,
			transform: Rc::new(transform),
		}
	}

	pub fn pattern(&self) -> &Regex {
		&self.pattern
	}
}

impl std::fmt::Debug for PasteRule {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PasteRule").field("pattern", &self.pattern.as_str()).finish()
	}
}

/// Combines input rules into one plugin. The first matching rule wins.
pub fn input_rules_plugin(rules: Vec<InputRule>) -> Plugin {
	let rules: Rc<[InputRule]> = rules.into();
	Plugin::new("input_rules").with_text_input(move |view, from, to, text| {
		run_input_rules(&rules, view, from, to, text)
	})
}

fn run_input_rules(
	rules: &[InputRule],
	view: &dyn EditorView,
	from: CharIdx,
	to: CharIdx,
	text: &str,
) -> bool {
	let state = view.state();
	let window_start = from.saturating_sub(MAX_MATCH);
	let mut before = state.doc().slice(window_start..from).to_string();
	before.push_str(text);
	let typed = text.chars().count();

	for rule in rules {
		let Some(captures) = rule.pattern.captures(&before) else {
			continue;
		};
		let Some(whole) = captures.get(0) else {
			continue;
		};
		if whole.end() != before.len() {
			continue;
		}
		let matched = before[whole.start()..].chars().count();
		let start = from.saturating_sub(matched.saturating_sub(typed));
		let Some(tr) = (rule.handler)(&state, &captures, start, to) else {
			continue;
		};
		if let Err(error) = view.dispatch(tr) {
			warn!(%error, pattern = rule.pattern.as_str(), "input rule edit rejected");
			return false;
		}
		return true;
	}
	false
}

/// Combines paste rules into one plugin. Every rule is applied in order.
pub fn paste_rules_plugin(rules: Vec<PasteRule>) -> Plugin {
	let rules: Rc<[PasteRule]> = rules.into();
	Plugin::new("paste_rules").with_paste(move |view, text| run_paste_rules(&rules, view, text))
}

fn run_paste_rules(rules: &[PasteRule], view: &dyn EditorView, text: &str) -> bool {
	let mut output = text.to_string();
	for rule in rules {
		let next = rule
			.pattern
			.replace_all(&output, |captures: &Captures<'_>| (rule.transform)(captures))
			.into_owned();
		output = next;
	}
	if output == text {
		return false;
	}

	let state = view.state();
	let selection = state.selection();
	let mut tr = state.tr();
	if let Err(error) = tr.replace(selection.from(), selection.to(), &output) {
		warn!(%error, "paste rule edit rejected");
		return false;
	}
	tr.set_selection(Selection::point(selection.from() + output.chars().count()));
	if let Err(error) = view.dispatch(tr) {
		warn!(%error, "paste rule edit rejected");
		return false;
	}
	true
}
