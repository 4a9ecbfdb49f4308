use ropey::Rope;

use crate::range::{Bias, CharIdx, CharLen};

/// A step that could not be applied to a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
	/// The step addresses characters outside the document.
	#[error("step {from}..{to} is out of bounds for a document of {len} characters")]
	OutOfBounds {
		from: CharIdx,
		to: CharIdx,
		len: CharLen,
	},
	/// The step range is inverted.
	#[error("step range {from}..{to} is inverted")]
	Inverted { from: CharIdx, to: CharIdx },
}

/// A single position-addressed replacement.
///
/// Replaces the characters `[from, to)` with `text`. An empty `text` is a
/// deletion, an empty range is an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
	from: CharIdx,
	to: CharIdx,
	text: String,
	// Cached so mapping does not recount characters.
	text_len: CharLen,
}

impl Step {
	pub fn replace(from: CharIdx, to: CharIdx, text: impl Into<String>) -> Self {
		let text = text.into();
		let text_len = text.chars().count();
		Self {
			from,
			to,
			text,
			text_len,
		}
	}

	pub fn from(&self) -> CharIdx {
		self.from
	}

	pub fn to(&self) -> CharIdx {
		self.to
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	/// Returns true if applying the step leaves the document unchanged.
	pub fn is_noop(&self) -> bool {
		self.from == self.to && self.text.is_empty()
	}

	/// Applies the step to `doc` in place.
	pub fn apply(&self, doc: &mut Rope) -> Result<(), StepError> {
		let len = doc.len_chars();
		if self.from > self.to {
			return Err(StepError::Inverted {
				from: self.from,
				to: self.to,
			});
		}
		if self.to > len {
			return Err(StepError::OutOfBounds {
				from: self.from,
				to: self.to,
				len,
			});
		}
		if self.from < self.to {
			doc.remove(self.from..self.to);
		}
		if !self.text.is_empty() {
			doc.insert(self.from, &self.text);
		}
		Ok(())
	}

	/// Maps a position in the pre-step document to the post-step document.
	///
	/// Positions inside the replaced range collapse to its start
	/// ([`Bias::Left`]) or to the end of the inserted text ([`Bias::Right`]).
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		if pos < self.from {
			pos
		} else if pos > self.to {
			pos + self.text_len - (self.to - self.from)
		} else {
			match bias {
				Bias::Left => self.from,
				Bias::Right => self.from + self.text_len,
			}
		}
	}
}
