use crate::range::{Bias, CharIdx, CharLen, Range};
use crate::transaction::Step;

#[cfg(test)]
mod tests;

/// The selection of an editor state.
///
/// Rich-text selections are a single range; the engine has no multi-cursor
/// model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
	range: Range,
}

impl Selection {
	pub fn single(anchor: CharIdx, head: CharIdx) -> Self {
		Self {
			range: Range::new(anchor, head),
		}
	}

	/// A bare cursor.
	pub fn point(pos: CharIdx) -> Self {
		Self::single(pos, pos)
	}

	/// Returns the underlying range.
	pub fn range(&self) -> Range {
		self.range
	}

	pub fn anchor(&self) -> CharIdx {
		self.range.anchor
	}

	pub fn head(&self) -> CharIdx {
		self.range.head
	}

	pub fn from(&self) -> CharIdx {
		self.range.from()
	}

	pub fn to(&self) -> CharIdx {
		self.range.to()
	}

	/// Returns true when the selection is a cursor.
	pub fn is_empty(&self) -> bool {
		self.range.is_empty()
	}

	/// Maps the selection through an applied step.
	///
	/// Both ends use [`Bias::Right`], so a cursor at an insertion point ends up
	/// after the inserted text.
	pub fn map(&self, step: &Step) -> Self {
		Self::single(
			step.map_pos(self.range.anchor, Bias::Right),
			step.map_pos(self.range.head, Bias::Right),
		)
	}

	/// Clamps the selection into a document of `len` characters.
	pub fn clamp(self, len: CharLen) -> Self {
		Self {
			range: self.range.clamp(len),
		}
	}
}

impl Default for Selection {
	fn default() -> Self {
		Self::point(0)
	}
}
