/// Character offset into a document.
pub type CharIdx = usize;

/// Character count.
pub type CharLen = usize;

/// Which way a range points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	/// Head is at or after anchor.
	Forward,
	/// Head is before anchor.
	Backward,
}

/// Bias determines how a position sitting on a replaced region is mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// Position stays before inserted content.
	Left,
	/// Position moves after inserted content.
	Right,
}

/// `anchor..head`, in either order. Edits and selections share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
	pub anchor: CharIdx,
	/// The cursor end.
	pub head: CharIdx,
}

impl Range {
	pub fn new(anchor: CharIdx, head: CharIdx) -> Self {
		Self { anchor, head }
	}

	/// A cursor at `pos`.
	pub fn point(pos: CharIdx) -> Self {
		Self::new(pos, pos)
	}

	#[inline]
	pub fn from(&self) -> CharIdx {
		self.anchor.min(self.head)
	}

	/// Exclusive end.
	#[inline]
	pub fn to(&self) -> CharIdx {
		self.anchor.max(self.head)
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.anchor == self.head
	}

	pub fn direction(&self) -> Direction {
		if self.anchor <= self.head {
			Direction::Forward
		} else {
			Direction::Backward
		}
	}

	/// Clamps both ends to `len`.
	pub fn clamp(self, len: CharLen) -> Self {
		Self::new(self.anchor.min(len), self.head.min(len))
	}
}
