use serde::Deserialize;

/// Precedence of an extension. Lower values take precedence.
///
/// Ordering decides schema declaration order, plugin order, keymap chain order
/// and which instance survives deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
	pub const CRITICAL: Self = Self(0);
	pub const HIGHEST: Self = Self(1);
	pub const HIGH: Self = Self(10);
	pub const DEFAULT: Self = Self(100);
	pub const LOW: Self = Self(1000);
	pub const LOWEST: Self = Self(10000);
}

impl Default for Priority {
	fn default() -> Self {
		Self::DEFAULT
	}
}

impl From<i32> for Priority {
	fn from(value: i32) -> Self {
		Self(value)
	}
}

impl std::fmt::Display for Priority {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_lower_value_sorts_first() {
		let mut priorities = vec![Priority::LOWEST, Priority::DEFAULT, Priority(-5), Priority::CRITICAL];
		priorities.sort();
		assert_eq!(
			priorities,
			vec![Priority(-5), Priority::CRITICAL, Priority::DEFAULT, Priority::LOWEST]
		);
	}

	#[test]
	fn test_deserializes_from_integer() {
		#[derive(Deserialize)]
		struct Wrapper {
			priority: Priority,
		}
		let wrapper: Wrapper = toml::from_str("priority = -3").unwrap();
		assert_eq!(wrapper.priority, Priority(-3));
	}
}
