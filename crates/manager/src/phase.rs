use crate::error::ManagerError;

/// Construction progress of a manager. Only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ManagerPhase {
	/// Modules resolved, no phase has run yet.
	#[default]
	None,
	/// Tags and the schema are being built.
	Create,
	/// Commands, helpers, plugins and the other runtime artifacts are being built.
	Initialize,
	/// A view is being attached.
	AddView,
	/// Fully constructed and bound to a view.
	Done,
	/// Torn down; no further interaction is possible.
	Destroy,
}

impl std::fmt::Display for ManagerPhase {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::None => "none",
			Self::Create => "create",
			Self::Initialize => "initialize",
			Self::AddView => "add-view",
			Self::Done => "done",
			Self::Destroy => "destroy",
		};
		f.write_str(name)
	}
}

/// Precondition on the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseRequirement {
	/// The phase is `p` or later, but not torn down.
	AtLeast(ManagerPhase),
	Exactly(ManagerPhase),
}

impl PhaseRequirement {
	pub fn is_met(self, actual: ManagerPhase) -> bool {
		match self {
			Self::AtLeast(required) => actual >= required && actual != ManagerPhase::Destroy,
			Self::Exactly(required) => actual == required,
		}
	}
}

impl std::fmt::Display for PhaseRequirement {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::AtLeast(phase) => write!(f, ">= {phase}"),
			Self::Exactly(phase) => write!(f, "{phase}"),
		}
	}
}

/// Checks a phase precondition for `operation`.
pub fn ensure_phase(
	actual: ManagerPhase,
	requirement: PhaseRequirement,
	operation: &'static str,
) -> Result<(), ManagerError> {
	if requirement.is_met(actual) {
		return Ok(());
	}
	Err(ManagerError::Phase {
		operation,
		required: requirement,
		actual,
	})
}
