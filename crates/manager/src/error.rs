use quire_primitives::{SchemaError, StateError, StepError, TxId};

use crate::phase::{ManagerPhase, PhaseRequirement};

/// A `required_extensions` entry that did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
	/// Extension declaring the requirement.
	pub dependent: &'static str,
	/// Required extension absent from the final set.
	pub missing: &'static str,
}

impl std::fmt::Display for MissingDependency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "`{}` requires `{}`", self.dependent, self.missing)
	}
}

fn join_missing(missing: &[MissingDependency]) -> String {
	missing
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}

/// Errors raised by the manager.
///
/// Every variant is a programming error in an extension or in the host; none
/// is meant to be recovered from at runtime.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ManagerError {
	/// A module list entry is unusable.
	#[error("invalid module at index {index}: {reason}")]
	InvalidModule { index: usize, reason: String },

	/// Required extensions are absent from the resolved set.
	#[error("missing required extensions: {}", join_missing(.missing))]
	MissingRequiredExtensions { missing: Vec<MissingDependency> },

	#[error("command `{command}` from `{extension}` is already registered by `{existing}`")]
	DuplicateCommand {
		command: String,
		extension: &'static str,
		existing: &'static str,
	},

	#[error("command name `{command}` from `{extension}` is reserved")]
	ReservedCommandName {
		command: String,
		extension: &'static str,
	},

	#[error("helper `{helper}` from `{extension}` is already registered by `{existing}`")]
	DuplicateHelper {
		helper: String,
		extension: &'static str,
		existing: &'static str,
	},

	#[error("helper name `{helper}` from `{extension}` is reserved")]
	ReservedHelperName {
		helper: String,
		extension: &'static str,
	},

	#[error("plugin key `{key}` is used more than once")]
	DuplicatePluginKey { key: String },

	#[error("suggester `{name}` from `{extension}` is already registered")]
	DuplicateSuggester {
		name: String,
		extension: &'static str,
	},

	#[error("invalid schema: {0}")]
	Schema(#[from] SchemaError),

	#[error("the schema has already been built for this manager")]
	SchemaAlreadyBuilt,

	/// A phase-gated operation was called outside its phase.
	#[error("`{operation}` requires phase {required} but the manager is in phase {actual}")]
	Phase {
		operation: &'static str,
		required: PhaseRequirement,
		actual: ManagerPhase,
	},

	/// A store key was read before the phase that produces it completed.
	#[error("store key `{key}` is produced during {produced_in} and is not available yet")]
	StoreKeyUnavailable {
		key: &'static str,
		produced_in: ManagerPhase,
	},

	#[error("store key `{key}` has already been set")]
	StoreKeyAlreadySet { key: &'static str },

	#[error("store key `{key}` holds a value of another type")]
	StoreKeyType { key: &'static str },

	#[error("a view has already been attached to this manager")]
	ViewAlreadyAttached,

	/// A chained command dispatched an edit other than the chain's shared edit.
	#[error("chained command `{command}` dispatched {received} instead of the shared {expected}")]
	ChainDiscipline {
		command: String,
		expected: TxId,
		received: TxId,
	},

	#[error("extension `{0}` is not part of this manager")]
	ExtensionNotFound(String),

	#[error("preset `{0}` is not part of this manager")]
	PresetNotFound(String),

	#[error("plugin state `{0}` does not exist")]
	PluginStateNotFound(String),

	#[error("unknown command `{0}`")]
	UnknownCommand(String),

	#[error("unknown helper `{0}`")]
	UnknownHelper(String),

	#[error("command `{command}` failed: {source}")]
	Command {
		command: String,
		#[source]
		source: CommandError,
	},

	#[error(transparent)]
	State(#[from] StateError),
}

/// Errors returned by command executors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
	#[error(transparent)]
	Step(#[from] StepError),

	#[error(transparent)]
	State(#[from] StateError),

	/// Raised by a chained dispatch handed an edit other than the shared one.
	#[error("dispatch received {received} but the chain owns {expected}")]
	ForeignTransaction { expected: TxId, received: TxId },

	#[error("invalid arguments: {0}")]
	InvalidArgs(String),

	#[error("{0}")]
	Failed(String),
}

/// Errors raised while loading manager settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to parse settings: {0}")]
	Toml(#[from] toml::de::Error),
}
