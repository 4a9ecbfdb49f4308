//! Document engine primitives consumed by the extension manager.
//!
//! The manager never reaches into document internals. Everything it needs from
//! the editing engine lives here: a text document, selections, position-addressed
//! edits, immutable editor states, the schema constructor, editor plugins and the
//! host view contract.

/// Character ranges and position mapping bias.
pub mod range;
/// Regex-driven input and paste rules.
pub mod rules;
/// Node and mark specifications, DOM shapes and the schema constructor.
pub mod schema;
/// Single-range selections.
pub mod selection;
/// Immutable editor state.
pub mod state;
/// Editor plugins and their props.
pub mod plugin;
/// Position-addressed edits.
pub mod transaction;
/// Host view contract and a headless implementation.
pub mod view;

pub use plugin::{
	KeyDownHandler, PasteHandler, Plugin, PluginKey, PluginState, TextInputHandler,
};
pub use range::{Bias, CharIdx, CharLen, Direction, Range};
pub use ropey::Rope;
pub use rules::{
	InputRule, InputRuleHandler, PasteRule, PasteTransform, input_rules_plugin,
	paste_rules_plugin,
};
pub use schema::{
	AttributeSpec, Attrs, DomElement, DomOutput, GetAttrsFn, MarkSpec, NodeSpec, ParseRule,
	Schema, SchemaError, ToDomFn,
};
pub use selection::Selection;
pub use state::{EditorState, StateError};
pub use transaction::{Step, StepError, Transaction, TxId};
pub use view::{EditorView, HeadlessView};
