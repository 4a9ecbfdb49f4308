//! Extension manager for the quire rich-text editor.
//!
//! Independently written extensions and presets are resolved into one ordered
//! set, then built, phase by phase, into a schema, a command registry, a plugin
//! chain with merged keymaps, and the other runtime artifacts an editor view
//! needs.
//!
//! # Phases
//!
//! | Phase | Produces |
//! |-------|----------|
//! | `Create` | tags, schema |
//! | `Initialize` | commands, helpers, plugins, editor attributes, node views, suggesters |
//! | `AddView` | the bound view |
//!
//! Each phase runs the built-in [`LifecycleHandler`]s followed by those the
//! extensions return from their phase hooks.

/// Editor element attributes.
pub mod attributes;
/// Command registry, invocation and chaining.
pub mod commands;
mod error;
/// The extension trait, presets and module lists.
pub mod extension;
/// Read-only helper queries.
pub mod helpers;
/// Merged keymaps.
pub mod keymap;
/// Phase orchestration.
pub mod lifecycle;
mod manager;
/// Node view factories.
pub mod node_views;
mod phase;
mod plugins;
mod priority;
mod resolver;
mod schema;
/// Extension and manager settings.
pub mod settings;
/// The phase-gated store.
pub mod store;
/// Trigger-character suggesters.
pub mod suggest;
/// Extension tags.
pub mod tags;

#[cfg(test)]
mod testing;

pub use attributes::EditorAttributes;
pub use commands::{
	Chain, CommandArgs, CommandEntry, CommandFn, CommandProps, CommandRegistry, Commands, Dispatch,
};
pub use error::{CommandError, ConfigError, ManagerError, MissingDependency};
pub use extension::{Extension, ExtensionCore, ExtensionKind, Module, Preset, PresetRef, module};
pub use helpers::{HelperFn, HelperRegistry, Helpers};
pub use keymap::{KEYMAP_PLUGIN_KEY, KeyBindingFn, KeyBindingProps, KeyBindings, KeymapBuilder};
pub use lifecycle::{LifecycleContext, LifecycleHandler};
pub use manager::Manager;
pub use node_views::{NodeViewFactory, NodeViews};
pub use phase::{ManagerPhase, PhaseRequirement, ensure_phase};
pub use priority::Priority;
pub use settings::{
	AttributeGroup, Exclude, ExtensionSettings, ExtraAttribute, IdentifierKind, Identifiers, ManagerSettings,
	ParseDom, ToDom,
};
pub use store::{ManagerStore, Slot};
pub use suggest::{SuggestMatch, Suggester};
pub use tags::ExtensionTags;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use tracing_subscriber as _;
