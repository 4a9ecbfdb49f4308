//! Turns the module list into the ordered, deduplicated extension set.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::{ManagerError, MissingDependency};
use crate::extension::{Extension, Module, Preset};


/// Output of [`resolve`].
#[derive(Debug)]
pub(crate) struct Resolved {
	/// Kept extensions, sorted by priority.
	pub extensions: Vec<Box<dyn Extension>>,
	pub extension_index: FxHashMap<&'static str, usize>,
	/// Kept presets, in first-seen order.
	pub presets: Vec<Preset>,
	pub preset_index: FxHashMap<&'static str, usize>,
}

fn check_name(index: usize, kind: &str, name: &str) -> Result<(), ManagerError> {
	if name.is_empty() {
		return Err(ManagerError::InvalidModule {
			index,
			reason: format!("{kind} name is empty"),
		});
	}
	if name.chars().any(char::is_whitespace) {
		return Err(ManagerError::InvalidModule {
			index,
			reason: format!("{kind} name `{name}` contains whitespace"),
		});
	}
	Ok(())
}

/// Resolves `modules`.
///
/// Presets are flattened in place, extensions are stably sorted by priority,
/// the first instance of every name is kept and later ones are dropped.
/// Preset membership is rewritten to the kept instances. Every unmet
/// `required_extensions` entry is reported in a single error.
pub(crate) fn resolve(modules: Vec<Module>) -> Result<Resolved, ManagerError> {
	let mut raw: Vec<Box<dyn Extension>> = Vec::new();
	let mut raw_presets: Vec<(Preset, Vec<&'static str>)> = Vec::new();

	for (index, module) in modules.into_iter().enumerate() {
		match module {
			Module::Extension(extension) => {
				check_name(index, "extension", extension.name())?;
				raw.push(extension);
			}
			Module::Preset(mut preset) => {
				check_name(index, "preset", preset.name())?;
				let pending = preset.take_pending();
				let mut names = Vec::with_capacity(pending.len());
				for extension in pending {
					check_name(index, "extension", extension.name())?;
					names.push(extension.name());
					raw.push(extension);
				}
				raw_presets.push((preset, names));
			}
		}
	}

	raw.sort_by_key(|extension| extension.priority());

	let mut extensions: Vec<Box<dyn Extension>> = Vec::with_capacity(raw.len());
	let mut extension_index: FxHashMap<&'static str, usize> = FxHashMap::default();
	for extension in raw {
		let name = extension.name();
		if let Some(&kept) = extension_index.get(name) {
			let kept = &extensions[kept];
			debug!(
				extension = name,
				dropped_priority = %extension.priority(),
				kept_priority = %kept.priority(),
				"dropping duplicate extension"
			);
			continue;
		}
		extension_index.insert(name, extensions.len());
		extensions.push(extension);
	}

	let mut presets = Vec::with_capacity(raw_presets.len());
	let mut preset_index: FxHashMap<&'static str, usize> = FxHashMap::default();
	for (mut preset, names) in raw_presets {
		if preset_index.contains_key(preset.name()) {
			debug!(preset = preset.name(), "dropping duplicate preset");
			continue;
		}
		let mut seen = FxHashSet::default();
		let members = names
			.into_iter()
			.filter_map(|name| extension_index.get(name).copied())
			.filter(|index| seen.insert(*index))
			.collect();
		preset.set_members(members);
		preset_index.insert(preset.name(), presets.len());
		presets.push(preset);
	}

	let missing: Vec<MissingDependency> = extensions
		.iter()
		.flat_map(|extension| {
			extension
				.required_extensions()
				.iter()
				.filter(|required| !extension_index.contains_key(*required))
				.map(|required| MissingDependency {
					dependent: extension.name(),
					missing: *required,
				})
				.collect::<Vec<_>>()
		})
		.collect();
	if !missing.is_empty() {
		return Err(ManagerError::MissingRequiredExtensions { missing });
	}

	debug!(
		extensions = extensions.len(),
		presets = presets.len(),
		"resolved modules"
	);
	Ok(Resolved {
		extensions,
		extension_index,
		presets,
		preset_index,
	})
}
