use serde_json::{Map, Value};

use super::Extension;

/// A named bundle of extensions.
///
/// Until the manager consumes it a preset owns its extensions. Afterwards the
/// extensions live in the manager and the preset keeps their positions, which
/// deduplication rewrites to the surviving instance.
#[derive(Debug)]
pub struct Preset {
	name: &'static str,
	settings: Map<String, Value>,
	properties: Map<String, Value>,
	pending: Vec<Box<dyn Extension>>,
	members: Vec<usize>,
}

impl Preset {
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			settings: Map::new(),
			properties: Map::new(),
			pending: Vec::new(),
			members: Vec::new(),
		}
	}

	pub fn with_extension(mut self, extension: impl Extension) -> Self {
		self.pending.push(Box::new(extension));
		self
	}

	pub fn with_boxed(mut self, extension: Box<dyn Extension>) -> Self {
		self.pending.push(extension);
		self
	}

	pub fn with_settings(mut self, settings: Map<String, Value>) -> Self {
		self.settings = settings;
		self
	}

	pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
		self.properties = properties;
		self
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn settings(&self) -> &Map<String, Value> {
		&self.settings
	}

	pub fn properties(&self) -> &Map<String, Value> {
		&self.properties
	}

	pub(crate) fn take_pending(&mut self) -> Vec<Box<dyn Extension>> {
		std::mem::take(&mut self.pending)
	}

	#[cfg(test)]
	pub(crate) fn members(&self) -> &[usize] {
		&self.members
	}

	pub(crate) fn set_members(&mut self, members: Vec<usize>) {
		self.members = members;
	}

	/// Settings equality; presets carry no closures.
	pub(crate) fn same_settings(&self, other: &Self) -> bool {
		self.name == other.name && self.settings == other.settings
	}
}

/// A resolved preset together with the manager's extensions.
#[derive(Debug, Clone, Copy)]
pub struct PresetRef<'m> {
	preset: &'m Preset,
	extensions: &'m [Box<dyn Extension>],
}

impl<'m> PresetRef<'m> {
	pub(crate) fn new(preset: &'m Preset, extensions: &'m [Box<dyn Extension>]) -> Self {
		Self { preset, extensions }
	}

	pub fn name(&self) -> &'static str {
		self.preset.name
	}

	pub fn settings(&self) -> &'m Map<String, Value> {
		&self.preset.settings
	}

	pub fn properties(&self) -> &'m Map<String, Value> {
		&self.preset.properties
	}

	/// The live extensions the preset references, in declaration order.
	pub fn extensions(self) -> impl Iterator<Item = &'m dyn Extension> {
		let extensions = self.extensions;
		self.preset
			.members
			.iter()
			.filter_map(move |&index| extensions.get(index).map(|extension| &**extension))
	}

	pub fn extension_names(self) -> Vec<&'static str> {
		self.extensions().map(|extension| extension.name()).collect()
	}
}

/// An entry of the manager's module list.
#[derive(Debug)]
pub enum Module {
	Extension(Box<dyn Extension>),
	Preset(Preset),
}

impl Module {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Extension(extension) => extension.name(),
			Self::Preset(preset) => preset.name(),
		}
	}
}

impl From<Box<dyn Extension>> for Module {
	fn from(extension: Box<dyn Extension>) -> Self {
		Self::Extension(extension)
	}
}

impl From<Preset> for Module {
	fn from(preset: Preset) -> Self {
		Self::Preset(preset)
	}
}

/// Boxes an extension into a [`Module`].
pub fn module(extension: impl Extension) -> Module {
	Module::Extension(Box::new(extension))
}
