use indexmap::IndexMap;

use crate::error::ManagerError;
use crate::extension::{Extension, ExtensionKind};
use crate::lifecycle::{LifecycleContext, LifecycleHandler};

/// Extension names grouped by tag and by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionTags {
	by_tag: IndexMap<String, Vec<&'static str>>,
	plain: Vec<&'static str>,
	nodes: Vec<&'static str>,
	marks: Vec<&'static str>,
}

impl ExtensionTags {
	/// Extensions carrying `tag`, in priority order.
	pub fn tagged(&self, tag: &str) -> &[&'static str] {
		self.by_tag.get(tag).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn tags(&self) -> impl Iterator<Item = &str> {
		self.by_tag.keys().map(String::as_str)
	}

	pub fn plain(&self) -> &[&'static str] {
		&self.plain
	}

	pub fn nodes(&self) -> &[&'static str] {
		&self.nodes
	}

	pub fn marks(&self) -> &[&'static str] {
		&self.marks
	}
}

/// Collects [`ExtensionTags`] during `Create`.
#[derive(Debug, Default)]
pub(crate) struct TagsHandler {
	tags: ExtensionTags,
}

impl LifecycleHandler for TagsHandler {
	fn for_each_extension(
		&mut self,
		extension: &dyn Extension,
		_ctx: &mut LifecycleContext<'_>,
	) -> Result<(), ManagerError> {
		let name = extension.name();
		for tag in extension.tags() {
			self.tags.by_tag.entry(tag.clone()).or_default().push(name);
		}
		match extension.kind() {
			ExtensionKind::Plain => self.tags.plain.push(name),
			ExtensionKind::Node(_) => self.tags.nodes.push(name),
			ExtensionKind::Mark(_) => self.tags.marks.push(name),
		}
		Ok(())
	}

	fn after_extension_loop(&mut self, ctx: &mut LifecycleContext<'_>) -> Result<(), ManagerError> {
		ctx.store_mut().tags.set(std::mem::take(&mut self.tags))
	}
}
