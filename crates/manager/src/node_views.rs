use std::rc::Rc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use quire_primitives::{Attrs, DomOutput};
use tracing::trace;

use crate::error::ManagerError;
use crate::extension::Extension;
use crate::lifecycle::{LifecycleContext, LifecycleHandler};

/// Renders a node or mark in place of its schema serialization.
pub type NodeViewFactory = Rc<dyn Fn(&Attrs) -> DomOutput>;

/// Node views by node or mark name.
#[derive(Clone, Default)]
pub struct NodeViews {
	views: IndexMap<String, (&'static str, NodeViewFactory)>,
}

impl NodeViews {
	pub fn get(&self, name: &str) -> Option<&NodeViewFactory> {
		self.views.get(name).map(|(_, factory)| factory)
	}

	/// Extension whose view is used for `name`.
	pub fn provider(&self, name: &str) -> Option<&'static str> {
		self.views.get(name).map(|(extension, _)| *extension)
	}

	pub fn render(&self, name: &str, attrs: &Attrs) -> Option<DomOutput> {
		self.get(name).map(|factory| factory(attrs))
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.views.keys().map(String::as_str)
	}
}

impl std::fmt::Debug for NodeViews {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_map()
			.entries(self.views.iter().map(|(name, (extension, _))| (name, extension)))
			.finish()
	}
}

#[derive(Default)]
pub(crate) struct NodeViewsHandler {
	views: NodeViews,
}

impl LifecycleHandler for NodeViewsHandler {
	fn for_each_extension(
		&mut self,
		extension: &dyn Extension,
		ctx: &mut LifecycleContext<'_>,
	) -> Result<(), ManagerError> {
		if extension.settings().exclude.union(ctx.settings().exclude).node_views {
			return Ok(());
		}
		for (name, factory) in extension.create_node_views(ctx.store()) {
			match self.views.views.entry(name) {
				Entry::Occupied(entry) => {
					trace!(
						node = entry.key().as_str(),
						kept = entry.get().0,
						ignored = extension.name(),
						"node view already provided"
					);
				}
				Entry::Vacant(entry) => {
					entry.insert((extension.name(), factory));
				}
			}
		}
		Ok(())
	}

	fn after_extension_loop(&mut self, ctx: &mut LifecycleContext<'_>) -> Result<(), ManagerError> {
		ctx.store_mut().node_views.set(std::mem::take(&mut self.views))
	}
}
