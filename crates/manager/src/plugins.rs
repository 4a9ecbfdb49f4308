//! Assembles the editor plugin list.
//!
//! Order: the manager's base plugins, extension plugins by priority, the
//! combined input rules, the combined paste rules, then the merged keymap.

use quire_primitives::{InputRule, PasteRule, Plugin, input_rules_plugin, paste_rules_plugin};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::ManagerError;
use crate::extension::Extension;
use crate::keymap::KeymapBuilder;
use crate::lifecycle::{LifecycleContext, LifecycleHandler};

#[derive(Default)]
pub(crate) struct PluginsHandler {
	plugins: Vec<Plugin>,
	input_rules: Vec<InputRule>,
	paste_rules: Vec<PasteRule>,
	keymap: KeymapBuilder,
}

impl LifecycleHandler for PluginsHandler {
	fn for_each_extension(
		&mut self,
		extension: &dyn Extension,
		ctx: &mut LifecycleContext<'_>,
	) -> Result<(), ManagerError> {
		let exclude = extension.settings().exclude.union(ctx.settings().exclude);
		let store = ctx.store();
		if !exclude.plugins
			&& let Some(plugin) = extension.create_plugin(store)
		{
			self.plugins.push(plugin);
		}
		if !exclude.input_rules {
			self.input_rules.extend(extension.create_input_rules(store));
		}
		if !exclude.paste_rules {
			self.paste_rules.extend(extension.create_paste_rules(store));
		}
		if !exclude.keymap {
			self.keymap.add(extension.create_keymap(store));
		}
		Ok(())
	}

	fn after_extension_loop(&mut self, ctx: &mut LifecycleContext<'_>) -> Result<(), ManagerError> {
		let keymap = std::mem::take(&mut self.keymap);
		let mut plugins: Vec<Plugin> = ctx.settings().plugins.clone();
		plugins.append(&mut self.plugins);
		plugins.push(input_rules_plugin(std::mem::take(&mut self.input_rules)));
		plugins.push(paste_rules_plugin(std::mem::take(&mut self.paste_rules)));
		plugins.push(keymap.build());

		let mut seen = FxHashSet::default();
		for plugin in &plugins {
			if !seen.insert(plugin.key().as_str()) {
				return Err(ManagerError::DuplicatePluginKey {
					key: plugin.key().to_string(),
				});
			}
		}
		debug!(plugins = plugins.len(), "assembled plugins");
		ctx.store_mut().plugins.set(plugins)
	}
}
