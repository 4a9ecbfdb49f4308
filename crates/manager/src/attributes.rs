use std::collections::BTreeMap;

use crate::error::ManagerError;
use crate::extension::Extension;
use crate::lifecycle::{LifecycleContext, LifecycleHandler};

/// DOM attributes of the editable element.
pub type EditorAttributes = BTreeMap<String, String>;

/// Merges `incoming` (lower precedence) into `merged`.
///
/// `class` values accumulate without repeats; any other key keeps the value
/// already present.
fn merge_into(merged: &mut EditorAttributes, incoming: EditorAttributes) {
	for (key, value) in incoming {
		if key != "class" {
			merged.entry(key).or_insert(value);
			continue;
		}
		let classes = merged.entry(key).or_default();
		for class in value.split_whitespace() {
			if classes.split_whitespace().any(|existing| existing == class) {
				continue;
			}
			if !classes.is_empty() {
				classes.push(' ');
			}
			classes.push_str(class);
		}
	}
}

#[derive(Default)]
pub(crate) struct AttributesHandler {
	merged: EditorAttributes,
}

impl LifecycleHandler for AttributesHandler {
	fn for_each_extension(
		&mut self,
		extension: &dyn Extension,
		ctx: &mut LifecycleContext<'_>,
	) -> Result<(), ManagerError> {
		if extension.settings().exclude.union(ctx.settings().exclude).attributes {
			return Ok(());
		}
		merge_into(&mut self.merged, extension.create_attributes(ctx.store()));
		Ok(())
	}

	fn after_extension_loop(&mut self, ctx: &mut LifecycleContext<'_>) -> Result<(), ManagerError> {
		ctx.store_mut().attributes.set(std::mem::take(&mut self.merged))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn attrs(pairs: &[(&str, &str)]) -> EditorAttributes {
		pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
	}

	#[test]
	fn test_classes_concatenate_and_dedupe() {
		let mut merged = EditorAttributes::new();
		merge_into(&mut merged, attrs(&[("class", "editor focused"), ("role", "textbox")]));
		merge_into(&mut merged, attrs(&[("class", "focused dark"), ("role", "document")]));
		assert_eq!(
			merged,
			attrs(&[("class", "editor focused dark"), ("role", "textbox")])
		);
	}
}
