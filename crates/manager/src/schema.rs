//! Builds the editor schema from node and mark extensions.
//!
//! Extra attributes come from three places, applied in this order with later
//! entries replacing earlier ones of the same name: attribute groups from the
//! manager settings, groups added while `Create` runs (lifecycle handlers and
//! [`Extension::create_schema_attributes`]), and the extension's own
//! `extra_attributes`. Attributes the node or mark already declares are left alone.

use std::rc::Rc;

use indexmap::IndexMap;
use quire_primitives::{AttributeSpec, Attrs, DomElement, MarkSpec, NodeSpec, ParseRule, Schema, ToDomFn};
use tracing::debug;

use crate::error::ManagerError;
use crate::extension::{Extension, ExtensionKind};
use crate::lifecycle::{LifecycleContext, LifecycleHandler};
use crate::settings::{AttributeGroup, ExtraAttribute};


enum PendingSpec {
	Node(NodeSpec),
	Mark(MarkSpec),
}

struct PendingEntry {
	name: &'static str,
	tags: Vec<String>,
	spec: PendingSpec,
	local: Vec<ExtraAttribute>,
	excluded: bool,
}

/// The `Create` handler producing the schema.
#[derive(Default)]
pub(crate) struct SchemaBuilder {
	entries: Vec<PendingEntry>,
	contributed: Vec<AttributeGroup>,
}

impl LifecycleHandler for SchemaBuilder {
	fn for_each_extension(
		&mut self,
		extension: &dyn Extension,
		ctx: &mut LifecycleContext<'_>,
	) -> Result<(), ManagerError> {
		self.contributed.extend(extension.create_schema_attributes());

		let spec = match extension.kind() {
			ExtensionKind::Plain => return Ok(()),
			ExtensionKind::Node(spec) => PendingSpec::Node(spec),
			ExtensionKind::Mark(spec) => PendingSpec::Mark(spec),
		};
		let settings = extension.settings();
		self.entries.push(PendingEntry {
			name: extension.name(),
			tags: extension.tags().to_vec(),
			spec,
			local: settings.extra_attributes.clone(),
			excluded: settings.exclude.union(ctx.settings().exclude).attributes,
		});
		Ok(())
	}

	fn after_extension_loop(&mut self, ctx: &mut LifecycleContext<'_>) -> Result<(), ManagerError> {
		if ctx.store().schema.is_set() {
			return Err(ManagerError::SchemaAlreadyBuilt);
		}

		let groups: Vec<&AttributeGroup> = ctx
			.settings()
			.schema_attributes
			.iter()
			.chain(&ctx.store().schema_attributes)
			.chain(&self.contributed)
			.collect();

		let mut nodes = IndexMap::new();
		let mut marks = IndexMap::new();
		for entry in std::mem::take(&mut self.entries) {
			let extras = if entry.excluded {
				Vec::new()
			} else {
				collect_extras(&groups, &entry)
			};
			match entry.spec {
				PendingSpec::Node(mut spec) => {
					apply_extras(&mut spec.attrs, &mut spec.parse_dom, &mut spec.to_dom, extras);
					nodes.insert(entry.name.to_string(), spec);
				}
				PendingSpec::Mark(mut spec) => {
					apply_extras(&mut spec.attrs, &mut spec.parse_dom, &mut spec.to_dom, extras);
					marks.insert(entry.name.to_string(), spec);
				}
			}
		}

		debug!(nodes = nodes.len(), marks = marks.len(), "building schema");
		let schema = Schema::new(nodes, marks)?;
		ctx.store_mut().schema.set(Rc::new(schema))
	}
}

fn collect_extras(groups: &[&AttributeGroup], entry: &PendingEntry) -> Vec<ExtraAttribute> {
	let is_node = matches!(entry.spec, PendingSpec::Node(_));
	let mut merged: IndexMap<String, ExtraAttribute> = IndexMap::new();
	let global = groups
		.iter()
		.filter(|group| group.identifiers.matches(entry.name, is_node, &entry.tags))
		.flat_map(|group| group.attributes.iter());
	for attribute in global.chain(&entry.local) {
		merged.insert(attribute.name.clone(), attribute.clone());
	}
	merged.into_values().collect()
}

fn apply_extras(
	attrs: &mut IndexMap<String, AttributeSpec>,
	parse_dom: &mut [ParseRule],
	to_dom: &mut Option<ToDomFn>,
	extras: Vec<ExtraAttribute>,
) {
	if extras.is_empty() {
		return;
	}
	for extra in &extras {
		attrs.entry(extra.name.clone()).or_insert_with(|| AttributeSpec {
			default: extra.default.clone(),
		});
	}

	let extras: Rc<[ExtraAttribute]> = extras.into();
	for rule in parse_dom.iter_mut() {
		let own = rule.get_attrs.take();
		let extras = Rc::clone(&extras);
		rule.get_attrs = Some(Rc::new(move |element: &DomElement| {
			let own = match &own {
				Some(get_attrs) => get_attrs(element)?,
				None => Attrs::new(),
			};
			let mut merged = parse_extras(&extras, element);
			merged.extend(own);
			Some(merged)
		}));
	}

	if let Some(own) = to_dom.take() {
		*to_dom = Some(Rc::new(move |values: &Attrs| {
			let mut output = own(values);
			for extra in extras.iter() {
				let Some(value) = values.get(&extra.name) else {
					continue;
				};
				if let Some((key, rendered)) = extra.serialize(value) {
					output.attributes.entry(key).or_insert(rendered);
				}
			}
			output
		}));
	}
}

fn parse_extras(extras: &[ExtraAttribute], element: &DomElement) -> Attrs {
	extras
		.iter()
		.filter_map(|extra| Some((extra.name.clone(), extra.parse(element)?)))
		.collect()
}
