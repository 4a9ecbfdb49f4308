use pretty_assertions::assert_eq;
use quire_manager::{Manager, ManagerError, ManagerPhase, ManagerSettings, MissingDependency, Preset, PhaseRequirement};

use crate::common::{Fixture, Log, init_tracing, insert, ready};

fn names(manager: &Manager) -> Vec<&'static str> {
	manager.extensions().map(|extension| extension.name()).collect()
}

#[test]
fn test_lower_priority_number_comes_first() {
	init_tracing();
	let manager = Manager::create(
		vec![Fixture::new("a", 2).module(), Fixture::new("b", 2).module(), Fixture::new("c", -1).module()],
		ManagerSettings::default(),
	)
	.unwrap();
	assert_eq!(names(&manager), ["c", "a", "b"]);
}

#[test]
fn test_duplicate_replaced_inside_preset() {
	init_tracing();
	let manager = Manager::create(
		vec![
			Preset::new("formatting")
				.with_extension(Fixture::new("bold", 100))
				.with_extension(Fixture::new("italic", 100))
				.into(),
			Fixture::new("bold", 5).module(),
		],
		ManagerSettings::default(),
	)
	.unwrap();

	assert_eq!(names(&manager), ["bold", "italic"]);
	let bold = manager.get_extension_by_name("bold").unwrap();
	assert_eq!(bold.priority().0, 5);

	let preset = manager.get_preset("formatting").unwrap();
	let members: Vec<_> = preset.extensions().map(|extension| (extension.name(), extension.priority().0)).collect();
	assert_eq!(members, [("bold", 5), ("italic", 100)]);
}

#[test]
fn test_missing_dependencies_are_reported_together() {
	let err = Manager::create(
		vec![
			Fixture::new("table", 10).requires(&["table_row", "table_cell"]).module(),
			Fixture::new("mention", 10).requires(&["suggest"]).module(),
			Fixture::new("table_row", 10).module(),
		],
		ManagerSettings::default(),
	)
	.unwrap_err();

	assert_eq!(
		err,
		ManagerError::MissingRequiredExtensions {
			missing: vec![
				MissingDependency {
					dependent: "table",
					missing: "table_cell",
				},
				MissingDependency {
					dependent: "mention",
					missing: "suggest",
				},
			],
		}
	);
	let message = err.to_string();
	assert!(message.contains("`table` requires `table_cell`"), "{message}");
	assert!(message.contains("`mention` requires `suggest`"), "{message}");
}

#[test]
fn test_duplicate_command_names_fail_construction() {
	let err = Manager::create(
		vec![
			Fixture::new("bold", 1).command("toggle", insert()).module(),
			Fixture::new("italic", 2).command("toggle", insert()).module(),
		],
		ManagerSettings::default(),
	)
	.unwrap_err();
	assert_eq!(
		err,
		ManagerError::DuplicateCommand {
			command: "toggle".into(),
			extension: "italic",
			existing: "bold",
		}
	);
}

#[test]
fn test_phase_gating() {
	init_tracing();
	let log = Log::default();
	let manager = Manager::create(
		vec![Fixture::new("text", 1).command("insert", insert()).logging_to(&log).module()],
		ManagerSettings::default(),
	)
	.unwrap();
	assert_eq!(manager.phase(), ManagerPhase::Initialize);

	let err = manager.commands().unwrap_err();
	assert_eq!(
		err,
		ManagerError::Phase {
			operation: "commands",
			required: PhaseRequirement::Exactly(ManagerPhase::Done),
			actual: ManagerPhase::Initialize,
		}
	);
	assert_eq!(
		err.to_string(),
		"`commands` requires phase done but the manager is in phase initialize"
	);
	assert!(manager.helpers().is_err());
	assert!(manager.store().view().is_err());

	drop(manager);
	assert_eq!(*log.borrow(), ["text:destroy"]);
}

#[test]
fn test_ready_manager_lists_commands() {
	let (manager, _view) = ready(vec![Fixture::new("text", 1).command("insert", insert()).module()], "");
	assert_eq!(manager.phase(), ManagerPhase::Done);
	assert_eq!(manager.commands().unwrap().names().collect::<Vec<_>>(), ["insert"]);
}
