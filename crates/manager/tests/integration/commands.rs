use pretty_assertions::assert_eq;
use quire_manager::{Manager, ManagerError};
use quire_primitives::{EditorView, HeadlessView};
use serde_json::json;

use crate::common::{Fixture, clear, insert, ready};

fn editing(text: &str) -> (Manager, std::rc::Rc<HeadlessView>) {
	ready(
		vec![Fixture::new("text", 1).command("insert", insert()).command("clear", clear()).module()],
		text,
	)
}

#[test]
fn test_enabled_checks_never_touch_the_document() {
	let (manager, view) = editing("draft");
	let commands = manager.commands().unwrap();
	let before = view.state();

	assert!(commands.is_enabled("clear", json!(null)).unwrap());
	assert!(commands.is_enabled("insert", json!("more")).unwrap());
	assert!(manager.chain().unwrap().call("clear", json!(null)).unwrap().enabled().unwrap());

	assert_eq!(view.state().doc(), before.doc());
	assert!(view.take_dispatched().is_empty());
}

#[test]
fn test_chain_matches_sequential_runs() {
	let (sequential, sequential_view) = editing("x");
	let commands = sequential.commands().unwrap();
	commands.run("insert", json!("a")).unwrap();
	commands.run("insert", json!("b")).unwrap();
	assert_eq!(sequential_view.take_dispatched().len(), 2);

	let (chained, chained_view) = editing("x");
	chained
		.chain()
		.unwrap()
		.call("insert", json!("a"))
		.unwrap()
		.call("insert", json!("b"))
		.unwrap()
		.run()
		.unwrap();
	assert_eq!(chained_view.take_dispatched().len(), 1);

	assert_eq!(chained_view.state().doc(), sequential_view.state().doc());
	assert_eq!(chained_view.state().doc().to_string(), "abx");
}

#[test]
fn test_chain_run_twice_dispatches_once() {
	let (manager, view) = editing("");
	let mut chain = manager.chain().unwrap();
	chain.call("insert", json!("once")).unwrap();
	assert!(chain.run().unwrap());
	assert!(!chain.run().unwrap());
	assert_eq!(view.state().doc().to_string(), "once");
	assert_eq!(view.take_dispatched().len(), 1);
}

#[test]
fn test_command_failure_leaves_view_untouched() {
	let (manager, view) = editing("");
	let err = manager.commands().unwrap().run("insert", json!(42)).unwrap_err();
	assert!(matches!(err, ManagerError::Command { ref command, .. } if command == "insert"));
	assert!(view.take_dispatched().is_empty());
}

#[test]
fn test_disabled_command_returns_false() {
	let (manager, view) = editing("");
	assert!(!manager.commands().unwrap().run("clear", json!(null)).unwrap());
	assert!(view.take_dispatched().is_empty());
}

#[test]
fn test_host_edits_between_chain_calls() {
	let (manager, view) = editing("");
	let mut chain = manager.chain().unwrap();
	chain.call("insert", json!("a")).unwrap();

	let mut host = view.state().tr();
	host.insert_text(0, "h").unwrap();
	view.dispatch(host).unwrap();
	view.take_dispatched();

	chain.call("insert", json!("b")).unwrap();
	chain.run().unwrap();
	assert_eq!(view.state().doc().to_string(), "hb");
	assert_eq!(view.take_dispatched().len(), 1);
}

#[test]
fn test_stale_chain_run_reports_nothing_dispatched() {
	let (manager, view) = editing("");
	let mut chain = manager.chain().unwrap();
	chain.call("insert", json!("a")).unwrap();

	let mut host = view.state().tr();
	host.insert_text(0, "h").unwrap();
	view.dispatch(host).unwrap();
	view.take_dispatched();

	assert!(!chain.run().unwrap());
	assert_eq!(chain.queued().count(), 0);
	assert_eq!(view.state().doc().to_string(), "h");
	assert!(view.take_dispatched().is_empty());
}
