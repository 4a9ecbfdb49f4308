use std::rc::Rc;

use pretty_assertions::assert_eq;
use quire_manager::{KeyBindingFn, KeyBindingProps, KeyBindings, Module};

use crate::common::{Fixture, Log, ready};

#[derive(Clone, Copy)]
enum Reply {
	Handled,
	Unhandled,
	CallsNext,
}

fn bound(log: &Log, name: &'static str, priority: i32, reply: Reply) -> Module {
	let log = Rc::clone(log);
	let handler: KeyBindingFn = Rc::new(move |props: &KeyBindingProps<'_>| {
		log.borrow_mut().push(name.to_string());
		match reply {
			Reply::Handled => true,
			Reply::Unhandled => false,
			Reply::CallsNext => props.next(),
		}
	});
	let mut fixture = Fixture::new(name, priority);
	fixture.keymap = KeyBindings::from([("Mod-b".to_string(), handler)]);
	fixture.module()
}

fn press(modules: Vec<Module>) -> bool {
	let (_manager, view) = ready(modules, "text");
	view.press_key("Mod-b")
}

#[test]
fn test_handlers_run_until_one_handles_the_key() {
	let log = Log::default();
	let handled = press(vec![
		bound(&log, "p100", 100, Reply::Handled),
		bound(&log, "p10", 10, Reply::Handled),
		bound(&log, "p1", 1, Reply::Unhandled),
	]);
	assert!(handled);
	assert_eq!(*log.borrow(), ["p1", "p10"]);
}

#[test]
fn test_first_handler_returning_true_stops_the_chain() {
	let log = Log::default();
	let handled = press(vec![
		bound(&log, "p1", 1, Reply::Handled),
		bound(&log, "p10", 10, Reply::Handled),
		bound(&log, "p100", 100, Reply::Handled),
	]);
	assert!(handled);
	assert_eq!(*log.borrow(), ["p1"]);
}

#[test]
fn test_calling_next_runs_both_lower_handlers() {
	let log = Log::default();
	let handled = press(vec![
		bound(&log, "p1", 1, Reply::CallsNext),
		bound(&log, "p10", 10, Reply::Unhandled),
		bound(&log, "p100", 100, Reply::Unhandled),
	]);
	assert!(!handled);
	assert_eq!(*log.borrow(), ["p1", "p10", "p100"]);
}

#[test]
fn test_unhandled_by_all() {
	let log = Log::default();
	assert!(!press(vec![bound(&log, "p1", 1, Reply::Unhandled), bound(&log, "p10", 10, Reply::Unhandled)]));
	assert_eq!(*log.borrow(), ["p1", "p10"]);
}
