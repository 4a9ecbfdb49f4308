use proptest::prelude::*;
use ropey::Rope;
use serde_json::json;

use super::{Step, StepError, Transaction};
use crate::range::Bias;
use crate::selection::Selection;

#[test]
fn test_insert_text() {
	let doc = Rope::from("hello world");
	let mut tr = Transaction::new(&doc, Selection::point(5));
	tr.insert_text(5, ",").unwrap();
	assert_eq!(tr.doc().to_string(), "hello, world");
	assert_eq!(tr.before().to_string(), "hello world");
	assert_eq!(tr.selection(), Selection::point(6));
	assert!(tr.doc_changed());
}

#[test]
fn test_delete_and_replace() {
	let doc = Rope::from("hello world");
	let mut tr = Transaction::new(&doc, Selection::point(0));
	tr.delete(5, 6).unwrap().replace(0, 5, "hi").unwrap();
	assert_eq!(tr.doc().to_string(), "hiworld");
	assert_eq!(tr.steps().len(), 2);
}

#[test]
fn test_out_of_bounds_step_is_rejected() {
	let doc = Rope::from("abc");
	let mut tr = Transaction::new(&doc, Selection::point(0));
	let err = tr.delete(2, 9).unwrap_err();
	assert_eq!(err, StepError::OutOfBounds { from: 2, to: 9, len: 3 });
	assert!(!tr.doc_changed());
}

#[test]
fn test_inverted_step_is_rejected() {
	let doc = Rope::from("abc");
	let mut tr = Transaction::new(&doc, Selection::point(0));
	assert_eq!(tr.delete(2, 1).unwrap_err(), StepError::Inverted { from: 2, to: 1 });
}

#[test]
fn test_noop_step_is_not_recorded() {
	let doc = Rope::from("abc");
	let mut tr = Transaction::new(&doc, Selection::point(0));
	tr.insert_text(1, "").unwrap();
	assert!(tr.is_empty());
}

#[test]
fn test_explicit_selection_and_meta() {
	let doc = Rope::from("abc");
	let mut tr = Transaction::new(&doc, Selection::point(0));
	tr.set_selection(Selection::single(1, 50)).set_meta("origin", json!("paste"));
	assert_eq!(tr.selection(), Selection::single(1, 3));
	assert!(tr.selection_set());
	assert_eq!(tr.meta("origin"), Some(&json!("paste")));
	assert!(!tr.is_empty());
}

#[test]
fn test_ids_are_unique_and_shared_by_clones() {
	let doc = Rope::from("abc");
	let a = Transaction::new(&doc, Selection::point(0));
	let b = Transaction::new(&doc, Selection::point(0));
	assert_ne!(a.id(), b.id());
	assert_eq!(a.clone().id(), a.id());
}

#[test]
fn test_map_pos_bias_inside_replaced_range() {
	let step = Step::replace(2, 4, "xyz");
	assert_eq!(step.map_pos(3, Bias::Left), 2);
	assert_eq!(step.map_pos(3, Bias::Right), 5);
	assert_eq!(step.map_pos(6, Bias::Left), 7);
}

proptest! {
	#[test]
	fn prop_step_result_length(text in "[a-z]{0,20}", from in 0usize..20, len in 0usize..5, insert in "[A-Z]{0,5}") {
		let doc = Rope::from(text.as_str());
		let total = doc.len_chars();
		let from = from.min(total);
		let to = (from + len).min(total);
		let mut tr = Transaction::new(&doc, Selection::point(0));
		tr.replace(from, to, &insert).unwrap();
		prop_assert_eq!(tr.doc().len_chars(), total - (to - from) + insert.chars().count());
	}
}
