use super::Selection;
use crate::transaction::Step;

#[test]
fn test_cursor_moves_after_insertion() {
	let sel = Selection::point(3);
	let mapped = sel.map(&Step::replace(3, 3, "abc"));
	assert_eq!(mapped, Selection::point(6));
}

#[test]
fn test_range_before_step_is_untouched() {
	let sel = Selection::single(0, 2);
	let mapped = sel.map(&Step::replace(5, 7, "x"));
	assert_eq!(mapped, sel);
}

#[test]
fn test_range_after_deletion_shifts_left() {
	let sel = Selection::single(8, 10);
	let mapped = sel.map(&Step::replace(2, 5, ""));
	assert_eq!(mapped, Selection::single(5, 7));
}

#[test]
fn test_clamp_limits_both_ends() {
	let sel = Selection::single(4, 20).clamp(10);
	assert_eq!(sel.anchor(), 4);
	assert_eq!(sel.head(), 10);
	assert_eq!(sel.from(), 4);
	assert_eq!(sel.to(), 10);
}
