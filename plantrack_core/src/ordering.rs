//! Sibling-group order maintenance.
//!
//! Levels under a program and moves under a level carry a 1-based `order`
//! that must stay contiguous (exactly 1..N) across insert, move and delete.
//! The functions here are pure (siblings in, siblings out), so the
//! contiguity property can be tested without touching storage.

use crate::repository::Entity;

/// Anything that carries a sibling-group order
pub trait Ordered {
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

impl Ordered for crate::types::Level {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

impl Ordered for crate::types::Move {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

/// Resolve a requested insertion position against the current sibling count.
///
/// `None` (and 0, which no valid position uses) means append. Anything else
/// is clamped to `[1, count + 1]`.
pub fn clamped_insertion_order(requested: Option<u32>, sibling_count: usize) -> u32 {
    let append = sibling_count as u32 + 1;
    match requested {
        None | Some(0) => append,
        Some(position) => position.clamp(1, append),
    }
}

/// Move-to-position over a sibling group.
///
/// Removes the target from its current position, sorts the remainder by
/// current order (stable, so untouched siblings keep their relative order),
/// splices the target in at the clamped desired position, and renumbers the
/// whole group 1..N. A target id that is not in the group simply leaves the
/// remainder renumbered.
pub fn reorder<T: Entity + Ordered>(
    siblings: Vec<T>,
    target_id: &str,
    desired_order: u32,
) -> Vec<T> {
    let mut target = None;
    let mut rest: Vec<T> = Vec::with_capacity(siblings.len());

    for entity in siblings {
        if entity.id() == target_id {
            target = Some(entity);
        } else {
            rest.push(entity);
        }
    }

    rest.sort_by_key(|entity| entity.order());

    if let Some(entity) = target {
        let index = (desired_order.saturating_sub(1) as usize).min(rest.len());
        rest.insert(index, entity);
    }

    assign_contiguous(&mut rest);
    rest
}

/// Re-index survivors 1..N after a removal, preserving relative order
pub fn renumber<T: Ordered>(mut siblings: Vec<T>) -> Vec<T> {
    siblings.sort_by_key(|entity| entity.order());
    assign_contiguous(&mut siblings);
    siblings
}

fn assign_contiguous<T: Ordered>(siblings: &mut [T]) {
    for (index, entity) in siblings.iter_mut().enumerate() {
        entity.set_order(index as u32 + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: String,
        order: u32,
    }

    impl Entity for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    impl Ordered for Item {
        fn order(&self) -> u32 {
            self.order
        }

        fn set_order(&mut self, order: u32) {
            self.order = order;
        }
    }

    fn items(pairs: &[(&str, u32)]) -> Vec<Item> {
        pairs
            .iter()
            .map(|(id, order)| Item {
                id: (*id).into(),
                order: *order,
            })
            .collect()
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn assert_contiguous(items: &[Item]) {
        for (index, item) in items.iter().enumerate() {
            assert_eq!(item.order, index as u32 + 1);
        }
    }

    #[test]
    fn test_clamped_insertion_order() {
        assert_eq!(clamped_insertion_order(None, 0), 1);
        assert_eq!(clamped_insertion_order(None, 3), 4);
        assert_eq!(clamped_insertion_order(Some(0), 3), 4);
        assert_eq!(clamped_insertion_order(Some(2), 3), 2);
        assert_eq!(clamped_insertion_order(Some(99), 3), 4);
    }

    #[test]
    fn test_move_to_front() {
        let group = items(&[("a", 1), ("b", 2), ("c", 3)]);
        let result = reorder(group, "c", 1);
        assert_eq!(ids(&result), vec!["c", "a", "b"]);
        assert_contiguous(&result);
    }

    #[test]
    fn test_move_to_middle() {
        let group = items(&[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        let result = reorder(group, "a", 3);
        assert_eq!(ids(&result), vec!["b", "c", "a", "d"]);
        assert_contiguous(&result);
    }

    #[test]
    fn test_desired_order_past_end_appends() {
        let group = items(&[("a", 1), ("b", 2), ("c", 3)]);
        let result = reorder(group, "a", 10);
        assert_eq!(ids(&result), vec!["b", "c", "a"]);
        assert_contiguous(&result);
    }

    #[test]
    fn test_insert_new_member_at_position() {
        let mut group = items(&[("a", 1), ("b", 2)]);
        group.push(Item {
            id: "new".into(),
            order: 2,
        });
        let result = reorder(group, "new", 2);
        assert_eq!(ids(&result), vec!["a", "new", "b"]);
        assert_contiguous(&result);
    }

    #[test]
    fn test_missing_target_still_renumbers() {
        let group = items(&[("a", 5), ("b", 9)]);
        let result = reorder(group, "ghost", 1);
        assert_eq!(ids(&result), vec!["a", "b"]);
        assert_contiguous(&result);
    }

    #[test]
    fn test_renumber_closes_gaps() {
        let group = items(&[("a", 2), ("b", 5), ("c", 9)]);
        let result = renumber(group);
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
        assert_contiguous(&result);
    }

    #[test]
    fn test_duplicate_orders_break_ties_by_input_order() {
        // Stable sort: equal orders keep their relative input position
        let group = items(&[("a", 1), ("b", 1), ("c", 2)]);
        let result = renumber(group);
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
        assert_contiguous(&result);
    }

    #[test]
    fn test_reorder_is_contiguous_after_any_sequence() {
        let mut group = items(&[("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)]);
        for (target, desired) in [("e", 1), ("a", 5), ("c", 2), ("b", 4), ("d", 3)] {
            group = reorder(group, target, desired);
            assert_contiguous(&group);
            assert_eq!(group.len(), 5);
        }
    }
}
