//! Per-tab selection state
//!
//! Selections are values: a toggle never mutates the previous selection in
//! place, it produces the next one. Earlier snapshots (for example the one a
//! frame was drawn from) stay valid.

/// Result of toggling one index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Index was added to a multi-select set
    Inserted,
    /// Index was removed from a multi-select set
    Removed,
    /// Single-select mode: the index became the selection
    Replaced { previous: Option<usize> },
    /// Multi-select set was full; nothing changed
    Rejected { capacity: usize },
}

impl ToggleOutcome {
    /// Whether the selection changed (and the owner must be told)
    pub fn is_change(&self) -> bool {
        !matches!(self, ToggleOutcome::Rejected { .. })
    }
}

/// Insertion-ordered, duplicate-free set of indices with a maximum size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    indices: Vec<usize>,
    capacity: usize,
}

impl SelectionSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Indices in the order they were selected
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Capacity-constrained toggle
    ///
    /// Removal is always allowed. Insertion is refused once `capacity`
    /// indices are held, in which case the returned set equals `self`.
    pub fn toggled(&self, index: usize) -> (SelectionSet, ToggleOutcome) {
        if let Some(pos) = self.indices.iter().position(|&i| i == index) {
            let mut indices = self.indices.clone();
            indices.remove(pos);
            return (
                SelectionSet {
                    indices,
                    capacity: self.capacity,
                },
                ToggleOutcome::Removed,
            );
        }

        if self.indices.len() >= self.capacity {
            return (
                self.clone(),
                ToggleOutcome::Rejected {
                    capacity: self.capacity,
                },
            );
        }

        let mut indices = self.indices.clone();
        indices.push(index);
        (
            SelectionSet {
                indices,
                capacity: self.capacity,
            },
            ToggleOutcome::Inserted,
        )
    }
}

/// Selection held by one gallery; the variant is fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// At most one index; `None` is distinct from index 0
    Single(Option<usize>),
    Multiple(SelectionSet),
}

impl Selection {
    pub fn single() -> Self {
        Selection::Single(None)
    }

    pub fn multiple(max_selectable: usize) -> Self {
        Selection::Multiple(SelectionSet::with_capacity(max_selectable))
    }

    pub fn contains(&self, index: usize) -> bool {
        match self {
            Selection::Single(selected) => *selected == Some(index),
            Selection::Multiple(set) => set.contains(index),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Single(selected) => usize::from(selected.is_some()),
            Selection::Multiple(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selected indices in selection order
    pub fn indices(&self) -> Vec<usize> {
        match self {
            Selection::Single(selected) => selected.iter().copied().collect(),
            Selection::Multiple(set) => set.as_slice().to_vec(),
        }
    }

    /// Produce the selection that results from activating `index`
    pub fn toggled(&self, index: usize) -> (Selection, ToggleOutcome) {
        match self {
            Selection::Single(previous) => (
                Selection::Single(Some(index)),
                ToggleOutcome::Replaced {
                    previous: *previous,
                },
            ),
            Selection::Multiple(set) => {
                let (next, outcome) = set.toggled(index);
                (Selection::Multiple(next), outcome)
            }
        }
    }

    /// Same mode and capacity, nothing selected
    pub fn cleared(&self) -> Selection {
        match self {
            Selection::Single(_) => Selection::Single(None),
            Selection::Multiple(set) => Selection::multiple(set.capacity()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_multi_select_rejects_at_capacity() {
        let selection = Selection::multiple(2);
        let (selection, first) = selection.toggled(0);
        let (selection, second) = selection.toggled(1);
        let (selection, third) = selection.toggled(2);

        assert_eq!(first, ToggleOutcome::Inserted);
        assert_eq!(second, ToggleOutcome::Inserted);
        assert_eq!(third, ToggleOutcome::Rejected { capacity: 2 });
        assert!(!third.is_change());
        assert_eq!(selection.indices(), vec![0, 1]);
    }

    #[test]
    fn test_removal_allowed_at_capacity() {
        let (selection, _) = Selection::multiple(1).toggled(4);
        let (selection, outcome) = selection.toggled(4);
        assert_eq!(outcome, ToggleOutcome::Removed);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_selection_order_is_preserved() {
        let (selection, _) = Selection::multiple(10).toggled(3);
        let (selection, _) = selection.toggled(1);
        assert_eq!(selection.indices(), vec![3, 1]);
    }

    #[test]
    fn test_single_select_replaces() {
        let selection = Selection::single();
        assert!(!selection.contains(0));

        let (selection, outcome) = selection.toggled(0);
        assert_eq!(outcome, ToggleOutcome::Replaced { previous: None });
        assert!(selection.contains(0));

        let (selection, outcome) = selection.toggled(2);
        assert_eq!(outcome, ToggleOutcome::Replaced { previous: Some(0) });
        assert_eq!(selection.indices(), vec![2]);
    }

    #[test]
    fn test_toggle_does_not_touch_previous_value() {
        let before = Selection::multiple(5);
        let (after, _) = before.toggled(3);
        assert!(before.is_empty());
        assert!(after.contains(3));
    }

    #[test]
    fn test_cleared_keeps_mode_and_capacity() {
        let (selection, _) = Selection::multiple(3).toggled(1);
        assert_eq!(selection.cleared(), Selection::multiple(3));
        assert_eq!(Selection::Single(Some(2)).cleared(), Selection::single());
    }

    proptest! {
        #[test]
        fn prop_capacity_never_exceeded(
            capacity in 0usize..6,
            toggles in prop::collection::vec(0usize..12, 0..64),
        ) {
            let mut selection = Selection::multiple(capacity);
            for index in toggles {
                let (next, _) = selection.toggled(index);
                selection = next;
                prop_assert!(selection.len() <= capacity);
            }
        }

        #[test]
        fn prop_no_duplicate_indices(toggles in prop::collection::vec(0usize..8, 0..64)) {
            let mut selection = Selection::multiple(10);
            for index in toggles {
                selection = selection.toggled(index).0;
                let mut indices = selection.indices();
                let len = indices.len();
                indices.sort_unstable();
                indices.dedup();
                prop_assert_eq!(indices.len(), len);
            }
        }

        #[test]
        fn prop_double_toggle_is_identity(
            capacity in 0usize..5,
            seed in prop::collection::vec(0usize..10, 0..10),
            index in 0usize..10,
        ) {
            let mut selection = Selection::multiple(capacity);
            for i in seed {
                selection = selection.toggled(i).0;
            }
            let (once, outcome) = selection.toggled(index);
            let (twice, _) = once.toggled(index);
            if outcome.is_change() {
                // Re-inserting a removed index moves it to the end, so compare as sets
                let mut expected = selection.indices();
                let mut actual = twice.indices();
                expected.sort_unstable();
                actual.sort_unstable();
                prop_assert_eq!(actual, expected);
            } else {
                prop_assert_eq!(&once, &selection);
                prop_assert_eq!(twice, selection);
            }
        }

        #[test]
        fn prop_single_select_holds_at_most_one(toggles in prop::collection::vec(0usize..8, 1..32)) {
            let mut selection = Selection::single();
            for index in &toggles {
                selection = selection.toggled(*index).0;
                prop_assert!(selection.len() <= 1);
            }
            prop_assert_eq!(selection.indices(), vec![*toggles.last().unwrap()]);
        }
    }
}
