use super::{IndexChangeSet, IndexChanges};
use crate::snapshot::IndexSnapshot;

/// Diff the constituent sets of every index present in `current`.
///
/// An index new in `current` reports all of its tickers as added. An index
/// present only in `previous` produces no entry. Indexes whose sets are equal
/// are omitted.
pub fn diff_indexes(previous: &IndexSnapshot, current: &IndexSnapshot) -> IndexChanges {
    let mut changes = IndexChanges::new();

    for (index_name, curr_set) in current {
        let change_set = match previous.get(index_name) {
            Some(prev_set) => IndexChangeSet {
                // BTreeSet difference iterates in ascending order.
                added: curr_set.difference(prev_set).cloned().collect(),
                removed: prev_set.difference(curr_set).cloned().collect(),
            },
            None => IndexChangeSet {
                added: curr_set.iter().cloned().collect(),
                removed: Vec::new(),
            },
        };

        if !change_set.is_empty() {
            changes.insert(index_name.clone(), change_set);
        }
    }

    changes
}
