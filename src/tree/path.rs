use std::collections::{HashMap, HashSet};

use crate::models::{Department, DepartmentId};

/// Set of department ids on the chain from `selected` up to its root,
/// inclusive. `None` yields the empty set. A selected id the list does not
/// contain yields `{selected}`: the selection is kept visible even when a
/// concurrent refresh removed the row underneath it.
pub fn on_path_set(
    departments: &[Department],
    selected: Option<DepartmentId>,
) -> HashSet<DepartmentId> {
    on_path_set_from_links(
        departments.iter().map(|d| (d.id, d.parent_id)),
        selected,
    )
}

/// Same walk over bare `(id, parent_id)` links, for callers that only hold
/// a built forest rather than the flat row list.
pub fn on_path_set_from_links<I>(links: I, selected: Option<DepartmentId>) -> HashSet<DepartmentId>
where
    I: IntoIterator<Item = (DepartmentId, Option<DepartmentId>)>,
{
    let mut set = HashSet::new();
    let Some(start) = selected else {
        return set;
    };

    let parent_by_id: HashMap<DepartmentId, Option<DepartmentId>> = links.into_iter().collect();

    let mut cur = Some(start);
    while let Some(id) = cur {
        // revisiting means a malformed parent cycle; stop rather than spin
        if !set.insert(id) {
            break;
        }
        cur = parent_by_id.get(&id).copied().flatten();
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dep(id: DepartmentId, parent_id: Option<DepartmentId>) -> Department {
        Department {
            id,
            name: format!("d{}", id),
            description: None,
            parent_id,
            manager_user_id: None,
            manager_email: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn walks_to_the_root() {
        let rows = vec![dep(1, None), dep(2, Some(1)), dep(3, Some(2))];
        let path = on_path_set(&rows, Some(3));
        assert_eq!(path, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn none_selected_yields_empty_set() {
        let rows = vec![dep(1, None)];
        assert!(on_path_set(&rows, None).is_empty());
    }

    #[test]
    fn unknown_selection_yields_singleton() {
        let rows = vec![dep(1, None)];
        assert_eq!(on_path_set(&rows, Some(42)), HashSet::from([42]));
    }

    #[test]
    fn parent_cycle_terminates() {
        let rows = vec![dep(1, Some(2)), dep(2, Some(1))];
        let path = on_path_set(&rows, Some(1));
        assert_eq!(path, HashSet::from([1, 2]));
    }
}
