use std::collections::{HashMap, HashSet};

use crate::models::{Department, DepartmentId};

/// A department enriched with its ordered children. Built fresh from the
/// flat list on every load; a new forest replaces the old one wholesale.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub department: Department,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn id(&self) -> DepartmentId {
        self.department.id
    }

    pub fn name(&self) -> &str {
        &self.department.name
    }

    /// Size of this subtree, the node itself included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Total node count across a forest.
pub fn forest_size(forest: &[TreeNode]) -> usize {
    forest.iter().map(TreeNode::size).sum()
}

/// Transform the flat department list into a rooted forest.
///
/// A department lands under its `parent_id` when that parent exists in the
/// same input; otherwise it becomes a root. That covers both genuine roots
/// (`parent_id: None`) and dangling references left behind by deletions.
/// Children are sorted by name (byte-wise, case-sensitive), ties by id, so
/// any permutation of the input produces the same forest.
pub fn build_forest(departments: &[Department]) -> Vec<TreeNode> {
    let known: HashSet<DepartmentId> = departments.iter().map(|d| d.id).collect();

    // parent id (resolved) -> child departments
    let mut children_of: HashMap<DepartmentId, Vec<&Department>> = HashMap::new();
    let mut roots: Vec<&Department> = Vec::new();

    for dep in departments {
        match dep.parent_id {
            Some(pid) if known.contains(&pid) && pid != dep.id => {
                children_of.entry(pid).or_default().push(dep);
            }
            _ => roots.push(dep),
        }
    }

    fn assemble(
        dep: &Department,
        children_of: &HashMap<DepartmentId, Vec<&Department>>,
    ) -> TreeNode {
        let mut children: Vec<TreeNode> = children_of
            .get(&dep.id)
            .map(|kids| kids.iter().map(|c| assemble(c, children_of)).collect())
            .unwrap_or_default();
        children.sort_by(|a, b| {
            a.department
                .name
                .cmp(&b.department.name)
                .then(a.department.id.cmp(&b.department.id))
        });
        TreeNode {
            department: dep.clone(),
            children,
        }
    }

    let mut forest: Vec<TreeNode> = roots
        .into_iter()
        .map(|dep| assemble(dep, &children_of))
        .collect();
    forest.sort_by(|a, b| {
        a.department
            .name
            .cmp(&b.department.name)
            .then(a.department.id.cmp(&b.department.id))
    });
    forest
}
