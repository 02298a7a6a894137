//! Subtree-width layout: every subtree claims a horizontal span wide enough
//! for all of its visible children, and each card is centered over the span
//! of its own children. Coordinates are untransformed layout units.

use std::collections::HashSet;

use crate::config::ViewConfig;
use crate::models::DepartmentId;
use crate::render::{Point, RenderEdge, RenderNode};
use crate::tree::TreeNode;

pub(super) struct LayoutParams<'a> {
    pub cfg: &'a ViewConfig,
    pub expanded: &'a HashSet<DepartmentId>,
    pub selected: Option<DepartmentId>,
    pub on_path: &'a HashSet<DepartmentId>,
    pub menu_open: Option<DepartmentId>,
}

pub(super) struct Placed {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub width: f64,
    pub height: f64,
}

pub(super) fn place_forest(forest: &[TreeNode], p: &LayoutParams) -> Placed {
    let mut out = Placed {
        nodes: Vec::new(),
        edges: Vec::new(),
        width: 0.0,
        height: 0.0,
    };

    let mut left = 0.0;
    for (i, root) in forest.iter().enumerate() {
        if i > 0 {
            left += p.cfg.h_gap;
        }
        let w = span(root, p);
        place(root, 0, left, p, &mut out);
        left += w;
    }
    out.width = left;
    out
}

/// Whether this node's children are visible at all.
fn subtree_visible(node: &TreeNode, p: &LayoutParams) -> bool {
    !node.children.is_empty() && p.expanded.contains(&node.id())
}

/// Horizontal span claimed by a subtree. Collapsed or childless nodes claim
/// exactly one card width.
fn span(node: &TreeNode, p: &LayoutParams) -> f64 {
    if !subtree_visible(node, p) {
        return p.cfg.node_width;
    }
    let children: f64 = node.children.iter().map(|c| span(c, p)).sum::<f64>()
        + p.cfg.h_gap * (node.children.len() - 1) as f64;
    children.max(p.cfg.node_width)
}

fn place(node: &TreeNode, depth: usize, left: f64, p: &LayoutParams, out: &mut Placed) {
    let cfg = p.cfg;
    let w = span(node, p);
    let center_x = left + w / 2.0;
    let x = center_x - cfg.node_width / 2.0;
    let y = depth as f64 * (cfg.node_height + cfg.v_gap);

    let id = node.id();
    let dep = &node.department;
    out.nodes.push(RenderNode {
        id,
        name: dep.name.clone(),
        description: dep.description.clone(),
        manager_email: dep.manager_email.clone(),
        depth,
        x,
        y,
        child_count: node.children.len(),
        has_children: !node.children.is_empty(),
        is_expanded: p.expanded.contains(&id),
        is_selected: p.selected == Some(id),
        on_selected_path: p.on_path.contains(&id),
        menu_open: p.menu_open == Some(id),
    });
    out.height = out.height.max(y + cfg.node_height);

    if !subtree_visible(node, p) {
        return;
    }

    let mut child_left = left;
    // center the child row when a single card is wider than its children
    let children_width: f64 = node.children.iter().map(|c| span(c, p)).sum::<f64>()
        + cfg.h_gap * (node.children.len() - 1) as f64;
    if children_width < w {
        child_left += (w - children_width) / 2.0;
    }

    for (i, child) in node.children.iter().enumerate() {
        if i > 0 {
            child_left += cfg.h_gap;
        }
        let child_w = span(child, p);
        let child_center = child_left + child_w / 2.0;
        let child_y = (depth + 1) as f64 * (cfg.node_height + cfg.v_gap);
        out.edges.push(RenderEdge {
            parent_id: id,
            child_id: child.id(),
            from: Point::new(center_x, y + cfg.node_height),
            to: Point::new(child_center, child_y),
        });
        place(child, depth + 1, child_left, p, out);
        child_left += child_w;
    }
}
