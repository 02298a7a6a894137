//! Tree renderer: turns a built forest plus the current view state into a
//! flat description of cards, connecting edges and per-node decorations.
//! The presentation layer (DOM, canvas, terminal) consumes this as data;
//! no drawing happens here.
//!
//! Hosts rebuild the whole description after every state change. At the
//! expected scale (low hundreds of departments) that is cheaper than
//! incremental diffing, and it is the intended usage, not a shortcut.

pub mod camera;
mod layout;

use serde::Serialize;
use std::collections::HashSet;

pub use camera::{Camera, Point};

use crate::config::ViewConfig;
use crate::models::DepartmentId;
use crate::tree::path::on_path_set_from_links;
use crate::tree::TreeNode;
use crate::view::ViewState;

/// One department card, positioned in untransformed layout space.
#[derive(Debug, Clone, Serialize)]
pub struct RenderNode {
    pub id: DepartmentId,
    pub name: String,
    pub description: Option<String>,
    pub manager_email: Option<String>,
    pub depth: usize,
    /// Top-left corner, layout units.
    pub x: f64,
    pub y: f64,
    pub child_count: usize,
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
    pub on_selected_path: bool,
    pub menu_open: bool,
}

/// Connector from a parent card's bottom edge to a child card's top edge.
#[derive(Debug, Clone, Serialize)]
pub struct RenderEdge {
    pub parent_id: DepartmentId,
    pub child_id: DepartmentId,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderTree {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    /// Applied by the presentation layer via [`Camera::project`]; node and
    /// edge coordinates stay untransformed.
    pub camera: Camera,
    pub width: f64,
    pub height: f64,
}

impl RenderTree {
    pub fn node(&self, id: DepartmentId) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Produce the visual description of `forest` under `view`.
///
/// A collapsed node still renders its own card but none of its subtree or
/// the connectors below it. The on-path decoration walks `parent_id` links
/// from the selected node to its root.
pub fn render(forest: &[TreeNode], view: &ViewState, cfg: &ViewConfig) -> RenderTree {
    let mut links: Vec<(DepartmentId, Option<DepartmentId>)> = Vec::new();
    let mut stack: Vec<&TreeNode> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        links.push((node.id(), node.department.parent_id));
        stack.extend(node.children.iter());
    }

    let on_path: HashSet<DepartmentId> = on_path_set_from_links(links, view.selected_id);

    let params = layout::LayoutParams {
        cfg,
        expanded: &view.expanded,
        selected: view.selected_id,
        on_path: &on_path,
        menu_open: view.context_menu,
    };
    let placed = layout::place_forest(forest, &params);

    RenderTree {
        nodes: placed.nodes,
        edges: placed.edges,
        camera: view.camera,
        width: placed.width,
        height: placed.height,
    }
}
