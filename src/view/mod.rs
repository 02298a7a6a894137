//! Interaction controller: explicit view state plus a pure reducer over a
//! closed set of interaction events. The host event loop translates raw
//! input (clicks, drags, wheel) into [`InteractionEvent`]s and re-renders
//! after each application; the controller itself never touches a surface.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::ViewConfig;
use crate::models::DepartmentId;
use crate::render::{Camera, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Everything a user can do to the tree view, as data. One dispatcher
/// consumes these instead of string-keyed handler lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    Select(DepartmentId),
    ToggleExpand(DepartmentId),
    /// `over_node` is true when the gesture started on a card; such a pan
    /// is suppressed so clicking a card never also drags the canvas.
    BeginPan {
        pointer: Point,
        over_node: bool,
    },
    Pan {
        pointer: Point,
    },
    EndPan,
    Zoom {
        pointer: Point,
        direction: ZoomDirection,
    },
    OpenContextMenu(DepartmentId),
    CloseContextMenu,
    RequestCreateChild {
        parent_id: DepartmentId,
    },
    RequestCreateRoot,
    CloseDialog,
}

/// An in-progress drag. Offset math is anchored to where the gesture began,
/// not accumulated per move event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    pub pointer_start: Point,
    pub camera_start: Point,
}

/// A requested creation dialog; `parent_id: None` means a new root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateDialog {
    pub parent_id: Option<DepartmentId>,
}

/// Ephemeral per-session view state. Reset wholesale on every full reload.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub selected_id: Option<DepartmentId>,
    pub expanded: HashSet<DepartmentId>,
    pub camera: Camera,
    /// At most one context menu is open at a time.
    pub context_menu: Option<DepartmentId>,
    pub dialog: Option<CreateDialog>,
    pub pan: Option<PanGesture>,
}

impl ViewState {
    /// First-load state: nothing selected, the whole tree open, identity
    /// camera.
    pub fn initial<I>(known_ids: I) -> Self
    where
        I: IntoIterator<Item = DepartmentId>,
    {
        Self {
            selected_id: None,
            expanded: known_ids.into_iter().collect(),
            camera: Camera::default(),
            context_menu: None,
            dialog: None,
            pan: None,
        }
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Apply one interaction event. All transitions are local and
    /// synchronous; mutation submission lives in the session, not here.
    pub fn apply(&mut self, event: InteractionEvent, cfg: &ViewConfig) {
        match event {
            InteractionEvent::Select(id) => {
                // expansion state is deliberately untouched
                self.selected_id = Some(id);
            }
            InteractionEvent::ToggleExpand(id) => {
                if !self.expanded.remove(&id) {
                    self.expanded.insert(id);
                }
            }
            InteractionEvent::BeginPan { pointer, over_node } => {
                if over_node {
                    return;
                }
                self.pan = Some(PanGesture {
                    pointer_start: pointer,
                    camera_start: self.camera.offset,
                });
            }
            InteractionEvent::Pan { pointer } => {
                if let Some(gesture) = self.pan {
                    self.camera.offset = gesture.camera_start + (pointer - gesture.pointer_start);
                }
            }
            InteractionEvent::EndPan => {
                self.pan = None;
            }
            InteractionEvent::Zoom { pointer, direction } => {
                let step = match direction {
                    ZoomDirection::In => cfg.zoom_step,
                    ZoomDirection::Out => -cfg.zoom_step,
                };
                let new_scale = (self.camera.scale + step).clamp(cfg.zoom_min, cfg.zoom_max);
                self.camera.zoom_toward(pointer, new_scale);
            }
            InteractionEvent::OpenContextMenu(id) => {
                // single slot: opening one closes any other
                self.context_menu = Some(id);
            }
            InteractionEvent::CloseContextMenu => {
                self.context_menu = None;
            }
            InteractionEvent::RequestCreateChild { parent_id } => {
                self.context_menu = None;
                self.dialog = Some(CreateDialog {
                    parent_id: Some(parent_id),
                });
            }
            InteractionEvent::RequestCreateRoot => {
                self.context_menu = None;
                self.dialog = Some(CreateDialog { parent_id: None });
            }
            InteractionEvent::CloseDialog => {
                self.dialog = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ViewState {
        ViewState::initial([1, 2, 3])
    }

    #[test]
    fn initial_state_is_fully_expanded_and_unselected() {
        let s = state();
        assert_eq!(s.selected_id, None);
        assert_eq!(s.expanded, HashSet::from([1, 2, 3]));
        assert_eq!(s.camera, Camera::default());
    }

    #[test]
    fn select_does_not_touch_expansion() {
        let cfg = ViewConfig::default();
        let mut s = state();
        s.apply(InteractionEvent::ToggleExpand(2), &cfg);
        s.apply(InteractionEvent::Select(3), &cfg);
        assert_eq!(s.selected_id, Some(3));
        assert!(!s.expanded.contains(&2));
    }

    #[test]
    fn pan_started_on_a_card_is_suppressed() {
        let cfg = ViewConfig::default();
        let mut s = state();
        s.apply(
            InteractionEvent::BeginPan {
                pointer: Point::new(10.0, 10.0),
                over_node: true,
            },
            &cfg,
        );
        assert!(!s.is_panning());
        s.apply(
            InteractionEvent::Pan {
                pointer: Point::new(50.0, 50.0),
            },
            &cfg,
        );
        assert_eq!(s.camera.offset, Point::default());
    }

    #[test]
    fn pan_tracks_from_the_gesture_anchor() {
        let cfg = ViewConfig::default();
        let mut s = state();
        s.apply(
            InteractionEvent::BeginPan {
                pointer: Point::new(100.0, 100.0),
                over_node: false,
            },
            &cfg,
        );
        s.apply(
            InteractionEvent::Pan {
                pointer: Point::new(130.0, 80.0),
            },
            &cfg,
        );
        assert_eq!(s.camera.offset, Point::new(30.0, -20.0));
        s.apply(InteractionEvent::EndPan, &cfg);
        assert!(!s.is_panning());
    }

    #[test]
    fn zoom_clamps_at_both_bounds() {
        let cfg = ViewConfig::default();
        let mut s = state();
        let pointer = Point::new(0.0, 0.0);
        for _ in 0..100 {
            s.apply(
                InteractionEvent::Zoom {
                    pointer,
                    direction: ZoomDirection::Out,
                },
                &cfg,
            );
        }
        assert!((s.camera.scale - cfg.zoom_min).abs() < 1e-12);
        for _ in 0..100 {
            s.apply(
                InteractionEvent::Zoom {
                    pointer,
                    direction: ZoomDirection::In,
                },
                &cfg,
            );
        }
        assert!((s.camera.scale - cfg.zoom_max).abs() < 1e-12);
    }

    #[test]
    fn context_menu_is_exclusive() {
        let cfg = ViewConfig::default();
        let mut s = state();
        s.apply(InteractionEvent::OpenContextMenu(1), &cfg);
        s.apply(InteractionEvent::OpenContextMenu(2), &cfg);
        assert_eq!(s.context_menu, Some(2));
        s.apply(InteractionEvent::CloseContextMenu, &cfg);
        assert_eq!(s.context_menu, None);
    }

    #[test]
    fn create_requests_open_a_scoped_dialog_and_close_the_menu() {
        let cfg = ViewConfig::default();
        let mut s = state();
        s.apply(InteractionEvent::OpenContextMenu(1), &cfg);
        s.apply(InteractionEvent::RequestCreateChild { parent_id: 1 }, &cfg);
        assert_eq!(s.context_menu, None);
        assert_eq!(
            s.dialog,
            Some(CreateDialog {
                parent_id: Some(1)
            })
        );
        s.apply(InteractionEvent::RequestCreateRoot, &cfg);
        assert_eq!(s.dialog, Some(CreateDialog { parent_id: None }));
        s.apply(InteractionEvent::CloseDialog, &cfg);
        assert_eq!(s.dialog, None);
    }
}
