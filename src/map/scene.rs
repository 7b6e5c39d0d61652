//! Scene composition.
//!
//! [`Scene::compose`] is the pure half of the map panel: given the
//! navigation state and the catalog it decides exactly which overlays
//! exist and how the viewport frames them, leaving pixels to the canvas
//! layer. Every call rebuilds the whole set from scratch; nothing is
//! patched in place, so a stale or duplicated overlay cannot survive a
//! recompute.

use crate::model::{GeoPoint, LocationCatalog, NavState};
use crate::util::{format_distance, haversine_m};

/// Zoom for the default campus view (nothing resolved yet).
pub const CAMPUS_ZOOM: f64 = 16.0;
/// Closer zoom when focused on a destination without a user fix.
pub const DEST_ZOOM: f64 = 18.0;

/// One drawable item, tagged by role. Paint order is the `Vec` order in
/// [`Scene`]: path underneath, destination marker above it, user dot on
/// top.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Path {
        from: GeoPoint,
        to: GeoPoint,
        /// Formatted distance shown at the midpoint.
        label: String,
    },
    Destination {
        at: GeoPoint,
        name: String,
        direction: String,
    },
    User {
        at: GeoPoint,
    },
}

/// How the viewport frames the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Framing {
    Centered { center: GeoPoint, zoom: f64 },
    /// Both points padded into view; turned into a concrete projection
    /// only once the canvas size is known.
    FitPair { a: GeoPoint, b: GeoPoint },
}

/// Everything the canvas layer needs for one full repaint.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Campus anchor for the backdrop, independent of framing.
    pub home: GeoPoint,
    pub framing: Framing,
    pub overlays: Vec<Overlay>,
}

impl Scene {
    /// Rebuild the scene for the current state. `None` means the map
    /// surface should not exist at all, not merely be blank.
    ///
    /// An unresolved destination id (unknown, or the catalog simply not
    /// loaded yet) is an expected state, not an error: the scene falls
    /// back to the campus view and resolves itself on a later recompute
    /// once the catalog fills in.
    pub fn compose(nav: &NavState, catalog: &LocationCatalog, home: GeoPoint) -> Option<Self> {
        if !nav.map_visible {
            return None;
        }

        let destination = nav
            .selected_destination
            .as_ref()
            .and_then(|id| catalog.lookup(id));
        let Some(destination) = destination else {
            return Some(Self {
                home,
                framing: Framing::Centered {
                    center: home,
                    zoom: CAMPUS_ZOOM,
                },
                overlays: Vec::new(),
            });
        };

        let mut overlays = Vec::new();
        let framing = match nav.user_position {
            Some(fix) => {
                let meters = haversine_m(fix.point, destination.point);
                overlays.push(Overlay::Path {
                    from: fix.point,
                    to: destination.point,
                    label: format_distance(meters),
                });
                overlays.push(Overlay::Destination {
                    at: destination.point,
                    name: destination.name.clone(),
                    direction: destination.direction.clone(),
                });
                overlays.push(Overlay::User { at: fix.point });
                Framing::FitPair {
                    a: fix.point,
                    b: destination.point,
                }
            }
            None => {
                overlays.push(Overlay::Destination {
                    at: destination.point,
                    name: destination.name.clone(),
                    direction: destination.direction.clone(),
                });
                Framing::Centered {
                    center: destination.point,
                    zoom: DEST_ZOOM,
                }
            }
        };

        Some(Self {
            home,
            framing,
            overlays,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Location, NavAction, PositionFix};
    use std::rc::Rc;
    use yew::Reducible;

    const HOME: GeoPoint = GeoPoint {
        lat: 21.0047,
        lng: 79.0476,
    };

    fn fix(lat: f64, lng: f64) -> PositionFix {
        PositionFix {
            point: GeoPoint { lat, lng },
            captured_at_ms: 0.0,
        }
    }

    fn library() -> Location {
        Location {
            id: "library".into(),
            name: "Central Library".into(),
            point: GeoPoint {
                lat: 21.0060,
                lng: 79.0490,
            },
            direction: "north of the main building".into(),
        }
    }

    fn catalog() -> LocationCatalog {
        LocationCatalog::new(vec![library()])
    }

    fn reduce(state: Rc<NavState>, action: NavAction) -> Rc<NavState> {
        Reducible::reduce(state, action)
    }

    #[test]
    fn hidden_map_composes_nothing() {
        let nav = NavState::default();
        assert_eq!(Scene::compose(&nav, &catalog(), HOME), None);
    }

    #[test]
    fn unresolved_selection_renders_default_view() {
        let nav = reduce(
            Rc::new(NavState::default()),
            NavAction::SelectDestination {
                id: "library".into(),
                reveal: true,
            },
        );
        // Catalog not loaded yet: campus view, no destination artifacts.
        let scene = Scene::compose(&nav, &LocationCatalog::default(), HOME).unwrap();
        assert_eq!(
            scene.framing,
            Framing::Centered {
                center: HOME,
                zoom: CAMPUS_ZOOM
            }
        );
        assert!(scene.overlays.is_empty());
    }

    #[test]
    fn catalog_arrival_resolves_earlier_selection() {
        let nav = reduce(
            Rc::new(NavState::default()),
            NavAction::SelectDestination {
                id: "library".into(),
                reveal: true,
            },
        );
        let before = Scene::compose(&nav, &LocationCatalog::default(), HOME).unwrap();
        assert!(before.overlays.is_empty());
        // Same selection, catalog now filled: resolves without re-selecting.
        let after = Scene::compose(&nav, &catalog(), HOME).unwrap();
        assert!(matches!(after.overlays[0], Overlay::Destination { .. }));
    }

    #[test]
    fn destination_without_fix_focuses_close() {
        let nav = reduce(
            Rc::new(NavState::default()),
            NavAction::SelectDestination {
                id: "library".into(),
                reveal: true,
            },
        );
        let scene = Scene::compose(&nav, &catalog(), HOME).unwrap();
        assert_eq!(scene.overlays.len(), 1);
        assert_eq!(
            scene.framing,
            Framing::Centered {
                center: library().point,
                zoom: DEST_ZOOM
            }
        );
    }

    #[test]
    fn full_scene_orders_path_marker_user() {
        let nav = Rc::new(NavState::default());
        let nav = reduce(nav, NavAction::PositionUpdate(fix(21.0040, 79.0470)));
        let nav = reduce(
            nav,
            NavAction::SelectDestination {
                id: "library".into(),
                reveal: true,
            },
        );
        let scene = Scene::compose(&nav, &catalog(), HOME).unwrap();
        assert_eq!(scene.overlays.len(), 3);
        let Overlay::Path { label, from, to } = &scene.overlays[0] else {
            panic!("path must paint first");
        };
        assert_eq!(
            *label,
            format_distance(haversine_m(fix(21.0040, 79.0470).point, library().point))
        );
        assert!(matches!(scene.overlays[1], Overlay::Destination { .. }));
        assert!(matches!(scene.overlays[2], Overlay::User { .. }));
        assert_eq!(scene.framing, Framing::FitPair { a: *from, b: *to });
    }

    #[test]
    fn interleaving_order_is_irrelevant() {
        let select = || NavAction::SelectDestination {
            id: "library".into(),
            reveal: true,
        };
        let one = {
            let s = Rc::new(NavState::default());
            let s = reduce(s, NavAction::PositionUpdate(fix(21.0, 79.0)));
            let s = reduce(s, select());
            reduce(s, NavAction::PositionUpdate(fix(21.0041, 79.0469)))
        };
        let two = {
            let s = Rc::new(NavState::default());
            let s = reduce(s, select());
            let s = reduce(s, NavAction::PositionUpdate(fix(21.0, 79.0)));
            reduce(s, NavAction::PositionUpdate(fix(21.0041, 79.0469)))
        };
        // Directly constructed final state, bypassing the reducer.
        let direct = NavState {
            user_position: Some(fix(21.0041, 79.0469)),
            selected_destination: Some("library".into()),
            map_visible: true,
            revision: 0,
        };
        let scene_one = Scene::compose(&one, &catalog(), HOME);
        assert_eq!(scene_one, Scene::compose(&two, &catalog(), HOME));
        assert_eq!(scene_one, Scene::compose(&direct, &catalog(), HOME));
    }

    #[test]
    fn hide_then_reshow_rebuilds_identical_overlays() {
        let select = || NavAction::SelectDestination {
            id: "library".into(),
            reveal: true,
        };
        let shown = {
            let s = Rc::new(NavState::default());
            let s = reduce(s, NavAction::PositionUpdate(fix(21.0040, 79.0470)));
            reduce(s, select())
        };
        let first = Scene::compose(&shown, &catalog(), HOME).unwrap();

        let hidden = reduce(shown, NavAction::HideMap);
        assert_eq!(Scene::compose(&hidden, &catalog(), HOME), None);

        // Re-show with the same selection: the rebuilt set matches the
        // original exactly, nothing accumulated.
        let reshown = reduce(hidden, select());
        let second = Scene::compose(&reshown, &catalog(), HOME).unwrap();
        assert_eq!(first.overlays, second.overlays);
        assert_eq!(first.framing, second.framing);
    }
}
