//! Core data models for the campus guide.
//!
//! Everything the map panel shows derives from two records defined here:
//! the fetched-once [`LocationCatalog`] and the reducer-owned [`NavState`].
//! The chat transcript lives in its own reducer ([`ChatState`]) so that a
//! slow guide request never touches navigation state, and vice versa.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::rc::Rc;
use yew::Reducible;

/// Campus coordinate used when neither the backend nor the device can
/// supply one (college info fetch failed, geolocation denied).
pub const CAMPUS_FALLBACK: GeoPoint = GeoPoint {
    lat: 21.0047,
    lng: 79.0476,
};

/// First message the guide shows before the user has typed anything.
pub const GREETING: &str =
    "Hi! I'm your campus guide. Ask me where anything is and I'll point the way.";

/// Fixed apology appended when a guide request fails. Never propagated as
/// an error past the send callback.
pub const GUIDE_OFFLINE_APOLOGY: &str =
    "Sorry, I couldn't reach the campus guide service. Please try again in a moment.";

/// One-time notice when the location catalog could not be loaded; the
/// chat keeps working, maps stay unavailable.
pub const CATALOG_OFFLINE_NOTICE: &str =
    "Heads up: I couldn't load the campus locations, so I can't show maps right now. \
     You can still ask me questions!";

/// Notice when the college info (default map center) could not be loaded.
pub const CAMPUS_INFO_OFFLINE_NOTICE: &str =
    "I couldn't load the college details, so the map will use a built-in campus center.";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// One sample from the position sensor. Samples supersede each other;
/// only the most recent is kept (in `NavState::user_position`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionFix {
    pub point: GeoPoint,
    /// Capture time in ms since the epoch, as reported by the sensor.
    pub captured_at_ms: f64,
}

/// Opaque stable key for a catalog entry. The backend is inconsistent
/// about id types (string ids on /locations, a numeric id on /college),
/// so both JSON forms are accepted and normalized to the string form.
/// Nothing may order or index by these.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LocationId(String);

impl LocationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for LocationId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl<'de> Deserialize<'de> for LocationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

/// One named destination from the catalog. Immutable once fetched.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub point: GeoPoint,
    /// Free-text hint like "north of the main building".
    pub direction: String,
}

/// The destination catalog, fetched once at startup. An empty catalog is
/// the degraded mode after a failed fetch: lookups miss, the map shows
/// the default view, nothing throws.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationCatalog {
    rows: Vec<Location>,
}

impl LocationCatalog {
    pub fn new(rows: Vec<Location>) -> Self {
        Self { rows }
    }

    /// A miss is a normal condition (unknown id, or catalog not loaded yet).
    pub fn lookup(&self, id: &LocationId) -> Option<&Location> {
        self.rows.iter().find(|row| &row.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// College identity from `GET /college`; supplies the default map center
/// and the About page header.
#[derive(Clone, Debug, PartialEq)]
pub struct Campus {
    pub name: String,
    pub center: GeoPoint,
}

// ---------------- Navigation state & reducer -----------------

/// The single mutable record behind the map panel. Every producer
/// (position stream, chat replies, the hide button) funnels through
/// [`NavAction`]; nothing else writes these fields, which is what makes
/// arrival order irrelevant to the rendered scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavState {
    /// Latest sensor fix; each update replaces the previous one.
    pub user_position: Option<PositionFix>,
    /// Accepted even while unresolvable; resolution happens at compose time.
    pub selected_destination: Option<LocationId>,
    /// False implies the map surface is unmounted, not merely hidden.
    pub map_visible: bool,
    /// Bumped on every transition; drives redraw effects.
    pub revision: u64,
}

#[derive(Clone, Debug)]
pub enum NavAction {
    PositionUpdate(PositionFix),
    SelectDestination { id: LocationId, reveal: bool },
    HideMap,
}

impl Reducible for NavState {
    type Action = NavAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            NavAction::PositionUpdate(fix) => {
                next.user_position = Some(fix);
            }
            NavAction::SelectDestination { id, reveal } => {
                next.selected_destination = Some(id);
                next.map_visible = reveal || next.map_visible;
            }
            NavAction::HideMap => {
                next.map_visible = false;
                next.selected_destination = None;
            }
        }
        next.revision = next.revision.wrapping_add(1);
        Rc::new(next)
    }
}

// ---------------- Chat transcript & reducer -----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Author {
    User,
    Guide,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
    /// "HH:MM" display label; produced at the call site so the reducer
    /// stays clock-free.
    pub at: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    /// True while a guide request is outstanding; the input row is
    /// disabled and further submits are ignored.
    pub pending: bool,
}

impl ChatState {
    /// Transcript seeded with the guide's greeting.
    pub fn seeded(at: &str) -> Self {
        Self {
            messages: vec![ChatMessage {
                author: Author::Guide,
                text: GREETING.to_string(),
                at: at.to_string(),
            }],
            pending: false,
        }
    }
}

#[derive(Clone, Debug)]
pub enum ChatAction {
    /// User pressed send. Ignored while a request is already pending.
    Submit { text: String, at: String },
    /// Guide reply for the pending request.
    Reply { text: String, at: String },
    /// Out-of-band guide message (startup notices); leaves `pending` alone.
    Notice { text: String, at: String },
    /// The pending request failed; append the fixed apology.
    Failed { at: String },
}

impl Reducible for ChatState {
    type Action = ChatAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ChatAction::Submit { text, at } => {
                if next.pending {
                    return self;
                }
                next.messages.push(ChatMessage {
                    author: Author::User,
                    text,
                    at,
                });
                next.pending = true;
            }
            ChatAction::Reply { text, at } => {
                next.messages.push(ChatMessage {
                    author: Author::Guide,
                    text,
                    at,
                });
                next.pending = false;
            }
            ChatAction::Notice { text, at } => {
                next.messages.push(ChatMessage {
                    author: Author::Guide,
                    text,
                    at,
                });
            }
            ChatAction::Failed { at } => {
                next.messages.push(ChatMessage {
                    author: Author::Guide,
                    text: GUIDE_OFFLINE_APOLOGY.to_string(),
                    at,
                });
                next.pending = false;
            }
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(lat: f64, lng: f64) -> PositionFix {
        PositionFix {
            point: GeoPoint { lat, lng },
            captured_at_ms: 0.0,
        }
    }

    fn reduce_nav(state: Rc<NavState>, action: NavAction) -> Rc<NavState> {
        Reducible::reduce(state, action)
    }

    fn reduce_chat(state: Rc<ChatState>, action: ChatAction) -> Rc<ChatState> {
        Reducible::reduce(state, action)
    }

    #[test]
    fn position_update_replaces_unconditionally() {
        let s = Rc::new(NavState::default());
        let s = reduce_nav(s, NavAction::PositionUpdate(fix(21.0, 79.0)));
        let s = reduce_nav(s, NavAction::PositionUpdate(fix(21.1, 79.1)));
        assert_eq!(s.user_position, Some(fix(21.1, 79.1)));
        assert_eq!(s.revision, 2);
    }

    #[test]
    fn select_without_reveal_keeps_visibility() {
        let s = Rc::new(NavState::default());
        let s = reduce_nav(
            s,
            NavAction::SelectDestination {
                id: "library".into(),
                reveal: true,
            },
        );
        assert!(s.map_visible);
        // A later selection with reveal = false must not hide the map.
        let s = reduce_nav(
            s,
            NavAction::SelectDestination {
                id: "cafeteria".into(),
                reveal: false,
            },
        );
        assert!(s.map_visible);
        assert_eq!(s.selected_destination, Some("cafeteria".into()));
    }

    #[test]
    fn hide_clears_selection_but_keeps_position() {
        let s = Rc::new(NavState::default());
        let s = reduce_nav(s, NavAction::PositionUpdate(fix(21.0, 79.0)));
        let s = reduce_nav(
            s,
            NavAction::SelectDestination {
                id: "library".into(),
                reveal: true,
            },
        );
        let s = reduce_nav(s, NavAction::HideMap);
        assert!(!s.map_visible);
        assert_eq!(s.selected_destination, None);
        assert_eq!(s.user_position, Some(fix(21.0, 79.0)));
    }

    #[test]
    fn unresolved_id_is_accepted_at_selection_time() {
        let catalog = LocationCatalog::default();
        let s = Rc::new(NavState::default());
        let s = reduce_nav(
            s,
            NavAction::SelectDestination {
                id: "not-in-catalog".into(),
                reveal: true,
            },
        );
        assert_eq!(s.selected_destination, Some("not-in-catalog".into()));
        assert!(catalog.lookup(&"not-in-catalog".into()).is_none());
    }

    #[test]
    fn submit_while_pending_is_ignored() {
        let s = Rc::new(ChatState::default());
        let s = reduce_chat(
            s,
            ChatAction::Submit {
                text: "where is the library?".into(),
                at: "12:00".into(),
            },
        );
        let before = s.messages.len();
        let s = reduce_chat(
            s,
            ChatAction::Submit {
                text: "hello?".into(),
                at: "12:00".into(),
            },
        );
        assert_eq!(s.messages.len(), before);
        assert!(s.pending);
    }

    #[test]
    fn reply_clears_pending() {
        let s = Rc::new(ChatState::default());
        let s = reduce_chat(
            s,
            ChatAction::Submit {
                text: "hi".into(),
                at: "12:00".into(),
            },
        );
        let s = reduce_chat(
            s,
            ChatAction::Reply {
                text: "Hello!".into(),
                at: "12:00".into(),
            },
        );
        assert!(!s.pending);
        assert_eq!(s.messages.last().unwrap().author, Author::Guide);
    }

    #[test]
    fn failure_appends_fixed_apology_and_unblocks() {
        let s = Rc::new(ChatState::default());
        let s = reduce_chat(
            s,
            ChatAction::Submit {
                text: "hi".into(),
                at: "12:00".into(),
            },
        );
        let s = reduce_chat(s, ChatAction::Failed { at: "12:01".into() });
        assert!(!s.pending);
        assert_eq!(s.messages.last().unwrap().text, GUIDE_OFFLINE_APOLOGY);
    }

    #[test]
    fn notice_does_not_touch_pending() {
        let s = Rc::new(ChatState::default());
        let s = reduce_chat(
            s,
            ChatAction::Submit {
                text: "hi".into(),
                at: "12:00".into(),
            },
        );
        let s = reduce_chat(
            s,
            ChatAction::Notice {
                text: CATALOG_OFFLINE_NOTICE.into(),
                at: "12:00".into(),
            },
        );
        assert!(s.pending);
        assert_eq!(s.messages.last().unwrap().text, CATALOG_OFFLINE_NOTICE);
    }

    #[test]
    fn catalog_failure_notice_appears_exactly_once() {
        // The startup effect runs once; this mirrors its dispatch.
        let s = Rc::new(ChatState::seeded("12:00"));
        let s = reduce_chat(
            s,
            ChatAction::Notice {
                text: CATALOG_OFFLINE_NOTICE.into(),
                at: "12:00".into(),
            },
        );
        let notices = s
            .messages
            .iter()
            .filter(|m| m.text == CATALOG_OFFLINE_NOTICE)
            .count();
        assert_eq!(notices, 1);
    }

    #[test]
    fn location_id_accepts_string_and_number_json() {
        let from_text: LocationId = serde_json::from_str("\"main_gate\"").unwrap();
        let from_number: LocationId = serde_json::from_str("7").unwrap();
        assert_eq!(from_text, "main_gate".into());
        assert_eq!(from_number, "7".into());
    }

    #[test]
    fn catalog_lookup_hits_and_misses() {
        let catalog = LocationCatalog::new(vec![Location {
            id: "library".into(),
            name: "Central Library".into(),
            point: GeoPoint {
                lat: 21.0050,
                lng: 79.0480,
            },
            direction: "central".into(),
        }]);
        assert_eq!(
            catalog.lookup(&"library".into()).map(|l| l.name.as_str()),
            Some("Central Library")
        );
        assert!(catalog.lookup(&"pool".into()).is_none());
    }
}
