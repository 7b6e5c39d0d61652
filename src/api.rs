//! Campus backend contract.
//!
//! Three plain-HTTP endpoints, no auth, no retries: the destination
//! catalog, the college identity (default map center), and the guide
//! query itself. Wire shapes stay in this module; callers get model
//! types. Any failure here surfaces as a chat message at the call site,
//! never as a propagated error.

use gloo_net::http::Request;
use gloo_net::Error;
use serde::{Deserialize, Serialize};

use crate::model::{Campus, GeoPoint, Location, LocationId};

const API_BASE: &str = "http://localhost:3001/api";

#[derive(Debug, Clone, Deserialize)]
struct LocationRow {
    id: LocationId,
    name: String,
    lat: f64,
    lng: f64,
    direction: String,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location {
            id: row.id,
            name: row.name,
            point: GeoPoint {
                lat: row.lat,
                lng: row.lng,
            },
            direction: row.direction,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CollegeRow {
    #[allow(dead_code)]
    id: LocationId,
    name: String,
    lat: f64,
    lng: f64,
}

impl From<CollegeRow> for Campus {
    fn from(row: CollegeRow) -> Self {
        Campus {
            name: row.name,
            center: GeoPoint {
                lat: row.lat,
                lng: row.lng,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct GuideQuery<'a> {
    query: &'a str,
}

/// What the resolver sends back for one question.
#[derive(Debug, Clone, Deserialize)]
pub struct GuideReply {
    pub message: String,
    #[serde(default)]
    pub location: Option<LocationRef>,
    #[serde(rename = "showMap", default)]
    pub show_map: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationRef {
    pub id: LocationId,
}

fn checked(response: gloo_net::http::Response) -> Result<gloo_net::http::Response, Error> {
    if response.ok() {
        Ok(response)
    } else {
        Err(Error::GlooError(format!(
            "{} returned {}",
            response.url(),
            response.status()
        )))
    }
}

/// Fetch the whole destination catalog. Called once at startup; a failed
/// call leaves the catalog empty (there is no partial fill).
pub async fn fetch_locations() -> Result<Vec<Location>, Error> {
    let rows: Vec<LocationRow> = checked(
        Request::get(&format!("{API_BASE}/locations"))
            .send()
            .await?,
    )?
    .json()
    .await?;
    Ok(rows.into_iter().map(Location::from).collect())
}

/// Fetch the college identity used as the default map center.
pub async fn fetch_college() -> Result<Campus, Error> {
    let row: CollegeRow = checked(Request::get(&format!("{API_BASE}/college")).send().await?)?
        .json()
        .await?;
    Ok(row.into())
}

/// Ask the guide one free-text question.
pub async fn ask_guide(text: &str) -> Result<GuideReply, Error> {
    let response = Request::post(&format!("{API_BASE}/campus-guide"))
        .json(&GuideQuery { query: text })?
        .send()
        .await?;
    checked(response)?.json().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_rows_map_to_catalog_entries() {
        let raw = r#"[
            {"id": "main_gate", "name": "Main Gate", "lat": 21.006, "lng": 79.049, "direction": "north"},
            {"id": 2, "name": "Cafeteria", "lat": 21.004, "lng": 79.047, "direction": "south"}
        ]"#;
        let rows: Vec<LocationRow> = serde_json::from_str(raw).unwrap();
        let locations: Vec<Location> = rows.into_iter().map(Location::from).collect();
        assert_eq!(locations[0].id, "main_gate".into());
        // Numeric ids normalize to their string form.
        assert_eq!(locations[1].id, "2".into());
        assert_eq!(locations[1].point.lng, 79.047);
    }

    #[test]
    fn college_row_maps_to_campus() {
        let raw = r#"{"id": 1, "name": "St. Vincent Pallotti College", "lat": 21.0047, "lng": 79.0476}"#;
        let row: CollegeRow = serde_json::from_str(raw).unwrap();
        let campus = Campus::from(row);
        assert_eq!(campus.name, "St. Vincent Pallotti College");
        assert_eq!(campus.center.lat, 21.0047);
    }

    #[test]
    fn guide_reply_reads_camel_case_show_map() {
        let raw = r#"{"message": "The library is central.", "location": {"id": "library"}, "showMap": true}"#;
        let reply: GuideReply = serde_json::from_str(raw).unwrap();
        assert!(reply.show_map);
        assert_eq!(reply.location.unwrap().id, "library".into());
    }

    #[test]
    fn guide_reply_without_location_or_map() {
        let raw = r#"{"message": "Hello!", "location": null, "showMap": false}"#;
        let reply: GuideReply = serde_json::from_str(raw).unwrap();
        assert!(reply.location.is_none());
        assert!(!reply.show_map);
    }

    #[test]
    fn guide_query_wire_shape() {
        let body = serde_json::to_string(&GuideQuery {
            query: "where is the cafeteria?",
        })
        .unwrap();
        assert_eq!(body, r#"{"query":"where is the cafeteria?"}"#);
    }
}
