use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One sample along a route: location plus the absolute time it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
    pub timestamp: DateTime<Utc>,
}

/// Category of a route event marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Congestion,
    Reroute,
    Incident,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Congestion, EventKind::Reroute, EventKind::Incident];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Congestion => "congestion",
            EventKind::Reroute => "reroute",
            EventKind::Incident => "incident",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity is free-form in fixtures: either a numeric level or a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Severity {
    Level(f64),
    Label(String),
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Level(v) => write!(f, "{}", v),
            Severity::Label(s) => f.write_str(s),
        }
    }
}

/// A point event attached to a route. Not tied to playback position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub lat: f64,
    pub lng: f64,
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Fixture ids may be numbers or strings; they are compared as strings.
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path: Vec<Waypoint>,
    #[serde(default)]
    pub events: Vec<RouteEvent>,
}

impl Route {
    pub fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &RouteEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Playback needs at least one waypoint
    pub fn is_playable(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            points: self.path.len(),
            events: self.events.len(),
        }
    }
}

/// Compact per-route preview shown after a fixture is loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub id: String,
    pub name: String,
    pub points: usize,
    pub events: usize,
}

/// The `routes` document of a fixture file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteCatalog {
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RouteCatalog {
    pub fn find(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }

    pub fn first(&self) -> Option<&Route> {
        self.routes.first()
    }

    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.routes.iter().map(Route::summary).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Per-category marker visibility. Presentation-only state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventVisibility {
    pub congestion: bool,
    pub reroute: bool,
    pub incident: bool,
}

impl Default for EventVisibility {
    fn default() -> Self {
        Self {
            congestion: true,
            reroute: true,
            incident: true,
        }
    }
}

impl EventVisibility {
    pub fn is_visible(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Congestion => self.congestion,
            EventKind::Reroute => self.reroute,
            EventKind::Incident => self.incident,
        }
    }

    pub fn set(&mut self, kind: EventKind, visible: bool) {
        match kind {
            EventKind::Congestion => self.congestion = visible,
            EventKind::Reroute => self.reroute = visible,
            EventKind::Incident => self.incident = visible,
        }
    }

    pub fn visible_events<'a>(&'a self, route: &'a Route) -> impl Iterator<Item = &'a RouteEvent> + 'a {
        route.events.iter().filter(move |e| self.is_visible(e.kind))
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "routes": [
            {
                "id": 1,
                "name": "Downtown Loop",
                "path": [
                    {"lat": 37.77, "lng": -122.41, "timestamp": "2025-09-01T08:00:00Z"},
                    {"lat": 37.78, "lng": -122.42, "timestamp": "2025-09-01T08:01:00Z"}
                ],
                "events": [
                    {"type": "congestion", "lat": 37.77, "lng": -122.41, "time": "2025-09-01T08:00:30Z", "severity": 3},
                    {"type": "incident", "lat": 37.78, "lng": -122.42, "time": "2025-09-01T08:00:45Z", "severity": "high", "note": "Lane closed"}
                ]
            },
            {"id": "r-2", "name": "Empty", "path": [], "events": []}
        ]
    }"#;

    #[test]
    fn test_parse_fixture_mixed_ids() {
        let catalog: RouteCatalog = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(catalog.routes.len(), 2);
        assert_eq!(catalog.routes[0].id, "1");
        assert_eq!(catalog.routes[1].id, "r-2");
        assert!(catalog.find("1").is_some());
        assert!(catalog.find("3").is_none());
    }

    #[test]
    fn test_event_severity_variants() {
        let catalog: RouteCatalog = serde_json::from_str(FIXTURE).unwrap();
        let route = catalog.first().unwrap();
        assert_eq!(route.events[0].severity, Some(Severity::Level(3.0)));
        assert_eq!(route.events[1].severity, Some(Severity::Label("high".to_string())));
        assert_eq!(route.events[1].note.as_deref(), Some("Lane closed"));
        assert_eq!(route.events_of(EventKind::Reroute).count(), 0);
        assert_eq!(route.events_of(EventKind::Incident).count(), 1);
    }

    #[test]
    fn test_summaries() {
        let catalog: RouteCatalog = serde_json::from_str(FIXTURE).unwrap();
        let summaries = catalog.summaries();
        assert_eq!(summaries[0].points, 2);
        assert_eq!(summaries[0].events, 2);
        assert!(!catalog.routes[1].is_playable());
    }

    #[test]
    fn test_missing_routes_key_is_empty_catalog() {
        let catalog: RouteCatalog = serde_json::from_str("{}").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_event_visibility_filters() {
        let catalog: RouteCatalog = serde_json::from_str(FIXTURE).unwrap();
        let route = catalog.first().unwrap();
        let mut vis = EventVisibility::default();
        assert_eq!(vis.visible_events(route).count(), 2);

        vis.set(EventKind::Congestion, false);
        let kinds: Vec<_> = vis.visible_events(route).map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Incident]);
    }
}
