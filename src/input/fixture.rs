use crate::core::RouteCatalog;
use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::info;

/// Load a route fixture (`{"routes": [...]}`) from disk
pub fn load_routes(path: &Path) -> Result<RouteCatalog> {
    let contents = fs::read_to_string(path)?;
    let catalog = parse_routes(&contents)?;
    info!("Loaded {} routes from {}", catalog.routes.len(), path.display());
    Ok(catalog)
}

pub fn parse_routes(json: &str) -> Result<RouteCatalog> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VizError;

    #[test]
    fn test_parse_routes() {
        let catalog = parse_routes(
            r#"{"routes": [{"id": 7, "name": "Bay Bridge", "path": [
                {"lat": 37.79, "lng": -122.39, "timestamp": "2025-09-01T08:00:00Z"}
            ], "events": []}]}"#,
        )
        .unwrap();
        assert_eq!(catalog.find("7").unwrap().name, "Bay Bridge");
    }

    #[test]
    fn test_sample_fixture() {
        let catalog = parse_routes(include_str!("../../data/sample_routes.json")).unwrap();
        let summaries = catalog.summaries();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].points, 24);
        assert_eq!(summaries[0].events, 4);
        assert!(!catalog.find("depot").unwrap().is_playable());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(parse_routes("{\"routes\": [1, 2]}"), Err(VizError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("route-viz-no-such-fixture.json");
        assert!(matches!(load_routes(&path), Err(VizError::Io(_))));
    }
}
