use serde::Deserialize;

use crate::common::graph_data::VertexData;

/// Container for a single entry in the vertex coordinate table
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct NodeRow {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

impl NodeRow {
    /// Coordinates outside of the valid lat/lon ranges can't be routed over
    pub fn has_valid_coords(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<NodeRow> for VertexData {
    fn from(row: NodeRow) -> VertexData {
        VertexData {
            id: row.id,
            lat: row.lat,
            lon: row.lon,
        }
    }
}

/// Container for one street segment which has already passed the upstream
/// inclusion rules. Nodes are listed in the order they appear along the
/// street.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SegmentRow {
    pub id: i64,
    pub nodes: Vec<i64>,
    #[serde(default)]
    pub highway: String,
    #[serde(default)]
    pub oneway: bool,
    pub service: Option<String>,
    pub access: Option<String>,
    pub name: Option<String>,
}

/// The full street network for a single route request
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NetworkInput {
    pub nodes: Vec<NodeRow>,
    pub segments: Vec<SegmentRow>,
    /// Number of segments dropped by the upstream filtering rules, reported
    /// back in the route statistics
    #[serde(default)]
    pub excluded_segments: usize,
}

#[cfg(test)]
mod tests {

    use super::*;

    /// Optional tags can be left out of the request body entirely
    #[test]
    fn test_deserialize_segment_minimal() {
        let body = r#"{"id": 5, "nodes": [1, 2, 3]}"#;

        let result: SegmentRow = serde_json::from_str(body).unwrap();

        let target = SegmentRow {
            id: 5,
            nodes: vec![1, 2, 3],
            ..Default::default()
        };

        assert_eq!(result, target);
    }

    /// Check the coordinate range validation on vertex rows
    #[test]
    fn test_has_valid_coords() {
        let valid = NodeRow { id: 1, lat: -90.0, lon: 180.0 };
        let bad_lat = NodeRow { id: 2, lat: 90.5, lon: 0.0 };
        let bad_lon = NodeRow { id: 3, lat: 0.0, lon: -180.5 };

        assert!(valid.has_valid_coords());
        assert!(!bad_lat.has_valid_coords());
        assert!(!bad_lon.has_valid_coords());
    }
}
