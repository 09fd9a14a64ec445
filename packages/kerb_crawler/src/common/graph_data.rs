use petgraph::{Directed, Graph};
use serde::Serialize;

/// Sets the data which will be stored as weights in the petgraph graph. The
/// id is the identifier of the node in the source street network
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VertexData {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// Container for arc metadata which will be stored in the graph. Arcs are
/// directed, a two-way street is represented by a pair of mirrored arcs
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct ArcData {
    pub key: u64,
    pub src: i64,
    pub dst: i64,
    pub length: f64,
    pub bearing: f64,
    pub segment_id: i64,
    pub highway: String,
    pub name: Option<String>,
    pub is_duplicate: bool,
}

impl ArcData {
    /// Create the arc for the same stretch of street travelled in the
    /// opposite direction
    pub fn mirrored(&self, key: u64) -> ArcData {
        ArcData {
            key: key,
            src: self.dst,
            dst: self.src,
            bearing: crate::common::geometry::reverse_bearing(self.bearing),
            ..self.clone()
        }
    }

    /// Create a copy of this arc which marks a repeated traversal of the same
    /// street, as inserted while balancing the graph
    pub fn duplicated(&self, key: u64) -> ArcData {
        ArcData {
            key: key,
            is_duplicate: true,
            ..self.clone()
        }
    }
}

/// Directed multigraph of the street network. Node indices follow ascending
/// source ids
pub type RoadGraph = Graph<VertexData, ArcData, Directed, u32>;

/// Determine the key which should be given to the next arc added to the
/// graph
pub fn next_arc_key(graph: &RoadGraph) -> u64 {
    graph
        .edge_weights()
        .map(|arc| arc.key)
        .max()
        .map_or(0, |key| key + 1)
}

#[cfg(test)]
mod tests {

    use approx::assert_relative_eq;

    use super::*;

    fn get_test_arc() -> ArcData {
        ArcData {
            key: 0,
            src: 1,
            dst: 2,
            length: 100.0,
            bearing: 45.0,
            segment_id: 10,
            highway: "residential".to_string(),
            name: Some("High Street".to_string()),
            is_duplicate: false,
        }
    }

    /// Mirroring an arc should swap its endpoints and turn it around while
    /// keeping its provenance
    #[test]
    fn test_mirrored() {
        let result = get_test_arc().mirrored(7);

        assert_eq!(result.key, 7);
        assert_eq!((result.src, result.dst), (2, 1));
        assert_relative_eq!(result.bearing, 225.0);
        assert_relative_eq!(result.length, 100.0);
        assert_eq!(result.segment_id, 10);
        assert_eq!(result.name, Some("High Street".to_string()));
    }

    /// Duplicating an arc should only change its key and duplicate flag
    #[test]
    fn test_duplicated() {
        let arc = get_test_arc();
        let result = arc.duplicated(3);

        let target = ArcData {
            key: 3,
            is_duplicate: true,
            ..arc
        };

        assert_eq!(result, target);
    }

    /// Keys should continue on from the largest key in the graph
    #[test]
    fn test_next_arc_key() {
        let mut graph = RoadGraph::new();
        assert_eq!(next_arc_key(&graph), 0);

        let a = graph.add_node(VertexData::default());
        let b = graph.add_node(VertexData::default());
        let mut arc = get_test_arc();
        arc.key = 41;
        graph.add_edge(a, b, arc);

        assert_eq!(next_arc_key(&graph), 42);
    }
}
