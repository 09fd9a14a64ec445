//! Defines the structs which contain high level information about a route
//! (i.e. total distance, drive time, number of turns)

use crate::common::geometry::turn_angle;
use crate::common::graph_data::RoadGraph;
use crate::routing::turns::{TurnKind, classify_turn};
use petgraph::graph::NodeIndex;
use serde::Serialize;

/// Container for the metrics gathered by driving a circuit hop by hop
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircuitMetrics {
    pub distance: f64,
    pub arc_traversals: usize,
    /// Hops for which no arc could be found between the two vertices
    pub missing_hops: usize,
    pub right_turns: usize,
    pub left_turns: usize,
    pub u_turns: usize,
}

impl CircuitMetrics {
    /// Update the turn counts to reflect a change in heading
    fn record_turn(&mut self, angle: f64) {
        match classify_turn(angle) {
            TurnKind::Straight => (),
            TurnKind::Right => self.right_turns += 1,
            TurnKind::Left => self.left_turns += 1,
            TurnKind::UTurn => self.u_turns += 1,
        }
    }
}

/// Walk the circuit one pair of vertices at a time, looking up an arc
/// between each pair. Where there are parallel arcs the first one found is
/// used, which makes no difference as they share a length and bearing. A
/// turn is only considered when the bearing changes, so runs of hops along
/// the same heading never count as more than one turn.
pub fn measure_circuit(graph: &RoadGraph, vertices: &[NodeIndex]) -> CircuitMetrics {
    let mut metrics = CircuitMetrics::default();
    let mut reference: Option<f64> = None;

    for hop in vertices.windows(2) {
        let Some(arc) = graph.edges_connecting(hop[0], hop[1]).next() else {
            metrics.missing_hops += 1;
            continue;
        };
        let arc = arc.weight();

        metrics.distance += arc.length;
        metrics.arc_traversals += 1;

        match reference {
            None => reference = Some(arc.bearing),
            Some(previous) if previous == arc.bearing => (),
            Some(previous) => {
                metrics.record_turn(turn_angle(previous, arc.bearing));
                reference = Some(arc.bearing);
            }
        }
    }

    metrics
}

/// Total length of the arcs which were added to balance the graph, i.e. the
/// distance spent driving a street for the second time
pub fn deadhead_distance(graph: &RoadGraph) -> f64 {
    graph
        .edge_weights()
        .filter(|arc| arc.is_duplicate)
        .map(|arc| arc.length)
        .sum()
}

/// Estimated time in minutes to drive the provided distance in metres
pub fn drive_time_minutes(distance: f64, average_speed_kmh: f64) -> f64 {
    (distance / 1000.0) / average_speed_kmh * 60.0
}

/// Summary of a completed route, as returned to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStats {
    pub total_distance_km: f64,
    pub arc_traversals: usize,
    pub drive_time_minutes: f64,
    pub vertex_count: usize,
    pub arc_count: usize,
    pub component_count: usize,
    pub included_segments: usize,
    pub excluded_segments: usize,
    pub right_turns: usize,
    pub left_turns: usize,
    pub u_turns: usize,
    pub deadhead_distance_km: f64,
    pub odd_vertices: usize,
    pub matched_pairs: usize,
    pub unmatched_vertices: usize,
    /// Whether the route is a closed walk covering every arc exactly once
    pub closed: bool,
    /// Hops of the route with no arc behind them, left out of the distance
    pub missing_hops: usize,
}
