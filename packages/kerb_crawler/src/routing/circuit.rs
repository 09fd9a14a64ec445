//! Construction of a closed route which drives along every arc exactly once,
//! using Hierholzer's algorithm. Whenever there is more than one way to leave
//! a vertex, the turn which scores best against the direction of arrival is
//! taken, which steers the route towards right turns without affecting which
//! arcs end up being covered.

use crate::common::config::TurnPenalties;
use crate::common::graph_data::RoadGraph;
use crate::routing::turns::turn_score;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

/// A route through the graph. Vertices are listed in the order they are
/// visited, and arcs[i] is the arc travelled between vertices[i] and
/// vertices[i + 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    pub vertices: Vec<NodeIndex>,
    pub arcs: Vec<EdgeIndex>,
}

impl Circuit {
    /// Check that the circuit returns to where it started
    pub fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Check whether this circuit is a closed walk which covers every arc of
    /// the graph exactly once
    pub fn is_eulerian(&self, graph: &RoadGraph) -> bool {
        if !self.is_closed()
            || self.arcs.len() != graph.edge_count()
            || self.vertices.len() != self.arcs.len() + 1
        {
            return false;
        }

        let mut used = vec![false; graph.edge_count()];
        for (inx, edge) in self.arcs.iter().enumerate() {
            let Some((src, dst)) = graph.edge_endpoints(*edge) else {
                return false;
            };
            if used[edge.index()]
                || src != self.vertices[inx]
                || dst != self.vertices[inx + 1]
            {
                return false;
            }
            used[edge.index()] = true;
        }

        true
    }
}

/// An outgoing arc which has not been driven yet
#[derive(Debug, Clone, Copy)]
struct PendingArc {
    edge: EdgeIndex,
    target: NodeIndex,
    bearing: f64,
}

/// Private copy of the adjacency of the graph. Arcs are removed as they are
/// consumed, leaving the graph itself untouched.
struct ArcPool {
    outgoing: Vec<Vec<PendingArc>>,
}

impl ArcPool {
    /// Take a copy of the outgoing arcs of each vertex, in the order the arcs
    /// were added to the graph
    fn new(graph: &RoadGraph) -> Self {
        let outgoing = graph
            .node_indices()
            .map(|node| {
                let mut arcs: Vec<PendingArc> = graph
                    .edges(node)
                    .map(|eref| PendingArc {
                        edge: eref.id(),
                        target: eref.target(),
                        bearing: eref.weight().bearing,
                    })
                    .collect();
                arcs.sort_by_key(|arc| arc.edge);
                arcs
            })
            .collect();

        ArcPool { outgoing: outgoing }
    }

    /// Remove and return the next arc to take out of the provided vertex.
    /// With no incoming bearing or only one arc to choose from the first
    /// arc is used, otherwise the arc with the lowest turn score wins, with
    /// ties going to the earlier arc.
    fn take_next(
        &mut self,
        node: NodeIndex,
        incoming: Option<f64>,
        penalties: &TurnPenalties,
    ) -> Option<PendingArc> {
        let arcs = self.outgoing.get_mut(node.index())?;
        if arcs.is_empty() {
            return None;
        }

        let chosen = match incoming {
            Some(bearing) if arcs.len() > 1 => {
                let mut best = 0;
                let mut best_score = f64::INFINITY;
                for (inx, arc) in arcs.iter().enumerate() {
                    let score = turn_score(bearing, arc.bearing, penalties);
                    if score < best_score {
                        best = inx;
                        best_score = score;
                    }
                }
                best
            }
            _ => 0,
        };

        Some(arcs.remove(chosen))
    }
}

/// Build a circuit starting and finishing at the start vertex. Each entry
/// on the stack remembers the arc used to reach it, so that turns are always
/// scored against the direction the vehicle actually arrived from. Vertices
/// are only written out once they have no arcs left, and the output is
/// reversed at the end to give the order of travel.
///
/// If every vertex has as many arcs in as out, and every arc can be reached
/// from the start, the result covers every arc exactly once. Otherwise a
/// best-effort walk is returned; use Circuit::is_eulerian to check.
pub fn build_circuit(
    graph: &RoadGraph,
    start: NodeIndex,
    penalties: &TurnPenalties,
) -> Circuit {
    let mut pool = ArcPool::new(graph);

    let mut stack: Vec<(NodeIndex, Option<PendingArc>)> = vec![(start, None)];
    let mut vertices = Vec::with_capacity(graph.edge_count() + 1);
    let mut arcs = Vec::with_capacity(graph.edge_count());

    while let Some(&(node, via)) = stack.last() {
        let incoming = via.map(|arc| arc.bearing);
        match pool.take_next(node, incoming, penalties) {
            Some(next) => stack.push((next.target, Some(next))),
            None => {
                stack.pop();
                vertices.push(node);
                if let Some(arc) = via {
                    arcs.push(arc.edge);
                }
            }
        }
    }

    vertices.reverse();
    arcs.reverse();

    Circuit {
        vertices: vertices,
        arcs: arcs,
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::common::geometry::{
        forward_bearing, haversine_distance, turn_angle,
    };
    use crate::common::graph_data::{ArcData, VertexData};
    use crate::routing::turns::{TurnKind, classify_turn};

    /// Generate a graph from (id, lat, lon) vertices and (src, dst) arcs,
    /// with real lengths and bearings. Ids must match positions.
    fn get_test_graph(
        vertices: &[(i64, f64, f64)],
        arcs: &[(usize, usize)],
    ) -> RoadGraph {
        let mut graph = RoadGraph::new();
        for (id, lat, lon) in vertices {
            graph.add_node(VertexData {
                id: *id,
                lat: *lat,
                lon: *lon,
            });
        }
        for (key, (src, dst)) in arcs.iter().enumerate() {
            let a = graph[NodeIndex::new(*src)];
            let b = graph[NodeIndex::new(*dst)];
            graph.add_edge(
                NodeIndex::new(*src),
                NodeIndex::new(*dst),
                ArcData {
                    key: key as u64,
                    src: a.id,
                    dst: b.id,
                    length: haversine_distance(a.lat, a.lon, b.lat, b.lon),
                    bearing: forward_bearing(a.lat, a.lon, b.lat, b.lon),
                    ..Default::default()
                },
            );
        }
        graph
    }

    /// Square with corners at north, east, south and west
    fn square_vertices() -> Vec<(i64, f64, f64)> {
        vec![
            (0, 0.001, 0.0),
            (1, 0.0, 0.001),
            (2, -0.001, 0.0),
            (3, 0.0, -0.001),
        ]
    }

    /// Count U-turns between consecutive arcs of a circuit
    fn count_u_turns(graph: &RoadGraph, circuit: &Circuit) -> usize {
        circuit
            .arcs
            .windows(2)
            .filter(|pair| {
                let angle =
                    turn_angle(graph[pair[0]].bearing, graph[pair[1]].bearing);
                classify_turn(angle) == TurnKind::UTurn
            })
            .count()
    }

    /// Driving clockwise round a one-way square should cover all four sides
    /// with no U-turns
    #[test]
    fn test_square_one_way() {
        let graph =
            get_test_graph(&square_vertices(), &[(0, 1), (1, 2), (2, 3), (3, 0)]);

        let result = build_circuit(&graph, NodeIndex::new(0), &TurnPenalties::default());

        let ids: Vec<i64> = result.vertices.iter().map(|n| graph[*n].id).collect();

        assert_eq!(ids, vec![0, 1, 2, 3, 0]);
        assert!(result.is_eulerian(&graph));
        assert_eq!(count_u_turns(&graph, &result), 0);
    }

    /// A two-way square covers every arc once, needing exactly one U-turn to
    /// switch direction
    #[test]
    fn test_square_two_way() {
        let graph = get_test_graph(
            &square_vertices(),
            &[(0, 1), (1, 0), (1, 2), (2, 1), (2, 3), (3, 2), (3, 0), (0, 3)],
        );

        let result = build_circuit(&graph, NodeIndex::new(0), &TurnPenalties::default());

        assert_eq!(result.vertices.len(), graph.edge_count() + 1);
        assert!(result.is_eulerian(&graph));
        assert_eq!(count_u_turns(&graph, &result), 1);
    }

    /// Crossroads at vertex 0 with arms to the north (1), east (2), south (3)
    /// and west (4), with an arc out along each arm
    fn crossroads(arms: &[usize]) -> RoadGraph {
        let vertices = vec![
            (0, 0.0, 0.0),
            (1, 0.001, 0.0),
            (2, 0.0, 0.001),
            (3, -0.001, 0.0),
            (4, 0.0, -0.001),
        ];
        let arcs: Vec<(usize, usize)> = arms.iter().map(|arm| (0, *arm)).collect();
        get_test_graph(&vertices, &arcs)
    }

    mod test_take_next {

        use super::*;

        /// Heading north, carrying straight on should win over any turn
        #[test]
        fn test_prefers_straight() {
            let graph = crossroads(&[4, 2, 1]);
            let mut pool = ArcPool::new(&graph);

            let result = pool
                .take_next(NodeIndex::new(0), Some(0.0), &TurnPenalties::default())
                .unwrap();

            assert_eq!(result.target, NodeIndex::new(1));
        }

        /// Heading north, turning right (east) should win over turning left
        /// (west) or going back the way we came
        #[test]
        fn test_prefers_right() {
            let graph = crossroads(&[4, 3, 2]);
            let mut pool = ArcPool::new(&graph);

            let first = pool
                .take_next(NodeIndex::new(0), Some(0.0), &TurnPenalties::default())
                .unwrap();
            let second = pool
                .take_next(NodeIndex::new(0), Some(0.0), &TurnPenalties::default())
                .unwrap();

            assert_eq!(first.target, NodeIndex::new(2));
            assert_eq!(second.target, NodeIndex::new(4));
        }

        /// Without an incoming bearing, arcs are taken in the order they were
        /// added
        #[test]
        fn test_no_incoming_bearing() {
            let graph = crossroads(&[4, 2, 1]);
            let mut pool = ArcPool::new(&graph);

            let result = pool
                .take_next(NodeIndex::new(0), None, &TurnPenalties::default())
                .unwrap();

            assert_eq!(result.target, NodeIndex::new(4));
        }

        /// Each arc can only be taken once
        #[test]
        fn test_consumes_arcs() {
            let graph = crossroads(&[1]);
            let mut pool = ArcPool::new(&graph);

            let first = pool.take_next(NodeIndex::new(0), None, &TurnPenalties::default());
            let second = pool.take_next(NodeIndex::new(0), None, &TurnPenalties::default());

            assert!(first.is_some());
            assert!(second.is_none());
        }
    }

    /// The graph handed to the builder should not be modified
    #[test]
    fn test_graph_untouched() {
        let graph =
            get_test_graph(&square_vertices(), &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let before = graph.edge_count();

        let _ = build_circuit(&graph, NodeIndex::new(2), &TurnPenalties::default());

        assert_eq!(graph.edge_count(), before);
    }

    /// Starting part way round should still give a closed circuit from that
    /// vertex
    #[test]
    fn test_starts_at_start() {
        let graph =
            get_test_graph(&square_vertices(), &[(0, 1), (1, 2), (2, 3), (3, 0)]);

        let result = build_circuit(&graph, NodeIndex::new(2), &TurnPenalties::default());

        assert_eq!(result.vertices.first(), Some(&NodeIndex::new(2)));
        assert_eq!(result.vertices.last(), Some(&NodeIndex::new(2)));
    }

    /// A graph with no arcs gives a circuit containing only the start
    #[test]
    fn test_no_arcs() {
        let graph = get_test_graph(&square_vertices(), &[]);

        let result = build_circuit(&graph, NodeIndex::new(0), &TurnPenalties::default());

        assert_eq!(result.vertices, vec![NodeIndex::new(0)]);
        assert!(result.arcs.is_empty());
        assert!(result.is_eulerian(&graph));
    }

    mod test_is_eulerian {

        use super::*;

        /// Two vertices joined by two arcs in each direction
        fn get_shuttle_graph() -> RoadGraph {
            get_test_graph(&square_vertices()[..2], &[(0, 1), (1, 0), (0, 1), (1, 0)])
        }

        fn get_circuit(vertices: &[usize], arcs: &[usize]) -> Circuit {
            Circuit {
                vertices: vertices.iter().map(|n| NodeIndex::new(*n)).collect(),
                arcs: arcs.iter().map(|e| EdgeIndex::new(*e)).collect(),
            }
        }

        /// Driving every arc once and finishing at the start is accepted
        #[test]
        fn test_valid() {
            let graph = get_shuttle_graph();

            let circuit = get_circuit(&[0, 1, 0, 1, 0], &[0, 1, 2, 3]);

            assert!(circuit.is_eulerian(&graph));
        }

        /// A walk which finishes somewhere other than the start is rejected
        #[test]
        fn test_open_walk() {
            let graph = get_test_graph(&square_vertices()[..2], &[(0, 1)]);

            let circuit = get_circuit(&[0, 1], &[0]);

            assert!(!circuit.is_closed());
            assert!(!circuit.is_eulerian(&graph));
        }

        /// A closed walk which leaves some arcs undriven is rejected
        #[test]
        fn test_missing_arcs() {
            let graph = get_shuttle_graph();

            let circuit = get_circuit(&[0, 1, 0], &[0, 1]);

            assert!(circuit.is_closed());
            assert!(!circuit.is_eulerian(&graph));
        }

        /// Arcs must run between the vertices listed either side of them
        #[test]
        fn test_arc_vertex_mismatch() {
            let graph = get_shuttle_graph();

            let circuit = get_circuit(&[0, 1, 0, 1, 0], &[1, 0, 2, 3]);

            assert!(!circuit.is_eulerian(&graph));
        }

        /// Driving one arc twice in place of its parallel twin is rejected
        #[test]
        fn test_arc_used_twice() {
            let graph = get_shuttle_graph();

            let circuit = get_circuit(&[0, 1, 0, 1, 0], &[0, 1, 0, 1]);

            assert!(!circuit.is_eulerian(&graph));
        }

        /// A circuit with no vertices at all is not closed
        #[test]
        fn test_empty() {
            let graph = get_shuttle_graph();

            let circuit = get_circuit(&[], &[]);

            assert!(!circuit.is_eulerian(&graph));
        }
    }

    /// Raising the U-turn penalty should never lead to more U-turns
    #[test]
    fn test_u_turn_penalty_monotonic() {
        // Two squares sharing the east-west diagonal, all two-way
        let vertices = vec![
            (0, 0.001, 0.0),
            (1, 0.0, 0.001),
            (2, -0.001, 0.0),
            (3, 0.0, -0.001),
        ];
        let mut arcs = Vec::new();
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)] {
            arcs.push((a, b));
            arcs.push((b, a));
        }
        let graph = get_test_graph(&vertices, &arcs);

        let mut previous = usize::MAX;
        for u_turn in [0.0, 50.0, 500.0, 5000.0] {
            let penalties = TurnPenalties {
                u_turn: u_turn,
                ..TurnPenalties::default()
            };
            let result = build_circuit(&graph, NodeIndex::new(0), &penalties);

            assert!(result.is_eulerian(&graph));
            let u_turns = count_u_turns(&graph, &result);
            assert!(u_turns <= previous);
            previous = u_turns;
        }
    }
}
