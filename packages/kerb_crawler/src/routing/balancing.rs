//! An Eulerian circuit only exists when every vertex has an even degree. The
//! balancer pairs up the vertices with an odd degree and duplicates the
//! shortest path between each pair, which represents driving that stretch of
//! road a second time.
//!
//! Degree is taken to be the number of outgoing arcs, which matches the
//! number of streets meeting at a vertex for as long as every arc has a
//! mirrored partner.

use crate::common::graph_data::{ArcData, RoadGraph, next_arc_key};
use log::{debug, warn};
use petgraph::Direction;
use petgraph::algo::dijkstra;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashSet;

/// Two odd-degree vertices which will be joined by a duplicated path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedPair {
    pub a: NodeIndex,
    pub b: NodeIndex,
    pub distance: f64,
}

/// A graph in which every vertex should now have an even degree, along with
/// details of how it got there
#[derive(Debug)]
pub struct Balanced {
    pub graph: RoadGraph,
    pub odd_vertices: usize,
    pub pairs: Vec<MatchedPair>,
    /// Odd vertices for which no partner could be reached. If this isn't
    /// empty, the graph may still be unbalanced.
    pub unmatched: Vec<NodeIndex>,
    pub added_arcs: usize,
    /// Duplicated arcs for which no street existed in the reverse direction,
    /// so the return trip had to be made against a one-way restriction
    pub contraflow_arcs: usize,
}

/// Anything which can make every vertex of a graph even. Implementations
/// take ownership of the graph and hand back an extended version of it.
pub trait Balancer {
    fn balance(&self, graph: RoadGraph) -> Balanced;
}

/// Pairs each odd vertex with its nearest unmatched odd vertex, taking them
/// in node order. This is a quick approximation of a minimum-weight perfect
/// matching, running one shortest-path search per odd vertex.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyMatching;

impl Balancer for GreedyMatching {
    fn balance(&self, mut graph: RoadGraph) -> Balanced {
        let odd = odd_degree_vertices(&graph);
        let (pairs, unmatched) = greedy_pairs(&graph, &odd);

        let mut next_key = next_arc_key(&graph);
        let mut added_arcs = 0;
        let mut contraflow_arcs = 0;

        for pair in pairs.iter() {
            match shortest_path_arcs(&graph, pair.a, pair.b) {
                Some(path) => {
                    let added =
                        duplicate_path(&mut graph, &path, &mut next_key);
                    added_arcs += added.total;
                    contraflow_arcs += added.contraflow;
                }
                // Only reachable pairs are matched, so this shouldn't happen
                None => warn!(
                    "Lost the path between vertices {} and {}, leaving them unbalanced",
                    graph[pair.a].id, graph[pair.b].id
                ),
            }
        }

        if contraflow_arcs > 0 {
            warn!(
                "{contraflow_arcs} duplicated arcs run against a one-way restriction"
            );
        }

        debug!(
            "Balanced {} odd vertices with {} pairs, adding {} arcs",
            odd.len(),
            pairs.len(),
            added_arcs
        );

        Balanced {
            graph: graph,
            odd_vertices: odd.len(),
            pairs: pairs,
            unmatched: unmatched,
            added_arcs: added_arcs,
            contraflow_arcs: contraflow_arcs,
        }
    }
}

/// Number of arcs leaving a vertex
pub fn out_degree(graph: &RoadGraph, node: NodeIndex) -> usize {
    graph.edges(node).count()
}

/// Identify vertices with odd degree, in node order
pub fn odd_degree_vertices(graph: &RoadGraph) -> Vec<NodeIndex> {
    graph
        .node_indices()
        .filter(|&n| out_degree(graph, n) % 2 != 0)
        .collect()
}

/// Greedily pair up odd vertices. Each unmatched vertex in turn is paired
/// with the closest unmatched vertex it can reach, by shortest path length.
/// Ties go to the vertex which comes first. Returns the matched pairs along
/// with any vertices which could not be matched.
pub fn greedy_pairs(
    graph: &RoadGraph,
    odd: &[NodeIndex],
) -> (Vec<MatchedPair>, Vec<NodeIndex>) {
    let mut matched = FxHashSet::<NodeIndex>::default();
    let mut pairs = Vec::new();

    for &a in odd {
        if matched.contains(&a) {
            continue;
        }

        let dists = dijkstra(graph, a, None, |edge| edge.weight().length);

        let mut best: Option<(NodeIndex, f64)> = None;
        for &b in odd {
            if b == a || matched.contains(&b) {
                continue;
            }
            if let Some(&dist) = dists.get(&b) {
                if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                    best = Some((b, dist));
                }
            }
        }

        match best {
            Some((b, distance)) => {
                matched.insert(a);
                matched.insert(b);
                pairs.push(MatchedPair {
                    a: a,
                    b: b,
                    distance: distance,
                });
            }
            None => warn!(
                "No reachable partner for odd vertex {}, it will stay unbalanced",
                graph[a].id
            ),
        }
    }

    let unmatched = odd
        .iter()
        .copied()
        .filter(|node| !matched.contains(node))
        .collect();

    (pairs, unmatched)
}

/// Find the arcs which make up the shortest path from start to end. The
/// distances from Dijkstra are used to walk back from the end, stepping to
/// any predecessor whose distance plus the arc length accounts for the
/// distance at the current vertex. Returns None if end can't be reached.
pub fn shortest_path_arcs(
    graph: &RoadGraph,
    start: NodeIndex,
    end: NodeIndex,
) -> Option<Vec<EdgeIndex>> {
    let costs = dijkstra(graph, start, Some(end), |edge| edge.weight().length);

    let mut current_cost = *costs.get(&end)?;

    // Zero-length arcs could otherwise send the walk round in circles
    let mut visited = FxHashSet::<NodeIndex>::default();
    visited.insert(end);

    let mut path = Vec::new();
    let mut current = end;
    while current != start {
        let step = graph
            .edges_directed(current, Direction::Incoming)
            .find(|edge| {
                let source = edge.source();
                if visited.contains(&source) && source != start {
                    return false;
                }
                match costs.get(&source) {
                    Some(cost) => {
                        let tolerance = 1e-9 * current_cost.max(1.0);
                        (cost + edge.weight().length - current_cost).abs()
                            <= tolerance
                    }
                    None => false,
                }
            })?;

        path.push(step.id());
        current = step.source();
        visited.insert(current);
        current_cost = costs[&current];
    }

    path.reverse();
    Some(path)
}

/// Counts of the arcs added while duplicating a path
#[derive(Debug, Default, PartialEq)]
pub struct AddedArcs {
    pub total: usize,
    pub contraflow: usize,
}

/// Insert a second copy of every arc along the path, along with a second copy
/// of the arc running the other way. Each vertex on the path therefore gains
/// an arc in each direction of travel: the two ends change parity and the
/// vertices in between keep theirs. Where the street has no arc in the other
/// direction (one-way), a reverse arc is created from the forward one.
pub fn duplicate_path(
    graph: &mut RoadGraph,
    path: &[EdgeIndex],
    next_key: &mut u64,
) -> AddedArcs {
    let mut added = AddedArcs::default();

    for &edge in path {
        let Some((src, dst)) = graph.edge_endpoints(edge) else {
            continue;
        };
        let arc = graph[edge].clone();

        let existing_reverse: Option<ArcData> = graph
            .edges_connecting(dst, src)
            .find(|reverse| reverse.weight().segment_id == arc.segment_id)
            .map(|reverse| reverse.weight().clone());

        let forward_copy = arc.duplicated(*next_key);
        *next_key += 1;

        let reverse_copy = match existing_reverse {
            Some(reverse) => reverse.duplicated(*next_key),
            None => {
                added.contraflow += 1;
                arc.mirrored(*next_key).duplicated(*next_key)
            }
        };
        *next_key += 1;

        graph.add_edge(src, dst, forward_copy);
        graph.add_edge(dst, src, reverse_copy);
        added.total += 2;
    }

    added
}
