use crate::common::geometry::{forward_bearing, haversine_distance};
use crate::common::graph_data::{ArcData, RoadGraph, VertexData};
use crate::loading::structs::{NodeRow, SegmentRow};
use geo::Point;
use log::debug;
use petgraph::graph::NodeIndex;
use petgraph::visit::IntoNodeReferences;
use rustc_hash::{FxHashMap, FxHashSet};

/// Nodes in the graph need to have associated lat/lon data. To achieve this,
/// we create a mapping for source IDs as they appear in the street network to
/// VertexData structs. Segments must also be provided here, as we only want to
/// add the nodes which are used in one of the segments. Vertices are returned
/// in ascending id order, which fixes the order of node indices in the graph.
pub fn generate_node_map(
    nodes: &[NodeRow],
    segments: &[SegmentRow],
) -> Vec<VertexData> {
    let mut used_nodes = FxHashSet::<i64>::default();
    for segment in segments {
        used_nodes.extend(segment.nodes.iter().copied());
    }

    let mut node_map = FxHashMap::<i64, VertexData>::default();
    for node in nodes {
        if used_nodes.contains(&node.id) && node.has_valid_coords() {
            node_map.insert(node.id, (*node).into());
        }
    }

    let mut vertices: Vec<VertexData> = node_map.into_values().collect();
    vertices.sort_by_key(|vertex| vertex.id);
    vertices
}

/// Based on the filtered street segments, generate a petgraph graph which can
/// be used for route plotting. Each pair of consecutive nodes in a segment
/// becomes an arc, with a mirrored arc in the opposite direction unless the
/// street is one-way and one-way restrictions are being respected. Pairs
/// which reference an unknown node are skipped.
pub fn create_graph(
    nodes: &[NodeRow],
    segments: &[SegmentRow],
    ignore_oneway: bool,
) -> RoadGraph {
    // Set up empty graph
    let mut graph = RoadGraph::new();

    // Add all nodes to the graph, create mapping from source IDs to node
    // indexes
    let mut node_id_inx_map = FxHashMap::<i64, NodeIndex>::default();
    for vertex in generate_node_map(nodes, segments) {
        let node_inx = graph.add_node(vertex);
        node_id_inx_map.insert(vertex.id, node_inx);
    }

    let mut key: u64 = 0;
    for segment in segments {
        let two_way = !segment.oneway || ignore_oneway;

        for pair in segment.nodes.windows(2) {
            let (src_id, dst_id) = (pair[0], pair[1]);

            // Fetch indexes for src and dst as they appear in the graph
            let (src_inx, dst_inx) = match (
                node_id_inx_map.get(&src_id),
                node_id_inx_map.get(&dst_id),
            ) {
                (Some(src_inx), Some(dst_inx)) => (*src_inx, *dst_inx),
                _ => continue,
            };

            let src = graph[src_inx];
            let dst = graph[dst_inx];

            let arc = ArcData {
                key: key,
                src: src_id,
                dst: dst_id,
                length: haversine_distance(src.lat, src.lon, dst.lat, dst.lon),
                bearing: forward_bearing(src.lat, src.lon, dst.lat, dst.lon),
                segment_id: segment.id,
                highway: segment.highway.clone(),
                name: segment.name.clone(),
                is_duplicate: false,
            };
            key += 1;

            if two_way {
                let reverse = arc.mirrored(key);
                key += 1;
                graph.add_edge(src_inx, dst_inx, arc);
                graph.add_edge(dst_inx, src_inx, reverse);
            } else {
                graph.add_edge(src_inx, dst_inx, arc);
            }
        }
    }

    debug!(
        "Built road graph with {} vertices and {} arcs",
        graph.node_count(),
        graph.edge_count()
    );

    graph
}

/// Determine the mean position of every vertex in the graph as a lat/lon
/// tuple. Returns None for an empty graph.
pub fn get_centroid(graph: &RoadGraph) -> Option<(f64, f64)> {
    if graph.node_count() == 0 {
        return None;
    }

    let num = graph.node_count() as f64;
    let lasum: f64 = graph.node_weights().map(|v| v.lat).sum();
    let losum: f64 = graph.node_weights().map(|v| v.lon).sum();

    Some((lasum / num, losum / num))
}

/// Determine the closest available node to the user's selected start point.
/// If no start point was provided, the node closest to the centre of the
/// network is used instead. Ties go to the node with the lowest index.
pub fn find_start_node(
    graph: &RoadGraph,
    start: Option<Point>,
) -> Option<NodeIndex> {
    let (target_lat, target_lon) = match start {
        Some(point) => (point.y(), point.x()),
        None => get_centroid(graph)?,
    };

    // Set variables to keep track of the current closest node
    let mut smallest_dist = f64::MAX;
    let mut closest_inx: Option<NodeIndex> = None;

    for (node_index, node_weight) in graph.node_references() {
        let dist_to_start = haversine_distance(
            target_lat,
            target_lon,
            node_weight.lat,
            node_weight.lon,
        );

        // Store details of new closest node if applicable
        if dist_to_start < smallest_dist {
            smallest_dist = dist_to_start;
            closest_inx = Some(node_index);
        }
    }

    closest_inx
}
