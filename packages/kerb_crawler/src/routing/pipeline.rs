use crate::common::config::RouteConfig;
use crate::common::error::RouteError;
use crate::common::graph_data::RoadGraph;
use crate::common::progress::{ProgressEvent, Severity};
use crate::loading::components::reduce_to_largest_component;
use crate::loading::petgraph::{create_graph, find_start_node};
use crate::loading::structs::NetworkInput;
use crate::routing::balancing::{Balancer, GreedyMatching};
use crate::routing::circuit::{Circuit, build_circuit};
use crate::routing::metrics::{
    RouteStats, deadhead_distance, drive_time_minutes, measure_circuit,
};

/// A completed route, along with the balanced graph it was built over
#[derive(Debug)]
pub struct PlannedRoute {
    pub graph: RoadGraph,
    pub circuit: Circuit,
    /// (lat, lon) of each vertex of the circuit in order of travel
    pub coords: Vec<(f64, f64)>,
    pub stats: RouteStats,
}

/// Hand a new event to the progress callback
fn emit<F: FnMut(&ProgressEvent)>(
    on_progress: &mut F,
    message: String,
    severity: Severity,
) {
    on_progress(&ProgressEvent::now(message, severity));
}

/// Plan a route over the provided network using the default greedy
/// matching to balance the graph. See plan_route_with.
pub fn plan_route<F: FnMut(&ProgressEvent)>(
    network: &NetworkInput,
    config: &RouteConfig,
    on_progress: F,
) -> Result<PlannedRoute, RouteError> {
    plan_route_with(network, config, &GreedyMatching, on_progress)
}

/// Run every stage of route planning in turn: build the graph, keep only its
/// largest strongly connected component, balance it, then build a circuit
/// over it and gather statistics. The progress callback is invoked once each
/// stage has finished, and once more if a stage fails.
pub fn plan_route_with<B: Balancer, F: FnMut(&ProgressEvent)>(
    network: &NetworkInput,
    config: &RouteConfig,
    balancer: &B,
    mut on_progress: F,
) -> Result<PlannedRoute, RouteError> {
    // Build ------------------------------------------------------------------
    if network.segments.is_empty() {
        let err = RouteError::NoSegments;
        emit(&mut on_progress, err.to_string(), Severity::Error);
        return Err(err);
    }

    let graph = create_graph(&network.nodes, &network.segments, config.ignore_oneway);
    emit(
        &mut on_progress,
        format!(
            "Built road network with {} vertices and {} arcs from {} segments",
            graph.node_count(),
            graph.edge_count(),
            network.segments.len()
        ),
        Severity::Info,
    );

    // Reduce -----------------------------------------------------------------
    let reduced = match reduce_to_largest_component(&graph) {
        Ok(reduced) => reduced,
        Err(err) => {
            emit(&mut on_progress, err.to_string(), Severity::Error);
            return Err(err);
        }
    };
    emit(
        &mut on_progress,
        format!(
            "Kept the largest of {} connected regions: {} vertices, {} arcs",
            reduced.component_count,
            reduced.graph.node_count(),
            reduced.graph.edge_count()
        ),
        Severity::Info,
    );

    // Balance ----------------------------------------------------------------
    let balanced = balancer.balance(reduced.graph);
    emit(
        &mut on_progress,
        format!(
            "Paired {} odd-degree vertices, adding {} arcs",
            balanced.odd_vertices,
            balanced.added_arcs
        ),
        Severity::Info,
    );
    if !balanced.unmatched.is_empty() {
        emit(
            &mut on_progress,
            format!(
                "{} odd-degree vertices could not be paired, the route may not cover every street",
                balanced.unmatched.len()
            ),
            Severity::Warning,
        );
    }

    // Circuit ----------------------------------------------------------------
    let graph = balanced.graph;
    let start = match find_start_node(&graph, config.start) {
        Some(start) => start,
        None => {
            let err = RouteError::NoRoutableNetwork;
            emit(&mut on_progress, err.to_string(), Severity::Error);
            return Err(err);
        }
    };

    let circuit = build_circuit(&graph, start, &config.penalties);
    let closed = circuit.is_eulerian(&graph);
    if closed {
        emit(
            &mut on_progress,
            format!(
                "Built circuit of {} arcs from vertex {}",
                circuit.arcs.len(),
                graph[start].id
            ),
            Severity::Info,
        );
    } else {
        emit(
            &mut on_progress,
            format!(
                "Circuit covers {} of {} arcs and may not return to the start",
                circuit.arcs.len(),
                graph.edge_count()
            ),
            Severity::Warning,
        );
    }

    // Statistics -------------------------------------------------------------
    let metrics = measure_circuit(&graph, &circuit.vertices);

    let stats = RouteStats {
        total_distance_km: metrics.distance / 1000.0,
        arc_traversals: metrics.arc_traversals,
        drive_time_minutes: drive_time_minutes(
            metrics.distance,
            config.average_speed_kmh,
        ),
        vertex_count: graph.node_count(),
        arc_count: graph.edge_count(),
        component_count: reduced.component_count,
        included_segments: network.segments.len(),
        excluded_segments: network.excluded_segments,
        right_turns: metrics.right_turns,
        left_turns: metrics.left_turns,
        u_turns: metrics.u_turns,
        deadhead_distance_km: deadhead_distance(&graph) / 1000.0,
        odd_vertices: balanced.odd_vertices,
        matched_pairs: balanced.pairs.len(),
        unmatched_vertices: balanced.unmatched.len(),
        closed: closed,
        missing_hops: metrics.missing_hops,
    };

    let coords = circuit
        .vertices
        .iter()
        .map(|node| (graph[*node].lat, graph[*node].lon))
        .collect();

    emit(
        &mut on_progress,
        format!(
            "Route complete: {:.2} km, about {:.0} minutes",
            stats.total_distance_km, stats.drive_time_minutes
        ),
        Severity::Success,
    );

    Ok(PlannedRoute {
        graph: graph,
        circuit: circuit,
        coords: coords,
        stats: stats,
    })
}
