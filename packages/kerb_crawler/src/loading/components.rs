//! A closed route can only be found over a network in which every vertex can
//! be reached from every other. The functions here split the road graph into
//! its strongly connected components and keep only the largest of them.

use crate::common::error::RouteError;
use crate::common::graph_data::RoadGraph;
use log::debug;
use petgraph::graph::NodeIndex;
use petgraph::visit::{Dfs, DfsPostOrder, Reversed, VisitMap};

/// Outcome of reducing a graph to its largest strongly connected component
#[derive(Debug)]
pub struct ReducedGraph {
    pub graph: RoadGraph,
    pub component_count: usize,
}

/// Partition the vertices of the graph into strongly connected components
/// using two depth-first passes. The first pass walks the graph as-is and
/// records the order in which vertices finish, the second walks the reversed
/// graph starting from vertices in reverse finish order; each tree of the
/// second pass is one component. Both passes use explicit stacks, and roots
/// are taken in node index order so that the output is deterministic.
pub fn strongly_connected_components(graph: &RoadGraph) -> Vec<Vec<NodeIndex>> {
    let mut finish_order = Vec::with_capacity(graph.node_count());
    let mut dfs = DfsPostOrder::empty(graph);
    for node in graph.node_indices() {
        if dfs.discovered.is_visited(&node) {
            continue;
        }
        dfs.move_to(node);
        while let Some(finished) = dfs.next(graph) {
            finish_order.push(finished);
        }
    }

    let reversed = Reversed(graph);
    let mut components = Vec::new();
    let mut dfs = Dfs::empty(reversed);
    for node in finish_order.into_iter().rev() {
        if dfs.discovered.is_visited(&node) {
            continue;
        }
        dfs.move_to(node);
        let mut component = Vec::new();
        while let Some(member) = dfs.next(reversed) {
            component.push(member);
        }
        components.push(component);
    }

    components
}

/// Construct a new graph which contains only the vertices of the largest
/// strongly connected component, along with every arc which starts and ends
/// inside it. Where several components share the largest size, the one found
/// first wins. As node indices are not static, any node indices taken from
/// the input graph are not valid for the output.
pub fn reduce_to_largest_component(
    graph: &RoadGraph,
) -> Result<ReducedGraph, RouteError> {
    let components = strongly_connected_components(graph);
    let component_count = components.len();

    let mut largest: Option<&Vec<NodeIndex>> = None;
    for component in components.iter() {
        if largest.is_none_or(|current| component.len() > current.len()) {
            largest = Some(component);
        }
    }

    let largest = largest.ok_or(RouteError::NoRoutableNetwork)?;

    let mut keep = vec![false; graph.node_count()];
    for node in largest {
        keep[node.index()] = true;
    }

    let new_graph = graph.filter_map(
        |node, vertex| keep[node.index()].then_some(*vertex),
        |_, arc| Some(arc.clone()),
    );

    if new_graph.node_count() == 0 {
        return Err(RouteError::NoRoutableNetwork);
    }

    debug!(
        "Kept {} of {} vertices across {} components",
        new_graph.node_count(),
        graph.node_count(),
        component_count
    );

    Ok(ReducedGraph {
        graph: new_graph,
        component_count: component_count,
    })
}
