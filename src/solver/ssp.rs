//! Successive-shortest-path assignment solver.
//!
//! The score matrix is modelled as a unit-capacity flow network: a source
//! feeds every tracker node, every tracker connects to each measurement it
//! has a positive score with (edge cost = negative score), and every
//! measurement drains into a sink. Augmenting one unit of flow along the
//! cheapest source-to-sink path accepts exactly one pair, possibly rerouting
//! an earlier tentative pairing, which is what makes the final matching
//! globally optimal rather than greedy. The loop stops as soon as the
//! cheapest augmenting path no longer decreases the total cost.

use super::GnnSolver;
use nalgebra::DMatrix;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug, Clone)]
struct Edge {
    to: usize,
    capacity: u8,
    cost: f64,
    /// Index of the reverse edge in `graph[to]`.
    rev: usize,
}

/// Dijkstra frontier entry, ordered as a min-heap on cost.
#[derive(Debug, Clone, Copy, PartialEq)]
struct State {
    cost: f64,
    node: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn add_edge(graph: &mut [Vec<Edge>], from: usize, to: usize, cost: f64) {
    let rev_in_to = graph[to].len();
    let rev_in_from = graph[from].len();
    graph[from].push(Edge {
        to,
        capacity: 1,
        cost,
        rev: rev_in_to,
    });
    graph[to].push(Edge {
        to: from,
        capacity: 0,
        cost: -cost,
        rev: rev_in_from,
    });
}

/// Min-cost-flow solver via successive shortest paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ssp;

impl GnnSolver for Ssp {
    fn maximize_linear_assignment(
        &self,
        score: &DMatrix<f64>,
    ) -> (HashMap<usize, usize>, HashMap<usize, usize>) {
        let n_trackers = score.nrows();
        let n_measurements = score.ncols();

        let mut direct = HashMap::new();
        let mut reverse = HashMap::new();
        if n_trackers == 0 || n_measurements == 0 {
            return (direct, reverse);
        }

        // Node layout: source, trackers, measurements, sink.
        let source = 0;
        let tracker_node = |t: usize| 1 + t;
        let measurement_node = |m: usize| 1 + n_trackers + m;
        let sink = 1 + n_trackers + n_measurements;
        let n_nodes = sink + 1;

        let mut graph: Vec<Vec<Edge>> = vec![Vec::new(); n_nodes];
        for t in 0..n_trackers {
            add_edge(&mut graph, source, tracker_node(t), 0.0);
        }
        for t in 0..n_trackers {
            for m in 0..n_measurements {
                // Zero-score edges can never beat leaving both nodes
                // unmatched, so they are pruned from the graph.
                if score[(t, m)] > 0.0 {
                    add_edge(
                        &mut graph,
                        tracker_node(t),
                        measurement_node(m),
                        -score[(t, m)],
                    );
                }
            }
        }
        for m in 0..n_measurements {
            add_edge(&mut graph, measurement_node(m), sink, 0.0);
        }

        // Initial potentials via Bellman-Ford; the tracker->measurement
        // edges carry negative costs.
        let mut potential = vec![f64::INFINITY; n_nodes];
        potential[source] = 0.0;
        for _ in 0..n_nodes {
            let mut updated = false;
            for u in 0..n_nodes {
                if !potential[u].is_finite() {
                    continue;
                }
                for edge in &graph[u] {
                    if edge.capacity > 0 && potential[u] + edge.cost < potential[edge.to] {
                        potential[edge.to] = potential[u] + edge.cost;
                        updated = true;
                    }
                }
            }
            if !updated {
                break;
            }
        }
        // Nodes the source cannot reach carry no admissible edges and never
        // enter a shortest path; pin their potential so reduced costs stay
        // finite.
        for p in potential.iter_mut() {
            if !p.is_finite() {
                *p = 0.0;
            }
        }

        loop {
            // Dijkstra on reduced costs.
            let mut dist = vec![f64::INFINITY; n_nodes];
            let mut prev: Vec<Option<(usize, usize)>> = vec![None; n_nodes];
            let mut heap = BinaryHeap::new();
            dist[source] = 0.0;
            heap.push(State {
                cost: 0.0,
                node: source,
            });

            while let Some(State { cost, node }) = heap.pop() {
                if cost > dist[node] {
                    continue;
                }
                for (idx, edge) in graph[node].iter().enumerate() {
                    if edge.capacity == 0 {
                        continue;
                    }
                    let next = cost + edge.cost + potential[node] - potential[edge.to];
                    if next < dist[edge.to] {
                        dist[edge.to] = next;
                        prev[edge.to] = Some((node, idx));
                        heap.push(State {
                            cost: next,
                            node: edge.to,
                        });
                    }
                }
            }

            if !dist[sink].is_finite() {
                break;
            }
            // Real path cost; a non-negative one would not raise the total
            // score, so the matching is already optimal.
            let path_cost = dist[sink] + potential[sink] - potential[source];
            if path_cost >= 0.0 {
                break;
            }

            for v in 0..n_nodes {
                if dist[v].is_finite() {
                    potential[v] += dist[v];
                }
            }

            // Push one unit of flow along the augmenting path.
            let mut v = sink;
            while v != source {
                debug_assert!(prev[v].is_some(), "broken augmenting path at {}", v);
                let (u, idx) = match prev[v] {
                    Some(step) => step,
                    None => break,
                };
                let rev = graph[u][idx].rev;
                graph[u][idx].capacity -= 1;
                graph[v][rev].capacity += 1;
                v = u;
            }
        }

        // A saturated tracker->measurement edge is a selected pair.
        for t in 0..n_trackers {
            for edge in &graph[tracker_node(t)] {
                if edge.to != source && edge.capacity == 0 {
                    let m = edge.to - 1 - n_trackers;
                    direct.insert(t, m);
                    reverse.insert(m, t);
                }
            }
        }

        (direct, reverse)
    }
}
