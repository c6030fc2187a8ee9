//! Force-directed layout (Fruchterman-Reingold)
//!
//! Nodes repel each other, edges pull their endpoints together, and a
//! temperature that cools linearly caps how far a node may move per
//! iteration. Starting positions are placed on a spiral, so the result is
//! deterministic for a given graph.

use petgraph::graph::DiGraph;

/// A node position in layout space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

const MIN_DISTANCE: f64 = 0.01;

/// Lays out `graph` in a `width` x `height` box
///
/// Returns one position per node, indexed like the graph's nodes. Edge
/// direction is ignored.
pub fn force_directed_layout<N, E>(
    graph: &DiGraph<N, E>,
    width: f64,
    height: f64,
    iterations: usize,
) -> Vec<Position> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let center = Position {
        x: width / 2.0,
        y: height / 2.0,
    };
    if n == 1 {
        return vec![center];
    }

    let mut positions = initial_positions(n, center, width.min(height) / 3.0);
    let edges: Vec<(usize, usize)> = graph
        .raw_edges()
        .iter()
        .map(|edge| (edge.source().index(), edge.target().index()))
        .filter(|(a, b)| a != b)
        .collect();

    // Ideal edge length
    let k = (width * height / n as f64).sqrt();
    let start_temperature = width.min(height) / 10.0;

    for iteration in 0..iterations {
        let temperature = start_temperature * (1.0 - iteration as f64 / iterations as f64);
        let mut displacement = vec![Position { x: 0.0, y: 0.0 }; n];

        for u in 0..n {
            for v in (u + 1)..n {
                let (dx, dy, distance) = offset(positions[u], positions[v]);
                let force = k * k / distance;
                let (fx, fy) = (dx / distance * force, dy / distance * force);
                displacement[u].x += fx;
                displacement[u].y += fy;
                displacement[v].x -= fx;
                displacement[v].y -= fy;
            }
        }

        for &(a, b) in &edges {
            let (dx, dy, distance) = offset(positions[a], positions[b]);
            let force = distance * distance / k;
            let (fx, fy) = (dx / distance * force, dy / distance * force);
            displacement[a].x -= fx;
            displacement[a].y -= fy;
            displacement[b].x += fx;
            displacement[b].y += fy;
        }

        for (position, moved) in positions.iter_mut().zip(&displacement) {
            let length = (moved.x * moved.x + moved.y * moved.y).sqrt().max(MIN_DISTANCE);
            let step = length.min(temperature);
            position.x = (position.x + moved.x / length * step).clamp(0.0, width);
            position.y = (position.y + moved.y / length * step).clamp(0.0, height);
        }
    }

    positions
}

/// Spiral around the center so no two nodes start on the same spot
fn initial_positions(n: usize, center: Position, radius: f64) -> Vec<Position> {
    // Golden angle
    let step = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    (0..n)
        .map(|i| {
            let r = radius * ((i as f64 + 0.5) / n as f64).sqrt();
            let angle = i as f64 * step;
            Position {
                x: center.x + r * angle.cos(),
                y: center.y + r * angle.sin(),
            }
        })
        .collect()
}

fn offset(a: Position, b: Position) -> (f64, f64, f64) {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
    (dx, dy, distance)
}
