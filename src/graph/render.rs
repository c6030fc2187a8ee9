//! Graph image and DOT export
//!
//! Every node and edge is drawn; only the most connected pages get a label.

use crate::config::GraphConfig;
use crate::graph::layout::{force_directed_layout, Position};
use crate::graph::{CrawlGraph, GraphError};
use petgraph::dot::{Config as DotConfig, Dot};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const LABEL_FONT: &str = "sitegraph-label";
const MARGIN: f64 = 60.0;
const NODE_RADIUS: i32 = 5;
const HUB_RADIUS: i32 = 8;
const ARROW_LENGTH: f64 = 10.0;
const ARROW_HALF_WIDTH: f64 = 4.0;
const LABEL_CHARS: usize = 48;

/// Fonts probed when `graph.font-path` is not set
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// What ended up in the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub nodes: usize,
    pub edges: usize,
    pub labels: usize,
}

/// Draws the crawl graph to a PNG at `path`
///
/// # Returns
///
/// * `Ok(RenderSummary)` - Image written
/// * `Err(GraphError::Empty)` - No edges were recorded, nothing to draw
/// * `Err(GraphError)` - Drawing or writing the image failed
pub fn render_graph(
    graph: &CrawlGraph,
    config: &GraphConfig,
    path: &Path,
) -> Result<RenderSummary, GraphError> {
    if graph.is_empty() {
        return Err(GraphError::Empty);
    }

    let digraph = graph.to_petgraph();
    let (width, height) = (config.width, config.height);
    let layout = force_directed_layout(
        &digraph,
        f64::from(width),
        f64::from(height),
        config.layout_iterations,
    );
    let points = fit_to_canvas(&layout, f64::from(width), f64::from(height));

    let labeled: HashSet<&str> = graph
        .top_by_degree(config.max_labels)
        .into_iter()
        .map(|(url, _)| url)
        .collect();
    let fonts_ready = !labeled.is_empty() && prepare_label_font(config.font_path.as_deref());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let edge_style = ShapeStyle::from(&BLACK.mix(0.35)).stroke_width(1);
    let arrow_style = BLACK.mix(0.5).filled();
    for edge in digraph.raw_edges() {
        if edge.source() == edge.target() {
            continue;
        }
        let from = points[edge.source().index()];
        let to = points[edge.target().index()];

        let target_radius = if labeled.contains(digraph[edge.target()].as_str()) {
            HUB_RADIUS
        } else {
            NODE_RADIUS
        };
        root.draw(&PathElement::new(vec![pixel(from), pixel(to)], edge_style))
            .map_err(draw_error)?;
        if let Some(head) = arrowhead(from, to, f64::from(target_radius)) {
            root.draw(&Polygon::new(head, arrow_style))
                .map_err(draw_error)?;
        }
    }

    let mut labels = 0;
    for index in digraph.node_indices() {
        let url = digraph[index].as_str();
        let center = pixel(points[index.index()]);

        if labeled.contains(url) {
            root.draw(&Circle::new(center, HUB_RADIUS, RGBColor(214, 69, 65).filled()))
                .map_err(draw_error)?;
            if fonts_ready {
                let style = (LABEL_FONT, 14.0).into_font().color(&BLACK);
                let anchor = (center.0 + HUB_RADIUS + 2, center.1 - HUB_RADIUS - 2);
                root.draw(&Text::new(short_label(url), anchor, style))
                    .map_err(draw_error)?;
                labels += 1;
            }
        } else {
            root.draw(&Circle::new(center, NODE_RADIUS, RGBColor(52, 101, 164).filled()))
                .map_err(draw_error)?;
        }
    }

    root.present().map_err(draw_error)?;

    tracing::debug!(
        "Drew {} nodes, {} edges and {} labels to {}",
        digraph.node_count(),
        digraph.edge_count(),
        labels,
        path.display()
    );

    Ok(RenderSummary {
        nodes: digraph.node_count(),
        edges: digraph.edge_count(),
        labels,
    })
}

/// Writes the crawl graph in Graphviz DOT format
pub fn export_dot(graph: &CrawlGraph, path: &Path) -> Result<(), GraphError> {
    if graph.is_empty() {
        return Err(GraphError::Empty);
    }

    let digraph = graph.to_petgraph().map(|_, url| url.clone(), |_, _| "");
    let dot = Dot::with_config(&digraph, &[DotConfig::EdgeNoLabel]);
    fs::write(path, format!("{}", dot))?;
    Ok(())
}

/// Registers the label font with plotters
///
/// Returns false, after logging a warning, when no usable font is found; the
/// graph is then drawn without labels.
fn prepare_label_font(configured: Option<&str>) -> bool {
    let bytes = match load_font(configured) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("{}; drawing the graph without labels", e);
            return false;
        }
    };

    // plotters keeps registered fonts for the rest of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    match register_font(LABEL_FONT, FontStyle::Normal, bytes) {
        Ok(()) => true,
        Err(_) => {
            tracing::warn!("Unusable label font; drawing the graph without labels");
            false
        }
    }
}

fn load_font(configured: Option<&str>) -> Result<Vec<u8>, GraphError> {
    if let Some(path) = configured {
        return fs::read(path).map_err(|e| GraphError::Font {
            path: path.to_string(),
            reason: e.to_string(),
        });
    }

    SYSTEM_FONTS
        .iter()
        .find_map(|candidate| fs::read(candidate).ok())
        .ok_or_else(|| GraphError::Font {
            path: SYSTEM_FONTS.join(", "),
            reason: "none of the probed system fonts exist".to_string(),
        })
}

/// Scales layout positions into the image, leaving a margin for labels
fn fit_to_canvas(layout: &[Position], width: f64, height: f64) -> Vec<Position> {
    let (min_x, max_x) = bounds(layout.iter().map(|p| p.x));
    let (min_y, max_y) = bounds(layout.iter().map(|p| p.y));

    let scale = |value: f64, min: f64, max: f64, size: f64| {
        let usable = (size - 2.0 * MARGIN).max(1.0);
        if max - min < f64::EPSILON {
            size / 2.0
        } else {
            MARGIN + (value - min) / (max - min) * usable
        }
    };

    layout
        .iter()
        .map(|p| Position {
            x: scale(p.x, min_x, max_x, width),
            y: scale(p.y, min_y, max_y, height),
        })
        .collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn pixel(p: Position) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

/// Triangle pointing at `to`, its tip on the edge of the target node
fn arrowhead(from: Position, to: Position, target_radius: f64) -> Option<Vec<(i32, i32)>> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= target_radius + ARROW_LENGTH {
        return None;
    }

    let (ux, uy) = (dx / length, dy / length);
    let tip = Position {
        x: to.x - ux * target_radius,
        y: to.y - uy * target_radius,
    };
    let base = Position {
        x: tip.x - ux * ARROW_LENGTH,
        y: tip.y - uy * ARROW_LENGTH,
    };
    let left = Position {
        x: base.x - uy * ARROW_HALF_WIDTH,
        y: base.y + ux * ARROW_HALF_WIDTH,
    };
    let right = Position {
        x: base.x + uy * ARROW_HALF_WIDTH,
        y: base.y - ux * ARROW_HALF_WIDTH,
    };

    Some(vec![pixel(tip), pixel(left), pixel(right)])
}

/// URL without its scheme, shortened for display
fn short_label(url: &str) -> String {
    let trimmed = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    if trimmed.chars().count() <= LABEL_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(LABEL_CHARS - 3).collect();
        format!("{}...", head)
    }
}

fn draw_error<E: std::fmt::Display>(e: E) -> GraphError {
    GraphError::Draw(e.to_string())
}
