//! Visualization utilities for TSP solutions.
//!
//! Generates SVG drawings of tours and convergence curves, and text exports
//! for external plotting.

use crate::error::Result;
use crate::instance::{bounds, Instance};
use crate::solution::Solution;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Escape text placed inside SVG elements
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// Node radius
    pub node_radius: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 800.0,
            height: 800.0,
            margin: 50.0,
            node_radius: 6.0,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate SVG drawing of a tour over the instance locations
    pub fn generate_svg(&self, instance: &Instance, solution: &Solution) -> String {
        let mut svg = String::new();

        let (min_x, max_x, min_y, max_y) = bounds(&instance.points);

        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1.0);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1.0);
        let scale = scale_x.min(scale_y);

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .node {{ fill: #3498db; stroke: #2c3e50; stroke-width: 2; }}
    .start {{ fill: #e74c3c; stroke: #c0392b; stroke-width: 2; }}
    .edge {{ stroke: #34495e; stroke-width: 2; fill: none; }}
    .label {{ font-family: Arial; font-size: 10px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">Instance: {} | Distance: {:.2} | {}</text>
"##,
            self.margin,
            escape_xml(&instance.name),
            solution.distance,
            escape_xml(&solution.algorithm)
        ));

        let transform = |x: f64, y: f64| -> (f64, f64) {
            let tx = self.margin + (x - min_x) * scale;
            let ty = self.height - self.margin - (y - min_y) * scale;
            (tx, ty)
        };

        let points = solution.route.points();
        if points.len() > 1 {
            let path: Vec<String> = points
                .iter()
                .map(|p| {
                    let (x, y) = transform(p.x, p.y);
                    format!("{:.2},{:.2}", x, y)
                })
                .collect();

            svg.push_str(&format!(
                r#"<polygon points="{}" class="edge"/>
"#,
                path.join(" ")
            ));
        }

        for (i, p) in points.iter().enumerate() {
            let (x, y) = transform(p.x, p.y);
            let class = if i == 0 { "start" } else { "node" };

            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="{}"/>
"##,
                x, y, self.node_radius, class
            ));

            svg.push_str(&format!(
                r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                x, y - self.node_radius - 3.0, i
            ));
        }

        svg.push_str("</svg>");

        svg
    }

    /// Generate a step chart of the best distance over iterations/generations
    pub fn generate_convergence_svg(&self, solution: &Solution) -> String {
        let history = &solution.history;
        let last_step = history.last().map(|h| h.0).unwrap_or(0);
        let steps = solution.iterations.unwrap_or(last_step).max(last_step);
        let mut svg = String::new();

        let width = self.width;
        let height = 300.0;
        let margin = 50.0;

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .line {{ stroke: #3498db; stroke-width: 2; fill: none; }}
    .axis {{ stroke: #2c3e50; stroke-width: 1; }}
    .label {{ font-family: Arial; font-size: 12px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            width, height, width, height
        ));

        svg.push_str(&format!(
            r#"<text x="{}" y="25" class="title">Convergence - {} ({} steps)</text>
"#,
            margin, escape_xml(&solution.algorithm), steps
        ));

        let plot_width = width - 2.0 * margin;
        let plot_height = height - 2.0 * margin;

        svg.push_str(&format!(
            r##"<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis"/>
<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis"/>
"##,
            margin, height - margin, width - margin, height - margin,
            margin, margin, margin, height - margin
        ));

        if history.is_empty() {
            svg.push_str("</svg>");
            return svg;
        }

        let y_min = history.iter().map(|h| h.1).fold(f64::INFINITY, f64::min);
        let y_max = history.iter().map(|h| h.1).fold(f64::NEG_INFINITY, f64::max);
        let y_range = (y_max - y_min).max(1e-9);
        let x_scale = plot_width / steps.max(1) as f64;
        let to_y = |value: f64| margin + (y_max - value) / y_range * plot_height;

        svg.push_str(&format!(
            r##"<text x="5" y="{:.2}" class="label">{:.1}</text>
<text x="5" y="{:.2}" class="label">{:.1}</text>
"##,
            margin + 5.0, y_max,
            height - margin, y_min
        ));

        // Hold each value until the next improvement, then drop
        let mut path = String::new();
        let mut previous_y = 0.0;
        for (i, &(step, value)) in history.iter().enumerate() {
            let x = margin + step as f64 * x_scale;
            let y = to_y(value);

            if i == 0 {
                path.push_str(&format!("M {:.2} {:.2}", x, y));
            } else {
                path.push_str(&format!(" L {:.2} {:.2} L {:.2} {:.2}", x, previous_y, x, y));
            }
            previous_y = y;
        }
        if last_step < steps {
            path.push_str(&format!(" L {:.2} {:.2}", margin + steps as f64 * x_scale, previous_y));
        }

        svg.push_str(&format!(r##"<path d="{}" class="line"/>
"##, path));

        svg.push_str("</svg>");

        svg
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }

    /// Export data for external plotting (e.g., matplotlib)
    pub fn export_plot_data(&self, instance: &Instance, solution: &Solution) -> String {
        let mut data = String::new();

        data.push_str("# TSP Solution Data\n");
        data.push_str(&format!("# Instance: {}\n", instance.name));
        data.push_str(&format!("# Algorithm: {}\n", solution.algorithm));
        data.push_str(&format!("# Distance: {:.4}\n\n", solution.distance));

        data.push_str("# Route: order, x, y\n");
        for (i, p) in solution.route.points().iter().enumerate() {
            data.push_str(&format!("{},{},{}\n", i, p.x, p.y));
        }

        if !solution.history.is_empty() {
            data.push_str("\n# Improvements: step, best distance\n");
            for (step, distance) in &solution.history {
                data.push_str(&format!("{},{:.4}\n", step, distance));
            }
        }

        data
    }
}

/// Generate comparison plot data for multiple solutions
pub fn generate_comparison_data(solutions: &[Solution]) -> String {
    let mut data = String::new();

    data.push_str("# Algorithm Comparison\n");
    data.push_str("algorithm,distance,initial_distance,time\n");

    for sol in solutions {
        data.push_str(&format!("{},{:.4},{:.4},{:.4}\n",
            sol.algorithm, sol.distance, sol.initial_distance, sol.computation_time));
    }

    data
}
