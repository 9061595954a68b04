//! Graphviz dot-file export, for eyeballing a small run's component
//! structure as a static artifact rather than a live view.

use std::{fmt::Write as _, path::Path};

use ccl_core::{Label, VertexId};

const PALETTE: &[&str] = &[
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    "#bcf60c", "#fabebe", "#008080", "#e6beff", "#9a6324", "#fffac8", "#800000", "#aaffc3",
];

fn color_for(label: Label) -> &'static str {
    PALETTE[(label.unsigned_abs() as usize) % PALETTE.len()]
}

/// Renders `rows` (full adjacency list) with each vertex colored by its
/// component label, as a Graphviz dot document.
pub fn render_dot(rows: &[Vec<VertexId>], labels: &[Label]) -> String {
    let mut out = String::new();
    out.push_str("graph components {\n");
    out.push_str("  node [style=filled];\n");

    for (v, &label) in labels.iter().enumerate() {
        let _ = writeln!(out, "  {v} [fillcolor=\"{}\"];", color_for(label));
    }

    for (v, neighbors) in rows.iter().enumerate() {
        for &n in neighbors {
            if (n as usize) > v {
                let _ = writeln!(out, "  {v} -- {n};");
            }
        }
    }

    out.push_str("}\n");
    out
}

pub fn write_dot(path: &Path, rows: &[Vec<VertexId>], labels: &[Label]) -> anyhow::Result<()> {
    std::fs::write(path, render_dot(rows, labels))?;
    Ok(())
}
