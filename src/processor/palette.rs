//! Fixed colours used by graph analysis and conflict marking.
use crate::errors::GraphError;
use std::collections::BTreeMap;

pub const INTERSECT_COLOR: &str = "#00FF00";
pub const NON_INTERSECT_COLORS: [&str; 8] =
    ["#ccffff", "#FF99FF", "#CCFF66", "#FF9966", "#6600FF", "#FF0033", "#FFFF00", "#CCCCCC"];
pub const HIGHLIGHT_COLOR: &str = "#FF66FF";
pub const CONFLICT_COLOR: &str = "#ffffff";
pub const CONFLICT_SHAPE: &str = "tripleoctagon";

/// Upper bound on simultaneously processed input graphs: one colour each.
#[must_use]
pub const fn maximum_input_graphs() -> usize {
    NON_INTERSECT_COLORS.len()
}

/// Give each graph, in input order, its own non-intersection colour.
///
/// # Errors
/// Returns `GraphError::TooManyInputs` when there are more graphs than colours.
pub fn assign_colors<S: AsRef<str>>(graph_names: &[S]) -> Result<BTreeMap<String, &'static str>, GraphError> {
    let max = maximum_input_graphs();
    if graph_names.len() > max {
        return Err(GraphError::TooManyInputs { count: graph_names.len(), max });
    }
    let assigned: BTreeMap<String, &'static str> = graph_names
        .iter()
        .zip(NON_INTERSECT_COLORS)
        .map(|(name, color)| (name.as_ref().to_string(), color))
        .collect();
    tracing::debug!(?assigned, "assigned graph colours");
    Ok(assigned)
}
