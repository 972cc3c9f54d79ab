use std::time::Duration;

use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};

/// Counters tracked across a whole solve.
///
/// A node is one assignment or exclusion attempt; a revision is one
/// check-and-prune pass over an arc, regardless of how many values it
/// pruned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub solutions_found: u64,
    pub nodes_explored: u64,
    pub revisions_done: u64,
}

/// Renders the solve counters as a table for terminal output.
pub fn render_stats_table(stats: &SearchStats, elapsed: Duration) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));
    table.add_row(Row::new(vec![
        Cell::new("Solutions found"),
        Cell::new(&stats.solutions_found.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Nodes explored"),
        Cell::new(&stats.nodes_explored.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Arc revisions"),
        Cell::new(&stats.revisions_done.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Time taken (ms)"),
        Cell::new(&elapsed.as_millis().to_string()),
    ]));
    table.to_string()
}
