//! Pure formatting functions for UI output.
//!
//! Markers are styled with `console`, which drops the colors when the output
//! is not a terminal.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// `✔ item` in green when `ok`, `✘ item` in red otherwise.
pub fn check_mark(ok: bool, item: &str) -> String {
    if ok {
        format!("{} {}", style("✔").green(), item)
    } else {
        format!("{} {}", style("✘").red(), item)
    }
}

/// `➜ item`, used for the next release to cut.
pub fn next_mark(item: &str) -> String {
    format!("{} {}", style("➜").cyan(), item)
}

/// Render module → dependency edges as a Graphviz digraph.
pub fn dot_graph<'a>(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = String::from("digraph {\n");
    for (from, to) in edges {
        out.push_str(&format!("  \"{}\" -> \"{}\"\n", from, to));
    }
    out.push('}');
    out
}
