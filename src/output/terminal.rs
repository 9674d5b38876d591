// Colored terminal output for term tables, neighbour lists and graphs.
//
// main.rs delegates all formatting here. Nothing in this module computes
// anything; it only prints what the pipeline produced.

use colored::Colorize;

use super::truncate_chars;
use crate::graph::Graph;
use crate::text::TermIndex;

const LABEL_WIDTH: usize = 24;

/// Display the `top` most frequent terms with their surface labels.
pub fn display_term_counts(index: &TermIndex, top: usize) {
    let counts = index.term_counts();
    if counts.is_empty() {
        println!("No terms indexed.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Term Frequencies ({} of {} terms, {} tokens) ===",
            top.min(counts.len()),
            counts.len(),
            index.token_count()
        )
        .bold()
    );
    println!();
    println!(
        "  {:>4}  {:<24} {:<24} {:>6}",
        "Rank".dimmed(),
        "Term".dimmed(),
        "Label".dimmed(),
        "Count".dimmed(),
    );
    println!("  {}", "-".repeat(62).dimmed());

    for (i, (term, count)) in counts.iter().take(top).enumerate() {
        let label = index.unstem(term).unwrap_or(term.as_str());
        println!(
            "  {:>4}. {:<24} {:<24} {:>6}",
            i + 1,
            truncate_chars(term, LABEL_WIDTH),
            truncate_chars(label, LABEL_WIDTH).cyan(),
            count,
        );
    }
    println!();
}

/// Display the terms closest to `word`, highest score first.
pub fn display_neighbors(word: &str, neighbors: &[(String, f64)], index: &TermIndex) {
    if neighbors.is_empty() {
        println!("No neighbours found for \"{word}\".");
        return;
    }

    println!("\n{}", format!("=== Nearest Terms to \"{word}\" ===").bold());
    println!();
    for (i, (term, score)) in neighbors.iter().enumerate() {
        let label = index.unstem(term).unwrap_or(term.as_str());
        println!(
            "  {:>4}. {:<24} {}",
            i + 1,
            truncate_chars(label, LABEL_WIDTH),
            colorize_score(*score),
        );
    }
    println!();
}

/// Display node and edge counts plus the best-connected terms.
pub fn display_graph_summary(graph: &Graph) {
    println!("\n{}", "=== Term Graph ===".bold());
    println!("  Nodes: {}", graph.node_count());
    println!("  Edges: {}", graph.edge_count());

    if graph.edge_count() == 0 {
        println!("  {}", "Graph has no edges.".dimmed());
        return;
    }

    let mut degrees: Vec<(&str, usize)> = graph
        .nodes()
        .iter()
        .map(|n| (n.as_str(), graph.neighbors(n).len()))
        .collect();
    degrees.sort_by(|a, b| b.1.cmp(&a.1));

    println!();
    println!("  {}", "Most connected:".dimmed());
    for (label, degree) in degrees.iter().take(10) {
        println!("    {:<24} {:>4}", truncate_chars(label, LABEL_WIDTH), degree);
    }
    println!();
}

fn colorize_score(score: f64) -> colored::ColoredString {
    let text = format!("{score:.4}");
    match score {
        s if s >= 0.75 => text.green().bold(),
        s if s >= 0.5 => text.green(),
        s if s >= 0.25 => text.yellow(),
        _ => text.dimmed(),
    }
}
