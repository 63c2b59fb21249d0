pub mod agents;
pub mod documents;
pub mod pipeline;
pub mod submission;

use colored::Colorize;

pub(crate) fn heading(text: &str) {
    println!("{}", text.cyan().bold());
    println!("{}", "─".repeat(50).dimmed());
}

/// First `max_chars` characters of `text` on one line.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}
