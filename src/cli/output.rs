//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print lecture summary info.
    pub fn lecture_info(title: &str, number: &str, chunks: usize) {
        let number_part = if number.is_empty() {
            String::new()
        } else {
            format!("Lecture {}, ", number)
        };
        println!(
            "  {} {} ({}{} chunks)",
            style("*").cyan(),
            style(title).bold(),
            number_part,
            chunks
        );
    }

    /// Print a retrieval result.
    pub fn search_result(title: &str, number: &str, timestamp: &str, score: f32, text: &str) {
        let number_part = if number.is_empty() {
            String::new()
        } else {
            format!(" (lecture {})", number)
        };
        println!(
            "\n{} {}{} @ {} (score: {:.2})",
            style(">>").green(),
            style(title).bold(),
            number_part,
            style(timestamp).cyan(),
            score
        );
        println!("   {}", content_preview(text, 200));
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_len: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_len {
        content
    } else {
        let truncated: String = content.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview_short() {
        assert_eq!(content_preview("short text", 200), "short text");
    }

    #[test]
    fn test_content_preview_truncates() {
        let long = "x".repeat(250);
        let preview = content_preview(&long, 200);
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.ends_with("..."));
    }
}
