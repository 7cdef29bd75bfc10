//! CLI UI utilities: colored status lines, progress bar, and result rendering.

use comfy_table::{presets, Attribute, Cell, CellAlignment, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::models::{CandidateUser, ScoreCard, SearchCriteria};

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => println!("{} {}", icon.red().bold(), msg),
        Status::Warning => println!("{} {}", icon.yellow().bold(), msg),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
        Status::Search => println!("{} {}", icon.yellow(), msg),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print search results header.
pub fn print_search_header(criteria: &SearchCriteria, count: usize, duration: Duration) {
    let query = criteria.query().unwrap_or_default();
    println!();
    println!(
        "{} Developers matching: \"{}\"",
        status_icon(Status::Search).yellow().bold(),
        query.cyan().bold()
    );
    println!(
        "{} Found {} with a contact email in {:.1}s",
        "─".repeat(30).dimmed(),
        count.to_string().green().bold(),
        duration.as_secs_f64()
    );
    println!();
}

/// Format a number with commas.
pub fn format_number(n: u64) -> String {
    n.to_string()
        .chars()
        .rev()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect()
}

/// Progress bar over the users of one search.
pub struct SearchProgressBar {
    pb: ProgressBar,
}

impl SearchProgressBar {
    /// Spinner until the number of users is known
    pub fn new(msg: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A bar that draws nothing
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    /// Switch to a bounded bar once the search returned
    pub fn set_length(&self, len: u64) {
        if self.pb.length() == Some(len) {
            return;
        }
        self.pb.set_style(
            ProgressStyle::with_template("{msg}: {bar:40.cyan/blue} {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░ "),
        );
        self.pb.set_length(len);
    }

    /// Record one processed user
    pub fn advance(&self, username: &str, found: bool) {
        let mark = if found { "✓" } else { "○" };
        self.pb.set_message(format!("{} {}", mark, username));
        self.pb.inc(1);
    }

    /// Finish with success message.
    pub fn finish_with_success(&self, msg: &str) {
        self.pb
            .finish_with_message(format!("{} {}", status_icon(Status::Success), msg));
    }

    /// Finish with error message.
    pub fn finish_with_error(&self, msg: &str) {
        self.pb
            .finish_with_message(format!("{} {}", status_icon(Status::Error), msg));
    }

    /// Remove the bar from the terminal.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}

/// Candidates as a table
pub fn render_table(candidates: &[CandidateUser]) -> String {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec![
        "#", "User", "Email", "Score", "Followers", "Repos", "Stars", "Forks",
    ]);

    for (position, candidate) in candidates.iter().enumerate() {
        let email = candidate
            .email
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&candidate.username).add_attribute(Attribute::Bold),
            Cell::new(email),
            Cell::new(format!("{:.1}", candidate.score)).set_alignment(CellAlignment::Right),
            Cell::new(format_number(candidate.followers)).set_alignment(CellAlignment::Right),
            Cell::new(format_number(candidate.public_repos)).set_alignment(CellAlignment::Right),
            Cell::new(format_number(candidate.total_stars)).set_alignment(CellAlignment::Right),
            Cell::new(format_number(candidate.total_forks)).set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

/// Candidates as plain text, one per line
pub fn render_plain(candidates: &[CandidateUser]) -> String {
    candidates
        .iter()
        .map(|c| {
            let email = c.email.as_ref().map(|e| e.as_str()).unwrap_or("-");
            format!(
                "{} <{}> score={:.1} followers={} repos={} stars={} forks={}",
                c.username, email, c.score, c.followers, c.public_repos, c.total_stars, c.total_forks
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A score card as plain text
pub fn render_score_card(username: &str, card: &ScoreCard) -> String {
    match card.details {
        Some(d) => format!(
            "{} score={:.1} followers={} repos={} stars={} forks={}",
            username, card.score, d.followers, d.public_repos, d.total_stars, d.total_forks
        ),
        None => format!("{} score={:.1} (no data)", username, card.score),
    }
}
