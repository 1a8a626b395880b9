use colored::{Color, Colorize};

use crate::infrastructure::scm::{ChangeKind, FileChange};

/// Formatting for everything `ju` writes to the terminal
///
/// Every method returns the finished line so callers decide where it goes.
#[derive(Debug, Clone, Copy)]
pub struct DisplayHelper {
    pub use_color: bool,
}

impl DisplayHelper {
    /// Create a new DisplayHelper
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Banner printed before each repository is processed
    pub fn repository_header(&self, name: &str) -> String {
        let banner = format!("======> {} <======", name);
        if self.use_color {
            banner.bold().to_string()
        } else {
            banner
        }
    }

    /// Indented `key: value` line under a repository header
    pub fn detail(&self, key: &str, value: &str) -> String {
        let line = format!("  {}: {}", key, value);
        if self.use_color {
            line.dimmed().to_string()
        } else {
            line
        }
    }

    pub fn success(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "✓".green().bold(), message.green())
        } else {
            format!("[SUCCESS] {}", message)
        }
    }

    pub fn warning(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "⚠".yellow().bold(), message.yellow())
        } else {
            format!("[WARNING] {}", message)
        }
    }

    pub fn error(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "✗".red().bold(), message.red())
        } else {
            format!("[ERROR] {}", message)
        }
    }

    /// One line of a status listing: tab, code, space, path
    pub fn change(&self, change: &FileChange) -> String {
        let line = format!("\t{} {}", change.kind.code(), change.path);
        if self.use_color {
            line.color(change_color(change.kind)).to_string()
        } else {
            line
        }
    }

    /// Colorize a diff line by its prefix
    pub fn diff_line(&self, line: &str) -> String {
        if !self.use_color {
            return line.to_string();
        }

        if line.starts_with("---") || line.starts_with("+++") || line.starts_with("diff ") {
            line.bold().to_string()
        } else if line.starts_with("@@") {
            line.cyan().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with('+') {
            line.green().to_string()
        } else {
            line.to_string()
        }
    }

    /// Colorize a whole diff, keeping its line structure
    pub fn diff(&self, diff: &str) -> String {
        diff.lines()
            .map(|line| self.diff_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn change_color(kind: ChangeKind) -> Color {
    match kind {
        ChangeKind::Modified => Color::Blue,
        ChangeKind::Added => Color::Green,
        ChangeKind::Removed => Color::Yellow,
        ChangeKind::Clean => Color::White,
        ChangeKind::Missing => Color::Cyan,
        ChangeKind::Untracked => Color::Red,
        ChangeKind::Ignored => Color::Magenta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_output() {
        let display = DisplayHelper::new(false);
        assert_eq!(display.repository_header("api"), "======> api <======");
        assert_eq!(display.success("done"), "[SUCCESS] done");
        assert_eq!(display.warning("careful"), "[WARNING] careful");
        assert_eq!(display.error("boom"), "[ERROR] boom");
        assert_eq!(display.detail("scm", "hg"), "  scm: hg");
    }

    #[test]
    fn test_change_line_format() {
        let display = DisplayHelper::new(false);
        assert_eq!(
            display.change(&FileChange::new(ChangeKind::Untracked, "src/new.rs")),
            "\t? src/new.rs"
        );
        assert_eq!(
            display.change(&FileChange::new(ChangeKind::Missing, "gone.txt")),
            "\t! gone.txt"
        );
    }

    #[test]
    fn test_change_colors() {
        assert_eq!(change_color(ChangeKind::Modified), Color::Blue);
        assert_eq!(change_color(ChangeKind::Added), Color::Green);
        assert_eq!(change_color(ChangeKind::Untracked), Color::Red);
        assert_eq!(change_color(ChangeKind::Ignored), Color::Magenta);
    }

    #[test]
    fn test_plain_diff_is_unchanged() {
        let diff = "--- a/x\n+++ b/x\n@@ -1 +1 @@\n-old\n+new";
        assert_eq!(DisplayHelper::new(false).diff(diff), diff);
    }

    #[test]
    fn test_colored_diff_lines() {
        colored::control::set_override(true);
        let display = DisplayHelper::new(true);
        assert_eq!(display.diff_line("-old"), "-old".red().to_string());
        assert_eq!(display.diff_line("+new"), "+new".green().to_string());
        assert_eq!(display.diff_line("@@ -1 +1 @@"), "@@ -1 +1 @@".cyan().to_string());
        assert_eq!(display.diff_line("+++ b/x"), "+++ b/x".bold().to_string());
        assert_eq!(display.diff_line(" context"), " context");
    }
}
