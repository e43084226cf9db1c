use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthStr;

use crate::task::{Priority, Task};
use crate::tasks::Stats;

/// Terminal output for task lists and stats.
#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Prints the given view grouped into the fixed priority sections, high
    /// first. Tasks keep their order inside each section.
    #[tracing::instrument(skip(self, tasks, now))]
    pub fn print_grouped(&mut self, tasks: &[&Task], now: DateTime<Utc>) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if tasks.is_empty() {
            writeln!(out, "No tasks found.")?;
            writeln!(out, "Create your first task with `taskflow add <title>`.")?;
            return Ok(());
        }

        let mut first = true;
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            let section: Vec<&&Task> = tasks.iter().filter(|t| t.priority == priority).collect();
            if section.is_empty() {
                continue;
            }

            if !first {
                writeln!(out)?;
            }
            first = false;

            let color = match priority {
                Priority::High => "31",
                Priority::Medium => "33",
                Priority::Low => "32",
            };
            let header = format!("{} ({})", priority.label(), section.len());
            writeln!(out, "{}", self.paint(&header, color))?;

            let mut rows = Vec::with_capacity(section.len());
            for task in section {
                let checkbox = if task.completed {
                    self.paint("[x]", "32")
                } else {
                    "[ ]".to_string()
                };

                let title = if task.completed {
                    self.paint(&task.title, "2")
                } else {
                    task.title.clone()
                };

                rows.push(vec![
                    self.paint(&task.short_id(), "33"),
                    checkbox,
                    title,
                    format_age(task.created_at, now),
                    task.description.clone(),
                ]);
            }

            write_rows(&mut out, rows)?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, stats))]
    pub fn print_stats(&mut self, stats: &Stats) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "Total          {}", stats.total)?;
        writeln!(out, "Active         {}", stats.active)?;
        writeln!(out, "Completed      {}", stats.completed)?;

        let high = stats.high_priority.to_string();
        let high = if stats.high_priority > 0 {
            self.paint(&high, "31")
        } else {
            high
        };
        writeln!(out, "High priority  {high}")?;

        if stats.total > 0 {
            let percent = stats.completed * 100 / stats.total;
            writeln!(out)?;
            writeln!(
                out,
                "{} of {} completed ({percent}%)",
                stats.completed, stats.total
            )?;
        }

        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

/// Rough age of a task for list output.
fn format_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);

    if elapsed.num_seconds() < 60 {
        "just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h", elapsed.num_hours())
    } else {
        format!("{}d", elapsed.num_days())
    }
}

fn write_rows<W: Write>(mut writer: W, rows: Vec<Vec<String>>) -> anyhow::Result<()> {
    let column_count = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; column_count];

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for row in rows {
        let mut line = String::new();
        for (idx, cell) in row.iter().enumerate() {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            line.push_str("  ");
            line.push_str(cell);
            line.push_str(&" ".repeat(padding));
        }
        writeln!(writer, "{}", line.trim_end())?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn age_buckets() {
        let now = Utc::now();
        assert_eq!(format_age(now - Duration::seconds(5), now), "just now");
        assert_eq!(format_age(now - Duration::minutes(12), now), "12m");
        assert_eq!(format_age(now - Duration::hours(3), now), "3h");
        assert_eq!(format_age(now - Duration::days(40), now), "40d");
    }

    #[test]
    fn rows_are_padded_to_the_widest_cell() {
        let mut buf = Vec::new();
        write_rows(
            &mut buf,
            vec![
                vec!["a".to_string(), "long cell".to_string()],
                vec!["bbbb".to_string(), "x".to_string()],
            ],
        )
        .expect("write rows");

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  a     long cell");
        assert_eq!(lines[1], "  bbbb  x");
    }

    #[test]
    fn strip_ansi_removes_color_codes() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(strip_ansi("plain"), "plain");
    }
}
