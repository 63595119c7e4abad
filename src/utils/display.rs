use crate::models::snapshot::Snapshot;
use crate::models::timeseries::TimeSeriesPoint;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

const BAR_WIDTH: usize = 40;

pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_header(&self, text: &str) -> String {
        format!("\n=== {} ===", text.bright_white().bold())
    }

    fn format_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        table.add_row(Row::new(
            headers.iter().map(|h| Cell::new(h).style_spec("b")).collect(),
        ));
        for row in rows {
            table.add_row(Row::new(row.iter().map(|cell| Cell::new(cell)).collect()));
        }

        table.to_string()
    }

    /// Integer with thousands separators, e.g. `1,234,567`.
    pub fn format_count(&self, value: u64) -> String {
        let digits = value.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }

    pub fn format_metrics(&self, snapshot: &Snapshot) -> String {
        let mut output = Vec::new();
        output.push(self.format_header("Today"));
        output.push(format!("States reporting: {}", snapshot.states_reporting()));
        output.push(format!(
            "New cases (today, sum of states): {}",
            self.format_count(snapshot.total_new_cases()).yellow()
        ));
        output.push(format!(
            "New deaths (today, sum of states): {}",
            self.format_count(snapshot.total_new_deaths()).red()
        ));
        if !snapshot.dropped.is_empty() {
            output.push(
                format!("Not mapped: {}", snapshot.dropped.join(", "))
                    .dimmed()
                    .to_string(),
            );
        }

        output.join("\n")
    }

    /// Ranked table of the states with the most new cases.
    pub fn format_top_states(&self, snapshot: &Snapshot, n: usize) -> String {
        let rows: Vec<Vec<String>> = snapshot
            .top_by_new_cases(n)
            .into_iter()
            .enumerate()
            .map(|(rank, record)| {
                vec![
                    (rank + 1).to_string(),
                    record.region_name.clone(),
                    record.region_code.to_string(),
                    self.format_count(record.new_cases),
                    self.format_count(record.new_deaths),
                ]
            })
            .collect();

        format!(
            "{}\n{}",
            self.format_header(&format!("Top {} States - Today's New Cases", n)),
            self.format_table(
                &["#", "State", "Code", "New Cases (today)", "New Deaths (today)"],
                &rows
            )
        )
    }

    /// Daily new cases with a proportional bar per day. `days` is the
    /// requested window; fewer points may be available.
    pub fn format_trend(&self, title: &str, days: u32, points: &[TimeSeriesPoint]) -> String {
        let peak = points.iter().map(|p| p.new_cases).max().unwrap_or(0);
        let rows: Vec<Vec<String>> = points
            .iter()
            .map(|point| {
                vec![
                    point.date.to_string(),
                    self.format_count(point.cumulative_cases),
                    self.format_count(point.new_cases),
                    self.bar(point.new_cases, peak).cyan().to_string(),
                ]
            })
            .collect();

        format!(
            "{}\n{}",
            self.format_header(&format!("New Cases - {} (last {} days)", title, days)),
            self.format_table(&["Date", "Cases", "New Cases", ""], &rows)
        )
    }

    fn bar(&self, value: u64, peak: u64) -> String {
        if peak == 0 {
            return String::new();
        }
        let width = (value as u128 * BAR_WIDTH as u128 / peak as u128) as usize;
        "█".repeat(width)
    }

    pub fn format_regions(&self, names: &[&str]) -> String {
        format!("{}\n{}", self.format_header("Tracked States"), names.join(", "))
    }

    pub fn format_error(&self, context: &str, message: &str) -> String {
        format!("{} {}: {}", "error:".red().bold(), context, message)
    }
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::{reconcile, StateCounts};
    use crate::models::timeseries::{build_series, DailyCount};
    use chrono::NaiveDate;

    fn counts(state: &str, cases: u64) -> StateCounts {
        StateCounts {
            state: state.to_string(),
            cases: Some(cases),
            deaths: Some(0),
        }
    }

    #[test]
    fn test_format_count() {
        let display = DisplayFormatter::new();
        assert_eq!(display.format_count(0), "0");
        assert_eq!(display.format_count(999), "999");
        assert_eq!(display.format_count(1000), "1,000");
        assert_eq!(display.format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_bar_scales_to_peak() {
        let display = DisplayFormatter::new();
        assert_eq!(display.bar(10, 0), "");
        assert_eq!(display.bar(0, 10).chars().count(), 0);
        assert_eq!(display.bar(5, 10).chars().count(), BAR_WIDTH / 2);
        assert_eq!(display.bar(10, 10).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_top_states_table() {
        let snapshot = reconcile(
            vec![counts("Texas", 5000), counts("Maine", 120), counts("Ohio", 2500)],
            vec![counts("Texas", 1000), counts("Maine", 100), counts("Ohio", 500)],
        );
        let text = DisplayFormatter::new().format_top_states(&snapshot, 2);
        assert!(text.contains("Texas"));
        assert!(text.contains("4,000"));
        assert!(text.contains("Ohio"));
        assert!(!text.contains("Maine"));
    }

    #[test]
    fn test_trend_lists_every_day() {
        let start = NaiveDate::from_ymd_opt(2022, 5, 1).unwrap();
        let rows = [100u64, 150, 400]
            .iter()
            .enumerate()
            .map(|(i, &cases)| DailyCount {
                date: start + chrono::Duration::days(i as i64),
                cases,
                deaths: None,
            })
            .collect();
        let text = DisplayFormatter::new().format_trend("Utah", 180, &build_series(rows, 180));
        assert!(text.contains("last 180 days"));
        assert!(text.contains("Utah"));
        assert!(text.contains("2022-05-01"));
        assert!(text.contains("2022-05-03"));
        assert!(text.contains("250"));
    }
}
