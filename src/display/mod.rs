use crate::types::RaffleStatus;
use owo_colors::OwoColorize;

pub mod grid;

pub use grid::{render_grid, render_purchase_modal};

pub fn format_status_colored(status: RaffleStatus) -> String {
    format_status_colored_with_format(status, |s| format!("[{}]", s))
}

pub fn format_status_colored_with_format<F>(status: RaffleStatus, format_fn: F) -> String
where
    F: Fn(&str) -> String,
{
    let badge = format_fn(&status.to_string());
    match status {
        RaffleStatus::Active => badge.green().to_string(),
        RaffleStatus::Draft => badge.yellow().to_string(),
        RaffleStatus::Finished => badge.blue().to_string(),
        RaffleStatus::Cancelled => badge.red().to_string(),
        RaffleStatus::Closed | RaffleStatus::Unknown => badge.dimmed().to_string(),
    }
}

/// Format an amount with two decimals and thousands separators
///
/// # Examples
///
/// ```
/// use rifa::display::format_money;
///
/// assert_eq!(format_money(31.5), "$31.50");
/// assert_eq!(format_money(1234567.0), "$1,234,567.00");
/// assert_eq!(format_money(-2.5), "-$2.50");
/// ```
pub fn format_money(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// Format a count with thousands separators
pub fn format_count(n: usize) -> String {
    group_thousands(&n.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Text progress bar of `width` cells for a 0-100 percentage
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}
