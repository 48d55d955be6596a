//! Date and time resolution.
//!
//! Turns the date/time prose found on department sites ("Wed, Sep 24,
//! 2025, 3:00 pm – 4:20 pm", "September 8", "9/24/2025") into an ISO
//! calendar date and a normalized time string. Unparseable input degrades
//! to empty strings; the resolver never errors, so a record with a bad
//! date survives with a blank date instead of being dropped.

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::utils::text::normalize_whitespace;

/// Resolves heterogeneous date/time text against an explicit reference
/// date.
///
/// The reference date supplies the year for month+day-only input. It is
/// passed in by the caller (the CLI's `--as-of`, defaulting to today at
/// startup) instead of being read from the wall clock here, so resolution
/// is reproducible.
pub struct DateResolver {
    reference: NaiveDate,
    weekday_month_day_year: Regex,
    month_day_year: Regex,
    month_day: Regex,
    numeric: Regex,
    iso: Regex,
    time_range: Regex,
    time_single: Regex,
}

impl DateResolver {
    /// Create a resolver with the given reference date.
    pub fn new(reference: NaiveDate) -> Self {
        // Patterns are tried in this order; the first usable match wins.
        Self {
            reference,
            weekday_month_day_year: Regex::new(
                r"(?i)\b(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})",
            )
            .expect("static regex"),
            month_day_year: Regex::new(
                r"(?i)\b([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})",
            )
            .expect("static regex"),
            month_day: Regex::new(r"(?i)\b([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b")
                .expect("static regex"),
            numeric: Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").expect("static regex"),
            iso: Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("static regex"),
            time_range: Regex::new(
                r"(?i)(\d{1,2})(?::(\d{2}))?\s*(am|pm)\s*(?:-|–|—|‑|to|until)\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)",
            )
            .expect("static regex"),
            time_single: Regex::new(r"(?i)(\d{1,2})(?::(\d{2}))?\s*(am|pm)").expect("static regex"),
        }
    }

    /// Resolve both date and time from one text.
    pub fn resolve(&self, text: &str) -> (String, String) {
        let text = normalize_whitespace(text);
        (self.resolve_date(&text), self.resolve_time(&text))
    }

    /// Resolve the calendar date, or empty when nothing parses.
    pub fn resolve_date(&self, text: &str) -> String {
        let text = normalize_whitespace(text);

        for re in [&self.weekday_month_day_year, &self.month_day_year] {
            if let Some(caps) = re.captures(&text) {
                if let Some(date) = self.build_date(
                    caps[3].parse().ok(),
                    month_number(&caps[1]),
                    caps[2].parse().ok(),
                ) {
                    return date;
                }
            }
        }

        if let Some(caps) = self.month_day.captures(&text) {
            // No year on the page; take it from the reference date.
            if let Some(date) = self.build_date(
                Some(self.reference.year()),
                month_number(&caps[1]),
                caps[2].parse().ok(),
            ) {
                return date;
            }
        }

        if let Some(caps) = self.numeric.captures(&text) {
            if let Some(date) = self.build_date(
                caps[3].parse().ok(),
                caps[1].parse().ok(),
                caps[2].parse().ok(),
            ) {
                return date;
            }
        }

        if let Some(caps) = self.iso.captures(&text) {
            if let Some(date) = self.build_date(
                caps[1].parse().ok(),
                caps[2].parse().ok(),
                caps[3].parse().ok(),
            ) {
                return date;
            }
        }

        String::new()
    }

    /// Resolve a time or time range, or empty when nothing parses.
    ///
    /// Ranges accept hyphen, en/em dash, or "to"/"until" separators and
    /// render as `"<start> - <end>"`.
    pub fn resolve_time(&self, text: &str) -> String {
        let text = normalize_whitespace(text);

        if let Some(caps) = self.time_range.captures(&text) {
            let start = format_time(&caps[1], caps.get(2).map(|m| m.as_str()), &caps[3]);
            let end = format_time(&caps[4], caps.get(5).map(|m| m.as_str()), &caps[6]);
            if let (Some(start), Some(end)) = (start, end) {
                return format!("{start} - {end}");
            }
        }

        if let Some(caps) = self.time_single.captures(&text) {
            if let Some(time) = format_time(&caps[1], caps.get(2).map(|m| m.as_str()), &caps[3]) {
                return time;
            }
        }

        String::new()
    }

    /// Validate components into `YYYY-MM-DD`, or None for impossible
    /// dates ("2025-02-30" never escapes as a wrong date).
    fn build_date(&self, year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Option<String> {
        let (year, month, day) = (year?, month?, day?);
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(date.format("%Y-%m-%d").to_string())
    }
}

/// Month name or abbreviation to number. Accepts full names and
/// three-letter prefixes ("Sept" counts as "sep").
fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let full = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    if let Some(idx) = full.iter().position(|m| *m == lower) {
        return Some(idx as u32 + 1);
    }
    if lower.len() >= 3 {
        let prefix = &lower[..3];
        if let Some(idx) = full.iter().position(|m| m.starts_with(prefix)) {
            return Some(idx as u32 + 1);
        }
    }
    None
}

/// Normalize one time token to `H:MM am|pm`.
fn format_time(hour: &str, minutes: Option<&str>, meridiem: &str) -> Option<String> {
    let hour: u32 = hour.parse().ok()?;
    if hour == 0 || hour > 12 {
        return None;
    }
    let minutes = minutes.unwrap_or("00");
    Some(format!("{}:{} {}", hour, minutes, meridiem.to_lowercase()))
}
