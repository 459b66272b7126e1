//! Renderers for list command output.
//!
//! Each entity knows its table layout, its CSV/TSV columns and its JSON row
//! shape; [`render`] picks one according to the requested format.

mod channels;
pub mod delimited;
mod epg;
mod recordings;
mod rules;

use serde::Serialize;

use crate::context::OutputFormat;

/// An entity that can be rendered as list output.
pub trait Render: Sized {
    /// Plural noun for summaries, e.g. `channels`.
    const NOUN: &'static str;

    /// CSV/TSV header row.
    const COLUMNS: &'static [&'static str];

    /// One CSV/TSV record, aligned with [`Render::COLUMNS`].
    fn record(&self) -> Vec<String>;

    /// Pretty-printed JSON array.
    fn json(items: &[Self]) -> serde_json::Result<String>;

    /// Fixed-width table.
    fn table(items: &[Self]) -> String;
}

/// Render `items` in the requested format.
pub fn render<T: Render>(items: &[T], format: OutputFormat) -> serde_json::Result<String> {
    let output = match format {
        OutputFormat::Table => T::table(items),
        OutputFormat::Json => T::json(items)?,
        OutputFormat::Csv => delimited::to_csv(T::COLUMNS, items.iter().map(T::record)),
        OutputFormat::Tsv => delimited::to_tsv(T::COLUMNS, items.iter().map(T::record)),
    };
    Ok(output)
}

fn to_json<R: Serialize>(rows: &[R]) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(rows)?;
    json.push('\n');
    Ok(json)
}

/// Truncate to `max` characters, ending with `...` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let mut out: String = s.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

/// `MM/DD` and `HH:MM` columns, falling back to the raw text when the
/// backend sent something unparsable.
fn short_date_time(
    start: Result<chrono::NaiveDateTime, chrono::ParseError>,
    date: &str,
    time: &str,
) -> (String, String) {
    match start {
        Ok(dt) => (dt.format("%m/%d").to_string(), dt.format("%H:%M").to_string()),
        Err(_) => (date.to_string(), time.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("this is too long", 10), "this is...");
        assert_eq!(truncate("ＮＨＫニュース７特集", 6), "ＮＨＫ...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_short_date_time() {
        let start = chrono::NaiveDateTime::parse_from_str(
            "2025/12/22 22:30:00",
            emwui_protocol::START_DATETIME_FORMAT,
        );
        assert_eq!(
            short_date_time(start, "2025/12/22", "22:30:00"),
            ("12/22".to_string(), "22:30".to_string())
        );

        let bad = chrono::NaiveDateTime::parse_from_str("", emwui_protocol::START_DATETIME_FORMAT);
        assert_eq!(
            short_date_time(bad, "", "xx"),
            (String::new(), "xx".to_string())
        );
    }
}
