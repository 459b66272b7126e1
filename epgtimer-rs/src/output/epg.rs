use emwui_protocol::ProgramEvent;
use serde::Serialize;

use super::{short_date_time, to_json, truncate, Render};

#[derive(Serialize)]
struct EventRow<'a> {
    channel_id: String,
    onid: u16,
    tsid: u16,
    sid: u16,
    event_id: u16,
    service_name: &'a str,
    start_date: &'a str,
    start_time: &'a str,
    duration_minutes: u32,
    event_name: &'a str,
    event_text: &'a str,
    genre: &'a str,
    free: bool,
}

impl<'a> From<&'a ProgramEvent> for EventRow<'a> {
    fn from(ev: &'a ProgramEvent) -> Self {
        Self {
            channel_id: ev.channel_id(),
            onid: ev.onid,
            tsid: ev.tsid,
            sid: ev.sid,
            event_id: ev.event_id,
            service_name: &ev.service_name,
            start_date: &ev.start_date,
            start_time: &ev.start_time,
            duration_minutes: ev.duration_minutes(),
            event_name: &ev.event_name,
            event_text: &ev.event_text,
            genre: ev.genre(),
            free: ev.is_free(),
        }
    }
}

impl Render for ProgramEvent {
    const NOUN: &'static str = "programs";

    const COLUMNS: &'static [&'static str] = &[
        "ChannelID",
        "ONID",
        "TSID",
        "SID",
        "EventID",
        "ServiceName",
        "StartDate",
        "StartTime",
        "DurationMinutes",
        "EventName",
        "EventText",
        "Genre",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.channel_id(),
            self.onid.to_string(),
            self.tsid.to_string(),
            self.sid.to_string(),
            self.event_id.to_string(),
            self.service_name.clone(),
            self.start_date.clone(),
            self.start_time.clone(),
            self.duration_minutes().to_string(),
            self.event_name.clone(),
            self.event_text.clone(),
            self.genre().to_string(),
        ]
    }

    fn json(items: &[Self]) -> serde_json::Result<String> {
        to_json(&items.iter().map(EventRow::from).collect::<Vec<_>>())
    }

    fn table(items: &[Self]) -> String {
        let mut out = format!(
            "{:<12} {:<6} {:<5} {:<50} {:<20}\n",
            "Date", "Time", "Mins", "Title", "Genre"
        );
        out.push_str(&"-".repeat(100));
        out.push('\n');

        for ev in items {
            let (date, time) = short_date_time(ev.start_datetime(), &ev.start_date, &ev.start_time);
            out.push_str(&format!(
                "{:<12} {:<6} {:<5} {:<50} {:<20}\n",
                date,
                time,
                ev.duration_minutes(),
                truncate(&ev.event_name, 50),
                truncate(ev.genre(), 20),
            ));
        }

        out.push_str(&format!("\nTotal: {} programs\n", items.len()));
        out
    }
}

#[cfg(test)]
mod tests {
    use emwui_protocol::ContentInfo;

    use super::*;
    use crate::context::OutputFormat;
    use crate::output::render;

    fn events() -> Vec<ProgramEvent> {
        vec![ProgramEvent {
            onid: 32736,
            tsid: 32736,
            sid: 1024,
            event_id: 12345,
            service_name: "ＮＨＫ総合１・東京".to_string(),
            start_date: "2025/12/22".to_string(),
            start_time: "22:30:00".to_string(),
            duration: 1845,
            event_name: "ニュース\t特集".to_string(),
            event_text: "line one\nline two".to_string(),
            content_info: vec![ContentInfo {
                component_type_name: "ニュース／報道".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }]
    }

    #[test]
    fn test_table() {
        let table = render(&events(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("Date         Time   Mins  Title"));
        assert!(lines[2].starts_with("12/22        22:30  30    ニュース"));
        assert!(lines[2].contains("ニュース／報道"));
        assert!(table.ends_with("\nTotal: 1 programs\n"));
    }

    #[test]
    fn test_tsv_flattens_text() {
        let tsv = render(&events(), OutputFormat::Tsv).unwrap();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "32736-32736-1024\t32736\t32736\t1024\t12345\tＮＨＫ総合１・東京\t2025/12/22\t22:30:00\t30\tニュース 特集\tline one line two\tニュース／報道"
        );
    }

    #[test]
    fn test_json() {
        let json = render(&events(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["duration_minutes"], 30);
        assert_eq!(value[0]["genre"], "ニュース／報道");
        assert_eq!(value[0]["free"], true);
    }
}
