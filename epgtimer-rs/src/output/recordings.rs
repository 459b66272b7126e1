//! Recordings and reservations share a table layout.

use emwui_protocol::{RecordingEntry, ReservationEntry};
use serde::Serialize;

use super::{short_date_time, to_json, truncate, Render};

#[derive(Serialize)]
struct RecordingRow<'a> {
    id: u32,
    title: &'a str,
    start_date: &'a str,
    start_time: &'a str,
    duration_minutes: u32,
    station_name: &'a str,
    channel_id: String,
    onid: u16,
    tsid: u16,
    sid: u16,
    event_id: u16,
    comment: &'a str,
    rec_file_path: &'a str,
    protected: bool,
}

#[derive(Serialize)]
struct ReservationRow<'a> {
    id: u32,
    title: &'a str,
    start_date: &'a str,
    start_time: &'a str,
    duration_minutes: u32,
    station_name: &'a str,
    channel_id: String,
    onid: u16,
    tsid: u16,
    sid: u16,
    event_id: u16,
    comment: &'a str,
    rec_mode: i32,
    priority: i32,
}

/// One table line: `ID`, `Date`, `Time`, `Title`, `Station`.
struct ScheduleLine<'a> {
    id: u32,
    date: String,
    time: String,
    title: &'a str,
    station: &'a str,
}

fn schedule_table(lines: Vec<ScheduleLine<'_>>, noun: &str) -> String {
    let mut out = format!(
        "{:<6} {:<12} {:<6} {:<50} {:<20}\n",
        "ID", "Date", "Time", "Title", "Station"
    );
    out.push_str(&"-".repeat(100));
    out.push('\n');

    for line in &lines {
        out.push_str(&format!(
            "{:<6} {:<12} {:<6} {:<50} {:<20}\n",
            line.id,
            line.date,
            line.time,
            truncate(line.title, 50),
            truncate(line.station, 20),
        ));
    }

    out.push_str(&format!("\nTotal: {} {}\n", lines.len(), noun));
    out
}

impl Render for RecordingEntry {
    const NOUN: &'static str = "recordings";

    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Title",
        "StartDate",
        "StartTime",
        "DurationMinutes",
        "StationName",
        "ChannelID",
        "ONID",
        "TSID",
        "SID",
        "EventID",
        "Comment",
        "RecFilePath",
        "Protected",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.start_date.clone(),
            self.start_time.clone(),
            self.duration_minutes().to_string(),
            self.station_name.clone(),
            self.channel_id(),
            self.onid.to_string(),
            self.tsid.to_string(),
            self.sid.to_string(),
            self.event_id.to_string(),
            self.comment.clone(),
            self.rec_file_path.clone(),
            self.is_protected().to_string(),
        ]
    }

    fn json(items: &[Self]) -> serde_json::Result<String> {
        let rows: Vec<_> = items
            .iter()
            .map(|rec| RecordingRow {
                id: rec.id,
                title: &rec.title,
                start_date: &rec.start_date,
                start_time: &rec.start_time,
                duration_minutes: rec.duration_minutes(),
                station_name: &rec.station_name,
                channel_id: rec.channel_id(),
                onid: rec.onid,
                tsid: rec.tsid,
                sid: rec.sid,
                event_id: rec.event_id,
                comment: &rec.comment,
                rec_file_path: &rec.rec_file_path,
                protected: rec.is_protected(),
            })
            .collect();
        to_json(&rows)
    }

    fn table(items: &[Self]) -> String {
        let lines = items
            .iter()
            .map(|rec| {
                let (date, time) =
                    short_date_time(rec.start_datetime(), &rec.start_date, &rec.start_time);
                ScheduleLine {
                    id: rec.id,
                    date,
                    time,
                    title: &rec.title,
                    station: &rec.station_name,
                }
            })
            .collect();
        schedule_table(lines, Self::NOUN)
    }
}

impl Render for ReservationEntry {
    const NOUN: &'static str = "reservations";

    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Title",
        "StartDate",
        "StartTime",
        "DurationMinutes",
        "StationName",
        "ChannelID",
        "ONID",
        "TSID",
        "SID",
        "EventID",
        "Comment",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.start_date.clone(),
            self.start_time.clone(),
            self.duration_minutes().to_string(),
            self.station_name.clone(),
            self.channel_id(),
            self.onid.to_string(),
            self.tsid.to_string(),
            self.sid.to_string(),
            self.event_id.to_string(),
            self.comment.clone(),
        ]
    }

    fn json(items: &[Self]) -> serde_json::Result<String> {
        let rows: Vec<_> = items
            .iter()
            .map(|res| ReservationRow {
                id: res.id,
                title: &res.title,
                start_date: &res.start_date,
                start_time: &res.start_time,
                duration_minutes: res.duration_minutes(),
                station_name: &res.station_name,
                channel_id: res.channel_id(),
                onid: res.onid,
                tsid: res.tsid,
                sid: res.sid,
                event_id: res.event_id,
                comment: &res.comment,
                rec_mode: res.rec_setting.rec_mode,
                priority: res.rec_setting.priority,
            })
            .collect();
        to_json(&rows)
    }

    fn table(items: &[Self]) -> String {
        let lines = items
            .iter()
            .map(|res| {
                let (date, time) =
                    short_date_time(res.start_datetime(), &res.start_date, &res.start_time);
                ScheduleLine {
                    id: res.id,
                    date,
                    time,
                    title: &res.title,
                    station: &res.station_name,
                }
            })
            .collect();
        schedule_table(lines, Self::NOUN)
    }
}

#[cfg(test)]
mod tests {
    use emwui_protocol::RecordingSettings;

    use super::*;
    use crate::context::OutputFormat;
    use crate::output::render;

    fn recording() -> RecordingEntry {
        RecordingEntry {
            id: 42,
            title: "サイエンスZERO「量子コンピューター最前線」再放送スペシャル拡大版・前編".to_string(),
            start_date: "2025/12/20".to_string(),
            start_time: "23:30:00".to_string(),
            duration_second: 1800,
            station_name: "ＮＨＫＥテレ１東京".to_string(),
            onid: 32736,
            tsid: 32736,
            sid: 1032,
            rec_file_path: "C:\\rec\\science.ts".to_string(),
            protect_flag: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_recordings_table() {
        let table = render(&[recording()], OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("ID     Date         Time   Title"));
        assert!(lines[2].starts_with("42     12/20        23:30  サイエンスZERO"));
        assert!(lines[2].contains("前編"));
        assert!(table.ends_with("\nTotal: 1 recordings\n"));
    }

    #[test]
    fn test_recordings_csv() {
        let csv = render(&[recording()], OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].ends_with(",RecFilePath,Protected"));
        assert!(lines[1].ends_with(",C:\\rec\\science.ts,true"));
        assert!(lines[1].contains(",30,ＮＨＫＥテレ１東京,32736-32736-1032,"));
    }

    #[test]
    fn test_reservations_json() {
        let res = ReservationEntry {
            id: 7,
            title: "ドラマ".to_string(),
            start_date: "2025/12/25".to_string(),
            start_time: "21:00:00".to_string(),
            duration_second: 3300,
            rec_setting: RecordingSettings {
                rec_mode: 1,
                priority: 3,
                ..Default::default()
            },
            ..Default::default()
        };
        let json = render(&[res.clone()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], 7);
        assert_eq!(value[0]["duration_minutes"], 55);
        assert_eq!(value[0]["priority"], 3);

        let table = render(&[res], OutputFormat::Table).unwrap();
        assert!(table.ends_with("\nTotal: 1 reservations\n"));
    }
}
