use emwui_protocol::{BandType, ChannelInfo};
use serde::Serialize;

use super::{to_json, truncate, Render};

#[derive(Serialize)]
struct ChannelRow<'a> {
    channel_id: String,
    onid: u16,
    tsid: u16,
    sid: u16,
    service_type: u16,
    service_type_name: String,
    service_name: &'a str,
    service_provider_name: &'a str,
    network_name: &'a str,
    ts_name: &'a str,
    remote_control_key_id: u8,
    band: BandType,
}

impl<'a> From<&'a ChannelInfo> for ChannelRow<'a> {
    fn from(ch: &'a ChannelInfo) -> Self {
        Self {
            channel_id: ch.channel_id(),
            onid: ch.onid,
            tsid: ch.tsid,
            sid: ch.sid,
            service_type: ch.service_type,
            service_type_name: ch.service_type_name(),
            service_name: &ch.service_name,
            service_provider_name: &ch.service_provider_name,
            network_name: &ch.network_name,
            ts_name: &ch.ts_name,
            remote_control_key_id: ch.remote_control_key_id,
            band: ch.band(),
        }
    }
}

impl Render for ChannelInfo {
    const NOUN: &'static str = "channels";

    const COLUMNS: &'static [&'static str] = &[
        "ChannelID",
        "ONID",
        "TSID",
        "SID",
        "ServiceType",
        "ServiceTypeName",
        "ServiceName",
        "ServiceProviderName",
        "NetworkName",
        "TSName",
        "RemoteControlKeyID",
        "Band",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.channel_id(),
            self.onid.to_string(),
            self.tsid.to_string(),
            self.sid.to_string(),
            self.service_type.to_string(),
            self.service_type_name(),
            self.service_name.clone(),
            self.service_provider_name.clone(),
            self.network_name.clone(),
            self.ts_name.clone(),
            self.remote_control_key_id.to_string(),
            self.band().to_string(),
        ]
    }

    fn json(items: &[Self]) -> serde_json::Result<String> {
        to_json(&items.iter().map(ChannelRow::from).collect::<Vec<_>>())
    }

    fn table(items: &[Self]) -> String {
        let mut out = format!(
            "{:<20} {:<12} {:<6} {:<40} {:<20}\n",
            "Channel ID", "Type", "Key", "Channel Name", "Network"
        );
        out.push_str(&"-".repeat(100));
        out.push('\n');

        for ch in items {
            let key = match ch.remote_control_key_id {
                0 => "-".to_string(),
                id => id.to_string(),
            };
            out.push_str(&format!(
                "{:<20} {:<12} {:<6} {:<40} {:<20}\n",
                ch.channel_id(),
                ch.service_type_name(),
                key,
                truncate(&ch.service_name, 40),
                truncate(&ch.network_name, 20),
            ));
        }

        out.push_str(&format!("\nTotal: {} channels\n", items.len()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OutputFormat;
    use crate::output::render;

    fn channels() -> Vec<ChannelInfo> {
        vec![
            ChannelInfo {
                onid: 32736,
                tsid: 32736,
                sid: 1024,
                service_type: 1,
                service_name: "ＮＨＫ総合１・東京".to_string(),
                network_name: "関東広域".to_string(),
                remote_control_key_id: 1,
                ..Default::default()
            },
            ChannelInfo {
                onid: 4,
                tsid: 16625,
                sid: 200,
                service_type: 165,
                service_name: "Data, Service".to_string(),
                network_name: "BS Digital".to_string(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_table() {
        let table = render(&channels(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("Channel ID           Type         Key"));
        assert_eq!(lines[1], "-".repeat(100));
        assert!(lines[2].starts_with("32736-32736-1024     TV           1      ＮＨＫ総合１・東京"));
        assert!(lines[3].starts_with("4-16625-200          Type165      -      Data, Service"));
        assert!(table.ends_with("\nTotal: 2 channels\n"));
    }

    #[test]
    fn test_csv_has_band() {
        let csv = render(&channels(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].ends_with(",RemoteControlKeyID,Band"));
        assert_eq!(
            lines[1],
            "32736-32736-1024,32736,32736,1024,1,TV,ＮＨＫ総合１・東京,,関東広域,,1,Terrestrial"
        );
        assert!(lines[2].contains(",\"Data, Service\","));
        assert!(lines[2].ends_with(",0,BS"));
    }

    #[test]
    fn test_json() {
        let json = render(&channels(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["channel_id"], "32736-32736-1024");
        assert_eq!(value[0]["service_type_name"], "TV");
        assert_eq!(value[0]["band"], "terrestrial");
        assert_eq!(value[1]["band"], "bs");
    }
}
