//! Entity definitions for the EMWUI web API.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::band::BandType;
use crate::error::{ChannelRefError, ValidationError};

/// Layout of `startDate` + `startTime` joined by a space.
pub const START_DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

// ============================================================================
// Channel Identity
// ============================================================================

/// `(ONID, TSID, SID)` triple identifying a broadcast service.
///
/// The canonical string form is `ONID-TSID-SID`, e.g. `32736-32736-1024`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChannelRef {
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
}

impl ChannelRef {
    pub const fn new(onid: u16, tsid: u16, sid: u16) -> Self {
        Self { onid, tsid, sid }
    }

    /// Broadcast band of this service.
    pub fn band(&self) -> BandType {
        BandType::from_onid(self.onid)
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.onid, self.tsid, self.sid)
    }
}

impl FromStr for ChannelRef {
    type Err = ChannelRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            return Err(ChannelRefError::WrongPartCount(s.to_string()));
        }

        // Plain decimal only: `u16::from_str` would also take "+4" and "004".
        let parse = |part: &'static str, value: &str| {
            let canonical = !value.is_empty()
                && value.bytes().all(|b| b.is_ascii_digit())
                && !(value.len() > 1 && value.starts_with('0'));
            canonical
                .then(|| value.parse::<u16>().ok())
                .flatten()
                .ok_or_else(|| ChannelRefError::InvalidNumber {
                    part,
                    value: value.to_string(),
                    raw: s.to_string(),
                })
        };

        Ok(Self {
            onid: parse("ONID", parts[0])?,
            tsid: parse("TSID", parts[1])?,
            sid: parse("SID", parts[2])?,
        })
    }
}

/// Service type of a channel (ARIB service_type).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    /// Digital TV service (0x01)
    Tv,
    /// Digital audio service (0x02)
    Radio,
    /// Data service (0xC0)
    Data,
    /// Any other numeric value
    Other(u16),
}

impl ServiceType {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => ServiceType::Tv,
            2 => ServiceType::Radio,
            192 => ServiceType::Data,
            other => ServiceType::Other(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            ServiceType::Tv => 1,
            ServiceType::Radio => 2,
            ServiceType::Data => 192,
            ServiceType::Other(code) => *code,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::Tv => f.write_str("TV"),
            ServiceType::Radio => f.write_str("Radio"),
            ServiceType::Data => f.write_str("Data"),
            ServiceType::Other(code) => write!(f, "Type{}", code),
        }
    }
}

fn start_datetime(date: &str, time: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), START_DATETIME_FORMAT)
}

// ============================================================================
// List Envelope
// ============================================================================

/// `<entry><total/><index/><count/><items>...</items></entry>` wrapper shared
/// by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub total: u32,
    pub index: u32,
    pub count: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Channel / Program Guide Types
// ============================================================================

/// Service entry from `EnumService` (`<serviceinfo>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub service_type: u16,
    pub partial_reception_flag: u8,
    pub service_provider_name: String,
    pub service_name: String,
    pub network_name: String,
    pub ts_name: String,
    pub remote_control_key_id: u8,
}

impl ChannelInfo {
    pub fn channel(&self) -> ChannelRef {
        ChannelRef::new(self.onid, self.tsid, self.sid)
    }

    pub fn channel_id(&self) -> String {
        self.channel().to_string()
    }

    pub fn service_type(&self) -> ServiceType {
        ServiceType::from_code(self.service_type)
    }

    /// `TV`, `Radio`, `Data` or `Type{n}`.
    pub fn service_type_name(&self) -> String {
        self.service_type().to_string()
    }

    pub fn band(&self) -> BandType {
        BandType::from_onid(self.onid)
    }
}

/// Genre descriptor attached to a program event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInfo {
    pub nibble1: u8,
    pub nibble2: u8,
    pub component_type_name: String,
}

/// Program guide event from `EnumEventInfo` (`<eventinfo>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramEvent {
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub event_id: u16,
    pub service_name: String,
    /// `YYYY/MM/DD`
    pub start_date: String,
    /// `HH:MM:SS`
    pub start_time: String,
    pub start_day_of_week: u8,
    /// Duration in seconds.
    pub duration: u32,
    pub event_name: String,
    pub event_text: String,
    pub event_ext_text: String,
    pub free_ca_flag: u8,
    pub content_info: Vec<ContentInfo>,
}

impl ProgramEvent {
    pub fn channel(&self) -> ChannelRef {
        ChannelRef::new(self.onid, self.tsid, self.sid)
    }

    pub fn channel_id(&self) -> String {
        self.channel().to_string()
    }

    /// Duration in whole minutes, seconds truncated.
    pub fn duration_minutes(&self) -> u32 {
        self.duration / 60
    }

    /// Free-to-air (no conditional access).
    pub fn is_free(&self) -> bool {
        self.free_ca_flag == 0
    }

    /// First non-empty genre name, or `""`.
    pub fn genre(&self) -> &str {
        self.content_info
            .iter()
            .map(|c| c.component_type_name.as_str())
            .find(|name| !name.is_empty())
            .unwrap_or("")
    }

    pub fn start_datetime(&self) -> Result<NaiveDateTime, chrono::ParseError> {
        start_datetime(&self.start_date, &self.start_time)
    }

    pub fn end_datetime(&self) -> Result<NaiveDateTime, chrono::ParseError> {
        Ok(self.start_datetime()? + Duration::seconds(i64::from(self.duration)))
    }
}

// ============================================================================
// Recording / Reservation Types
// ============================================================================

/// Finished recording from `EnumRecInfo` (`<recinfo>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingEntry {
    pub id: u32,
    pub title: String,
    pub start_date: String,
    pub start_time: String,
    pub duration_second: u32,
    pub station_name: String,
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub event_id: u16,
    pub comment: String,
    pub rec_file_path: String,
    pub protect_flag: u8,
}

impl RecordingEntry {
    pub fn channel(&self) -> ChannelRef {
        ChannelRef::new(self.onid, self.tsid, self.sid)
    }

    pub fn channel_id(&self) -> String {
        self.channel().to_string()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_second / 60
    }

    pub fn is_protected(&self) -> bool {
        self.protect_flag == 1
    }

    pub fn start_datetime(&self) -> Result<NaiveDateTime, chrono::ParseError> {
        start_datetime(&self.start_date, &self.start_time)
    }
}

/// Scheduled recording from `EnumReserveInfo` (`<reserveinfo>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationEntry {
    pub id: u32,
    pub title: String,
    pub start_date: String,
    pub start_time: String,
    pub duration_second: u32,
    pub station_name: String,
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub event_id: u16,
    pub comment: String,
    pub rec_setting: RecordingSettings,
}

impl ReservationEntry {
    pub fn channel(&self) -> ChannelRef {
        ChannelRef::new(self.onid, self.tsid, self.sid)
    }

    pub fn channel_id(&self) -> String {
        self.channel().to_string()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_second / 60
    }

    pub fn start_datetime(&self) -> Result<NaiveDateTime, chrono::ParseError> {
        start_datetime(&self.start_date, &self.start_time)
    }
}

// ============================================================================
// Automatic Recording Rule Types
// ============================================================================

/// Keyword search half of a rule (`<searchsetting>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub disable_flag: u8,
    pub case_flag: u8,
    pub and_key: String,
    pub not_key: String,
    pub reg_exp_flag: u8,
    pub title_only_flag: u8,
    pub aimai_flag: u8,
    pub not_contet_flag: u8,
    pub not_date_flag: u8,
    pub free_ca_flag: u8,
    pub chk_rec_end: u8,
    pub chk_rec_day: u16,
    pub chk_rec_no_service: u8,
    pub chk_duration_min: u16,
    pub chk_duration_max: u16,
    pub service_list: Vec<ChannelRef>,
}

impl SearchSettings {
    pub fn is_enabled(&self) -> bool {
        self.disable_flag == 0
    }

    pub fn is_regex(&self) -> bool {
        self.reg_exp_flag == 1
    }

    pub fn has_duration_filter(&self) -> bool {
        self.chk_duration_min > 0 || self.chk_duration_max > 0
    }

    pub fn channel_count(&self) -> usize {
        self.service_list.len()
    }

    pub fn covers(&self, channel: &ChannelRef) -> bool {
        self.service_list.contains(channel)
    }
}

/// Recording half of a rule or reservation (`<recsetting>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingSettings {
    pub rec_mode: i32,
    pub priority: i32,
    pub tuijyuu_flag: u8,
    pub service_mode: i32,
    pub pittari_flag: u8,
    pub bat_file_path: String,
    pub rec_folder_list: String,
    pub suspend_mode: i32,
    pub defservice_mode: i32,
    pub reboot_flag: u8,
    pub use_margine_flag: u8,
    pub start_margine: i32,
    pub end_margine: i32,
    pub continue_rec_flag: u8,
    pub partial_rec_flag: u8,
    pub tuner_id: u32,
    pub partial_rec_folder: String,
}

impl RecordingSettings {
    /// Follows schedule changes of the event.
    pub fn is_auto_follow(&self) -> bool {
        self.tuijyuu_flag == 1
    }

    pub fn has_margins(&self) -> bool {
        self.use_margine_flag == 1
    }

    pub fn uses_custom_tuner(&self) -> bool {
        self.tuner_id != 0
    }
}

/// Keyword-based automatic recording rule (`<autoaddinfo>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoAddRule {
    pub id: u32,
    pub search: SearchSettings,
    pub rec: RecordingSettings,
}

impl AutoAddRule {
    pub fn is_enabled(&self) -> bool {
        self.search.is_enabled()
    }

    pub fn is_regex(&self) -> bool {
        self.search.is_regex()
    }

    pub fn channel_ids(&self) -> Vec<String> {
        self.search
            .service_list
            .iter()
            .map(ChannelRef::to_string)
            .collect()
    }
}

/// Parameters of a `SetAutoAdd?id=0` submission.
///
/// Only the keywords and the channel list come from the user. The remaining
/// fields mirror what the EMWUI add-rule form submits and are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoAddRuleRequest {
    pub and_key: String,
    pub not_key: String,
    /// Channels in `ONID-TSID-SID` form, as given by the user.
    pub service_list: Vec<String>,

    pub(crate) add_chg: u8,
    pub(crate) title_only_flag: u8,
    pub(crate) day_list: &'static str,
    pub(crate) start_time: &'static str,
    pub(crate) end_time: &'static str,
    pub(crate) date_list: &'static str,
    pub(crate) free_ca_flag: u8,
    pub(crate) chk_duration_min: u16,
    pub(crate) chk_duration_max: u16,
    pub(crate) chk_rec_day: u16,
    pub(crate) preset_id: u16,
    pub(crate) rec_mode: u8,
    pub(crate) tuijyuu_flag: u8,
    pub(crate) priority: u8,
    pub(crate) use_def_margin_flag: u8,
    pub(crate) service_mode: u8,
    pub(crate) tuner_id: u32,
    pub(crate) suspend_mode: u8,
    pub(crate) bat_file_path: &'static str,
    pub(crate) bat_file_tag: &'static str,

    /// CSRF token, filled in right before submission.
    pub(crate) ctok: Option<String>,
}

impl AutoAddRuleRequest {
    pub fn new(
        and_key: impl Into<String>,
        not_key: impl Into<String>,
        service_list: Vec<String>,
    ) -> Self {
        Self {
            and_key: and_key.into(),
            not_key: not_key.into(),
            service_list,
            add_chg: 1,
            title_only_flag: 1,
            day_list: "on",
            start_time: "00:00",
            end_time: "01:00",
            date_list: "",
            free_ca_flag: 0,
            chk_duration_min: 0,
            chk_duration_max: 0,
            chk_rec_day: 6,
            preset_id: 0,
            rec_mode: 1,
            tuijyuu_flag: 1,
            priority: 2,
            use_def_margin_flag: 1,
            service_mode: 1,
            tuner_id: 0,
            suspend_mode: 0,
            bat_file_path: "",
            bat_file_tag: "",
            ctok: None,
        }
    }

    /// Attach the CSRF token scraped from the EMWUI page.
    pub fn with_token(mut self, ctok: impl Into<String>) -> Self {
        self.ctok = Some(ctok.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.ctok.as_deref()
    }

    /// Check the user-supplied fields and parse the channel list.
    pub fn validate(&self) -> Result<Vec<ChannelRef>, ValidationError> {
        if self.and_key.trim().is_empty() {
            return Err(ValidationError::MissingSearchKeyword);
        }
        if self.service_list.is_empty() {
            return Err(ValidationError::MissingChannels);
        }

        self.service_list
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                raw.parse::<ChannelRef>()
                    .map_err(|_| ValidationError::InvalidChannelFormat {
                        index,
                        raw: raw.clone(),
                    })
            })
            .collect()
    }
}

/// Result document of `SetAutoAdd`: `<entry><success/></entry>` or
/// `<entry><err/></entry>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoAddRuleResponse {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl AutoAddRuleResponse {
    /// Success needs a success message and no error message.
    pub fn is_success(&self) -> bool {
        self.success.is_some() && self.error.is_none()
    }

    pub fn message(&self) -> &str {
        self.success.as_deref().unwrap_or("")
    }

    /// Backend error text, or `"unknown error"` when it sent none.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_ref_parse_and_format() {
        let ch: ChannelRef = "32736-32736-1024".parse().unwrap();
        assert_eq!(ch, ChannelRef::new(32736, 32736, 1024));
        assert_eq!(ch.to_string(), "32736-32736-1024");
        assert_eq!(ch.band(), BandType::Terrestrial);
    }

    #[test]
    fn test_channel_ref_errors() {
        assert!(matches!(
            "32736-32736".parse::<ChannelRef>(),
            Err(ChannelRefError::WrongPartCount(_))
        ));
        assert!(matches!(
            "".parse::<ChannelRef>(),
            Err(ChannelRefError::WrongPartCount(_))
        ));
        assert!(matches!(
            "4-x-101".parse::<ChannelRef>(),
            Err(ChannelRefError::InvalidNumber { part: "TSID", .. })
        ));
        assert!(matches!(
            "4--101".parse::<ChannelRef>(),
            Err(ChannelRefError::InvalidNumber { part: "TSID", .. })
        ));
    }

    #[test]
    fn test_channel_ref_rejects_non_canonical_numbers() {
        assert!(matches!(
            "+4-16625-101".parse::<ChannelRef>(),
            Err(ChannelRefError::InvalidNumber { part: "ONID", .. })
        ));
        assert!(matches!(
            "4-016625-101".parse::<ChannelRef>(),
            Err(ChannelRefError::InvalidNumber { part: "TSID", .. })
        ));
        assert!(matches!(
            "4-16625- 101".parse::<ChannelRef>(),
            Err(ChannelRefError::InvalidNumber { part: "SID", .. })
        ));
        assert!(matches!(
            "4-16625-١٠١".parse::<ChannelRef>(),
            Err(ChannelRefError::InvalidNumber { part: "SID", .. })
        ));
        assert_eq!(
            "0-0-0".parse::<ChannelRef>().unwrap(),
            ChannelRef::new(0, 0, 0)
        );
    }

    #[test]
    fn test_service_type_names() {
        assert_eq!(ServiceType::from_code(1).to_string(), "TV");
        assert_eq!(ServiceType::from_code(2).to_string(), "Radio");
        assert_eq!(ServiceType::from_code(192).to_string(), "Data");
        assert_eq!(ServiceType::from_code(165).to_string(), "Type165");
        assert_eq!(ServiceType::from_code(165).code(), 165);
    }

    #[test]
    fn test_duration_minutes_truncates() {
        let mut event = ProgramEvent {
            duration: 1800,
            ..Default::default()
        };
        assert_eq!(event.duration_minutes(), 30);
        event.duration = 1845;
        assert_eq!(event.duration_minutes(), 30);

        let rec = RecordingEntry {
            duration_second: 59,
            ..Default::default()
        };
        assert_eq!(rec.duration_minutes(), 0);
    }

    #[test]
    fn test_event_times_and_genre() {
        let event = ProgramEvent {
            start_date: "2025/12/23".to_string(),
            start_time: "23:45:00".to_string(),
            duration: 1800,
            content_info: vec![
                ContentInfo::default(),
                ContentInfo {
                    nibble1: 0,
                    nibble2: 0,
                    component_type_name: "ニュース／報道".to_string(),
                },
            ],
            ..Default::default()
        };

        let end = event.end_datetime().unwrap();
        assert_eq!(end.format("%Y/%m/%d %H:%M").to_string(), "2025/12/24 00:15");
        assert_eq!(event.genre(), "ニュース／報道");
        assert!(event.is_free());
    }

    #[test]
    fn test_bad_start_date() {
        let event = ProgramEvent {
            start_date: "2025-12-23".to_string(),
            start_time: "06:00:00".to_string(),
            ..Default::default()
        };
        assert!(event.start_datetime().is_err());
        assert!(event.end_datetime().is_err());
    }

    #[test]
    fn test_request_validation() {
        let ok = AutoAddRuleRequest::new("ニュース", "", vec!["32736-32736-1024".to_string()]);
        assert_eq!(ok.validate(), Ok(vec![ChannelRef::new(32736, 32736, 1024)]));

        let blank = AutoAddRuleRequest::new("  ", "", vec!["32736-32736-1024".to_string()]);
        assert_eq!(blank.validate(), Err(ValidationError::MissingSearchKeyword));

        let empty = AutoAddRuleRequest::new("ニュース", "", vec![]);
        assert_eq!(empty.validate(), Err(ValidationError::MissingChannels));

        let bad = AutoAddRuleRequest::new(
            "ニュース",
            "",
            vec!["4-16625-101".to_string(), "4-16625".to_string()],
        );
        assert_eq!(
            bad.validate(),
            Err(ValidationError::InvalidChannelFormat {
                index: 1,
                raw: "4-16625".to_string()
            })
        );
    }

    #[test]
    fn test_token_is_attached_late() {
        let req = AutoAddRuleRequest::new("a", "", vec!["1-2-3".to_string()]);
        assert_eq!(req.token(), None);
        let req = req.with_token("abc");
        assert_eq!(req.token(), Some("abc"));
    }

    #[test]
    fn test_response_outcome() {
        let ok = AutoAddRuleResponse {
            success: Some("OK".to_string()),
            error: None,
        };
        assert!(ok.is_success());
        assert_eq!(ok.message(), "OK");

        let both = AutoAddRuleResponse {
            success: Some("OK".to_string()),
            error: Some("bad".to_string()),
        };
        assert!(!both.is_success());
        assert_eq!(both.error_message(), "bad");

        let neither = AutoAddRuleResponse::default();
        assert!(!neither.is_success());
        assert_eq!(neither.error_message(), "unknown error");
    }

    #[test]
    fn test_settings_helpers() {
        let search = SearchSettings {
            chk_duration_max: 60,
            service_list: vec![ChannelRef::new(4, 16625, 101)],
            ..Default::default()
        };
        assert!(search.is_enabled());
        assert!(search.has_duration_filter());
        assert!(search.covers(&ChannelRef::new(4, 16625, 101)));
        assert!(!search.covers(&ChannelRef::new(4, 16625, 103)));

        let rec = RecordingSettings {
            tuijyuu_flag: 1,
            tuner_id: 2,
            ..Default::default()
        };
        assert!(rec.is_auto_follow());
        assert!(!rec.has_margins());
        assert!(rec.uses_custom_tuner());
    }
}
