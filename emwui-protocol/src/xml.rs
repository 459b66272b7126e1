//! Response-side codec: XML documents returned by the EMWUI API.
//!
//! Bodies are read with `quick_xml`'s pull parser into a small element tree,
//! and typed entities are then picked out of that tree by element name.
//! Numeric elements that are missing or empty read as zero.

use std::str::FromStr;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::DecodeError;
use crate::types::{
    AutoAddRule, AutoAddRuleResponse, ChannelInfo, ChannelRef, ContentInfo, Envelope,
    ProgramEvent, RecordingEntry, RecordingSettings, ReservationEntry, SearchSettings,
};

/// Root element of every EMWUI API response.
pub const ROOT_TAG: &str = "entry";

/// One element of a parsed response: its name, its own text and its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text directly inside this element, entities resolved.
    pub fn own_text(&self) -> &str {
        &self.text
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given name, in document order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of a child element, `""` when absent.
    pub fn text(&self, name: &str) -> String {
        self.child(name).map(|c| c.text.clone()).unwrap_or_default()
    }

    /// Text of a child element, `None` when absent or empty.
    pub fn non_empty_text(&self, name: &str) -> Option<String> {
        self.child(name)
            .map(|c| c.text.clone())
            .filter(|t| !t.is_empty())
    }

    /// Numeric value of a child element, zero when absent or empty.
    pub fn number<T>(&self, name: &str) -> Result<T, DecodeError>
    where
        T: FromStr + Default,
    {
        let Some(child) = self.child(name) else {
            return Ok(T::default());
        };
        let raw = child.text.trim();
        if raw.is_empty() {
            return Ok(T::default());
        }
        raw.parse().map_err(|_| DecodeError::InvalidNumber {
            element: name.to_string(),
            value: raw.to_string(),
        })
    }
}

/// An entity that appears as one element inside an envelope's `<items>`.
pub trait XmlItem: Sized {
    /// Element name of a single item, e.g. `serviceinfo`.
    const TAG: &'static str;

    fn from_element(el: &Element) -> Result<Self, DecodeError>;
}

/// Whether the first markup after any BOM, XML declaration and comments opens
/// an HTML document.
fn looks_like_html(body: &str) -> bool {
    let mut rest = body.trim_start_matches('\u{feff}').trim_start();
    loop {
        let skipped = if rest.starts_with("<!--") {
            rest.find("-->").map(|end| &rest[end + 3..])
        } else if rest.starts_with("<?") {
            rest.find("?>").map(|end| &rest[end + 2..])
        } else {
            break;
        };
        match skipped {
            Some(after) => rest = after.trim_start(),
            None => return false,
        }
    }

    let head = rest.get(..14).unwrap_or(rest).to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Resolve `&name;` references in raw text, leaving unknown ones untouched.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };
        match resolve_entity(&tail[1..end]) {
            Some(c) => out.push(c),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<(), DecodeError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(el);
        Ok(())
    } else if root.is_none() {
        *root = Some(el);
        Ok(())
    } else {
        Err(DecodeError::Malformed("multiple root elements".to_string()))
    }
}

/// Parse a body into an element tree without checking its shape.
pub fn parse_document(body: &str) -> Result<Element, DecodeError> {
    let mut reader = Reader::from_str(body);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(Element::named(e.name().as_ref())),
            Event::Empty(e) => attach(&mut stack, &mut root, Element::named(e.name().as_ref()))?,
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| DecodeError::Malformed("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&unescape(&String::from_utf8_lossy(&e)));
                }
            }
            Event::CData(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(top) = stack.last_mut() {
                    let name = String::from_utf8_lossy(&e);
                    match resolve_entity(&name) {
                        Some(c) => top.text.push(c),
                        None => {
                            top.text.push('&');
                            top.text.push_str(&name);
                            top.text.push(';');
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DecodeError::Malformed(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| DecodeError::Malformed("no root element".to_string()))
}

/// Parse a body and check that it is an `<entry>` document.
///
/// HTML pages (a wrong endpoint, or an EMWUI version that serves the web UI
/// at the API path) are reported as [`DecodeError::UnexpectedHtml`] rather
/// than as generic XML errors.
pub fn decode_entry(body: &str) -> Result<Element, DecodeError> {
    if looks_like_html(body) {
        return Err(DecodeError::UnexpectedHtml);
    }

    let root = parse_document(body)?;
    if root.name.eq_ignore_ascii_case("html") {
        return Err(DecodeError::UnexpectedHtml);
    }
    if root.name != ROOT_TAG {
        return Err(DecodeError::UnexpectedRoot {
            expected: ROOT_TAG,
            found: root.name,
        });
    }
    Ok(root)
}

/// Decode a list endpoint response.
///
/// # Example
///
/// ```rust
/// use emwui_protocol::{decode_envelope, ChannelInfo};
///
/// let body = "<entry><total>1</total><index>0</index><count>1</count><items>\
///     <serviceinfo><ONID>4</ONID><TSID>16625</TSID><SID>101</SID>\
///     <service_type>1</service_type><service_name>NHK BS</service_name></serviceinfo>\
///     </items></entry>";
/// let envelope = decode_envelope::<ChannelInfo>(body).unwrap();
/// assert_eq!(envelope.items[0].channel_id(), "4-16625-101");
/// ```
pub fn decode_envelope<T: XmlItem>(body: &str) -> Result<Envelope<T>, DecodeError> {
    let root = decode_entry(body)?;

    let items = match root.child("items") {
        Some(items) => items
            .children(T::TAG)
            .map(T::from_element)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(Envelope {
        total: root.number("total")?,
        index: root.number("index")?,
        count: root.number("count")?,
        items,
    })
}

/// Decode a `SetAutoAdd` result document.
pub fn decode_rule_response(body: &str) -> Result<AutoAddRuleResponse, DecodeError> {
    let root = decode_entry(body)?;
    Ok(AutoAddRuleResponse {
        success: root.non_empty_text("success"),
        error: root.non_empty_text("err"),
    })
}

// ============================================================================
// Entity Mapping
// ============================================================================

impl XmlItem for ChannelInfo {
    const TAG: &'static str = "serviceinfo";

    fn from_element(el: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            onid: el.number("ONID")?,
            tsid: el.number("TSID")?,
            sid: el.number("SID")?,
            service_type: el.number("service_type")?,
            partial_reception_flag: el.number("partialReceptionFlag")?,
            service_provider_name: el.text("service_provider_name"),
            service_name: el.text("service_name"),
            network_name: el.text("network_name"),
            ts_name: el.text("ts_name"),
            remote_control_key_id: el.number("remote_control_key_id")?,
        })
    }
}

impl XmlItem for ProgramEvent {
    const TAG: &'static str = "eventinfo";

    fn from_element(el: &Element) -> Result<Self, DecodeError> {
        let content_info = el
            .children("contentInfo")
            .map(|c| {
                Ok(ContentInfo {
                    nibble1: c.number("nibble1")?,
                    nibble2: c.number("nibble2")?,
                    component_type_name: c.text("component_type_name"),
                })
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;

        Ok(Self {
            onid: el.number("ONID")?,
            tsid: el.number("TSID")?,
            sid: el.number("SID")?,
            event_id: el.number("eventID")?,
            service_name: el.text("service_name"),
            start_date: el.text("startDate"),
            start_time: el.text("startTime"),
            start_day_of_week: el.number("startDayOfWeek")?,
            duration: el.number("duration")?,
            event_name: el.text("event_name"),
            event_text: el.text("event_text"),
            event_ext_text: el.text("event_ext_text"),
            free_ca_flag: el.number("freeCAFlag")?,
            content_info,
        })
    }
}

impl XmlItem for RecordingEntry {
    const TAG: &'static str = "recinfo";

    fn from_element(el: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            id: el.number("ID")?,
            title: el.text("title"),
            start_date: el.text("startDate"),
            start_time: el.text("startTime"),
            duration_second: el.number("durationSecond")?,
            station_name: el.text("stationName"),
            onid: el.number("ONID")?,
            tsid: el.number("TSID")?,
            sid: el.number("SID")?,
            event_id: el.number("eventID")?,
            comment: el.text("comment"),
            rec_file_path: el.text("recFilePath"),
            protect_flag: el.number("protectFlag")?,
        })
    }
}

impl XmlItem for ReservationEntry {
    const TAG: &'static str = "reserveinfo";

    fn from_element(el: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            id: el.number("ID")?,
            title: el.text("title"),
            start_date: el.text("startDate"),
            start_time: el.text("startTime"),
            duration_second: el.number("durationSecond")?,
            station_name: el.text("stationName"),
            onid: el.number("ONID")?,
            tsid: el.number("TSID")?,
            sid: el.number("SID")?,
            event_id: el.number("eventID")?,
            comment: el.text("comment"),
            rec_setting: decode_rec_setting(el.child("recsetting"))?,
        })
    }
}

impl XmlItem for AutoAddRule {
    const TAG: &'static str = "autoaddinfo";

    fn from_element(el: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            id: el.number("ID")?,
            search: decode_search_setting(el.child("searchsetting"))?,
            rec: decode_rec_setting(el.child("recsetting"))?,
        })
    }
}

fn decode_search_setting(el: Option<&Element>) -> Result<SearchSettings, DecodeError> {
    let Some(el) = el else {
        return Ok(SearchSettings::default());
    };

    let service_list = el
        .children("serviceList")
        .map(|s| {
            Ok(ChannelRef::new(
                s.number("onid")?,
                s.number("tsid")?,
                s.number("sid")?,
            ))
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(SearchSettings {
        disable_flag: el.number("disableFlag")?,
        case_flag: el.number("caseFlag")?,
        and_key: el.text("andKey"),
        not_key: el.text("notKey"),
        reg_exp_flag: el.number("regExpFlag")?,
        title_only_flag: el.number("titleOnlyFlag")?,
        aimai_flag: el.number("aimaiFlag")?,
        not_contet_flag: el.number("notContetFlag")?,
        not_date_flag: el.number("notDateFlag")?,
        free_ca_flag: el.number("freeCAFlag")?,
        chk_rec_end: el.number("chkRecEnd")?,
        chk_rec_day: el.number("chkRecDay")?,
        chk_rec_no_service: el.number("chkRecNoService")?,
        chk_duration_min: el.number("chkDurationMin")?,
        chk_duration_max: el.number("chkDurationMax")?,
        service_list,
    })
}

fn decode_rec_setting(el: Option<&Element>) -> Result<RecordingSettings, DecodeError> {
    let Some(el) = el else {
        return Ok(RecordingSettings::default());
    };

    Ok(RecordingSettings {
        rec_mode: el.number("recMode")?,
        priority: el.number("priority")?,
        tuijyuu_flag: el.number("tuijyuuFlag")?,
        service_mode: el.number("serviceMode")?,
        pittari_flag: el.number("pittariFlag")?,
        bat_file_path: el.text("batFilePath"),
        rec_folder_list: el.text("recFolderList"),
        suspend_mode: el.number("suspendMode")?,
        defservice_mode: el.number("defserviceMode")?,
        reboot_flag: el.number("rebootFlag")?,
        use_margine_flag: el.number("useMargineFlag")?,
        start_margine: el.number("startMargine")?,
        end_margine: el.number("endMargine")?,
        continue_rec_flag: el.number("continueRecFlag")?,
        partial_rec_flag: el.number("partialRecFlag")?,
        tuner_id: el.number("tunerID")?,
        partial_rec_folder: el.text("partialRecFolder"),
    })
}
