//! Request-side codecs: CSRF token scraping and form encoding.

use std::sync::OnceLock;

use regex::Regex;
use url::form_urlencoded;

use crate::error::{TokenError, ValidationError};
use crate::types::AutoAddRuleRequest;

/// Content type of every POST to `SetAutoAdd`.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn ctok_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Attributes may appear in any order around name="ctok".
        Regex::new(r#"<input\b[^>]*\bname\s*=\s*["']ctok["'][^>]*>"#)
            .expect("ctok input regex")
    })
}

fn value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\bvalue\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("value attribute regex")
    })
}

/// Extract the `ctok` hidden input value from an EMWUI HTML page.
///
/// # Example
///
/// ```rust
/// use emwui_protocol::extract_ctok;
///
/// let html = br#"<form><input type="hidden" name="ctok" value="abc123"></form>"#;
/// assert_eq!(extract_ctok(html).unwrap(), "abc123");
/// ```
pub fn extract_ctok(html: &[u8]) -> Result<String, TokenError> {
    let html = String::from_utf8_lossy(html);

    let input = ctok_pattern()
        .find(&html)
        .ok_or(TokenError::TokenNotFound)?;

    let value = value_pattern()
        .captures(input.as_str())
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .ok_or(TokenError::TokenNotFound)?
        .as_str();

    if value.is_empty() {
        return Err(TokenError::EmptyToken);
    }
    Ok(value.to_string())
}

/// Encode a create-rule request in the field order the EMWUI form submits.
///
/// The request is validated first. Field order and repetition are part of
/// the contract: one blank `serviceList` precedes the real channels and
/// `presetID` is sent twice.
pub fn encode_create_rule(req: &AutoAddRuleRequest) -> Result<String, ValidationError> {
    let channels = req.validate()?;

    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("addchg", &req.add_chg.to_string())
        .append_pair("andKey", &req.and_key)
        .append_pair("notKey", &req.not_key)
        .append_pair("titleOnlyFlag", &req.title_only_flag.to_string())
        .append_pair("serviceList", "");
    for channel in &channels {
        form.append_pair("serviceList", &channel.to_string());
    }

    let preset_id = req.preset_id.to_string();
    form.append_pair("dayList", req.day_list)
        .append_pair("startTime", req.start_time)
        .append_pair("endTime", req.end_time)
        .append_pair("dateList", req.date_list)
        .append_pair("freeCAFlag", &req.free_ca_flag.to_string())
        .append_pair("chkDurationMin", &req.chk_duration_min.to_string())
        .append_pair("chkDurationMax", &req.chk_duration_max.to_string())
        .append_pair("chkRecDay", &req.chk_rec_day.to_string())
        .append_pair("presetID", &preset_id)
        .append_pair("presetID", &preset_id)
        .append_pair("ctok", req.ctok.as_deref().unwrap_or(""))
        .append_pair("recMode", &req.rec_mode.to_string())
        .append_pair("tuijyuuFlag", &req.tuijyuu_flag.to_string())
        .append_pair("priority", &req.priority.to_string())
        .append_pair("useDefMarginFlag", &req.use_def_margin_flag.to_string())
        .append_pair("serviceMode", &req.service_mode.to_string())
        .append_pair("tunerID", &req.tuner_id.to_string())
        .append_pair("suspendMode", &req.suspend_mode.to_string())
        .append_pair("batFilePath", req.bat_file_path)
        .append_pair("batFileTag", req.bat_file_tag);

    Ok(form.finish())
}

/// Encode a delete-rule request (`del=1&ctok=...`).
pub fn encode_delete_rule(ctok: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("del", "1")
        .append_pair("ctok", ctok)
        .finish()
}

/// Check a rule id before it is sent anywhere.
pub fn validate_rule_id(id: i64) -> Result<u32, ValidationError> {
    u32::try_from(id)
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ValidationError::InvalidRuleId(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(body: &str) -> Vec<(String, String)> {
        form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_extract_ctok() {
        let html = br#"<html><body><form>
            <input type="hidden" name="ctok" value="test-csrf-token-12345" />
            </form></body></html>"#;
        assert_eq!(extract_ctok(html).unwrap(), "test-csrf-token-12345");
    }

    #[test]
    fn test_extract_ctok_attribute_order() {
        let html = br#"<input value="v-first" name="ctok" type="hidden">"#;
        assert_eq!(extract_ctok(html).unwrap(), "v-first");

        let html = br#"<input id="x" name="other" value="no"><input name='ctok' value='single'>"#;
        assert_eq!(extract_ctok(html).unwrap(), "single");
    }

    #[test]
    fn test_extract_ctok_missing() {
        let html = b"<html><body>EMWUI Web Interface</body></html>";
        assert_eq!(extract_ctok(html), Err(TokenError::TokenNotFound));

        let html = br#"<input type="hidden" name="ctok">"#;
        assert_eq!(extract_ctok(html), Err(TokenError::TokenNotFound));
    }

    #[test]
    fn test_extract_ctok_empty() {
        let html = br#"<input type="hidden" name="ctok" value="">"#;
        assert_eq!(extract_ctok(html), Err(TokenError::EmptyToken));
    }

    #[test]
    fn test_encode_create_rule_field_order() {
        let req = AutoAddRuleRequest::new(
            "ニュース",
            "再放送",
            vec!["32736-32736-1024".to_string(), "4-16625-101".to_string()],
        )
        .with_token("tok");
        let body = encode_create_rule(&req).unwrap();
        let fields = pairs(&body);
        let names: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "addchg", "andKey", "notKey", "titleOnlyFlag", "serviceList", "serviceList",
                "serviceList", "dayList", "startTime", "endTime", "dateList", "freeCAFlag",
                "chkDurationMin", "chkDurationMax", "chkRecDay", "presetID", "presetID", "ctok",
                "recMode", "tuijyuuFlag", "priority", "useDefMarginFlag", "serviceMode",
                "tunerID", "suspendMode", "batFilePath", "batFileTag",
            ]
        );
        assert_eq!(fields[1].1, "ニュース");
        assert_eq!(fields[2].1, "再放送");
        assert_eq!(fields[4].1, "");
        assert_eq!(fields[5].1, "32736-32736-1024");
        assert_eq!(fields[6].1, "4-16625-101");
        assert_eq!(fields[17].1, "tok");
    }

    #[test]
    fn test_encode_create_rule_defaults() {
        let req = AutoAddRuleRequest::new("a b", "", vec!["1-2-3".to_string()]).with_token("t");
        let body = encode_create_rule(&req).unwrap();

        assert!(body.starts_with("addchg=1&andKey=a+b&notKey=&titleOnlyFlag=1&serviceList=&serviceList=1-2-3&"));
        assert!(body.contains("&dayList=on&startTime=00%3A00&endTime=01%3A00&dateList=&"));
        assert!(body.contains("&chkRecDay=6&presetID=0&presetID=0&ctok=t&recMode=1&tuijyuuFlag=1&priority=2&"));
        assert!(body.ends_with("&tunerID=0&suspendMode=0&batFilePath=&batFileTag="));

        let presets: Vec<_> = pairs(&body)
            .into_iter()
            .filter(|(k, _)| k == "presetID")
            .collect();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets[0], presets[1]);
    }

    #[test]
    fn test_encode_create_rule_validates() {
        let req = AutoAddRuleRequest::new("", "", vec!["1-2-3".to_string()]);
        assert_eq!(
            encode_create_rule(&req),
            Err(ValidationError::MissingSearchKeyword)
        );

        let req = AutoAddRuleRequest::new("a", "", vec!["1-2-x".to_string()]);
        assert_eq!(
            encode_create_rule(&req),
            Err(ValidationError::InvalidChannelFormat {
                index: 0,
                raw: "1-2-x".to_string()
            })
        );
    }

    #[test]
    fn test_encode_delete_rule() {
        assert_eq!(encode_delete_rule("abc"), "del=1&ctok=abc");
        assert_eq!(encode_delete_rule("a+b/c"), "del=1&ctok=a%2Bb%2Fc");
    }

    #[test]
    fn test_validate_rule_id() {
        assert_eq!(validate_rule_id(334), Ok(334));
        assert_eq!(validate_rule_id(0), Err(ValidationError::InvalidRuleId(0)));
        assert_eq!(validate_rule_id(-5), Err(ValidationError::InvalidRuleId(-5)));
    }
}
