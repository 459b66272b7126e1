//! Blocking HTTP client for the EMWUI API.
//!
//! One method per backend capability. Every failure is classified at the
//! point where it happens into a [`ClientError`], whose [`ErrorKind`] is
//! what the command layer uses to pick a troubleshooting hint.

use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use emwui_protocol::{
    decode_envelope, decode_rule_response, encode_create_rule, encode_delete_rule, extract_ctok,
    validate_rule_id, AutoAddRule, AutoAddRuleRequest, AutoAddRuleResponse, ChannelInfo,
    ChannelRef, DecodeError, Envelope, ProgramEvent, RecordingEntry, ReservationEntry, TokenError,
    ValidationError, XmlItem, FORM_CONTENT_TYPE,
};

/// Page that carries the `ctok` hidden input.
pub const TOKEN_PAGE_PATH: &str = "/EMWUI/autoaddepg.html";
pub const SET_AUTO_ADD_PATH: &str = "/api/SetAutoAdd";
pub const ENUM_AUTO_ADD_PATH: &str = "/api/EnumAutoAdd";
pub const ENUM_SERVICE_PATH: &str = "/api/EnumService";
pub const ENUM_EVENT_INFO_PATH: &str = "/api/EnumEventInfo";
pub const ENUM_REC_INFO_PATH: &str = "/api/EnumRecInfo";
pub const ENUM_RESERVE_INFO_PATH: &str = "/api/EnumReserveInfo";

/// Events requested per program guide call.
pub const EPG_EVENT_COUNT: u32 = 1000;

/// What went wrong below HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Connection refused, DNS failure, unreachable host.
    Connect,
    /// No response within the configured timeout.
    Timeout,
    Other,
}

/// Category of a [`ClientError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Token,
    Transport(TransportKind),
    Status,
    UnexpectedHtml,
    Decode,
    Application,
}

#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected locally; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The token page loaded but carried no usable `ctok`.
    #[error("failed to get CSRF token: {0}")]
    Token(#[from] TokenError),

    #[error("request to {url} failed: {source}")]
    Transport {
        kind: TransportKind,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status; `body` is the raw response.
    #[error("API returned status {code}: {body}")]
    Status { code: u16, body: String },

    /// An HTML page came back where XML was expected.
    #[error("received an HTML response instead of XML\nResponse body: {body}")]
    UnexpectedHtml { body: String },

    /// The body is not the expected XML document; `body` is kept verbatim.
    #[error("failed to decode response: {source}\nResponse body: {body}")]
    Decode {
        #[source]
        source: DecodeError,
        body: String,
    },

    /// The backend understood the request and reported a failure.
    #[error("EMWUI returned an error: {message}")]
    Application { message: String },
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Token(_) => ErrorKind::Token,
            ClientError::Transport { kind, .. } => ErrorKind::Transport(*kind),
            ClientError::Status { .. } => ErrorKind::Status,
            ClientError::UnexpectedHtml { .. } => ErrorKind::UnexpectedHtml,
            ClientError::Decode { .. } => ErrorKind::Decode,
            ClientError::Application { .. } => ErrorKind::Application,
        }
    }

    fn transport(url: &str, source: reqwest::Error) -> Self {
        let kind = if source.is_timeout() {
            TransportKind::Timeout
        } else if source.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Other
        };
        ClientError::Transport {
            kind,
            url: url.to_string(),
            source,
        }
    }

    fn decode(source: DecodeError, body: String) -> Self {
        match source {
            DecodeError::UnexpectedHtml => ClientError::UnexpectedHtml { body },
            source => ClientError::Decode { source, body },
        }
    }
}

/// EMWUI API client.
#[derive(Debug, Clone)]
pub struct EmwuiClient {
    base_url: String,
    http: Client,
}

impl EmwuiClient {
    /// `base_url` is the server root, e.g. `http://192.168.1.10:5510`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::transport(&base_url, e))?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body of a 2xx response.
    fn send(&self, request: RequestBuilder, url: &str) -> Result<String, ClientError> {
        let response = request
            .send()
            .map_err(|e| ClientError::transport(url, e))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ClientError::transport(url, e))?;

        debug!("{} -> {} ({} bytes)", url, status, body.len());
        if !status.is_success() {
            return Err(ClientError::Status {
                code: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, ClientError> {
        let url = self.url(path);
        debug!("GET {}", url);
        self.send(self.http.get(&url).query(query), &url)
    }

    fn post_form(&self, path: &str, query: &[(&str, String)], form: String) -> Result<String, ClientError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let request = self
            .http
            .post(&url)
            .query(query)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form);
        self.send(request, &url)
    }

    fn list<T: XmlItem>(&self, path: &str, query: &[(&str, String)]) -> Result<Envelope<T>, ClientError> {
        let body = self.get(path, query)?;
        decode_envelope(&body).map_err(|source| ClientError::decode(source, body))
    }

    fn submit_rule(&self, id: u32, form: String) -> Result<AutoAddRuleResponse, ClientError> {
        let body = self.post_form(SET_AUTO_ADD_PATH, &[("id", id.to_string())], form)?;
        let response =
            decode_rule_response(&body).map_err(|source| ClientError::decode(source, body))?;

        if !response.is_success() {
            return Err(ClientError::Application {
                message: response.error_message().to_string(),
            });
        }
        Ok(response)
    }

    /// Scrape the CSRF token from the rule editor page.
    pub fn fetch_token(&self) -> Result<String, ClientError> {
        let html = self.get(TOKEN_PAGE_PATH, &[])?;
        let ctok = extract_ctok(html.as_bytes())?;
        debug!("Obtained ctok ({} chars)", ctok.len());
        Ok(ctok)
    }

    /// Create a rule. The request is validated before anything is sent.
    pub fn create_rule(&self, request: AutoAddRuleRequest) -> Result<AutoAddRuleResponse, ClientError> {
        request.validate()?;
        let ctok = self.fetch_token()?;
        let form = encode_create_rule(&request.with_token(ctok))?;
        self.submit_rule(0, form)
    }

    /// Delete a rule by id. Non-positive ids fail before any request.
    pub fn delete_rule(&self, id: i64) -> Result<AutoAddRuleResponse, ClientError> {
        let id = validate_rule_id(id)?;
        let ctok = self.fetch_token()?;
        self.submit_rule(id, encode_delete_rule(&ctok))
    }

    pub fn list_rules(&self) -> Result<Envelope<AutoAddRule>, ClientError> {
        self.list(ENUM_AUTO_ADD_PATH, &[])
    }

    pub fn list_channels(&self) -> Result<Envelope<ChannelInfo>, ClientError> {
        self.list(ENUM_SERVICE_PATH, &[])
    }

    pub fn list_program_guide(&self, channel: ChannelRef) -> Result<Envelope<ProgramEvent>, ClientError> {
        self.list(
            ENUM_EVENT_INFO_PATH,
            &[
                ("ONID", channel.onid.to_string()),
                ("TSID", channel.tsid.to_string()),
                ("SID", channel.sid.to_string()),
                ("basic", "0".to_string()),
                ("count", EPG_EVENT_COUNT.to_string()),
            ],
        )
    }

    /// First page only; the backend pages recordings at 200.
    pub fn list_recordings(&self) -> Result<Envelope<RecordingEntry>, ClientError> {
        self.list(ENUM_REC_INFO_PATH, &[])
    }

    pub fn list_reservations(&self) -> Result<Envelope<ReservationEntry>, ClientError> {
        self.list(ENUM_RESERVE_INFO_PATH, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = ClientError::from(ValidationError::MissingChannels);
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = ClientError::from(TokenError::EmptyToken);
        assert_eq!(err.kind(), ErrorKind::Token);

        let err = ClientError::decode(DecodeError::UnexpectedHtml, "<html></html>".to_string());
        assert_eq!(err.kind(), ErrorKind::UnexpectedHtml);
        assert!(err.to_string().contains("Response body: <html></html>"));

        let err = ClientError::decode(DecodeError::Malformed("eof".to_string()), "<entry>".to_string());
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().contains("Response body: <entry>"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = EmwuiClient::new("http://localhost:5510/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5510");
        assert_eq!(client.url(ENUM_SERVICE_PATH), "http://localhost:5510/api/EnumService");
    }

    #[test]
    fn test_invalid_id_fails_without_network() {
        // Nothing listens on port 9; a request would be a transport error.
        let client = EmwuiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = client.delete_rule(0).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::InvalidRuleId(0))
        ));

        let err = client
            .create_rule(AutoAddRuleRequest::new("", "", vec!["1-2-3".to_string()]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
