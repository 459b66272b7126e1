//! Error types for the EMWUI wire protocol.

use thiserror::Error;

/// Errors raised while parsing an `ONID-TSID-SID` channel identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelRefError {
    /// The identifier does not have exactly three dash-separated parts.
    #[error("invalid format: expected 'ONID-TSID-SID', got '{0}'")]
    WrongPartCount(String),

    /// One of the parts is not a plain decimal 16-bit integer (no sign, no
    /// leading zeros).
    #[error("invalid {part} '{value}' in '{raw}'")]
    InvalidNumber {
        part: &'static str,
        value: String,
        raw: String,
    },
}

/// Request validation failures, detected before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// andKey is empty or whitespace only.
    #[error("andKey is required (search keyword cannot be empty)")]
    MissingSearchKeyword,

    /// No channel was given for the rule.
    #[error("serviceList is required (at least one channel must be specified)")]
    MissingChannels,

    /// A serviceList entry is not a valid channel identifier.
    #[error("serviceList[{index}] has invalid format: expected 'ONID-TSID-SID', got '{raw}'")]
    InvalidChannelFormat { index: usize, raw: String },

    /// Rule ids start at 1.
    #[error("invalid rule ID {0}: must be greater than 0")]
    InvalidRuleId(i64),
}

/// CSRF token extraction failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The page has no `ctok` input field.
    #[error("ctok not found in HTML page")]
    TokenNotFound,

    /// The `ctok` field exists but carries no value.
    #[error("ctok value is empty")]
    EmptyToken,
}

/// XML response decoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// An HTML page came back where an XML document was expected.
    #[error("received an HTML page instead of an XML response")]
    UnexpectedHtml,

    /// The body is not well-formed XML.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The document root is not the expected element.
    #[error("unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    /// A numeric element holds non-numeric text.
    #[error("invalid number '{value}' in <{element}>")]
    InvalidNumber { element: String, value: String },
}

impl From<quick_xml::Error> for DecodeError {
    fn from(err: quick_xml::Error) -> Self {
        DecodeError::Malformed(err.to_string())
    }
}
