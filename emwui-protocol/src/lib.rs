//! Wire model for the EpgTimer EMWUI web API.
//!
//! This crate holds everything that can be decided without a network:
//! the entity types, the XML response decoder, the form encoder for
//! rule submissions, CSRF token scraping and client-side filters.
//!
//! # Request Flow
//!
//! ```text
//! GET  /EMWUI/autoaddepg.html     -> extract_ctok()
//! POST /api/SetAutoAdd?id=0       <- encode_create_rule()
//!                                 -> decode_rule_response()
//! GET  /api/EnumAutoAdd           -> decode_envelope::<AutoAddRule>()
//! ```
//!
//! # Example
//!
//! ```rust
//! use emwui_protocol::{encode_create_rule, extract_ctok, AutoAddRuleRequest};
//!
//! let page = br#"<input type="hidden" name="ctok" value="abc">"#;
//! let ctok = extract_ctok(page).unwrap();
//!
//! let req = AutoAddRuleRequest::new("ニュース", "", vec!["32736-32736-1024".to_string()])
//!     .with_token(ctok);
//! let body = encode_create_rule(&req).unwrap();
//! assert!(body.starts_with("addchg=1&andKey="));
//! ```
//!
//! # Channel Classification
//!
//! ```rust
//! use emwui_protocol::{band::band_label, BandType, ChannelRef};
//!
//! let ch: ChannelRef = "4-16625-101".parse().unwrap();
//! assert_eq!(ch.band(), BandType::BS);
//! assert_eq!(band_label(32736), "地上波 (関東)");
//! ```

pub mod band;
pub mod codec;
pub mod error;
pub mod filter;
pub mod types;
pub mod xml;

pub use band::{BandType, TerrestrialRegion};
pub use codec::{
    encode_create_rule, encode_delete_rule, extract_ctok, validate_rule_id, FORM_CONTENT_TYPE,
};
pub use error::{ChannelRefError, DecodeError, TokenError, ValidationError};
pub use filter::{
    ChannelFilter, EventFilter, Filter, RecordingFilter, ReservationFilter, RuleFilter,
};
pub use types::{
    // Entities
    AutoAddRule, ChannelInfo, ContentInfo, ProgramEvent, RecordingEntry, RecordingSettings,
    ReservationEntry, SearchSettings,
    // Identity and envelopes
    ChannelRef, Envelope, ServiceType, START_DATETIME_FORMAT,
    // Rule submission
    AutoAddRuleRequest, AutoAddRuleResponse,
};
pub use xml::{decode_envelope, decode_rule_response, XmlItem};
