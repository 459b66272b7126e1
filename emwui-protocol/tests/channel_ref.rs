use emwui_protocol::{ChannelRef, ChannelRefError};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_display_parses_back(onid: u16, tsid: u16, sid: u16) {
        let ch = ChannelRef::new(onid, tsid, sid);
        let parsed: ChannelRef = ch.to_string().parse().unwrap();
        prop_assert_eq!(parsed, ch);
    }

    #[test]
    fn test_wrong_part_count_rejected(parts in prop::collection::vec(0u16..100, 0..6)) {
        prop_assume!(parts.len() != 3);
        let raw = parts.iter().map(u16::to_string).collect::<Vec<_>>().join("-");
        prop_assert!(
            matches!(raw.parse::<ChannelRef>(), Err(ChannelRefError::WrongPartCount(_))),
            "{:?} should not parse", raw
        );
    }

    #[test]
    fn test_out_of_range_rejected(onid in 65536u32..1_000_000, tsid: u16, sid: u16) {
        let raw = format!("{}-{}-{}", onid, tsid, sid);
        let is_onid_error = matches!(
            raw.parse::<ChannelRef>(),
            Err(ChannelRefError::InvalidNumber { part: "ONID", .. })
        );
        prop_assert!(is_onid_error);
    }

    #[test]
    fn test_signed_parts_rejected(onid: u16, tsid: u16, sid: u16, sign in "[+-]") {
        let raw = format!("{}{}-{}-{}", sign, onid, tsid, sid);
        prop_assert!(raw.parse::<ChannelRef>().is_err(), "{:?} should not parse", raw);

        let raw = format!("{}-+{}-{}", onid, tsid, sid);
        let is_tsid_error = matches!(
            raw.parse::<ChannelRef>(),
            Err(ChannelRefError::InvalidNumber { part: "TSID", .. })
        );
        prop_assert!(is_tsid_error, "{:?} should be a TSID error", raw);
    }

    #[test]
    fn test_zero_padded_parts_rejected(onid: u16, tsid: u16, sid: u16, zeros in "0{1,3}") {
        let raw = format!("{}{}-{}-{}", zeros, onid, tsid, sid);
        let is_onid_error = matches!(
            raw.parse::<ChannelRef>(),
            Err(ChannelRefError::InvalidNumber { part: "ONID", .. })
        );
        prop_assert!(is_onid_error, "{:?} should be an ONID error", raw);

        let raw = format!("{}-{}-{}{}", onid, tsid, zeros, sid);
        let is_sid_error = matches!(
            raw.parse::<ChannelRef>(),
            Err(ChannelRefError::InvalidNumber { part: "SID", .. })
        );
        prop_assert!(is_sid_error, "{:?} should be a SID error", raw);
    }

    #[test]
    fn test_parse_never_panics(raw in "\\PC*") {
        let _ = raw.parse::<ChannelRef>();
    }
}
