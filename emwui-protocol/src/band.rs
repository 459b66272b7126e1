//! Broadcast band classification based on the original network ID (ONID).
//!
//! EMWUI reports every service with its ONID. The ONID alone tells which
//! delivery system the service belongs to, following ARIB STD-B10 and
//! TR-B14/TR-B15 allocations.
//!
//! # Terrestrial ONID formula (ARIB TR-B14 第五分冊 第七編 9.1)
//!
//! ```text
//! network_id = 0x7FF0 - 0x0010 × 地域識別 + 地域事業者識別 - 0x0400 × 県複フラグ
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Broadcast band type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandType {
    /// Digital terrestrial television (地上波デジタル)
    Terrestrial,
    /// BS satellite (BS衛星)
    BS,
    /// 110度CS satellite (CS1, CS2)
    CS,
    /// Advanced BS/CS digital (BS4K/CS4K)
    #[serde(rename = "4k")]
    FourK,
    /// 124/128度CS (スカパー!プレミアムサービス)
    SKY,
    /// Cable television (ケーブルテレビ)
    CATV,
    /// Anything else
    Other,
}

impl BandType {
    /// Every band, in display order.
    pub const ALL: [BandType; 7] = [
        BandType::Terrestrial,
        BandType::BS,
        BandType::CS,
        BandType::FourK,
        BandType::SKY,
        BandType::CATV,
        BandType::Other,
    ];

    /// Classify band type from an ONID.
    ///
    /// - Terrestrial: 0x7800-0x7FFF (including the 県複フラグ=1 range)
    /// - BS: 0x0004
    /// - CS (110度): 0x0006, 0x0007
    /// - 4K: 0x000B (高度BS), 0x000C (高度110度CS)
    /// - SKY: 0x000A (SPHD), 0x0001, 0x0003
    /// - CATV: 0xFFFE, 0xFFFA, 0xFFFD, 0xFFF9, 0xFFF7
    pub fn from_onid(onid: u16) -> Self {
        match onid {
            0x0004 => BandType::BS,
            0x0006 | 0x0007 => BandType::CS,
            0x000B | 0x000C => BandType::FourK,
            0x000A | 0x0001 | 0x0003 => BandType::SKY,
            0xFFFE | 0xFFFA | 0xFFFD | 0xFFF9 | 0xFFF7 => BandType::CATV,
            0x7800..=0x7FFF => BandType::Terrestrial,
            _ => BandType::Other,
        }
    }

    /// Get display name in Japanese.
    pub fn display_name(&self) -> &'static str {
        match self {
            BandType::Terrestrial => "地上波",
            BandType::BS => "BS",
            BandType::CS => "CS",
            BandType::FourK => "4K",
            BandType::SKY => "スカパー!",
            BandType::CATV => "CATV",
            BandType::Other => "その他",
        }
    }

    /// Get display name in English.
    pub fn name_en(&self) -> &'static str {
        match self {
            BandType::Terrestrial => "Terrestrial",
            BandType::BS => "BS",
            BandType::CS => "CS",
            BandType::FourK => "4K",
            BandType::SKY => "SKY",
            BandType::CATV => "CATV",
            BandType::Other => "Other",
        }
    }
}

impl fmt::Display for BandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name_en())
    }
}

impl FromStr for BandType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        BandType::ALL
            .into_iter()
            .find(|band| band.name_en().to_ascii_lowercase() == lower)
            .ok_or_else(|| format!("unknown band '{}'", s))
    }
}

/// Terrestrial broadcast region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrestrialRegion {
    /// Hokkaido (北海道)
    Hokkaido,
    /// Tohoku (東北)
    Tohoku,
    /// Kanto wide area (関東広域圏)
    Kanto,
    /// Koshinetsu (甲信越)
    Koshinetsu,
    /// Hokuriku (北陸)
    Hokuriku,
    /// Tokai/Chukyo wide area (東海・中京広域圏)
    Tokai,
    /// Kinki wide area (近畿広域圏)
    Kinki,
    /// Chugoku (中国)
    Chugoku,
    /// Shikoku (四国)
    Shikoku,
    /// Kyushu (九州)
    Kyushu,
    /// Okinawa (沖縄)
    Okinawa,
}

impl TerrestrialRegion {
    /// Returns the Japanese display name for this region.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Hokkaido => "北海道",
            Self::Tohoku => "東北",
            Self::Kanto => "関東",
            Self::Koshinetsu => "甲信越",
            Self::Hokuriku => "北陸",
            Self::Tokai => "東海",
            Self::Kinki => "近畿",
            Self::Chugoku => "中国",
            Self::Shikoku => "四国",
            Self::Kyushu => "九州",
            Self::Okinawa => "沖縄",
        }
    }

    fn from_region_id(region_id: u8) -> Option<Self> {
        let region = match region_id {
            4 | 10..=16 => Self::Hokkaido,
            17..=22 => Self::Tohoku,
            1 | 23..=29 => Self::Kanto,
            30..=32 => Self::Koshinetsu,
            34 | 36 | 37 => Self::Hokuriku,
            3 | 33 | 35 | 38 | 39 => Self::Tokai,
            2 | 40..=45 => Self::Kinki,
            5 | 6 | 46..=50 => Self::Chugoku,
            51..=54 => Self::Shikoku,
            55..=61 => Self::Kyushu,
            62 => Self::Okinawa,
            _ => return None,
        };
        Some(region)
    }
}

/// Calculate the region ID (1-62) of a terrestrial ONID.
///
/// # Example
/// ```
/// use emwui_protocol::band::region_id_from_onid;
///
/// // 関東広域 (region_id = 1)
/// assert_eq!(region_id_from_onid(0x7FE0), Some(1));
/// // 宮城 (region_id = 17)
/// assert_eq!(region_id_from_onid(0x7EE0), Some(17));
/// // BS is not terrestrial
/// assert_eq!(region_id_from_onid(4), None);
/// ```
pub fn region_id_from_onid(onid: u16) -> Option<u8> {
    if !(0x7800..=0x7FF0).contains(&onid) {
        return None;
    }

    // 県複フラグ=1 shifts the ONID down by 0x0400
    let normalized = if onid < 0x7C00 { onid + 0x0400 } else { onid };

    // 地域事業者識別 is 0-15, so round up when dividing
    let region_id = ((0x7FF0 - normalized + 0x000F) / 0x0010) as u8;

    (1..=62).contains(&region_id).then_some(region_id)
}

/// Resolve the terrestrial region of an ONID, if it is terrestrial.
pub fn terrestrial_region(onid: u16) -> Option<TerrestrialRegion> {
    region_id_from_onid(onid).and_then(TerrestrialRegion::from_region_id)
}

/// Human-readable label such as `BS` or `地上波 (関東)`.
pub fn band_label(onid: u16) -> String {
    let band = BandType::from_onid(onid);
    match terrestrial_region(onid) {
        Some(region) if band == BandType::Terrestrial => {
            format!("{} ({})", band.display_name(), region.display_name())
        }
        _ => band.display_name().to_string(),
    }
}
