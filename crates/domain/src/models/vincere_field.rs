//! Vincere custom field key table.
//!
//! Vincere exposes job custom fields under opaque hash keys. This is the
//! only place those keys live: if the ATS rotates a key, update it here.

use serde::Serialize;

/// Job custom fields the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VincereJobField {
    Yacht,
    Requirements,
    StartDate,
    Itinerary,
    Salary,
    Program,
    HolidayPackage,
    ContractType,
}

impl VincereJobField {
    /// Every mapped field, in display order.
    pub const ALL: [VincereJobField; 8] = [
        Self::Yacht,
        Self::Requirements,
        Self::StartDate,
        Self::Itinerary,
        Self::Salary,
        Self::Program,
        Self::HolidayPackage,
        Self::ContractType,
    ];

    /// Opaque key used by Vincere for this field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Yacht => "f8b2c1ddc995fb699973598e449193c3",
            Self::Requirements => "3c580f529de2e205114090aa08e10f7a",
            Self::StartDate => "9a214be2a25d61d1add26dca93aef45a",
            Self::Itinerary => "b8a75c8b68fb5c85fb083aac4bbbed94",
            Self::Salary => "035ca080627c6bac4e59e6fc6750a5b6",
            Self::Program => "24a44070b5d77ce92fb018745ddbe374",
            Self::HolidayPackage => "ecac1d20eb2b26a248837610935d9b92",
            Self::ContractType => "c980a4f92992081ead936fb8a358fb79",
        }
    }

    /// Human readable label, as shown in the Vincere UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Yacht => "Yacht",
            Self::Requirements => "Requirements",
            Self::StartDate => "Start Date",
            Self::Itinerary => "Itinerary",
            Self::Salary => "Salary",
            Self::Program => "Program",
            Self::HolidayPackage => "Holiday Package",
            Self::ContractType => "Contract Type",
        }
    }

    /// Reverse lookup from an opaque key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl std::fmt::Display for VincereJobField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
