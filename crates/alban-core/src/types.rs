//! # Domain Types
//!
//! Core domain types used throughout AlbanManage.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductEntry   │   │   RowTotals     │   │  HistoryRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │──►│  total_units    │   │  id (UUID)      │       │
//! │  │  unit_price     │   │  before / after │   │  file_name      │       │
//! │  │  pack_size      │   │  row totals     │   │  file_path      │       │
//! │  │  units, packs   │   └────────┬────────┘   │  totals, count  │       │
//! │  │  expired        │            ▼            └─────────────────┘       │
//! │  │  disabled       │   ┌─────────────────┐                              │
//! │  └─────────────────┘   │ InvoiceTotals   │   ThemeMode, Language        │
//! │                        └─────────────────┘   (settings values)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product Entry
// =============================================================================

/// One product's counted quantities for an invoice run.
///
/// Created by the caller per run, never stored. Quantities are unsigned, so
/// a constructed entry is always a valid input to the totals engine; raw
/// user input goes through [`crate::validation::EntryInput`] first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductEntry {
    /// Display name, also used to match a form to its row.
    pub name: String,

    /// Price of a single unit.
    pub unit_price: Money,

    /// Units per pack.
    pub pack_size: u32,

    /// Loose units counted.
    pub units: u32,

    /// Whole packs counted.
    pub packs: u32,

    /// Expired units to deduct.
    pub expired: u32,

    /// Disabled (damaged) units to deduct.
    pub disabled: u32,
}

impl ProductEntry {
    /// Creates an entry with all quantities at zero.
    pub fn new(name: impl Into<String>, unit_price: Money, pack_size: u32) -> Self {
        ProductEntry {
            name: name.into(),
            unit_price,
            pack_size,
            units: 0,
            packs: 0,
            expired: 0,
            disabled: 0,
        }
    }

    pub fn with_units(mut self, units: u32) -> Self {
        self.units = units;
        self
    }

    pub fn with_packs(mut self, packs: u32) -> Self {
        self.packs = packs;
        self
    }

    pub fn with_expired(mut self, expired: u32) -> Self {
        self.expired = expired;
        self
    }

    pub fn with_disabled(mut self, disabled: u32) -> Self {
        self.disabled = disabled;
        self
    }

    /// Returns true if any quantity was recorded for this entry.
    #[inline]
    pub fn has_activity(&self) -> bool {
        self.units > 0 || self.packs > 0 || self.expired > 0 || self.disabled > 0
    }

    /// Units deducted for expiry or damage.
    #[inline]
    pub fn deductions(&self) -> u64 {
        self.expired as u64 + self.disabled as u64
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Per-entry derived quantities and amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RowTotals {
    /// `units + packs * pack_size`
    pub total_units: u64,
    /// `total_units + expired + disabled`
    pub units_before_deduction: u64,
    /// `max(0, total_units - expired - disabled)`
    pub units_after_deduction: u64,
    pub row_total_before: Money,
    pub row_total_after: Money,
}

/// Grand totals over every active entry of an invoice run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    pub grand_total_before: Money,
    pub grand_total_after: Money,
}

impl InvoiceTotals {
    /// Amount removed from the invoice by deductions.
    #[inline]
    pub fn deducted(&self) -> Money {
        self.grand_total_before - self.grand_total_after
    }
}

// =============================================================================
// History Record
// =============================================================================

/// A persisted log entry describing one completed invoice generation.
///
/// Stored by the history repository; never mutated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HistoryRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Action label, e.g. "PDF Generated".
    pub action_type: String,

    /// Stored file name including the timestamp suffix.
    pub file_name: String,

    /// Full resolved path of the stored document.
    pub file_path: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    pub total_before: Money,
    pub total_after: Money,

    /// Number of entries with activity on the invoice.
    pub product_count: u32,
}

impl HistoryRecord {
    /// Creation time as milliseconds since the Unix epoch.
    #[inline]
    pub fn timestamp_millis(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}

/// Fields supplied by the caller when recording a generation.
/// The repository assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryRecord {
    pub action_type: String,
    pub file_name: String,
    pub file_path: String,
    pub total_before: Money,
    pub total_after: Money,
    pub product_count: u32,
}

impl NewHistoryRecord {
    /// Builds a record from computed invoice totals.
    pub fn from_totals(
        action_type: impl Into<String>,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        totals: &InvoiceTotals,
        product_count: u32,
    ) -> Self {
        NewHistoryRecord {
            action_type: action_type.into(),
            file_name: file_name.into(),
            file_path: file_path.into(),
            total_before: totals.grand_total_before,
            total_after: totals.grand_total_after,
            product_count,
        }
    }
}

// =============================================================================
// Settings Values
// =============================================================================

/// Theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ThemeMode {
    /// Follow the operating system.
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    /// Stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::System => "SYSTEM",
            ThemeMode::Light => "LIGHT",
            ThemeMode::Dark => "DARK",
        }
    }

    /// Parses a stored value, falling back to `System` for anything unknown.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SYSTEM" => Ok(ThemeMode::System),
            "LIGHT" => Ok(ThemeMode::Light),
            "DARK" => Ok(ThemeMode::Dark),
            _ => Err(ValidationError::InvalidFormat {
                field: "theme_mode".to_string(),
                reason: format!("unknown theme '{}'", s),
            }),
        }
    }
}

/// Supported interface languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Language {
    #[default]
    En,
    Fr,
    Ar,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Fr, Language::Ar];

    /// ISO 639-1 code, the stored representation.
    pub const fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Ar => "ar",
        }
    }

    /// Name of the language in that language.
    pub const fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "Français",
            Language::Ar => "العربية",
        }
    }

    pub const fn is_right_to_left(&self) -> bool {
        matches!(self, Language::Ar)
    }

    /// Parses a stored code, falling back to English.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            "ar" => Ok(Language::Ar),
            _ => Err(ValidationError::InvalidFormat {
                field: "language".to_string(),
                reason: format!("unsupported language '{}'", s),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
