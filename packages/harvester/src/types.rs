//! Core data types for the harvester.
//!
//! These types represent congressional bills as returned by the
//! ProPublica Congress API, and the flat rows exported from them.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::HarvesterError;

/// Legislative chamber a bill originates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chamber {
    /// House of Representatives bill (`hr`).
    #[serde(rename = "hr")]
    House,

    /// Senate bill (`s`).
    #[serde(rename = "s")]
    Senate,
}

impl Chamber {
    /// Get the tag used in API paths and file names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::House => "hr",
            Self::Senate => "s",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chamber {
    type Err = HarvesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hr" | "house" => Ok(Self::House),
            "s" | "senate" => Ok(Self::Senate),
            _ => Err(HarvesterError::InvalidChamber(s.to_string())),
        }
    }
}

/// Identifies one bill request: chamber, number and congress session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BillKey {
    pub chamber: Chamber,
    pub number: u32,
    pub session: u32,
}

impl BillKey {
    #[must_use]
    pub fn new(chamber: Chamber, number: u32, session: u32) -> Self {
        Self {
            chamber,
            number,
            session,
        }
    }

    /// Short label as used in status messages (e.g. `s12`).
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{}", self.chamber, self.number)
    }
}

/// Top-level body of a bill lookup.
///
/// Error bodies carry no `results`, so the list defaults to empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

impl ApiResponse {
    /// Status marker the API uses for a successful lookup.
    pub const STATUS_OK: &'static str = "OK";

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Self::STATUS_OK
    }
}

/// How `introduced_date` is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntroducedDateMode {
    /// `%Y-%m-%d`, a plain calendar date.
    #[default]
    Calendar,

    /// `%Y-%M-%d`: the middle component is read as minutes and the month
    /// stays January. Kept to reproduce datasets produced that way.
    Legacy,
}

/// Parsed introduction date, shaped by [`IntroducedDateMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroducedDate {
    Date(NaiveDate),
    Legacy(NaiveDateTime),
}

impl fmt::Display for IntroducedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Legacy(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// General information about one bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillRecord {
    pub bill_type: Option<String>,
    pub bill_id: String,
    pub session: Option<String>,
    pub short_title: Option<String>,
    pub official_title: Option<String>,
    pub passed_house: bool,
    pub passed_senate: bool,
    pub introduced: IntroducedDate,
    pub top_subject: Option<String>,
}

/// One event in a bill's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub bill_id: String,
    pub action_id: Option<String>,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub action_type: Option<String>,
    pub action_text: Option<String>,
}

/// A record that can be flattened into a named-cell row.
///
/// Cells set to `None` are exported as empty values.
pub trait Row {
    fn cells(&self) -> Vec<(&'static str, Option<String>)>;
}

impl Row for BillRecord {
    fn cells(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("_type", self.bill_type.clone()),
            ("_id", Some(self.bill_id.clone())),
            ("_session", self.session.clone()),
            ("_short_title", self.short_title.clone()),
            ("_official_title", self.official_title.clone()),
            ("_passed_house", Some(self.passed_house.to_string())),
            ("_passed_senate", Some(self.passed_senate.to_string())),
            ("_introduced", Some(self.introduced.to_string())),
            ("_top_subject", self.top_subject.clone()),
        ]
    }
}

impl Row for ActionRecord {
    fn cells(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("_bill", Some(self.bill_id.clone())),
            ("_id", self.action_id.clone()),
            ("_date", Some(self.date.format("%Y-%m-%d").to_string())),
            (
                "_time",
                self.time.map(|t| t.format("%H:%M:%S").to_string()),
            ),
            ("_type", self.action_type.clone()),
            ("_action_text", self.action_text.clone()),
        ]
    }
}
