//! Values as they travel to and from the ledger service.
//!
//! The service is loose about JSON types: ids, years and the packed transaction date can come back
//! as numbers or as strings. The types here accept both and normalize to text.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// The format of the calendar date field on the form.
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// An opaque transaction identifier issued by the ledger service.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TransactionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self(loose_string(deserializer)?))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Null(()),
}

/// Deserializes a JSON string, number, boolean or null into a `String`. Null becomes empty.
pub(crate) fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => s,
        Loose::Number(n) => n.to_string(),
        Loose::Bool(b) => b.to_string(),
        Loose::Null(()) => String::new(),
    })
}

/// The packed `DDMMYYYY` date used by the ledger service, e.g. `15032024` for 2024-03-15.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WireDate(NaiveDate);

impl WireDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Parses the packed form. Numeric dates for days 1-9 lose their leading zero when the service
    /// sends them as JSON numbers, so seven digit input is left-padded before parsing.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let padded = match s.len() {
            8 => s.to_string(),
            7 => format!("0{s}"),
            _ => return None,
        };
        let day = padded[0..2].parse().ok()?;
        let month = padded[2..4].parse().ok()?;
        let year = padded[4..8].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The calendar-date representation used by the form, `YYYY-MM-DD`.
    pub fn to_form_date(&self) -> String {
        self.0.format(FORM_DATE_FORMAT).to_string()
    }
}

impl Display for WireDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}{:02}{:04}",
            self.0.day(),
            self.0.month(),
            self.0.year()
        )
    }
}

/// Parses the `YYYY-MM-DD` calendar date of the form.
pub fn parse_form_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), FORM_DATE_FORMAT).ok()
}
