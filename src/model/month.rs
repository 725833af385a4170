use serde::{Deserialize, Serialize};

/// A calendar month as it appears in the month field of the form.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

serde_plain::derive_display_from_serialize!(Month);
serde_plain::derive_fromstr_from_deserialize!(Month);

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// The month number, `1` for January through `12` for December.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    /// The month with number `n`, or `None` outside of `1..=12`.
    pub fn from_number(n: u32) -> Option<Month> {
        let ix = usize::try_from(n).ok()?.checked_sub(1)?;
        Month::ALL.get(ix).copied()
    }

    /// Looks up a month by its full English name, e.g. `"March"`.
    pub fn from_name(name: &str) -> Option<Month> {
        name.parse().ok()
    }

    /// Looks up a month by its number written as text, e.g. `"3"`.
    pub fn from_number_str(s: &str) -> Option<Month> {
        s.trim().parse::<u32>().ok().and_then(Month::from_number)
    }
}

#[test]
fn month_lookup_test() {
    assert_eq!(Month::from_number(3), Some(Month::March));
    assert_eq!(Month::March.number(), 3);
    assert_eq!(Month::December.number(), 12);
    assert_eq!(Month::from_number(0), None);
    assert_eq!(Month::from_number(13), None);
    assert_eq!(Month::from_name("September"), Some(Month::September));
    assert_eq!(Month::from_name("Sept"), None);
    assert_eq!(Month::from_number_str("12"), Some(Month::December));
    assert_eq!(Month::from_number_str("twelve"), None);
    assert_eq!(Month::May.to_string(), "May");
}
