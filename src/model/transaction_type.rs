//! The fixed transaction types of the ledger and the categories that each of them allows.

use serde::{Deserialize, Serialize};

/// The top-level classification of a ledger entry.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "Monthly Dues")]
    MonthlyDues,
    #[serde(rename = "Special Contributions")]
    SpecialContributions,
    #[serde(rename = "Expenditure")]
    Expenditure,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

const MONTHLY_DUES: &[&str] = &["Regular Monthly Dues"];

const SPECIAL_CONTRIBUTIONS: &[&str] = &[
    "Toilet Project",
    "Gadzekpo",
    "Other Funds",
    "Special Individual Contribution",
];

const EXPENDITURE: &[&str] = &[
    "Expenditure: Toilet Project",
    "Expenditure: Gadzekpo",
    "Expenditure: Monthly Dues",
    "Expenditure: Special Individual Contribution",
];

impl TransactionType {
    /// All transaction types, in the order they are offered to the user.
    pub const ALL: [TransactionType; 3] = [
        TransactionType::MonthlyDues,
        TransactionType::SpecialContributions,
        TransactionType::Expenditure,
    ];

    /// The categories that may be paired with this transaction type.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            TransactionType::MonthlyDues => MONTHLY_DUES,
            TransactionType::SpecialContributions => SPECIAL_CONTRIBUTIONS,
            TransactionType::Expenditure => EXPENDITURE,
        }
    }

    /// Whether `category` may be paired with this transaction type.
    pub fn allows(&self, category: &str) -> bool {
        self.categories().contains(&category)
    }
}

/// Returns the categories allowed for the transaction type named `transaction_type`, or an empty
/// slice when the name is not a known transaction type.
pub fn categories_for(transaction_type: &str) -> &'static [&'static str] {
    transaction_type
        .parse::<TransactionType>()
        .map(|t| t.categories())
        .unwrap_or(&[])
}
