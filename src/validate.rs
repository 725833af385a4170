//! Client-side validation of an entry form.
//!
//! Validation never stops at the first problem. Every rule runs and appends its own message so that
//! the user can fix the whole form in one pass. Nothing here performs I/O.

use crate::model::{categories_for, parse_form_date, Amount, Field, FormFields, Month};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// The years offered by the year field of the form.
pub const YEARS: RangeInclusive<i32> = 2022..=2040;

/// Fields that must not be empty, in the order they are reported.
const REQUIRED: [Field; 6] = [
    Field::TransactionType,
    Field::Date,
    Field::Year,
    Field::Month,
    Field::MonthNum,
    Field::Category,
];

/// The outcome of validating one form.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    errors: Vec<String>,
    invalid_fields: BTreeSet<Field>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human readable messages, in the order the rules produced them.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The fields that should be highlighted as invalid.
    pub fn invalid_fields(&self) -> &BTreeSet<Field> {
        &self.invalid_fields
    }

    pub fn is_invalid(&self, field: Field) -> bool {
        self.invalid_fields.contains(&field)
    }

    /// All errors as a single bulleted message.
    pub fn message(&self) -> String {
        format!(
            "Please fix the following errors:\n• {}",
            self.errors.join("\n• ")
        )
    }

    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(message.into());
        self.invalid_fields.insert(field);
    }
}

/// Validates the raw values of an entry form.
pub fn validate(fields: &FormFields) -> ValidationResult {
    let mut result = ValidationResult::default();

    for field in REQUIRED {
        if is_blank(fields.get(field)) {
            result.push(field, format!("{} is required", field.label()));
        }
    }

    if !fields.amount.parse::<Amount>().is_ok_and(|a| a.is_positive()) {
        result.push(Field::Amount, "Valid amount greater than 0 is required");
    }

    check_category(fields, &mut result);
    check_dates(fields, &mut result);

    result
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// The category must be one that the transaction type allows.
fn check_category(fields: &FormFields, result: &mut ValidationResult) {
    let transaction_type = fields.transaction_type.as_str();
    let category = fields.category.as_str();
    if is_blank(transaction_type) || is_blank(category) {
        return;
    }
    let allowed = categories_for(transaction_type);
    if allowed.is_empty() {
        result.push(
            Field::TransactionType,
            format!("\"{transaction_type}\" is not a recognized Transaction Type"),
        );
        result.push(
            Field::Category,
            format!(
                "\"{category}\" is not valid for \"{transaction_type}\". Valid options: none"
            ),
        );
    } else if !allowed.contains(&category) {
        result.push(
            Field::Category,
            format!(
                "\"{category}\" is not valid for \"{transaction_type}\". Valid options: {}",
                allowed.join(", ")
            ),
        );
    }
}

/// Values that are present must be well-formed, and the redundant date fields must agree.
fn check_dates(fields: &FormFields, result: &mut ValidationResult) {
    let date = if is_blank(&fields.date) {
        None
    } else {
        let date = parse_form_date(&fields.date);
        if date.is_none() {
            result.push(
                Field::Date,
                format!("Date \"{}\" is not a valid YYYY-MM-DD date", fields.date),
            );
        }
        date
    };

    let year = if is_blank(&fields.year) {
        None
    } else {
        match fields.year.trim().parse::<i32>() {
            Ok(y) if YEARS.contains(&y) => Some(y),
            _ => {
                result.push(
                    Field::Year,
                    format!(
                        "Year \"{}\" must be between {} and {}",
                        fields.year,
                        YEARS.start(),
                        YEARS.end()
                    ),
                );
                None
            }
        }
    };

    let month = if is_blank(&fields.month) {
        None
    } else {
        let month = Month::from_name(fields.month.trim());
        if month.is_none() {
            result.push(
                Field::Month,
                format!("Month \"{}\" is not a recognized month", fields.month),
            );
        }
        month
    };

    let month_num = if is_blank(&fields.month_num) {
        None
    } else {
        let month_num = Month::from_number_str(&fields.month_num);
        if month_num.is_none() {
            result.push(
                Field::MonthNum,
                format!("Month Number \"{}\" must be between 1 and 12", fields.month_num),
            );
        }
        month_num
    };

    if let (Some(month), Some(month_num)) = (month, month_num) {
        if month != month_num {
            result.push(
                Field::MonthNum,
                format!(
                    "Month Number {} does not match Month {month}",
                    month_num.number()
                ),
            );
        }
    }

    if let Some(date) = date {
        if let Some(year) = year.filter(|y| *y != date.year()) {
            result.push(
                Field::Year,
                format!("Year {year} does not match Date {}", fields.date.trim()),
            );
        }
        if let Some(month) = month.filter(|m| m.number() != date.month()) {
            result.push(
                Field::Month,
                format!("Month {month} does not match Date {}", fields.date.trim()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionType;

    fn valid() -> FormFields {
        FormFields {
            transaction_type: "Special Contributions".into(),
            date: "2024-03-15".into(),
            year: "2024".into(),
            month: "March".into(),
            month_num: "3".into(),
            family_member: "Ama".into(),
            amount: "100".into(),
            category: "Gadzekpo".into(),
            description: String::new(),
        }
    }

    #[test]
    fn test_valid_form() {
        let r = validate(&valid());
        assert!(r.is_valid(), "{:?}", r.errors());
        assert!(r.invalid_fields().is_empty());
    }

    #[test]
    fn test_empty_form_reports_each_required_field() {
        let r = validate(&FormFields::default());
        assert!(!r.is_valid());
        // six required fields plus the amount rule
        assert_eq!(r.errors().len(), 7);
        assert_eq!(r.errors()[0], "Transaction Type is required");
        assert_eq!(r.errors()[4], "Month Number is required");
        assert_eq!(r.errors()[5], "Category is required");
        assert_eq!(r.errors()[6], "Valid amount greater than 0 is required");
        assert!(r.errors().iter().all(|e| !e.contains("is not valid for")));
        assert_eq!(r.invalid_fields().len(), 7);
    }

    #[test]
    fn test_amount_rule() {
        for bad in ["0", "-5", "abc", "", "  "] {
            let mut f = valid();
            f.amount = bad.into();
            let r = validate(&f);
            assert!(r.is_invalid(Field::Amount), "amount {bad:?} should fail");
            assert_eq!(r.errors().len(), 1);
        }
        let mut f = valid();
        f.amount = "0.01".into();
        assert!(validate(&f).is_valid());
    }

    #[test]
    fn test_every_type_category_pair() {
        let all_categories: Vec<&str> = TransactionType::ALL
            .iter()
            .flat_map(|t| t.categories().iter().copied())
            .collect();
        for t in TransactionType::ALL {
            for category in &all_categories {
                let mut f = valid();
                f.transaction_type = t.to_string();
                f.category = category.to_string();
                let r = validate(&f);
                assert_eq!(
                    r.is_valid(),
                    t.allows(category),
                    "{t} / {category}: {:?}",
                    r.errors()
                );
            }
        }
    }

    #[test]
    fn test_mismatch_message_lists_options() {
        let mut f = valid();
        f.transaction_type = "Monthly Dues".into();
        f.category = "Gadzekpo".into();
        let r = validate(&f);
        assert_eq!(
            r.errors(),
            &["\"Gadzekpo\" is not valid for \"Monthly Dues\". Valid options: Regular Monthly Dues"
                .to_string()]
        );
        assert!(r.is_invalid(Field::Category));
        assert!(!r.is_invalid(Field::TransactionType));
    }

    #[test]
    fn test_unknown_transaction_type() {
        let mut f = valid();
        f.transaction_type = "Loans".into();
        let r = validate(&f);
        assert!(r.is_invalid(Field::TransactionType));
        assert!(r.is_invalid(Field::Category));
        assert!(r
            .errors()
            .iter()
            .any(|e| e.ends_with("Valid options: none")));
    }

    #[test]
    fn test_unknown_month_values_are_errors() {
        let mut f = valid();
        f.month = "Marchember".into();
        f.month_num = "13".into();
        let r = validate(&f);
        assert!(r.is_invalid(Field::Month));
        assert!(r.is_invalid(Field::MonthNum));
        assert_eq!(r.errors().len(), 2);
    }

    #[test]
    fn test_redundant_date_fields_must_agree() {
        let mut f = valid();
        f.month_num = "4".into();
        let r = validate(&f);
        assert_eq!(r.errors(), &["Month Number 4 does not match Month March".to_string()]);

        let mut f = valid();
        f.year = "2025".into();
        let r = validate(&f);
        assert!(r.is_invalid(Field::Year));

        let mut f = valid();
        f.month = "April".into();
        f.month_num = "4".into();
        let r = validate(&f);
        assert_eq!(r.errors(), &["Month April does not match Date 2024-03-15".to_string()]);
    }

    #[test]
    fn test_bad_date_and_year() {
        let mut f = valid();
        f.date = "15/03/2024".into();
        f.year = "1999".into();
        let r = validate(&f);
        assert!(r.is_invalid(Field::Date));
        assert!(r.is_invalid(Field::Year));
    }

    #[test]
    fn test_message() {
        let mut f = valid();
        f.category = String::new();
        f.amount = "0".into();
        assert_eq!(
            validate(&f).message(),
            "Please fix the following errors:\n• Category is required\n• Valid amount greater than 0 is required"
        );
    }
}
