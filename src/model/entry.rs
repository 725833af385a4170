use crate::model::wire::{loose_string, parse_form_date};
use crate::model::{Amount, Month, TransactionType};
use crate::Result;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifies one field of the entry form.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    TransactionType,
    Date,
    Year,
    Month,
    MonthNum,
    FamilyMember,
    Amount,
    Category,
    Description,
}

serde_plain::derive_display_from_serialize!(Field);
serde_plain::derive_fromstr_from_deserialize!(Field);

impl Field {
    /// The human readable name of the field, as used in validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Field::TransactionType => "Transaction Type",
            Field::Date => "Date",
            Field::Year => "Year",
            Field::Month => "Month",
            Field::MonthNum => "Month Number",
            Field::FamilyMember => "Family Member",
            Field::Amount => "Amount",
            Field::Category => "Category",
            Field::Description => "Description",
        }
    }
}

/// The raw, user-editable values of one entry form. Every value is text because that is what the
/// user typed or picked. This is also the `formData` object sent to the ledger service.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    #[serde(default, deserialize_with = "loose_string")]
    pub transaction_type: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub date: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub year: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub month: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub month_num: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub family_member: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub amount: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub category: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: String,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::TransactionType => &self.transaction_type,
            Field::Date => &self.date,
            Field::Year => &self.year,
            Field::Month => &self.month,
            Field::MonthNum => &self.month_num,
            Field::FamilyMember => &self.family_member,
            Field::Amount => &self.amount,
            Field::Category => &self.category,
            Field::Description => &self.description,
        }
    }
}

/// A typed ledger entry. It can only be built from `FormFields` that passed validation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FormEntry {
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub year: i32,
    pub month: Month,
    pub family_member: String,
    pub amount: Amount,
    pub category: String,
    pub description: String,
}

impl FormEntry {
    /// The month number, 1-12, which always agrees with `month`.
    pub fn month_num(&self) -> u32 {
        self.month.number()
    }

    /// Converts back to the text form sent to the ledger service.
    pub fn to_fields(&self) -> FormFields {
        FormFields {
            transaction_type: self.transaction_type.to_string(),
            date: self.date.format(crate::model::wire::FORM_DATE_FORMAT).to_string(),
            year: self.year.to_string(),
            month: self.month.to_string(),
            month_num: self.month_num().to_string(),
            family_member: self.family_member.clone(),
            amount: self.amount.to_string(),
            category: self.category.clone(),
            description: self.description.clone(),
        }
    }
}

impl TryFrom<&FormFields> for FormEntry {
    type Error = crate::Error;

    fn try_from(fields: &FormFields) -> Result<Self> {
        let report = crate::validate::validate(fields);
        if !report.is_valid() {
            bail!("{}", report.message());
        }
        let transaction_type = fields
            .transaction_type
            .parse::<TransactionType>()
            .context("Unknown transaction type")?;
        let date = parse_form_date(&fields.date).context("Invalid date")?;
        let year = fields.year.trim().parse().context("Invalid year")?;
        let month = Month::from_name(fields.month.trim()).context("Invalid month")?;
        let amount = fields
            .amount
            .parse::<Amount>()
            .map_err(|e| anyhow::anyhow!("Invalid amount: {e}"))?;
        Ok(Self {
            transaction_type,
            date,
            year,
            month,
            family_member: fields.family_member.trim().to_string(),
            amount,
            category: fields.category.clone(),
            description: fields.description.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> FormFields {
        FormFields {
            transaction_type: "Monthly Dues".into(),
            date: "2024-03-15".into(),
            year: "2024".into(),
            month: "March".into(),
            month_num: "3".into(),
            family_member: " Kofi ".into(),
            amount: "25.00".into(),
            category: "Regular Monthly Dues".into(),
            description: "March dues".into(),
        }
    }

    #[test]
    fn test_form_data_json_shape() {
        let json = serde_json::to_value(fields()).unwrap();
        assert_eq!(json["transactionType"], "Monthly Dues");
        assert_eq!(json["monthNum"], "3");
        assert_eq!(json["familyMember"], " Kofi ");
        assert_eq!(json.as_object().unwrap().len(), 9);
    }

    #[test]
    fn test_form_data_accepts_numbers() {
        let json = r#"{"year": 2024, "monthNum": 3, "amount": 12.5}"#;
        let f: FormFields = serde_json::from_str(json).unwrap();
        assert_eq!(f.year, "2024");
        assert_eq!(f.month_num, "3");
        assert_eq!(f.amount, "12.5");
        assert_eq!(f.category, "");
    }

    #[test]
    fn test_entry_from_valid_fields() {
        let entry = FormEntry::try_from(&fields()).unwrap();
        assert_eq!(entry.transaction_type, TransactionType::MonthlyDues);
        assert_eq!(entry.month_num(), 3);
        assert_eq!(entry.family_member, "Kofi");
        let back = entry.to_fields();
        assert_eq!(back.date, "2024-03-15");
        assert_eq!(back.amount, "25.00");
    }

    #[test]
    fn test_entry_from_invalid_fields() {
        let mut f = fields();
        f.amount = "0".into();
        let e = FormEntry::try_from(&f).unwrap_err();
        assert!(e.to_string().contains("Valid amount greater than 0 is required"));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(Field::MonthNum.to_string(), "monthNum");
        assert_eq!("transactionType".parse::<Field>().unwrap(), Field::TransactionType);
        assert_eq!(Field::MonthNum.label(), "Month Number");
    }
}
