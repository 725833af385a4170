//! The two entry forms of the client, create and edit, and the rules that keep their fields in
//! sync while the user changes them.
//!
//! The form carries the date four times: as a calendar date, a year, a month name and a month
//! number. Whenever the date or the month changes, the other representations are overwritten from
//! it. A value that cannot be understood (e.g. month number `13`) is stored as typed and leaves
//! the other fields alone; the validator reports it later.

use crate::model::{categories_for, parse_form_date, FormFields, Month};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Selects one of the two independent form instances.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormInstance {
    Create,
    Edit,
}

serde_plain::derive_display_from_serialize!(FormInstance);
serde_plain::derive_fromstr_from_deserialize!(FormInstance);

/// One entry form: its current raw values plus the category choices for the selected type.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Form {
    instance: FormInstance,
    fields: FormFields,
    category_options: &'static [&'static str],
}

impl Form {
    /// Creates a blank form dated `today`.
    pub fn new(instance: FormInstance, today: NaiveDate) -> Self {
        let mut form = Self {
            instance,
            fields: FormFields::default(),
            category_options: &[],
        };
        form.set_date(today.format(crate::model::FORM_DATE_FORMAT).to_string());
        form
    }

    pub fn instance(&self) -> FormInstance {
        self.instance
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// The categories that can currently be picked, which depend on the transaction type.
    pub fn category_options(&self) -> &'static [&'static str] {
        self.category_options
    }

    /// Clears every value and dates the form `today`.
    pub fn reset(&mut self, today: NaiveDate) {
        *self = Form::new(self.instance, today);
    }

    /// Sets the calendar date (`YYYY-MM-DD`) and, when it parses, overwrites year, month and month
    /// number from it.
    pub fn set_date(&mut self, value: impl Into<String>) {
        self.fields.date = value.into();
        match parse_form_date(&self.fields.date) {
            Some(date) => {
                // from_number cannot fail for chrono's 1-12 month
                if let Some(month) = Month::from_number(date.month()) {
                    self.fields.year = date.year().to_string();
                    self.fields.month = month.to_string();
                    self.fields.month_num = month.number().to_string();
                }
            }
            None => warn!(
                "{} form: date '{}' is not a YYYY-MM-DD date, year and month were left unchanged",
                self.instance, self.fields.date
            ),
        }
    }

    /// Sets the month name and, when it is one of the twelve months, overwrites the month number.
    pub fn set_month(&mut self, value: impl Into<String>) {
        self.fields.month = value.into();
        match Month::from_name(self.fields.month.trim()) {
            Some(month) => self.fields.month_num = month.number().to_string(),
            None => warn!(
                "{} form: month '{}' is not recognized, month number was left unchanged",
                self.instance, self.fields.month
            ),
        }
    }

    /// Sets the month number and, when it is 1-12, overwrites the month name.
    pub fn set_month_num(&mut self, value: impl Into<String>) {
        self.fields.month_num = value.into();
        match Month::from_number_str(&self.fields.month_num) {
            Some(month) => self.fields.month = month.to_string(),
            None => warn!(
                "{} form: month number '{}' is not 1-12, month was left unchanged",
                self.instance, self.fields.month_num
            ),
        }
    }

    pub fn set_year(&mut self, value: impl Into<String>) {
        self.fields.year = value.into();
    }

    /// Sets the transaction type and recomputes the category options. A selected category that the
    /// new type does not offer is cleared.
    pub fn set_transaction_type(&mut self, value: impl Into<String>) {
        self.fields.transaction_type = value.into();
        self.category_options = categories_for(self.fields.transaction_type.trim());
        if !self.category_options.contains(&self.fields.category.as_str()) {
            self.fields.category.clear();
        }
    }

    /// Sets the category. This does not check the value against the options so that the validator
    /// can report a mismatch with the full list of choices.
    pub fn set_category(&mut self, value: impl Into<String>) {
        self.fields.category = value.into();
    }

    pub fn set_family_member(&mut self, value: impl Into<String>) {
        self.fields.family_member = value.into();
    }

    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.fields.amount = value.into();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.fields.description = value.into();
    }

    /// Replaces every value with `fields`. The transaction type is applied before the category so
    /// that the category options exist when the category is selected.
    pub fn populate(&mut self, fields: FormFields) {
        let FormFields {
            transaction_type,
            date,
            year,
            month,
            month_num,
            family_member,
            amount,
            category,
            description,
        } = fields;
        self.fields.date = date;
        self.fields.year = year;
        self.fields.month = month;
        self.fields.month_num = month_num;
        self.fields.family_member = family_member;
        self.fields.amount = amount;
        self.fields.description = description;
        self.fields.category.clear();
        self.set_transaction_type(transaction_type);
        self.set_category(category);
    }
}

/// The create and edit forms. They share no state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Forms {
    create: Form,
    edit: Form,
}

impl Forms {
    /// Both forms dated today.
    pub fn new() -> Self {
        Self::new_dated(today())
    }

    pub fn new_dated(today: NaiveDate) -> Self {
        Self {
            create: Form::new(FormInstance::Create, today),
            edit: Form::new(FormInstance::Edit, today),
        }
    }

    pub fn get(&self, instance: FormInstance) -> &Form {
        match instance {
            FormInstance::Create => &self.create,
            FormInstance::Edit => &self.edit,
        }
    }

    pub fn get_mut(&mut self, instance: FormInstance) -> &mut Form {
        match instance {
            FormInstance::Create => &mut self.create,
            FormInstance::Edit => &mut self.edit,
        }
    }
}

impl Default for Forms {
    fn default() -> Self {
        Self::new()
    }
}

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
