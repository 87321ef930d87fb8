//! Defines the core data model for expenses.

use serde::{Deserialize, Serialize};
use time::Date;

/// A single expense entry, i.e. money spent on a given day.
///
/// Expenses have no ID. Two expenses with the same date, description and
/// amount are indistinguishable and are removed together, see [Expense::matches].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The day the money was spent, written as `YYYY-MM-DD`.
    #[serde(with = "date_format")]
    pub date: Date,
    /// A text description of what the money was spent on.
    pub description: String,
    /// The amount of money spent.
    ///
    /// No validation is done, zero and negative amounts are accepted.
    pub amount: f64,
}

impl Expense {
    /// Create a new expense.
    pub fn new(date: Date, description: &str, amount: f64) -> Self {
        Self {
            date,
            description: description.to_owned(),
            amount,
        }
    }

    /// Whether this expense has exactly the given date, description and amount.
    ///
    /// `amount` is compared with `==`, there is no tolerance for rounding.
    pub fn matches(&self, date: Date, description: &str, amount: f64) -> bool {
        self.date == date && self.description == description && self.amount == amount
    }
}

/// Serde helpers for writing dates as `YYYY-MM-DD`.
///
/// Reading is lenient about the day of the month: any day from 1 to 31 is
/// accepted and clamped to the last day of the month, so `2023-02-30` reads
/// as 2023-02-28. Anything that is not `YYYY-MM-DD` is rejected.
mod date_format {
    use serde::{Deserialize, Deserializer, Serializer, de, ser};
    use time::{
        Date, format_description::BorrowedFormatItem, macros::format_description,
        parsing::Parsed,
    };

    const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = date.format(DATE_FORMAT).map_err(ser::Error::custom)?;

        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;

        parse_date(&text).map_err(|error| {
            de::Error::custom(format!(
                "could not parse \"{text}\" as a YYYY-MM-DD date: {error}"
            ))
        })
    }

    pub(super) fn parse_date(text: &str) -> Result<Date, String> {
        let mut parsed = Parsed::new();
        let remaining = parsed
            .parse_items(text.as_bytes(), DATE_FORMAT)
            .map_err(|error| error.to_string())?;

        if !remaining.is_empty() {
            return Err("unexpected trailing characters".to_owned());
        }

        let (Some(year), Some(month), Some(day)) = (parsed.year(), parsed.month(), parsed.day())
        else {
            return Err("missing year, month or day".to_owned());
        };

        if day.get() > 31 {
            return Err("day was not in range".to_owned());
        }

        (1..=day.get())
            .rev()
            .find_map(|day| Date::from_calendar_date(year, month, day).ok())
            .ok_or_else(|| "date was not in range".to_owned())
    }
}
