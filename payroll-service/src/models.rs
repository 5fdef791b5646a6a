//! Payroll models
//!
//! Domain models for employees and daily time records. Field names
//! serialize the way the document store spells them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parse a date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// A timestamp keeps the calendar date of its own offset; time of day is dropped.
pub fn parse_store_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Parse a clock time given as a naive `YYYY-MM-DDTHH:MM:SS` or an RFC 3339 timestamp.
///
/// A timestamp is read as wall-clock time in its own offset.
pub fn parse_store_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    value
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_local()))
}

/// Deserializers for date fields the store writes as full timestamps
mod store_format {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn work_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        super::parse_store_date(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid work date: {}", value)))
    }

    pub fn clock_time<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|value| {
                super::parse_store_datetime(&value)
                    .ok_or_else(|| D::Error::custom(format!("invalid clock time: {}", value)))
            })
            .transpose()
    }
}

/// An employee document as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(alias = "$id")]
    pub id: String,
    #[serde(rename = "userID")]
    pub owner_id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub position: String,
    /// Current daily rate. Only copied onto new time records, never read by payroll.
    #[serde(rename = "dailyRate")]
    pub daily_rate: f64,
}

/// Payload for creating an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    #[serde(rename = "userID")]
    pub owner_id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub position: String,
    #[serde(rename = "dailyRate")]
    pub daily_rate: f64,
}

impl NewEmployee {
    pub fn new(
        owner_id: impl Into<String>,
        full_name: impl Into<String>,
        position: impl Into<String>,
        daily_rate: f64,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            full_name: full_name.into(),
            position: position.into(),
            daily_rate,
        }
    }
}

/// Daily time record for one employee on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRecord {
    #[serde(alias = "$id")]
    pub id: String,
    #[serde(rename = "employeeID")]
    pub employee_id: String,
    #[serde(rename = "userID")]
    pub owner_id: String,
    #[serde(rename = "workDate", deserialize_with = "store_format::work_date")]
    pub work_date: NaiveDate,
    #[serde(rename = "clockIn", default, deserialize_with = "store_format::clock_time")]
    pub clock_in: Option<NaiveDateTime>,
    #[serde(rename = "clockOut", default, deserialize_with = "store_format::clock_time")]
    pub clock_out: Option<NaiveDateTime>,
    /// Daily rate captured when the record was created
    #[serde(rename = "dailyRate")]
    pub daily_rate: f64,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request to create a time record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTimeRecord {
    #[serde(rename = "employeeID")]
    pub employee_id: String,
    #[serde(rename = "userID")]
    pub owner_id: String,
    #[serde(rename = "workDate")]
    pub work_date: NaiveDate,
    #[serde(rename = "clockIn")]
    pub clock_in: NaiveDateTime,
    #[serde(rename = "clockOut")]
    pub clock_out: NaiveDateTime,
    #[serde(rename = "dailyRate")]
    pub daily_rate: f64,
}

impl NewTimeRecord {
    /// Build a creation request carrying the employee's current rate as the snapshot
    pub fn snapshot(
        employee: &Employee,
        work_date: NaiveDate,
        clock_in: NaiveDateTime,
        clock_out: NaiveDateTime,
    ) -> Self {
        Self {
            employee_id: employee.id.clone(),
            owner_id: employee.owner_id.clone(),
            work_date,
            clock_in,
            clock_out,
            daily_rate: employee.daily_rate,
        }
    }

    /// Materialize the stored record under the given id
    pub fn into_record(self, id: String) -> TimeRecord {
        TimeRecord {
            id,
            employee_id: self.employee_id,
            owner_id: self.owner_id,
            work_date: self.work_date,
            clock_in: Some(self.clock_in),
            clock_out: Some(self.clock_out),
            daily_rate: self.daily_rate,
            created_at: None,
        }
    }
}

/// Inclusive work-date filter for time record queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    Any,
    On(NaiveDate),
    Between(NaiveDate, NaiveDate),
}

impl DateFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            DateFilter::Any => true,
            DateFilter::On(day) => date == day,
            DateFilter::Between(start, end) => date >= start && date <= end,
        }
    }
}

/// Query over time records: employee equality plus a work-date filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRecordQuery {
    pub employee_id: String,
    pub work_date: DateFilter,
}

impl TimeRecordQuery {
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            work_date: DateFilter::Any,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.work_date = DateFilter::On(date);
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.work_date = DateFilter::Between(start, end);
        self
    }

    pub fn matches(&self, record: &TimeRecord) -> bool {
        record.employee_id == self.employee_id && self.work_date.matches(record.work_date)
    }
}
