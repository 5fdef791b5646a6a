use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use payroll_service::display::DEFAULT_CURRENCY_SYMBOL;

/// Which report the driver produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Weekly,
    Payslip,
    Calendar,
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(ReportKind::Weekly),
            "payslip" => Ok(ReportKind::Payslip),
            "calendar" => Ok(ReportKind::Calendar),
            other => Err(format!("unknown report kind: {}", other)),
        }
    }
}

/// Report driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// JSON file holding employees and time records
    pub dataset_path: PathBuf,

    /// Owner account whose employees are reported on
    pub owner_id: String,

    pub kind: ReportKind,

    /// Employee for payslip and calendar reports
    pub employee_id: Option<String>,

    /// Inclusive range for payslip and calendar reports
    pub start_date: String,
    pub end_date: String,

    /// Any date inside the week for the weekly report
    pub week_of: String,

    pub currency_symbol: String,

    /// Service version
    pub version: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("./payroll.json"),
            owner_id: "owner-1".to_string(),
            kind: ReportKind::Weekly,
            employee_id: None,
            start_date: "2024-01-14".to_string(),
            end_date: "2024-01-20".to_string(),
            week_of: "2024-01-14".to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ReportConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ReportConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("DATASET_PATH") {
            config.dataset_path = PathBuf::from(path);
        }

        if let Some(owner) = lookup("OWNER_ID") {
            config.owner_id = owner;
        }

        if let Some(kind) = lookup("REPORT_KIND") {
            if let Ok(kind) = kind.parse() {
                config.kind = kind;
            }
        }

        if let Some(employee) = lookup("REPORT_EMPLOYEE") {
            if !employee.trim().is_empty() {
                config.employee_id = Some(employee);
            }
        }

        if let Some(start) = lookup("REPORT_START") {
            config.start_date = start;
        }

        if let Some(end) = lookup("REPORT_END") {
            config.end_date = end;
        }

        if let Some(week) = lookup("REPORT_WEEK") {
            config.week_of = week;
        }

        if let Some(symbol) = lookup("CURRENCY_SYMBOL") {
            if !symbol.is_empty() {
                config.currency_symbol = symbol;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.kind, ReportKind::Weekly);
        assert_eq!(config.currency_symbol, "₱");
        assert!(config.employee_id.is_none());
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DATASET_PATH", "/tmp/data.json"),
            ("REPORT_KIND", "Payslip"),
            ("REPORT_EMPLOYEE", "emp-1"),
            ("CURRENCY_SYMBOL", "$"),
        ]
        .into_iter()
        .collect();
        let config = ReportConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.dataset_path, PathBuf::from("/tmp/data.json"));
        assert_eq!(config.kind, ReportKind::Payslip);
        assert_eq!(config.employee_id.as_deref(), Some("emp-1"));
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.owner_id, "owner-1");
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ReportConfig::from_lookup(|key| match key {
            "REPORT_KIND" => Some("monthly".to_string()),
            "REPORT_EMPLOYEE" => Some("  ".to_string()),
            "CURRENCY_SYMBOL" => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.kind, ReportKind::Weekly);
        assert!(config.employee_id.is_none());
        assert_eq!(config.currency_symbol, "₱");
    }
}
