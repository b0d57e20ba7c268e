use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Territory key used when a record carries no state.
pub const UNKNOWN_TERRITORY: &str = "Unknown";

/// One normalized employee record as consumed by the analyzers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmployeeData {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub state: String,
    pub territory: String,
    /// Sales cohort taken from the source `role` label, e.g. `Tier 2`.
    pub tier: Option<String>,
    pub monthly_sales: f64,
    pub monthly_target: f64,
    pub yearly_sales: f64,
    pub yearly_target: f64,
    /// Mirrors `monthly_sales`; older call sites read this field.
    pub amount: f64,
    /// When the record was materialized, not a business date.
    pub date: DateTime<Utc>,
}

impl EmployeeData {
    pub fn employee_id(&self) -> &EmployeeId {
        &self.id
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Current-month sales, falling back to `amount` when the monthly figure is unset.
    pub fn sales_value(&self) -> f64 {
        if self.monthly_sales != 0.0 && self.monthly_sales.is_finite() {
            self.monthly_sales
        } else if self.amount.is_finite() {
            self.amount
        } else {
            0.0
        }
    }

    pub fn target_value(&self) -> f64 {
        if self.monthly_target.is_finite() {
            self.monthly_target
        } else {
            0.0
        }
    }

    pub fn has_target(&self) -> bool {
        self.target_value() > 0.0
    }
}
