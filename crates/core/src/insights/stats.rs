//! Statistical and formatting helpers shared by the analyzers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::employee::{EmployeeData, UNKNOWN_TERRITORY};

/// Mean, population variance and standard deviation of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticalMetrics {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl StatisticalMetrics {
    /// Returns `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / count;
        Some(Self { mean, variance, std_dev: variance.sqrt() })
    }

    /// Absolute z-score of `value`. Returns 0.0 when the sample has no spread.
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std_dev <= f64::EPSILON || !self.std_dev.is_finite() {
            return 0.0;
        }
        ((value - self.mean) / self.std_dev).abs()
    }
}

/// Whole-dollar amount with thousands separators, e.g. `$1,234,568`.
pub fn format_currency(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// `part / whole` as a rounded percentage; 0 when `whole` is not positive.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 || !whole.is_finite() || !part.is_finite() {
        return 0.0;
    }
    ((part / whole) * 100.0).round()
}

/// `(value - base) / base` as a rounded percentage; 0 when `base` is not positive.
pub fn percent_over(value: f64, base: f64) -> f64 {
    percent_of(value - base, base)
}

pub fn mean_sales(records: &[&EmployeeData]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|record| record.sales_value()).sum::<f64>() / records.len() as f64
}

/// Records sharing a key, in the order the key was first seen.
pub type Grouped<'a> = Vec<(&'a str, Vec<&'a EmployeeData>)>;

fn group_by<'a>(records: &'a [EmployeeData], key: impl Fn(&'a EmployeeData) -> &'a str) -> Grouped<'a> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Grouped<'a> = Vec::new();
    for record in records {
        let group_key = key(record);
        match index.get(group_key) {
            Some(&position) => groups[position].1.push(record),
            None => {
                index.insert(group_key, groups.len());
                groups.push((group_key, vec![record]));
            }
        }
    }
    groups
}

pub fn group_by_employee(records: &[EmployeeData]) -> Grouped<'_> {
    group_by(records, |record| record.employee_id().as_str())
}

/// Groups by state, then territory, then `Unknown`.
pub fn group_by_territory(records: &[EmployeeData]) -> Grouped<'_> {
    group_by(records, |record| {
        [record.state.as_str(), record.territory.as_str()]
            .into_iter()
            .find(|candidate| !candidate.trim().is_empty())
            .unwrap_or(UNKNOWN_TERRITORY)
    })
}

/// `<prefix>-<hash>` where the hash is derived only from `seed`.
pub fn generate_id(prefix: &str, seed: &str) -> String {
    format!("{prefix}-{}", simple_hash(seed))
}

/// 32-bit shift-and-subtract string hash over UTF-16 code units, rendered in base 36.
pub fn simple_hash(input: &str) -> String {
    let hash = input.encode_utf16().fold(0_i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    });
    to_base36(i64::from(hash).unsigned_abs())
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
