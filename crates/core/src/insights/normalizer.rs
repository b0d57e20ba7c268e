//! Raw employee documents and their normalization into [`EmployeeData`].

use std::fmt;

use chrono::Utc;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::domain::employee::{EmployeeData, EmployeeId, UNKNOWN_TERRITORY};
use crate::errors::DomainError;
use crate::insights::seasonality::month_key_from;
use crate::insights::settings::CurrentMonthRule;

/// Employee document as stored by the upstream document store.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawEmployeeDocument {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub location: Option<RawLocation>,
    #[serde(default)]
    pub yearly_target: Option<f64>,
    #[serde(default)]
    pub sales: Option<RawSales>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawSales {
    #[serde(default)]
    pub monthly: Option<MonthlyLedger>,
    #[serde(default)]
    pub yearly_target: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct MonthlyFigures {
    #[serde(default)]
    pub sold: Option<f64>,
    #[serde(default)]
    pub target: Option<f64>,
}

/// Month key to figures, in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonthlyLedger(Vec<(String, MonthlyFigures)>);

impl MonthlyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, or replaces the figures of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, figures: MonthlyFigures) {
        let key = key.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = figures,
            None => self.0.push((key, figures)),
        }
    }

    pub fn with_month(mut self, key: impl Into<String>, sold: f64, target: f64) -> Self {
        self.insert(key, MonthlyFigures { sold: Some(sold), target: Some(target) });
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &MonthlyFigures)> {
        self.0.iter().map(|(key, figures)| (key.as_str(), figures))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for MonthlyLedger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LedgerVisitor;

        impl<'de> Visitor<'de> for LedgerVisitor {
            type Value = MonthlyLedger;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of month keys to sold/target figures")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut ledger = MonthlyLedger::new();
                while let Some((key, figures)) =
                    map.next_entry::<String, Option<MonthlyFigures>>()?
                {
                    ledger.insert(key, figures.unwrap_or_default());
                }
                Ok(ledger)
            }
        }

        deserializer.deserialize_map(LedgerVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SalesFigures {
    monthly_sales: f64,
    monthly_target: f64,
    yearly_sales: f64,
    yearly_target: f64,
}

const NO_SALES: SalesFigures =
    SalesFigures { monthly_sales: 0.0, monthly_target: 0.0, yearly_sales: 0.0, yearly_target: 0.0 };

/// Converts raw documents into uniform records. Stateless apart from the month rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    rule: CurrentMonthRule,
}

impl Normalizer {
    pub fn new(rule: CurrentMonthRule) -> Self {
        Self { rule }
    }

    pub fn normalize(&self, document: &RawEmployeeDocument) -> Result<EmployeeData, DomainError> {
        let id = document.id.trim();
        if id.is_empty() {
            return Err(DomainError::InvalidRecord {
                record: display_name(document),
                reason: "document id is blank".to_string(),
            });
        }

        let city = document
            .location
            .as_ref()
            .and_then(|location| location.city.clone())
            .unwrap_or_default();
        let state = document
            .location
            .as_ref()
            .and_then(|location| location.state.clone())
            .unwrap_or_default();
        let territory =
            if state.trim().is_empty() { UNKNOWN_TERRITORY.to_string() } else { state.clone() };
        let figures = self.extract_sales(document);

        Ok(EmployeeData {
            id: EmployeeId(id.to_string()),
            first_name: document.first_name.clone().unwrap_or_default(),
            last_name: document.last_name.clone().unwrap_or_default(),
            city,
            state,
            territory,
            tier: document.role.as_deref().and_then(tier_from_role),
            monthly_sales: figures.monthly_sales,
            monthly_target: figures.monthly_target,
            yearly_sales: figures.yearly_sales,
            yearly_target: figures.yearly_target,
            amount: figures.monthly_sales,
            date: Utc::now(),
        })
    }

    /// Normalizes every valid document, skipping the ones that cannot be.
    pub fn normalize_all(&self, documents: &[RawEmployeeDocument]) -> Vec<EmployeeData> {
        documents
            .iter()
            .filter_map(|document| match self.normalize(document) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(
                        event_name = "insights.normalizer.skipped",
                        error = %error,
                        "skipping employee document"
                    );
                    None
                }
            })
            .collect()
    }

    fn extract_sales(&self, document: &RawEmployeeDocument) -> SalesFigures {
        let Some(sales) = document.sales.as_ref() else {
            return NO_SALES;
        };
        let Some(ledger) = sales.monthly.as_ref().filter(|ledger| !ledger.is_empty()) else {
            return NO_SALES;
        };

        let yearly_sales: f64 = ledger.entries().map(|(_, figures)| amount(figures.sold)).sum();
        let summed_targets: f64 = ledger.entries().map(|(_, figures)| amount(figures.target)).sum();
        let explicit_target = amount(sales.yearly_target.or(document.yearly_target));
        let current = self.current_entry(ledger).copied().unwrap_or_default();

        SalesFigures {
            monthly_sales: amount(current.sold),
            monthly_target: amount(current.target),
            yearly_sales,
            yearly_target: if explicit_target > 0.0 { explicit_target } else { summed_targets },
        }
    }

    fn current_entry<'a>(&self, ledger: &'a MonthlyLedger) -> Option<&'a MonthlyFigures> {
        let last_key = || ledger.entries().last().map(|(_, figures)| figures);
        match self.rule {
            CurrentMonthRule::LastKey => last_key(),
            CurrentMonthRule::LatestCalendarMonth => ledger
                .entries()
                .filter_map(|(key, figures)| month_key_from(key).map(|month| (month, figures)))
                // last of equal months wins, e.g. `mar` followed by `march`
                .max_by_key(|(month, _)| *month)
                .map(|(_, figures)| figures)
                .or_else(last_key),
        }
    }
}

/// Non-negative finite amount; anything else counts as zero.
fn amount(value: Option<f64>) -> f64 {
    value.filter(|value| value.is_finite() && *value > 0.0).unwrap_or(0.0)
}

fn tier_from_role(role: &str) -> Option<String> {
    let role = role.trim();
    let tier = role.strip_prefix("Sales - ").unwrap_or(role).trim();
    (!tier.is_empty()).then(|| tier.to_string())
}

fn display_name(document: &RawEmployeeDocument) -> String {
    let name = format!(
        "{} {}",
        document.first_name.as_deref().unwrap_or_default(),
        document.last_name.as_deref().unwrap_or_default()
    );
    let name = name.trim();
    if name.is_empty() {
        "<unnamed>".to_string()
    } else {
        name.to_string()
    }
}
