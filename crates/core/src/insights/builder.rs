//! Fluent construction of [`SalesInsight`] values with content-derived ids.
//!
//! The id is `<prefix>-<hash>` where the hash covers only the identity fields
//! the builder was created with. Running the analyzers twice over unchanged
//! data therefore yields insights with the same ids.

use chrono::Utc;

use crate::domain::employee::EmployeeId;
use crate::domain::insight::{InsightData, InsightType, SalesInsight, Severity};
use crate::errors::DomainError;
use crate::insights::stats::generate_id;

/// Fields that contribute to an insight's id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentityField {
    Type,
    Severity,
    Title,
    Impact,
    EmployeeId,
    Territory,
}

/// Identity fields in seed order.
pub const DEFAULT_IDENTITY: &[IdentityField] = &[
    IdentityField::Type,
    IdentityField::Severity,
    IdentityField::Title,
    IdentityField::Impact,
    IdentityField::EmployeeId,
    IdentityField::Territory,
];

#[derive(Debug, Clone)]
pub struct InsightBuilder {
    prefix: String,
    identity: &'static [IdentityField],
    insight_type: Option<InsightType>,
    severity: Option<Severity>,
    title: Option<String>,
    description: String,
    impact: u8,
    impact_seed: Option<String>,
    confidence: u8,
    actionable: bool,
    timeframe: String,
    data: InsightData,
    employee_id: Option<EmployeeId>,
    territory: Option<String>,
}

impl InsightBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_identity(prefix, DEFAULT_IDENTITY)
    }

    pub fn with_identity(prefix: impl Into<String>, identity: &'static [IdentityField]) -> Self {
        Self {
            prefix: prefix.into(),
            identity,
            insight_type: None,
            severity: None,
            title: None,
            description: String::new(),
            impact: 0,
            impact_seed: None,
            confidence: 0,
            actionable: false,
            timeframe: String::new(),
            data: InsightData::Empty,
            employee_id: None,
            territory: None,
        }
    }

    pub fn with_type(mut self, insight_type: InsightType) -> Self {
        self.insight_type = Some(insight_type);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Stores the rounded, clamped score; the raw value feeds the id seed.
    pub fn with_impact(mut self, impact: f64) -> Self {
        self.impact = clamp_score(impact);
        self.impact_seed = Some(impact.to_string());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_score(confidence);
        self
    }

    pub fn with_actionable(mut self, actionable: bool) -> Self {
        self.actionable = actionable;
        self
    }

    pub fn with_timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = timeframe.into();
        self
    }

    pub fn with_data(mut self, data: InsightData) -> Self {
        self.data = data;
        self
    }

    pub fn with_employee_id(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    pub fn with_territory(mut self, territory: impl Into<String>) -> Self {
        self.territory = Some(territory.into());
        self
    }

    /// Seed string from the identity fields set so far, or `None` if none were.
    pub fn seed(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .identity
            .iter()
            .filter_map(|field| match field {
                IdentityField::Type => self.insight_type.map(|value| value.as_str()),
                IdentityField::Severity => self.severity.map(|value| value.as_str()),
                IdentityField::Title => self.title.as_deref(),
                IdentityField::Impact => self.impact_seed.as_deref(),
                IdentityField::EmployeeId => self.employee_id.as_ref().map(EmployeeId::as_str),
                IdentityField::Territory => self.territory.as_deref(),
            })
            .collect();

        (!parts.is_empty()).then(|| parts.join("-"))
    }

    pub fn build(self) -> Result<SalesInsight, DomainError> {
        let created_at = Utc::now();
        let seed = self
            .seed()
            .unwrap_or_else(|| format!("{}-{}", self.prefix, created_at.timestamp_millis()));
        let id = generate_id(&self.prefix, &seed);

        Ok(SalesInsight {
            id,
            insight_type: self.insight_type.ok_or(DomainError::MissingInsightField("type"))?,
            severity: self.severity.ok_or(DomainError::MissingInsightField("severity"))?,
            title: self.title.ok_or(DomainError::MissingInsightField("title"))?,
            description: self.description,
            impact: self.impact,
            confidence: self.confidence,
            actionable: self.actionable,
            employee_id: self.employee_id,
            territory: self.territory,
            timeframe: self.timeframe,
            created_at,
            data: self.data,
        })
    }
}

/// Rounds to the nearest integer and clamps into `0..=100`. NaN maps to 0.
pub fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
