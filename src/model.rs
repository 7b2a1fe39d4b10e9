//! Data models for Dermtrack.
//!
//! Every type here is plain data. Records are produced by an analysis source
//! (see [`crate::analysis`]), persisted by [`crate::storage`], held by
//! [`crate::repository`] and summarised by [`crate::stats`].
//!
//! JSON field names are camelCase so the persisted history keeps the same
//! layout as the mobile client that reads it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Skin type classification of a single analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinType {
    Oily,
    Dry,
    Combination,
    Sensitive,
    Normal,
}

impl SkinType {
    /// All skin types, in display order.
    pub const ALL: [SkinType; 5] = [
        SkinType::Oily,
        SkinType::Dry,
        SkinType::Combination,
        SkinType::Sensitive,
        SkinType::Normal,
    ];
}

/// Overall skin health verdict.
///
/// Variants are declared worst-first so the derived ordering matches
/// severity: `Poor < Fair < Good < Excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallHealth {
    Poor,
    Fair,
    Good,
    Excellent,
}

/// Severity of a single detected condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Numeric score used for trend comparison (mild=1, moderate=2, severe=3).
    pub fn score(self) -> u32 {
        match self {
            Severity::Mild => 1,
            Severity::Moderate => 2,
            Severity::Severe => 3,
        }
    }
}

/// One finding within an [`AnalysisRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedCondition {
    /// Condition name as reported by the analysis source (free text).
    pub condition: String,

    pub severity: Severity,

    /// Confidence score in the range `[0, 100]`.
    pub confidence: f64,

    /// Location label such as "T-zone" or "Cheeks".
    pub affected_area: String,

    pub description: String,
}

/// One completed skin analysis.
///
/// Records are immutable once created: the repository only ever adds or
/// deletes whole records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    /// Unique identifier assigned by the producer.
    pub id: String,

    /// When the analysis was performed (UTC, serialized as RFC 3339).
    pub timestamp: DateTime<Utc>,

    pub skin_type: SkinType,

    pub overall_health: OverallHealth,

    /// Findings in display order. Empty means nothing was found.
    #[serde(default)]
    pub conditions: Vec<DetectedCondition>,

    /// Recommendations in display order.
    #[serde(default)]
    pub recommendations: Vec<String>,

    /// Opaque reference to the analysed image; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
}

/// Reasons a submitted [`AnalysisRecord`] is refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("condition '{condition}' has confidence {confidence}, expected 0 to 100")]
    ConfidenceOutOfRange { condition: String, confidence: f64 },
}

impl AnalysisRecord {
    /// Check a record coming from an external producer.
    ///
    /// Every confidence must be a finite number in `0..=100`. Repeated
    /// recommendations are dropped, keeping the first occurrence. Ids are
    /// not checked here.
    pub fn normalized(mut self) -> Result<Self, RecordError> {
        if let Some(bad) = self
            .conditions
            .iter()
            .find(|c| !(0.0..=100.0).contains(&c.confidence))
        {
            return Err(RecordError::ConfidenceOutOfRange {
                condition: bad.condition.clone(),
                confidence: bad.confidence,
            });
        }

        let mut seen: Vec<String> = Vec::with_capacity(self.recommendations.len());
        self.recommendations.retain(|r| {
            if seen.contains(r) {
                false
            } else {
                seen.push(r.clone());
                true
            }
        });

        Ok(self)
    }
}

/// Direction of the user's skin health between the two newest analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementTrend {
    Improving,
    Stable,
    Declining,
}

impl ImprovementTrend {
    /// Human-readable label shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            ImprovementTrend::Improving => "Improving",
            ImprovementTrend::Stable => "Stable",
            ImprovementTrend::Declining => "Needs Attention",
        }
    }
}

/// Summary statistics derived from the current analysis history.
///
/// Never persisted; always recomputed from the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_scans: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_scan_date: Option<DateTime<Utc>>,

    /// Distinct condition names in first-seen order.
    pub conditions_tracked: Vec<String>,

    pub improvement_trend: ImprovementTrend,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_scans: 0,
            latest_scan_date: None,
            conditions_tracked: Vec::new(),
            improvement_trend: ImprovementTrend::Stable,
        }
    }
}

/// One point of the dashboard severity history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityPoint {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Average severity score rounded to two decimals (0 when clear).
    pub severity: f64,
    pub condition_count: usize,
    pub overall_health: OverallHealth,
}

/// Response for GET /stats.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: UserStats,

    /// Dashboard label for `improvement_trend`.
    pub trend_label: &'static str,
}

/// One entry of the dashboard's recent analysis summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAnalysis {
    #[serde(flatten)]
    pub analysis: AnalysisRecord,

    /// Relative age such as "Yesterday" or "3 weeks ago".
    pub time_ago: String,
}

/// Response for POST /analyses/reload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub analyses: Vec<AnalysisRecord>,
    pub user_stats: UserStats,
}

/// Request body for POST /scans.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    /// Reference to the captured or uploaded image.
    #[serde(default)]
    pub image_uri: Option<String>,
}

/// Query parameters for list endpoints.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}
