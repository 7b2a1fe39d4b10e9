//! Statistics derived from the analysis history.
//!
//! Everything here is a pure function of a newest-first record slice. The
//! repository reruns [`compute_user_stats`] after every change, so nothing
//! is cached.

use chrono::{DateTime, Utc};

use crate::model::{
    AnalysisRecord, DetectedCondition, ImprovementTrend, RecentAnalysis, SeverityPoint, UserStats,
};

/// Number of analyses shown in the dashboard severity history.
pub const DEFAULT_HISTORY_POINTS: usize = 6;

/// Number of analyses in the dashboard's recent summary.
pub const DEFAULT_RECENT_ANALYSES: usize = 3;

/// Compute summary statistics for `records`.
///
/// `records` must be newest-first: the latest scan date and the trend are
/// read from the first two entries.
pub fn compute_user_stats(records: &[AnalysisRecord]) -> UserStats {
    let mut conditions_tracked: Vec<String> = Vec::new();
    for condition in records.iter().flat_map(|r| &r.conditions) {
        if !conditions_tracked.contains(&condition.condition) {
            conditions_tracked.push(condition.condition.clone());
        }
    }

    UserStats {
        total_scans: records.len(),
        latest_scan_date: records.first().map(|r| r.timestamp),
        conditions_tracked,
        improvement_trend: improvement_trend(records),
    }
}

/// Mean severity score of `conditions`, or 0 when there are none.
pub fn average_severity(conditions: &[DetectedCondition]) -> f64 {
    if conditions.is_empty() {
        return 0.0;
    }

    let total: u32 = conditions.iter().map(|c| c.severity.score()).sum();
    f64::from(total) / conditions.len() as f64
}

/// Compare the two newest analyses.
///
/// This is deliberately a two-point comparison, not a fitted trend line.
pub fn improvement_trend(records: &[AnalysisRecord]) -> ImprovementTrend {
    let [recent, previous, ..] = records else {
        return ImprovementTrend::Stable;
    };

    let recent_score = average_severity(&recent.conditions);
    let previous_score = average_severity(&previous.conditions);

    if recent_score < previous_score {
        ImprovementTrend::Improving
    } else if recent_score > previous_score {
        ImprovementTrend::Declining
    } else {
        ImprovementTrend::Stable
    }
}

/// Severity history of the `limit` newest analyses, oldest first.
pub fn severity_history(records: &[AnalysisRecord], limit: usize) -> Vec<SeverityPoint> {
    records
        .iter()
        .take(limit)
        .rev()
        .map(|r| SeverityPoint {
            id: r.id.clone(),
            timestamp: r.timestamp,
            severity: (average_severity(&r.conditions) * 100.0).round() / 100.0,
            condition_count: r.conditions.len(),
            overall_health: r.overall_health,
        })
        .collect()
}

/// The `limit` newest analyses, each labelled with its age relative to `now`.
pub fn recent_summaries(
    records: &[AnalysisRecord],
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<RecentAnalysis> {
    records
        .iter()
        .take(limit)
        .map(|r| RecentAnalysis {
            time_ago: time_ago(r.timestamp, now),
            analysis: r.clone(),
        })
        .collect()
}

/// Relative age label for an analysis timestamp.
///
/// Works in whole elapsed days, with 30-day months and 365-day years.
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - timestamp).num_days();

    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        7..=29 => format!("{} weeks ago", days / 7),
        30..=364 => format!("{} months ago", days / 30),
        _ => format!("{} years ago", days / 365),
    }
}
