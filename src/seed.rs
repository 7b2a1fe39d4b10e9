//! Demo history used to populate a fresh install.
//!
//! The seed is ten analyses spanning July to November 2025, two per month,
//! showing a loosely improving trend. It is a pure function of nothing: every
//! call returns the same records in the same order.

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{AnalysisRecord, DetectedCondition, OverallHealth, Severity, SkinType};

/// Number of records produced by [`generate`].
pub const SEED_RECORD_COUNT: usize = 10;

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    // Only called with fixed calendar dates below
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn mild(condition: &str, confidence: f64, affected_area: &str, description: &str) -> DetectedCondition {
    DetectedCondition {
        condition: condition.to_string(),
        severity: Severity::Mild,
        confidence,
        affected_area: affected_area.to_string(),
        description: description.to_string(),
    }
}

fn seed_record(
    id: &str,
    timestamp: DateTime<Utc>,
    overall_health: OverallHealth,
    conditions: Vec<DetectedCondition>,
    recommendations: [&str; 3],
) -> AnalysisRecord {
    AnalysisRecord {
        id: id.to_string(),
        timestamp,
        skin_type: SkinType::Combination,
        overall_health,
        conditions,
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        image_uri: Some(format!("dummy://{}", id.trim_start_matches("dummy-").replace('-', ""))),
    }
}

/// Build the demo history, newest first.
pub fn generate() -> Vec<AnalysisRecord> {
    let mut records = Vec::with_capacity(SEED_RECORD_COUNT);

    // July
    records.push(seed_record(
        "dummy-july-1",
        seed_date(2025, 7, 8),
        OverallHealth::Good,
        vec![mild(
            "Mild Acne",
            85.0,
            "T-zone",
            "Small blackheads and whiteheads on forehead and nose area",
        )],
        [
            "Use salicylic acid cleanser",
            "Apply non-comedogenic moisturizer",
            "Use SPF 30 daily",
        ],
    ));
    records.push(seed_record(
        "dummy-july-2",
        seed_date(2025, 7, 22),
        OverallHealth::Fair,
        vec![
            mild(
                "Mild Acne",
                80.0,
                "T-zone",
                "Persistent blackheads with some inflammatory papules",
            ),
            mild("Dry Patches", 78.0, "cheeks", "Slight dryness on cheek areas"),
        ],
        [
            "Continue salicylic acid treatment",
            "Add hyaluronic acid serum",
            "Use gentle exfoliation weekly",
        ],
    ));

    // August
    records.push(seed_record(
        "dummy-aug-1",
        seed_date(2025, 8, 5),
        OverallHealth::Good,
        vec![mild(
            "Mild Acne",
            82.0,
            "forehead",
            "Reduced blackheads, treatment showing results",
        )],
        [
            "Continue current routine",
            "Consider vitamin C serum",
            "Maintain consistent SPF use",
        ],
    ));
    records.push(seed_record(
        "dummy-aug-2",
        seed_date(2025, 8, 19),
        OverallHealth::Excellent,
        vec![],
        [
            "Maintain current skincare routine",
            "Consider adding retinol for prevention",
            "Continue daily SPF protection",
        ],
    ));

    // September
    records.push(seed_record(
        "dummy-sep-1",
        seed_date(2025, 9, 3),
        OverallHealth::Excellent,
        vec![],
        [
            "Excellent progress!",
            "Continue prevention routine",
            "Monthly skin checks recommended",
        ],
    ));
    records.push(seed_record(
        "dummy-sep-2",
        seed_date(2025, 9, 17),
        OverallHealth::Good,
        vec![mild(
            "Minor Irritation",
            79.0,
            "chin",
            "Slight redness possibly from new product trial",
        )],
        [
            "Discontinue new products temporarily",
            "Use gentle, fragrance-free products",
            "Allow skin to recover",
        ],
    ));

    // October
    records.push(seed_record(
        "dummy-oct-1",
        seed_date(2025, 10, 1),
        OverallHealth::Good,
        vec![mild(
            "Seasonal Dryness",
            84.0,
            "cheeks",
            "Mild dryness due to changing weather conditions",
        )],
        [
            "Switch to richer moisturizer for fall",
            "Add facial oil to evening routine",
            "Use humidifier indoors",
        ],
    ));
    records.push(seed_record(
        "dummy-oct-2",
        seed_date(2025, 10, 15),
        OverallHealth::Excellent,
        vec![],
        [
            "Skin adapting well to seasonal changes",
            "Continue current winter prep routine",
            "Maintain consistent care",
        ],
    ));

    // November
    records.push(seed_record(
        "dummy-nov-1",
        seed_date(2025, 11, 5),
        OverallHealth::Good,
        vec![
            mild(
                "Seasonal Dryness",
                81.0,
                "cheeks",
                "Tightness returning with colder, drier air",
            ),
            mild("Minor Irritation", 76.0, "nose area", "Light redness around the nostrils"),
        ],
        [
            "Layer a ceramide moisturizer over serums",
            "Avoid hot water when cleansing",
            "Keep using a humidifier at night",
        ],
    ));
    records.push(seed_record(
        "dummy-nov-2",
        seed_date(2025, 11, 19),
        OverallHealth::Excellent,
        vec![],
        [
            "Winter routine is working well",
            "Keep applying SPF on overcast days",
            "Schedule a follow-up scan next month",
        ],
    ));

    records.reverse();
    records
}
