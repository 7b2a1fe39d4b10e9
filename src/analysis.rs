//! Mock skin analysis.
//!
//! Stands in for the image analysis backend: given an optional image
//! reference it produces a fresh [`AnalysisRecord`] with a fixed set of mild
//! findings and recommendations drawn from a static table. No image is ever
//! read.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::model::{AnalysisRecord, DetectedCondition, OverallHealth, Severity, SkinType};

/// Maximum number of recommendations attached to one analysis.
pub const MAX_RECOMMENDATIONS: usize = 6;

const ACNE: &[&str] = &[
    "Use salicylic acid or benzoyl peroxide cleansers",
    "Apply non-comedogenic moisturizers",
    "Consider retinoid treatments for persistent cases",
    "Maintain consistent skincare routine",
];

const ROSACEA: &[&str] = &[
    "Use gentle, fragrance-free products",
    "Apply broad-spectrum SPF daily",
    "Avoid known triggers (spicy foods, alcohol, extreme temperatures)",
    "Consider anti-inflammatory ingredients like niacinamide",
];

const WRINKLES: &[&str] = &[
    "Incorporate retinol or retinoids into routine",
    "Use peptide-rich moisturizers",
    "Apply vitamin C serum for antioxidant protection",
    "Never skip sunscreen to prevent further damage",
];

const HYPERPIGMENTATION: &[&str] = &[
    "Use vitamin C and kojic acid serums",
    "Apply broad-spectrum SPF 30+ daily",
    "Consider chemical exfoliants (glycolic acid)",
    "Be consistent with treatment for 6-12 weeks",
];

const DRYNESS: &[&str] = &[
    "Use ceramide and hyaluronic acid moisturizers",
    "Apply face oils for extra hydration",
    "Use gentle, cream-based cleansers",
    "Consider overnight hydrating masks",
];

const GENERAL: &[&str] = &[
    "Maintain a consistent daily skincare routine",
    "Consult with a dermatologist for professional assessment",
    "Stay hydrated and maintain a healthy diet",
];

/// Recommendation list for a condition name, if the table has one.
pub fn recommendations_for(condition: &str) -> Option<&'static [&'static str]> {
    match condition {
        "Acne" => Some(ACNE),
        "Rosacea" => Some(ROSACEA),
        "Fine Lines & Wrinkles" => Some(WRINKLES),
        "Hyperpigmentation" => Some(HYPERPIGMENTATION),
        // Eczema shares the dryness regimen
        "Skin Dryness" | "Eczema" => Some(DRYNESS),
        _ => None,
    }
}

/// Build the recommendation list for a set of findings.
///
/// Per-condition advice comes first in finding order, then the general
/// advice. Duplicates keep their first position; the result is capped at
/// [`MAX_RECOMMENDATIONS`].
pub fn build_recommendations(conditions: &[DetectedCondition]) -> Vec<String> {
    let candidates = conditions
        .iter()
        .filter_map(|c| recommendations_for(&c.condition))
        .flatten()
        .chain(GENERAL.iter());

    let mut recommendations: Vec<String> = Vec::new();
    for candidate in candidates {
        if recommendations.len() == MAX_RECOMMENDATIONS {
            break;
        }
        if !recommendations.iter().any(|r| r == candidate) {
            recommendations.push(candidate.to_string());
        }
    }

    recommendations
}

fn mock_conditions() -> Vec<DetectedCondition> {
    vec![
        DetectedCondition {
            condition: "Eczema".to_string(),
            severity: Severity::Mild,
            confidence: 85.0,
            affected_area: "Cheeks".to_string(),
            description: "Mild atopic dermatitis with occasional dry patches and slight itching. \
                          Skin barrier function is mildly compromised."
                .to_string(),
        },
        DetectedCondition {
            condition: "Fine Lines & Wrinkles".to_string(),
            severity: Severity::Mild,
            confidence: 82.0,
            affected_area: "Around eyes".to_string(),
            description: "Early signs of aging with subtle expression lines. \
                          Collagen production remains relatively healthy."
                .to_string(),
        },
        DetectedCondition {
            condition: "Skin Dryness".to_string(),
            severity: Severity::Mild,
            confidence: 88.0,
            affected_area: "Full face".to_string(),
            description: "Mild dehydration with some areas feeling tight. \
                          Skin needs enhanced moisture retention."
                .to_string(),
        },
    ]
}

/// Produce a mock analysis for an image captured at `now`.
pub fn generate_mock_analysis(image_uri: Option<String>, now: DateTime<Utc>) -> AnalysisRecord {
    let conditions = mock_conditions();
    let recommendations = build_recommendations(&conditions);
    let skin_type = *SkinType::ALL
        .choose(&mut rand::thread_rng())
        .unwrap_or(&SkinType::Normal);

    AnalysisRecord {
        id: Uuid::new_v4().to_string(),
        timestamp: now,
        skin_type,
        overall_health: OverallHealth::Good,
        conditions,
        recommendations,
        image_uri,
    }
}
