//! United Kingdom recognizers

use super::validators;
use super::PatternRecognizer;
use crate::catalog::RecognizerId;
use crate::error::Result;

/// NHS number
pub fn nhs() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::UkNhs, "UK_NHS")
        .pattern("NHS (medium)", r"\b\d{3}[- ]?\d{3}[- ]?\d{4}\b", 0.5)?
        .context(&[
            "national health service",
            "nhs",
            "health services authority",
            "health authority",
        ])
        .validator(|value| Some(validators::uk_nhs(value))))
}

/// National Insurance number
pub fn nino() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::UkNino, "UK_NINO")
        .pattern(
            "NINO (medium)",
            r"\b[A-CEGHJ-PR-TW-Z][A-CEGHJ-NPR-TW-Z] ?\d{2} ?\d{2} ?\d{2} ?[A-D]\b",
            0.5,
        )?
        .context(&["national insurance", "ni number", "nino"])
        .validator(validate_nino))
}

fn validate_nino(value: &str) -> Option<bool> {
    let prefix: String = value.chars().take(2).collect();
    if matches!(prefix.as_str(), "BG" | "GB" | "NK" | "KN" | "NT" | "TN" | "ZZ") {
        return Some(false);
    }
    None
}
