//! India recognizers

use super::validators::{self, digits};
use super::PatternRecognizer;
use crate::catalog::RecognizerId;
use crate::error::Result;

const STATE_CODES: &[&str] = &[
    "AN", "AP", "AR", "AS", "BR", "CG", "CH", "DD", "DL", "DN", "GA", "GJ", "HP", "HR", "JH",
    "JK", "KA", "KL", "LA", "LD", "MH", "ML", "MN", "MP", "MZ", "NL", "OD", "OR", "PB", "PY",
    "RJ", "SK", "TN", "TR", "TS", "UK", "UP", "WB",
];

/// Permanent Account Number
pub fn pan() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::InPan, "IN_PAN")
        .pattern(
            "PAN (High)",
            r"\b[A-Za-z]{3}[ABCFGHJLPTabcfghjlpt][A-Za-z]\d{4}[A-Za-z]\b",
            0.85,
        )?
        .pattern("PAN (Medium)", r"\b[A-Za-z]{5}\d{3,4}[A-Za-z]\b", 0.6)?
        .context(&["permanent account number", "pan"]))
}

/// Aadhaar number
pub fn aadhaar() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::InAadhaar, "IN_AADHAAR")
        .pattern("AADHAAR (Very Weak)", r"\b[2-9]\d{3}[ -]?\d{4}[ -]?\d{4}\b", 0.01)?
        .context(&["aadhaar", "uidai", "uid", "aadhar"])
        .validator(validate_aadhaar))
}

fn validate_aadhaar(value: &str) -> Option<bool> {
    let separators: Vec<char> = value.chars().filter(|c| !c.is_ascii_digit()).collect();
    if separators.windows(2).any(|w| w[0] != w[1]) {
        return Some(false);
    }
    let d = digits(value);
    let palindrome = d.iter().eq(d.iter().rev());
    Some(d.len() == 12 && !palindrome && validators::verhoeff(value))
}

/// Vehicle registration plate
pub fn vehicle_registration() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::InVehicleRegistration, "IN_VEHICLE_REGISTRATION")
        .pattern(
            "India Vehicle Registration",
            r"\b[A-Z]{2}[ -]?\d{1,2}[ -]?[A-Z]{1,3}[ -]?\d{4}\b",
            0.5,
        )?
        .pattern(
            "India Vehicle Registration (Bharat series)",
            r"\b\d{2}[ -]?BH[ -]?\d{4}[ -]?[A-Z]{1,2}\b",
            0.5,
        )?
        .context(&["rto", "vehicle", "plate", "registration", "number plate"])
        .validator(validate_vehicle_registration))
}

fn validate_vehicle_registration(value: &str) -> Option<bool> {
    let prefix: String = value.chars().take(2).collect();
    if prefix.chars().all(|c| c.is_ascii_digit()) {
        // Bharat series
        return None;
    }
    if STATE_CODES.contains(&prefix.as_str()) {
        None
    } else {
        Some(false)
    }
}

/// Passport number
pub fn passport() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::InPassport, "IN_PASSPORT")
        .pattern("PASSPORT", r"\b[A-Z][1-9]\d\s?\d{4}[1-9]\b", 0.1)?
        .context(&["passport", "indian passport", "passport number"]))
}

/// Voter ID (EPIC) number
pub fn voter_id() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::InVoterId, "IN_VOTER")
        .pattern(
            "VOTER",
            r"\b[A-Za-z][ABCDGHJKMNPRSYabcdghjkmnprsy][A-Za-z]\d{7}\b",
            0.4,
        )?
        .pattern("VOTER", r"\b[A-Za-z]{3}\d{7}\b", 0.3)?
        .context(&["voter", "epic", "elector", "election", "electoral"]))
}
