//! United States recognizers

use super::validators::{self, all_same, digits};
use super::PatternRecognizer;
use crate::catalog::RecognizerId;
use crate::error::Result;

/// Social Security Number
pub fn ssn() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::UsSsn, "US_SSN")
        .pattern("SSN (medium)", r"\b\d{3}[- .]\d{2}[- .]\d{4}\b", 0.5)?
        .pattern("SSN (very weak)", r"\b\d{9}\b", 0.05)?
        .context(&["social", "security", "ssn", "ssns", "ssn#", "ss#", "ssid"])
        .validator(validate_ssn))
}

fn validate_ssn(value: &str) -> Option<bool> {
    let separators: Vec<char> = value.chars().filter(|c| !c.is_ascii_digit()).collect();
    if separators.windows(2).any(|w| w[0] != w[1]) {
        return Some(false);
    }

    let d = digits(value);
    let area = d[0] * 100 + d[1] * 10 + d[2];
    let group = d[3] * 10 + d[4];
    let serial: u32 = d[5..].iter().fold(0, |acc, x| acc * 10 + x);
    if all_same(&d) || area == 0 || area == 666 || area >= 900 || group == 0 || serial == 0 {
        return Some(false);
    }
    None
}

/// Passport number
pub fn passport() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::UsPassport, "US_PASSPORT")
        .pattern("Passport (very weak)", r"\b\d{9}\b", 0.05)?
        .pattern("Passport Next Generation (very weak)", r"\b[A-Z]\d{8}\b", 0.1)?
        .context(&["us", "united", "states", "passport", "passport#", "travel", "document"]))
}

/// Driver license
pub fn driver_license() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::UsDriverLicense, "US_DRIVER_LICENSE")
        .pattern("Driver License - Alphanumeric (weak)", r"\b[A-Z]\d{6,8}\b", 0.15)?
        .pattern("Driver License - Digits (very weak)", r"\b\d{7,12}\b", 0.01)?
        .context(&[
            "driver", "license", "permit", "lic", "identification", "dls", "cdls", "lic#",
            "driving",
        ]))
}

/// Individual Taxpayer Identification Number
pub fn itin() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::UsItin, "US_ITIN")
        .pattern(
            "Itin (medium)",
            r"\b9\d{2}[- ](?:5\d|6[0-5]|7\d|8[0-8]|9[0-2]|9[4-9])[- ]\d{4}\b",
            0.5,
        )?
        .pattern(
            "Itin (weak)",
            r"\b9\d{2}(?:5\d|6[0-5]|7\d|8[0-8]|9[0-2]|9[4-9])\d{4}\b",
            0.3,
        )?
        .context(&["individual", "taxpayer", "itin", "tax", "payer", "taxid", "tin"]))
}

/// Bank account number
pub fn bank_account() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::UsBankAccount, "US_BANK_NUMBER")
        .pattern("Bank Account (weak)", r"\b\d{8,17}\b", 0.05)?
        .context(&["bank", "check", "account", "account#", "acct", "save", "debit"]))
}

/// ABA routing transit number
pub fn aba_routing() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::UsAbaRouting, "ABA_ROUTING_NUMBER")
        .pattern("ABA routing number (weak)", r"\b[0123678]\d{8}\b", 0.05)?
        .pattern("ABA routing number", r"\b[0123678]\d{3}-\d{4}-\d\b", 0.3)?
        .context(&["aba", "routing", "abarouting", "association", "bankrouting"])
        .validator(|value| Some(validators::aba_routing(value))))
}

/// DEA registration (medical license) number
pub fn medical_license() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::MedicalLicense, "MEDICAL_LICENSE")
        .pattern(
            "USA DEA Certificate Number (weak)",
            r"\b[abcdefghjklmprstuxABCDEFGHJKLMPRSTUX][a-zA-Z]\d{7}\b",
            0.4,
        )?
        .context(&["medical", "certificate", "dea"])
        .validator(|value| Some(validators::dea(value))))
}
