//! Asia-Pacific recognizers: Singapore, Australia and Korea

use super::validators;
use super::PatternRecognizer;
use crate::catalog::RecognizerId;
use crate::error::Result;

/// Singapore NRIC / FIN
pub fn sg_fin() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::SgFin, "SG_NRIC_FIN")
        .pattern("Nric (medium)", r"\b[STFGM]\d{7}[A-Z]\b", 0.5)?
        .context(&["fin", "fin#", "nric", "nric#"])
        .validator(validators::sg_nric))
}

/// Singapore Unique Entity Number
pub fn sg_uen() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::SgUen, "SG_UEN")
        .pattern("UEN (business)", r"\b\d{8}[A-Z]\b", 0.3)?
        .pattern("UEN (local company)", r"\b\d{9}[A-Z]\b", 0.3)?
        .pattern("UEN (other entity)", r"\b[TSR]\d{2}[A-Z]{2}\d{4}[A-Z]\b", 0.3)?
        .context(&["uen", "unique entity number", "business registration", "acra"]))
}

/// Australian Business Number
pub fn au_abn() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::AuAbn, "AU_ABN")
        .pattern("ABN (weak)", r"\b\d{2}\s\d{3}\s\d{3}\s\d{3}\b", 0.1)?
        .pattern("ABN (very weak)", r"\b\d{11}\b", 0.01)?
        .context(&["australian business number", "abn"])
        .validator(|value| Some(validators::au_abn(value))))
}

/// Australian Company Number
pub fn au_acn() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::AuAcn, "AU_ACN")
        .pattern("ACN (weak)", r"\b\d{3}\s\d{3}\s\d{3}\b", 0.1)?
        .pattern("ACN (very weak)", r"\b\d{9}\b", 0.01)?
        .context(&["australian company number", "acn"])
        .validator(|value| Some(validators::au_acn(value))))
}

/// Australian Tax File Number
pub fn au_tfn() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::AuTfn, "AU_TFN")
        .pattern("TFN (weak)", r"\b\d{3}\s\d{3}\s\d{3}\b", 0.1)?
        .pattern("TFN (very weak)", r"\b\d{9}\b", 0.01)?
        .context(&["tax file number", "tfn"])
        .validator(|value| Some(validators::au_tfn(value))))
}

/// Australian Medicare card number
pub fn au_medicare() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::AuMedicare, "AU_MEDICARE")
        .pattern("Australian Medicare Number (weak)", r"\b[2-6]\d{3}\s\d{5}\s\d\b", 0.1)?
        .pattern("Australian Medicare Number (very weak)", r"\b[2-6]\d{9}\b", 0.01)?
        .context(&["medicare"])
        .validator(|value| Some(validators::au_medicare(value))))
}

/// Korean resident registration number
pub fn kr_rrn() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::KrRrn, "KR_RRN")
        .pattern(
            "RRN",
            r"\b\d{2}(?:0[1-9]|1[0-2])(?:0[1-9]|[12]\d|3[01])-?[1-4]\d{6}\b",
            0.5,
        )?
        .context(&["resident registration number", "rrn", "주민등록번호"])
        .validator(|value| Some(validators::kr_rrn(value))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizers::Recognizer;

    #[test]
    fn test_sg_fin() {
        let recognizer = sg_fin().unwrap();
        let matches = recognizer.analyze("NRIC S1234567D and T0123456G", "en");
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.entity_type == "SG_NRIC_FIN"));
        assert!(recognizer.analyze("S1234567A", "en").is_empty());
    }

    #[test]
    fn test_au_checksums() {
        assert_eq!(au_abn().unwrap().analyze("ABN 51 824 753 556", "en").len(), 1);
        assert_eq!(au_acn().unwrap().analyze("ACN 004 085 616", "en").len(), 1);
        assert_eq!(au_tfn().unwrap().analyze("TFN 123 456 782", "en").len(), 1);
        assert!(au_tfn().unwrap().analyze("TFN 123 456 789", "en").is_empty());
        assert_eq!(au_medicare().unwrap().analyze("card 2123456701", "en").len(), 1);
    }

    #[test]
    fn test_kr_rrn() {
        let recognizer = kr_rrn().unwrap();
        let matches = recognizer.analyze("RRN 800101-1234560", "en");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].confidence, 1.0);
        assert!(recognizer.analyze("RRN 800101-1234561", "en").is_empty());
    }

    #[test]
    fn test_sg_uen() {
        let matches = sg_uen().unwrap().analyze("UEN 53212345K", "en");
        assert_eq!(matches.len(), 1);
    }
}
