//! European recognizers: Spain, Italy, Poland and Finland

use super::validators;
use super::PatternRecognizer;
use crate::catalog::RecognizerId;
use crate::error::Result;

/// Spanish NIF (DNI with control letter)
pub fn es_nif() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::EsNif, "ES_NIF")
        .pattern("NIF", r"\b\d?\d{7}-?[A-Z]\b", 0.5)?
        .context(&["documento nacional de identidad", "dni", "nif", "identificación"])
        .validator(|value| Some(validators::es_nif(value))))
}

/// Spanish foreigner identity number
pub fn es_nie() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::EsNie, "ES_NIE")
        .pattern("NIE", r"\b[X-Z]-?\d{7}-?[A-Z]\b", 0.5)?
        .context(&["número de identificación de extranjero", "nie", "extranjero"])
        .validator(|value| Some(validators::es_nie(value))))
}

/// Italian driver license
pub fn it_driver_license() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::ItDriverLicense, "IT_DRIVER_LICENSE")
        .pattern(
            "Driver License",
            r"(?i)\b(?:[A-Z]{2}\d{7}[A-Z]|U1[BCDEFGHLMNPRSTUWYXZ]\w{6}[A-Z])\b",
            0.2,
        )?
        .context(&["patente", "patente di guida", "licenza", "licenza di guida"]))
}

/// Italian fiscal code (codice fiscale)
pub fn it_fiscal_code() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::ItFiscalCode, "IT_FISCAL_CODE")
        .pattern(
            "Fiscal code",
            r"(?i)\b[A-Z]{6}\d{2}[A-EHLMPR-T]\d{2}[A-Z]\d{3}[A-Z]\b",
            0.3,
        )?
        .context(&["codice fiscale", "cf"])
        .validator(|value| Some(validators::it_fiscal_code(value))))
}

/// Italian identity card (paper, CIE 2.0 and CIE 3.0 formats)
pub fn it_identity_card() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::ItIdentityCard, "IT_IDENTITY_CARD")
        .pattern("Paper-based Identity Card", r"(?i)\b[A-Z]{2}\s?\d{7}\b", 0.01)?
        .pattern("Electronic Identity Card (CIE) 2.0", r"\b\d{7}[A-Z]{2}\b", 0.01)?
        .pattern("Electronic Identity Card (CIE) 3.0", r"(?i)\b[A-Z]{2}\d{5}[A-Z]{2}\b", 0.01)?
        .context(&[
            "carta", "identità", "elettronica", "cie", "documento", "riconoscimento",
            "espatrio",
        ]))
}

/// Italian passport
pub fn it_passport() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::ItPassport, "IT_PASSPORT")
        .pattern("Passport", r"(?i)\b[A-Z]{2}\d{7}\b", 0.01)?
        .context(&["passaporto", "elettronico", "italiano", "viaggio", "estero"]))
}

/// Italian VAT code (partita IVA)
pub fn it_vat_code() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::ItVatCode, "IT_VAT_CODE")
        .pattern("IT VAT code", r"\b(?:IT)?\d{11}\b", 0.1)?
        .context(&["piva", "partita iva", "pi", "iva"])
        .validator(|value| Some(validators::it_vat(value))))
}

/// Polish PESEL
pub fn pl_pesel() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::PlPesel, "PL_PESEL")
        .pattern(
            "PESEL",
            r"\b\d{2}(?:[02468][1-9]|[13579][012])(?:0[1-9]|[12]\d|3[01])\d{5}\b",
            0.4,
        )?
        .context(&["pesel"])
        .validator(|value| Some(validators::pl_pesel(value))))
}

/// Finnish personal identity code (henkilötunnus)
pub fn fi_personal_identity_code() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(
        RecognizerId::FiPersonalIdentityCode,
        "FI_PERSONAL_IDENTITY_CODE",
    )
    .pattern(
        "Finnish Personal Identity Code (Medium)",
        r"\b(?:0[1-9]|[12]\d|3[01])(?:0[1-9]|1[0-2])\d{2}[-+ABCDEFYXWVU]\d{3}[0-9A-Y]\b",
        0.5,
    )?
    .context(&["hetu", "henkilötunnus", "personbeteckningen", "personal identity code"])
    .validator(|value| Some(validators::fi_personal_identity_code(value))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizers::Recognizer;

    #[test]
    fn test_es_nif_and_nie() {
        let nif = es_nif().unwrap();
        assert_eq!(nif.analyze("DNI 12345678Z", "en").len(), 1);
        assert!(nif.analyze("DNI 12345678A", "en").is_empty());

        let nie = es_nie().unwrap();
        assert_eq!(nie.analyze("NIE X1234567L", "en").len(), 1);
        assert!(nie.analyze("NIE X1234567A", "en").is_empty());
    }

    #[test]
    fn test_it_fiscal_code() {
        let recognizer = it_fiscal_code().unwrap();
        let matches = recognizer.analyze("codice fiscale RSSMRA85T10A562S", "it");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].confidence, 1.0);
        assert!(recognizer.analyze("RSSMRA85T10A562A", "it").is_empty());
    }

    #[test]
    fn test_it_vat_code() {
        let recognizer = it_vat_code().unwrap();
        assert_eq!(recognizer.analyze("P.IVA 07643520567", "it").len(), 1);
        assert!(recognizer.analyze("P.IVA 07643520568", "it").is_empty());
    }

    #[test]
    fn test_it_passport_needs_context() {
        let recognizer = it_passport().unwrap();
        let bare = recognizer.analyze("YA1234567", "it");
        assert!(bare[0].confidence < 0.3);
        let with_context = recognizer.analyze("passaporto YA1234567", "it");
        assert!(with_context[0].confidence >= 0.4);
    }

    #[test]
    fn test_pl_pesel() {
        let recognizer = pl_pesel().unwrap();
        assert_eq!(recognizer.analyze("PESEL 44051401458", "pl").len(), 1);
        assert!(recognizer.analyze("PESEL 44051401459", "pl").is_empty());
    }

    #[test]
    fn test_fi_personal_identity_code() {
        let recognizer = fi_personal_identity_code().unwrap();
        assert_eq!(recognizer.analyze("hetu 131052-308T", "fi").len(), 1);
        assert!(recognizer.analyze("hetu 131052-308A", "fi").is_empty());
    }
}
