//! Payment card, IBAN and cryptocurrency wallet recognizers

use super::validators::{self, all_same, digits};
use super::PatternRecognizer;
use crate::catalog::RecognizerId;
use crate::error::Result;

/// Credit card number (Luhn checked)
pub fn credit_card() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::CreditCard, "CREDIT_CARD")
        .pattern(
            "All Credit Cards (weak)",
            r"\b(?:4\d{3}|5[0-5]\d{2}|6\d{3}|1\d{3}|3\d{3})[- ]?\d{3,4}[- ]?\d{3,4}[- ]?\d{3,5}\b",
            0.3,
        )?
        .context(&[
            "credit", "card", "visa", "mastercard", "cc", "amex", "discover", "jcb", "diners",
            "maestro", "instapayment",
        ])
        .validator(validate_credit_card))
}

fn validate_credit_card(value: &str) -> Option<bool> {
    let d = digits(value);
    Some(!all_same(&d) && validators::luhn(value))
}

/// International Bank Account Number (mod-97 checked)
pub fn iban() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::Iban, "IBAN_CODE")
        .pattern(
            "IBAN Generic",
            r"\b[A-Z]{2}\d{2}(?:[ ]?[A-Z0-9]{4}){2,7}(?:[ ]?[A-Z0-9]{1,3})?\b",
            0.5,
        )?
        .context(&["iban", "bank", "transaction"])
        .validator(|value| Some(validators::iban(value))))
}

/// Bitcoin wallet address
pub fn crypto() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::Crypto, "CRYPTO")
        .pattern(
            "Crypto (Medium)",
            r"\b(?:bc1|[13])[a-zA-HJ-NP-Z0-9]{25,59}\b",
            0.5,
        )?
        .context(&["wallet", "btc", "bitcoin", "crypto"])
        .validator(validate_wallet))
}

fn validate_wallet(value: &str) -> Option<bool> {
    if value.to_ascii_lowercase().starts_with("bc1") {
        Some(validators::bech32_shape(value))
    } else {
        Some(validators::base58check(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizers::Recognizer;

    #[test]
    fn test_credit_card() {
        let recognizer = credit_card().unwrap();
        let matches = recognizer.analyze("card 4111 1111 1111 1111 exp 12/29", "en");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_text, "4111 1111 1111 1111");
        assert_eq!(matches[0].confidence, 1.0);
        assert!(recognizer.analyze("card 4111 1111 1111 1112", "en").is_empty());
    }

    #[test]
    fn test_iban() {
        let recognizer = iban().unwrap();
        assert_eq!(recognizer.analyze("pay GB82WEST12345698765432 today", "en").len(), 1);
        assert_eq!(recognizer.analyze("to DE89 3704 0044 0532 0130 00", "en").len(), 1);
        assert!(recognizer.analyze("GB82WEST12345698765433", "en").is_empty());
    }

    #[test]
    fn test_crypto() {
        let recognizer = crypto().unwrap();
        assert_eq!(
            recognizer
                .analyze("send to 1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", "en")
                .len(),
            1
        );
        assert_eq!(
            recognizer
                .analyze("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq", "en")
                .len(),
            1
        );
        assert!(recognizer
            .analyze("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNb", "en")
            .is_empty());
    }
}
