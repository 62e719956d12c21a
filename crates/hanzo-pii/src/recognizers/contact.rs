//! Contact and network recognizers: email, phone, IP address and URL

use super::validators::digits;
use super::PatternRecognizer;
use crate::catalog::RecognizerId;
use crate::error::Result;
use std::net::IpAddr;

/// Email address
pub fn email() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::Email, "EMAIL_ADDRESS")
        .pattern(
            "Email (Medium)",
            r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            0.5,
        )?
        .context(&["email", "mail", "e-mail"])
        .validator(validate_email))
}

fn validate_email(value: &str) -> Option<bool> {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return Some(false);
    };
    let malformed = value.contains("..")
        || local.starts_with('.')
        || domain.starts_with('.')
        || domain.starts_with('-');
    Some(!malformed)
}

/// Phone number (North American and international formats)
pub fn phone() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::Phone, "PHONE_NUMBER")
        .pattern(
            "Phone (NANP)",
            r"(?:\+?1[-.\s]?)?(?:\([2-9]\d{2}\)|\b[2-9]\d{2})[-.\s]?\d{3}[-.\s]?\d{4}\b",
            0.4,
        )?
        .pattern(
            "Phone (international)",
            r"\+\d{1,3}[-.\s]?(?:\d[-.\s]?){6,12}\d\b",
            0.4,
        )?
        .context(&["phone", "number", "telephone", "cell", "cellphone", "mobile", "call", "tel"])
        .validator(validate_phone))
}

fn validate_phone(value: &str) -> Option<bool> {
    if (10..=15).contains(&digits(value).len()) {
        None
    } else {
        Some(false)
    }
}

/// IPv4 or IPv6 address
pub fn ip_address() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::IpAddress, "IP_ADDRESS")
        .pattern(
            "IPv4",
            r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b",
            0.6,
        )?
        .pattern("IPv6", r"\b(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}\b", 0.6)?
        .pattern(
            "IPv6 (compressed)",
            r"\b(?:[0-9a-fA-F]{1,4}:){1,6}(?::[0-9a-fA-F]{1,4}){1,6}\b",
            0.6,
        )?
        .context(&["ip", "ipv4", "ipv6", "address", "host", "server"])
        .validator(|value| {
            if value.parse::<IpAddr>().is_ok() {
                None
            } else {
                Some(false)
            }
        }))
}

/// URL with or without a scheme
pub fn url() -> Result<PatternRecognizer> {
    Ok(PatternRecognizer::new(RecognizerId::Url, "URL")
        .pattern(
            "Standard Url",
            r#"\bhttps?://[^\s<>"']*[^\s<>"'.,;:!?)\]]"#,
            0.6,
        )?
        .pattern(
            "Www Url",
            r#"\bwww\.[^\s<>"']*[^\s<>"'.,;:!?)\]]"#,
            0.5,
        )?
        .pattern(
            "Non schema URL",
            r"\b(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+(?:com|org|net|edu|gov|mil|io|ai|dev|app|info|biz|co\.uk|co|uk|de|fr|in|au|sg|ca|jp)\b",
            0.5,
        )?
        .context(&["url", "website", "link", "site", "domain"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizers::Recognizer;

    #[test]
    fn test_email() {
        let text = "call me at 415-555-0199 or email a@b.com";
        let matches = email().unwrap().analyze(text, "en");
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].start, matches[0].end), (33, 40));
        assert_eq!(matches[0].entity_type, "EMAIL_ADDRESS");
        assert!(email().unwrap().analyze("a..b@example.com", "en").is_empty());
    }

    #[test]
    fn test_phone() {
        let recognizer = phone().unwrap();
        let text = "call me at 415-555-0199 or email a@b.com";
        let matches = recognizer.analyze(text, "en");
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].start, matches[0].end), (11, 23));
        assert!(matches[0].confidence > 0.4);

        let matches = recognizer.analyze("ring +44 20 7946 0958 tomorrow", "en");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_text, "+44 20 7946 0958");
    }

    #[test]
    fn test_ip_address() {
        let recognizer = ip_address().unwrap();
        let matches = recognizer.analyze("server 192.168.1.10 and 2001:db8::1", "en");
        let found: Vec<&str> = matches.iter().map(|m| m.matched_text.as_str()).collect();
        assert!(found.contains(&"192.168.1.10"));
        assert!(found.contains(&"2001:db8::1"));
        assert!(recognizer.analyze("version 999.1.1.1", "en").is_empty());
    }

    #[test]
    fn test_url() {
        let recognizer = url().unwrap();
        let matches = recognizer.analyze("see https://example.com/a?b=1.", "en");
        assert!(matches
            .iter()
            .any(|m| m.matched_text == "https://example.com/a?b=1"));
        let matches = recognizer.analyze("visit hanzo.ai today", "en");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_text, "hanzo.ai");
    }
}
