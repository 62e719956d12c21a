//! Date and time recognizer

use super::PatternRecognizer;
use crate::catalog::RecognizerId;
use crate::error::Result;

const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

/// Calendar dates and timestamps
pub fn date_time() -> Result<PatternRecognizer> {
    let day_month_year = format!(
        r"(?i)\b(?:\d{{1,2}}(?:st|nd|rd|th)?\s+)?(?:{months})\.?(?:\s+\d{{1,2}}(?:st|nd|rd|th)?)?,?\s+(?:19|20)\d{{2}}\b",
        months = MONTHS
    );

    Ok(PatternRecognizer::new(RecognizerId::DateTime, "DATE_TIME")
        .pattern(
            "ISO 8601",
            r"\b\d{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])(?:[T ](?:[01]\d|2[0-3]):[0-5]\d(?::[0-5]\d)?(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?)?\b",
            0.6,
        )?
        .pattern(
            "Day first",
            r"\b(?:0?[1-9]|[12]\d|3[01])[/.](?:0?[1-9]|1[0-2])[/.](?:19|20)\d{2}\b",
            0.6,
        )?
        .pattern(
            "Month first",
            r"\b(?:0?[1-9]|1[0-2])/(?:0?[1-9]|[12]\d|3[01])/(?:19|20)\d{2}\b",
            0.6,
        )?
        .pattern("Month name", &day_month_year, 0.6)?
        .context(&["date", "birthday", "born", "dob", "birth", "on", "at"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizers::Recognizer;

    fn found(text: &str) -> Vec<String> {
        date_time()
            .unwrap()
            .analyze(text, "en")
            .into_iter()
            .map(|m| m.matched_text)
            .collect()
    }

    #[test]
    fn test_numeric_dates() {
        assert_eq!(found("born 2024-03-15"), vec!["2024-03-15"]);
        assert_eq!(found("ts 2024-03-15T10:30:00Z"), vec!["2024-03-15T10:30:00Z"]);
        assert_eq!(found("dob 15/03/1990"), vec!["15/03/1990"]);
        assert_eq!(found("dob 03/15/1990"), vec!["03/15/1990"]);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(found("on March 15, 2024 we met"), vec!["March 15, 2024"]);
        assert_eq!(found("on 15th Mar 2024"), vec!["15th Mar 2024"]);
        assert!(found("you may go").is_empty());
    }

    #[test]
    fn test_ambiguous_date_is_one_match() {
        // Both numeric orders match; the span is reported once
        assert_eq!(found("01/02/2020").len(), 1);
    }
}
