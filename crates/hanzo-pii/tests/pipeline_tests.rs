use hanzo_pii::redactor;
use hanzo_pii::{
    AnalyzerEngine, AuditConfig, ChatMessage, Direction, EntityMatch, Guard, GuardContext,
    GuardrailConfig, GuardrailDecision, Pipeline, PipelineConfig,
};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use std::sync::Arc;

static ENGINE: Lazy<Arc<AnalyzerEngine>> = Lazy::new(|| Arc::new(AnalyzerEngine::default()));

fn pipeline() -> Pipeline {
    Pipeline::new(ENGINE.clone())
}

fn guard() -> Guard {
    Guard::builder()
        .with_engine(ENGINE.clone())
        .with_audit(AuditConfig {
            enabled: false,
            ..Default::default()
        })
        .build()
}

#[tokio::test]
async fn test_us_ssn_end_to_end() {
    let messages = vec![ChatMessage::user("My SSN is 123-45-6789")];
    let decision = guard()
        .process_messages(
            &messages,
            &GuardrailConfig::enabled(vec!["US"]),
            Direction::Input,
            &GuardContext::new(),
        )
        .await
        .unwrap();

    let messages = decision.into_messages().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, "user");
    assert_eq!(messages[0].text(), Some("My SSN is [US_SSN]"));
}

#[tokio::test]
async fn test_disabled_direction_passes_through() {
    let mut config = GuardrailConfig::enabled("US");
    config.enabled = None;
    config.transform_output = true;

    let messages = vec![ChatMessage::user("My SSN is 123-45-6789")];
    let decision = guard()
        .process_messages(&messages, &config, Direction::Input, &GuardContext::new())
        .await
        .unwrap();
    assert_eq!(decision, GuardrailDecision::PassThrough);
}

#[tokio::test]
async fn test_clean_conversation_passes_through() {
    let messages = vec![
        ChatMessage::new("system", "You are a helpful assistant."),
        ChatMessage::user("What is the capital of France?"),
    ];
    let decision = pipeline()
        .process(&messages, &PipelineConfig::new("US,CONTACT"))
        .await
        .unwrap();
    assert_eq!(decision, GuardrailDecision::PassThrough);
}

#[tokio::test]
async fn test_multi_message_conversation() {
    let messages = vec![
        ChatMessage::new("system", "Be brief."),
        ChatMessage::user("Email jane@example.com about card 4111111111111111"),
        ChatMessage::assistant("Done."),
    ];
    let decision = pipeline()
        .process(&messages, &PipelineConfig::new("CONTACT,FINANCIAL"))
        .await
        .unwrap();

    let rebuilt = decision.into_messages().unwrap();
    assert_eq!(rebuilt.len(), 3);
    assert_eq!(rebuilt[0], messages[0]);
    assert_eq!(
        rebuilt[1].text(),
        Some("Email [EMAIL_ADDRESS] about card [CREDIT_CARD]")
    );
    assert_eq!(rebuilt[2], messages[2]);
}

#[tokio::test]
async fn test_indian_default_selection() {
    let messages = vec![ChatMessage::user("PAN ABCPE1234F and Aadhaar 2345 6789 0124")];
    let decision = pipeline()
        .process(&messages, &PipelineConfig::new(Vec::<String>::new()))
        .await
        .unwrap();

    let rebuilt = decision.into_messages().unwrap();
    assert_eq!(
        rebuilt[0].text(),
        Some("PAN [IN_PAN] and Aadhaar [IN_AADHAAR]")
    );
}

#[test]
fn test_splice_boundaries() {
    let text = "x@y.com";
    let whole = EntityMatch::new("EMAIL_ADDRESS", text, 0, text.len(), 1.0);
    assert_eq!(
        redactor::redact(text, &[whole]).unwrap().redacted_text,
        "[EMAIL_ADDRESS]"
    );

    let text = "a 123-45-6789";
    let tail = EntityMatch::new("US_SSN", text, 2, text.len(), 0.85);
    let inner = EntityMatch::new("US_BANK_NUMBER", text, 6, 8, 0.05);
    let result = redactor::redact(text, &[inner, tail]).unwrap();
    assert_eq!(result.redacted_text, "a [US_SSN]");
}

#[tokio::test]
async fn test_second_pass_keeps_weak_numbers() {
    let config = PipelineConfig::new("US");
    let first = pipeline()
        .redact_text("My SSN is 123-45-6789 and 234567890", &config)
        .await
        .unwrap();
    assert_eq!(first.redacted_text, "My SSN is [US_SSN] and 234567890");

    let second = pipeline()
        .redact_text(&first.redacted_text, &config)
        .await
        .unwrap();
    assert!(!second.changed);
    assert_eq!(second.redacted_text, first.redacted_text);
}

#[tokio::test]
async fn test_bracket_tokens_do_not_shield_pii() {
    let config = PipelineConfig::new("URL");
    let result = pipeline()
        .redact_text("see https://intranet.acme.com/users/[ADMIN]/jane.doe/profile", &config)
        .await
        .unwrap();
    assert_eq!(result.redacted_text, "see [URL][ADMIN][URL]");
    assert!(!result.redacted_text.contains("jane.doe"));
}

const FRAGMENTS: &[&str] = &[
    "hello",
    "please",
    "forward",
    "the",
    "and",
    "notes",
    "ssn",
    "us",
    "passport",
    "account",
    "pan",
    "tfn",
    "abn",
    "aadhaar",
    "nhs",
    "123-45-6789",
    "jane@example.com",
    "https://hanzo.ai/docs",
    "4111111111111111",
    "192.168.1.10",
    "415-555-0199",
    "234567890",
    "987654320",
    "2345678906",
    "23456789012",
    "345678901234",
];

const PRESETS: &[&str] = &[
    "US",
    "UK",
    "INDIAN",
    "EUROPEAN",
    "AUSTRALIA",
    "CONTACT,FINANCIAL",
    "ALL",
];

const STRONG: &[&str] = &["jane@example.com", "4111111111111111", "192.168.1.10"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn redaction_is_idempotent(
        parts in prop::collection::vec(prop::sample::select(FRAGMENTS), 1..14),
        preset in prop::sample::select(PRESETS),
    ) {
        let text = parts.join(" ");
        let config = PipelineConfig::new(preset);

        let (first, second) = tokio_test::block_on(async {
            let first = pipeline().redact_text(&text, &config).await.unwrap();
            let second = pipeline()
                .redact_text(&first.redacted_text, &config)
                .await
                .unwrap();
            (first, second)
        });

        prop_assert!(!second.changed);
        prop_assert_eq!(&second.redacted_text, &first.redacted_text);

        let plain = parts
            .iter()
            .all(|p| p.chars().all(|c| c.is_ascii_lowercase()));
        if plain {
            prop_assert!(!first.changed);
        }
        if preset == "ALL" {
            for value in STRONG {
                prop_assert!(!first.redacted_text.contains(value));
            }
        }
    }
}
