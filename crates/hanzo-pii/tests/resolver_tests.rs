use hanzo_pii::catalog::{self, Preset, RecognizerId};
use hanzo_pii::resolver::{resolve, resolve_config, resolve_tokens};
use hanzo_pii::{EngineConfig, PiiError, PipelineConfig, RecognizerSpec};
use proptest::prelude::*;
use std::collections::HashSet;

fn token() -> impl Strategy<Value = String> {
    let mut names: Vec<String> = RecognizerId::ALL.iter().map(|id| id.to_string()).collect();
    for preset in Preset::ALL {
        if *preset == Preset::All {
            continue;
        }
        names.push(preset.name().to_lowercase());
        names.extend(preset.aliases().iter().map(|a| a.to_string()));
    }
    names.push("NOT_A_RECOGNIZER".to_string());
    names.push("  ".to_string());
    prop::sample::select(names)
}

proptest! {
    #[test]
    fn resolved_ids_are_unique_and_catalogued(tokens in prop::collection::vec(token(), 0..12)) {
        let default = vec![RecognizerId::Email];
        match resolve_tokens(&tokens, &default) {
            Ok(ids) => {
                let unique: HashSet<_> = ids.iter().collect();
                prop_assert_eq!(unique.len(), ids.len());
                prop_assert!(ids.iter().all(|id| RecognizerId::ALL.contains(id)));
            }
            Err(e) => {
                let is_no_valid = matches!(e, PiiError::NoValidRecognizers { .. });
                prop_assert!(is_no_valid);
            }
        }
    }

    #[test]
    fn identifier_order_is_preserved(picks in prop::collection::vec(0usize..RecognizerId::ALL.len(), 1..10)) {
        let tokens: Vec<&str> = picks.iter().map(|i| RecognizerId::ALL[*i].as_str()).collect();
        let ids = resolve_tokens(&tokens, &[]).unwrap();

        let mut expected = Vec::new();
        for i in &picks {
            let id = RecognizerId::ALL[*i];
            if !expected.contains(&id) {
                expected.push(id);
            }
        }
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn case_and_whitespace_do_not_matter(i in 0usize..RecognizerId::ALL.len()) {
        let name = RecognizerId::ALL[i].as_str();
        let spec = RecognizerSpec::from(format!("  {} ", name.to_lowercase()).as_str());
        let ids = resolve(Some(&spec), &[]).unwrap();
        prop_assert_eq!(ids, vec![RecognizerId::ALL[i]]);
    }
}

#[test]
fn test_mixed_selection() {
    let spec = RecognizerSpec::from("US_SSN, india ,EMAIL,US_SSN");
    let ids = resolve(Some(&spec), &[]).unwrap();

    let mut expected = vec![RecognizerId::UsSsn];
    expected.extend(Preset::Indian.ids());
    expected.push(RecognizerId::Email);
    assert_eq!(ids, expected);
}

#[test]
fn test_all_tokens_unknown() {
    let spec = RecognizerSpec::from(vec!["FOO", "BAR"]);
    let err = resolve(Some(&spec), &[RecognizerId::Email]).unwrap_err();
    match err {
        PiiError::NoValidRecognizers { tokens, available } => {
            assert_eq!(tokens, vec!["FOO", "BAR"]);
            assert!(available.contains("INDIAN"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_comprehensive_wins_over_everything() {
    let ids = resolve_tokens(&["UK", "bogus", "COMPREHENSIVE"], &[]).unwrap();
    assert_eq!(ids, catalog::list_all());
}

#[test]
fn test_engine_default_applies() {
    let engine = EngineConfig::from_toml(r#"default_recognizers = ["UK", "EMAIL"]"#).unwrap();
    let mut config = PipelineConfig::new(Vec::<String>::new());
    config.language = " EN ".to_string();

    let resolved = resolve_config(&config, &engine).unwrap();
    assert_eq!(
        resolved.ids,
        vec![RecognizerId::UkNhs, RecognizerId::UkNino, RecognizerId::Email]
    );
    assert_eq!(resolved.language, "en");
}
