//! Audit logging for guardrail decisions

use crate::config::AuditConfig;
use crate::error::PiiError;
use crate::types::{AuditEntry, AuditResult, Direction, GuardContext, GuardrailDecision};

use std::collections::hash_map::DefaultHasher;
use std::fs::OpenOptions;
use std::hash::{Hash, Hasher};
use std::io::Write;
use tracing::{info, warn};

/// Audit logger
pub struct AuditLogger {
    config: AuditConfig,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Log the outcome of one guardrail call
    pub fn log(
        &self,
        context: &GuardContext,
        direction: Direction,
        content: &str,
        outcome: std::result::Result<&GuardrailDecision, &PiiError>,
        duration_ms: u64,
    ) {
        let result = match outcome {
            Ok(GuardrailDecision::PassThrough) => AuditResult::Passed,
            Ok(GuardrailDecision::Transformed(messages)) => AuditResult::Redacted {
                messages: messages.len(),
            },
            Err(e) => AuditResult::Failed {
                error: e.to_string(),
            },
        };
        self.record(context, direction, content, result, duration_ms);
    }

    /// Log a call that was not analyzed because the guardrail is disabled
    pub fn log_skipped(&self, context: &GuardContext, direction: Direction, content: &str) {
        self.record(context, direction, content, AuditResult::Skipped, 0);
    }

    fn record(
        &self,
        context: &GuardContext,
        direction: Direction,
        content: &str,
        result: AuditResult,
        duration_ms: u64,
    ) {
        if !self.config.enabled {
            return;
        }

        let entry = AuditEntry {
            context: context.clone(),
            direction,
            content_hash: hash_content(content),
            result,
            processing_time_ms: duration_ms,
        };

        self.emit(&entry, content);
    }

    /// Emit an audit entry
    fn emit(&self, entry: &AuditEntry, content: &str) {
        let content_field = if self.config.log_content {
            Some(truncate(content, 500))
        } else {
            None
        };

        info!(
            request_id = %entry.context.request_id,
            user_id = ?entry.context.user_id,
            direction = %entry.direction,
            content_hash = %entry.content_hash,
            result = ?entry.result,
            processing_time_ms = entry.processing_time_ms,
            content = ?content_field,
            "PII guardrail audit"
        );

        if let Some(ref path) = self.config.log_file {
            let written = serde_json::to_string(entry)
                .map_err(std::io::Error::other)
                .and_then(|json| {
                    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                    writeln!(file, "{json}")
                });
            if let Err(e) = written {
                warn!(path = %path.display(), error = %e, "Failed to write audit entry");
            }
        }
    }
}

/// Hash content for audit (privacy-preserving)
fn hash_content(content: &str) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

/// Truncate string for logging, respecting char boundaries
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[test]
    fn test_hash_content() {
        let hash1 = hash_content("test");
        let hash2 = hash_content("test");
        let hash3 = hash_content("different");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a longer string", 10), "this is a ...");
        assert_eq!(truncate("ééé", 3), "é...");
    }

    #[test]
    fn test_file_sink_writes_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = AuditLogger::new(AuditConfig {
            enabled: true,
            log_content: false,
            log_file: Some(path.clone()),
        });

        let ctx = GuardContext::new().with_user_id("user-1");
        let decision = GuardrailDecision::Transformed(vec![ChatMessage::user("[US_SSN]")]);
        logger.log(&ctx, Direction::Input, "My SSN is 123-45-6789", Ok(&decision), 3);
        logger.log_skipped(&ctx, Direction::Output, "hello");

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = written
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["direction"], "input");
        assert_eq!(lines[0]["result"]["Redacted"]["messages"], 1);
        assert_eq!(lines[0]["context"]["user_id"], "user-1");
        assert_eq!(lines[1]["result"], "Skipped");
        assert!(!written.contains("123-45-6789"));
    }

    #[test]
    fn test_audit_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = AuditLogger::new(AuditConfig {
            enabled: false,
            log_content: true,
            log_file: Some(path.clone()),
        });

        let err = PiiError::Internal("boom".to_string());
        logger.log(&GuardContext::default(), Direction::Input, "x", Err(&err), 1);
        assert!(!path.exists());
    }
}
