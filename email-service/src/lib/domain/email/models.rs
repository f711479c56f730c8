use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::models::UserId;

/// Longest accepted subject, in characters.
pub const MAX_SUBJECT_CHARS: usize = 500;

/// Marker the formatted email body is cut at.
pub const SUBJECT_MARKER: &str = "Subject:";

/// Tone requested for the formatted email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tone(String);

impl Tone {
    pub fn new(tone: impl Into<String>) -> Self {
        Self(tone.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Tone {
    fn default() -> Self {
        Self("neutral".to_string())
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Input to the generation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailGenerationRequest {
    pub subject: String,
    pub tone: Tone,
}

impl EmailGenerationRequest {
    pub fn new(subject: impl Into<String>, tone: Option<Tone>) -> Self {
        Self {
            subject: subject.into(),
            tone: tone.unwrap_or_default(),
        }
    }
}

/// Output of the generation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailGenerationResult {
    pub subject: String,
    pub tone: Tone,
    /// Formatted email starting at [`SUBJECT_MARKER`].
    pub body: String,
}

/// Pipeline stage, used to attribute upstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Translate the subject into English.
    Normalize,
    /// Rewrite the English text as an email in the requested tone.
    Format,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Normalize => f.write_str("normalize"),
            Stage::Format => f.write_str("format"),
        }
    }
}

/// How an outbound text-generation call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStatus {
    /// Endpoint answered with a non-success HTTP status.
    Http(u16),
    /// No answer within the stage timeout.
    Timeout,
    /// Connection could not be established or was cut.
    Unreachable,
    /// Success status, but the payload had no generated text.
    InvalidPayload,
}

impl fmt::Display for UpstreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamStatus::Http(code) => write!(f, "HTTP {}", code),
            UpstreamStatus::Timeout => f.write_str("timeout"),
            UpstreamStatus::Unreachable => f.write_str("unreachable"),
            UpstreamStatus::InvalidPayload => f.write_str("invalid payload"),
        }
    }
}

/// A single call to a text-generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGenerationRequest {
    pub prompt: String,
    pub max_new_tokens: Option<u32>,
}

impl TextGenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_new_tokens: None,
        }
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = Some(max_new_tokens);
        self
    }
}

/// Prompt sent to the translation endpoint.
pub fn normalize_prompt(subject: &str) -> String {
    format!("convert this into English: {}", subject)
}

/// Prompt sent to the formatting endpoint.
pub fn format_prompt(english: &str, tone: &Tone) -> String {
    format!(
        "Please reformat the following text as a {} tone English email: {}",
        tone, english
    )
}

/// Cut generated text at the first [`SUBJECT_MARKER`], keeping the marker.
pub fn extract_email_body(generated: &str) -> Option<&str> {
    generated
        .find(SUBJECT_MARKER)
        .map(|index| &generated[index..])
}

/// Generation history entry identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryEntryId(pub Uuid);

impl HistoryEntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HistoryEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HistoryEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A past successful generation, owned by the user who requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub user_id: UserId,
    pub prompt: String,
    pub tone: Tone,
    pub generated_email: String,
    pub created_at: DateTime<Utc>,
}

/// History entry about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub user_id: UserId,
    pub prompt: String,
    pub tone: Tone,
    pub generated_email: String,
}

impl NewHistoryEntry {
    pub fn from_result(user_id: UserId, result: &EmailGenerationResult) -> Self {
        Self {
            user_id,
            prompt: result.subject.clone(),
            tone: result.tone.clone(),
            generated_email: result.body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_defaults_to_neutral() {
        let request = EmailGenerationRequest::new("Hola", None);

        assert_eq!(request.tone.as_str(), "neutral");
        assert_eq!(
            EmailGenerationRequest::new("Hola", Some(Tone::new("formal"))).tone,
            Tone::new("formal")
        );
    }

    #[test]
    fn test_extract_email_body_keeps_marker() {
        let generated = "Greeting...\nSubject: How are you?\nBody...";

        assert_eq!(
            extract_email_body(generated),
            Some("Subject: How are you?\nBody...")
        );
    }

    #[test]
    fn test_extract_email_body_uses_first_marker() {
        let generated = "Subject: first\nSubject: second";

        assert_eq!(extract_email_body(generated), Some(generated));
    }

    #[test]
    fn test_extract_email_body_without_marker() {
        assert_eq!(extract_email_body("Dear team, no header here."), None);
        assert_eq!(extract_email_body("subject: lowercase"), None);
    }

    #[test]
    fn test_extract_email_body_after_multibyte_text() {
        let generated = "¿Qué tal?\nSubject: Saludos";

        assert_eq!(extract_email_body(generated), Some("Subject: Saludos"));
    }

    #[test]
    fn test_prompts_embed_inputs() {
        assert_eq!(
            normalize_prompt("Hola, ¿cómo estás?"),
            "convert this into English: Hola, ¿cómo estás?"
        );
        assert_eq!(
            format_prompt("How are you?", &Tone::new("formal")),
            "Please reformat the following text as a formal tone English email: How are you?"
        );
    }

    #[test]
    fn test_history_entry_from_result() {
        let user_id = UserId::new();
        let result = EmailGenerationResult {
            subject: "Hola".to_string(),
            tone: Tone::new("formal"),
            body: "Subject: Hello".to_string(),
        };

        let entry = NewHistoryEntry::from_result(user_id, &result);

        assert_eq!(entry.user_id, user_id);
        assert_eq!(entry.prompt, "Hola");
        assert_eq!(entry.tone, Tone::new("formal"));
        assert_eq!(entry.generated_email, "Subject: Hello");
    }
}
