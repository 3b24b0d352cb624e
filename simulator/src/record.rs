//! Status records and their construction.
//!
//! A [`StatusRecord`] is built field-by-field by [`RecordBuilder`]. Nothing is
//! rendered into a text template and parsed back, so quotes or braces in the
//! synthesized text cannot corrupt the record. The only textual form is
//! [`StatusRecord::to_json`], produced by a serializer.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::content::ContentSynthesizer;
use crate::time::TimeSource;

/// `strftime` pattern of the classic status `created_at` field,
/// e.g. `Tue Nov 14 22:13:20 +0000 2023`.
pub const STATUS_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Ids are drawn from this range so they stay non-negative in a signed
/// 64-bit field downstream.
const ID_RANGE: std::ops::Range<u64> = 0..i64::MAX.unsigned_abs();

/// A single synthesized "social post" event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    /// Random id. Not guaranteed unique.
    pub id: u64,
    /// Random author id.
    pub author_id: u64,
    /// Wall-clock time at construction.
    pub created_at: DateTime<Utc>,
    /// Synthesized text.
    pub text: String,
}

/// Wire shape of a status, mirroring the public status JSON.
#[derive(Serialize)]
struct StatusJson<'a> {
    created_at: String,
    id: u64,
    text: &'a str,
    user: UserJson,
}

#[derive(Serialize)]
struct UserJson {
    id: u64,
}

impl StatusRecord {
    /// `created_at` in [`STATUS_DATE_FORMAT`].
    #[must_use]
    pub fn created_at_formatted(&self) -> String {
        self.created_at.format(STATUS_DATE_FORMAT).to_string()
    }

    /// Render as `{"created_at", "id", "text", "user": {"id"}}` JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which in practice cannot happen for
    /// these field types.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&StatusJson {
            created_at: self.created_at_formatted(),
            id: self.id,
            text: &self.text,
            user: UserJson { id: self.author_id },
        })
    }
}

/// Error returned when a synthesized record cannot be safely handed off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecordError {
    /// The synthesized text was empty.
    EmptyText,
    /// The text contains a control character (record delimiters such as
    /// newline or NUL).
    ControlCharacter { text: String, position: usize },
}

impl std::fmt::Display for MalformedRecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "synthesized text is empty"),
            Self::ControlCharacter { text, position } => {
                write!(
                    f,
                    "synthesized text contains a control character at byte {position}: {text:?}"
                )
            }
        }
    }
}

impl std::error::Error for MalformedRecordError {}

/// Assembles complete [`StatusRecord`]s.
///
/// Holds no per-record state: every call draws a fresh length, fresh text
/// and fresh ids from the caller's random source.
pub struct RecordBuilder<T: TimeSource + ?Sized> {
    synthesizer: ContentSynthesizer,
    time_source: std::sync::Arc<T>,
}

impl<T: TimeSource + ?Sized> RecordBuilder<T> {
    /// Create a builder stamping records with `time_source`.
    #[must_use]
    pub const fn new(time_source: std::sync::Arc<T>) -> Self {
        Self {
            synthesizer: ContentSynthesizer::new(),
            time_source,
        }
    }

    /// Replace the content synthesizer.
    #[must_use]
    pub const fn with_synthesizer(mut self, synthesizer: ContentSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Build one record.
    ///
    /// The text length is drawn uniformly from
    /// `[config.min_length, config.max_length]`. `config` must already be
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordError`] if the text is empty or contains a
    /// control character.
    pub fn build<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        config: &SimulationConfig,
    ) -> Result<StatusRecord, MalformedRecordError> {
        let length: RangeInclusive<usize> = config.min_length..=config.max_length;
        let target_length = rng.random_range(length);
        let text = self
            .synthesizer
            .synthesize(rng, &config.keywords, target_length);
        check_text(&text)?;

        Ok(StatusRecord {
            id: rng.random_range(ID_RANGE),
            author_id: rng.random_range(ID_RANGE),
            created_at: self.time_source.now(),
            text,
        })
    }
}

fn check_text(text: &str) -> Result<(), MalformedRecordError> {
    if text.is_empty() {
        return Err(MalformedRecordError::EmptyText);
    }
    if let Some((position, _)) = text.char_indices().find(|(_, c)| c.is_control()) {
        return Err(MalformedRecordError::ControlCharacter {
            text: text.to_string(),
            position,
        });
    }
    Ok(())
}
