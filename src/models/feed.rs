use serde::{Deserialize, Deserializer, Serialize};

use super::{lenient, normalize_link, Note};

/// Caption used when the feed has no caption row.
pub const DEFAULT_LABEL: &str = "ΕΒΔΟΜΑΔΑ";

/// Caption shown when the feed could not be loaded at all.
pub const UNAVAILABLE_LABEL: &str = "—";

const DEFAULT_WORD_TITLE: &str = "Η λέξη της εβδομάδας";
const DEFAULT_WORD: &str = "Exclusivity";

/// Everything one load cycle produced.
///
/// Also the on-disk shape of the local fallback source. The legacy
/// `weekLabel` and `wordOfWeek` keys are accepted on read. An unreadable
/// item is skipped without affecting the rest of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    #[serde(default = "default_label", alias = "weekLabel", deserialize_with = "label")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::records")]
    pub items: Vec<Note>,
    #[serde(
        default,
        alias = "wordOfWeek",
        deserialize_with = "lenient::optional_record",
        skip_serializing_if = "Option::is_none"
    )]
    pub word_of_week: Option<WordOfWeek>,
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient::optional_text(deserializer)?
        .filter(|label| !label.trim().is_empty())
        .unwrap_or_else(default_label))
}

impl FeedSnapshot {
    pub fn new(label: impl Into<String>, items: Vec<Note>) -> Self {
        Self {
            label: label.into(),
            items,
            word_of_week: None,
        }
    }

    /// The degraded snapshot used when the source is unusable.
    pub fn unavailable() -> Self {
        Self::new(UNAVAILABLE_LABEL, Vec::new())
    }

    /// Apply the entity invariants to a snapshot read verbatim from JSON:
    /// unrenderable records are dropped and links get a scheme.
    pub fn normalized(self) -> Self {
        let items = self
            .items
            .into_iter()
            .filter(Note::is_renderable)
            .map(|mut note| {
                note.link = note.link.as_deref().and_then(normalize_link);
                note
            })
            .collect();
        Self { items, ..self }
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.items.iter().find(|note| note.id == id)
    }

    /// The word-of-the-week badge, falling back to the stock word.
    pub fn word_of_week(&self) -> WordOfWeek {
        self.word_of_week.clone().unwrap_or_default()
    }
}

/// Badge content shown next to the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordOfWeek {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub word: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sub: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub body: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub link: String,
}

impl Default for WordOfWeek {
    fn default() -> Self {
        Self {
            title: DEFAULT_WORD_TITLE.to_string(),
            word: DEFAULT_WORD.to_string(),
            sub: String::new(),
            body: String::new(),
            link: String::new(),
        }
    }
}

impl WordOfWeek {
    /// Detail-view card for the badge.
    pub fn as_note(&self) -> Note {
        let mut note = Note::new("word_of_week");
        note.category = "fyi".to_string();
        note.tag_label = "📌 Word of the Week".to_string();
        note.title = if self.word.is_empty() {
            DEFAULT_WORD_TITLE.to_string()
        } else {
            self.word.clone()
        };
        note.body = if self.body.is_empty() {
            self.sub.clone()
        } else {
            self.body.clone()
        };
        note.link = normalize_link(&self.link);
        note
    }
}
