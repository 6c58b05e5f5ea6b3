use serde::{Deserialize, Deserializer, Serialize};

use super::{lenient, Position};

/// Category used when a row leaves `type` blank.
pub const DEFAULT_CATEGORY: &str = "meeting";

/// Id of the row that carries the board caption instead of a note.
pub const META_ROW_ID: &str = "meta_week";

/// One card on the board.
///
/// Label fields are independently optional and stored as empty strings when
/// absent. `link` is always either `None` or carries a scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Empty when the record had none; such notes are never rendered.
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    /// Free-text tag controlling presentation (`meeting`, `urgent`, ...).
    #[serde(default = "default_category", alias = "type", deserialize_with = "category")]
    pub category: String,
    #[serde(default, alias = "tagLabel", deserialize_with = "lenient::text")]
    pub tag_label: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub headline: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub short: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub due: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub body: String,
    #[serde(default, alias = "pos", deserialize_with = "position")]
    pub position: Position,
    /// Legacy zone tag (`door` column). Carried through, never interpreted.
    #[serde(
        default,
        alias = "door",
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub zone: Option<String>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient::optional_text(deserializer)?
        .filter(|category| !category.trim().is_empty())
        .unwrap_or_else(default_category))
}

fn position<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Position, D::Error> {
    Ok(lenient::optional_record(deserializer)?.unwrap_or_default())
}

impl Note {
    /// A note with only an id; everything else takes its default.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: default_category(),
            tag_label: String::new(),
            headline: String::new(),
            title: String::new(),
            short: String::new(),
            due: String::new(),
            link: None,
            body: String::new(),
            position: Position::default(),
            zone: None,
        }
    }

    /// Card headline: the headline, else the title.
    pub fn display_headline(&self) -> &str {
        if self.headline.is_empty() {
            &self.title
        } else {
            &self.headline
        }
    }

    /// Due caption for the detail view, `None` when there is no due text.
    pub fn due_caption(&self) -> Option<String> {
        if self.due.is_empty() {
            None
        } else {
            Some(format!("Προθεσμία: {}", self.due))
        }
    }

    /// Whether this record should be rendered at all.
    pub fn is_renderable(&self) -> bool {
        !self.id.is_empty() && self.id != META_ROW_ID
    }
}

/// Turn a raw link cell into a fetchable link.
///
/// Blank input yields `None`; anything not already starting with `http`
/// gets `https://` prefixed.
pub fn normalize_link(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.starts_with("http") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{}", trimmed))
    }
}
