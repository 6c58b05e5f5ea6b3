//! Maps parsed sheet rows onto [`Note`] records.
//!
//! Every field has one named default (see [`Field`]), so a hand-edited sheet
//! with missing columns, blank cells or stray text in numeric cells still
//! yields a complete board.

use std::collections::HashMap;

use crate::models::{
    normalize_link, FeedSnapshot, Note, Position, DEFAULT_CATEGORY, DEFAULT_LABEL, DEFAULT_ROTATION,
    DEFAULT_X, DEFAULT_Y, META_ROW_ID,
};

use super::tabular::{self, Delimiter};

/// Recognized sheet columns. Lookup is case-insensitive; others are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Type,
    TagLabel,
    Headline,
    Title,
    Short,
    Due,
    Link,
    Body,
    X,
    Y,
    Rot,
    Door,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Id,
        Field::Type,
        Field::TagLabel,
        Field::Headline,
        Field::Title,
        Field::Short,
        Field::Due,
        Field::Link,
        Field::Body,
        Field::X,
        Field::Y,
        Field::Rot,
        Field::Door,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Type => "type",
            Self::TagLabel => "taglabel",
            Self::Headline => "headline",
            Self::Title => "title",
            Self::Short => "short",
            Self::Due => "due",
            Self::Link => "link",
            Self::Body => "body",
            Self::X => "x",
            Self::Y => "y",
            Self::Rot => "rot",
            Self::Door => "door",
        }
    }

    /// Value used when the column is missing or the cell is blank.
    pub fn default_text(self) -> &'static str {
        match self {
            Self::Type => DEFAULT_CATEGORY,
            _ => "",
        }
    }

    /// Value used when a numeric cell is missing or not a finite number.
    pub fn default_number(self) -> Option<f64> {
        match self {
            Self::X => Some(DEFAULT_X),
            Self::Y => Some(DEFAULT_Y),
            Self::Rot => Some(DEFAULT_ROTATION),
            _ => None,
        }
    }
}

const BOM: char = '\u{feff}';

/// Column positions by lower-cased, trimmed header name. The first column
/// with a given name wins.
#[derive(Debug, Clone, Default)]
pub struct Header {
    columns: HashMap<String, usize>,
}

impl Header {
    pub fn from_row(cells: &[String]) -> Self {
        let mut columns = HashMap::new();
        for (index, cell) in cells.iter().enumerate() {
            let name = cell.trim_matches(|c: char| c.is_whitespace() || c == BOM);
            columns.entry(name.to_lowercase()).or_insert(index);
        }
        Self { columns }
    }

    pub fn index(&self, name: &str) -> Option<usize> {
        self.columns.get(&name.to_lowercase()).copied()
    }
}

struct Row<'a> {
    header: &'a Header,
    cells: &'a [String],
}

impl Row<'_> {
    fn raw(&self, name: &str) -> &str {
        self.header
            .index(name)
            .and_then(|index| self.cells.get(index))
            .map(|cell| cell.trim())
            .unwrap_or("")
    }

    fn text(&self, field: Field) -> String {
        let value = self.raw(field.column());
        if value.is_empty() {
            field.default_text().to_string()
        } else {
            value.to_string()
        }
    }

    fn number(&self, field: Field) -> f64 {
        let fallback = field.default_number().unwrap_or(0.0);
        parse_number(self.raw(field.column())).unwrap_or(fallback)
    }
}

/// Lenient number parsing for sheet cells.
///
/// The first decimal comma becomes a point, then the longest numeric prefix
/// is parsed (`"12.5%"` is 12.5). Non-finite results count as unparseable.
pub fn parse_number(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replacen(',', ".", 1);
    let end = float_prefix_len(&normalized);
    if end == 0 {
        return None;
    }
    normalized[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Length of the longest prefix shaped like `[+-]digits[.digits][e[+-]digits]`,
/// with at least one mantissa digit. Zero when there is none.
fn float_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start.min(bytes.len())..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let whole = digits_from(end);
    end += whole;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if whole + fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole + fraction == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }
    end
}

fn unescape_newlines(body: &str) -> String {
    body.replace("\\n", "\n")
}

fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|cell| cell.trim().is_empty())
}

/// Build a snapshot from a header row and the data rows below it.
///
/// Blank rows are dropped first. The `meta_week` row supplies the label
/// (title, else headline, else body) and is not a note; rows without an id
/// are skipped. Source order is kept.
pub fn map_rows(header_row: &[String], data_rows: &[Vec<String>]) -> FeedSnapshot {
    let header = Header::from_row(header_row);
    let mut label = String::new();
    let mut items = Vec::new();

    for cells in data_rows.iter().filter(|cells| !is_blank(cells)) {
        let row = Row {
            header: &header,
            cells,
        };
        let note = map_row(&row);

        if note.id == META_ROW_ID {
            label = [&note.title, &note.headline, &note.body]
                .into_iter()
                .find(|value| !value.is_empty())
                .cloned()
                .unwrap_or_default();
            continue;
        }

        if note.is_renderable() {
            items.push(note);
        }
    }

    if label.is_empty() {
        label = DEFAULT_LABEL.to_string();
    }

    tracing::debug!(notes = items.len(), label = %label, "Mapped sheet rows");
    FeedSnapshot::new(label, items)
}

fn map_row(row: &Row<'_>) -> Note {
    let zone = row.text(Field::Door);
    Note {
        id: row.text(Field::Id),
        category: row.text(Field::Type).to_lowercase(),
        tag_label: row.text(Field::TagLabel),
        headline: row.text(Field::Headline),
        title: row.text(Field::Title),
        short: row.text(Field::Short),
        due: row.text(Field::Due),
        link: normalize_link(&row.text(Field::Link)),
        body: unescape_newlines(&row.text(Field::Body)),
        position: Position {
            x: row.number(Field::X),
            y: row.number(Field::Y),
            rotation: row.number(Field::Rot),
        },
        zone: (!zone.is_empty()).then_some(zone),
    }
}

/// Full text-to-snapshot step: detect the delimiter, parse, split off the
/// header, map.
pub fn csv_to_feed(text: &str) -> FeedSnapshot {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let delimiter = Delimiter::detect(text);
    let mut rows = tabular::parse(text, delimiter.as_char());
    if rows.is_empty() {
        return map_rows(&[], &[]);
    }
    let header = rows.remove(0);
    map_rows(&header, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parse_number_accepts_decimal_comma() {
        assert_eq!(parse_number("12,5"), Some(12.5));
        assert_eq!(parse_number(" -3.25 "), Some(-3.25));
    }

    #[test]
    fn parse_number_takes_numeric_prefix() {
        assert_eq!(parse_number("40%"), Some(40.0));
        assert_eq!(parse_number("1e2px"), Some(100.0));
    }

    #[test]
    fn parse_number_rejects_garbage_and_infinity() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1e400"), None);
    }

    #[test]
    fn parse_number_handles_partial_exponents_and_points() {
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("2e"), Some(2.0));
        assert_eq!(parse_number("2e+"), Some(2.0));
        assert_eq!(parse_number("-1.5e-1x"), Some(-0.15));
        assert_eq!(parse_number("-.e5"), None);
        assert_eq!(parse_number("+"), None);
    }

    #[test]
    fn parse_number_scans_long_junk_once() {
        let junk = "-.".repeat(100_000);
        assert_eq!(parse_number(&junk), None);

        let digits = format!("7{}", "-.".repeat(100_000));
        assert_eq!(parse_number(&digits), Some(7.0));
    }

    #[test]
    fn column_names_are_unique_and_lowercase() {
        let names: std::collections::HashSet<&str> =
            Field::ALL.iter().map(|field| field.column()).collect();
        assert_eq!(names.len(), Field::ALL.len());
        assert!(names.iter().all(|name| *name == name.to_lowercase()));
    }

    #[test]
    fn only_numeric_fields_have_number_defaults() {
        let numeric: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|field| field.default_number().is_some())
            .collect();
        assert_eq!(numeric, [Field::X, Field::Y, Field::Rot]);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let header = Header::from_row(&cells(&[" ID ", "TagLabel"]));
        assert_eq!(header.index("id"), Some(0));
        assert_eq!(header.index("tagLabel"), Some(1));
        assert_eq!(header.index("taglabel"), Some(1));
        assert_eq!(header.index("x"), None);
    }

    #[test]
    fn mixed_case_tag_label_column_resolves() {
        let feed = map_rows(
            &cells(&["id", "tagLabel"]),
            &[cells(&["1", "Sales"])],
        );
        assert_eq!(feed.items[0].tag_label, "Sales");
    }

    #[test]
    fn every_field_has_a_default() {
        let feed = map_rows(&cells(&["id"]), &[cells(&["9"])]);
        let note = &feed.items[0];
        assert_eq!(note.category, DEFAULT_CATEGORY);
        assert_eq!(note.position, Position::default());
        assert!(note.link.is_none());
        assert!(note.zone.is_none());
        assert_eq!(feed.label, DEFAULT_LABEL);
    }

    #[test]
    fn body_escapes_become_newlines() {
        let feed = map_rows(
            &cells(&["id", "body"]),
            &[cells(&["1", "line one\\nline two"])],
        );
        assert_eq!(feed.items[0].body, "line one\nline two");
    }

    #[test]
    fn category_is_lowercased() {
        let feed = map_rows(&cells(&["id", "type"]), &[cells(&["1", "URGENT"])]);
        assert_eq!(feed.items[0].category, "urgent");
    }

    #[test]
    fn meta_row_label_priority() {
        let feed = map_rows(
            &cells(&["id", "headline", "body"]),
            &[cells(&["meta_week", "", "Week 9"])],
        );
        assert_eq!(feed.label, "Week 9");
        assert!(feed.items.is_empty());
    }

    #[test]
    fn door_column_becomes_zone() {
        let feed = map_rows(&cells(&["id", "DOOR"]), &[cells(&["1", "top"])]);
        assert_eq!(feed.items[0].zone.as_deref(), Some("top"));
    }

    #[test]
    fn byte_order_mark_does_not_hide_the_first_column() {
        let feed = csv_to_feed("\u{feff}id,x\n1,10\n");
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].position.x, 10.0);

        let header = Header::from_row(&cells(&["\u{feff}ID", "x"]));
        assert_eq!(header.index("id"), Some(0));
    }

    #[test]
    fn csv_to_feed_handles_empty_text() {
        let feed = csv_to_feed("");
        assert!(feed.items.is_empty());
        assert_eq!(feed.label, DEFAULT_LABEL);
    }
}
