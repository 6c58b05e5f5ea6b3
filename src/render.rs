//! Plain-text board rendering.

use crate::models::{FeedSnapshot, Note};

const DEFAULT_COLOR: &str = "#ffe88a";

/// Card background for a category. Unknown categories use the meeting color.
pub fn category_color(category: &str) -> &'static str {
    match category {
        "meeting" => "#ffe88a",
        "sales" => "#b7f7c7",
        "update" => "#a9ddff",
        "urgent" => "#ff9aa2",
        "fyi" => "#dcc7ff",
        _ => DEFAULT_COLOR,
    }
}

/// Accent stripe for the numbered notes 1 to 8.
pub fn id_accent(id: &str) -> Option<&'static str> {
    match id {
        "1" => Some("#3B82F6"),
        "2" => Some("#22C55E"),
        "3" => Some("#A855F7"),
        "4" => Some("#F97316"),
        "5" => Some("#EF4444"),
        "6" => Some("#06B6D4"),
        "7" => Some("#EAB308"),
        "8" => Some("#EC4899"),
        _ => None,
    }
}

/// Render a snapshot as one caption line plus one line per note.
///
/// Example output:
/// ```text
/// Week 3
/// ● #1 [urgent #ff9aa2] Release freeze  (10.0, 20.0) 5°  ⏰ Friday
/// ○ #12 [fyi #dcc7ff] Parking  (50.0, 50.0) 0°
/// ```
pub fn render_board(feed: &FeedSnapshot) -> String {
    let mut output = String::new();
    output.push_str(&feed.label);
    output.push('\n');
    for note in &feed.items {
        render_note(&mut output, note);
    }
    output
}

fn render_note(output: &mut String, note: &Note) {
    // Accented notes get a filled marker, like the badge on the card.
    let marker = if id_accent(&note.id).is_some() { '●' } else { '○' };
    output.push_str(&format!(
        "{} #{} [{} {}] {}  ({:.1}, {:.1}) {}°",
        marker,
        note.id,
        note.category,
        category_color(&note.category),
        note.display_headline(),
        note.position.x,
        note.position.y,
        note.position.rotation
    ));
    if !note.due.is_empty() {
        output.push_str("  ⏰ ");
        output.push_str(&note.due);
    }
    output.push('\n');
}
