//! Position export for pasting back into the sheet.

use thiserror::Error;

use crate::models::FeedSnapshot;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to flush export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// `id,x,y,rot` rows with two decimals, in board order.
pub fn positions_csv(feed: &FeedSnapshot) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(["id", "x", "y", "rot"])?;
    for note in &feed.items {
        let x = format!("{:.2}", note.position.x);
        let y = format!("{:.2}", note.position.y);
        let rot = format!("{:.2}", note.position.rotation);
        writer.write_record([note.id.as_str(), x.as_str(), y.as_str(), rot.as_str()])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// The CSV block followed by a JSON backup of the whole snapshot.
pub fn export_positions(feed: &FeedSnapshot) -> Result<String, ExportError> {
    let csv = positions_csv(feed)?;
    let json = serde_json::to_string_pretty(feed)?;
    Ok(format!(
        "/* CSV (paste in sheet): */\n{}\n\n/* JSON (backup): */\n{}\n",
        csv.trim_end(),
        json
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Note, Position};

    fn feed() -> FeedSnapshot {
        let mut note = Note::new("1");
        note.position = Position::new(12.3456, 50.0, -2.5);
        let mut quoted = Note::new("a,b");
        quoted.position = Position::default();
        FeedSnapshot::new("Week 3", vec![note, quoted])
    }

    #[test]
    fn csv_has_header_and_two_decimals() {
        let csv = positions_csv(&feed()).unwrap();
        assert_eq!(csv, "id,x,y,rot\n1,12.35,50.00,-2.50\n\"a,b\",50.00,50.00,0.00\n");
    }

    #[test]
    fn combined_export_contains_both_blocks() {
        let out = export_positions(&feed()).unwrap();
        assert!(out.starts_with("/* CSV (paste in sheet): */\nid,x,y,rot\n"));
        assert!(out.contains("\n\n/* JSON (backup): */\n{"));
        assert!(out.contains("\"label\": \"Week 3\""));
    }
}
