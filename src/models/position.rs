use serde::{Deserialize, Deserializer, Serialize};

use super::lenient;

/// Horizontal position used when the feed has no usable `x`.
pub const DEFAULT_X: f64 = 50.0;
/// Vertical position used when the feed has no usable `y`.
pub const DEFAULT_Y: f64 = 50.0;
/// Rotation used when the feed has no usable `rot`.
pub const DEFAULT_ROTATION: f64 = 0.0;

/// Where a note sits on the board, in percent of the fitted image box.
///
/// `x` and `y` address the note's center; `rotation` is in degrees.
/// Always fully populated: absent, null or non-numeric fields deserialize to
/// the defaults, and numeric strings are read like sheet cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default = "default_x", deserialize_with = "lenient_x")]
    pub x: f64,
    #[serde(default = "default_y", deserialize_with = "lenient_y")]
    pub y: f64,
    #[serde(
        default = "default_rotation",
        alias = "rot",
        deserialize_with = "lenient_rotation"
    )]
    pub rotation: f64,
}

fn default_x() -> f64 {
    DEFAULT_X
}

fn default_y() -> f64 {
    DEFAULT_Y
}

fn default_rotation() -> f64 {
    DEFAULT_ROTATION
}

fn lenient_x<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient::optional_number(deserializer)?.unwrap_or(DEFAULT_X))
}

fn lenient_y<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient::optional_number(deserializer)?.unwrap_or(DEFAULT_Y))
}

fn lenient_rotation<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient::optional_number(deserializer)?.unwrap_or(DEFAULT_ROTATION))
}

impl Default for Position {
    fn default() -> Self {
        Self {
            x: DEFAULT_X,
            y: DEFAULT_Y,
            rotation: DEFAULT_ROTATION,
        }
    }
}

impl Position {
    pub fn new(x: f64, y: f64, rotation: f64) -> Self {
        Self { x, y, rotation }
    }

    /// Shallow overlay: fields present in `patch` win, the rest are kept.
    pub fn overlay(&self, patch: &PartialPosition) -> Self {
        Self {
            x: patch.x.unwrap_or(self.x),
            y: patch.y.unwrap_or(self.y),
            rotation: patch.rotation.unwrap_or(self.rotation),
        }
    }
}

/// A position edit where every field is optional. Unusable values read as
/// absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialPosition {
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub x: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub y: Option<f64>,
    #[serde(
        default,
        alias = "rot",
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub rotation: Option<f64>,
}

impl PartialPosition {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.rotation.is_none()
    }
}

impl From<Position> for PartialPosition {
    fn from(position: Position) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            rotation: Some(position.rotation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_keeps_unspecified_fields() {
        let base = Position::new(10.0, 20.0, 5.0);
        let patch = PartialPosition {
            x: Some(70.0),
            ..Default::default()
        };
        assert_eq!(base.overlay(&patch), Position::new(70.0, 20.0, 5.0));
    }

    #[test]
    fn deserializes_legacy_rot_key_and_fills_defaults() {
        let position: Position = serde_json::from_str(r#"{"x": 12.5, "rot": -3}"#).unwrap();
        assert_eq!(position, Position::new(12.5, DEFAULT_Y, -3.0));
    }

    #[test]
    fn unusable_coordinates_fall_back() {
        let position: Position =
            serde_json::from_str(r#"{"x": "12", "y": null, "rot": "tilted"}"#).unwrap();
        assert_eq!(position, Position::new(12.0, DEFAULT_Y, DEFAULT_ROTATION));

        let partial: PartialPosition = serde_json::from_str(r#"{"x": "bad", "y": 40}"#).unwrap();
        assert_eq!(partial.x, None);
        assert_eq!(partial.y, Some(40.0));
    }

    #[test]
    fn empty_partial_is_empty() {
        assert!(PartialPosition::default().is_empty());
        assert!(!PartialPosition::from(Position::default()).is_empty());
    }
}
