use crate::models::Position;

use super::{pointer_to_percent, BoxRect, ClampPolicy, Percent, Point};

/// Pointer travel, in device pixels, after which a press counts as a drag.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
enum GestureState {
    Idle,
    Dragging {
        id: String,
        start: Point,
        rotation: f64,
        moved: bool,
    },
}

/// How a finished gesture should be handled.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// The pointer barely moved: open the note.
    Click { id: String },
    /// The note was dragged; `position` is ready for the override store.
    Moved { id: String, position: Position },
}

/// Press/drag/release tracking for repositioning one note at a time.
///
/// `idle -> dragging -> idle`. While dragging, `moved` latches once the
/// pointer leaves the threshold square around the press point, telling a
/// click apart from a drag on release.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    threshold: f64,
    state: GestureState,
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl DragGesture {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            state: GestureState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Start dragging note `id`, remembering its current rotation.
    pub fn press(&mut self, id: impl Into<String>, pointer: Point, rotation: f64) {
        self.state = GestureState::Dragging {
            id: id.into(),
            start: pointer,
            rotation,
            moved: false,
        };
    }

    /// Live position for a pointer move. `None` when idle or `rect` is
    /// degenerate.
    pub fn drag(&mut self, pointer: Point, rect: &BoxRect, clamp: ClampPolicy) -> Option<Percent> {
        self.track(pointer)?;
        pointer_to_percent(pointer, rect, clamp)
    }

    /// Finish the gesture and return to idle.
    pub fn release(
        &mut self,
        pointer: Point,
        rect: &BoxRect,
        clamp: ClampPolicy,
    ) -> Option<GestureOutcome> {
        self.track(pointer)?;
        let GestureState::Dragging {
            id,
            rotation,
            moved,
            ..
        } = std::mem::replace(&mut self.state, GestureState::Idle)
        else {
            return None;
        };

        if !moved {
            return Some(GestureOutcome::Click { id });
        }

        match pointer_to_percent(pointer, rect, clamp) {
            Some(percent) => Some(GestureOutcome::Moved {
                id,
                position: Position::new(percent.x, percent.y, rotation),
            }),
            None => {
                tracing::warn!(id = %id, "Dropped drag over a board without area");
                None
            }
        }
    }

    /// Abandon the gesture without an outcome.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Latch `moved` if `pointer` left the threshold square. `None` when idle.
    fn track(&mut self, pointer: Point) -> Option<()> {
        let threshold = self.threshold;
        match &mut self.state {
            GestureState::Idle => None,
            GestureState::Dragging { start, moved, .. } => {
                if (pointer.x - start.x).abs() > threshold || (pointer.y - start.y).abs() > threshold
                {
                    *moved = true;
                }
                Some(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoxRect {
        BoxRect::new(0.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn small_wiggle_is_a_click() {
        let mut gesture = DragGesture::default();
        gesture.press("1", Point::new(50.0, 50.0), 3.0);
        gesture.drag(Point::new(52.0, 49.0), &board(), ClampPolicy::Strict);

        let outcome = gesture.release(Point::new(53.0, 51.0), &board(), ClampPolicy::Strict);
        assert_eq!(outcome, Some(GestureOutcome::Click { id: "1".to_string() }));
        assert!(!gesture.is_dragging());
    }

    #[test]
    fn drag_reports_position_with_rotation() {
        let mut gesture = DragGesture::default();
        gesture.press("4", Point::new(10.0, 10.0), -2.0);

        let live = gesture.drag(Point::new(100.0, 50.0), &board(), ClampPolicy::Strict);
        assert_eq!(live, Some(Percent { x: 50.0, y: 50.0 }));

        let outcome = gesture.release(Point::new(150.0, 25.0), &board(), ClampPolicy::Strict);
        assert_eq!(
            outcome,
            Some(GestureOutcome::Moved {
                id: "4".to_string(),
                position: Position::new(75.0, 25.0, -2.0),
            })
        );
    }

    #[test]
    fn moved_latches_even_if_pointer_returns() {
        let mut gesture = DragGesture::default();
        gesture.press("2", Point::new(10.0, 10.0), 0.0);
        gesture.drag(Point::new(40.0, 10.0), &board(), ClampPolicy::Strict);

        let outcome = gesture.release(Point::new(10.0, 10.0), &board(), ClampPolicy::Strict);
        assert!(matches!(outcome, Some(GestureOutcome::Moved { .. })));
    }

    #[test]
    fn idle_gesture_ignores_pointer() {
        let mut gesture = DragGesture::default();
        assert_eq!(gesture.drag(Point::new(1.0, 1.0), &board(), ClampPolicy::Strict), None);
        assert_eq!(gesture.release(Point::new(1.0, 1.0), &board(), ClampPolicy::Strict), None);

        gesture.press("3", Point::new(0.0, 0.0), 0.0);
        gesture.cancel();
        assert!(!gesture.is_dragging());
    }
}
