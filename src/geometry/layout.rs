use serde::Serialize;

use super::{fit_box, BoxRect, ScalePolicy};

/// Board geometry for one container size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layout {
    /// The fitted image box, relative to the container.
    pub image_box: BoxRect,
    /// Global note scale.
    pub note_scale: f64,
}

impl Layout {
    /// `None` for containers without area.
    pub fn compute(
        container_width: f64,
        container_height: f64,
        aspect: f64,
        scale: &ScalePolicy,
    ) -> Option<Self> {
        let Some(image_box) = fit_box(container_width, container_height, aspect) else {
            tracing::debug!(
                container_width,
                container_height,
                "Skipping layout for degenerate container"
            );
            return None;
        };
        let note_scale = scale.note_scale(&image_box)?;
        Some(Self {
            image_box,
            note_scale,
        })
    }
}

/// Coalesces relayout requests: any number of `schedule` calls before the
/// next frame produce exactly one `take() == true`.
#[derive(Debug, Default)]
pub struct RelayoutQueue {
    pending: bool,
}

impl RelayoutQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
