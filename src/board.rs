//! Application state for one board session.
//!
//! Owns the loaded snapshot, the override store and the interaction state, so
//! the ingestion functions themselves stay stateless.

use crate::capability::Capability;
use crate::config::BoardConfig;
use crate::export::{export_positions, ExportError};
use crate::geometry::{DragGesture, GestureOutcome, Layout, Percent, Point, RelayoutQueue};
use crate::ingest::FeedLoader;
use crate::models::FeedSnapshot;
use crate::overrides::OverrideStore;

pub struct Board {
    config: BoardConfig,
    loader: FeedLoader,
    store: OverrideStore,
    snapshot: FeedSnapshot,
    container: Option<(f64, f64)>,
    layout: Option<Layout>,
    relayout: RelayoutQueue,
    gesture: DragGesture,
}

impl Board {
    pub fn new(config: BoardConfig, capability: Capability) -> Self {
        let store = OverrideStore::with_key(
            config.resolved_overrides_path(),
            config.storage_key.clone(),
            capability,
        );
        Self::with_store(config, store)
    }

    pub fn with_store(config: BoardConfig, store: OverrideStore) -> Self {
        Self {
            loader: FeedLoader::from_config(&config),
            gesture: DragGesture::new(config.drag_threshold),
            config,
            store,
            snapshot: FeedSnapshot::unavailable(),
            container: None,
            layout: None,
            relayout: RelayoutQueue::new(),
        }
    }

    pub fn capability(&self) -> Capability {
        self.store.capability()
    }

    pub fn store(&self) -> &OverrideStore {
        &self.store
    }

    pub fn snapshot(&self) -> &FeedSnapshot {
        &self.snapshot
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Fetch the feed and apply overrides (privileged sessions only).
    pub async fn load(&mut self) -> &FeedSnapshot {
        let snapshot = self.loader.load().await;
        self.snapshot = self.store.merge(&snapshot);
        if self.capability().is_privileged() {
            tracing::info!("Admin mode on");
        }
        self.relayout.schedule();
        &self.snapshot
    }

    /// Record a new container size; layout happens on the next frame.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.container = Some((width, height));
        self.relayout.schedule();
    }

    /// Run the pending relayout, if any. Returns the current layout.
    pub fn frame(&mut self) -> Option<&Layout> {
        if self.relayout.take() {
            if let Some((width, height)) = self.container {
                self.layout =
                    Layout::compute(width, height, self.config.aspect_ratio, &self.config.scale);
            }
        }
        self.layout.as_ref()
    }

    /// Begin dragging `id`. Ignored for read-only sessions and unknown ids.
    pub fn pointer_down(&mut self, id: &str, pointer: Point) -> bool {
        if !self.capability().is_privileged() {
            return false;
        }
        let Some(note) = self.snapshot.get(id) else {
            return false;
        };
        self.gesture.press(id, pointer, note.position.rotation);
        true
    }

    /// Live percent position of the dragged note.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Percent> {
        let rect = self.layout?.image_box;
        self.gesture.drag(pointer, &rect, self.config.clamp)
    }

    /// Finish the gesture. A drag is persisted and applied to the snapshot.
    pub fn pointer_up(&mut self, pointer: Point) -> Option<GestureOutcome> {
        let Some(layout) = self.layout else {
            self.gesture.cancel();
            return None;
        };
        let outcome = self
            .gesture
            .release(pointer, &layout.image_box, self.config.clamp)?;

        if let GestureOutcome::Moved { id, position } = &outcome {
            if let Err(e) = self.store.save(id, *position) {
                tracing::error!("Failed to save override for {}: {}", id, e);
            }
            if let Some(note) = self.snapshot.items.iter_mut().find(|note| &note.id == id) {
                note.position = *position;
            }
        }
        Some(outcome)
    }

    /// Positions CSV plus JSON backup of the current snapshot.
    pub fn export(&self) -> Result<String, ExportError> {
        export_positions(&self.snapshot)
    }
}
