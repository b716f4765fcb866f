//! Asset loading progress and completion.
//!
//! Every sub-resource the showcase needs before it can reveal itself is
//! registered with [`AssetLoading`]. A polling system watches the asset server
//! and turns finished items into [`LoadProgress`] messages, followed by exactly
//! one [`LoadComplete`] once the last item is in.
//!
//! A failed item is logged and never counts as loaded, so completion never
//! fires and the scene stays behind the loading indicator.

use bevy::asset::{LoadState, RecursiveDependencyLoadState, UntypedAssetId};
use bevy::ecs::message::{Message, MessageWriter};
use bevy::prelude::*;

/// Plugin for tracking asset loading.
pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AssetLoading>()
            .init_resource::<LoadingIndicator>()
            .add_message::<LoadProgress>()
            .add_message::<LoadComplete>()
            .add_systems(PreUpdate, poll_tracked_assets);
    }
}

/// One sub-resource finished loading.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct LoadProgress {
    /// Identifier (asset path) of the item that finished.
    pub item: String,
    /// Number of items finished so far, including this one.
    pub loaded: usize,
    /// Number of items registered so far.
    pub total: usize,
}

/// Every registered sub-resource has finished loading. Written once.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadComplete;

/// Output of [`LoadTracker::mark_loaded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    Progress(LoadProgress),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemState {
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug)]
struct TrackedItem {
    id: String,
    state: ItemState,
}

/// Counts finished items and fires completion exactly once.
#[derive(Debug, Default)]
pub struct LoadTracker {
    items: Vec<TrackedItem>,
    loaded: usize,
    completed: bool,
}

impl LoadTracker {
    /// Register an item. Returns false if it was already registered.
    pub fn register(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.items.iter().any(|item| item.id == id) {
            return false;
        }
        self.items.push(TrackedItem {
            id,
            state: ItemState::Pending,
        });
        true
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Whether any item has failed to load.
    pub fn has_failures(&self) -> bool {
        self.items.iter().any(|item| item.state == ItemState::Failed)
    }

    /// Whether the item is registered and still waiting.
    pub fn is_pending(&self, id: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.id == id && item.state == ItemState::Pending)
    }

    /// Record that an item finished.
    ///
    /// Returns a progress event, followed by the completion event if this was
    /// the last outstanding item. Unknown or already-settled items yield nothing.
    pub fn mark_loaded(&mut self, id: &str) -> Vec<LoadEvent> {
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.id == id && item.state == ItemState::Pending)
        else {
            return Vec::new();
        };
        item.state = ItemState::Loaded;
        self.loaded += 1;

        let mut events = vec![LoadEvent::Progress(LoadProgress {
            item: id.to_string(),
            loaded: self.loaded,
            total: self.items.len(),
        })];
        if !self.completed && self.loaded == self.items.len() {
            self.completed = true;
            events.push(LoadEvent::Complete);
        }
        events
    }

    /// Record that an item failed. Returns true the first time.
    pub fn mark_failed(&mut self, id: &str) -> bool {
        match self
            .items
            .iter_mut()
            .find(|item| item.id == id && item.state == ItemState::Pending)
        {
            Some(item) => {
                item.state = ItemState::Failed;
                true
            }
            None => false,
        }
    }
}

/// Sub-resources the showcase waits on, with their asset handles.
#[derive(Resource, Default)]
pub struct AssetLoading {
    tracker: LoadTracker,
    handles: Vec<(String, UntypedAssetId)>,
}

impl AssetLoading {
    /// Start tracking a handle under its asset path.
    pub fn track<A: Asset>(&mut self, path: impl Into<String>, handle: &Handle<A>) {
        let path = path.into();
        if self.tracker.register(path.clone()) {
            self.handles.push((path, handle.id().untyped()));
        }
    }

    pub fn tracker(&self) -> &LoadTracker {
        &self.tracker
    }
}

/// State of the on-screen loading indicator.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadingIndicator {
    pub visible: bool,
    pub loaded: usize,
    pub total: usize,
}

/// Turn asset server state into progress and completion messages.
fn poll_tracked_assets(
    asset_server: Res<AssetServer>,
    mut loading: ResMut<AssetLoading>,
    mut indicator: ResMut<LoadingIndicator>,
    mut progress_writer: MessageWriter<LoadProgress>,
    mut complete_writer: MessageWriter<LoadComplete>,
) {
    if loading.tracker.is_complete() {
        return;
    }

    let AssetLoading { tracker, handles } = &mut *loading;
    for (path, id) in handles.iter() {
        if !tracker.is_pending(path) {
            continue;
        }

        if asset_server.is_loaded_with_dependencies(*id) {
            for event in tracker.mark_loaded(path) {
                match event {
                    LoadEvent::Progress(progress) => {
                        tracing::debug!(
                            "Loaded {} ({}/{})",
                            progress.item,
                            progress.loaded,
                            progress.total
                        );
                        indicator.visible = true;
                        indicator.loaded = progress.loaded;
                        indicator.total = progress.total;
                        progress_writer.write(progress);
                    }
                    LoadEvent::Complete => {
                        tracing::info!("All {} assets loaded", tracker.total());
                        complete_writer.write(LoadComplete);
                    }
                }
            }
            continue;
        }

        let failed = matches!(asset_server.get_load_state(*id), Some(LoadState::Failed(_)))
            || matches!(
                asset_server.get_recursive_dependency_load_state(*id),
                Some(RecursiveDependencyLoadState::Failed(_))
            );
        if failed && tracker.mark_failed(path) {
            tracing::error!("Failed to load {path}; the scene will stay in its loading state");
        } else if !indicator.visible {
            indicator.visible = true;
            indicator.total = tracker.total();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(items: &[&str]) -> LoadTracker {
        let mut tracker = LoadTracker::default();
        for item in items {
            assert!(tracker.register(*item));
        }
        tracker
    }

    #[test]
    fn test_register_ignores_duplicates() {
        let mut tracker = tracker_with(&["a"]);
        assert!(!tracker.register("a"));
        assert_eq!(tracker.total(), 1);
    }

    #[test]
    fn test_progress_counts_up_and_completes_once() {
        let mut tracker = tracker_with(&["model.glb", "hologram.wgsl", "overlay.wgsl"]);
        let mut all = Vec::new();
        for item in ["hologram.wgsl", "model.glb", "overlay.wgsl"] {
            all.extend(tracker.mark_loaded(item));
        }

        let loaded: Vec<usize> = all
            .iter()
            .filter_map(|event| match event {
                LoadEvent::Progress(progress) => Some(progress.loaded),
                LoadEvent::Complete => None,
            })
            .collect();
        assert_eq!(loaded, vec![1, 2, 3]);

        let completions = all
            .iter()
            .filter(|event| **event == LoadEvent::Complete)
            .count();
        assert_eq!(completions, 1);
        assert_eq!(all.last(), Some(&LoadEvent::Complete));
        assert!(tracker.is_complete());
    }

    #[test]
    fn test_mark_loaded_twice_is_ignored() {
        let mut tracker = tracker_with(&["a", "b"]);
        assert_eq!(tracker.mark_loaded("a").len(), 1);
        assert!(tracker.mark_loaded("a").is_empty());
        assert_eq!(tracker.loaded(), 1);
    }

    #[test]
    fn test_unknown_item_yields_nothing() {
        let mut tracker = tracker_with(&["a"]);
        assert!(tracker.mark_loaded("nope").is_empty());
        assert!(!tracker.is_complete());
    }

    #[test]
    fn test_total_grows_as_items_are_discovered() {
        let mut tracker = tracker_with(&["a"]);
        let first = tracker.mark_loaded("a");
        // The only known item finished, so completion fires with what is known.
        assert_eq!(
            first[0],
            LoadEvent::Progress(LoadProgress {
                item: "a".to_string(),
                loaded: 1,
                total: 1,
            })
        );
        assert_eq!(first.len(), 2);

        // Items discovered after completion never re-fire it.
        tracker.register("b");
        let second = tracker.mark_loaded("b");
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_failure_blocks_completion() {
        let mut tracker = tracker_with(&["a", "b"]);
        assert!(tracker.mark_failed("b"));
        assert!(!tracker.mark_failed("b"));
        let events = tracker.mark_loaded("a");
        assert_eq!(events.len(), 1);
        assert!(!tracker.is_complete());
        assert!(tracker.has_failures());
        // A failed item cannot be marked loaded later.
        assert!(tracker.mark_loaded("b").is_empty());
    }
}
