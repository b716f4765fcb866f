//! One-shot reveal sequence played after loading completes.
//!
//! The sequence is a small state machine driven by the elapsed session time.
//! All offsets are measured from the moment [`LoadComplete`] is received:
//!
//! | offset | action                                   |
//! |--------|------------------------------------------|
//! | 1.0 s  | hide the loading indicator               |
//! | 1.5 s  | overlay fade starts (1.5 s, ease-out)    |
//! | 1.8 s  | car becomes visible                      |
//! | 3.0 s  | debug panel opens, overlay fully clear   |
//!
//! The clock is [`Time<Real>`]: a long stalled frame (first shader compile, a
//! slow decode) must not stretch the offsets the way clamped virtual time would.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::{
    loading::{LoadComplete, LoadingIndicator},
    materials::{OverlayMaterial, ShowcaseMaterials},
    scene::{ShowcaseCar, ShowcaseModel},
    ui::DebugPanel,
};

/// Delay between completion and hiding the loading indicator.
pub const HIDE_INDICATOR_DELAY: f64 = 1.0;
/// Delay between hiding the indicator and starting the overlay fade.
pub const FADE_DELAY: f64 = 0.5;
/// Length of the overlay fade.
pub const FADE_DURATION: f64 = 1.5;
/// Delay between hiding the indicator and revealing the car.
pub const REVEAL_CAR_DELAY: f64 = 0.8;
/// Delay between hiding the indicator and opening the debug panel.
pub const OPEN_PANEL_DELAY: f64 = 2.0;

/// Plugin for the post-load reveal sequence.
pub struct RevealPlugin;

impl Plugin for RevealPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RevealSequencer>().add_systems(
            Update,
            (
                start_reveal,
                advance_reveal,
                fade_overlay.run_if(resource_exists::<ShowcaseMaterials>),
            )
                .chain(),
        );
    }
}

/// Where the sequence currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// Waiting for loading to complete.
    Loading,
    /// Loading completed; the indicator is still up.
    AwaitingReveal,
    /// Indicator hidden; overlay fade scheduled or running.
    FadingOverlay,
    /// Car visible; overlay still fading.
    RevealingModel,
    /// Debug panel open.
    PanelOpen,
    /// Sequence finished. Terminal.
    Idle,
}

/// A side effect the sequence asks for. Each is produced exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealAction {
    HideIndicator,
    RevealCar,
    OpenPanel,
}

/// Timer-driven reveal state machine.
#[derive(Resource, Debug, Clone)]
pub struct RevealSequencer {
    phase: RevealPhase,
    triggered_at: Option<f64>,
    initial_alpha: f32,
}

impl Default for RevealSequencer {
    fn default() -> Self {
        Self {
            phase: RevealPhase::Loading,
            triggered_at: None,
            initial_alpha: 1.0,
        }
    }
}

impl RevealSequencer {
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Time at which loading completed, if it has.
    pub fn triggered_at(&self) -> Option<f64> {
        self.triggered_at
    }

    /// Start the sequence. Returns false (and changes nothing) if it was
    /// already started.
    pub fn trigger(&mut self, now: f64) -> bool {
        if self.triggered_at.is_some() {
            return false;
        }
        self.triggered_at = Some(now);
        self.phase = RevealPhase::AwaitingReveal;
        true
    }

    /// Advance to `now`, returning every action whose time has come, in order.
    pub fn advance(&mut self, now: f64) -> Vec<RevealAction> {
        let Some(start) = self.triggered_at else {
            return Vec::new();
        };
        let since_hide = now - start - HIDE_INDICATOR_DELAY;

        let mut actions = Vec::new();
        loop {
            let next = match self.phase {
                RevealPhase::AwaitingReveal if since_hide >= 0.0 => {
                    actions.push(RevealAction::HideIndicator);
                    RevealPhase::FadingOverlay
                }
                RevealPhase::FadingOverlay if since_hide >= REVEAL_CAR_DELAY => {
                    actions.push(RevealAction::RevealCar);
                    RevealPhase::RevealingModel
                }
                RevealPhase::RevealingModel if since_hide >= OPEN_PANEL_DELAY => {
                    actions.push(RevealAction::OpenPanel);
                    RevealPhase::PanelOpen
                }
                RevealPhase::PanelOpen if since_hide >= FADE_DELAY + FADE_DURATION => {
                    RevealPhase::Idle
                }
                _ => break,
            };
            tracing::info!("Reveal: {:?} -> {next:?}", self.phase);
            self.phase = next;
        }
        actions
    }

    /// Overlay opacity at `now`.
    ///
    /// Holds the initial value until the fade starts, then eases out to zero
    /// and stays there.
    pub fn overlay_alpha(&self, now: f64) -> f32 {
        let Some(start) = self.triggered_at else {
            return self.initial_alpha;
        };
        let fade_start = start + HIDE_INDICATOR_DELAY + FADE_DELAY;
        let t = ((now - fade_start) / FADE_DURATION).clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation)]
        let remaining = ((1.0 - t) * (1.0 - t)) as f32;
        self.initial_alpha * remaining
    }
}

/// Start the sequence when loading completes.
fn start_reveal(
    time: Res<Time<Real>>,
    mut completions: MessageReader<LoadComplete>,
    mut sequencer: ResMut<RevealSequencer>,
) {
    for _ in completions.read() {
        let now = time.elapsed_secs_f64();
        if sequencer.trigger(now) {
            tracing::info!("Loading complete at {now:.3}s, starting reveal");
        } else {
            tracing::warn!("Ignoring repeated load completion at {now:.3}s");
        }
    }
}

/// Run the actions that have come due.
fn advance_reveal(
    mut commands: Commands,
    time: Res<Time<Real>>,
    mut sequencer: ResMut<RevealSequencer>,
    mut indicator: ResMut<LoadingIndicator>,
    model: Res<ShowcaseModel>,
    mut cars: Query<&mut Visibility, With<ShowcaseCar>>,
) {
    for action in sequencer.advance(time.elapsed_secs_f64()) {
        match action {
            RevealAction::HideIndicator => indicator.visible = false,
            RevealAction::RevealCar => match model.car.map(|car| cars.get_mut(car)) {
                Some(Ok(mut visibility)) => *visibility = Visibility::Inherited,
                Some(Err(err)) => tracing::error!("Cannot reveal car: {err}"),
                None => tracing::error!("Cannot reveal car: it was not found in the scene"),
            },
            RevealAction::OpenPanel => commands.init_resource::<DebugPanel>(),
        }
    }
}

/// Mirror the sequencer's overlay opacity into the overlay material.
fn fade_overlay(
    time: Res<Time<Real>>,
    sequencer: Res<RevealSequencer>,
    showcase: Res<ShowcaseMaterials>,
    mut overlays: ResMut<Assets<OverlayMaterial>>,
) {
    let alpha = sequencer.overlay_alpha(time.elapsed_secs_f64());
    // Only touch the asset when the value changes, so it is not re-uploaded every frame.
    if overlays
        .get(&showcase.overlay)
        .is_some_and(|material| material.alpha() != alpha)
        && let Some(material) = overlays.get_mut(&showcase.overlay)
    {
        material.set_alpha(alpha);
    }
}
