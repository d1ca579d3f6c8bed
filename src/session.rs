//! Host-facing session
//!
//! [`GameSession`] is what a window or a headless driver talks to: it owns
//! the simulation state, the pointer sampler and the audio cues, and turns
//! one host frame of input into one tick plus a draw list.

use glam::Vec2;

use crate::audio::{AudioManager, CueSink};
use crate::platform::{PointerSampler, PointerSource};
use crate::renderer::{RenderFrame, build_frame};
use crate::settings::Settings;
use crate::sim::{
    FocusChange, GameEvent, GameMode, GamePhase, SessionState, SessionSummary, TickInput, tick,
};

/// Discrete host input for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct HostInput {
    /// Window currently has focus, sampled together with the pointer
    pub has_focus: bool,
    pub clicked: bool,
    pub spawn_next: bool,
    pub focus_change: Option<FocusChange>,
    pub quit: bool,
}

#[derive(Debug)]
pub struct GameSession {
    state: SessionState,
    sampler: PointerSampler,
    audio: AudioManager,
    last_events: Vec<GameEvent>,
}

impl GameSession {
    /// `anchor` is the pointer recentre point, normally the window centre
    pub fn new(settings: Settings, seed: u64, anchor: Vec2) -> Self {
        let audio = AudioManager::new(None, &settings.audio);
        Self {
            state: SessionState::new(settings, seed),
            sampler: PointerSampler::new(anchor),
            audio,
            last_events: Vec::new(),
        }
    }

    pub fn with_audio(mut self, sink: Box<dyn CueSink>) -> Self {
        self.audio.set_sink(sink);
        self
    }

    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn summary(&self) -> SessionSummary {
        self.state.stats.summary()
    }

    /// Events produced by the last frame
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    /// Start a mode; the pointer baseline is reset to the current position
    pub fn start(&mut self, mode: GameMode, source: &mut dyn PointerSource) {
        let pos = source.position();
        self.sampler.resync(pos);
        self.state.start(mode);
        self.last_events = self.state.drain_events();
    }

    /// Run one tick of `dt` seconds and build the frame
    pub fn frame(
        &mut self,
        source: &mut dyn PointerSource,
        input: HostInput,
        dt: f32,
    ) -> RenderFrame {
        let locked_before = self.state.locked;

        // Read and recentre in one step, gated on the focus seen right now
        let recenter = self.state.locked && input.has_focus;
        let pointer_delta = self.sampler.sample(source, recenter);

        let tick_input = TickInput {
            pointer_delta,
            shoot: input.clicked,
            spawn_next: input.spawn_next,
            focus: input.focus_change,
            quit: input.quit,
        };
        tick(&mut self.state, &tick_input, dt);

        self.last_events = self.state.drain_events();
        let audible = (locked_before && input.focus_change != Some(FocusChange::Lost))
            || self.state.locked;
        self.audio.play_events(&self.last_events, audible);

        build_frame(&self.state)
    }

    pub fn return_to_menu(&mut self) {
        log::info!("Returning to menu");
        self.state.return_to_menu();
    }

    pub fn reset_stats(&mut self) {
        self.state.reset_stats();
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings.audio);
        self.state.apply_settings(settings);
    }

    /// Move the recentre point (window resized)
    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.sampler.set_anchor(anchor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StillPointer(Vec2);

    impl PointerSource for StillPointer {
        fn position(&mut self) -> Vec2 {
            self.0
        }

        fn warp_to(&mut self, pos: Vec2) {
            self.0 = pos;
        }
    }

    #[test]
    fn test_menu_frame_is_idle() {
        let anchor = Vec2::new(960.0, 540.0);
        let mut session = GameSession::new(Settings::default(), 1, anchor);
        let mut pointer = StillPointer(anchor);
        let frame = session.frame(&mut pointer, HostInput::default(), 0.001);
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(frame.targets.is_empty());
    }

    #[test]
    fn test_unfocused_pointer_is_not_warped() {
        let anchor = Vec2::new(960.0, 540.0);
        let mut session = GameSession::new(Settings::default(), 1, anchor);
        let mut pointer = StillPointer(anchor);
        session.start(GameMode::Random, &mut pointer);

        pointer.0 = Vec2::new(1000.0, 540.0);
        session.frame(
            &mut pointer,
            HostInput {
                has_focus: false,
                ..Default::default()
            },
            0.001,
        );
        assert_eq!(pointer.0, Vec2::new(1000.0, 540.0));

        session.frame(
            &mut pointer,
            HostInput {
                has_focus: true,
                ..Default::default()
            },
            0.001,
        );
        assert_eq!(pointer.0, anchor);
    }

    #[test]
    fn test_return_to_menu_and_restart() {
        let anchor = Vec2::ZERO;
        let mut session = GameSession::new(Settings::default(), 1, anchor);
        let mut pointer = StillPointer(anchor);
        session.start(GameMode::Debug, &mut pointer);
        assert_eq!(session.last_events(), &[GameEvent::Started(GameMode::Debug)]);
        session.return_to_menu();
        assert_eq!(session.phase(), GamePhase::Menu);
        session.start(GameMode::Shapes, &mut pointer);
        assert_eq!(session.phase(), GamePhase::Running);
    }
}
