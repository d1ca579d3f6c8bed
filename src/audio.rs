//! Audio cues
//!
//! The session names the sound; a host-provided [`CueSink`] makes it. Each
//! cue carries a short procedural tone description so a backend needs no
//! sound files.

use crate::settings::AudioSettings;
use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Click registered as a shot
    Fire,
    /// Shot hit a target
    Hit,
    /// Shot missed, or a target expired
    Miss,
    /// Tracking target drained
    Destroy,
}

/// Oscillator shape for a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

/// One procedurally generated tone: pitch sweep with a decaying envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Start frequency (Hz)
    pub freq_start: f32,
    /// End frequency (Hz), reached exponentially
    pub freq_end: f32,
    /// Seconds until the envelope has decayed
    pub duration: f32,
    /// Peak gain, already scaled by the effective volume
    pub gain: f32,
}

impl SoundCue {
    /// Tone at unit volume
    pub fn tone(&self) -> Tone {
        match self {
            // Short click
            SoundCue::Fire => Tone {
                waveform: Waveform::Square,
                freq_start: 900.0,
                freq_end: 400.0,
                duration: 0.03,
                gain: 0.15,
            },
            // Bright ping
            SoundCue::Hit => Tone {
                waveform: Waveform::Sine,
                freq_start: 880.0,
                freq_end: 1320.0,
                duration: 0.12,
                gain: 0.5,
            },
            // Dull thud
            SoundCue::Miss => Tone {
                waveform: Waveform::Triangle,
                freq_start: 180.0,
                freq_end: 90.0,
                duration: 0.15,
                gain: 0.35,
            },
            // Falling sweep
            SoundCue::Destroy => Tone {
                waveform: Waveform::Sine,
                freq_start: 1200.0,
                freq_end: 200.0,
                duration: 0.3,
                gain: 0.5,
            },
        }
    }
}

/// Which cue, if any, a session event sounds
pub fn cue_for(event: &GameEvent) -> Option<SoundCue> {
    match event {
        GameEvent::Fired => Some(SoundCue::Fire),
        GameEvent::Hit { .. } => Some(SoundCue::Hit),
        GameEvent::Missed | GameEvent::Expired { .. } => Some(SoundCue::Miss),
        GameEvent::Destroyed { .. } => Some(SoundCue::Destroy),
        _ => None,
    }
}

/// Playback backend supplied by the host
pub trait CueSink {
    fn play(&mut self, cue: SoundCue, tone: Tone);
}

/// Audio manager for the session
pub struct AudioManager {
    sink: Option<Box<dyn CueSink>>,
    master_volume: f32,
    muted: bool,
    warned: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None, &AudioSettings::default())
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("has_sink", &self.sink.is_some())
            .field("master_volume", &self.master_volume)
            .field("muted", &self.muted)
            .finish()
    }
}

impl AudioManager {
    pub fn new(sink: Option<Box<dyn CueSink>>, settings: &AudioSettings) -> Self {
        Self {
            sink,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            warned: false,
        }
    }

    /// Attach or replace the backend
    pub fn set_sink(&mut self, sink: Box<dyn CueSink>) {
        self.sink = Some(sink);
        self.warned = false;
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn apply_settings(&mut self, settings: &AudioSettings) {
        self.set_master_volume(settings.master_volume);
        self.set_muted(settings.muted);
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a cue; nothing sounds while the pointer is not locked
    pub fn play(&mut self, cue: SoundCue, locked: bool) {
        if !locked {
            return;
        }
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            if !self.warned {
                log::warn!("No audio backend - audio disabled");
                self.warned = true;
            }
            return;
        };
        let mut tone = cue.tone();
        tone.gain *= vol;
        sink.play(cue, tone);
    }

    /// Sound every cue-bearing event in order
    pub fn play_events(&mut self, events: &[GameEvent], locked: bool) {
        for cue in events.iter().filter_map(cue_for) {
            self.play(cue, locked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<(SoundCue, f32)>>>);

    impl CueSink for Recorder {
        fn play(&mut self, cue: SoundCue, tone: Tone) {
            self.0.borrow_mut().push((cue, tone.gain));
        }
    }

    fn manager(recorder: &Recorder) -> AudioManager {
        AudioManager::new(Some(Box::new(recorder.clone())), &AudioSettings::default())
    }

    #[test]
    fn test_events_map_to_cues() {
        assert_eq!(cue_for(&GameEvent::Fired), Some(SoundCue::Fire));
        assert_eq!(cue_for(&GameEvent::Missed), Some(SoundCue::Miss));
        assert_eq!(
            cue_for(&GameEvent::Expired { pos: Vec2::ZERO }),
            Some(SoundCue::Miss)
        );
        assert_eq!(
            cue_for(&GameEvent::Destroyed { pos: Vec2::ZERO }),
            Some(SoundCue::Destroy)
        );
        assert_eq!(cue_for(&GameEvent::Relocked), None);
    }

    #[test]
    fn test_suppressed_while_unlocked() {
        let recorder = Recorder::default();
        let mut audio = manager(&recorder);
        audio.play(SoundCue::Hit, false);
        assert!(recorder.0.borrow().is_empty());
        audio.play(SoundCue::Hit, true);
        assert_eq!(recorder.0.borrow().len(), 1);
    }

    #[test]
    fn test_volume_scales_gain_and_mute_silences() {
        let recorder = Recorder::default();
        let mut audio = manager(&recorder);
        audio.set_master_volume(0.5);
        audio.play(SoundCue::Hit, true);
        let gain = recorder.0.borrow()[0].1;
        assert!((gain - SoundCue::Hit.tone().gain * 0.5).abs() < 1e-6);

        audio.set_muted(true);
        audio.play(SoundCue::Hit, true);
        assert_eq!(recorder.0.borrow().len(), 1);
    }

    #[test]
    fn test_missing_backend_is_silent() {
        let mut audio = AudioManager::default();
        audio.play(SoundCue::Fire, true);
        audio.play(SoundCue::Fire, true);
        assert!(audio.warned);
    }
}
