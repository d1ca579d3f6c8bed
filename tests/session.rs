//! Whole-session tests driven through `GameSession` with a scripted pointer

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use aim_warmup::GameSession;
use aim_warmup::audio::{CueSink, SoundCue, Tone};
use aim_warmup::consts::TICK_DT;
use aim_warmup::platform::PointerSource;
use aim_warmup::session::HostInput;
use aim_warmup::settings::Settings;
use aim_warmup::sim::{FinishReason, FocusChange, GameEvent, GameMode, GamePhase};

const ANCHOR: Vec2 = Vec2::new(960.0, 540.0);

struct ScriptedPointer {
    pos: Vec2,
}

impl PointerSource for ScriptedPointer {
    fn position(&mut self) -> Vec2 {
        self.pos
    }

    fn warp_to(&mut self, pos: Vec2) {
        self.pos = pos;
    }
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<SoundCue>>>);

impl CueSink for Recorder {
    fn play(&mut self, cue: SoundCue, _tone: Tone) {
        self.0.borrow_mut().push(cue);
    }
}

fn focused() -> HostInput {
    HostInput {
        has_focus: true,
        ..Default::default()
    }
}

fn click() -> HostInput {
    HostInput {
        has_focus: true,
        clicked: true,
        ..Default::default()
    }
}

/// Move the pointer so the next frame turns the camera onto `target`
fn aim_at(session: &GameSession, pointer: &mut ScriptedPointer, target: Vec2) {
    let camera = &session.state().camera;
    let delta = camera.delta_to(target);
    let sens = camera.sensitivity();
    pointer.pos += Vec2::new(
        delta.x * sens.h_counts_per_degree(),
        -delta.y * sens.v_counts_per_degree(),
    );
}

fn started(mode: GameMode) -> (GameSession, ScriptedPointer) {
    let mut session = GameSession::new(Settings::default(), 2024, ANCHOR);
    let mut pointer = ScriptedPointer { pos: ANCHOR };
    session.start(mode, &mut pointer);
    (session, pointer)
}

#[test]
fn test_debug_hits_register() {
    let (mut session, mut pointer) = started(GameMode::Debug);

    for round in 0..3 {
        let target = session.state().target_views()[0].pos;
        aim_at(&session, &mut pointer, target);
        session.frame(&mut pointer, click(), TICK_DT);
        assert_eq!(session.summary().hits, round + 1);
        assert!(session.state().target_views().is_empty());
        assert_eq!(pointer.pos, ANCHOR);

        session.frame(
            &mut pointer,
            HostInput {
                has_focus: true,
                spawn_next: true,
                ..Default::default()
            },
            TICK_DT,
        );
        assert_eq!(session.state().target_views().len(), 1);
    }
    assert_eq!(session.summary().misses, 0);
}

#[test]
fn test_focus_loss_then_refocus_click_is_not_a_shot() {
    let (mut session, mut pointer) = started(GameMode::Random);

    session.frame(
        &mut pointer,
        HostInput {
            has_focus: false,
            focus_change: Some(FocusChange::Lost),
            ..Default::default()
        },
        TICK_DT,
    );
    assert!(!session.state().locked);
    assert_eq!(session.phase(), GamePhase::Running);
    assert!(session.last_events().contains(&GameEvent::FocusLost));

    // Pointer wanders while unfocused: no camera movement, no warp
    let before = session.state().camera.position();
    pointer.pos += Vec2::new(300.0, 0.0);
    session.frame(
        &mut pointer,
        HostInput {
            has_focus: true,
            focus_change: Some(FocusChange::Gained),
            ..Default::default()
        },
        TICK_DT,
    );
    assert_eq!(session.state().camera.position(), before);
    assert!(!session.state().locked);

    session.frame(&mut pointer, click(), TICK_DT);
    assert!(session.state().locked);
    assert_eq!(session.summary().misses, 0);
    assert!(session.last_events().contains(&GameEvent::Relocked));

    // Now a click is a real shot
    let empty_spot = session.state().camera.position() + Vec2::new(0.0, 80.0);
    aim_at(&session, &mut pointer, empty_spot);
    session.frame(&mut pointer, focused(), TICK_DT);
    session.frame(&mut pointer, click(), TICK_DT);
    let shots = session.summary().hits + session.summary().misses;
    assert_eq!(shots, 1);
}

#[test]
fn test_tracking_finishes_at_sixty_seconds() {
    let (mut session, mut pointer) = started(GameMode::Tracking);
    let mut ticks = 0;
    while session.phase() == GamePhase::Running && ticks < 61_000 {
        session.frame(&mut pointer, focused(), TICK_DT);
        ticks += 1;
    }
    assert_eq!(session.phase(), GamePhase::Finished);
    assert_eq!(session.state().finish_reason, Some(FinishReason::TimeUp));
    assert!((session.state().elapsed - 60.0).abs() < 0.1);
}

#[test]
fn test_audio_cues_follow_lock_state() {
    let recorder = Recorder::default();
    let mut session =
        GameSession::new(Settings::default(), 5, ANCHOR).with_audio(Box::new(recorder.clone()));
    let mut pointer = ScriptedPointer { pos: ANCHOR };
    session.start(GameMode::Debug, &mut pointer);

    let target = session.state().target_views()[0].pos;
    aim_at(&session, &mut pointer, target);
    session.frame(&mut pointer, click(), TICK_DT);
    assert_eq!(*recorder.0.borrow(), vec![SoundCue::Fire, SoundCue::Hit]);

    session.frame(
        &mut pointer,
        HostInput {
            focus_change: Some(FocusChange::Lost),
            ..Default::default()
        },
        TICK_DT,
    );
    // The relock click makes no sound
    session.frame(&mut pointer, click(), TICK_DT);
    assert_eq!(recorder.0.borrow().len(), 2);
}

#[test]
fn test_shapes_complete_in_order() {
    let mut settings = Settings::default();
    settings.shapes.shape_count = 2;
    let mut session = GameSession::new(settings, 9, ANCHOR);
    let mut pointer = ScriptedPointer { pos: ANCHOR };
    session.start(GameMode::Shapes, &mut pointer);

    let mut shots = 0;
    while session.phase() == GamePhase::Running && shots < 50 {
        let live = session
            .state()
            .target_views()
            .into_iter()
            .find(|view| view.is_shootable())
            .map(|view| view.pos);
        let Some(live) = live else { break };
        aim_at(&session, &mut pointer, live);
        session.frame(&mut pointer, click(), TICK_DT);
        shots += 1;
    }
    assert_eq!(session.phase(), GamePhase::Finished);
    assert_eq!(
        session.state().finish_reason,
        Some(FinishReason::ShapesComplete)
    );
    assert_eq!(session.summary().misses, 0);
    assert_eq!(session.summary().hits, shots);
}

#[test]
fn test_same_seed_same_session() {
    let run = || {
        let (mut session, mut pointer) = started(GameMode::Random);
        for _ in 0..2_000 {
            pointer.pos += Vec2::new(1.0, 0.5);
            session.frame(&mut pointer, focused(), TICK_DT);
        }
        (
            session.state().camera.position(),
            session.state().target_views(),
            session.summary().misses,
        )
    };
    assert_eq!(run(), run());
}
