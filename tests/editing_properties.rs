// Property-style checks over theory, editing and structure operations
// Each test sweeps several seeds or inputs rather than one example

use loop_machine::pattern::bridge::append_bridge;
use loop_machine::pattern::{BridgeKind, PatternStore, STEPS_PER_BAR};
use loop_machine::sequencer::can_play;
use loop_machine::theory::{name_to_pitch, pitch_to_name, scale_notes};
use loop_machine::{
    EngineConfig, GateState, Instrument, Key, LoopEngine, NoteName, Pitch, ScaleKind,
    VoicingToken,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_pitch_name_round_trip() {
    for p in 0..128 {
        let pitch = Pitch::new(p);
        let (name, octave) = pitch_to_name(pitch);
        assert_eq!(name_to_pitch(name.as_str(), octave).unwrap(), pitch);
        assert_eq!(pitch.to_string().parse::<Pitch>().unwrap(), pitch);
    }
    assert!(name_to_pitch("H", 4).is_err());
    assert!(name_to_pitch("", 4).is_err());
}

#[test]
fn test_scale_notes_repeat_per_octave() {
    for scale in ScaleKind::ALL {
        let size = scale.intervals().len();
        let notes = scale_notes(NoteName::D, 2, scale, size * 3 + 1);
        assert_eq!(notes.len(), size * 3 + 1);
        for i in size..notes.len() {
            assert_eq!(notes[i].value() - notes[i - size].value(), 12, "{}", scale);
        }
    }
}

#[test]
fn test_toggle_step_is_a_four_cycle() {
    let mut engine = LoopEngine::seeded(EngineConfig::default(), 1);
    for inst in Instrument::ALL {
        for step in [0, 5, 31] {
            let start = engine.hits(inst, step);
            // Walk to empty first, then a full cycle must come back to empty
            while engine.hits(inst, step) != 0 {
                engine.toggle_step(inst, step);
            }
            let mut seen = Vec::new();
            for _ in 0..4 {
                engine.toggle_step(inst, step);
                seen.push(engine.hits(inst, step));
            }
            assert_eq!(seen, vec![1, 2, 3, 0], "{} step {} (started at {})", inst, step, start);
            assert!(engine.session().store().cell(inst, step).is_none());
        }
    }
}

#[test]
fn test_toggle_out_of_range_is_ignored() {
    let mut engine = LoopEngine::seeded(EngineConfig::default(), 2);
    let before = engine.session().store().clone();
    assert!(engine.toggle_step(Instrument::Lead, 32).is_none());
    assert_eq!(engine.session().store(), &before);
}

#[test]
fn test_resize_is_idempotent_and_truncates_exactly() {
    for seed in 0..8 {
        let mut engine = LoopEngine::seeded(EngineConfig::default(), seed);
        engine.init();
        let original = engine.session().store().clone();

        assert!(!engine.resize(2));
        assert_eq!(engine.session().store(), &original);

        assert!(engine.resize(5));
        for inst in Instrument::ALL {
            let track = engine.session().store().track(inst);
            assert_eq!(track.len(), 5 * STEPS_PER_BAR);
            assert_eq!(&track[..32], original.track(inst));
            assert!(track[32..].iter().all(Option::is_none));
        }

        assert!(engine.resize(2));
        assert_eq!(engine.session().store(), &original);
    }
}

#[test]
fn test_copy_bar_duplicates_every_track() {
    for seed in 0..8 {
        let mut engine = LoopEngine::seeded(EngineConfig::default(), seed);
        engine.resize(3);
        let before = engine.session().store().clone();

        assert!(engine.copy_bar(0, 2));
        let after = engine.session().store();
        for inst in Instrument::ALL {
            assert_eq!(
                &after.track(inst)[32..48],
                &before.track(inst)[0..16],
                "{} seed {}",
                inst,
                seed
            );
            assert_eq!(&after.track(inst)[..32], &before.track(inst)[..32]);
        }

        assert!(!engine.copy_bar(0, 3));
        assert!(!engine.copy_bar(7, 0));
    }
}

#[test]
fn test_clear_bar_only_touches_its_window() {
    let mut engine = LoopEngine::seeded(EngineConfig::default(), 3);
    let before = engine.session().store().clone();
    assert!(engine.clear_bar(1));
    for inst in Instrument::ALL {
        let track = engine.session().store().track(inst);
        assert_eq!(&track[..16], &before.track(inst)[..16]);
        assert!(track[16..32].iter().all(Option::is_none));
    }
    assert!(!engine.clear_bar(2));
}

#[test]
fn test_drop_bridge_on_two_bars() {
    for seed in 0..16 {
        let mut store = PatternStore::new(2);
        let mut rng = StdRng::seed_from_u64(seed);
        let key = Key::new(NoteName::E, ScaleKind::Phrygian);

        let bar = append_bridge(&mut store, BridgeKind::Drop, key, &mut rng);
        assert_eq!(bar, 2);
        assert_eq!(store.bars(), 3);
        for step in (32..48).step_by(4) {
            assert!(store.cell(Instrument::Kick, step).is_some());
        }
    }
}

#[test]
fn test_every_bridge_kind_appends_one_bar() {
    let mut engine = LoopEngine::seeded(EngineConfig::default(), 4);
    engine.init();
    for (i, kind) in BridgeKind::ALL.into_iter().enumerate() {
        assert_eq!(engine.generate_bridge(kind), Some(2 + i));
    }
    assert_eq!(engine.loop_length(), 2 + BridgeKind::ALL.len());
}

#[test]
fn test_gate_overrides_intensity() {
    for inst in Instrument::ALL {
        for i in 0..=10 {
            let intensity = i as f32 / 10.0;
            assert!(!can_play(GateState::Muted, inst, intensity));
            assert!(can_play(GateState::Forced, inst, intensity));
            assert_eq!(
                can_play(GateState::Normal, inst, intensity),
                intensity >= inst.intensity_threshold()
            );
        }
    }
}

#[test]
fn test_song_mode_length_follows_arrangement() {
    let mut engine = LoopEngine::seeded(EngineConfig::default(), 5);
    engine.init();
    engine.set_song_mode(true);
    assert_eq!(engine.clock().order().len(), 32);

    engine.set_arrangement(&[0, 1, 0]);
    assert_eq!(engine.clock().order().len(), 48);

    assert!(engine.append_to_arrangement(1));
    assert!(!engine.append_to_arrangement(2));
    assert_eq!(engine.clock().order().len(), 64);

    // Shrinking the loop prunes arrangement entries for removed bars
    engine.resize(1);
    assert_eq!(engine.session().arrangement().as_slice(), &[0, 0]);
    assert_eq!(engine.clock().order().len(), 32);
}

#[test]
fn test_generated_patterns_stay_in_key() {
    for seed in 0..8 {
        let mut engine = LoopEngine::seeded(EngineConfig::default(), seed);
        let summary = engine.randomize();
        let classes: Vec<i32> = summary
            .key
            .notes(0, summary.key.scale.intervals().len())
            .iter()
            .map(|p| p.value().rem_euclid(12))
            .collect();

        for inst in [Instrument::Acid, Instrument::Lead] {
            for cell in engine.session().store().track(inst).iter().flatten() {
                if let VoicingToken::Note(pitch) = cell.token {
                    assert!(
                        classes.contains(&pitch.value().rem_euclid(12)),
                        "{} played {} outside {}",
                        inst,
                        pitch,
                        summary.key
                    );
                }
            }
        }
    }
}
