// Pattern generators - Stochastic per-instrument step synthesis
// Each generator is a pure function of (steps, style, key, rng); every placed
// cell starts with a single hit

use super::cell::{Cell, HatKind, Track};
use super::chance::{coin, pick};
use super::instrument::{
    AcidStyle, BassStyle, ClapStyle, HatStyle, Instrument, InstrumentStyle, KickStyle, LeadStyle,
    PercStyle, StabStyle, StyleSet,
};
use crate::theory::{Key, Pitch};
use rand::Rng;

/// Octave of the bass root
pub const BASS_OCTAVE: i32 = 1;
/// Octave and note count of the acid scale run
pub const ACID_OCTAVE: i32 = 2;
pub const ACID_NOTES: usize = 12;
/// Octave and note count of the lead scale run
pub const LEAD_OCTAVE: i32 = 4;
pub const LEAD_NOTES: usize = 14;

/// Generate one instrument's track for the given style
pub fn generate<R: Rng + ?Sized>(
    style: InstrumentStyle,
    steps: usize,
    key: Key,
    rng: &mut R,
) -> Track {
    match style {
        InstrumentStyle::Kick(s) => kick(steps, s, rng),
        InstrumentStyle::Bass(s) => bass(steps, s, key, rng),
        InstrumentStyle::Hat(s) => hats(steps, s, rng),
        InstrumentStyle::Clap(s) => clap(steps, s, rng),
        InstrumentStyle::Acid(s) => acid(steps, s, key, rng),
        InstrumentStyle::Lead(s) => lead(steps, s, key, rng),
        InstrumentStyle::Perc(s) => perc(steps, s, rng),
        InstrumentStyle::Stab(s) => stab(steps, s, rng),
    }
}

/// Generate every track, in role order
pub fn generate_all<R: Rng + ?Sized>(
    styles: &StyleSet,
    steps: usize,
    key: Key,
    rng: &mut R,
) -> [Track; Instrument::COUNT] {
    Instrument::ALL.map(|inst| generate(styles.get(inst), steps, key, rng))
}

pub fn kick<R: Rng + ?Sized>(steps: usize, style: KickStyle, rng: &mut R) -> Track {
    (0..steps)
        .map(|i| {
            let on = match style {
                KickStyle::Four => i % 4 == 0,
                KickStyle::OffKick => i % 4 == 0 || (i % 4 == 3 && coin(rng, 0.2)),
                KickStyle::SkipBeat => {
                    let beat = (i % 16) / 4;
                    i % 4 == 0 && !(beat == 2 && coin(rng, 0.5))
                }
            };
            on.then(Cell::kick)
        })
        .collect()
}

pub fn bass<R: Rng + ?Sized>(steps: usize, style: BassStyle, key: Key, rng: &mut R) -> Track {
    let root = key.root.at_octave(BASS_OCTAVE);
    let iv = key.scale.intervals();
    let alt = [
        iv.get(3).copied().unwrap_or(5),
        iv.get(4).copied().unwrap_or(7),
        iv.get(2).copied().unwrap_or(3),
    ];
    let degree = |rng: &mut R| if coin(rng, 0.82) { 0 } else { pick(rng, &alt) };
    let at = |offset: i32| Some(Cell::note(root.transpose(offset)));

    (0..steps)
        .map(|i| match style {
            BassStyle::Rolling => {
                if coin(rng, 0.93) {
                    let hi = if i % 2 == 1 && coin(rng, 0.72) { 12 } else { 0 };
                    at(degree(rng) + hi)
                } else {
                    None
                }
            }
            BassStyle::Galloping => {
                let pos = i % 8;
                if matches!(pos, 0 | 3 | 4 | 7) && coin(rng, 0.9) {
                    at(degree(rng) + if pos >= 4 { 12 } else { 0 })
                } else {
                    None
                }
            }
            BassStyle::Syncopated => {
                if matches!(i % 16, 0 | 3 | 4 | 6 | 8 | 11 | 12 | 14) && coin(rng, 0.88) {
                    let d = degree(rng);
                    at(d + if coin(rng, 0.5) { 12 } else { 0 })
                } else {
                    None
                }
            }
            BassStyle::Offbeat => {
                let pos = i % 4;
                if pos == 2 && coin(rng, 0.9) {
                    at(if coin(rng, 0.6) { 12 } else { 0 })
                } else if pos == 0 && coin(rng, 0.2) {
                    at(0)
                } else if coin(rng, 0.08) {
                    at(12)
                } else {
                    None
                }
            }
            BassStyle::Pulsing => {
                if coin(rng, 0.96) {
                    let d = if i % 16 > 12 && coin(rng, 0.4) {
                        pick(rng, &[5, 7, 3])
                    } else {
                        0
                    };
                    at(d)
                } else {
                    None
                }
            }
        })
        .collect()
}

pub fn hats<R: Rng + ?Sized>(steps: usize, style: HatStyle, rng: &mut R) -> Track {
    (0..steps)
        .map(|i| {
            let kind = match style {
                HatStyle::Standard => {
                    if i % 4 == 2 {
                        Some(HatKind::Open)
                    } else {
                        coin(rng, 0.5).then_some(HatKind::Closed)
                    }
                }
                HatStyle::Sixteenths => {
                    if i % 4 == 2 {
                        Some(HatKind::Open)
                    } else if coin(rng, 0.85) {
                        Some(if i % 2 == 0 { HatKind::Accent } else { HatKind::Closed })
                    } else {
                        None
                    }
                }
                HatStyle::Sparse => {
                    if i % 8 == 4 {
                        Some(HatKind::Open)
                    } else {
                        (i % 4 == 2 && coin(rng, 0.4)).then_some(HatKind::Closed)
                    }
                }
                HatStyle::Busy => {
                    if i % 4 == 2 {
                        Some(HatKind::Open)
                    } else if i % 16 >= 12 {
                        Some(if coin(rng, 0.8) { HatKind::Roll } else { HatKind::Closed })
                    } else {
                        coin(rng, 0.6).then_some(HatKind::Closed)
                    }
                }
            };
            kind.map(Cell::hat)
        })
        .collect()
}

pub fn clap<R: Rng + ?Sized>(steps: usize, style: ClapStyle, rng: &mut R) -> Track {
    (0..steps)
        .map(|i| {
            let pos = i % 16;
            let on = match style {
                ClapStyle::Backbeat => pos == 4 || pos == 12 || (pos == 14 && coin(rng, 0.15)),
                ClapStyle::Trap => {
                    pos == 4
                        || pos == 12
                        || (pos >= 12 && coin(rng, 0.4))
                        || ((pos == 6 || pos == 10) && coin(rng, 0.15))
                }
                ClapStyle::Breakbeat => {
                    ((pos == 4 || pos == 10) && coin(rng, 0.85))
                        || (matches!(pos, 3 | 7 | 13) && coin(rng, 0.25))
                }
                ClapStyle::Minimal => pos == 12,
            };
            on.then(Cell::hit)
        })
        .collect()
}

/// Acid line: only even steps are ever filled
pub fn acid<R: Rng + ?Sized>(steps: usize, style: AcidStyle, key: Key, rng: &mut R) -> Track {
    let notes = key.notes(ACID_OCTAVE, ACID_NOTES);
    let mut track: Track = vec![None; steps];
    let len = notes.len();

    match style {
        AcidStyle::Sequence => {
            let dir: isize = if coin(rng, 0.5) { 1 } else { -1 };
            let mut idx = if dir > 0 { 0 } else { len - 1 };
            for i in (0..steps).step_by(2) {
                if coin(rng, 0.7) {
                    track[i] = Some(Cell::note(notes[idx]));
                    idx = (idx as isize + dir).rem_euclid(len as isize) as usize;
                }
            }
        }
        AcidStyle::Random => {
            for i in (0..steps).step_by(2) {
                if coin(rng, 0.65) {
                    track[i] = Some(Cell::note(pick(rng, &notes)));
                }
            }
        }
        AcidStyle::Repeated => {
            let motif_len = pick(rng, &[3usize, 4, 5]);
            let motif: Vec<Option<Pitch>> = (0..motif_len)
                .map(|_| coin(rng, 0.7).then(|| pick(rng, &notes)))
                .collect();
            for i in (0..steps).step_by(2) {
                track[i] = motif[(i / 2) % motif_len].map(Cell::note);
            }
        }
        AcidStyle::CallResponse => {
            let half = steps / 4;
            let call: Vec<Option<Pitch>> = (0..half)
                .map(|_| coin(rng, 0.6).then(|| pick(rng, &notes)))
                .collect();
            let response: Vec<Option<Pitch>> = call
                .iter()
                .map(|n| n.map(|_| pick(rng, &notes)))
                .collect();
            let phrase: Vec<Option<Pitch>> = call.into_iter().chain(response).collect();
            for i in (0..steps).step_by(2) {
                track[i] = phrase.get(i / 2).copied().flatten().map(Cell::note);
            }
        }
    }
    track
}

/// Lead line: only even steps are ever filled
pub fn lead<R: Rng + ?Sized>(steps: usize, style: LeadStyle, key: Key, rng: &mut R) -> Track {
    let notes = key.notes(LEAD_OCTAVE, LEAD_NOTES);
    let mut track: Track = vec![None; steps];
    let len = notes.len();

    match style {
        LeadStyle::Arpeggio => {
            for i in (0..steps).step_by(2) {
                if coin(rng, 0.45) {
                    track[i] = Some(Cell::note(notes[(i / 2) % len]));
                }
            }
        }
        LeadStyle::Melody => {
            let mut idx = (len / 2) as i32;
            for i in (0..steps).step_by(2) {
                if coin(rng, 0.5) {
                    track[i] = Some(Cell::note(notes[idx as usize]));
                    idx = (idx + pick(rng, &[-2, -1, 0, 1, 2])).clamp(0, len as i32 - 1);
                }
            }
        }
        LeadStyle::Staccato => {
            let burst = pick(rng, &[2usize, 3, 4]);
            let gap = pick(rng, &[2usize, 3, 4]);
            for i in (0..steps).step_by(2) {
                if (i / 2) % (burst + gap) < burst && coin(rng, 0.8) {
                    track[i] = Some(Cell::note(pick(rng, &notes)));
                }
            }
        }
        LeadStyle::Wide => {
            for i in (0..steps).step_by(2) {
                if coin(rng, 0.35) {
                    let degree = pick(rng, &[0usize, 2, 4, 6, 8, 10]);
                    track[i] = Some(Cell::note(notes[degree % len]));
                }
            }
        }
    }
    track
}

pub fn perc<R: Rng + ?Sized>(steps: usize, style: PercStyle, rng: &mut R) -> Track {
    (0..steps)
        .map(|i| {
            let pos = i % 16;
            let on = match style {
                PercStyle::Sparse => (pos >= 14 && coin(rng, 0.4)) || coin(rng, 0.08),
                PercStyle::Shaker => coin(rng, 0.75),
                PercStyle::Conga => {
                    (matches!(pos, 0 | 3 | 7 | 10 | 12) && coin(rng, 0.8))
                        || ((pos == 5 || pos == 14) && coin(rng, 0.3))
                }
                PercStyle::Rim => {
                    (pos % 4 == 2 && coin(rng, 0.8)) || (matches!(pos, 1 | 7 | 11) && coin(rng, 0.3))
                }
            };
            on.then(Cell::hit)
        })
        .collect()
}

pub fn stab<R: Rng + ?Sized>(steps: usize, style: StabStyle, rng: &mut R) -> Track {
    (0..steps)
        .map(|i| {
            let pos = i % 16;
            let on = match style {
                StabStyle::Sparse => {
                    ((pos == 6 || pos == 14) && coin(rng, 0.6)) || (pos == 10 && coin(rng, 0.3))
                }
                StabStyle::Offbeat => {
                    (pos % 4 == 2 && coin(rng, 0.5)) || ((pos == 1 || pos == 5) && coin(rng, 0.2))
                }
                StabStyle::Rhythmic => {
                    (pos % 4 == 0 && coin(rng, 0.7)) || (pos % 4 == 2 && coin(rng, 0.2))
                }
                StabStyle::Accent => {
                    (pos == 0 && coin(rng, 0.85)) || ((pos == 8 || pos == 12) && coin(rng, 0.4))
                }
            };
            on.then(Cell::hit)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::cell::{KICK_PITCH, VoicingToken};
    use crate::theory::{NoteName, ScaleKind};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn a_minor() -> Key {
        Key::new(NoteName::A, ScaleKind::Minor)
    }

    fn filled(track: &Track) -> Vec<usize> {
        track
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|_| i))
            .collect()
    }

    #[test]
    fn test_four_on_the_floor() {
        let track = kick(32, KickStyle::Four, &mut rng());
        assert_eq!(filled(&track), vec![0, 4, 8, 12, 16, 20, 24, 28]);
        assert!(track.iter().flatten().all(|c| c.token == VoicingToken::Note(KICK_PITCH)));
    }

    #[test]
    fn test_skipbeat_keeps_other_downbeats() {
        let track = kick(64, KickStyle::SkipBeat, &mut rng());
        for (i, cell) in track.iter().enumerate() {
            if i % 4 != 0 {
                assert!(cell.is_none());
            } else if (i % 16) / 4 != 2 {
                assert!(cell.is_some());
            }
        }
    }

    #[test]
    fn test_generators_fill_length_and_single_hits() {
        let styles = StyleSet::random(&mut rng());
        let tracks = generate_all(&styles, 48, a_minor(), &mut rng());
        for track in &tracks {
            assert_eq!(track.len(), 48);
            assert!(track.iter().flatten().all(|c| c.hits.get() == 1));
        }
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let styles = StyleSet::default();
        let a = generate_all(&styles, 32, a_minor(), &mut StdRng::seed_from_u64(5));
        let b = generate_all(&styles, 32, a_minor(), &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_melodic_lines_use_even_steps_in_scale() {
        let key = a_minor();
        let acid_notes = key.notes(ACID_OCTAVE, ACID_NOTES);
        let lead_notes = key.notes(LEAD_OCTAVE, LEAD_NOTES);
        for style in AcidStyle::ALL {
            let track = acid(64, *style, key, &mut rng());
            for (i, cell) in track.iter().enumerate() {
                if let Some(c) = cell {
                    assert_eq!(i % 2, 0);
                    let VoicingToken::Note(p) = c.token else { panic!("acid marker") };
                    assert!(acid_notes.contains(&p));
                }
            }
        }
        for style in LeadStyle::ALL {
            let track = lead(64, *style, key, &mut rng());
            for (i, cell) in track.iter().enumerate() {
                if let Some(c) = cell {
                    assert_eq!(i % 2, 0);
                    let VoicingToken::Note(p) = c.token else { panic!("lead marker") };
                    assert!(lead_notes.contains(&p));
                }
            }
        }
    }

    #[test]
    fn test_bass_stays_near_root() {
        let key = a_minor();
        let root = key.root.at_octave(BASS_OCTAVE).value();
        for style in BassStyle::ALL {
            for cell in bass(64, *style, key, &mut rng()).iter().flatten() {
                let VoicingToken::Note(p) = cell.token else { panic!("bass marker") };
                assert!((root..=root + 24).contains(&p.value()));
            }
        }
    }

    #[test]
    fn test_hat_open_positions() {
        let track = hats(32, HatStyle::Standard, &mut rng());
        for i in (2..32).step_by(4) {
            assert_eq!(track[i], Some(Cell::hat(HatKind::Open)));
        }
        let sparse = hats(32, HatStyle::Sparse, &mut rng());
        assert_eq!(sparse[4], Some(Cell::hat(HatKind::Open)));
        assert_eq!(sparse[12], Some(Cell::hat(HatKind::Open)));
    }

    #[test]
    fn test_clap_fixed_positions() {
        let backbeat = clap(32, ClapStyle::Backbeat, &mut rng());
        for i in [4, 12, 20, 28] {
            assert!(backbeat[i].is_some());
        }
        let minimal = clap(32, ClapStyle::Minimal, &mut rng());
        assert_eq!(filled(&minimal), vec![12, 28]);
    }

    #[test]
    fn test_repeated_acid_is_periodic() {
        let track = acid(64, AcidStyle::Repeated, a_minor(), &mut rng());
        let evens: Vec<_> = track.iter().step_by(2).copied().collect();
        let period = (3..=5)
            .find(|&p| (p..evens.len()).all(|i| evens[i] == evens[i - p]))
            .expect("motif period between 3 and 5");
        assert!(period >= 3);
    }
}
