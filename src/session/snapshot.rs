// Snapshots - Self-contained copies of the session for save/load
// Every field is optional; importing merges what is present and normalizes it

use super::state::Session;
use crate::pattern::{
    AcidStyle, BassStyle, Cell, ClapStyle, HatStyle, HitCount, Instrument, KickStyle, LeadStyle,
    PercStyle, StabStyle, Track, VoicingToken,
};
use crate::sequencer::{GateState, Tempo};
use crate::theory::{NoteName, ScaleKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("RON write error: {0}")]
    RonWrite(#[from] ron::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A normalization applied while importing a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum Inconsistency {
    LoopLengthAdjusted { requested: usize, applied: usize },
    PatternLength { instrument: Instrument, found: usize, expected: usize },
    HitsLength { instrument: Instrument, found: usize, expected: usize },
    /// A hit count on a step with no token; the step stays empty
    HitsWithoutToken { instrument: Instrument, step: usize },
    /// A token with a zero hit count; it plays once
    TokenWithoutHits { instrument: Instrument, step: usize },
    HitCountClamped { instrument: Instrument, step: usize, hits: u8 },
    ArrangementIndexDropped { bar: usize },
    BpmClamped { requested: f64, applied: f64 },
    IntensityClamped { requested: f32, applied: f32 },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconsistency::LoopLengthAdjusted { requested, applied } => {
                write!(f, "loop length {} adjusted to {}", requested, applied)
            }
            Inconsistency::PatternLength { instrument, found, expected } => {
                write!(f, "{} pattern has {} steps, expected {}", instrument, found, expected)
            }
            Inconsistency::HitsLength { instrument, found, expected } => {
                write!(f, "{} hit counts have {} steps, expected {}", instrument, found, expected)
            }
            Inconsistency::HitsWithoutToken { instrument, step } => {
                write!(f, "{} step {} has hits but no token", instrument, step)
            }
            Inconsistency::TokenWithoutHits { instrument, step } => {
                write!(f, "{} step {} has a token but zero hits", instrument, step)
            }
            Inconsistency::HitCountClamped { instrument, step, hits } => {
                write!(f, "{} step {} hit count {} clamped", instrument, step, hits)
            }
            Inconsistency::ArrangementIndexDropped { bar } => {
                write!(f, "arrangement bar {} does not exist", bar)
            }
            Inconsistency::BpmClamped { requested, applied } => {
                write!(f, "bpm {} clamped to {}", requested, applied)
            }
            Inconsistency::IntensityClamped { requested, applied } => {
                write!(f, "intensity {} clamped to {}", requested, applied)
            }
        }
    }
}

/// Plain copy of the session state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<NoteName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kick_style: Option<KickStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bass_style: Option<BassStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hat_style: Option<HatStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clap_style: Option<ClapStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acid_style: Option<AcidStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_style: Option<LeadStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perc_style: Option<PercStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stab_style: Option<StabStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_mode: Option<bool>,

    /// Per-instrument voicing tokens, `None` for empty steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<BTreeMap<Instrument, Vec<Option<VoicingToken>>>>,
    /// Per-instrument hit counts, 0 for empty steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<BTreeMap<Instrument, Vec<u8>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gates: Option<BTreeMap<Instrument, GateState>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrangement: Option<Vec<usize>>,
}

impl Snapshot {
    /// Deep copy of every session field
    pub fn capture(session: &Session) -> Self {
        let store = session.store();
        let patterns: BTreeMap<Instrument, Vec<Option<VoicingToken>>> = Instrument::ALL
            .iter()
            .map(|&inst| (inst, store.track(inst).iter().map(|c| c.map(|c| c.token)).collect()))
            .collect();
        let hits: BTreeMap<Instrument, Vec<u8>> = Instrument::ALL
            .iter()
            .map(|&inst| {
                let counts = (0..store.len()).map(|step| store.hits(inst, step)).collect();
                (inst, counts)
            })
            .collect();
        let styles = &session.styles;

        Self {
            bpm: Some(session.tempo.bpm()),
            loop_length: Some(session.bars()),
            root: Some(session.key.root),
            scale: Some(session.key.scale),
            kick_style: Some(styles.kick),
            bass_style: Some(styles.bass),
            hat_style: Some(styles.hat),
            clap_style: Some(styles.clap),
            acid_style: Some(styles.acid),
            lead_style: Some(styles.lead),
            perc_style: Some(styles.perc),
            stab_style: Some(styles.stab),
            intensity: Some(session.intensity()),
            song_mode: Some(session.song_mode),
            patterns: Some(patterns),
            hits: Some(hits),
            gates: Some(session.gates.iter().collect()),
            arrangement: Some(session.arrangement().as_slice().to_vec()),
        }
    }

    /// Merge into `session`, leaving absent fields untouched
    ///
    /// Never fails: inconsistent data is normalized and each adjustment is
    /// returned and logged.
    pub fn apply_to(&self, session: &mut Session, max_bars: usize) -> Vec<Inconsistency> {
        let mut issues = Vec::new();

        if let Some(bpm) = self.bpm {
            let tempo = Tempo::new(bpm);
            if tempo.bpm() != bpm {
                issues.push(Inconsistency::BpmClamped {
                    requested: bpm,
                    applied: tempo.bpm(),
                });
            }
            session.tempo = tempo;
        }
        if let Some(root) = self.root {
            session.key.root = root;
        }
        if let Some(scale) = self.scale {
            session.key.scale = scale;
        }
        self.apply_styles(session);

        if let Some(intensity) = self.intensity {
            session.set_intensity(intensity);
            if session.intensity() != intensity {
                issues.push(Inconsistency::IntensityClamped {
                    requested: intensity,
                    applied: session.intensity(),
                });
            }
        }
        if let Some(song_mode) = self.song_mode {
            session.song_mode = song_mode;
        }
        if let Some(gates) = &self.gates {
            for (&inst, &state) in gates {
                session.gates.set(inst, state);
            }
        }

        if let Some(requested) = self.loop_length {
            let applied = requested.clamp(1, max_bars.max(1));
            if applied != requested {
                issues.push(Inconsistency::LoopLengthAdjusted { requested, applied });
            }
            session.resize(applied, max_bars);
        }

        self.apply_patterns(session, &mut issues);

        if let Some(indices) = &self.arrangement {
            let bars = session.bars();
            issues.extend(
                indices
                    .iter()
                    .filter(|&&bar| bar >= bars)
                    .map(|&bar| Inconsistency::ArrangementIndexDropped { bar }),
            );
            session.arrangement_mut().set(indices);
        }

        for issue in &issues {
            log::warn!("Snapshot normalized: {}", issue);
        }
        issues
    }

    fn apply_styles(&self, session: &mut Session) {
        let styles = &mut session.styles;
        if let Some(s) = self.kick_style {
            styles.kick = s;
        }
        if let Some(s) = self.bass_style {
            styles.bass = s;
        }
        if let Some(s) = self.hat_style {
            styles.hat = s;
        }
        if let Some(s) = self.clap_style {
            styles.clap = s;
        }
        if let Some(s) = self.acid_style {
            styles.acid = s;
        }
        if let Some(s) = self.lead_style {
            styles.lead = s;
        }
        if let Some(s) = self.perc_style {
            styles.perc = s;
        }
        if let Some(s) = self.stab_style {
            styles.stab = s;
        }
    }

    /// Rebuild tracks from tokens and hit counts at the session length
    fn apply_patterns(&self, session: &mut Session, issues: &mut Vec<Inconsistency>) {
        if self.patterns.is_none() && self.hits.is_none() {
            return;
        }
        let len = session.store().len();

        for inst in Instrument::ALL {
            let tokens: Option<Vec<Option<VoicingToken>>> = match &self.patterns {
                Some(patterns) => patterns.get(&inst).cloned(),
                None => None,
            };
            let hits = self.hits.as_ref().and_then(|h| h.get(&inst));
            if tokens.is_none() && hits.is_none() {
                continue;
            }

            // Without new tokens, hit counts apply to the current cells
            let tokens = tokens.unwrap_or_else(|| {
                session.store().track(inst).iter().map(|c| c.map(|c| c.token)).collect()
            });
            if tokens.len() != len {
                issues.push(Inconsistency::PatternLength {
                    instrument: inst,
                    found: tokens.len(),
                    expected: len,
                });
            }
            if let Some(h) = hits {
                if h.len() != len {
                    issues.push(Inconsistency::HitsLength {
                        instrument: inst,
                        found: h.len(),
                        expected: len,
                    });
                }
            }

            let track: Track = (0..len)
                .map(|step| {
                    let token = tokens.get(step).copied().flatten();
                    let count = hits.and_then(|h| h.get(step)).copied();
                    merge_cell(inst, step, token, count, issues)
                })
                .collect();
            session.store_mut().replace_track(inst, track);
        }
    }

    /// Pretty RON text
    pub fn to_ron(&self) -> Result<String, SnapshotError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn from_ron(text: &str) -> Result<Self, SnapshotError> {
        Ok(ron::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write to disk; `.json` files get JSON, anything else RON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let text = if is_json(path) { self.to_json()? } else { self.to_ron()? };
        std::fs::write(path, text)?;
        log::info!("Saved snapshot to {}", path.display());
        Ok(())
    }

    /// Read from disk; `.json` files are parsed as JSON, anything else as RON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let snapshot = if is_json(path) { Self::from_json(&text)? } else { Self::from_ron(&text)? };
        log::info!("Loaded snapshot from {}", path.display());
        Ok(snapshot)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn merge_cell(
    instrument: Instrument,
    step: usize,
    token: Option<VoicingToken>,
    count: Option<u8>,
    issues: &mut Vec<Inconsistency>,
) -> Option<Cell> {
    match (token, count) {
        (None, Some(hits)) if hits > 0 => {
            issues.push(Inconsistency::HitsWithoutToken { instrument, step });
            None
        }
        (None, _) => None,
        (Some(token), None) => Some(Cell::new(token)),
        (Some(token), Some(0)) => {
            issues.push(Inconsistency::TokenWithoutHits { instrument, step });
            Some(Cell::new(token))
        }
        (Some(token), Some(hits)) => {
            if hits > HitCount::MAX {
                issues.push(Inconsistency::HitCountClamped { instrument, step, hits });
            }
            Some(Cell::with_hits(token, hits))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::pattern::HatKind;
    use crate::theory::Pitch;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(seed: u64) -> Session {
        Session::generate(&EngineConfig::default(), &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_capture_apply_restores_session() {
        let mut original = session(1);
        original.store_mut().set_cell(Instrument::Hat, 3, Some(Cell::with_hits(VoicingToken::Hat(HatKind::Roll), 3)));
        original.gates.set(Instrument::Lead, GateState::Muted);
        original.arrangement_mut().set(&[1, 0, 1]);
        original.song_mode = true;

        let snapshot = Snapshot::capture(&original);
        let mut restored = session(2);
        let issues = snapshot.apply_to(&mut restored, 64);
        assert!(issues.is_empty(), "{:?}", issues);
        assert_eq!(restored, original);
    }

    #[test]
    fn test_missing_fields_leave_session_untouched() {
        let mut s = session(3);
        let before = s.clone();
        let issues = Snapshot::default().apply_to(&mut s, 64);
        assert!(issues.is_empty());
        assert_eq!(s, before);

        let partial = Snapshot {
            bpm: Some(150.0),
            ..Snapshot::default()
        };
        partial.apply_to(&mut s, 64);
        assert_eq!(s.tempo.bpm(), 150.0);
        assert_eq!(s.store(), before.store());
        assert_eq!(s.key, before.key);
    }

    #[test]
    fn test_mismatched_lengths_normalized() {
        let mut s = session(4);
        let mut patterns = BTreeMap::new();
        patterns.insert(Instrument::Kick, vec![Some(VoicingToken::Note(Pitch::new(24))); 20]);
        patterns.insert(Instrument::Clap, vec![Some(VoicingToken::Hit); 3]);
        let snapshot = Snapshot {
            loop_length: Some(1),
            patterns: Some(patterns),
            ..Snapshot::default()
        };
        let issues = snapshot.apply_to(&mut s, 64);
        assert_eq!(s.bars(), 1);
        for inst in Instrument::ALL {
            assert_eq!(s.store().track(inst).len(), 16);
        }
        assert_eq!(s.store().hits(Instrument::Clap, 2), 1);
        assert_eq!(s.store().hits(Instrument::Clap, 3), 0);
        assert!(issues.contains(&Inconsistency::PatternLength {
            instrument: Instrument::Kick,
            found: 20,
            expected: 16
        }));
        assert!(issues.contains(&Inconsistency::PatternLength {
            instrument: Instrument::Clap,
            found: 3,
            expected: 16
        }));
    }

    #[test]
    fn test_hits_and_tokens_reconciled() {
        let mut s = session(5);
        let mut patterns = BTreeMap::new();
        let mut tokens = vec![None; 32];
        tokens[0] = Some(VoicingToken::Hit);
        tokens[1] = Some(VoicingToken::Hit);
        tokens[2] = Some(VoicingToken::Hit);
        patterns.insert(Instrument::Perc, tokens);
        let mut hits = BTreeMap::new();
        let mut counts = vec![0u8; 32];
        counts[1] = 7;
        counts[2] = 2;
        counts[5] = 1;
        hits.insert(Instrument::Perc, counts);

        let issues = Snapshot {
            patterns: Some(patterns),
            hits: Some(hits),
            ..Snapshot::default()
        }
        .apply_to(&mut s, 64);

        assert_eq!(s.store().hits(Instrument::Perc, 0), 1);
        assert_eq!(s.store().hits(Instrument::Perc, 1), 3);
        assert_eq!(s.store().hits(Instrument::Perc, 2), 2);
        assert_eq!(s.store().hits(Instrument::Perc, 5), 0);
        assert!(issues.contains(&Inconsistency::TokenWithoutHits { instrument: Instrument::Perc, step: 0 }));
        assert!(issues.contains(&Inconsistency::HitCountClamped { instrument: Instrument::Perc, step: 1, hits: 7 }));
        assert!(issues.contains(&Inconsistency::HitsWithoutToken { instrument: Instrument::Perc, step: 5 }));
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let mut s = session(6);
        let issues = Snapshot {
            bpm: Some(5000.0),
            intensity: Some(2.0),
            loop_length: Some(0),
            arrangement: Some(vec![0, 9]),
            ..Snapshot::default()
        }
        .apply_to(&mut s, 64);
        assert_eq!(s.tempo.bpm(), 999.0);
        assert_eq!(s.intensity(), 1.0);
        assert_eq!(s.bars(), 1);
        assert_eq!(s.arrangement().as_slice(), &[0]);
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_ron_and_json_text() {
        let snapshot = Snapshot::capture(&session(7));
        let ron_text = snapshot.to_ron().unwrap();
        assert_eq!(Snapshot::from_ron(&ron_text).unwrap(), snapshot);
        let json_text = snapshot.to_json().unwrap();
        assert!(json_text.contains("\"kick\""));
        assert_eq!(Snapshot::from_json(&json_text).unwrap(), snapshot);
    }

    #[test]
    fn test_partial_json_parses() {
        let snapshot = Snapshot::from_json(r#"{"bpm": 100.0, "root": "F#", "scale": "hungarianMin"}"#).unwrap();
        assert_eq!(snapshot.bpm, Some(100.0));
        assert_eq!(snapshot.root, Some(NoteName::FSharp));
        assert_eq!(snapshot.scale, Some(ScaleKind::HungarianMinor));
        assert!(snapshot.patterns.is_none());
    }

    #[test]
    fn test_bad_text_is_error() {
        assert!(matches!(Snapshot::from_ron("(bpm: \"x\""), Err(SnapshotError::Ron(_))));
        assert!(matches!(Snapshot::from_json("{"), Err(SnapshotError::Json(_))));
    }
}
