// Genre presets - Constrained randomization tables
// A preset narrows the tempo, scale and per-instrument style choices

use super::PatternError;
use super::chance::pick;
use super::instrument::{
    AcidStyle, BassStyle, ClapStyle, HatStyle, KickStyle, LeadStyle, PercStyle, StabStyle,
    StyleSet,
};
use crate::theory::{Key, NoteName, ScaleKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Named genre with a fixed preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    House,
    Techno,
    Psytrance,
    Dnb,
    Hiphop,
    Ambient,
    Rock,
    Pop,
}

/// Allowed choices for one genre
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenrePreset {
    pub bpm: RangeInclusive<u32>,
    pub scales: &'static [ScaleKind],
    pub kicks: &'static [KickStyle],
    pub bass: &'static [BassStyle],
    pub hats: &'static [HatStyle],
    pub claps: &'static [ClapStyle],
    pub percs: &'static [PercStyle],
    pub stabs: &'static [StabStyle],
    pub leads: &'static [LeadStyle],
}

/// Key, tempo and styles drawn from a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreDraw {
    pub key: Key,
    pub bpm: u32,
    pub styles: StyleSet,
}

impl Genre {
    pub const ALL: [Genre; 8] = [
        Genre::House,
        Genre::Techno,
        Genre::Psytrance,
        Genre::Dnb,
        Genre::Hiphop,
        Genre::Ambient,
        Genre::Rock,
        Genre::Pop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Genre::House => "house",
            Genre::Techno => "techno",
            Genre::Psytrance => "psytrance",
            Genre::Dnb => "dnb",
            Genre::Hiphop => "hiphop",
            Genre::Ambient => "ambient",
            Genre::Rock => "rock",
            Genre::Pop => "pop",
        }
    }

    pub fn preset(self) -> GenrePreset {
        use ScaleKind::*;
        match self {
            Genre::House => GenrePreset {
                bpm: 120..=130,
                scales: &[Minor, Dorian, PentatonicMin],
                kicks: &[KickStyle::Four],
                bass: &[BassStyle::Pulsing, BassStyle::Offbeat],
                hats: &[HatStyle::Standard, HatStyle::Busy],
                claps: &[ClapStyle::Backbeat],
                percs: &[PercStyle::Shaker],
                stabs: &[StabStyle::Offbeat],
                leads: &[LeadStyle::Melody, LeadStyle::Arpeggio],
            },
            Genre::Techno => GenrePreset {
                bpm: 128..=140,
                scales: &[Minor, Phrygian, Dorian],
                kicks: &[KickStyle::Four, KickStyle::OffKick],
                bass: &[BassStyle::Rolling, BassStyle::Pulsing],
                hats: &[HatStyle::Sixteenths, HatStyle::Busy],
                claps: &[ClapStyle::Minimal, ClapStyle::Backbeat],
                percs: &[PercStyle::Rim, PercStyle::Sparse],
                stabs: &[StabStyle::Rhythmic],
                leads: &[LeadStyle::Staccato, LeadStyle::Arpeggio],
            },
            Genre::Psytrance => GenrePreset {
                bpm: 138..=150,
                scales: &[Phrygian, HarmonicMinor, HungarianMinor],
                kicks: &[KickStyle::Four],
                bass: &[BassStyle::Rolling, BassStyle::Galloping],
                hats: &[HatStyle::Sixteenths, HatStyle::Busy],
                claps: &[ClapStyle::Minimal],
                percs: &[PercStyle::Sparse],
                stabs: &[StabStyle::Sparse, StabStyle::Accent],
                leads: &[LeadStyle::Arpeggio, LeadStyle::Staccato],
            },
            Genre::Dnb => GenrePreset {
                bpm: 170..=180,
                scales: &[Minor, Blues, PentatonicMin],
                kicks: &[KickStyle::SkipBeat, KickStyle::OffKick],
                bass: &[BassStyle::Syncopated, BassStyle::Rolling],
                hats: &[HatStyle::Busy, HatStyle::Standard],
                claps: &[ClapStyle::Breakbeat],
                percs: &[PercStyle::Rim, PercStyle::Conga],
                stabs: &[StabStyle::Accent],
                leads: &[LeadStyle::Melody, LeadStyle::Wide],
            },
            Genre::Hiphop => GenrePreset {
                bpm: 85..=100,
                scales: &[PentatonicMin, Blues, Minor],
                kicks: &[KickStyle::SkipBeat, KickStyle::OffKick],
                bass: &[BassStyle::Syncopated, BassStyle::Offbeat],
                hats: &[HatStyle::Sparse, HatStyle::Standard],
                claps: &[ClapStyle::Trap, ClapStyle::Backbeat],
                percs: &[PercStyle::Conga, PercStyle::Rim],
                stabs: &[StabStyle::Sparse],
                leads: &[LeadStyle::Melody, LeadStyle::Wide],
            },
            Genre::Ambient => GenrePreset {
                bpm: 70..=100,
                scales: &[Major, Lydian, PentatonicMaj, WholeTone],
                kicks: &[KickStyle::Four],
                bass: &[BassStyle::Pulsing],
                hats: &[HatStyle::Sparse],
                claps: &[ClapStyle::Minimal],
                percs: &[PercStyle::Sparse],
                stabs: &[StabStyle::Sparse],
                leads: &[LeadStyle::Wide, LeadStyle::Melody],
            },
            Genre::Rock => GenrePreset {
                bpm: 110..=140,
                scales: &[Major, PentatonicMin, Blues, Mixolydian],
                kicks: &[KickStyle::Four, KickStyle::SkipBeat],
                bass: &[BassStyle::Pulsing, BassStyle::Galloping],
                hats: &[HatStyle::Standard],
                claps: &[ClapStyle::Backbeat],
                percs: &[PercStyle::Rim],
                stabs: &[StabStyle::Accent],
                leads: &[LeadStyle::Melody, LeadStyle::Staccato],
            },
            Genre::Pop => GenrePreset {
                bpm: 100..=130,
                scales: &[Major, Minor, PentatonicMaj, Mixolydian],
                kicks: &[KickStyle::Four],
                bass: &[BassStyle::Pulsing, BassStyle::Offbeat],
                hats: &[HatStyle::Standard, HatStyle::Sparse],
                claps: &[ClapStyle::Backbeat],
                percs: &[PercStyle::Shaker],
                stabs: &[StabStyle::Offbeat],
                leads: &[LeadStyle::Melody, LeadStyle::Arpeggio],
            },
        }
    }
}

impl GenrePreset {
    /// Draw a root, scale, tempo and style per instrument
    ///
    /// The acid style is not part of any preset and is drawn from all styles.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> GenreDraw {
        let bpm = rng.gen_range(self.bpm.clone());
        let root = pick(rng, &NoteName::ALL);
        let scale = pick(rng, self.scales);
        let styles = StyleSet {
            kick: pick(rng, self.kicks),
            bass: pick(rng, self.bass),
            hat: pick(rng, self.hats),
            clap: pick(rng, self.claps),
            acid: AcidStyle::random(rng),
            lead: pick(rng, self.leads),
            perc: pick(rng, self.percs),
            stab: pick(rng, self.stabs),
        };
        GenreDraw {
            key: Key::new(root, scale),
            bpm,
            styles,
        }
    }
}

impl FromStr for Genre {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.name() == lower)
            .ok_or_else(|| PatternError::UnknownGenre(s.to_string()))
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_every_preset_is_populated() {
        for genre in Genre::ALL {
            let p = genre.preset();
            assert!(p.bpm.start() <= p.bpm.end());
            assert!(!p.scales.is_empty());
            assert!(!p.kicks.is_empty() && !p.bass.is_empty() && !p.hats.is_empty());
            assert!(!p.claps.is_empty() && !p.percs.is_empty());
            assert!(!p.stabs.is_empty() && !p.leads.is_empty());
        }
    }

    #[test]
    fn test_draw_respects_preset() {
        let mut rng = StdRng::seed_from_u64(11);
        for genre in Genre::ALL {
            let preset = genre.preset();
            for _ in 0..20 {
                let draw = preset.draw(&mut rng);
                assert!(preset.bpm.contains(&draw.bpm));
                assert!(preset.scales.contains(&draw.key.scale));
                assert!(preset.kicks.contains(&draw.styles.kick));
                assert!(preset.bass.contains(&draw.styles.bass));
                assert!(preset.hats.contains(&draw.styles.hat));
                assert!(preset.leads.contains(&draw.styles.lead));
            }
        }
    }

    #[test]
    fn test_parse_genre() {
        assert_eq!("dnb".parse::<Genre>().unwrap(), Genre::Dnb);
        assert_eq!("Techno".parse::<Genre>().unwrap(), Genre::Techno);
        assert!("polka".parse::<Genre>().is_err());
    }
}
