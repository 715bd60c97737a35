// Instruments - The eight sequencer roles and their generator styles
// Each role carries a closed style enum; dispatch is an exhaustive match

use super::PatternError;
use super::chance::pick;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sequencer instrument role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Kick,
    Bass,
    Hat,
    Clap,
    Acid,
    Lead,
    Perc,
    Stab,
}

impl Instrument {
    pub const COUNT: usize = 8;

    /// Roles in emission order
    pub const ALL: [Instrument; Self::COUNT] = [
        Instrument::Kick,
        Instrument::Bass,
        Instrument::Hat,
        Instrument::Clap,
        Instrument::Acid,
        Instrument::Lead,
        Instrument::Perc,
        Instrument::Stab,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::Kick => "kick",
            Instrument::Bass => "bass",
            Instrument::Hat => "hat",
            Instrument::Clap => "clap",
            Instrument::Acid => "acid",
            Instrument::Lead => "lead",
            Instrument::Perc => "perc",
            Instrument::Stab => "stab",
        }
    }

    /// Three-letter display label
    pub fn label(self) -> &'static str {
        match self {
            Instrument::Kick => "KCK",
            Instrument::Bass => "BAS",
            Instrument::Hat => "HAT",
            Instrument::Clap => "CLP",
            Instrument::Acid => "ACD",
            Instrument::Lead => "LED",
            Instrument::Perc => "PRC",
            Instrument::Stab => "STB",
        }
    }

    /// Minimum global intensity at which a `normal`-gated instrument plays
    ///
    /// Low intensity leaves a sparse kick/bass skeleton; the stab only joins
    /// the full mix.
    pub fn intensity_threshold(self) -> f32 {
        match self {
            Instrument::Kick => 0.0,
            Instrument::Bass => 0.1,
            Instrument::Hat => 0.3,
            Instrument::Clap => 0.25,
            Instrument::Acid => 0.45,
            Instrument::Lead => 0.65,
            Instrument::Perc => 0.55,
            Instrument::Stab => 0.8,
        }
    }
}

impl FromStr for Instrument {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.name() == s)
            .ok_or_else(|| PatternError::UnknownStyle {
                instrument: "instrument",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! style_enum {
    ($(#[$meta:meta])* $name:ident for $role:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
                pick(rng, Self::ALL)
            }
        }

        impl FromStr for $name {
            type Err = PatternError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == s)
                    .ok_or_else(|| PatternError::UnknownStyle {
                        instrument: $role,
                        name: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

style_enum! {
    KickStyle for "kick" {
        Four => "four",
        OffKick => "offkick",
        SkipBeat => "skipbeat",
    }
}

style_enum! {
    BassStyle for "bass" {
        Rolling => "rolling",
        Galloping => "galloping",
        Syncopated => "syncopated",
        Offbeat => "offbeat",
        Pulsing => "pulsing",
    }
}

style_enum! {
    HatStyle for "hat" {
        Standard => "standard",
        Sixteenths => "sixteenths",
        Sparse => "sparse",
        Busy => "busy",
    }
}

style_enum! {
    ClapStyle for "clap" {
        Backbeat => "backbeat",
        Trap => "trap",
        Breakbeat => "breakbeat",
        Minimal => "minimal",
    }
}

style_enum! {
    /// Phrase shape of the acid line
    AcidStyle for "acid" {
        Sequence => "sequence",
        Random => "random",
        Repeated => "repeated",
        CallResponse => "call_response",
    }
}

style_enum! {
    LeadStyle for "lead" {
        Arpeggio => "arpeggio",
        Melody => "melody",
        Staccato => "staccato",
        Wide => "wide",
    }
}

style_enum! {
    PercStyle for "perc" {
        Sparse => "sparse",
        Shaker => "shaker",
        Conga => "conga",
        Rim => "rim",
    }
}

style_enum! {
    StabStyle for "stab" {
        Sparse => "sparse",
        Offbeat => "offbeat",
        Rhythmic => "rhythmic",
        Accent => "accent",
    }
}

/// A style bound to its instrument role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentStyle {
    Kick(KickStyle),
    Bass(BassStyle),
    Hat(HatStyle),
    Clap(ClapStyle),
    Acid(AcidStyle),
    Lead(LeadStyle),
    Perc(PercStyle),
    Stab(StabStyle),
}

impl InstrumentStyle {
    pub fn instrument(self) -> Instrument {
        match self {
            InstrumentStyle::Kick(_) => Instrument::Kick,
            InstrumentStyle::Bass(_) => Instrument::Bass,
            InstrumentStyle::Hat(_) => Instrument::Hat,
            InstrumentStyle::Clap(_) => Instrument::Clap,
            InstrumentStyle::Acid(_) => Instrument::Acid,
            InstrumentStyle::Lead(_) => Instrument::Lead,
            InstrumentStyle::Perc(_) => Instrument::Perc,
            InstrumentStyle::Stab(_) => Instrument::Stab,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InstrumentStyle::Kick(s) => s.name(),
            InstrumentStyle::Bass(s) => s.name(),
            InstrumentStyle::Hat(s) => s.name(),
            InstrumentStyle::Clap(s) => s.name(),
            InstrumentStyle::Acid(s) => s.name(),
            InstrumentStyle::Lead(s) => s.name(),
            InstrumentStyle::Perc(s) => s.name(),
            InstrumentStyle::Stab(s) => s.name(),
        }
    }

    /// Parse a style name for a given role
    pub fn parse(instrument: Instrument, name: &str) -> Result<Self, PatternError> {
        Ok(match instrument {
            Instrument::Kick => InstrumentStyle::Kick(name.parse()?),
            Instrument::Bass => InstrumentStyle::Bass(name.parse()?),
            Instrument::Hat => InstrumentStyle::Hat(name.parse()?),
            Instrument::Clap => InstrumentStyle::Clap(name.parse()?),
            Instrument::Acid => InstrumentStyle::Acid(name.parse()?),
            Instrument::Lead => InstrumentStyle::Lead(name.parse()?),
            Instrument::Perc => InstrumentStyle::Perc(name.parse()?),
            Instrument::Stab => InstrumentStyle::Stab(name.parse()?),
        })
    }
}

impl fmt::Display for InstrumentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.instrument(), self.name())
    }
}

/// The style currently selected for every role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSet {
    pub kick: KickStyle,
    pub bass: BassStyle,
    pub hat: HatStyle,
    pub clap: ClapStyle,
    pub acid: AcidStyle,
    pub lead: LeadStyle,
    pub perc: PercStyle,
    pub stab: StabStyle,
}

impl StyleSet {
    /// Uniform draw over every style enum
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            kick: KickStyle::random(rng),
            bass: BassStyle::random(rng),
            hat: HatStyle::random(rng),
            clap: ClapStyle::random(rng),
            acid: AcidStyle::random(rng),
            lead: LeadStyle::random(rng),
            perc: PercStyle::random(rng),
            stab: StabStyle::random(rng),
        }
    }

    pub fn get(&self, instrument: Instrument) -> InstrumentStyle {
        match instrument {
            Instrument::Kick => InstrumentStyle::Kick(self.kick),
            Instrument::Bass => InstrumentStyle::Bass(self.bass),
            Instrument::Hat => InstrumentStyle::Hat(self.hat),
            Instrument::Clap => InstrumentStyle::Clap(self.clap),
            Instrument::Acid => InstrumentStyle::Acid(self.acid),
            Instrument::Lead => InstrumentStyle::Lead(self.lead),
            Instrument::Perc => InstrumentStyle::Perc(self.perc),
            Instrument::Stab => InstrumentStyle::Stab(self.stab),
        }
    }

    pub fn set(&mut self, style: InstrumentStyle) {
        match style {
            InstrumentStyle::Kick(s) => self.kick = s,
            InstrumentStyle::Bass(s) => self.bass = s,
            InstrumentStyle::Hat(s) => self.hat = s,
            InstrumentStyle::Clap(s) => self.clap = s,
            InstrumentStyle::Acid(s) => self.acid = s,
            InstrumentStyle::Lead(s) => self.lead = s,
            InstrumentStyle::Perc(s) => self.perc = s,
            InstrumentStyle::Stab(s) => self.stab = s,
        }
    }
}

impl Default for StyleSet {
    fn default() -> Self {
        Self {
            kick: KickStyle::Four,
            bass: BassStyle::Rolling,
            hat: HatStyle::Standard,
            clap: ClapStyle::Backbeat,
            acid: AcidStyle::Sequence,
            lead: LeadStyle::Arpeggio,
            perc: PercStyle::Sparse,
            stab: StabStyle::Sparse,
        }
    }
}
