// Pattern module - Step patterns, their generators and the bar editor
//
// Architecture:
// - instrument.rs: The eight instrument roles and their style enums
// - cell.rs: Per-step cells (voicing token + hit count)
// - generators.rs: Stochastic per-instrument pattern synthesis
// - store.rs: Mutable per-instrument step arrays and bar operations
// - bridge.rs: Rule-based transition bars (buildup/breakdown/fill/drop)
// - genre.rs: Genre presets constraining randomization
// - chance.rs: Bernoulli/uniform helpers over an injected random source

pub mod bridge;
pub mod cell;
pub mod chance;
pub mod generators;
pub mod genre;
pub mod instrument;
pub mod store;

pub use bridge::BridgeKind;
pub use cell::{Cell, HatKind, HitCount, KICK_PITCH, Track, VoicingToken, hits_of};
pub use genre::{Genre, GenreDraw, GenrePreset};
pub use instrument::{
    AcidStyle, BassStyle, ClapStyle, HatStyle, Instrument, InstrumentStyle, KickStyle, LeadStyle,
    PercStyle, StabStyle, StyleSet,
};
pub use store::PatternStore;

/// Sixteenth-note steps per bar
pub const STEPS_PER_BAR: usize = 16;

/// Pattern error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("Unknown style {name:?} for {instrument}")]
    UnknownStyle { instrument: &'static str, name: String },

    #[error("Unknown bridge kind: {0:?}")]
    UnknownBridgeKind(String),

    #[error("Unknown genre: {0:?}")]
    UnknownGenre(String),
}
