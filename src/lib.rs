// Loop Machine - Library exports for the demo, tests and benchmarks

pub mod config;
pub mod engine;
pub mod messaging;
pub mod pattern;
pub mod sequencer;
pub mod session;
pub mod theory;

// Re-export commonly used types for convenience
pub use config::{AmbientConfig, ConfigError, EngineConfig};
pub use engine::{Lifecycle, LoopEngine, RandomizeSummary, SharedEngine};
pub use messaging::{TriggerConsumer, TriggerSender, create_trigger_channel};
pub use pattern::{
    BridgeKind, Cell, Genre, HatKind, HitCount, Instrument, InstrumentStyle, PatternStore,
    StyleSet, VoicingToken,
};
pub use sequencer::{
    ArrangementPosition, ClockError, GateState, NoteLength, Tempo, TickReport, TriggerEvent,
    TransportState, Voice, Voicing,
};
pub use session::{AnalysisFrame, Inconsistency, Session, Snapshot, SnapshotError};
pub use theory::{Key, NoteName, Pitch, ScaleKind, TheoryError};
