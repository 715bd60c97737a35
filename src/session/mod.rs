// Session module - Sequencer session state and its persistence
//
// Architecture:
// - state.rs: The session aggregate and its invariant-keeping edits
// - arrangement.rs: Song-mode bar order
// - snapshot.rs: Optional-field snapshots, RON/JSON encoding, normalization

pub mod arrangement;
pub mod snapshot;
pub mod state;

pub use arrangement::Arrangement;
pub use snapshot::{Inconsistency, Snapshot, SnapshotError};
pub use state::{AnalysisFrame, ArrangementEdit, Session, random_key};
