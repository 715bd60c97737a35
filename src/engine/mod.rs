// Engine - Public facade over the session, the clock and the trigger channel
// LoopEngine owns everything; SharedEngine puts it behind one lock

pub mod loop_engine;
pub mod shared;

pub use loop_engine::{Lifecycle, LoopEngine, RandomizeSummary};
pub use shared::SharedEngine;
