// Sequencer module - Clock, transport and trigger emission
// Timeline, gates, playback order and the per-step player

pub mod clock;
pub mod event;
pub mod gate;
pub mod playback;
pub mod player;
pub mod timeline;
pub mod transport;

pub use clock::{ClockError, PositionObserver, SequencerClock};
pub use event::{TickReport, TriggerEvent, Voice, Voicing};
pub use gate::{GateState, Gates, can_play};
pub use playback::{ArrangementPosition, PlaybackOrder};
pub use player::{StepPlayer, hit_times};
pub use timeline::{NoteLength, Tempo};
pub use transport::{Transport, TransportState};
