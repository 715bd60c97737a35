// Shared engine - One lock around the whole engine
// The transport thread and the edit thread both go through `with`

use super::loop_engine::LoopEngine;
use crate::sequencer::{ClockError, TickReport};
use rand::Rng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle; a tick never observes a half-applied edit
pub struct SharedEngine<R: Rng = StdRng> {
    inner: Arc<Mutex<LoopEngine<R>>>,
}

impl<R: Rng> SharedEngine<R> {
    pub fn new(engine: LoopEngine<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Lock, recovering the engine if a previous holder panicked
    pub fn lock(&self) -> MutexGuard<'_, LoopEngine<R>> {
        self.inner.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            log::warn!("Engine lock was poisoned; recovering");
            poisoned.into_inner()
        })
    }

    /// Run `f` under the lock
    pub fn with<T>(&self, f: impl FnOnce(&mut LoopEngine<R>) -> T) -> T {
        let mut engine = self.lock();
        f(&mut engine)
    }

    pub fn process_until(&self, now: f64) -> Result<Vec<TickReport>, ClockError> {
        self.lock().process_until(now)
    }
}

impl<R: Rng> Clone for SharedEngine<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::pattern::Instrument;
    use std::thread;

    #[test]
    fn test_edits_from_another_thread() {
        let shared = SharedEngine::new(LoopEngine::seeded(EngineConfig::default(), 21));
        shared.with(|e| {
            e.init();
            e.start(0.0)
        })
        .unwrap();

        let editor = shared.clone();
        let handle = thread::spawn(move || {
            for bars in [3, 5, 1, 2] {
                editor.with(|e| e.resize(bars));
                editor.with(|e| e.toggle_step(Instrument::Hat, 7));
            }
        });

        let mut now = 0.0;
        for _ in 0..50 {
            now += 0.05;
            let reports = shared.process_until(now).unwrap();
            for r in &reports {
                assert!(r.step < 5 * 16);
            }
        }
        handle.join().unwrap();

        assert_eq!(shared.with(|e| e.loop_length()), 2);
        assert!(shared.lock().is_playing());
    }

    #[test]
    fn test_lock_recovers_from_poison() {
        let shared = SharedEngine::new(LoopEngine::seeded(EngineConfig::default(), 22));
        let poisoner = shared.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock();
            panic!("poison the engine lock");
        })
        .join();

        shared.with(|e| e.set_bpm(100.0));
        assert_eq!(shared.lock().bpm(), 100.0);
    }
}
