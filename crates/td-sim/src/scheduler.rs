//! Fixed-rate background stepping.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::{DispatchObserver, SimError, SimResult, World};

/// Handle to the stepper thread.
///
/// The thread calls [`World::step`] once every `tick_ms` of wall time until
/// [`stop`](Self::stop) is called or a tick fails.  A tick that overruns its
/// slot is followed immediately by the next one; missed slots are not
/// replayed.
pub struct Scheduler<O> {
    stop:   Arc<AtomicBool>,
    handle: JoinHandle<SimResult<O>>,
}

impl<O> Scheduler<O>
where
    O: DispatchObserver + Send + 'static,
{
    /// Start stepping `world` on a new thread named `td-stepper`.
    pub fn spawn(world: Arc<World>, mut observer: O) -> SimResult<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let period = Duration::from_millis(u64::from(world.config().tick_ms));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new().name("td-stepper".into()).spawn(move || {
            log::info!("stepper started, one tick every {period:?}");
            let mut next = Instant::now() + period;
            while !flag.load(Ordering::Relaxed) {
                let now = Instant::now();
                if next > now {
                    thread::sleep(next - now);
                }
                next = next.max(Instant::now()) + period;
                if let Err(e) = world.step(&mut observer) {
                    log::error!("stepper halted: {e}");
                    return Err(e);
                }
            }
            log::info!("stepper stopped");
            Ok(observer)
        })?;

        Ok(Self { stop, handle })
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Ask the stepper to stop after the current tick and wait for it.
    ///
    /// Hands the observer back, or returns the error that halted the stepper.
    pub fn stop(self) -> SimResult<O> {
        self.stop.store(true, Ordering::Relaxed);
        self.handle.join().map_err(|_| SimError::Poisoned)?
    }
}
