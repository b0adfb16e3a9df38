//! Single-slot deferred commit timer.
//!
//! Arming replaces any outstanding deadline; each arm gets a fresh
//! generation id and the engine drops fires whose generation no longer
//! matches, so at most one commit can result from any arm.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

pub type Generation = u64;

enum TimerCmd {
    Arm {
        generation: Generation,
        delay: Duration,
    },
    Disarm,
}

pub struct CommitScheduler {
    control: Sender<TimerCmd>,
    generation: Generation,
}

impl CommitScheduler {
    /// Spawns the timer thread. `on_fire` is called from that thread when a
    /// deadline expires; callers are expected to marshal the generation back
    /// onto their dispatch channel rather than touch state directly.
    pub fn spawn<F>(on_fire: F) -> Self
    where
        F: Fn(Generation) + Send + 'static,
    {
        let (control, commands) = unbounded();
        thread::Builder::new()
            .name("commit-timer".to_string())
            .spawn(move || timer_loop(commands, on_fire))
            .expect("spawn commit timer thread");
        Self {
            control,
            generation: 0,
        }
    }

    /// Cancels any outstanding deadline and starts a new one. Returns the
    /// generation the eventual fire will carry.
    pub fn arm(&mut self, delay: Duration) -> Generation {
        self.generation += 1;
        let _ = self.control.send(TimerCmd::Arm {
            generation: self.generation,
            delay,
        });
        self.generation
    }

    /// Clears the slot. A no-op if nothing is armed.
    pub fn cancel(&mut self) {
        self.generation += 1;
        let _ = self.control.send(TimerCmd::Disarm);
    }

    pub fn current_generation(&self) -> Generation {
        self.generation
    }
}

fn timer_loop<F: Fn(Generation)>(commands: Receiver<TimerCmd>, on_fire: F) {
    let mut armed: Option<(Generation, Instant)> = None;
    loop {
        let cmd = match armed {
            Some((generation, deadline)) => {
                let now = Instant::now();
                if now >= deadline {
                    debug!(generation, "commit timer fired");
                    on_fire(generation);
                    armed = None;
                    continue;
                }
                match commands.recv_timeout(deadline - now) {
                    Ok(cmd) => cmd,
                    Err(RecvTimeoutError::Timeout) => {
                        debug!(generation, "commit timer fired");
                        on_fire(generation);
                        armed = None;
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match commands.recv() {
                Ok(cmd) => cmd,
                Err(_) => break,
            },
        };
        match cmd {
            TimerCmd::Arm { generation, delay } => {
                armed = Some((generation, Instant::now() + delay));
            }
            TimerCmd::Disarm => armed = None,
        }
    }
}
