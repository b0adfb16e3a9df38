//! Console host for the multi-tap engine.
//!
//! Reads keypad input from stdin (one key per line), prints what would be
//! sent to the OS, and persists settings, user modes and the shift mode to
//! the user config directory on exit.

use anyhow::{Context, Result};
use multitap_core::dispatch::{self, DispatchEvent, Dispatcher};
use multitap_core::sender::{Cue, Feedback, KeySender, SendError};
use multitap_core::types::{self, KeyToken, Modifiers, TriggerId};
use multitap_core::{config, CommitScheduler, Engine};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::info;

/// Prints combos instead of injecting them.
struct ConsoleSender;

impl KeySender for ConsoleSender {
    fn press_combo(&mut self, modifiers: Modifiers, token: &KeyToken) -> Result<(), SendError> {
        println!("  >> {modifiers}{token}");
        Ok(())
    }

    fn inject_text(&mut self, text: &str) -> Result<(), SendError> {
        println!("  >> {text:?}");
        Ok(())
    }
}

/// Prints announcements instead of speaking them.
struct ConsoleFeedback;

impl Feedback for ConsoleFeedback {
    fn speak(&mut self, text: &str) {
        println!("  ({text})");
    }

    fn play(&mut self, cue: Cue) {
        if cue == Cue::Error {
            println!("  (beep)");
        }
    }
}

fn state_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("no user config directory")?;
    Ok(dir.join("multitap").join("state.json"))
}

fn parse_trigger(line: &str) -> Option<TriggerId> {
    match line {
        "0" => Some(types::NUMPAD_0),
        "1" => Some(types::NUMPAD_1),
        "2" => Some(types::NUMPAD_2),
        "3" => Some(types::NUMPAD_3),
        "4" => Some(types::NUMPAD_4),
        "5" => Some(types::NUMPAD_5),
        "6" => Some(types::NUMPAD_6),
        "7" => Some(types::NUMPAD_7),
        "8" => Some(types::NUMPAD_8),
        "9" => Some(types::NUMPAD_9),
        "*" => Some(types::MULTIPLY),
        "+" => Some(types::ADD),
        "-" => Some(types::SUBTRACT),
        "." => Some(types::DECIMAL),
        "/" => Some(types::DIVIDE),
        _ => None,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let path = state_path()?;
    let state = config::load_or_default(&path);
    info!(path = %path.display(), "state loaded");

    let (tx, rx) = dispatch::channel();
    let timer_tx = tx.clone();
    let scheduler = CommitScheduler::spawn(move |generation| {
        let _ = timer_tx.send(DispatchEvent::CommitDue(generation));
    });
    let engine = Engine::with_state(state, scheduler, ConsoleSender, ConsoleFeedback);
    let dispatcher = Dispatcher::new(engine, rx);
    let worker = std::thread::spawn(move || dispatcher.run());

    println!("keys: 0-9 . + - * /   commands: quit");
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }
        match parse_trigger(line) {
            Some(trigger) => {
                tx.send(DispatchEvent::Trigger(trigger))?;
            }
            None => println!("  unrecognized: {line:?}"),
        }
    }

    tx.send(DispatchEvent::Shutdown)?;
    let engine = worker
        .join()
        .map_err(|_| anyhow::anyhow!("dispatch thread panicked"))?;
    config::save(&path, &engine.snapshot())?;
    info!(path = %path.display(), "state saved");
    Ok(())
}
