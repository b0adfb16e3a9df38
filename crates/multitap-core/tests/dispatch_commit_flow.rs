use crossbeam_channel::Sender;
use multitap_core::dispatch::{self, DispatchEvent, Dispatcher};
use multitap_core::sender::recording::{RecordingFeedback, RecordingSender};
use multitap_core::{CommitScheduler, Engine, SavedState};
use multitap_core::types;
use std::thread;
use std::time::Duration;

const TIMEOUT_MS: u64 = 80;

type TestEngine = Engine<RecordingSender, RecordingFeedback>;

/// Wires the full pipeline: commit-timer fires go back through the dispatch
/// channel, and the dispatch loop runs on its own thread.
fn spawn_pipeline() -> (
    Sender<DispatchEvent>,
    RecordingSender,
    thread::JoinHandle<TestEngine>,
) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let (tx, rx) = dispatch::channel();
    let timer_tx = tx.clone();
    let scheduler = CommitScheduler::spawn(move |generation| {
        let _ = timer_tx.send(DispatchEvent::CommitDue(generation));
    });
    let mut state = SavedState::default();
    state.settings.timeout_ms = TIMEOUT_MS;
    let sender = RecordingSender::new();
    let engine = Engine::with_state(state, scheduler, sender.clone(), RecordingFeedback::new());
    let handle = thread::spawn(move || Dispatcher::new(engine, rx).run());
    (tx, sender, handle)
}

fn settle() {
    thread::sleep(Duration::from_millis(TIMEOUT_MS * 4));
}

#[test]
fn multi_tap_word_with_autocapitalization() {
    let (tx, sender, handle) = spawn_pipeline();
    let press = |trigger| tx.send(DispatchEvent::Trigger(trigger)).unwrap();

    // "cab." then an autocapitalized "A", each letter separated by letting
    // the inactivity timer expire.
    press(types::NUMPAD_2);
    press(types::NUMPAD_2);
    press(types::NUMPAD_2); // c
    settle();
    press(types::NUMPAD_2); // a
    settle();
    press(types::NUMPAD_2);
    press(types::NUMPAD_2); // b
    settle();
    press(types::NUMPAD_1); // .
    settle();
    press(types::NUMPAD_2); // a, capitalized after the period
    settle();

    tx.send(DispatchEvent::Shutdown).unwrap();
    let engine = handle.join().unwrap();

    let typed: Vec<String> = sender
        .combos()
        .iter()
        .map(|(mods, token)| format!("{mods}{token}"))
        .collect();
    assert_eq!(typed, vec!["c", "a", "b", ".", "shift+a"]);
    assert!(engine.pending_candidate().is_none());
}

#[test]
fn rapid_presses_commit_only_the_final_candidate() {
    let (tx, sender, handle) = spawn_pipeline();

    // Five presses well inside the window cycle a -> b -> c -> a -> b;
    // only "b" may come out, and only once.
    for _ in 0..5 {
        tx.send(DispatchEvent::Trigger(types::NUMPAD_2)).unwrap();
    }
    settle();
    settle();

    tx.send(DispatchEvent::Shutdown).unwrap();
    handle.join().unwrap();

    let combos = sender.combos();
    assert_eq!(combos.len(), 1);
    assert_eq!(combos[0].1.as_str(), "b");
}

#[test]
fn mode_switch_pass_through_and_shutdown_flush() {
    let (tx, sender, handle) = spawn_pipeline();
    let press = |trigger| tx.send(DispatchEvent::Trigger(trigger)).unwrap();

    // Number Entry emits digits immediately, no inactivity wait needed.
    press(types::DIVIDE);
    press(types::NUMPAD_4);
    press(types::NUMPAD_2);
    // Back to the standard mode, leave a selection pending at shutdown.
    press(types::DIVIDE);
    press(types::DIVIDE);
    press(types::NUMPAD_3);
    tx.send(DispatchEvent::Shutdown).unwrap();
    let engine = handle.join().unwrap();

    let typed: Vec<String> = sender
        .combos()
        .iter()
        .map(|(_, token)| token.as_str().to_string())
        .collect();
    assert_eq!(typed, vec!["4", "2", "d"], "shutdown must flush the pending 'd'");
    assert_eq!(
        engine.mode_table().active_name(),
        multitap_core::modes::MODE_MULTI_TAP
    );
}
