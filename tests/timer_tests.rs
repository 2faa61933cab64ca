//! End-to-end tests for a complete timer run.
//!
//! The countdown sleeps through an injected no-op so these finish instantly.

use std::cell::Cell;
use std::time::Duration;

use notify_timer::alert::{MockAlertBackend, MockCall};
use notify_timer::cli::{run_timer, TimerRequest};
use notify_timer::dispatch::FallbackDispatcher;
use notify_timer::types::{AlertConfig, NotificationPayload};

fn positionals(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_five_minute_break_reminder() {
    let request = TimerRequest::from_positionals(&positionals(&["5m", "Take a break!"])).unwrap();
    assert_eq!(request.seconds().unwrap(), 300);

    let dispatcher = FallbackDispatcher::new(MockAlertBackend::new()).with_console(Vec::<u8>::new());
    let sleeps = Cell::new(0u32);
    let mut out = Vec::new();

    let outcomes = run_timer(
        &request,
        &AlertConfig::default(),
        &dispatcher,
        &mut out,
        |tick: Duration| {
            assert_eq!(tick, Duration::from_secs(1));
            sleeps.set(sleeps.get() + 1);
        },
    )
    .unwrap();

    assert_eq!(sleeps.get(), 300);

    let text = String::from_utf8(out).unwrap();
    let frames: Vec<&str> = text.split('\r').skip(1).collect();
    assert_eq!(frames.len(), 301);
    assert_eq!(frames[0].trim_end(), " 0d  0h  5m  0s");
    assert_eq!(frames[1].trim_end(), " 0d  0h  4m 59s");
    assert!(text.ends_with("\nTime's up!\n"));

    assert_eq!(
        dispatcher.backend().calls(),
        vec![
            MockCall::Bell,
            MockCall::Notification {
                mechanism: "mock-notifier".to_string(),
                payload: NotificationPayload::new("Notify", "Timer Complete", "Take a break!"),
            },
        ]
    );
    assert!(outcomes.iter().all(|o| o.succeeded() && !o.last_resort));
}

#[test]
fn test_audio_positional_reaches_player_chain() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("gong.wav");
    std::fs::write(&audio, b"RIFF").unwrap();

    let args = vec![
        audio.to_string_lossy().into_owned(),
        "2s".to_string(),
        "tea".to_string(),
        "is".to_string(),
        "ready".to_string(),
    ];
    let request = TimerRequest::from_positionals(&args).unwrap();
    let dispatcher = FallbackDispatcher::new(MockAlertBackend::new()).with_console(Vec::<u8>::new());

    let outcomes = run_timer(
        &request,
        &AlertConfig::default().with_title("Kitchen"),
        &dispatcher,
        &mut Vec::<u8>::new(),
        |_| {},
    )
    .unwrap();

    assert_eq!(outcomes[0].mechanism, "mock-player");
    assert_eq!(
        dispatcher.backend().calls(),
        vec![
            MockCall::AudioFile {
                mechanism: "mock-player".to_string(),
                path: audio,
            },
            MockCall::Notification {
                mechanism: "mock-notifier".to_string(),
                payload: NotificationPayload::new("Notify", "Kitchen", "tea is ready"),
            },
        ]
    );
}

#[test]
fn test_failing_alerts_still_complete_the_run() {
    let mock = MockAlertBackend::new();
    mock.fail_everything();
    mock.set_bell_should_fail(true);
    let dispatcher = FallbackDispatcher::new(mock).with_console(Vec::<u8>::new());
    let request = TimerRequest::from_positionals(&positionals(&["1s", "done"])).unwrap();

    let outcomes = run_timer(
        &request,
        &AlertConfig::default(),
        &dispatcher,
        &mut Vec::<u8>::new(),
        |_| {},
    )
    .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].mechanism, "terminal-bell");
    assert_eq!(outcomes[1].mechanism, "console");
    assert!(outcomes.iter().all(|o| o.last_resort));
}
