mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{feed, vehicle, ScriptedSource};
use pretty_assertions::assert_eq;
use zet_live::config::Config;
use zet_live::error::{DecodeError, FetchError, NormalizeError, PollError};
use zet_live::poller::{CycleSummary, FeedPoller, PollEvent, PollOutcome, PollState};
use zet_live::presenter::NoopPresenter;

fn config() -> Config {
    Config {
        poll_interval: Duration::from_millis(20),
        fetch_timeout: Duration::from_millis(200),
        ..Config::default()
    }
}

fn live_ids(poller: &FeedPoller<ScriptedSource, NoopPresenter>) -> Vec<String> {
    poller
        .snapshot()
        .borrow()
        .iter()
        .map(|v| v.id.clone())
        .collect()
}

#[tokio::test]
async fn successful_cycle_publishes_vehicles() {
    let source = ScriptedSource::new(vec![Ok(feed(vec![vehicle("1", "6"), vehicle("2", "268")]))]);
    let poller = FeedPoller::new(source, NoopPresenter, &config());
    assert!(live_ids(&poller).is_empty());

    let outcome = poller.poll_once().await;

    assert_eq!(
        outcome,
        PollOutcome::Reconciled(CycleSummary {
            added: 2,
            updated: 0,
            removed: 0,
            live: 2,
        })
    );
    assert_eq!(live_ids(&poller), vec!["1", "2"]);
    assert_eq!(poller.state(), PollState::Idle);
    assert!(poller.status().borrow().last_success.is_some());
}

#[tokio::test]
async fn fetch_error_does_not_block_next_cycle() {
    let source = ScriptedSource::new(vec![
        Err(FetchError::Status(502)),
        Ok(feed(vec![vehicle("1", "6")])),
    ]);
    let poller = FeedPoller::new(source, NoopPresenter, &config());

    let first = poller.poll_once().await;
    let second = poller.poll_once().await;

    assert_eq!(first, PollOutcome::Failed(PollError::Fetch(FetchError::Status(502))));
    assert!(matches!(second, PollOutcome::Reconciled(_)));
    assert_eq!(live_ids(&poller), vec!["1"]);
    assert_eq!(poller.status().borrow().cycles, 2);
    assert_eq!(poller.status().borrow().last_error, None);
}

#[tokio::test]
async fn failed_cycle_keeps_previous_vehicles() {
    let source = ScriptedSource::new(vec![
        Ok(feed(vec![vehicle("1", "6")])),
        Ok(bytes::Bytes::from_static(&[0x0a, 0x64, 0x01])),
    ]);
    let poller = FeedPoller::new(source, NoopPresenter, &config());

    poller.poll_once().await;
    let outcome = poller.poll_once().await;

    assert!(matches!(
        outcome,
        PollOutcome::Failed(PollError::Decode(DecodeError::Malformed(_)))
    ));
    assert_eq!(live_ids(&poller), vec!["1"]);
    assert_eq!(poller.state(), PollState::Idle);
    assert!(poller.status().borrow().last_error.is_some());
}

#[tokio::test]
async fn entity_without_id_fails_the_cycle() {
    let source = ScriptedSource::new(vec![Ok(feed(vec![vehicle("1", "6"), vehicle("", "6")]))]);
    let poller = FeedPoller::new(source, NoopPresenter, &config());

    let outcome = poller.poll_once().await;

    assert_eq!(
        outcome,
        PollOutcome::Failed(PollError::Normalize(NormalizeError::MissingId(1)))
    );
    assert!(live_ids(&poller).is_empty());
}

#[tokio::test]
async fn slow_fetch_is_abandoned() {
    let source = ScriptedSource::with_delay(
        vec![Ok(feed(vec![vehicle("1", "6")]))],
        Duration::from_secs(2),
    );
    let poller = FeedPoller::new(source, NoopPresenter, &config());

    let outcome = poller.poll_once().await;

    assert_eq!(
        outcome,
        PollOutcome::Failed(PollError::Fetch(FetchError::Timeout(Duration::from_millis(200))))
    );
}

#[tokio::test]
async fn concurrent_triggers_fetch_once() {
    let source = ScriptedSource::with_delay(
        vec![Ok(feed(vec![vehicle("1", "6")]))],
        Duration::from_millis(50),
    );
    let poller = FeedPoller::new(source, NoopPresenter, &config());

    let (first, second) = tokio::join!(poller.poll_once(), poller.poll_once());

    assert!(matches!(first, PollOutcome::Reconciled(_)));
    assert_eq!(second, PollOutcome::Skipped);
    assert_eq!(poller.source().fetches(), 1);
    assert_eq!(poller.source().max_in_flight(), 1);
}

#[tokio::test]
async fn run_loop_reports_to_subscribers() {
    let source = ScriptedSource::new(vec![
        Err(FetchError::Transport("connection refused".to_string())),
        Ok(feed(vec![vehicle("1", "6"), vehicle("2", "6")])),
        Ok(feed(vec![vehicle("2", "6"), vehicle("3", "109")])),
    ]);
    let poller = Arc::new(FeedPoller::new(source, NoopPresenter, &config()));
    let mut events = poller.subscribe();

    let running = Arc::clone(&poller);
    let task = tokio::spawn(async move { running.run().await });

    let mut received = Vec::new();
    for _ in 0..3 {
        let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .unwrap()
            .unwrap();
        received.push(event);
    }
    task.abort();

    assert_eq!(
        received,
        vec![
            PollEvent::Failed {
                cycle: 1,
                error: PollError::Fetch(FetchError::Transport("connection refused".to_string())),
            },
            PollEvent::Reconciled {
                cycle: 2,
                summary: CycleSummary {
                    added: 2,
                    updated: 0,
                    removed: 0,
                    live: 2,
                },
            },
            PollEvent::Reconciled {
                cycle: 3,
                summary: CycleSummary {
                    added: 1,
                    updated: 1,
                    removed: 1,
                    live: 2,
                },
            },
        ]
    );
    assert_eq!(
        poller.snapshot().borrow().iter().map(|v| v.id.as_str()).collect::<Vec<_>>(),
        vec!["2", "3"]
    );
}

#[tokio::test]
async fn refresh_requests_during_a_cycle_are_coalesced() {
    let source = ScriptedSource::with_delay(
        vec![
            Ok(feed(vec![vehicle("1", "6")])),
            Ok(feed(vec![vehicle("1", "6")])),
            Ok(feed(vec![vehicle("1", "6")])),
        ],
        Duration::from_millis(100),
    );
    let config = Config {
        poll_interval: Duration::from_secs(3600),
        ..config()
    };
    let poller = Arc::new(FeedPoller::new(source, NoopPresenter, &config));
    let mut events = poller.subscribe();

    let running = Arc::clone(&poller);
    let task = tokio::spawn(async move { running.run().await });

    // First tick fires immediately; pile up requests while it is in flight.
    tokio::time::sleep(Duration::from_millis(20)).await;
    for _ in 0..5 {
        poller.request_refresh();
    }

    for _ in 0..2 {
        tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .unwrap()
            .unwrap();
    }
    tokio::time::sleep(Duration::from_millis(250)).await;
    task.abort();

    assert_eq!(poller.source().fetches(), 2);
    assert_eq!(poller.source().max_in_flight(), 1);
}
