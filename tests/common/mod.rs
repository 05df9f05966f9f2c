#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use prost::Message;
use zet_live::api::FeedSource;
use zet_live::error::FetchError;
use zet_live::gtfs_realtime::{
    FeedEntity, FeedHeader, FeedMessage, Position, TripDescriptor, VehiclePosition,
};

/// Entity with a vehicle on `route_id` at a fixed Zagreb position.
pub fn vehicle(id: &str, route_id: &str) -> FeedEntity {
    FeedEntity {
        id: id.to_string(),
        is_deleted: None,
        vehicle: Some(VehiclePosition {
            trip: Some(TripDescriptor {
                trip_id: Some(format!("trip-{id}")),
                route_id: Some(route_id.to_string()),
                ..Default::default()
            }),
            position: Some(Position {
                latitude: Some(45.815),
                longitude: Some(15.9819),
                ..Default::default()
            }),
            timestamp: Some(1_700_000_000),
            ..Default::default()
        }),
    }
}

/// Encoded feed message carrying `entities`.
pub fn feed(entities: Vec<FeedEntity>) -> Bytes {
    FeedMessage {
        header: FeedHeader {
            gtfs_realtime_version: "2.0".to_string(),
            incrementality: None,
            timestamp: Some(1_700_000_000),
        },
        entity: entities,
    }
    .encode_to_vec()
    .into()
}

/// Feed source that replays scripted responses and counts fetches.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Bytes, FetchError>>>,
    delay: Duration,
    fetches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<Bytes, FetchError>>) -> Self {
        Self::with_delay(responses, Duration::ZERO)
    }

    pub fn with_delay(responses: Vec<Result<Bytes, FetchError>>, delay: Duration) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            delay,
            fetches: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for ScriptedSource {
    async fn fetch(&self) -> Result<Bytes, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("script exhausted".to_string())));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }

    fn describe(&self) -> &str {
        "scripted"
    }
}
