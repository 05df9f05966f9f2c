use std::time::Duration;

use anyhow::Context;
use zet_live::api::{FeedSource, HttpFeedSource, DEFAULT_FEED_URL};
use zet_live::decoder::{self, FeedSchema};
use zet_live::normalizer::VehicleNormalizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_FEED_URL.to_string());

    println!("Fetching from: {}", url);
    let source = HttpFeedSource::new(url, Duration::from_secs(10))?;
    let bytes = source.fetch().await.context("Failed to fetch feed")?;

    println!("Received {} bytes", bytes.len());

    let feed = decoder::decode(&bytes, FeedSchema::GtfsRealtime)?;

    println!("Feed header version: {}", feed.version);
    println!("Feed timestamp: {:?}", feed.timestamp);
    println!("Number of entities: {}", feed.entities.len());

    let normalizer = VehicleNormalizer::default();

    for (i, entity) in feed.entities.iter().enumerate() {
        println!("\n--- Entity {} ---", i);
        println!("Entity ID: {}", entity.id);

        let Some(vehicle) = &entity.vehicle else {
            println!("Has vehicle data: NO");
            continue;
        };
        println!("Has vehicle data: YES");

        if let Some(trip) = &vehicle.trip {
            println!("  Trip ID: {:?}", trip.trip_id);
            println!("  Route ID: {:?}", trip.route_id);
        } else {
            println!("  Trip data: NONE");
        }

        if let Some(pos) = &vehicle.position {
            println!("  Position: {:?}, {:?}", pos.latitude, pos.longitude);
            println!("  Bearing: {:?}", pos.bearing);
            println!("  Speed: {:?}", pos.speed);
        } else {
            println!("  Position: NONE");
        }

        match normalizer.normalize_entity(i, entity) {
            Ok(Some(record)) => println!("  Normalized: {}", record.summary()),
            Ok(None) => {}
            Err(e) => println!("  Normalize error: {}", e),
        }
    }

    Ok(())
}
