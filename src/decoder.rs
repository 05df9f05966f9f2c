use prost::Message;

use crate::error::DecodeError;
use crate::gtfs_realtime::{FeedEntity, FeedMessage};

/// Wire schemas the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSchema {
    /// `transit_realtime.FeedMessage` from gtfs-realtime.proto.
    #[default]
    GtfsRealtime,
}

/// Entities of one decoded feed message plus the header metadata worth logging.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFeed {
    pub version: String,
    pub timestamp: Option<u64>,
    pub entities: Vec<FeedEntity>,
}

/// Decode a raw feed payload.
///
/// Optional fields keep their presence exactly as received; nothing is
/// defaulted here.
pub fn decode(data: &[u8], schema: FeedSchema) -> Result<DecodedFeed, DecodeError> {
    match schema {
        FeedSchema::GtfsRealtime => decode_gtfs_realtime(data),
    }
}

fn decode_gtfs_realtime(data: &[u8]) -> Result<DecodedFeed, DecodeError> {
    let feed = FeedMessage::decode(data)?;

    // proto2 `required` is not enforced by prost, an empty payload would
    // otherwise decode into an empty feed.
    if feed.header.gtfs_realtime_version.is_empty() {
        return Err(DecodeError::MissingRequired("header.gtfs_realtime_version"));
    }
    for entity in &feed.entity {
        check_position(entity)?;
    }

    tracing::debug!(
        entities = feed.entity.len(),
        version = %feed.header.gtfs_realtime_version,
        timestamp = ?feed.header.timestamp,
        "Decoded protobuf feed"
    );

    for entity in feed.entity.iter().take(5) {
        tracing::trace!(?entity, "Raw feed entity");
    }

    Ok(DecodedFeed {
        version: feed.header.gtfs_realtime_version,
        timestamp: feed.header.timestamp,
        entities: feed.entity,
    })
}

/// A reported position must carry both coordinates; prost would otherwise
/// leave a missing one at 0.0.
fn check_position(entity: &FeedEntity) -> Result<(), DecodeError> {
    let Some(position) = entity.vehicle.as_ref().and_then(|v| v.position.as_ref()) else {
        return Ok(());
    };
    let missing = if position.latitude.is_none() {
        "position.latitude"
    } else if position.longitude.is_none() {
        "position.longitude"
    } else {
        return Ok(());
    };

    tracing::warn!(entity = %entity.id, field = missing, "Position without coordinates");
    Err(DecodeError::MissingRequired(missing))
}
