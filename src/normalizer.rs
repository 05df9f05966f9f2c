//! Maps decoded feed entities onto [`VehicleRecord`]s.
//!
//! Derivations applied per vehicle:
//! - classification from the route number (below the rail threshold is a tram)
//! - a passenger-facing line label
//! - speed in km/h and bearing in whole degrees, only when reported
//! - humanized congestion and occupancy levels
//!
//! Nothing is defaulted: a field missing from the feed stays `None`.

use crate::error::NormalizeError;
use crate::gtfs_realtime::{
    trip_descriptor::ScheduleRelationship,
    vehicle_position::{CongestionLevel, OccupancyStatus, VehicleStopStatus},
    FeedEntity, Position, TripDescriptor,
};
use crate::models::{PositionInfo, TripInfo, VehicleKind, VehicleRecord};

/// Routes numbered below this are trams in the Zagreb network.
pub const DEFAULT_RAIL_ROUTE_THRESHOLD: u64 = 100;

const MS_TO_KMH: f64 = 3.6;

#[derive(Debug, Clone, Copy)]
pub struct VehicleNormalizer {
    rail_route_threshold: u64,
}

impl Default for VehicleNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_RAIL_ROUTE_THRESHOLD)
    }
}

impl VehicleNormalizer {
    pub fn new(rail_route_threshold: u64) -> Self {
        Self {
            rail_route_threshold,
        }
    }

    /// Normalize a whole snapshot. Entities without a vehicle payload are
    /// dropped; an entity without an id fails the snapshot.
    pub fn normalize(&self, entities: &[FeedEntity]) -> Result<Vec<VehicleRecord>, NormalizeError> {
        let mut records = Vec::with_capacity(entities.len());
        for (index, entity) in entities.iter().enumerate() {
            if let Some(record) = self.normalize_entity(index, entity)? {
                records.push(record);
            }
        }

        tracing::debug!(
            entities = entities.len(),
            vehicles = records.len(),
            "Normalized feed entities"
        );
        Ok(records)
    }

    /// Normalize one entity, `Ok(None)` when it carries no vehicle update.
    pub fn normalize_entity(
        &self,
        index: usize,
        entity: &FeedEntity,
    ) -> Result<Option<VehicleRecord>, NormalizeError> {
        let Some(vehicle) = &entity.vehicle else {
            return Ok(None);
        };
        if entity.id.is_empty() {
            return Err(NormalizeError::MissingId(index));
        }

        let descriptor = vehicle.vehicle.as_ref();
        let vehicle_id = descriptor.and_then(|d| d.id.clone());
        let label = descriptor.and_then(|d| d.label.clone());
        let license_plate = descriptor.and_then(|d| d.license_plate.clone());

        let trip = vehicle.trip.as_ref().map(trip_info);
        let route_id = trip.as_ref().and_then(|t| t.route_id.as_deref());

        let kind = self.classify(route_id);
        let line = [route_id, label.as_deref(), vehicle_id.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or(entity.id.as_str())
            .to_string();

        Ok(Some(VehicleRecord {
            id: entity.id.clone(),
            kind,
            line,
            vehicle_id,
            label,
            license_plate,
            trip,
            position: vehicle.position.as_ref().and_then(position_info),
            current_status: vehicle.current_status.map(|v| {
                enum_name(v, |v| {
                    VehicleStopStatus::try_from(v).ok().map(|s| s.as_str_name())
                })
            }),
            timestamp: vehicle.timestamp,
            congestion_level: vehicle.congestion_level.map(|v| {
                humanize(&enum_name(v, |v| {
                    CongestionLevel::try_from(v).ok().map(|s| s.as_str_name())
                }))
            }),
            occupancy_status: vehicle.occupancy_status.map(|v| {
                humanize(&enum_name(v, |v| {
                    OccupancyStatus::try_from(v).ok().map(|s| s.as_str_name())
                }))
            }),
        }))
    }

    /// Classify by the leading number of the route id; unknown routes are buses.
    pub fn classify(&self, route_id: Option<&str>) -> VehicleKind {
        let threshold = i64::try_from(self.rail_route_threshold).unwrap_or(i64::MAX);
        match route_id.and_then(route_number) {
            Some(n) if n < threshold => VehicleKind::Tram,
            _ => VehicleKind::Bus,
        }
    }
}

/// Leading integer of a route id, read like JavaScript's `parseInt`: "12A" is
/// route 12, "-5" is -5 and "X1" has none.
fn route_number(route_id: &str) -> Option<i64> {
    let trimmed = route_id.trim_start();
    let digits_from = usize::from(trimmed.starts_with(['+', '-']));
    let end = trimmed[digits_from..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed.len(), |i| i + digits_from);
    trimmed[..end].parse().ok()
}

fn trip_info(trip: &TripDescriptor) -> TripInfo {
    TripInfo {
        trip_id: trip.trip_id.clone(),
        route_id: trip.route_id.clone(),
        schedule_relationship: trip.schedule_relationship.map(|v| {
            enum_name(v, |v| {
                ScheduleRelationship::try_from(v).ok().map(|s| s.as_str_name())
            })
        }),
    }
}

/// `None` unless both coordinates were reported.
fn position_info(position: &Position) -> Option<PositionInfo> {
    Some(PositionInfo {
        latitude: f64::from(position.latitude?),
        longitude: f64::from(position.longitude?),
        bearing: position.bearing.and_then(|b| round_finite(f64::from(b))),
        speed: position.speed.and_then(|s| round_finite(f64::from(s) * MS_TO_KMH)),
    })
}

fn round_finite(value: f64) -> Option<i32> {
    value.is_finite().then(|| value.round() as i32)
}

/// Protobuf name of an enum value, or the raw number when the value is unknown.
fn enum_name(value: i32, name: impl Fn(i32) -> Option<&'static str>) -> String {
    name(value)
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

/// "MANY_SEATS_AVAILABLE" -> "many seats available"
fn humanize(name: &str) -> String {
    name.replace('_', " ").to_lowercase()
}
