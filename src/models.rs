use serde::{Deserialize, Serialize};

/// Vehicle classification derived from the route number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    /// Rail-like vehicles (routes below the rail threshold)
    Tram,
    /// Road-like vehicles, also the fallback when the route is unknown
    Bus,
}

impl VehicleKind {
    pub fn title(&self) -> &'static str {
        match self {
            VehicleKind::Tram => "Tram",
            VehicleKind::Bus => "Bus",
        }
    }
}

/// Trip the vehicle is currently serving
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,

    /// Protobuf enum name, e.g. "SCHEDULED"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_relationship: Option<String>,
}

/// Reported vehicle position with converted units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionInfo {
    pub latitude: f64,

    pub longitude: f64,

    /// Heading in whole degrees clockwise from north
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearing: Option<i32>,

    /// Speed in km/h. `None` means unknown, not stationary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<i32>,
}

impl PositionInfo {
    /// Whether a presenter can place this position on a map
    pub fn is_usable(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Canonical state of one vehicle for one poll cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    /// Feed entity id, stable across polls for the same vehicle
    pub id: String,

    pub kind: VehicleKind,

    /// Line shown to passengers (route, else label, else vehicle id, else entity id)
    pub line: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip: Option<TripInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionInfo>,

    /// Protobuf enum name, e.g. "IN_TRANSIT_TO"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_status: Option<String>,

    /// Unix timestamp of the position fix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,

    /// Humanized, e.g. "running smoothly"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub congestion_level: Option<String>,

    /// Humanized, e.g. "many seats available"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy_status: Option<String>,
}

impl VehicleRecord {
    /// The position, if it can be placed on a map
    pub fn usable_position(&self) -> Option<&PositionInfo> {
        self.position.as_ref().filter(|p| p.is_usable())
    }

    pub fn route_id(&self) -> Option<&str> {
        self.trip.as_ref().and_then(|t| t.route_id.as_deref())
    }

    /// Every known detail on one line, unknown fields left out
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} Line {}", self.kind.title(), self.line)];

        if let Some(vehicle_id) = &self.vehicle_id {
            parts.push(format!("Vehicle ID: {}", vehicle_id));
        }
        if let Some(route_id) = self.route_id() {
            parts.push(format!("Route ID: {}", route_id));
        }
        if let Some(trip_id) = self.trip.as_ref().and_then(|t| t.trip_id.as_deref()) {
            parts.push(format!("Trip ID: {}", trip_id));
        }
        if let Some(plate) = &self.license_plate {
            parts.push(format!("License Plate: {}", plate));
        }
        if let Some(status) = &self.current_status {
            parts.push(format!("Status: {}", status));
        }
        if let Some(position) = &self.position {
            if let Some(speed) = position.speed {
                parts.push(format!("Speed: {} km/h", speed));
            }
            if let Some(bearing) = position.bearing {
                parts.push(format!("Direction: {}°", bearing));
            }
        }
        if let Some(congestion) = &self.congestion_level {
            parts.push(format!("Congestion: {}", congestion));
        }
        if let Some(occupancy) = &self.occupancy_status {
            parts.push(format!("Occupancy: {}", occupancy));
        }
        if let Some(ts) = self.timestamp {
            let formatted = i64::try_from(ts)
                .ok()
                .and_then(|ts| chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0))
                .map(|dt| dt.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "invalid timestamp".to_string());
            parts.push(format!("Last Update: {}", formatted));
        }

        parts.join(" | ")
    }
}

impl std::fmt::Display for VehicleRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.usable_position() {
            Some(p) => write!(
                f,
                "{} {} on line {} at ({:.6}, {:.6})",
                self.kind.title(),
                self.id,
                self.line,
                p.latitude,
                p.longitude
            ),
            None => write!(
                f,
                "{} {} on line {} (no position)",
                self.kind.title(),
                self.id,
                self.line
            ),
        }
    }
}
