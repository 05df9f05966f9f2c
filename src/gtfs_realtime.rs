//! The `transit_realtime` messages needed to read vehicle positions.
//!
//! This is the subset of `gtfs-realtime.proto` that the vehicle feed uses,
//! written in the shape `prost-build` emits so it decodes the same wire
//! format without a protoc step. Fields this crate never reads (trip updates,
//! alerts, shapes) are left out; prost skips their tags while decoding.
//!
//! Cardinality follows the proto2 source: `required` fields are plain values,
//! `optional` fields are `Option`s so that absence survives decoding. The
//! position coordinates are the exception, see [`Position`].

/// The contents of a feed message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FeedMessage {
    /// Metadata about this feed and feed message.
    #[prost(message, required, tag = "1")]
    pub header: FeedHeader,
    /// Contents of the feed.
    #[prost(message, repeated, tag = "2")]
    pub entity: ::prost::alloc::vec::Vec<FeedEntity>,
}

/// Metadata about a feed, included in feed messages.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FeedHeader {
    /// Version of the feed specification, "2.0" or "1.0".
    #[prost(string, required, tag = "1")]
    pub gtfs_realtime_version: ::prost::alloc::string::String,
    #[prost(enumeration = "feed_header::Incrementality", optional, tag = "2")]
    pub incrementality: ::core::option::Option<i32>,
    /// Moment the feed content was created, in POSIX seconds.
    #[prost(uint64, optional, tag = "3")]
    pub timestamp: ::core::option::Option<u64>,
}

/// Nested message and enum types in `FeedHeader`.
pub mod feed_header {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Incrementality {
        FullDataset = 0,
        Differential = 1,
    }

    impl Incrementality {
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Self::FullDataset => "FULL_DATASET",
                Self::Differential => "DIFFERENTIAL",
            }
        }
    }
}

/// A definition (or update) of an entity in the transit feed.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FeedEntity {
    /// Unique within a FeedMessage, used for incrementality.
    #[prost(string, required, tag = "1")]
    pub id: ::prost::alloc::string::String,
    /// Whether this entity is to be deleted. Only relevant for incremental fetches.
    #[prost(bool, optional, tag = "2")]
    pub is_deleted: ::core::option::Option<bool>,
    #[prost(message, optional, tag = "4")]
    pub vehicle: ::core::option::Option<VehiclePosition>,
}

/// Realtime positioning information for a given vehicle.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VehiclePosition {
    /// The trip this vehicle is serving.
    #[prost(message, optional, tag = "1")]
    pub trip: ::core::option::Option<TripDescriptor>,
    /// Additional information on the vehicle serving this trip.
    #[prost(message, optional, tag = "8")]
    pub vehicle: ::core::option::Option<VehicleDescriptor>,
    /// Current position of this vehicle.
    #[prost(message, optional, tag = "2")]
    pub position: ::core::option::Option<Position>,
    #[prost(uint32, optional, tag = "3")]
    pub current_stop_sequence: ::core::option::Option<u32>,
    #[prost(string, optional, tag = "7")]
    pub stop_id: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(enumeration = "vehicle_position::VehicleStopStatus", optional, tag = "4")]
    pub current_status: ::core::option::Option<i32>,
    /// Moment the vehicle's position was measured, in POSIX seconds.
    #[prost(uint64, optional, tag = "5")]
    pub timestamp: ::core::option::Option<u64>,
    #[prost(enumeration = "vehicle_position::CongestionLevel", optional, tag = "6")]
    pub congestion_level: ::core::option::Option<i32>,
    #[prost(enumeration = "vehicle_position::OccupancyStatus", optional, tag = "9")]
    pub occupancy_status: ::core::option::Option<i32>,
    #[prost(uint32, optional, tag = "10")]
    pub occupancy_percentage: ::core::option::Option<u32>,
}

/// Nested message and enum types in `VehiclePosition`.
pub mod vehicle_position {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum VehicleStopStatus {
        /// The vehicle is just about to arrive at the stop.
        IncomingAt = 0,
        /// The vehicle is standing at the stop.
        StoppedAt = 1,
        /// The vehicle has departed and is in transit to the next stop.
        InTransitTo = 2,
    }

    impl VehicleStopStatus {
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Self::IncomingAt => "INCOMING_AT",
                Self::StoppedAt => "STOPPED_AT",
                Self::InTransitTo => "IN_TRANSIT_TO",
            }
        }
    }

    /// Congestion level that is affecting this vehicle.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum CongestionLevel {
        UnknownCongestionLevel = 0,
        RunningSmoothly = 1,
        StopAndGo = 2,
        Congestion = 3,
        SevereCongestion = 4,
    }

    impl CongestionLevel {
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Self::UnknownCongestionLevel => "UNKNOWN_CONGESTION_LEVEL",
                Self::RunningSmoothly => "RUNNING_SMOOTHLY",
                Self::StopAndGo => "STOP_AND_GO",
                Self::Congestion => "CONGESTION",
                Self::SevereCongestion => "SEVERE_CONGESTION",
            }
        }
    }

    /// The degree of passenger occupancy of the vehicle.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum OccupancyStatus {
        Empty = 0,
        ManySeatsAvailable = 1,
        FewSeatsAvailable = 2,
        StandingRoomOnly = 3,
        CrushedStandingRoomOnly = 4,
        Full = 5,
        NotAcceptingPassengers = 6,
        NoDataAvailable = 7,
        NotBoardable = 8,
    }

    impl OccupancyStatus {
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Self::Empty => "EMPTY",
                Self::ManySeatsAvailable => "MANY_SEATS_AVAILABLE",
                Self::FewSeatsAvailable => "FEW_SEATS_AVAILABLE",
                Self::StandingRoomOnly => "STANDING_ROOM_ONLY",
                Self::CrushedStandingRoomOnly => "CRUSHED_STANDING_ROOM_ONLY",
                Self::Full => "FULL",
                Self::NotAcceptingPassengers => "NOT_ACCEPTING_PASSENGERS",
                Self::NoDataAvailable => "NO_DATA_AVAILABLE",
                Self::NotBoardable => "NOT_BOARDABLE",
            }
        }
    }
}

/// A descriptor that identifies an instance of a GTFS trip.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TripDescriptor {
    #[prost(string, optional, tag = "1")]
    pub trip_id: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "5")]
    pub route_id: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(uint32, optional, tag = "6")]
    pub direction_id: ::core::option::Option<u32>,
    #[prost(string, optional, tag = "2")]
    pub start_time: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "3")]
    pub start_date: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(enumeration = "trip_descriptor::ScheduleRelationship", optional, tag = "4")]
    pub schedule_relationship: ::core::option::Option<i32>,
}

/// Nested message and enum types in `TripDescriptor`.
pub mod trip_descriptor {
    /// The relation between this trip and the static schedule.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum ScheduleRelationship {
        Scheduled = 0,
        Added = 1,
        Unscheduled = 2,
        Canceled = 3,
        Replacement = 5,
        Duplicated = 6,
        Deleted = 7,
    }

    impl ScheduleRelationship {
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Self::Scheduled => "SCHEDULED",
                Self::Added => "ADDED",
                Self::Unscheduled => "UNSCHEDULED",
                Self::Canceled => "CANCELED",
                Self::Replacement => "REPLACEMENT",
                Self::Duplicated => "DUPLICATED",
                Self::Deleted => "DELETED",
            }
        }
    }
}

/// Identification information for the vehicle performing the trip.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VehicleDescriptor {
    /// Internal system identification of the vehicle.
    #[prost(string, optional, tag = "1")]
    pub id: ::core::option::Option<::prost::alloc::string::String>,
    /// User visible label, e.g. something that must be shown to passengers.
    #[prost(string, optional, tag = "2")]
    pub label: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "3")]
    pub license_plate: ::core::option::Option<::prost::alloc::string::String>,
}

/// A position.
///
/// `latitude` and `longitude` are `required` in the proto but prost does not
/// check that on decode, so they are kept as `Option` here and the decoder
/// rejects a position that lacks either.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Position {
    /// Degrees North, in the WGS-84 coordinate system.
    #[prost(float, optional, tag = "1")]
    pub latitude: ::core::option::Option<f32>,
    /// Degrees East, in the WGS-84 coordinate system.
    #[prost(float, optional, tag = "2")]
    pub longitude: ::core::option::Option<f32>,
    /// Bearing in degrees, clockwise from True North.
    #[prost(float, optional, tag = "3")]
    pub bearing: ::core::option::Option<f32>,
    /// Odometer value, in meters.
    #[prost(double, optional, tag = "4")]
    pub odometer: ::core::option::Option<f64>,
    /// Momentary speed measured by the vehicle, in meters per second.
    #[prost(float, optional, tag = "5")]
    pub speed: ::core::option::Option<f32>,
}
