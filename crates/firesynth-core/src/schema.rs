use std::fmt;

use serde::Serialize;

use ColumnKind::{Bool, Date, Float, Int, Json, Text, Timestamp};

/// Storage class of a persisted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Bool,
    Int,
    Float,
    Date,
    Timestamp,
    /// Compact JSON document stored as text.
    Json,
}

/// Column name plus storage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec { name, kind }
}

pub const STATION_COLUMNS: [ColumnSpec; 19] = [
    col("station_code", Text),
    col("name", Text),
    col("battalion", Text),
    col("address_line_1", Text),
    col("address_line_2", Text),
    col("city", Text),
    col("region", Text),
    col("postal_code", Text),
    col("phone", Text),
    col("is_active", Bool),
    col("commissioned_on", Date),
    col("decommissioned_on", Date),
    col("response_zone_code", Text),
    col("location_lat", Float),
    col("location_lng", Float),
    col("location_wkt", Text),
    col("coverage_radius_meters", Int),
    col("created_at", Timestamp),
    col("updated_at", Timestamp),
];

pub const INCIDENT_COLUMNS: [ColumnSpec; 29] = [
    col("incident_number", Text),
    col("external_reference", Text),
    col("title", Text),
    col("narrative", Text),
    col("type_code", Text),
    col("severity_code", Text),
    col("status_code", Text),
    col("source_code", Text),
    col("weather_condition_code", Text),
    col("primary_station_code", Text),
    col("occurrence_at", Timestamp),
    col("reported_at", Timestamp),
    col("dispatch_at", Timestamp),
    col("arrival_at", Timestamp),
    col("resolved_at", Timestamp),
    col("location_lat", Float),
    col("location_lng", Float),
    col("location_wkt", Text),
    col("location_geohash", Text),
    col("address_line_1", Text),
    col("address_line_2", Text),
    col("city", Text),
    col("region", Text),
    col("postal_code", Text),
    col("casualty_count", Int),
    col("responder_injuries", Int),
    col("estimated_damage_amount", Float),
    col("is_active", Bool),
    col("metadata", Json),
];

pub const INCIDENT_UNIT_COLUMNS: [ColumnSpec; 5] = [
    col("incident_number", Text),
    col("station_code", Text),
    col("assignment_role", Text),
    col("dispatched_at", Timestamp),
    col("cleared_at", Timestamp),
];

pub const INCIDENT_ASSET_COLUMNS: [ColumnSpec; 5] = [
    col("incident_number", Text),
    col("asset_identifier", Text),
    col("asset_type", Text),
    col("status", Text),
    col("notes", Text),
];

pub const INCIDENT_NOTE_COLUMNS: [ColumnSpec; 4] = [
    col("incident_number", Text),
    col("author", Text),
    col("note", Text),
    col("created_at", Timestamp),
];

/// The five persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Stations,
    Incidents,
    IncidentUnits,
    IncidentAssets,
    IncidentNotes,
}

impl Entity {
    /// Persistence order.
    pub const ALL: [Entity; 5] = [
        Entity::Stations,
        Entity::Incidents,
        Entity::IncidentUnits,
        Entity::IncidentAssets,
        Entity::IncidentNotes,
    ];

    /// File stem and table name.
    pub fn name(&self) -> &'static str {
        match self {
            Entity::Stations => "stations",
            Entity::Incidents => "incidents",
            Entity::IncidentUnits => "incident_units",
            Entity::IncidentAssets => "incident_assets",
            Entity::IncidentNotes => "incident_notes",
        }
    }

    pub fn columns(&self) -> &'static [ColumnSpec] {
        match self {
            Entity::Stations => &STATION_COLUMNS,
            Entity::Incidents => &INCIDENT_COLUMNS,
            Entity::IncidentUnits => &INCIDENT_UNIT_COLUMNS,
            Entity::IncidentAssets => &INCIDENT_ASSET_COLUMNS,
            Entity::IncidentNotes => &INCIDENT_NOTE_COLUMNS,
        }
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns().iter().map(|column| column.name).collect()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|entity| entity.name() == name)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
