use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::lookups::{IncidentStatus, LookupItem, Severity};

/// WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Well-known text, longitude first.
    pub fn wkt(&self) -> String {
        format!("POINT({:.6} {:.6})", self.lng, self.lat)
    }
}

/// Postal address shared by stations and incidents.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub line_1: String,
    pub line_2: Option<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// `STA-NNN`, numbered from 1.
    pub code: String,
    pub name: String,
    pub battalion: String,
    pub address: Address,
    pub phone: String,
    pub is_active: bool,
    pub commissioned_on: NaiveDate,
    pub decommissioned_on: Option<NaiveDate>,
    pub response_zone_code: Option<String>,
    pub location: GeoPoint,
    pub location_wkt: String,
    pub coverage_radius_meters: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle timestamps of one incident.
///
/// Present values are non-decreasing in field order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventChain {
    pub occurrence_at: DateTime<Utc>,
    pub reported_at: DateTime<Utc>,
    pub dispatch_at: Option<DateTime<Utc>>,
    pub arrival_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl EventChain {
    /// Present timestamps in causal order.
    pub fn present(&self) -> Vec<DateTime<Utc>> {
        let mut events = vec![self.occurrence_at, self.reported_at];
        events.extend(self.dispatch_at);
        events.extend(self.arrival_at);
        events.extend(self.resolved_at);
        events
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    /// `INC-YYYYMMDD-NNNNNN`.
    pub incident_number: String,
    pub external_reference: String,
    pub title: String,
    pub narrative: String,
    pub incident_type: &'static LookupItem,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub source: &'static LookupItem,
    pub weather: &'static LookupItem,
    pub primary_station_code: String,
    pub events: EventChain,
    pub location: GeoPoint,
    pub location_wkt: String,
    pub location_geohash: String,
    pub address: Address,
    pub casualty_count: i64,
    pub responder_injuries: i64,
    pub estimated_damage_amount: f64,
    pub is_active: bool,
    pub metadata: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentUnit {
    pub incident_number: String,
    pub station_code: String,
    pub assignment_role: &'static str,
    pub dispatched_at: DateTime<Utc>,
    pub cleared_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentAsset {
    pub incident_number: String,
    pub asset_identifier: String,
    pub asset_type: &'static str,
    pub status: &'static str,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentNote {
    pub incident_number: String,
    pub author: String,
    pub note: &'static str,
    pub created_at: DateTime<Utc>,
}

/// Everything produced by one generation pass, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedDataset {
    pub stations: Vec<Station>,
    pub incidents: Vec<Incident>,
    pub incident_units: Vec<IncidentUnit>,
    pub incident_assets: Vec<IncidentAsset>,
    pub incident_notes: Vec<IncidentNote>,
}

impl GeneratedDataset {
    pub fn station(&self, code: &str) -> Option<&Station> {
        self.stations.iter().find(|station| station.code == code)
    }
}
