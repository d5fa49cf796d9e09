//! Closed catalogs for the categorical incident fields.
//!
//! Catalog order is part of the reproducibility contract: generators draw an
//! index into these arrays, so reordering entries changes seeded output.

use serde::Serialize;

/// One coded value of a lookup catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LookupItem {
    pub code: &'static str,
    pub name: &'static str,
    pub description: Option<&'static str>,
    /// Severity ranking, 1 = lowest.
    pub priority: Option<u8>,
    pub color_hex: Option<&'static str>,
}

impl LookupItem {
    const fn described(code: &'static str, name: &'static str, description: &'static str) -> Self {
        Self {
            code,
            name,
            description: Some(description),
            priority: None,
            color_hex: None,
        }
    }

    const fn ranked(code: &'static str, name: &'static str, priority: u8, color: &'static str) -> Self {
        Self {
            code,
            name,
            description: None,
            priority: Some(priority),
            color_hex: Some(color),
        }
    }
}

pub static INCIDENT_TYPES: [LookupItem; 5] = [
    LookupItem::described(
        "FIRE_STRUCTURE",
        "Structure Fire",
        "Residential or commercial structure-related fire incident.",
    ),
    LookupItem::described(
        "FIRE_WILDLAND",
        "Wildland Fire",
        "Brush, forest, or grassland fire events.",
    ),
    LookupItem::described(
        "MEDICAL",
        "Medical Response",
        "Medical emergencies requiring EMS response.",
    ),
    LookupItem::described(
        "RESCUE",
        "Rescue",
        "Technical rescues including vehicle extrication, rope, or water.",
    ),
    LookupItem::described(
        "HAZMAT",
        "Hazardous Materials",
        "HazMat spill or release incidents.",
    ),
];

pub static INCIDENT_SEVERITIES: [LookupItem; 5] = [
    LookupItem::ranked("LOW", "Low", 1, "#2E7D32"),
    LookupItem::ranked("MODERATE", "Moderate", 2, "#1976D2"),
    LookupItem::ranked("HIGH", "High", 3, "#FBC02D"),
    LookupItem::ranked("CRITICAL", "Critical", 4, "#F57C00"),
    LookupItem::ranked("SEVERE", "Severe", 5, "#C62828"),
];

pub static INCIDENT_STATUSES: [LookupItem; 5] = [
    LookupItem::described(
        "REPORTED",
        "Reported",
        "Incident has been reported and awaiting dispatch.",
    ),
    LookupItem::described("DISPATCHED", "Dispatched", "Units dispatched to incident."),
    LookupItem::described(
        "ON_SCENE",
        "On Scene",
        "Units arrived on-scene and response underway.",
    ),
    LookupItem::described("RESOLVED", "Resolved", "Incident mitigated and closed."),
    LookupItem::described(
        "CANCELLED",
        "Cancelled",
        "Incident cancelled prior to response completion.",
    ),
];

pub static INCIDENT_SOURCES: [LookupItem; 3] = [
    LookupItem::described("911", "Emergency Call", "Public safety dispatch center request."),
    LookupItem::described(
        "FIELD_REPORT",
        "Field Report",
        "Responder reported incident while on patrol.",
    ),
    LookupItem::described("SENSOR", "Sensor Alert", "IoT or alarm system triggered alert."),
];

pub static WEATHER_CONDITIONS: [LookupItem; 5] = [
    LookupItem::described("CLEAR", "Clear", "Minimal weather impact."),
    LookupItem::described("RAIN", "Rain", "Rainfall present at incident location."),
    LookupItem::described("SNOW", "Snow", "Snow or ice conditions present."),
    LookupItem::described("WIND", "High Wind", "Elevated sustained winds or gusts."),
    LookupItem::described("HEAT", "Extreme Heat", "High temperature advisory or warning."),
];

/// Typed view over [`INCIDENT_SEVERITIES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
    Severe,
}

impl Severity {
    /// Same order as [`INCIDENT_SEVERITIES`].
    pub const ALL: [Severity; 5] = [
        Severity::Low,
        Severity::Moderate,
        Severity::High,
        Severity::Critical,
        Severity::Severe,
    ];

    pub fn lookup(self) -> &'static LookupItem {
        &INCIDENT_SEVERITIES[self as usize]
    }

    pub fn code(self) -> &'static str {
        self.lookup().code
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|severity| severity.code() == code)
    }

    /// Inclusive bounds of the estimated damage draw; `None` means no damage.
    pub fn damage_range(self) -> Option<(f64, f64)> {
        match self {
            Severity::Low => None,
            Severity::Moderate => Some((1_000.0, 50_000.0)),
            Severity::High | Severity::Critical | Severity::Severe => Some((5_000.0, 500_000.0)),
        }
    }
}

/// Typed view over [`INCIDENT_STATUSES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentStatus {
    Reported,
    Dispatched,
    OnScene,
    Resolved,
    Cancelled,
}

impl IncidentStatus {
    /// Same order as [`INCIDENT_STATUSES`].
    pub const ALL: [IncidentStatus; 5] = [
        IncidentStatus::Reported,
        IncidentStatus::Dispatched,
        IncidentStatus::OnScene,
        IncidentStatus::Resolved,
        IncidentStatus::Cancelled,
    ];

    pub fn lookup(self) -> &'static LookupItem {
        &INCIDENT_STATUSES[self as usize]
    }

    pub fn code(self) -> &'static str {
        self.lookup().code
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }

    /// Incident is still open.
    pub fn is_active(self) -> bool {
        !matches!(self, IncidentStatus::Resolved | IncidentStatus::Cancelled)
    }

    /// Units have been sent, so dispatch and arrival times exist.
    pub fn has_dispatch(self) -> bool {
        !matches!(self, IncidentStatus::Reported)
    }

    /// A resolution time exists.
    pub fn has_resolution(self) -> bool {
        matches!(self, IncidentStatus::Resolved | IncidentStatus::Cancelled)
    }
}
