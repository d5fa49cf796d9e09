//! Core contracts for firesynth.
//!
//! This crate defines the validated generation configuration, the static
//! lookup catalogs, the typed entity records, and the fixed column schema
//! that every persisted collection follows.

pub mod config;
pub mod error;
pub mod lookups;
pub mod model;
pub mod schema;

pub use config::{ConfigBuilder, OutputFormat, SyntheticDataConfig};
pub use error::{ConfigError, Result};
pub use lookups::{
    INCIDENT_SEVERITIES, INCIDENT_SOURCES, INCIDENT_STATUSES, INCIDENT_TYPES, IncidentStatus,
    LookupItem, Severity, WEATHER_CONDITIONS,
};
pub use model::{
    Address, EventChain, GeneratedDataset, GeoPoint, Incident, IncidentAsset, IncidentNote,
    IncidentUnit, Station,
};
pub use schema::{ColumnKind, ColumnSpec, Entity};
