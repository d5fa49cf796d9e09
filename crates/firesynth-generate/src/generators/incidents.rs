use chrono::{DateTime, TimeDelta, Utc};
use serde_json::json;
use tracing::info;

use firesynth_core::{
    Address, EventChain, INCIDENT_SOURCES, INCIDENT_TYPES, Incident, IncidentAsset, IncidentNote,
    IncidentStatus, IncidentUnit, Severity, Station, SyntheticDataConfig, WEATHER_CONDITIONS,
};

use crate::errors::GenerationError;
use crate::faker::TextFaker;
use crate::geo::{geohash, random_geo_point};
use crate::random::RandomSource;

pub const INCIDENT_MAX_KM: f64 = 3.5;

pub const ASSIGNMENT_ROLES: [&str; 6] = [
    "Primary Engine",
    "Ladder",
    "Rescue",
    "Medic Unit",
    "Battalion Chief",
    "Water Tender",
];
pub const ASSET_TYPES: [&str; 5] = ["Engine", "Ladder", "Rescue Boat", "Drone", "Foam Trailer"];
pub const ASSET_STATUSES: [&str; 3] = ["deployed", "staged", "released"];
pub const NOTE_TOPICS: [&str; 5] = [
    "Initial size-up complete.",
    "Evacuation order issued for adjacent structure.",
    "Utilities secured prior to overhaul stage.",
    "Patient transferred to EMS for transport.",
    "HazMat monitoring indicates no off-site impact.",
];
pub const REPORT_CHANNELS: [&str; 3] = ["mobile", "call", "sensor"];
pub const CASUALTY_WEIGHTS: [(i64, f64); 4] = [(0, 0.85), (1, 0.10), (2, 0.04), (3, 0.01)];

/// Minute offsets appended along the event chain, inclusive.
const REPORT_DELAY_MIN: (i64, i64) = (0, 10);
const DISPATCH_DELAY_MIN: (i64, i64) = (0, 6);
const TRAVEL_MIN: (i64, i64) = (3, 20);
const RESOLUTION_MIN: (i64, i64) = (10, 240);
const UNIT_DISPATCH_LAG_MIN: (i64, i64) = (0, 4);
const UNIT_CLEAR_LAG_MIN: (i64, i64) = (0, 15);
const CHILD_ROWS: (i64, i64) = (1, 3);

/// Rows emitted by one pass of the incident generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentBatch {
    pub incidents: Vec<Incident>,
    pub units: Vec<IncidentUnit>,
    pub assets: Vec<IncidentAsset>,
    pub notes: Vec<IncidentNote>,
}

pub fn incident_number(occurrence_at: DateTime<Utc>, index: u32) -> String {
    format!("INC-{}-{index:06}", occurrence_at.format("%Y%m%d"))
}

pub fn asset_identifier(incident_index: u32, ordinal: i64) -> String {
    format!("AST-{incident_index:06}-{ordinal}")
}

/// Produces incidents and their child rows against a fixed station set.
pub struct IncidentGenerator<'a> {
    config: &'a SyntheticDataConfig,
    stations: &'a [Station],
    station_codes: Vec<&'a str>,
}

impl<'a> IncidentGenerator<'a> {
    pub fn new(
        config: &'a SyntheticDataConfig,
        stations: &'a [Station],
    ) -> Result<Self, GenerationError> {
        if stations.is_empty() {
            return Err(GenerationError::InvalidInput(
                "incident generation needs at least one station".to_string(),
            ));
        }
        Ok(Self {
            config,
            stations,
            station_codes: stations.iter().map(|station| station.code.as_str()).collect(),
        })
    }

    /// Generate `incident_count` incidents numbered from 1.
    pub fn generate(&self, rng: &mut RandomSource) -> Result<IncidentBatch, GenerationError> {
        let total = self.config.incident_count();
        let progress_step = (total / 10).max(1);
        let mut batch = IncidentBatch::default();

        for index in 1..=total {
            self.generate_incident(index, rng, &mut batch)?;
            if self.config.verbose() && (index % progress_step == 0 || index == total) {
                info!(
                    generated = index,
                    total,
                    units = batch.units.len(),
                    assets = batch.assets.len(),
                    notes = batch.notes.len(),
                    "incident progress"
                );
            }
        }

        Ok(batch)
    }

    fn generate_incident(
        &self,
        index: u32,
        rng: &mut RandomSource,
        batch: &mut IncidentBatch,
    ) -> Result<(), GenerationError> {
        let station = rng.choose(self.stations).ok_or_else(|| {
            GenerationError::InvalidInput("station set is empty".to_string())
        })?;
        let location = random_geo_point(station.location, INCIDENT_MAX_KM, rng);

        let mut events = self.draw_events(rng)?;

        let incident_type = rng.pick(&INCIDENT_TYPES);
        let severity = *rng.pick(&Severity::ALL);
        let status = *rng.pick(&IncidentStatus::ALL);
        let source = rng.pick(&INCIDENT_SOURCES);
        let weather = rng.pick(&WEATHER_CONDITIONS);

        truncate_events(&mut events, status);

        let number = incident_number(events.occurrence_at, index);

        let casualty_count = rng.weighted(&CASUALTY_WEIGHTS).copied().unwrap_or(0);
        let responder_injuries = if casualty_count == 0 {
            0
        } else {
            rng.int_inclusive(0, 1)
        };
        let estimated_damage_amount = match severity.damage_range() {
            Some((low, high)) => round_cents(rng.uniform_between(low, high)),
            None => 0.0,
        };

        let external_reference = format!("EXT-{}", rng.digits(5));
        let title = format!("{} near {}", incident_type.name, TextFaker::street_name(rng));
        let narrative = TextFaker::paragraph(rng);
        let line_1 = TextFaker::street_address(rng);
        let report_channel = *rng.pick(&REPORT_CHANNELS);
        let console_len = rng.int_inclusive(4, 6) as usize;
        let dispatch_console = rng.upper_token(console_len);
        let metadata = json!({
            "report_channel": report_channel,
            "triage_level": severity.code(),
            "dispatch_console": dispatch_console,
            "primary_station": station.code,
        });

        batch.incidents.push(Incident {
            incident_number: number.clone(),
            external_reference,
            title,
            narrative,
            incident_type,
            severity,
            status,
            source,
            weather,
            primary_station_code: station.code.clone(),
            events,
            location_wkt: location.wkt(),
            location_geohash: geohash(location, self.config.geohash_precision())?,
            location,
            address: Address {
                line_1,
                line_2: None,
                city: station.address.city.clone(),
                region: station.address.region.clone(),
                postal_code: station.address.postal_code.clone(),
            },
            casualty_count,
            responder_injuries,
            estimated_damage_amount,
            is_active: status.is_active(),
            metadata,
        });

        if self.config.include_units() {
            self.emit_units(&number, &events, rng, &mut batch.units)?;
        }
        if self.config.include_assets() && rng.uniform() < self.config.assets_probability() {
            emit_assets(&number, index, rng, &mut batch.assets);
        }
        if self.config.include_notes() && rng.uniform() < self.config.notes_probability() {
            emit_notes(&number, &events, rng, &mut batch.notes);
        }

        Ok(())
    }

    fn draw_events(&self, rng: &mut RandomSource) -> Result<EventChain, GenerationError> {
        let window_end = self.config.window_end();
        let window_days = i64::from(self.config.window_days());
        let window_start = TimeDelta::try_days(window_days)
            .and_then(|span| window_end.checked_sub_signed(span))
            .ok_or_else(|| out_of_range("window start"))?;

        let occurrence_at = shift(
            window_start,
            TimeDelta::seconds(rng.int_inclusive(0, window_days * 24 * 60 * 60)),
            "occurrence",
        )?;
        let reported_at = shift(occurrence_at, minutes(rng, REPORT_DELAY_MIN), "report")?;
        let dispatch_at = shift(reported_at, minutes(rng, DISPATCH_DELAY_MIN), "dispatch")?;
        let arrival_at = shift(dispatch_at, minutes(rng, TRAVEL_MIN), "arrival")?;
        let resolved_at = shift(arrival_at, minutes(rng, RESOLUTION_MIN), "resolution")?;

        Ok(EventChain {
            occurrence_at,
            reported_at,
            dispatch_at: Some(dispatch_at),
            arrival_at: Some(arrival_at),
            resolved_at: Some(resolved_at),
        })
    }

    fn emit_units(
        &self,
        number: &str,
        events: &EventChain,
        rng: &mut RandomSource,
        units: &mut Vec<IncidentUnit>,
    ) -> Result<(), GenerationError> {
        let total = rng.int_inclusive(
            i64::from(self.config.units_per_incident_min()),
            i64::from(self.config.units_per_incident_max()),
        ) as usize;
        let assigned = rng.sample(&self.station_codes, total);

        let dispatch_anchor = events.dispatch_at.unwrap_or(events.reported_at);
        let clear_anchor = events
            .resolved_at
            .or(events.arrival_at)
            .unwrap_or(events.occurrence_at);

        for station_code in assigned {
            let dispatched_at =
                shift(dispatch_anchor, minutes(rng, UNIT_DISPATCH_LAG_MIN), "unit dispatch")?;
            let cleared_at =
                shift(clear_anchor, minutes(rng, UNIT_CLEAR_LAG_MIN), "unit clearance")?;
            units.push(IncidentUnit {
                incident_number: number.to_string(),
                station_code: station_code.to_string(),
                assignment_role: *rng.pick(&ASSIGNMENT_ROLES),
                dispatched_at,
                cleared_at,
            });
        }
        Ok(())
    }
}

/// Clear the events a status has not reached yet.
pub fn truncate_events(events: &mut EventChain, status: IncidentStatus) {
    if !status.has_resolution() {
        events.resolved_at = None;
    }
    if !status.has_dispatch() {
        events.dispatch_at = None;
        events.arrival_at = None;
    }
}

fn emit_assets(number: &str, index: u32, rng: &mut RandomSource, assets: &mut Vec<IncidentAsset>) {
    let count = rng.int_inclusive(CHILD_ROWS.0, CHILD_ROWS.1);
    for ordinal in 1..=count {
        assets.push(IncidentAsset {
            incident_number: number.to_string(),
            asset_identifier: asset_identifier(index, ordinal),
            asset_type: *rng.pick(&ASSET_TYPES),
            status: *rng.pick(&ASSET_STATUSES),
            notes: TextFaker::sentence(rng),
        });
    }
}

fn emit_notes(
    number: &str,
    events: &EventChain,
    rng: &mut RandomSource,
    notes: &mut Vec<IncidentNote>,
) {
    let created_at = events.arrival_at.unwrap_or(events.reported_at);
    let count = rng.int_inclusive(CHILD_ROWS.0, CHILD_ROWS.1);
    for _ in 0..count {
        notes.push(IncidentNote {
            incident_number: number.to_string(),
            author: TextFaker::person_name(rng),
            note: *rng.pick(&NOTE_TOPICS),
            created_at,
        });
    }
}

fn shift(
    at: DateTime<Utc>,
    offset: TimeDelta,
    event: &str,
) -> Result<DateTime<Utc>, GenerationError> {
    at.checked_add_signed(offset).ok_or_else(|| out_of_range(event))
}

fn out_of_range(event: &str) -> GenerationError {
    GenerationError::InvalidInput(format!(
        "{event} time falls outside the supported calendar range"
    ))
}

fn minutes(rng: &mut RandomSource, (low, high): (i64, i64)) -> TimeDelta {
    TimeDelta::minutes(rng.int_inclusive(low, high))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use firesynth_core::ConfigBuilder;

    use super::*;
    use crate::generators::stations::generate_stations;

    fn config(incidents: u32) -> SyntheticDataConfig {
        let mut builder = ConfigBuilder::new("unused");
        builder.incident_count = incidents;
        builder.station_count = 5;
        builder.rng_seed = Some(42);
        builder.window_end = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        builder.verbose = false;
        builder.build().expect("valid config")
    }

    fn run(config: &SyntheticDataConfig) -> (Vec<Station>, IncidentBatch) {
        let mut rng = RandomSource::new(config.rng_seed());
        let stations = generate_stations(config.station_count(), config.window_end(), &mut rng);
        let batch = IncidentGenerator::new(config, &stations)
            .expect("stations present")
            .generate(&mut rng)
            .expect("generate");
        (stations, batch)
    }

    #[test]
    fn empty_station_set_is_rejected() {
        let config = config(1);
        assert!(matches!(
            IncidentGenerator::new(&config, &[]),
            Err(GenerationError::InvalidInput(_))
        ));
    }

    #[test]
    fn incident_numbers_follow_occurrence_and_index() {
        let config = config(30);
        let (_, batch) = run(&config);
        assert_eq!(batch.incidents.len(), 30);
        for (offset, incident) in batch.incidents.iter().enumerate() {
            let expected = incident_number(incident.events.occurrence_at, offset as u32 + 1);
            assert_eq!(incident.incident_number, expected);
            assert!(incident.incident_number.ends_with(&format!("{:06}", offset + 1)));
        }
    }

    #[test]
    fn occurrences_fall_inside_window() {
        let config = config(200);
        let (_, batch) = run(&config);
        let end = config.window_end();
        let start = end - TimeDelta::days(i64::from(config.window_days()));
        for incident in &batch.incidents {
            assert!(incident.events.occurrence_at >= start);
            assert!(incident.events.occurrence_at <= end);
        }
    }

    #[test]
    fn long_window_reaching_early_calendar_stays_in_range() {
        let mut builder = config(1).to_builder();
        builder.incident_count = 50;
        builder.window_days = 365 * 2000;
        let config = builder.build().expect("window inside calendar range");
        let (_, batch) = run(&config);
        assert_eq!(batch.incidents.len(), 50);
        for incident in &batch.incidents {
            assert!(incident.events.occurrence_at <= config.window_end());
        }
    }

    #[test]
    fn truncation_follows_status() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let full = EventChain {
            occurrence_at: base,
            reported_at: base,
            dispatch_at: Some(base),
            arrival_at: Some(base),
            resolved_at: Some(base),
        };

        let mut reported = full;
        truncate_events(&mut reported, IncidentStatus::Reported);
        assert_eq!(
            (reported.dispatch_at, reported.arrival_at, reported.resolved_at),
            (None, None, None)
        );

        for status in [IncidentStatus::Dispatched, IncidentStatus::OnScene] {
            let mut open = full;
            truncate_events(&mut open, status);
            assert!(open.arrival_at.is_some());
            assert!(open.resolved_at.is_none());
        }

        for status in [IncidentStatus::Resolved, IncidentStatus::Cancelled] {
            let mut closed = full;
            truncate_events(&mut closed, status);
            assert_eq!(closed, full);
        }
    }

    #[test]
    fn metadata_names_the_primary_station() {
        let config = config(10);
        let (_, batch) = run(&config);
        for incident in &batch.incidents {
            assert_eq!(
                incident.metadata["primary_station"],
                incident.primary_station_code.as_str()
            );
            assert_eq!(incident.metadata["triage_level"], incident.severity.code());
            let console = incident.metadata["dispatch_console"]
                .as_str()
                .expect("console string");
            assert!((4..=6).contains(&console.len()));
            assert!(console.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn address_locality_comes_from_station() {
        let config = config(20);
        let (stations, batch) = run(&config);
        for incident in &batch.incidents {
            let station = stations
                .iter()
                .find(|s| s.code == incident.primary_station_code)
                .expect("primary station exists");
            assert_eq!(incident.address.city, station.address.city);
            assert_eq!(incident.address.postal_code, station.address.postal_code);
            assert_eq!(incident.location_geohash.len(), 8);
        }
    }

    #[test]
    fn casualties_drive_injuries() {
        let config = config(400);
        let (_, batch) = run(&config);
        for incident in &batch.incidents {
            assert!((0..=3).contains(&incident.casualty_count));
            if incident.casualty_count == 0 {
                assert_eq!(incident.responder_injuries, 0);
            } else {
                assert!((0..=1).contains(&incident.responder_injuries));
            }
        }
    }

    #[test]
    fn asset_identifiers_carry_incident_index() {
        assert_eq!(asset_identifier(12, 2), "AST-000012-2");
        assert_eq!(round_cents(1234.5678), 1234.57);
    }
}
