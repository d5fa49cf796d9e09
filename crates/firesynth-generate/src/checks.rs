//! Post-generation integrity checks over an in-memory dataset.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Datelike;
use serde::Serialize;

use firesynth_core::{GeneratedDataset, Incident, SyntheticDataConfig};

use crate::generators::stations::{LAST_DECOMMISSION_YEAR, MIN_SERVICE_YEARS, station_code};

/// Structured violation record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub code: String,
    pub path: String,
    pub message: String,
}

/// Outcome of [`check_dataset`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntegrityReport {
    /// Rows inspected per entity name.
    pub checked: BTreeMap<String, u64>,
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations_by_code(&self) -> BTreeMap<&str, u64> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.code.as_str()).or_insert(0) += 1;
        }
        counts
    }

    fn push(&mut self, code: &str, path: String, message: String) {
        self.violations.push(Violation {
            code: code.to_string(),
            path,
            message,
        });
    }
}

/// Verify the relational and temporal rules every generated dataset obeys.
pub fn check_dataset(dataset: &GeneratedDataset, config: &SyntheticDataConfig) -> IntegrityReport {
    let mut report = IntegrityReport::default();
    report
        .checked
        .insert("stations".to_string(), dataset.stations.len() as u64);
    report
        .checked
        .insert("incidents".to_string(), dataset.incidents.len() as u64);
    report
        .checked
        .insert("incident_units".to_string(), dataset.incident_units.len() as u64);
    report
        .checked
        .insert("incident_assets".to_string(), dataset.incident_assets.len() as u64);
    report
        .checked
        .insert("incident_notes".to_string(), dataset.incident_notes.len() as u64);

    check_stations(dataset, &mut report);
    let incidents = check_incidents(dataset, config, &mut report);
    check_units(dataset, config, &incidents, &mut report);
    check_assets(dataset, &incidents, &mut report);
    check_notes(dataset, &incidents, &mut report);
    report
}

fn check_stations(dataset: &GeneratedDataset, report: &mut IntegrityReport) {
    for (offset, station) in dataset.stations.iter().enumerate() {
        let path = format!("stations[{offset}]");
        let expected = station_code(offset as u32 + 1);
        if station.code != expected {
            report.push(
                "station_code",
                path.clone(),
                format!("expected '{expected}', found '{}'", station.code),
            );
        }
        if station.is_active != station.decommissioned_on.is_none() {
            report.push(
                "station_active_flag",
                path.clone(),
                "is_active must equal the absence of a decommission date".to_string(),
            );
        }
        if let Some(decommissioned) = station.decommissioned_on {
            let earliest = station
                .commissioned_on
                .with_year(station.commissioned_on.year() + MIN_SERVICE_YEARS);
            if earliest.is_some_and(|earliest| decommissioned < earliest)
                || decommissioned.year() > LAST_DECOMMISSION_YEAR
            {
                report.push(
                    "station_decommission",
                    path,
                    format!(
                        "decommissioned {decommissioned} outside service term starting {}",
                        station.commissioned_on
                    ),
                );
            }
        }
    }
}

fn check_incidents<'a>(
    dataset: &'a GeneratedDataset,
    config: &SyntheticDataConfig,
    report: &mut IntegrityReport,
) -> HashMap<&'a str, &'a Incident> {
    let stations: HashSet<&str> = dataset.stations.iter().map(|s| s.code.as_str()).collect();
    let mut incidents = HashMap::new();

    for (offset, incident) in dataset.incidents.iter().enumerate() {
        let path = format!("incidents[{offset}]");
        if incidents
            .insert(incident.incident_number.as_str(), incident)
            .is_some()
        {
            report.push(
                "duplicate_key",
                path.clone(),
                format!("incident number '{}' repeated", incident.incident_number),
            );
        }
        if !stations.contains(incident.primary_station_code.as_str()) {
            report.push(
                "foreign_key",
                format!("{path}.primary_station_code"),
                format!("unknown station '{}'", incident.primary_station_code),
            );
        }

        let events = incident.events.present();
        if events.windows(2).any(|pair| pair[0] > pair[1]) {
            report.push(
                "event_order",
                format!("{path}.events"),
                "event timestamps are not in causal order".to_string(),
            );
        }
        let status = incident.status;
        let chain = &incident.events;
        let truncated = chain.dispatch_at.is_some() == status.has_dispatch()
            && chain.arrival_at.is_some() == status.has_dispatch()
            && chain.resolved_at.is_some() == status.has_resolution();
        if !truncated {
            report.push(
                "event_truncation",
                format!("{path}.events"),
                format!("events present do not match status {}", status.code()),
            );
        }
        if incident.is_active != status.is_active() {
            report.push(
                "incident_active_flag",
                path.clone(),
                format!("is_active disagrees with status {}", status.code()),
            );
        }

        let damage = incident.estimated_damage_amount;
        let damage_ok = match incident.severity.damage_range() {
            Some((low, high)) => damage >= low && damage <= high,
            None => damage == 0.0,
        };
        if !damage_ok {
            report.push(
                "damage_range",
                format!("{path}.estimated_damage_amount"),
                format!("{damage} invalid for severity {}", incident.severity.code()),
            );
        }
        if incident.casualty_count == 0 && incident.responder_injuries != 0 {
            report.push(
                "responder_injuries",
                path.clone(),
                "responder injuries without casualties".to_string(),
            );
        }
        if incident.location_geohash.len() != usize::from(config.geohash_precision()) {
            report.push(
                "geohash_precision",
                format!("{path}.location_geohash"),
                format!(
                    "expected {} characters, found {}",
                    config.geohash_precision(),
                    incident.location_geohash.len()
                ),
            );
        }
    }
    incidents
}

fn check_units(
    dataset: &GeneratedDataset,
    config: &SyntheticDataConfig,
    incidents: &HashMap<&str, &Incident>,
    report: &mut IntegrityReport,
) {
    let stations: HashSet<&str> = dataset.stations.iter().map(|s| s.code.as_str()).collect();
    let mut per_incident: HashMap<&str, HashSet<&str>> = HashMap::new();

    for (offset, unit) in dataset.incident_units.iter().enumerate() {
        let path = format!("incident_units[{offset}]");
        match incidents.get(unit.incident_number.as_str()) {
            Some(incident) if unit.dispatched_at < incident.events.reported_at => {
                report.push(
                    "event_order",
                    format!("{path}.dispatched_at"),
                    "unit dispatched before the incident was reported".to_string(),
                );
            }
            Some(_) => {}
            None => report.push(
                "foreign_key",
                format!("{path}.incident_number"),
                format!("unknown incident '{}'", unit.incident_number),
            ),
        }
        if !stations.contains(unit.station_code.as_str()) {
            report.push(
                "foreign_key",
                format!("{path}.station_code"),
                format!("unknown station '{}'", unit.station_code),
            );
        }
        let assigned = per_incident.entry(unit.incident_number.as_str()).or_default();
        if !assigned.insert(unit.station_code.as_str()) {
            report.push(
                "duplicate_key",
                path,
                format!(
                    "station '{}' assigned twice to '{}'",
                    unit.station_code, unit.incident_number
                ),
            );
        }
    }

    if !config.include_units() {
        return;
    }
    let max = config.units_per_incident_max() as usize;
    let min = (config.units_per_incident_min() as usize).min(dataset.stations.len());
    for incident in &dataset.incidents {
        let count = per_incident
            .get(incident.incident_number.as_str())
            .map_or(0, HashSet::len);
        if count < min || count > max {
            report.push(
                "units_per_incident",
                format!("incidents.{}", incident.incident_number),
                format!("{count} units outside [{min}, {max}]"),
            );
        }
    }
}

fn check_assets(
    dataset: &GeneratedDataset,
    incidents: &HashMap<&str, &Incident>,
    report: &mut IntegrityReport,
) {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for (offset, asset) in dataset.incident_assets.iter().enumerate() {
        let path = format!("incident_assets[{offset}]");
        if !incidents.contains_key(asset.incident_number.as_str()) {
            report.push(
                "foreign_key",
                format!("{path}.incident_number"),
                format!("unknown incident '{}'", asset.incident_number),
            );
        }
        if !seen.insert((
            asset.incident_number.as_str(),
            asset.asset_identifier.as_str(),
        )) {
            report.push(
                "duplicate_key",
                path,
                format!("asset '{}' repeated", asset.asset_identifier),
            );
        }
    }
}

fn check_notes(
    dataset: &GeneratedDataset,
    incidents: &HashMap<&str, &Incident>,
    report: &mut IntegrityReport,
) {
    for (offset, note) in dataset.incident_notes.iter().enumerate() {
        let path = format!("incident_notes[{offset}]");
        let Some(incident) = incidents.get(note.incident_number.as_str()) else {
            report.push(
                "foreign_key",
                format!("{path}.incident_number"),
                format!("unknown incident '{}'", note.incident_number),
            );
            continue;
        };
        let anchor = incident.events.arrival_at.unwrap_or(incident.events.reported_at);
        if note.created_at != anchor {
            report.push(
                "note_anchor",
                format!("{path}.created_at"),
                "note is not stamped at arrival (or report) time".to_string(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use firesynth_core::{ConfigBuilder, Severity};

    use super::*;
    use crate::engine::generate_dataset;

    fn config() -> SyntheticDataConfig {
        let mut builder = ConfigBuilder::new("unused");
        builder.incident_count = 150;
        builder.station_count = 6;
        builder.rng_seed = Some(5);
        builder.window_end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        builder.verbose = false;
        builder.build().expect("valid config")
    }

    #[test]
    fn generated_dataset_passes() {
        let config = config();
        let dataset = generate_dataset(&config).expect("generate");
        let report = check_dataset(&dataset, &config);
        assert!(report.is_ok(), "{:?}", report.violations);
        assert_eq!(report.checked.get("incidents"), Some(&150));
    }

    #[test]
    fn corrupted_rows_are_reported() {
        let config = config();
        let mut dataset = generate_dataset(&config).expect("generate");
        dataset.incidents[0].primary_station_code = "STA-999".to_string();
        dataset.incidents[1].severity = Severity::Low;
        dataset.incidents[1].estimated_damage_amount = 10.0;
        dataset.stations[0].is_active = !dataset.stations[0].is_active;

        let report = check_dataset(&dataset, &config);
        let codes = report.violations_by_code();
        assert_eq!(codes.get("foreign_key"), Some(&1));
        assert!(codes.get("damage_range").is_some());
        assert_eq!(codes.get("station_active_flag"), Some(&1));
        assert!(!report.is_ok());
    }
}
