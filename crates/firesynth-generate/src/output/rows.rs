use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use firesynth_core::{Entity, Incident, IncidentAsset, IncidentNote, IncidentUnit, Station};

/// One persisted cell, tagged with its storage class.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn to_csv(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Int(value) => value.to_string(),
            CellValue::Float(value) => value.to_string(),
            CellValue::Text(value) => value.clone(),
            CellValue::Date(value) => value.format("%Y-%m-%d").to_string(),
            CellValue::Timestamp(value) => format_timestamp(*value),
            CellValue::Json(value) => value.to_string(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(value) => Some(*value as f64),
            CellValue::Float(value) => Some(*value),
            _ => None,
        }
    }
}

/// RFC 3339 with whole seconds and an explicit `+00:00` offset.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn opt_text(value: Option<&str>) -> CellValue {
    value.map(text).unwrap_or(CellValue::Null)
}

fn opt_timestamp(value: Option<DateTime<Utc>>) -> CellValue {
    value.map(CellValue::Timestamp).unwrap_or(CellValue::Null)
}

/// Typed record flattened into cells in column-contract order.
pub trait ToRow {
    const ENTITY: Entity;

    fn to_row(&self) -> Vec<CellValue>;
}

impl ToRow for Station {
    const ENTITY: Entity = Entity::Stations;

    fn to_row(&self) -> Vec<CellValue> {
        vec![
            text(&self.code),
            text(&self.name),
            text(&self.battalion),
            text(&self.address.line_1),
            opt_text(self.address.line_2.as_deref()),
            text(&self.address.city),
            text(&self.address.region),
            text(&self.address.postal_code),
            text(&self.phone),
            CellValue::Bool(self.is_active),
            CellValue::Date(self.commissioned_on),
            self.decommissioned_on
                .map(CellValue::Date)
                .unwrap_or(CellValue::Null),
            opt_text(self.response_zone_code.as_deref()),
            CellValue::Float(self.location.lat),
            CellValue::Float(self.location.lng),
            text(&self.location_wkt),
            CellValue::Int(self.coverage_radius_meters),
            CellValue::Timestamp(self.created_at),
            CellValue::Timestamp(self.updated_at),
        ]
    }
}

impl ToRow for Incident {
    const ENTITY: Entity = Entity::Incidents;

    fn to_row(&self) -> Vec<CellValue> {
        vec![
            text(&self.incident_number),
            text(&self.external_reference),
            text(&self.title),
            text(&self.narrative),
            text(self.incident_type.code),
            text(self.severity.code()),
            text(self.status.code()),
            text(self.source.code),
            text(self.weather.code),
            text(&self.primary_station_code),
            CellValue::Timestamp(self.events.occurrence_at),
            CellValue::Timestamp(self.events.reported_at),
            opt_timestamp(self.events.dispatch_at),
            opt_timestamp(self.events.arrival_at),
            opt_timestamp(self.events.resolved_at),
            CellValue::Float(self.location.lat),
            CellValue::Float(self.location.lng),
            text(&self.location_wkt),
            text(&self.location_geohash),
            text(&self.address.line_1),
            opt_text(self.address.line_2.as_deref()),
            text(&self.address.city),
            text(&self.address.region),
            text(&self.address.postal_code),
            CellValue::Int(self.casualty_count),
            CellValue::Int(self.responder_injuries),
            CellValue::Float(self.estimated_damage_amount),
            CellValue::Bool(self.is_active),
            CellValue::Json(self.metadata.clone()),
        ]
    }
}

impl ToRow for IncidentUnit {
    const ENTITY: Entity = Entity::IncidentUnits;

    fn to_row(&self) -> Vec<CellValue> {
        vec![
            text(&self.incident_number),
            text(&self.station_code),
            text(self.assignment_role),
            CellValue::Timestamp(self.dispatched_at),
            CellValue::Timestamp(self.cleared_at),
        ]
    }
}

impl ToRow for IncidentAsset {
    const ENTITY: Entity = Entity::IncidentAssets;

    fn to_row(&self) -> Vec<CellValue> {
        vec![
            text(&self.incident_number),
            text(&self.asset_identifier),
            text(self.asset_type),
            text(self.status),
            text(&self.notes),
        ]
    }
}

impl ToRow for IncidentNote {
    const ENTITY: Entity = Entity::IncidentNotes;

    fn to_row(&self) -> Vec<CellValue> {
        vec![
            text(&self.incident_number),
            text(&self.author),
            text(self.note),
            CellValue::Timestamp(self.created_at),
        ]
    }
}

pub fn rows_of<T: ToRow>(records: &[T]) -> Vec<Vec<CellValue>> {
    records.iter().map(ToRow::to_row).collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamps_render_with_offset() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-05T07:08:09+00:00");
        assert_eq!(
            CellValue::Timestamp(at).to_csv(),
            "2024-03-05T07:08:09+00:00"
        );
    }

    #[test]
    fn nulls_render_empty() {
        assert_eq!(CellValue::Null.to_csv(), "");
        assert!(CellValue::Null.is_null());
    }

    #[test]
    fn json_renders_compact() {
        let value = serde_json::json!({"report_channel": "call"});
        assert_eq!(
            CellValue::Json(value).to_csv(),
            r#"{"report_channel":"call"}"#
        );
        assert_eq!(CellValue::Float(1250.5).to_csv(), "1250.5");
    }
}
