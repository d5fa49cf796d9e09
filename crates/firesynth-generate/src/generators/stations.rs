use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::debug;

use firesynth_core::{Address, GeoPoint, Station};

use crate::faker::TextFaker;
use crate::geo::random_geo_point;
use crate::random::RandomSource;

/// Downtown Seattle.
pub const STATION_ANCHOR: GeoPoint = GeoPoint {
    lat: 47.6062,
    lng: -122.3321,
};
pub const STATION_MAX_KM: f64 = 20.0;
pub const COMMISSION_YEARS: (i32, i32) = (1975, 2020);
pub const MIN_SERVICE_YEARS: i32 = 5;
pub const LAST_DECOMMISSION_YEAR: i32 = 2023;
/// Share of stations that stay in service.
pub const ACTIVE_SHARE: f64 = 0.9;
pub const COVERAGE_RADIUS_METERS: (i64, i64) = (4_000, 12_000);

pub fn station_code(index: u32) -> String {
    format!("STA-{index:03}")
}

/// Generate `count` stations numbered from 1.
///
/// `stamped_at` fills `created_at`/`updated_at`, keeping seeded reruns
/// identical.
pub fn generate_stations(
    count: u32,
    stamped_at: DateTime<Utc>,
    rng: &mut RandomSource,
) -> Vec<Station> {
    let stations: Vec<Station> = (1..=count)
        .map(|index| generate_station(index, stamped_at, rng))
        .collect();
    debug!(
        stations = stations.len(),
        decommissioned = stations.iter().filter(|s| !s.is_active).count(),
        "stations generated"
    );
    stations
}

fn generate_station(index: u32, stamped_at: DateTime<Utc>, rng: &mut RandomSource) -> Station {
    let location = random_geo_point(STATION_ANCHOR, STATION_MAX_KM, rng);

    let commissioned_year =
        rng.int_inclusive(i64::from(COMMISSION_YEARS.0), i64::from(COMMISSION_YEARS.1)) as i32;
    let commissioned_on = random_date_in_year(commissioned_year, rng);

    // Stations commissioned too late for a full service term stay active.
    let earliest_year = commissioned_year + MIN_SERVICE_YEARS;
    let decommissioned_on = if rng.uniform() < ACTIVE_SHARE || earliest_year > LAST_DECOMMISSION_YEAR
    {
        None
    } else {
        let year = rng.int_inclusive(i64::from(earliest_year), i64::from(LAST_DECOMMISSION_YEAR))
            as i32;
        let drawn = random_date_in_year(year, rng);
        let anniversary = commissioned_on.with_year(earliest_year).unwrap_or(drawn);
        Some(drawn.max(anniversary))
    };

    let code = station_code(index);
    let name = format!("Station {} {index:03}", TextFaker::city(rng));
    let battalion = format!("Battalion {}", rng.int_inclusive(1, 8));
    let address = Address {
        line_1: TextFaker::street_address(rng),
        line_2: None,
        city: TextFaker::city(rng),
        region: TextFaker::state_abbr(rng),
        postal_code: TextFaker::postcode(rng),
    };
    let phone = TextFaker::phone(rng);
    let coverage_radius_meters = rng.int_inclusive(COVERAGE_RADIUS_METERS.0, COVERAGE_RADIUS_METERS.1);

    Station {
        code,
        name,
        battalion,
        address,
        phone,
        is_active: decommissioned_on.is_none(),
        commissioned_on,
        decommissioned_on,
        response_zone_code: None,
        location_wkt: location.wkt(),
        location,
        coverage_radius_meters,
        created_at: stamped_at,
        updated_at: stamped_at,
    }
}

/// Month then day; days stop at 28 so every month is valid.
fn random_date_in_year(year: i32, rng: &mut RandomSource) -> NaiveDate {
    let month = rng.int_inclusive(1, 12) as u32;
    let day = rng.int_inclusive(1, 28) as u32;
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::geo::distance_km;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn codes_are_sequential_from_one() {
        let mut rng = RandomSource::new(Some(42));
        let stations = generate_stations(12, stamp(), &mut rng);
        let codes: Vec<&str> = stations.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes.first(), Some(&"STA-001"));
        assert_eq!(codes.last(), Some(&"STA-012"));
        assert_eq!(codes.len(), 12);
    }

    #[test]
    fn decommission_rules_hold() {
        let mut rng = RandomSource::new(Some(7));
        let stations = generate_stations(400, stamp(), &mut rng);
        assert!(stations.iter().any(|s| s.decommissioned_on.is_some()));
        for station in &stations {
            let year = station.commissioned_on.year();
            assert!((COMMISSION_YEARS.0..=COMMISSION_YEARS.1).contains(&year));
            assert_eq!(station.is_active, station.decommissioned_on.is_none());
            if let Some(decommissioned) = station.decommissioned_on {
                let anniversary = station
                    .commissioned_on
                    .with_year(year + MIN_SERVICE_YEARS)
                    .expect("day <= 28 exists in every year");
                assert!(decommissioned >= anniversary);
                assert!(decommissioned.year() <= LAST_DECOMMISSION_YEAR);
            }
        }
    }

    #[test]
    fn stations_stay_near_anchor() {
        let mut rng = RandomSource::new(Some(3));
        for station in generate_stations(50, stamp(), &mut rng) {
            assert!(distance_km(STATION_ANCHOR, station.location) <= STATION_MAX_KM + 1e-6);
            assert_eq!(station.location_wkt, station.location.wkt());
            assert!((4_000..=12_000).contains(&station.coverage_radius_meters));
            assert_eq!(station.created_at, stamp());
        }
    }
}
