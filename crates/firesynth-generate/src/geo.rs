use firesynth_core::GeoPoint;

use crate::errors::GenerationError;
use crate::random::RandomSource;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Point within `max_km` of `center`, projected on a spherical earth.
///
/// Distance and bearing are each drawn uniformly (distance first), so points
/// cluster toward the center rather than filling the disk evenly. Seeded
/// outputs depend on that, so it must stay this way.
pub fn random_geo_point(center: GeoPoint, max_km: f64, rng: &mut RandomSource) -> GeoPoint {
    let distance = max_km * rng.uniform();
    let bearing = rng.uniform() * 2.0 * std::f64::consts::PI;
    destination(center, distance, bearing)
}

/// Great-circle destination from `origin` after `distance_km` along `bearing` (radians).
pub fn destination(origin: GeoPoint, distance_km: f64, bearing: f64) -> GeoPoint {
    let angular = distance_km / EARTH_RADIUS_KM;
    let lat = origin.lat.to_radians();
    let lng = origin.lng.to_radians();

    let new_lat = (lat.sin() * angular.cos() + lat.cos() * angular.sin() * bearing.cos()).asin();
    let new_lng = lng
        + (bearing.sin() * angular.sin() * lat.cos()).atan2(angular.cos() - lat.sin() * new_lat.sin());

    GeoPoint::new(new_lat.to_degrees(), new_lng.to_degrees())
}

/// Great-circle distance in kilometers (haversine).
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

pub fn geohash(point: GeoPoint, precision: u8) -> Result<String, GenerationError> {
    let coord = geohash::Coord {
        x: point.lng,
        y: point.lat,
    };
    Ok(geohash::encode(coord, usize::from(precision))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEATTLE: GeoPoint = GeoPoint {
        lat: 47.6062,
        lng: -122.3321,
    };

    #[test]
    fn sampled_points_stay_within_radius() {
        let mut rng = RandomSource::new(Some(11));
        for _ in 0..500 {
            let point = random_geo_point(SEATTLE, 20.0, &mut rng);
            assert!(distance_km(SEATTLE, point) <= 20.0 + 1e-6);
        }
    }

    #[test]
    fn sampling_consumes_two_draws() {
        let mut sampled = RandomSource::new(Some(21));
        let mut reference = RandomSource::new(Some(21));
        random_geo_point(SEATTLE, 3.5, &mut sampled);
        reference.uniform();
        reference.uniform();
        assert_eq!(sampled.uniform().to_bits(), reference.uniform().to_bits());
    }

    #[test]
    fn zero_distance_returns_center() {
        let point = destination(SEATTLE, 0.0, 1.0);
        assert!((point.lat - SEATTLE.lat).abs() < 1e-9);
        assert!((point.lng - SEATTLE.lng).abs() < 1e-9);
    }

    #[test]
    fn due_north_moves_latitude_only() {
        let point = destination(SEATTLE, 111.19, 0.0);
        assert!((point.lat - (SEATTLE.lat + 1.0)).abs() < 1e-3);
        assert!((point.lng - SEATTLE.lng).abs() < 1e-9);
    }

    #[test]
    fn geohash_has_requested_precision() {
        let hash = geohash(SEATTLE, 8).expect("encode");
        assert_eq!(hash.len(), 8);
        assert!(hash.starts_with("c23nb"));
        assert_eq!(geohash(SEATTLE, 3).expect("encode"), "c23");
    }
}
