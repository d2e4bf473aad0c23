//! Great-circle geometry used for nearest-site lookups.

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance in kilometres between two
/// (latitude, longitude) points given in degrees.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(haversine_km(22.5726, 88.3639, 22.5726, 88.3639), 0.0);
    }

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        let distance = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((distance - 111.19).abs() < 0.2, "got {distance}");
    }

    #[test]
    fn london_to_paris_is_about_344_km() {
        let distance = haversine_km(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((340.0..350.0).contains(&distance), "got {distance}");
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_km(22.5726, 88.3639, 26.7075, 88.43);
        let back = haversine_km(26.7075, 88.43, 22.5726, 88.3639);
        assert!((there - back).abs() < 1e-9);
        assert!(there > 0.0);
    }
}
