//! Great-circle distance helpers.
//!
//! Inputs are not validated: non-finite or out-of-range coordinates flow
//! straight into the arithmetic.

use tripbook_model::Coordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometers.
pub fn haversine_distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Sum of distances between consecutive points, in the order given.
pub fn total_route_distance_km(points: &[Coordinates]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_distance_km(pair[0], pair[1]))
        .sum()
}

/// `"<N>m"` below one kilometer, `"<N.N>km"` otherwise.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round())
    } else {
        format!("{:.1}km", km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAICHUNG_HSR: Coordinates = Coordinates { lat: 24.1120, lng: 120.6156 };
    const ZUOYING_HSR: Coordinates = Coordinates { lat: 22.6874, lng: 120.3090 };
    const HOTEL: Coordinates = Coordinates { lat: 24.1428, lng: 120.6835 };

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_distance_km(HOTEL, HOTEL), 0.0);
    }

    #[test]
    fn distance_is_symmetric_and_plausible() {
        let there = haversine_distance_km(TAICHUNG_HSR, ZUOYING_HSR);
        let back = haversine_distance_km(ZUOYING_HSR, TAICHUNG_HSR);
        assert!((there - back).abs() < 1e-9);
        // Roughly 160 km as the crow flies.
        assert!(there > 150.0 && there < 170.0, "got {there}");
    }

    #[test]
    fn quarter_meridian() {
        let pole = Coordinates::new(90.0, 0.0);
        let equator = Coordinates::new(0.0, 0.0);
        let expected = std::f64::consts::FRAC_PI_2 * EARTH_RADIUS_KM;
        assert!((haversine_distance_km(equator, pole) - expected).abs() < 1e-6);
    }

    #[test]
    fn route_distance_edge_cases() {
        assert_eq!(total_route_distance_km(&[]), 0.0);
        assert_eq!(total_route_distance_km(&[HOTEL]), 0.0);
        assert_eq!(
            total_route_distance_km(&[TAICHUNG_HSR, HOTEL]),
            haversine_distance_km(TAICHUNG_HSR, HOTEL)
        );
    }

    #[test]
    fn route_distance_depends_on_order() {
        let forward = total_route_distance_km(&[TAICHUNG_HSR, ZUOYING_HSR, HOTEL]);
        let reordered = total_route_distance_km(&[TAICHUNG_HSR, HOTEL, ZUOYING_HSR]);
        assert!((forward - reordered).abs() > 1.0);
    }

    #[test]
    fn format_distance_boundaries() {
        assert_eq!(format_distance(0.5), "500m");
        assert_eq!(format_distance(1.0), "1.0km");
        assert_eq!(format_distance(0.0049), "5m");
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(12.345), "12.3km");
        assert_eq!(format_distance(0.9996), "1000m");
    }
}
