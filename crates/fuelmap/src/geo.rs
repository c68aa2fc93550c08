//! Great-circle distances between coordinates.

use fuelmap_api::Location;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub fn haversine_km(from: Location, to: Location) -> f64 {
    let (lat1, lat2) = (from.latitude.to_radians(), to.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distance in kilometers, or `None` when either position is unknown.
///
/// `(0, 0)` is treated as unknown on both sides.
pub fn distance_between(device: Option<Location>, target: Location) -> Option<f64> {
    let device = device?.known()?;
    let target = target.known()?;
    Some(haversine_km(device, target))
}
