use std::f64::consts::PI;

use foundation::math::Vec2;

/// Earth's equatorial circumference; fixes the projected unit scale.
pub const CIRCUMFERENCE: f64 = 40_075_017.0;

/// Miller's latitude compression factor (the projection uses 4/5 inside the
/// tangent and 5/4 outside).
const MILLER_K: f64 = 0.8;

/// Shifts longitudes west of the re-centered antimeridian by a full turn.
pub fn wrap_longitude(lng: f64, central_meridian: f64) -> f64 {
    if lng < -180.0 + central_meridian {
        lng + 360.0
    } else {
        lng
    }
}

/// Projects degrees into projected units. North maps to negative `y`.
pub fn forward(lat: f64, lng: f64, central_meridian: f64) -> Vec2 {
    let lng = wrap_longitude(lng, central_meridian);
    let x = (lng - central_meridian) / 360.0 * CIRCUMFERENCE;
    let y_deg = 180.0 / PI / MILLER_K * (PI / 4.0 + MILLER_K * -lat * PI / 360.0).tan().ln();
    Vec2::new(x, y_deg / 360.0 * CIRCUMFERENCE)
}

/// Inverse of [`forward`]; longitude comes back in `[-180, 180]`.
pub fn inverse(p: Vec2, central_meridian: f64) -> (f64, f64) {
    let y_deg = p.y / CIRCUMFERENCE * 360.0;
    let t = (y_deg * MILLER_K * PI / 180.0).exp();
    let lat = -(t.atan() - PI / 4.0) * 360.0 / (MILLER_K * PI);

    let mut lng = p.x / CIRCUMFERENCE * 360.0 + central_meridian;
    if lng > 180.0 {
        lng -= 360.0;
    } else if lng < -180.0 {
        lng += 360.0;
    }
    (lat, lng)
}
