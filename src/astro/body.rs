use nalgebra::Vector3;

use super::HasMass;

/// A latitude/longitude pair on the surface of a body, in degrees. Longitude
/// is measured in the body-fixed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoSite {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoSite {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The body everything orbits.
///
/// Its non-rotating frame has z along the spin axis, and x through the body's
/// zero meridian at t = 0.
#[derive(Debug, Clone)]
pub struct CentralBody {
    pub name: String,
    pub mu: f64,
    pub radius: f64,
    /// Sidereal rotation period, in seconds. Infinite for a body that
    /// doesn't spin.
    pub rotation_period: f64,
}

impl CentralBody {
    /// How far the zero meridian has turned by `time`, in degrees.
    pub fn rotation_angle(&self, time: f64) -> f64 {
        time / self.rotation_period * 360.0
    }

    /// Where the site's inertial longitude will be at `time`, given where it
    /// is at `now`.
    pub fn advance_longitude(&self, longitude_now: f64, now: f64, time: f64) -> f64 {
        longitude_now + self.rotation_angle(time - now)
    }

    /// Position of the point `height` meters above `site`, at `time`.
    pub fn site_position(&self, site: &GeoSite, height: f64, time: f64) -> Vector3<f64> {
        let longitude = self.advance_longitude(site.longitude, 0.0, time).to_radians();
        let latitude = site.latitude.to_radians();
        let radius = self.radius + height;

        radius
            * Vector3::new(
                latitude.cos() * longitude.cos(),
                latitude.cos() * longitude.sin(),
                latitude.sin(),
            )
    }

    /// Velocity of a point on (or above) the surface, due to rotation alone.
    pub fn site_velocity(&self, site: &GeoSite, height: f64, time: f64) -> Vector3<f64> {
        let omega = Vector3::z() * (2.0 * std::f64::consts::PI / self.rotation_period);
        omega.cross(&self.site_position(site, height, time))
    }
}

impl HasMass for CentralBody {
    fn mu(&self) -> f64 {
        self.mu
    }
}
