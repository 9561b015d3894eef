use serde::Deserialize;

/// One candidate from the geocoding search. Coordinates come back as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoCandidate {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCandidate {
    pub fn point(&self) -> Option<GeoPoint> {
        let latitude = self.lat.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        let longitude = self.lon.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        Some(GeoPoint { latitude, longitude })
    }
}
