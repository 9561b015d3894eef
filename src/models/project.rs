use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, AtlasResult};
use crate::models::{lenient, GeoPoint};

/// Statuses a project moves through. Feeds may carry others; those are kept
/// verbatim and rendered with the default marker.
pub const PROJECT_STATUSES: [&str; 3] = ["Planned", "In-Progress", "Completed"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    /// Assigned by the remote store; static feeds carry no ids.
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, deserialize_with = "lenient::f64_or_text")]
    pub budget: f64,
    #[serde(default, deserialize_with = "lenient::opt_f64_or_text")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64_or_text")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub planned_date: Option<String>,
}

impl Project {
    /// Position on the map, only when both coordinates are present and
    /// non-zero. A project at exactly 0.0 is treated as never geocoded.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let truthy = |v: Option<f64>| v.filter(|v| *v != 0.0 && v.is_finite());
        Some((truthy(self.latitude)?, truthy(self.longitude)?))
    }

    pub fn planned_date(&self) -> Option<NaiveDate> {
        self.planned_date.as_deref().and_then(lenient::date_prefix)
    }
}

/// A validated project submission that still lacks coordinates.
///
/// The only way to get a [`NewProject`] is [`ProjectDraft::locate`], so a
/// project can never be posted without a geocoding result.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub budget: f64,
    pub status: String,
    pub province: String,
    pub city: String,
}

impl ProjectDraft {
    pub fn parse(name: &str, budget: &str, status: &str, province: &str, city: &str) -> AtlasResult<Self> {
        let name = name.trim();
        let city = city.trim();
        if name.is_empty() {
            return Err(AtlasError::Validation("Project name is required".into()));
        }
        if province.is_empty() {
            return Err(AtlasError::Validation("Province is required".into()));
        }
        if city.is_empty() {
            return Err(AtlasError::Validation("City is required".into()));
        }
        let budget: f64 = budget
            .trim()
            .replace(',', "")
            .parse()
            .map_err(|_| AtlasError::Validation(format!("Budget \"{}\" is not a number", budget.trim())))?;
        if !budget.is_finite() || budget < 0.0 {
            return Err(AtlasError::Validation("Budget must be zero or more".into()));
        }

        Ok(Self {
            name: name.to_string(),
            budget,
            status: status.to_string(),
            province: province.to_string(),
            city: city.to_string(),
        })
    }

    /// Free-text query handed to the geocoder.
    pub fn location_query(&self, country: &str) -> String {
        format!("{}, {}, {}", self.city, self.province, country)
    }

    pub fn locate(self, point: GeoPoint) -> NewProject {
        NewProject {
            name: self.name,
            budget: self.budget,
            status: self.status,
            province: self.province,
            city: self.city,
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

/// Body of `POST /projects`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProject {
    pub name: String,
    pub budget: f64,
    pub status: String,
    pub province: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_record_decodes_with_text_numbers() {
        let project: Project = serde_json::from_str(
            r#"{
                "name": "Gordie Howe Bridge",
                "status": "In-Progress",
                "province": "Ontario",
                "city": "Windsor",
                "budget": "5700000000",
                "latitude": "42.29",
                "longitude": -83.09,
                "description": "Cable-stayed bridge",
                "reason": "Border capacity",
                "planned_date": "2018-10-05"
            }"#,
        )
        .unwrap();

        assert_eq!(project.id, None);
        assert_eq!(project.budget, 5.7e9);
        assert_eq!(project.coordinates(), Some((42.29, -83.09)));
        assert_eq!(project.planned_date(), NaiveDate::from_ymd_opt(2018, 10, 5));
    }

    #[test]
    fn missing_or_zero_coordinate_excludes_record() {
        let mut project: Project =
            serde_json::from_str(r#"{"name":"Site C","latitude":null,"longitude":-75}"#).unwrap();
        assert_eq!(project.coordinates(), None);

        project.latitude = Some(0.0);
        assert_eq!(project.coordinates(), None);

        project.latitude = Some(45.4);
        assert_eq!(project.coordinates(), Some((45.4, -75.0)));

        project.longitude = None;
        assert_eq!(project.coordinates(), None);
    }

    #[test]
    fn draft_validates_before_dispatch() {
        assert!(matches!(
            ProjectDraft::parse("", "10", "Planned", "Ontario", "Ottawa"),
            Err(AtlasError::Validation(_))
        ));
        assert!(ProjectDraft::parse("Transit", "ten", "Planned", "Ontario", "Ottawa").is_err());
        assert!(ProjectDraft::parse("Transit", "-1", "Planned", "Ontario", "Ottawa").is_err());
        assert!(ProjectDraft::parse("Transit", "10", "Planned", "", "Ottawa").is_err());

        let draft = ProjectDraft::parse(" Transit ", "2,500,000", "Planned", "Ontario", " Ottawa").unwrap();
        assert_eq!(draft.name, "Transit");
        assert_eq!(draft.budget, 2_500_000.0);
        assert_eq!(draft.location_query("Canada"), "Ottawa, Ontario, Canada");
    }

    #[test]
    fn located_draft_serializes_coordinates() {
        let draft = ProjectDraft::parse("Transit", "10", "Planned", "Ontario", "Ottawa").unwrap();
        let body = serde_json::to_value(draft.locate(GeoPoint { latitude: 45.42, longitude: -75.69 })).unwrap();

        assert_eq!(body["name"], "Transit");
        assert_eq!(body["latitude"], 45.42);
        assert_eq!(body["longitude"], -75.69);
    }
}
