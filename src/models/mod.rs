mod assignment;
mod company;
pub mod geocode;
mod import;
pub mod lenient;
mod project;

use serde::de::DeserializeOwned;

pub use assignment::{Assignment, NewAssignment};
pub use company::{Company, NewCompany};
pub use geocode::{GeoCandidate, GeoPoint};
pub use import::ImportReport;
pub use project::{NewProject, Project, ProjectDraft, PROJECT_STATUSES};

/// Provinces and territories offered by the filter and form selectors.
pub const PROVINCES: [&str; 13] = [
    "Alberta",
    "British Columbia",
    "Manitoba",
    "New Brunswick",
    "Newfoundland and Labrador",
    "Northwest Territories",
    "Nova Scotia",
    "Nunavut",
    "Ontario",
    "Prince Edward Island",
    "Quebec",
    "Saskatchewan",
    "Yukon",
];

/// The three record types the remote store serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Project,
    Company,
    Assignment,
}

impl RecordKind {
    /// Path segment under the API base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            RecordKind::Project => "projects",
            RecordKind::Company => "companies",
            RecordKind::Assignment => "assignments",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            RecordKind::Project => "Project",
            RecordKind::Company => "Company",
            RecordKind::Assignment => "Assignment",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            RecordKind::Project => "project",
            RecordKind::Company => "company",
            RecordKind::Assignment => "assignment",
        }
    }

    pub fn plural(self) -> &'static str {
        self.endpoint()
    }
}

/// A record the remote store hands out as a JSON array element.
pub trait Record: DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: RecordKind;

    fn id(&self) -> Option<i64>;

    /// Confirmation question shown before deleting this record.
    fn delete_prompt(&self) -> String;
}

impl Record for Project {
    const KIND: RecordKind = RecordKind::Project;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn delete_prompt(&self) -> String {
        format!("Delete \"{}\"?", self.name)
    }
}

impl Record for Company {
    const KIND: RecordKind = RecordKind::Company;

    fn id(&self) -> Option<i64> {
        Some(self.id)
    }

    fn delete_prompt(&self) -> String {
        format!("Delete \"{}\"?", self.name)
    }
}

impl Record for Assignment {
    const KIND: RecordKind = RecordKind::Assignment;

    fn id(&self) -> Option<i64> {
        Some(self.id)
    }

    fn delete_prompt(&self) -> String {
        format!(
            "Delete assignment between \"{}\" and \"{}\"?",
            self.project_name, self.company_name
        )
    }
}
