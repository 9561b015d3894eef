//! Turns a submitted form into remote writes.
//!
//! Every mutation runs `Idle -> Submitting -> {Refetching -> Idle | Idle}`:
//! a success always triggers a full refetch of the affected collection, a
//! failure goes straight back to idle with a message. Nothing is retried.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{Geocoder, ImportUpload, RemoteStore};
use crate::error::{AtlasError, AtlasResult};
use crate::models::{ImportReport, NewAssignment, NewCompany, Project, ProjectDraft, RecordKind};

/// A validated user action against the remote store.
#[derive(Debug, Clone)]
pub enum Mutation {
    CreateProject(ProjectDraft),
    CreateCompany(NewCompany),
    CreateAssignment(NewAssignment),
    Delete { kind: RecordKind, id: i64 },
    ImportProjects(PathBuf),
}

impl Mutation {
    /// The collection that has to be refetched afterwards.
    pub fn kind(&self) -> RecordKind {
        match self {
            Mutation::CreateProject(_) | Mutation::ImportProjects(_) => RecordKind::Project,
            Mutation::CreateCompany(_) => RecordKind::Company,
            Mutation::CreateAssignment(_) => RecordKind::Assignment,
            Mutation::Delete { kind, .. } => *kind,
        }
    }

    /// Message for a failed run. Failures that never reached the store
    /// (validation, geocoding) are shown as they are.
    pub fn failure_message(&self, err: &AtlasError) -> String {
        if err.is_local() && !matches!(self, Mutation::ImportProjects(_)) {
            return err.to_string();
        }
        match self {
            Mutation::CreateProject(_) | Mutation::CreateCompany(_) => {
                format!("Error saving {}: {}", self.kind().singular(), err)
            }
            Mutation::CreateAssignment(_) => format!("Error: {err}"),
            Mutation::Delete { kind, .. } => format!("Error deleting {}: {}", kind.singular(), err),
            Mutation::ImportProjects(_) => format!("Import error: {err}"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum MutationOutcome {
    Created { kind: RecordKind, name: Option<String> },
    Deleted(RecordKind),
    Imported(ImportReport),
}

impl MutationOutcome {
    pub fn message_lines(&self) -> Vec<String> {
        match self {
            MutationOutcome::Created { kind, name: Some(name) } => {
                vec![format!("{} \"{}\" created successfully!", kind.title(), name)]
            }
            MutationOutcome::Created { kind, name: None } => {
                vec![format!("{} created successfully!", kind.title())]
            }
            MutationOutcome::Deleted(kind) => vec![format!("{} deleted successfully!", kind.title())],
            MutationOutcome::Imported(report) => report.summary_lines(),
        }
    }

    /// Imports only refetch when at least one row made it in.
    pub fn needs_refetch(&self) -> bool {
        match self {
            MutationOutcome::Imported(report) => report.successful > 0,
            _ => true,
        }
    }
}

/// What a mutation needs to talk to.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn RemoteStore>,
    pub geocoder: Arc<dyn Geocoder>,
    pub country: String,
}

pub async fn execute(services: &Services, mutation: Mutation) -> AtlasResult<MutationOutcome> {
    match mutation {
        Mutation::CreateProject(draft) => {
            let project = create_project(
                services.store.as_ref(),
                services.geocoder.as_ref(),
                &services.country,
                draft,
            )
            .await?;
            Ok(MutationOutcome::Created {
                kind: RecordKind::Project,
                name: Some(project.name),
            })
        }
        Mutation::CreateCompany(company) => {
            let created = services.store.create_company(&company).await?;
            Ok(MutationOutcome::Created {
                kind: RecordKind::Company,
                name: Some(created.name),
            })
        }
        Mutation::CreateAssignment(assignment) => {
            services.store.create_assignment(&assignment).await?;
            Ok(MutationOutcome::Created {
                kind: RecordKind::Assignment,
                name: None,
            })
        }
        Mutation::Delete { kind, id } => {
            services.store.delete(kind, id).await?;
            Ok(MutationOutcome::Deleted(kind))
        }
        Mutation::ImportProjects(path) => {
            let upload = ImportUpload::read(&path).await?;
            let report = services.store.import_projects(upload).await?;
            info!(
                total = report.total,
                successful = report.successful,
                failed = report.failed,
                "project import finished"
            );
            Ok(MutationOutcome::Imported(report))
        }
    }
}

/// Geocode the draft's location and post it. Nothing is written when the
/// geocoder fails or has no usable candidate.
pub async fn create_project(
    store: &dyn RemoteStore,
    geocoder: &dyn Geocoder,
    country: &str,
    draft: ProjectDraft,
) -> AtlasResult<Project> {
    let query = draft.location_query(country);
    let candidates = geocoder
        .search(&query)
        .await
        .map_err(|err| AtlasError::LocationService(Box::new(err)))?;

    let Some((point, candidate)) = candidates.first().and_then(|c| c.point().map(|p| (p, c))) else {
        warn!(%query, "no geocoding candidates");
        return Err(AtlasError::LocationNotFound);
    };
    debug!(%query, place = candidate.display_name.as_deref().unwrap_or("-"), "location resolved");

    store.create_project(&draft.locate(point)).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Submitting,
    Refetching(RecordKind),
}

/// Keeps one mutation in flight at a time.
#[derive(Debug)]
pub struct MutationTracker {
    state: MutationState,
}

impl Default for MutationTracker {
    fn default() -> Self {
        Self {
            state: MutationState::Idle,
        }
    }
}

impl MutationTracker {
    pub fn state(&self) -> MutationState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state != MutationState::Idle
    }

    /// `Idle -> Submitting`. Refused while another mutation is running.
    pub fn begin(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.state = MutationState::Submitting;
        true
    }

    /// `Submitting -> Refetching` on success, `Submitting -> Idle` otherwise.
    pub fn finish(&mut self, refetch: Option<RecordKind>) {
        self.state = match refetch {
            Some(kind) => MutationState::Refetching(kind),
            None => MutationState::Idle,
        };
    }

    /// A fetch of `kind` resolved; leaves `Refetching` if it was waiting on it.
    pub fn collection_settled(&mut self, kind: RecordKind) {
        if self.state == MutationState::Refetching(kind) {
            self.state = MutationState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    use crate::models::{Assignment, Company, GeoCandidate, NewProject};

    #[derive(Default)]
    struct FakeStore {
        calls: Mutex<Vec<String>>,
        projects: Mutex<Vec<Project>>,
        assignment_error: Option<String>,
    }

    impl FakeStore {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl RemoteStore for FakeStore {
        async fn load_projects(&self) -> AtlasResult<Vec<Project>> {
            self.record("GET /projects".into());
            Ok(self.projects.lock().unwrap().clone())
        }

        async fn load_companies(&self) -> AtlasResult<Vec<Company>> {
            self.record("GET /companies".into());
            Ok(vec![])
        }

        async fn load_assignments(&self) -> AtlasResult<Vec<Assignment>> {
            self.record("GET /assignments".into());
            Ok(vec![])
        }

        async fn create_project(&self, project: &NewProject) -> AtlasResult<Project> {
            self.record("POST /projects".into());
            let mut projects = self.projects.lock().unwrap();
            let created = Project {
                id: Some(projects.len() as i64 + 1),
                name: project.name.clone(),
                status: project.status.clone(),
                province: project.province.clone(),
                city: project.city.clone(),
                budget: project.budget,
                latitude: Some(project.latitude),
                longitude: Some(project.longitude),
                description: None,
                reason: None,
                planned_date: None,
            };
            projects.push(created.clone());
            Ok(created)
        }

        async fn create_company(&self, company: &NewCompany) -> AtlasResult<Company> {
            self.record("POST /companies".into());
            Ok(Company {
                id: 1,
                name: company.name.clone(),
                province: company.province.clone(),
                city: company.city.clone(),
                email: None,
                number: None,
            })
        }

        async fn create_assignment(&self, assignment: &NewAssignment) -> AtlasResult<Assignment> {
            self.record("POST /assignments".into());
            if let Some(message) = &self.assignment_error {
                return Err(AtlasError::status(StatusCode::CONFLICT, message.clone()));
            }
            Ok(Assignment {
                id: 1,
                project_id: assignment.project_id,
                company_id: assignment.company_id,
                project_name: String::new(),
                company_name: String::new(),
                project_city: String::new(),
                project_province: String::new(),
                project_status: String::new(),
                created_at: None,
            })
        }

        async fn delete(&self, kind: RecordKind, id: i64) -> AtlasResult<()> {
            self.record(format!("DELETE /{}/{}", kind.endpoint(), id));
            let mut projects = self.projects.lock().unwrap();
            let before = projects.len();
            projects.retain(|p| p.id != Some(id));
            if projects.len() == before {
                return Err(AtlasError::status(StatusCode::NOT_FOUND, "Failed to delete project"));
            }
            Ok(())
        }

        async fn import_projects(&self, upload: ImportUpload) -> AtlasResult<ImportReport> {
            self.record(format!("POST /projects/import {}", upload.file_name));
            Ok(ImportReport {
                total: 3,
                successful: 0,
                failed: 3,
                ..ImportReport::default()
            })
        }
    }

    struct FakeGeocoder(AtlasResult<Vec<GeoCandidate>>);

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn search(&self, _query: &str) -> AtlasResult<Vec<GeoCandidate>> {
            match &self.0 {
                Ok(candidates) => Ok(candidates.clone()),
                Err(_) => Err(AtlasError::Validation("connection refused".into())),
            }
        }
    }

    fn candidate(lat: &str, lon: &str) -> GeoCandidate {
        GeoCandidate {
            lat: lat.into(),
            lon: lon.into(),
            display_name: None,
        }
    }

    fn draft() -> ProjectDraft {
        ProjectDraft::parse("Ontario Line", "19000000000", "Planned", "Ontario", "Toronto").unwrap()
    }

    fn services(store: Arc<FakeStore>, geocoder: FakeGeocoder) -> Services {
        Services {
            store,
            geocoder: Arc::new(geocoder),
            country: "Canada".into(),
        }
    }

    #[tokio::test]
    async fn empty_geocode_result_prevents_any_write() {
        let store = FakeStore::default();
        let geocoder = FakeGeocoder(Ok(vec![]));

        let err = create_project(&store, &geocoder, "Canada", draft()).await.unwrap_err();

        assert!(matches!(err, AtlasError::LocationNotFound));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn geocoder_failure_prevents_any_write() {
        let store = FakeStore::default();
        let geocoder = FakeGeocoder(Err(AtlasError::LocationNotFound));

        let err = create_project(&store, &geocoder, "Canada", draft()).await.unwrap_err();

        assert_eq!(err.to_string(), "Location service error. Try again.");
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn first_candidate_coordinates_are_attached() {
        let store = FakeStore::default();
        let geocoder = FakeGeocoder(Ok(vec![candidate("43.6532", "-79.3832"), candidate("1", "1")]));

        let project = create_project(&store, &geocoder, "Canada", draft()).await.unwrap();

        assert_eq!(project.coordinates(), Some((43.6532, -79.3832)));
        assert_eq!(store.calls(), vec!["POST /projects"]);
    }

    #[tokio::test]
    async fn second_delete_of_same_id_fails() {
        let store = Arc::new(FakeStore::default());
        let services = services(store.clone(), FakeGeocoder(Ok(vec![candidate("43.6", "-79.4")])));
        execute(&services, Mutation::CreateProject(draft())).await.unwrap();

        let delete = Mutation::Delete { kind: RecordKind::Project, id: 1 };
        let first = execute(&services, delete.clone()).await.unwrap();
        assert_eq!(first.message_lines(), vec!["Project deleted successfully!"]);

        let err = execute(&services, delete.clone()).await.unwrap_err();
        assert_eq!(
            delete.failure_message(&err),
            "Error deleting project: Failed to delete project"
        );
        assert!(store.load_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_error_message_is_surfaced_for_assignments() {
        let store = Arc::new(FakeStore {
            assignment_error: Some("Company already assigned to this project".into()),
            ..FakeStore::default()
        });
        let services = services(store, FakeGeocoder(Ok(vec![])));
        let mutation = Mutation::CreateAssignment(NewAssignment { project_id: 1, company_id: 2 });

        let err = execute(&services, mutation.clone()).await.unwrap_err();

        assert_eq!(
            mutation.failure_message(&err),
            "Error: Company already assigned to this project"
        );
    }

    #[tokio::test]
    async fn import_without_successes_skips_refetch() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"name\nA\nB\nC").unwrap();
        let store = Arc::new(FakeStore::default());
        let services = services(store.clone(), FakeGeocoder(Ok(vec![])));

        let outcome = execute(&services, Mutation::ImportProjects(file.path().to_path_buf()))
            .await
            .unwrap();

        assert!(!outcome.needs_refetch());
        assert_eq!(outcome.message_lines()[3], "Failed: 3");
        assert!(store.calls()[0].starts_with("POST /projects/import"));
    }

    #[test]
    fn validation_failures_are_shown_verbatim() {
        let mutation = Mutation::CreateProject(draft());
        assert_eq!(
            mutation.failure_message(&AtlasError::LocationNotFound),
            "Invalid location. Try another city/province."
        );
        assert_eq!(
            mutation.failure_message(&AtlasError::status(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save project")),
            "Error saving project: Failed to save project"
        );
    }

    #[test]
    fn tracker_walks_the_state_machine() {
        let mut tracker = MutationTracker::default();
        assert!(tracker.begin());
        assert!(!tracker.begin());

        tracker.finish(Some(RecordKind::Company));
        assert_eq!(tracker.state(), MutationState::Refetching(RecordKind::Company));

        tracker.collection_settled(RecordKind::Project);
        assert!(tracker.is_busy());
        tracker.collection_settled(RecordKind::Company);
        assert_eq!(tracker.state(), MutationState::Idle);

        assert!(tracker.begin());
        tracker.finish(None);
        assert_eq!(tracker.state(), MutationState::Idle);
    }
}
