//! The admin console: three record tabs, their create forms and the event
//! loop that ties them to the remote store.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Tabs},
    Frame, Terminal,
};

use crate::error::AtlasResult;
use crate::models::{Assignment, Company, Project, RecordKind};
use crate::mutation::{self, Mutation, MutationOutcome, MutationTracker, Services};
use crate::pipeline::{FetchOutcome, FetchTicket};
use crate::ui::{
    assignment_wizard::{self, AssignmentWizardAction, AssignmentWizardState},
    company_wizard::{self, CompanyWizardAction, CompanyWizardState},
    components::{
        popup::centered_rect,
        status::{StatusBar, StatusMessage, Tone, IMPORT_REPORT_LIFETIME, SUCCESS_LIFETIME},
    },
    import_prompt::{self, ImportAction, ImportPromptState},
    project_wizard::{self, ProjectWizardAction, ProjectWizardState},
    record_list::{self, ListAction, RecordListState},
};

const TICK: Duration = Duration::from_millis(100);

const BUSY_MESSAGE: &str = "Please wait for the current operation to finish";

const TABS: [RecordKind; 3] = [RecordKind::Project, RecordKind::Company, RecordKind::Assignment];

// What currently receives key presses. Only one form can be open at a time.
enum AppScreen {
    Tab,
    ProjectWizard(ProjectWizardState),
    CompanyWizard(CompanyWizardState),
    AssignmentWizard(AssignmentWizardState),
    Import(ImportPromptState),
}

/// Results delivered from spawned network tasks.
pub enum AppEvent {
    ProjectsLoaded(FetchTicket, AtlasResult<Vec<Project>>),
    CompaniesLoaded(FetchTicket, AtlasResult<Vec<Company>>),
    AssignmentsLoaded(FetchTicket, AtlasResult<Vec<Assignment>>),
    AssignmentOptions(AtlasResult<(Vec<Project>, Vec<Company>)>),
    MutationFinished(Mutation, AtlasResult<MutationOutcome>),
}

pub struct AdminApp {
    tab: RecordKind,
    screen: AppScreen,
    projects: RecordListState<Project>,
    companies: RecordListState<Company>,
    assignments: RecordListState<Assignment>,
    status: StatusBar,
    mutations: MutationTracker,
    services: Services,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
}

impl AdminApp {
    pub fn new(services: Services) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tab: RecordKind::Project,
            screen: AppScreen::Tab,
            projects: RecordListState::new(),
            companies: RecordListState::new(),
            assignments: RecordListState::new(),
            status: StatusBar::default(),
            mutations: MutationTracker::default(),
            services,
            tx,
            rx,
        }
    }

    /// Fetch one collection in the background.
    fn load(&mut self, kind: RecordKind) {
        debug!(kind = kind.plural(), "fetching collection");
        let store = self.services.store.clone();
        let tx = self.tx.clone();

        match kind {
            RecordKind::Project => {
                let ticket = self.projects.collection.begin_fetch();
                tokio::spawn(async move {
                    let _ = tx.send(AppEvent::ProjectsLoaded(ticket, store.load_projects().await));
                });
            }
            RecordKind::Company => {
                let ticket = self.companies.collection.begin_fetch();
                tokio::spawn(async move {
                    let _ = tx.send(AppEvent::CompaniesLoaded(ticket, store.load_companies().await));
                });
            }
            RecordKind::Assignment => {
                let ticket = self.assignments.collection.begin_fetch();
                tokio::spawn(async move {
                    let _ = tx.send(AppEvent::AssignmentsLoaded(ticket, store.load_assignments().await));
                });
            }
        }
    }

    fn open_assignment_form(&mut self) {
        self.status.set(StatusMessage::info("Loading projects and companies..."));
        let store = self.services.store.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = tokio::try_join!(store.load_projects(), store.load_companies());
            let _ = tx.send(AppEvent::AssignmentOptions(result));
        });
    }

    fn submit(&mut self, mutation: Mutation) {
        if !self.mutations.begin() {
            debug!(state = ?self.mutations.state(), "submission refused while another is running");
            self.status.set(StatusMessage::new(
                vec![BUSY_MESSAGE.to_string()],
                Tone::Info,
                Some(SUCCESS_LIFETIME),
            ));
            return;
        }

        match &mut self.screen {
            AppScreen::ProjectWizard(state) => state.submitting = true,
            AppScreen::CompanyWizard(state) => state.submitting = true,
            AppScreen::AssignmentWizard(state) => state.submitting = true,
            AppScreen::Import(_) | AppScreen::Tab => {}
        }
        if let Mutation::ImportProjects(path) = &mutation {
            info!(path = %path.display(), "importing projects");
            self.screen = AppScreen::Tab;
            self.status.set(StatusMessage::info("Uploading and processing file..."));
        }

        let services = self.services.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = mutation::execute(&services, mutation.clone()).await;
            let _ = tx.send(AppEvent::MutationFinished(mutation, result));
        });
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ProjectsLoaded(ticket, result) => {
                let outcome = self.projects.complete_fetch(ticket, result);
                let loading = self.projects.collection.is_loading();
                self.settle(RecordKind::Project, outcome, loading);
            }
            AppEvent::CompaniesLoaded(ticket, result) => {
                let outcome = self.companies.complete_fetch(ticket, result);
                let loading = self.companies.collection.is_loading();
                self.settle(RecordKind::Company, outcome, loading);
            }
            AppEvent::AssignmentsLoaded(ticket, result) => {
                let outcome = self.assignments.complete_fetch(ticket, result);
                let loading = self.assignments.collection.is_loading();
                self.settle(RecordKind::Assignment, outcome, loading);
            }
            AppEvent::AssignmentOptions(Ok((projects, companies))) => {
                if self.tab == RecordKind::Assignment && matches!(self.screen, AppScreen::Tab) {
                    self.status.clear();
                    self.screen = AppScreen::AssignmentWizard(AssignmentWizardState::new(&projects, &companies));
                }
            }
            AppEvent::AssignmentOptions(Err(err)) => {
                error!(error = %err, "failed to load assignment form options");
                self.status.set(StatusMessage::error(format!("Error loading data: {err}")));
            }
            AppEvent::MutationFinished(mutation, result) => self.mutation_finished(mutation, result),
        }
    }

    fn settle(&mut self, kind: RecordKind, outcome: FetchOutcome, loading: bool) {
        match outcome {
            FetchOutcome::Installed(count) => debug!(kind = kind.plural(), count, "collection installed"),
            FetchOutcome::Failed(err) => {
                error!(kind = kind.plural(), error = %err, "failed to load collection");
                self.status
                    .set(StatusMessage::error(format!("Error loading {}: {}", kind.plural(), err)));
            }
            FetchOutcome::Stale => debug!(kind = kind.plural(), "dropped stale response"),
        }
        if !loading {
            self.mutations.collection_settled(kind);
        }
    }

    fn mutation_finished(&mut self, mutation: Mutation, result: AtlasResult<MutationOutcome>) {
        let kind = mutation.kind();
        match result {
            Ok(outcome) => {
                let lifetime = match outcome {
                    MutationOutcome::Imported(_) => IMPORT_REPORT_LIFETIME,
                    _ => SUCCESS_LIFETIME,
                };
                self.status
                    .set(StatusMessage::new(outcome.message_lines(), Tone::Success, Some(lifetime)));
                if !matches!(self.screen, AppScreen::Tab | AppScreen::Import(_)) {
                    self.screen = AppScreen::Tab;
                }

                if outcome.needs_refetch() {
                    self.mutations.finish(Some(kind));
                    self.load(kind);
                } else {
                    self.mutations.finish(None);
                }
            }
            Err(err) => {
                warn!(kind = kind.singular(), error = %err, "mutation failed");
                let message = mutation.failure_message(&err);
                self.mutations.finish(None);

                match &mut self.screen {
                    AppScreen::ProjectWizard(state) => {
                        state.submitting = false;
                        state.error = Some(message.clone());
                    }
                    AppScreen::CompanyWizard(state) => {
                        state.submitting = false;
                        state.error = Some(message.clone());
                    }
                    AppScreen::AssignmentWizard(state) => {
                        state.submitting = false;
                        state.error = Some(message.clone());
                    }
                    AppScreen::Import(_) | AppScreen::Tab => {}
                }
                self.status.set(StatusMessage::error(message));
            }
        }
    }

    /// Returns true when the console should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match &mut self.screen {
            AppScreen::ProjectWizard(state) => match project_wizard::handle_input(state, key) {
                Some(ProjectWizardAction::Cancel) => self.screen = AppScreen::Tab,
                Some(ProjectWizardAction::Save(draft)) => self.submit(Mutation::CreateProject(draft)),
                None => {}
            },
            AppScreen::CompanyWizard(state) => match company_wizard::handle_input(state, key) {
                Some(CompanyWizardAction::Cancel) => self.screen = AppScreen::Tab,
                Some(CompanyWizardAction::Save(company)) => self.submit(Mutation::CreateCompany(company)),
                None => {}
            },
            AppScreen::AssignmentWizard(state) => match assignment_wizard::handle_input(state, key) {
                Some(AssignmentWizardAction::Cancel) => self.screen = AppScreen::Tab,
                Some(AssignmentWizardAction::Save(assignment)) => {
                    self.submit(Mutation::CreateAssignment(assignment))
                }
                None => {}
            },
            AppScreen::Import(state) => match import_prompt::handle_input(state, key) {
                Some(ImportAction::Cancel) => self.screen = AppScreen::Tab,
                Some(ImportAction::Upload(path)) => self.submit(Mutation::ImportProjects(path)),
                None => {}
            },
            AppScreen::Tab => {
                let action = match self.tab {
                    RecordKind::Project => record_list::handle_input(&mut self.projects, key),
                    RecordKind::Company => record_list::handle_input(&mut self.companies, key),
                    RecordKind::Assignment => record_list::handle_input(&mut self.assignments, key),
                };
                if let Some(action) = action {
                    return self.handle_list_action(action);
                }
            }
        }
        false
    }

    fn handle_list_action(&mut self, action: ListAction) -> bool {
        match action {
            ListAction::Quit => return true,
            ListAction::SwitchTab(kind) => {
                self.tab = kind;
                self.status.clear();
                self.load(kind);
            }
            ListAction::Refresh => self.load(self.tab),
            ListAction::NewRecord => match self.tab {
                RecordKind::Project => self.screen = AppScreen::ProjectWizard(ProjectWizardState::new()),
                RecordKind::Company => self.screen = AppScreen::CompanyWizard(CompanyWizardState::new()),
                RecordKind::Assignment => self.open_assignment_form(),
            },
            ListAction::Import => self.screen = AppScreen::Import(ImportPromptState::new()),
            ListAction::Delete { kind, id } => self.submit(Mutation::Delete { kind, id }),
        }
        false
    }

    fn draw<B: Backend>(&mut self, f: &mut Frame<B>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(self.status.height(f.size().width)),
            ])
            .split(f.size());

        let titles: Vec<Spans> = TABS
            .iter()
            .enumerate()
            .map(|(i, kind)| Spans::from(format!("{} {}", i + 1, kind.title())))
            .collect();
        let selected = TABS.iter().position(|k| *k == self.tab).unwrap_or(0);
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Project Atlas"))
            .select(selected)
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, chunks[0]);

        match self.tab {
            RecordKind::Project => record_list::render_record_list(f, chunks[1], &mut self.projects),
            RecordKind::Company => record_list::render_record_list(f, chunks[1], &mut self.companies),
            RecordKind::Assignment => record_list::render_record_list(f, chunks[1], &mut self.assignments),
        }

        self.status.render(f, chunks[2]);

        let form_area = centered_rect(70, 70, f.size());
        match &mut self.screen {
            AppScreen::Tab => {}
            AppScreen::ProjectWizard(state) => project_wizard::render_project_wizard(f, form_area, state),
            AppScreen::CompanyWizard(state) => company_wizard::render_company_wizard(f, form_area, state),
            AppScreen::AssignmentWizard(state) => {
                assignment_wizard::render_assignment_wizard(f, form_area, state)
            }
            AppScreen::Import(state) => import_prompt::render_import_prompt(f, state),
        }
    }
}

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AdminApp) -> Result<()> {
    app.load(app.tab);

    loop {
        while let Ok(event) = app.rx.try_recv() {
            app.handle_event(event);
        }
        app.status.clear_expired(Instant::now());

        terminal.draw(|f| app.draw(f))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    break;
                }
            }
        }
    }

    Ok(())
}
