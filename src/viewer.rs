//! The map viewer: one project feed, loaded at startup and on request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};
use tui::{backend::Backend, Terminal};

use crate::api::ProjectFeed;
use crate::error::AtlasResult;
use crate::models::Project;
use crate::pipeline::{FetchOutcome, FetchTicket};
use crate::ui::components::status::StatusMessage;
use crate::ui::map_view::{self, MapAction, MapViewState};

const TICK: Duration = Duration::from_millis(100);

pub struct MapApp {
    state: MapViewState,
    feed: Arc<dyn ProjectFeed>,
    tx: UnboundedSender<(FetchTicket, AtlasResult<Vec<Project>>)>,
    rx: UnboundedReceiver<(FetchTicket, AtlasResult<Vec<Project>>)>,
}

impl MapApp {
    pub fn new(feed: Arc<dyn ProjectFeed>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: MapViewState::new(feed.describe(), Local::now().date_naive()),
            feed,
            tx,
            rx,
        }
    }

    fn load(&mut self) {
        let ticket = self.state.collection.begin_fetch();
        let feed = self.feed.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send((ticket, feed.load().await));
        });
    }

    fn loaded(&mut self, ticket: FetchTicket, result: AtlasResult<Vec<Project>>) {
        match self.state.complete_fetch(ticket, result) {
            FetchOutcome::Installed(count) => {
                info!(count, placed = self.state.markers().len(), "project feed loaded");
            }
            FetchOutcome::Failed(err) => {
                error!(source = %self.feed.describe(), error = %err, "error loading project feed");
                self.state
                    .status
                    .set(StatusMessage::error(format!("Error loading projects: {err}")));
            }
            FetchOutcome::Stale => {}
        }
    }
}

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut MapApp) -> Result<()> {
    app.load();

    loop {
        while let Ok((ticket, result)) = app.rx.try_recv() {
            app.loaded(ticket, result);
        }
        app.state.status.clear_expired(Instant::now());

        terminal.draw(|f| map_view::render_map_view(f, &app.state))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match map_view::handle_input(&mut app.state, key) {
                    Some(MapAction::Quit) => break,
                    Some(MapAction::Refresh) => app.load(),
                    None => {}
                }
            }
        }
    }

    Ok(())
}
