//! The link page as a state machine driven by named UI actions.
//!
//! Each action runs to completion before the next one is taken, including
//! the single save round-trip a mutation needs. Blocking browser dialogs are
//! provided by a [`Dialogs`] implementation.

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::EventError;
use crate::form::{Deleted, FormController, Submitted};
use crate::gate::{AdminGate, GateOutcome};
use crate::models::{Link, LinkForm};
use crate::render::{render_expanded, render_link_list, render_links, AdminList};
use crate::search::filter;
use crate::store::{Backend, LinkStore};

pub const LOAD_FAILED: &str = "Error loading links. Please check console for details.";
pub const SAVE_FAILED: &str = "Error saving links. Please check console for details.";
pub const DELETE_SAVE_FAILED: &str = "Failed to save changes after deletion";
pub const PASSWORD_PROMPT: &str = "Enter admin password:";
pub const WRONG_PASSWORD: &str = "❌ Incorrect password!";

/// Modal dialogs shown to the user.
pub trait Dialogs {
    fn alert(&self, message: &str);

    fn confirm(&self, message: &str) -> bool;

    /// `None` when the prompt is dismissed.
    fn prompt(&self, message: &str) -> Option<String>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdminTab {
    AddLink,
    ManageLinks,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Search(String),
    Submit(LinkForm),
    Edit(i64),
    Delete(i64),
    OpenAdmin,
    CloseAdmin,
    Tab(AdminTab),
    OpenCard(i64),
    CloseCard,
}

/// Names accepted by [`UiEvent::from_action`].
pub const ACTIONS: &[&str] = &[
    "search",
    "submit",
    "edit",
    "delete",
    "open-admin",
    "close-admin",
    "tab",
    "open-card",
    "close-card",
];

impl UiEvent {
    pub fn from_action(action: &str, payload: Value) -> Result<UiEvent, EventError> {
        let event = match action {
            "search" => UiEvent::Search(payload_as(action, payload)?),
            "submit" => UiEvent::Submit(payload_as(action, payload)?),
            "edit" => UiEvent::Edit(payload_as(action, payload)?),
            "delete" => UiEvent::Delete(payload_as(action, payload)?),
            "open-admin" => UiEvent::OpenAdmin,
            "close-admin" => UiEvent::CloseAdmin,
            "tab" => UiEvent::Tab(payload_as(action, payload)?),
            "open-card" => UiEvent::OpenCard(payload_as(action, payload)?),
            "close-card" => UiEvent::CloseCard,
            _ => return Err(EventError::UnknownAction(action.to_string())),
        };
        Ok(event)
    }
}

fn payload_as<T: DeserializeOwned>(action: &str, payload: Value) -> Result<T, EventError> {
    serde_json::from_value(payload).map_err(|source| EventError::Payload {
        action: action.to_string(),
        source,
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminPanel {
    pub tab: AdminTab,
    pub list: AdminList,
}

/// What is currently on screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct View {
    pub grid: String,
    pub admin: Option<AdminPanel>,
    pub expanded: Option<String>,
}

pub struct App<B, D> {
    store: LinkStore<B>,
    form: FormController,
    gate: AdminGate,
    dialogs: D,
    search: String,
    view: View,
}

impl<B: Backend, D: Dialogs> App<B, D> {
    pub fn new(store: LinkStore<B>, gate: AdminGate, dialogs: D) -> Self {
        Self {
            store,
            form: FormController::new(),
            gate,
            dialogs,
            search: String::new(),
            view: View::default(),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn store(&self) -> &LinkStore<B> {
        &self.store
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    /// Loads the collection and draws the grid. A failed load leaves an empty
    /// grid and alerts the user.
    pub async fn start(&mut self) {
        if self.store.load().await.is_err() {
            self.dialogs.alert(LOAD_FAILED);
        }
        self.render();
    }

    /// Parses and runs a named action.
    pub async fn dispatch_action(&mut self, action: &str, payload: Value) -> Result<(), EventError> {
        let event = UiEvent::from_action(action, payload)?;
        self.dispatch(event).await;
        Ok(())
    }

    pub async fn dispatch(&mut self, event: UiEvent) {
        debug!("Dispatching {event:?}");
        match event {
            UiEvent::Search(term) => {
                self.search = term;
                self.render_grid();
            }
            UiEvent::OpenCard(id) => {
                if let Some(link) = self.store.get(id) {
                    self.view.expanded = Some(render_expanded(link));
                }
            }
            UiEvent::CloseCard => self.view.expanded = None,
            UiEvent::OpenAdmin => self.open_admin(),
            UiEvent::CloseAdmin => {
                self.view.admin = None;
                self.form.reset();
            }
            event if self.view.admin.is_none() => {
                warn!("Ignoring {event:?} while the admin panel is closed");
            }
            UiEvent::Tab(tab) => self.set_tab(tab),
            UiEvent::Edit(id) => {
                if let Some(link) = self.store.get(id) {
                    self.form.begin_edit(link);
                    self.set_tab(AdminTab::AddLink);
                }
            }
            UiEvent::Submit(form) => self.submit(form).await,
            UiEvent::Delete(id) => self.delete(id).await,
        }
    }

    /// Expires the submit button's success label.
    pub fn tick(&mut self, now: Instant) {
        self.form.tick(now);
    }

    fn open_admin(&mut self) {
        let answer = self.dialogs.prompt(PASSWORD_PROMPT);
        match self.gate.check(answer.as_deref()) {
            GateOutcome::Opened => {
                self.view.admin = Some(AdminPanel {
                    tab: AdminTab::AddLink,
                    list: render_link_list(self.store.links()),
                });
            }
            GateOutcome::Refused => self.dialogs.alert(WRONG_PASSWORD),
            GateOutcome::Cancelled => {}
        }
    }

    fn set_tab(&mut self, tab: AdminTab) {
        if let Some(admin) = self.view.admin.as_mut() {
            admin.tab = tab;
        }
    }

    async fn submit(&mut self, form: LinkForm) {
        match self.form.submit(&mut self.store, form, Instant::now()).await {
            Ok(Submitted::Added(_)) | Ok(Submitted::Updated(_)) => self.render(),
            Ok(Submitted::Vanished(_)) => {}
            Err(_) => self.dialogs.alert(SAVE_FAILED),
        }
    }

    async fn delete(&mut self, id: i64) {
        match self.form.delete(&mut self.store, &self.dialogs, id).await {
            Ok(Deleted::Removed { .. }) => self.render(),
            Ok(Deleted::Cancelled) => {}
            Err(_) => {
                self.dialogs.alert(SAVE_FAILED);
                self.dialogs.alert(DELETE_SAVE_FAILED);
            }
        }
    }

    /// Redraws after a load or a saved mutation. The grid shows the whole
    /// list again even if a search term is still typed in.
    fn render(&mut self) {
        let all: Vec<&Link> = self.store.links().iter().collect();
        self.view.grid = render_links(&all);
        if let Some(admin) = self.view.admin.as_mut() {
            admin.list = render_link_list(self.store.links());
        }
    }

    fn render_grid(&mut self) {
        let shown = filter(self.store.links(), &self.search);
        self.view.grid = render_links(&shown);
    }
}
