use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info};

use crate::app::Dialogs;
use crate::error::StoreError;
use crate::models::{Link, LinkForm};
use crate::store::{Backend, LinkStore};

/// How long the submit button shows its success label before the form resets.
pub const FLASH_DURATION: Duration = Duration::from_secs(2);

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this link?";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormState {
    Idle,
    /// A record is staged; the next submit overwrites it.
    Editing(i64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submitted {
    Added(i64),
    Updated(i64),
    /// The staged record disappeared before submit. Nothing was changed or saved.
    Vanished(i64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deleted {
    Cancelled,
    /// Saved after removal. `existed` is false when the id was not in the list.
    Removed { id: i64, existed: bool },
}

#[derive(Clone, Copy, Debug)]
struct Flash {
    label: &'static str,
    until: Instant,
}

/// Drives the add/edit form and the delete buttons of the admin panel.
#[derive(Debug)]
pub struct FormController {
    state: FormState,
    fields: LinkForm,
    flash: Option<Flash>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            state: FormState::Idle,
            fields: LinkForm::default(),
            flash: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Current contents of the form.
    pub fn fields(&self) -> &LinkForm {
        &self.fields
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.flash, self.state) {
            (Some(flash), _) => flash.label,
            (None, FormState::Editing(_)) => "Update Link",
            (None, FormState::Idle) => "Add Link",
        }
    }

    /// Copies `link` into the form and stages it for update.
    pub fn begin_edit(&mut self, link: &Link) {
        self.fields = LinkForm::from(link);
        self.state = FormState::Editing(link.id);
        self.flash = None;
    }

    /// Back to an empty, idle form.
    pub fn reset(&mut self) {
        self.state = FormState::Idle;
        self.fields = LinkForm::default();
        self.flash = None;
    }

    /// Clears an expired success label and the form with it.
    pub fn tick(&mut self, now: Instant) {
        if let Some(flash) = self.flash {
            if now >= flash.until {
                self.flash = None;
                self.fields = LinkForm::default();
            }
        }
    }

    /// Adds a new record when idle, or overwrites the staged one when editing.
    ///
    /// A failed save is returned as is. The list keeps the change and an
    /// edit stays staged so the user can submit again.
    pub async fn submit<B: Backend>(
        &mut self,
        store: &mut LinkStore<B>,
        form: LinkForm,
        now: Instant,
    ) -> Result<Submitted, StoreError> {
        self.fields = form.clone();

        match self.state {
            FormState::Idle => {
                let id = next_id(store.links());
                store.push(Link::from_form(id, form));
                store.save().await?;
                info!("Added link {id}");
                self.flash(now, "Link Added!");
                Ok(Submitted::Added(id))
            }
            FormState::Editing(id) => {
                if !store.replace(Link::from_form(id, form)) {
                    debug!("Link {id} is gone, ignoring update");
                    self.state = FormState::Idle;
                    return Ok(Submitted::Vanished(id));
                }
                store.save().await?;
                info!("Updated link {id}");
                self.state = FormState::Idle;
                self.flash(now, "Link Updated!");
                Ok(Submitted::Updated(id))
            }
        }
    }

    /// Asks for confirmation, then removes `id` and saves. Removal sticks even
    /// if the save fails.
    pub async fn delete<B: Backend>(
        &mut self,
        store: &mut LinkStore<B>,
        dialogs: &dyn Dialogs,
        id: i64,
    ) -> Result<Deleted, StoreError> {
        if !dialogs.confirm(DELETE_PROMPT) {
            return Ok(Deleted::Cancelled);
        }

        let existed = store.remove(id);
        store.save().await?;
        info!("Deleted link {id}");
        Ok(Deleted::Removed { id, existed })
    }

    fn flash(&mut self, now: Instant, label: &'static str) {
        self.flash = Some(Flash {
            label,
            until: now + FLASH_DURATION,
        });
    }
}

/// Millisecond timestamp, bumped past the largest existing id if the clock
/// has not moved beyond it. When that id is `i64::MAX` the first free id
/// from now on is used instead.
pub fn next_id(links: &[Link]) -> i64 {
    let now = Utc::now().timestamp_millis();
    match links.iter().map(|link| link.id).max() {
        Some(max) if max >= now => max.checked_add(1).unwrap_or_else(|| {
            let taken: HashSet<i64> = links.iter().map(|link| link.id).collect();
            (now..=i64::MAX).find(|id| !taken.contains(id)).unwrap_or(now)
        }),
        _ => now,
    }
}
