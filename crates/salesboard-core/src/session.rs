//! Ephemeral dashboard state: the active filter, the inspected record and the
//! expanded contact inside it.

use serde::{Deserialize, Serialize};

use crate::{filter_records, parse_criterion, Category, DashboardError, DashboardRecord};

/// At most one inspected record plus, inside it, at most one expanded
/// sub-record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Selection {
    selected_id: Option<String>,
    expanded_contact_id: Option<String>,
}

impl Selection {
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    #[must_use]
    pub fn expanded_contact_id(&self) -> Option<&str> {
        self.expanded_contact_id.as_deref()
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id.as_deref() == Some(id)
    }

    /// Selects `id`. Re-selecting the current record keeps its expanded
    /// contact; any other record starts collapsed.
    pub fn select(&mut self, id: &str) {
        if !self.is_selected(id) {
            self.expanded_contact_id = None;
        }
        self.selected_id = Some(id.to_string());
    }

    pub fn close(&mut self) {
        self.selected_id = None;
        self.expanded_contact_id = None;
    }

    /// Expands `contact_id`, or collapses it when it is already expanded.
    /// Returns whether the contact is expanded afterwards.
    pub fn toggle_contact(&mut self, contact_id: &str) -> bool {
        if self.expanded_contact_id.as_deref() == Some(contact_id) {
            self.expanded_contact_id = None;
            false
        } else {
            self.expanded_contact_id = Some(contact_id.to_string());
            true
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SessionAction<C> {
    SetFilter(Option<C>),
    Select(String),
    Close,
    ToggleContact(String),
}

impl<C: Category> SessionAction<C> {
    /// Parses `filter:<label|all>`, `select:<id>`, `close` or
    /// `expand:<contact-id>`.
    ///
    /// # Errors
    /// Returns [`DashboardError::InvalidAction`] for unknown verbs or missing
    /// arguments, and [`DashboardError::Validation`] for unknown filter labels.
    pub fn parse(raw: &str) -> Result<Self, DashboardError> {
        let trimmed = raw.trim();
        let (verb, argument) = match trimmed.split_once(':') {
            Some((verb, argument)) => (verb.trim(), Some(argument.trim())),
            None => (trimmed, None),
        };

        match (verb.to_ascii_lowercase().as_str(), argument) {
            ("close", None) => Ok(Self::Close),
            ("filter", Some(value)) if !value.is_empty() => {
                Ok(Self::SetFilter(parse_criterion(value)?))
            }
            ("select", Some(id)) if !id.is_empty() => Ok(Self::Select(id.to_string())),
            ("expand", Some(id)) if !id.is_empty() => Ok(Self::ToggleContact(id.to_string())),
            _ => Err(DashboardError::InvalidAction(format!(
                "`{raw}` (expected filter:<value>, select:<id>, close or expand:<contact-id>)"
            ))),
        }
    }
}

/// A dashboard view over an immutable record collection.
#[derive(Debug)]
pub struct DashboardSession<'a, R: DashboardRecord> {
    records: &'a [R],
    filter: Option<R::Category>,
    selection: Selection,
}

impl<'a, R: DashboardRecord> DashboardSession<'a, R> {
    #[must_use]
    pub fn new(records: &'a [R]) -> Self {
        Self {
            records,
            filter: None,
            selection: Selection::default(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &'a [R] {
        self.records
    }

    #[must_use]
    pub fn filter(&self) -> Option<R::Category> {
        self.filter
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Changing the filter never clears the selection.
    pub fn set_filter(&mut self, criterion: Option<R::Category>) {
        tracing::debug!(
            filter = criterion.map_or("all", Category::as_str),
            "dashboard filter changed"
        );
        self.filter = criterion;
    }

    /// Only records in the visible subset can be selected.
    ///
    /// # Errors
    /// Returns [`DashboardError::NotFound`] when no record has `id` and
    /// [`DashboardError::InvalidAction`] when the active filter hides it.
    pub fn select(&mut self, id: &str) -> Result<(), DashboardError> {
        let Some(record) = self.records.iter().find(|record| record.id() == id) else {
            return Err(DashboardError::NotFound(format!("record `{id}`")));
        };
        if let Some(criterion) = self.filter {
            if record.category() != criterion {
                return Err(DashboardError::InvalidAction(format!(
                    "record `{id}` is hidden by filter `{}`",
                    criterion.label()
                )));
            }
        }
        tracing::debug!(record_id = id, "record selected");
        self.selection.select(id);
        Ok(())
    }

    pub fn close(&mut self) {
        tracing::debug!("selection closed");
        self.selection.close();
    }

    /// # Errors
    /// Returns [`DashboardError::InvalidAction`] when nothing is selected and
    /// [`DashboardError::NotFound`] when the selected record has no such
    /// contact.
    pub fn toggle_contact(&mut self, contact_id: &str) -> Result<bool, DashboardError> {
        let Some(record) = self.selected() else {
            return Err(DashboardError::InvalidAction(format!(
                "cannot expand `{contact_id}` without a selected record"
            )));
        };
        if !record.has_sub_record(contact_id) {
            return Err(DashboardError::NotFound(format!(
                "contact `{contact_id}` on record `{}`",
                record.id()
            )));
        }

        let expanded = self.selection.toggle_contact(contact_id);
        tracing::debug!(contact_id, expanded, "contact toggled");
        Ok(expanded)
    }

    /// # Errors
    /// Propagates the error of the dispatched operation.
    pub fn apply(&mut self, action: SessionAction<R::Category>) -> Result<(), DashboardError> {
        match action {
            SessionAction::SetFilter(criterion) => {
                self.set_filter(criterion);
                Ok(())
            }
            SessionAction::Select(id) => self.select(&id),
            SessionAction::Close => {
                self.close();
                Ok(())
            }
            SessionAction::ToggleContact(contact_id) => {
                self.toggle_contact(&contact_id).map(|_| ())
            }
        }
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&'a R> {
        filter_records(self.records, self.filter)
    }

    /// The selected record, looked up in the full collection.
    #[must_use]
    pub fn selected(&self) -> Option<&'a R> {
        let id = self.selection.selected_id()?;
        self.records.iter().find(|record| record.id() == id)
    }

    /// The selected record if the active filter still shows it.
    #[must_use]
    pub fn detail(&self) -> Option<&'a R> {
        self.selected().filter(|record| {
            self.filter
                .map_or(true, |criterion| record.category() == criterion)
        })
    }
}
