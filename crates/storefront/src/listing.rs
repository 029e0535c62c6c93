//! # Listing Controller
//!
//! The state a listing page renders from: idle, loading, a page of results, or
//! a failure with the controls it should show.
//!
//! Requests are not cancelled when the user changes filters. Instead every
//! [`ListingController::begin`] hands out a new [`Ticket`], and
//! [`ListingController::complete`] drops results carrying an older one. A slow
//! response for an abandoned query can arrive late without clobbering the page.

use crate::error::{Result, StoreError};
use crate::query::{ListQuery, QueryResult};

/// Identifies one request issued by a controller. Only the latest is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

/// What a failed listing should offer the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFailure {
    pub message: String,
    /// Show a retry control.
    pub retryable: bool,
    /// The session lost admin rights; navigate out of the admin area.
    pub leave_admin: bool,
    /// For validation failures, the offending field.
    pub field: Option<&'static str>,
}

impl From<&StoreError> for ListingFailure {
    fn from(err: &StoreError) -> Self {
        Self {
            message: err.to_string(),
            retryable: !err.is_client_error(),
            leave_admin: matches!(err, StoreError::Permission(_)),
            field: match err {
                StoreError::Validation { field, .. } => Some(*field),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingState<E> {
    Idle,
    Loading { ticket: Ticket },
    Ready(QueryResult<E>),
    Failed(ListingFailure),
}

impl<E> ListingState<E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

pub struct ListingController<E> {
    issued: u64,
    query: Option<ListQuery>,
    state: ListingState<E>,
}

impl<E> Default for ListingController<E> {
    fn default() -> Self {
        Self {
            issued: 0,
            query: None,
            state: ListingState::Idle,
        }
    }
}

impl<E> ListingController<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ListingState<E> {
        &self.state
    }

    /// The query of the most recent request.
    pub fn query(&self) -> Option<&ListQuery> {
        self.query.as_ref()
    }

    /// Start a request for `query`. Any earlier ticket becomes stale.
    pub fn begin(&mut self, query: ListQuery) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.query = Some(query);
        self.state = ListingState::Loading { ticket };
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Apply the outcome of `ticket`'s request. Returns false (and changes
    /// nothing) when the ticket is stale.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<QueryResult<E>>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, current = self.issued, "discarding stale result");
            return false;
        }
        self.state = match outcome {
            Ok(result) => ListingState::Ready(result),
            Err(err) => ListingState::Failed(ListingFailure::from(&err)),
        };
        true
    }

    /// Re-issue the last query under a fresh ticket.
    pub fn retry(&mut self) -> Option<(Ticket, ListQuery)> {
        let query = self.query.clone()?;
        let ticket = self.begin(query.clone());
        Some((ticket, query))
    }

    pub fn failure(&self) -> Option<&ListingFailure> {
        match &self.state {
            ListingState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&QueryResult<E>> {
        match &self.state {
            ListingState::Ready(result) => Some(result),
            _ => None,
        }
    }
}
