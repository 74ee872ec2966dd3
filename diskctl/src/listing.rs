//! Fetched collections guarded against stale responses
//!
//! Every request for a listing takes a new generation number. A response is
//! applied only when it carries the generation that is still current, so an
//! answer to a superseded request is dropped instead of overwriting newer
//! state.

use crate::error::{ClientError, ClientResult};

/// Lifecycle of a listing
#[derive(Debug, Clone, PartialEq)]
pub enum ListingState {
    /// Never requested, or invalidated
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded
    Ready,
    /// The last request failed
    Failed(ClientError),
}

/// What a listing should display right now
#[derive(Debug, PartialEq)]
pub enum ListingView<'a, T> {
    Idle,
    Loading,
    /// Successful response with no items
    Empty,
    Items(&'a [T]),
    Failed(&'a ClientError),
}

impl<'a, T> ListingView<'a, T> {
    /// View of items that are already at hand
    pub fn of(items: &'a [T]) -> Self {
        if items.is_empty() {
            ListingView::Empty
        } else {
            ListingView::Items(items)
        }
    }
}

/// Outcome of applying a response to a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Items replaced
    Updated,
    /// Error recorded
    Failed,
    /// Response belonged to a superseded request and was ignored
    Stale,
}

/// A remote collection plus the generation of its latest request
#[derive(Debug, Clone)]
pub struct Listing<T> {
    items: Vec<T>,
    state: ListingState,
    generation: u64,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            state: ListingState::Idle,
            generation: 0,
        }
    }
}

impl<T> Listing<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the most recent request
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new request; previous items are no longer displayable
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.items.clear();
        self.state = ListingState::Loading;
        self.generation
    }

    /// Drop items and orphan any in-flight request
    pub fn reset(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.state = ListingState::Idle;
    }

    /// Apply the response to the request numbered `generation`
    pub fn finish(&mut self, generation: u64, result: ClientResult<Vec<T>>) -> Applied {
        if generation != self.generation || self.state != ListingState::Loading {
            return Applied::Stale;
        }

        match result {
            Ok(items) => {
                self.items = items;
                self.state = ListingState::Ready;
                Applied::Updated
            }
            Err(err) => {
                self.items.clear();
                self.state = ListingState::Failed(err);
                Applied::Failed
            }
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ListingState::Loading
    }

    pub fn error(&self) -> Option<&ClientError> {
        match &self.state {
            ListingState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn view(&self) -> ListingView<'_, T> {
        match &self.state {
            ListingState::Idle => ListingView::Idle,
            ListingState::Loading => ListingView::Loading,
            ListingState::Failed(err) => ListingView::Failed(err),
            ListingState::Ready if self.items.is_empty() => ListingView::Empty,
            ListingState::Ready => ListingView::Items(&self.items),
        }
    }
}
