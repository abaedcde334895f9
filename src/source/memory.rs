//! Scripted in-memory image source.
//!
//! Replays a queue of canned responses and records every request it
//! receives. Once the script runs dry it reports end of results.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{FetchError, ImageSource, PageRequest, PageResult};
use crate::gallery::{Dimensions, ImageItem};

#[derive(Debug, Default)]
pub struct MemorySource {
    script: Mutex<VecDeque<Result<PageResult, FetchError>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unanswered request.
    #[must_use]
    pub fn with_response(self, response: Result<PageResult, FetchError>) -> Self {
        self.push_response(response);
        self
    }

    /// Queue a non-final page of items.
    #[must_use]
    pub fn with_page(self, items: Vec<ImageItem>) -> Self {
        self.with_response(Ok(PageResult::new(items, false)))
    }

    pub fn push_response(&self, response: Result<PageResult, FetchError>) {
        lock(&self.script).push_back(response);
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<PageRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl ImageSource for MemorySource {
    fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, FetchError> {
        lock(&self.requests).push(request.clone());
        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| Ok(PageResult::end()))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// `count` items with ids `first..first + count`, cycling through a few
/// landscape, portrait and square shapes.
pub fn sample_items(first: u64, count: usize) -> Vec<ImageItem> {
    const SHAPES: [(u32, u32); 4] = [(1600, 1067), (1067, 1600), (1200, 1200), (1920, 1080)];
    (first..)
        .take(count)
        .map(|id| {
            #[allow(clippy::cast_possible_truncation)]
            let (width, height) = SHAPES[(id % SHAPES.len() as u64) as usize];
            ImageItem::new(id, format!("https://images.test/photos/{id}.jpeg"))
                .with_alt(format!("Sample photo {id}"))
                .with_dimensions(Dimensions::new(width, height))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_script_then_ends() {
        let source = MemorySource::new()
            .with_page(sample_items(1, 2))
            .with_response(Err(FetchError::Transient("timeout".into())));

        let first = source.fetch_page(&PageRequest::new("q", 1, 2)).unwrap();
        assert_eq!(first.items.len(), 2);
        assert!(source.fetch_page(&PageRequest::new("q", 2, 2)).is_err());
        assert!(
            source
                .fetch_page(&PageRequest::new("q", 2, 2))
                .unwrap()
                .is_terminal()
        );
        assert_eq!(source.request_count(), 3);
        assert_eq!(source.requests()[1].page, 2);
    }

    #[test]
    fn test_sample_items_have_sequential_ids() {
        let items = sample_items(10, 3);
        let ids: Vec<_> = items.iter().map(|i| i.id().to_string()).collect();
        assert_eq!(ids, vec!["10", "11", "12"]);
    }
}
