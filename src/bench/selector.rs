use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::args::Target;
use crate::error::ValidationError;

/// Lock-free cyclic cursor over a fixed, non-empty list.
#[derive(Debug)]
pub struct RoundRobin<T> {
    items: Vec<T>,
    cursor: AtomicUsize,
}

impl<T> RoundRobin<T> {
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn new(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            cursor: AtomicUsize::new(0),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns the item under the cursor with its index, then advances the
    /// cursor by one.
    pub fn next_item(&self) -> (usize, &T) {
        let len = self.items.len();
        let advance = |current: usize| {
            Some(
                current
                    .checked_add(1)
                    .and_then(|next| next.checked_rem(len))
                    .unwrap_or(0),
            )
        };
        let (Ok(index) | Err(index)) =
            self.cursor
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, advance);
        #[expect(
            clippy::indexing_slicing,
            reason = "the cursor is always reduced modulo the non-empty length"
        )]
        let item = &self.items[index];
        (index, item)
    }
}

/// Picks the FTP host for each new connection.
///
/// With one host every call returns it and nothing is counted. With several,
/// hosts are used in order, wrapping around, and every selection is counted.
#[derive(Debug)]
pub struct TargetSelector {
    targets: RoundRobin<Target>,
    counters: Option<Vec<AtomicU64>>,
}

impl TargetSelector {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyHostList`] when `targets` is empty.
    pub fn new(targets: Vec<Target>) -> Result<Self, ValidationError> {
        let counters = (targets.len() > 1).then(|| {
            targets
                .iter()
                .map(|_target| AtomicU64::new(0))
                .collect()
        });
        let targets = RoundRobin::new(targets).ok_or(ValidationError::EmptyHostList)?;
        Ok(Self { targets, counters })
    }

    pub fn next_target(&self) -> &Target {
        let (index, target) = self.targets.next_item();
        if let Some(counter) = self
            .counters
            .as_ref()
            .and_then(|counters| counters.get(index))
        {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        target
    }

    #[must_use]
    pub fn targets(&self) -> &[Target] {
        self.targets.items()
    }

    /// Selections per host, in host order; `None` for a single host.
    #[must_use]
    pub fn selection_counts(&self) -> Option<Vec<u64>> {
        self.counters.as_ref().map(|counters| {
            counters
                .iter()
                .map(|counter| counter.load(Ordering::Relaxed))
                .collect()
        })
    }

    /// Column labels for the per-host counters; empty for a single host.
    #[must_use]
    pub fn host_labels(&self) -> Vec<String> {
        if self.counters.is_none() {
            return Vec::new();
        }
        self.targets().iter().map(Target::address).collect()
    }
}
