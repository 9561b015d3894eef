use crate::error::{AtlasError, AtlasResult};

/// Identifies one fetch of a [`Collection`]. Tickets are issued in increasing
/// order and only the most recent one may install data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug)]
pub enum FetchOutcome {
    /// The snapshot was replaced; carries the new record count.
    Installed(usize),
    /// The fetch failed and the previous snapshot is still in place.
    Failed(AtlasError),
    /// A newer fetch was issued after this one; the response was dropped.
    Stale,
}

/// Snapshot of one record kind as of the last successful fetch.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    records: Vec<T>,
    issued: u64,
    loading: bool,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            issued: 0,
            loading: false,
        }
    }
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True from `begin_fetch` until the latest ticket completes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket(self.issued)
    }

    /// Apply the result of the fetch identified by `ticket`.
    pub fn complete(&mut self, ticket: FetchTicket, result: AtlasResult<Vec<T>>) -> FetchOutcome {
        if ticket.0 != self.issued {
            return FetchOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(records) => {
                self.records = records;
                FetchOutcome::Installed(self.records.len())
            }
            Err(err) => FetchOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn seeded(records: Vec<i32>) -> Collection<i32> {
        let mut collection = Collection::new();
        let ticket = collection.begin_fetch();
        collection.complete(ticket, Ok(records));
        collection
    }

    #[test]
    fn successful_fetch_replaces_snapshot() {
        let mut collection = seeded(vec![1, 2, 3]);
        let ticket = collection.begin_fetch();
        assert!(collection.is_loading());

        let outcome = collection.complete(ticket, Ok(vec![7]));

        assert!(matches!(outcome, FetchOutcome::Installed(1)));
        assert_eq!(collection.records(), &[7]);
        assert!(!collection.is_loading());
    }

    #[test]
    fn failed_fetch_keeps_previous_snapshot() {
        let mut collection = seeded(vec![1, 2, 3]);
        let ticket = collection.begin_fetch();

        let outcome = collection.complete(
            ticket,
            Err(AtlasError::status(StatusCode::BAD_GATEWAY, "Failed to load projects")),
        );

        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(collection.records(), &[1, 2, 3]);
        assert!(!collection.is_loading());
    }

    #[test]
    fn older_response_resolving_last_is_discarded() {
        let mut collection = Collection::new();
        let first = collection.begin_fetch();
        let second = collection.begin_fetch();

        assert!(matches!(collection.complete(second, Ok(vec!["fresh"])), FetchOutcome::Installed(1)));
        assert!(matches!(collection.complete(first, Ok(vec!["old", "older"])), FetchOutcome::Stale));

        assert_eq!(collection.records(), &["fresh"]);
    }

    #[test]
    fn loading_stays_on_until_latest_ticket_resolves() {
        let mut collection: Collection<u8> = Collection::new();
        let first = collection.begin_fetch();
        let second = collection.begin_fetch();

        collection.complete(first, Ok(vec![1]));
        assert!(collection.is_loading());
        assert!(collection.is_empty());

        collection.complete(second, Err(AtlasError::Validation("offline".into())));
        assert!(!collection.is_loading());
    }
}
