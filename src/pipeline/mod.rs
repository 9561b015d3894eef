//! Fetch, filter and summarise collections of records.
//!
//! Both front ends run the same pipeline over collections they own: a
//! [`Collection`] holds the last good snapshot, [`Criteria`] picks the
//! visible subset, and [`Summary`] describes the unfiltered whole.

pub mod collection;
pub mod elapsed;
pub mod filter;
pub mod format;
pub mod stats;

pub use collection::{Collection, FetchOutcome, FetchTicket};
pub use filter::{Criteria, Criterion, Filterable};
pub use stats::Summary;
