//! Serve interval inserts, point-containment matches, and bulk dump loads
//! from a single serialized actor.
//!
//! The [Actor] owns the only [IntervalMap](crate::interval::IntervalMap) and
//! drains a bounded mailbox one request at a time, so no two requests ever
//! observe or mutate the map concurrently and no lock guards it. Callers may
//! hold [Mailbox] clones on any number of tasks; requests are processed in
//! arrival order. A load holds the actor for its entire duration, and queued
//! requests wait behind it.
//!
//! Validation failures are replies, not faults: a malformed add is answered
//! with [AddOutcome::Malformed] without touching the map, a dump whose field
//! fails conversion is answered with [LoadOutcome::ParseFailed] (entries
//! applied before the bad field remain visible; loads are not atomic and are
//! not rolled back), and an unrecognized payload is echoed back. The actor
//! keeps serving after all of them.
//!
//! # Example
//!
//! ```
//! use futures::{executor::block_on, join};
//! use prometheus_client::registry::Registry;
//! use rangestore::store::{Actor, Config, MatchOutcome};
//!
//! let mut registry = Registry::default();
//! let (actor, mut mailbox) = Actor::new(Config::default(), &mut registry);
//! block_on(async move {
//!     let requests = async move {
//!         mailbox.add(1, 5, 3.14).await.unwrap();
//!         let outcome = mailbox.match_key(3).await.unwrap();
//!         assert!(matches!(outcome, MatchOutcome::Matched { value, .. } if value == 3.14));
//!         mailbox.stop().await.unwrap();
//!     };
//!     join!(actor.run(), requests);
//! });
//! ```

mod actor;
pub use actor::Actor;
mod ingress;
pub use ingress::{Mailbox, Message};

use crate::dump;
use thiserror::Error;

/// Configuration for the store actor.
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of requests to buffer before senders wait.
    pub mailbox_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { mailbox_size: 64 }
    }
}

/// Errors delivering a request to the actor.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The actor stopped or was dropped.
    #[error("mailbox closed")]
    Closed,
    /// The actor dropped the response handle.
    #[error("request cancelled")]
    Cancelled,
}

/// Reply to [Mailbox::add].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AddOutcome {
    /// The interval was inserted.
    Added { start: i64, end: i64, value: f64 },
    /// The request failed validation; the map was not touched.
    Malformed { start: i64, end: i64, value: f64 },
}

/// Reply to [Mailbox::match_key].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatchOutcome {
    /// A stored interval contains the key.
    Matched {
        key: i64,
        start: i64,
        end: i64,
        value: f64,
    },
    /// No stored interval contains the key.
    Missed { key: i64 },
}

/// Reply to [Mailbox::load].
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    /// The whole dump was applied.
    Loaded { label: String, applied: usize },
    /// A field failed conversion; entries applied before it remain.
    ParseFailed { label: String, failure: dump::Failure },
}
