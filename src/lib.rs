//! Store integer intervals and serve point-containment queries from a single
//! serialized actor.
//!
//! # Overview
//!
//! An interval is an inclusive `[start, end]` range of integers tagged with a
//! float value and keyed by its start. Given a key, the store returns the
//! unique stored interval containing it, provided stored intervals do not
//! overlap (see [interval] for the exact contract). A store can be rebuilt on
//! demand by bulk-loading an escaped-text dump (see [dump]).
//!
//! The map itself is never shared: all requests are delivered through a
//! cloneable mailbox and processed one at a time, in arrival order, by a
//! single worker that owns the only copy (see [store]). Serialization by
//! construction replaces locking.

pub mod dump;
pub mod interval;
pub mod store;
