//! Domain model of the flagforge CTF scoring engine.
//!
//! Everything in here is storage-agnostic: value types that validate on
//! construction, the point award rule, and the pure aggregations that turn a
//! ledger of correct submissions into solver lists, a ranked scoreboard and
//! per-user stats.

pub mod domain;
