//! PostgreSQL activity probe for dbwatch
//!
//! Lists the client sessions bound to the watched database by reading
//! `pg_stat_activity`. A fresh connection is opened for every poll and
//! closed right after; nothing is shared between polls.

mod postgres;

pub use postgres::*;
