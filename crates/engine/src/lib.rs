//! Reconciliation engine keeping the local movie library consistent with
//! a remote media catalog.
//!
//! One logical movie fans out into a dozen local tables (file, path,
//! ratings, unique ids, people, genres, studios, countries, tags, artwork,
//! sets, resume state). Each sync call either inserts the full fan-out or
//! replaces it wholesale, and removal walks every associated table so no
//! orphans remain. The identity-mapping row is always committed last so a
//! mapping entry never points at partially-written data.

pub mod collections;
pub mod config;
pub mod identity;
pub mod movies;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}
