//! Pure domain logic for the draftline versioning engine.
//!
//! Everything in this crate is synchronous and I/O-free: the diff engine,
//! similarity scoring, the auto-save policy, and shared validation limits.
//! Persistence and orchestration live in `draftline-db` and
//! `draftline-service`.

pub mod autosave;
pub mod diff;
pub mod error;
pub mod similarity;
pub mod types;
pub mod versioning;
