//! Screening Engine
//!
//! Screens names against an atomically swappable snapshot of the sanctions
//! and PEP lists, and keeps that snapshot fresh on a schedule.

pub mod cache;
pub mod engine;
pub mod schedule;
pub mod scheduler;

pub use cache::{IndexedEntry, Snapshot, WatchlistCache};
pub use engine::ScreeningEngine;
pub use schedule::RefreshSchedule;
pub use scheduler::{RefreshHandle, RefreshScheduler};
