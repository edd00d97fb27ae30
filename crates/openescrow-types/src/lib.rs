//! # openescrow-types
//!
//! Shared types, errors, and configuration for the **OpenEscrow** custody
//! engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`EscrowId`], [`AccountId`]
//! - **Record model**: [`Escrow`], [`EscrowState`]
//! - **Batch model**: [`EscrowSpec`], [`BatchCreateOutcome`], [`EscrowBatchView`]
//! - **Events**: [`EscrowEvent`]
//! - **Configuration**: [`EscrowConfig`]
//! - **Clock**: [`Clock`], [`SystemClock`]
//! - **Errors**: [`EscrowError`] with `ES_ERR_` prefix codes
//! - **Constants**: reference policy defaults

pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod escrow;
pub mod event;
pub mod ids;
pub mod time;

// Re-export all primary types at crate root for ergonomic imports:
//   use openescrow_types::{Escrow, EscrowState, EscrowError, ...};

pub use batch::*;
pub use config::*;
pub use error::*;
pub use escrow::*;
pub use event::*;
pub use ids::*;
pub use time::*;

// Constants are accessed via `openescrow_types::constants::FOO`
// (not re-exported to avoid name collisions).
