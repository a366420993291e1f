//! Human override workflow for automated governance decisions.
//!
//! A reviewer-facing state machine over decision entries:
//!
//!   (none) --request--> pending --review--> approved | rejected | cancelled
//!                         \-----cancel----> cancelled
//!
//! Every transition appends to the activity log and is applied
//! all-or-nothing.

pub mod ledger;
pub mod model;

pub use ledger::OverrideLedger;
