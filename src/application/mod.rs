//! # Application Layer
//!
//! The event-routing and conversation-state core: predicate algebra,
//! handler registry with broadcast dispatch, the polling loop, the
//! context store, the form model for application intake, the leveling
//! curve and the rate-limit guard.

pub mod context;
pub mod dispatcher;
pub mod form;
pub mod guard;
pub mod leveling;
pub mod poller;
pub mod predicate;
