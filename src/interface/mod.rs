//! # Interface Layer
//!
//! Chat-facing handlers: the private-chat surface (application intake,
//! admin panel, review cycle), the group surface (XP, cups, panels) and
//! the keypad builders they share.

pub mod dm;
pub mod group;
pub mod keyboards;
