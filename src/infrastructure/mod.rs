//! # Infrastructure Layer
//!
//! Concrete collaborators behind the domain seams: the HTTP bot-API
//! client implementing [`crate::domain::traits::Transport`], and the
//! JSON-file storage service for durable collections.

pub mod chat_api;
pub mod storage;
