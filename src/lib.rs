//! First-aid assistant conversation service.
//!
//! A single conversation session backed by the Gemini `generateContent` API,
//! exposed over a small JSON HTTP surface.

pub mod agent;
pub mod config;
pub mod errors;
pub mod models;
pub mod notify;
pub mod routes;
pub mod service;
pub mod store;
