//! Agri-Scout - crop issue diagnosis from field photos
//!
//! Accepts a photo and free-text field notes, asks a multimodal model for a
//! diagnosis, and returns it only after it has been repaired, parsed, and
//! validated against a fixed schema. Any failure past input validation comes
//! back with a fixed fallback diagnosis attached.

pub mod ai;
pub mod analysis;
pub mod error;
pub mod http;
pub mod image;
pub mod models;
pub mod prompts;

pub use error::{Error, Result};
