//! Data models for the upload server.
//!
//! Stored files carry no metadata beyond their on-disk name; these types are
//! the JSON shapes the handlers return.

pub mod stored_file;
