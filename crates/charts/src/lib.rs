//! Offline chart renderer for recorded experiment tables.
//!
//! A batch transform: two CSV inputs in, one static HTML dashboard out.
//! No simulation logic lives here.

pub mod csv;
pub mod dashboard;
pub mod discover;
pub mod error;

pub use error::{ChartsError, Result};
