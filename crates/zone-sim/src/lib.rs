//! HTTP surface for one synthetic zone backend.

pub mod app;
