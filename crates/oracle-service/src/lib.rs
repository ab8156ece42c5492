//! Query service for the bridge oracle.

pub mod api;
