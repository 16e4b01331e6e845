//! HTTP route handlers

pub mod adapt;
pub mod generate;
pub mod profile;
pub mod sessions;
pub mod sets;
