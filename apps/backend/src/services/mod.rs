//! Backend services

pub mod adapter;
pub mod llm;
pub mod sessions;
