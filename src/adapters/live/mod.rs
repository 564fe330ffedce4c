//! Live adapters that talk to real services.

pub mod fetcher;
pub mod openai;
