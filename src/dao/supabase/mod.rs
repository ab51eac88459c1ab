mod client;
mod config;
mod error;

pub use client::SupabaseClient;
pub use config::SupabaseConfig;
pub use error::{SupabaseError, SupabaseResult};
