/// Cloud mirror of hole submissions.
pub mod mirror;
/// Persistence model definitions.
pub mod models;
/// Payment provider abstraction.
pub mod payments;
/// Photo object storage.
pub mod photos;
/// Local snapshot of the session collection.
pub mod snapshot;
/// Storage error shared by every backend.
pub mod storage;
/// Supabase database and storage client.
#[cfg(feature = "supabase")]
pub mod supabase;
