use super::error::{SupabaseError, SupabaseResult};

const DEFAULT_PHOTO_BUCKET: &str = "team-photos";
const DEFAULT_SCORES_TABLE: &str = "team_scores";

/// Runtime configuration describing how to reach the Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, without trailing slash.
    pub url: String,
    /// Public anon key sent as `apikey` and bearer token.
    pub anon_key: String,
    /// Storage bucket receiving hole photos.
    pub photo_bucket: String,
    /// PostgREST table holding mirrored team scores.
    pub scores_table: String,
}

impl SupabaseConfig {
    /// Construct a configuration from the project URL and its anonymous key.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            photo_bucket: DEFAULT_PHOTO_BUCKET.to_string(),
            scores_table: DEFAULT_SCORES_TABLE.to_string(),
        }
    }

    /// Store photos in another bucket.
    pub fn with_photo_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.photo_bucket = bucket.into();
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> SupabaseResult<Self> {
        let url = read_var("SUPABASE_URL")?;
        let anon_key = read_var("SUPABASE_ANON_KEY")?;

        let mut config = Self::new(url, anon_key);
        if let Some(bucket) = std::env::var("SUPABASE_PHOTO_BUCKET")
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            config = config.with_photo_bucket(bucket);
        }

        Ok(config)
    }
}

fn read_var(var: &'static str) -> SupabaseResult<String> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(SupabaseError::MissingEnvVar { var })
}
