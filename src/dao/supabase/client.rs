use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method};

use crate::dao::{
    mirror::{MirrorOrder, MirrorQuery, ScoreMirror},
    models::TeamScoreRecord,
    photos::{PhotoObject, PhotoStore},
    storage::StorageResult,
};

use super::{
    config::SupabaseConfig,
    error::{SupabaseError, SupabaseResult},
};

const PHOTO_CACHE_CONTROL: &str = "3600";

/// Thin REST client for the Supabase database and storage APIs.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: Arc<str>,
    anon_key: Arc<str>,
    photo_bucket: Arc<str>,
    scores_table: Arc<str>,
}

impl SupabaseClient {
    /// Build a client from its configuration. No request is issued.
    pub fn new(config: SupabaseConfig) -> SupabaseResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| SupabaseError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.url.trim_end_matches('/')),
            anon_key: Arc::from(config.anon_key),
            photo_bucket: Arc::from(config.photo_bucket),
            scores_table: Arc::from(config.scores_table),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client
            .request(method, url)
            .header("apikey", self.anon_key.as_ref())
            .bearer_auth(self.anon_key.as_ref())
    }

    fn table_path(&self) -> String {
        format!("rest/v1/{}", self.scores_table)
    }

    /// URL under which an uploaded object is publicly readable.
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.photo_bucket, key
        )
    }

    async fn insert(&self, record: TeamScoreRecord) -> SupabaseResult<()> {
        let path = self.table_path();
        let response = self
            .request(Method::POST, &path)
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .map_err(|source| SupabaseError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(SupabaseError::RequestStatus {
                path,
                status: response.status(),
            })
        }
    }

    async fn select(&self, query: MirrorQuery) -> SupabaseResult<Vec<TeamScoreRecord>> {
        let path = self.table_path();
        let response = self
            .request(Method::GET, &path)
            .query(&query_params(&query))
            .send()
            .await
            .map_err(|source| SupabaseError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SupabaseError::RequestStatus {
                path,
                status: response.status(),
            });
        }

        response
            .json::<Vec<TeamScoreRecord>>()
            .await
            .map_err(|source| SupabaseError::DecodeResponse { path, source })
    }

    async fn upload(&self, object: PhotoObject) -> SupabaseResult<String> {
        let path = format!("storage/v1/object/{}/{}", self.photo_bucket, object.key);
        let response = self
            .request(Method::POST, &path)
            .header("content-type", object.content_type)
            .header("cache-control", PHOTO_CACHE_CONTROL)
            .header("x-upsert", "false")
            .body(object.bytes)
            .send()
            .await
            .map_err(|source| SupabaseError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if response.status().is_success() {
            Ok(self.public_url(&object.key))
        } else {
            Err(SupabaseError::RequestStatus {
                path,
                status: response.status(),
            })
        }
    }
}

/// PostgREST query string for a [`MirrorQuery`].
fn query_params(query: &MirrorQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", "*".to_string())];
    if let Some(game_id) = &query.game_id {
        params.push(("game_id", format!("eq.{game_id}")));
    }
    if query.with_photo_only {
        params.push(("photo_url", "not.is.null".to_string()));
    }
    let order = match query.order {
        MirrorOrder::TimestampAscending => "timestamp.asc",
        MirrorOrder::TimestampDescending => "timestamp.desc",
        MirrorOrder::CreatedDescending => "created_at.desc",
    };
    params.push(("order", order.to_string()));
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    params
}

impl ScoreMirror for SupabaseClient {
    fn insert_score(&self, record: TeamScoreRecord) -> BoxFuture<'static, StorageResult<()>> {
        let client = self.clone();
        Box::pin(async move { client.insert(record).await.map_err(Into::into) })
    }

    fn fetch_scores(
        &self,
        query: MirrorQuery,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamScoreRecord>>> {
        let client = self.clone();
        Box::pin(async move { client.select(query).await.map_err(Into::into) })
    }
}

impl PhotoStore for SupabaseClient {
    fn put(&self, object: PhotoObject) -> BoxFuture<'static, StorageResult<String>> {
        let client = self.clone();
        Box::pin(async move { client.upload(object).await.map_err(Into::into) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_query_filters_and_orders_ascending() {
        let params = query_params(&MirrorQuery::for_game("abc"));
        assert_eq!(
            params,
            vec![
                ("select", "*".to_string()),
                ("game_id", "eq.abc".to_string()),
                ("order", "timestamp.asc".to_string()),
            ]
        );
    }

    #[test]
    fn photo_query_limits_and_requires_photo() {
        let params = query_params(&MirrorQuery::recent_photos(20));
        assert!(params.contains(&("photo_url", "not.is.null".to_string())));
        assert!(params.contains(&("order", "timestamp.desc".to_string())));
        assert!(params.contains(&("limit", "20".to_string())));
    }

    #[test]
    fn public_url_points_into_bucket() {
        let client =
            SupabaseClient::new(SupabaseConfig::new("https://demo.supabase.co/", "anon")).unwrap();
        assert_eq!(
            client.public_url("game/bar-1_1.jpg"),
            "https://demo.supabase.co/storage/v1/object/public/team-photos/game/bar-1_1.jpg"
        );
    }
}
