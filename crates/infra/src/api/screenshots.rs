//! Screenshots client
//!
//! Uploads captured frames and reads the gallery listing back, newest
//! first, capped to the display limit.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use worklens_core::capture::ScreenshotSink;
use worklens_domain::constants::GALLERY_DISPLAY_LIMIT;
use worklens_domain::{NewScreenshot, Result, Screenshot};

use super::gateway::ApiGateway;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadScreenshotRequest<'a> {
    time_entry_id: &'a str,
    image_data: &'a str,
    timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScreenshotDto {
    id: String,
    time_entry_id: String,
    image_url: String,
    #[serde(default)]
    thumbnail_url: Option<String>,
    timestamp: DateTime<Utc>,
}

impl ScreenshotDto {
    fn into_domain(self) -> Screenshot {
        Screenshot {
            id: self.id,
            time_entry_id: self.time_entry_id,
            image_url: self.image_url,
            thumbnail_url: self.thumbnail_url,
            timestamp: self.timestamp,
        }
    }
}

/// Backend client for `/screenshots`
pub struct ScreenshotClient {
    gateway: Arc<ApiGateway>,
}

impl ScreenshotClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Gallery listing for one entry: newest first, capped for display
    pub async fn recent_for_entry(&self, time_entry_id: &str) -> Result<Vec<Screenshot>> {
        let screenshots: Vec<ScreenshotDto> =
            self.gateway.get(&format!("/screenshots/time-entry/{time_entry_id}")).await?;

        let mut screenshots: Vec<Screenshot> =
            screenshots.into_iter().map(ScreenshotDto::into_domain).collect();
        screenshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        screenshots.truncate(GALLERY_DISPLAY_LIMIT);
        Ok(screenshots)
    }
}

#[async_trait]
impl ScreenshotSink for ScreenshotClient {
    async fn upload(&self, screenshot: NewScreenshot) -> Result<Screenshot> {
        let request = UploadScreenshotRequest {
            time_entry_id: &screenshot.time_entry_id,
            image_data: &screenshot.image_base64,
            timestamp: screenshot.captured_at,
        };
        let stored: ScreenshotDto = self.gateway.post("/screenshots", &request).await?;
        Ok(stored.into_domain())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::auth::AccessTokenProvider;
    use super::super::errors::ApiError;
    use super::super::gateway::ApiGatewayConfig;
    use super::*;

    struct FixedToken;

    #[async_trait]
    impl AccessTokenProvider for FixedToken {
        async fn access_token(&self) -> std::result::Result<String, ApiError> {
            Ok("token-1".into())
        }
    }

    fn client(server: &MockServer) -> ScreenshotClient {
        let config = ApiGatewayConfig { base_url: server.uri(), ..Default::default() };
        let gateway = Arc::new(ApiGateway::new(config, Arc::new(FixedToken)).unwrap());
        ScreenshotClient::new(gateway)
    }

    fn shot_json(id: &str, minute: u32) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "timeEntryId": "t1",
            "imageUrl": format!("/shots/{id}.jpg"),
            "thumbnailUrl": format!("/shots/{id}_thumb.jpg"),
            "timestamp": format!("2024-01-01T10:{minute:02}:00Z")
        })
    }

    #[tokio::test]
    async fn upload_posts_the_tagged_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/screenshots"))
            .and(body_partial_json(serde_json::json!({
                "timeEntryId": "t1",
                "imageData": "aGVsbG8="
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(shot_json("s1", 0)))
            .expect(1)
            .mount(&server)
            .await;

        let stored = client(&server)
            .upload(NewScreenshot {
                time_entry_id: "t1".into(),
                image_base64: "aGVsbG8=".into(),
                captured_at: Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(stored.id, "s1");
        assert_eq!(stored.time_entry_id, "t1");
    }

    #[tokio::test]
    async fn gallery_listing_is_newest_first_and_capped() {
        let server = MockServer::start().await;
        // Eight screenshots in shuffled order; only the six newest survive
        let body: Vec<serde_json::Value> =
            [3u32, 7, 1, 8, 5, 2, 6, 4].iter().map(|m| shot_json(&format!("s{m}"), *m)).collect();
        Mock::given(method("GET"))
            .and(path("/screenshots/time-entry/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let screenshots = client(&server).recent_for_entry("t1").await.unwrap();

        assert_eq!(screenshots.len(), GALLERY_DISPLAY_LIMIT);
        let ids: Vec<&str> = screenshots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s8", "s7", "s6", "s5", "s4", "s3"]);
    }
}
