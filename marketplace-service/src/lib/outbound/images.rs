use async_trait::async_trait;
use serde::Deserialize;

use crate::car::errors::CarError;
use crate::car::models::ImageUpload;
use crate::car::ports::ImageStore;
use crate::config::ImageStoreConfig;

/// Blob-upload client for listing images.
///
/// Posts the image as a multipart form to the configured host and returns
/// the public URL from its JSON response. Constraint checks (content type,
/// size) happen upstream in `ImageUpload`; by the time bytes arrive here
/// they are acceptable.
pub struct HttpImageStore {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

impl HttpImageStore {
    pub fn new(config: &ImageStoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: config.upload_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<String, CarError> {
        let content_type = image.content_type().to_string();

        let part = reqwest::multipart::Part::bytes(image.into_bytes())
            .file_name("listing-image")
            .mime_str(&content_type)
            .map_err(|e| CarError::ImageStoreUnavailable(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CarError::ImageStoreUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CarError::ImageStoreUnavailable(format!(
                "Image host returned status {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| CarError::ImageStoreUnavailable(e.to_string()))?;

        Ok(body.url)
    }
}
