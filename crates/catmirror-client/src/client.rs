//! HTTP client for the remote catalog REST API.
//!
//! Every call is a single request: nothing here retries. Non-2xx responses are
//! turned into [`ClientError::NotFound`] or [`ClientError::UnexpectedStatus`]
//! with the response body preserved, so callers can show the remote's own
//! validation messages.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;
use crate::types::{ProductFilter, ProductPayload, UploadResponse, UploadedFile};

/// Client for the remote catalog API.
///
/// The base URL is injected at construction so tests can point it at a
/// `wiremock` server.
pub struct CatalogClient {
    client: Client,
    base_url: Url,
}

impl CatalogClient {
    /// Creates a client rooted at `base_url`, e.g. `"https://api.escuelajs.co/api/v1/"`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so relative joins append to the path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// `GET categories`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] / [`ClientError::NotFound`] on non-2xx.
    /// - [`ClientError::Deserialize`] if the body is not a JSON array.
    pub async fn list_categories(&self) -> Result<Vec<Value>, ClientError> {
        let url = self.endpoint("categories")?;
        tracing::debug!(%url, "fetching categories");
        let response = self.client.get(url.clone()).send().await?;
        Self::decode(response, &url, "categories").await
    }

    /// `GET products`, optionally filtered by title and category.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_categories`].
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Value>, ClientError> {
        let mut url = self.endpoint("products")?;
        let pairs = filter.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        tracing::debug!(%url, "fetching products");
        let response = self.client.get(url.clone()).send().await?;
        Self::decode(response, &url, "products").await
    }

    /// `GET products/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the remote answers 404, plus the
    /// errors of [`Self::list_categories`].
    pub async fn get_product(&self, id: i64) -> Result<Value, ClientError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        let response = self.client.get(url.clone()).send().await?;
        Self::decode(response, &url, &format!("product {id}")).await
    }

    /// `POST products/`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedStatus`] with the remote body when the
    /// product is refused, plus the errors of [`Self::list_categories`].
    pub async fn create_product(&self, payload: &ProductPayload) -> Result<Value, ClientError> {
        let url = self.endpoint("products/")?;
        tracing::info!(%url, title = %payload.title, "creating remote product");
        let response = self.client.post(url.clone()).json(payload).send().await?;
        Self::decode(response, &url, "created product").await
    }

    /// `PUT products/{id}`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_product`], plus [`ClientError::NotFound`].
    pub async fn update_product(
        &self,
        id: i64,
        payload: &ProductPayload,
    ) -> Result<Value, ClientError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        tracing::info!(%url, id, title = %payload.title, "updating remote product");
        let response = self.client.put(url.clone()).json(payload).send().await?;
        Self::decode(response, &url, &format!("updated product {id}")).await
    }

    /// `DELETE products/{id}`. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`], [`ClientError::UnexpectedStatus`] or
    /// [`ClientError::Http`].
    pub async fn delete_product(&self, id: i64) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        tracing::info!(%url, id, "deleting remote product");
        let response = self.client.delete(url.clone()).send().await?;
        Self::check_status(response, &url).await?;
        Ok(())
    }

    /// Multipart `POST files/upload` with the file under the `file` field.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the part cannot be built (invalid MIME
    /// type) or the request fails, plus the status and decoding errors of
    /// [`Self::list_categories`].
    pub async fn upload_file(&self, file: &UploadedFile) -> Result<UploadResponse, ClientError> {
        let url = self.endpoint("files/upload")?;
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("file", part);

        tracing::info!(
            %url,
            file_name = %file.file_name,
            size = file.bytes.len(),
            "uploading image"
        );
        let response = self.client.post(url.clone()).multipart(form).send().await?;
        Self::decode(response, &url, "upload response").await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Maps non-2xx responses to typed errors, reading the body for diagnostics.
    async fn check_status(response: Response, url: &Url) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%url, status = status.as_u16(), body = %body, "remote call failed");
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                url: url.to_string(),
                body,
            });
        }
        Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        url: &Url,
        context: &str,
    ) -> Result<T, ClientError> {
        let response = Self::check_status(response, url).await?;
        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(base, 5, "catmirror-test/0.1").expect("client builds")
    }

    #[test]
    fn endpoint_appends_to_base_path() {
        let c = client("https://api.escuelajs.co/api/v1");
        assert_eq!(
            c.endpoint("categories").unwrap().as_str(),
            "https://api.escuelajs.co/api/v1/categories"
        );
    }

    #[test]
    fn endpoint_keeps_trailing_slash_on_create() {
        let c = client("https://api.escuelajs.co/api/v1/");
        assert_eq!(
            c.endpoint("products/").unwrap().as_str(),
            "https://api.escuelajs.co/api/v1/products/"
        );
    }

    #[test]
    fn new_rejects_unparseable_base_url() {
        let result = CatalogClient::new("not a url", 5, "ua");
        assert!(
            matches!(result, Err(ClientError::InvalidBaseUrl { .. })),
            "expected InvalidBaseUrl"
        );
    }
}
