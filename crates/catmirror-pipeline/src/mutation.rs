//! Create, edit and delete products on the remote catalog.
//!
//! A mutation walks `LoadContext -> Validate -> ResolveImage -> Submit`.
//! The first failing step ends it, and the returned
//! [`OrchestrationError`] names that step together with every error collected
//! in it. No upload or write request is made until validation has passed.

use catmirror_client::{CatalogClient, ClientError, UploadedFile};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::errors::FieldErrors;
use crate::form::{validate_form, ProductForm};
use crate::image::{ImageResolver, ImageSources, MutationKind};

const CORRECT_ERRORS: &str = "Please correct the errors below.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MutationStep {
    LoadContext,
    Validate,
    ResolveImage,
    Submit,
}

impl std::fmt::Display for MutationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MutationStep::LoadContext => "load-context",
            MutationStep::Validate => "validate",
            MutationStep::ResolveImage => "resolve-image",
            MutationStep::Submit => "submit",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step} step failed: {errors}")]
pub struct OrchestrationError {
    pub step: MutationStep,
    pub errors: FieldErrors,
}

impl OrchestrationError {
    fn message(step: MutationStep, message: impl Into<String>) -> Self {
        Self {
            step,
            errors: FieldErrors::with_message(message),
        }
    }
}

/// The remote product a successful create or update produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRef {
    pub id: i64,
    pub title: String,
}

pub struct ProductMutationOrchestrator<'a> {
    client: &'a CatalogClient,
    images: ImageResolver,
}

impl<'a> ProductMutationOrchestrator<'a> {
    pub fn new(client: &'a CatalogClient, images: ImageResolver) -> Self {
        Self { client, images }
    }

    /// Creates a product. An absent image falls back to the placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError`] naming the step that failed.
    pub async fn create(
        &self,
        form: &ProductForm,
        upload: Option<&UploadedFile>,
    ) -> Result<ProductRef, OrchestrationError> {
        self.mutate(None, Vec::new(), form, upload).await
    }

    /// Replaces product `id`. With no new image the current first image is
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError`] naming the step that failed; a missing
    /// product fails at [`MutationStep::LoadContext`].
    pub async fn update(
        &self,
        id: i64,
        form: &ProductForm,
        upload: Option<&UploadedFile>,
    ) -> Result<ProductRef, OrchestrationError> {
        let current = self.load_product(id).await?;
        self.update_loaded(id, &current, form, upload).await
    }

    /// Same as [`Self::update`] for a caller that already fetched the
    /// product, e.g. to pre-fill the form. `current` supplies the existing
    /// images and is not fetched again.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError`] naming the step that failed.
    pub async fn update_loaded(
        &self,
        id: i64,
        current: &Value,
        form: &ProductForm,
        upload: Option<&UploadedFile>,
    ) -> Result<ProductRef, OrchestrationError> {
        self.mutate(Some(id), existing_images(current), form, upload).await
    }

    /// Deletes product `id` on the remote catalog.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError`] at [`MutationStep::Submit`] when the
    /// product does not exist or the request fails.
    pub async fn delete(&self, id: i64) -> Result<(), OrchestrationError> {
        match self.client.delete_product(id).await {
            Ok(()) => {
                tracing::info!(id, "product deleted");
                Ok(())
            }
            Err(ClientError::NotFound { .. }) => Err(OrchestrationError::message(
                MutationStep::Submit,
                format!("product {id} not found"),
            )),
            Err(e) => {
                tracing::error!(id, error = %e, "product delete failed");
                Err(OrchestrationError::message(
                    MutationStep::Submit,
                    format!("failed to delete product {id}: {e}"),
                ))
            }
        }
    }

    async fn mutate(
        &self,
        target: Option<i64>,
        existing_images: Vec<String>,
        form: &ProductForm,
        upload: Option<&UploadedFile>,
    ) -> Result<ProductRef, OrchestrationError> {
        let kind = if target.is_some() {
            MutationKind::Update
        } else {
            MutationKind::Create
        };

        let category_ids = self.load_category_ids().await?;

        let mut errors = FieldErrors::new();
        let cleaned = validate_form(form, &category_ids).map_err(|e| errors.merge(e));
        if let Err(conflict) = ImageResolver::check_sources(upload, form.image_url.as_deref()) {
            for field in conflict.fields() {
                errors.add(field, conflict.to_string());
            }
        }
        let cleaned = match cleaned {
            Ok(cleaned) if errors.is_empty() => cleaned,
            _ => {
                errors.set_message(CORRECT_ERRORS);
                tracing::info!(?kind, %errors, "product form rejected");
                return Err(OrchestrationError {
                    step: MutationStep::Validate,
                    errors,
                });
            }
        };

        let sources = ImageSources {
            upload,
            explicit_url: cleaned.image_url.as_deref(),
            existing_images: &existing_images,
        };
        let resolved = match self.images.resolve(self.client, sources, kind).await {
            Ok(resolved) => resolved,
            Err(e) => {
                let mut errors = FieldErrors::with_message(CORRECT_ERRORS);
                for field in e.fields() {
                    errors.add(field, e.to_string());
                }
                return Err(OrchestrationError {
                    step: MutationStep::ResolveImage,
                    errors,
                });
            }
        };
        tracing::debug!(image = resolved.url().unwrap_or("<none>"), "image resolved");

        let title = cleaned.title.clone();
        let payload = cleaned.into_payload(resolved.into_images());
        let response = match target {
            Some(id) => self.client.update_product(id, &payload).await,
            None => self.client.create_product(&payload).await,
        };

        let raw = response.map_err(|e| {
            tracing::error!(?kind, status = ?e.status(), body = ?e.body(), error = %e, "product submit failed");
            let action = match kind {
                MutationKind::Create => "create",
                MutationKind::Update => "update",
            };
            OrchestrationError::message(
                MutationStep::Submit,
                format!("failed to {action} product: {}", describe_failure(&e)),
            )
        })?;

        let product = product_ref(&raw, target, title).ok_or_else(|| {
            OrchestrationError::message(
                MutationStep::Submit,
                "the remote catalog accepted the product but returned no id",
            )
        })?;
        tracing::info!(?kind, id = product.id, title = %product.title, "product saved");
        Ok(product)
    }

    async fn load_category_ids(&self) -> Result<Vec<i64>, OrchestrationError> {
        let raw = self.client.list_categories().await.map_err(|e| {
            tracing::error!(error = %e, "category list fetch failed");
            OrchestrationError::message(
                MutationStep::LoadContext,
                format!("could not load categories: {e}"),
            )
        })?;
        Ok(raw
            .iter()
            .filter_map(|c| c.get("id").and_then(Value::as_i64))
            .collect())
    }

    async fn load_product(&self, id: i64) -> Result<Value, OrchestrationError> {
        match self.client.get_product(id).await {
            Ok(raw) => Ok(raw),
            Err(ClientError::NotFound { .. }) => Err(OrchestrationError::message(
                MutationStep::LoadContext,
                format!("product {id} not found"),
            )),
            Err(e) => {
                tracing::error!(id, error = %e, "product fetch failed");
                Err(OrchestrationError::message(
                    MutationStep::LoadContext,
                    format!("could not load product {id}: {e}"),
                ))
            }
        }
    }
}

/// Error text with the remote body appended when `Display` leaves it out.
fn describe_failure(err: &ClientError) -> String {
    match err {
        ClientError::NotFound { body, .. } if !body.is_empty() => format!("{err}: {body}"),
        _ => err.to_string(),
    }
}

/// The product's `images`, position-preserving; non-strings become `""`.
fn existing_images(raw: &Value) -> Vec<String> {
    raw.get("images")
        .and_then(Value::as_array)
        .map(|images| {
            images
                .iter()
                .map(|v| v.as_str().unwrap_or("").to_owned())
                .collect()
        })
        .unwrap_or_default()
}

fn product_ref(raw: &Value, target: Option<i64>, title: String) -> Option<ProductRef> {
    let id = raw.get("id").and_then(Value::as_i64).or(target)?;
    let title = raw
        .get("title")
        .and_then(Value::as_str)
        .map_or(title, str::to_owned);
    Some(ProductRef { id, title })
}
