//! Picks the single image URL sent with a product mutation.
//!
//! Precedence: uploaded file, then explicit URL, then the product's existing
//! image, then the configured placeholder (create only).

use catmirror_client::{CatalogClient, ClientError, UploadedFile};
use thiserror::Error;

use crate::form::{FIELD_IMAGE, FIELD_IMAGE_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
}

/// Candidate image sources for one mutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSources<'a> {
    pub upload: Option<&'a UploadedFile>,
    /// Blank strings count as absent.
    pub explicit_url: Option<&'a str>,
    /// The product's current `images`, in remote order. Empty on create.
    pub existing_images: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    Uploaded(String),
    Explicit(String),
    Existing(String),
    Placeholder(String),
    /// Edit with no source at all; the payload carries no images.
    Unset,
}

impl ResolvedImage {
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            ResolvedImage::Uploaded(url)
            | ResolvedImage::Explicit(url)
            | ResolvedImage::Existing(url)
            | ResolvedImage::Placeholder(url) => Some(url),
            ResolvedImage::Unset => None,
        }
    }

    /// The `images` list for a product payload.
    #[must_use]
    pub fn into_images(self) -> Vec<String> {
        match self {
            ResolvedImage::Uploaded(url)
            | ResolvedImage::Explicit(url)
            | ResolvedImage::Existing(url)
            | ResolvedImage::Placeholder(url) => vec![url],
            ResolvedImage::Unset => Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("choose one source: upload a file or provide an image URL, not both")]
    Conflict,

    #[error("image upload failed: {0}")]
    Upload(#[source] ClientError),
}

impl ImageError {
    /// Form fields the error belongs to.
    #[must_use]
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            ImageError::Conflict => &[FIELD_IMAGE, FIELD_IMAGE_URL],
            ImageError::Upload(_) => &[FIELD_IMAGE],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolver {
    placeholder_url: String,
}

impl ImageResolver {
    pub fn new(placeholder_url: impl Into<String>) -> Self {
        Self {
            placeholder_url: placeholder_url.into(),
        }
    }

    /// Rejects supplying both an upload and an explicit URL.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Conflict`] when both are present.
    pub fn check_sources(
        upload: Option<&UploadedFile>,
        explicit_url: Option<&str>,
    ) -> Result<(), ImageError> {
        if upload.is_some() && non_blank(explicit_url).is_some() {
            return Err(ImageError::Conflict);
        }
        Ok(())
    }

    /// Resolves the image to submit. Only an upload performs a network call.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Conflict`] for an upload plus an explicit URL, or
    /// [`ImageError::Upload`] when the upload request fails.
    pub async fn resolve(
        &self,
        client: &CatalogClient,
        sources: ImageSources<'_>,
        kind: MutationKind,
    ) -> Result<ResolvedImage, ImageError> {
        Self::check_sources(sources.upload, sources.explicit_url)?;

        if let Some(file) = sources.upload {
            let response = client.upload_file(file).await.map_err(|e| {
                tracing::error!(file_name = %file.file_name, error = %e, "image upload failed");
                ImageError::Upload(e)
            })?;
            tracing::debug!(location = %response.location, "image uploaded");
            return Ok(ResolvedImage::Uploaded(response.location));
        }

        if let Some(url) = non_blank(sources.explicit_url) {
            return Ok(ResolvedImage::Explicit(url.to_owned()));
        }

        // First element only; a blank first image is treated as none.
        if let Some(existing) = sources.existing_images.first().filter(|u| !u.is_empty()) {
            return Ok(ResolvedImage::Existing(existing.clone()));
        }

        Ok(match kind {
            MutationKind::Create => ResolvedImage::Placeholder(self.placeholder_url.clone()),
            MutationKind::Update => ResolvedImage::Unset,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
