pub mod client;
pub mod error;
pub mod types;
pub mod validate;

pub use client::CatalogClient;
pub use error::ClientError;
pub use types::{ProductFilter, ProductPayload, UploadResponse, UploadedFile};
pub use validate::{
    first_image_url, validate_category, validate_product, Rejection, ValidProduct,
};
