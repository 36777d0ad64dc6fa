//! Catalog reconciliation and product mutation flows.
//!
//! [`CatalogSyncJob`] pulls the remote catalog into a [`catmirror_db::CatalogStore`];
//! [`ProductMutationOrchestrator`] pushes create/edit/delete requests back to
//! the remote API. Both run their steps strictly one after another and report
//! failures as values instead of propagating them.

pub mod errors;
pub mod form;
pub mod image;
pub mod job;
pub mod mutation;
pub mod reconcile;
pub mod report;

pub use errors::FieldErrors;
pub use form::{validate_form, CleanedForm, ProductForm};
pub use image::{ImageError, ImageResolver, ImageSources, MutationKind, ResolvedImage};
pub use job::CatalogSyncJob;
pub use mutation::{MutationStep, OrchestrationError, ProductMutationOrchestrator, ProductRef};
pub use reconcile::{CategoryOutcome, CategoryReconciler, ProductOutcome, ProductReconciler};
pub use report::{RecordKind, SkipReason, SkippedRecord, SyncFailure, SyncReport, SyncStep};
