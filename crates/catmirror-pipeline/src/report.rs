use catmirror_client::Rejection;
use catmirror_core::SyncCounts;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Category,
    Product,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Category => write!(f, "category"),
            RecordKind::Product => write!(f, "product"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkipReason {
    /// Rejected by shape validation.
    Malformed { detail: String },
    /// The product's category is not in the local mirror this cycle.
    UnresolvedCategory { category_id: i64 },
    /// A store lookup or write failed for this record.
    WriteFailed { detail: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Malformed { detail } => write!(f, "malformed record: {detail}"),
            SkipReason::UnresolvedCategory { category_id } => {
                write!(f, "category {category_id} does not exist locally")
            }
            SkipReason::WriteFailed { detail } => write!(f, "store error: {detail}"),
        }
    }
}

/// A record that was not mirrored during a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub kind: RecordKind,
    /// Title, name, or `id=N`; whatever identified the record best.
    pub label: String,
    pub reason: SkipReason,
}

impl SkippedRecord {
    pub(crate) fn malformed(kind: RecordKind, rejection: Rejection) -> Self {
        Self {
            kind,
            label: rejection.label,
            reason: SkipReason::Malformed {
                detail: rejection.reason,
            },
        }
    }

    pub(crate) fn write_failed(kind: RecordKind, label: String, detail: String) -> Self {
        Self {
            kind,
            label,
            reason: SkipReason::WriteFailed { detail },
        }
    }
}

impl std::fmt::Display for SkippedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} \"{}\": {}", self.kind, self.label, self.reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStep {
    Categories,
    Products,
}

impl std::fmt::Display for SyncStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStep::Categories => write!(f, "categories"),
            SyncStep::Products => write!(f, "products"),
        }
    }
}

/// The fetch that aborted a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    pub step: SyncStep,
    pub message: String,
}

/// Result of one [`crate::CatalogSyncJob::run`].
///
/// Always produced, including when a fetch aborts the cycle; in that case
/// `failure` is set and the counters hold whatever was committed before.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub counts: SyncCounts,
    pub skipped: Vec<SkippedRecord>,
    pub failure: Option<SyncFailure>,
}

impl SyncReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

pub(crate) fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
