use thiserror::Error;

/// Errors returned by [`crate::CatalogClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A 404. `body` is the raw response text, often the remote's own
    /// "could not find" message; empty when none was sent.
    #[error("endpoint not found: {url}")]
    NotFound { url: String, body: String },

    /// Any other non-2xx response. `body` is the raw response text, kept for
    /// diagnosing validation failures reported by the remote API.
    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ClientError {
    /// HTTP status code of the failed response, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::NotFound { .. } => Some(404),
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            ClientError::Deserialize { .. } | ClientError::InvalidBaseUrl { .. } => None,
        }
    }

    /// Response body text, when the remote returned one.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::NotFound { body, .. } | ClientError::UnexpectedStatus { body, .. }
                if !body.is_empty() =>
            {
                Some(body)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_exposes_status_and_body() {
        let err = ClientError::UnexpectedStatus {
            status: 400,
            url: "http://localhost/products/".to_string(),
            body: r#"{"message":["price must be a positive number"]}"#.to_string(),
        };
        assert_eq!(err.status(), Some(400));
        assert!(err.body().unwrap().contains("positive number"));
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn empty_body_is_reported_as_absent() {
        let err = ClientError::UnexpectedStatus {
            status: 500,
            url: "http://localhost/categories".to_string(),
            body: String::new(),
        };
        assert!(err.body().is_none());
    }

    #[test]
    fn not_found_reports_404() {
        let err = ClientError::NotFound {
            url: "http://localhost/products/9".to_string(),
            body: String::new(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.body().is_none());
    }

    #[test]
    fn not_found_exposes_remote_message() {
        let err = ClientError::NotFound {
            url: "http://localhost/products/9".to_string(),
            body: r#"{"message":"Could not find any entity of type Product"}"#.to_string(),
        };
        assert!(err.body().unwrap().contains("Could not find"));
    }
}
