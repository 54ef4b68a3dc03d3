use serde::Deserialize;

/// Errors crossing the store boundary. Validation never produces one of
/// these — it fires before any request is built.
#[derive(Clone, Debug, thiserror::Error)]
pub enum StoreError {
    /// Non-2xx response carrying a structured `erro` message. The message
    /// is the store's own wording and is surfaced verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Non-2xx response without a usable `erro` field.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    erro: String,
}

impl StoreError {
    /// Classify a non-2xx response. The body is consulted for an `erro`
    /// field; anything else falls back to the generic HTTP-status message.
    pub fn from_status(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Self::Api {
                status,
                message: parsed.erro,
            },
            Err(_) => Self::Http { status },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Api { status: 404, .. } | Self::Http { status: 404 }
        )
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Api { .. } => "api",
            Self::Http { .. } => "http",
            Self::Network(_) => "network",
            Self::Decode(_) => "decode",
        }
    }
}

/// Field validation failures, detected before any request is sent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("code and name are required")]
    MissingProductFields,

    #[error("enter a product code")]
    MissingLookupCode,

    /// Also raised for non-numeric and zero month/year/quantity values:
    /// the required-field check cannot tell zero apart from missing.
    #[error("all count fields are required")]
    MissingCountFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_reads_erro_field() {
        let err = StoreError::from_status(404, r#"{"erro":"Produto não encontrado"}"#);
        assert!(matches!(&err, StoreError::Api { status: 404, message } if message == "Produto não encontrado"));
        assert_eq!(err.to_string(), "Produto não encontrado");
    }

    #[test]
    fn from_status_falls_back_without_erro() {
        let err = StoreError::from_status(500, "<html>internal</html>");
        assert!(matches!(err, StoreError::Http { status: 500 }));
        assert_eq!(err.to_string(), "HTTP error: 500");
    }

    #[test]
    fn from_status_falls_back_on_unrelated_json() {
        let err = StoreError::from_status(400, r#"{"detail":"nope"}"#);
        assert!(matches!(err, StoreError::Http { status: 400 }));
    }

    #[test]
    fn not_found_classification() {
        assert!(StoreError::from_status(404, "{}").is_not_found());
        assert!(StoreError::Api {
            status: 404,
            message: "x".into()
        }
        .is_not_found());
        assert!(!StoreError::from_status(409, "{}").is_not_found());
        assert!(!StoreError::Network("refused".into()).is_not_found());
    }

    #[test]
    fn error_kind_strings() {
        assert_eq!(
            StoreError::Api {
                status: 409,
                message: "dup".into()
            }
            .error_kind(),
            "api"
        );
        assert_eq!(StoreError::Http { status: 502 }.error_kind(), "http");
        assert_eq!(StoreError::Network("tcp".into()).error_kind(), "network");
        assert_eq!(StoreError::Decode("eof".into()).error_kind(), "decode");
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            ValidationError::MissingProductFields.to_string(),
            "code and name are required"
        );
        assert_eq!(
            ValidationError::MissingCountFields.to_string(),
            "all count fields are required"
        );
    }
}
