use thiserror::Error;

pub type Result<T, E = ServiceError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Required credential is not set; reported to the caller, never degraded.
    #[error("missing credentials: set {0}")]
    MissingCredentials(String),
    /// Non-success status; `message` is the body's `error` field, if it had one.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Http {
        status: u16,
        message: Option<String>,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("timeout")]
    Timeout,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    /// The checkout service refused the request; carries its error text.
    #[error("{0}")]
    Rejected(String),
    #[error("checkout request failed: {0}")]
    Transport(String),
}

impl CheckoutError {
    /// Text shown to the shopper.
    pub fn toast_message(&self) -> String {
        match self {
            CheckoutError::EmptyCart => "Cart is empty".to_string(),
            CheckoutError::Rejected(message) => message.clone(),
            CheckoutError::Transport(_) => "Checkout failed".to_string(),
        }
    }
}

impl From<ServiceError> for CheckoutError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Http {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => CheckoutError::Rejected(message),
            other => CheckoutError::Transport(other.to_string()),
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else if err.is_decode() {
            ServiceError::InvalidResponse(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_toast_messages() {
        assert_eq!(CheckoutError::EmptyCart.toast_message(), "Cart is empty");
        assert_eq!(
            CheckoutError::Rejected("No valid items to checkout.".into()).toast_message(),
            "No valid items to checkout."
        );
        assert_eq!(
            CheckoutError::Transport("connection refused".into()).toast_message(),
            "Checkout failed"
        );
    }

    #[test]
    fn test_service_error_into_checkout_error() {
        let rejected: CheckoutError = ServiceError::Http {
            status: 400,
            message: Some("Cart is empty.".into()),
        }
        .into();
        assert_eq!(rejected, CheckoutError::Rejected("Cart is empty.".into()));

        let blank: CheckoutError = ServiceError::Http {
            status: 502,
            message: Some("  ".into()),
        }
        .into();
        assert!(matches!(blank, CheckoutError::Transport(_)));

        let silent: CheckoutError = ServiceError::Http {
            status: 502,
            message: None,
        }
        .into();
        assert_eq!(silent.toast_message(), "Checkout failed");

        let timeout: CheckoutError = ServiceError::Timeout.into();
        assert_eq!(timeout.toast_message(), "Checkout failed");
    }
}
