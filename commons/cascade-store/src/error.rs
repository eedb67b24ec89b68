use cascade_models::ObjectKey;

/// Failure of a single store call. "Not found" is not represented here;
/// gateways report absence through their return values.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Item already exists: {0}")]
    AlreadyExists(ObjectKey),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[cfg(feature = "kube")]
impl From<kube::Error> for GatewayError {
    fn from(value: kube::Error) -> Self {
        match value {
            kube::Error::Api(ae) => match ae.code {
                400 | 422 => GatewayError::Rejected(ae.message),
                503 | 504 => GatewayError::Unavailable(ae.message),
                _ => GatewayError::Backend(format!(
                    "{} ({}): {}",
                    ae.reason, ae.code, ae.message
                )),
            },
            kube::Error::HyperError(e) => {
                GatewayError::Unavailable(e.to_string())
            }
            kube::Error::Service(e) => GatewayError::Unavailable(e.to_string()),
            other => GatewayError::Backend(other.to_string()),
        }
    }
}
