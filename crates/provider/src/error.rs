use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider rejected credential ({status}): {body}")]
    Credential { status: u16, body: String },
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        if status == 401 || status == 403 {
            Self::Credential { status, body }
        } else {
            Self::Status { status, body }
        }
    }

    pub fn is_credential(&self) -> bool {
        matches!(self, Self::Credential { .. })
    }
}
