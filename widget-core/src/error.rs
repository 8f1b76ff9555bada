use thiserror::Error;

/// Every way a fetch can fail. All variants are shown to the user the same way.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("location not found")]
    LocationNotFound,

    #[error("failed to reach weather provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse weather provider response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("weather provider returned code {code}: {message}")]
    Provider { code: u16, message: String },

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::LocationNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_location_not_found_is_not_found() {
        assert!(FetchError::LocationNotFound.is_not_found());

        let provider = FetchError::Provider { code: 401, message: "Invalid API key".into() };
        assert!(!provider.is_not_found());
        assert!(provider.to_string().contains("401"));
    }

    #[test]
    fn parse_errors_convert_from_serde() {
        let err: FetchError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse"));
    }
}
