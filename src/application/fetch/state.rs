use thiserror::Error;

/// Terminal failure of a fetch cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Every attempt failed. `last_error` is the final attempt's message.
    #[error("failed to fetch data after {attempts} attempts")]
    Exhausted { attempts: u32, last_error: String },
}

impl FetchError {
    /// Message of the final failed attempt.
    #[must_use]
    pub fn last_error(&self) -> &str {
        match self {
            Self::Exhausted { last_error, .. } => last_error,
        }
    }
}

/// Observable state of a [`RetryingFetcher`](super::RetryingFetcher).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState<T> {
    /// No cycle has started.
    #[default]
    Idle,
    Loading,
    Success(T),
    Failed(FetchError),
}

impl<T> FetchState<T> {
    /// Whether the current cycle has finished.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Failed(_))
    }

    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_display_is_generic() {
        let err = FetchError::Exhausted {
            attempts: 3,
            last_error: "No response from server. Please check your connection.".into(),
        };
        assert_eq!(err.to_string(), "failed to fetch data after 3 attempts");
        assert!(err.last_error().starts_with("No response"));
    }

    #[test]
    fn accessors_follow_variant() {
        let state = FetchState::Success(5);
        assert_eq!(state.data(), Some(&5));
        assert!(state.is_settled());
        assert!(!FetchState::<u8>::Loading.is_settled());
        assert!(FetchState::<u8>::Idle.error().is_none());
    }
}
