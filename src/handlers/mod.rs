//! HTTP handlers

pub mod api;
pub mod dashboard;
pub mod health;

use crate::{AppError, AppResult};

/// Client identifiers arrive as text; anything but a row position is refused.
pub(crate) fn parse_client_id(raw: &str) -> AppResult<usize> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::ValidationError(format!("Invalid client id: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_id() {
        assert_eq!(parse_client_id(" 12 ").unwrap(), 12);
        assert!(matches!(parse_client_id("abc"), Err(AppError::ValidationError(_))));
        assert!(matches!(parse_client_id("-1"), Err(AppError::ValidationError(_))));
    }
}
