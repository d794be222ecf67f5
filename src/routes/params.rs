use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub const DEFAULT_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 1000;
/// Largest offset the store accepts; SQL offsets are signed 64-bit.
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Offset/limit window used by list endpoints.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self {
            skip: Some(skip),
            limit: Some(limit),
        }
    }

    pub fn normalize(&self) -> AppResult<(u64, u64)> {
        let skip = self.skip.unwrap_or(0);
        if skip > MAX_SKIP {
            return Err(AppError::BadRequest(format!(
                "skip must not exceed {MAX_SKIP}"
            )));
        }
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Ok((skip, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_hundred() {
        assert_eq!(ListQuery::default().normalize().unwrap(), (0, DEFAULT_LIMIT));
    }

    #[test]
    fn clamps_limit() {
        assert_eq!(ListQuery::new(5, 0).normalize().unwrap(), (5, 1));
        assert_eq!(ListQuery::new(0, 50_000).normalize().unwrap(), (0, MAX_LIMIT));
    }

    #[test]
    fn rejects_skip_beyond_signed_range() {
        assert_eq!(ListQuery::new(MAX_SKIP, 10).normalize().unwrap(), (MAX_SKIP, 10));
        let err = ListQuery::new(u64::MAX, 10).normalize().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
