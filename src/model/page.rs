//! Offset pagination shared by list and search operations.

use crate::error::AppError;

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Build from optional caller input. `limit` must be in `1..=MAX_LIMIT`.
    pub fn new(skip: Option<u32>, limit: Option<u32>) -> Result<Self, AppError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 || limit > MAX_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }
        Ok(Page {
            skip: skip.unwrap_or(0),
            limit,
        })
    }

    /// Apply to an already filtered and ordered sequence.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.skip as usize)
            .take(self.limit as usize)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(Page::new(None, None).unwrap(), Page::default());
    }

    #[test]
    fn limit_bounds() {
        assert!(Page::new(None, Some(0)).is_err());
        assert!(Page::new(None, Some(101)).is_err());
        assert_eq!(Page::new(Some(5), Some(100)).unwrap().skip, 5);
    }

    #[test]
    fn slice_applies_skip_then_limit() {
        let page = Page { skip: 1, limit: 2 };
        assert_eq!(page.slice(&[1, 2, 3, 4]), vec![2, 3]);
        assert!(Page { skip: 10, limit: 2 }.slice(&[1, 2]).is_empty());
    }
}
