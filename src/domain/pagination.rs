use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_RECORD_PER_PAGE: i64 = 10;

/// Caller-supplied page selection after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub record_per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            record_per_page: DEFAULT_RECORD_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Parse raw query values. Anything missing, unparsable or below 1
    /// falls back to the default for that field.
    pub fn parse(page: Option<&str>, record_per_page: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            record_per_page: parse_positive(record_per_page).unwrap_or(DEFAULT_RECORD_PER_PAGE),
        }
    }

    pub fn window(&self) -> Window {
        Window {
            skip: (self.page - 1).saturating_mul(self.record_per_page),
            limit: self.record_per_page,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
}

/// Skip/limit slice applied to a filtered, sorted record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: i64,
    pub limit: i64,
}

impl Window {
    /// The records of `sorted` that fall inside this window.
    pub fn slice<T: Clone>(&self, sorted: &[T]) -> Vec<T> {
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(0);
        sorted.iter().skip(skip).take(limit).cloned().collect()
    }
}

/// One page of a listing together with the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub page: i64,
    pub record_per_page: i64,
    pub total_count: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page.saturating_mul(self.record_per_page) < self.total_count
    }
}
