use crate::core::error::EngineError;
use crate::models::{PartialPage, ResultPage};

/// Page size used when the caller does not supply one
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Zero-based page index and page size, validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub size: u32,
}

impl PageParams {
    pub fn new(page: i64, size: i64) -> Result<Self, EngineError> {
        if page < 0 {
            return Err(EngineError::InvalidPageIndex(page));
        }
        if size < 1 {
            return Err(EngineError::InvalidPageSize(size));
        }
        Ok(Self {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            size: u32::try_from(size).unwrap_or(u32::MAX),
        })
    }

    /// Build from optional request values, falling back to page 0 and `default_size`
    pub fn from_request(
        page: Option<i64>,
        size: Option<i64>,
        default_size: u32,
    ) -> Result<Self, EngineError> {
        Self::new(page.unwrap_or(0), size.unwrap_or(i64::from(default_size)))
    }

    #[inline]
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.size as usize)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// `max(1, ceil(total_elements / size))`
#[inline]
pub fn total_pages(total_elements: u64, size: u32) -> u32 {
    if size == 0 {
        return 1;
    }
    let pages = total_elements.div_ceil(u64::from(size)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Backfill every field an upstream page descriptor left out.
///
/// `empty` is always recomputed from the content.
pub fn reconcile<T>(partial: PartialPage<T>, params: PageParams) -> ResultPage<T> {
    let PartialPage {
        content,
        number,
        size,
        total_elements,
        total_pages: upstream_total_pages,
        first,
        last,
        empty: _,
    } = partial;

    let size = size.filter(|s| *s > 0).unwrap_or(params.size);
    let number = number.unwrap_or(params.page);
    let total_elements = total_elements.unwrap_or(content.len() as u64);
    let pages = upstream_total_pages.unwrap_or_else(|| total_pages(total_elements, size));
    let empty = content.is_empty();

    ResultPage {
        content,
        number,
        size,
        total_elements,
        total_pages: pages,
        first: first.unwrap_or(number == 0),
        last: last.unwrap_or(number.saturating_add(1) >= pages),
        empty,
    }
}

/// Cut one page out of a fully ranked list
pub fn paginate<T>(items: Vec<T>, params: PageParams) -> ResultPage<T> {
    let total_elements = items.len() as u64;
    let pages = total_pages(total_elements, params.size);
    let content: Vec<T> = items
        .into_iter()
        .skip(params.offset())
        .take(params.size as usize)
        .collect();
    let empty = content.is_empty();

    ResultPage {
        content,
        number: params.page,
        size: params.size,
        total_elements,
        total_pages: pages,
        first: params.page == 0,
        last: params.page.saturating_add(1) >= pages,
        empty,
    }
}

/// Append `next` to the pages loaded so far.
///
/// Content is concatenated in arrival order and every other field is taken
/// from `next`, except `empty`, which follows the merged content.
pub fn merge_pages<T>(previous: Option<ResultPage<T>>, next: ResultPage<T>) -> ResultPage<T> {
    let Some(previous) = previous else {
        return next;
    };

    let mut content = previous.content;
    content.extend(next.content);
    let empty = content.is_empty();

    ResultPage {
        content,
        empty,
        ..next
    }
}

impl<T> ResultPage<T> {
    /// Convert the content while keeping the page metadata
    pub fn map<U, F>(self, f: F) -> ResultPage<U>
    where
        F: FnMut(T) -> U,
    {
        ResultPage {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}
