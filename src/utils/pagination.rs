use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served.
    pub number: usize,
    pub num_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Splits result lists into fixed-size pages. Requests for a page that is
/// not a number fall back to the first page, and requests past the end are
/// served the last page.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn num_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size).max(1)
    }

    pub fn get_page<T>(&self, items: Vec<T>, requested: Option<&str>) -> Page<T> {
        let total_items = items.len();
        let num_pages = self.num_pages(total_items);

        let number = match requested.and_then(|raw| raw.trim().parse::<i64>().ok()) {
            None => 1,
            Some(n) if n < 1 => num_pages,
            Some(n) => (n as usize).min(num_pages),
        };

        let start = (number - 1) * self.page_size;
        let items = items.into_iter().skip(start).take(self.page_size).collect();

        Page {
            items,
            number,
            num_pages,
            total_items,
            page_size: self.page_size,
        }
    }
}
