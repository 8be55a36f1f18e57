use serde::{Deserialize, Serialize};

pub const POSTS_PER_PAGE: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// The slice of a listing a request asked for, already clamped to what exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub per_page: i64,
}

impl Window {
    /// Anything that isn't a number means page 1, a number outside the
    /// listing means its last page. Never fails.
    pub fn resolve(requested: Option<&str>, count: i64, per_page: i64) -> Window {
        let num_pages = if count <= 0 { 1 } else { (count + per_page - 1) / per_page };

        let number = match requested.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if (1..=num_pages).contains(&n) => n,
            Some(Ok(_)) => num_pages,
        };

        Window { number, num_pages, count, per_page }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn with<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            has_previous: self.number > 1,
            has_next: self.number < self.num_pages,
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub has_previous: bool,
    pub has_next: bool,
}
