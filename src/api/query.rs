//! Strapi-style query string construction
//!
//! The backend filters, populates and paginates through bracketed query
//! parameters (`filters[day][$eq]=2025-03-03`, `populate[0]=category`,
//! `pagination[limit]=25`). This builder produces the key/value pairs and
//! leaves percent-encoding to the HTTP client.

/// Builder for a bracketed query string
#[derive(Debug, Default, Clone)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The accumulated key/value pairs
    pub fn params(&self) -> &Vec<(String, String)> {
        &self.params
    }

    /// Push an arbitrary pre-bracketed parameter
    pub fn raw(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// `filters[<field>][$<op>]=<value>`
    pub fn filter(self, field: &str, op: &str, value: impl ToString) -> Self {
        self.raw(format!("filters[{}][${}]", field, op), value)
    }

    /// `filters[<outer>][<inner>][$<op>]=<value>` for relation fields
    pub fn relation_filter(self, outer: &str, inner: &str, op: &str, value: impl ToString) -> Self {
        self.raw(format!("filters[{}][{}][${}]", outer, inner, op), value)
    }

    /// One arm of an `$or` group: `filters[$or][<idx>][<field>][$containsi]=<value>`
    pub fn or_contains(self, idx: usize, field: &str, value: &str) -> Self {
        self.raw(format!("filters[$or][{}][{}][$containsi]", idx, field), value)
    }

    /// An `$or` arm over a relation field:
    /// `filters[$or][<idx>][<outer>][<inner>][$containsi]=<value>`
    pub fn relation_or_contains(self, idx: usize, outer: &str, inner: &str, value: &str) -> Self {
        self.raw(
            format!("filters[$or][{}][{}][{}][$containsi]", idx, outer, inner),
            value,
        )
    }

    /// `populate[<idx>]=<relation>` (list form)
    pub fn populate(self, idx: usize, relation: &str) -> Self {
        self.raw(format!("populate[{}]", idx), relation)
    }

    /// `populate[items][populate][0]=category` — menu items with their category
    pub fn populate_items_with_category(self) -> Self {
        self.raw("populate[items][populate][0]", "category")
    }

    /// `pagination[start]` / `pagination[limit]`
    pub fn paginate(self, start: u32, limit: u32) -> Self {
        self.raw("pagination[start]", start)
            .raw("pagination[limit]", limit)
    }
}
