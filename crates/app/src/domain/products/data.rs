//! Products Data

use crate::domain::categories::records::CategoryId;

/// Catalog listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring matched against name and description.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl ProductFilter {
    /// Search term wrapped for `ILIKE`, with pattern metacharacters escaped.
    ///
    /// Blank terms yield `None`.
    #[must_use]
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref().map(str::trim)?;

        if term.is_empty() {
            return None;
        }

        let mut pattern = String::with_capacity(term.len() + 2);

        pattern.push('%');

        for ch in term.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }

            pattern.push(ch);
        }

        pattern.push('%');

        Some(pattern)
    }
}

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
    pub stock: u32,
    pub image_url: Option<String>,
}

/// Product Update Data
///
/// Replaces every editable field of an existing product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
    pub stock: u32,
    pub image_url: Option<String>,
    pub active: bool,
}
