//! Product Records

use jiff::Timestamp;

use crate::{domain::categories::records::CategoryId, ids::TypedId};

/// Product ID
pub type ProductId = TypedId<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: ProductId,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub name: String,
    pub description: Option<String>,

    /// Unit price in minor units.
    pub price: u64,
    pub stock: u32,
    pub image_url: Option<String>,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
