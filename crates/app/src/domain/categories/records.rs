//! Category Records

use jiff::Timestamp;

use crate::ids::TypedId;

/// Category ID
pub type CategoryId = TypedId<CategoryRecord>;

/// Category Record
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub created_at: Timestamp,
}
