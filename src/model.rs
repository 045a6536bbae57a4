use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// The managed resource record.
///
/// `id` is assigned once and never changes; `name` is replaced by updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_wire_shape() {
        let item = Item::new("1", "Item One");
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"id": "1", "name": "Item One"})
        );
    }
}
