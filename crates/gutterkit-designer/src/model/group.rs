use super::{ElementId, GroupId};
use serde::{Deserialize, Serialize};

/// Elements that select and move as one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub element_ids: Vec<ElementId>,
}

impl Group {
    pub fn contains(&self, id: ElementId) -> bool {
        self.element_ids.contains(&id)
    }
}
