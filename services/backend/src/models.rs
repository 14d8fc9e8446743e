use serde::Deserialize;
use types::prelude::GroupId;

/// Query parameters shared by the flip and count endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupQuery {
    pub id: GroupId,
}
