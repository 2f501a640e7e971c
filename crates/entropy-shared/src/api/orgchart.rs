use serde::{Deserialize, Serialize};

use crate::models::HierarchicalNode;

#[derive(Debug, Serialize, Deserialize)]
pub struct OrgChartResponse {
    pub root: HierarchicalNode,
    pub diagnostics: Vec<String>,
}
