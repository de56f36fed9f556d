use serde::{Deserialize, Serialize};

/// Immutable label reference data, loaded per dataset. Boxes without a
/// label render as "No Label".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: u32,
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}
