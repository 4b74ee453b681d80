use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Physiotherapist {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub active: bool,
}
