use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoadStyle {
    DEFAULT,

    YAML,
}
