use serde::Serialize;

use crate::err::LResult;

/// YAML rendering for result objects the CLI prints to the operator.
pub fn to_string_pretty<T: Serialize>(value: &T) -> LResult<String> {
    Ok(serde_yaml::to_string(value)?)
}
