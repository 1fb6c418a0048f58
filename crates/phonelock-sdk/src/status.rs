use serde::{Deserialize, Deserializer, Serialize};

/// Lock state as reported by the device. The client never derives it locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    #[serde(default)]
    pub locked: bool,
    #[serde(default, deserialize_with = "non_negative_seconds")]
    pub remaining_seconds: u64,
}

// Null, fractional or negative counts clamp to whole non-negative seconds.
fn non_negative_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    Ok(raw.max(0.0) as u64)
}
