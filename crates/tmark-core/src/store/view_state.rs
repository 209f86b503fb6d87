use serde::{Deserialize, Serialize};

/// Sidecar state for "jump to previous"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    #[serde(default)]
    pub last_viewed_id: Option<String>,
    #[serde(default)]
    pub prev_viewed_id: Option<String>,
}

impl ViewState {
    /// Push `id` as the latest view. Returns false when nothing changed.
    pub fn record(&mut self, id: &str) -> bool {
        if self.last_viewed_id.as_deref() == Some(id) {
            return false;
        }
        self.prev_viewed_id = self.last_viewed_id.take();
        self.last_viewed_id = Some(id.to_string());
        true
    }
}
