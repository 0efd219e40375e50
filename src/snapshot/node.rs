use serde::{Deserialize, Serialize};

/// One node of an observed UI tree. Either field may be missing; children are in
/// render order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiNode {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "contentDescription")]
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<UiNode>,
}

impl UiNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_child(mut self, child: UiNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = UiNode>) -> Self {
        self.children.extend(children);
        self
    }
}

/// A single content-change event pushed by the snapshot source. `root` is `None`
/// when there was no active window to dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEvent {
    pub root: Option<UiNode>,
    pub observed_at_ms: i64,
}

impl SnapshotEvent {
    pub fn new(root: Option<UiNode>, observed_at_ms: i64) -> Self {
        Self {
            root,
            observed_at_ms,
        }
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        serde_json::from_str(raw).context("failed to parse snapshot event")
    }
}
