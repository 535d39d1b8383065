use serde::{Deserialize, Serialize};

use crate::color::ColorCategory;

/// Fill colors handed to the renderer, one per category. Values are passed
/// through untouched, so anything Graphviz accepts (`"palegreen"`,
/// `"#c1e1c1"`) works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub start_end: String,
    pub decision: String,
    pub action: String,
    pub negative: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            start_end: "palegreen".to_string(),
            decision: "khaki".to_string(),
            action: "lightblue".to_string(),
            negative: "salmon".to_string(),
        }
    }
}

impl Palette {
    pub fn fill(&self, category: ColorCategory) -> &str {
        match category {
            ColorCategory::StartEnd => &self.start_end,
            ColorCategory::Decision => &self.decision,
            ColorCategory::Action => &self.action,
            ColorCategory::Negative => &self.negative,
        }
    }
}
