use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canvas geometry for node placement. All lengths are in canvas units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Layout", inline)]
#[serde(default)]
pub struct LayoutOptions {
    /// Canvas width.
    pub canvas_width: f32,
    /// Canvas height.
    pub canvas_height: f32,
    /// Distance from the top edge to the first row.
    pub top_margin: f32,
    /// Vertical distance between tree levels.
    pub level_spacing: f32,
    /// Floor for the halving horizontal spacing.
    pub min_spacing: f32,
    /// Node diameter; feeds the compression threshold.
    pub node_diameter: f32,
    /// Deepest level the tree layout will descend to.
    #[schemars(range(min = 1, max = 4096))]
    pub max_depth: usize,
    /// Distance between neighbouring cells of linear structures.
    pub slot_spacing: f32,
    /// Width of one Huffman leaf.
    pub unit_width: f32,
    /// Lift applied to the Huffman staging area.
    pub staging_height: f32,
}

impl LayoutOptions {
    /// Horizontal centre of the canvas.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.canvas_width * 0.5
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            canvas_width: 1000.0,
            canvas_height: 600.0,
            top_margin: 60.0,
            level_spacing: 70.0,
            min_spacing: 24.0,
            node_diameter: 36.0,
            max_depth: 64,
            slot_spacing: 60.0,
            unit_width: 50.0,
            staging_height: 90.0,
        }
    }
}
