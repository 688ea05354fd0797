//! Scene files
//!
//! A scene is a JSON document naming the regions to composite:
//!
//! ```json
//! {
//!   "title": "Composition",
//!   "grid": { "resolution": 200 },
//!   "prioritized": "single",
//!   "regions": [
//!     { "label": "single", "region": { "kind": "dp", "epsilon": 0.5, "delta": 0.05 } },
//!     { "region": { "kind": "dp_exact_composition", "epsilon": 0.5, "delta": 0.05, "k": 4 } }
//!   ]
//! }
//! ```
//!
//! Entries without a label use the region's graph label. The `prioritized`
//! label must name exactly one entry.

use std::path::Path;

use anyhow::{bail, Context, Result};
use privacy_regions::{Compositor, GridConfig, RegionSpec, Rendering};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

fn default_title() -> String {
    "Privacy regions".to_string()
}

fn default_show_legend() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub grid: GridConfig,
    /// Label of the entry drawn on top of all others
    #[serde(default)]
    pub prioritized: Option<String>,
    #[serde(default = "default_show_legend")]
    pub show_legend: bool,
    pub regions: Vec<SceneEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntry {
    #[serde(default)]
    pub label: Option<String>,
    pub region: RegionSpec,
}

impl SceneEntry {
    pub fn label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.region.graph_label())
    }
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene file {}", path.display()))?;
        let scene: Scene = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse scene file {}", path.display()))?;
        info!(path = %path.display(), regions = scene.regions.len(), "loaded scene");
        Ok(scene)
    }

    /// Build every entry into a compositor and resolve the prioritized label to its id
    pub fn compositor(&self) -> Result<(Compositor, Option<usize>)> {
        let mut compositor = Compositor::new(self.grid.clone())?;
        let mut prioritized = None;

        for (index, entry) in self.regions.iter().enumerate() {
            let label = entry.label();
            let region = entry
                .region
                .build()
                .with_context(|| format!("region {} ({}) is invalid", index, label))?;
            let id = compositor.add(region, label.clone())?;
            debug!(id, label = %label, "added scene region");
            if self.prioritized.as_deref() == Some(label.as_str()) {
                if prioritized.is_some() {
                    bail!("prioritized region {:?} names more than one scene entry", label);
                }
                prioritized = Some(id);
            }
        }

        if let (Some(label), None) = (&self.prioritized, prioritized) {
            bail!("prioritized region {:?} is not in the scene", label);
        }
        Ok((compositor, prioritized))
    }

    pub fn render(&self) -> Result<Rendering> {
        let (compositor, prioritized) = self.compositor()?;
        Ok(compositor.render(&self.title, prioritized, self.show_legend)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCENE: &str = r#"{
        "title": "Composition",
        "grid": { "resolution": 40 },
        "prioritized": "single",
        "regions": [
            { "label": "single", "region": { "kind": "dp", "epsilon": 0.5, "delta": 0.05 } },
            { "region": { "kind": "dp_exact_composition", "epsilon": 0.5, "delta": 0.05, "k": 4 } }
        ]
    }"#;

    fn write_scene(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_render() {
        let file = write_scene(SCENE);
        let scene = Scene::load(file.path()).unwrap();
        assert_eq!(scene.grid.resolution, 40);
        assert!(scene.show_legend);

        let rendering = scene.render().unwrap();
        assert_eq!(rendering.title, "Composition");
        assert_eq!(rendering.layers.len(), 2);
        assert_eq!(rendering.layers[0].label, "single");
        assert_eq!(
            rendering.legend[1].label,
            "DP exact comp. (ε: 0.50, δ: 0.05, k: 4)"
        );
    }

    #[test]
    fn test_defaults() {
        let scene: Scene = serde_json::from_str(r#"{ "regions": [] }"#).unwrap();
        assert_eq!(scene.title, "Privacy regions");
        assert_eq!(scene.grid, GridConfig::default());
        assert!(scene.prioritized.is_none());
    }

    #[test]
    fn test_unknown_prioritized_label() {
        let mut scene: Scene = serde_json::from_str(SCENE).unwrap();
        scene.prioritized = Some("missing".to_string());
        let err = scene.compositor().unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_ambiguous_prioritized_label() {
        let scene: Scene = serde_json::from_str(
            r#"{
                "prioritized": "dp",
                "regions": [
                    { "label": "dp", "region": { "kind": "dp", "epsilon": 0.5, "delta": 0.05 } },
                    { "label": "dp", "region": { "kind": "dp", "epsilon": 1.0, "delta": 0.05 } }
                ]
            }"#,
        )
        .unwrap();
        let err = scene.compositor().unwrap_err();
        assert!(err.to_string().contains("more than one"));

        // duplicate labels are fine when nothing is prioritized
        let mut scene = scene;
        scene.prioritized = None;
        let (compositor, prioritized) = scene.compositor().unwrap();
        assert!(prioritized.is_none());
        assert_eq!(compositor.len(), 2);
    }

    #[test]
    fn test_invalid_region_reports_index() {
        let scene: Scene = serde_json::from_str(
            r#"{ "regions": [ { "region": { "kind": "dp", "epsilon": -1.0, "delta": 0.1 } } ] }"#,
        )
        .unwrap();
        let err = scene.compositor().unwrap_err();
        assert!(err.to_string().contains("region 0"));
    }

    #[test]
    fn test_missing_file() {
        let err = Scene::load(Path::new("/nonexistent/scene.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read scene file"));
    }
}
