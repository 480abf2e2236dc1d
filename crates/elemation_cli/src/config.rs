//! Page fixture handling
//!
//! A page fixture describes a headless page, the elemation to attach to it and
//! the scroll session to replay:
//!
//! - `[viewport]` - viewport size
//! - `[elemation]` - an [`ElemationConfig`]
//! - `[[elements]]` - elements in document order
//! - `[[scroll]]` - scroll steps, each followed by a wait

use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use elemation::headless::{HeadlessElement, HeadlessHost};
use elemation_core::{Bounds, ElemationConfig};
use serde::{Deserialize, Serialize};

/// Page fixture (page.toml)
#[derive(Debug, Deserialize, Serialize)]
pub struct PageConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub elemation: ElemationConfig,
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
    #[serde(default)]
    pub scroll: Vec<ScrollStep>,
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_width")]
    pub width: f32,
    #[serde(default = "default_viewport_height")]
    pub height: f32,
}

fn default_viewport_width() -> f32 {
    1280.0
}

fn default_viewport_height() -> f32 {
    800.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

/// One element of the page
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElementConfig {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Initial class string
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

fn default_tag() -> String {
    "div".to_string()
}

/// Scroll to `y`, then let `wait_ms` of virtual time pass
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ScrollStep {
    pub y: f32,
    #[serde(default)]
    pub wait_ms: u64,
}

impl PageConfig {
    /// Load a fixture from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Page fixture {} not found", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: PageConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.elemation.validate()?;

        if !(self.viewport.width >= 0.0 && self.viewport.height >= 0.0) {
            anyhow::bail!("Viewport size must be non-negative");
        }

        for (index, element) in self.elements.iter().enumerate() {
            if element.tag.trim().is_empty() {
                anyhow::bail!("Element {} has an empty tag", index);
            }
            if element.height < 0.0 || element.width < 0.0 {
                anyhow::bail!("Element {} has a negative size", index);
            }
        }

        Ok(())
    }

    /// Build the headless page described by the fixture
    pub fn build_host(&self) -> Rc<HeadlessHost> {
        let host = Rc::new(HeadlessHost::new(self.viewport.width, self.viewport.height));

        for element in &self.elements {
            let mut node = HeadlessElement::new(element.tag.clone())
                .with_class(element.class.clone())
                .with_bounds(Bounds::new(
                    element.left,
                    element.top,
                    element.width,
                    element.height,
                ));
            if let Some(id) = &element.id {
                node = node.with_id(id.clone());
            }
            host.push(node);
        }

        host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elemation::Host;

    const LANDING: &str = include_str!("../fixtures/landing.toml");

    #[test]
    fn test_parse_landing_fixture() {
        let page = PageConfig::parse(LANDING).unwrap();

        assert_eq!(page.viewport.height, 800.0);
        assert_eq!(page.elemation.trigger.as_deref(), Some("#features"));
        assert_eq!(page.elemation.interval_ms, 300);
        assert_eq!(page.elements.len(), 5);
        assert_eq!(page.scroll.len(), 3);
    }

    #[test]
    fn test_defaults() {
        let page = PageConfig::parse("").unwrap();

        assert_eq!(page.viewport.width, 1280.0);
        assert_eq!(page.viewport.height, 800.0);
        assert_eq!(page.elemation, ElemationConfig::default());
        assert!(page.elements.is_empty());
    }

    #[test]
    fn test_element_defaults() {
        let page = PageConfig::parse("[[elements]]\nclass = \"card\"\n").unwrap();
        let element = &page.elements[0];

        assert_eq!(element.tag, "div");
        assert_eq!(element.id, None);
        assert_eq!(element.top, 0.0);
    }

    #[test]
    fn test_rejects_negative_height() {
        let err = PageConfig::parse("[[elements]]\nheight = -4.0\n").unwrap_err();
        assert!(err.to_string().contains("negative size"));
    }

    #[test]
    fn test_rejects_invalid_elemation() {
        assert!(PageConfig::parse("[elemation]\nappend_class = \"\"\n").is_err());
    }

    #[test]
    fn test_build_host() {
        let page = PageConfig::parse(LANDING).unwrap();
        let host = page.build_host();

        assert_eq!(host.len(), 5);
        assert_eq!(host.viewport_size(), (1280.0, 800.0));

        let trigger = host.query_one("#features").unwrap().unwrap();
        assert_eq!(host.element_bounds(&trigger).y, 1000.0);
        assert_eq!(host.query_all(".card").unwrap().len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PageConfig::load(Path::new("/nonexistent/page.toml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
