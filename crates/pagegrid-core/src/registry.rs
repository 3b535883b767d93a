//! Palette component templates.

use std::collections::HashMap;

/// Defaults applied when a component is dropped from the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentTemplate {
    /// Display name given to new instances.
    pub default_name: String,
    /// Initial size in grid units, if the component has a preferred one.
    pub default_size: Option<(f64, f64)>,
}

impl ComponentTemplate {
    pub fn new(default_name: impl Into<String>) -> Self {
        Self {
            default_name: default_name.into(),
            default_size: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.default_size = Some((width, height));
        self
    }
}

/// Known component types, keyed by their discriminator string.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    templates: HashMap<String, ComponentTemplate>,
}

impl ComponentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock palette.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("header", ComponentTemplate::new("Header"));
        registry.register("text", ComponentTemplate::new("Text Block"));
        registry.register("image", ComponentTemplate::new("Image"));
        registry.register("button", ComponentTemplate::new("Button").with_size(8.0, 3.0));
        registry.register("video", ComponentTemplate::new("Video").with_size(20.0, 12.0));
        registry.register("gallery", ComponentTemplate::new("Gallery").with_size(24.0, 10.0));
        registry.register("spacer", ComponentTemplate::new("Spacer").with_size(50.0, 2.0));
        registry
    }

    /// Register or replace a template.
    pub fn register(&mut self, component_type: impl Into<String>, template: ComponentTemplate) {
        self.templates.insert(component_type.into(), template);
    }

    pub fn get(&self, component_type: &str) -> Option<&ComponentTemplate> {
        self.templates.get(component_type)
    }

    pub fn contains(&self, component_type: &str) -> bool {
        self.templates.contains_key(component_type)
    }

    /// Registered type names, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let registry = ComponentRegistry::with_defaults();
        assert!(registry.contains("header"));
        assert!(!registry.contains("marquee"));
        assert_eq!(registry.get("text").unwrap().default_name, "Text Block");
        assert_eq!(registry.get("button").unwrap().default_size, Some((8.0, 3.0)));
    }
}
