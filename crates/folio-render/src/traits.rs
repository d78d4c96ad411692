// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic renderer contract.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use folio_core::error::Result;
use folio_core::{Color, ExportConfig};

use crate::raster::RasterBuffer;

/// Rasterises a report subtree into pixels.
///
/// Implementations own layout and typesetting; Folio only consumes the
/// resulting buffer. Any failure (including an empty result) must surface as
/// `FolioError::Render`.
pub trait Renderer {
    /// Handle to the subtree being exported.
    type Node: ?Sized + Sync;

    fn render(
        &self,
        node: &Self::Node,
        options: &RenderOptions,
    ) -> impl Future<Output = Result<RasterBuffer>> + Send;
}

/// Tag names that never appear in an exported report.
const NON_PRINTABLE_TAGS: &[&str] = &[
    "script", "style", "link", "meta", "noscript", "template", "iframe", "object", "embed",
];

/// Class that marks an element as screen-only.
pub const NO_EXPORT_CLASS: &str = "no-export";

/// Minimal description of a renderable element, enough to decide whether it
/// belongs in the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

impl NodeDescriptor {
    /// Create a descriptor for an element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add a class name.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Decides which elements the renderer must skip.
#[derive(Clone)]
pub struct ExcludePredicate(Arc<dyn Fn(&NodeDescriptor) -> bool + Send + Sync>);

impl ExcludePredicate {
    /// Wrap a custom exclusion rule.
    pub fn new(predicate: impl Fn(&NodeDescriptor) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// `true` if the element should be left out of the render.
    pub fn excludes(&self, node: &NodeDescriptor) -> bool {
        (self.0)(node)
    }
}

impl Default for ExcludePredicate {
    /// Skips non-printable tags and anything flagged non-exportable via the
    /// `no-export` class or `data-export="false"`.
    fn default() -> Self {
        Self::new(|node| {
            let tag = node.tag.to_ascii_lowercase();
            NON_PRINTABLE_TAGS.contains(&tag.as_str())
                || node.classes.iter().any(|c| c == NO_EXPORT_CLASS)
                || node
                    .attribute("data-export")
                    .is_some_and(|v| v.eq_ignore_ascii_case("false"))
        })
    }
}

impl fmt::Debug for ExcludePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExcludePredicate(..)")
    }
}

/// Options passed to every render call.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Device pixel ratio.
    pub pixel_density: f32,
    /// Fill colour behind transparent content.
    pub background: Color,
    pub exclude: ExcludePredicate,
}

impl RenderOptions {
    /// Render options taken from an export configuration, with the default exclusions.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            pixel_density: config.pixel_density,
            background: config.background,
            exclude: ExcludePredicate::default(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_predicate_skips_non_printable_tags() {
        let exclude = ExcludePredicate::default();
        for tag in ["script", "STYLE", "iframe", "embed", "object"] {
            assert!(exclude.excludes(&NodeDescriptor::new(tag)), "{tag} kept");
        }
        assert!(!exclude.excludes(&NodeDescriptor::new("div")));
        assert!(!exclude.excludes(&NodeDescriptor::new("svg")));
    }

    #[test]
    fn default_predicate_honours_export_flags() {
        let exclude = ExcludePredicate::default();
        let button = NodeDescriptor::new("button").with_class(NO_EXPORT_CLASS);
        assert!(exclude.excludes(&button));

        let toolbar = NodeDescriptor::new("nav").with_attribute("data-export", "False");
        assert!(exclude.excludes(&toolbar));

        let kept = NodeDescriptor::new("section").with_attribute("data-export", "true");
        assert!(!exclude.excludes(&kept));
    }

    #[test]
    fn options_follow_config() {
        let config = ExportConfig {
            pixel_density: 2.0,
            ..ExportConfig::default()
        };
        let options = RenderOptions::from_config(&config);
        assert_eq!(options.pixel_density, 2.0);
        assert_eq!(options.background, Color::WHITE);
    }
}
