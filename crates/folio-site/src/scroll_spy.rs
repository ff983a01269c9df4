#![forbid(unsafe_code)]

//! Active-section tracking for the navigation dock.
//!
//! The host reports where each home section sits ([`set_anchors`]) and every
//! scroll position ([`on_scroll`]). The spy samples a point 40% of the way
//! down the viewport and picks the first section, in page order, whose
//! vertical span contains it. Between sections (or before layout arrives)
//! the previous answer stands.
//!
//! [`set_anchors`]: ScrollSpy::set_anchors
//! [`on_scroll`]: ScrollSpy::on_scroll

use std::collections::BTreeMap;
use std::fmt;

use folio_core::event::AnchorLayout;
use folio_core::geometry::Span;

use crate::config::ScrollSpyConfig;

/// A home-page section, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SectionId {
    #[default]
    Hero,
    About,
    Work,
    Contact,
}

impl SectionId {
    pub const ALL: [Self; 4] = [Self::Hero, Self::About, Self::Work, Self::Contact];

    /// Anchor id in the document.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Work => "work",
            Self::Contact => "contact",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == id)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrollSpy {
    config: ScrollSpyConfig,
    anchors: BTreeMap<SectionId, Span>,
    active: SectionId,
}

impl ScrollSpy {
    #[must_use]
    pub fn new(config: ScrollSpyConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace anchor geometry. Ids that are not home sections are ignored.
    pub fn set_anchors(&mut self, layouts: &[AnchorLayout]) {
        self.anchors = layouts
            .iter()
            .filter_map(|layout| SectionId::parse(&layout.id).map(|id| (id, layout.span)))
            .collect();
        tracing::debug!(anchors = self.anchors.len(), "scroll spy layout updated");
    }

    /// Sample the viewport. Returns the new active section when it changed.
    pub fn on_scroll(&mut self, scroll_y: f64, viewport_height: f64) -> Option<SectionId> {
        let sample = self.sample_point(scroll_y, viewport_height);
        let hit = SectionId::ALL
            .into_iter()
            .find(|id| self.anchors.get(id).is_some_and(|span| span.contains(sample)))?;
        if hit == self.active {
            return None;
        }
        self.active = hit;
        Some(hit)
    }

    /// The point the spy tests against anchor spans.
    pub fn sample_point(&self, scroll_y: f64, viewport_height: f64) -> f64 {
        scroll_y + self.config.sample_ratio * viewport_height
    }

    #[inline]
    pub fn active(&self) -> SectionId {
        self.active
    }

    pub fn anchor(&self, id: SectionId) -> Option<Span> {
        self.anchors.get(&id).copied()
    }
}
