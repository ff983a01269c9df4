#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! The host translates DOM events into these before handing them to the
//! runtime. Element identity travels as the element's string id (`"nav:about"`,
//! `"project:3"`); interpreting ids is the site's business, not the core's.
//!
//! # Design Notes
//!
//! - Pointer coordinates are viewport CSS pixels.
//! - Scroll metrics are document pixels (`f64`; long pages exceed `f32` precision
//!   for sub-pixel comparisons).
//! - `Frame` is synthesised by the runtime once per animation frame; hosts do
//!   not push it themselves.

use std::time::Duration;

use crate::geometry::{Point, Rect, Span};

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A pointer (mouse, touch, pen) event.
    Pointer(PointerEvent),

    /// The document scrolled.
    Scroll(ScrollEvent),

    /// Section anchor geometry changed (initial layout or resize).
    Layout(Vec<AnchorLayout>),

    /// An interactive element's bounding box changed.
    Bounds {
        id: String,
        rect: Rect,
    },

    /// The pointer entered (`entered = true`) or left an element.
    Hover {
        id: String,
        entered: bool,
    },

    /// An element was activated (click / tap / keyboard activation).
    Click {
        id: String,
    },

    /// Wall-clock time, pushed by the host about once a second.
    WallClock {
        unix_ms: i64,
    },

    /// One animation frame elapsed.
    Frame {
        dt: Duration,
    },
}

impl Event {
    /// Convenience constructor for [`Event::Click`].
    pub fn click(id: impl Into<String>) -> Self {
        Self::Click { id: id.into() }
    }

    /// Convenience constructor for a hover-enter [`Event::Hover`].
    pub fn hover(id: impl Into<String>) -> Self {
        Self::Hover {
            id: id.into(),
            entered: true,
        }
    }

    /// Convenience constructor for [`Event::Scroll`].
    pub fn scroll(scroll_y: f64, viewport_height: f64, document_height: f64) -> Self {
        Self::Scroll(ScrollEvent {
            scroll_y,
            viewport_height,
            document_height,
        })
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pointer(_) => "pointer",
            Self::Scroll(_) => "scroll",
            Self::Layout(_) => "layout",
            Self::Bounds { .. } => "bounds",
            Self::Hover { .. } => "hover",
            Self::Click { .. } => "click",
            Self::WallClock { .. } => "wall_clock",
            Self::Frame { .. } => "frame",
        }
    }
}

/// Kind of pointing device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl PointerType {
    /// Coarse pointers have no hover and get no cursor decorations.
    #[inline]
    pub const fn is_coarse(self) -> bool {
        matches!(self, Self::Touch)
    }
}

/// Pointer event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The platform aborted the gesture (e.g. a touch turned into a scroll).
    Cancel,
    /// The pointer left the element that captured it.
    Leave,
}

/// A pointer event in viewport coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    pub pointer: PointerType,
    /// Id of the element under the pointer, when the host resolved one.
    pub target: Option<String>,
}

impl PointerEvent {
    /// Create a mouse event with no resolved target.
    #[must_use]
    pub const fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
            pointer: PointerType::Mouse,
            target: None,
        }
    }

    #[must_use]
    pub const fn down(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Down, x, y)
    }

    #[must_use]
    pub const fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    #[must_use]
    pub const fn up(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Up, x, y)
    }

    #[must_use]
    pub const fn cancel() -> Self {
        Self::new(PointerPhase::Cancel, 0.0, 0.0)
    }

    #[must_use]
    pub const fn leave() -> Self {
        Self::new(PointerPhase::Leave, 0.0, 0.0)
    }

    /// Set the element id under the pointer.
    #[must_use]
    pub fn on(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the pointing device kind.
    #[must_use]
    pub const fn with_pointer(mut self, pointer: PointerType) -> Self {
        self.pointer = pointer;
        self
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    /// Whether this event was delivered on the element with `id`.
    pub fn is_on(&self, id: &str) -> bool {
        self.target.as_deref() == Some(id)
    }
}

impl From<PointerEvent> for Event {
    fn from(p: PointerEvent) -> Self {
        Self::Pointer(p)
    }
}

/// Document scroll metrics at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollEvent {
    /// Vertical scroll offset of the viewport.
    pub scroll_y: f64,
    /// Height of the viewport.
    pub viewport_height: f64,
    /// Full scrollable height of the document.
    pub document_height: f64,
}

impl ScrollEvent {
    /// Maximum reachable scroll offset.
    #[inline]
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }
}

/// Geometry of one named section anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorLayout {
    pub id: String,
    pub span: Span,
}

impl AnchorLayout {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            span: Span::new(top, height),
        }
    }
}
