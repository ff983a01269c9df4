#![forbid(unsafe_code)]

//! Scroll progress bar and the scroll-to-top button.

use std::time::Duration;

use folio_core::animation::{Animator, Step, Timeline, ease_in, ease_out, linear};
use folio_core::effect::HostEffect;
use folio_core::event::ScrollEvent;
use folio_core::scene::{Prop, Scene, Target};
use folio_runtime::Cmd;

pub const BAR: Target = Target::new("progress.bar");
pub const TOP_BUTTON: Target = Target::new("progress.top");

const BAR_EASE: Duration = Duration::from_millis(100);
const SHOW: Duration = Duration::from_millis(400);
const HIDE: Duration = Duration::from_millis(300);
/// How far below its resting spot the hidden button sits.
const HIDDEN_DROP: f32 = 20.0;

/// Fraction of the document scrolled, in `[0, 1]`. Documents that fit the
/// viewport report 0.
pub fn scroll_ratio(scroll: &ScrollEvent) -> f32 {
    let max = scroll.max_scroll();
    if max <= 0.0 {
        return 0.0;
    }
    (scroll.scroll_y / max).clamp(0.0, 1.0) as f32
}

/// A thin bar across the top of the page whose horizontal scale tracks how
/// far the document has been scrolled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollProgress {
    ratio: f32,
}

impl ScrollProgress {
    /// Start empty.
    pub fn reset(&mut self, animator: &mut Animator) {
        self.ratio = 0.0;
        animator.set(BAR, Prop::ScaleX, 0.0);
    }

    pub fn on_scroll(&mut self, scroll: &ScrollEvent, animator: &mut Animator) {
        let ratio = scroll_ratio(scroll);
        if ratio == self.ratio {
            return;
        }
        self.ratio = ratio;
        animator.tween(Step::to(BAR, Prop::ScaleX, ratio, BAR_EASE).ease(linear));
    }

    /// Target ratio; the drawn bar eases toward it.
    #[inline]
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn view(&self, animator: &Animator, scene: &mut Scene) {
        scene.set_prop(BAR, Prop::ScaleX, animator.value(BAR, Prop::ScaleX));
    }

    pub fn teardown(&mut self, animator: &mut Animator) {
        animator.cancel_target(BAR);
    }
}

/// Floating button that appears once the reader is past the fold.
#[derive(Debug, Clone, Copy)]
pub struct ScrollToTop {
    threshold: f64,
    visible: bool,
}

impl ScrollToTop {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            visible: false,
        }
    }

    /// Start hidden.
    pub fn reset(&mut self, animator: &mut Animator) {
        self.visible = false;
        animator.set(TOP_BUTTON, Prop::Y, HIDDEN_DROP);
        animator.set(TOP_BUTTON, Prop::Opacity, 0.0);
    }

    /// Show or hide the button as `scroll_y` crosses the threshold.
    pub fn on_scroll(&mut self, scroll_y: f64, animator: &mut Animator) {
        let visible = scroll_y > self.threshold;
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        let timeline = if visible {
            Timeline::new()
                .then(Step::to(TOP_BUTTON, Prop::Y, 0.0, SHOW).ease(ease_out))
                .with(Step::to(TOP_BUTTON, Prop::Opacity, 1.0, SHOW).ease(ease_out))
        } else {
            Timeline::new()
                .then(Step::to(TOP_BUTTON, Prop::Y, HIDDEN_DROP, HIDE).ease(ease_in))
                .with(Step::to(TOP_BUTTON, Prop::Opacity, 0.0, HIDE).ease(ease_in))
        };
        animator.play(timeline);
    }

    pub fn click<M>(&self) -> Cmd<M> {
        Cmd::host(HostEffect::ScrollTo {
            y: 0.0,
            smooth: true,
        })
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn view(&self, animator: &Animator, scene: &mut Scene) {
        scene.set_flag("progress.top.visible", self.visible);
        for prop in [Prop::Y, Prop::Opacity] {
            scene.set_prop(TOP_BUTTON, prop, animator.value(TOP_BUTTON, prop));
        }
    }

    pub fn teardown(&mut self, animator: &mut Animator) {
        animator.cancel_target(TOP_BUTTON);
    }
}
