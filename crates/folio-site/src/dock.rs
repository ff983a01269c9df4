#![forbid(unsafe_code)]

//! The floating navigation dock at the bottom of the home page.
//!
//! The dock highlights whichever section the scroll spy reports, scrolls to a
//! section when one of its items is clicked, and carries the résumé link. It
//! drops out of the way while the project overlay is open.

use std::time::Duration;

use folio_core::animation::{Animator, EasingFn, Step, Timeline, back_out, ease_in, ease_out};
use folio_core::effect::HostEffect;
use folio_core::scene::{Prop, Scene, Target};
use folio_runtime::Cmd;

use crate::scroll_spy::SectionId;

pub const DOCK: Target = Target::new("dock");

const ENTRANCE: Duration = Duration::from_millis(800);
const ENTRANCE_DELAY: Duration = Duration::from_millis(500);
const SUSPEND: Duration = Duration::from_millis(400);
const RESUME: Duration = Duration::from_millis(500);

/// Where the dock sits while suspended: `(y, opacity, scale)`.
const TUCKED: (f32, f32, f32) = (100.0, 0.0, 0.9);

#[derive(Debug, Clone)]
pub struct NavigationDock {
    active: SectionId,
    hovered: Option<SectionId>,
    suspended: bool,
    resume_url: String,
}

impl NavigationDock {
    #[must_use]
    pub fn new(resume_url: impl Into<String>) -> Self {
        Self {
            active: SectionId::default(),
            hovered: None,
            suspended: false,
            resume_url: resume_url.into(),
        }
    }

    /// Rise into place once the preloader is gone.
    /// While suspended the dock stays tucked; resuming brings it in.
    pub fn entrance(&self, animator: &mut Animator, reduced_motion: bool) {
        let (y, opacity, scale) = TUCKED;
        if self.suspended {
            animator.set(DOCK, Prop::Y, y);
            animator.set(DOCK, Prop::Opacity, opacity);
            animator.set(DOCK, Prop::Scale, scale);
            return;
        }
        if reduced_motion {
            animator.set(DOCK, Prop::Y, 0.0);
            animator.set(DOCK, Prop::Opacity, 1.0);
            animator.set(DOCK, Prop::Scale, 1.0);
            return;
        }
        animator.set(DOCK, Prop::Y, y);
        animator.set(DOCK, Prop::Opacity, opacity);
        animator.set(DOCK, Prop::Scale, scale);
        animator.play(
            Timeline::new()
                .then(
                    Step::from_to(DOCK, Prop::Y, y, 0.0, ENTRANCE)
                        .delay(ENTRANCE_DELAY)
                        .ease(back_out),
                )
                .with(Step::from_to(DOCK, Prop::Opacity, opacity, 1.0, ENTRANCE).ease(back_out))
                .with(Step::from_to(DOCK, Prop::Scale, scale, 1.0, ENTRANCE).ease(back_out)),
        );
    }

    /// Tuck the dock away (`true`) or bring it back.
    pub fn set_suspended(&mut self, suspended: bool, animator: &mut Animator) {
        if self.suspended == suspended {
            return;
        }
        self.suspended = suspended;
        tracing::debug!(suspended, "dock suspension changed");
        let ((y, opacity, scale), duration, easing): (_, _, EasingFn) = if suspended {
            (TUCKED, SUSPEND, ease_in)
        } else {
            ((0.0, 1.0, 1.0), RESUME, ease_out)
        };
        animator.play(
            Timeline::new()
                .then(Step::to(DOCK, Prop::Y, y, duration).ease(easing))
                .with(Step::to(DOCK, Prop::Opacity, opacity, duration).ease(easing))
                .with(Step::to(DOCK, Prop::Scale, scale, duration).ease(easing)),
        );
    }

    pub fn set_active(&mut self, section: SectionId) {
        self.active = section;
    }

    /// Track the item under the pointer for the hover pill.
    pub fn set_hovered(&mut self, section: SectionId, entered: bool) {
        if entered {
            self.hovered = Some(section);
        } else if self.hovered == Some(section) {
            self.hovered = None;
        }
    }

    /// Scroll `section` into view. A tucked dock takes no clicks.
    pub fn navigate<M>(&self, section: SectionId) -> Cmd<M> {
        if self.suspended {
            return Cmd::none();
        }
        Cmd::host(HostEffect::ScrollIntoView {
            anchor: section.as_str().to_owned(),
        })
    }

    pub fn open_resume<M>(&self) -> Cmd<M> {
        if self.suspended {
            return Cmd::none();
        }
        Cmd::host(HostEffect::OpenExternal {
            url: self.resume_url.clone(),
        })
    }

    #[inline]
    pub fn active(&self) -> SectionId {
        self.active
    }

    /// The section the highlight pill sits on: the hovered item, else the
    /// active one.
    pub fn highlighted(&self) -> SectionId {
        self.hovered.unwrap_or(self.active)
    }

    #[inline]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn view(&self, visible: bool, animator: &Animator, scene: &mut Scene) {
        scene.set_flag("dock.visible", visible);
        scene.set_flag("dock.suspended", self.suspended);
        scene.set_text("dock.active", self.active.as_str());
        scene.set_text("dock.highlight", self.highlighted().as_str());
        for prop in [Prop::Y, Prop::Opacity, Prop::Scale] {
            scene.set_prop(DOCK, prop, animator.value(DOCK, prop));
        }
    }

    pub fn teardown(&mut self, animator: &mut Animator) {
        animator.cancel_target(DOCK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/resume";

    #[test]
    fn entrance_waits_then_rises() {
        let dock = NavigationDock::new(URL);
        let mut animator = Animator::new();
        dock.entrance(&mut animator, false);
        assert_eq!(animator.value(DOCK, Prop::Y), 100.0);
        animator.tick(Duration::from_millis(400));
        assert_eq!(animator.value(DOCK, Prop::Y), 100.0);
        animator.tick(Duration::from_millis(900));
        assert_eq!(animator.value(DOCK, Prop::Y), 0.0);
        assert_eq!(animator.value(DOCK, Prop::Opacity), 1.0);
        assert_eq!(animator.value(DOCK, Prop::Scale), 1.0);
    }

    #[test]
    fn reduced_motion_skips_entrance() {
        let dock = NavigationDock::new(URL);
        let mut animator = Animator::new();
        dock.entrance(&mut animator, true);
        assert_eq!(animator.value(DOCK, Prop::Y), 0.0);
        assert_eq!(animator.active_count(), 0);
    }

    #[test]
    fn suspension_tucks_and_restores() {
        let mut dock = NavigationDock::new(URL);
        let mut animator = Animator::new();
        dock.set_suspended(true, &mut animator);
        animator.tick(SUSPEND);
        assert_eq!(animator.value(DOCK, Prop::Y), 100.0);
        assert_eq!(animator.value(DOCK, Prop::Opacity), 0.0);
        assert_eq!(animator.value(DOCK, Prop::Scale), 0.9);

        // Repeating the same state starts nothing.
        dock.set_suspended(true, &mut animator);
        assert_eq!(animator.active_count(), 0);

        dock.set_suspended(false, &mut animator);
        animator.tick(RESUME);
        assert_eq!(animator.value(DOCK, Prop::Y), 0.0);
        assert!(!dock.is_suspended());
    }

    #[test]
    fn suspended_dock_stays_tucked_and_ignores_clicks() {
        let mut dock = NavigationDock::new(URL);
        let mut animator = Animator::new();
        dock.set_suspended(true, &mut animator);
        animator.tick(SUSPEND);

        dock.entrance(&mut animator, false);
        animator.tick(Duration::from_millis(2000));
        assert_eq!(animator.value(DOCK, Prop::Y), 100.0);
        assert_eq!(animator.value(DOCK, Prop::Opacity), 0.0);
        assert!(dock.navigate::<()>(SectionId::Work).is_none());
        assert!(dock.open_resume::<()>().is_none());

        dock.set_suspended(false, &mut animator);
        animator.tick(RESUME);
        assert_eq!(animator.value(DOCK, Prop::Opacity), 1.0);
        assert!(!dock.navigate::<()>(SectionId::Work).is_none());
    }

    #[test]
    fn hover_overrides_active_highlight() {
        let mut dock = NavigationDock::new(URL);
        dock.set_active(SectionId::Work);
        assert_eq!(dock.highlighted(), SectionId::Work);
        dock.set_hovered(SectionId::Contact, true);
        assert_eq!(dock.highlighted(), SectionId::Contact);
        // Leaving some other item does not clear the hover.
        dock.set_hovered(SectionId::About, false);
        assert_eq!(dock.highlighted(), SectionId::Contact);
        dock.set_hovered(SectionId::Contact, false);
        assert_eq!(dock.highlighted(), SectionId::Work);
    }

    #[test]
    fn links_become_host_effects() {
        let dock = NavigationDock::new(URL);
        assert!(matches!(
            dock.navigate::<()>(SectionId::About),
            Cmd::Host(HostEffect::ScrollIntoView { anchor }) if anchor == "about"
        ));
        assert!(matches!(
            dock.open_resume::<()>(),
            Cmd::Host(HostEffect::OpenExternal { url }) if url == URL
        ));
    }
}
