#![forbid(unsafe_code)]

//! Custom cursor: a small dot glued to the pointer and a ring that trails
//! behind it. Touch input turns the whole thing off for the rest of the
//! session.

use std::time::Duration;

use folio_core::animation::{Animator, Step, ease_out_cubic};
use folio_core::event::{PointerEvent, PointerPhase};
use folio_core::scene::{Prop, Scene, Target};

pub const DOT: Target = Target::new("cursor.dot");
pub const RING: Target = Target::new("cursor.ring");

const DOT_LAG: Duration = Duration::from_millis(100);
const RING_LAG: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy)]
pub struct CursorTrail {
    enabled: bool,
    seen: bool,
}

impl Default for CursorTrail {
    fn default() -> Self {
        Self {
            enabled: true,
            seen: false,
        }
    }
}

impl CursorTrail {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pointer(&mut self, event: &PointerEvent, animator: &mut Animator) {
        if event.pointer.is_coarse() {
            if self.enabled {
                tracing::debug!("coarse pointer seen; cursor trail disabled");
                self.teardown(animator);
            }
            self.enabled = false;
            return;
        }
        if !self.enabled || event.phase != PointerPhase::Move {
            return;
        }
        let p = event.position;
        if !self.seen {
            // First sighting: appear under the pointer instead of flying in
            // from the corner.
            self.seen = true;
            for target in [DOT, RING] {
                animator.set(target, Prop::X, p.x);
                animator.set(target, Prop::Y, p.y);
            }
            return;
        }
        for (target, lag) in [(DOT, DOT_LAG), (RING, RING_LAG)] {
            animator.tween(Step::to(target, Prop::X, p.x, lag).ease(ease_out_cubic));
            animator.tween(Step::to(target, Prop::Y, p.y, lag).ease(ease_out_cubic));
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn view(&self, animator: &Animator, scene: &mut Scene) {
        scene.set_flag("cursor.visible", self.enabled && self.seen);
        if self.enabled {
            for target in [DOT, RING] {
                scene.set_prop(target, Prop::X, animator.value(target, Prop::X));
                scene.set_prop(target, Prop::Y, animator.value(target, Prop::Y));
            }
        }
    }

    pub fn teardown(&mut self, animator: &mut Animator) {
        animator.cancel_target(DOT);
        animator.cancel_target(RING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::event::PointerType;

    #[test]
    fn ring_lags_behind_dot() {
        let mut trail = CursorTrail::new();
        let mut animator = Animator::new();
        trail.on_pointer(&PointerEvent::moved(0.0, 0.0), &mut animator);
        trail.on_pointer(&PointerEvent::moved(200.0, 100.0), &mut animator);

        animator.tick(DOT_LAG);
        assert_eq!(animator.value(DOT, Prop::X), 200.0);
        let ring = animator.value(RING, Prop::X);
        assert!(ring > 0.0 && ring < 200.0);

        animator.tick(RING_LAG - DOT_LAG);
        assert_eq!(animator.value(RING, Prop::X), 200.0);
        assert_eq!(animator.value(RING, Prop::Y), 100.0);
    }

    #[test]
    fn first_move_snaps() {
        let mut trail = CursorTrail::new();
        let mut animator = Animator::new();
        trail.on_pointer(&PointerEvent::moved(40.0, 30.0), &mut animator);
        assert_eq!(animator.value(RING, Prop::X), 40.0);
        assert_eq!(animator.active_count(), 0);
    }

    #[test]
    fn newer_target_supersedes_older() {
        let mut trail = CursorTrail::new();
        let mut animator = Animator::new();
        trail.on_pointer(&PointerEvent::moved(0.0, 0.0), &mut animator);
        trail.on_pointer(&PointerEvent::moved(100.0, 0.0), &mut animator);
        animator.tick(Duration::from_millis(16));
        trail.on_pointer(&PointerEvent::moved(-100.0, 0.0), &mut animator);
        animator.tick(RING_LAG);
        assert_eq!(animator.value(RING, Prop::X), -100.0);
        assert_eq!(animator.value(DOT, Prop::X), -100.0);
    }

    #[test]
    fn touch_disables_for_good() {
        let mut trail = CursorTrail::new();
        let mut animator = Animator::new();
        let mut scene = Scene::new();
        trail.on_pointer(
            &PointerEvent::down(5.0, 5.0).with_pointer(PointerType::Touch),
            &mut animator,
        );
        assert!(!trail.is_enabled());
        trail.on_pointer(&PointerEvent::moved(10.0, 10.0), &mut animator);
        trail.view(&animator, &mut scene);
        assert!(!scene.flag("cursor.visible"));
        assert_eq!(animator.value(DOT, Prop::X), 0.0);
    }
}
