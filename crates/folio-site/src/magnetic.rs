#![forbid(unsafe_code)]

//! Magnetic hover: elements lean toward the pointer while it is over them and
//! spring back when it leaves.
//!
//! Each registered element remembers its bounding box (from
//! [`Event::Bounds`](folio_core::event::Event::Bounds)). On every pointer move
//! the field checks each box: inside, the element is pulled to
//! `(pointer - centre) * strength` and tilted by `dx * rotation_factor`;
//! leaving a box releases the element back to rest with the same easing.

use std::time::Duration;

use folio_core::animation::{Animator, Step, ease_out_cubic, elastic_out};
use folio_core::geometry::{Point, Rect};
use folio_core::scene::{Prop, Scene, Target};

pub const MAGNET: Target = Target::new("magnetic");

const PULL: Duration = Duration::from_millis(1200);
const TILT: Duration = Duration::from_millis(1000);

/// How strongly an element follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pull {
    pub strength: f32,
    /// Degrees of tilt per pixel of horizontal offset from the centre.
    pub rotation_factor: f32,
}

impl Pull {
    /// Contact section social icons.
    pub const SOCIAL: Self = Self {
        strength: 0.6,
        rotation_factor: 0.8,
    };
    /// Dock items and the résumé button.
    pub const DOCK: Self = Self {
        strength: 0.4,
        rotation_factor: 0.0,
    };
}

#[derive(Debug, Clone)]
struct Magnet {
    id: String,
    pull: Pull,
    bounds: Option<Rect>,
    engaged: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MagneticField {
    magnets: Vec<Magnet>,
}

impl MagneticField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register element `id`. Returns its animation target.
    pub fn register(&mut self, id: impl Into<String>, pull: Pull) -> Target {
        let index = self.magnets.len();
        self.magnets.push(Magnet {
            id: id.into(),
            pull,
            bounds: None,
            engaged: false,
        });
        MAGNET.nth(index as u16)
    }

    /// Animation target of element `id`, if registered.
    pub fn target_of(&self, id: &str) -> Option<Target> {
        self.magnets
            .iter()
            .position(|m| m.id == id)
            .map(|i| MAGNET.nth(i as u16))
    }

    /// Record element geometry. Returns whether `id` is a registered element.
    pub fn set_bounds(&mut self, id: &str, rect: Rect) -> bool {
        match self.magnets.iter_mut().find(|m| m.id == id) {
            Some(magnet) => {
                magnet.bounds = Some(rect);
                true
            }
            None => false,
        }
    }

    pub fn on_pointer_move(&mut self, p: Point, animator: &mut Animator) {
        for (i, magnet) in self.magnets.iter_mut().enumerate() {
            let target = MAGNET.nth(i as u16);
            match magnet.bounds.filter(|r| !r.is_empty() && r.contains(p)) {
                Some(rect) => {
                    let c = rect.center();
                    magnet.engaged = true;
                    pull_to(animator, target, magnet.pull, p.x - c.x, p.y - c.y);
                }
                None if magnet.engaged => {
                    magnet.engaged = false;
                    pull_to(animator, target, magnet.pull, 0.0, 0.0);
                }
                None => {}
            }
        }
    }

    /// The pointer left the window: release everything.
    pub fn release_all(&mut self, animator: &mut Animator) {
        for (i, magnet) in self.magnets.iter_mut().enumerate() {
            if magnet.engaged {
                magnet.engaged = false;
                pull_to(animator, MAGNET.nth(i as u16), magnet.pull, 0.0, 0.0);
            }
        }
    }

    pub fn is_engaged(&self, id: &str) -> bool {
        self.magnets.iter().any(|m| m.id == id && m.engaged)
    }

    pub fn view(&self, animator: &Animator, scene: &mut Scene) {
        for i in 0..self.magnets.len() {
            let target = MAGNET.nth(i as u16);
            for prop in [Prop::X, Prop::Y, Prop::Rotation] {
                scene.set_prop(target, prop, animator.value(target, prop));
            }
        }
    }

    pub fn teardown(&mut self, animator: &mut Animator) {
        for (i, magnet) in self.magnets.iter_mut().enumerate() {
            magnet.engaged = false;
            animator.cancel_target(MAGNET.nth(i as u16));
        }
    }
}

/// `dx`/`dy` are raw offsets from the element centre; `(0, 0)` releases.
fn pull_to(animator: &mut Animator, target: Target, pull: Pull, dx: f32, dy: f32) {
    animator.tween(Step::to(target, Prop::X, dx * pull.strength, PULL).ease(elastic_out));
    animator.tween(Step::to(target, Prop::Y, dy * pull.strength, PULL).ease(elastic_out));
    if pull.rotation_factor != 0.0 {
        animator.tween(
            Step::to(target, Prop::Rotation, dx * pull.rotation_factor, TILT).ease(ease_out_cubic),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn field() -> (MagneticField, Target, Target) {
        let mut field = MagneticField::new();
        let github = field.register("social:github", Pull::SOCIAL);
        let about = field.register("nav:about", Pull::DOCK);
        field.set_bounds("social:github", Rect::new(100.0, 100.0, 40.0, 40.0));
        field.set_bounds("nav:about", Rect::new(300.0, 500.0, 60.0, 40.0));
        (field, github, about)
    }

    #[test]
    fn pulls_toward_pointer_with_tilt() {
        let (mut field, github, _) = field();
        let mut animator = Animator::new();
        // Centre is (120, 120).
        field.on_pointer_move(Point::new(130.0, 110.0), &mut animator);
        assert!(field.is_engaged("social:github"));
        animator.tick(PULL);
        assert!(approx(animator.value(github, Prop::X), 6.0));
        assert!(approx(animator.value(github, Prop::Y), -6.0));
        assert!(approx(animator.value(github, Prop::Rotation), 8.0));
    }

    #[test]
    fn dock_items_do_not_tilt() {
        let (mut field, _, about) = field();
        let mut animator = Animator::new();
        field.on_pointer_move(Point::new(350.0, 520.0), &mut animator);
        animator.tick(PULL);
        assert!(approx(animator.value(about, Prop::X), 8.0));
        assert_eq!(animator.value(about, Prop::Rotation), 0.0);
    }

    #[test]
    fn leaving_springs_back() {
        let (mut field, github, _) = field();
        let mut animator = Animator::new();
        field.on_pointer_move(Point::new(135.0, 135.0), &mut animator);
        animator.tick(Duration::from_millis(300));
        field.on_pointer_move(Point::new(600.0, 10.0), &mut animator);
        assert!(!field.is_engaged("social:github"));
        animator.tick(PULL);
        assert_eq!(animator.value(github, Prop::X), 0.0);
        assert_eq!(animator.value(github, Prop::Rotation), 0.0);
    }

    #[test]
    fn window_leave_releases_all() {
        let (mut field, github, _) = field();
        let mut animator = Animator::new();
        field.on_pointer_move(Point::new(101.0, 101.0), &mut animator);
        field.release_all(&mut animator);
        animator.tick(PULL);
        assert_eq!(animator.value(github, Prop::Y), 0.0);
    }

    #[test]
    fn unmeasured_or_unknown_elements_are_inert() {
        let mut field = MagneticField::new();
        let target = field.register("social:x", Pull::SOCIAL);
        assert!(!field.set_bounds("social:y", Rect::new(0.0, 0.0, 10.0, 10.0)));
        let mut animator = Animator::new();
        field.on_pointer_move(Point::new(5.0, 5.0), &mut animator);
        assert_eq!(animator.active_count(), 0);
        assert_eq!(field.target_of("social:x"), Some(target));
        assert_eq!(field.target_of("social:y"), None);
    }
}
