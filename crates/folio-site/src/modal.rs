#![forbid(unsafe_code)]

//! Project detail overlay.
//!
//! The coordinator owns whether the overlay is open and which project it
//! shows. Opening and closing go through the same calls that engage and
//! release the [`LockReason::Modal`] scroll lock, so the lock can never
//! disagree with the overlay. The site fans `is_open` out to the dock and the
//! theme toggle after each change.

use std::time::Duration;

use folio_core::animation::{Animator, Step, Timeline, ease_out, ease_out_cubic};
use folio_core::scene::{Prop, Scene, Target};
use folio_runtime::Cmd;

use crate::scroll_lock::{LockReason, ScrollLock};

pub const BACKDROP: Target = Target::new("modal.backdrop");
pub const CONTENT: Target = Target::new("modal.content");

/// The project an open overlay is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub id: u32,
    pub title: String,
}

impl ProjectRef {
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModalCoordinator {
    payload: Option<ProjectRef>,
}

impl ModalCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `payload`. Opening over an open overlay swaps the payload and
    /// leaves the lock and entrance alone.
    pub fn open<M>(
        &mut self,
        payload: ProjectRef,
        lock: &mut ScrollLock,
        animator: &mut Animator,
    ) -> Cmd<M> {
        let was_open = self.payload.replace(payload).is_some();
        if was_open {
            tracing::debug!("modal payload replaced");
            return Cmd::none();
        }
        tracing::debug!("modal opened");
        // The content waits out its delay already hidden.
        animator.set(CONTENT, Prop::Y, 100.0);
        animator.set(CONTENT, Prop::Opacity, 0.0);
        animator.play(
            Timeline::new()
                .then(
                    Step::from_to(BACKDROP, Prop::Opacity, 0.0, 1.0, Duration::from_millis(400))
                        .ease(ease_out),
                )
                .at(
                    Duration::from_millis(100),
                    Step::from_to(CONTENT, Prop::Y, 100.0, 0.0, Duration::from_millis(600))
                        .ease(ease_out_cubic),
                )
                .with(
                    Step::from_to(CONTENT, Prop::Opacity, 0.0, 1.0, Duration::from_millis(600))
                        .ease(ease_out_cubic),
                ),
        );
        lock.engage(LockReason::Modal)
    }

    /// Hide the overlay. Closing a closed overlay is a no-op.
    pub fn close<M>(&mut self, lock: &mut ScrollLock, animator: &mut Animator) -> Cmd<M> {
        if self.payload.take().is_none() {
            return Cmd::none();
        }
        tracing::debug!("modal closed");
        animator.cancel_target(BACKDROP);
        animator.cancel_target(CONTENT);
        lock.release(LockReason::Modal)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.payload.is_some()
    }

    pub fn payload(&self) -> Option<&ProjectRef> {
        self.payload.as_ref()
    }

    pub fn view(&self, animator: &Animator, scene: &mut Scene) {
        scene.set_flag("modal.open", self.is_open());
        if let Some(project) = &self.payload {
            scene.set_text("modal.project", project.title.as_str());
            for target in [BACKDROP, CONTENT] {
                scene.set_prop(target, Prop::Opacity, animator.value(target, Prop::Opacity));
            }
            scene.set_prop(CONTENT, Prop::Y, animator.value(CONTENT, Prop::Y));
        }
    }

    pub fn teardown<M>(&mut self, lock: &mut ScrollLock, animator: &mut Animator) -> Cmd<M> {
        self.close(lock, animator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::effect::HostEffect;

    fn lock_effect(cmd: Cmd<()>) -> Option<bool> {
        match cmd {
            Cmd::Host(HostEffect::SetScrollLock(on)) => Some(on),
            _ => None,
        }
    }

    #[test]
    fn open_and_close_drive_the_lock() {
        let mut modal = ModalCoordinator::new();
        let mut lock = ScrollLock::new();
        let mut animator = Animator::new();

        let cmd = modal.open(ProjectRef::new(1, "Neon Finance"), &mut lock, &mut animator);
        assert_eq!(lock_effect(cmd), Some(true));
        assert!(modal.is_open());
        assert!(lock.holds(LockReason::Modal));

        assert_eq!(lock_effect(modal.close(&mut lock, &mut animator)), Some(false));
        assert!(!modal.is_open());
        assert!(modal.payload().is_none());
        assert!(!lock.is_locked());
    }

    #[test]
    fn reopening_swaps_payload_without_relocking() {
        let mut modal = ModalCoordinator::new();
        let mut lock = ScrollLock::new();
        let mut animator = Animator::new();

        let _: Cmd<()> = modal.open(ProjectRef::new(1, "Neon Finance"), &mut lock, &mut animator);
        let cmd: Cmd<()> = modal.open(ProjectRef::new(2, "Aero Space"), &mut lock, &mut animator);
        assert!(cmd.is_none());
        assert_eq!(modal.payload().map(|p| p.id), Some(2));

        // One close is enough.
        assert_eq!(lock_effect(modal.close(&mut lock, &mut animator)), Some(false));
        assert!(modal.close::<()>(&mut lock, &mut animator).is_none());
    }

    #[test]
    fn preloader_lock_outlives_modal() {
        let mut modal = ModalCoordinator::new();
        let mut lock = ScrollLock::new();
        let mut animator = Animator::new();
        let _: Cmd<()> = lock.engage(LockReason::Preloader);

        let open: Cmd<()> = modal.open(ProjectRef::new(3, "Nexus Chat"), &mut lock, &mut animator);
        assert!(open.is_none());
        let close: Cmd<()> = modal.close(&mut lock, &mut animator);
        assert!(close.is_none());
        assert!(lock.is_locked());
    }

    #[test]
    fn entrance_fades_backdrop_then_slides_content() {
        let mut modal = ModalCoordinator::new();
        let mut lock = ScrollLock::new();
        let mut animator = Animator::new();
        let _: Cmd<()> = modal.open(ProjectRef::new(4, "Zen Notes"), &mut lock, &mut animator);

        assert_eq!(animator.value(BACKDROP, Prop::Opacity), 0.0);
        assert_eq!(animator.value(CONTENT, Prop::Opacity), 0.0);
        animator.tick(Duration::from_millis(400));
        assert_eq!(animator.value(BACKDROP, Prop::Opacity), 1.0);
        assert!(animator.value(CONTENT, Prop::Y) > 0.0);
        animator.tick(Duration::from_millis(300));
        assert_eq!(animator.value(CONTENT, Prop::Y), 0.0);
        assert_eq!(animator.value(CONTENT, Prop::Opacity), 1.0);
    }
}
