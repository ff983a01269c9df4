//! Property tests for the site's state machines.
//!
//! # Invariants
//!
//! 1. A session with nothing persisted resolves to the dark theme.
//! 2. Whatever theme was committed last is the theme after a reload.
//! 3. The preloader completes within its ceiling for every seed, and the
//!    completion callback runs exactly once.
//! 4. The preloader percentage never decreases and never exceeds 100.
//! 5. The active section is the anchor containing the sample point, or the
//!    previous answer when no anchor contains it.
//! 6. The scroll lock tracks the project overlay across any open/close mix.
//! 7. A press shorter than the hold threshold commits and never drags; a
//!    longer press drags and never commits.
//! 8. Drag rotation stays within the configured maximum angle.
//! 9. A muted sound store never plays a tone.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use folio_core::animation::Animator;
use folio_core::event::{AnchorLayout, Event, PointerEvent};
use folio_core::scene::Prop;
use folio_runtime::{MemoryPreferences, Preferences, ProgramSimulator};
use folio_site::config::{PreloaderConfig, SiteConfig};
use folio_site::modal::{ModalCoordinator, ProjectRef};
use folio_site::preloader::{PreloadPhase, PreloaderMsg, PreloaderSequencer};
use folio_site::scroll_lock::ScrollLock;
use folio_site::scroll_spy::{ScrollSpy, SectionId};
use folio_site::sound::{NullAudio, RecordingAudio, SoundStore};
use folio_site::theme::{ThemeMode, ThemeStore};
use folio_site::toggle::{BULB, DragPhase, PIVOT};
use folio_site::{Site, SiteContent};
use proptest::prelude::*;

fn prefs_over(backend: &Rc<MemoryPreferences>) -> Rc<Preferences> {
    Preferences::new(Box::new(Rc::clone(backend))).shared()
}

fn site(seed: u64, ceiling: Duration) -> Site {
    let config = SiteConfig {
        preloader: PreloaderConfig::default().with_ceiling(ceiling),
        ..SiteConfig::default()
    }
    .with_seed(seed);
    Site::new(
        config,
        SiteContent::default(),
        Preferences::in_memory().shared(),
        Box::new(NullAudio),
    )
}

/// A site whose preloader has finished, so pointer input is live.
fn loaded(seed: u64) -> ProgramSimulator<Site> {
    let mut sim = ProgramSimulator::new(site(seed, Duration::from_millis(60)));
    sim.init();
    let done = sim.advance_until(
        Duration::from_millis(16),
        Duration::from_millis(3000),
        Site::is_interactive,
    );
    assert!(done, "preloader never finished");
    sim
}

fn press_bulb(sim: &mut ProgramSimulator<Site>, x: f32) {
    sim.inject_event(Event::Pointer(PointerEvent::down(x, 40.0).on(BULB.name())));
}

// 1 & 2: theme persistence.

#[test]
fn fresh_session_is_dark() {
    let backend = Rc::new(MemoryPreferences::new());
    assert_eq!(ThemeStore::load(prefs_over(&backend)).get(), ThemeMode::Dark);
}

proptest! {
    #[test]
    fn last_committed_theme_survives_reload(toggles in prop::collection::vec(any::<bool>(), 1..12)) {
        let backend = Rc::new(MemoryPreferences::new());
        let mut animator = Animator::new();
        let mut expected = ThemeMode::Dark;
        for light in toggles {
            let mut store = ThemeStore::load(prefs_over(&backend));
            prop_assert_eq!(store.get(), expected);
            let mode = if light { ThemeMode::Light } else { ThemeMode::Dark };
            let _ = store.set::<()>(mode, &mut animator);
            expected = mode;
        }
        prop_assert_eq!(ThemeStore::load(prefs_over(&backend)).get(), expected);
    }
}

// 3 & 4: preloader.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn preloader_completes_within_ceiling_once(seed in any::<u64>()) {
        let calls = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&calls);
        let model = site(seed, Duration::from_millis(4000))
            .on_loaded(move || counter.set(counter.get() + 1));
        let mut sim = ProgramSimulator::new(model);
        sim.init();

        sim.advance(Duration::from_millis(4000));
        prop_assert!(sim.model().preloader().is_completed());
        prop_assert_eq!(sim.model().preloader().percent(), 100);

        // The exit timeline runs for 1.5 s after completion.
        sim.advance(Duration::from_millis(1600));
        prop_assert!(sim.model().preloader().is_done());
        prop_assert!(!sim.model().scroll_lock().is_locked());
        sim.advance(Duration::from_millis(1000));
        prop_assert_eq!(calls.get(), 1);
    }
}

proptest! {
    #[test]
    fn preloader_percent_is_monotonic(seed in any::<u64>(), min in 1u32..4, extra in 0u32..8) {
        let config = PreloaderConfig::default().with_steps(min, min + extra);
        let mut pre = PreloaderSequencer::new(config, seed);
        let mut animator = Animator::new();
        let mut lock = ScrollLock::new();
        let _ = pre.start(&mut lock);

        let mut last = pre.percent();
        let mut ticks = 0;
        while pre.phase() == PreloadPhase::Running {
            let _ = pre.update(PreloaderMsg::Tick, &mut animator);
            prop_assert!(pre.percent() >= last);
            prop_assert!(pre.percent() <= 100);
            last = pre.percent();
            ticks += 1;
            prop_assert!(ticks <= 100);
        }
        prop_assert_eq!(pre.percent(), 100);
    }
}

// 5: scroll spy.

fn anchor_layout() -> impl Strategy<Value = Vec<(f64, f64)>> {
    // (gap before, height) per section, in page order.
    prop::collection::vec((0.0f64..400.0, 50.0f64..1500.0), 4)
}

proptest! {
    #[test]
    fn active_section_contains_sample_point(
        layout in anchor_layout(),
        scrolls in prop::collection::vec(0.0f64..8000.0, 1..20),
        viewport in 300.0f64..1200.0,
    ) {
        let mut spans = Vec::new();
        let mut top = 0.0;
        for (gap, height) in &layout {
            top += gap;
            spans.push((top, *height));
            top += height;
        }
        let layouts: Vec<AnchorLayout> = SectionId::ALL
            .iter()
            .zip(&spans)
            .map(|(id, (top, height))| AnchorLayout::new(id.as_str(), *top, *height))
            .collect();

        let mut spy = ScrollSpy::default();
        spy.set_anchors(&layouts);
        for scroll_y in scrolls {
            let before = spy.active();
            let _ = spy.on_scroll(scroll_y, viewport);
            let sample = spy.sample_point(scroll_y, viewport);
            let hit = SectionId::ALL
                .iter()
                .zip(&spans)
                .find(|(_, (top, height))| sample >= *top && sample < top + height)
                .map(|(id, _)| *id);
            prop_assert_eq!(spy.active(), hit.unwrap_or(before));
        }
    }
}

// 6: modal and scroll lock.

proptest! {
    #[test]
    fn scroll_lock_follows_modal(ops in prop::collection::vec(prop::option::of(1u32..5), 1..30)) {
        let mut modal = ModalCoordinator::new();
        let mut lock = ScrollLock::new();
        let mut animator = Animator::new();
        for op in ops {
            let _ = match op {
                Some(id) => modal.open::<()>(ProjectRef::new(id, format!("p{id}")), &mut lock, &mut animator),
                None => modal.close::<()>(&mut lock, &mut animator),
            };
            prop_assert_eq!(lock.is_locked(), modal.is_open());
            animator.tick(Duration::from_millis(50));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn site_scroll_lock_follows_modal(ops in prop::collection::vec(prop::option::of(1u32..5), 1..12)) {
        let mut sim = loaded(7);
        for op in ops {
            let id = match op {
                Some(project) => format!("project:{project}"),
                None => "modal.close".to_owned(),
            };
            sim.inject_event(Event::click(id));
            sim.advance(Duration::from_millis(32));
            let site = sim.model();
            prop_assert_eq!(site.scroll_lock().is_locked(), site.modal().is_open());
            prop_assert_eq!(site.dock().is_suspended(), site.modal().is_open());
            prop_assert_eq!(site.toggle().is_hidden(), site.modal().is_open());
        }
    }
}

// 7 & 8: drag versus click.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn short_press_commits_without_dragging(held in 0u64..280, seed in any::<u64>()) {
        let mut sim = loaded(seed);
        press_bulb(&mut sim, 100.0);
        prop_assert_eq!(sim.model().toggle().phase(), DragPhase::Armed);
        sim.advance(Duration::from_millis(held));
        prop_assert_ne!(sim.model().toggle().phase(), DragPhase::Dragging);
        sim.inject_event(Event::Pointer(PointerEvent::up(100.0, 40.0)));
        prop_assert!(sim.model().toggle().is_committing());

        // The hold timer is gone; waiting cannot turn this into a drag.
        sim.advance(Duration::from_millis(400));
        prop_assert_ne!(sim.model().toggle().phase(), DragPhase::Dragging);

        // Pull, recoil, and the settle swing take just under 7 s.
        sim.advance(Duration::from_millis(7000));
        prop_assert_eq!(sim.model().theme().get(), ThemeMode::Light);
        prop_assert!(!sim.model().toggle().is_committing());
    }

    #[test]
    fn long_press_drags_without_committing(
        held in 310u64..900,
        moves in prop::collection::vec(-400.0f32..400.0, 1..20),
        seed in any::<u64>(),
    ) {
        let mut sim = loaded(seed);
        press_bulb(&mut sim, 100.0);
        sim.advance(Duration::from_millis(held));
        for dx in moves {
            sim.inject_event(Event::Pointer(PointerEvent::moved(100.0 + dx, 40.0)));
            prop_assert_eq!(sim.model().toggle().phase(), DragPhase::Dragging);
            let rotation = sim.model().animator().value(PIVOT, Prop::Rotation);
            prop_assert!(rotation.abs() <= 45.0 + 1e-3, "rotation {}", rotation);
        }
        sim.inject_event(Event::Pointer(PointerEvent::up(100.0, 40.0)));
        prop_assert!(!sim.model().toggle().is_committing());

        sim.advance(Duration::from_millis(2500));
        prop_assert_eq!(sim.model().toggle().phase(), DragPhase::Idle);
        prop_assert_eq!(sim.model().theme().get(), ThemeMode::Dark);
    }
}

// 9: sound gating.

#[derive(Debug, Clone, Copy)]
enum SoundOp {
    Toggle,
    Hover,
    Click,
}

fn sound_ops() -> impl Strategy<Value = Vec<SoundOp>> {
    prop::collection::vec(
        prop_oneof![Just(SoundOp::Toggle), Just(SoundOp::Hover), Just(SoundOp::Click)],
        0..40,
    )
}

proptest! {
    #[test]
    fn muted_store_stays_silent(ops in sound_ops(), refusing in any::<bool>()) {
        let audio = if refusing { RecordingAudio::refusing() } else { RecordingAudio::new() };
        let mut store = SoundStore::new(Box::new(audio.clone()));
        let mut expected = 0;
        for op in ops {
            let before = audio.played().len();
            match op {
                SoundOp::Toggle => {
                    let was_muted = store.is_muted();
                    store.toggle();
                    // Unmuting plays one confirmation tone.
                    if was_muted && !store.is_muted() {
                        expected += 1;
                    }
                }
                SoundOp::Hover | SoundOp::Click => {
                    let muted = store.is_muted();
                    if matches!(op, SoundOp::Hover) { store.play_hover() } else { store.play_click() }
                    if !muted {
                        expected += 1;
                    } else {
                        prop_assert_eq!(audio.played().len(), before);
                    }
                }
            }
            prop_assert_eq!(audio.played().len(), expected);
        }
        prop_assert!(audio.opens() <= 1);
        if refusing {
            prop_assert!(store.is_muted());
        }
    }
}
