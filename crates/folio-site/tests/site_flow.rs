//! End-to-end flows through the whole site on the simulator's virtual clock.

use std::rc::Rc;
use std::time::Duration;

use folio_core::effect::HostEffect;
use folio_core::event::{AnchorLayout, Event, PointerEvent};
use folio_core::scene::Prop;
use folio_runtime::{MemoryPreferences, Preferences, ProgramSimulator};
use folio_site::config::{PreloaderConfig, SiteConfig};
use folio_site::contributions::{FeedError, FeedState, StaticSource};
use folio_site::dock::DOCK;
use folio_site::router::{SubPage, View};
use folio_site::scroll_spy::SectionId;
use folio_site::sound::RecordingAudio;
use folio_site::theme::ThemeMode;
use folio_site::toggle::BULB;
use folio_site::{Site, SiteContent};
use pretty_assertions::assert_eq;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn config() -> SiteConfig {
    SiteConfig {
        preloader: PreloaderConfig::default().with_ceiling(ms(90)),
        ..SiteConfig::default()
    }
    .with_seed(42)
}

fn site_with(audio: RecordingAudio) -> Site {
    Site::new(
        config(),
        SiteContent::default(),
        Preferences::in_memory().shared(),
        Box::new(audio),
    )
}

fn boot(site: Site) -> ProgramSimulator<Site> {
    let mut sim = ProgramSimulator::new(site);
    sim.init();
    assert!(sim.advance_until(ms(16), ms(3000), Site::is_interactive));
    sim
}

fn home_layout() -> Event {
    Event::Layout(vec![
        AnchorLayout::new("hero", 0.0, 800.0),
        AnchorLayout::new("about", 800.0, 800.0),
        AnchorLayout::new("work", 1600.0, 1000.0),
        AnchorLayout::new("contact", 2600.0, 800.0),
    ])
}

#[test]
fn boot_locks_then_releases_scroll() {
    let mut sim = ProgramSimulator::new(site_with(RecordingAudio::new()));
    sim.init();
    let effects = sim.take_effects();
    assert!(effects.contains(&HostEffect::SetScrollLock(true)));
    assert!(effects.contains(&HostEffect::scroll_to_origin()));
    assert!(effects.iter().any(|e| matches!(
        e,
        HostEffect::SetDocumentClass { enabled: false, .. }
    )));
    assert!(sim.capture_scene().flag("preloader.visible"));

    assert!(sim.advance_until(ms(16), ms(3000), Site::is_interactive));
    assert_eq!(sim.take_effects(), vec![HostEffect::SetScrollLock(false)]);
    let scene = sim.capture_scene();
    assert!(scene.flag("site.loaded"));
    assert!(!scene.flag("preloader.visible"));
    assert!(scene.flag("dock.visible"));
}

#[test]
fn input_is_ignored_while_loading() {
    let audio = RecordingAudio::new();
    let mut sim = ProgramSimulator::new(site_with(audio.clone()));
    sim.init();
    sim.inject_event(Event::click("sound"));
    sim.inject_event(Event::click("goals"));
    assert!(sim.model().sound().is_muted());
    assert_eq!(sim.model().router().view(), View::Home);
    assert_eq!(audio.opens(), 0);
}

#[test]
fn loaded_callback_runs_once() {
    let count = Rc::new(std::cell::Cell::new(0));
    let seen = Rc::clone(&count);
    let mut sim = boot(site_with(RecordingAudio::new()).on_loaded(move || seen.set(seen.get() + 1)));
    sim.advance(ms(2000));
    assert_eq!(count.get(), 1);
}

#[test]
fn scrolling_drives_dock_and_scroll_to_top() {
    let mut sim = boot(site_with(RecordingAudio::new()));
    sim.inject_event(home_layout());
    sim.inject_event(Event::scroll(1500.0, 800.0, 3400.0));
    assert_eq!(sim.model().spy().active(), SectionId::Work);
    assert_eq!(sim.model().dock().active(), SectionId::Work);
    assert!(sim.model().scroll_to_top().is_visible());

    // Between anchors nothing changes.
    sim.inject_event(Event::Layout(vec![AnchorLayout::new("hero", 0.0, 100.0)]));
    sim.inject_event(Event::scroll(900.0, 800.0, 3400.0));
    assert_eq!(sim.model().dock().active(), SectionId::Work);

    sim.inject_event(Event::scroll(100.0, 800.0, 3400.0));
    assert!(!sim.model().scroll_to_top().is_visible());

    sim.take_effects();
    sim.inject_event(Event::click("scroll-top"));
    assert_eq!(
        sim.take_effects(),
        vec![HostEffect::ScrollTo {
            y: 0.0,
            smooth: true
        }]
    );
}

#[test]
fn dock_links_scroll_and_open_externally() {
    let mut sim = boot(site_with(RecordingAudio::new()));
    sim.take_effects();
    sim.inject_event(Event::click("nav:contact"));
    sim.inject_event(Event::click("resume"));
    sim.inject_event(Event::click("social:github"));
    sim.inject_event(Event::click("project:2:code"));
    let resume = sim.model().content().resume_url.clone();
    assert_eq!(
        sim.take_effects(),
        vec![
            HostEffect::ScrollIntoView {
                anchor: "contact".into()
            },
            HostEffect::OpenExternal { url: resume },
            HostEffect::OpenExternal {
                url: "https://github.com".into()
            },
            HostEffect::OpenExternal {
                url: "https://github.com/example/aero".into()
            },
        ]
    );
}

#[test]
fn project_overlay_suspends_chrome_and_locks_scroll() {
    let mut sim = boot(site_with(RecordingAudio::new()));
    sim.take_effects();

    sim.inject_event(Event::click("project:3"));
    assert_eq!(sim.take_effects(), vec![HostEffect::SetScrollLock(true)]);
    assert!(sim.model().modal().is_open());
    assert!(sim.model().dock().is_suspended());
    assert!(sim.model().toggle().is_hidden());
    sim.advance(ms(700));
    let scene = sim.capture_scene();
    assert!(scene.flag("scroll.locked"));
    assert_eq!(scene.text("modal.project"), Some("Nexus Chat"));

    sim.inject_event(Event::click("modal.close"));
    assert_eq!(sim.take_effects(), vec![HostEffect::SetScrollLock(false)]);
    assert!(!sim.model().dock().is_suspended());
    assert!(!sim.model().toggle().is_hidden());

    // Unknown projects do nothing.
    sim.inject_event(Event::click("project:99"));
    assert!(!sim.model().modal().is_open());
    assert!(sim.take_effects().is_empty());
}

#[test]
fn sub_pages_hide_home_chrome() {
    let mut sim = boot(site_with(RecordingAudio::new()));
    sim.inject_event(home_layout());
    sim.take_effects();

    sim.inject_event(Event::click("goals"));
    assert_eq!(sim.model().router().view(), View::SubPage(SubPage::Goals));
    assert_eq!(sim.take_effects(), vec![HostEffect::scroll_to_origin()]);
    sim.advance(ms(2000));
    let scene = sim.capture_scene();
    assert!(!scene.flag("dock.visible"));
    assert!(!scene.flag("progress.visible"));
    assert_eq!(scene.text("site.view"), Some("goals"));
    assert_eq!(scene.text("goals.progress"), Some("0%"));

    // Sub-page to sub-page is not a route.
    sim.inject_event(Event::click("review"));
    assert_eq!(sim.model().router().view(), View::SubPage(SubPage::Goals));

    // Scrolling a sub-page leaves the spy alone.
    sim.inject_event(Event::scroll(2700.0, 800.0, 3400.0));
    assert_eq!(sim.model().spy().active(), SectionId::Hero);

    sim.inject_event(Event::click("back"));
    assert_eq!(sim.model().router().view(), View::Home);
    sim.advance(ms(1500));
    assert!(sim.capture_scene().flag("dock.visible"));
}

#[test]
fn sound_toggle_and_gated_tones() {
    let audio = RecordingAudio::new();
    let mut sim = boot(site_with(audio.clone()));

    sim.inject_event(Event::hover("nav:work"));
    sim.inject_event(Event::click("nav:work"));
    assert!(audio.played().is_empty());

    sim.inject_event(Event::click("sound"));
    assert!(!sim.model().sound().is_muted());
    assert_eq!(audio.played().len(), 1);

    sim.inject_event(Event::hover("nav:work"));
    sim.inject_event(Event::click("nav:about"));
    assert_eq!(audio.played().len(), 3);

    sim.inject_event(Event::click("sound"));
    assert!(sim.model().sound().is_muted());
    sim.inject_event(Event::hover("logo"));
    assert_eq!(audio.played().len(), 3);
    assert_eq!(audio.opens(), 1);
}

#[test]
fn blocked_audio_stays_muted() {
    let audio = RecordingAudio::refusing();
    let mut sim = boot(site_with(audio.clone()));
    sim.inject_event(Event::click("sound"));
    sim.inject_event(Event::click("sound"));
    assert!(sim.model().sound().is_muted());
    assert!(sim.capture_scene().flag("sound.muted"));
    assert_eq!(audio.opens(), 1);
}

#[test]
fn logo_hover_scrambles_then_settles() {
    let mut sim = boot(site_with(RecordingAudio::new()));
    sim.inject_event(Event::hover("logo"));
    assert!(sim.model().scramble(0).is_some_and(|s| s.is_running()));
    sim.advance(ms(90));
    assert_ne!(sim.capture_scene().text("logo.text"), Some("Satish"));

    sim.advance(ms(1000));
    let scramble = sim.model().scramble(0).expect("logo scramble");
    assert!(!scramble.is_running());
    assert_eq!(sim.capture_scene().text("logo.text"), Some("Satish"));
}

#[test]
fn feed_failure_degrades_to_empty() {
    let site = site_with(RecordingAudio::new())
        .with_feed_source(Rc::new(StaticSource::failing(FeedError::Transport("offline".into()))));
    let mut sim = boot(site);
    assert_eq!(sim.model().feed().state(), &FeedState::Empty);
    let scene = sim.capture_scene();
    assert_eq!(scene.text("feed.state"), Some("empty"));
    assert!(scene.flag("site.loaded"));
}

#[test]
fn feed_success_renders_totals() {
    let body = r#"{"contributions":[
        {"date":"2024-01-07","count":3},
        {"date":"2024-01-08","count":1200}
    ]}"#;
    let site = site_with(RecordingAudio::new()).with_feed_source(Rc::new(StaticSource::ok(body)));
    let mut sim = boot(site);
    assert!(matches!(sim.model().feed().state(), FeedState::Ready(_)));
    assert_eq!(sim.capture_scene().text("feed.total"), Some("1,203"));
}

#[test]
fn wall_clock_ticks_render() {
    let mut sim = boot(site_with(RecordingAudio::new()));
    assert_eq!(sim.capture_scene().text("clock.time"), Some("--:--:--"));
    // 2024-01-01T00:00:00Z in +05:30.
    sim.inject_event(Event::WallClock {
        unix_ms: 1_704_067_200_000,
    });
    assert_eq!(sim.capture_scene().text("clock.time"), Some("05:30:00"));
}

#[test]
fn persisted_light_theme_applies_at_boot() {
    let backend = Rc::new(MemoryPreferences::with_values([("theme", "light")]));
    let prefs = Preferences::new(Box::new(Rc::clone(&backend))).shared();
    let site = Site::new(config(), SiteContent::default(), prefs, Box::new(RecordingAudio::new()));
    let mut sim = ProgramSimulator::new(site);
    sim.init();
    assert_eq!(sim.model().theme().get(), ThemeMode::Light);
    assert!(sim.effects().iter().any(|e| matches!(
        e,
        HostEffect::SetDocumentClass { enabled: true, .. }
    )));
}

#[test]
fn teardown_cancels_everything() {
    let mut sim = ProgramSimulator::new(site_with(RecordingAudio::new()));
    sim.init();
    sim.advance(ms(30));
    assert!(!sim.pending_timers().is_empty());
    sim.take_effects();

    sim.shutdown();
    assert!(sim.pending_timers().is_empty());
    assert!(!sim.model().scroll_lock().is_locked());
    assert_eq!(sim.take_effects(), vec![HostEffect::SetScrollLock(false)]);
    assert_eq!(sim.model().animator().active_count(), 0);
}

fn press_bulb() -> Event {
    Event::Pointer(PointerEvent::down(100.0, 40.0).on(BULB.name()))
}

fn lift() -> Event {
    Event::Pointer(PointerEvent::up(100.0, 40.0))
}

#[test]
fn overlapping_bulb_clicks_flip_twice() {
    let mut sim = boot(site_with(RecordingAudio::new()));
    sim.inject_event(press_bulb());
    sim.inject_event(lift());

    // Grab and drop the bulb before the first pull lands, then click again.
    sim.inject_event(press_bulb());
    sim.advance(ms(305));
    sim.inject_event(lift());
    sim.inject_event(press_bulb());
    sim.inject_event(lift());
    assert!(sim.model().toggle().is_committing());

    sim.advance(ms(8000));
    assert_eq!(sim.model().theme().get(), ThemeMode::Dark);
    assert!(!sim.model().toggle().is_committing());
}

#[test]
fn page_controls_behind_the_overlay_are_inert() {
    let audio = RecordingAudio::new();
    let mut sim = boot(site_with(audio.clone()));
    sim.inject_event(Event::click("sound"));
    sim.inject_event(Event::click("project:1"));
    sim.advance(ms(600));
    sim.take_effects();
    let tones = audio.played().len();

    for id in ["nav:work", "resume", "review", "goals", "back", "scroll-top", "logo"] {
        sim.inject_event(Event::click(id));
    }
    assert!(sim.take_effects().is_empty());
    assert_eq!(audio.played().len(), tones);
    assert_eq!(sim.model().router().view(), View::Home);

    // The overlay's own controls still work.
    sim.inject_event(Event::click("project:1:live"));
    assert_eq!(sim.take_effects().len(), 1);

    sim.advance(ms(2000));
    let scene = sim.capture_scene();
    assert!(scene.flag("dock.suspended"));
    assert_eq!(scene.prop(DOCK, Prop::Opacity), 0.0);

    sim.inject_event(Event::click("modal.close"));
    sim.inject_event(Event::click("nav:work"));
    assert_eq!(
        sim.take_effects(),
        vec![
            HostEffect::SetScrollLock(false),
            HostEffect::ScrollIntoView {
                anchor: "work".into()
            },
        ]
    );
}

#[test]
fn bulb_commit_is_written_through_to_storage() {
    let backend = Rc::new(MemoryPreferences::new());
    let prefs = Preferences::new(Box::new(Rc::clone(&backend))).shared();
    let site = Site::new(
        config(),
        SiteContent::default(),
        Rc::clone(&prefs),
        Box::new(RecordingAudio::new()),
    );
    let mut sim = boot(site);
    assert_eq!(backend.snapshot().get("theme"), None);

    sim.inject_event(press_bulb());
    sim.inject_event(lift());
    sim.advance(ms(8000));
    assert_eq!(sim.model().theme().get(), ThemeMode::Light);
    assert_eq!(backend.snapshot().get("theme").map(String::as_str), Some("light"));
    assert!(!prefs.is_dirty());
}
