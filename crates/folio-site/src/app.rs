#![forbid(unsafe_code)]

//! The whole site as one [`Model`].
//!
//! [`Site`] owns every component plus the shared [`Animator`] and
//! [`ScrollLock`], and routes host events to them. Components return their
//! own commands; the site lifts them into [`Msg`] with [`Cmd::map`].
//!
//! # Event routing
//!
//! | Event | Goes to |
//! |---|---|
//! | `Frame` | animator tick, then animator events to the preloader and toggle |
//! | `Scroll` | scroll spy (which feeds the dock), progress bar, scroll-to-top |
//! | `Layout` / `Bounds` | scroll spy anchors / magnetic elements |
//! | `Pointer` | theme toggle, cursor trail, magnetic elements |
//! | `Hover` | hover sound, dock highlight, text scrambles |
//! | `Click` | an [`Action`], plus the click sound |
//! | `WallClock` | local clock widget |
//!
//! Until the preloader is done the page is inert: pointer, hover, and click
//! input is dropped.

use std::fmt;
use std::rc::Rc;

use folio_core::animation::Animator;
use folio_core::effect::HostEffect;
use folio_core::event::{Event, PointerEvent, PointerPhase, ScrollEvent};
use folio_core::scene::Scene;
use folio_runtime::{Cmd, Model, Preferences};

use crate::clock::LocalClock;
use crate::config::SiteConfig;
use crate::content::SiteContent;
use crate::contributions::{ContributionFeed, ContributionGraph, ContributionSource, FeedResult};
use crate::cursor::CursorTrail;
use crate::dock::NavigationDock;
use crate::magnetic::{MagneticField, Pull};
use crate::modal::{ModalCoordinator, ProjectRef};
use crate::pages::{GoalsPage, YearInReviewPage};
use crate::preloader::{PreloaderMsg, PreloaderSequencer};
use crate::progress::{ScrollProgress, ScrollToTop};
use crate::router::{SubPage, View, ViewRouter};
use crate::scramble::{ScrambleTick, TextScramble};
use crate::scroll_lock::ScrollLock;
use crate::scroll_spy::{ScrollSpy, SectionId};
use crate::sound::{AudioBackend, SoundStore};
use crate::theme::ThemeStore;
use crate::toggle::{BULB, DragPhysicsToggle, ToggleMsg, ToggleSignal};

/// Scramble slots.
const LOGO_SCRAMBLE: u32 = 0;
const EMAIL_SCRAMBLE: u32 = 1;

#[derive(Debug)]
pub enum Msg {
    Event(Event),
    Preloader(PreloaderMsg),
    Toggle(ToggleMsg),
    Scramble(ScrambleTick),
    FeedLoaded(FeedResult<ContributionFeed>),
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Self::Event(event)
    }
}

/// What a click on a given element id means.
///
/// | Id | Action |
/// |---|---|
/// | `nav:<section>` | scroll a home section into view |
/// | `project:<id>` | open the project overlay |
/// | `project:<id>:live`, `project:<id>:code` | open a project link |
/// | `modal.close` | close the overlay |
/// | `sound` | toggle mute |
/// | `logo` | go home |
/// | `goals`, `review` | open a sub-page |
/// | `back` | return home |
/// | `scroll-top` | smooth scroll to the top |
/// | `resume` | open the résumé |
/// | `social:<icon>` | open a social profile |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Nav(SectionId),
    OpenProject(u32),
    ProjectLink { id: u32, code: bool },
    CloseModal,
    ToggleSound,
    Home,
    Open(SubPage),
    Back,
    ScrollTop,
    Resume,
    Social(String),
}

impl Action {
    /// Whether the control stays reachable while the project overlay covers
    /// the page. Everything else sits behind it.
    pub const fn works_over_overlay(&self) -> bool {
        matches!(
            self,
            Self::CloseModal | Self::OpenProject(_) | Self::ProjectLink { .. } | Self::ToggleSound
        )
    }

    pub fn parse(id: &str) -> Option<Self> {
        let action = match id {
            "modal.close" => Self::CloseModal,
            "sound" => Self::ToggleSound,
            "logo" => Self::Home,
            "goals" => Self::Open(SubPage::Goals),
            "review" => Self::Open(SubPage::YearInReview),
            "back" => Self::Back,
            "scroll-top" => Self::ScrollTop,
            "resume" => Self::Resume,
            _ => {
                let (kind, rest) = id.split_once(':')?;
                match kind {
                    "nav" => Self::Nav(SectionId::parse(rest)?),
                    "social" if !rest.is_empty() => Self::Social(rest.to_owned()),
                    "project" => match rest.split_once(':') {
                        None => Self::OpenProject(rest.parse().ok()?),
                        Some((n, "live")) => Self::ProjectLink {
                            id: n.parse().ok()?,
                            code: false,
                        },
                        Some((n, "code")) => Self::ProjectLink {
                            id: n.parse().ok()?,
                            code: true,
                        },
                        Some(_) => return None,
                    },
                    _ => return None,
                }
            }
        };
        Some(action)
    }
}

pub struct Site {
    config: SiteConfig,
    content: SiteContent,
    animator: Animator,
    lock: ScrollLock,
    theme: ThemeStore,
    sound: SoundStore,
    spy: ScrollSpy,
    router: ViewRouter,
    modal: ModalCoordinator,
    preloader: PreloaderSequencer,
    toggle: DragPhysicsToggle,
    dock: NavigationDock,
    progress: ScrollProgress,
    top: ScrollToTop,
    cursor: CursorTrail,
    magnets: MagneticField,
    scrambles: Vec<TextScramble>,
    feed: ContributionGraph,
    feed_source: Option<Rc<dyn ContributionSource>>,
    goals: GoalsPage,
    review: YearInReviewPage,
    clock: LocalClock,
    last_scroll: Option<ScrollEvent>,
}

impl Site {
    /// Build the site. The theme is read from `prefs` right away; everything
    /// else waits for [`Model::init`].
    pub fn new(
        config: SiteConfig,
        content: SiteContent,
        prefs: Rc<Preferences>,
        audio: Box<dyn AudioBackend>,
    ) -> Self {
        let seed = config.seed;
        let mut magnets = MagneticField::new();
        for social in &content.socials {
            magnets.register(format!("social:{}", social.icon), Pull::SOCIAL);
        }
        for section in SectionId::ALL {
            magnets.register(format!("nav:{section}"), Pull::DOCK);
        }
        magnets.register("resume", Pull::DOCK);

        let scrambles = vec![
            TextScramble::new(LOGO_SCRAMBLE, "logo.text", content.first_name(), seed),
            TextScramble::new(EMAIL_SCRAMBLE, "contact.email", &content.email, seed),
        ];

        Self {
            animator: Animator::new(),
            lock: ScrollLock::new(),
            theme: ThemeStore::load(prefs),
            sound: SoundStore::new(audio),
            spy: ScrollSpy::new(config.scroll_spy),
            router: ViewRouter::new(),
            modal: ModalCoordinator::new(),
            preloader: PreloaderSequencer::new(config.preloader, seed),
            toggle: DragPhysicsToggle::new(config.toggle, seed.rotate_left(17)),
            dock: NavigationDock::new(content.resume_url.clone()),
            progress: ScrollProgress::default(),
            top: ScrollToTop::new(config.scroll_top_threshold),
            cursor: CursorTrail::new(),
            magnets,
            scrambles,
            feed: ContributionGraph::new(config.feed_user.clone()),
            feed_source: None,
            goals: GoalsPage::new(content.goals.clone()),
            review: YearInReviewPage::new(content.months.clone()),
            clock: LocalClock::new(i32::from(config.clock_offset_minutes)),
            last_scroll: None,
            config,
            content,
        }
    }

    /// Fetch the contribution feed from `source` at startup. Without a
    /// source the host is expected to deliver [`Msg::FeedLoaded`] itself.
    #[must_use]
    pub fn with_feed_source(mut self, source: Rc<dyn ContributionSource>) -> Self {
        self.feed_source = Some(source);
        self
    }

    /// Run `callback` once, when the preloader has fully exited.
    #[must_use]
    pub fn on_loaded(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.preloader = self.preloader.on_complete(callback);
        self
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn scroll_lock(&self) -> &ScrollLock {
        &self.lock
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn sound(&self) -> &SoundStore {
        &self.sound
    }

    pub fn spy(&self) -> &ScrollSpy {
        &self.spy
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn modal(&self) -> &ModalCoordinator {
        &self.modal
    }

    pub fn preloader(&self) -> &PreloaderSequencer {
        &self.preloader
    }

    pub fn toggle(&self) -> &DragPhysicsToggle {
        &self.toggle
    }

    pub fn dock(&self) -> &NavigationDock {
        &self.dock
    }

    pub fn scroll_to_top(&self) -> &ScrollToTop {
        &self.top
    }

    pub fn cursor(&self) -> &CursorTrail {
        &self.cursor
    }

    pub fn magnets(&self) -> &MagneticField {
        &self.magnets
    }

    pub fn feed(&self) -> &ContributionGraph {
        &self.feed
    }

    pub fn clock(&self) -> &LocalClock {
        &self.clock
    }

    pub fn scramble(&self, slot: u32) -> Option<&TextScramble> {
        self.scrambles.iter().find(|s| s.slot() == slot)
    }

    /// Whether the page accepts pointer input.
    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.preloader.is_done()
    }

    // --- Event handlers ---

    fn on_event(&mut self, event: Event) -> Cmd<Msg> {
        match event {
            Event::Frame { dt } => self.on_frame(dt),
            Event::Scroll(scroll) => {
                self.on_scroll(scroll);
                Cmd::none()
            }
            Event::Layout(anchors) => {
                self.spy.set_anchors(&anchors);
                // Geometry moved under the viewport; resample.
                if let Some(scroll) = self.last_scroll {
                    self.on_scroll(scroll);
                }
                Cmd::none()
            }
            Event::Bounds { id, rect } => {
                self.magnets.set_bounds(&id, rect);
                Cmd::none()
            }
            Event::WallClock { unix_ms } => {
                self.clock.on_wall_clock(unix_ms);
                Cmd::none()
            }
            Event::Pointer(_) | Event::Hover { .. } | Event::Click { .. }
                if !self.is_interactive() =>
            {
                Cmd::none()
            }
            Event::Pointer(pointer) => self.on_pointer(&pointer),
            Event::Hover { id, entered } => self.on_hover(&id, entered),
            Event::Click { id } => self.on_click(&id),
        }
    }

    fn on_frame(&mut self, dt: std::time::Duration) -> Cmd<Msg> {
        self.animator.tick(dt);
        let mut cmds = Vec::new();
        for event in self.animator.drain_events() {
            if let Some(cmd) = self.preloader.on_animation_event(event, &mut self.lock) {
                cmds.push(cmd);
                self.on_preloader_done();
            }
            if let Some(ToggleSignal::FlipTheme) = self.toggle.on_animation_event(event) {
                cmds.push(self.theme.toggle(&mut self.animator));
            }
        }
        Cmd::batch(cmds)
    }

    fn on_preloader_done(&mut self) {
        let reduced = self.config.reduced_motion;
        self.dock.entrance(&mut self.animator, reduced);
        self.toggle.entrance(&mut self.animator, reduced);
        self.progress.reset(&mut self.animator);
        self.top.reset(&mut self.animator);
    }

    fn on_scroll(&mut self, scroll: ScrollEvent) {
        self.last_scroll = Some(scroll);
        if !self.router.view().is_home() {
            return;
        }
        if let Some(section) = self.spy.on_scroll(scroll.scroll_y, scroll.viewport_height) {
            tracing::debug!(%section, "active section changed");
            self.dock.set_active(section);
        }
        self.progress.on_scroll(&scroll, &mut self.animator);
        self.top.on_scroll(scroll.scroll_y, &mut self.animator);
    }

    fn on_pointer(&mut self, pointer: &PointerEvent) -> Cmd<Msg> {
        self.cursor.on_pointer(pointer, &mut self.animator);
        match pointer.phase {
            PointerPhase::Move => self.magnets.on_pointer_move(pointer.position, &mut self.animator),
            PointerPhase::Leave if pointer.target.is_none() => {
                self.magnets.release_all(&mut self.animator);
            }
            _ => {}
        }
        self.toggle
            .on_pointer(pointer, &mut self.animator)
            .map(Msg::Toggle)
    }

    fn on_hover(&mut self, id: &str, entered: bool) -> Cmd<Msg> {
        if let Some(section) = id.strip_prefix("nav:").and_then(SectionId::parse) {
            self.dock.set_hovered(section, entered);
        }
        if !entered {
            return Cmd::none();
        }
        self.sound.play_hover();
        let slot = match id {
            "logo" => LOGO_SCRAMBLE,
            "contact.email" => EMAIL_SCRAMBLE,
            _ => return Cmd::none(),
        };
        self.scrambles
            .iter_mut()
            .find(|s| s.slot() == slot)
            .map_or_else(Cmd::none, |s| s.start().map(Msg::Scramble))
    }

    fn on_click(&mut self, id: &str) -> Cmd<Msg> {
        // The bulb is driven by its pointer events.
        if id == BULB.name() {
            return Cmd::none();
        }
        let Some(action) = Action::parse(id) else {
            tracing::debug!(id, "click on unbound element");
            return Cmd::none();
        };
        if self.modal.is_open() && !action.works_over_overlay() {
            tracing::debug!(id, "click behind the project overlay ignored");
            return Cmd::none();
        }
        if action != Action::ToggleSound {
            self.sound.play_click();
        }
        self.perform(action)
    }

    fn perform(&mut self, action: Action) -> Cmd<Msg> {
        match action {
            Action::Nav(section) => self.dock.navigate(section),
            Action::OpenProject(id) => {
                let Some(project) = self.content.project(id) else {
                    tracing::debug!(id, "unknown project");
                    return Cmd::none();
                };
                let payload = ProjectRef::new(project.id, project.title.clone());
                let cmd = self.modal.open(payload, &mut self.lock, &mut self.animator);
                Cmd::batch(vec![cmd, self.fan_out_modal()])
            }
            Action::ProjectLink { id, code } => match self.content.project(id) {
                Some(project) => Cmd::host(HostEffect::OpenExternal {
                    url: if code {
                        project.github_link.clone()
                    } else {
                        project.live_link.clone()
                    },
                }),
                None => Cmd::none(),
            },
            Action::CloseModal => {
                let cmd = self.modal.close(&mut self.lock, &mut self.animator);
                Cmd::batch(vec![cmd, self.fan_out_modal()])
            }
            Action::ToggleSound => {
                self.sound.toggle();
                Cmd::none()
            }
            Action::Home | Action::Back => self.go(View::Home),
            Action::Open(page) => self.go(View::SubPage(page)),
            Action::ScrollTop => self.top.click(),
            Action::Resume => self.dock.open_resume(),
            Action::Social(icon) => match self.content.social(&icon) {
                Some(link) => Cmd::host(HostEffect::OpenExternal {
                    url: link.url.clone(),
                }),
                None => Cmd::none(),
            },
        }
    }

    /// Propagate the overlay state to the components that make room for it.
    fn fan_out_modal(&mut self) -> Cmd<Msg> {
        let open = self.modal.is_open();
        self.dock.set_suspended(open, &mut self.animator);
        self.toggle
            .set_hidden(open, &mut self.animator)
            .map(Msg::Toggle)
    }

    fn go(&mut self, target: View) -> Cmd<Msg> {
        let from = self.router.view();
        let cmd = self.router.navigate(target);
        let to = self.router.view();
        if from == to {
            return cmd;
        }
        let reduced = self.config.reduced_motion;
        match from {
            View::SubPage(SubPage::Goals) => self.goals.leave(&mut self.animator),
            View::SubPage(SubPage::YearInReview) => self.review.leave(&mut self.animator),
            View::Home => {
                self.dock.teardown(&mut self.animator);
                self.progress.teardown(&mut self.animator);
                self.top.teardown(&mut self.animator);
            }
        }
        match to {
            View::SubPage(SubPage::Goals) => self.goals.enter(&mut self.animator, reduced),
            View::SubPage(SubPage::YearInReview) => self.review.enter(&mut self.animator, reduced),
            View::Home => {
                // Home chrome comes back fresh, as if newly mounted.
                self.dock.entrance(&mut self.animator, reduced);
                self.progress.reset(&mut self.animator);
                self.top.reset(&mut self.animator);
                self.last_scroll = None;
            }
        }
        cmd
    }
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("view", &self.router.view())
            .field("theme", &self.theme.get())
            .field("muted", &self.sound.is_muted())
            .field("preloader", &self.preloader)
            .field("modal", &self.modal)
            .field("toggle", &self.toggle)
            .field("locked", &self.lock.is_locked())
            .finish()
    }
}

impl Model for Site {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        let mut cmds = vec![
            self.theme.apply(),
            self.preloader.start(&mut self.lock).map(Msg::Preloader),
        ];
        if let Some(source) = self.feed_source.clone() {
            cmds.push(self.feed.load(source, Msg::FeedLoaded));
        }
        Cmd::batch(cmds)
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Event(event) => self.on_event(event),
            Msg::Preloader(msg) => self
                .preloader
                .update(msg, &mut self.animator)
                .map(Msg::Preloader),
            Msg::Toggle(msg) => self.toggle.update(msg, &mut self.animator).map(Msg::Toggle),
            Msg::Scramble(tick) => self
                .scrambles
                .iter_mut()
                .find(|s| s.slot() == tick.0)
                .map_or_else(Cmd::none, |s| s.tick().map(Msg::Scramble)),
            Msg::FeedLoaded(result) => {
                self.feed.on_loaded(result);
                Cmd::none()
            }
        }
    }

    fn view(&self, scene: &mut Scene) {
        let home = self.router.chrome_visible();
        scene.set_text("site.view", self.router.view().as_str());
        scene.set_flag("site.loaded", self.preloader.is_done());
        scene.set_flag("scroll.locked", self.lock.is_locked());
        scene.set_flag("sound.muted", self.sound.is_muted());

        self.preloader.view(&self.animator, scene);
        self.theme.view(&self.animator, scene);
        self.toggle.view(&self.animator, scene);
        self.modal.view(&self.animator, scene);
        self.cursor.view(&self.animator, scene);
        self.magnets.view(&self.animator, scene);
        self.clock.view(scene);
        for scramble in &self.scrambles {
            scramble.view(scene);
        }

        self.dock.view(home, &self.animator, scene);
        scene.set_flag("progress.visible", home);
        if home {
            self.progress.view(&self.animator, scene);
            self.top.view(&self.animator, scene);
            self.feed.view(scene);
        }
        match self.router.view() {
            View::Home => {}
            View::SubPage(SubPage::Goals) => self.goals.view(&self.animator, scene),
            View::SubPage(SubPage::YearInReview) => self.review.view(&self.animator, scene),
        }
    }

    fn teardown(&mut self) -> Cmd<Msg> {
        tracing::debug!("site teardown");
        let mut cmds = vec![
            self.preloader
                .teardown(&mut self.lock, &mut self.animator)
                .map(Msg::Preloader),
            self.modal.teardown(&mut self.lock, &mut self.animator),
            self.toggle.teardown(&mut self.animator).map(Msg::Toggle),
        ];
        for scramble in &mut self.scrambles {
            cmds.push(scramble.teardown().map(Msg::Scramble));
        }
        self.theme.teardown(&mut self.animator);
        self.dock.teardown(&mut self.animator);
        self.progress.teardown(&mut self.animator);
        self.top.teardown(&mut self.animator);
        self.cursor.teardown(&mut self.animator);
        self.magnets.teardown(&mut self.animator);
        self.goals.leave(&mut self.animator);
        self.review.leave(&mut self.animator);
        Cmd::batch(cmds)
    }
}
