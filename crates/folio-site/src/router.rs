#![forbid(unsafe_code)]

//! Two-level view routing: the home page or one sub-page.
//!
//! Sub-pages are leaves. The only way out of one is back to home, so a
//! request to jump between sub-pages is dropped. Every real transition asks
//! the host to reset the scroll position.

use std::fmt;

use folio_core::effect::HostEffect;
use folio_runtime::Cmd;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubPage {
    Goals,
    YearInReview,
}

impl SubPage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Goals => "goals",
            Self::YearInReview => "review",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Home,
    SubPage(SubPage),
}

impl View {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::SubPage(page) => page.as_str(),
        }
    }

    #[inline]
    pub const fn is_home(self) -> bool {
        matches!(self, Self::Home)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    view: View,
}

impl ViewRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn view(&self) -> View {
        self.view
    }

    /// Move to `target`. Staying put or hopping between sub-pages does
    /// nothing.
    pub fn navigate<M>(&mut self, target: View) -> Cmd<M> {
        if target == self.view {
            return Cmd::none();
        }
        if let (View::SubPage(from), View::SubPage(to)) = (self.view, target) {
            tracing::debug!(
                from = from.as_str(),
                to = to.as_str(),
                "ignored sub-page to sub-page navigation"
            );
            return Cmd::none();
        }
        tracing::debug!(from = %self.view, to = %target, "view changed");
        self.view = target;
        Cmd::host(HostEffect::scroll_to_origin())
    }

    pub fn back<M>(&mut self) -> Cmd<M> {
        self.navigate(View::Home)
    }

    /// The dock, progress bar, and scroll-to-top button only live on home.
    #[inline]
    pub fn chrome_visible(&self) -> bool {
        self.view.is_home()
    }
}
