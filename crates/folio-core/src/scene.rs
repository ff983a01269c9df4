#![forbid(unsafe_code)]

//! Scene: the view output of a model.
//!
//! A [`Scene`] is a flat description of everything the host has to apply to
//! the document after a step: animated numeric properties per element, boolean
//! flags (visibility, highlight), and text content. Models fill it in
//! `view()`; the host diffs or applies it wholesale.

use std::collections::BTreeMap;
use std::fmt;

/// A named visual element that animations act on.
///
/// Repeated elements (list rows, cards) share a name and differ by `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target {
    name: &'static str,
    index: u16,
}

impl Target {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name, index: 0 }
    }

    /// The `index`th element of a repeated group.
    #[must_use]
    pub const fn nth(self, index: u16) -> Self {
        Self {
            name: self.name,
            index,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn index(self) -> u16 {
        self.index
    }
}

/// `name` for single elements, `name.N` for group members past the first.
impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index == 0 {
            f.write_str(self.name)
        } else {
            write!(f, "{}.{}", self.name, self.index)
        }
    }
}

/// An animatable numeric property of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prop {
    X,
    Y,
    Scale,
    ScaleX,
    ScaleY,
    /// Degrees.
    Rotation,
    Opacity,
    /// CSS pixels.
    Height,
    /// Percent of the parent.
    Width,
}

impl Prop {
    /// Value the property has before anything animates it.
    #[inline]
    pub const fn rest(self) -> f32 {
        match self {
            Self::Scale | Self::ScaleX | Self::ScaleY | Self::Opacity => 1.0,
            Self::X | Self::Y | Self::Rotation | Self::Height | Self::Width => 0.0,
        }
    }

    /// CSS-ish name for the host.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Scale => "scale",
            Self::ScaleX => "scaleX",
            Self::ScaleY => "scaleY",
            Self::Rotation => "rotation",
            Self::Opacity => "opacity",
            Self::Height => "height",
            Self::Width => "width",
        }
    }
}

/// Everything the host needs to present one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    props: BTreeMap<(Target, Prop), f32>,
    flags: BTreeMap<String, bool>,
    texts: BTreeMap<String, String>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_prop(&mut self, target: Target, prop: Prop, value: f32) {
        self.props.insert((target, prop), value);
    }

    /// Property value, or its rest value when never set.
    pub fn prop(&self, target: Target, prop: Prop) -> f32 {
        self.props
            .get(&(target, prop))
            .copied()
            .unwrap_or(prop.rest())
    }

    pub fn set_flag(&mut self, key: impl Into<String>, on: bool) {
        self.flags.insert(key.into(), on);
    }

    /// Flag value; unset flags read as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    pub fn set_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.texts.insert(key.into(), text.into());
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }

    pub fn props(&self) -> impl Iterator<Item = (Target, Prop, f32)> + '_ {
        self.props.iter().map(|(&(t, p), &v)| (t, p, v))
    }

    pub fn flags(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.flags.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.texts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.props.clear();
        self.flags.clear();
        self.texts.clear();
    }
}
