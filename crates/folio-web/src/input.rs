#![forbid(unsafe_code)]

//! Deterministic, JSON-friendly wire schema between the page script and the
//! site.
//!
//! The web host (JS/TS) is expected to provide:
//! - pointer positions in CSS pixels relative to the viewport,
//! - the id of the interactive element under the pointer, when there is one,
//! - scroll and layout measurements already read from the DOM.
//!
//! Inbound messages decode into [`folio_core::event::Event`]; outbound host
//! effects and scenes encode as [`EffectJson`] and [`SceneJson`]. Frames are
//! not part of the inbound schema: the host reports time through
//! [`StepProgram::advance_time`](crate::step_program::StepProgram::advance_time).

use std::collections::BTreeMap;

use folio_core::effect::HostEffect;
use folio_core::event::{AnchorLayout, Event, PointerEvent, PointerPhase, PointerType};
use folio_core::geometry::Rect;
use folio_core::scene::Scene;
use serde::{Deserialize, Serialize};

use crate::step_program::WebOutputs;

/// Phase for pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhaseJson {
    Down,
    Move,
    Up,
    Cancel,
    Leave,
}

impl From<PointerPhaseJson> for PointerPhase {
    fn from(value: PointerPhaseJson) -> Self {
        match value {
            PointerPhaseJson::Down => Self::Down,
            PointerPhaseJson::Move => Self::Move,
            PointerPhaseJson::Up => Self::Up,
            PointerPhaseJson::Cancel => Self::Cancel,
            PointerPhaseJson::Leave => Self::Leave,
        }
    }
}

impl From<PointerPhase> for PointerPhaseJson {
    fn from(value: PointerPhase) -> Self {
        match value {
            PointerPhase::Down => Self::Down,
            PointerPhase::Move => Self::Move,
            PointerPhase::Up => Self::Up,
            PointerPhase::Cancel => Self::Cancel,
            PointerPhase::Leave => Self::Leave,
        }
    }
}

/// DOM `pointerType`. Missing means a mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKindJson {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl From<PointerKindJson> for PointerType {
    fn from(value: PointerKindJson) -> Self {
        match value {
            PointerKindJson::Mouse => Self::Mouse,
            PointerKindJson::Touch => Self::Touch,
            PointerKindJson::Pen => Self::Pen,
        }
    }
}

impl From<PointerType> for PointerKindJson {
    fn from(value: PointerType) -> Self {
        match value {
            PointerType::Mouse => Self::Mouse,
            PointerType::Touch => Self::Touch,
            PointerType::Pen => Self::Pen,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorJson {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// JSON form of an inbound host event.
///
/// This is intentionally small and stable: a `kind` tag plus the minimum
/// semantic fields needed for replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEventJson {
    Pointer {
        phase: PointerPhaseJson,
        x: f32,
        y: f32,
        #[serde(default)]
        pointer: PointerKindJson,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    Scroll {
        scroll_y: f64,
        viewport_height: f64,
        document_height: f64,
    },
    Layout {
        anchors: Vec<AnchorJson>,
    },
    Bounds {
        id: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Hover {
        id: String,
        entered: bool,
    },
    Click {
        id: String,
    },
    Clock {
        unix_ms: i64,
    },
}

impl InputEventJson {
    /// JSON form of `event`. Frames have none.
    pub fn from_event(event: &Event) -> Option<Self> {
        let json = match event {
            Event::Pointer(p) => Self::Pointer {
                phase: p.phase.into(),
                x: p.position.x,
                y: p.position.y,
                pointer: p.pointer.into(),
                target: p.target.clone(),
            },
            Event::Scroll(s) => Self::Scroll {
                scroll_y: s.scroll_y,
                viewport_height: s.viewport_height,
                document_height: s.document_height,
            },
            Event::Layout(anchors) => Self::Layout {
                anchors: anchors
                    .iter()
                    .map(|a| AnchorJson {
                        id: a.id.clone(),
                        top: a.span.top,
                        height: a.span.height,
                    })
                    .collect(),
            },
            Event::Bounds { id, rect } => Self::Bounds {
                id: id.clone(),
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            },
            Event::Hover { id, entered } => Self::Hover {
                id: id.clone(),
                entered: *entered,
            },
            Event::Click { id } => Self::Click { id: id.clone() },
            Event::WallClock { unix_ms } => Self::Clock { unix_ms: *unix_ms },
            Event::Frame { .. } => return None,
        };
        Some(json)
    }
}

impl From<InputEventJson> for Event {
    fn from(value: InputEventJson) -> Self {
        match value {
            InputEventJson::Pointer {
                phase,
                x,
                y,
                pointer,
                target,
            } => {
                let event = PointerEvent::new(phase.into(), x, y).with_pointer(pointer.into());
                Self::Pointer(match target {
                    Some(id) => event.on(id),
                    None => event,
                })
            }
            InputEventJson::Scroll {
                scroll_y,
                viewport_height,
                document_height,
            } => Self::scroll(scroll_y, viewport_height, document_height),
            InputEventJson::Layout { anchors } => Self::Layout(
                anchors
                    .into_iter()
                    .map(|a| AnchorLayout::new(a.id, a.top, a.height))
                    .collect(),
            ),
            InputEventJson::Bounds {
                id,
                x,
                y,
                width,
                height,
            } => Self::Bounds {
                id,
                rect: Rect::new(x, y, width, height),
            },
            InputEventJson::Hover { id, entered } => Self::Hover { id, entered },
            InputEventJson::Click { id } => Self::Click { id },
            InputEventJson::Clock { unix_ms } => Self::WallClock { unix_ms },
        }
    }
}

/// Decode one inbound message.
///
/// Errors occur if the JSON does not match the expected schema.
pub fn event_from_json_str(s: &str) -> Result<Event, serde_json::Error> {
    let json: InputEventJson = serde_json::from_str(s)?;
    Ok(Event::from(json))
}

/// Encode `event` for record/replay. Frames encode as `None`.
pub fn event_to_json_string(event: &Event) -> Result<Option<String>, serde_json::Error> {
    InputEventJson::from_event(event)
        .map(|json| serde_json::to_string(&json))
        .transpose()
}

/// JSON form of an outbound host effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectJson {
    ScrollTo { y: f64, smooth: bool },
    ScrollIntoView { anchor: String },
    SetScrollLock { locked: bool },
    SetDocumentClass { class: String, enabled: bool },
    OpenExternal { url: String },
}

impl From<&HostEffect> for EffectJson {
    fn from(value: &HostEffect) -> Self {
        match value {
            HostEffect::ScrollTo { y, smooth } => Self::ScrollTo {
                y: *y,
                smooth: *smooth,
            },
            HostEffect::ScrollIntoView { anchor } => Self::ScrollIntoView {
                anchor: anchor.clone(),
            },
            HostEffect::SetScrollLock(locked) => Self::SetScrollLock { locked: *locked },
            HostEffect::SetDocumentClass { class, enabled } => Self::SetDocumentClass {
                class: (*class).to_owned(),
                enabled: *enabled,
            },
            HostEffect::OpenExternal { url } => Self::OpenExternal { url: url.clone() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropJson {
    /// `name` or `name.N` for group members.
    pub target: String,
    pub prop: &'static str,
    pub value: f32,
}

/// JSON form of a [`Scene`]. Maps are ordered so output is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneJson {
    pub props: Vec<PropJson>,
    pub flags: BTreeMap<String, bool>,
    pub texts: BTreeMap<String, String>,
}

impl From<&Scene> for SceneJson {
    fn from(scene: &Scene) -> Self {
        Self {
            props: scene
                .props()
                .map(|(target, prop, value)| PropJson {
                    target: target.to_string(),
                    prop: prop.as_str(),
                    value,
                })
                .collect(),
            flags: scene
                .flags()
                .map(|(key, on)| (key.to_owned(), on))
                .collect(),
            texts: scene
                .texts()
                .map(|(key, text)| (key.to_owned(), text.to_owned()))
                .collect(),
        }
    }
}

/// Everything the page script applies after one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepOutputJson {
    pub effects: Vec<EffectJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<SceneJson>,
}

impl From<&WebOutputs> for StepOutputJson {
    fn from(outputs: &WebOutputs) -> Self {
        Self {
            effects: outputs.effects.iter().map(EffectJson::from).collect(),
            scene: outputs.last_scene.as_ref().map(SceneJson::from),
        }
    }
}
