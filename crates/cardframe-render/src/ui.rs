//! The abstract UI element tree a render pass produces.
//!
//! Nodes are toolkit-neutral: a host maps panels, text, images and inputs
//! onto its own widgets. Images and inputs carry shared mutable slots
//! (`Rc<RefCell<_>>`) so asynchronous loads and host edits flow back into
//! the same tree the pipeline handed out.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};

use cardframe_model::{
    Action, ColumnWidth, ContainerStyle, HorizontalAlignment, MediaSource, TextWeight,
    VerticalContentAlignment,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Vertical,
    Horizontal,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Vertical => "vertical",
            Direction::Horizontal => "horizontal",
        }
    }
}

#[derive(Debug, Clone)]
pub enum UiElement {
    Panel(UiPanel),
    Text(UiText),
    Image(UiImage),
    Input(UiInput),
    Button(UiButton),
    Media(UiMedia),
    Placeholder(UiPlaceholder),
}

impl UiElement {
    /// Visit this node and every descendant in document (pre-) order.
    pub fn walk(&self, visit: &mut dyn FnMut(&UiElement)) {
        visit(self);
        match self {
            UiElement::Panel(panel) => {
                for child in &panel.children {
                    child.walk(visit);
                }
            }
            UiElement::Button(button) => {
                if let Some(body) = &button.body {
                    body.walk(visit);
                }
            }
            _ => {}
        }
    }

    /// Debug projection of the tree, used by the tester CLI and tests.
    pub fn to_json(&self) -> Value {
        match self {
            UiElement::Panel(panel) => {
                let children: Vec<Value> = panel.children.iter().map(UiElement::to_json).collect();
                let mut map = json!({
                    "kind": "panel",
                    "direction": panel.direction.as_str(),
                    "style": panel.style.as_str(),
                    "padding": panel.padding,
                    "bleedMargin": panel.bleed_margin,
                    "verticalAlignment": panel.vertical_alignment.as_str(),
                    "children": children,
                });
                if let Some(color) = &panel.background_color {
                    map["backgroundColor"] = json!(color);
                }
                if let Some((width, height)) = panel.fixed_size {
                    map["fixedSize"] = json!([width, height]);
                }
                if let Some(width) = panel.width {
                    map["width"] = width.to_json();
                }
                map
            }
            UiElement::Text(text) => json!({
                "kind": "text",
                "text": text.text,
                "sizePx": text.size_px,
                "weight": text.weight.as_str(),
                "horizontalAlignment": text.horizontal_alignment.as_str(),
                "wrap": text.wrap,
                "maxLines": text.max_lines,
            }),
            UiElement::Image(image) => {
                let slot = image.slot.borrow();
                json!({
                    "kind": "image",
                    "url": image.url,
                    "altText": image.alt_text,
                    "state": slot.state.as_str(),
                    "source": slot.source.as_ref().map(ImageSource::kind),
                    "attempts": slot.attempts,
                })
            }
            UiElement::Input(input) => json!({
                "kind": "input",
                "id": input.id,
                "value": input.value.borrow().clone(),
                "placeholder": input.placeholder,
                "multiline": input.multiline,
            }),
            UiElement::Button(button) => json!({
                "kind": "button",
                "title": button.title,
                "action": button.action.type_name(),
                "body": button.body.as_ref().map(|body| body.to_json()),
            }),
            UiElement::Media(media) => json!({
                "kind": "media",
                "sources": media.sources.iter().map(MediaSource::to_json).collect::<Vec<_>>(),
                "poster": media.poster,
                "inlinePlayback": media.inline_playback,
            }),
            UiElement::Placeholder(placeholder) => json!({
                "kind": "placeholder",
                "elementType": placeholder.element_type,
            }),
        }
    }
}

/// Linear layout container.
#[derive(Debug, Clone)]
pub struct UiPanel {
    pub direction: Direction,
    pub style: ContainerStyle,
    pub background_color: Option<String>,
    /// Inner padding in pixels; zero for unstyled panels.
    pub padding: u32,
    /// How far the panel extends into the parent's padding; zero when the
    /// source element did not ask to bleed.
    pub bleed_margin: u32,
    pub vertical_alignment: VerticalContentAlignment,
    pub fixed_size: Option<(u32, u32)>,
    pub width: Option<ColumnWidth>,
    pub children: Vec<UiElement>,
}

impl UiPanel {
    pub fn vertical() -> Self {
        Self::with_direction(Direction::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::with_direction(Direction::Horizontal)
    }

    fn with_direction(direction: Direction) -> Self {
        Self {
            direction,
            style: ContainerStyle::None,
            background_color: None,
            padding: 0,
            bleed_margin: 0,
            vertical_alignment: VerticalContentAlignment::Top,
            fixed_size: None,
            width: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiText {
    pub text: String,
    pub size_px: u32,
    pub weight: TextWeight,
    pub horizontal_alignment: HorizontalAlignment,
    pub wrap: bool,
    pub max_lines: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct UiImage {
    pub url: String,
    pub alt_text: Option<String>,
    pub horizontal_alignment: HorizontalAlignment,
    pub slot: Rc<RefCell<ImageSlot>>,
}

#[derive(Debug, Clone)]
pub struct UiInput {
    pub id: String,
    pub placeholder: Option<String>,
    pub multiline: bool,
    pub max_length: Option<u32>,
    /// Live value; the host edits this between submits.
    pub value: Rc<RefCell<String>>,
}

#[derive(Debug, Clone)]
pub struct UiButton {
    pub title: String,
    pub action: Action,
    /// Present when the button wraps another element (select actions).
    pub body: Option<Box<UiElement>>,
}

#[derive(Debug, Clone)]
pub struct UiMedia {
    pub sources: Vec<MediaSource>,
    pub poster: Option<String>,
    pub alt_text: Option<String>,
    pub inline_playback: bool,
}

/// Stand-in emitted for element types with no registered renderer.
#[derive(Debug, Clone)]
pub struct UiPlaceholder {
    pub element_type: String,
}

/// Shared mutable holder for an image's source and load progress.
#[derive(Debug)]
pub struct ImageSlot {
    pub source: Option<ImageSource>,
    pub state: LoadState,
    /// Resolver invocations made for this slot, including the retry.
    pub attempts: u32,
}

impl ImageSlot {
    pub fn pending() -> Self {
        Self {
            source: None,
            state: LoadState::Pending,
            attempts: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Decoded SVG payload, shared through the session cache.
    Vector(Rc<VectorSource>),
    Raster(RasterSource),
}

impl ImageSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::Vector(_) => "vector",
            ImageSource::Raster(_) => "raster",
        }
    }
}

/// Decoded SVG document plus the rasterization box requested for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorSource {
    pub svg: Vec<u8>,
    pub rasterize_width: Option<u32>,
    pub rasterize_height: Option<u32>,
}

/// Raster image source. `data` is `None` until a resolver delivers bytes;
/// URLs without a matching resolver are fetched by the host toolkit itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSource {
    pub url: String,
    pub data: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

impl LoadState {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadState::Pending => "pending",
            LoadState::Ready => "ready",
            LoadState::Failed => "failed",
        }
    }
}
