//! Element tree types and their JSON projection.
//!
//! `to_json` omits every property that still holds its default value, so a
//! parse → serialize → parse round trip is structurally stable.

use serde_json::{Map, Value};

use crate::actions::Action;

/// Root of a card document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Card {
    pub version: String,
    pub body: Vec<Element>,
    pub actions: Vec<Action>,
    pub speak: Option<String>,
}

impl Card {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), "AdaptiveCard".into());
        if !self.version.is_empty() {
            map.insert("version".into(), self.version.as_str().into());
        }
        if !self.body.is_empty() {
            let body: Vec<Value> = self.body.iter().map(Element::to_json).collect();
            map.insert("body".into(), Value::Array(body));
        }
        if !self.actions.is_empty() {
            let actions: Vec<Value> = self.actions.iter().map(Action::to_json).collect();
            map.insert("actions".into(), Value::Array(actions));
        }
        if let Some(speak) = &self.speak {
            map.insert("speak".into(), speak.as_str().into());
        }
        Value::Object(map)
    }
}

/// A single node of the card body.
///
/// The variant set is closed; anything else is carried as [`UnknownElement`]
/// so the renderer registry can still dispatch on the type string.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    TextBlock(TextBlock),
    Image(Image),
    Container(Container),
    ColumnSet(ColumnSet),
    FactSet(FactSet),
    InputText(InputText),
    ActionSet(ActionSet),
    Media(Media),
    Unknown(UnknownElement),
}

impl Element {
    /// The wire-level type tag used for renderer dispatch.
    pub fn type_name(&self) -> &str {
        match self {
            Element::TextBlock(_) => "TextBlock",
            Element::Image(_) => "Image",
            Element::Container(_) => "Container",
            Element::ColumnSet(_) => "ColumnSet",
            Element::FactSet(_) => "FactSet",
            Element::InputText(_) => "Input.Text",
            Element::ActionSet(_) => "ActionSet",
            Element::Media(_) => "Media",
            Element::Unknown(unknown) => &unknown.element_type,
        }
    }

    /// The element's `id`, when it carries a non-empty one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Element::TextBlock(e) => e.id.as_deref(),
            Element::Image(e) => e.id.as_deref(),
            Element::Container(e) => e.id.as_deref(),
            Element::ColumnSet(e) => e.id.as_deref(),
            Element::FactSet(e) => e.id.as_deref(),
            Element::InputText(e) => Some(&e.id).filter(|id| !id.is_empty()).map(String::as_str),
            Element::ActionSet(e) => e.id.as_deref(),
            Element::Media(e) => e.id.as_deref(),
            Element::Unknown(_) => None,
        }
    }

    /// Action fired when the element itself is tapped, if any.
    pub fn select_action(&self) -> Option<&Action> {
        match self {
            Element::Image(e) => e.select_action.as_ref(),
            Element::Container(e) => e.select_action.as_ref(),
            Element::ColumnSet(e) => e.select_action.as_ref(),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Element::TextBlock(e) => e.to_json(),
            Element::Image(e) => e.to_json(),
            Element::Container(e) => e.to_json(),
            Element::ColumnSet(e) => e.to_json(),
            Element::FactSet(e) => e.to_json(),
            Element::InputText(e) => e.to_json(),
            Element::ActionSet(e) => e.to_json(),
            Element::Media(e) => e.to_json(),
            Element::Unknown(e) => e.value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBlock {
    pub id: Option<String>,
    pub text: String,
    pub size: TextSize,
    pub weight: TextWeight,
    pub horizontal_alignment: HorizontalAlignment,
    pub wrap: bool,
    pub max_lines: Option<u32>,
}

impl TextBlock {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), "TextBlock".into());
        insert_id(&mut map, &self.id);
        map.insert("text".into(), self.text.as_str().into());
        if self.size != TextSize::default() {
            map.insert("size".into(), self.size.as_str().into());
        }
        if self.weight != TextWeight::default() {
            map.insert("weight".into(), self.weight.as_str().into());
        }
        insert_alignment(&mut map, self.horizontal_alignment);
        if self.wrap {
            map.insert("wrap".into(), true.into());
        }
        if let Some(max_lines) = self.max_lines {
            map.insert("maxLines".into(), max_lines.into());
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Image {
    pub id: Option<String>,
    pub url: String,
    pub alt_text: Option<String>,
    pub size: ImageSize,
    pub pixel_width: Option<u32>,
    pub pixel_height: Option<u32>,
    pub horizontal_alignment: HorizontalAlignment,
    pub select_action: Option<Action>,
}

impl Image {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), "Image".into());
        insert_id(&mut map, &self.id);
        map.insert("url".into(), self.url.as_str().into());
        if let Some(alt_text) = &self.alt_text {
            map.insert("altText".into(), alt_text.as_str().into());
        }
        if self.size != ImageSize::default() {
            map.insert("size".into(), self.size.as_str().into());
        }
        if let Some(width) = self.pixel_width {
            map.insert("pixelWidth".into(), width.into());
        }
        if let Some(height) = self.pixel_height {
            map.insert("pixelHeight".into(), height.into());
        }
        insert_alignment(&mut map, self.horizontal_alignment);
        insert_select_action(&mut map, &self.select_action);
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Container {
    pub id: Option<String>,
    pub items: Vec<Element>,
    pub style: ContainerStyle,
    pub vertical_content_alignment: VerticalContentAlignment,
    pub select_action: Option<Action>,
    pub bleed: bool,
}

impl Container {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), "Container".into());
        insert_id(&mut map, &self.id);
        if !self.items.is_empty() {
            let items: Vec<Value> = self.items.iter().map(Element::to_json).collect();
            map.insert("items".into(), Value::Array(items));
        }
        insert_collection_props(
            &mut map,
            self.style,
            self.vertical_content_alignment,
            &self.select_action,
            self.bleed,
        );
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnSet {
    pub id: Option<String>,
    pub columns: Vec<Column>,
    pub style: ContainerStyle,
    pub vertical_content_alignment: VerticalContentAlignment,
    pub select_action: Option<Action>,
    pub bleed: bool,
}

impl ColumnSet {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), "ColumnSet".into());
        insert_id(&mut map, &self.id);
        if !self.columns.is_empty() {
            let columns: Vec<Value> = self.columns.iter().map(Column::to_json).collect();
            map.insert("columns".into(), Value::Array(columns));
        }
        insert_collection_props(
            &mut map,
            self.style,
            self.vertical_content_alignment,
            &self.select_action,
            self.bleed,
        );
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    pub id: Option<String>,
    pub width: ColumnWidth,
    pub items: Vec<Element>,
    pub style: ContainerStyle,
    pub vertical_content_alignment: VerticalContentAlignment,
    pub select_action: Option<Action>,
    pub bleed: bool,
}

impl Column {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), "Column".into());
        insert_id(&mut map, &self.id);
        if self.width != ColumnWidth::default() {
            map.insert("width".into(), self.width.to_json());
        }
        if !self.items.is_empty() {
            let items: Vec<Value> = self.items.iter().map(Element::to_json).collect();
            map.insert("items".into(), Value::Array(items));
        }
        insert_collection_props(
            &mut map,
            self.style,
            self.vertical_content_alignment,
            &self.select_action,
            self.bleed,
        );
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FactSet {
    pub id: Option<String>,
    pub facts: Vec<Fact>,
}

impl FactSet {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), "FactSet".into());
        insert_id(&mut map, &self.id);
        if !self.facts.is_empty() {
            let facts: Vec<Value> = self.facts.iter().map(Fact::to_json).collect();
            map.insert("facts".into(), Value::Array(facts));
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fact {
    pub title: String,
    pub value: String,
}

impl Fact {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("title".into(), self.title.as_str().into());
        map.insert("value".into(), self.value.as_str().into());
        Value::Object(map)
    }
}

/// Free-form text input. Unlike other elements the `id` is required, since an
/// input without one can never contribute to a submit payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputText {
    pub id: String,
    pub value: String,
    pub placeholder: Option<String>,
    pub is_multiline: bool,
    pub max_length: Option<u32>,
}

impl InputText {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), "Input.Text".into());
        map.insert("id".into(), self.id.as_str().into());
        if !self.value.is_empty() {
            map.insert("value".into(), self.value.as_str().into());
        }
        if let Some(placeholder) = &self.placeholder {
            map.insert("placeholder".into(), placeholder.as_str().into());
        }
        if self.is_multiline {
            map.insert("isMultiline".into(), true.into());
        }
        if let Some(max_length) = self.max_length {
            map.insert("maxLength".into(), max_length.into());
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionSet {
    pub id: Option<String>,
    pub actions: Vec<Action>,
}

impl ActionSet {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), "ActionSet".into());
        insert_id(&mut map, &self.id);
        if !self.actions.is_empty() {
            let actions: Vec<Value> = self.actions.iter().map(Action::to_json).collect();
            map.insert("actions".into(), Value::Array(actions));
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Media {
    pub id: Option<String>,
    pub sources: Vec<MediaSource>,
    pub poster: Option<String>,
    pub alt_text: Option<String>,
}

impl Media {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), "Media".into());
        insert_id(&mut map, &self.id);
        if !self.sources.is_empty() {
            let sources: Vec<Value> = self.sources.iter().map(MediaSource::to_json).collect();
            map.insert("sources".into(), Value::Array(sources));
        }
        if let Some(poster) = &self.poster {
            map.insert("poster".into(), poster.as_str().into());
        }
        if let Some(alt_text) = &self.alt_text {
            map.insert("altText".into(), alt_text.as_str().into());
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaSource {
    pub mime_type: Option<String>,
    pub url: String,
}

impl MediaSource {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some(mime_type) = &self.mime_type {
            map.insert("mimeType".into(), mime_type.as_str().into());
        }
        map.insert("url".into(), self.url.as_str().into());
        Value::Object(map)
    }
}

/// Element with a type string this model does not know. The raw JSON value is
/// kept verbatim so serialization and custom renderers see the original node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnknownElement {
    pub element_type: String,
    pub value: Value,
}

// ---------------------------------------------------------------------------
// enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStyle {
    None,
    Default,
    Emphasis,
    Good,
    Attention,
    Warning,
    Accent,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self::None
    }
}

impl ContainerStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerStyle::None => "none",
            ContainerStyle::Default => "default",
            ContainerStyle::Emphasis => "emphasis",
            ContainerStyle::Good => "good",
            ContainerStyle::Attention => "attention",
            ContainerStyle::Warning => "warning",
            ContainerStyle::Accent => "accent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "none" => Some(ContainerStyle::None),
            "default" => Some(ContainerStyle::Default),
            "emphasis" => Some(ContainerStyle::Emphasis),
            "good" => Some(ContainerStyle::Good),
            "attention" => Some(ContainerStyle::Attention),
            "warning" => Some(ContainerStyle::Warning),
            "accent" => Some(ContainerStyle::Accent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalContentAlignment {
    Top,
    Center,
    Bottom,
}

impl Default for VerticalContentAlignment {
    fn default() -> Self {
        Self::Top
    }
}

impl VerticalContentAlignment {
    pub fn as_str(self) -> &'static str {
        match self {
            VerticalContentAlignment::Top => "top",
            VerticalContentAlignment::Center => "center",
            VerticalContentAlignment::Bottom => "bottom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "top" => Some(VerticalContentAlignment::Top),
            "center" => Some(VerticalContentAlignment::Center),
            "bottom" => Some(VerticalContentAlignment::Bottom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

impl Default for HorizontalAlignment {
    fn default() -> Self {
        Self::Left
    }
}

impl HorizontalAlignment {
    pub fn as_str(self) -> &'static str {
        match self {
            HorizontalAlignment::Left => "left",
            HorizontalAlignment::Center => "center",
            HorizontalAlignment::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "left" => Some(HorizontalAlignment::Left),
            "center" => Some(HorizontalAlignment::Center),
            "right" => Some(HorizontalAlignment::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Auto,
    Stretch,
    Small,
    Medium,
    Large,
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::Auto
    }
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Auto => "auto",
            ImageSize::Stretch => "stretch",
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Some(ImageSize::Auto),
            "stretch" => Some(ImageSize::Stretch),
            "small" => Some(ImageSize::Small),
            "medium" => Some(ImageSize::Medium),
            "large" => Some(ImageSize::Large),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Default,
    Medium,
    Large,
    ExtraLarge,
}

impl Default for TextSize {
    fn default() -> Self {
        Self::Default
    }
}

impl TextSize {
    pub fn as_str(self) -> &'static str {
        match self {
            TextSize::Small => "small",
            TextSize::Default => "default",
            TextSize::Medium => "medium",
            TextSize::Large => "large",
            TextSize::ExtraLarge => "extraLarge",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "small" => Some(TextSize::Small),
            "default" => Some(TextSize::Default),
            "medium" => Some(TextSize::Medium),
            "large" => Some(TextSize::Large),
            "extralarge" => Some(TextSize::ExtraLarge),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextWeight {
    Lighter,
    Default,
    Bolder,
}

impl Default for TextWeight {
    fn default() -> Self {
        Self::Default
    }
}

impl TextWeight {
    pub fn as_str(self) -> &'static str {
        match self {
            TextWeight::Lighter => "lighter",
            TextWeight::Default => "default",
            TextWeight::Bolder => "bolder",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "lighter" => Some(TextWeight::Lighter),
            "default" => Some(TextWeight::Default),
            "bolder" => Some(TextWeight::Bolder),
            _ => None,
        }
    }
}

/// Column width: `auto`, `stretch`, a relative weight, or an exact pixel
/// count written as `"50px"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    Auto,
    Stretch,
    Weight(u32),
    Pixels(u32),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        Self::Auto
    }
}

impl ColumnWidth {
    pub fn to_json(self) -> Value {
        match self {
            ColumnWidth::Auto => "auto".into(),
            ColumnWidth::Stretch => "stretch".into(),
            ColumnWidth::Weight(weight) => weight.into(),
            ColumnWidth::Pixels(pixels) => Value::String(format!("{pixels}px")),
        }
    }

    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => {
                let text = text.trim();
                if text.eq_ignore_ascii_case("auto") {
                    Some(ColumnWidth::Auto)
                } else if text.eq_ignore_ascii_case("stretch") {
                    Some(ColumnWidth::Stretch)
                } else if let Some(pixels) = text.strip_suffix("px") {
                    pixels.trim().parse().ok().map(ColumnWidth::Pixels)
                } else {
                    text.parse().ok().map(ColumnWidth::Weight)
                }
            }
            Value::Number(number) => number
                .as_u64()
                .and_then(|weight| u32::try_from(weight).ok())
                .map(ColumnWidth::Weight),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// serialization helpers
// ---------------------------------------------------------------------------

fn insert_id(map: &mut Map<String, Value>, id: &Option<String>) {
    if let Some(id) = id {
        map.insert("id".into(), id.as_str().into());
    }
}

fn insert_alignment(map: &mut Map<String, Value>, alignment: HorizontalAlignment) {
    if alignment != HorizontalAlignment::default() {
        map.insert("horizontalAlignment".into(), alignment.as_str().into());
    }
}

fn insert_select_action(map: &mut Map<String, Value>, select_action: &Option<Action>) {
    if let Some(action) = select_action {
        map.insert("selectAction".into(), action.to_json());
    }
}

fn insert_collection_props(
    map: &mut Map<String, Value>,
    style: ContainerStyle,
    vertical_content_alignment: VerticalContentAlignment,
    select_action: &Option<Action>,
    bleed: bool,
) {
    if style != ContainerStyle::default() {
        map.insert("style".into(), style.as_str().into());
    }
    if vertical_content_alignment != VerticalContentAlignment::default() {
        map.insert(
            "verticalContentAlignment".into(),
            vertical_content_alignment.as_str().into(),
        );
    }
    insert_select_action(map, select_action);
    if bleed {
        map.insert("bleed".into(), true.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_block_omits_default_properties() {
        let text_block = TextBlock {
            text: "Hello".into(),
            ..TextBlock::default()
        };
        assert_eq!(
            text_block.to_json(),
            json!({"type": "TextBlock", "text": "Hello"})
        );
    }

    #[test]
    fn text_block_keeps_non_default_properties() {
        let text_block = TextBlock {
            text: "Title".into(),
            size: TextSize::Large,
            weight: TextWeight::Bolder,
            wrap: true,
            max_lines: Some(2),
            ..TextBlock::default()
        };
        assert_eq!(
            text_block.to_json(),
            json!({
                "type": "TextBlock",
                "text": "Title",
                "size": "large",
                "weight": "bolder",
                "wrap": true,
                "maxLines": 2
            })
        );
    }

    #[test]
    fn container_omits_default_collection_properties() {
        let container = Container {
            items: vec![Element::TextBlock(TextBlock {
                text: "inner".into(),
                ..TextBlock::default()
            })],
            ..Container::default()
        };
        let json = container.to_json();
        assert_eq!(json.get("style"), None);
        assert_eq!(json.get("verticalContentAlignment"), None);
        assert_eq!(json.get("bleed"), None);
    }

    #[test]
    fn container_serializes_explicit_collection_properties() {
        let container = Container {
            style: ContainerStyle::Emphasis,
            vertical_content_alignment: VerticalContentAlignment::Center,
            bleed: true,
            ..Container::default()
        };
        assert_eq!(
            container.to_json(),
            json!({
                "type": "Container",
                "style": "emphasis",
                "verticalContentAlignment": "center",
                "bleed": true
            })
        );
    }

    #[test]
    fn column_width_round_trips_each_form() {
        for (value, expected) in [
            (json!("auto"), ColumnWidth::Auto),
            (json!("stretch"), ColumnWidth::Stretch),
            (json!(2), ColumnWidth::Weight(2)),
            (json!("3"), ColumnWidth::Weight(3)),
            (json!("50px"), ColumnWidth::Pixels(50)),
        ] {
            let parsed = ColumnWidth::parse(&value).expect("parses");
            assert_eq!(parsed, expected);
        }
        assert_eq!(ColumnWidth::parse(&json!(4_294_967_297u64)), None);
        assert_eq!(ColumnWidth::Pixels(50).to_json(), json!("50px"));
        assert_eq!(ColumnWidth::Weight(2).to_json(), json!(2));
    }

    #[test]
    fn enum_parsing_is_case_insensitive() {
        assert_eq!(TextSize::parse("ExtraLarge"), Some(TextSize::ExtraLarge));
        assert_eq!(ContainerStyle::parse("EMPHASIS"), Some(ContainerStyle::Emphasis));
        assert_eq!(ImageSize::parse("Stretch"), Some(ImageSize::Stretch));
        assert_eq!(TextWeight::parse("bolder"), Some(TextWeight::Bolder));
    }

    #[test]
    fn unknown_element_serializes_original_value() {
        let raw = json!({"type": "RatingBar", "stars": 4});
        let element = Element::Unknown(UnknownElement {
            element_type: "RatingBar".into(),
            value: raw.clone(),
        });
        assert_eq!(element.to_json(), raw);
        assert_eq!(element.type_name(), "RatingBar");
    }

    #[test]
    fn element_ids_surface_through_the_enum() {
        let labeled = Element::Image(Image {
            id: Some("logo".into()),
            url: "https://example.test/logo.png".into(),
            ..Image::default()
        });
        assert_eq!(labeled.id(), Some("logo"));
        assert_eq!(Element::TextBlock(TextBlock::default()).id(), None);

        // A degraded Input.Text carries an empty id; the accessor reads
        // that as unnamed.
        assert_eq!(Element::InputText(InputText::default()).id(), None);
        let named = Element::InputText(InputText {
            id: "name".into(),
            ..InputText::default()
        });
        assert_eq!(named.id(), Some("name"));
    }
}
