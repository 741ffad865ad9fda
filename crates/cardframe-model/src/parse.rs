//! Lenient card construction from a generic JSON tree.
//!
//! Structurally valid input always yields a tree: unknown enum strings,
//! malformed URLs, and missing required strings degrade to defaults and are
//! reported as warnings. Only non-JSON input or a non-object root is fatal.
//! Elements whose type string is not recognized are preserved as
//! [`Element::Unknown`]; the render pass decides what to do with them.

use serde_json::{Map, Value};

use crate::actions::{Action, OpenUrlAction, ShowCardAction, SubmitAction};
use crate::diagnostics::{Diagnostic, Severity};
use crate::elements::{
    ActionSet, Card, Column, ColumnSet, ColumnWidth, Container, ContainerStyle, Element, Fact,
    FactSet, HorizontalAlignment, Image, ImageSize, InputText, Media, MediaSource, TextBlock,
    TextSize, TextWeight, UnknownElement, VerticalContentAlignment,
};

type JsonMap = Map<String, Value>;

/// Outcome of a parse. `card` is `None` only when `errors` is non-empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseResult {
    pub card: Option<Card>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// Parse a card from raw JSON text. A syntax error is the one fatal parse
/// failure: it yields a single error diagnostic and no tree.
pub fn parse_card_str(text: &str) -> ParseResult {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => parse_card(&value),
        Err(err) => ParseResult {
            card: None,
            errors: vec![Diagnostic::error("invalid_json", err.to_string())],
            warnings: Vec::new(),
        },
    }
}

/// Parse a card from an already-decoded JSON value.
pub fn parse_card(value: &Value) -> ParseResult {
    let mut warnings = Vec::new();
    match card_from_value(value, "", &mut warnings) {
        Ok(card) => ParseResult {
            card: Some(card),
            errors: Vec::new(),
            warnings,
        },
        Err(error) => ParseResult {
            card: None,
            errors: vec![error],
            warnings,
        },
    }
}

fn card_from_value(
    value: &Value,
    path: &str,
    warnings: &mut Vec<Diagnostic>,
) -> Result<Card, Diagnostic> {
    let Some(obj) = value.as_object() else {
        return Err(
            Diagnostic::error("invalid_card", "card must be a JSON object").with_path(path),
        );
    };

    if let Some(card_type) = obj.get("type").and_then(Value::as_str) {
        if card_type != "AdaptiveCard" {
            warnings.push(
                Diagnostic::warning(
                    "unexpected_card_type",
                    format!("expected `AdaptiveCard`, found `{card_type}`"),
                )
                .with_path(path),
            );
        }
    }

    let version = required_string(obj, "version", path, warnings);
    let body = parse_elements(obj.get("body"), path, "body", warnings);
    let actions = parse_actions(obj.get("actions"), path, "actions", warnings);
    let speak = optional_string(obj, "speak", path, warnings);

    if body.is_empty() && actions.is_empty() {
        warnings.push(
            Diagnostic::warning("empty_card", "card has no body elements and no actions")
                .with_path(path),
        );
    }

    Ok(Card {
        version,
        body,
        actions,
        speak,
    })
}

// ---------------------------------------------------------------------------
// elements
// ---------------------------------------------------------------------------

fn parse_elements(
    value: Option<&Value>,
    path: &str,
    key: &str,
    warnings: &mut Vec<Diagnostic>,
) -> Vec<Element> {
    let mut elements = Vec::new();
    let Some(value) = value else {
        return elements;
    };
    let Some(entries) = value.as_array() else {
        warnings.push(
            Diagnostic::warning("invalid_property_value", format!("`{key}` must be an array"))
                .with_path(path),
        );
        return elements;
    };
    for (index, entry) in entries.iter().enumerate() {
        let entry_path = join_path(path, &format!("{key}[{index}]"));
        if let Some(element) = parse_element(entry, &entry_path, warnings) {
            elements.push(element);
        }
    }
    elements
}

fn parse_element(value: &Value, path: &str, warnings: &mut Vec<Diagnostic>) -> Option<Element> {
    let Some(obj) = value.as_object() else {
        warnings.push(
            Diagnostic::warning("invalid_property_value", "element must be a JSON object")
                .with_path(path),
        );
        return None;
    };
    let Some(element_type) = obj.get("type").and_then(Value::as_str) else {
        warnings.push(
            Diagnostic::warning("missing_required_property", "element has no `type`")
                .with_path(path),
        );
        return None;
    };

    let element = match element_type {
        "TextBlock" => Element::TextBlock(parse_text_block(obj, path, warnings)),
        "Image" => Element::Image(parse_image(obj, path, warnings)),
        "Container" => Element::Container(parse_container(obj, path, warnings)),
        "ColumnSet" => Element::ColumnSet(parse_column_set(obj, path, warnings)),
        "FactSet" => Element::FactSet(parse_fact_set(obj, path, warnings)),
        "Input.Text" => Element::InputText(parse_input_text(obj, path, warnings)),
        "ActionSet" => Element::ActionSet(parse_action_set(obj, path, warnings)),
        "Media" => Element::Media(parse_media(obj, path, warnings)),
        _ => Element::Unknown(UnknownElement {
            element_type: element_type.to_string(),
            value: value.clone(),
        }),
    };
    Some(element)
}

fn parse_text_block(obj: &JsonMap, path: &str, warnings: &mut Vec<Diagnostic>) -> TextBlock {
    TextBlock {
        id: optional_string(obj, "id", path, warnings),
        text: required_string(obj, "text", path, warnings),
        size: enum_prop(obj, "size", path, warnings, TextSize::parse),
        weight: enum_prop(obj, "weight", path, warnings, TextWeight::parse),
        horizontal_alignment: enum_prop(
            obj,
            "horizontalAlignment",
            path,
            warnings,
            HorizontalAlignment::parse,
        ),
        wrap: bool_prop(obj, "wrap", path, warnings),
        max_lines: optional_u32(obj, "maxLines", path, warnings),
    }
}

fn parse_image(obj: &JsonMap, path: &str, warnings: &mut Vec<Diagnostic>) -> Image {
    Image {
        id: optional_string(obj, "id", path, warnings),
        url: url_prop(obj, "url", path, warnings),
        alt_text: optional_string(obj, "altText", path, warnings),
        size: enum_prop(obj, "size", path, warnings, ImageSize::parse),
        pixel_width: optional_u32(obj, "pixelWidth", path, warnings),
        pixel_height: optional_u32(obj, "pixelHeight", path, warnings),
        horizontal_alignment: enum_prop(
            obj,
            "horizontalAlignment",
            path,
            warnings,
            HorizontalAlignment::parse,
        ),
        select_action: select_action_prop(obj, path, warnings),
    }
}

fn parse_container(obj: &JsonMap, path: &str, warnings: &mut Vec<Diagnostic>) -> Container {
    Container {
        id: optional_string(obj, "id", path, warnings),
        items: parse_elements(obj.get("items"), path, "items", warnings),
        style: enum_prop(obj, "style", path, warnings, ContainerStyle::parse),
        vertical_content_alignment: enum_prop(
            obj,
            "verticalContentAlignment",
            path,
            warnings,
            VerticalContentAlignment::parse,
        ),
        select_action: select_action_prop(obj, path, warnings),
        bleed: bool_prop(obj, "bleed", path, warnings),
    }
}

fn parse_column_set(obj: &JsonMap, path: &str, warnings: &mut Vec<Diagnostic>) -> ColumnSet {
    let mut columns = Vec::new();
    if let Some(value) = obj.get("columns") {
        match value.as_array() {
            Some(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    let column_path = join_path(path, &format!("columns[{index}]"));
                    if let Some(column) = parse_column(entry, &column_path, warnings) {
                        columns.push(column);
                    }
                }
            }
            None => warnings.push(
                Diagnostic::warning("invalid_property_value", "`columns` must be an array")
                    .with_path(path),
            ),
        }
    }
    ColumnSet {
        id: optional_string(obj, "id", path, warnings),
        columns,
        style: enum_prop(obj, "style", path, warnings, ContainerStyle::parse),
        vertical_content_alignment: enum_prop(
            obj,
            "verticalContentAlignment",
            path,
            warnings,
            VerticalContentAlignment::parse,
        ),
        select_action: select_action_prop(obj, path, warnings),
        bleed: bool_prop(obj, "bleed", path, warnings),
    }
}

fn parse_column(value: &Value, path: &str, warnings: &mut Vec<Diagnostic>) -> Option<Column> {
    let Some(obj) = value.as_object() else {
        warnings.push(
            Diagnostic::warning("invalid_property_value", "column must be a JSON object")
                .with_path(path),
        );
        return None;
    };
    let width = match obj.get("width") {
        None => ColumnWidth::default(),
        Some(value) => match ColumnWidth::parse(value) {
            Some(width) => width,
            None => {
                warnings.push(
                    Diagnostic::warning(
                        "unknown_enum_value",
                        format!("unrecognized value `{value}` for `width`"),
                    )
                    .with_path(path),
                );
                ColumnWidth::default()
            }
        },
    };
    Some(Column {
        id: optional_string(obj, "id", path, warnings),
        width,
        items: parse_elements(obj.get("items"), path, "items", warnings),
        style: enum_prop(obj, "style", path, warnings, ContainerStyle::parse),
        vertical_content_alignment: enum_prop(
            obj,
            "verticalContentAlignment",
            path,
            warnings,
            VerticalContentAlignment::parse,
        ),
        select_action: select_action_prop(obj, path, warnings),
        bleed: bool_prop(obj, "bleed", path, warnings),
    })
}

fn parse_fact_set(obj: &JsonMap, path: &str, warnings: &mut Vec<Diagnostic>) -> FactSet {
    let mut facts = Vec::new();
    if let Some(entries) = obj.get("facts").and_then(Value::as_array) {
        for (index, entry) in entries.iter().enumerate() {
            let fact_path = join_path(path, &format!("facts[{index}]"));
            let Some(fact) = entry.as_object() else {
                warnings.push(
                    Diagnostic::warning("invalid_property_value", "fact must be a JSON object")
                        .with_path(&fact_path),
                );
                continue;
            };
            facts.push(Fact {
                title: required_string(fact, "title", &fact_path, warnings),
                value: required_string(fact, "value", &fact_path, warnings),
            });
        }
    }
    FactSet {
        id: optional_string(obj, "id", path, warnings),
        facts,
    }
}

fn parse_input_text(obj: &JsonMap, path: &str, warnings: &mut Vec<Diagnostic>) -> InputText {
    InputText {
        id: required_string(obj, "id", path, warnings),
        value: optional_string(obj, "value", path, warnings).unwrap_or_default(),
        placeholder: optional_string(obj, "placeholder", path, warnings),
        is_multiline: bool_prop(obj, "isMultiline", path, warnings),
        max_length: optional_u32(obj, "maxLength", path, warnings),
    }
}

fn parse_action_set(obj: &JsonMap, path: &str, warnings: &mut Vec<Diagnostic>) -> ActionSet {
    ActionSet {
        id: optional_string(obj, "id", path, warnings),
        actions: parse_actions(obj.get("actions"), path, "actions", warnings),
    }
}

fn parse_media(obj: &JsonMap, path: &str, warnings: &mut Vec<Diagnostic>) -> Media {
    let mut sources = Vec::new();
    if let Some(entries) = obj.get("sources").and_then(Value::as_array) {
        for (index, entry) in entries.iter().enumerate() {
            let source_path = join_path(path, &format!("sources[{index}]"));
            let Some(source) = entry.as_object() else {
                warnings.push(
                    Diagnostic::warning(
                        "invalid_property_value",
                        "media source must be a JSON object",
                    )
                    .with_path(&source_path),
                );
                continue;
            };
            sources.push(MediaSource {
                mime_type: optional_string(source, "mimeType", &source_path, warnings),
                url: url_prop(source, "url", &source_path, warnings),
            });
        }
    }
    Media {
        id: optional_string(obj, "id", path, warnings),
        sources,
        poster: optional_string(obj, "poster", path, warnings),
        alt_text: optional_string(obj, "altText", path, warnings),
    }
}

// ---------------------------------------------------------------------------
// actions
// ---------------------------------------------------------------------------

fn parse_actions(
    value: Option<&Value>,
    path: &str,
    key: &str,
    warnings: &mut Vec<Diagnostic>,
) -> Vec<Action> {
    let mut actions = Vec::new();
    let Some(value) = value else {
        return actions;
    };
    let Some(entries) = value.as_array() else {
        warnings.push(
            Diagnostic::warning("invalid_property_value", format!("`{key}` must be an array"))
                .with_path(path),
        );
        return actions;
    };
    for (index, entry) in entries.iter().enumerate() {
        let entry_path = join_path(path, &format!("{key}[{index}]"));
        if let Some(action) = parse_action(entry, &entry_path, warnings) {
            actions.push(action);
        }
    }
    actions
}

fn parse_action(value: &Value, path: &str, warnings: &mut Vec<Diagnostic>) -> Option<Action> {
    let Some(obj) = value.as_object() else {
        warnings.push(
            Diagnostic::warning("invalid_property_value", "action must be a JSON object")
                .with_path(path),
        );
        return None;
    };
    let Some(action_type) = obj.get("type").and_then(Value::as_str) else {
        warnings.push(
            Diagnostic::warning("missing_required_property", "action has no `type`")
                .with_path(path),
        );
        return None;
    };
    let title = optional_string(obj, "title", path, warnings);

    match action_type {
        "Action.OpenUrl" => Some(Action::OpenUrl(OpenUrlAction {
            url: url_prop(obj, "url", path, warnings),
            title,
        })),
        "Action.Submit" => Some(Action::Submit(SubmitAction {
            data: obj.get("data").cloned(),
            title,
        })),
        "Action.ShowCard" => {
            let Some(card_value) = obj.get("card") else {
                warnings.push(
                    Diagnostic::warning("missing_required_property", "show-card action has no `card`")
                        .with_path(path),
                );
                return None;
            };
            let card_path = join_path(path, "card");
            match card_from_value(card_value, &card_path, warnings) {
                Ok(card) => Some(Action::ShowCard(ShowCardAction {
                    card: Box::new(card),
                    title,
                })),
                Err(mut diag) => {
                    // a bad nested card only costs the action, not the card
                    diag.severity = Severity::Warning;
                    warnings.push(diag);
                    None
                }
            }
        }
        _ => {
            warnings.push(
                Diagnostic::warning(
                    "unknown_action_type",
                    format!("unsupported action type `{action_type}`"),
                )
                .with_path(path),
            );
            None
        }
    }
}

// ---------------------------------------------------------------------------
// property helpers
// ---------------------------------------------------------------------------

fn join_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

fn required_string(obj: &JsonMap, key: &str, path: &str, warnings: &mut Vec<Diagnostic>) -> String {
    match obj.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(_) => {
            warnings.push(
                Diagnostic::warning("invalid_property_value", format!("`{key}` must be a string"))
                    .with_path(path),
            );
            String::new()
        }
        None => {
            warnings.push(
                Diagnostic::warning(
                    "missing_required_property",
                    format!("required property `{key}` is missing"),
                )
                .with_path(path),
            );
            String::new()
        }
    }
}

fn optional_string(
    obj: &JsonMap,
    key: &str,
    path: &str,
    warnings: &mut Vec<Diagnostic>,
) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            warnings.push(
                Diagnostic::warning("invalid_property_value", format!("`{key}` must be a string"))
                    .with_path(path),
            );
            None
        }
    }
}

fn optional_u32(
    obj: &JsonMap,
    key: &str,
    path: &str,
    warnings: &mut Vec<Diagnostic>,
) -> Option<u32> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_u64().and_then(|number| u32::try_from(number).ok()) {
            Some(number) => Some(number),
            None => {
                warnings.push(
                    Diagnostic::warning(
                        "invalid_property_value",
                        format!("`{key}` must be an unsigned 32-bit integer"),
                    )
                    .with_path(path),
                );
                None
            }
        },
    }
}

fn bool_prop(obj: &JsonMap, key: &str, path: &str, warnings: &mut Vec<Diagnostic>) -> bool {
    match obj.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => {
            warnings.push(
                Diagnostic::warning("invalid_property_value", format!("`{key}` must be a boolean"))
                    .with_path(path),
            );
            false
        }
    }
}

fn enum_prop<T: Default>(
    obj: &JsonMap,
    key: &str,
    path: &str,
    warnings: &mut Vec<Diagnostic>,
    parse: fn(&str) -> Option<T>,
) -> T {
    match obj.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(Value::String(text)) => match parse(text) {
            Some(parsed) => parsed,
            None => {
                warnings.push(
                    Diagnostic::warning(
                        "unknown_enum_value",
                        format!("unrecognized value `{text}` for `{key}`"),
                    )
                    .with_path(path),
                );
                T::default()
            }
        },
        Some(_) => {
            warnings.push(
                Diagnostic::warning("invalid_property_value", format!("`{key}` must be a string"))
                    .with_path(path),
            );
            T::default()
        }
    }
}

/// Required URL property. Missing or malformed values degrade to the empty
/// string so the element still renders, just without a source.
fn url_prop(obj: &JsonMap, key: &str, path: &str, warnings: &mut Vec<Diagnostic>) -> String {
    let url = required_string(obj, key, path, warnings);
    if url.is_empty() || has_scheme(&url) {
        url
    } else {
        warnings.push(
            Diagnostic::warning("malformed_url", format!("`{url}` is not an absolute URL"))
                .with_path(path),
        );
        String::new()
    }
}

fn has_scheme(url: &str) -> bool {
    match url.split_once(':') {
        Some((scheme, _)) if !scheme.is_empty() => {
            scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        }
        _ => false,
    }
}

fn select_action_prop(obj: &JsonMap, path: &str, warnings: &mut Vec<Diagnostic>) -> Option<Action> {
    let value = obj.get("selectAction")?;
    let action_path = join_path(path, "selectAction");
    parse_action(value, &action_path, warnings)
}
