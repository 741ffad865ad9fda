//! Action types carried by cards, buttons, and tappable elements.

use serde_json::{Map, Value};

use crate::elements::Card;

/// The closed set of actions the pipeline can dispatch. Unknown action types
/// are dropped at parse time with a warning.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenUrl(OpenUrlAction),
    Submit(SubmitAction),
    ShowCard(ShowCardAction),
}

impl Action {
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::OpenUrl(_) => "Action.OpenUrl",
            Action::Submit(_) => "Action.Submit",
            Action::ShowCard(_) => "Action.ShowCard",
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Action::OpenUrl(a) => a.title.as_deref(),
            Action::Submit(a) => a.title.as_deref(),
            Action::ShowCard(a) => a.title.as_deref(),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), self.type_name().into());
        match self {
            Action::OpenUrl(a) => {
                insert_title(&mut map, &a.title);
                map.insert("url".into(), a.url.as_str().into());
            }
            Action::Submit(a) => {
                insert_title(&mut map, &a.title);
                if let Some(data) = &a.data {
                    map.insert("data".into(), data.clone());
                }
            }
            Action::ShowCard(a) => {
                insert_title(&mut map, &a.title);
                map.insert("card".into(), a.card.to_json());
            }
        }
        Value::Object(map)
    }
}

/// Navigate to a URL. The pipeline only reports the URL; navigation itself is
/// the host's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenUrlAction {
    pub url: String,
    pub title: Option<String>,
}

/// Collect input values and hand them to the host together with the
/// author-provided `data` payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmitAction {
    pub data: Option<Value>,
    pub title: Option<String>,
}

/// Reveal a nested card rendered through the same pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowCardAction {
    pub card: Box<Card>,
    pub title: Option<String>,
}

fn insert_title(map: &mut Map<String, Value>, title: &Option<String>) {
    if let Some(title) = title {
        map.insert("title".into(), title.as_str().into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn open_url_serializes_type_and_url() {
        let action = Action::OpenUrl(OpenUrlAction {
            url: "https://example.com".into(),
            title: Some("Visit".into()),
        });
        assert_eq!(
            action.to_json(),
            json!({"type": "Action.OpenUrl", "title": "Visit", "url": "https://example.com"})
        );
    }

    #[test]
    fn submit_omits_missing_data() {
        let action = Action::Submit(SubmitAction::default());
        assert_eq!(action.to_json(), json!({"type": "Action.Submit"}));
    }

    #[test]
    fn show_card_embeds_nested_card() {
        let action = Action::ShowCard(ShowCardAction {
            card: Box::new(Card {
                version: "1.5".into(),
                ..Card::default()
            }),
            title: Some("More".into()),
        });
        assert_eq!(
            action.to_json(),
            json!({
                "type": "Action.ShowCard",
                "title": "More",
                "card": {"type": "AdaptiveCard", "version": "1.5"}
            })
        );
    }
}
