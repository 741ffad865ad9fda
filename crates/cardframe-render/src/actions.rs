//! Action activation: turning a tapped button into a host-consumable event.

use serde_json::Value;

use cardframe_model::Action;

use crate::renderer::{CardRenderer, RenderedCard};
use crate::ui::UiElement;

/// What an activated action means for the host.
#[derive(Debug, Clone)]
pub enum ActionEvent {
    /// Navigate to `url`; the pipeline never opens anything itself.
    OpenUrl { url: String },
    /// Hand the gathered input values and the author payload to the host.
    Submit {
        data: Option<Value>,
        inputs: Vec<(String, String)>,
    },
    /// Show the freshly rendered nested card.
    ShowCard {
        overlay: Box<UiElement>,
        speak: Option<String>,
    },
}

impl CardRenderer {
    /// Activate `action` against a rendered card.
    ///
    /// Synchronous and re-entrant: a Show-Card activation runs the full
    /// pipeline on the nested card and merges its diagnostics and pending
    /// image loads into `rendered`. Submit re-reads the live input values on
    /// every invocation, so host edits made since the render are picked up.
    pub fn activate(&self, rendered: &mut RenderedCard, action: &Action) -> ActionEvent {
        log::debug!("activating `{}`", action.type_name());
        let event = match action {
            Action::OpenUrl(open_url) => ActionEvent::OpenUrl {
                url: open_url.url.clone(),
            },
            Action::Submit(submit) => ActionEvent::Submit {
                data: submit.data.clone(),
                inputs: gather_inputs(&rendered.root),
            },
            Action::ShowCard(show_card) => {
                let mut nested = self.render(&show_card.card);
                rendered.errors.append(&mut nested.errors);
                rendered.warnings.append(&mut nested.warnings);
                rendered.pending_loads.append(&mut nested.pending_loads);
                ActionEvent::ShowCard {
                    overlay: Box::new(nested.root),
                    speak: nested.speak,
                }
            }
        };
        if let Some(observer) = rendered.observer.clone() {
            observer(&event);
        }
        event
    }
}

/// All `(input id, current value)` pairs under `root`, in document order.
/// Inputs without an id never contribute to a submit payload.
pub fn gather_inputs(root: &UiElement) -> Vec<(String, String)> {
    let mut inputs = Vec::new();
    root.walk(&mut |node| {
        if let UiElement::Input(input) = node {
            if !input.id.is_empty() {
                inputs.push((input.id.clone(), input.value.borrow().clone()));
            }
        }
    });
    inputs
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::ui::{UiInput, UiPanel};

    fn input(id: &str, value: &str) -> UiElement {
        UiElement::Input(UiInput {
            id: id.into(),
            placeholder: None,
            multiline: false,
            max_length: None,
            value: Rc::new(RefCell::new(value.into())),
        })
    }

    #[test]
    fn gathers_inputs_in_document_order_skipping_anonymous_ones() {
        let mut inner = UiPanel::vertical();
        inner.children.push(input("b", "2"));
        let mut root = UiPanel::vertical();
        root.children.push(input("a", "1"));
        root.children.push(UiElement::Panel(inner));
        root.children.push(input("", "ignored"));

        assert_eq!(
            gather_inputs(&UiElement::Panel(root)),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }
}
