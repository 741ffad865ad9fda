//! Stock renderers for the built-in element types.

use std::cell::RefCell;
use std::rc::Rc;

use cardframe_model::{
    Action, Column, ContainerStyle, Element, HorizontalAlignment, TextSize, TextWeight,
    VerticalContentAlignment,
};

use crate::context::{RenderArgs, RenderContext};
use crate::image::ImageLoad;
use crate::registry::ElementRenderer;
use crate::renderer::render_element;
use crate::ui::{
    Direction, ImageSlot, ImageSource, LoadState, RasterSource, UiButton, UiElement, UiImage,
    UiInput, UiMedia, UiPanel, UiText,
};

pub(crate) fn default_renderers() -> Vec<(&'static str, Rc<dyn ElementRenderer>)> {
    vec![
        ("TextBlock", Rc::new(TextBlockRenderer)),
        ("Image", Rc::new(ImageRenderer)),
        ("Container", Rc::new(ContainerRenderer)),
        ("ColumnSet", Rc::new(ColumnSetRenderer)),
        ("FactSet", Rc::new(FactSetRenderer)),
        ("Input.Text", Rc::new(InputTextRenderer)),
        ("ActionSet", Rc::new(ActionSetRenderer)),
        ("Media", Rc::new(MediaRenderer)),
    ]
}

pub struct TextBlockRenderer;

impl ElementRenderer for TextBlockRenderer {
    fn render(
        &self,
        element: &Element,
        ctx: &mut RenderContext,
        _args: &RenderArgs,
    ) -> Option<UiElement> {
        let Element::TextBlock(text) = element else {
            return None;
        };
        Some(UiElement::Text(UiText {
            text: text.text.clone(),
            size_px: ctx.host_config.font_size_px(text.size),
            weight: text.weight,
            horizontal_alignment: text.horizontal_alignment,
            wrap: text.wrap,
            max_lines: text.max_lines,
        }))
    }
}

/// Base image renderer: builds the `UiImage` with a raster source and, when a
/// resolver claims the URL scheme, schedules the asynchronous load. Tap
/// actions are wrapped here rather than by the generic pipeline step, so
/// wrappers like [`crate::SvgImageRenderer`] see the same shape the original
/// produces.
pub struct ImageRenderer;

impl ElementRenderer for ImageRenderer {
    fn render(
        &self,
        element: &Element,
        ctx: &mut RenderContext,
        _args: &RenderArgs,
    ) -> Option<UiElement> {
        let Element::Image(image) = element else {
            return None;
        };

        let slot = Rc::new(RefCell::new(ImageSlot::pending()));
        if image.url.is_empty() {
            // Missing or malformed URL was already flagged during parsing.
            slot.borrow_mut().state = LoadState::Failed;
        } else if let Some(resolver) = ctx.resolver_for(&image.url) {
            let path = ctx.current_path();
            ctx.schedule_load(ImageLoad::new(
                image.url.clone(),
                Rc::downgrade(&slot),
                resolver,
                path,
            ));
        } else {
            // No resolver claims the scheme; the host toolkit fetches the URL
            // (or decodes the data URI) itself.
            let mut slot = slot.borrow_mut();
            slot.source = Some(ImageSource::Raster(RasterSource {
                url: image.url.clone(),
                data: None,
            }));
            slot.state = LoadState::Ready;
        }

        let rendered = UiElement::Image(UiImage {
            url: image.url.clone(),
            alt_text: image.alt_text.clone(),
            horizontal_alignment: image.horizontal_alignment,
            slot,
        });
        Some(match &image.select_action {
            Some(action) => wrap_in_button(action, rendered),
            None => rendered,
        })
    }
}

pub struct ContainerRenderer;

impl ElementRenderer for ContainerRenderer {
    fn render(
        &self,
        element: &Element,
        ctx: &mut RenderContext,
        args: &RenderArgs,
    ) -> Option<UiElement> {
        let Element::Container(container) = element else {
            return None;
        };
        let (mut panel, child_args) = collection_panel(
            container.style,
            container.vertical_content_alignment,
            container.bleed,
            Direction::Vertical,
            ctx,
            args,
        );
        for (index, item) in container.items.iter().enumerate() {
            ctx.push_path(format!("items[{index}]"));
            if let Some(child) = render_element(item, ctx, &child_args) {
                panel.children.push(child);
            }
            ctx.pop_path();
        }
        Some(UiElement::Panel(panel))
    }
}

pub struct ColumnSetRenderer;

impl ElementRenderer for ColumnSetRenderer {
    fn render(
        &self,
        element: &Element,
        ctx: &mut RenderContext,
        args: &RenderArgs,
    ) -> Option<UiElement> {
        let Element::ColumnSet(column_set) = element else {
            return None;
        };
        let (mut panel, child_args) = collection_panel(
            column_set.style,
            column_set.vertical_content_alignment,
            column_set.bleed,
            Direction::Horizontal,
            ctx,
            args,
        );
        for (index, column) in column_set.columns.iter().enumerate() {
            ctx.push_path(format!("columns[{index}]"));
            panel.children.push(render_column(column, ctx, &child_args));
            ctx.pop_path();
        }
        Some(UiElement::Panel(panel))
    }
}

/// Columns are not dispatched through the registry; they render inline as a
/// vertical panel carrying the column's width request.
fn render_column(column: &Column, ctx: &mut RenderContext, args: &RenderArgs) -> UiElement {
    let (mut panel, child_args) = collection_panel(
        column.style,
        column.vertical_content_alignment,
        column.bleed,
        Direction::Vertical,
        ctx,
        args,
    );
    panel.width = Some(column.width);
    for (index, item) in column.items.iter().enumerate() {
        ctx.push_path(format!("items[{index}]"));
        if let Some(child) = render_element(item, ctx, &child_args) {
            panel.children.push(child);
        }
        ctx.pop_path();
    }
    let rendered = UiElement::Panel(panel);
    match &column.select_action {
        Some(action) => wrap_in_button(action, rendered),
        None => rendered,
    }
}

pub struct FactSetRenderer;

impl ElementRenderer for FactSetRenderer {
    fn render(
        &self,
        element: &Element,
        ctx: &mut RenderContext,
        _args: &RenderArgs,
    ) -> Option<UiElement> {
        let Element::FactSet(fact_set) = element else {
            return None;
        };
        let size_px = ctx.host_config.font_size_px(TextSize::Default);
        let mut panel = UiPanel::vertical();
        for fact in &fact_set.facts {
            let mut row = UiPanel::horizontal();
            row.children.push(UiElement::Text(UiText {
                text: fact.title.clone(),
                size_px,
                weight: TextWeight::Bolder,
                horizontal_alignment: HorizontalAlignment::Left,
                wrap: false,
                max_lines: None,
            }));
            row.children.push(UiElement::Text(UiText {
                text: fact.value.clone(),
                size_px,
                weight: TextWeight::Default,
                horizontal_alignment: HorizontalAlignment::Left,
                wrap: true,
                max_lines: None,
            }));
            panel.children.push(UiElement::Panel(row));
        }
        Some(UiElement::Panel(panel))
    }
}

pub struct InputTextRenderer;

impl ElementRenderer for InputTextRenderer {
    fn render(
        &self,
        element: &Element,
        _ctx: &mut RenderContext,
        _args: &RenderArgs,
    ) -> Option<UiElement> {
        let Element::InputText(input) = element else {
            return None;
        };
        Some(UiElement::Input(UiInput {
            id: input.id.clone(),
            placeholder: input.placeholder.clone(),
            multiline: input.is_multiline,
            max_length: input.max_length,
            value: Rc::new(RefCell::new(input.value.clone())),
        }))
    }
}

pub struct ActionSetRenderer;

impl ElementRenderer for ActionSetRenderer {
    fn render(
        &self,
        element: &Element,
        _ctx: &mut RenderContext,
        _args: &RenderArgs,
    ) -> Option<UiElement> {
        let Element::ActionSet(action_set) = element else {
            return None;
        };
        Some(render_action_row(&action_set.actions))
    }
}

pub struct MediaRenderer;

impl ElementRenderer for MediaRenderer {
    fn render(
        &self,
        element: &Element,
        ctx: &mut RenderContext,
        _args: &RenderArgs,
    ) -> Option<UiElement> {
        let Element::Media(media) = element else {
            return None;
        };
        Some(UiElement::Media(UiMedia {
            sources: media.sources.clone(),
            poster: media.poster.clone(),
            alt_text: media.alt_text.clone(),
            inline_playback: ctx.host_config.media.allow_inline_playback,
        }))
    }
}

/// One horizontal row of buttons, shared by `ActionSet` and the card-level
/// action strip.
pub(crate) fn render_action_row(actions: &[Action]) -> UiElement {
    let mut row = UiPanel::horizontal();
    for action in actions {
        row.children.push(UiElement::Button(UiButton {
            title: action.title().unwrap_or_default().to_string(),
            action: action.clone(),
            body: None,
        }));
    }
    UiElement::Panel(row)
}

pub(crate) fn wrap_in_button(action: &Action, body: UiElement) -> UiElement {
    UiElement::Button(UiButton {
        title: action.title().unwrap_or_default().to_string(),
        action: action.clone(),
        body: Some(Box::new(body)),
    })
}

/// Shared shell for `Container`, `ColumnSet` and `Column`: a styled element
/// gets the configured padding and background, and `bleed` extends the panel
/// into exactly the parent's padding. Returns the panel plus the args its
/// children render with.
fn collection_panel(
    style: ContainerStyle,
    vertical_alignment: VerticalContentAlignment,
    bleed: bool,
    direction: Direction,
    ctx: &RenderContext,
    args: &RenderArgs,
) -> (UiPanel, RenderArgs) {
    let mut panel = match direction {
        Direction::Vertical => UiPanel::vertical(),
        Direction::Horizontal => UiPanel::horizontal(),
    };
    panel.vertical_alignment = vertical_alignment;
    let styled = style != ContainerStyle::None;
    if styled {
        panel.style = style;
        panel.padding = ctx.host_config.spacing.padding;
        panel.background_color = ctx
            .host_config
            .background_color(style)
            .map(|color| color.to_string());
    }
    if bleed {
        panel.bleed_margin = args.parent_padding;
    }
    let child_args = RenderArgs {
        parent_style: if styled { style } else { args.parent_style },
        parent_padding: panel.padding,
    };
    (panel, child_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardframe_model::{OpenUrlAction, SubmitAction};

    #[test]
    fn action_row_holds_one_button_per_action() {
        let actions = vec![
            Action::OpenUrl(OpenUrlAction {
                url: "https://example.test".into(),
                title: Some("Open".into()),
            }),
            Action::Submit(SubmitAction::default()),
        ];

        let UiElement::Panel(row) = render_action_row(&actions) else {
            panic!("expected a panel");
        };
        assert_eq!(row.direction, Direction::Horizontal);
        assert_eq!(row.children.len(), 2);
        let UiElement::Button(first) = &row.children[0] else {
            panic!("expected a button");
        };
        assert_eq!(first.title, "Open");
        assert!(first.body.is_none());
        let UiElement::Button(second) = &row.children[1] else {
            panic!("expected a button");
        };
        assert_eq!(second.title, "");
    }

    #[test]
    fn wrapping_keeps_the_body_and_action() {
        let action = Action::OpenUrl(OpenUrlAction {
            url: "https://example.test".into(),
            title: None,
        });
        let body = UiElement::Panel(UiPanel::vertical());

        let UiElement::Button(button) = wrap_in_button(&action, body) else {
            panic!("expected a button");
        };
        assert_eq!(button.action.type_name(), "Action.OpenUrl");
        assert!(matches!(button.body.as_deref(), Some(UiElement::Panel(_))));
    }
}
