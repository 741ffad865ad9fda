//! The rendering session and per-card pipeline entry points.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use cardframe_model::{
    Card, ContainerStyle, Diagnostic, Element, ParseResult, parse_card, parse_card_str,
};

use crate::actions::ActionEvent;
use crate::builtins;
use crate::context::{RenderArgs, RenderContext};
use crate::errors::RenderError;
use crate::host_config::HostConfig;
use crate::image::{ImageLoad, SvgSourceCache};
use crate::registry::RendererRegistry;
use crate::resolvers::ResourceResolvers;
use crate::ui::{UiElement, UiPanel};

/// A rendering session: host configuration, registered renderers and
/// resolvers, and the SVG source cache shared by every card rendered
/// through it.
pub struct CardRenderer {
    host_config: Arc<HostConfig>,
    resolvers: ResourceResolvers,
    renderers: RendererRegistry,
    svg_cache: Rc<RefCell<SvgSourceCache>>,
    fixed_dimensions: Option<(u32, u32)>,
}

impl CardRenderer {
    /// Build a session around `host_config`. Fails only when the
    /// configuration itself is unusable; card problems never surface here.
    pub fn new(host_config: HostConfig) -> Result<Self, RenderError> {
        host_config.validate()?;
        Ok(Self {
            host_config: Arc::new(host_config),
            resolvers: ResourceResolvers::new(),
            renderers: RendererRegistry::with_defaults(),
            svg_cache: Rc::new(RefCell::new(SvgSourceCache::new())),
            fixed_dimensions: None,
        })
    }

    pub fn host_config(&self) -> &HostConfig {
        &self.host_config
    }

    /// Registry of element renderers; `set` here replaces built-ins.
    pub fn element_renderers(&mut self) -> &mut RendererRegistry {
        &mut self.renderers
    }

    /// Scheme-keyed resource resolvers consulted for image URLs.
    pub fn resource_resolvers(&mut self) -> &mut ResourceResolvers {
        &mut self.resolvers
    }

    /// Give every card rendered from now on a fixed root size instead of
    /// sizing to content.
    pub fn set_fixed_dimensions(&mut self, width: u32, height: u32) {
        self.fixed_dimensions = Some((width, height));
    }

    pub fn reset_fixed_dimensions(&mut self) {
        self.fixed_dimensions = None;
    }

    /// Render a parsed card into a UI tree plus its diagnostics.
    ///
    /// Renderer edits made after this call starts do not affect the pass;
    /// the context works off a registry snapshot.
    pub fn render(&self, card: &Card) -> RenderedCard {
        log::debug!(
            "rendering card version `{}` with {} body elements",
            card.version,
            card.body.len()
        );
        let mut ctx = RenderContext::new(
            Arc::clone(&self.host_config),
            self.renderers.snapshot(),
            self.resolvers.clone(),
            Rc::clone(&self.svg_cache),
        );

        let mut root = UiPanel::vertical();
        root.style = ContainerStyle::Default;
        root.padding = self.host_config.spacing.padding;
        root.background_color = self
            .host_config
            .background_color(ContainerStyle::Default)
            .map(|color| color.to_string());
        root.fixed_size = self.fixed_dimensions;

        let args = RenderArgs::root(root.padding);
        for (index, element) in card.body.iter().enumerate() {
            ctx.push_path(format!("body[{index}]"));
            if let Some(child) = render_element(element, &mut ctx, &args) {
                root.children.push(child);
            }
            ctx.pop_path();
        }
        if !card.actions.is_empty() {
            root.children.push(builtins::render_action_row(&card.actions));
        }

        RenderedCard {
            root: UiElement::Panel(root),
            speak: card.speak.clone(),
            errors: ctx.errors,
            warnings: ctx.warnings,
            pending_loads: ctx.pending_loads,
            observer: None,
        }
    }

    /// Parse and render a JSON value in one step. Parse diagnostics come
    /// before render diagnostics in the result.
    pub fn render_value(&self, value: &serde_json::Value) -> RenderedCard {
        self.render_parsed(parse_card(value))
    }

    /// Parse and render a JSON string in one step.
    pub fn render_str(&self, text: &str) -> RenderedCard {
        self.render_parsed(parse_card_str(text))
    }

    fn render_parsed(&self, parsed: ParseResult) -> RenderedCard {
        match parsed.card {
            Some(card) => {
                let mut rendered = self.render(&card);
                rendered.errors = merged(parsed.errors, rendered.errors);
                rendered.warnings = merged(parsed.warnings, rendered.warnings);
                rendered
            }
            // Nothing parsed; hand back an empty root with the diagnostics.
            None => RenderedCard {
                root: UiElement::Panel(UiPanel::vertical()),
                speak: None,
                errors: parsed.errors,
                warnings: parsed.warnings,
                pending_loads: Vec::new(),
                observer: None,
            },
        }
    }
}

fn merged(mut first: Vec<Diagnostic>, mut second: Vec<Diagnostic>) -> Vec<Diagnostic> {
    first.append(&mut second);
    first
}

/// Render one element through the registry snapshot in `ctx`.
///
/// `None` means the element contributed nothing; its renderer has already
/// recorded why. A `select_action` on the element wraps the result in a
/// button unless the renderer produced one itself.
pub fn render_element(
    element: &Element,
    ctx: &mut RenderContext,
    args: &RenderArgs,
) -> Option<UiElement> {
    let renderer = ctx.renderer_for(element.type_name());
    let rendered = renderer.render(element, ctx, args)?;
    Some(match element.select_action() {
        Some(action) if !matches!(rendered, UiElement::Button(_)) => {
            builtins::wrap_in_button(action, rendered)
        }
        _ => rendered,
    })
}

/// Output of one render pass: the UI tree, the card's speech text, ordered
/// diagnostics, and any image loads still to run.
pub struct RenderedCard {
    pub root: UiElement,
    pub speak: Option<String>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub(crate) pending_loads: Vec<ImageLoad>,
    pub(crate) observer: Option<Rc<dyn Fn(&ActionEvent)>>,
}

impl RenderedCard {
    /// Image loads scheduled during the pass and not yet run.
    pub fn pending_load_count(&self) -> usize {
        self.pending_loads.len()
    }

    /// Run the pending image loads in order, delivering each outcome into
    /// its image slot. Returns how many loads delivered bytes.
    pub async fn resolve_images(&mut self) -> usize {
        let loads = std::mem::take(&mut self.pending_loads);
        let mut delivered = 0;
        for load in loads {
            if load.run().await {
                delivered += 1;
            }
        }
        delivered
    }

    /// Register a callback invoked for every activated action.
    pub fn set_action_observer(&mut self, observer: impl Fn(&ActionEvent) + 'static) {
        self.observer = Some(Rc::new(observer));
    }
}
