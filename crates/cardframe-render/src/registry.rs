//! Per-session renderer registry.
//!
//! Each element type string maps to one renderer. Hosts replace built-ins or
//! add renderers for their own types; lookups for anything unregistered fall
//! back to a placeholder renderer that records a warning.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use cardframe_model::Element;

use crate::builtins;
use crate::context::{RenderArgs, RenderContext};
use crate::ui::{UiElement, UiPlaceholder};

/// Produces the UI node for one element type.
///
/// Returning `None` marks the element as failed; the pipeline records the
/// diagnostics the renderer pushed and carries on with the siblings.
pub trait ElementRenderer {
    fn render(
        &self,
        element: &Element,
        ctx: &mut RenderContext,
        args: &RenderArgs,
    ) -> Option<UiElement>;
}

pub struct RendererRegistry {
    renderers: HashMap<String, Rc<dyn ElementRenderer>>,
    builtin: HashSet<String>,
    overridden: HashSet<String>,
    fallback: Rc<dyn ElementRenderer>,
}

impl RendererRegistry {
    pub(crate) fn with_defaults() -> Self {
        let mut renderers: HashMap<String, Rc<dyn ElementRenderer>> = HashMap::new();
        for (type_name, renderer) in builtins::default_renderers() {
            renderers.insert(type_name.to_string(), renderer);
        }
        let builtin = renderers.keys().cloned().collect();
        Self {
            renderers,
            builtin,
            overridden: HashSet::new(),
            fallback: Rc::new(UnknownElementRenderer),
        }
    }

    /// Register `renderer` for `type_name`. Last write wins; replacing a
    /// stock renderer marks the type as overridden.
    pub fn set(&mut self, type_name: &str, renderer: Rc<dyn ElementRenderer>) {
        if self.builtin.contains(type_name) {
            self.overridden.insert(type_name.to_string());
        }
        self.renderers.insert(type_name.to_string(), renderer);
    }

    /// Renderer for `type_name`, or the unknown-type fallback.
    pub fn get(&self, type_name: &str) -> Rc<dyn ElementRenderer> {
        self.renderers
            .get(type_name)
            .cloned()
            .unwrap_or_else(|| Rc::clone(&self.fallback))
    }

    /// Whether a stock renderer for `type_name` has been replaced.
    pub fn is_overridden(&self, type_name: &str) -> bool {
        self.overridden.contains(type_name)
    }

    /// Frozen view for one render pass. Registry edits made after the
    /// snapshot do not affect passes already underway.
    pub(crate) fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            renderers: self.renderers.clone(),
            fallback: Rc::clone(&self.fallback),
        }
    }
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("RendererRegistry")
            .field("types", &types)
            .field("overridden", &self.overridden)
            .finish()
    }
}

#[derive(Clone)]
pub(crate) struct RegistrySnapshot {
    renderers: HashMap<String, Rc<dyn ElementRenderer>>,
    fallback: Rc<dyn ElementRenderer>,
}

impl RegistrySnapshot {
    pub(crate) fn get(&self, type_name: &str) -> Rc<dyn ElementRenderer> {
        self.renderers
            .get(type_name)
            .cloned()
            .unwrap_or_else(|| Rc::clone(&self.fallback))
    }
}

/// Fallback for element types nothing is registered for: emits a placeholder
/// node and exactly one warning.
struct UnknownElementRenderer;

impl ElementRenderer for UnknownElementRenderer {
    fn render(
        &self,
        element: &Element,
        ctx: &mut RenderContext,
        _args: &RenderArgs,
    ) -> Option<UiElement> {
        let element_type = element.type_name().to_string();
        log::debug!("no renderer registered for `{element_type}`");
        ctx.warn(
            "unknown_element_type",
            format!("no renderer registered for `{element_type}`"),
        );
        Some(UiElement::Placeholder(UiPlaceholder { element_type }))
    }
}
