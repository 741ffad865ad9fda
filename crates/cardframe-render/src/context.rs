//! Per-pass render state: configuration, diagnostics and the node path.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use cardframe_model::{ContainerStyle, Diagnostic};

use crate::host_config::HostConfig;
use crate::image::{ImageLoad, SvgSourceCache};
use crate::registry::{ElementRenderer, RegistrySnapshot};
use crate::resolvers::{ResourceResolver, ResourceResolvers};

/// State threaded through one render pass. Renderers read configuration,
/// record diagnostics and schedule image loads through this.
pub struct RenderContext {
    pub host_config: Arc<HostConfig>,
    pub(crate) renderers: RegistrySnapshot,
    pub(crate) resolvers: ResourceResolvers,
    pub(crate) svg_cache: Rc<RefCell<SvgSourceCache>>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub(crate) pending_loads: Vec<ImageLoad>,
    path: Vec<String>,
}

impl RenderContext {
    pub(crate) fn new(
        host_config: Arc<HostConfig>,
        renderers: RegistrySnapshot,
        resolvers: ResourceResolvers,
        svg_cache: Rc<RefCell<SvgSourceCache>>,
    ) -> Self {
        Self {
            host_config,
            renderers,
            resolvers,
            svg_cache,
            errors: Vec::new(),
            warnings: Vec::new(),
            pending_loads: Vec::new(),
            path: Vec::new(),
        }
    }

    /// Record a warning at the current node path.
    pub fn warn(&mut self, code: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(code, message).with_path(self.current_path());
        self.warnings.push(diagnostic);
    }

    /// Record an error at the current node path.
    pub fn error(&mut self, code: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic::error(code, message).with_path(self.current_path());
        self.errors.push(diagnostic);
    }

    /// Dotted path of the node being rendered, e.g. `body[1].items[0]`.
    pub fn current_path(&self) -> String {
        self.path.join(".")
    }

    pub(crate) fn push_path(&mut self, segment: String) {
        self.path.push(segment);
    }

    pub(crate) fn pop_path(&mut self) {
        self.path.pop();
    }

    pub(crate) fn renderer_for(&self, type_name: &str) -> Rc<dyn ElementRenderer> {
        self.renderers.get(type_name)
    }

    pub(crate) fn resolver_for(&self, url: &str) -> Option<Arc<dyn ResourceResolver>> {
        self.resolvers.for_url(url)
    }

    pub(crate) fn schedule_load(&mut self, load: ImageLoad) {
        self.pending_loads.push(load);
    }
}

/// Layout facts a parent passes down while rendering its children.
#[derive(Debug, Clone, Copy)]
pub struct RenderArgs {
    /// Style of the nearest styled ancestor container.
    pub parent_style: ContainerStyle,
    /// Padding of the immediate parent, in pixels. Bleeding children extend
    /// into exactly this margin.
    pub parent_padding: u32,
}

impl RenderArgs {
    /// Arguments for the card root's direct children.
    pub fn root(padding: u32) -> Self {
        Self {
            parent_style: ContainerStyle::Default,
            parent_padding: padding,
        }
    }
}
