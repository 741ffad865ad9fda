//! Rendering pipeline for declarative JSON cards.
//! Turns a parsed [`cardframe_model::Card`] into an abstract UI element tree
//! through a pluggable per-type renderer registry, collecting diagnostics as
//! data instead of aborting on bad nodes.

pub mod actions;
pub mod builtins;
pub mod context;
pub mod errors;
pub mod host_config;
pub mod image;
pub mod registry;
pub mod renderer;
pub mod resolvers;
pub mod ui;

pub use actions::{ActionEvent, gather_inputs};
pub use builtins::ImageRenderer;
pub use context::{RenderArgs, RenderContext};
pub use errors::RenderError;
pub use host_config::{HostConfig, HostConfigError};
pub use image::{SvgImageRenderer, SvgSourceCache};
pub use registry::{ElementRenderer, RendererRegistry};
pub use renderer::{CardRenderer, RenderedCard, render_element};
pub use resolvers::{ResolveError, ResourceRequest, ResourceResolver, ResourceResolvers};
pub use ui::{
    Direction, ImageSlot, ImageSource, LoadState, RasterSource, UiButton, UiElement, UiImage,
    UiInput, UiMedia, UiPanel, UiPlaceholder, UiText, VectorSource,
};
