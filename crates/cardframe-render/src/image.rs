//! SVG data-URI decoding, the per-session source cache, and the raster
//! image load machine with its one-shot retry.

use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use lru::LruCache;
use once_cell::sync::Lazy;
use regex::Regex;

use cardframe_model::{Element, Image};

use crate::context::{RenderArgs, RenderContext};
use crate::host_config::HostConfig;
use crate::registry::ElementRenderer;
use crate::resolvers::{ResolveError, ResourceRequest, ResourceResolver};
use crate::ui::{ImageSlot, ImageSource, LoadState, RasterSource, UiElement, VectorSource};

pub(crate) const SVG_CACHE_CAPACITY: usize = 16;

/// Vector sources are rasterized at twice the requested box so they stay
/// sharp on scaled displays.
const SUPERSAMPLE_FACTOR: u32 = 2;

static SVG_DATA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^data:image/svg\+xml(;(?P<params>[\w=\-]+))?(;(?P<base64>base64))?,(?P<data>.*)$")
        .unwrap()
});

pub(crate) struct SvgDataUrl<'a> {
    pub(crate) payload: &'a str,
    pub(crate) base64: bool,
}

pub(crate) fn match_svg_data_url(url: &str) -> Option<SvgDataUrl<'_>> {
    let caps = SVG_DATA_URL.captures(url)?;
    // A lone `;base64` is captured by the params group, not the base64 one.
    let base64 = caps.name("base64").is_some()
        || caps
            .name("params")
            .is_some_and(|params| params.as_str().eq_ignore_ascii_case("base64"));
    let payload = caps.name("data").map_or("", |data| data.as_str());
    Some(SvgDataUrl { payload, base64 })
}

pub(crate) fn decode_svg_payload(data_url: &SvgDataUrl<'_>) -> Result<Vec<u8>, String> {
    let bytes = if data_url.base64 {
        STANDARD
            .decode(data_url.payload)
            .map_err(|err| format!("base64 decode failed: {err}"))?
    } else {
        urlencoding::decode(data_url.payload)
            .map_err(|err| format!("percent-decode failed: {err}"))?
            .into_owned()
            .into_bytes()
    };
    if !looks_like_svg(&bytes) {
        return Err("payload is not an SVG document".to_string());
    }
    Ok(bytes)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(4096)];
    String::from_utf8_lossy(head).contains("<svg")
}

/// Raster box for a vector source: the explicit pixel size, else the host
/// config size class, supersampled. A dimension of zero stays unset.
pub(crate) fn rasterize_dims(image: &Image, config: &HostConfig) -> (Option<u32>, Option<u32>) {
    let class_px = config.image_size_px(image.size);
    let box_px = |explicit: Option<u32>| {
        explicit
            .or(class_px)
            .filter(|px| *px > 0)
            .map(|px| px.saturating_mul(SUPERSAMPLE_FACTOR))
    };
    (box_px(image.pixel_width), box_px(image.pixel_height))
}

/// LRU cache of decoded vector sources, keyed by the full data-URI string.
///
/// Values are weak: the cache never keeps a source alive on its own, it only
/// lets concurrent uses of the same URL share one decode. Single-thread only.
pub struct SvgSourceCache {
    entries: LruCache<String, Weak<VectorSource>>,
}

impl SvgSourceCache {
    pub fn new() -> Self {
        Self::with_capacity(SVG_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Live source for `url`, refreshing its recency. Entries whose source
    /// every holder has dropped are pruned on lookup.
    pub fn get(&mut self, url: &str) -> Option<Rc<VectorSource>> {
        let live = self.entries.get(url).and_then(Weak::upgrade);
        if live.is_none() {
            self.entries.pop(url);
        }
        live
    }

    pub fn insert(&mut self, url: &str, source: &Rc<VectorSource>) {
        self.entries.put(url.to_string(), Rc::downgrade(source));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(url)
    }
}

impl Default for SvgSourceCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrapper around an image renderer that intercepts `image/svg+xml` data
/// URIs, decoding them into shared vector sources through the session cache.
/// Install it over `"Image"` to take over SVG handling:
///
/// ```ignore
/// renderer
///     .element_renderers()
///     .set("Image", Rc::new(SvgImageRenderer::default()));
/// ```
pub struct SvgImageRenderer {
    inner: Rc<dyn ElementRenderer>,
}

impl SvgImageRenderer {
    pub fn new(inner: Rc<dyn ElementRenderer>) -> Self {
        Self { inner }
    }
}

impl Default for SvgImageRenderer {
    fn default() -> Self {
        Self::new(Rc::new(crate::builtins::ImageRenderer))
    }
}

impl ElementRenderer for SvgImageRenderer {
    fn render(
        &self,
        element: &Element,
        ctx: &mut RenderContext,
        args: &RenderArgs,
    ) -> Option<UiElement> {
        let Element::Image(image) = element else {
            return self.inner.render(element, ctx, args);
        };
        let Some(data_url) = match_svg_data_url(&image.url) else {
            return self.inner.render(element, ctx, args);
        };

        let rendered = self.inner.render(element, ctx, args)?;
        let decoded = {
            let mut cache = ctx.svg_cache.borrow_mut();
            if let Some(live) = cache.get(&image.url) {
                log::debug!("svg source cache hit for `{}`", image.url);
                Ok(live)
            } else {
                decode_svg_payload(&data_url).map(|svg| {
                    let (width, height) = rasterize_dims(image, &ctx.host_config);
                    let source = Rc::new(VectorSource {
                        svg,
                        rasterize_width: width,
                        rasterize_height: height,
                    });
                    cache.insert(&image.url, &source);
                    source
                })
            }
        };

        match decoded {
            Ok(source) => {
                if let Some(slot) = image_slot_of(&rendered) {
                    let mut slot = slot.borrow_mut();
                    slot.source = Some(ImageSource::Vector(source));
                    slot.state = LoadState::Ready;
                }
            }
            Err(reason) => {
                ctx.warn("invalid_svg_data", reason);
                if let Some(slot) = image_slot_of(&rendered) {
                    let mut slot = slot.borrow_mut();
                    slot.source = None;
                    slot.state = LoadState::Failed;
                }
            }
        }
        Some(rendered)
    }
}

/// The slot of a rendered image, looking through the button wrapper the base
/// renderer adds for tap actions.
fn image_slot_of(rendered: &UiElement) -> Option<Rc<RefCell<ImageSlot>>> {
    match rendered {
        UiElement::Image(image) => Some(Rc::clone(&image.slot)),
        UiElement::Button(button) => match button.body.as_deref() {
            Some(UiElement::Image(image)) => Some(Rc::clone(&image.slot)),
            _ => None,
        },
        _ => None,
    }
}

/// One scheduled raster fetch. Holds the slot weakly so a discarded element
/// turns delivery into a no-op.
pub(crate) struct ImageLoad {
    url: String,
    slot: Weak<RefCell<ImageSlot>>,
    resolver: Arc<dyn ResourceResolver>,
    path: String,
}

impl ImageLoad {
    pub(crate) fn new(
        url: String,
        slot: Weak<RefCell<ImageSlot>>,
        resolver: Arc<dyn ResourceResolver>,
        path: String,
    ) -> Self {
        Self {
            url,
            slot,
            resolver,
            path,
        }
    }

    /// Fetch the image and deliver the outcome into the slot. A first
    /// failure is retried exactly once with the cache bypassed; the retry's
    /// outcome is final. Returns whether bytes were delivered.
    pub(crate) async fn run(self) -> bool {
        let mut attempts = 1;
        let mut outcome = fetch(&self.resolver, ResourceRequest::new(self.url.clone())).await;
        if let Err(err) = &outcome {
            log::warn!(
                "image load failed for `{}` ({err}); retrying with cache bypassed",
                self.url
            );
            attempts += 1;
            let retry = ResourceRequest {
                url: self.url.clone(),
                bypass_cache: true,
            };
            outcome = fetch(&self.resolver, retry).await;
        }

        let Some(slot) = self.slot.upgrade() else {
            log::debug!("image at `{}` was dropped before its load finished", self.path);
            return false;
        };
        let mut slot = slot.borrow_mut();
        slot.attempts += attempts;
        match outcome {
            Ok(data) => {
                slot.source = Some(ImageSource::Raster(RasterSource {
                    url: self.url,
                    data: Some(data),
                }));
                slot.state = LoadState::Ready;
                true
            }
            Err(err) => {
                log::warn!("image load failed for `{}` after retry: {err}", self.url);
                slot.state = LoadState::Failed;
                false
            }
        }
    }
}

async fn fetch(
    resolver: &Arc<dyn ResourceResolver>,
    request: ResourceRequest,
) -> Result<Vec<u8>, ResolveError> {
    let resolver = Arc::clone(resolver);
    tokio::task::spawn_blocking(move || resolver.load(&request))
        .await
        .map_err(|err| ResolveError::Task(err.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardframe_model::ImageSize;

    fn vector(tag: &str) -> Rc<VectorSource> {
        Rc::new(VectorSource {
            svg: format!("<svg id='{tag}'/>").into_bytes(),
            rasterize_width: None,
            rasterize_height: None,
        })
    }

    #[test]
    fn recognizes_base64_and_percent_encoded_forms() {
        let plain = match_svg_data_url("data:image/svg+xml,%3Csvg%2F%3E").unwrap();
        assert!(!plain.base64);
        assert_eq!(plain.payload, "%3Csvg%2F%3E");

        let base64 = match_svg_data_url("data:image/svg+xml;base64,PHN2Zy8+").unwrap();
        assert!(base64.base64);
        assert_eq!(base64.payload, "PHN2Zy8+");

        let with_params =
            match_svg_data_url("data:image/svg+xml;charset=utf-8;base64,PHN2Zy8+").unwrap();
        assert!(with_params.base64);

        assert!(match_svg_data_url("data:image/png;base64,AAAA").is_none());
        assert!(match_svg_data_url("https://example.test/icon.svg").is_none());
    }

    #[test]
    fn decodes_both_encodings_to_the_same_document() {
        let percent = match_svg_data_url("data:image/svg+xml,%3Csvg%2F%3E").unwrap();
        assert_eq!(decode_svg_payload(&percent).unwrap(), b"<svg/>");

        let base64 = match_svg_data_url("data:image/svg+xml;base64,PHN2Zy8+").unwrap();
        assert_eq!(decode_svg_payload(&base64).unwrap(), b"<svg/>");
    }

    #[test]
    fn rejects_payloads_that_do_not_decode_to_svg() {
        let bad_base64 = match_svg_data_url("data:image/svg+xml;base64,!!!").unwrap();
        assert!(decode_svg_payload(&bad_base64).is_err());

        let not_svg = match_svg_data_url("data:image/svg+xml,hello%20world").unwrap();
        assert!(decode_svg_payload(&not_svg).is_err());
    }

    #[test]
    fn raster_box_is_twice_the_effective_size() {
        let config = HostConfig::default();
        let mut image = Image {
            url: "data:image/svg+xml,%3Csvg%2F%3E".into(),
            ..Image::default()
        };

        image.pixel_width = Some(100);
        let (width, height) = rasterize_dims(&image, &config);
        assert_eq!(width, Some(200));
        assert_eq!(height, None, "Auto size class maps to no box");

        image.size = ImageSize::Small;
        let (width, height) = rasterize_dims(&image, &config);
        assert_eq!(width, Some(200), "explicit pixel width beats the class");
        assert_eq!(height, Some(80));

        image.pixel_width = Some(0);
        let (width, _) = rasterize_dims(&image, &config);
        assert_eq!(width, None, "zero stays unset instead of falling back");
    }

    #[test]
    fn seventeenth_source_evicts_the_least_recently_used() {
        let mut cache = SvgSourceCache::new();
        let mut sources = Vec::new();
        for index in 0..SVG_CACHE_CAPACITY {
            let source = vector(&index.to_string());
            cache.insert(&format!("data:image/svg+xml,{index}"), &source);
            sources.push(source);
        }
        assert_eq!(cache.len(), SVG_CACHE_CAPACITY);

        let extra = vector("extra");
        cache.insert("data:image/svg+xml,extra", &extra);
        sources.push(extra);

        assert_eq!(cache.len(), SVG_CACHE_CAPACITY);
        assert!(!cache.contains("data:image/svg+xml,0"));
        assert!(cache.contains("data:image/svg+xml,1"));
        assert!(cache.contains("data:image/svg+xml,extra"));
    }

    #[test]
    fn lookups_refresh_recency() {
        let mut cache = SvgSourceCache::with_capacity(2);
        let first = vector("first");
        let second = vector("second");
        cache.insert("data:image/svg+xml,first", &first);
        cache.insert("data:image/svg+xml,second", &second);

        assert!(cache.get("data:image/svg+xml,first").is_some());

        let third = vector("third");
        cache.insert("data:image/svg+xml,third", &third);
        assert!(cache.contains("data:image/svg+xml,first"));
        assert!(!cache.contains("data:image/svg+xml,second"));
    }

    #[test]
    fn dropped_sources_are_pruned_on_lookup() {
        let mut cache = SvgSourceCache::new();
        let source = vector("x");
        cache.insert("data:image/svg+xml,x", &source);
        assert!(cache.get("data:image/svg+xml,x").is_some());

        drop(source);
        assert!(cache.get("data:image/svg+xml,x").is_none());
        assert!(cache.is_empty());
    }
}
