//! HTML document discovery and loading.
//!
//! `discover_surfaces` plays the part of `document.getElementsByClassName`:
//! it returns every element carrying the maze class, in document order, with
//! the attributes and bounding box the renderer needs.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

use crate::rendering::raster::Raster;
use crate::surface::{Bounds, MazeElement};
use crate::{Error, Result};

/// HTML canvas size when neither CSS nor attributes give one.
pub const DEFAULT_CANVAS_WIDTH: f64 = 300.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 150.0;

/// Settings for fetching documents over HTTP.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// User agent string to send with requests
    pub user_agent: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("mazecanvas/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 30000,
        }
    }
}

/// Collect the elements of `html` that carry `class_name`.
///
/// Elements keep their `id` as key; elements without one (or with an id
/// already taken) are keyed `<class>-<index>`, with a `-<n>` suffix added
/// while that key is taken too. Keys are unique within the result.
pub fn discover_surfaces(html: &str, class_name: &str) -> Result<Vec<MazeElement<Raster>>> {
    if class_name.is_empty() || class_name.chars().any(char::is_whitespace) {
        return Err(Error::ConfigError(format!("invalid maze class name {:?}", class_name)));
    }
    let selector_text = format!(".{}", class_name);
    let selector = Selector::parse(&selector_text)
        .map_err(|e| Error::ConfigError(format!("invalid maze class name {:?}: {:?}", class_name, e)))?;

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut surfaces = Vec::new();

    for (index, el) in document.select(&selector).enumerate() {
        let key = match el.value().id() {
            Some(id) if seen.insert(id.to_string()) => id.to_string(),
            _ => unique_key(&mut seen, format!("{}-{}", class_name, index)),
        };
        let mut surface = MazeElement::new(key.as_str(), el.value().name(), resolve_bounds(&el));
        for (name, value) in el.value().attrs() {
            surface.set_attribute(name, value);
        }
        surfaces.push(surface);
    }

    log::debug!("found {} maze element(s)", surfaces.len());
    Ok(surfaces)
}

/// `base`, or `base-2`, `base-3`, ... when `base` is taken. Records the result.
fn unique_key(seen: &mut HashSet<String>, base: String) -> String {
    let mut key = base.clone();
    let mut n = 2;
    while !seen.insert(key.clone()) {
        key = format!("{}-{}", base, n);
        n += 1;
    }
    key
}

/// Bounding box of an element: inline CSS size, then the `width`/`height`
/// attributes, then the canvas default.
fn resolve_bounds(el: &ElementRef) -> Bounds {
    let (style_w, style_h) = el
        .value()
        .attr("style")
        .map(parse_style_size)
        .unwrap_or_default();
    let attr = |name: &str| el.value().attr(name).and_then(parse_length);

    Bounds::new(
        style_w.or_else(|| attr("width")).unwrap_or(DEFAULT_CANVAS_WIDTH),
        style_h.or_else(|| attr("height")).unwrap_or(DEFAULT_CANVAS_HEIGHT),
    )
}

fn parse_style_size(style: &str) -> (Option<f64>, Option<f64>) {
    let mut size = (None, None);
    for decl in style.split(';') {
        let Some((prop, value)) = decl.split_once(':') else { continue };
        match prop.trim().to_ascii_lowercase().as_str() {
            "width" => size.0 = parse_length(value).or(size.0),
            "height" => size.1 = parse_length(value).or(size.1),
            _ => {}
        }
    }
    size
}

/// A non-negative length in `px` or unitless.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Read a document from a local path or, with the `fetch` feature, an
/// `http(s)` URL.
pub fn load_document(source: &str, config: &LoaderConfig) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return fetch(source, config);
    }
    std::fs::read_to_string(source).map_err(|e| Error::LoadError(format!("{}: {}", source, e)))
}

#[cfg(feature = "fetch")]
fn fetch(url: &str, config: &LoaderConfig) -> Result<String> {
    use std::time::Duration;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

    let resp = client
        .get(url)
        .send()
        .map_err(|e| Error::NetworkError(format!("Failed to fetch {}: {}", url, e)))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::LoadError(format!("{} returned HTTP {}", url, status)));
    }

    resp.text()
        .map_err(|e| Error::LoadError(format!("Failed to read response body: {}", e)))
}

#[cfg(not(feature = "fetch"))]
fn fetch(url: &str, _config: &LoaderConfig) -> Result<String> {
    Err(Error::LoadError(format!("fetching {} requires the `fetch` feature", url)))
}
