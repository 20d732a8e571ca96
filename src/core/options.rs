//! Typed options for map components
//!
//! Options resolve exactly once, at component construction: built-in defaults,
//! then caller overrides, then attributes read from the container element (the
//! page author has the last word). After that they are fixed for the life of
//! the component, apart from edits made through `options_mut()` before `init()`.

use crate::behaviours::{FieldBehaviourOverrides, ViewBehaviourOverrides};
use crate::core::config::{AttributeSource, ConfigError};
use crate::core::constants;
use crate::core::geo::LatLng;
use crate::page::ElementId;

/// How the bound form is identified, for `getForm` strategies that need input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRef {
    /// CSS selector; used by the `closest` and `selector` strategies.
    Selector(String),
    /// Literal page element; used by the `elm` strategy.
    Element(ElementId),
}

/// Options shared by both map components.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Attribution line for the tile layer.
    pub attribution: String,
    /// Initial map center, also the `coords` home viewport.
    pub coords: LatLng,
    /// Whether the map can be dragged around.
    pub dragging: bool,
    /// Pixel padding kept around fitted marker bounds.
    pub group_padding: (f64, f64),
    /// Selector used to scan the page for marker elements.
    pub marker_selector: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub scroll_wheel_zoom: bool,
    /// Tile URL template with `{s}`/`{z}`/`{x}`/`{y}` placeholders.
    pub tile_layer_url: String,
    /// Initial zoom level.
    pub zoom: f64,
    /// Whether the widget shows its own zoom control.
    pub zoom_control: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        let (lat, lng) = constants::DEFAULT_COORDS;
        Self {
            attribution: constants::ATTRIBUTION.to_string(),
            coords: LatLng::new(lat, lng),
            dragging: false,
            group_padding: (40.0, 40.0),
            marker_selector: constants::MARKER_SELECTOR.to_string(),
            min_zoom: 8.0,
            max_zoom: 18.0,
            scroll_wheel_zoom: false,
            tile_layer_url: constants::TILE_LAYER_URL.to_string(),
            zoom: 13.0,
            zoom_control: false,
        }
    }
}

impl MapOptions {
    /// Applies caller overrides, then container attributes, on top of `self`.
    pub fn resolve(
        &mut self,
        overrides: &MapOverrides,
        attrs: &AttributeSource<'_>,
    ) -> Result<(), ConfigError> {
        apply(&mut self.attribution, &overrides.attribution);
        apply(&mut self.coords, &overrides.coords);
        apply(&mut self.dragging, &overrides.dragging);
        apply(&mut self.group_padding, &overrides.group_padding);
        apply(&mut self.marker_selector, &overrides.marker_selector);
        apply(&mut self.min_zoom, &overrides.min_zoom);
        apply(&mut self.max_zoom, &overrides.max_zoom);
        apply(&mut self.scroll_wheel_zoom, &overrides.scroll_wheel_zoom);
        apply(&mut self.tile_layer_url, &overrides.tile_layer_url);
        apply(&mut self.zoom, &overrides.zoom);
        apply(&mut self.zoom_control, &overrides.zoom_control);

        attrs.text("attribution", &mut self.attribution);
        attrs.coords("coords", &mut self.coords)?;
        attrs.flag("dragging", &mut self.dragging)?;
        attrs.padding("group_padding", &mut self.group_padding)?;
        attrs.text("marker_selector", &mut self.marker_selector);
        attrs.number("min_zoom", &mut self.min_zoom)?;
        attrs.number("max_zoom", &mut self.max_zoom)?;
        attrs.flag("scroll_wheel_zoom", &mut self.scroll_wheel_zoom)?;
        attrs.text("tile_layer_url", &mut self.tile_layer_url);
        attrs.number("zoom", &mut self.zoom)?;
        attrs.flag("zoom_control", &mut self.zoom_control)?;
        Ok(())
    }
}

/// Caller overrides for the shared map options.
#[derive(Debug, Clone, Default)]
pub struct MapOverrides {
    pub attribution: Option<String>,
    pub coords: Option<LatLng>,
    pub dragging: Option<bool>,
    pub group_padding: Option<(f64, f64)>,
    pub marker_selector: Option<String>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    pub scroll_wheel_zoom: Option<bool>,
    pub tile_layer_url: Option<String>,
    pub zoom: Option<f64>,
    pub zoom_control: Option<bool>,
}

/// Everything a caller can hand to `MapView::new`.
#[derive(Debug, Clone, Default)]
pub struct MapViewOverrides {
    /// Attribute prefix for reading container options; defaults to
    /// [`constants::ATTR_PREFIX`].
    pub attr_prefix: Option<String>,
    pub map: MapOverrides,
    pub behaviours: ViewBehaviourOverrides,
}

/// Options for a MapField: the shared map surface plus the form binding.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFieldOptions {
    pub map: MapOptions,
    /// Form reference consumed by the configured `getForm` strategy.
    pub form: Option<FormRef>,
    /// Ordered fallback groups of input names for `find_location`.
    pub geocode_inputs: Vec<Vec<String>>,
    /// Endpoint for the bundled HTTP geocoder (carries any API key).
    pub geocode_url: Option<String>,
    /// Name of the latitude input inside the bound form.
    pub lat_input: String,
    /// Name of the longitude input inside the bound form.
    pub lng_input: String,
}

impl Default for MapFieldOptions {
    fn default() -> Self {
        Self {
            map: MapOptions {
                // A field's marker is only useful on a map the user can drag
                dragging: true,
                ..MapOptions::default()
            },
            form: None,
            geocode_inputs: vec![vec!["postcode".to_string()], vec!["city".to_string()]],
            geocode_url: None,
            lat_input: "lat".to_string(),
            lng_input: "lng".to_string(),
        }
    }
}

impl MapFieldOptions {
    /// Applies caller overrides, then container attributes, on top of `self`.
    pub fn resolve(
        &mut self,
        overrides: &MapFieldOverrides,
        attrs: &AttributeSource<'_>,
    ) -> Result<(), ConfigError> {
        self.map.resolve(&overrides.map, attrs)?;

        if let Some(form) = &overrides.form {
            self.form = Some(form.clone());
        }
        if let Some(url) = &overrides.geocode_url {
            self.geocode_url = Some(url.clone());
        }
        apply(&mut self.geocode_inputs, &overrides.geocode_inputs);
        apply(&mut self.lat_input, &overrides.lat_input);
        apply(&mut self.lng_input, &overrides.lng_input);

        if let Some(selector) = attrs.raw("form") {
            self.form = Some(FormRef::Selector(selector));
        }
        attrs.groups("geocode_inputs", &mut self.geocode_inputs)?;
        attrs.optional_text("geocode_url", &mut self.geocode_url);
        attrs.text("lat_input", &mut self.lat_input);
        attrs.text("lng_input", &mut self.lng_input);
        Ok(())
    }
}

/// Everything a caller can hand to `MapField::new`.
#[derive(Debug, Clone, Default)]
pub struct MapFieldOverrides {
    /// Attribute prefix for reading container options; defaults to
    /// [`constants::ATTR_PREFIX`].
    pub attr_prefix: Option<String>,
    pub map: MapOverrides,
    pub form: Option<FormRef>,
    pub geocode_inputs: Option<Vec<Vec<String>>>,
    pub geocode_url: Option<String>,
    pub lat_input: Option<String>,
    pub lng_input: Option<String>,
    pub behaviours: FieldBehaviourOverrides,
}

fn apply<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}
