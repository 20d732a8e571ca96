//! Mapping widget capability
//!
//! Tile rendering, pan/zoom gestures and marker visuals belong to an external
//! mapping library. Components drive it through this trait and own the opaque
//! handles they create; adapters translate calls onto the real widget and
//! deliver drag-end events back through `MapField::handle_event`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::geo::{LatLng, LatLngBounds};
use crate::page::ElementId;

/// Opaque handle to a widget map instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId(pub u64);

/// Opaque handle to a widget marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

/// Failure reported by a widget adapter; the message is adapter-defined.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct WidgetError(pub String);

/// Interaction switches passed when creating a widget map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetMapOptions {
    pub dragging: bool,
    pub scroll_wheel_zoom: bool,
    pub zoom_control: bool,
}

/// Base tile layer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerSpec {
    pub url: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub attribution: String,
}

/// Marker icon descriptor. Opaque to this crate; the adapter decides how each
/// form maps onto the widget's icon machinery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconSpec {
    #[default]
    Default,
    Image {
        url: String,
    },
}

/// Popup body captured from a marker's source element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupContent(pub String);

/// Everything the widget needs to materialize a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub position: LatLng,
    pub icon: IconSpec,
    pub draggable: bool,
    pub keyboard: bool,
}

impl MarkerSpec {
    /// A static marker: not draggable, reachable by keyboard.
    pub fn new(position: LatLng, icon: IconSpec) -> Self {
        Self {
            position,
            icon,
            draggable: false,
            keyboard: true,
        }
    }
}

pub trait MapWidget: Send + Sync {
    /// Creates a map bound to the container element.
    fn create_map(
        &self,
        container: ElementId,
        options: &WidgetMapOptions,
    ) -> Result<MapId, WidgetError>;

    /// Releases a map together with its markers and controls.
    fn remove_map(&self, map: MapId);

    /// Adds a base tile layer to the map.
    fn add_tile_layer(&self, map: MapId, spec: &TileLayerSpec) -> Result<(), WidgetError>;

    fn center(&self, map: MapId) -> LatLng;

    fn zoom(&self, map: MapId) -> f64;

    /// Moves the viewport to `center` at `zoom`.
    fn set_view(&self, map: MapId, center: LatLng, zoom: f64);

    /// Fits the viewport around `bounds`, keeping `padding` pixels of margin.
    fn fit_bounds(&self, map: MapId, bounds: &LatLngBounds, padding: (f64, f64));

    fn create_marker(&self, map: MapId, spec: &MarkerSpec) -> Result<MarkerId, WidgetError>;

    fn remove_marker(&self, marker: MarkerId);

    fn marker_position(&self, marker: MarkerId) -> LatLng;

    fn set_marker_position(&self, marker: MarkerId, position: LatLng);

    /// Binds popup content opened when the marker is activated.
    fn bind_popup(&self, marker: MarkerId, content: &PopupContent);

    /// Places an element into the map's control area.
    fn add_control(&self, map: MapId, control: ElementId);

    fn remove_control(&self, map: MapId, control: ElementId);

    /// Registers interest in drag-end events for a draggable marker.
    fn on_marker_drag_end(&self, marker: MarkerId);

    fn off_marker_drag_end(&self, marker: MarkerId);
}
