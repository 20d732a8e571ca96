//! Standard MapView strategies and their dispatch tables.

use serde::{Deserialize, Serialize};

use super::{FetchMarkersBehaviour, HomeBehaviour, IconBehaviour, MarkerBehaviour, PopupBehaviour};
use crate::core::constants;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::core::options::MapOptions;
use crate::page::{ElementId, PageAccess};
use crate::widget::{IconSpec, MapId, MapWidget, MarkerId, MarkerSpec, PopupContent};

/// A coordinate paired with the page element it was scanned from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerDescriptor {
    pub coords: LatLng,
    pub payload: ElementId,
}

pub type FetchMarkersFn = fn(&dyn PageAccess, &MapOptions) -> Vec<MarkerDescriptor>;
pub type IconFn = fn(&dyn PageAccess, Option<ElementId>) -> IconSpec;
pub type MarkerFn = fn(LatLng, IconSpec) -> MarkerSpec;
pub type PopupFn = fn(&dyn PageAccess, ElementId) -> Option<PopupContent>;
pub type HomeFn = fn(&HomeContext<'_>);

/// Everything a home strategy may need to place the initial viewport.
pub struct HomeContext<'a> {
    pub widget: &'a dyn MapWidget,
    pub map: MapId,
    /// Marker handles in fetch order.
    pub markers: &'a [MarkerId],
    pub options: &'a MapOptions,
    /// The active home table, so strategies can fall back through it.
    pub table: &'a HomeTable,
}

/// `selector`: scan the page for marker elements and their coordinate attributes.
/// Elements whose coordinate attribute is missing or invalid yield no
/// descriptor; the order of the rest follows document order.
pub fn fetch_markers_selector(page: &dyn PageAccess, options: &MapOptions) -> Vec<MarkerDescriptor> {
    page.query_many(&options.marker_selector, None)
        .into_iter()
        .filter_map(|element| {
            let raw = page.attribute(element, constants::MARKER_COORDS_ATTR)?;
            let coords = LatLng::parse_pair(&raw)?;
            Some(MarkerDescriptor {
                coords,
                payload: element,
            })
        })
        .collect()
}

/// `coords`: center on the configured coordinates at the configured zoom.
pub fn home_coords(ctx: &HomeContext<'_>) {
    ctx.widget.set_view(ctx.map, ctx.options.coords, ctx.options.zoom);
}

/// `first-marker`: center on the first marker; falls back through the table's
/// `coords` entry when there are no markers.
pub fn home_first_marker(ctx: &HomeContext<'_>) {
    match ctx.markers.first() {
        Some(&marker) => {
            let position = ctx.widget.marker_position(marker);
            ctx.widget.set_view(ctx.map, position, ctx.options.zoom);
        }
        None => (ctx.table.coords)(ctx),
    }
}

/// `fit-markers`: fit the viewport around every marker with the configured
/// padding; falls back through the table's `coords` entry when there are none.
pub fn home_fit_markers(ctx: &HomeContext<'_>) {
    let mut positions = ctx.markers.iter().map(|&marker| ctx.widget.marker_position(marker));
    match positions.next() {
        Some(first) => {
            let mut bounds = LatLngBounds::from_point(first);
            for position in positions {
                bounds.extend(&position);
            }
            ctx.widget.fit_bounds(ctx.map, &bounds, ctx.options.group_padding);
        }
        None => (ctx.table.coords)(ctx),
    }
}

/// `default`: the widget's stock icon.
pub fn icon_default(_page: &dyn PageAccess, _payload: Option<ElementId>) -> IconSpec {
    IconSpec::Default
}

/// `default`: a plain static marker.
pub fn marker_default(position: LatLng, icon: IconSpec) -> MarkerSpec {
    MarkerSpec::new(position, icon)
}

/// `none`: markers get no popup.
pub fn popup_none(_page: &dyn PageAccess, _payload: ElementId) -> Option<PopupContent> {
    None
}

/// `content`: copy the payload element's inner content into the popup.
pub fn popup_content(page: &dyn PageAccess, payload: ElementId) -> Option<PopupContent> {
    Some(PopupContent(page.inner_content(payload)))
}

/// fetchMarkers strategies, one entry per key.
#[derive(Clone, Copy)]
pub struct FetchMarkersTable {
    pub selector: FetchMarkersFn,
}

impl Default for FetchMarkersTable {
    fn default() -> Self {
        Self {
            selector: fetch_markers_selector,
        }
    }
}

impl FetchMarkersTable {
    pub fn lookup(&self, key: FetchMarkersBehaviour) -> FetchMarkersFn {
        match key {
            FetchMarkersBehaviour::Selector => self.selector,
        }
    }
}

/// home strategies, one entry per key.
#[derive(Clone, Copy)]
pub struct HomeTable {
    pub coords: HomeFn,
    pub first_marker: HomeFn,
    pub fit_markers: HomeFn,
}

impl Default for HomeTable {
    fn default() -> Self {
        Self {
            coords: home_coords,
            first_marker: home_first_marker,
            fit_markers: home_fit_markers,
        }
    }
}

impl HomeTable {
    pub fn lookup(&self, key: HomeBehaviour) -> HomeFn {
        match key {
            HomeBehaviour::Coords => self.coords,
            HomeBehaviour::FirstMarker => self.first_marker,
            HomeBehaviour::FitMarkers => self.fit_markers,
        }
    }
}

/// icon strategies, one entry per key.
#[derive(Clone, Copy)]
pub struct IconTable {
    pub default: IconFn,
}

impl Default for IconTable {
    fn default() -> Self {
        Self {
            default: icon_default,
        }
    }
}

impl IconTable {
    pub fn lookup(&self, key: IconBehaviour) -> IconFn {
        match key {
            IconBehaviour::Default => self.default,
        }
    }
}

/// marker strategies, one entry per key.
#[derive(Clone, Copy)]
pub struct MarkerTable {
    pub default: MarkerFn,
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self {
            default: marker_default,
        }
    }
}

impl MarkerTable {
    pub fn lookup(&self, key: MarkerBehaviour) -> MarkerFn {
        match key {
            MarkerBehaviour::Default => self.default,
        }
    }
}

/// popup strategies, one entry per key.
#[derive(Clone, Copy)]
pub struct PopupTable {
    pub none: PopupFn,
    pub content: PopupFn,
}

impl Default for PopupTable {
    fn default() -> Self {
        Self {
            none: popup_none,
            content: popup_content,
        }
    }
}

impl PopupTable {
    pub fn lookup(&self, key: PopupBehaviour) -> PopupFn {
        match key {
            PopupBehaviour::None => self.none,
            PopupBehaviour::Content => self.content,
        }
    }
}

/// Strategy implementations available to a MapView, injectable per instance.
#[derive(Clone, Copy, Default)]
pub struct ViewRegistry {
    pub fetch_markers: FetchMarkersTable,
    pub home: HomeTable,
    pub icon: IconTable,
    pub marker: MarkerTable,
    pub popup: PopupTable,
}
