//! Read-only map view component
//!
//! A MapView embeds a widget map in a container element, plots every marker
//! descriptor the fetch strategy finds in the page and then positions the
//! initial viewport via the home strategy. Construction resolves all
//! configuration; `init()` performs the widget and page side effects, and
//! `destroy()` releases them (idempotent, callable before `init()`).

use std::fmt;
use std::sync::Arc;

use crate::behaviours::{HomeContext, ViewBehaviours, ViewRegistry};
use crate::core::config::AttributeSource;
use crate::core::constants;
use crate::core::geo::LatLng;
use crate::core::options::{MapOptions, MapViewOverrides};
use crate::page::{ElementId, PageAccess};
use crate::widget::{MapId, MapWidget, MarkerId, TileLayerSpec, WidgetMapOptions};
use crate::{Error, Result};

enum Binding {
    Unbound,
    Bound { map: MapId, markers: Vec<MarkerId> },
}

pub struct MapView {
    page: Arc<dyn PageAccess>,
    widget: Arc<dyn MapWidget>,
    container: ElementId,
    options: MapOptions,
    behaviours: ViewBehaviours,
    registry: ViewRegistry,
    binding: Binding,
}

impl fmt::Debug for MapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapView")
            .field("container", &self.container)
            .field("options", &self.options)
            .field("behaviours", &self.behaviours)
            .finish_non_exhaustive()
    }
}

impl MapView {
    /// Creates an unbound view with the default strategy registry.
    pub fn new(
        page: Arc<dyn PageAccess>,
        widget: Arc<dyn MapWidget>,
        container: ElementId,
        overrides: MapViewOverrides,
    ) -> Result<Self> {
        Self::with_registry(page, widget, container, overrides, ViewRegistry::default())
    }

    /// Creates an unbound view dispatching through the given registry.
    pub fn with_registry(
        page: Arc<dyn PageAccess>,
        widget: Arc<dyn MapWidget>,
        container: ElementId,
        overrides: MapViewOverrides,
        registry: ViewRegistry,
    ) -> Result<Self> {
        let prefix = overrides
            .attr_prefix
            .clone()
            .unwrap_or_else(|| constants::ATTR_PREFIX.to_string());
        let attrs = AttributeSource::new(page.as_ref(), container, &prefix);

        let mut options = MapOptions::default();
        options.resolve(&overrides.map, &attrs)?;
        let mut behaviours = ViewBehaviours::default();
        behaviours.resolve(&overrides.behaviours, &attrs)?;

        Ok(Self {
            page,
            widget,
            container,
            options,
            behaviours,
            registry,
            binding: Binding::Unbound,
        })
    }

    /// Builds the widget map, plots the page's markers and applies the home
    /// strategy.
    pub fn init(&mut self) -> Result<()> {
        if self.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }

        let map = self.widget.create_map(
            self.container,
            &WidgetMapOptions {
                dragging: self.options.dragging,
                scroll_wheel_zoom: self.options.scroll_wheel_zoom,
                zoom_control: self.options.zoom_control,
            },
        )?;

        match self.populate(map) {
            Ok(markers) => {
                log::debug!("map view bound with {} markers", markers.len());
                self.binding = Binding::Bound { map, markers };
                Ok(())
            }
            Err(err) => {
                self.widget.remove_map(map);
                Err(err)
            }
        }
    }

    fn populate(&self, map: MapId) -> Result<Vec<MarkerId>> {
        self.widget.add_tile_layer(
            map,
            &TileLayerSpec {
                url: self.options.tile_layer_url.clone(),
                min_zoom: self.options.min_zoom,
                max_zoom: self.options.max_zoom,
                attribution: self.options.attribution.clone(),
            },
        )?;

        let page = self.page.as_ref();
        let fetch = self.registry.fetch_markers.lookup(self.behaviours.fetch_markers);
        let icon = self.registry.icon.lookup(self.behaviours.icon);
        let build = self.registry.marker.lookup(self.behaviours.marker);
        let popup = self.registry.popup.lookup(self.behaviours.popup);

        let descriptors = fetch(page, &self.options);
        let mut markers = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let spec = build(descriptor.coords, icon(page, Some(descriptor.payload)));
            let marker = self.widget.create_marker(map, &spec)?;
            if let Some(content) = popup(page, descriptor.payload) {
                self.widget.bind_popup(marker, &content);
            }
            markers.push(marker);
        }

        let home = self.registry.home.lookup(self.behaviours.home);
        home(&HomeContext {
            widget: self.widget.as_ref(),
            map,
            markers: &markers,
            options: &self.options,
            table: &self.registry.home,
        });
        Ok(markers)
    }

    /// Releases the widget map. Safe to call repeatedly or before `init()`.
    pub fn destroy(&mut self) {
        if let Binding::Bound { map, .. } = std::mem::replace(&mut self.binding, Binding::Unbound)
        {
            self.widget.remove_map(map);
            log::debug!("map view destroyed");
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.binding, Binding::Bound { .. })
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Mutable options access, only valid before `init()`.
    pub fn options_mut(&mut self) -> Result<&mut MapOptions> {
        if self.is_initialized() {
            Err(Error::AlreadyInitialized)
        } else {
            Ok(&mut self.options)
        }
    }

    pub fn behaviours(&self) -> &ViewBehaviours {
        &self.behaviours
    }

    /// Handle of the bound widget map, if `init()` has run.
    pub fn map(&self) -> Option<MapId> {
        match &self.binding {
            Binding::Bound { map, .. } => Some(*map),
            Binding::Unbound => None,
        }
    }

    /// Marker handles in fetch order; empty when unbound.
    pub fn markers(&self) -> &[MarkerId] {
        match &self.binding {
            Binding::Bound { markers, .. } => markers,
            Binding::Unbound => &[],
        }
    }

    pub fn center(&self) -> Result<LatLng> {
        let map = self.require_bound()?;
        Ok(self.widget.center(map))
    }

    /// Recenters the map, keeping the current zoom.
    pub fn set_center(&mut self, center: LatLng) -> Result<()> {
        let map = self.require_bound()?;
        let zoom = self.widget.zoom(map);
        self.widget.set_view(map, center, zoom);
        Ok(())
    }

    pub fn zoom(&self) -> Result<f64> {
        let map = self.require_bound()?;
        Ok(self.widget.zoom(map))
    }

    /// Rezooms the map, keeping the current center.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        let map = self.require_bound()?;
        let center = self.widget.center(map);
        self.widget.set_view(map, center, zoom);
        Ok(())
    }

    fn require_bound(&self) -> Result<MapId> {
        match &self.binding {
            Binding::Bound { map, .. } => Ok(*map),
            Binding::Unbound => Err(Error::NotInitialized),
        }
    }
}
