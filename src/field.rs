//! Form-bound map field component
//!
//! A MapField puts a single draggable marker on a map and keeps it in step
//! with two form inputs. Three event flows feed it, all routed by the host
//! through `handle_event`: a watched input changes (form is authoritative,
//! unless its value is unreadable, in which case the marker heals the form); a
//! marker drag ends (marker is authoritative); the find-location control is
//! clicked (ordered geocode fallback across configured input groups).

use std::sync::Arc;

use crate::behaviours::{
    name_selector, FieldBehaviours, FieldRegistry, GeocodeBehaviour, GetFormBehaviour,
};
use crate::core::config::{AttributeSource, ConfigError};
use crate::core::constants;
use crate::core::geo::LatLng;
use crate::core::options::{FormRef, MapFieldOptions, MapFieldOverrides};
use crate::geocode::{Geocoder, NullGeocoder};
use crate::page::{ElementId, PageAccess};
use crate::widget::{MapId, MapWidget, MarkerId, TileLayerSpec, WidgetMapOptions};
use crate::{Error, Result};

/// Events the host routes into a bound MapField.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    /// A form input changed.
    InputChanged { input: ElementId },
    /// A marker finished a drag.
    MarkerDragEnd { marker: MarkerId },
    /// The find-location control was activated.
    FindLocationClick,
}

struct BoundField {
    map: MapId,
    marker: MarkerId,
    /// Inputs with an active change listener.
    watched: Vec<ElementId>,
    /// The find-location control element, when geocoding is enabled.
    find_location: Option<ElementId>,
    geocoder: Arc<dyn Geocoder>,
}

enum Binding {
    Unbound,
    Bound(BoundField),
}

pub struct MapField {
    page: Arc<dyn PageAccess>,
    widget: Arc<dyn MapWidget>,
    container: ElementId,
    options: MapFieldOptions,
    behaviours: FieldBehaviours,
    registry: FieldRegistry,
    binding: Binding,
}

impl MapField {
    /// Creates an unbound field with the default strategy registry.
    pub fn new(
        page: Arc<dyn PageAccess>,
        widget: Arc<dyn MapWidget>,
        container: ElementId,
        overrides: MapFieldOverrides,
    ) -> Result<Self> {
        Self::with_registry(page, widget, container, overrides, FieldRegistry::default())
    }

    /// Creates an unbound field dispatching through the given registry.
    pub fn with_registry(
        page: Arc<dyn PageAccess>,
        widget: Arc<dyn MapWidget>,
        container: ElementId,
        overrides: MapFieldOverrides,
        registry: FieldRegistry,
    ) -> Result<Self> {
        let prefix = overrides
            .attr_prefix
            .clone()
            .unwrap_or_else(|| constants::ATTR_PREFIX.to_string());
        let attrs = AttributeSource::new(page.as_ref(), container, &prefix);

        let mut options = MapFieldOptions::default();
        options.resolve(&overrides, &attrs)?;
        let mut behaviours = FieldBehaviours::default();
        behaviours.resolve(&overrides.behaviours, &attrs)?;
        validate_form_config(behaviours.get_form, &options.form)?;

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

    /// Binds the field: map, tile layer, marker at the form's position (or
    /// (0, 0) when the form holds nothing readable), listeners, and the
    /// find-location control when geocoding is configured.
    pub fn init(&mut self) -> Result<()> {
        if self.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }

        // Fail on config problems before any widget or page side effect
        let form = self.resolve_form()?;
        let geocoder = self.resolve_geocoder()?;

        let map = self.widget.create_map(
            self.container,
            &WidgetMapOptions {
                dragging: self.options.map.dragging,
                scroll_wheel_zoom: self.options.map.scroll_wheel_zoom,
                zoom_control: self.options.map.zoom_control,
            },
        )?;

        match self.bind(map, form, geocoder) {
            Ok(bound) => {
                log::debug!("map field bound at {:?}", self.widget.marker_position(bound.marker));
                self.binding = Binding::Bound(bound);
                Ok(())
            }
            Err(err) => {
                self.widget.remove_map(map);
                Err(err)
            }
        }
    }

    fn bind(&self, map: MapId, form: ElementId, geocoder: Arc<dyn Geocoder>) -> Result<BoundField> {
        self.widget.add_tile_layer(
            map,
            &TileLayerSpec {
                url: self.options.map.tile_layer_url.clone(),
                min_zoom: self.options.map.min_zoom,
                max_zoom: self.options.map.max_zoom,
                attribution: self.options.map.attribution.clone(),
            },
        )?;

        // An unreadable form value deliberately falls back to (0, 0)
        let initial = self.read_value(form).unwrap_or_default();

        let icon = self.registry.icon.lookup(self.behaviours.icon);
        let build = self.registry.marker.lookup(self.behaviours.marker);
        let mut spec = build(initial, icon(self.page.as_ref(), None));
        spec.draggable = true;
        spec.keyboard = false;
        let marker = self.widget.create_marker(map, &spec)?;
        self.widget.on_marker_drag_end(marker);

        let watch = self.registry.sync.lookup(self.behaviours.sync);
        let watched = watch(self.page.as_ref(), form, &self.options);
        for &input in &watched {
            self.page.listen(input, constants::CHANGE_EVENT, false);
        }

        let find_location = match self.behaviours.geocode {
            GeocodeBehaviour::None => None,
            GeocodeBehaviour::Provider(_) => Some(self.create_find_location_control(map)),
        };

        self.widget.set_view(map, initial, self.options.map.zoom);
        Ok(BoundField {
            map,
            marker,
            watched,
            find_location,
            geocoder,
        })
    }

    fn create_find_location_control(&self, map: MapId) -> ElementId {
        let control = self.page.create_element(
            "button",
            &[
                // type=button so activating the control never submits the form
                ("type", "button"),
                ("class", constants::FIND_LOCATION_CLASS),
            ],
        );
        self.widget.add_control(map, control);
        self.page.listen(control, constants::CLICK_EVENT, true);
        control
    }

    /// Unbinds the field: detaches listeners, removes the control and releases
    /// the widget handles. Safe to call repeatedly or before `init()`.
    pub fn destroy(&mut self) {
        if let Binding::Bound(bound) = std::mem::replace(&mut self.binding, Binding::Unbound) {
            for &input in &bound.watched {
                self.page.ignore(input, constants::CHANGE_EVENT);
            }
            if let Some(control) = bound.find_location {
                self.page.ignore(control, constants::CLICK_EVENT);
                self.widget.remove_control(bound.map, control);
                self.page.remove_element(control);
            }
            self.widget.off_marker_drag_end(bound.marker);
            self.widget.remove_map(bound.map);
            log::debug!("map field destroyed");
        }
    }

    /// Routes a host-delivered event. Events for elements this field never
    /// registered are ignored.
    pub async fn handle_event(&mut self, event: FieldEvent) -> Result<()> {
        match event {
            FieldEvent::InputChanged { input } => {
                if self.bound()?.watched.contains(&input) {
                    self.sync()
                } else {
                    Ok(())
                }
            }
            FieldEvent::MarkerDragEnd { marker } => {
                if self.bound()?.marker == marker {
                    self.marker_dropped()
                } else {
                    Ok(())
                }
            }
            FieldEvent::FindLocationClick => self.find_location().await,
        }
    }

    /// Reconciles form and marker. A readable form value moves the marker and
    /// recenters the map (the form is authoritative); an unreadable one is
    /// overwritten from the marker, healing bad input with the last good
    /// position.
    pub fn sync(&mut self) -> Result<()> {
        let bound = self.bound()?;
        let (map, marker) = (bound.map, bound.marker);
        let form = self.resolve_form()?;
        match self.read_value(form) {
            Some(value) => {
                self.widget.set_marker_position(marker, value);
                self.recenter(map, value);
            }
            None => {
                let position = self.widget.marker_position(marker);
                log::debug!("form value unreadable, restoring {position:?} from marker");
                self.write_value(form, position);
            }
        }
        Ok(())
    }

    /// Tries the configured geocode input groups strictly in order, one
    /// request at a time: the first success moves the marker, writes the form
    /// and recenters the map. Groups with no usable values are skipped, and
    /// failures (no match or provider error) advance to the next group.
    /// Exhausting every group is a silent no-op.
    ///
    /// `&mut self` keeps searches serialized; a second trigger cannot
    /// interleave with one still awaiting a provider.
    pub async fn find_location(&mut self) -> Result<()> {
        let bound = self.bound()?;
        let (map, marker) = (bound.map, bound.marker);
        let geocoder = Arc::clone(&bound.geocoder);
        let form = self.resolve_form()?;

        for group in &self.options.geocode_inputs {
            let Some(query) = group_query(self.page.as_ref(), form, group) else {
                continue;
            };
            log::debug!("geocoding {query:?}");
            match geocoder.geocode(&query).await {
                Ok(Some(found)) => {
                    self.widget.set_marker_position(marker, found);
                    self.write_value(form, found);
                    self.recenter(map, found);
                    return Ok(());
                }
                Ok(None) => log::debug!("no match for {query:?}"),
                Err(err) => log::debug!("geocode attempt failed: {err}"),
            }
        }
        Ok(())
    }

    /// Resolves the bound form through the configured strategy. The form is an
    /// external reference, so it is looked up fresh on every call.
    pub fn form(&self) -> Result<ElementId> {
        self.resolve_form()
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.binding, Binding::Bound(_))
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn options(&self) -> &MapFieldOptions {
        &self.options
    }

    /// Mutable options access, only valid before `init()`.
    pub fn options_mut(&mut self) -> Result<&mut MapFieldOptions> {
        if self.is_initialized() {
            Err(Error::AlreadyInitialized)
        } else {
            Ok(&mut self.options)
        }
    }

    pub fn behaviours(&self) -> &FieldBehaviours {
        &self.behaviours
    }

    /// Handle of the bound widget map, if `init()` has run.
    pub fn map(&self) -> Option<MapId> {
        match &self.binding {
            Binding::Bound(bound) => Some(bound.map),
            Binding::Unbound => None,
        }
    }

    /// Handle of the field's marker, if `init()` has run.
    pub fn marker(&self) -> Option<MarkerId> {
        match &self.binding {
            Binding::Bound(bound) => Some(bound.marker),
            Binding::Unbound => None,
        }
    }

    /// The find-location control element, when geocoding is enabled.
    pub fn find_location_control(&self) -> Option<ElementId> {
        match &self.binding {
            Binding::Bound(bound) => bound.find_location,
            Binding::Unbound => None,
        }
    }

    pub fn marker_position(&self) -> Result<LatLng> {
        let bound = self.bound()?;
        Ok(self.widget.marker_position(bound.marker))
    }

    pub fn center(&self) -> Result<LatLng> {
        let bound = self.bound()?;
        Ok(self.widget.center(bound.map))
    }

    /// Recenters the map, keeping the current zoom.
    pub fn set_center(&mut self, center: LatLng) -> Result<()> {
        let map = self.bound()?.map;
        self.recenter(map, center);
        Ok(())
    }

    pub fn zoom(&self) -> Result<f64> {
        let bound = self.bound()?;
        Ok(self.widget.zoom(bound.map))
    }

    /// Rezooms the map, keeping the current center.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        let map = self.bound()?.map;
        let center = self.widget.center(map);
        self.widget.set_view(map, center, zoom);
        Ok(())
    }

    fn bound(&self) -> Result<&BoundField> {
        match &self.binding {
            Binding::Bound(bound) => Ok(bound),
            Binding::Unbound => Err(Error::NotInitialized),
        }
    }

    fn resolve_form(&self) -> Result<ElementId> {
        let find = self.registry.get_form.lookup(self.behaviours.get_form);
        find(self.page.as_ref(), self.container, &self.options).ok_or(Error::FormNotFound)
    }

    fn resolve_geocoder(&self) -> Result<Arc<dyn Geocoder>> {
        match &self.behaviours.geocode {
            GeocodeBehaviour::None => Ok(Arc::new(NullGeocoder)),
            GeocodeBehaviour::Provider(key) => {
                Ok(self.registry.geocoder(key, &self.options)?)
            }
        }
    }

    fn read_value(&self, form: ElementId) -> Option<LatLng> {
        let read = self.registry.get_value.lookup(self.behaviours.get_value);
        read(self.page.as_ref(), form, &self.options)
    }

    fn write_value(&self, form: ElementId, value: LatLng) {
        let write = self.registry.set_value.lookup(self.behaviours.set_value);
        write(self.page.as_ref(), form, &self.options, value);
    }

    /// Marker drag finished: the marker position is written back to the form
    /// and the map recenters on it, zoom unchanged.
    fn marker_dropped(&mut self) -> Result<()> {
        let bound = self.bound()?;
        let (map, marker) = (bound.map, bound.marker);
        let position = self.widget.marker_position(marker);
        let form = self.resolve_form()?;
        self.write_value(form, position);
        self.recenter(map, position);
        Ok(())
    }

    fn recenter(&self, map: MapId, center: LatLng) {
        let zoom = self.widget.zoom(map);
        self.widget.set_view(map, center, zoom);
    }
}

/// Joins the trimmed, non-empty values of a group's inputs with commas;
/// `None` when the group contributes nothing.
fn group_query(page: &dyn PageAccess, form: ElementId, group: &[String]) -> Option<String> {
    let mut parts = Vec::new();
    for name in group {
        if let Some(input) = page.query_one(&name_selector(name), Some(form)) {
            let value = page.value(input);
            let value = value.trim();
            if !value.is_empty() {
                parts.push(value.to_string());
            }
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(","))
    }
}

/// The strategies that consume the `form` option need the right kind of
/// reference configured up front, not a surprise at first use.
fn validate_form_config(
    behaviour: GetFormBehaviour,
    form: &Option<FormRef>,
) -> std::result::Result<(), ConfigError> {
    let satisfied = match behaviour {
        GetFormBehaviour::Parent => true,
        GetFormBehaviour::Closest | GetFormBehaviour::Selector => {
            matches!(form, Some(FormRef::Selector(_)))
        }
        GetFormBehaviour::Element => matches!(form, Some(FormRef::Element(_))),
    };
    if satisfied {
        Ok(())
    } else {
        Err(ConfigError::MissingOption { option: "form" })
    }
}
