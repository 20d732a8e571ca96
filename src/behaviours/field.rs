//! Standard MapField strategies and their dispatch tables.

use std::sync::Arc;

use super::view::{IconTable, MarkerTable};
use super::{GetFormBehaviour, GetValueBehaviour, SetValueBehaviour, SyncBehaviour};
use crate::core::config::ConfigError;
use crate::core::constants;
use crate::core::geo::LatLng;
use crate::core::options::{FormRef, MapFieldOptions};
use crate::geocode::{self, Geocoder};
use crate::page::{ElementId, PageAccess};
use crate::prelude::HashMap;

pub type GetFormFn = fn(&dyn PageAccess, ElementId, &MapFieldOptions) -> Option<ElementId>;
pub type GetValueFn = fn(&dyn PageAccess, ElementId, &MapFieldOptions) -> Option<LatLng>;
pub type SetValueFn = fn(&dyn PageAccess, ElementId, &MapFieldOptions, LatLng);
pub type SyncInputsFn = fn(&dyn PageAccess, ElementId, &MapFieldOptions) -> Vec<ElementId>;

/// Builds a geocoder from the resolved field options. Factories run at
/// `init()`, so a missing `geocode_url` or similar surfaces as a
/// configuration error before any request is made.
pub type GeocoderFactory =
    Arc<dyn Fn(&MapFieldOptions) -> Result<Arc<dyn Geocoder>, ConfigError> + Send + Sync>;

/// Attribute selector for a named form input.
pub fn name_selector(name: &str) -> String {
    format!("[name=\"{name}\"]")
}

/// `closest`: nearest ancestor of the container matching the `form` selector.
pub fn get_form_closest(
    page: &dyn PageAccess,
    container: ElementId,
    options: &MapFieldOptions,
) -> Option<ElementId> {
    match &options.form {
        Some(FormRef::Selector(selector)) => page.closest(container, selector),
        _ => None,
    }
}

/// `elm`: the literal element given in the `form` option.
pub fn get_form_element(
    _page: &dyn PageAccess,
    _container: ElementId,
    options: &MapFieldOptions,
) -> Option<ElementId> {
    match &options.form {
        Some(FormRef::Element(element)) => Some(*element),
        _ => None,
    }
}

/// `parent`: nearest ancestor `<form>` of the container.
pub fn get_form_parent(
    page: &dyn PageAccess,
    container: ElementId,
    _options: &MapFieldOptions,
) -> Option<ElementId> {
    page.closest(container, "form")
}

/// `selector`: first page-wide match for the `form` selector.
pub fn get_form_selector(
    page: &dyn PageAccess,
    _container: ElementId,
    options: &MapFieldOptions,
) -> Option<ElementId> {
    match &options.form {
        Some(FormRef::Selector(selector)) => page.query_one(selector, None),
        _ => None,
    }
}

/// `inputs`: read the coordinate from the two named inputs. Absent when either
/// input is missing, unparseable or out of range.
pub fn get_value_inputs(
    page: &dyn PageAccess,
    form: ElementId,
    options: &MapFieldOptions,
) -> Option<LatLng> {
    let lat = page.query_one(&name_selector(&options.lat_input), Some(form))?;
    let lng = page.query_one(&name_selector(&options.lng_input), Some(form))?;
    LatLng::parse_components(&page.value(lat), &page.value(lng))
}

/// `inputs`: write both components into the named inputs and dispatch a change
/// event on each, so other code watching the form sees the update.
pub fn set_value_inputs(
    page: &dyn PageAccess,
    form: ElementId,
    options: &MapFieldOptions,
    value: LatLng,
) {
    let writes = [
        (options.lat_input.as_str(), value.lat),
        (options.lng_input.as_str(), value.lng),
    ];
    for (name, component) in writes {
        if let Some(input) = page.query_one(&name_selector(name), Some(form)) {
            page.set_value(input, &component.to_string());
            page.dispatch(input, constants::CHANGE_EVENT);
        }
    }
}

/// `inputs`: the lat/lng inputs are the ones to watch for edits.
pub fn sync_inputs(
    page: &dyn PageAccess,
    form: ElementId,
    options: &MapFieldOptions,
) -> Vec<ElementId> {
    [options.lat_input.as_str(), options.lng_input.as_str()]
        .into_iter()
        .filter_map(|name| page.query_one(&name_selector(name), Some(form)))
        .collect()
}

/// getForm strategies, one entry per key.
#[derive(Clone, Copy)]
pub struct GetFormTable {
    pub closest: GetFormFn,
    pub element: GetFormFn,
    pub parent: GetFormFn,
    pub selector: GetFormFn,
}

impl Default for GetFormTable {
    fn default() -> Self {
        Self {
            closest: get_form_closest,
            element: get_form_element,
            parent: get_form_parent,
            selector: get_form_selector,
        }
    }
}

impl GetFormTable {
    pub fn lookup(&self, key: GetFormBehaviour) -> GetFormFn {
        match key {
            GetFormBehaviour::Closest => self.closest,
            GetFormBehaviour::Element => self.element,
            GetFormBehaviour::Parent => self.parent,
            GetFormBehaviour::Selector => self.selector,
        }
    }
}

/// getValue strategies, one entry per key.
#[derive(Clone, Copy)]
pub struct GetValueTable {
    pub inputs: GetValueFn,
}

impl Default for GetValueTable {
    fn default() -> Self {
        Self {
            inputs: get_value_inputs,
        }
    }
}

impl GetValueTable {
    pub fn lookup(&self, key: GetValueBehaviour) -> GetValueFn {
        match key {
            GetValueBehaviour::Inputs => self.inputs,
        }
    }
}

/// setValue strategies, one entry per key.
#[derive(Clone, Copy)]
pub struct SetValueTable {
    pub inputs: SetValueFn,
}

impl Default for SetValueTable {
    fn default() -> Self {
        Self {
            inputs: set_value_inputs,
        }
    }
}

impl SetValueTable {
    pub fn lookup(&self, key: SetValueBehaviour) -> SetValueFn {
        match key {
            SetValueBehaviour::Inputs => self.inputs,
        }
    }
}

/// sync strategies, one entry per key.
#[derive(Clone, Copy)]
pub struct SyncTable {
    pub inputs: SyncInputsFn,
}

impl Default for SyncTable {
    fn default() -> Self {
        Self {
            inputs: sync_inputs,
        }
    }
}

impl SyncTable {
    pub fn lookup(&self, key: SyncBehaviour) -> SyncInputsFn {
        match key {
            SyncBehaviour::Inputs => self.inputs,
        }
    }
}

/// Strategy implementations available to a MapField, injectable per instance.
#[derive(Clone)]
pub struct FieldRegistry {
    pub get_form: GetFormTable,
    pub get_value: GetValueTable,
    pub set_value: SetValueTable,
    pub sync: SyncTable,
    pub icon: IconTable,
    pub marker: MarkerTable,
    geocoders: HashMap<String, GeocoderFactory>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        let mut geocoders: HashMap<String, GeocoderFactory> = HashMap::default();
        geocoders.insert(
            geocode::HTTP_PROVIDER.to_string(),
            Arc::new(geocode::http_geocoder),
        );
        Self {
            get_form: GetFormTable::default(),
            get_value: GetValueTable::default(),
            set_value: SetValueTable::default(),
            sync: SyncTable::default(),
            icon: IconTable::default(),
            marker: MarkerTable::default(),
            geocoders,
        }
    }
}

impl FieldRegistry {
    /// Registers (or replaces) a geocoder factory under a provider key.
    pub fn register_geocoder(&mut self, key: impl Into<String>, factory: GeocoderFactory) {
        self.geocoders.insert(key.into(), factory);
    }

    /// Builds the geocoder registered under `key`.
    pub fn geocoder(
        &self,
        key: &str,
        options: &MapFieldOptions,
    ) -> Result<Arc<dyn Geocoder>, ConfigError> {
        match self.geocoders.get(key) {
            Some(factory) => factory(options),
            None => Err(ConfigError::UnknownBehaviour {
                concern: "geocode",
                key: key.to_string(),
            }),
        }
    }
}
