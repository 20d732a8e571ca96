//! Behaviour strategies for map components
//!
//! Every customization point (a "concern") has a closed set of strategy keys:
//! an enum parsed from configuration, where an unknown key is a configuration
//! error at construction rather than a dispatch failure later. Each concern
//! also has a table mapping every key to a function; `ViewRegistry` and
//! `FieldRegistry` bundle the tables and are passed to components at
//! construction, so swapping a strategy is a per-instance edit with no shared
//! global state.

mod field;
mod view;

pub use field::{
    get_form_closest, get_form_element, get_form_parent, get_form_selector, get_value_inputs,
    name_selector, set_value_inputs, sync_inputs, FieldRegistry, GeocoderFactory, GetFormFn,
    GetFormTable, GetValueFn, GetValueTable, SetValueFn, SetValueTable, SyncInputsFn, SyncTable,
};
pub use view::{
    fetch_markers_selector, home_coords, home_first_marker, home_fit_markers, icon_default,
    marker_default, popup_content, popup_none, FetchMarkersFn, FetchMarkersTable, HomeContext,
    HomeFn, HomeTable, IconFn, IconTable, MarkerDescriptor, MarkerFn, MarkerTable, PopupFn,
    PopupTable, ViewRegistry,
};

use std::str::FromStr;

use crate::core::config::{AttributeSource, ConfigError};

/// How MapView discovers its marker descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FetchMarkersBehaviour {
    /// Scan the page with the configured `marker_selector`.
    #[default]
    Selector,
}

impl FetchMarkersBehaviour {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Selector => "selector",
        }
    }
}

impl FromStr for FetchMarkersBehaviour {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "selector" => Ok(Self::Selector),
            other => Err(unknown("fetch-markers", other)),
        }
    }
}

/// How the initial viewport is positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HomeBehaviour {
    /// Center on the configured coordinates at the configured zoom.
    #[default]
    Coords,
    /// Center on the first marker; `coords` when there are none.
    FirstMarker,
    /// Fit the viewport around every marker; `coords` when there are none.
    FitMarkers,
}

impl HomeBehaviour {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Coords => "coords",
            Self::FirstMarker => "first-marker",
            Self::FitMarkers => "fit-markers",
        }
    }
}

impl FromStr for HomeBehaviour {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "coords" => Ok(Self::Coords),
            "first-marker" => Ok(Self::FirstMarker),
            "fit-markers" => Ok(Self::FitMarkers),
            other => Err(unknown("home", other)),
        }
    }
}

/// How marker icons are described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IconBehaviour {
    /// The widget's stock icon.
    #[default]
    Default,
}

impl IconBehaviour {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Default => "default",
        }
    }
}

impl FromStr for IconBehaviour {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "default" => Ok(Self::Default),
            other => Err(unknown("icon", other)),
        }
    }
}

/// How marker specs are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarkerBehaviour {
    #[default]
    Default,
}

impl MarkerBehaviour {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Default => "default",
        }
    }
}

impl FromStr for MarkerBehaviour {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "default" => Ok(Self::Default),
            other => Err(unknown("marker", other)),
        }
    }
}

/// Whether and how markers get popups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PopupBehaviour {
    /// No popups.
    #[default]
    None,
    /// Copy the marker's source element content into a popup.
    Content,
}

impl PopupBehaviour {
    pub fn key(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Content => "content",
        }
    }
}

impl FromStr for PopupBehaviour {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "none" => Ok(Self::None),
            "content" => Ok(Self::Content),
            other => Err(unknown("popup", other)),
        }
    }
}

/// How the bound form is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GetFormBehaviour {
    /// Nearest ancestor matching the `form` selector option.
    Closest,
    /// The literal element in the `form` option.
    Element,
    /// Nearest ancestor `<form>`.
    #[default]
    Parent,
    /// First page-wide match for the `form` selector option.
    Selector,
}

impl GetFormBehaviour {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Closest => "closest",
            Self::Element => "elm",
            Self::Parent => "parent",
            Self::Selector => "selector",
        }
    }
}

impl FromStr for GetFormBehaviour {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "closest" => Ok(Self::Closest),
            "elm" => Ok(Self::Element),
            "parent" => Ok(Self::Parent),
            "selector" => Ok(Self::Selector),
            other => Err(unknown("get-form", other)),
        }
    }
}

/// How the coordinate is read from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GetValueBehaviour {
    /// Parse the two named lat/lng inputs.
    #[default]
    Inputs,
}

impl GetValueBehaviour {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Inputs => "inputs",
        }
    }
}

impl FromStr for GetValueBehaviour {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "inputs" => Ok(Self::Inputs),
            other => Err(unknown("get-value", other)),
        }
    }
}

/// How the coordinate is written to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SetValueBehaviour {
    #[default]
    Inputs,
}

impl SetValueBehaviour {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Inputs => "inputs",
        }
    }
}

impl FromStr for SetValueBehaviour {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "inputs" => Ok(Self::Inputs),
            other => Err(unknown("set-value", other)),
        }
    }
}

/// Which inputs trigger a `sync()` when they change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncBehaviour {
    #[default]
    Inputs,
}

impl SyncBehaviour {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Inputs => "inputs",
        }
    }
}

impl FromStr for SyncBehaviour {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "inputs" => Ok(Self::Inputs),
            other => Err(unknown("sync", other)),
        }
    }
}

/// Whether geocoding is enabled, and through which provider.
///
/// Provider keys are the one open key space: they index the registry's
/// geocoder table, so an unrecognized key still fails fast, just at `init()`
/// when the table is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GeocodeBehaviour {
    /// No geocoding; the find-location control is never created.
    #[default]
    None,
    /// Geocode through the registry entry with this key.
    Provider(String),
}

impl GeocodeBehaviour {
    pub fn key(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Provider(key) => key,
        }
    }
}

impl FromStr for GeocodeBehaviour {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "none" => Ok(Self::None),
            provider => Ok(Self::Provider(provider.to_string())),
        }
    }
}

fn unknown(concern: &'static str, key: &str) -> ConfigError {
    ConfigError::UnknownBehaviour {
        concern,
        key: key.to_string(),
    }
}

/// Strategy keys selected for a MapView, one per concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewBehaviours {
    pub fetch_markers: FetchMarkersBehaviour,
    pub home: HomeBehaviour,
    pub icon: IconBehaviour,
    pub marker: MarkerBehaviour,
    pub popup: PopupBehaviour,
}

impl ViewBehaviours {
    /// Applies caller overrides, then container attributes, on top of `self`.
    pub fn resolve(
        &mut self,
        overrides: &ViewBehaviourOverrides,
        attrs: &AttributeSource<'_>,
    ) -> Result<(), ConfigError> {
        apply(&mut self.fetch_markers, &overrides.fetch_markers);
        apply(&mut self.home, &overrides.home);
        apply(&mut self.icon, &overrides.icon);
        apply(&mut self.marker, &overrides.marker);
        apply(&mut self.popup, &overrides.popup);

        attrs.strategy("fetch_markers", &mut self.fetch_markers)?;
        attrs.strategy("home", &mut self.home)?;
        attrs.strategy("icon", &mut self.icon)?;
        attrs.strategy("marker", &mut self.marker)?;
        attrs.strategy("popup", &mut self.popup)?;
        Ok(())
    }
}

/// Caller overrides for MapView strategy keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewBehaviourOverrides {
    pub fetch_markers: Option<FetchMarkersBehaviour>,
    pub home: Option<HomeBehaviour>,
    pub icon: Option<IconBehaviour>,
    pub marker: Option<MarkerBehaviour>,
    pub popup: Option<PopupBehaviour>,
}

/// Strategy keys selected for a MapField, one per concern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldBehaviours {
    pub get_form: GetFormBehaviour,
    pub get_value: GetValueBehaviour,
    pub set_value: SetValueBehaviour,
    pub sync: SyncBehaviour,
    pub icon: IconBehaviour,
    pub marker: MarkerBehaviour,
    pub geocode: GeocodeBehaviour,
}

impl FieldBehaviours {
    /// Applies caller overrides, then container attributes, on top of `self`.
    pub fn resolve(
        &mut self,
        overrides: &FieldBehaviourOverrides,
        attrs: &AttributeSource<'_>,
    ) -> Result<(), ConfigError> {
        apply(&mut self.get_form, &overrides.get_form);
        apply(&mut self.get_value, &overrides.get_value);
        apply(&mut self.set_value, &overrides.set_value);
        apply(&mut self.sync, &overrides.sync);
        apply(&mut self.icon, &overrides.icon);
        apply(&mut self.marker, &overrides.marker);
        if let Some(geocode) = &overrides.geocode {
            self.geocode = geocode.clone();
        }

        attrs.strategy("get_form", &mut self.get_form)?;
        attrs.strategy("get_value", &mut self.get_value)?;
        attrs.strategy("set_value", &mut self.set_value)?;
        attrs.strategy("sync", &mut self.sync)?;
        attrs.strategy("icon", &mut self.icon)?;
        attrs.strategy("marker", &mut self.marker)?;
        attrs.strategy("geocode", &mut self.geocode)?;
        Ok(())
    }
}

/// Caller overrides for MapField strategy keys.
#[derive(Debug, Clone, Default)]
pub struct FieldBehaviourOverrides {
    pub get_form: Option<GetFormBehaviour>,
    pub get_value: Option<GetValueBehaviour>,
    pub set_value: Option<SetValueBehaviour>,
    pub sync: Option<SyncBehaviour>,
    pub icon: Option<IconBehaviour>,
    pub marker: Option<MarkerBehaviour>,
    pub geocode: Option<GeocodeBehaviour>,
}

fn apply<T: Copy>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = *value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_parse() {
        assert_eq!("fit-markers".parse(), Ok(HomeBehaviour::FitMarkers));
        assert_eq!("elm".parse(), Ok(GetFormBehaviour::Element));
        assert_eq!("content".parse(), Ok(PopupBehaviour::Content));
        assert_eq!("none".parse(), Ok(GeocodeBehaviour::None));
        assert_eq!(
            "http".parse(),
            Ok(GeocodeBehaviour::Provider("http".to_string()))
        );
    }

    #[test]
    fn test_unknown_keys_fail_fast() {
        let err = "spiral".parse::<HomeBehaviour>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownBehaviour {
                concern: "home",
                key: "spiral".to_string(),
            }
        );
        assert!("nearest".parse::<GetFormBehaviour>().is_err());
        assert!("markdown".parse::<PopupBehaviour>().is_err());
    }

    #[test]
    fn test_default_selections() {
        let view = ViewBehaviours::default();
        assert_eq!(view.home, HomeBehaviour::Coords);
        assert_eq!(view.popup, PopupBehaviour::None);

        let field = FieldBehaviours::default();
        assert_eq!(field.get_form, GetFormBehaviour::Parent);
        assert_eq!(field.geocode, GeocodeBehaviour::None);
    }

    #[test]
    fn test_keys_round_trip() {
        for behaviour in [
            HomeBehaviour::Coords,
            HomeBehaviour::FirstMarker,
            HomeBehaviour::FitMarkers,
        ] {
            assert_eq!(behaviour.key().parse(), Ok(behaviour));
        }
    }
}
