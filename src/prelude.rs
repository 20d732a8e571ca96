//! Prelude module for common geoform types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use geoform::prelude::*;`

pub use crate::core::{
    config::{AttributeSource, ConfigError},
    geo::{LatLng, LatLngBounds},
    options::{
        FormRef, MapFieldOptions, MapFieldOverrides, MapOptions, MapOverrides, MapViewOverrides,
    },
};

pub use crate::behaviours::{
    FetchMarkersBehaviour, FieldBehaviourOverrides, FieldBehaviours, FieldRegistry,
    GeocodeBehaviour, GeocoderFactory, GetFormBehaviour, GetValueBehaviour, HomeBehaviour,
    IconBehaviour, MarkerBehaviour, MarkerDescriptor, PopupBehaviour, SetValueBehaviour,
    SyncBehaviour, ViewBehaviourOverrides, ViewBehaviours, ViewRegistry,
};

pub use crate::view::MapView;

pub use crate::field::{FieldEvent, MapField};

pub use crate::geocode::{GeocodeError, Geocoder, HttpGeocoder, NullGeocoder};

pub use crate::instances::Instances;

pub use crate::page::{ElementId, PageAccess};

pub use crate::widget::{
    IconSpec, MapId, MapWidget, MarkerId, MarkerSpec, PopupContent, TileLayerSpec, WidgetError,
    WidgetMapOptions,
};

pub use crate::{Error, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
