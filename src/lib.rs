//! # Geoform
//!
//! A map-widget toolkit for form-driven pages, inspired by Leaflet wrappers.
//!
//! This library provides two components over pluggable page and map-widget
//! backends: a read-only map view that collects markers from page elements,
//! and a form-bound map field that keeps a draggable marker and a pair of
//! coordinate inputs in step, with an optional geocode lookup over the form's
//! address inputs. Both components resolve their configuration from caller
//! overrides and container data attributes, and dispatch their customizable
//! steps through per-instance strategy registries.

pub mod behaviours;
pub mod core;
pub mod field;
pub mod geocode;
pub mod instances;
pub mod page;
pub mod prelude;
pub mod view;
pub mod widget;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{AttributeSource, ConfigError},
    geo::{LatLng, LatLngBounds},
    options::{
        FormRef, MapFieldOptions, MapFieldOverrides, MapOptions, MapOverrides, MapViewOverrides,
    },
};

pub use behaviours::{FieldBehaviours, FieldRegistry, ViewBehaviours, ViewRegistry};

pub use field::{FieldEvent, MapField};

pub use view::MapView;

pub use geocode::{GeocodeError, Geocoder, HttpGeocoder, NullGeocoder};

pub use instances::Instances;

pub use page::{ElementId, PageAccess};

pub use widget::{MapId, MapWidget, MarkerId, WidgetError};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, GeoformError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum GeoformError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Widget error: {0}")]
    Widget(#[from] WidgetError),

    #[error("Component is not initialized")]
    NotInitialized,

    #[error("Component is already initialized")]
    AlreadyInitialized,

    #[error("No form found for the configured get-form behaviour")]
    FormNotFound,
}

/// Error type alias for convenience
pub type Error = GeoformError;
