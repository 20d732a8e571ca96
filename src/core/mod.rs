pub mod config;
pub mod constants;
pub mod geo;
pub mod options;

pub use config::{AttributeSource, ConfigError};

pub use geo::{LatLng, LatLngBounds};

pub use options::{
    FormRef, MapFieldOptions, MapFieldOverrides, MapOptions, MapOverrides, MapViewOverrides,
};
