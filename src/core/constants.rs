//! Crate-wide defaults for attribute naming and the bundled OpenStreetMap setup.
//! Keeping them in a single place makes the data-attribute contract easy to audit.

/// Attribute prefix for reading component options from a container element.
pub const ATTR_PREFIX: &str = "data-geoform--";

/// Selector matching marker elements placed in the page for MapView.
pub const MARKER_SELECTOR: &str = "[data-geoform-marker]";

/// Attribute on a marker element holding its `"lat,lng"` coordinate pair.
pub const MARKER_COORDS_ATTR: &str = "data-geoform-marker--coords";

/// Default tile layer URL template ({s} subdomain, {z}/{x}/{y} tile address).
pub const TILE_LAYER_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution line shown for the default tile layer.
pub const ATTRIBUTION: &str = "Map data © OpenStreetMap contributors";

/// Default initial map center (Worcester, UK).
pub const DEFAULT_COORDS: (f64, f64) = (52.185766, -2.089655);

/// CSS class applied to the find-location control button.
pub const FIND_LOCATION_CLASS: &str = "geoform-field__find-location";

/// Event dispatched on form inputs after a programmatic value write.
pub const CHANGE_EVENT: &str = "change";

/// Event the find-location control listens for.
pub const CLICK_EVENT: &str = "click";
