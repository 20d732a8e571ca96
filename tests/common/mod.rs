#![allow(dead_code)]

//! In-memory page, widget and geocoder fakes shared by the component
//! integration tests. The fakes record every call so tests can assert on the
//! exact side effects a component performed.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use geoform::geocode::{GeocodeError, Geocoder};
use geoform::page::{ElementId, PageAccess};
use geoform::widget::{
    MapId, MapWidget, MarkerId, MarkerSpec, PopupContent, TileLayerSpec, WidgetError,
    WidgetMapOptions,
};
use geoform::{LatLng, LatLngBounds};

#[derive(Clone, Default)]
struct FakeElement {
    tag: String,
    attributes: HashMap<String, String>,
    parent: Option<u64>,
    children: Vec<u64>,
    inner: String,
    value: String,
}

/// An event listener currently registered with the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub element: ElementId,
    pub event: String,
    pub prevent_default: bool,
}

#[derive(Default)]
struct PageState {
    next_id: u64,
    elements: HashMap<u64, FakeElement>,
    /// Top-level elements in document order.
    roots: Vec<u64>,
    listeners: Vec<Listener>,
    dispatched: Vec<(ElementId, String)>,
    removed: Vec<ElementId>,
}

/// In-memory element tree with a small selector matcher: bare tag names,
/// `.class`, `[attr]` and `[attr="value"]`.
#[derive(Default)]
pub struct FakePage {
    state: Mutex<PageState>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an element attached to `parent` (or the document root).
    pub fn element(
        &self,
        tag: &str,
        parent: Option<ElementId>,
        attributes: &[(&str, &str)],
    ) -> ElementId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.elements.insert(
            id,
            FakeElement {
                tag: tag.to_string(),
                attributes: attributes
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
                parent: parent.map(|parent| parent.0),
                ..FakeElement::default()
            },
        );
        match parent {
            Some(parent) => {
                if let Some(element) = state.elements.get_mut(&parent.0) {
                    element.children.push(id);
                }
            }
            None => state.roots.push(id),
        }
        ElementId(id)
    }

    pub fn set_attribute(&self, element: ElementId, name: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(element) = state.elements.get_mut(&element.0) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_inner(&self, element: ElementId, content: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(element) = state.elements.get_mut(&element.0) {
            element.inner = content.to_string();
        }
    }

    /// Test-side input edit; unlike `set_value` it models the user typing,
    /// so nothing is recorded as a component write.
    pub fn fill(&self, element: ElementId, value: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(element) = state.elements.get_mut(&element.0) {
            element.value = value.to_string();
        }
    }

    pub fn tag(&self, element: ElementId) -> String {
        let state = self.state.lock().unwrap();
        state
            .elements
            .get(&element.0)
            .map(|element| element.tag.clone())
            .unwrap_or_default()
    }

    pub fn exists(&self, element: ElementId) -> bool {
        self.state.lock().unwrap().elements.contains_key(&element.0)
    }

    /// Listeners currently registered (listen minus ignore).
    pub fn listeners(&self) -> Vec<Listener> {
        self.state.lock().unwrap().listeners.clone()
    }

    pub fn dispatched(&self) -> Vec<(ElementId, String)> {
        self.state.lock().unwrap().dispatched.clone()
    }

    pub fn removed(&self) -> Vec<ElementId> {
        self.state.lock().unwrap().removed.clone()
    }
}

fn matches(element: &FakeElement, selector: &str) -> bool {
    let selector = selector.trim();
    if let Some(body) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        match body.split_once('=') {
            Some((name, value)) => {
                let wanted = value.trim_matches('"');
                element.attributes.get(name).is_some_and(|found| found == wanted)
            }
            None => element.attributes.contains_key(body),
        }
    } else if let Some(class) = selector.strip_prefix('.') {
        element
            .attributes
            .get("class")
            .is_some_and(|classes| classes.split_whitespace().any(|found| found == class))
    } else {
        element.tag == selector
    }
}

fn walk(state: &PageState, id: u64, selector: &str, found: &mut Vec<ElementId>) {
    if let Some(element) = state.elements.get(&id) {
        if matches(element, selector) {
            found.push(ElementId(id));
        }
        for &child in &element.children {
            walk(state, child, selector, found);
        }
    }
}

fn collect(state: &PageState, selector: &str, root: Option<ElementId>) -> Vec<ElementId> {
    // Scoped queries cover descendants only, like querySelectorAll
    let start = match root {
        Some(root) => state
            .elements
            .get(&root.0)
            .map(|element| element.children.clone())
            .unwrap_or_default(),
        None => state.roots.clone(),
    };
    let mut found = Vec::new();
    for id in start {
        walk(state, id, selector, &mut found);
    }
    found
}

impl PageAccess for FakePage {
    fn query_one(&self, selector: &str, root: Option<ElementId>) -> Option<ElementId> {
        let state = self.state.lock().unwrap();
        collect(&state, selector, root).into_iter().next()
    }

    fn query_many(&self, selector: &str, root: Option<ElementId>) -> Vec<ElementId> {
        let state = self.state.lock().unwrap();
        collect(&state, selector, root)
    }

    fn closest(&self, element: ElementId, selector: &str) -> Option<ElementId> {
        let state = self.state.lock().unwrap();
        let mut current = Some(element.0);
        while let Some(id) = current {
            let element = state.elements.get(&id)?;
            if matches(element, selector) {
                return Some(ElementId(id));
            }
            current = element.parent;
        }
        None
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.elements.get(&element.0)?.attributes.get(name).cloned()
    }

    fn inner_content(&self, element: ElementId) -> String {
        let state = self.state.lock().unwrap();
        state
            .elements
            .get(&element.0)
            .map(|element| element.inner.clone())
            .unwrap_or_default()
    }

    fn value(&self, element: ElementId) -> String {
        let state = self.state.lock().unwrap();
        state
            .elements
            .get(&element.0)
            .map(|element| element.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&self, element: ElementId, value: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(element) = state.elements.get_mut(&element.0) {
            element.value = value.to_string();
        }
    }

    fn create_element(&self, tag: &str, attributes: &[(&str, &str)]) -> ElementId {
        // Created detached; add_control is what places it in the widget
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.elements.insert(
            id,
            FakeElement {
                tag: tag.to_string(),
                attributes: attributes
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
                ..FakeElement::default()
            },
        );
        ElementId(id)
    }

    fn remove_element(&self, element: ElementId) {
        let mut state = self.state.lock().unwrap();
        if let Some(removed) = state.elements.remove(&element.0) {
            if let Some(parent) = removed.parent {
                if let Some(parent) = state.elements.get_mut(&parent) {
                    parent.children.retain(|&child| child != element.0);
                }
            }
            state.roots.retain(|&root| root != element.0);
            state.removed.push(element);
        }
    }

    fn dispatch(&self, element: ElementId, event: &str) {
        let mut state = self.state.lock().unwrap();
        state.dispatched.push((element, event.to_string()));
    }

    fn listen(&self, element: ElementId, event: &str, prevent_default: bool) {
        let mut state = self.state.lock().unwrap();
        state.listeners.push(Listener {
            element,
            event: event.to_string(),
            prevent_default,
        });
    }

    fn ignore(&self, element: ElementId, event: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .listeners
            .retain(|listener| !(listener.element == element && listener.event == event));
    }
}

#[derive(Clone)]
pub struct FakeMap {
    pub container: ElementId,
    pub options: WidgetMapOptions,
    pub tile_layers: Vec<TileLayerSpec>,
    pub center: LatLng,
    pub zoom: f64,
    pub fit: Option<(LatLngBounds, (f64, f64))>,
    pub controls: Vec<ElementId>,
}

#[derive(Clone)]
pub struct FakeMarker {
    pub map: MapId,
    pub spec: MarkerSpec,
    pub position: LatLng,
    pub popup: Option<PopupContent>,
    pub drag_watched: bool,
}

#[derive(Default)]
struct WidgetState {
    next_map: u64,
    next_marker: u64,
    maps: HashMap<u64, FakeMap>,
    markers: HashMap<u64, FakeMarker>,
    removed_maps: Vec<MapId>,
    refuse_markers: bool,
}

/// Recording map widget. Handles stay valid until removed; state is cloned
/// out through the accessor methods for assertions.
#[derive(Default)]
pub struct FakeWidget {
    state: Mutex<WidgetState>,
}

impl FakeWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `create_marker` call fail, for init error paths.
    pub fn refuse_markers(&self) {
        self.state.lock().unwrap().refuse_markers = true;
    }

    pub fn map(&self, map: MapId) -> FakeMap {
        self.state.lock().unwrap().maps[&map.0].clone()
    }

    pub fn marker(&self, marker: MarkerId) -> FakeMarker {
        self.state.lock().unwrap().markers[&marker.0].clone()
    }

    /// Number of live (not removed) maps.
    pub fn map_count(&self) -> usize {
        self.state.lock().unwrap().maps.len()
    }

    pub fn marker_count(&self) -> usize {
        self.state.lock().unwrap().markers.len()
    }

    pub fn removed_maps(&self) -> Vec<MapId> {
        self.state.lock().unwrap().removed_maps.clone()
    }
}

impl MapWidget for FakeWidget {
    fn create_map(
        &self,
        container: ElementId,
        options: &WidgetMapOptions,
    ) -> Result<MapId, WidgetError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_map;
        state.next_map += 1;
        state.maps.insert(
            id,
            FakeMap {
                container,
                options: *options,
                tile_layers: Vec::new(),
                center: LatLng::default(),
                zoom: 0.0,
                fit: None,
                controls: Vec::new(),
            },
        );
        Ok(MapId(id))
    }

    fn remove_map(&self, map: MapId) {
        let mut state = self.state.lock().unwrap();
        if state.maps.remove(&map.0).is_some() {
            state.markers.retain(|_, marker| marker.map != map);
            state.removed_maps.push(map);
        }
    }

    fn add_tile_layer(&self, map: MapId, spec: &TileLayerSpec) -> Result<(), WidgetError> {
        let mut state = self.state.lock().unwrap();
        match state.maps.get_mut(&map.0) {
            Some(entry) => {
                entry.tile_layers.push(spec.clone());
                Ok(())
            }
            None => Err(WidgetError(format!("no map {map:?}"))),
        }
    }

    fn center(&self, map: MapId) -> LatLng {
        let state = self.state.lock().unwrap();
        state.maps.get(&map.0).map(|map| map.center).unwrap_or_default()
    }

    fn zoom(&self, map: MapId) -> f64 {
        let state = self.state.lock().unwrap();
        state.maps.get(&map.0).map(|map| map.zoom).unwrap_or_default()
    }

    fn set_view(&self, map: MapId, center: LatLng, zoom: f64) {
        let mut state = self.state.lock().unwrap();
        if let Some(map) = state.maps.get_mut(&map.0) {
            map.center = center;
            map.zoom = zoom;
        }
    }

    fn fit_bounds(&self, map: MapId, bounds: &LatLngBounds, padding: (f64, f64)) {
        let mut state = self.state.lock().unwrap();
        if let Some(map) = state.maps.get_mut(&map.0) {
            map.center = bounds.center();
            map.fit = Some((bounds.clone(), padding));
        }
    }

    fn create_marker(&self, map: MapId, spec: &MarkerSpec) -> Result<MarkerId, WidgetError> {
        let mut state = self.state.lock().unwrap();
        if state.refuse_markers {
            return Err(WidgetError("marker creation refused".to_string()));
        }
        if !state.maps.contains_key(&map.0) {
            return Err(WidgetError(format!("no map {map:?}")));
        }
        let id = state.next_marker;
        state.next_marker += 1;
        state.markers.insert(
            id,
            FakeMarker {
                map,
                spec: spec.clone(),
                position: spec.position,
                popup: None,
                drag_watched: false,
            },
        );
        Ok(MarkerId(id))
    }

    fn remove_marker(&self, marker: MarkerId) {
        let mut state = self.state.lock().unwrap();
        state.markers.remove(&marker.0);
    }

    fn marker_position(&self, marker: MarkerId) -> LatLng {
        let state = self.state.lock().unwrap();
        state
            .markers
            .get(&marker.0)
            .map(|marker| marker.position)
            .unwrap_or_default()
    }

    fn set_marker_position(&self, marker: MarkerId, position: LatLng) {
        let mut state = self.state.lock().unwrap();
        if let Some(marker) = state.markers.get_mut(&marker.0) {
            marker.position = position;
        }
    }

    fn bind_popup(&self, marker: MarkerId, content: &PopupContent) {
        let mut state = self.state.lock().unwrap();
        if let Some(marker) = state.markers.get_mut(&marker.0) {
            marker.popup = Some(content.clone());
        }
    }

    fn add_control(&self, map: MapId, control: ElementId) {
        let mut state = self.state.lock().unwrap();
        if let Some(map) = state.maps.get_mut(&map.0) {
            map.controls.push(control);
        }
    }

    fn remove_control(&self, map: MapId, control: ElementId) {
        let mut state = self.state.lock().unwrap();
        if let Some(map) = state.maps.get_mut(&map.0) {
            map.controls.retain(|&entry| entry != control);
        }
    }

    fn on_marker_drag_end(&self, marker: MarkerId) {
        let mut state = self.state.lock().unwrap();
        if let Some(marker) = state.markers.get_mut(&marker.0) {
            marker.drag_watched = true;
        }
    }

    fn off_marker_drag_end(&self, marker: MarkerId) {
        let mut state = self.state.lock().unwrap();
        if let Some(marker) = state.markers.get_mut(&marker.0) {
            marker.drag_watched = false;
        }
    }
}

/// One scripted answer for the stub geocoder.
#[derive(Debug, Clone, Copy)]
pub enum GeocodeOutcome {
    Found(LatLng),
    NoMatch,
    Fail(&'static str),
}

/// Geocoder answering from a scripted queue; exhausted means no match.
pub struct StubGeocoder {
    outcomes: Mutex<VecDeque<GeocodeOutcome>>,
    queries: Mutex<Vec<String>>,
}

impl StubGeocoder {
    pub fn new(outcomes: impl IntoIterator<Item = GeocodeOutcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            queries: Mutex::new(Vec::new()),
        })
    }

    /// Queries received, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<LatLng>, GeocodeError> {
        self.queries.lock().unwrap().push(query.to_string());
        match self.outcomes.lock().unwrap().pop_front() {
            Some(GeocodeOutcome::Found(coords)) => Ok(Some(coords)),
            Some(GeocodeOutcome::NoMatch) | None => Ok(None),
            Some(GeocodeOutcome::Fail(message)) => Err(GeocodeError::Failed(message.to_string())),
        }
    }
}

/// Opt-in log output for a test run (`RUST_LOG=debug cargo test`).
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A page holding one form with lat/lng inputs and a map container inside it.
pub struct FieldFixture {
    pub page: Arc<FakePage>,
    pub widget: Arc<FakeWidget>,
    pub body: ElementId,
    pub form: ElementId,
    pub container: ElementId,
    pub lat: ElementId,
    pub lng: ElementId,
}

pub fn field_fixture() -> FieldFixture {
    let page = Arc::new(FakePage::new());
    let body = page.element("body", None, &[]);
    let form = page.element("form", Some(body), &[]);
    let lat = page.element("input", Some(form), &[("name", "lat")]);
    let lng = page.element("input", Some(form), &[("name", "lng")]);
    let container = page.element("div", Some(form), &[]);
    FieldFixture {
        page,
        widget: Arc::new(FakeWidget::new()),
        body,
        form,
        container,
        lat,
        lng,
    }
}
