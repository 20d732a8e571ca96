//! Page access capability
//!
//! Components never touch a real document; they reach it through this narrow
//! helper trait. The host supplies an implementation bridging to its page and
//! routes the events registered here back into the component (see
//! `MapField::handle_event`). Methods take `&self` so one implementation can be
//! shared across components; hosts use interior mutability where they need it.

use serde::{Deserialize, Serialize};

/// Opaque handle to a page element, allocated by the `PageAccess` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

pub trait PageAccess: Send + Sync {
    /// First element matching `selector`, scoped to `root` when given.
    fn query_one(&self, selector: &str, root: Option<ElementId>) -> Option<ElementId>;

    /// All elements matching `selector` in document order, scoped to `root`.
    fn query_many(&self, selector: &str, root: Option<ElementId>) -> Vec<ElementId>;

    /// Nearest ancestor of `element` (or the element itself) matching `selector`.
    fn closest(&self, element: ElementId, selector: &str) -> Option<ElementId>;

    /// Attribute value, if the attribute is present.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// The element's inner content, as markup text.
    fn inner_content(&self, element: ElementId) -> String;

    /// Current value of a form input (empty string when it has none).
    fn value(&self, element: ElementId) -> String;

    /// Writes a form input's value.
    fn set_value(&self, element: ElementId, value: &str);

    /// Creates a detached element with the given attributes.
    fn create_element(&self, tag: &str, attributes: &[(&str, &str)]) -> ElementId;

    /// Removes an element from the page.
    fn remove_element(&self, element: ElementId);

    /// Dispatches a named event on an element.
    fn dispatch(&self, element: ElementId, event: &str);

    /// Registers interest in an event on an element. `prevent_default` asks the
    /// host to suppress the default action of delivered events.
    fn listen(&self, element: ElementId, event: &str, prevent_default: bool);

    /// Removes a listener registered through [`listen`](PageAccess::listen).
    fn ignore(&self, element: ElementId, event: &str);
}
