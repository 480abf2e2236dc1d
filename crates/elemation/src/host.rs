//! Host capability trait
//!
//! Everything an elemation needs from its environment goes through [`Host`]:
//! element lookup, layout measurement, class mutation, the scroll event and a
//! timer. Hosts are single-threaded; callbacks are not `Send`.

use std::time::Duration;

use elemation_core::{Bounds, Result};
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a registered scroll listener
    pub struct ListenerId;
}

/// Callback invoked once per scroll event
pub type ScrollListener = Box<dyn FnMut()>;

/// One-shot delayed task
pub type Task = Box<dyn FnOnce()>;

/// Document and viewport capability
///
/// Implemented by [`HeadlessHost`](crate::headless::HeadlessHost) for tests
/// and tooling, and by `WebHost` (feature `web`) in the browser.
pub trait Host: 'static {
    /// Handle to an element of the document
    type Element: Clone + 'static;

    /// First element matching `selector` in document order
    fn query_one(&self, selector: &str) -> Result<Option<Self::Element>>;

    /// All elements matching `selector` in document order
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// Layout box of `element` relative to the document top
    fn element_bounds(&self, element: &Self::Element) -> Bounds;

    /// Append ` class` to the element's class string
    ///
    /// Plain concatenation: appending a class twice yields a duplicate token.
    fn append_class(&self, element: &Self::Element, class: &str);

    /// Current vertical scroll offset
    fn scroll_y(&self) -> f32;

    /// Viewport (width, height)
    fn viewport_size(&self) -> (f32, f32);

    /// Register a callback for the viewport scroll event
    fn add_scroll_listener(&self, listener: ScrollListener) -> ListenerId;

    /// Unregister a scroll listener
    ///
    /// Must be safe to call from inside the listener being removed.
    fn remove_scroll_listener(&self, id: ListenerId);

    /// Run `task` once after `delay`
    fn set_timeout(&self, delay: Duration, task: Task);
}
