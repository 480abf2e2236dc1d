//! Browser host
//!
//! [`WebHost`] backs an elemation with the page's `window` and `document`.
//! [`JsElemation`] exposes the component to JavaScript as `Elemation`:
//!
//! ```js
//! import init, { Elemation } from "./pkg/elemation.js";
//!
//! await init();
//! new Elemation("#features", ".card", 300);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use slotmap::SlotMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, DomException, Element, HtmlElement, Window};

use elemation_core::{Bounds, ElemationConfig, ElemationError, Result};

use crate::elemation::Elemation;
use crate::host::{Host, ListenerId, ScrollListener, Task};

/// [`Host`] backed by the browser window
pub struct WebHost {
    window: Window,
    document: Document,
    listeners: RefCell<SlotMap<ListenerId, EventListener>>,
}

impl WebHost {
    /// Bind to the global `window`
    pub fn new() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| ElemationError::Host("no global window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| ElemationError::Host("window has no document".into()))?;

        Ok(Self {
            window,
            document,
            listeners: RefCell::new(SlotMap::with_key()),
        })
    }
}

fn selector_error(selector: &str, err: JsValue) -> ElemationError {
    let reason = err
        .dyn_ref::<DomException>()
        .map(|e| e.message())
        .unwrap_or_else(|| format!("{:?}", err));
    ElemationError::invalid_selector(selector, reason)
}

impl Host for WebHost {
    // Not narrowed to `HtmlElement`: SVG and MathML matches keep their
    // document-order position in the stagger.
    type Element = Element;

    fn query_one(&self, selector: &str) -> Result<Option<Element>> {
        self.document
            .query_selector(selector)
            .map_err(|err| selector_error(selector, err))
    }

    fn query_all(&self, selector: &str) -> Result<Vec<Element>> {
        let nodes = self
            .document
            .query_selector_all(selector)
            .map_err(|err| selector_error(selector, err))?;

        Ok((0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn element_bounds(&self, element: &Element) -> Bounds {
        if let Some(element) = element.dyn_ref::<HtmlElement>() {
            return Bounds::new(
                element.offset_left() as f32,
                element.offset_top() as f32,
                element.offset_width() as f32,
                element.offset_height() as f32,
            );
        }

        // No offset box outside HTML; use the client rect shifted by the scroll
        let rect = element.get_bounding_client_rect();
        let scroll_x = self.window.scroll_x().unwrap_or(0.0);
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        Bounds::new(
            (rect.left() + scroll_x) as f32,
            (rect.top() + scroll_y) as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }

    fn append_class(&self, element: &Element, class: &str) {
        // The `class` attribute rather than `className`, which is an
        // `SVGAnimatedString` on SVG elements
        let class_name = element.get_attribute("class").unwrap_or_default();
        if let Err(err) = element.set_attribute("class", &appended(&class_name, class)) {
            tracing::error!("failed to append class {:?}: {:?}", class, err);
        }
    }

    fn scroll_y(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }

    fn viewport_size(&self) -> (f32, f32) {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        (width.unwrap_or(0.0) as f32, height.unwrap_or(0.0) as f32)
    }

    fn add_scroll_listener(&self, mut listener: ScrollListener) -> ListenerId {
        let handle = EventListener::new(&self.window, "scroll", move |_event| listener());
        self.listeners.borrow_mut().insert(handle)
    }

    fn remove_scroll_listener(&self, id: ListenerId) {
        let Some(handle) = self.listeners.borrow_mut().remove(id) else {
            return;
        };
        // Dropping detaches the listener and frees its closure, which may be
        // the one currently running. Defer the drop to the next task.
        Timeout::new(0, move || drop(handle)).forget();
    }

    fn set_timeout(&self, delay: Duration, task: Task) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task).forget();
    }
}

fn appended(class_name: &str, class: &str) -> String {
    format!("{} {}", class_name, class)
}

// ============================================================================
// JavaScript export
// ============================================================================

fn to_js(err: ElemationError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// `Elemation` as seen from JavaScript
#[wasm_bindgen(js_name = Elemation)]
pub struct JsElemation {
    inner: Elemation<WebHost>,
}

#[wasm_bindgen(js_class = Elemation)]
impl JsElemation {
    /// `new Elemation(triggerSelector?, animateSelector?, interval = 500, minWidth?, minHeight?)`
    #[wasm_bindgen(constructor)]
    pub fn new(
        trigger_selector: Option<String>,
        animate_selector: Option<String>,
        interval: Option<u32>,
        min_width: Option<f32>,
        min_height: Option<f32>,
    ) -> std::result::Result<JsElemation, JsValue> {
        let host = Rc::new(WebHost::new().map_err(to_js)?);
        let mut config = ElemationConfig {
            trigger: trigger_selector,
            targets: animate_selector,
            min_width,
            min_height,
            ..Default::default()
        };
        if let Some(interval) = interval {
            config.interval_ms = u64::from(interval);
        }

        let inner = Elemation::from_config(host, &config).map_err(to_js)?;
        Ok(JsElemation { inner })
    }

    #[wasm_bindgen(js_name = setEndstops)]
    pub fn set_endstops(&self, selector: &str) -> std::result::Result<(), JsValue> {
        self.inner.set_endstops(selector).map(|_| ()).map_err(to_js)
    }

    pub fn trigger(&self) -> bool {
        self.inner.trigger()
    }

    pub fn start(&self) -> std::result::Result<(), JsValue> {
        self.inner.start().map(|_| ()).map_err(to_js)
    }

    pub fn ready(&self) -> std::result::Result<(), JsValue> {
        self.inner.ready().map_err(to_js)
    }

    #[wasm_bindgen(getter = isReady)]
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    #[wasm_bindgen(getter)]
    pub fn selectors(&self) -> String {
        self.inner.selectors()
    }

    #[wasm_bindgen(setter)]
    pub fn set_selectors(&self, selectors: String) {
        self.inner.set_selectors(selectors);
    }

    #[wasm_bindgen(getter = appendClass)]
    pub fn append_class(&self) -> String {
        self.inner.append_class()
    }

    #[wasm_bindgen(setter = appendClass)]
    pub fn set_append_class(&self, class: String) {
        self.inner.set_append_class(class);
    }

    #[wasm_bindgen(getter)]
    pub fn interval(&self) -> u32 {
        u32::try_from(self.inner.interval().as_millis()).unwrap_or(u32::MAX)
    }

    #[wasm_bindgen(setter)]
    pub fn set_interval(&self, interval: u32) {
        self.inner
            .set_interval(Duration::from_millis(u64::from(interval)));
    }

    #[wasm_bindgen(getter = topEndstop)]
    pub fn top_endstop(&self) -> Option<f32> {
        self.inner.top_endstop()
    }

    #[wasm_bindgen(getter = bottomEndstop)]
    pub fn bottom_endstop(&self) -> Option<f32> {
        self.inner.bottom_endstop()
    }
}
