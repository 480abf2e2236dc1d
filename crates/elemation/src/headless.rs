//! In-memory host
//!
//! `HeadlessHost` models just enough of a page to drive an elemation without a
//! browser: a flat list of elements in document order, a scroll offset, a
//! viewport, scroll listeners and a virtual clock for delayed tasks.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use std::time::Duration;
//! use elemation::headless::{HeadlessElement, HeadlessHost};
//! use elemation::Elemation;
//!
//! let host = Rc::new(HeadlessHost::new(1280.0, 800.0));
//! host.push(HeadlessElement::new("section").with_id("features").at(1000.0, 200.0));
//! let card = host.push(HeadlessElement::new("div").with_class("card"));
//!
//! let elemation = Elemation::builder(Rc::clone(&host))
//!     .trigger("#features")
//!     .targets(".card")
//!     .build()
//!     .unwrap();
//!
//! assert!(elemation.state().is_armed());
//! host.scroll_to(650.0);
//! host.advance(Duration::ZERO);
//! assert_eq!(host.class_name(card).as_deref(), Some("card scrolled-to"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use elemation_core::{Bounds, Result, SelectorList};
use slotmap::SlotMap;

use crate::host::{Host, ListenerId, ScrollListener, Task};

/// Index of an element in document order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An element of the headless page
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadlessElement {
    pub tag: String,
    pub id: Option<String>,
    pub class_name: String,
    pub bounds: Bounds,
}

impl HeadlessElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the initial class string
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Place the element `top` pixels from the document top, `height` tall
    pub fn at(mut self, top: f32, height: f32) -> Self {
        self.bounds = Bounds::new(self.bounds.x, top, self.bounds.width, height);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }
}

/// A class append performed by a host task
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedClass {
    /// Virtual time of the append
    pub at: Duration,
    pub node: NodeId,
    pub class: String,
}

struct Page {
    elements: Vec<HeadlessElement>,
    scroll_y: f32,
    viewport: (f32, f32),
    applied: Vec<AppliedClass>,
}

struct PendingTask {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct TimerQueue {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

impl TimerQueue {
    /// Remove the earliest task due at or before `deadline`, advancing `now`
    fn pop_due(&mut self, deadline: Duration) -> Option<Task> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= deadline)
            .min_by_key(|(_, pending)| (pending.due, pending.seq))
            .map(|(index, _)| index)?;

        let pending = self.pending.swap_remove(index);
        self.now = self.now.max(pending.due);
        Some(pending.task)
    }
}

type SharedListener = Rc<RefCell<ScrollListener>>;

/// In-memory page implementing [`Host`]
pub struct HeadlessHost {
    page: RefCell<Page>,
    listeners: RefCell<SlotMap<ListenerId, SharedListener>>,
    timers: RefCell<TimerQueue>,
}

impl std::fmt::Debug for HeadlessHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let page = self.page.borrow();
        f.debug_struct("HeadlessHost")
            .field("elements", &page.elements.len())
            .field("scroll_y", &page.scroll_y)
            .field("viewport", &page.viewport)
            .field("listeners", &self.listener_count())
            .field("pending_tasks", &self.pending_tasks())
            .finish()
    }
}

impl HeadlessHost {
    /// Empty page with the given viewport size
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            page: RefCell::new(Page {
                elements: Vec::new(),
                scroll_y: 0.0,
                viewport: (viewport_width, viewport_height),
                applied: Vec::new(),
            }),
            listeners: RefCell::new(SlotMap::with_key()),
            timers: RefCell::new(TimerQueue::default()),
        }
    }

    /// Append an element at the end of the document
    pub fn push(&self, element: HeadlessElement) -> NodeId {
        let mut page = self.page.borrow_mut();
        page.elements.push(element);
        NodeId(page.elements.len() - 1)
    }

    pub fn element(&self, node: NodeId) -> Option<HeadlessElement> {
        self.page.borrow().elements.get(node.0).cloned()
    }

    pub fn class_name(&self, node: NodeId) -> Option<String> {
        self.page
            .borrow()
            .elements
            .get(node.0)
            .map(|element| element.class_name.clone())
    }

    pub fn len(&self) -> usize {
        self.page.borrow().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Class appends performed so far, in execution order
    pub fn applied(&self) -> Vec<AppliedClass> {
        self.page.borrow().applied.clone()
    }

    /// Resize the viewport without dispatching any event
    pub fn resize(&self, width: f32, height: f32) {
        self.page.borrow_mut().viewport = (width, height);
    }

    /// Move the scroll offset and dispatch one scroll event
    pub fn scroll_to(&self, y: f32) {
        self.page.borrow_mut().scroll_y = y;
        self.dispatch_scroll();
    }

    /// Invoke every registered scroll listener once
    ///
    /// Listeners removed during dispatch are skipped for the rest of it.
    pub fn dispatch_scroll(&self) {
        let snapshot: Vec<(ListenerId, SharedListener)> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if !self.listeners.borrow().contains_key(id) {
                continue;
            }
            let mut callback = listener.borrow_mut();
            (*callback)();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.timers.borrow().now
    }

    pub fn pending_tasks(&self) -> usize {
        self.timers.borrow().pending.len()
    }

    /// Advance the virtual clock by `by`, running every task that falls due
    ///
    /// Tasks run in (due time, scheduling order). Returns the number run.
    pub fn advance(&self, by: Duration) -> usize {
        let deadline = self.now() + by;
        let mut ran = 0;

        loop {
            // The borrow must end before the task runs; tasks may schedule more.
            let next = self.timers.borrow_mut().pop_due(deadline);
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }

        self.timers.borrow_mut().now = deadline;
        ran
    }

    /// Run tasks until the queue is empty. Returns the number run.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let latest = self.timers.borrow().pending.iter().map(|p| p.due).max();
            let Some(latest) = latest else {
                return ran;
            };
            let by = latest.saturating_sub(self.now());
            ran += self.advance(by);
        }
    }

    fn matching(&self, selector: &str) -> Result<Vec<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        let page = self.page.borrow();

        Ok(page
            .elements
            .iter()
            .enumerate()
            .filter(|(_, element)| {
                selector.matches(&element.tag, element.id.as_deref(), &element.class_name)
            })
            .map(|(index, _)| NodeId(index))
            .collect())
    }
}

impl Host for HeadlessHost {
    type Element = NodeId;

    fn query_one(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.matching(selector)?.into_iter().next())
    }

    fn query_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.matching(selector)
    }

    fn element_bounds(&self, element: &NodeId) -> Bounds {
        self.page
            .borrow()
            .elements
            .get(element.0)
            .map(|element| element.bounds)
            .unwrap_or_default()
    }

    fn append_class(&self, element: &NodeId, class: &str) {
        let now = self.now();
        let mut page = self.page.borrow_mut();

        let Some(target) = page.elements.get_mut(element.0) else {
            tracing::warn!("append_class on unknown node {:?}", element);
            return;
        };
        target.class_name.push(' ');
        target.class_name.push_str(class);

        page.applied.push(AppliedClass {
            at: now,
            node: *element,
            class: class.to_string(),
        });
    }

    fn scroll_y(&self) -> f32 {
        self.page.borrow().scroll_y
    }

    fn viewport_size(&self) -> (f32, f32) {
        self.page.borrow().viewport
    }

    fn add_scroll_listener(&self, listener: ScrollListener) -> ListenerId {
        self.listeners
            .borrow_mut()
            .insert(Rc::new(RefCell::new(listener)))
    }

    fn remove_scroll_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(id);
    }

    fn set_timeout(&self, delay: Duration, task: Task) {
        let mut timers = self.timers.borrow_mut();
        let due = timers.now + delay;
        let seq = timers.next_seq;
        timers.next_seq += 1;
        timers.pending.push(PendingTask { due, seq, task });
    }
}
