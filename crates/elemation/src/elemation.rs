//! The Elemation component
//!
//! Appends a class to a set of target elements, one every `interval`, once the
//! vertical centre of the viewport enters the span of a trigger element.
//!
//! ```text
//!             ┌──────────── viewport ────────────┐
//! scroll_y →  │                                  │
//!             │  - - - - midpoint - - - - - - -  │ ← scroll_y + height / 2
//!             │                                  │
//!             └──────────────────────────────────┘
//! top endstop    ┌── trigger element ──┐
//!                │                     │
//! bottom endstop └─────────────────────┘
//! ```
//!
//! The trigger fires when `top <= midpoint <= bottom`. Endstops are measured
//! once by [`Elemation::set_endstops`] and never re-measured.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use elemation_core::{
    viewport_midpoint, ActivationEvent, ActivationState, ElemationConfig, ElemationError,
    Endstops, Result, DEFAULT_SELECTORS,
};

use crate::host::{Host, ListenerId};

struct ElemationInner {
    selectors: String,
    interval: Duration,
    append_class: String,
    endstops: Option<Endstops>,
    min_width: Option<f32>,
    min_height: Option<f32>,
    state: ActivationState,
    listener: Option<ListenerId>,
}

impl ElemationInner {
    fn from_config(config: &ElemationConfig) -> Self {
        Self {
            selectors: config
                .target_selector()
                .unwrap_or(DEFAULT_SELECTORS)
                .to_string(),
            interval: config.interval(),
            append_class: config.append_class.clone(),
            endstops: None,
            min_width: config.min_width,
            min_height: config.min_height,
            state: ActivationState::Dormant,
            listener: None,
        }
    }

    /// Apply `event`, returning false when the current state rejects it
    fn transition(&mut self, event: ActivationEvent) -> bool {
        match self.state.on_event(event) {
            Some(next) => {
                tracing::debug!("elemation {} -> {}", self.state, next);
                self.state = next;
                true
            }
            None => false,
        }
    }
}

/// Scroll-triggered, staggered class reveal
///
/// A cheap handle: clones share the same state.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use std::time::Duration;
/// use elemation::headless::{HeadlessElement, HeadlessHost};
/// use elemation::Elemation;
///
/// let host = Rc::new(HeadlessHost::new(1280.0, 800.0));
/// host.push(HeadlessElement::new("section").with_id("hero").at(0.0, 600.0));
/// for _ in 0..3 {
///     host.push(HeadlessElement::new("li").with_class("item"));
/// }
///
/// // Dormant until activated explicitly
/// let elemation = Elemation::new(Rc::clone(&host));
/// elemation.set_selectors("li.item");
/// elemation.set_interval(Duration::from_millis(100));
/// elemation.set_endstops("#hero").unwrap();
/// elemation.ready().unwrap();
///
/// // The hero is already centred, so the reveal starts immediately
/// assert!(elemation.state().is_fired());
/// assert_eq!(host.run_until_idle(), 3);
/// ```
pub struct Elemation<H: Host> {
    inner: Rc<RefCell<ElemationInner>>,
    host: Rc<H>,
}

impl<H: Host> Clone for Elemation<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            host: Rc::clone(&self.host),
        }
    }
}

impl<H: Host> std::fmt::Debug for Elemation<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Elemation")
            .field("selectors", &inner.selectors)
            .field("interval", &inner.interval)
            .field("append_class", &inner.append_class)
            .field("endstops", &inner.endstops)
            .field("state", &inner.state)
            .finish()
    }
}

impl<H: Host> Elemation<H> {
    /// Create a dormant elemation with default settings
    ///
    /// Call [`set_endstops`](Self::set_endstops) and [`ready`](Self::ready) to
    /// activate it.
    pub fn new(host: Rc<H>) -> Self {
        Self::with_inner(host, ElemationInner::from_config(&ElemationConfig::default()))
    }

    pub fn builder(host: Rc<H>) -> ElemationBuilder<H> {
        let config = ElemationConfig::default();
        ElemationBuilder {
            host,
            interval: config.interval(),
            config,
        }
    }

    /// Create from a configuration
    ///
    /// With both `trigger` and `targets` set the elemation measures the
    /// trigger and activates before returning. Blank selectors count as
    /// unset.
    pub fn from_config(host: Rc<H>, config: &ElemationConfig) -> Result<Self> {
        Self::with_interval(host, config, config.interval())
    }

    fn with_interval(host: Rc<H>, config: &ElemationConfig, interval: Duration) -> Result<Self> {
        config.validate()?;

        let mut inner = ElemationInner::from_config(config);
        inner.interval = interval;
        let elemation = Self::with_inner(host, inner);

        if let (Some(trigger), Some(_)) = (config.trigger_selector(), config.target_selector()) {
            elemation.set_endstops(trigger)?;
            elemation.ready()?;
        }

        Ok(elemation)
    }

    fn with_inner(host: Rc<H>, inner: ElemationInner) -> Self {
        Self {
            inner: Rc::new(RefCell::new(inner)),
            host,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Measure the first element matching `selector` as the trigger window
    ///
    /// Fails with [`ElemationError::MissingElement`] if nothing matches.
    pub fn set_endstops(&self, selector: &str) -> Result<Endstops> {
        let element = self
            .host
            .query_one(selector)?
            .ok_or_else(|| ElemationError::MissingElement(selector.to_string()))?;

        let endstops = Endstops::from_bounds(&self.host.element_bounds(&element));
        tracing::debug!(
            "elemation endstops for {:?}: {}..{}",
            selector,
            endstops.top(),
            endstops.bottom()
        );

        self.inner.borrow_mut().endstops = Some(endstops);
        Ok(endstops)
    }

    /// Returns true if the viewport midpoint lies within the endstops
    ///
    /// Always false before endstops are measured.
    pub fn trigger(&self) -> bool {
        let Some(endstops) = self.inner.borrow().endstops else {
            return false;
        };
        let (_, viewport_height) = self.host.viewport_size();

        endstops.contains(viewport_midpoint(self.host.scroll_y(), viewport_height))
    }

    /// Schedule the class append for every target
    ///
    /// Target `i` (document order) receives ` append_class` after
    /// `i * interval`. Not idempotent: each call schedules a fresh round.
    /// Returns the number of tasks scheduled.
    pub fn start(&self) -> Result<usize> {
        let (selectors, interval, class) = {
            let inner = self.inner.borrow();
            (
                inner.selectors.clone(),
                inner.interval,
                inner.append_class.clone(),
            )
        };

        let targets = self.host.query_all(&selectors)?;
        tracing::info!(
            "elemation starting: {} target(s) for {:?}, {:?} apart",
            targets.len(),
            selectors,
            interval
        );

        for (index, element) in targets.iter().enumerate() {
            let delay = interval.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
            let host: Weak<H> = Rc::downgrade(&self.host);
            let element = element.clone();
            let class = class.clone();

            tracing::trace!("elemation target {} scheduled in {:?}", index, delay);
            self.host.set_timeout(
                delay,
                Box::new(move || {
                    if let Some(host) = host.upgrade() {
                        host.append_class(&element, &class);
                    }
                }),
            );
        }

        Ok(targets.len())
    }

    /// Activate the elemation
    ///
    /// Fires immediately if the trigger is already centred, otherwise attaches
    /// a one-shot scroll listener. Activation happens once; later calls log a
    /// warning and change nothing.
    pub fn ready(&self) -> Result<()> {
        let state = self.inner.borrow().state;
        if state.is_ready() {
            tracing::warn!(
                "[Elemation] ready() called on an elemation that is already {}; \
                 do not call ready() more than once, or after constructing with both selectors",
                state
            );
            return Ok(());
        }

        if self.trigger() {
            self.inner.borrow_mut().transition(ActivationEvent::Fire);
            self.start()?;
            return Ok(());
        }

        let listener = {
            let this = self.detach();
            Box::new(move || {
                if let Some(elemation) = this.upgrade() {
                    elemation.on_scroll();
                }
            })
        };
        let id = self.host.add_scroll_listener(listener);

        let mut inner = self.inner.borrow_mut();
        inner.transition(ActivationEvent::Arm);
        inner.listener = Some(id);
        tracing::debug!("elemation armed, waiting for scroll");

        Ok(())
    }

    fn on_scroll(&self) {
        if !self.inner.borrow().state.is_armed() || !self.trigger() {
            return;
        }

        let listener = {
            let mut inner = self.inner.borrow_mut();
            inner.transition(ActivationEvent::Fire);
            inner.listener.take()
        };
        if let Some(id) = listener {
            self.host.remove_scroll_listener(id);
        }

        if let Err(err) = self.start() {
            tracing::error!("elemation failed to start: {}", err);
        }
    }

    fn detach(&self) -> DetachedElemation<H> {
        DetachedElemation {
            inner: Rc::clone(&self.inner),
            host: Rc::downgrade(&self.host),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    pub fn state(&self) -> ActivationState {
        self.inner.borrow().state
    }

    /// Returns true once [`ready`](Self::ready) has run
    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    pub fn endstops(&self) -> Option<Endstops> {
        self.inner.borrow().endstops
    }

    pub fn top_endstop(&self) -> Option<f32> {
        self.endstops().map(|e| e.top())
    }

    pub fn bottom_endstop(&self) -> Option<f32> {
        self.endstops().map(|e| e.bottom())
    }

    pub fn selectors(&self) -> String {
        self.inner.borrow().selectors.clone()
    }

    pub fn set_selectors(&self, selectors: impl Into<String>) {
        self.inner.borrow_mut().selectors = selectors.into();
    }

    pub fn interval(&self) -> Duration {
        self.inner.borrow().interval
    }

    pub fn set_interval(&self, interval: Duration) {
        self.inner.borrow_mut().interval = interval;
    }

    pub fn append_class(&self) -> String {
        self.inner.borrow().append_class.clone()
    }

    pub fn set_append_class(&self, class: impl Into<String>) {
        self.inner.borrow_mut().append_class = class.into();
    }

    /// Configured minimum viewport width; not consulted
    pub fn min_width(&self) -> Option<f32> {
        self.inner.borrow().min_width
    }

    /// Configured minimum viewport height; not consulted
    pub fn min_height(&self) -> Option<f32> {
        self.inner.borrow().min_height
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }
}

/// Handle held by the scroll listener
///
/// Keeps the state alive while armed, so an elemation whose handles were all
/// dropped still fires. The host owns the listener and is only referenced
/// weakly.
struct DetachedElemation<H: Host> {
    inner: Rc<RefCell<ElemationInner>>,
    host: Weak<H>,
}

impl<H: Host> DetachedElemation<H> {
    fn upgrade(&self) -> Option<Elemation<H>> {
        Some(Elemation {
            inner: Rc::clone(&self.inner),
            host: self.host.upgrade()?,
        })
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Elemation`]
///
/// ```rust
/// use std::rc::Rc;
/// use std::time::Duration;
/// use elemation::headless::{HeadlessElement, HeadlessHost};
/// use elemation::Elemation;
///
/// let host = Rc::new(HeadlessHost::new(1280.0, 800.0));
/// host.push(HeadlessElement::new("section").with_id("features").at(1000.0, 200.0));
///
/// let elemation = Elemation::builder(host)
///     .trigger("#features")
///     .targets(".card")
///     .interval(Duration::from_millis(300))
///     .append_class("visible")
///     .build()
///     .unwrap();
///
/// assert!(elemation.is_ready());
/// ```
pub struct ElemationBuilder<H: Host> {
    host: Rc<H>,
    config: ElemationConfig,
    interval: Duration,
}

impl<H: Host> ElemationBuilder<H> {
    /// Selector of the trigger element
    pub fn trigger(mut self, selector: impl Into<String>) -> Self {
        self.config.trigger = Some(selector.into());
        self
    }

    /// Selector of the elements that receive the class
    pub fn targets(mut self, selector: impl Into<String>) -> Self {
        self.config.targets = Some(selector.into());
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn append_class(mut self, class: impl Into<String>) -> Self {
        self.config.append_class = class.into();
        self
    }

    pub fn min_width(mut self, min_width: f32) -> Self {
        self.config.min_width = Some(min_width);
        self
    }

    pub fn min_height(mut self, min_height: f32) -> Self {
        self.config.min_height = Some(min_height);
        self
    }

    /// Build the elemation, activating it when both selectors are set
    pub fn build(self) -> Result<Elemation<H>> {
        Elemation::with_interval(self.host, &self.config, self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{AppliedClass, HeadlessElement, HeadlessHost, NodeId};

    const MS: Duration = Duration::from_millis(1);

    /// Trigger at 1000..1200 with three cards below it, viewport 800 tall
    fn landing_page() -> Rc<HeadlessHost> {
        let host = Rc::new(HeadlessHost::new(1280.0, 800.0));
        host.push(HeadlessElement::new("header").at(0.0, 120.0));
        host.push(HeadlessElement::new("section").with_id("features").at(1000.0, 200.0));
        host.push(HeadlessElement::new("div").with_class("card").at(1020.0, 40.0));
        host.push(HeadlessElement::new("div").with_class("card").at(1070.0, 40.0));
        host.push(HeadlessElement::new("div").with_class("card").at(1120.0, 40.0));
        host
    }

    fn cards(host: &HeadlessHost) -> Vec<NodeId> {
        host.query_all(".card").unwrap()
    }

    fn features(host: &HeadlessHost) -> NodeId {
        host.query_one("#features").unwrap().unwrap()
    }

    #[test]
    fn test_construct_with_both_selectors_is_ready() {
        let host = landing_page();
        let elemation = Elemation::builder(Rc::clone(&host))
            .trigger("#features")
            .targets(".card")
            .build()
            .unwrap();

        assert!(elemation.is_ready());
        assert_eq!(elemation.state(), ActivationState::Armed);
        assert_eq!(elemation.selectors(), ".card");
        assert_eq!(host.listener_count(), 1);
    }

    #[test]
    fn test_construct_without_selectors_is_dormant() {
        let host = landing_page();

        let elemation = Elemation::builder(Rc::clone(&host))
            .trigger("#features")
            .build()
            .unwrap();
        assert!(!elemation.is_ready());
        assert_eq!(elemation.endstops(), None);
        assert_eq!(elemation.selectors(), "div");

        let elemation = Elemation::new(Rc::clone(&host));
        assert_eq!(elemation.state(), ActivationState::Dormant);
        assert_eq!(elemation.interval(), Duration::from_millis(500));
        assert_eq!(elemation.append_class(), "scrolled-to");
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_targets_without_trigger_are_kept() {
        let elemation = Elemation::builder(landing_page())
            .targets(".card")
            .build()
            .unwrap();

        assert!(!elemation.is_ready());
        assert_eq!(elemation.selectors(), ".card");
    }

    #[test]
    fn test_set_endstops_measures_trigger() {
        let elemation = Elemation::new(landing_page());
        let endstops = elemation.set_endstops("#features").unwrap();

        assert_eq!(elemation.top_endstop(), Some(1000.0));
        assert_eq!(elemation.bottom_endstop(), Some(1200.0));
        assert_eq!(endstops.bottom() - endstops.top(), 200.0);
    }

    #[test]
    fn test_set_endstops_uses_first_match() {
        let elemation = Elemation::new(landing_page());
        elemation.set_endstops(".card").unwrap();

        assert_eq!(elemation.top_endstop(), Some(1020.0));
        assert_eq!(elemation.bottom_endstop(), Some(1060.0));
    }

    #[test]
    fn test_set_endstops_without_match_fails() {
        let elemation = Elemation::new(landing_page());
        let err = elemation.set_endstops("#nowhere").unwrap_err();

        assert_eq!(err, ElemationError::MissingElement("#nowhere".to_string()));
        assert_eq!(elemation.endstops(), None);
    }

    #[test]
    fn test_construct_with_missing_trigger_fails() {
        let result = Elemation::builder(landing_page())
            .trigger("#nowhere")
            .targets(".card")
            .build();

        assert!(matches!(result, Err(ElemationError::MissingElement(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Elemation::builder(landing_page()).append_class("").build();

        assert!(matches!(result, Err(ElemationError::Config(_))));
    }

    #[test]
    fn test_blank_selector_leaves_elemation_dormant() {
        let host = landing_page();

        let elemation = Elemation::builder(Rc::clone(&host))
            .trigger("")
            .targets(".card")
            .build()
            .unwrap();
        assert_eq!(elemation.state(), ActivationState::Dormant);
        assert_eq!(elemation.endstops(), None);
        assert_eq!(host.listener_count(), 0);

        let elemation = Elemation::builder(Rc::clone(&host))
            .trigger("#features")
            .targets(" ")
            .build()
            .unwrap();
        assert_eq!(elemation.state(), ActivationState::Dormant);
        assert_eq!(elemation.selectors(), "div");
    }

    #[test]
    fn test_multiple_append_classes() {
        let host = landing_page();
        host.scroll_to(650.0);

        Elemation::builder(Rc::clone(&host))
            .trigger("#features")
            .targets(".card")
            .append_class("animated fadeInUp")
            .build()
            .unwrap();
        host.run_until_idle();

        for card in cards(&host) {
            assert_eq!(
                host.class_name(card).as_deref(),
                Some("card animated fadeInUp")
            );
        }
    }

    #[test]
    fn test_builder_keeps_sub_millisecond_interval() {
        let host = landing_page();
        host.scroll_to(650.0);

        let elemation = Elemation::builder(Rc::clone(&host))
            .trigger("#features")
            .targets(".card")
            .interval(Duration::from_micros(1500))
            .build()
            .unwrap();
        host.run_until_idle();

        assert_eq!(elemation.interval(), Duration::from_micros(1500));
        let at: Vec<Duration> = host.applied().iter().map(|a| a.at).collect();
        assert_eq!(
            at,
            vec![
                Duration::ZERO,
                Duration::from_micros(1500),
                Duration::from_micros(3000)
            ]
        );
    }

    #[test]
    fn test_stagger_counts_every_matched_element() {
        let host = Rc::new(HeadlessHost::new(1280.0, 800.0));
        host.push(HeadlessElement::new("div").with_class("reveal"));
        host.push(HeadlessElement::new("svg").with_class("reveal"));
        host.push(HeadlessElement::new("div").with_class("reveal"));

        let elemation = Elemation::new(Rc::clone(&host));
        elemation.set_selectors(".reveal");
        elemation.set_interval(100 * MS);
        elemation.start().unwrap();
        host.run_until_idle();

        let timeline: Vec<(usize, Duration)> = host
            .applied()
            .iter()
            .map(|a| (a.node.index(), a.at))
            .collect();
        assert_eq!(
            timeline,
            vec![(0, Duration::ZERO), (1, 100 * MS), (2, 200 * MS)]
        );
    }

    #[test]
    fn test_trigger_window() {
        let host = landing_page();
        let elemation = Elemation::new(Rc::clone(&host));

        // Unmeasured endstops never trigger
        host.scroll_to(650.0);
        assert!(!elemation.trigger());

        elemation.set_endstops("#features").unwrap();

        host.scroll_to(450.0); // midpoint 850
        assert!(!elemation.trigger());

        host.scroll_to(650.0); // midpoint 1050
        assert!(elemation.trigger());

        host.scroll_to(600.0); // midpoint 1000, top edge
        assert!(elemation.trigger());

        host.scroll_to(800.0); // midpoint 1200, bottom edge
        assert!(elemation.trigger());

        host.scroll_to(801.0);
        assert!(!elemation.trigger());
    }

    #[test]
    fn test_trigger_uses_current_viewport_height() {
        let host = landing_page();
        let elemation = Elemation::new(Rc::clone(&host));
        elemation.set_endstops("#features").unwrap();

        host.scroll_to(450.0);
        assert!(!elemation.trigger());

        host.resize(1280.0, 1200.0); // midpoint 1050
        assert!(elemation.trigger());
    }

    #[test]
    fn test_start_staggers_targets() {
        let host = landing_page();
        let elemation = Elemation::new(Rc::clone(&host));
        elemation.set_selectors(".card");
        elemation.set_interval(Duration::from_millis(300));

        assert_eq!(elemation.start().unwrap(), 3);
        assert_eq!(host.pending_tasks(), 3);

        let targets = cards(&host);
        let [first, second, third] = targets[..] else {
            panic!("expected three cards");
        };

        host.advance(Duration::ZERO);
        assert_eq!(host.class_name(first).as_deref(), Some("card scrolled-to"));
        assert_eq!(host.class_name(second).as_deref(), Some("card"));

        host.advance(299 * MS);
        assert_eq!(host.class_name(second).as_deref(), Some("card"));
        host.advance(MS);
        assert_eq!(host.class_name(second).as_deref(), Some("card scrolled-to"));
        assert_eq!(host.class_name(third).as_deref(), Some("card"));

        host.advance(300 * MS);
        assert_eq!(host.class_name(third).as_deref(), Some("card scrolled-to"));

        let at: Vec<Duration> = host.applied().iter().map(|a| a.at).collect();
        assert_eq!(at, vec![Duration::ZERO, 300 * MS, 600 * MS]);
    }

    #[test]
    fn test_start_twice_duplicates_class() {
        let host = landing_page();
        let elemation = Elemation::new(Rc::clone(&host));
        elemation.set_selectors("#features");

        elemation.start().unwrap();
        elemation.start().unwrap();
        host.run_until_idle();

        assert_eq!(
            host.class_name(features(&host)).as_deref(),
            Some(" scrolled-to scrolled-to")
        );
    }

    #[test]
    fn test_start_with_no_targets() {
        let host = landing_page();
        let elemation = Elemation::new(Rc::clone(&host));
        elemation.set_selectors("article");

        assert_eq!(elemation.start().unwrap(), 0);
        assert_eq!(host.pending_tasks(), 0);
    }

    #[test]
    fn test_start_with_invalid_selector() {
        let elemation = Elemation::new(landing_page());
        elemation.set_selectors("ul > li");

        assert!(matches!(
            elemation.start(),
            Err(ElemationError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_ready_fires_immediately_when_centred() {
        let host = landing_page();
        host.scroll_to(650.0);

        let elemation = Elemation::builder(Rc::clone(&host))
            .trigger("#features")
            .targets(".card")
            .interval(Duration::from_millis(100))
            .build()
            .unwrap();

        assert_eq!(elemation.state(), ActivationState::Fired);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.pending_tasks(), 3);
    }

    #[test]
    fn test_ready_arms_until_scrolled_into_view() {
        let host = landing_page();
        let elemation = Elemation::builder(Rc::clone(&host))
            .trigger("#features")
            .targets(".card")
            .interval(Duration::from_millis(300))
            .build()
            .unwrap();

        host.scroll_to(200.0);
        host.scroll_to(450.0);
        assert_eq!(elemation.state(), ActivationState::Armed);
        assert_eq!(host.pending_tasks(), 0);

        host.scroll_to(650.0);
        assert_eq!(elemation.state(), ActivationState::Fired);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.pending_tasks(), 3);

        // Scrolling away and back does not fire again
        host.scroll_to(0.0);
        host.scroll_to(700.0);
        assert_eq!(host.pending_tasks(), 3);

        assert_eq!(host.run_until_idle(), 3);
        let applied = host.applied();
        assert_eq!(applied.len(), 3);
        assert!(applied.iter().all(|a| a.class == "scrolled-to"));
        assert_eq!(
            applied.iter().map(|a| a.node).collect::<Vec<_>>(),
            cards(&host)
        );
    }

    #[test]
    fn test_ready_twice_is_a_no_op() {
        let host = landing_page();
        let elemation = Elemation::new(Rc::clone(&host));
        elemation.set_selectors(".card");
        elemation.set_endstops("#features").unwrap();
        host.scroll_to(650.0);

        elemation.ready().unwrap();
        assert_eq!(elemation.state(), ActivationState::Fired);
        assert_eq!(host.pending_tasks(), 3);

        elemation.ready().unwrap();
        assert_eq!(elemation.state(), ActivationState::Fired);
        assert_eq!(host.pending_tasks(), 3);
    }

    #[test]
    fn test_ready_twice_while_armed_keeps_single_listener() {
        let host = landing_page();
        let elemation = Elemation::builder(Rc::clone(&host))
            .trigger("#features")
            .targets(".card")
            .build()
            .unwrap();

        elemation.ready().unwrap();

        assert_eq!(elemation.state(), ActivationState::Armed);
        assert_eq!(host.listener_count(), 1);
    }

    #[test]
    fn test_ready_without_endstops_arms_forever() {
        let host = landing_page();
        let elemation = Elemation::new(Rc::clone(&host));

        elemation.ready().unwrap();
        for y in [0.0, 650.0, 5000.0] {
            host.scroll_to(y);
        }

        assert_eq!(elemation.state(), ActivationState::Armed);
        assert_eq!(host.pending_tasks(), 0);
    }

    #[test]
    fn test_listener_error_is_contained() {
        let host = landing_page();
        let elemation = Elemation::builder(Rc::clone(&host))
            .trigger("#features")
            .targets(".card")
            .build()
            .unwrap();
        elemation.set_selectors("a[href]");

        host.scroll_to(650.0);

        assert_eq!(elemation.state(), ActivationState::Fired);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.pending_tasks(), 0);
    }

    #[test]
    fn test_dropped_handle_still_fires() {
        let host = landing_page();
        Elemation::builder(Rc::clone(&host))
            .trigger("#features")
            .targets(".card")
            .build()
            .unwrap();

        host.scroll_to(650.0);

        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.run_until_idle(), 3);
    }

    #[test]
    fn test_clones_share_state() {
        let host = landing_page();
        let elemation = Elemation::new(Rc::clone(&host));
        let other = elemation.clone();

        other.set_append_class("visible");
        other.set_endstops("#features").unwrap();

        assert_eq!(elemation.append_class(), "visible");
        assert_eq!(elemation.top_endstop(), Some(1000.0));
    }

    #[test]
    fn test_min_size_is_inert() {
        let host = landing_page();
        host.scroll_to(650.0);

        let elemation = Elemation::builder(Rc::clone(&host))
            .trigger("#features")
            .targets(".card")
            .min_width(4000.0)
            .min_height(4000.0)
            .build()
            .unwrap();

        assert_eq!(elemation.min_width(), Some(4000.0));
        assert_eq!(elemation.min_height(), Some(4000.0));
        assert_eq!(elemation.state(), ActivationState::Fired);
    }

    #[test]
    fn test_from_config() {
        let host = landing_page();
        let config = ElemationConfig::from_toml_str(
            r##"
            trigger = "#features"
            targets = "div.card"
            interval_ms = 250
            append_class = "in-view"
            "##,
        )
        .unwrap();

        let elemation = Elemation::from_config(Rc::clone(&host), &config).unwrap();
        host.scroll_to(700.0);
        host.run_until_idle();

        assert_eq!(elemation.interval(), Duration::from_millis(250));
        assert_eq!(
            host.applied().last(),
            Some(&AppliedClass {
                at: Duration::from_millis(500),
                node: cards(&host)[2],
                class: "in-view".to_string(),
            })
        );
    }
}
