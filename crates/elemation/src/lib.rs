//! Elemation
//!
//! Scroll-triggered, staggered class reveals. Once the vertical centre of the
//! viewport enters a trigger element, a class is appended to each target
//! element, one every `interval`.
//!
//! # Hosts
//!
//! The component talks to its environment only through the [`Host`] trait:
//!
//! - [`headless::HeadlessHost`] - in-memory page with a virtual clock, for tests and tooling
//! - `web::WebHost` - the browser, via `web-sys` and `gloo` (feature `web`)
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
//! for _ in 0..3 {
//!     host.push(HeadlessElement::new("div").with_class("card"));
//! }
//!
//! let elemation = Elemation::builder(Rc::clone(&host))
//!     .trigger("#features")
//!     .targets(".card")
//!     .interval(Duration::from_millis(300))
//!     .build()?;
//!
//! host.scroll_to(650.0);
//! host.run_until_idle();
//!
//! assert!(elemation.state().is_fired());
//! assert_eq!(host.applied().len(), 3);
//! # Ok::<(), elemation::ElemationError>(())
//! ```

mod elemation;
pub mod headless;
pub mod host;

#[cfg(feature = "web")]
pub mod web;

pub use crate::elemation::{Elemation, ElemationBuilder};
pub use host::{Host, ListenerId, ScrollListener, Task};

pub use elemation_core::{
    viewport_midpoint, ActivationEvent, ActivationState, Bounds, ElemationConfig,
    ElemationError, Endstops, Result,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::elemation::{Elemation, ElemationBuilder};
    pub use crate::headless::{HeadlessElement, HeadlessHost};
    pub use crate::host::Host;
    pub use elemation_core::{ActivationState, ElemationConfig, ElemationError, Endstops};
}
