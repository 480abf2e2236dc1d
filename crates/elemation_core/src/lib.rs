//! Elemation Core
//!
//! Host-independent building blocks for scroll-triggered reveals:
//!
//! - **Geometry**: element [`Bounds`] and the trigger [`Endstops`] window
//! - **Activation FSM**: the one-shot `Dormant → Armed → Fired` lifecycle
//! - **Selectors**: the CSS selector subset understood by in-memory hosts
//! - **Configuration**: TOML-backed [`ElemationConfig`]
//!
//! # Example
//!
//! ```rust
//! use elemation_core::{viewport_midpoint, Bounds, Endstops};
//!
//! let trigger = Bounds::new(0.0, 1000.0, 640.0, 200.0);
//! let endstops = Endstops::from_bounds(&trigger);
//!
//! assert!(!endstops.contains(viewport_midpoint(450.0, 800.0)));
//! assert!(endstops.contains(viewport_midpoint(650.0, 800.0)));
//! ```

pub mod config;
pub mod error;
pub mod fsm;
pub mod geometry;
pub mod selector;

pub use config::{ElemationConfig, DEFAULT_APPEND_CLASS, DEFAULT_INTERVAL_MS, DEFAULT_SELECTORS};
pub use error::{ElemationError, Result};
pub use fsm::{ActivationEvent, ActivationState};
pub use geometry::{viewport_midpoint, Bounds, Endstops};
pub use selector::{CompoundSelector, SelectorList, TypeSelector};
