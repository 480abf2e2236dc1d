//! Scroll session replay
//!
//! Builds the fixture's page on a [`HeadlessHost`], attaches an elemation and
//! replays the scroll steps on the virtual clock.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use elemation::headless::HeadlessHost;
use elemation::{viewport_midpoint, ActivationState, Elemation, Host};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::PageConfig;

/// Outcome of a replayed session
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub state: ActivationStateName,
    pub endstops: Option<EndstopsReport>,
    /// Virtual time at which the elemation fired
    pub fired_at_ms: Option<u64>,
    pub steps: Vec<StepReport>,
    pub applied: Vec<AppliedReport>,
    /// Total virtual time elapsed, including draining pending tasks
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActivationStateName(&'static str);

impl From<ActivationState> for ActivationStateName {
    fn from(state: ActivationState) -> Self {
        Self(state.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EndstopsReport {
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub at_ms: u64,
    pub y: f32,
    pub midpoint: f32,
    pub state: ActivationStateName,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedReport {
    pub at_ms: u64,
    /// Document-order index of the element
    pub element: usize,
    /// `tag#id.class` description of the element before the reveal
    pub label: String,
    pub class: String,
    /// Class string after the append
    pub class_name: String,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Replay the fixture's scroll session
pub fn run(page: &PageConfig) -> Result<SimulationReport> {
    let host = page.build_host();
    let labels = element_labels(page);

    let elemation = Elemation::from_config(Rc::clone(&host), &page.elemation)
        .context("Failed to attach elemation to the page")?;
    if !elemation.is_ready() {
        debug!("elemation is dormant: fixture needs both `trigger` and `targets` to activate it");
    }

    let mut fired_at = elemation.state().is_fired().then(|| host.now());
    let mut steps = Vec::with_capacity(page.scroll.len());

    for step in &page.scroll {
        host.scroll_to(step.y);

        let state = elemation.state();
        if fired_at.is_none() && state.is_fired() {
            info!("fired at scroll offset {}", step.y);
            fired_at = Some(host.now());
        }

        let (_, viewport_height) = host.viewport_size();
        steps.push(StepReport {
            at_ms: millis(host.now()),
            y: step.y,
            midpoint: viewport_midpoint(step.y, viewport_height),
            state: state.into(),
        });

        host.advance(Duration::from_millis(step.wait_ms));
    }

    let drained = host.run_until_idle();
    debug!("drained {} pending task(s)", drained);

    Ok(SimulationReport {
        state: elemation.state().into(),
        endstops: elemation.endstops().map(|e| EndstopsReport {
            top: e.top(),
            bottom: e.bottom(),
        }),
        fired_at_ms: fired_at.map(millis),
        steps,
        applied: applied_report(&host, &labels),
        elapsed_ms: millis(host.now()),
    })
}

fn element_labels(page: &PageConfig) -> Vec<String> {
    page.elements
        .iter()
        .map(|element| {
            let mut label = element.tag.clone();
            if let Some(id) = &element.id {
                label.push('#');
                label.push_str(id);
            }
            for class in element.class.split_whitespace() {
                label.push('.');
                label.push_str(class);
            }
            label
        })
        .collect()
}

fn applied_report(host: &HeadlessHost, labels: &[String]) -> Vec<AppliedReport> {
    host.applied()
        .into_iter()
        .map(|applied| {
            let index = applied.node.index();
            AppliedReport {
                at_ms: millis(applied.at),
                element: index,
                label: labels.get(index).cloned().unwrap_or_default(),
                class: applied.class,
                class_name: host.class_name(applied.node).unwrap_or_default(),
            }
        })
        .collect()
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State: {}", self.state.0)?;
        match self.endstops {
            Some(e) => writeln!(f, "Endstops: {}..{}", e.top, e.bottom)?,
            None => writeln!(f, "Endstops: not measured")?,
        }
        match self.fired_at_ms {
            Some(at) => writeln!(f, "Fired at: {}ms", at)?,
            None => writeln!(f, "Fired at: never")?,
        }

        writeln!(f)?;
        writeln!(f, "Scroll steps:")?;
        for step in &self.steps {
            writeln!(
                f,
                "  {:>6}ms  y={:<8} midpoint={:<8} {}",
                step.at_ms, step.y, step.midpoint, step.state.0
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Applied classes:")?;
        if self.applied.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for applied in &self.applied {
            writeln!(
                f,
                "  {:>6}ms  [{}] {:<24} +{}",
                applied.at_ms, applied.element, applied.label, applied.class
            )?;
        }

        write!(f, "\nElapsed: {}ms", self.elapsed_ms)
    }
}
