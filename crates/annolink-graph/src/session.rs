//! Per-frame driving: configuration snapshots and most-recent-wins results.
//!
//! The UI may change the angle and distance settings at any time, while
//! passes run on a timer or a draw callback. [`SharedConfig`] hands each
//! pass an owned snapshot taken at its start, so a pass never sees a
//! setting change halfway through. [`LatestFrame`] keeps only the newest
//! pass's result: a pass that finishes after a newer one has published is
//! dropped instead of overwriting fresher annotations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::debug;

use crate::select::select_connections;
use crate::spatial::SpatialMapper;
use crate::types::{AcceptedConnection, ConnectorConfig, ConnectorError, Point};

/// Configuration shared between the UI and the pass driver.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<ConnectorConfig>>,
}

impl SharedConfig {
    /// Wrap a configuration after validating it.
    ///
    /// # Errors
    ///
    /// Any error from [`ConnectorConfig::validate`].
    pub fn new(config: ConnectorConfig) -> Result<Self, ConnectorError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(config)),
        })
    }

    /// Owned copy of the current configuration.
    #[must_use]
    pub fn snapshot(&self) -> ConnectorConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the configuration. Invalid input leaves it unchanged.
    ///
    /// # Errors
    ///
    /// Any error from [`ConnectorConfig::validate`].
    pub fn update(&self, config: ConnectorConfig) -> Result<(), ConnectorError> {
        config.validate()?;
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    /// Apply raw text fields from the settings form (angle, distance
    /// from, distance to). Invalid input leaves the configuration
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Any error from [`ConnectorConfig::with_fields`].
    pub fn update_fields(&self, angle: &str, from: &str, to: &str) -> Result<(), ConnectorError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = guard.clone().with_fields(angle, from, to)?;
        Ok(())
    }
}

/// Result of one completed pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    /// Monotonic pass number, assigned when the pass started.
    pub generation: u64,
    /// Configuration snapshot the pass ran with.
    pub config: ConnectorConfig,
    pub connections: Vec<AcceptedConnection>,
}

/// Handle for a pass in flight, obtained from [`LatestFrame::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a pass ticket is needed to publish the pass result"]
pub struct PassTicket {
    generation: u64,
}

impl PassTicket {
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Most-recent-wins slot for pass results.
#[derive(Debug, Default)]
pub struct LatestFrame {
    next_generation: AtomicU64,
    slot: Mutex<Option<Arc<FrameResult>>>,
}

impl LatestFrame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new pass. Later calls always get higher generations.
    pub fn begin(&self) -> PassTicket {
        PassTicket {
            generation: self.next_generation.fetch_add(1, Ordering::Relaxed) + 1,
        }
    }

    /// Store a finished pass unless a newer one has already been stored.
    ///
    /// Returns whether the result was stored.
    pub fn publish(
        &self,
        ticket: PassTicket,
        config: ConnectorConfig,
        connections: Vec<AcceptedConnection>,
    ) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = slot.as_ref()
            && current.generation >= ticket.generation
        {
            debug!(
                "dropping stale pass {} (pass {} already published)",
                ticket.generation, current.generation,
            );
            return false;
        }
        *slot = Some(Arc::new(FrameResult {
            generation: ticket.generation,
            config,
            connections,
        }));
        true
    }

    /// The newest published result, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<FrameResult>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget the published result, e.g. when the tracking session resets.
    pub fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Drives selection passes against shared configuration and a shared
/// result slot.
#[derive(Debug, Clone, Default)]
pub struct Connector {
    config: SharedConfig,
    frames: Arc<LatestFrame>,
}

impl Connector {
    #[must_use]
    pub fn new(config: SharedConfig) -> Self {
        Self {
            config,
            frames: Arc::new(LatestFrame::new()),
        }
    }

    /// The configuration handle, for the settings UI.
    #[must_use]
    pub const fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// The result slot, for the renderer.
    #[must_use]
    pub fn frames(&self) -> Arc<LatestFrame> {
        Arc::clone(&self.frames)
    }

    /// Run one pass over `points`.
    ///
    /// Takes a configuration snapshot first, selects, then publishes.
    /// Returns the pass result whether or not it was superseded.
    pub fn run_pass(&self, points: &[Point], mapper: &dyn SpatialMapper) -> FrameResult {
        let ticket = self.frames.begin();
        let config = self.config.snapshot();
        let connections = select_connections(points, &config, mapper);
        self.frames
            .publish(ticket, config.clone(), connections.clone());
        FrameResult {
            generation: ticket.generation,
            config,
            connections,
        }
    }
}
