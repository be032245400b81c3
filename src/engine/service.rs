//! Remap engine with statum state machine for per-pad processing
//!
//! Implements a 5-state lifecycle with compile-time state safety. Each
//! engine serves exactly one pad slot, runs in its own tokio task and pulls
//! profile snapshots fresh for every report, so a reload is picked up
//! without restarting anything.
//!
//! # State Machine
//!
//! ```text
//! Initializing ──► Configured ──► Active ──► Deactivating ──► Deactivated
//!                     │              │           ▲
//!                     └──────────────┘           │
//!                       (activate/deactivate)    │
//!                                              (shutdown)
//! ```
//!
//! # Architecture
//!
//! ```text
//! InputReport ──► [ReportMapper] ──► OutputFrame ──► VirtualPadSink
//!       ▲               │
//!       │           KeyEvents ──► KeyInjector
//!   Input Channel
//! ```

use crate::engine::{EngineError, ReportMapper};
use crate::profile::ProfileStore;
use crate::report::{InputReport, OutputFrame};
use statum::{machine, state};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// States for remap engine lifecycle using statum
#[state]
#[derive(Debug, Clone)]
pub enum RemapEngineState {
    Initializing, // Setting up engine structure
    Configured,   // Mapper installed and ready
    Active,       // Processing reports in main loop
    Deactivating, // Shutting down gracefully
    Deactivated,  // Fully stopped, ready for cleanup
}

/// Remap engine with compile-time state safety via statum
///
/// Wraps one pad slot's [`ReportMapper`] and manages its lifecycle through
/// distinct states. Each state has specific allowed operations enforced at
/// compile time.
#[machine]
pub struct RemapEngine<S: RemapEngineState> {
    input_receiver: mpsc::Receiver<InputReport>,
    pad_slot: u8,
    name: String,
    mapper: Option<ReportMapper>,
    profiles: Arc<ProfileStore>,
}

impl<S: RemapEngineState> RemapEngine<S> {
    pub fn get_pad_slot(&self) -> u8 {
        self.pad_slot
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }
}

impl RemapEngine<Initializing> {
    pub fn create(
        input_receiver: mpsc::Receiver<InputReport>,
        pad_slot: u8,
        profiles: Arc<ProfileStore>,
    ) -> Self {
        let name = format!("pad-{}", pad_slot);
        info!("Initializing new remap engine: {}", name);

        Self::new(
            input_receiver,
            pad_slot,
            name,
            None, // mapper
            profiles,
        )
    }

    /// Installs the mapper and transitions to Configured state
    pub fn configure(mut self, mapper: ReportMapper) -> RemapEngine<Configured> {
        info!("Configuring remap engine: {}", self.name);
        self.mapper = Some(mapper);
        self.transition()
    }
}

impl RemapEngine<Configured> {
    pub fn activate(self) -> RemapEngine<Active> {
        info!("Activating remap engine: {}", self.name);
        self.transition()
    }
}

impl RemapEngine<Active> {
    /// Runs one report through the mapper
    ///
    /// Fetches the current profile snapshot first, so profile reloads take
    /// effect on the very next report.
    pub async fn process_report(
        &mut self,
        report: InputReport,
    ) -> Result<OutputFrame, EngineError> {
        let mapper = match &mut self.mapper {
            Some(m) => m,
            None => {
                return Err(EngineError::ProcessingError(
                    "No mapper available".to_string(),
                ))
            }
        };

        let snapshot = self.profiles.snapshot().await;
        let frame = mapper.process(&report, &snapshot);
        debug!(
            "Report for pad {} mapped, buttons {:#06x}",
            self.pad_slot, frame.buttons
        );
        Ok(frame)
    }

    /// Main processing loop with graceful shutdown support
    ///
    /// Runs until the shutdown signal arrives or the input channel closes.
    /// Individual report errors are logged and never stop the loop.
    pub async fn run_until_shutdown(
        mut self,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<RemapEngine<Deactivating>, EngineError> {
        info!("Starting report processing loop for: {}", self.name);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutdown signal received for: {}", self.name);
                    break;
                }

                received = self.input_receiver.recv() => {
                    match received {
                        Some(report) => {
                            if let Err(e) = self.process_report(report).await {
                                error!("Error processing report: {}", e);
                            }
                        }
                        None => {
                            info!("Input channel closed for: {}", self.name);
                            break;
                        }
                    }
                }
            }
        }

        info!("Transitioning to Deactivating state: {}", self.name);
        Ok(self.transition())
    }

    pub fn deactivate(self) -> RemapEngine<Deactivating> {
        info!("Deactivating remap engine: {}", self.name);
        self.transition()
    }
}

impl RemapEngine<Deactivating> {
    /// Drops the mapper and transitions to Deactivated state
    pub fn shutdown(mut self) -> RemapEngine<Deactivated> {
        info!("Shutting down remap engine: {}", self.name);

        // Mapper samt Turbo-Arena verwerfen
        self.mapper = None;

        info!("Engine shut down successfully: {}", self.name);
        self.transition()
    }
}

impl RemapEngine<Deactivated> {}

/// Handle for managing a remap engine in a tokio task
///
/// Provides lifecycle management for engines running in background tasks.
/// Handles task spawning, graceful shutdown, and resource cleanup.
#[derive(Debug)]
pub struct RemapEngineHandle {
    pub pad_slot: u8,

    pub name: String,

    task_handle: Option<JoinHandle<Result<(), EngineError>>>,

    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl RemapEngineHandle {
    pub fn new(pad_slot: u8) -> Self {
        Self {
            pad_slot,
            name: format!("pad-{}", pad_slot),
            task_handle: None,
            shutdown_tx: None,
        }
    }

    /// Starts the engine in a tokio task and returns the report sender
    ///
    /// Creates the engine, configures it with the mapper, activates it, and
    /// spawns the main processing loop in a background task.
    pub fn start(
        &mut self,
        mapper: ReportMapper,
        profiles: Arc<ProfileStore>,
    ) -> Result<mpsc::Sender<InputReport>, EngineError> {
        let (report_sender, report_receiver) = mpsc::channel(256);
        let engine_name = self.name.clone();

        let engine = RemapEngine::create(report_receiver, self.pad_slot, profiles)
            .configure(mapper);
        let active_engine = engine.activate();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);
        let task_handle = tokio::spawn(async move {
            info!("Spawning running engine: {}", engine_name);
            match active_engine.run_until_shutdown(shutdown_rx).await {
                Ok(deactivating_engine) => {
                    info!("Engine entering deactivating state: {}", engine_name);
                    let _ = deactivating_engine.shutdown();
                    Ok(())
                }
                Err(e) => {
                    error!("Error running engine: {} - {}", engine_name, e);
                    Err(e)
                }
            }
        });

        self.task_handle = Some(task_handle);

        info!("Remap engine activated: {}", self.name);
        Ok(report_sender)
    }

    /// Gracefully shuts down the engine and waits for task completion
    pub async fn shutdown(&mut self) -> Result<(), EngineError> {
        debug!("Sending shutdown signal to engine: {}", self.name);

        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(()).is_err() {
                warn!("Engine task already terminated: {}", self.name);
            }
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => {
                    debug!("Engine task completed: {}", self.name);
                    result
                }
                Err(e) => {
                    error!("Engine task panicked: {} - {}", self.name, e);
                    Err(EngineError::ThreadError(format!(
                        "Engine task panicked: {}",
                        e
                    )))
                }
            }
        } else {
            debug!("Engine already shut down: {}", self.name);
            Ok(())
        }
    }
}
