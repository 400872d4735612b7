//! Background worker for running simulations off the caller's thread.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use paramsim_core::error::SimulationError;
use paramsim_core::metrics::TracingObserver;
use paramsim_core::model::{Parameter, RunReport};
use paramsim_core::progress::RunStage;
use paramsim_core::{RunConfig, RunProgress, run_simulation};

/// Request sent to the background worker
#[derive(Debug)]
pub enum SimulationRequest {
    /// Run the full pipeline on a parameter list
    Run {
        parameters: Vec<Parameter>,
        config: RunConfig,
    },
    /// Graceful shutdown
    Shutdown,
}

/// Response from the background worker
#[derive(Debug)]
pub enum SimulationResponse {
    /// Run finished (boxed to keep the enum small)
    Complete(Box<RunReport>),
    /// Run was cancelled
    Cancelled,
    /// Invalid input or a failure inside the run
    Error(String),
}

/// Background worker that runs simulations on a separate thread
pub struct SimulationWorker {
    request_tx: Sender<SimulationRequest>,
    response_rx: Receiver<SimulationResponse>,
    progress: RunProgress,
    thread: Option<JoinHandle<()>>,
}

impl SimulationWorker {
    /// Create a new simulation worker with a background thread
    pub fn new() -> Self {
        let (request_tx, request_rx) = channel();
        let (response_tx, response_rx) = channel();
        let progress = RunProgress::new();

        let ctx = WorkerContext {
            response_tx,
            progress: progress.clone(),
        };

        let thread = thread::spawn(move || {
            ctx.run(request_rx);
        });

        Self {
            request_tx,
            response_rx,
            progress,
            thread: Some(thread),
        }
    }

    /// Queue a run. Returns false if the worker thread is gone.
    pub fn send(&self, request: SimulationRequest) -> bool {
        self.progress.restart();
        self.request_tx.send(request).is_ok()
    }

    /// Convenience wrapper around [`SimulationRequest::Run`]
    pub fn run(&self, parameters: Vec<Parameter>, config: RunConfig) -> bool {
        self.send(SimulationRequest::Run { parameters, config })
    }

    /// Try to receive a response (non-blocking)
    pub fn try_recv(&self) -> Option<SimulationResponse> {
        self.response_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for a response
    pub fn recv_timeout(&self, timeout: Duration) -> Result<SimulationResponse, RecvTimeoutError> {
        self.response_rx.recv_timeout(timeout)
    }

    /// Block until the next response
    pub fn recv(&self) -> Option<SimulationResponse> {
        self.response_rx.recv().ok()
    }

    /// Sensitivity passes finished so far and the number expected
    pub fn progress(&self) -> (usize, usize) {
        (
            self.progress.passes_completed(),
            self.progress.passes_total(),
        )
    }

    /// Stage the current run has reached
    pub fn stage(&self) -> RunStage {
        self.progress.stage()
    }

    /// Request cancellation of the current run
    pub fn cancel(&self) {
        self.progress.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.progress.is_cancelled()
    }

    /// Shutdown the worker thread
    pub fn shutdown(&self) {
        let _ = self.request_tx.send(SimulationRequest::Shutdown);
    }
}

impl Default for SimulationWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SimulationWorker {
    fn drop(&mut self) {
        self.cancel();
        self.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// State owned by the worker thread
struct WorkerContext {
    response_tx: Sender<SimulationResponse>,
    progress: RunProgress,
}

impl WorkerContext {
    fn run(&self, request_rx: Receiver<SimulationRequest>) {
        while let Ok(request) = request_rx.recv() {
            match request {
                SimulationRequest::Shutdown => break,

                SimulationRequest::Run { parameters, config } => {
                    tracing::info!(
                        parameters = parameters.len(),
                        iterations = config.iterations,
                        "Starting simulation"
                    );

                    let response = match run_simulation(
                        &parameters,
                        &config,
                        &mut TracingObserver,
                        Some(&self.progress),
                    ) {
                        Ok(report) => SimulationResponse::Complete(Box::new(report)),
                        Err(SimulationError::Cancelled) => SimulationResponse::Cancelled,
                        Err(e) => {
                            tracing::warn!(error = %e, "Simulation failed");
                            SimulationResponse::Error(e.to_string())
                        }
                    };

                    if self.response_tx.send(response).is_err() {
                        break;
                    }
                }
            }
        }
    }
}
