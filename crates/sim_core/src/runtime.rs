//! Single task driving a [`SimulationController`] from an operator command queue.

use shared::{
    error::SimulationError,
    protocol::{CommandOutcome, ControlCommand, SimulationEvent, SimulationSnapshot},
};
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, info};

use crate::controller::SimulationController;

const COMMAND_QUEUE_CAPACITY: usize = 64;

enum RuntimeRequest {
    Command {
        command: ControlCommand,
        reply: oneshot::Sender<CommandOutcome>,
    },
    Snapshot {
        reply: oneshot::Sender<SimulationSnapshot>,
    },
    Shutdown,
}

pub struct SimulationRuntime {
    controller: SimulationController,
    requests: mpsc::Receiver<RuntimeRequest>,
}

impl SimulationRuntime {
    pub fn new(controller: SimulationController) -> (Self, SimulationHandle) {
        let (tx, requests) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let handle = SimulationHandle {
            tx,
            events: controller.event_sender(),
        };
        (
            Self {
                controller,
                requests,
            },
            handle,
        )
    }

    /// Runs until shutdown is requested or every handle is dropped.
    ///
    /// Commands and timer callbacks are handled one at a time on this task,
    /// commands first when both are ready.
    pub async fn run(mut self) {
        info!("simulation runtime started");
        loop {
            tokio::select! {
                biased;
                request = self.requests.recv() => match request {
                    Some(RuntimeRequest::Command { command, reply }) => {
                        let name = command.name();
                        let outcome = self.controller.apply(command);
                        debug!(command = name, ?outcome, "operator command handled");
                        let _ = reply.send(outcome);
                    }
                    Some(RuntimeRequest::Snapshot { reply }) => {
                        let _ = reply.send(self.controller.snapshot());
                    }
                    Some(RuntimeRequest::Shutdown) | None => break,
                },
                event = self.controller.next_timer_event() => {
                    self.controller.handle_timer_event(event);
                }
            }
        }
        self.controller.release();
        info!("simulation runtime exited");
    }
}

pub fn spawn_simulation(controller: SimulationController) -> (SimulationHandle, JoinHandle<()>) {
    let (runtime, handle) = SimulationRuntime::new(controller);
    let task = tokio::spawn(runtime.run());
    (handle, task)
}

#[derive(Clone)]
pub struct SimulationHandle {
    tx: mpsc::Sender<RuntimeRequest>,
    events: broadcast::Sender<SimulationEvent>,
}

impl SimulationHandle {
    pub async fn send(&self, command: ControlCommand) -> Result<CommandOutcome, SimulationError> {
        let name = command.name();
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RuntimeRequest::Command { command, reply })
            .await
            .map_err(|_| SimulationError::RuntimeClosed)?;
        rx.await
            .map_err(|_| SimulationError::ReplyDropped { command: name })
    }

    pub async fn start(&self) -> Result<CommandOutcome, SimulationError> {
        self.send(ControlCommand::Start).await
    }

    pub async fn pause_or_resume(&self) -> Result<CommandOutcome, SimulationError> {
        self.send(ControlCommand::PauseOrResume).await
    }

    pub async fn stop(&self) -> Result<CommandOutcome, SimulationError> {
        self.send(ControlCommand::Stop).await
    }

    pub async fn set_rate(&self, rate: i64) -> Result<CommandOutcome, SimulationError> {
        self.send(ControlCommand::SetRate { rate }).await
    }

    pub async fn create_moment(&self) -> Result<CommandOutcome, SimulationError> {
        self.send(ControlCommand::CreateMoment).await
    }

    pub async fn send_user_message(
        &self,
        text: impl Into<String>,
    ) -> Result<CommandOutcome, SimulationError> {
        self.send(ControlCommand::SendUserMessage { text: text.into() })
            .await
    }

    pub async fn snapshot(&self) -> Result<SimulationSnapshot, SimulationError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RuntimeRequest::Snapshot { reply })
            .await
            .map_err(|_| SimulationError::RuntimeClosed)?;
        rx.await
            .map_err(|_| SimulationError::ReplyDropped { command: "snapshot" })
    }

    pub async fn shutdown(&self) -> Result<(), SimulationError> {
        self.tx
            .send(RuntimeRequest::Shutdown)
            .await
            .map_err(|_| SimulationError::RuntimeClosed)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SimulationEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
