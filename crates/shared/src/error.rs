use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("simulation runtime has shut down")]
    RuntimeClosed,
    #[error("simulation runtime dropped the reply for {command}")]
    ReplyDropped { command: &'static str },
}
