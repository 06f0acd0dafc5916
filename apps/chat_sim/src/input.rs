//! Operator input lines to simulation commands.

use shared::protocol::ControlCommand;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  /start          start the simulation
  /pause          pause or resume
  /stop           stop and clear the chat
  /rate <n>       messages per second (1-200)
  /moment         5x spike for two seconds
  /status         show mode and rate
  /help           this text
  /quit           exit
anything else is sent as your own message (start with // to send a leading /)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorInput {
    Command(ControlCommand),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command '/{0}', try /help")]
    UnknownCommand(String),
    #[error("/{command} needs an argument")]
    MissingArgument { command: &'static str },
    #[error("'{0}' is not a message rate")]
    InvalidRate(String),
}

pub fn parse_operator_line(line: &str) -> Result<OperatorInput, InputError> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(escaped) = line.strip_prefix("//") {
        return Ok(send(format!("/{escaped}")));
    }
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Ok(send(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let input = match name.as_str() {
        "start" => OperatorInput::Command(ControlCommand::Start),
        "pause" | "resume" => OperatorInput::Command(ControlCommand::PauseOrResume),
        "stop" => OperatorInput::Command(ControlCommand::Stop),
        "moment" => OperatorInput::Command(ControlCommand::CreateMoment),
        "rate" => {
            let raw = parts
                .next()
                .ok_or(InputError::MissingArgument { command: "rate" })?;
            let rate = raw
                .parse::<i64>()
                .map_err(|_| InputError::InvalidRate(raw.to_string()))?;
            OperatorInput::Command(ControlCommand::SetRate { rate })
        }
        "status" => OperatorInput::Status,
        "help" | "?" => OperatorInput::Help,
        "quit" | "exit" => OperatorInput::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(input)
}

fn send(text: String) -> OperatorInput {
    OperatorInput::Command(ControlCommand::SendUserMessage { text })
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
