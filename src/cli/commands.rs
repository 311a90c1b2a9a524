//! Interactive session commands

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A command typed at the session prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Start,
    Stop,
    Save,
    Status,
    Log,
    Help,
    Quit,
}

impl UserCommand {
    pub const ALL: &'static [UserCommand] = &[
        Self::Start,
        Self::Stop,
        Self::Save,
        Self::Status,
        Self::Log,
        Self::Help,
        Self::Quit,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Save => "save",
            Self::Status => "status",
            Self::Log => "log",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::Start => "Start capture (pick a window)",
            Self::Stop => "Stop capture",
            Self::Save => "Save the recording as screen-capture.webm",
            Self::Status => "Show capture state",
            Self::Log => "Print the full log",
            Self::Help => "Show this help",
            Self::Quit => "Stop capture and exit",
        }
    }
}

impl fmt::Display for UserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown command: \"{0}\". Type 'help' for a list of commands")]
pub struct UnknownCommand(pub String);

impl FromStr for UserCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" | "s" => Ok(Self::Start),
            "stop" | "x" => Ok(Self::Stop),
            "save" | "w" => Ok(Self::Save),
            "status" => Ok(Self::Status),
            "log" | "l" => Ok(Self::Log),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(UnknownCommand(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("start".parse::<UserCommand>().unwrap(), UserCommand::Start);
        assert_eq!(" STOP ".parse::<UserCommand>().unwrap(), UserCommand::Stop);
        assert_eq!("w".parse::<UserCommand>().unwrap(), UserCommand::Save);
        assert_eq!("exit".parse::<UserCommand>().unwrap(), UserCommand::Quit);
    }

    #[test]
    fn unknown_command_keeps_input() {
        let err = "record".parse::<UserCommand>().unwrap_err();
        assert_eq!(err, UnknownCommand("record".to_string()));
        assert!(err.to_string().contains("help"));
    }

    #[test]
    fn every_command_round_trips_through_its_name() {
        for command in UserCommand::ALL {
            assert_eq!(command.as_str().parse::<UserCommand>().unwrap(), *command);
        }
    }
}
