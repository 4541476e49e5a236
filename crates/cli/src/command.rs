use std::path::PathBuf;
use std::str::FromStr;

use facecam_core::camera::domain::facing_mode::FacingMode;
use facecam_core::shared::geometry::DisplaySize;

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Devices,
    Facing(FacingMode),
    Start,
    Stop,
    Register,
    /// Sets the name being registered; the rest of the line, untrimmed.
    Name(String),
    Submit,
    Cancel,
    Recognize,
    Status,
    Overlay(PathBuf),
    Display(DisplaySize),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (trimmed, ""),
        };
        let arg = rest.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "devices" => Command::Devices,
            "facing" => Command::Facing(required(word, arg)?.parse()?),
            "start" => Command::Start,
            "stop" => Command::Stop,
            "register" => Command::Register,
            "name" => Command::Name(rest.to_string()),
            "submit" => Command::Submit,
            "cancel" => Command::Cancel,
            "recognize" => Command::Recognize,
            "status" => Command::Status,
            "overlay" => Command::Overlay(PathBuf::from(required(word, arg)?)),
            "display" => Command::Display(required(word, arg)?.parse()?),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => return Err("Empty command; type 'help' for a list".to_string()),
            other => return Err(format!("Unknown command '{other}'; type 'help' for a list")),
        };
        Ok(command)
    }
}

fn required<'a>(word: &str, arg: &'a str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("'{word}' needs an argument"))
    } else {
        Ok(arg)
    }
}
