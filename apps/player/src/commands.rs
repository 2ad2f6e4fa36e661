//! Viewer commands read from stdin.

use shared::StepId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Previous,
    GoTo(StepId),
    Status,
    Quit,
}

impl NavCommand {
    /// An empty line advances, like pressing the "next" button.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "" | "n" | "next" => Some(NavCommand::Next),
            "p" | "prev" | "previous" => Some(NavCommand::Previous),
            "s" | "status" => Some(NavCommand::Status),
            "q" | "quit" | "exit" => Some(NavCommand::Quit),
            _ => line.parse().ok().map(|index| NavCommand::GoTo(StepId(index))),
        }
    }
}

pub const HELP: &str = "commands: [enter]/n next, p previous, <number> jump, s status, q quit";
