//! Command types for robot control and inter-task communication.
//!
//! [`Gesture`] is the fixed gamepad vocabulary coming from the remote; each one
//! maps onto exactly one [`MotionCommand`]. The text protocol accepts either a
//! gesture symbol or a routine name followed by an optional step count, one
//! command per line.
use core::fmt::Display;

use heapless::Vec;
use log::warn;

use super::config::MAX_FRAME_COMMANDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Up,
    Down,
    Left,
    Right,
    Triangle,
    Square,
    Circle,
    Cross,
    Start,
    Select,
}

/// Everything the motion task knows how to do. `steps` of `None` means the
/// routine's own default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionCommand {
    Forward(Option<f32>),
    Backward(Option<f32>),
    TurnLeft(Option<f32>),
    TurnRight(Option<f32>),
    OmniWalk {
        steps: Option<f32>,
        side: bool,
        turn_factor: f32,
    },
    UpDown(Option<f32>),
    Dance(Option<f32>),
    MoonwalkLeft(Option<f32>),
    FrontBack(Option<f32>),
    PushUp(Option<f32>),
    Wave(Option<f32>),
    Hide,
    Scared,
    Hello,
    Home,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseCommandError;

impl Display for ParseCommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("unrecognised command")
    }
}

impl TryFrom<&str> for Gesture {
    type Error = ParseCommandError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let symbol = value.trim();
        let gestures = [
            ("UP", Gesture::Up),
            ("DOWN", Gesture::Down),
            ("LEFT", Gesture::Left),
            ("RIGHT", Gesture::Right),
            ("TRIANGLE", Gesture::Triangle),
            ("SQUARE", Gesture::Square),
            ("CIRCLE", Gesture::Circle),
            ("CROSS", Gesture::Cross),
            ("START", Gesture::Start),
            ("SELECT", Gesture::Select),
        ];
        gestures
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(symbol))
            .map(|(_, gesture)| gesture)
            .ok_or(ParseCommandError)
    }
}

impl From<Gesture> for MotionCommand {
    fn from(gesture: Gesture) -> Self {
        match gesture {
            Gesture::Up => MotionCommand::Forward(None),
            Gesture::Down => MotionCommand::Backward(None),
            Gesture::Left => MotionCommand::TurnLeft(None),
            Gesture::Right => MotionCommand::TurnRight(None),
            Gesture::Triangle => MotionCommand::UpDown(None),
            Gesture::Square => MotionCommand::Dance(None),
            Gesture::Circle => MotionCommand::MoonwalkLeft(None),
            Gesture::Cross => MotionCommand::FrontBack(None),
            Gesture::Start => MotionCommand::Home,
            Gesture::Select => MotionCommand::Hide,
        }
    }
}

impl TryFrom<&str> for MotionCommand {
    type Error = ParseCommandError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut tokens = value.split_whitespace();

        let cmd = tokens.next().ok_or(ParseCommandError)?;
        if let Ok(gesture) = Gesture::try_from(cmd) {
            return Ok(gesture.into());
        }

        let steps = match tokens.next() {
            Some(s) => Some(s.parse::<f32>().map_err(|_| ParseCommandError)?),
            None => None,
        };

        let name = |n: &str| n.eq_ignore_ascii_case(cmd);
        let command = if name("forward") {
            MotionCommand::Forward(steps)
        } else if name("backward") {
            MotionCommand::Backward(steps)
        } else if name("turn_left") {
            MotionCommand::TurnLeft(steps)
        } else if name("turn_right") {
            MotionCommand::TurnRight(steps)
        } else if name("omni_left") || name("omni_right") {
            let turn_factor = match tokens.next() {
                Some(s) => s.parse::<f32>().map_err(|_| ParseCommandError)?,
                None => 0.5,
            };
            MotionCommand::OmniWalk {
                steps,
                side: name("omni_right"),
                turn_factor,
            }
        } else if name("up_down") {
            MotionCommand::UpDown(steps)
        } else if name("dance") {
            MotionCommand::Dance(steps)
        } else if name("moonwalk_left") {
            MotionCommand::MoonwalkLeft(steps)
        } else if name("front_back") {
            MotionCommand::FrontBack(steps)
        } else if name("push_up") {
            MotionCommand::PushUp(steps)
        } else if name("wave") {
            MotionCommand::Wave(steps)
        } else if name("hide") {
            MotionCommand::Hide
        } else if name("scared") {
            MotionCommand::Scared
        } else if name("hello") {
            MotionCommand::Hello
        } else if name("home") {
            MotionCommand::Home
        } else {
            return Err(ParseCommandError);
        };
        Ok(command)
    }
}

/// Splits a received frame into commands, one per line. Unrecognised lines are
/// logged and skipped; commands beyond the frame capacity are dropped.
pub fn parse_frame(frame: &str) -> Vec<MotionCommand, MAX_FRAME_COMMANDS> {
    let mut commands = Vec::new();
    for line in frame.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match MotionCommand::try_from(line) {
            Ok(cmd) => {
                if commands.push(cmd).is_err() {
                    warn!("Frame holds more than {MAX_FRAME_COMMANDS} commands, dropping the rest");
                    break;
                }
            }
            Err(_) => warn!("Unrecognised command: {}", line),
        }
    }
    commands
}
