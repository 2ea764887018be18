//! Ground-station commands received over the telemetry link
//!
//! One command per line, words separated by spaces:
//!
//! ```text
//! drive 40% 35%
//! stop
//! ```
//!
//! Duty values take any ratio literal the units module accepts.

use rover_core::units::Ratio;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveCommand {
    Stop,
    Run { left: Ratio, right: Ratio },
}

impl defmt::Format for DriveCommand {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DriveCommand::Stop => defmt::write!(f, "Stop"),
            DriveCommand::Run { left, right } => {
                defmt::write!(f, "Run({}%, {}%)", left.percent(), right.percent())
            }
        }
    }
}

/// Parse one line, `None` if it is not a command
pub fn parse_command(line: &str) -> Option<DriveCommand> {
    let mut words = line.split_whitespace();
    let command = match words.next()? {
        "stop" => DriveCommand::Stop,
        "drive" => {
            let left = words.next()?.parse().ok()?;
            let right = words.next()?.parse().ok()?;
            DriveCommand::Run { left, right }
        }
        _ => return None,
    };
    if words.next().is_some() {
        return None;
    }
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stop() {
        assert_eq!(parse_command("stop"), Some(DriveCommand::Stop));
        assert_eq!(parse_command("  stop\r"), Some(DriveCommand::Stop));
    }

    #[test]
    fn test_parse_drive() {
        assert_eq!(
            parse_command("drive 40% 35%"),
            Some(DriveCommand::Run {
                left: Ratio::from_percent(40.0),
                right: Ratio::from_percent(35.0),
            })
        );
    }

    #[test]
    fn test_reject_malformed() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("drive 40%"), None);
        assert_eq!(parse_command("drive fast slow"), None);
        assert_eq!(parse_command("stop now"), None);
        assert_eq!(parse_command("reverse"), None);
    }
}
