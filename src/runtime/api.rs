//! Command surface: one command in, one display payload out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{
    AvailabilityReport, Booking, CancelOutcome, PassengerKey, PassengerRequest, Pnr,
    ReservationError, ReservationSystem, WaitQueue,
};

/// A single user command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "command", content = "args")]
pub enum Command {
    /// Book passengers under one new PNR.
    Book(Vec<PassengerRequest>),
    /// Show a booking.
    ShowPnr(String),
    /// Cancel a booking.
    Cancel(String),
    /// Add a cabin to the first coach.
    AddCabin,
    /// Add a coach.
    AddCoach,
    /// Dump seat occupancy and counters.
    ShowAvailability,
    /// Stop accepting commands.
    Quit,
}

/// Payload returned for a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "response")]
pub enum CommandResponse {
    /// Booking created.
    Booked {
        /// New PNR.
        pnr: Pnr,
        /// The booking as allocated.
        booking: Booking,
    },
    /// Booking details.
    Booking {
        /// The booking.
        booking: Booking,
    },
    /// Booking cancelled.
    Cancelled {
        /// Released seats and promotions.
        outcome: CancelOutcome,
    },
    /// Cabin added.
    CabinAdded {
        /// Confirmed capacity after growth.
        total_confirmed_seats: u32,
    },
    /// Coach added.
    CoachAdded {
        /// Confirmed capacity after growth.
        total_confirmed_seats: u32,
    },
    /// Seat occupancy dump.
    Availability {
        /// The report.
        report: AvailabilityReport,
    },
    /// Session ended.
    Quit,
}

impl fmt::Display for CommandResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booked { pnr, .. } => write!(f, "Booking Successful. PNR: {pnr}"),
            Self::Booking { booking } => write!(f, "{booking}"),
            Self::Cancelled { outcome } => write!(f, "{outcome}"),
            Self::CabinAdded {
                total_confirmed_seats,
            } => write!(f, "New cabin added. Total confirmed seats: {total_confirmed_seats}"),
            Self::CoachAdded {
                total_confirmed_seats,
            } => write!(f, "New coach added. Total confirmed seats: {total_confirmed_seats}"),
            Self::Availability { report } => write!(f, "{report}"),
            Self::Quit => f.write_str("Thank you!"),
        }
    }
}

impl FromStr for Command {
    type Err = ReservationError;

    /// Parse one command line.
    ///
    /// Accepted forms (keywords are case-insensitive, the console menu
    /// numbers 1-7 work in place of the keyword):
    ///
    /// ```text
    /// book <name> <age> <gender> <pref> [<name> <age> <gender> <pref> ...]
    /// pnr <PNR>
    /// cancel <PNR>
    /// add-cabin
    /// add-coach
    /// availability
    /// quit
    /// ```
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let invalid = || ReservationError::InvalidCommand(line.trim().to_owned());
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().ok_or_else(invalid)?.to_ascii_lowercase();
        let args: Vec<&str> = tokens.collect();

        let command = match (keyword.as_str(), args.as_slice()) {
            ("book" | "1", rest) => Self::Book(parse_passengers(rest).ok_or_else(invalid)?),
            ("pnr" | "show" | "2", [pnr]) => Self::ShowPnr((*pnr).to_owned()),
            ("cancel" | "3", [pnr]) => Self::Cancel((*pnr).to_owned()),
            ("add-cabin" | "cabin" | "4", []) => Self::AddCabin,
            ("add-coach" | "coach" | "5", []) => Self::AddCoach,
            ("availability" | "seats" | "6", []) => Self::ShowAvailability,
            ("quit" | "exit" | "7", []) => Self::Quit,
            _ => return Err(invalid()),
        };
        Ok(command)
    }
}

fn parse_passengers(args: &[&str]) -> Option<Vec<PassengerRequest>> {
    if args.is_empty() || args.len() % 4 != 0 {
        return None;
    }
    args.chunks_exact(4)
        .map(|p| {
            let age = p[1].parse().ok()?;
            Some(PassengerRequest::new(p[0], age, p[2], p[3]))
        })
        .collect()
}

/// Execute one command against the engine.
///
/// # Errors
///
/// Whatever the underlying operation reports; the engine is unchanged on
/// error.
pub fn dispatch<Q: WaitQueue<PassengerKey>>(
    system: &mut ReservationSystem<Q>,
    command: Command,
) -> Result<CommandResponse, ReservationError> {
    tracing::debug!(?command, "dispatching command");
    let response = match command {
        Command::Book(passengers) => {
            let pnr = system.book_ticket(passengers)?;
            let booking = system.show_pnr(pnr.as_str())?.clone();
            CommandResponse::Booked { pnr, booking }
        }
        Command::ShowPnr(pnr) => CommandResponse::Booking {
            booking: system.show_pnr(&pnr)?.clone(),
        },
        Command::Cancel(pnr) => CommandResponse::Cancelled {
            outcome: system.cancel_ticket(&pnr)?,
        },
        Command::AddCabin => CommandResponse::CabinAdded {
            total_confirmed_seats: system.add_cabin()?,
        },
        Command::AddCoach => CommandResponse::CoachAdded {
            total_confirmed_seats: system.add_coach(),
        },
        Command::ShowAvailability => CommandResponse::Availability {
            report: system.availability(),
        },
        Command::Quit => CommandResponse::Quit,
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_book() {
        let cmd: Command = "book Asha 34 F L Ravi 67 M U".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Book(vec![
                PassengerRequest::new("Asha", 34, "F", "L"),
                PassengerRequest::new("Ravi", 67, "M", "U"),
            ])
        );
    }

    #[test]
    fn test_parse_menu_numbers() {
        assert_eq!("2 PNR4".parse::<Command>().unwrap(), Command::ShowPnr("PNR4".into()));
        assert_eq!("3 PNR4".parse::<Command>().unwrap(), Command::Cancel("PNR4".into()));
        assert_eq!("4".parse::<Command>().unwrap(), Command::AddCabin);
        assert_eq!("5".parse::<Command>().unwrap(), Command::AddCoach);
        assert_eq!("6".parse::<Command>().unwrap(), Command::ShowAvailability);
        assert_eq!("7".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("QUIT".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_invalid() {
        for line in ["", "fly", "book", "book a x M L", "book a 3 M", "cancel", "quit now", "8"] {
            assert!(
                matches!(line.parse::<Command>(), Err(ReservationError::InvalidCommand(_))),
                "{line:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_dispatch_round_trip() {
        let mut system = ReservationSystem::default();
        let booked = dispatch(
            &mut system,
            Command::Book(vec![PassengerRequest::new("Asha", 34, "F", "SU")]),
        )
        .unwrap();
        let CommandResponse::Booked { pnr, booking } = booked else {
            panic!("expected a booking");
        };
        assert_eq!(pnr.as_str(), "PNR1");

        let shown = dispatch(&mut system, Command::ShowPnr("PNR1".into())).unwrap();
        assert_eq!(shown, CommandResponse::Booking { booking });

        let cancelled = dispatch(&mut system, Command::Cancel("PNR1".into())).unwrap();
        assert_eq!(cancelled.to_string(), "Booking with PNR PNR1 cancelled.");
        assert_eq!(
            dispatch(&mut system, Command::ShowPnr("PNR1".into())),
            Err(ReservationError::PnrNotFound("PNR1".into()))
        );
    }

    #[test]
    fn test_response_rendering() {
        let mut system = ReservationSystem::default();
        let added = dispatch(&mut system, Command::AddCoach).unwrap();
        assert_eq!(added.to_string(), "New coach added. Total confirmed seats: 30");
        let added = dispatch(&mut system, Command::AddCabin).unwrap();
        assert_eq!(added.to_string(), "New cabin added. Total confirmed seats: 38");
        assert_eq!(dispatch(&mut system, Command::Quit).unwrap().to_string(), "Thank you!");
    }
}
