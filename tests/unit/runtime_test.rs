//! Tests for the shared handle and the serialized command service

use std::sync::Arc;
use std::thread;

use railway_reservation::core::{PassengerRequest, ReservationError, ReservationSystem};
use railway_reservation::runtime::{Command, CommandResponse, ReservationService, SharedReservation};

fn book(name: &str) -> Command {
    Command::Book(vec![PassengerRequest::new(name, 30, "M", "L")])
}

#[test]
fn test_shared_reservation_serializes_commands() {
    let shared = SharedReservation::new(ReservationSystem::default());
    let mut handles = Vec::new();

    for t in 0..4 {
        let shared = shared.clone();
        handles.push(thread::spawn(move || {
            for i in 0..5 {
                shared.execute(book(&format!("t{t}p{i}"))).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    shared.read(|system| {
        let counters = system.counters();
        assert_eq!(counters.confirmed, 14);
        assert_eq!(counters.rac, 2);
        assert_eq!(counters.waiting, 4);
        assert_eq!(system.registry().len(), 20);
        system.check_invariants().unwrap();
    });
}

#[test]
fn test_service_executes_in_order() {
    let service = ReservationService::spawn(ReservationSystem::default(), 4).unwrap();

    let response = service.execute(book("a")).unwrap();
    let CommandResponse::Booked { pnr, .. } = response else {
        panic!("expected booking");
    };
    assert_eq!(pnr.as_str(), "PNR1");

    assert_eq!(
        service.execute(Command::ShowPnr("PNR9".into())),
        Err(ReservationError::PnrNotFound("PNR9".into()))
    );
    assert!(matches!(
        service.execute(Command::Cancel("PNR1".into())),
        Ok(CommandResponse::Cancelled { .. })
    ));

    let system = service.shutdown().unwrap();
    assert!(system.registry().is_empty());
    assert!(matches!(service.execute(book("b")), Err(ReservationError::ServiceStopped)));
    assert!(matches!(service.shutdown(), Err(ReservationError::ServiceStopped)));
}

#[test]
fn test_service_many_producers() {
    let service = Arc::new(ReservationService::spawn(ReservationSystem::default(), 2).unwrap());
    let mut handles = Vec::new();

    for t in 0..4 {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            for i in 0..10 {
                service.execute(book(&format!("t{t}p{i}"))).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let system = service.shutdown().unwrap();
    let counters = system.counters();
    assert_eq!(counters.confirmed, 14);
    assert_eq!(counters.rac, 2);
    assert_eq!(counters.waiting, 24);
    system.check_invariants().unwrap();
}

#[test]
fn test_service_quit_stops_worker() {
    let service = ReservationService::spawn(ReservationSystem::default(), 4).unwrap();
    assert_eq!(service.execute(Command::Quit).unwrap(), CommandResponse::Quit);
    assert!(matches!(service.execute(Command::AddCoach), Err(ReservationError::ServiceStopped)));
    assert!(service.shutdown().is_ok());
}

#[test]
fn test_service_rejects_zero_depth() {
    assert!(matches!(
        ReservationService::spawn(ReservationSystem::default(), 0),
        Err(ReservationError::InvalidConfig(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_service_async_execute() {
    let service = ReservationService::spawn(ReservationSystem::default(), 8).unwrap();

    let added = service.execute_async(Command::AddCoach).await.unwrap();
    assert_eq!(added, CommandResponse::CoachAdded { total_confirmed_seats: 30 });

    let parsed: Command = "cancel PNR3".parse().unwrap();
    assert_eq!(
        service.execute_async(parsed).await,
        Err(ReservationError::PnrNotFound("PNR3".into()))
    );

    let report = service.execute_async(Command::ShowAvailability).await.unwrap();
    let CommandResponse::Availability { report } = report else {
        panic!("expected availability");
    };
    assert_eq!(report.coaches.len(), 2);
    assert_eq!(report.free_seats(), 32);
}
