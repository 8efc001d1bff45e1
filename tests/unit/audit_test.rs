//! Tests for audit sinks

use railway_reservation::builders::ReservationBuilder;
use railway_reservation::core::{
    build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, PassengerRequest,
    SharedAuditSink,
};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(
        AuditAction::Confirmed,
        Some("PNR1"),
        Some("Asha"),
        Some("Lower".to_string()),
    );

    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].event_id, event.event_id);
    assert_eq!(events[0].pnr.as_deref(), Some("PNR1"));
    assert_eq!(events[0].action, AuditAction::Confirmed);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(AuditAction::Booked, Some("PNR1"), None, None));
    sink.record(build_audit_event(AuditAction::Booked, Some("PNR2"), None, None));
    sink.record(build_audit_event(AuditAction::Booked, Some("PNR3"), None, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].pnr.as_deref(), Some("PNR2")); // First one popped
    assert_eq!(events[1].pnr.as_deref(), Some("PNR3"));
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(AuditAction::CoachAdded, None, None, Some("total 30".into()));

    assert_eq!(event.action, AuditAction::CoachAdded);
    assert_eq!(event.pnr, None);
    assert_eq!(event.detail, Some("total 30".to_string()));
    assert!(event.created_at_ms > 0);
    assert_eq!(event.event_id.len(), 36);
}

#[test]
fn test_engine_records_booking_and_promotions() {
    let sink = SharedAuditSink::new(64);
    let mut system = ReservationBuilder::default()
        .with_audit_sink(Box::new(sink.clone()))
        .build()
        .unwrap();

    let mut pnrs = Vec::new();
    for i in 0..17 {
        pnrs.push(
            system
                .book_ticket(vec![PassengerRequest::new(format!("p{i}"), 30, "M", "L")])
                .unwrap(),
        );
    }
    system.cancel_ticket(pnrs[0].as_str()).unwrap();

    let actions: Vec<AuditAction> = sink.events().iter().map(|e| e.action).collect();
    assert_eq!(actions.iter().filter(|a| **a == AuditAction::Booked).count(), 17);
    assert_eq!(actions.iter().filter(|a| **a == AuditAction::Rac).count(), 2);
    assert_eq!(
        &actions[actions.len() - 3..],
        &[
            AuditAction::Cancelled,
            AuditAction::PromotedToConfirmed,
            AuditAction::PromotedToRac,
        ]
    );
    let last = sink.events().pop().unwrap();
    assert_eq!(last.passenger.as_deref(), Some("p16"));
    assert_eq!(AuditAction::PromotedToRac.to_string(), "promoted_to_rac");
}
