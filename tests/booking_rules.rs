use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use roombook::db::open_in_memory;
use roombook::repo::{SqliteBookingRepository, SqlitePersonRepository, SqliteRoomRepository};
use roombook::service::{
    BookingRequest, BookingService, PersonRequest, PersonService, RoomRequest, RoomService,
    ServiceError,
};
use rusqlite::Connection;

fn booking_service(conn: &Connection) -> BookingService<SqliteBookingRepository<'_>> {
    BookingService::new(SqliteBookingRepository::new(conn))
}

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 14, hour, min, 0).unwrap()
}

// One person and one room to hang bookings off.
fn seed(conn: &Connection) -> (i64, i64) {
    let people = PersonService::new(SqlitePersonRepository::new(conn));
    let person_id = people
        .add(&PersonRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone_number: "020 7219 3000".to_string(),
            email: "ada@example.com".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
        })
        .unwrap();

    let rooms = RoomService::new(
        SqliteRoomRepository::new(conn),
        SqliteBookingRepository::new(conn),
    );
    let room_id = rooms
        .add(&RoomRequest {
            name: "Commons".to_string(),
        })
        .unwrap();

    (person_id, room_id)
}

fn request(person_id: i64, room_id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> BookingRequest {
    BookingRequest {
        person_id,
        room_id,
        start_time: start,
        end_time: end,
    }
}

#[test]
fn rejects_start_after_end() {
    let conn = open_in_memory().unwrap();
    let (person_id, room_id) = seed(&conn);

    let err = booking_service(&conn)
        .book(&request(person_id, room_id, at(11, 0), at(10, 0)))
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[test]
fn rejects_bookings_longer_than_one_hour() {
    let conn = open_in_memory().unwrap();
    let (person_id, room_id) = seed(&conn);

    let err = booking_service(&conn)
        .book(&request(person_id, room_id, at(10, 0), at(11, 30)))
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[test]
fn accepts_a_booking_of_exactly_one_hour() {
    let conn = open_in_memory().unwrap();
    let (person_id, room_id) = seed(&conn);
    let service = booking_service(&conn);

    let id = service
        .book(&request(person_id, room_id, at(10, 0), at(11, 0)))
        .unwrap();

    let loaded = service.get(id).unwrap();
    assert_eq!(loaded.person_id, person_id);
    assert_eq!(loaded.room_id, room_id);
    assert_eq!(loaded.start_time, at(10, 0));
    assert_eq!(loaded.end_time, at(11, 0));
}

#[test]
fn assigns_a_fresh_id_per_booking() {
    let conn = open_in_memory().unwrap();
    let (person_id, room_id) = seed(&conn);
    let service = booking_service(&conn);

    let first = service
        .book(&request(person_id, room_id, at(10, 0), at(10, 30)))
        .unwrap();
    let second = service
        .book(&request(person_id, room_id, at(12, 0), at(12, 30)))
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(service.list().unwrap().len(), 2);
}

#[test]
fn booking_for_unknown_person_or_room_is_an_internal_error() {
    let conn = open_in_memory().unwrap();
    let (person_id, room_id) = seed(&conn);
    let service = booking_service(&conn);

    // Missing references fail the foreign key constraint; no lookup happens
    // before the insert, so this surfaces as an internal failure.
    let err = service
        .book(&request(999, room_id, at(10, 0), at(10, 30)))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Internal(_)));

    let err = service
        .book(&request(person_id, 999, at(10, 0), at(10, 30)))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Internal(_)));
}

#[test]
fn update_replaces_the_time_window() {
    let conn = open_in_memory().unwrap();
    let (person_id, room_id) = seed(&conn);
    let service = booking_service(&conn);

    let id = service
        .book(&request(person_id, room_id, at(10, 0), at(11, 0)))
        .unwrap();

    service
        .update(id, &request(person_id, room_id, at(14, 0), at(15, 0)))
        .unwrap();

    let loaded = service.get(id).unwrap();
    assert_eq!(loaded.start_time, at(14, 0));
    assert_eq!(loaded.end_time, at(15, 0));
}

#[test]
fn update_enforces_the_same_time_rules() {
    let conn = open_in_memory().unwrap();
    let (person_id, room_id) = seed(&conn);
    let service = booking_service(&conn);

    let id = service
        .book(&request(person_id, room_id, at(10, 0), at(11, 0)))
        .unwrap();

    let err = service
        .update(id, &request(person_id, room_id, at(14, 0), at(16, 0)))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let err = service
        .update(999, &request(person_id, room_id, at(14, 0), at(15, 0)))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn remove_deletes_the_booking_once() {
    let conn = open_in_memory().unwrap();
    let (person_id, room_id) = seed(&conn);
    let service = booking_service(&conn);

    let id = service
        .book(&request(person_id, room_id, at(10, 0), at(11, 0)))
        .unwrap();

    assert_eq!(service.remove(id).unwrap(), id);
    assert!(matches!(
        service.remove(id).unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        service.get(id).unwrap_err(),
        ServiceError::NotFound(_)
    ));
}
