use chrono::NaiveDate;
use roombook::db::open_in_memory;
use roombook::repo::{PersonFilter, SqlitePersonRepository};
use roombook::service::{PersonRequest, PersonService, ServiceError};
use rusqlite::Connection;

fn person_service(conn: &Connection) -> PersonService<SqlitePersonRepository<'_>> {
    PersonService::new(SqlitePersonRepository::new(conn))
}

fn test_person() -> PersonRequest {
    PersonRequest {
        first_name: "Test First Name".to_string(),
        last_name: "Test Last Name".to_string(),
        phone_number: "123".to_string(),
        email: "test@test.com".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1996, 10, 10).unwrap(),
    }
}

#[test]
fn get_all_returns_every_person() {
    let conn = open_in_memory().unwrap();
    let service = person_service(&conn);

    service.add(&test_person()).unwrap();
    service.add(&test_person()).unwrap();

    let people = service.list(&PersonFilter::default()).unwrap();
    assert_eq!(people.len(), 2);
}

#[test]
fn get_by_id_returns_the_stored_fields() {
    let conn = open_in_memory().unwrap();
    let service = person_service(&conn);

    let id = service.add(&test_person()).unwrap();
    let loaded = service.get(id).unwrap();

    assert_eq!(loaded.first_name, "Test First Name");
    assert_eq!(loaded.last_name, "Test Last Name");
    assert_eq!(loaded.phone_number, "123");
    assert_eq!(loaded.email, "test@test.com");
    assert_eq!(
        loaded.date_of_birth,
        NaiveDate::from_ymd_opt(1996, 10, 10).unwrap()
    );
}

#[test]
fn get_reports_missing_people() {
    let conn = open_in_memory().unwrap();
    let err = person_service(&conn).get(1).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn add_rejects_blank_names() {
    let conn = open_in_memory().unwrap();
    let service = person_service(&conn);

    let mut person = test_person();
    person.first_name = "  ".to_string();

    let err = service.add(&person).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert!(service.list(&PersonFilter::default()).unwrap().is_empty());
}

#[test]
fn update_replaces_the_mutable_fields() {
    let conn = open_in_memory().unwrap();
    let service = person_service(&conn);
    let id = service.add(&test_person()).unwrap();

    let mut person = test_person();
    person.first_name = "Updated First Name".to_string();
    person.email = "updated@test.com".to_string();
    service.update(id, &person).unwrap();

    let loaded = service.get(id).unwrap();
    assert_eq!(loaded.first_name, "Updated First Name");
    assert_eq!(loaded.email, "updated@test.com");
    assert_eq!(loaded.last_name, "Test Last Name");
}

#[test]
fn update_reports_missing_people() {
    let conn = open_in_memory().unwrap();
    let err = person_service(&conn).update(999, &test_person()).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn remove_deletes_the_person() {
    let conn = open_in_memory().unwrap();
    let service = person_service(&conn);
    let id = service.add(&test_person()).unwrap();

    assert_eq!(service.remove(id).unwrap(), id);
    assert!(matches!(
        service.get(id).unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[test]
fn list_filters_match_prefixes_and_exact_fields() {
    let conn = open_in_memory().unwrap();
    let service = person_service(&conn);

    service.add(&test_person()).unwrap();
    service
        .add(&PersonRequest {
            first_name: "Winston".to_string(),
            last_name: "Churchill".to_string(),
            phone_number: "456".to_string(),
            email: "winston@example.com".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1874, 11, 30).unwrap(),
        })
        .unwrap();

    let by_first_name = service
        .list(&PersonFilter {
            first_name: Some("Win".to_string()),
            ..PersonFilter::default()
        })
        .unwrap();
    assert_eq!(by_first_name.len(), 1);
    assert_eq!(by_first_name[0].first_name, "Winston");

    let by_email = service
        .list(&PersonFilter {
            email: Some("test@test.com".to_string()),
            ..PersonFilter::default()
        })
        .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].email, "test@test.com");

    let by_birth_date = service
        .list(&PersonFilter {
            date_of_birth: NaiveDate::from_ymd_opt(1874, 11, 30),
            ..PersonFilter::default()
        })
        .unwrap();
    assert_eq!(by_birth_date.len(), 1);

    let none = service
        .list(&PersonFilter {
            last_name: Some("Attlee".to_string()),
            ..PersonFilter::default()
        })
        .unwrap();
    assert!(none.is_empty());
}
