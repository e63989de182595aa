use super::common::*;

use crate::amenities::{AmenityInput, AmenityWrite, GenderType};
use crate::error::{Entity, ServiceError};
use crate::locations::LocationId;

#[test]
fn get_without_record_is_none() {
    let (service, _store, location) = build_service();
    assert!(service.get(location).expect("lookup").is_none());
}

#[test]
fn second_create_conflicts_with_upsert_hint() {
    let (service, store, location) = build_service();
    let input = AmenityInput {
        accessible: true,
        ..AmenityInput::default()
    };
    service.create(location, input).expect("first create");

    match service.create(location, AmenityInput::default()) {
        Err(err @ ServiceError::Conflict(_)) => assert_eq!(
            err.to_string(),
            "Amenities already exist for this location. Use update instead."
        ),
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(store.row_count("amenities").expect("count"), 1);
    assert!(service.get(location).expect("lookup").expect("present").features.accessible);
}

#[test]
fn update_creates_when_absent_then_replaces() {
    let (service, _store, location) = build_service();
    let first = AmenityInput {
        western_style: true,
        warm_seat: true,
        ..AmenityInput::default()
    };
    assert_eq!(
        service.update(location, first).expect("upsert"),
        AmenityWrite::Created
    );

    let second = AmenityInput {
        baby_changing: true,
        gender_type: GenderType::Separate,
        ..AmenityInput::default()
    };
    assert_eq!(
        service.update(location, second).expect("replace"),
        AmenityWrite::Updated
    );
    let stored = service.get(location).expect("lookup").expect("present");
    assert_eq!(stored.features, second);
    assert!(!stored.features.warm_seat);
}

#[test]
fn writes_require_an_existing_location() {
    let (service, store, _location) = build_service();
    let missing = LocationId(9_999);

    assert!(matches!(
        service.create(missing, AmenityInput::default()),
        Err(ServiceError::NotFound(Entity::Location))
    ));
    assert!(matches!(
        service.update(missing, AmenityInput::default()),
        Err(ServiceError::NotFound(Entity::Location))
    ));
    assert_eq!(store.row_count("amenities").expect("count"), 0);
}

#[test]
fn delete_of_missing_record_is_not_found() {
    let (service, _store, location) = build_service();
    assert!(matches!(
        service.delete(location),
        Err(ServiceError::NotFound(Entity::Amenities))
    ));

    service.create(location, AmenityInput::default()).expect("create");
    service.delete(location).expect("delete");
    assert!(service.get(location).expect("lookup").is_none());
}
