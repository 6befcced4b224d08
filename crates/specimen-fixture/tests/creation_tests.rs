//! Creation Tests
//!
//! Anonymous values for primitives, containers and records through the
//! default engine.

use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use specimen_fixture::prelude::*;
use specimen_test_utils::{
    init_tracing, Clock, Color, FixedClock, Invoice, Person, Roster, Scheduler,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

#[test]
fn test_strings_are_unique() {
    let fixture = Fixture::new();
    let strings: HashSet<String> = fixture
        .generate::<String>()
        .take(100)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(strings.len(), 100);
}

#[test]
fn test_seeded_string_starts_with_seed() {
    let fixture = Fixture::new();
    let name = fixture.create_seeded::<String>("Name").unwrap();
    assert!(name.starts_with("Name"));
    assert!(name.len() > "Name".len());
}

#[test]
fn test_numbers_count_up_per_type() {
    let fixture = Fixture::new();
    assert_eq!(fixture.create::<u32>().unwrap(), 1);
    assert_eq!(fixture.create::<u32>().unwrap(), 2);
    assert_eq!(fixture.create::<u32>().unwrap(), 3);
    assert_eq!(fixture.create::<i16>().unwrap(), 1);
}

#[test]
fn test_numeric_seed_offsets_the_counter() {
    let fixture = Fixture::new();
    assert_eq!(fixture.create_seeded::<u32>(Seed::new(100_u32)).unwrap(), 101);
}

#[test]
fn test_fixtures_do_not_share_counters() {
    let first = Fixture::new();
    let second = Fixture::new();
    assert_eq!(first.create::<u64>().unwrap(), 1);
    assert_eq!(second.create::<u64>().unwrap(), 1);
}

#[test]
fn test_generated_primitives() {
    let fixture = Fixture::new();
    assert_eq!(fixture.create::<bool>().unwrap(), true);
    assert_eq!(fixture.create::<bool>().unwrap(), false);
    assert_eq!(fixture.create::<char>().unwrap(), '!');
    assert_eq!(fixture.create::<char>().unwrap(), '"');
    assert_ne!(fixture.create::<Uuid>().unwrap(), fixture.create::<Uuid>().unwrap());

    let earlier = fixture.create::<DateTime<Utc>>().unwrap();
    let later = fixture.create::<DateTime<Utc>>().unwrap();
    assert!(later > earlier);
}

#[test]
fn test_enum_values_cycle_in_declaration_order() {
    let fixture = Fixture::new();
    let colors = fixture.create_many_n::<Color>(4).unwrap();
    assert_eq!(colors, vec![Color::Red, Color::Green, Color::Blue, Color::Red]);
}

#[test]
fn test_record_is_fully_populated() {
    init_tracing();
    let fixture = Fixture::new();
    let person = fixture.create::<Person>().unwrap();

    assert!(person.name.starts_with("name"));
    assert_eq!(person.age, 1);
    assert!(person.email.starts_with("email"));
    let address = person.address.expect("optional record is populated");
    assert!(address.street.starts_with("street"));
    assert!(address.city.starts_with("city"));
    assert_eq!(person.tags.len(), 3);
}

#[test]
fn test_containers() {
    let fixture = Fixture::new();
    assert_eq!(fixture.create::<Vec<String>>().unwrap().len(), 3);
    assert_eq!(fixture.create::<HashMap<String, u32>>().unwrap().len(), 3);
    assert_eq!(fixture.create::<[u8; 4]>().unwrap(), [1, 2, 3, 4]);
    assert!(fixture.create::<Option<String>>().unwrap().is_some());
    assert!(fixture.create::<Box<Person>>().unwrap().name.starts_with("name"));
}

#[test]
fn test_custom_collection_uses_list_constructor() {
    let fixture = Fixture::new();
    let roster = fixture.create::<Roster>().unwrap();
    assert_eq!(roster.names.len(), 3);
}

#[test]
fn test_modest_constructor_is_preferred() {
    let fixture = Fixture::new();
    let invoice = fixture.create::<Invoice>().unwrap();
    assert_eq!(invoice.number, 1);
    assert_eq!(invoice.note, None);
}

#[test]
fn test_create_many_follows_repeat_count() {
    let mut fixture = Fixture::new();
    assert_eq!(fixture.create_many::<Person>().unwrap().len(), 3);
    assert_eq!(fixture.create_many_n::<u8>(5).unwrap(), vec![1, 2, 3, 4, 5]);

    fixture.set_repeat_count(6).unwrap();
    assert_eq!(fixture.create_many::<String>().unwrap().len(), 6);
    assert_eq!(fixture.create::<Vec<bool>>().unwrap().len(), 6);
}

#[test]
fn test_unallocatable_count_is_an_error() {
    let fixture = Fixture::new();
    let err = fixture.create_many_n::<u8>(usize::MAX).unwrap_err();
    assert!(matches!(err, FixtureError::InvalidArgument(_)));
    assert_eq!(fixture.create_many_n::<u8>(2).unwrap(), vec![1, 2]);
}

#[test]
fn test_create_many_seeded() {
    let fixture = Fixture::new();
    let ids = fixture.create_many_seeded::<String>("id").unwrap();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| id.starts_with("id")));
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 3);
}

#[test]
fn test_add_many_to_extends_target() {
    let fixture = Fixture::new();
    let mut numbers = vec![0_u16];
    fixture.add_many_to::<u16, _>(&mut numbers).unwrap();
    assert_eq!(numbers, vec![0, 1, 2, 3]);
}

#[test]
fn test_abstract_dependency_fails_with_path() {
    let fixture = Fixture::new();
    let err = fixture.create::<Scheduler>().unwrap_err();
    assert!(err.is_creation_failure());
    let path = err.path();
    assert_eq!(path.first().map(String::as_str), Some("Scheduler"));
    assert!(path.last().is_some_and(|step| step.contains("Clock")));
}

#[test]
fn test_injected_seam_completes_the_graph() {
    let mut fixture = Fixture::new();
    fixture.inject(Dyn::<dyn Clock>(Arc::new(FixedClock(42))));
    let scheduler = fixture.create::<Scheduler>().unwrap();
    assert_eq!(scheduler.clock.now(), 42);
    assert!(scheduler.name.starts_with("name"));
}

#[test]
fn test_random_mode_is_unique_within_a_range() {
    let config = FixtureConfig::new().with_numeric_generation(NumericGeneration::RandomUnique);
    let fixture = Fixture::with_config(config).unwrap();
    let numbers = fixture.create_many_n::<u8>(200).unwrap();
    let distinct: HashSet<_> = numbers.iter().collect();
    assert_eq!(distinct.len(), 200);
    assert!(numbers.iter().all(|n| *n >= 1));
}

proptest! {
    #[test]
    fn prop_repeat_count_controls_create_many(count in 1usize..16) {
        let fixture = Fixture::with_config(FixtureConfig::new().with_repeat_count(count)).unwrap();
        let strings = fixture.create_many::<String>().unwrap();
        prop_assert_eq!(strings.len(), count);
        prop_assert_eq!(strings.iter().collect::<HashSet<_>>().len(), count);
    }

    #[test]
    fn prop_seeded_strings_keep_their_prefix(prefix in "[a-zA-Z]{1,12}") {
        let fixture = Fixture::new();
        let value = fixture.create_seeded::<String>(prefix.as_str()).unwrap();
        prop_assert!(value.starts_with(&prefix));
    }
}
