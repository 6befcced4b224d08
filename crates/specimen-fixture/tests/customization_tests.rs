//! Customization Tests
//!
//! Build, register, customize, freeze and inject.

use pretty_assertions::assert_eq;
use specimen_fixture::prelude::*;
use specimen_fixture::TracingBehavior;
use specimen_test_utils::{init_tracing, Clock, FixedClock, Person, Product, Scheduler};
use std::sync::Arc;

#[test]
fn test_build_with_overrides_one_member() {
    let fixture = Fixture::new();
    let person = fixture
        .build::<Person>()
        .with("email", "ada@example.com".to_string())
        .create()
        .unwrap();
    assert_eq!(person.email, "ada@example.com");
    assert!(person.name.starts_with("name"));
    assert_eq!(person.tags.len(), 3);
}

#[test]
fn test_build_is_not_registered() {
    let fixture = Fixture::new();
    let _ = fixture.build::<Person>().without("tags").create().unwrap();
    assert!(fixture.customizations().is_empty());
    assert_eq!(fixture.create::<Person>().unwrap().tags.len(), 3);
}

#[test]
fn test_build_with_factory_gives_fresh_values() {
    let fixture = Fixture::new();
    let people = fixture
        .build::<Person>()
        .with_factory("tags", || vec!["vip".to_string()])
        .create_many(2)
        .unwrap();
    assert!(people.iter().all(|p| p.tags == ["vip"]));
}

#[test]
fn test_register_overrides_every_request_for_the_type() {
    let mut fixture = Fixture::new();
    fixture.register(|| "fixed".to_string());
    let person = fixture.create::<Person>().unwrap();
    assert_eq!(person.name, "fixed");
    assert_eq!(person.email, "fixed");
    assert_eq!(fixture.create_seeded::<String>("prefix").unwrap(), "fixed");
}

#[test]
fn test_register_skips_member_population() {
    let mut fixture = Fixture::new();
    fixture.register(|| Person::new("Grace".into(), 85));
    let person = fixture.create::<Person>().unwrap();
    assert_eq!(person, Person::new("Grace".into(), 85));
}

#[test]
fn test_latest_registration_wins() {
    let mut fixture = Fixture::new();
    fixture.register(|| 10_i32);
    fixture.register(|| 20_i32);
    assert_eq!(fixture.create::<i32>().unwrap(), 20);
}

#[test]
fn test_register_with_resolves_dependencies() {
    let mut fixture = Fixture::new();
    fixture.register_with(|context: &dyn SpecimenContext| {
        Ok(Scheduler {
            name: context.create_seeded::<String>(Seed::name("job"))?,
            clock: Dyn::<dyn Clock>(Arc::new(FixedClock(7))),
        })
    });
    let scheduler = fixture.create::<Scheduler>().unwrap();
    assert!(scheduler.name.starts_with("job"));
    assert_eq!(scheduler.clock.now(), 7);
}

#[test]
fn test_customize_applies_to_nested_requests() {
    let mut fixture = Fixture::new();
    fixture
        .customize::<Person, _>(|c| c.with("email", "team@example.com".to_string()).without("tags"))
        .unwrap();

    let people = fixture.create::<Vec<Person>>().unwrap();
    assert_eq!(people.len(), 3);
    for person in &people {
        assert_eq!(person.email, "team@example.com");
        assert!(person.tags.is_empty());
        assert!(person.address.is_some());
    }
}

#[test]
fn test_customize_with_unknown_member_registers_nothing() {
    let mut fixture = Fixture::new();
    let err = fixture
        .customize::<Person, _>(|c| c.with("phone", "555".to_string()))
        .unwrap_err();
    assert!(matches!(err, FixtureError::MemberNotFound { ref member, .. } if member == "phone"));
    assert!(fixture.customizations().is_empty());
}

#[test]
fn test_perform_runs_after_population() {
    let fixture = Fixture::new();
    let person = fixture
        .build::<Person>()
        .perform(|p: &mut Person| p.age += 100)
        .create()
        .unwrap();
    assert_eq!(person.age, 101);
}

#[test]
fn test_freeze_shares_one_value() {
    let mut fixture = Fixture::new();
    let frozen = fixture.freeze::<String>().unwrap();
    let person = fixture.create::<Person>().unwrap();
    assert_eq!(person.name, frozen);
    assert_eq!(person.email, frozen);
    assert_eq!(fixture.create::<String>().unwrap(), frozen);
}

#[test]
fn test_freeze_seeded_keeps_seed_prefix() {
    let mut fixture = Fixture::new();
    let frozen = fixture.freeze_seeded::<String>("tenant").unwrap();
    assert!(frozen.starts_with("tenant"));
    assert_eq!(fixture.create::<String>().unwrap(), frozen);
}

#[test]
fn test_frozen_values_are_handed_out_as_clones() {
    let mut fixture = Fixture::new();
    let mut frozen = fixture.freeze::<Vec<String>>().unwrap();
    frozen.push("local".to_string());
    let later = fixture.create::<Vec<String>>().unwrap();
    assert_eq!(later.len(), 3);
    assert_eq!(later.as_slice(), &frozen[..3]);
}

#[test]
fn test_frozen_arc_keeps_identity() {
    let mut fixture = Fixture::new();
    fixture.inject(Dyn::<dyn Clock>(Arc::new(FixedClock(1))));
    let clock = fixture.freeze::<Dyn<dyn Clock>>().unwrap();
    let first = fixture.create::<Scheduler>().unwrap();
    let second = fixture.create::<Scheduler>().unwrap();
    assert!(Arc::ptr_eq(&clock.0, &first.clock.0));
    assert!(Arc::ptr_eq(&first.clock.0, &second.clock.0));
}

#[test]
fn test_omit_auto_properties_configuration() {
    let fixture =
        Fixture::with_config(FixtureConfig::new().with_omit_auto_properties(true)).unwrap();
    let bare = fixture.create::<Person>().unwrap();
    assert_eq!(bare.email, "");
    assert_eq!(bare.address, None);
    assert!(bare.tags.is_empty());

    let populated = fixture.build::<Person>().with_auto_properties().create().unwrap();
    assert!(populated.email.starts_with("email"));
}

#[test]
fn test_strict_members_fail_on_unresolvable_member() {
    let lenient = Fixture::new();
    assert_eq!(lenient.create::<Product>().unwrap().sku, "");

    let strict = Fixture::with_config(FixtureConfig::new().with_strict_members(true)).unwrap();
    let err = strict.create::<Product>().unwrap_err();
    assert!(err.is_creation_failure());
}

#[test]
fn test_tracing_behavior_wraps_the_graph() {
    init_tracing();
    let mut fixture = Fixture::new();
    fixture.behaviors_mut().push(Arc::new(TracingBehavior));
    assert_eq!(fixture.behaviors().len(), 2);
    assert!(fixture.create::<Person>().is_ok());
}
