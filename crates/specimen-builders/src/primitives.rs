//! Built-in value generators
//!
//! Each generator answers type requests for one family of built-in types and
//! declines everything else with [`Specimen::NoSpecimen`].
//!
//! - Strings: optional seed prefix plus a fresh UUID
//! - Numbers: per-kind counters, or unique random draws from widening ranges
//! - Booleans, chars, enums: deterministic round-robin
//! - UUIDs: v4 every call
//! - Date-times: one day further on every call

use crate::builder::{SpecimenBuilder, SpecimenContext};
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use parking_lot::Mutex;
use rand::Rng;
use specimen_kernel::{FixtureError, PrimitiveKind, Request, Shape, Specimen, TypeRef};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use uuid::Uuid;

fn primitive_kind(ty: &TypeRef) -> Option<PrimitiveKind> {
    match ty.shape() {
        Shape::Primitive(kind) => Some(kind),
        _ => None,
    }
}

fn requested_kind(request: &Request, wanted: PrimitiveKind) -> bool {
    matches!(request, Request::Type(ty) if primitive_kind(ty) == Some(wanted))
}

/// Strings made of an optional seed prefix and a fresh UUID
#[derive(Debug, Clone, Copy, Default)]
pub struct StringGenerator;

impl SpecimenBuilder for StringGenerator {
    fn create(&self, request: &Request, _context: &dyn SpecimenContext) -> Result<Specimen, FixtureError> {
        let token = Uuid::new_v4();
        match request {
            Request::Type(ty) if ty.is::<String>() => Ok(Specimen::of(token.to_string())),
            Request::Seeded { ty, seed } if ty.is::<String>() => Ok(seed
                .as_str()
                .map_or(Specimen::NoSpecimen, |prefix| Specimen::of(format!("{prefix}{token}")))),
            _ => Ok(Specimen::NoSpecimen),
        }
    }
}

/// Next value of a per-kind counter, wrapping to 1 past the kind's limit
fn advance(counters: &Mutex<IndexMap<PrimitiveKind, u64>>, kind: PrimitiveKind) -> u64 {
    let mut counters = counters.lock();
    let counter = counters.entry(kind).or_insert(0);
    *counter = match counter.checked_add(1) {
        Some(next) if next <= kind.counter_limit() => next,
        _ => 1,
    };
    *counter
}

/// Monotonic counters, one per numeric kind, starting at 1
///
/// A seeded request whose seed has the requested numeric type yields
/// `seed + n`.
#[derive(Debug, Default)]
pub struct NumericSequenceGenerator {
    counters: Mutex<IndexMap<PrimitiveKind, u64>>,
}

impl NumericSequenceGenerator {
    /// Fresh counters
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpecimenBuilder for NumericSequenceGenerator {
    #[allow(clippy::cast_precision_loss)]
    fn create(&self, request: &Request, _context: &dyn SpecimenContext) -> Result<Specimen, FixtureError> {
        match request {
            Request::Type(ty) => {
                let Some(kind) = primitive_kind(ty).filter(|k| k.is_numeric()) else {
                    return Ok(Specimen::NoSpecimen);
                };
                let n = advance(&self.counters, kind);
                Ok(kind.numeric_value(n).map_or(Specimen::NoSpecimen, Specimen::Value))
            }
            Request::Seeded { ty, seed } => {
                let Some(kind) = primitive_kind(ty).filter(|k| k.is_numeric()) else {
                    return Ok(Specimen::NoSpecimen);
                };
                let Some(base) = kind.numeric_as_f64(seed.value()) else {
                    return Ok(Specimen::NoSpecimen);
                };
                let n = advance(&self.counters, kind);
                Ok(kind
                    .numeric_from_f64(base + n as f64)
                    .map_or(Specimen::NoSpecimen, Specimen::Value))
            }
            _ => Ok(Specimen::NoSpecimen),
        }
    }
}

const RANDOM_BOUNDARIES: [u64; 4] = [1, 255, 32_767, 2_147_483_647];

#[derive(Debug, Default)]
struct RandomState {
    range: usize,
    taken: u64,
    used: HashSet<u64>,
}

/// Unique random numbers drawn from widening ranges
///
/// Draws come from `[1, 255]` until it is exhausted, then `[256, 32767]`,
/// then `[32768, 2147483647]`, each capped at the kind's limit. Once every
/// range is exhausted the history is cleared and drawing starts over.
#[derive(Debug, Default)]
pub struct RandomNumericSequenceGenerator {
    states: Mutex<IndexMap<PrimitiveKind, RandomState>>,
}

impl RandomNumericSequenceGenerator {
    /// Empty draw history
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn ranges(kind: PrimitiveKind) -> Vec<(u64, u64)> {
        let limit = kind.counter_limit();
        RANDOM_BOUNDARIES
            .windows(2)
            .enumerate()
            .map(|(i, w)| (if i == 0 { w[0] } else { w[0] + 1 }, w[1]))
            .filter(|(low, _)| *low <= limit)
            .map(|(low, high)| (low, high.min(limit)))
            .collect()
    }

    fn draw(&self, kind: PrimitiveKind) -> u64 {
        let ranges = Self::ranges(kind);
        let mut states = self.states.lock();
        let state = states.entry(kind).or_default();
        loop {
            let Some(&(low, high)) = ranges.get(state.range) else {
                state.range = 0;
                state.taken = 0;
                state.used.clear();
                continue;
            };
            if state.taken > high - low {
                state.range += 1;
                state.taken = 0;
                continue;
            }
            let mut rng = rand::rng();
            loop {
                let candidate = rng.random_range(low..=high);
                if state.used.insert(candidate) {
                    state.taken += 1;
                    return candidate;
                }
            }
        }
    }
}

impl SpecimenBuilder for RandomNumericSequenceGenerator {
    fn create(&self, request: &Request, _context: &dyn SpecimenContext) -> Result<Specimen, FixtureError> {
        let Request::Type(ty) = request else {
            return Ok(Specimen::NoSpecimen);
        };
        let Some(kind) = primitive_kind(ty).filter(|k| k.is_numeric()) else {
            return Ok(Specimen::NoSpecimen);
        };
        let n = self.draw(kind);
        Ok(kind.numeric_value(n).map_or(Specimen::NoSpecimen, Specimen::Value))
    }
}

/// Alternates `true`, `false`, `true`, ...
#[derive(Debug, Default)]
pub struct BooleanSwitch {
    last: AtomicBool,
}

impl SpecimenBuilder for BooleanSwitch {
    fn create(&self, request: &Request, _context: &dyn SpecimenContext) -> Result<Specimen, FixtureError> {
        if !requested_kind(request, PrimitiveKind::Bool) {
            return Ok(Specimen::NoSpecimen);
        }
        let previous = self.last.fetch_xor(true, Ordering::SeqCst);
        Ok(Specimen::of(!previous))
    }
}

const PRINTABLE_FIRST: u32 = '!' as u32;
const PRINTABLE_COUNT: u32 = '~' as u32 - PRINTABLE_FIRST + 1;

/// Cycles through printable ASCII from `!` to `~`
#[derive(Debug, Default)]
pub struct CharSequenceGenerator {
    cursor: AtomicU32,
}

impl SpecimenBuilder for CharSequenceGenerator {
    fn create(&self, request: &Request, _context: &dyn SpecimenContext) -> Result<Specimen, FixtureError> {
        if !requested_kind(request, PrimitiveKind::Char) {
            return Ok(Specimen::NoSpecimen);
        }
        let n = self.cursor.fetch_add(1, Ordering::SeqCst) % PRINTABLE_COUNT;
        Ok(char::from_u32(PRINTABLE_FIRST + n).map_or(Specimen::NoSpecimen, Specimen::of))
    }
}

/// Fresh v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl SpecimenBuilder for UuidGenerator {
    fn create(&self, request: &Request, _context: &dyn SpecimenContext) -> Result<Specimen, FixtureError> {
        if !requested_kind(request, PrimitiveKind::Uuid) {
            return Ok(Specimen::NoSpecimen);
        }
        Ok(Specimen::of(Uuid::new_v4()))
    }
}

/// Strictly increasing date-times, one day apart
#[derive(Debug)]
pub struct DateTimeGenerator {
    origin: DateTime<Utc>,
    offset: AtomicI64,
}

impl DateTimeGenerator {
    /// Count days from now
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Count days from `origin`
    #[inline]
    #[must_use]
    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            offset: AtomicI64::new(0),
        }
    }
}

impl Default for DateTimeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecimenBuilder for DateTimeGenerator {
    fn create(&self, request: &Request, _context: &dyn SpecimenContext) -> Result<Specimen, FixtureError> {
        if !requested_kind(request, PrimitiveKind::DateTime) {
            return Ok(Specimen::NoSpecimen);
        }
        let days = self.offset.fetch_add(1, Ordering::SeqCst) + 1;
        let value = Duration::try_days(days)
            .and_then(|d| self.origin.checked_add_signed(d))
            .ok_or_else(|| FixtureError::invalid_argument(format!("date-time {days} days ahead is out of range")))?;
        Ok(Specimen::of(value))
    }
}

/// Cycles through each enum's declared values, independently per enum
#[derive(Debug, Default)]
pub struct EnumGenerator {
    cursors: Mutex<IndexMap<TypeRef, usize>>,
}

impl EnumGenerator {
    /// Fresh cursors
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpecimenBuilder for EnumGenerator {
    fn create(&self, request: &Request, _context: &dyn SpecimenContext) -> Result<Specimen, FixtureError> {
        let Request::Type(ty) = request else {
            return Ok(Specimen::NoSpecimen);
        };
        let Shape::Enum(shape) = ty.shape() else {
            return Ok(Specimen::NoSpecimen);
        };
        let values = shape.values();
        if values.is_empty() {
            return Ok(Specimen::NoSpecimen);
        }
        let mut cursors = self.cursors.lock();
        let cursor = cursors.entry(*ty).or_insert(0);
        let value = values[*cursor % values.len()].clone();
        *cursor = (*cursor + 1) % values.len();
        Ok(Specimen::Value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing::resolve_value;
    use proptest::prelude::*;
    use specimen_kernel::{EnumShape, Introspect, Seed};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Suit {
        Hearts,
        Spades,
        Clubs,
    }

    impl Introspect for Suit {
        fn shape() -> Shape {
            EnumShape::from_values([Suit::Hearts, Suit::Spades, Suit::Clubs])
        }
    }

    #[test]
    fn strings_carry_seed_prefix() {
        let value: String = resolve_value(&StringGenerator, &Request::seeded::<String>(Seed::name("foo")));
        assert!(value.starts_with("foo"));
        assert!(value.len() > 3);
    }

    #[test]
    fn non_text_seed_is_declined_by_string_generator() {
        let generator = StringGenerator;
        let context = crate::builder::testing::RootContext::new(&generator);
        let request = Request::seeded::<String>(Seed::new(3_u8));
        assert!(generator.create(&request, &context).unwrap().is_no_specimen());
    }

    #[test]
    fn counters_are_independent_per_kind() {
        let generator = NumericSequenceGenerator::new();
        let a: i32 = resolve_value(&generator, &Request::of::<i32>());
        let b: i32 = resolve_value(&generator, &Request::of::<i32>());
        let c: u8 = resolve_value(&generator, &Request::of::<u8>());
        let d: f64 = resolve_value(&generator, &Request::of::<f64>());
        assert_eq!((a, b, c), (1, 2, 1));
        assert!((d - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn small_counters_wrap_to_one() {
        let generator = NumericSequenceGenerator::new();
        let values: Vec<i8> = (0..128)
            .map(|_| resolve_value(&generator, &Request::of::<i8>()))
            .collect();
        assert_eq!(values[126], 127);
        assert_eq!(values[127], 1);
    }

    #[test]
    fn numeric_seed_offsets_counter() {
        let generator = NumericSequenceGenerator::new();
        let value: u32 = resolve_value(&generator, &Request::seeded::<u32>(Seed::new(100_u32)));
        assert_eq!(value, 101);
    }

    #[test]
    fn random_numbers_exhaust_first_range_without_repeats() {
        let generator = RandomNumericSequenceGenerator::new();
        let values: HashSet<u16> = (0..255)
            .map(|_| resolve_value(&generator, &Request::of::<u16>()))
            .collect();
        assert_eq!(values.len(), 255);
        assert!(values.iter().all(|v| (1..=255).contains(v)));
        let next: u16 = resolve_value(&generator, &Request::of::<u16>());
        assert!(next > 255);
    }

    #[test]
    fn random_u8_cycles_are_full_permutations() {
        let generator = RandomNumericSequenceGenerator::new();
        for _ in 0..2 {
            let cycle: HashSet<u8> = (0..255)
                .map(|_| resolve_value(&generator, &Request::of::<u8>()))
                .collect();
            assert_eq!(cycle.len(), 255);
            assert!(!cycle.contains(&0));
        }
    }

    #[test]
    fn random_u8_starts_over_after_exhaustion() {
        let generator = RandomNumericSequenceGenerator::new();
        for _ in 0..300 {
            let value: u8 = resolve_value(&generator, &Request::of::<u8>());
            assert!(value >= 1);
        }
    }

    #[test]
    fn booleans_alternate_from_true() {
        let generator = BooleanSwitch::default();
        let values: Vec<bool> = (0..4)
            .map(|_| resolve_value(&generator, &Request::of::<bool>()))
            .collect();
        assert_eq!(values, vec![true, false, true, false]);
    }

    #[test]
    fn chars_cycle_printable_ascii() {
        let generator = CharSequenceGenerator::default();
        let values: Vec<char> = (0..95)
            .map(|_| resolve_value(&generator, &Request::of::<char>()))
            .collect();
        assert_eq!(values[0], '!');
        assert_eq!(values[93], '~');
        assert_eq!(values[94], '!');
    }

    #[test]
    fn date_times_strictly_increase() {
        let origin = Utc::now();
        let generator = DateTimeGenerator::starting_at(origin);
        let first: DateTime<Utc> = resolve_value(&generator, &Request::of::<DateTime<Utc>>());
        let second: DateTime<Utc> = resolve_value(&generator, &Request::of::<DateTime<Utc>>());
        assert_eq!(first - origin, Duration::days(1));
        assert!(second > first);
    }

    #[test]
    fn enums_cycle_in_declaration_order() {
        let generator = EnumGenerator::new();
        let values: Vec<Suit> = (0..4)
            .map(|_| resolve_value(&generator, &Request::of::<Suit>()))
            .collect();
        assert_eq!(values, vec![Suit::Hearts, Suit::Spades, Suit::Clubs, Suit::Hearts]);
    }

    proptest! {
        #[test]
        fn uuids_and_strings_never_repeat(count in 2usize..64) {
            let strings: HashSet<String> = (0..count)
                .map(|_| resolve_value(&StringGenerator, &Request::of::<String>()))
                .collect();
            let uuids: HashSet<Uuid> = (0..count)
                .map(|_| resolve_value(&UuidGenerator, &Request::of::<Uuid>()))
                .collect();
            prop_assert_eq!(strings.len(), count);
            prop_assert_eq!(uuids.len(), count);
        }

        #[test]
        fn counters_never_repeat_below_limit(count in 1usize..500) {
            let generator = NumericSequenceGenerator::new();
            let values: HashSet<i64> = (0..count)
                .map(|_| resolve_value(&generator, &Request::of::<i64>()))
                .collect();
            prop_assert_eq!(values.len(), count);
        }
    }
}
