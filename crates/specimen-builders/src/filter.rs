//! Request specifications and the filtering builder
//!
//! A [`FilteringBuilder`] only consults its inner builder when its
//! [`RequestSpecification`] holds; otherwise it answers
//! [`Specimen::NoSpecimen`] without touching the inner builder.

use crate::builder::{BuilderRef, SpecimenBuilder, SpecimenContext};
use specimen_kernel::{FixtureError, Request, Shape, Specimen, TypeRef};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Predicate over requests
pub trait RequestSpecification: Send + Sync + Debug {
    /// Check whether `request` is in scope
    fn is_satisfied_by(&self, request: &Request) -> bool;
}

/// Builder scoped by a specification
#[derive(Debug, Clone)]
pub struct FilteringBuilder {
    builder: BuilderRef,
    specification: Arc<dyn RequestSpecification>,
}

impl FilteringBuilder {
    /// Scope `builder` to requests satisfying `specification`
    #[inline]
    #[must_use]
    pub fn new(
        builder: impl SpecimenBuilder + 'static,
        specification: impl RequestSpecification + 'static,
    ) -> Self {
        Self {
            builder: Arc::new(builder),
            specification: Arc::new(specification),
        }
    }
}

impl SpecimenBuilder for FilteringBuilder {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        if !self.specification.is_satisfied_by(request) {
            return Ok(Specimen::NoSpecimen);
        }
        self.builder.create(request, context)
    }
}

/// Type requests for exactly one type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactTypeSpecification(pub TypeRef);

impl RequestSpecification for ExactTypeSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        matches!(request, Request::Type(ty) if *ty == self.0)
    }
}

/// Type requests for the seam itself or any type declaring it implements it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplementsSpecification(pub TypeRef);

impl RequestSpecification for ImplementsSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        let Request::Type(ty) = request else {
            return false;
        };
        if *ty == self.0 {
            return true;
        }
        match ty.shape() {
            Shape::Object(object) => object.interfaces().contains(&self.0),
            _ => false,
        }
    }
}

/// Constructor parameters by name, optionally also by type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpecification {
    name: String,
    ty: Option<TypeRef>,
}

impl ParameterSpecification {
    /// Parameters named `name` of type `ty`
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
        }
    }

    /// Parameters named `name`, any type
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
        }
    }
}

impl RequestSpecification for ParameterSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        match request {
            Request::Parameter(p) => p.name == self.name && self.ty.map_or(true, |ty| p.ty == ty),
            _ => false,
        }
    }
}

/// Properties and fields by name, optionally also by type and owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSpecification {
    name: String,
    ty: Option<TypeRef>,
    owner: Option<TypeRef>,
}

impl MemberSpecification {
    /// Members named `name` of type `ty`
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            owner: None,
        }
    }

    /// Members named `name`, any type
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            owner: None,
        }
    }

    /// Restrict to members declared by `owner`
    #[inline]
    #[must_use]
    pub fn declared_by(mut self, owner: TypeRef) -> Self {
        self.owner = Some(owner);
        self
    }
}

impl RequestSpecification for MemberSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        request.member().is_some_and(|m| {
            m.name == self.name
                && self.ty.map_or(true, |ty| m.ty == ty)
                && self.owner.map_or(true, |owner| m.owner == owner)
        })
    }
}

/// Seeded requests for one type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededSpecification(pub TypeRef);

impl RequestSpecification for SeededSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        matches!(request, Request::Seeded { ty, .. } if *ty == self.0)
    }
}

/// Type requests for any record type
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyObjectSpecification;

impl RequestSpecification for AnyObjectSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        matches!(request, Request::Type(ty) if matches!(ty.shape(), Shape::Object(_)))
    }
}

/// Type requests for record types marked as custom collections
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionSpecification;

impl RequestSpecification for CollectionSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        let Request::Type(ty) = request else {
            return false;
        };
        ty.shape().as_object().is_some_and(|o| o.is_collection())
    }
}

/// Always satisfied
#[derive(Debug, Clone, Copy, Default)]
pub struct TrueSpecification;

impl RequestSpecification for TrueSpecification {
    fn is_satisfied_by(&self, _request: &Request) -> bool {
        true
    }
}

/// All inner specifications hold
#[derive(Debug, Clone, Default)]
pub struct AndSpecification(pub Vec<Arc<dyn RequestSpecification>>);

impl RequestSpecification for AndSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        self.0.iter().all(|s| s.is_satisfied_by(request))
    }
}

/// Any inner specification holds
#[derive(Debug, Clone, Default)]
pub struct OrSpecification(pub Vec<Arc<dyn RequestSpecification>>);

impl RequestSpecification for OrSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        self.0.iter().any(|s| s.is_satisfied_by(request))
    }
}

/// Negation of the inner specification
#[derive(Debug, Clone)]
pub struct InverseSpecification(pub Arc<dyn RequestSpecification>);

impl RequestSpecification for InverseSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        !self.0.is_satisfied_by(request)
    }
}

/// Specification from a closure
pub struct FnSpecification<F>(pub F);

impl<F> Debug for FnSpecification<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("FnSpecification")
    }
}

impl<F> RequestSpecification for FnSpecification<F>
where
    F: Fn(&Request) -> bool + Send + Sync,
{
    fn is_satisfied_by(&self, request: &Request) -> bool {
        (self.0)(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing::RootContext;
    use specimen_kernel::{
        param, Dyn, Introspect, MemberInfo, MemberKind, ObjectShape, ParameterInfo,
    };

    trait Auditable: Debug + Send + Sync {}

    #[derive(Debug, Clone, Default)]
    struct Invoice {
        number: u32,
    }

    impl Introspect for Invoice {
        fn shape() -> Shape {
            ObjectShape::builder::<Self>()
                .constructor("new", vec![param::<u32>("number")], |args| {
                    Ok(Invoice { number: args.take()? })
                })
                .implements::<Dyn<dyn Auditable>>()
                .collection()
                .build()
        }
    }

    #[derive(Debug)]
    struct Fixed;

    impl SpecimenBuilder for Fixed {
        fn create(&self, _: &Request, _: &dyn SpecimenContext) -> Result<Specimen, FixtureError> {
            Ok(Specimen::of(1_u8))
        }
    }

    fn parameter(name: &'static str) -> Request {
        Request::Parameter(ParameterInfo {
            owner: TypeRef::of::<Invoice>(),
            constructor: "new",
            position: 0,
            name,
            ty: TypeRef::of::<u32>(),
            constraint: None,
        })
    }

    fn property(name: &'static str) -> Request {
        Request::Property(MemberInfo {
            owner: TypeRef::of::<Invoice>(),
            name,
            kind: MemberKind::Property,
            ty: TypeRef::of::<String>(),
            constraint: None,
        })
    }

    #[test]
    fn filter_skips_inner_builder_when_unsatisfied() {
        let filter = FilteringBuilder::new(Fixed, ExactTypeSpecification(TypeRef::of::<u8>()));
        let context = RootContext::new(&filter);
        assert!(filter.create(&Request::of::<u8>(), &context).unwrap().is_satisfied());
        assert!(filter
            .create(&Request::of::<u16>(), &context)
            .unwrap()
            .is_no_specimen());
    }

    #[test]
    fn implements_matches_declared_interfaces() {
        let spec = ImplementsSpecification(TypeRef::of::<Dyn<dyn Auditable>>());
        assert!(spec.is_satisfied_by(&Request::of::<Invoice>()));
        assert!(spec.is_satisfied_by(&Request::of::<Dyn<dyn Auditable>>()));
        assert!(!spec.is_satisfied_by(&Request::of::<String>()));
    }

    #[test]
    fn parameter_and_member_specifications_match_names() {
        assert!(ParameterSpecification::named("number").is_satisfied_by(&parameter("number")));
        assert!(ParameterSpecification::new("number", TypeRef::of::<u32>())
            .is_satisfied_by(&parameter("number")));
        assert!(!ParameterSpecification::new("number", TypeRef::of::<u8>())
            .is_satisfied_by(&parameter("number")));
        assert!(!ParameterSpecification::named("number").is_satisfied_by(&property("number")));

        let member = MemberSpecification::new("memo", TypeRef::of::<String>())
            .declared_by(TypeRef::of::<Invoice>());
        assert!(member.is_satisfied_by(&property("memo")));
        assert!(!member.is_satisfied_by(&property("title")));
    }

    #[test]
    fn object_and_collection_specifications() {
        assert!(AnyObjectSpecification.is_satisfied_by(&Request::of::<Invoice>()));
        assert!(!AnyObjectSpecification.is_satisfied_by(&Request::of::<u8>()));
        assert!(CollectionSpecification.is_satisfied_by(&Request::of::<Invoice>()));
    }

    #[test]
    fn combinators_compose() {
        let exact: Arc<dyn RequestSpecification> =
            Arc::new(ExactTypeSpecification(TypeRef::of::<u8>()));
        let any: Arc<dyn RequestSpecification> = Arc::new(TrueSpecification);
        let request = Request::of::<u16>();

        assert!(!AndSpecification(vec![Arc::clone(&exact), Arc::clone(&any)])
            .is_satisfied_by(&request));
        assert!(OrSpecification(vec![Arc::clone(&exact), any]).is_satisfied_by(&request));
        assert!(InverseSpecification(exact).is_satisfied_by(&request));
        assert!(FnSpecification(|r: &Request| r.target_type().is_some()).is_satisfied_by(&request));
    }
}
