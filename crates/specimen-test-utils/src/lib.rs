//! Testing utilities for the specimen workspace
//!
//! Shared record types describing the shapes the pipeline has to handle:
//! plain records, self-reference, mutual reference, abstract seams,
//! enumerations, constrained members and custom collections.

#![allow(missing_docs)]

use specimen_kernel::{
    param, Constraint, Dyn, EnumShape, FixtureError, Introspect, ObjectShape, Shape,
};
use std::fmt::Debug;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber honoring `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
}

impl Introspect for Address {
    fn shape() -> Shape {
        ObjectShape::builder::<Self>()
            .constructor(
                "new",
                vec![param::<String>("street"), param::<String>("city")],
                |args| {
                    Ok(Address {
                        street: args.take()?,
                        city: args.take()?,
                    })
                },
            )
            .build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub address: Option<Address>,
    pub tags: Vec<String>,
}

impl Person {
    pub fn new(name: String, age: u32) -> Self {
        Self {
            name,
            age,
            email: String::new(),
            address: None,
            tags: Vec::new(),
        }
    }
}

impl Introspect for Person {
    fn shape() -> Shape {
        ObjectShape::builder::<Self>()
            .constructor(
                "new",
                vec![param::<String>("name"), param::<u32>("age")],
                |args| Ok(Person::new(args.take()?, args.take()?)),
            )
            .property("email", |p: &mut Person, v: String| p.email = v)
            .property("address", |p: &mut Person, v: Option<Address>| p.address = v)
            .property("tags", |p: &mut Person, v: Vec<String>| p.tags = v)
            .build()
    }
}

/// Singly linked list node; `next` refers back to `Node`
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub value: i32,
    pub next: Option<Box<Node>>,
}

impl Introspect for Node {
    fn shape() -> Shape {
        ObjectShape::builder::<Self>()
            .constructor("new", vec![param::<i32>("value")], |args| {
                Ok(Node {
                    value: args.take()?,
                    next: None,
                })
            })
            .field("next", |n: &mut Node, v: Option<Box<Node>>| n.next = v)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub name: String,
    pub department: Option<Box<Department>>,
}

impl Introspect for Employee {
    fn shape() -> Shape {
        ObjectShape::builder::<Self>()
            .constructor("new", vec![param::<String>("name")], |args| {
                Ok(Employee {
                    name: args.take()?,
                    department: None,
                })
            })
            .property("department", |e: &mut Employee, v: Option<Box<Department>>| {
                e.department = v;
            })
            .build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub title: String,
    pub head: Option<Box<Employee>>,
}

impl Introspect for Department {
    fn shape() -> Shape {
        ObjectShape::builder::<Self>()
            .constructor("new", vec![param::<String>("title")], |args| {
                Ok(Department {
                    title: args.take()?,
                    head: None,
                })
            })
            .property("head", |d: &mut Department, v: Option<Box<Employee>>| d.head = v)
            .build()
    }
}

/// Abstract seam; no built-in builder can produce one
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Debug)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    pub name: String,
    pub clock: Dyn<dyn Clock>,
}

impl Introspect for Scheduler {
    fn shape() -> Shape {
        ObjectShape::builder::<Self>()
            .constructor(
                "new",
                vec![param::<String>("name"), param::<Dyn<dyn Clock>>("clock")],
                |args| {
                    Ok(Scheduler {
                        name: args.take()?,
                        clock: args.take()?,
                    })
                },
            )
            .build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Introspect for Color {
    fn shape() -> Shape {
        EnumShape::from_values([Color::Red, Color::Green, Color::Blue])
    }
}

/// Record whose constructor parameters carry value constraints
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub code: String,
    pub quantity: u8,
    pub sku: String,
}

impl Introspect for Product {
    fn shape() -> Shape {
        ObjectShape::builder::<Self>()
            .constructor(
                "new",
                vec![
                    param::<String>("code").constrained(constraint(Constraint::length(4, 8))),
                    param::<u8>("quantity").constrained(constraint(Constraint::range(1.0, 10.0))),
                ],
                |args| {
                    Ok(Product {
                        code: args.take()?,
                        quantity: args.take()?,
                        sku: String::new(),
                    })
                },
            )
            .property_with(
                "sku",
                constraint(Constraint::pattern("[A-Z]{3}-[0-9]{4}")),
                |p: &mut Product, v: String| p.sku = v,
            )
            .build()
    }
}

fn constraint(result: Result<Constraint, FixtureError>) -> Constraint {
    result.unwrap_or_else(|e| panic!("invalid test constraint: {e}"))
}

/// Custom collection; built through its list-taking constructor
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    pub names: Vec<String>,
}

impl Introspect for Roster {
    fn shape() -> Shape {
        ObjectShape::builder::<Self>()
            .constructor("empty", vec![], |_| Ok(Roster { names: Vec::new() }))
            .constructor("from_names", vec![param::<Vec<String>>("names")], |args| {
                Ok(Roster {
                    names: args.take()?,
                })
            })
            .collection()
            .build()
    }
}

/// Record with a cheap and an expensive constructor
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub number: u64,
    pub note: Option<String>,
}

impl Introspect for Invoice {
    fn shape() -> Shape {
        ObjectShape::builder::<Self>()
            .constructor("new", vec![param::<u64>("number")], |args| {
                Ok(Invoice {
                    number: args.take()?,
                    note: None,
                })
            })
            .constructor(
                "with_note",
                vec![param::<u64>("number"), param::<String>("note")],
                |args| {
                    Ok(Invoice {
                        number: args.take()?,
                        note: Some(args.take()?),
                    })
                },
            )
            .build()
    }
}
