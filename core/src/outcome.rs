// core/src/outcome.rs

//! Tagged results of resource operations.
//!
//! Every operation ends in exactly one of three states: done with a payload,
//! something missing (the order itself, or an item inside an existing order),
//! or rejected input with a reason. Store faults are not part of this type;
//! they travel separately as `StoreError`.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
  Done(T),
  Missing(Missing),
  Rejected(Rejection),
}

/// Which entity was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
  Order,
  /// The order exists but holds no item with the requested id.
  Item,
}

/// Validation failure with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection(String);

/// Result of a create-or-update call.
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted<T> {
  Created(T),
  Updated(T),
}

impl<T> Outcome<T> {
  pub fn rejected(reason: impl Into<String>) -> Self {
    Outcome::Rejected(Rejection::new(reason))
  }

  pub fn is_done(&self) -> bool {
    matches!(self, Outcome::Done(_))
  }

  pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
    match self {
      Outcome::Done(value) => Outcome::Done(f(value)),
      Outcome::Missing(missing) => Outcome::Missing(missing),
      Outcome::Rejected(rejection) => Outcome::Rejected(rejection),
    }
  }
}

impl<T> From<Rejection> for Outcome<T> {
  fn from(rejection: Rejection) -> Self {
    Outcome::Rejected(rejection)
  }
}

impl Missing {
  pub fn reason(&self) -> &'static str {
    match self {
      Missing::Order => "order not found",
      Missing::Item => "item not in specified order",
    }
  }
}

impl Rejection {
  pub fn new(reason: impl Into<String>) -> Self {
    Rejection(reason.into())
  }

  pub fn reason(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Rejection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl<T> Upserted<T> {
  pub fn created(&self) -> bool {
    matches!(self, Upserted::Created(_))
  }
}
