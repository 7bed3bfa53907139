//! Role-based access control for screen navigation.
//!
//! Denial is a normal outcome, not an error: the guard never fails, it
//! either permits the navigation or names the screen to land on instead.

/// Where a denied navigation lands. The front end maps this to its default
/// screen.
pub const DEFAULT_LANDING: &str = "/home";

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Allow,
  Redirect { target: &'static str },
}

impl Decision {
  pub fn is_allowed(self) -> bool { matches!(self, Self::Allow) }
}

/// Permit navigation iff a current role is known and appears in the
/// screen's required-role list.
///
/// An empty `required` list denies: no role is a member of the empty set,
/// and a screen that declares no roles is not thereby public.
pub fn decide(required: &[&str], current: Option<&str>) -> Decision {
  match current {
    Some(role) if required.contains(&role) => Decision::Allow,
    _ => Decision::Redirect { target: DEFAULT_LANDING },
  }
}
