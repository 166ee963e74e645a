/// Hierarchical scope identifiers
///
/// A scope is a separator-delimited path (`admin::user::create`) whose
/// ordered ancestor prefixes form the inheritance chain used by access
/// checks: access to a parent scope implies access to every descendant.
///
/// # Examples
///
/// ```
/// use echelon_authz::scope::Scope;
///
/// let scope = Scope::parse("admin::user::create", "::").unwrap();
/// assert_eq!(
///     scope.prefix_chain(),
///     vec!["admin", "admin::user", "admin::user::create"],
/// );
/// ```
mod types;

#[cfg(test)]
mod tests;

pub use types::{Scope, ScopeError, ScopeResult};
