//! Prefix-hierarchy access evaluation
//!
//! Stateless query layer over the registry: every call reads the store's
//! current record set and owns no data of its own.

use crate::error::Result;
use crate::registry::EchelonRegistry;
use crate::scope::Scope;
use crate::types::Member;
use std::collections::BTreeSet;
use tracing::debug;

/// Evaluates member access against the echelon hierarchy
///
/// Access to a parent scope implies access to every descendant, so a check
/// walks the prefix chain from the most general level down and stops at
/// the first level whose member set admits the member. The most common
/// grants sit high in the hierarchy, which makes the top-down walk the
/// cheap path.
#[derive(Clone)]
pub struct AccessEvaluator {
    registry: EchelonRegistry,
}

impl AccessEvaluator {
    /// Create an evaluator over a registry
    pub fn new(registry: EchelonRegistry) -> Self {
        Self { registry }
    }

    /// Check whether a member has access to a scope
    ///
    /// Fails with `InvalidScope` on a malformed scope. Undefined levels in
    /// the prefix chain are skipped, so a scope with zero defined ancestors
    /// is simply `false`, never an error.
    pub async fn check_access(&self, member: &Member, scope: &str) -> Result<bool> {
        let scope = Scope::parse(scope, self.registry.separator())?;

        for level in scope.prefix_chain() {
            if let Some(echelon) = self.registry.get_echelon(&level).await? {
                if echelon.admits(member) {
                    debug!(member = member.id(), scope = %scope, level = %level, "access granted");
                    return Ok(true);
                }
            }
        }

        debug!(member = member.id(), scope = %scope, "access denied");
        Ok(false)
    }

    /// Every currently defined scope the member can reach
    ///
    /// Each defined echelon is tested independently through `check_access`;
    /// no caching across calls and no ordering guarantee beyond a set of
    /// scope strings.
    pub async fn member_echelons(&self, member: &Member) -> Result<BTreeSet<String>> {
        let mut reachable = BTreeSet::new();

        for scope in self.registry.all_echelons().await?.into_keys() {
            if self.check_access(member, &scope).await? {
                reachable.insert(scope);
            }
        }

        Ok(reachable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EchelonError;
    use crate::store::MemoryStore;
    use crate::types::MemberType;
    use std::sync::Arc;

    fn fixture() -> (EchelonRegistry, AccessEvaluator) {
        let registry = EchelonRegistry::new(Arc::new(MemoryStore::new()));
        let evaluator = AccessEvaluator::new(registry.clone());
        (registry, evaluator)
    }

    #[tokio::test]
    async fn test_access_flows_downward_not_upward() {
        let (registry, evaluator) = fixture();
        registry.define_echelon("foo::bar::baz", None, None).await.unwrap();
        registry
            .add_member("foo::bar::baz", ["john117"], MemberType::User)
            .await
            .unwrap();

        let john = Member::user("john117");
        assert!(evaluator.check_access(&john, "foo::bar::baz").await.unwrap());
        assert!(!evaluator.check_access(&john, "foo::bar").await.unwrap());
        assert!(!evaluator.check_access(&john, "foo").await.unwrap());
    }

    #[tokio::test]
    async fn test_parent_grant_implies_descendants() {
        let (registry, evaluator) = fixture();
        registry.define_echelon("foo", None, None).await.unwrap();
        registry.add_member("foo", ["bob"], MemberType::User).await.unwrap();

        let bob = Member::user("bob");
        assert!(evaluator.check_access(&bob, "foo").await.unwrap());
        assert!(evaluator.check_access(&bob, "foo::bar").await.unwrap());
        assert!(evaluator.check_access(&bob, "foo::bar::baz").await.unwrap());
        // Character prefixes are not segment prefixes
        assert!(!evaluator.check_access(&bob, "food").await.unwrap());
    }

    #[tokio::test]
    async fn test_group_membership_grants_user_access() {
        let (registry, evaluator) = fixture();
        registry.define_echelon("foo", None, None).await.unwrap();
        registry.define_echelon("foo::bar", None, None).await.unwrap();
        registry
            .add_member("foo", ["group1"], MemberType::Group)
            .await
            .unwrap();

        let user = Member::user_in_groups("alice", ["group1"]);
        assert!(evaluator.check_access(&user, "foo").await.unwrap());
        assert!(evaluator.check_access(&user, "foo::bar").await.unwrap());

        let group = Member::group("group1");
        assert!(evaluator.check_access(&group, "foo::bar").await.unwrap());

        let outsider = Member::user("mallory");
        assert!(!evaluator.check_access(&outsider, "foo").await.unwrap());
    }

    #[tokio::test]
    async fn test_undefined_and_sibling_scopes() {
        let (registry, evaluator) = fixture();
        let bob = Member::user("bob");

        // Nothing defined at all
        assert!(!evaluator.check_access(&bob, "a::b").await.unwrap());

        // A defined sibling leaks nothing
        registry.define_echelon("a::c", None, None).await.unwrap();
        registry.add_member("a::c", ["bob"], MemberType::User).await.unwrap();
        assert!(!evaluator.check_access(&bob, "a::b").await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_scope_fails() {
        let (_, evaluator) = fixture();
        let err = evaluator
            .check_access(&Member::user("bob"), "::x")
            .await
            .unwrap_err();
        assert!(matches!(err, EchelonError::InvalidScope(_)));
    }

    #[tokio::test]
    async fn test_member_echelons_fixture() {
        let (registry, evaluator) = fixture();

        for scope in ["app", "app::admin", "app::admin::users", "reports", "reports::finance"] {
            registry.define_echelon(scope, None, None).await.unwrap();
        }
        registry
            .add_member("app::admin", ["carol"], MemberType::User)
            .await
            .unwrap();
        registry
            .add_member("reports", ["auditors"], MemberType::Group)
            .await
            .unwrap();

        let carol = Member::user_in_groups("carol", ["auditors"]);
        let reachable = evaluator.member_echelons(&carol).await.unwrap();
        let expected: BTreeSet<String> = ["app::admin", "app::admin::users", "reports", "reports::finance"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(reachable, expected);

        let auditors = Member::group("auditors");
        let reachable = evaluator.member_echelons(&auditors).await.unwrap();
        let expected: BTreeSet<String> = ["reports", "reports::finance"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(reachable, expected);

        let nobody = Member::user("nobody");
        assert!(evaluator.member_echelons(&nobody).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_removal_revokes_access() {
        let (registry, evaluator) = fixture();
        registry.define_echelon("foo", None, None).await.unwrap();
        registry.add_member("foo", ["bob"], MemberType::User).await.unwrap();

        let bob = Member::user("bob");
        assert!(evaluator.check_access(&bob, "foo").await.unwrap());

        registry.remove_member("foo", ["bob"], MemberType::User).await.unwrap();
        assert!(!evaluator.check_access(&bob, "foo").await.unwrap());
    }
}
