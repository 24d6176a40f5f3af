//! Paywall access policy.
//!
//! Pure decision logic only: callers are responsible for performing the
//! atomic view-counter increment when [`AccessDecision::record_view`] is
//! set, and for invoking [`evaluate`] exactly once per distinct image
//! render. The counter is tracked per evaluation call, not per distinct
//! image, so repeated checks of the same premium image each consume quota.

/// Number of premium images a free-tier authenticated user may view.
pub const FREE_VIEW_LIMIT: i32 = 3;

/// The policy-relevant slice of a user record.
#[derive(Debug, Clone, Copy)]
pub struct ViewerAccess {
    pub is_premium: bool,
    pub viewed_images: i32,
}

/// Outcome of an access check.
///
/// `record_view` is set only when access was granted by consuming free-tier
/// quota; the caller must then increment the viewer's counter atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub record_view: bool,
}

impl AccessDecision {
    const GRANT: Self = Self {
        allowed: true,
        record_view: false,
    };
    const GRANT_COUNTED: Self = Self {
        allowed: true,
        record_view: true,
    };
    const DENY: Self = Self {
        allowed: false,
        record_view: false,
    };
}

/// Decide whether `viewer` may see an image, given its premium flag.
///
/// Rules, in order:
/// 1. Non-premium images are always visible, to anyone.
/// 2. Premium images are hidden from anonymous visitors.
/// 3. Premium subscribers see everything.
/// 4. Free-tier users see premium images while under [`FREE_VIEW_LIMIT`],
///    each grant consuming one unit of quota.
/// 5. Otherwise denied.
pub fn evaluate(viewer: Option<&ViewerAccess>, image_is_premium: bool) -> AccessDecision {
    if !image_is_premium {
        return AccessDecision::GRANT;
    }
    let Some(viewer) = viewer else {
        return AccessDecision::DENY;
    };
    if viewer.is_premium {
        return AccessDecision::GRANT;
    }
    if viewer.viewed_images < FREE_VIEW_LIMIT {
        return AccessDecision::GRANT_COUNTED;
    }
    AccessDecision::DENY
}

/// Listing predicate: visibility only, never consumes quota.
///
/// Listings omit denied images entirely rather than returning them
/// redacted, and must not count toward the free-view limit.
pub fn is_visible(viewer: Option<&ViewerAccess>, image_is_premium: bool) -> bool {
    evaluate(viewer, image_is_premium).allowed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_user(viewed: i32) -> ViewerAccess {
        ViewerAccess {
            is_premium: false,
            viewed_images: viewed,
        }
    }

    #[test]
    fn non_premium_image_visible_to_everyone() {
        assert_eq!(evaluate(None, false), AccessDecision::GRANT);
        assert_eq!(evaluate(Some(&free_user(99)), false), AccessDecision::GRANT);
        let premium = ViewerAccess {
            is_premium: true,
            viewed_images: 0,
        };
        assert_eq!(evaluate(Some(&premium), false), AccessDecision::GRANT);
    }

    #[test]
    fn non_premium_image_never_counts_a_view() {
        assert!(!evaluate(Some(&free_user(0)), false).record_view);
    }

    #[test]
    fn premium_image_denied_to_anonymous() {
        assert_eq!(evaluate(None, true), AccessDecision::DENY);
    }

    #[test]
    fn premium_subscriber_sees_premium_without_counting() {
        let viewer = ViewerAccess {
            is_premium: true,
            viewed_images: FREE_VIEW_LIMIT,
        };
        assert_eq!(evaluate(Some(&viewer), true), AccessDecision::GRANT);
    }

    #[test]
    fn free_tier_under_limit_grants_and_counts() {
        for viewed in 0..FREE_VIEW_LIMIT {
            let decision = evaluate(Some(&free_user(viewed)), true);
            assert!(decision.allowed, "viewed={viewed} should be allowed");
            assert!(decision.record_view, "viewed={viewed} should count");
        }
    }

    #[test]
    fn free_tier_at_limit_denied() {
        assert_eq!(evaluate(Some(&free_user(FREE_VIEW_LIMIT)), true), AccessDecision::DENY);
        assert_eq!(evaluate(Some(&free_user(FREE_VIEW_LIMIT + 1)), true), AccessDecision::DENY);
    }

    /// Simulates the end-to-end quota walk: three counted grants, then denial.
    #[test]
    fn quota_exhausts_after_three_views() {
        let mut viewed = 0;
        for _ in 0..3 {
            let decision = evaluate(Some(&free_user(viewed)), true);
            assert!(decision.allowed);
            if decision.record_view {
                viewed += 1;
            }
        }
        assert_eq!(viewed, 3);
        assert!(!evaluate(Some(&free_user(viewed)), true).allowed);
    }

    #[test]
    fn listing_filter_matches_evaluate_without_side_effect() {
        assert!(is_visible(None, false));
        assert!(!is_visible(None, true));
        assert!(is_visible(Some(&free_user(2)), true));
        assert!(!is_visible(Some(&free_user(3)), true));
    }
}
