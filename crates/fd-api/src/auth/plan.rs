//! Plan entitlements carried in the session token.

use super::AuthUser;

/// Plan slug that unlocks unlimited decks and AI generation.
pub const PRO_PLAN: &str = "pro_plan";

impl AuthUser {
    pub fn has_plan(&self, plan: &str) -> bool {
        self.plan.as_deref() == Some(plan)
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    pub fn is_pro(&self) -> bool {
        self.has_plan(PRO_PLAN)
    }
}
