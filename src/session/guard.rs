use uuid::Uuid;

pub const LANDING_PAGE: &str = "/";
pub const DASHBOARD_PAGE: &str = "/dashboard";

/// The authenticated identity behind a request
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub session_id: String,
}

/// Per-request authentication state, built once by the session loader and
/// handed to guards and handlers explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub user: Option<CurrentUser>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: CurrentUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Lets logged-in visitors through, sends everyone else to the landing page
pub fn require_authenticated(ctx: &RequestContext) -> GuardDecision {
    if ctx.is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(LANDING_PAGE)
    }
}

/// Lets anonymous visitors through, sends logged-in users to their dashboard
pub fn require_guest(ctx: &RequestContext) -> GuardDecision {
    if ctx.is_authenticated() {
        GuardDecision::Redirect(DASHBOARD_PAGE)
    } else {
        GuardDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged_in() -> RequestContext {
        RequestContext::authenticated(CurrentUser {
            user_id: Uuid::new_v4(),
            session_id: "session-1".to_string(),
        })
    }

    #[test]
    fn test_require_authenticated() {
        assert_eq!(require_authenticated(&logged_in()), GuardDecision::Allow);
        assert_eq!(
            require_authenticated(&RequestContext::anonymous()),
            GuardDecision::Redirect("/")
        );
    }

    #[test]
    fn test_require_guest() {
        assert_eq!(
            require_guest(&RequestContext::anonymous()),
            GuardDecision::Allow
        );
        assert_eq!(
            require_guest(&logged_in()),
            GuardDecision::Redirect("/dashboard")
        );
    }

    #[test]
    fn test_default_context_is_anonymous() {
        assert!(!RequestContext::default().is_authenticated());
    }
}
