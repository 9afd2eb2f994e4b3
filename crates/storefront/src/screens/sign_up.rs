//! Sign-up screen: email + password, one submit button.
//!
//! There is no retry state. A failed submit produces an error notice and the
//! user simply submits again.

use std::time::Duration;

use super::Route;
use crate::firebase::AuthProvider;
use crate::services::auth::SignUpService;

/// A modal-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: String,
    /// Where to go once the notice is dismissed.
    pub navigate_to: Option<Route>,
}

impl Notice {
    fn success(message: &str, navigate_to: Route) -> Self {
        Self {
            title: "Success",
            message: message.to_string(),
            navigate_to: Some(navigate_to),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            title: "Error",
            message: message.to_string(),
            navigate_to: None,
        }
    }

    /// Whether this notice reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.title == "Error"
    }
}

/// Controller for the sign-up screen.
pub struct SignUpScreen<A> {
    provider: A,
    timeout: Duration,
}

impl<A: AuthProvider> SignUpScreen<A> {
    #[must_use]
    pub const fn new(provider: A, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Submit the form.
    pub async fn submit(&self, email: &str, password: &str) -> Notice {
        match SignUpService::new(&self.provider, self.timeout)
            .register(email, password)
            .await
        {
            Ok(_) => Notice::success("User account created!", Route::AdminDashboard),
            Err(err) => Notice::error(err.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firebase::{AccountSession, FirebaseError};

    struct FixedProvider(Option<&'static str>);

    impl AuthProvider for FixedProvider {
        async fn create_account(
            &self,
            email: &str,
            _password: &str,
        ) -> Result<AccountSession, FirebaseError> {
            match self.0 {
                None => Ok(AccountSession {
                    local_id: "u1".to_string(),
                    email: email.to_string(),
                    id_token: String::new(),
                    refresh_token: String::new(),
                }),
                Some(code) => Err(FirebaseError::Auth(code.to_string())),
            }
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_success_navigates_to_dashboard() {
        let screen = SignUpScreen::new(FixedProvider(None), TIMEOUT);
        let notice = screen.submit("a@b.co", "hunter22").await;
        assert_eq!(notice.title, "Success");
        assert_eq!(notice.message, "User account created!");
        assert_eq!(notice.navigate_to, Some(Route::AdminDashboard));
        assert!(!notice.is_error());
    }

    #[tokio::test]
    async fn test_rejection_stays_on_screen() {
        let screen = SignUpScreen::new(FixedProvider(Some("EMAIL_EXISTS")), TIMEOUT);
        let notice = screen.submit("a@b.co", "hunter22").await;
        assert_eq!(notice.title, "Error");
        assert_eq!(notice.message, "This email is already registered");
        assert!(notice.is_error());
    }
}
