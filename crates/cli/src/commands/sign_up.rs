//! `sign-up` - create an account.

use std::io::Write;

use pocket_shop_storefront::state::AppState;

use super::CommandError;

/// Submit the sign-up form once and print the notice.
///
/// # Errors
///
/// Returns `CommandError::SignUp` with the user-facing message when the
/// provider refuses the account.
pub async fn run(state: &AppState, email: &str, password: &str) -> Result<(), CommandError> {
    let notice = state.sign_up_screen().submit(email, password).await;

    if notice.is_error() {
        return Err(CommandError::SignUp(notice.message));
    }

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}: {}", notice.title, notice.message)?;
    Ok(())
}
