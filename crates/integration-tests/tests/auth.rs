//! Credential validation and session transition behavior.

use pinstick_core::PLACEHOLDER_DISPLAY_NAME;
use pinstick_store::AuthError;
use pinstick_store::SyncPhase;

use pinstick_integration_tests::TestContext;

#[tokio::test]
async fn test_malformed_email_rejected_locally() {
    let ctx = TestContext::new();

    assert!(matches!(
        ctx.auth.sign_in("not-an-email", "secret1").await,
        Err(AuthError::InvalidEmail(_))
    ));
    assert!(matches!(
        ctx.auth.create_account("@nope", "secret1", "X").await,
        Err(AuthError::InvalidEmail(_))
    ));
}

#[tokio::test]
async fn test_weak_password_rejected_before_backend() {
    let ctx = TestContext::new();

    assert!(matches!(
        ctx.auth.create_account("a@example.com", "12345", "Ada").await,
        Err(AuthError::WeakPassword(_))
    ));
    // Nothing was created; sign-in still fails with unknown credentials.
    assert_eq!(
        ctx.auth.sign_in("a@example.com", "12345").await,
        Err(AuthError::InvalidCredentials)
    );
}

#[tokio::test]
async fn test_duplicate_account_rejected() {
    let ctx = TestContext::new();
    ctx.sign_up("a@example.com", "Ada").await;

    assert_eq!(
        ctx.auth.create_account("a@example.com", "secret2", "Imp").await,
        Err(AuthError::EmailAlreadyInUse)
    );
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let ctx = TestContext::new();
    ctx.sign_up("a@example.com", "Ada").await;
    ctx.auth.sign_out().await.expect("sign out");

    assert_eq!(
        ctx.auth.sign_in("a@example.com", "wrong-password").await,
        Err(AuthError::InvalidCredentials)
    );
}

#[tokio::test]
async fn test_password_reset_requires_known_account() {
    let ctx = TestContext::new();
    ctx.sign_up("a@example.com", "Ada").await;

    assert!(ctx.auth.send_password_reset("a@example.com").await.is_ok());
    assert_eq!(
        ctx.auth.send_password_reset("b@example.com").await,
        Err(AuthError::AccountNotFound)
    );
}

#[tokio::test]
async fn test_display_name_stored_and_placeholder_fallback() {
    let ctx = TestContext::new();

    let named = ctx.sign_up("a@example.com", "Ada").await;
    assert_eq!(named.display_name_or_placeholder(), "Ada");

    ctx.auth.sign_out().await.expect("sign out");
    ctx.wait_for(|s| s.phase == SyncPhase::Anonymous).await;

    let unnamed = ctx.sign_up("b@example.com", "").await;
    assert_eq!(
        unnamed.display_name_or_placeholder(),
        PLACEHOLDER_DISPLAY_NAME
    );
}

#[tokio::test]
async fn test_session_watch_drives_cart_phases() {
    let ctx = TestContext::new();

    // First observation of a signed-out backend.
    ctx.wait_for(|s| s.phase == SyncPhase::Anonymous).await;

    ctx.sign_up("a@example.com", "Ada").await;
    assert_eq!(ctx.cart.snapshot().phase, SyncPhase::Synced);

    ctx.auth.sign_out().await.expect("sign out");
    ctx.wait_for(|s| s.phase == SyncPhase::Anonymous).await;
}
