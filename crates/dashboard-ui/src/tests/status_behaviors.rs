//! Behavioral tests for the user status toggle

use crate::config::Messages;
use crate::error::DashboardError;
use crate::models::UserStatus;
use crate::status::{ToggleOutcome, toggle_status};
use crate::tests::fakes::{RecordingNotifier, RecordingRow, ScriptedStatusApi};

const TOGGLE_URL: &str = "/dashboard/users/7/toggle-status/";

// ============================================================================
// SUCCESS BEHAVIORS
// ============================================================================

#[tokio::test]
async fn given_deactivation_success_when_toggled_then_row_shows_inactive() -> crate::Result<()> {
    let api = ScriptedStatusApi::replying(true, 200, r#"{"status": "success", "is_active": false}"#);
    let row = RecordingRow::default();
    let notifier = RecordingNotifier::default();

    let outcome = toggle_status(&api, &row, &notifier, TOGGLE_URL, Some("tok"), &Messages::default()).await?;

    assert_eq!(outcome, ToggleOutcome::Updated(UserStatus::Inactive));
    assert_eq!(*row.rendered.borrow(), vec![UserStatus::Inactive]);
    let presentation = UserStatus::Inactive.presentation();
    assert_eq!(presentation.indicator_class, "status-span status-inactive");
    assert_eq!(presentation.button_class, "btn-toggle-status btn-activate");
    assert!(notifier.alerts.borrow().is_empty());
    Ok(())
}

#[tokio::test]
async fn given_activation_success_when_toggled_then_row_shows_active() -> crate::Result<()> {
    let api = ScriptedStatusApi::replying(true, 200, r#"{"status": "success", "is_active": true}"#);
    let row = RecordingRow::default();

    toggle_status(&api, &row, &RecordingNotifier::default(), TOGGLE_URL, None, &Messages::default()).await?;

    assert_eq!(*row.rendered.borrow(), vec![UserStatus::Active]);
    assert_eq!(UserStatus::Active.presentation().button_label, "Deactivate");
    Ok(())
}

#[tokio::test]
async fn given_csrf_cookie_when_toggled_then_token_and_url_are_sent() -> crate::Result<()> {
    let api = ScriptedStatusApi::replying(true, 200, r#"{"status": "success", "is_active": true}"#);

    toggle_status(
        &api,
        &RecordingRow::default(),
        &RecordingNotifier::default(),
        TOGGLE_URL,
        Some("abc123"),
        &Messages::default(),
    )
    .await?;

    assert_eq!(
        *api.calls.borrow(),
        vec![(TOGGLE_URL.to_string(), Some("abc123".to_string()))]
    );
    Ok(())
}

#[tokio::test]
async fn given_any_request_when_toggled_then_button_is_disabled_then_reenabled() {
    let api = ScriptedStatusApi::offline();
    let row = RecordingRow::default();

    let _ = toggle_status(&api, &row, &RecordingNotifier::default(), TOGGLE_URL, None, &Messages::default()).await;

    assert_eq!(*row.pending.borrow(), vec![true, false]);
}

// ============================================================================
// FAILURE BEHAVIORS
// ============================================================================

#[tokio::test]
async fn given_self_toggle_forbidden_when_toggled_then_server_message_is_alerted() {
    let api = ScriptedStatusApi::replying(
        false,
        403,
        r#"{"status": "error", "message": "You cannot deactivate yourself."}"#,
    );
    let row = RecordingRow::default();
    let notifier = RecordingNotifier::default();
    let messages = Messages::default();

    let result = toggle_status(&api, &row, &notifier, TOGGLE_URL, None, &messages).await;

    assert!(matches!(result, Err(DashboardError::Server { status: 403, .. })));
    assert!(row.rendered.borrow().is_empty());
    assert_eq!(
        *notifier.alerts.borrow(),
        vec![format!("{}: You cannot deactivate yourself.", messages.request_failed)]
    );
}

#[tokio::test]
async fn given_network_failure_when_toggled_then_generic_alert_and_row_untouched() {
    let api = ScriptedStatusApi::offline();
    let row = RecordingRow::default();
    let notifier = RecordingNotifier::default();
    let messages = Messages::default();

    let result = toggle_status(&api, &row, &notifier, TOGGLE_URL, None, &messages).await;

    assert!(matches!(result, Err(DashboardError::Network(_))));
    assert!(row.rendered.borrow().is_empty());
    assert_eq!(
        *notifier.alerts.borrow(),
        vec![format!("{}: {}", messages.request_failed, messages.network_error)]
    );
}

#[tokio::test]
async fn given_ok_reply_with_error_status_when_toggled_then_its_message_is_alerted() -> crate::Result<()> {
    let api = ScriptedStatusApi::replying(true, 200, r#"{"status": "error", "message": "Account locked."}"#);
    let row = RecordingRow::default();
    let notifier = RecordingNotifier::default();

    let outcome = toggle_status(&api, &row, &notifier, TOGGLE_URL, None, &Messages::default()).await?;

    assert_eq!(outcome, ToggleOutcome::Rejected("Account locked.".to_string()));
    assert!(row.rendered.borrow().is_empty());
    assert_eq!(notifier.alerts.borrow().len(), 1);
    Ok(())
}
