mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{sample_candidate, test_config};
use schedule_fill_cell::services::outreach::{ConfirmationPhase, OutreachService};
use schedule_fill_cell::ScheduleFillError;
use shared_config::DeploymentMode;
use shared_gateway::PracticeClient;

fn service(base_url: &str, mode: DeploymentMode) -> OutreachService {
    let gateway = Arc::new(PracticeClient::new(&test_config(base_url)));
    OutreachService::new(gateway, mode)
}

#[tokio::test]
async fn open_seeds_the_editable_buffer() {
    let mock_server = MockServer::start().await;
    let outreach = service(&mock_server.uri(), DeploymentMode::NonProduction);

    let message = outreach.open(&sample_candidate(), false).await.unwrap();

    assert!(message.starts_with("Hi Dana!"));
    let pending = outreach.pending().await.unwrap();
    assert_eq!(pending.client_id, "cl-1001");
    assert_eq!(pending.message, message);
    assert_eq!(pending.phase, ConfirmationPhase::Previewing);
}

#[tokio::test]
async fn confirm_sends_the_edited_buffer_not_the_composed_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sms/client/cl-1001"))
        .and(body_partial_json(json!({"message": "Short and sweet"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sent": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outreach = service(&mock_server.uri(), DeploymentMode::NonProduction);
    outreach.open(&sample_candidate(), false).await.unwrap();
    outreach
        .edit("cl-1001", "Short and sweet".to_string())
        .await
        .unwrap();

    let status = outreach.confirm("cl-1001").await.unwrap();

    assert!(status.succeeded);
    assert!(status.error.is_none());
    assert!(outreach.pending().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn success_flag_auto_clears_after_display_window() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sms/client/cl-1001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sent": true})))
        .mount(&mock_server)
        .await;

    let outreach = service(&mock_server.uri(), DeploymentMode::NonProduction);
    outreach.open(&sample_candidate(), false).await.unwrap();
    let status = outreach.confirm("cl-1001").await.unwrap();
    assert!(status.succeeded);

    tokio::time::advance(Duration::from_secs(4)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    assert!(!outreach.status("cl-1001").await.succeeded);
}

#[tokio::test]
async fn failure_keeps_edits_and_returns_to_previewing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sms/client/cl-1001"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "sms gateway down"})),
        )
        .mount(&mock_server)
        .await;

    let outreach = service(&mock_server.uri(), DeploymentMode::NonProduction);
    outreach.open(&sample_candidate(), false).await.unwrap();
    outreach
        .edit("cl-1001", "My edited note".to_string())
        .await
        .unwrap();

    let status = outreach.confirm("cl-1001").await.unwrap();

    assert!(!status.succeeded);
    assert_eq!(status.error.as_deref(), Some("sms gateway down"));

    // Back to previewing, with the edits intact, ready for a retry.
    let pending = outreach.pending().await.unwrap();
    assert_eq!(pending.phase, ConfirmationPhase::Previewing);
    assert_eq!(pending.message, "My edited note");
}

#[tokio::test]
async fn duplicate_confirm_is_ignored_while_a_send_is_in_flight() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sms/client/cl-1001"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"sent": true}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let outreach = service(&mock_server.uri(), DeploymentMode::NonProduction);
    outreach.open(&sample_candidate(), false).await.unwrap();

    let first = {
        let outreach = outreach.clone();
        tokio::spawn(async move { outreach.confirm("cl-1001").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The trigger is disabled, not surfaced as an error: the second confirm
    // reports the in-flight status and issues no second request.
    let second = outreach.confirm("cl-1001").await.unwrap();
    assert!(second.in_flight);

    let first = first.await.unwrap().unwrap();
    assert!(first.succeeded);
}

#[tokio::test]
async fn reviewing_another_candidate_while_a_send_resolves() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sms/client/cl-1001"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"sent": true}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    let outreach = service(&mock_server.uri(), DeploymentMode::NonProduction);
    outreach.open(&sample_candidate(), false).await.unwrap();

    let send = {
        let outreach = outreach.clone();
        tokio::spawn(async move { outreach.confirm("cl-1001").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // A different candidate can be opened while the first send resolves.
    let mut other = sample_candidate();
    other.client_id = "cl-2002".to_string();
    other.client_name = "Sam Ortiz".to_string();
    outreach.open(&other, false).await.unwrap();

    assert_eq!(outreach.pending().await.unwrap().client_id, "cl-2002");
    assert!(outreach.status("cl-1001").await.in_flight);

    assert!(send.await.unwrap().unwrap().succeeded);
}

#[tokio::test]
async fn cancel_discards_the_buffer_without_side_effects() {
    let mock_server = MockServer::start().await;
    let outreach = service(&mock_server.uri(), DeploymentMode::NonProduction);

    outreach.open(&sample_candidate(), false).await.unwrap();
    outreach.cancel("cl-1001").await.unwrap();

    assert!(outreach.pending().await.is_none());
    let result = outreach.confirm("cl-1001").await;
    assert_matches!(result, Err(ScheduleFillError::Validation(_)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn override_path_is_rejected_in_production() {
    let mock_server = MockServer::start().await;
    let outreach = service(&mock_server.uri(), DeploymentMode::Production);

    let result = outreach.open(&sample_candidate(), true).await;

    assert_matches!(result, Err(ScheduleFillError::Validation(_)));
    assert!(outreach.pending().await.is_none());
}

#[tokio::test]
async fn override_flag_is_forwarded_outside_production() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sms/client/cl-1001"))
        .and(body_partial_json(json!({"overrideNonProd": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sent": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outreach = service(&mock_server.uri(), DeploymentMode::NonProduction);
    outreach.open(&sample_candidate(), true).await.unwrap();

    let status = outreach.confirm("cl-1001").await.unwrap();
    assert!(status.succeeded);
}
