//! E2E tests against the model bundle shipped in `models/`.

mod helpers;

use axum::http::StatusCode;

use helpers::{TestHarness, bundled_model_path};
use vx_cli::report;
use vx_nlu::{CommandProcessor, NluConfig};

#[tokio::test]
async fn e2e_bundled_model_loads() {
    let h = TestHarness::with_bundled_model().await;

    let (_, json) = h.get("/health").await;
    assert_eq!(json["model"]["state"], "ready");
    assert_eq!(json["model"]["name"], "nlu-20250801-101311");
    assert_eq!(json["model"]["backend"], "artifact");
}

#[tokio::test]
async fn e2e_bundled_model_dispatches_known_phrases() {
    let h = TestHarness::with_bundled_model().await;

    let cases = [
        ("send money to my friend", "send_money", "send_money_flow"),
        ("Recharge my mobile please", "top_up", "top_up_flow"),
        ("card to card transfer", "card_to_card_transfer", "card_transfer_flow"),
    ];

    for (command, intent, action) in cases {
        let (status, json) = h.process(command).await;
        assert_eq!(status, StatusCode::OK, "command '{command}'");
        assert_eq!(json["intent_name"], intent, "command '{command}'");
        assert_eq!(json["action"], action, "command '{command}'");
        assert_eq!(json["outcome"], "handled", "command '{command}'");
    }
}

#[tokio::test]
async fn e2e_bundled_model_greeting_is_unhandled() {
    let h = TestHarness::with_bundled_model().await;

    let (_, json) = h.process("hello").await;
    assert_eq!(json["matched"], true);
    assert_eq!(json["outcome"], "unhandled");
    assert_eq!(json["intent_name"], "greet");
    assert_eq!(json["confidence"], 1.0);
}

#[tokio::test]
async fn e2e_bundled_model_partial_match_below_threshold() {
    let h = TestHarness::with_bundled_model().await;

    let (_, json) = h.process("send money quickly to my brother today").await;
    assert_eq!(json["matched"], false);
    assert_eq!(json["outcome"], "below_threshold");
    assert_eq!(json["intent_name"], "send_money");
    assert_eq!(
        json["message"],
        "Could not determine action. Confidence (0.67) is below threshold (0.8)."
    );
}

#[tokio::test]
async fn e2e_bundled_model_gibberish_has_no_intent() {
    let h = TestHarness::with_bundled_model().await;

    let (_, json) = h.process("xyzzy plugh").await;
    assert_eq!(json["matched"], false);
    assert!(json["intent_name"].is_null());
    assert_eq!(json["confidence"], 0.0);
}

/// A lower configured threshold lets partial matches through.
#[tokio::test]
async fn e2e_threshold_is_configurable() {
    let config = NluConfig {
        model_path: bundled_model_path(),
        confidence_threshold: vx_protocol::Threshold::new(0.5).unwrap(),
        ..NluConfig::default()
    };
    let h = TestHarness::from_config(&config).await;

    let (_, json) = h.process("send money quickly to my brother today").await;
    assert_eq!(json["matched"], true);
    assert_eq!(json["action"], "send_money_flow");
    assert_eq!(json["threshold"], 0.5);
}

/// The terminal front-end renders the same decision the API returns.
#[tokio::test]
async fn e2e_cli_report_for_bundled_model() {
    let config = NluConfig {
        model_path: bundled_model_path(),
        ..NluConfig::default()
    };
    let processor = CommandProcessor::from_config(&config);
    processor.manager().load(&config.model_path).await.unwrap();

    let processed = processor.process("top up my phone").await;
    let out = report::render(&processed.decision, &processed.message);
    assert_eq!(
        out,
        "\n--- NLU Analysis ---\nIntent: top_up\nConfidence: 1.00\nAction: Initiating 'mobile top-up' flow...\n"
    );

    let processed = processor.process("xyzzy").await;
    let out = report::render(&processed.decision, &processed.message);
    assert!(out.contains("Intent: none\n"));
    assert!(out.contains("Confidence: 0.00\n"));
}
