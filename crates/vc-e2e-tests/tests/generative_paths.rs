//! E2E tests for the generative fallback: when the backend is
//! consulted, how its output is reconciled, and how failures degrade.

mod helpers;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::TestHarness;
use vc_pipeline::CommandPlan;
use vc_protocol::ParserSource;

/// Chat API response body with the given completion content.
fn chat_response(content: &str) -> serde_json::Value {
    json!({
        "model": "llama3.2:3b",
        "message": { "role": "assistant", "content": content },
        "done": true
    })
}

/// A locale the lexicon does not claim goes through the backend, and
/// the completion's clean item drives the catalog match.
#[tokio::test]
async fn e2e_generative_refines_unfamiliar_locale() {
    let server = MockServer::start().await;
    let content = r#"{"action": "add", "item": "rice", "brand": "", "quantity": 2,
        "quantityProvided": true, "unit": "kg", "size": "",
        "filters": {"query": "rice", "brand": "", "size": ""}, "confidence": "high"}"#;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(content)))
        .mount(&server)
        .await;

    let h = TestHarness::with_generative_host(&server.uri());
    let planned = h.say_in("ajoute deux kilos de riz", "fr-FR").await.unwrap();
    assert_eq!(planned.parsed.source, ParserSource::Generative);
    assert_eq!(planned.parsed.item, "rice");

    let CommandPlan::Apply { entry, pricing, message, .. } = planned.plan else {
        panic!("expected apply, got {:?}", planned.plan);
    };
    assert_eq!(entry.sku, "GRN-RCE-GH");
    assert_eq!(pricing.billable_quantity, Some(0.4));
    assert_eq!(message, "Added 2 kg of Rice (GoldenHarvest)");
}

/// Markdown-fenced completions still parse, and the refined command
/// flows into the brand-selection machine like any other.
#[tokio::test]
async fn e2e_fenced_completion_reaches_brand_selection() {
    let server = MockServer::start().await;
    let content = "```json\n{\"action\": \"add\", \"item\": \"milk\", \"quantity\": 1, \
        \"quantityProvided\": false, \"unit\": \"unit\", \"confidence\": \"medium\"}\n```";
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(content)))
        .mount(&server)
        .await;

    let h = TestHarness::with_generative_host(&server.uri());
    let planned = h.say_in("ajoutez du lait", "fr-FR").await.unwrap();
    assert_eq!(planned.parsed.source, ParserSource::Generative);

    let confirmation = TestHarness::expect_brand_selection(planned);
    assert_eq!(confirmation.options.len(), 2);
}

/// A dead backend never takes the pipeline down; the rule parse plans
/// the command on its own.
#[tokio::test]
async fn e2e_backend_failure_degrades_to_rule_parse() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let h = TestHarness::with_generative_host(&server.uri());
    let planned = h.say("add 2 kg rice").await.unwrap();
    assert_eq!(planned.parsed.source, ParserSource::Rule);

    let CommandPlan::Apply { entry, .. } = planned.plan else {
        panic!("expected apply, got {:?}", planned.plan);
    };
    assert_eq!(entry.sku, "GRN-RCE-GH");
}

/// Locales the lexicon claims never consult the backend at all.
#[tokio::test]
async fn e2e_rule_preferred_locale_skips_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let h = TestHarness::with_generative_host(&server.uri());
    let planned = h.say_in("agrega 2 kilos de arroz", "es-MX").await.unwrap();
    assert_eq!(planned.parsed.source, ParserSource::Rule);
    assert!(matches!(planned.plan, CommandPlan::Apply { .. }));
}
