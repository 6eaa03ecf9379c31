//! E2E tests for degraded flows: bad input, spent tokens, and catalog
//! changes between a proposal and its confirmation.

mod helpers;

use uuid::Uuid;

use helpers::TestHarness;
use vc_pipeline::{CommandPlan, RejectReason};
use vc_protocol::CoreError;

/// Unusable transcripts surface as validation errors, never as panics
/// or empty plans.
#[tokio::test]
async fn e2e_unusable_transcripts_are_invalid_input() {
    let h = TestHarness::with_sample_data();

    let err = h.say("").await.unwrap_err();
    assert!(err.to_string().contains("a transcript is required"));

    let err = h.say("   ").await.unwrap_err();
    assert!(err.to_string().contains("could not detect an item"));

    let err = h.say("add").await.unwrap_err();
    assert!(matches!(err, CoreError::InputValidation(_)));
}

/// Confirmation tokens are single-use for every outcome: confirm,
/// reject, or a never-issued token.
#[tokio::test]
async fn e2e_tokens_are_single_use() {
    let h = TestHarness::with_sample_data();

    // Brand selection: reject, then the token is gone.
    let planned = h.say("add milk").await.unwrap();
    let brand = TestHarness::expect_brand_selection(planned);
    h.planner.reject_brand_selection(brand.token).unwrap();
    let err = h.planner.reject_brand_selection(brand.token).unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));

    // Substitute: decline, then the token is gone.
    let planned = h.say("add oranges").await.unwrap();
    let substitute = TestHarness::expect_substitute(planned);
    let plan = h.planner.confirm_substitute(substitute.token, false, None).unwrap();
    assert!(matches!(plan, CommandPlan::Declined { .. }));
    let err = h.planner.confirm_substitute(substitute.token, true, None).unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));

    // A token that was never issued.
    let err = h
        .planner
        .confirm_brand_selection(Uuid::new_v4(), "PRD-APL-GO", &h.preferences)
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

/// Picking a SKU outside the proposal burns the substitute token.
#[tokio::test]
async fn e2e_invalid_selection_burns_the_substitute_token() {
    let h = TestHarness::with_sample_data();

    let planned = h.say("add oranges").await.unwrap();
    let confirmation = TestHarness::expect_substitute(planned);

    let err =
        h.planner.confirm_substitute(confirmation.token, true, Some("NOT-A-SKU")).unwrap_err();
    assert!(matches!(err, CoreError::InputValidation(_)));

    let err = h.planner.confirm_substitute(confirmation.token, true, None).unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

/// Items nothing resembles are rejected with the reason spelled out.
#[tokio::test]
async fn e2e_unmatched_items_are_rejected() {
    let h = TestHarness::with_sample_data();

    let planned = h.say("add dragonfruit").await.unwrap();
    let CommandPlan::Rejected { reason, message } = planned.plan else {
        panic!("expected rejection, got {:?}", planned.plan);
    };
    assert_eq!(reason, RejectReason::NotInCatalog);
    assert!(message.contains("dragonfruit"));
}

/// A catalog swap between proposal and confirmation: the brand flow
/// re-resolves against the live catalog and rejects, while the
/// substitute flow applies from its stored, self-contained option.
#[tokio::test]
async fn e2e_catalog_swap_between_proposal_and_confirmation() {
    let h = TestHarness::with_sample_data();

    let planned = h.say("add 2 kg apples").await.unwrap();
    let brand = TestHarness::expect_brand_selection(planned);
    let planned = h.say("add oranges").await.unwrap();
    let substitute = TestHarness::expect_substitute(planned);

    h.catalog.replace(Vec::new());

    // Brand confirmation goes back through catalog matching.
    let resolved =
        h.planner.confirm_brand_selection(brand.token, "PRD-APL-FF", &h.preferences).unwrap();
    let CommandPlan::Rejected { reason, .. } = resolved.plan else {
        panic!("expected rejection, got {:?}", resolved.plan);
    };
    assert_eq!(reason, RejectReason::NotInCatalog);

    // Substitute confirmation replays the stored option.
    let plan = h.planner.confirm_substitute(substitute.token, true, None).unwrap();
    let CommandPlan::Apply { entry, .. } = plan else {
        panic!("expected apply, got {plan:?}");
    };
    assert_eq!(entry.sku, "BEV-OJC-TF");
}
