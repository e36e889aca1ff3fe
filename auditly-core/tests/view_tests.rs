// Tests for the submission and results view models

use auditly_client::{AuditError, AuditReport};
use auditly_core::{ScoringPolicy, evaluate};
use auditly_core::view::{
    AUDIT_FAILED_MESSAGE, AuditHandoff, NO_ISSUES_MESSAGE, ResultsView, Route, SubmissionForm,
    resolve_screenshot,
};
use serde_json::json;
use url::Url;

fn screenshot_base() -> Url {
    Url::parse("http://localhost:5000/screenshots/").unwrap()
}

fn handoff(value: serde_json::Value) -> AuditHandoff {
    AuditHandoff {
        report: AuditReport::from(value),
        url: "example.com".to_string(),
    }
}

// ============================================================================
// Routing
// ============================================================================

#[test]
fn test_results_without_handoff_redirects_to_submission() {
    let route = Route::results(None, &ScoringPolicy::standard(), &screenshot_base());
    assert!(route.is_submission());
}

#[test]
fn test_results_with_handoff_opens_results() {
    let route = Route::results(
        Some(handoff(json!({ "seo": { "title": "T" }, "loadTimeMs": 1000 }))),
        &ScoringPolicy::standard(),
        &screenshot_base(),
    );

    match route {
        Route::Results(view) => {
            assert_eq!(view.url(), "example.com");
            assert_eq!(view.evaluated().score, 50);
        }
        Route::Submission => panic!("expected results route"),
    }
}

#[test]
fn test_new_audit_discards_results() {
    let mut route = Route::results(
        Some(handoff(json!({}))),
        &ScoringPolicy::standard(),
        &screenshot_base(),
    );
    assert!(!route.is_submission());

    route.new_audit();

    assert!(route.is_submission());
}

// ============================================================================
// Results view
// ============================================================================

#[test]
fn test_no_issues_shows_affirmation() {
    let view = ResultsView::new(
        handoff(json!({
            "seo": { "title": "T", "metaDescription": "D", "headings": { "h1": ["H"] } },
            "loadTimeMs": 100
        })),
        &ScoringPolicy::standard(),
        &screenshot_base(),
    );

    assert!(view.evaluated().issues.is_empty());
    assert_eq!(view.issue_lines(), vec![NO_ISSUES_MESSAGE.to_string()]);
}

#[test]
fn test_evaluation_is_derived_from_report_each_time() {
    let view = ResultsView::new(
        handoff(json!({ "seo": { "title": "T" }, "screenshots": { "mobile": "m.png" } })),
        &ScoringPolicy::extended(),
        &screenshot_base(),
    );

    assert_eq!(view.policy().name(), "extended");
    assert_eq!(view.evaluated(), evaluate(view.report(), &ScoringPolicy::extended()));
    assert_eq!(view.evaluated(), view.evaluated());
    assert_eq!(view.evaluated().score, 40);
}

#[test]
fn test_issue_lines_list_issues() {
    let view = ResultsView::new(
        handoff(json!({ "loadTimeMs": 5000 })),
        &ScoringPolicy::standard(),
        &screenshot_base(),
    );

    assert_eq!(view.issue_lines().len(), 4);
    assert_eq!(view.issue_lines()[3], "Page load time is slow");
}

#[test]
fn test_screenshots_resolve_against_base() {
    let view = ResultsView::new(
        handoff(json!({ "screenshots": { "desktop": "abc-desktop.png", "mobile": "abc-mobile.png" } })),
        &ScoringPolicy::standard(),
        &screenshot_base(),
    );

    let shots = view.screenshots();
    assert_eq!(shots.len(), 2);
    assert_eq!(shots[0].label, "Desktop");
    assert_eq!(
        shots[0].url.as_ref().map(Url::as_str),
        Some("http://localhost:5000/screenshots/abc-desktop.png")
    );
    assert_eq!(shots[1].label, "Mobile");
}

#[test]
fn test_missing_screenshots_are_skipped() {
    let view = ResultsView::new(
        handoff(json!({ "screenshots": { "mobile": "m.png", "desktop": "" } })),
        &ScoringPolicy::standard(),
        &screenshot_base(),
    );

    assert_eq!(view.screenshots().len(), 1);
    assert_eq!(view.screenshots()[0].label, "Mobile");
}

#[test]
fn test_resolve_screenshot_strips_leading_slash() {
    let url = resolve_screenshot(&screenshot_base(), "/x.png").unwrap();
    assert_eq!(url.as_str(), "http://localhost:5000/screenshots/x.png");
}

// ============================================================================
// Submission form
// ============================================================================

#[test]
fn test_invalid_input_sets_inline_error_and_sends_nothing() {
    let mut form = SubmissionForm::new();
    form.input = "not a url".to_string();

    assert!(form.submit().is_err());
    assert_eq!(
        form.error(),
        Some("Please enter a valid URL (e.g., https://example.com)")
    );
    assert!(!form.is_loading());
}

#[test]
fn test_empty_input_is_rejected() {
    let mut form = SubmissionForm::new();
    assert!(form.submit().is_err());
}

#[test]
fn test_valid_input_starts_loading() {
    let mut form = SubmissionForm::new();
    form.input = "example.com".to_string();

    let (ticket, request) = form.submit().unwrap().unwrap();

    assert_eq!(request.url, "example.com");
    assert!(form.is_loading());
    assert!(form.error().is_none());
    assert!(ticket > 0);
}

#[test]
fn test_second_submit_while_loading_is_refused() {
    let mut form = SubmissionForm::new();
    form.input = "example.com".to_string();
    form.submit().unwrap().unwrap();

    assert!(form.submit().unwrap().is_none());
}

#[test]
fn test_success_hands_off_report() {
    let mut form = SubmissionForm::new();
    form.input = "example.com".to_string();
    let (ticket, request) = form.submit().unwrap().unwrap();

    let handoff = form
        .complete(ticket, request.url, Ok(AuditReport::from(json!({ "loadTimeMs": 1 }))))
        .unwrap();

    assert_eq!(handoff.url, "example.com");
    assert!(!form.is_loading());
}

#[test]
fn test_failure_sets_generic_message() {
    let mut form = SubmissionForm::new();
    form.input = "example.com".to_string();
    let (ticket, request) = form.submit().unwrap().unwrap();

    let handoff = form.complete(ticket, request.url, Err(AuditError::Status(500)));

    assert!(handoff.is_none());
    assert_eq!(form.error(), Some(AUDIT_FAILED_MESSAGE));
    assert!(!form.is_loading());
}

#[test]
fn test_abandoned_request_result_is_discarded() {
    let mut form = SubmissionForm::new();
    form.input = "example.com".to_string();
    let (stale, request) = form.submit().unwrap().unwrap();

    form.abandon();
    assert!(!form.is_loading());
    assert!(form.is_draining());

    let late = form.complete(stale, request.url, Ok(AuditReport::from(json!({}))));
    assert!(late.is_none());
    assert!(!form.is_draining());
    assert!(form.error().is_none());

    form.input = "example.org".to_string();
    let (current, _) = form.submit().unwrap().unwrap();
    assert!(current > stale);

    let answer = form.complete(current, "example.org".to_string(), Ok(AuditReport::from(json!({}))));
    assert_eq!(answer.unwrap().url, "example.org");
}

#[test]
fn test_no_second_request_until_abandoned_one_answers() {
    let mut form = SubmissionForm::new();
    form.input = "example.com".to_string();
    let (stale, request) = form.submit().unwrap().unwrap();
    form.abandon();

    form.input = "example.org".to_string();
    assert!(form.submit().unwrap().is_none());
    assert!(form.submit().unwrap().is_none());
    assert!(!form.is_loading());

    // A failed abandoned request does not surface its error
    form.complete(stale, request.url, Err(AuditError::Status(500)));
    assert!(form.error().is_none());

    let (_, next) = form.submit().unwrap().unwrap();
    assert_eq!(next.url, "example.org");
}

#[test]
fn test_reset_keeps_abandoned_request_blocking() {
    let mut form = SubmissionForm::new();
    form.input = "example.com".to_string();
    form.submit().unwrap().unwrap();
    form.abandon();

    form.reset();
    form.input = "example.org".to_string();

    assert!(form.submit().unwrap().is_none());
}

#[test]
fn test_reset_while_loading_blocks_until_answer() {
    let mut form = SubmissionForm::new();
    form.input = "example.com".to_string();
    let (pending, request) = form.submit().unwrap().unwrap();

    form.reset();
    form.input = "example.org".to_string();
    assert!(!form.is_loading());
    assert!(form.is_draining());
    assert!(form.submit().unwrap().is_none());

    let answer = form.complete(pending, request.url, Ok(AuditReport::from(json!({}))));
    assert!(answer.is_none());
    assert!(form.submit().unwrap().is_some());
}

#[test]
fn test_reset_clears_form() {
    let mut form = SubmissionForm::new();
    form.input = "bad".to_string();
    let _ = form.submit();

    form.reset();

    assert!(form.input.is_empty());
    assert!(form.error().is_none());
    assert!(!form.is_loading());
}
