// View models for the submission and results screens.
//
// Nothing in here touches a terminal or the network: the screens own one of
// these values and render from it, so the navigation rules are testable on
// their own.

use crate::error::ValidationError;
use crate::evaluate::{EvaluatedReport, ScoringPolicy, evaluate};
use crate::export::ExportContext;
use crate::validate::validate_request;
use auditly_client::{AuditError, AuditReport, AuditRequest};
use chrono::{DateTime, Local};
use tracing::debug;
use url::Url;

pub const AUDIT_FAILED_MESSAGE: &str = "Audit failed, please try again!";
pub const NO_ISSUES_MESSAGE: &str = "No major SEO issues found";
pub const LOADING_MESSAGE: &str = "Auditing...";

/// What the submission screen hands to the results screen.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditHandoff {
    pub report: AuditReport,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotLink {
    pub label: &'static str,
    pub identifier: String,
    pub url: Option<Url>,
}

/// Read-only state behind the results screen.
///
/// Only the report is kept; the evaluation is derived from it on demand.
#[derive(Debug, Clone)]
pub struct ResultsView {
    url: String,
    report: AuditReport,
    policy: ScoringPolicy,
    screenshots: Vec<ScreenshotLink>,
}

impl ResultsView {
    pub fn new(handoff: AuditHandoff, policy: &ScoringPolicy, screenshot_base: &Url) -> Self {
        let AuditHandoff { report, url } = handoff;
        let screenshots = screenshot_links(&report, screenshot_base);
        Self {
            url,
            report,
            policy: policy.clone(),
            screenshots,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn report(&self) -> &AuditReport {
        &self.report
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score and issues for the report, recomputed on every call.
    pub fn evaluated(&self) -> EvaluatedReport {
        evaluate(&self.report, &self.policy)
    }

    pub fn screenshots(&self) -> &[ScreenshotLink] {
        &self.screenshots
    }

    /// Issue lines to show, or the single "no issues" affirmation.
    pub fn issue_lines(&self) -> Vec<String> {
        let evaluated = self.evaluated();
        if evaluated.issues.is_empty() {
            vec![NO_ISSUES_MESSAGE.to_string()]
        } else {
            evaluated.issues
        }
    }

    pub fn export_context(&self, generated_at: DateTime<Local>) -> ExportContext {
        ExportContext {
            url: self.url.clone(),
            evaluated: self.evaluated(),
            load_time_ms: self.report.load_time_ms(),
            generated_at,
        }
    }
}

fn screenshot_links(report: &AuditReport, base: &Url) -> Vec<ScreenshotLink> {
    [
        ("Desktop", report.desktop_screenshot()),
        ("Mobile", report.mobile_screenshot()),
    ]
    .into_iter()
    .filter_map(|(label, identifier)| {
        let identifier = identifier.filter(|id| !id.is_empty())?;
        Some(ScreenshotLink {
            label,
            identifier: identifier.to_string(),
            url: resolve_screenshot(base, identifier),
        })
    })
    .collect()
}

/// `<base>/<identifier>`; identifiers are relative even with a leading slash.
pub fn resolve_screenshot(base: &Url, identifier: &str) -> Option<Url> {
    base.join(identifier.trim_start_matches('/')).ok()
}

/// Which screen is showing.
#[derive(Debug, Clone)]
pub enum Route {
    Submission,
    Results(Box<ResultsView>),
}

impl Route {
    /// Open the results screen. Without a hand-off (direct entry, a stale
    /// navigation) this falls back to the submission screen.
    pub fn results(
        handoff: Option<AuditHandoff>,
        policy: &ScoringPolicy,
        screenshot_base: &Url,
    ) -> Route {
        match handoff {
            Some(handoff) => Route::Results(Box::new(ResultsView::new(
                handoff,
                policy,
                screenshot_base,
            ))),
            None => {
                debug!("Results opened without report state, returning to submission");
                Route::Submission
            }
        }
    }

    /// The "new audit" action: drop the report and go back.
    pub fn new_audit(&mut self) {
        *self = Route::Submission;
    }

    pub fn is_submission(&self) -> bool {
        matches!(self, Route::Submission)
    }
}

/// Identifies one submitted request so late answers can be recognised.
pub type Ticket = u64;

/// State behind the submission screen.
///
/// At most one audit is in flight. Abandoning the wait does not cancel the
/// request: its answer is ignored when it arrives, and no new audit can be
/// submitted until it has.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub input: String,
    error: Option<String>,
    in_flight: Option<Ticket>,
    abandoned: Option<Ticket>,
    next_ticket: Ticket,
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// An abandoned request has not answered yet.
    pub fn is_draining(&self) -> bool {
        self.abandoned.is_some()
    }

    /// Validate the input and, if it is acceptable and nothing is pending,
    /// start a request. Returns `Ok(None)` while another audit is loading or
    /// an abandoned one has not answered yet.
    pub fn submit(&mut self) -> Result<Option<(Ticket, AuditRequest)>, ValidationError> {
        if self.is_loading() || self.is_draining() {
            return Ok(None);
        }

        let request = match validate_request(&self.input) {
            Ok(request) => request,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        self.error = None;
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight = Some(ticket);
        Ok(Some((ticket, request)))
    }

    /// Record the outcome for `ticket`. A hand-off is returned only for the
    /// current request's success; stale tickets are ignored.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        url: String,
        outcome: Result<AuditReport, AuditError>,
    ) -> Option<AuditHandoff> {
        if self.abandoned == Some(ticket) {
            debug!("Discarding result for abandoned audit #{}", ticket);
            self.abandoned = None;
            return None;
        }
        if self.in_flight != Some(ticket) {
            debug!("Ignoring result for unknown audit #{}", ticket);
            return None;
        }
        self.in_flight = None;

        match outcome {
            Ok(report) => Some(AuditHandoff { report, url }),
            Err(err) => {
                debug!("Audit #{} failed: {}", ticket, err);
                self.error = Some(AUDIT_FAILED_MESSAGE.to_string());
                None
            }
        }
    }

    /// Stop waiting for the pending request, if any. Its answer is still
    /// awaited before another audit may start.
    pub fn abandon(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            self.abandoned = Some(ticket);
        }
    }

    /// Clear the input and messages for a fresh audit. A pending request is
    /// abandoned and keeps blocking submission until it answers.
    pub fn reset(&mut self) {
        self.abandon();
        self.input.clear();
        self.error = None;
    }
}
