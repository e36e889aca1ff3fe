// Scoring and issue detection for audit reports

use auditly_client::AuditReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reports loading at or above this many milliseconds earn no load-time points.
pub const SLOW_LOAD_THRESHOLD_MS: f64 = 3000.0;

pub type Predicate = fn(&AuditReport) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreClass {
    Good,
    Ok,
    Bad,
}

impl ScoreClass {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            ScoreClass::Good
        } else if score >= 50 {
            ScoreClass::Ok
        } else {
            ScoreClass::Bad
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreClass::Good => "good",
            ScoreClass::Ok => "ok",
            ScoreClass::Bad => "bad",
        }
    }
}

impl fmt::Display for ScoreClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue text attached to a check, with its own trigger.
///
/// The trigger is separate from the check's `passes` predicate because the
/// two are not exact complements: a report without `loadTimeMs` earns no
/// load-time points but is not flagged as slow either.
#[derive(Clone, Copy)]
pub struct IssueRule {
    pub text: &'static str,
    pub raised_when: Predicate,
}

#[derive(Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    pub weight: u32,
    pub passes: Predicate,
    pub issue: Option<IssueRule>,
}

impl Check {
    pub fn new(name: &'static str, passes: Predicate) -> Self {
        Self {
            name,
            weight: 0,
            passes,
            issue: None,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_issue(mut self, text: &'static str, raised_when: Predicate) -> Self {
        self.issue = Some(IssueRule { text, raised_when });
        self
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("issue", &self.issue.map(|rule| rule.text))
            .finish()
    }
}

/// Ordered set of weighted checks. Order decides issue order.
#[derive(Debug, Clone)]
pub struct ScoringPolicy {
    name: &'static str,
    checks: Vec<Check>,
}

impl ScoringPolicy {
    /// Policy with caller-chosen weights. Scores are capped at 100.
    pub fn new(name: &'static str, checks: Vec<Check>) -> Self {
        Self { name, checks }
    }

    /// Policy where 100 points are split evenly across `checks`.
    pub fn evenly_weighted(name: &'static str, checks: Vec<Check>) -> Self {
        let weight = if checks.is_empty() {
            0
        } else {
            100 / checks.len() as u32
        };
        let checks = checks
            .into_iter()
            .map(|check| check.with_weight(weight))
            .collect();
        Self { name, checks }
    }

    /// Title, meta description, H1 and load time at 25 points each.
    pub fn standard() -> Self {
        Self::evenly_weighted("standard", seo_checks())
    }

    /// The standard checks plus a mobile screenshot, at 20 points each.
    /// The screenshot check never raises an issue.
    pub fn extended() -> Self {
        let mut checks = seo_checks();
        checks.push(Check::new("mobile screenshot", has_mobile_screenshot));
        Self::evenly_weighted("extended", checks)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" => Some(Self::standard()),
            "extended" => Some(Self::extended()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

fn seo_checks() -> Vec<Check> {
    vec![
        Check::new("title", has_title).with_issue("Missing title tag", |r| !has_title(r)),
        Check::new("meta description", has_meta_description)
            .with_issue("Missing meta description", |r| !has_meta_description(r)),
        Check::new("h1", has_h1).with_issue("No H1 heading found", |r| !has_h1(r)),
        Check::new("load time", loads_fast).with_issue("Page load time is slow", loads_slowly),
    ]
}

fn has_title(report: &AuditReport) -> bool {
    report.title().is_some_and(|title| !title.is_empty())
}

fn has_meta_description(report: &AuditReport) -> bool {
    report
        .meta_description()
        .is_some_and(|description| !description.is_empty())
}

fn has_h1(report: &AuditReport) -> bool {
    report.h1_count() > 0
}

fn loads_fast(report: &AuditReport) -> bool {
    report
        .load_time_ms()
        .is_some_and(|ms| ms < SLOW_LOAD_THRESHOLD_MS)
}

fn loads_slowly(report: &AuditReport) -> bool {
    report
        .load_time_ms()
        .is_some_and(|ms| ms > SLOW_LOAD_THRESHOLD_MS)
}

fn has_mobile_screenshot(report: &AuditReport) -> bool {
    report.mobile_screenshot().is_some_and(|id| !id.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedReport {
    pub score: u32,
    pub issues: Vec<String>,
    pub score_class: ScoreClass,
}

impl EvaluatedReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Score `report` against `policy`. Pure: same inputs, same output.
pub fn evaluate(report: &AuditReport, policy: &ScoringPolicy) -> EvaluatedReport {
    let mut score = 0u32;
    let mut issues: Vec<String> = Vec::new();

    for check in policy.checks() {
        if (check.passes)(report) {
            score += check.weight;
        }

        if let Some(rule) = check.issue
            && (rule.raised_when)(report)
            && !issues.iter().any(|issue| issue == rule.text)
        {
            issues.push(rule.text.to_string());
        }
    }

    let score = score.min(100);
    EvaluatedReport {
        score,
        issues,
        score_class: ScoreClass::from_score(score),
    }
}
