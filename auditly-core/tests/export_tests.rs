// Tests for PDF layout and export

use auditly_core::evaluate::{EvaluatedReport, ScoreClass};
use auditly_core::export::{
    BOTTOM_LIMIT_MM, ExportContext, FontWeight, PDF_FILE_NAME, TOP_MARGIN_MM, compose_layout,
    export_pdf, render_pdf,
};
use auditly_core::view::NO_ISSUES_MESSAGE;
use chrono::{Local, TimeZone};
use tempfile::TempDir;

fn context(issues: Vec<&str>, score: u32) -> ExportContext {
    ExportContext {
        url: "https://example.com".to_string(),
        evaluated: EvaluatedReport {
            score,
            issues: issues.into_iter().map(String::from).collect(),
            score_class: ScoreClass::from_score(score),
        },
        load_time_ms: Some(1200.0),
        generated_at: Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
    }
}

fn all_text(ctx: &ExportContext) -> Vec<String> {
    compose_layout(ctx)
        .into_iter()
        .flat_map(|page| page.lines.into_iter().map(|line| line.text))
        .collect()
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_layout_sections_in_order() {
    let text = all_text(&context(vec!["Missing title tag"], 75));

    assert_eq!(
        text,
        vec![
            "Website Audit Report",
            "URL: https://example.com",
            "Generated on: 2025-03-14 09:26:53",
            "SEO Score",
            "75 / 100",
            "SEO Issues",
            "- Missing title tag",
            "Performance",
            "Load Time: 1200 ms",
        ]
    );
}

#[test]
fn test_layout_positions_follow_fixed_spacing() {
    let pages = compose_layout(&context(vec!["Missing title tag"], 75));
    assert_eq!(pages.len(), 1);

    let ys: Vec<f32> = pages[0].lines.iter().map(|line| line.y_mm).collect();
    assert_eq!(
        ys,
        vec![20.0, 30.0, 38.0, 53.0, 61.0, 76.0, 84.0, 102.0, 110.0]
    );
    assert!(pages[0].lines.iter().all(|line| line.x_mm == 20.0));
}

#[test]
fn test_headings_are_bold() {
    let pages = compose_layout(&context(vec![], 100));
    let bold: Vec<&str> = pages[0]
        .lines
        .iter()
        .filter(|line| line.weight == FontWeight::Bold)
        .map(|line| line.text.as_str())
        .collect();

    assert_eq!(
        bold,
        vec!["Website Audit Report", "SEO Score", "SEO Issues", "Performance"]
    );
    assert_eq!(pages[0].lines[0].size, 18.0);
}

#[test]
fn test_no_issues_writes_affirmation() {
    let text = all_text(&context(vec![], 100));
    assert!(text.contains(&NO_ISSUES_MESSAGE.to_string()));
    assert!(!text.iter().any(|line| line.starts_with("- ")));
}

#[test]
fn test_unknown_load_time() {
    let mut ctx = context(vec![], 100);
    ctx.load_time_ms = None;

    let text = all_text(&ctx);

    assert_eq!(text.last().map(String::as_str), Some("Load Time: N/A"));
}

#[test]
fn test_long_url_wraps() {
    let mut ctx = context(vec![], 100);
    ctx.url = format!("https://example.com/{}", "a".repeat(150));

    let pages = compose_layout(&ctx);

    assert!(pages[0].lines[1].text.starts_with("URL: https://example.com/"));
    assert!(pages[0].lines[2].text.chars().all(|c| c == 'a'));
    assert_eq!(pages[0].lines[2].y_mm - pages[0].lines[1].y_mm, 8.0);
}

#[test]
fn test_many_issues_break_onto_new_pages() {
    let issues: Vec<String> = (0..40).map(|i| format!("Issue number {}", i)).collect();
    let ctx = context(issues.iter().map(String::as_str).collect(), 0);

    let pages = compose_layout(&ctx);

    assert!(pages.len() > 1);
    for page in &pages {
        for line in &page.lines {
            assert!(line.y_mm <= BOTTOM_LIMIT_MM + 8.0);
            assert!(line.y_mm >= TOP_MARGIN_MM);
        }
    }
    // A continuation page starts at the top margin
    assert_eq!(pages[1].lines[0].y_mm, TOP_MARGIN_MM);

    let written: usize = pages
        .iter()
        .flat_map(|page| &page.lines)
        .filter(|line| line.text.starts_with("- Issue number"))
        .count();
    assert_eq!(written, 40);
}

#[test]
fn test_layout_is_deterministic() {
    let ctx = context(vec!["Missing meta description", "No H1 heading found"], 50);
    assert_eq!(compose_layout(&ctx), compose_layout(&ctx));
}

// ============================================================================
// Rendering and export
// ============================================================================

#[test]
fn test_render_pdf_produces_pdf_bytes() {
    let ctx = context(vec!["Missing title tag"], 75);
    let bytes = render_pdf(&compose_layout(&ctx), &ctx.generated_at).unwrap();

    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_render_pdf_is_byte_identical() {
    let ctx = context(vec!["Missing meta description"], 75);
    let pages = compose_layout(&ctx);

    let first = render_pdf(&pages, &ctx.generated_at).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let second = render_pdf(&pages, &ctx.generated_at).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_different_reports_get_different_documents() {
    let a = context(vec!["Missing title tag"], 75);
    let b = context(vec!["No H1 heading found"], 75);

    let first = render_pdf(&compose_layout(&a), &a.generated_at).unwrap();
    let second = render_pdf(&compose_layout(&b), &b.generated_at).unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_export_writes_fixed_file_name() {
    let dir = TempDir::new().unwrap();
    let path = export_pdf(&context(vec![], 100), dir.path()).unwrap();

    assert_eq!(path, dir.path().join(PDF_FILE_NAME));
    assert!(path.exists());
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
}

#[test]
fn test_export_twice_leaves_context_untouched() {
    let dir = TempDir::new().unwrap();
    let ctx = context(vec!["Missing title tag"], 75);
    let before = ctx.clone();

    let first = export_pdf(&ctx, dir.path()).unwrap();
    let first_bytes = std::fs::read(&first).unwrap();
    let second = export_pdf(&ctx, dir.path()).unwrap();
    let second_bytes = std::fs::read(&second).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(ctx, before);
}

#[test]
fn test_exports_to_separate_directories_match() {
    let ctx = context(vec!["Missing title tag", "Page load time is slow"], 50);
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();

    let first = export_pdf(&ctx, a.path()).unwrap();
    let second = export_pdf(&ctx, b.path()).unwrap();

    assert_eq!(
        std::fs::read(first).unwrap(),
        std::fs::read(second).unwrap()
    );
}

#[test]
fn test_export_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("reports").join("today");

    let path = export_pdf(&context(vec![], 100), &nested).unwrap();

    assert!(path.starts_with(&nested));
    assert!(path.exists());
}
