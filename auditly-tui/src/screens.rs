use crate::App;
use auditly_core::ScoreClass;
use auditly_core::export::format_load_time;
use auditly_core::view::{LOADING_MESSAGE, ResultsView, Route};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const PLACEHOLDER: &str = "https://example.com";
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

const FEATURES: [(&str, &str); 3] = [
    ("SEO checks", "title, meta description and H1 headings"),
    ("Performance", "page load time in milliseconds"),
    ("Screenshots", "desktop and mobile captures of the page"),
];

pub(crate) fn draw(f: &mut Frame, app: &App) {
    match &app.route {
        Route::Submission => draw_submission(f, app),
        Route::Results(view) => draw_results(f, app, view),
    }
}

fn draw_submission(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Input
            Constraint::Length(2), // Error or loading
            Constraint::Min(3),    // Features
            Constraint::Length(1), // Hints
        ])
        .split(f.area());

    render_header(f, chunks[0], "Audit any website in seconds");

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Website URL ")
        .border_style(Style::default().fg(if app.form.is_loading() {
            Color::DarkGray
        } else {
            Color::Cyan
        }));
    let inner = block.inner(chunks[1]);

    let offset = input_scroll(app.cursor_position, inner.width);
    let input = if app.form.input.is_empty() {
        Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(app.form.input.as_str())
            .style(Style::default().fg(Color::Yellow))
            .scroll((0, offset))
    };
    f.render_widget(input.block(block), chunks[1]);

    if !app.form.is_loading() && inner.width > 0 {
        let column = (app.cursor_position as u16).saturating_sub(offset);
        f.set_cursor_position((inner.x + column, inner.y));
    }

    let feedback = if app.form.is_loading() {
        Line::from(vec![
            Span::styled(
                SPINNER[app.tick % SPINNER.len()],
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(" "),
            Span::styled(
                LOADING_MESSAGE,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if app.form.is_draining() {
        Line::from(Span::styled(
            " Waiting for the previous audit to finish...",
            Style::default().fg(Color::DarkGray),
        ))
    } else if let Some(error) = app.form.error() {
        Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::default()
    };
    f.render_widget(Paragraph::new(feedback), chunks[2]);

    let features: Vec<Line> = FEATURES
        .iter()
        .map(|(name, detail)| {
            Line::from(vec![
                Span::styled("  ✓ ", Style::default().fg(Color::Green)),
                Span::styled(*name, Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", detail), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" What gets checked ")
        .border_style(Style::default().fg(Color::Magenta));
    f.render_widget(Paragraph::new(features).block(block), chunks[3]);

    let hints = if app.form.is_loading() {
        vec![
            key_hint(" ESC "),
            Span::raw(" Stop waiting  "),
            key_hint(" Ctrl+C "),
            Span::raw(" Exit"),
        ]
    } else {
        vec![
            key_hint(" Enter "),
            Span::raw(" Start Audit  "),
            key_hint(" ESC "),
            Span::raw(" Exit"),
        ]
    };
    f.render_widget(Paragraph::new(Line::from(hints)), chunks[4]);
}

fn draw_results(f: &mut Frame, app: &App, view: &ResultsView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Report
            Constraint::Length(1), // Status
            Constraint::Length(1), // Hints
        ])
        .split(f.area());

    render_header(f, chunks[0], "Website Audit Report");

    let evaluated = view.evaluated();
    let score_color = match evaluated.score_class {
        ScoreClass::Good => Color::Green,
        ScoreClass::Ok => Color::Yellow,
        ScoreClass::Bad => Color::Red,
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("URL: ", Style::default().fg(Color::DarkGray)),
            Span::styled(view.url().to_string(), Style::default().fg(Color::Cyan)),
        ]),
        Line::default(),
        section("SEO Score"),
        Line::from(vec![
            Span::styled(
                format!("  {} / 100", evaluated.score),
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  [{}]", evaluated.score_class.as_str().to_uppercase()),
                Style::default().fg(score_color),
            ),
        ]),
        Line::default(),
        section("SEO Issues"),
    ];

    if evaluated.has_issues() {
        lines.extend(evaluated.issues.iter().map(|issue| {
            Line::from(vec![
                Span::styled("  ✗ ", Style::default().fg(Color::Red)),
                Span::raw(issue.clone()),
            ])
        }));
    } else {
        lines.extend(view.issue_lines().into_iter().map(|text| {
            Line::from(vec![
                Span::styled("  ✓ ", Style::default().fg(Color::Green)),
                Span::raw(text),
            ])
        }));
    }

    lines.push(Line::default());
    lines.push(section("Performance"));
    lines.push(Line::from(format!(
        "  Load Time: {}",
        format_load_time(view.report().load_time_ms())
    )));

    if !view.screenshots().is_empty() {
        lines.push(Line::default());
        lines.push(section("Screenshots"));
        for shot in view.screenshots() {
            let target = shot
                .url
                .as_ref()
                .map_or_else(|| shot.identifier.clone(), |url| url.to_string());
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", shot.label), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    target,
                    Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }
    }

    let height = chunks[1].height.saturating_sub(2) as usize;
    let scroll = app.scroll_offset.min(lines.len().saturating_sub(height));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Results ")
        .border_style(Style::default().fg(score_color));
    let report = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    f.render_widget(report, chunks[1]);

    if let Some(status) = app.status() {
        let color = if status.starts_with('✓') {
            Color::Green
        } else {
            Color::Red
        };
        f.render_widget(
            Paragraph::new(status).style(Style::default().fg(color)),
            chunks[2],
        );
    }

    let hints = Line::from(vec![
        key_hint(" n "),
        Span::raw(" New Audit  "),
        key_hint(" d "),
        Span::raw(" Download PDF  "),
        key_hint(" ↑/↓ "),
        Span::raw(" Scroll  "),
        key_hint(" q/ESC "),
        Span::raw(" Exit"),
    ]);
    f.render_widget(Paragraph::new(hints), chunks[3]);
}

/// Columns the input line is scrolled by so the cursor stays inside a
/// field `width` columns wide.
pub(crate) fn input_scroll(cursor: usize, width: u16) -> u16 {
    let visible = usize::from(width.max(1));
    let offset = cursor.saturating_sub(visible - 1);
    u16::try_from(offset).unwrap_or(u16::MAX)
}

fn render_header(f: &mut Frame, area: Rect, subtitle: &str) {
    let header = Line::from(vec![
        Span::styled(
            "Auditly",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", subtitle), Style::default().fg(Color::DarkGray)),
    ]);
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(header).block(block), area);
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    ))
}

fn key_hint(label: &'static str) -> Span<'static> {
    Span::styled(label, Style::default().fg(Color::Black).bg(Color::Gray))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_scroll_keeps_cursor_in_field() {
        assert_eq!(input_scroll(0, 20), 0);
        assert_eq!(input_scroll(19, 20), 0);
        assert_eq!(input_scroll(20, 20), 1);
        assert_eq!(input_scroll(150, 20), 131);
    }

    #[test]
    fn test_input_scroll_zero_width() {
        assert_eq!(input_scroll(5, 0), 5);
    }
}
