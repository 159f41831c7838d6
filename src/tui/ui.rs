use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table};

use crate::output::{format_rent, format_score, truncate_name};
use crate::tui::app::{App, InputMode, Slider};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 12 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Controls(7) + Table(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let controls = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_title(frame, chunks[0], app);
    render_sliders(frame, controls[0], app);
    render_top_pick(frame, controls[1], app);
    render_table(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    match app.input_mode {
        InputMode::Help => render_help_popup(frame, &app.theme),
        InputMode::ScoreBreakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }

    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = "Rent Optimizer";
    let mut spans = vec![Span::styled(
        title,
        Style::default().fg(app.theme.title_color).bold(),
    )];

    let summary = match app.dataset.origin() {
        Some(path) => format!(
            "{} neighborhoods from {}",
            app.dataset.len(),
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        ),
        None => format!("{} neighborhoods", app.dataset.len()),
    };
    let padding_len = (area.width as usize).saturating_sub(title.len() + summary.chars().count());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(summary, Style::default().fg(app.theme.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn slider_value_text(slider: Slider, value: f64) -> String {
    match slider {
        Slider::Budget => format_rent(value),
        Slider::MinSafety => format!("{:.1}", value),
        _ => format!("{:.2}", value),
    }
}

fn render_sliders(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::bordered()
        .title(" Sliders ")
        .border_style(Style::default().fg(theme.muted));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bar_width = (inner.width as usize).saturating_sub(14 + 10 + 2).clamp(4, 30);

    let lines: Vec<Line> = Slider::ALL
        .iter()
        .map(|&slider| {
            let value = app.slider_value(slider);
            let (min, max, _) = slider.range();
            let ratio = if max > min { (value - min) / (max - min) } else { 0.0 };
            let focused = slider == app.focused;

            let label_style = if focused {
                theme.slider_focused
            } else {
                Style::default().fg(theme.slider_label)
            };
            let marker = if focused { "▸ " } else { "  " };

            let mut spans = vec![
                Span::styled(format!("{}{:<12}", marker, slider.label()), label_style),
                Span::styled(
                    format!("{:>9} ", slider_value_text(slider, value)),
                    label_style,
                ),
            ];
            spans.extend(gauge(ratio, bar_width, theme.slider_fill, theme.bar_empty).spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_top_pick(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::bordered()
        .title(" Top pick ")
        .border_style(Style::default().fg(theme.muted));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match app.entries.first() {
        Some(top) => {
            let r = &top.record;
            vec![
                Line::from(Span::styled(r.name.clone(), Style::default().fg(theme.score_high).bold())),
                Line::from(vec![
                    Span::styled("Rent   ", Style::default().fg(theme.muted)),
                    Span::styled(format_rent(r.rent), Style::default().fg(theme.rent_color)),
                ]),
                Line::from(vec![
                    Span::styled("Score  ", Style::default().fg(theme.muted)),
                    Span::raw(format_score(top.value_score)),
                    Span::styled(
                        format!("  ({})", app.options.normalization.label()),
                        Style::default().fg(theme.muted),
                    ),
                ]),
                Line::from(Span::styled(
                    format!(
                        "{} cafes, metro {:.1}, safety {:.1}",
                        r.cafe_count, r.metro_proximity, r.safety_index
                    ),
                    Style::default().fg(theme.muted),
                )),
                Line::from(Span::styled(
                    format!("{} ranked, {} filtered out", app.entries.len(), app.filtered_out),
                    Style::default().fg(theme.muted),
                )),
            ]
        }
        None => vec![Line::from(Span::styled(
            "Nothing matches",
            Style::default().fg(theme.flash_error),
        ))],
    };

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.entries.is_empty() {
        let msg = app
            .empty_message
            .clone()
            .unwrap_or_else(|| "No neighborhoods to rank".to_string());
        let empty_msg = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.muted))
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    let theme = &app.theme;
    let max_score = app.max_score();

    let rows: Vec<Row> = app
        .entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index = format!("{}.", entry.rank);
            let score_color = theme.score_color(entry.value_score, max_score);
            let mut score_spans = vec![Span::styled(
                format!("{:>8} ", format_score(entry.value_score)),
                Style::default().fg(score_color),
            )];
            score_spans.extend(score_bar(entry.value_score, max_score, 8, theme).spans);

            let r = &entry.record;

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(index).style(Style::default().fg(theme.index_color)),
                Cell::from(Line::from(score_spans)),
                Cell::from(truncate_name(&r.name, 40)),
                Cell::from(format_rent(r.rent)).style(Style::default().fg(theme.rent_color)),
                Cell::from(format!("{:>5}", r.cafe_count)),
                Cell::from(format!("{:>6.1}", r.metro_proximity)),
                Cell::from(format!("{:>6.1}", r.safety_index)),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),  // Rank: "999."
        Constraint::Length(18), // Score + bar: "0.00115 ████░░░░"
        Constraint::Fill(1),    // Name
        Constraint::Length(10), // Rent
        Constraint::Length(6),  // Cafes
        Constraint::Length(7),  // Metro
        Constraint::Length(7),  // Safety
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Score", "Neighborhood", "Rent", "Cafes", "Metro", "Safety"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Error") {
            theme.flash_error
        } else {
            theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints = [
            ("Tab", ":slider "),
            ("←/→", ":adjust "),
            ("j/k", ":nav "),
            ("b", ":breakdown "),
            ("n", ":normalize "),
            ("r", ":reload "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(
                format!("{} shown", app.entries.len()),
                Style::default().fg(theme.muted),
            ),
            Span::raw("  "),
        ];
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

fn gauge(ratio: f64, width: usize, fill: Color, empty: Color) -> Line<'static> {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    let rest = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled("█".repeat(filled), Style::default().fg(fill)));
    }
    if rest > 0 {
        spans.push(Span::styled("░".repeat(rest), Style::default().fg(empty)));
    }
    Line::from(spans)
}

fn score_bar(score: f64, max_score: f64, width: usize, theme: &ThemeColors) -> Line<'static> {
    let ratio = if max_score > 0.0 { score / max_score } else { 0.0 };
    gauge(ratio, width, theme.score_color(score, max_score), theme.bar_empty)
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn popup_block<'a>(title: &'a str, theme: &ThemeColors) -> Block<'a> {
    Block::bordered()
        .title(title)
        .title_style(theme.popup_title)
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg))
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(52, 16, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(" Keyboard Shortcuts ", theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let shortcuts = [
        ("Tab / S-Tab   ", "Focus next / previous slider"),
        ("← / h         ", "Decrease focused slider"),
        ("→ / l         ", "Increase focused slider"),
        ("H / L         ", "Move slider by 5 steps"),
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("b / Enter     ", "Score breakdown"),
        ("n             ", "Toggle min-max normalization"),
        ("0             ", "Reset sliders"),
        ("r             ", "Reload dataset from disk"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = shortcuts
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

/// Render the score breakdown for the selected neighborhood
fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let Some(entry) = app.selected_entry() else {
        return;
    };
    let theme = &app.theme;
    let popup_area = centered_rect_fixed(56, 13, frame.area());
    frame.render_widget(Clear, popup_area);

    let title = format!(" {} ", truncate_name(&entry.record.name, 40));
    let block = popup_block(&title, theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let muted = Style::default().fg(theme.muted);
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "Rank {} of {}  ({})",
            entry.rank,
            app.entries.len(),
            app.options.normalization.label()
        ),
        muted,
    ))];
    lines.push(Line::from(""));

    for factor in &entry.breakdown.factors {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<8}", factor.label), Style::default().bold()),
            Span::raw(format!(
                "{:>9} x {:<5} = {}",
                format_score(factor.value),
                format!("{:.2}", factor.weight),
                format_score(factor.weighted)
            )),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Sum     ", Style::default().bold()),
        Span::raw(format_score(entry.breakdown.numerator())),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Rent    ", Style::default().bold()),
        Span::raw(format!(
            "{}  (÷ {})",
            format_rent(entry.record.rent),
            entry.breakdown.rent_divisor
        )),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Score   ", Style::default().bold()),
        Span::styled(
            format_score(entry.value_score),
            Style::default().fg(theme.score_color(entry.value_score, app.max_score())),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Esc/b: close  j/k: next/prev", muted)));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the loading spinner overlay
fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % spinner_chars.len()];

    let loading_text = Paragraph::new(format!("{} Reloading dataset...", spinner))
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.title_color));

    frame.render_widget(loading_text, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dataset::{Dataset, NeighborhoodRecord};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App {
        let dataset = Dataset::new(vec![
            NeighborhoodRecord::new("Indiranagar", 28000.0, 30, 25.0, 8.5),
            NeighborhoodRecord::new("BTM Layout", 16000.0, 12, 8.0, 7.5),
        ]);
        App::new(dataset, None, &Config::default(), ThemeColors::dark())
    }

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_centered_rect_fixed() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(50, 10, area), Rect::new(25, 15, 50, 10));
        // Clamped to the area
        assert_eq!(centered_rect_fixed(200, 50, area), area);
    }

    #[test]
    fn test_gauge_fill() {
        let line = gauge(0.5, 8, Color::Cyan, Color::DarkGray);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "████░░░░");
    }

    #[test]
    fn test_gauge_handles_nan() {
        let line = gauge(f64::NAN, 4, Color::Cyan, Color::DarkGray);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "░░░░");
    }

    #[test]
    fn test_draw_dashboard() {
        let mut app = app();
        let screen = render(&mut app, 120, 30);
        assert!(screen.contains("Rent Optimizer"));
        assert!(screen.contains("Sliders"));
        assert!(screen.contains("Top pick"));
        assert!(screen.contains("Indiranagar"));
        assert!(screen.contains("BTM Layout"));
    }

    #[test]
    fn test_draw_empty_ranking_shows_hint() {
        let mut app = app();
        app.budget = 5000.0;
        app.recompute();
        let screen = render(&mut app, 120, 30);
        assert!(screen.contains("Nothing matches"));
        assert!(screen.contains("Try increasing your budget"));
    }

    #[test]
    fn test_draw_breakdown_popup() {
        let mut app = app();
        app.show_score_breakdown();
        let screen = render(&mut app, 120, 30);
        assert!(screen.contains("Cafes"));
        assert!(screen.contains("Metro"));
        assert!(screen.contains("Safety"));
    }

    #[test]
    fn test_draw_too_small() {
        let mut app = app();
        let screen = render(&mut app, 30, 8);
        assert!(screen.contains("Terminal too small"));
    }
}
