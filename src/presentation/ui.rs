use crate::application::{App, AppMode, WizardPhase};
use crate::domain::{Field, Step};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const ACCENT: Color = Color::Rgb(255, 140, 0);
const SUCCESS: Color = Color::Rgb(34, 197, 94);

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    render_home(f, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }

    if app.quote_modal.is_visible() {
        render_quote_modal(f, app);
    }
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("Dispatchly | Full truck loads across India")
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    f.render_widget(header, area);
}

fn render_home(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "MOVE ANYTHING. ANYWHERE IN INDIA.",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from("Verified trucks from Tata Ace to 28 MT trailers across 10 hub cities."),
        Line::from("Tell us where, what and when, and our team calls back within 2 hours."),
        Line::default(),
        Line::from(vec![
            Span::styled("[g]", Style::default().fg(ACCENT)),
            Span::raw(" Get a quote   "),
            Span::styled("[?]", Style::default().fg(ACCENT)),
            Span::raw(" Help   "),
            Span::styled("[q]", Style::default().fg(ACCENT)),
            Span::raw(" Quit"),
        ]),
    ];

    let home = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Home"))
        .wrap(Wrap { trim: true });
    f.render_widget(home, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(ref status) = app.status_message {
        status.clone()
    } else if app.quote_modal.is_visible() {
        match app.wizard.phase() {
            WizardPhase::Editing(_) => concat!(
                "Tab/↑↓: field | ←→: choose | ",
                "Enter: next/submit | Ctrl+B: back | Esc: close"
            )
            .to_string(),
            WizardPhase::Submitting => "Submitting your request... (Esc: close)".to_string(),
            WizardPhase::Success => "Enter: done | c: copy quote ID | Esc: close".to_string(),
        }
    } else {
        "g: get a quote | ?: help | q: quit".to_string()
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

/// Returns a rectangle centered in `area` covering the given percentages.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let scale = |total: u16, percent: u16| (u32::from(total) * u32::from(percent) / 100) as u16;
    let width = scale(area.width, percent_x).max(40).min(area.width);
    let height = scale(area.height, percent_y).max(20).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_quote_modal(f: &mut Frame, app: &App) {
    let area = centered_rect(70, 85, f.area());
    f.render_widget(Clear, area);

    let (title, lines) = if app.wizard.is_complete() {
        (" Quote Requested ", success_lines(app))
    } else {
        (" Get a Quote ", wizard_lines(app))
    };

    let modal = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(modal, area);
}

fn progress_line(current: Step) -> Line<'static> {
    let mut spans = Vec::new();
    for step in Step::ALL {
        let reached = step.number() <= current.number();
        let style = if reached {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!("[{}] {}", step.number(), step.title().to_uppercase()),
            style,
        ));
        if step.next().is_some() {
            let connector = if step.number() < current.number() {
                Style::default().fg(ACCENT)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(" ──── ", connector));
        }
    }
    Line::from(spans)
}

fn field_lines(app: &App, field: Field, focused: bool) -> Vec<Line<'static>> {
    let draft = app.wizard.draft();
    let value = draft.value(field);
    let label_style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let required = if field.is_required() { " *" } else { "" };

    let marker = if focused { "> " } else { "  " };
    let value_span = if value.is_empty() {
        Span::styled(field.placeholder().to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value.to_string())
    };
    let mut value_line = vec![Span::styled(marker, Style::default().fg(ACCENT))];
    if field.is_choice() {
        value_line.push(Span::raw("‹ "));
        value_line.push(value_span);
        value_line.push(Span::raw(" ›"));
    } else {
        value_line.push(value_span);
        if focused && !app.wizard.is_submitting() {
            value_line.push(Span::styled("▏", Style::default().fg(ACCENT)));
        }
    }

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}{}", field.label().to_uppercase(), required),
            label_style,
        )),
        Line::from(value_line),
    ];
    if let Some(error) = app.wizard.validation().for_field(field) {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }
    lines
}

fn summary_lines(app: &App) -> Vec<Line<'static>> {
    let summary = app.wizard.summary();
    let muted = Style::default().fg(Color::DarkGray);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    vec![
        Line::from(Span::styled("SUMMARY", bold)),
        Line::from(vec![
            Span::styled("Route:   ", muted),
            Span::styled(summary.route(), bold),
        ]),
        Line::from(vec![
            Span::styled("Cargo:   ", muted),
            Span::styled(summary.cargo, bold),
        ]),
        Line::from(vec![
            Span::styled("Weight:  ", muted),
            Span::styled(summary.weight, bold),
        ]),
        Line::from(vec![
            Span::styled("Vehicle: ", muted),
            Span::styled(summary.vehicle, bold),
        ]),
    ]
}

fn wizard_lines(app: &App) -> Vec<Line<'static>> {
    let step = app.wizard.step();
    let focused = app.focused_field();
    let mut lines = vec![progress_line(step), Line::default()];

    match step {
        Step::Locations => {
            lines.push(Line::from(Span::styled(
                "PICKUP LOCATION",
                Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD),
            )));
        }
        Step::Cargo | Step::Contact => {}
    }

    for field in step.fields() {
        if *field == Field::DeliveryCity {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "DELIVERY LOCATION",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )));
        }
        lines.extend(field_lines(app, *field, focused == Some(*field)));
    }

    if step == Step::Contact {
        lines.push(Line::default());
        lines.extend(summary_lines(app));
    }

    if let Some(error) = app.wizard.error() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("! {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::default());
    lines.push(navigation_line(app));
    lines
}

fn navigation_line(app: &App) -> Line<'static> {
    let key = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);
    let mut spans = Vec::new();

    if app.wizard.step() != Step::Locations {
        let style = if app.wizard.is_submitting() { disabled } else { key };
        spans.push(Span::styled("[Ctrl+B] Back", style));
        spans.push(Span::raw("   "));
    }

    if app.wizard.step() != Step::Contact {
        spans.push(Span::styled("[Enter] Next →", key));
    } else if app.wizard.is_submitting() {
        spans.push(Span::styled("Submitting...", disabled));
    } else {
        spans.push(Span::styled(
            "[Enter] Submit Request ✓",
            Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn success_lines(app: &App) -> Vec<Line<'static>> {
    let summary = app.wizard.summary();
    let muted = Style::default().fg(Color::DarkGray);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    vec![
        Line::default(),
        Line::from(Span::styled(
            "✓ REQUEST RECEIVED!",
            Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(vec![
            Span::raw("Quote ID: "),
            Span::styled(app.wizard.display_quote_id(), bold),
        ]),
        Line::from("Our team will contact you within 2 hours with a detailed quote."),
        Line::default(),
        Line::from(vec![
            Span::styled("From:    ", muted),
            Span::styled(summary.from, bold),
        ]),
        Line::from(vec![
            Span::styled("To:      ", muted),
            Span::styled(summary.to, bold),
        ]),
        Line::from(vec![
            Span::styled("Cargo:   ", muted),
            Span::styled(summary.cargo, bold),
        ]),
        Line::from(vec![
            Span::styled("Contact: ", muted),
            Span::styled(summary.contact, bold),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("[Enter] Done", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            Span::styled("[c] Copy quote ID", Style::default().fg(ACCENT)),
        ]),
    ]
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"REQUESTING A QUOTE

=== STEPS ===
1. Locations    Pickup and delivery city and address
2. Cargo        Cargo type, approximate weight, vehicle, instructions
3. Contact      Name, 10-digit mobile number, email, pickup date

Fields marked * are required. A step cannot be left with a missing
or invalid required field; the first problem is highlighted.

=== KEYS IN THE QUOTE FORM ===
Tab / Down      Next field
Shift+Tab / Up  Previous field
Left / Right    Change selection (cities, cargo type, vehicle)
Space           Next option on a selection field
Typing          Edit text fields
Backspace       Delete last character
Enter           Next step, or submit on the contact step
Ctrl+B          Back one step
Esc             Close the form (the draft is discarded)

=== AFTER SUBMITTING ===
Enter           Done
c               Copy the quote ID to the clipboard

=== VEHICLES ===
Tata Ace (0.75 MT)      Bolero Pickup (1.5 MT)
14 ft Truck (4 MT)      17 ft Truck (5 MT)
19 ft Truck (7 MT)      22 ft Truck (9 MT)
32 ft SXL (14 MT)       32 ft MXL (21 MT)
Trailer (28 MT)

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text
Home            Jump to top
Esc/?/q         Close this help window"#;
