use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{PathApp, TERMINAL_STAGE_VALUE};

/// Main draw function for the path screen
pub fn draw(frame: &mut Frame, app: &PathApp) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Path row
            Constraint::Min(6),    // Record panel
            Constraint::Length(3), // Message panel
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(frame, chunks[0], app);
    draw_path_row(frame, chunks[1], app);
    draw_record_panel(frame, chunks[2], app);
    draw_message(frame, chunks[3], app);
    draw_status_bar(frame, chunks[4], app);

    if app.show_help {
        draw_help(frame, area, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &PathApp) {
    frame.render_widget(Clear, area);

    let title = format!(" {} / {} ", app.config.object_api_name, app.field_label());
    frame.render_widget(
        Paragraph::new(title).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    let record = format!("[{}] ", app.config.record_id);
    frame.render_widget(
        Paragraph::new(record)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        area,
    );
}

/// One chevron segment per stage: complete, current, incomplete or selected,
/// with the cursor underlined
fn draw_path_row(frame: &mut Frame, area: Rect, app: &PathApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.is_loading() {
        frame.render_widget(
            Paragraph::new(format!("{} loading...", app.spinner_char()))
                .style(app.theme.muted_style()),
            inner,
        );
        return;
    }

    let path = app.display_path();
    if path.is_empty() {
        return;
    }

    let current_value = app.current_value();
    let current_stage = app.current_stage();
    let selected = app.selected_value.as_deref();
    let last = path.len() - 1;

    let mut spans: Vec<Span> = Vec::new();
    for (i, stage) in path.iter().enumerate() {
        let is_current = stage.equals(current_value.as_deref());
        let is_complete = stage.is_before(&current_stage);
        let is_selected = stage.equals(selected)
            || (i == last && selected == Some(TERMINAL_STAGE_VALUE));

        let mut style = if is_selected {
            app.theme.secondary_style().add_modifier(Modifier::REVERSED)
        } else if is_current {
            app.theme.primary_style().add_modifier(Modifier::BOLD)
        } else if is_complete {
            app.theme.success_style()
        } else {
            app.theme.muted_style()
        };
        if i == app.cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }

        spans.push(Span::styled(format!(" {} ", stage.label()), style));
        if i < last {
            spans.push(Span::styled(">", app.theme.border_style()));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn draw_record_panel(frame: &mut Frame, area: Rect, app: &PathApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Record ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !app.is_ready() {
        return;
    }

    let current = app.current_stage();
    let current_text = if current.has_value() {
        current.label().to_string()
    } else {
        format!(
            "{} (not part of this path)",
            app.current_value().unwrap_or_default()
        )
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Current: ", app.theme.muted_style()),
            Span::styled(current_text, app.theme.style()),
        ]),
        Line::from(""),
    ];

    if let Some(scenario) = app.scenario() {
        let layout = scenario.layout();
        lines.push(Line::from(Span::styled(
            layout.render_selection_prompt(&app.field_label()),
            app.theme.muted_style(),
        )));
        lines.push(Line::from(""));
    }

    if app.is_updating {
        lines.push(Line::from(Span::styled(
            format!("{} updating...", app.spinner_char()),
            app.theme.secondary_style(),
        )));
    } else if let Some(caption) = app.action_caption() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!(" {caption} "), app.theme.button_style()),
            Span::styled("  (Enter)", app.theme.muted_style()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_message(frame: &mut Frame, area: Rect, app: &PathApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(ref message) = app.message {
        let style = if message.is_error {
            app.theme.error_style()
        } else {
            app.theme.secondary_style()
        };
        frame.render_widget(
            Paragraph::new(message.text.as_str()).style(style),
            inner,
        );
    }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &PathApp) {
    frame.render_widget(Clear, area);

    frame.render_widget(
        Paragraph::new(format!(" {}", app.status_bar.left_hint))
            .style(app.theme.muted_style()),
        area,
    );
    frame.render_widget(
        Paragraph::new(format!("{} ", app.status_bar.right_hint))
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        area,
    );
}

fn draw_help(frame: &mut Frame, area: Rect, app: &PathApp) {
    let width = 46.min(area.width.saturating_sub(4));
    let height = 12.min(area.height.saturating_sub(2));
    let popup = center_rect(area, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Help ");
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let lines = [
        "h / l     move along the path",
        "1-9       jump to a stage",
        "Space     select / deselect a stage",
        "Enter     confirm the pending action",
        "Esc       clear selection",
        "r         reload record data",
        "q         quit",
    ];

    let mut y = inner.y;
    for line in &lines {
        if y >= inner.y + inner.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(*line).style(app.theme.style()),
            Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1),
        );
        y += 1;
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
