//! Rendering for the control tower.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use aerodyn_client::ReconfigurePhase;
use aerodyn_state::{RiskLevel, SeriesColor, Severity};

use crate::app::{ControlTower, Focus, PARAM_NAMES};

fn to_color(color: SeriesColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn risk_color(risk: RiskLevel) -> Color {
    match risk {
        RiskLevel::Critical => Color::Red,
        RiskLevel::UnderStrain => Color::Yellow,
        RiskLevel::Stable => Color::Green,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Warning => Color::Red,
        Severity::Note => Color::Yellow,
        Severity::Info => Color::Gray,
    }
}

/// Render the full control tower layout.
pub fn render(frame: &mut Frame, tower: &ControlTower) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Status bar
            Constraint::Min(10),    // Levers + chart
            Constraint::Length(7),  // KPIs + narrative + formula
            Constraint::Length(8),  // Console output
        ])
        .split(frame.area());

    render_status_bar(frame, outer[0], tower);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(20)])
        .split(outer[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Levers
            Constraint::Length(4), // Prompt input
            Constraint::Min(3),    // Reconfigure status
        ])
        .split(middle[0]);

    render_params(frame, left[0], tower);
    render_prompt(frame, left[1], tower);
    render_reconfigure_status(frame, left[2], tower);
    render_chart(frame, middle[1], tower);

    let analysis = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Min(30),
            Constraint::Length(44),
        ])
        .split(outer[2]);

    render_kpis(frame, analysis[0], tower);
    render_narrative(frame, analysis[1], tower);
    render_formula(frame, analysis[2], tower);
    render_console_output(frame, outer[3], tower);
}

fn render_status_bar(frame: &mut Frame, area: Rect, tower: &ControlTower) {
    let block = Block::default()
        .title(" AeroDyn Control Tower ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut spans = vec![
        Span::styled("  Endpoint: ", Style::default().fg(Color::Gray)),
        Span::styled(&tower.endpoint, Style::default().fg(Color::White)),
        Span::styled("  |  Risk: ", Style::default().fg(Color::Gray)),
    ];
    match &tower.view.kpis {
        Some(kpis) => spans.push(Span::styled(
            kpis.risk.to_string(),
            Style::default()
                .fg(risk_color(kpis.risk))
                .add_modifier(Modifier::BOLD),
        )),
        None => spans.push(Span::styled("-", Style::default().fg(Color::DarkGray))),
    }
    spans.push(Span::styled("  |  Update: ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!("#{}", tower.view.chart.revision()),
        Style::default().fg(Color::Magenta),
    ));
    if let Some(error) = &tower.last_error {
        spans.push(Span::styled("  |  ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_params(frame: &mut Frame, area: Rect, tower: &ControlTower) {
    let focused = tower.focus == Focus::Params;
    let block = Block::default()
        .title(" Levers ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Green } else { Color::White }));

    let lines: Vec<Line> = PARAM_NAMES
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let selected = focused && idx == tower.form.selected;
            let marker = if selected { "> " } else { "  " };
            let value_style = if selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(format!("{name:<9}"), Style::default().fg(Color::Gray)),
                Span::styled(tower.form.value(idx).to_string(), value_style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_prompt(frame: &mut Frame, area: Rect, tower: &ControlTower) {
    let focused = tower.focus == Focus::Prompt;
    let block = Block::default()
        .title(" Model Factory Prompt ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Green } else { Color::White }));

    let input_display = if tower.prompt.is_empty() {
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(Color::Green)),
            Span::styled(
                "Describe a model change or /command...",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(Color::Green)),
            Span::styled(&tower.prompt, Style::default().fg(Color::White)),
        ])
    };

    frame.render_widget(Paragraph::new(vec![input_display]).block(block), area);

    if focused {
        let cursor_x = area.x + 4 + tower.prompt_cursor as u16;
        let cursor_y = area.y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

fn render_reconfigure_status(frame: &mut Frame, area: Rect, tower: &ControlTower) {
    let block = Block::default()
        .title(" Model Factory ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let (text, color) = match tower.controller.phase() {
        ReconfigurePhase::Idle => (
            "READY - Enter submits the prompt".to_string(),
            Color::Gray,
        ),
        ReconfigurePhase::Submitting => ("RECONFIGURING...".to_string(), Color::Yellow),
        ReconfigurePhase::Success { .. } => ("SYSTEM UPDATED".to_string(), Color::Green),
        ReconfigurePhase::Failure { message } => (format!("ERROR: {message}"), Color::Red),
    };

    let lines = vec![Line::from(Span::styled(
        format!(" {text}"),
        Style::default().fg(color),
    ))];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

fn render_chart(frame: &mut Frame, area: Rect, tower: &ControlTower) {
    let chart_model = &tower.view.chart;
    let block = Block::default()
        .title(" Market Dynamics ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    if chart_model.datasets().is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "  Waiting for the first simulation...",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let x_max = (chart_model.labels().len().saturating_sub(1) as f64).max(1.0);
    let capacity = tower.applied_params.capacity as f64;

    let mut points: Vec<Vec<(f64, f64)>> = chart_model
        .datasets()
        .iter()
        .map(|series| {
            series
                .points
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64, v))
                .collect()
        })
        .collect();
    // Capacity guide line across the full horizon.
    points.push(vec![(0.0, capacity), (x_max, capacity)]);

    let (mut y_min, mut y_max) = chart_model.value_bounds().unwrap_or((0.0, 1.0));
    y_min = y_min.min(0.0);
    y_max = y_max.max(capacity) * 1.05;

    let mut datasets: Vec<Dataset> = chart_model
        .datasets()
        .iter()
        .zip(&points)
        .map(|(series, data)| {
            let mut style = Style::default().fg(to_color(series.style.color));
            if series.style.fill {
                style = style.add_modifier(Modifier::BOLD);
            }
            Dataset::default()
                .name(series.label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style)
                .data(data)
        })
        .collect();
    datasets.push(
        Dataset::default()
            .name("CAPACITY")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(points.last().expect("guide line just pushed")),
    );

    let first_label = chart_model.labels().first().cloned().unwrap_or_default();
    let last_label = chart_model.labels().last().cloned().unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled("quarter", Style::default().fg(Color::DarkGray)))
                .bounds([0.0, x_max])
                .labels(vec![Line::from(first_label), Line::from(last_label)]),
        )
        .y_axis(
            Axis::default()
                .bounds([y_min, y_max])
                .labels(vec![
                    Line::from(format!("{y_min:.0}")),
                    Line::from(format!("{:.0}", (y_min + y_max) / 2.0)),
                    Line::from(format!("{y_max:.0}")),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_kpis(frame: &mut Frame, area: Rect, tower: &ControlTower) {
    let block = Block::default()
        .title(" KPIs ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let lines = match &tower.view.kpis {
        Some(kpis) => vec![
            Line::from(vec![
                Span::styled("  Final Success: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    kpis.final_success_display(),
                    Style::default().fg(Color::Green),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Peak Load:     ", Style::default().fg(Color::Gray)),
                Span::styled(kpis.peak_load_display(), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(vec![
                Span::styled("  Reputation:    ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{:.1}", kpis.final_reputation),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Risk:          ", Style::default().fg(Color::Gray)),
                Span::styled(
                    kpis.risk.to_string(),
                    Style::default()
                        .fg(risk_color(kpis.risk))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "  Waiting for data...",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_narrative(frame: &mut Frame, area: Rect, tower: &ControlTower) {
    let block = Block::default()
        .title(" Analysis ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    if tower.view.narrative.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "  No analysis yet.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let lines: Vec<Line> = tower
        .view
        .narrative
        .iter()
        .map(|entry| {
            Line::from(Span::styled(
                format!("  {}", entry.text),
                Style::default().fg(severity_color(entry.severity)),
            ))
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_formula(frame: &mut Frame, area: Rect, tower: &ControlTower) {
    let block = Block::default()
        .title(" Model Formula ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let text = if tower.view.formula.is_empty() {
        Span::styled("  (not loaded)", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(tower.view.formula.as_str(), Style::default().fg(Color::Gray))
    };

    frame.render_widget(
        Paragraph::new(Line::from(text))
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn render_console_output(frame: &mut Frame, area: Rect, tower: &ControlTower) {
    let block = Block::default()
        .title(" Console Output ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner_height = area.height.saturating_sub(2) as usize;

    if tower.messages.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "  Waiting for events...",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    // Show the most recent messages that fit.
    let start = tower.messages.len().saturating_sub(inner_height);
    let lines: Vec<Line> = tower.messages[start..]
        .iter()
        .map(|(ts, msg, color)| {
            Line::from(vec![
                Span::styled(
                    format!("  [{}] ", ts.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(msg.as_str(), Style::default().fg(*color)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
