//! Drawing the full-screen player.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tw_engine::{DisplayLine, Phase};

use super::app::PlayApp;

/// Draw one frame.
pub fn draw(frame: &mut Frame, app: &mut PlayApp) {
    app.frame_count = app.frame_count.wrapping_add(1);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Story
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let story_area = if app.effects.state().shake.is_some() {
        shaken(chunks[0], app.frame_count)
    } else {
        chunks[0]
    };
    draw_story(frame, app, story_area);
    draw_input(frame, app, chunks[1]);
    draw_status(frame, app, chunks[2]);

    if app.confirm_exit {
        draw_exit_prompt(frame, app);
    }
}

/// Nudge the area sideways on alternating frames.
fn shaken(area: Rect, frame_count: u64) -> Rect {
    let offset = u16::from(frame_count % 2 == 0);
    Rect {
        x: area.x + offset,
        width: area.width.saturating_sub(1),
        ..area
    }
}

fn draw_story(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let (dark, glitch) = {
        let state = app.effects.state();
        (state.dark, state.glitch.is_some())
    };
    let narration = if dark {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };

    let display = app.session.display().lines();
    let mut lines: Vec<Line> = Vec::with_capacity(display.len());
    for line in display {
        match line {
            DisplayLine::Narration(text) => {
                lines.extend(text.split('\n').map(|l| Line::styled(l.to_string(), narration)));
            }
            // Placeholders mark where typed input goes; the input box covers that.
            DisplayLine::Choice(text) if text.is_empty() => {}
            DisplayLine::Choice(text) => {
                lines.push(Line::styled(text.clone(), Style::default().fg(Color::Yellow)));
            }
            DisplayLine::Echo(_) => lines.push(Line::styled(
                line.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            DisplayLine::Spacer => lines.push(Line::default()),
        }
    }

    if glitch
        && app.frame_count % 3 != 0
        && let Some(last) = lines.iter_mut().rev().find(|l| l.width() > 0)
    {
        *last = last
            .clone()
            .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::REVERSED));
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let total_wrapped: u16 = lines
        .iter()
        .map(|l| {
            let len = l.width();
            if inner_width == 0 {
                1
            } else {
                len.max(1).div_ceil(inner_width) as u16
            }
        })
        .sum();

    let visible_height = area.height.saturating_sub(2);
    let max_scroll = total_wrapped.saturating_sub(visible_height);
    let scroll = max_scroll.saturating_sub(app.output_scroll);

    let border = if dark { Color::DarkGray } else { Color::Blue };
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Story ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

fn draw_input(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let (title, color) = match app.session.phase() {
        Phase::Writing => (" ... ", Color::DarkGray),
        Phase::AutoRedirecting => (" ", Color::DarkGray),
        Phase::AwaitingInput => (" Your move ", Color::Green),
        Phase::Idle | Phase::Closed => (" The end ", Color::Red),
    };

    let input = Paragraph::new(format!("> {}", app.input_text)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(input, area);

    let width = app.input_text[..app.input_cursor].chars().count() as u16;
    let cursor_x = area.x + 1 + 2 + width;
    let cursor_y = area.y + 1;
    if cursor_x < area.x + area.width - 1 {
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_status(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let hint = if app.session.is_closed() {
        "Any key:quit".to_string()
    } else {
        let player = app.session.player();
        format!(
            "{}  \u{2665} {}  Enter:send/skip  Esc:leave  \u{2191}\u{2193}:scroll  Ctrl+C:quit",
            player.name, player.health
        )
    };
    let sound = app
        .effects
        .state()
        .sound
        .map(|(sfx, _)| format!("  \u{266a} {sfx}"))
        .unwrap_or_default();

    let status = Paragraph::new(format!("{hint}{sound}"))
        .style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(status, area);
}

fn draw_exit_prompt(frame: &mut Frame, app: &PlayApp) {
    let area = centered_rect(50, 20, frame.area());
    let (question, cancel) = app.exit_prompt();

    let popup = Paragraph::new(vec![
        Line::from(question),
        Line::from(""),
        Line::from(format!("[y] ok   [n] {cancel}")).style(Style::default().bold()),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// A rectangle centered in `r`, sized in percent of it.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
