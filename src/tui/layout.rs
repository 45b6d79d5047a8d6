//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};

use crate::market::ScheduleReport;

use super::runtime::App;
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let report = app.report();
    let timeline_height = u16::try_from(report.vehicles.len() + 5).unwrap_or(u16::MAX);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // header
            Constraint::Min(8),                  // demand chart
            Constraint::Length(timeline_height), // timeline
            Constraint::Length(4),               // status panel
            Constraint::Length(1),               // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_demand(frame, &report, chunks[1]);
    render_timeline(frame, &report, chunks[2]);
    render_status(frame, app, &report, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: scenario name, sweep progress, speed, run state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.status();
    let state_label = if app.paused && !status.is_terminal() {
        "PAUSED".to_string()
    } else {
        status.label().to_uppercase()
    };

    let header = Line::from(vec![
        Span::styled(
            " CHARGE-EQ ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            &app.preset_name,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ sweep {}/{} │ {}ms │ ",
            app.sweeps(),
            app.max_sweeps(),
            app.tick_interval_ms(),
        )),
        Span::styled(
            state_label,
            Style::default()
                .fg(style::status_color(status))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Demand per slot, one bar each, colored against the cap.
fn render_demand(frame: &mut Frame, report: &ScheduleReport, area: Rect) {
    let bars: Vec<Bar> = report
        .slots
        .iter()
        .map(|s| {
            Bar::default()
                .value(s.demand)
                .label(Line::from(s.slot.to_string()))
                .style(Style::default().fg(style::demand_color(s.demand, report.p_max)))
        })
        .collect();

    let n = u16::try_from(report.slots.len().max(1)).unwrap_or(u16::MAX);
    let bar_width = (area.width.saturating_sub(2) / n).saturating_sub(1).max(1);
    let top = report.p_max.max(report.peak_demand);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(" Demand per slot (cap {}) ", report.p_max))
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(top);

    frame.render_widget(chart, area);
}

fn render_timeline(frame: &mut Frame, report: &ScheduleReport, area: Rect) {
    let lines: Vec<Line> = report
        .timeline()
        .to_string()
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    let block = Block::default().title(" Schedule ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Status panel: totals of the current schedule.
fn render_status(frame: &mut Frame, app: &App, report: &ScheduleReport, area: Rect) {
    let moved = app
        .moved_last
        .map_or_else(|| "-".to_string(), |m| m.to_string());
    let lines = vec![
        Line::from(format!(
            "  total cost={:.2}  infeasible={}  moved last sweep={}",
            report.total_cost, report.infeasible_vehicles, moved,
        )),
        Line::from(format!(
            "  peak={} / {}  cap violations={}",
            report.peak_demand, report.p_max, report.cap_violations,
        )),
    ];

    let block = Block::default().title(" Status ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Pause  n:Sweep  +/-:Speed  1/2/3:Preset  r:Restart",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
