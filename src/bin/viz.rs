/// warpsim live visualizer — attach to any running simulation at any time.
///
/// Run in a separate terminal:
///   cargo run --bin viz
///
/// Polls /tmp/warpsim_live.json every 200ms and renders a live TUI dashboard:
///
///     ┌ header: device / status / cycles ──────────────────────────┐
///     │ cluster heatmap (one cell per cluster) │ Stats: thermal …  │
///     │ q/esc: quit  …footer…                                      │
///
/// The simulation must be started with `--live` to publish snapshots.
/// Press q or Esc to quit. The simulation keeps running unaffected.
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame, Terminal,
};
use std::{io, time::Duration};
use warpsim::metrics::{read_metrics, LiveMetrics};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let metrics = read_metrics();
        terminal.draw(|f| render(f, metrics.as_ref()))?;

        // Non-blocking: poll for 200ms, then redraw regardless
        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn render(f: &mut Frame, metrics: Option<&LiveMetrics>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // heatmap + stats
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    render_header(f, rows[0], metrics);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[1]);

    render_heatmap(f, cols[0], metrics);
    render_stats(f, cols[1], metrics);
    render_footer(f, rows[2]);
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

fn render_header(f: &mut Frame, area: Rect, metrics: Option<&LiveMetrics>) {
    let block = Block::default()
        .title(Span::styled(
            " ⚡ warpsim live monitor ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (name, status, cycles) = metrics
        .map(|m| (m.device_name.as_str(), m.status.as_str(), m.cycles.to_string()))
        .unwrap_or(("—", "idle", "—".to_string()));

    let status_color = match status {
        "running" => Color::Green,
        "complete" => Color::Cyan,
        "failed" => Color::Red,
        _ => Color::DarkGray,
    };

    let spans = vec![
        Span::styled("  device: ", Style::default().fg(Color::DarkGray)),
        Span::styled(name, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled("   status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            status.to_uppercase(),
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   cycles: ", Style::default().fg(Color::DarkGray)),
        Span::styled(cycles, Style::default().fg(Color::Cyan)),
    ];

    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ---------------------------------------------------------------------------
// Cluster heatmap
// ---------------------------------------------------------------------------

fn render_heatmap(f: &mut Frame, area: Rect, metrics: Option<&LiveMetrics>) {
    let block = Block::default().title(" Cluster Activity ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let warps: Vec<u64> = metrics.map(|m| m.cluster_warps.clone()).unwrap_or_default();
    let busiest = warps.iter().copied().max().unwrap_or(0);

    // Each cluster = 2 chars + 1 space
    let per_row = ((inner.width as usize).saturating_sub(1) / 3).max(1);

    let legend = Line::from(vec![
        Span::styled("██", Style::default().fg(Color::Green)),
        Span::raw(" busiest   "),
        Span::styled("▓▓", Style::default().fg(Color::Yellow)),
        Span::raw(" active   "),
        Span::styled("░░", Style::default().fg(Color::DarkGray)),
        Span::raw(" idle"),
    ]);

    let mut lines: Vec<Line> = vec![legend, Line::raw("")];

    for row in warps.chunks(per_row) {
        let spans: Vec<Span> = row
            .iter()
            .flat_map(|&count| {
                let (symbol, color) = match count {
                    0 => ("░░", Color::DarkGray),
                    c if c == busiest => ("██", Color::Green),
                    _ => ("▓▓", Color::Yellow),
                };
                vec![Span::styled(symbol, Style::default().fg(color)), Span::raw(" ")]
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let active = warps.iter().filter(|&&w| w > 0).count();
    let total: u64 = warps.iter().sum();
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![Span::styled(
        format!("  {}/{} clusters active   {} warps total", active, warps.len(), total),
        Style::default().fg(Color::DarkGray),
    )]));

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Stats panel
// ---------------------------------------------------------------------------

fn render_stats(f: &mut Frame, area: Rect, metrics: Option<&LiveMetrics>) {
    let block = Block::default().title(" Stats ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // thermal gauge
            Constraint::Length(1), // spacer
            Constraint::Min(0),    // text stats
        ])
        .split(inner);

    let Some(m) = metrics else {
        let msg = Paragraph::new(vec![
            Line::raw(""),
            Line::from(Span::styled(
                "  No simulation running.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "  Start warpsim with --live to see data.",
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        f.render_widget(msg, inner);
        return;
    };

    let load_pct = (m.thermal_load() * 100.0) as u16;
    let heat_color = match load_pct {
        0..=33 => Color::Green,
        34..=66 => Color::Yellow,
        _ => Color::Red,
    };
    let gauge = Gauge::default()
        .block(Block::default().title("Temperature"))
        .gauge_style(Style::default().fg(heat_color))
        .percent(load_pct.min(100))
        .label(format!("{:.2} °C / {:.0} °C", m.temperature, m.melting_point));
    f.render_widget(gauge, rows[0]);

    let text = vec![
        Line::from(vec![
            Span::styled("Clusters:   ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} × {} cores", m.num_clusters, m.cores_per_cluster)),
        ]),
        Line::from(vec![
            Span::styled("Power:      ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{:.1} W", m.power_watts)),
        ]),
        Line::from(vec![
            Span::styled("Last batch: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} warps", m.last_batch_warps)),
        ]),
    ];
    f.render_widget(Paragraph::new(text), rows[2]);
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

fn render_footer(f: &mut Frame, area: Rect) {
    let text = Paragraph::new(Span::styled(
        "  q / esc: quit    auto-refreshes every 200ms    reads /tmp/warpsim_live.json",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(text, area);
}
