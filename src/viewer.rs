//! Interactive terminal view of a demographic summary.

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event as CEvent, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tracing::debug;
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{BarChart, Block, Borders, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};

use crate::demographics::DemographicSummary;
use crate::error::Result;

enum Event<I> {
    Input(I),
    Tick,
}

const MENU_TITLES: [&str; 2] = ["Summary", "Quit"];

/// Leaves raw mode when dropped, so early returns restore the terminal.
struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawModeGuard { active: true })
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Block until the user presses `q`.
pub fn show(summary: &DemographicSummary, source: &str) -> Result<()> {
    let mut raw_mode = RawModeGuard::enable()?;

    let (tx, rx) = mpsc::channel();
    let tick_rate = Duration::from_millis(200);
    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            if event::poll(timeout).unwrap_or(false) {
                if let Ok(CEvent::Key(key)) = event::read() {
                    if tx.send(Event::Input(key)).is_err() {
                        return;
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                if tx.send(Event::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });

    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    loop {
        terminal.draw(|rect| draw(rect, summary, source))?;

        match rx.recv() {
            Ok(Event::Input(key)) if key.code == KeyCode::Char('q') => break,
            Ok(_) => {}
            Err(_) => break,
        }
    }

    debug!("closing viewer");
    raw_mode.restore()?;
    terminal.clear()?;
    terminal.show_cursor()?;
    Ok(())
}

fn stat_line<'a>(label: &'a str, value: String) -> Spans<'a> {
    Spans::from(vec![
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(value),
    ])
}

fn draw<B: Backend>(rect: &mut Frame<B>, summary: &DemographicSummary, source: &str) {
    let size = rect.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(10)].as_ref())
        .split(size);

    let menu = MENU_TITLES
        .iter()
        .map(|t| {
            let (first, rest) = t.split_at(1);
            Spans::from(vec![
                Span::styled(
                    first,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::UNDERLINED),
                ),
                Span::styled(rest, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    let tabs = Tabs::new(menu)
        .select(0)
        .block(Block::default().title(source).borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw("|"));
    rect.render_widget(tabs, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[1]);

    let races = summary
        .race_count
        .iter()
        .map(|(race, count)| (race.as_str(), *count as u64))
        .collect::<Vec<(&str, u64)>>();
    let chart = BarChart::default()
        .block(Block::default().title("Race Count").borders(Borders::ALL))
        .data(&races)
        .bar_width(8)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));
    rect.render_widget(chart, body[0]);

    let top_occupation = summary
        .top_in_occupation
        .clone()
        .unwrap_or_else(|| "no data".to_string());
    let stats = vec![
        stat_line("Average age of men: ", summary.average_age_men.to_string()),
        stat_line("Bachelors: ", format!("{}%", summary.percentage_bachelors)),
        stat_line("Higher education >50K: ", format!("{}%", summary.higher_education_rich)),
        stat_line("Lower education >50K: ", format!("{}%", summary.lower_education_rich)),
        stat_line("Min work time: ", format!("{} hours/week", summary.min_hours)),
        stat_line("Rich at min hours: ", format!("{}%", summary.rich_min_workers)),
        stat_line(
            "Highest earning country: ",
            format!(
                "{} ({}%)",
                summary.highest_earning_country, summary.highest_earning_country_percentage
            ),
        ),
        stat_line("Top occupation in India >50K: ", top_occupation),
    ];
    let panel = Paragraph::new(stats)
        .block(Block::default().title("Statistics").borders(Borders::ALL))
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    rect.render_widget(panel, body[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui::backend::TestBackend;

    fn summary() -> DemographicSummary {
        DemographicSummary {
            race_count: vec![("White".to_string(), 27), ("Black".to_string(), 3)],
            average_age_men: 39.4,
            percentage_bachelors: 16.4,
            higher_education_rich: 46.5,
            lower_education_rich: 17.4,
            min_hours: 1,
            rich_min_workers: 10.0,
            highest_earning_country: "Iran".to_string(),
            highest_earning_country_percentage: 41.9,
            top_in_occupation: None,
        }
    }

    #[test]
    fn test_raw_mode_guard_restores_once() {
        // never enabled in this process, so disabling is a no-op
        let mut guard = RawModeGuard { active: true };
        guard.restore().unwrap();
        assert!(!guard.active);
        guard.restore().unwrap();
        drop(guard);
    }

    #[test]
    fn test_draw_renders_statistics() {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let summary = summary();
        terminal.draw(|f| draw(f, &summary, "adult.data.csv")).unwrap();

        let screen = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol.as_str())
            .collect::<String>();
        assert!(screen.contains("adult.data.csv"));
        assert!(screen.contains("Race Count"));
        assert!(screen.contains("Average age of men: 39.4"));
        assert!(screen.contains("Iran (41.9%)"));
        assert!(screen.contains("no data"));
    }
}
