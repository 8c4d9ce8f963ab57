use crate::config::ReportOptions;
use crate::report::{RankedTrack, Report};
use crossterm::style::{Color, Stylize};
use std::fmt::Write;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    pub color: bool,
    pub show_values: bool,
    pub offset: UtcOffset,
}

impl RenderStyle {
    pub fn from_options(options: &ReportOptions) -> Self {
        Self {
            color: options.color,
            show_values: options.show_values,
            offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }

    pub fn plain() -> Self {
        Self {
            color: false,
            show_values: true,
            offset: UtcOffset::UTC,
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.with(Color::Cyan).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn render_report(report: &Report, style: RenderStyle) -> String {
    let mut out = String::new();
    render_ranking(
        &mut out,
        &style,
        "Most listened to songs of all time are :",
        &report.top_all_time,
    );
    out.push('\n');
    let since = format_instant(report.one_year_ago, style.offset);
    render_ranking(
        &mut out,
        &style,
        &format!("Most listened to songs of the past year (since {since}) are :"),
        &report.top_past_year,
    );
    out.push('\n');
    render_ranking(
        &mut out,
        &style,
        "Songs with the most listening time are :",
        &report.top_listen_time,
    );
    out.push('\n');
    let _ = writeln!(
        out,
        "{}",
        style.heading(&format!(
            "You've listened to {} songs for {} seconds ever",
            report.unique_tracks,
            format_seconds(report.total_listen_ms)
        ))
    );
    let _ = writeln!(
        out,
        "{}",
        style.heading(&format!(
            "You've listened for {} seconds this year",
            format_seconds(report.total_listen_ms_recent)
        ))
    );
    out
}

fn render_ranking(out: &mut String, style: &RenderStyle, title: &str, rows: &[RankedTrack]) {
    let _ = writeln!(out, "{}", style.heading(title));
    for row in rows {
        let rank = style.paint(&format!("{:>3}", row.rank), Color::Yellow);
        let song = style.paint(&row.title, Color::Green);
        let by = match row.artist.as_deref() {
            Some(artist) => format!(" by {}", style.paint(artist, Color::Magenta)),
            None => String::new(),
        };
        if style.show_values {
            let value = style.paint(&format!("{:>3}", row.value), Color::Cyan);
            let _ = writeln!(out, "{rank} : {value} -> {song}{by}");
        } else {
            let _ = writeln!(out, "{rank} : {song}{by}");
        }
    }
}

pub fn format_seconds(ms: u64) -> String {
    format!("{}.{:03}", ms / 1_000, ms % 1_000)
}

fn format_instant(instant: OffsetDateTime, offset: UtcOffset) -> String {
    let local = instant.to_offset(offset);
    local
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| local.to_string())
}
