use crossterm::style::Stylize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::notice::Notices;
use crate::sink::{LogSink, LogSize};
use crate::utils::format_bytes;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "Container")]
    container: String,
    #[tabled(rename = "Size")]
    size: String,
}

/// Boxed "Pod | Container | Size" table. Pod names repeated from the row
/// above are dimmed.
pub fn table_lines(rows: &[LogSize]) -> Vec<String> {
    let rows = rows.iter().map(|r| SummaryRow {
        pod: if r.repeated_pod {
            r.pod.as_str().dark_grey().to_string()
        } else {
            r.pod.clone()
        },
        container: r.container.clone(),
        size: format_bytes(r.bytes),
    });

    Table::new(rows)
        .with(Style::sharp())
        .to_string()
        .lines()
        .map(str::to_string)
        .collect()
}

/// End-of-run report: where the logs are, how big they are, and anything
/// the operator should know about.
pub fn print_summary(sink: &LogSink, notices: &Notices) {
    let rows = sink.sizes();
    if rows.is_empty() {
        println!("{} No logs saved", "ERROR".red().bold());
    } else {
        println!(
            "{} Logs saved to {}",
            "INFO".cyan().bold(),
            sink.root().display().to_string().green()
        );
        for line in table_lines(&rows) {
            println!("{}", line);
        }
    }

    let notes = notices.notes();
    if !notes.is_empty() {
        println!("Please note:");
        for note in notes {
            println!("{} {}", "WARNING".yellow().bold(), note);
        }
    }
}
