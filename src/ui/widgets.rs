use crate::registry::Stage;
use crate::ui::refresh::{SizeSnapshot, StatusSnapshot};
use crate::utils::format_bytes;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Widget},
};

pub fn stage_color(stage: Stage) -> Color {
    match stage {
        Stage::New => Color::Yellow,
        Stage::Fresh => Color::Green,
        Stage::Stale => Color::Blue,
        Stage::Terminated => Color::Red,
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Line::from(title).centered())
        .title_style(Style::default().fg(Color::Green))
}

pub struct Header<'a> {
    text: &'a str,
}

impl<'a> Header<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.text)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .render(area, buf);
    }
}

/// Lines of the pod tree: the title, one line per pod, one per container.
pub fn tree_lines(snapshot: &StatusSnapshot) -> Vec<(String, Option<Stage>)> {
    let mut lines = vec![(snapshot.title(), None)];
    let count = snapshot.pods.len();

    for (i, pod) in snapshot.pods.iter().enumerate() {
        let last_pod = i + 1 == count;
        let branch = if last_pod { "└── " } else { "├── " };
        lines.push((format!("{}{}", branch, pod.name), Some(pod.stage)));

        let stem = if last_pod { "    " } else { "│   " };
        let children = pod.containers.len();
        for (j, container) in pod.containers.iter().enumerate() {
            let twig = if j + 1 == children { "└── " } else { "├── " };
            lines.push((format!("{}{}{}", stem, twig, container), None));
        }
    }
    lines
}

pub struct PodTree<'a> {
    snapshot: &'a StatusSnapshot,
}

impl<'a> PodTree<'a> {
    pub fn new(snapshot: &'a StatusSnapshot) -> Self {
        Self { snapshot }
    }
}

impl Widget for PodTree<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel(" Monitored Pods ");

        if self.snapshot.pods.is_empty() {
            Paragraph::new("No pods being monitored")
                .style(Style::default().fg(Color::Red))
                .block(block)
                .render(area, buf);
            return;
        }

        let items: Vec<ListItem> = tree_lines(self.snapshot)
            .into_iter()
            .enumerate()
            .map(|(idx, (text, stage))| {
                let style = match (idx, stage) {
                    (0, _) => Style::default().fg(Color::Green),
                    (_, Some(stage)) => Style::default().fg(stage_color(stage)),
                    _ => Style::default(),
                };
                ListItem::new(text).style(style)
            })
            .collect();

        List::new(items).block(block).render(area, buf);
    }
}

pub struct SizeTable<'a> {
    snapshot: &'a SizeSnapshot,
}

impl<'a> SizeTable<'a> {
    pub fn new(snapshot: &'a SizeSnapshot) -> Self {
        Self { snapshot }
    }
}

impl Widget for SizeTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel(" Logs ");

        if self.snapshot.rows.is_empty() {
            Paragraph::new("No logs saved")
                .style(Style::default().fg(Color::Red))
                .block(block)
                .render(area, buf);
            return;
        }

        let header = Row::new(["Pod", "Container", "Size"]).style(Style::default().fg(Color::Blue));
        let rows = self.snapshot.rows.iter().map(|row| {
            let pod_color = if row.repeated_pod {
                Color::DarkGray
            } else {
                Color::White
            };
            Row::new([
                Cell::from(row.pod.as_str()).style(Style::default().fg(pod_color)),
                Cell::from(row.container.as_str()),
                Cell::from(format_bytes(row.bytes)),
            ])
        });

        Table::new(
            rows,
            [
                Constraint::Percentage(50),
                Constraint::Percentage(35),
                Constraint::Min(8),
            ],
        )
        .header(header)
        .block(block)
        .render(area, buf);
    }
}

pub struct LiveBar<'a> {
    text: Option<&'a str>,
}

impl<'a> LiveBar<'a> {
    pub fn new(text: Option<&'a str>) -> Self {
        Self { text }
    }
}

impl Widget for LiveBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.text.unwrap_or_default())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow))
            .render(area, buf);
    }
}
