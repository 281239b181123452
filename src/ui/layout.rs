use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct DashboardLayout {
    pub header: Rect,
    pub pods: Rect,
    pub sizes: Rect,
    pub live: Rect,
}

pub fn create_layout(area: Rect) -> DashboardLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Panels
            Constraint::Length(1), // Live notice
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(60), // Monitored pods
            Constraint::Min(1),     // Log sizes
        ])
        .split(rows[1]);

    DashboardLayout {
        header: rows[0],
        pods: columns[0],
        sizes: columns[1],
        live: rows[2],
    }
}
