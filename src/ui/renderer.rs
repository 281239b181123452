use crate::ui::app::Dashboard;
use crate::ui::layout::create_layout;
use crate::ui::widgets::{Header, LiveBar, PodTree, SizeTable};
use ratatui::{Frame, Terminal, backend::Backend};

pub fn render<B: Backend>(terminal: &mut Terminal<B>, dashboard: &Dashboard) -> std::io::Result<()> {
    terminal.draw(|f| render_frame(f, dashboard))?;
    Ok(())
}

fn render_frame(f: &mut Frame, dashboard: &Dashboard) {
    let layout = create_layout(f.area());
    let header = dashboard.header();

    f.render_widget(Header::new(&header), layout.header);
    f.render_widget(PodTree::new(&dashboard.status), layout.pods);
    f.render_widget(SizeTable::new(&dashboard.sizes), layout.sizes);
    f.render_widget(LiveBar::new(dashboard.live.as_deref()), layout.live);
}
