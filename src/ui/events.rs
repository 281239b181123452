use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
}

pub async fn event_loop(tx: mpsc::Sender<AppEvent>) {
    let mut event_stream = EventStream::new();

    while let Some(event) = event_stream.next().await {
        let app_event = match event {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
            Ok(Event::Resize(_, _)) => AppEvent::Resize,
            Ok(_) => continue,
            Err(_) => break,
        };
        if tx.send(app_event).await.is_err() {
            break;
        }
    }
}

/// Returns false when the key closes the dashboard.
pub fn handle_key_event(key: KeyEvent) -> bool {
    !matches!(
        (key.code, key.modifiers),
        (KeyCode::Enter, _)
            | (KeyCode::Esc, _)
            | (KeyCode::Char('q'), _)
            | (KeyCode::Char('Q'), _)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL)
    )
}
