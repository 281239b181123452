pub mod app;
pub mod events;
pub mod layout;
pub mod refresh;
pub mod renderer;
pub mod widgets;

pub use app::Dashboard;
pub use events::AppEvent;
pub use refresh::{SizeSnapshot, StatusSnapshot};
