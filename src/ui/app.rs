use crate::ui::refresh::{SizeSnapshot, StatusSnapshot};

/// Everything one dashboard frame shows.
pub struct Dashboard {
    pub context: String,
    pub namespace: String,
    pub status: StatusSnapshot,
    pub sizes: SizeSnapshot,
    pub live: Option<String>,
}

impl Dashboard {
    pub fn new(context: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            namespace: namespace.into(),
            status: StatusSnapshot::default(),
            sizes: SizeSnapshot::default(),
            live: None,
        }
    }

    pub fn header(&self) -> String {
        format!(
            "Context: {} - Namespace: {} - Hit Enter or Esc to close",
            self.context, self.namespace
        )
    }

    pub fn update(&mut self, status: StatusSnapshot, sizes: SizeSnapshot, live: Option<String>) {
        self.status = status;
        self.sizes = sizes;
        self.live = live;
    }
}
