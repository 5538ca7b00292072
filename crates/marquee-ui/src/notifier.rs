//! Selection-change notifications.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use marquee_core::Item;

/// Told whenever a list's selected item changes
pub trait MenuNotifier {
    fn on_new_item_selected(&mut self, item: &Arc<Item>);
}

impl MenuNotifier for UnboundedSender<Arc<Item>> {
    fn on_new_item_selected(&mut self, item: &Arc<Item>) {
        if self.send(Arc::clone(item)).is_err() {
            trace!(item = %item.name, "Selection listener gone");
        }
    }
}
