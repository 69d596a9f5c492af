//! Open/closed state of the app's dialogs.

use item_purchase_core::Item;

/// Which dialogs are open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Cart review dialog.
    pub cart_open: bool,
    /// Item shown in the details dialog, if open.
    pub details: Option<Item>,
    /// New item dialog.
    pub create_open: bool,
}

impl ViewState {
    #[must_use]
    pub const fn details_open(&self) -> bool {
        self.details.is_some()
    }

    pub fn show_details(&mut self, item: Item) {
        self.details = Some(item);
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }
}
