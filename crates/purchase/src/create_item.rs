//! New catalog item form.

use item_purchase_core::{NewItem, ValidationError, parse_price_input};
use serde::Deserialize;

/// Raw input of the new item dialog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewItemForm {
    pub name: String,
    /// Price as typed; comma or dot decimal separator.
    pub price_input: String,
    pub item_type: String,
    pub family: String,
    pub description: String,
    pub image: String,
    /// Let the service pick an image when none is given.
    pub auto_image: bool,
}

impl Default for NewItemForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            price_input: String::new(),
            item_type: String::new(),
            family: String::new(),
            description: String::new(),
            image: String::new(),
            auto_image: true,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl NewItemForm {
    /// Whether the create action should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Validate the form into a record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingName`] without a name, or
    /// [`ValidationError::InvalidPrice`] when the price is not a number.
    pub fn validate(&self) -> Result<NewItem, ValidationError> {
        let name = non_empty(&self.name).ok_or(ValidationError::MissingName)?;
        let price = parse_price_input(&self.price_input).map_err(ValidationError::InvalidPrice)?;

        Ok(NewItem {
            name,
            price,
            item_type: non_empty(&self.item_type),
            family: non_empty(&self.family),
            description: non_empty(&self.description),
            image: non_empty(&self.image),
        })
    }
}
