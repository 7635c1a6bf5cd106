//! Which admin dialog is open, and for which product

use crate::catalog::Product;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdminDialog {
    #[default]
    Closed,
    Create,
    Update(Product),
    Delete(Product),
}

impl AdminDialog {
    pub fn open_create(&mut self) {
        *self = AdminDialog::Create;
    }

    pub fn open_update(&mut self, product: Product) {
        *self = AdminDialog::Update(product);
    }

    pub fn open_delete(&mut self, product: Product) {
        *self = AdminDialog::Delete(product);
    }

    pub fn close(&mut self) {
        *self = AdminDialog::Closed;
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, AdminDialog::Closed)
    }

    /// The product an update or delete dialog was opened for
    pub fn selected(&self) -> Option<&Product> {
        match self {
            AdminDialog::Update(product) | AdminDialog::Delete(product) => Some(product),
            AdminDialog::Closed | AdminDialog::Create => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AdminDialog::Closed => "",
            AdminDialog::Create => "Create New Product",
            AdminDialog::Update(_) => "Update Product",
            AdminDialog::Delete(_) => "Confirm Deletion",
        }
    }
}
