//! Product create, update and delete for the admin console

use super::dialog::AdminDialog;
use super::form::ProductForm;
use crate::catalog::{Product, ProductSource};
use crate::notice::Notice;

/// Runs admin mutations against a product source and tracks the open dialog
///
/// A successful mutation closes the dialog; a failed one leaves it open so
/// the user can correct the form and retry.
pub struct AdminService<'a, S> {
    source: &'a S,
    dialog: AdminDialog,
}

impl<'a, S: ProductSource> AdminService<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            dialog: AdminDialog::Closed,
        }
    }

    pub fn dialog(&self) -> &AdminDialog {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut AdminDialog {
        &mut self.dialog
    }

    pub async fn create(&mut self, form: &ProductForm) -> (Notice, Option<Product>) {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(e) => return (Notice::failure(e.to_string()), None),
        };

        match self.source.create_product(&draft).await {
            Ok(product) => {
                tracing::info!(id = product.id, title = %product.title, "product created");
                self.dialog.close();
                (Notice::success("Product created successfully"), Some(product))
            }
            Err(e) => {
                tracing::error!("Creation error: {}", e);
                (Notice::failure("Failed to create product"), None)
            }
        }
    }

    /// Update the product selected by the open dialog; `None` if nothing is selected
    pub async fn update(&mut self, form: &ProductForm) -> Option<(Notice, Option<Product>)> {
        let id = self.dialog.selected()?.id;

        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(e) => return Some((Notice::failure(e.to_string()), None)),
        };

        Some(match self.source.update_product(id, &draft).await {
            Ok(product) => {
                tracing::info!(id, "product updated");
                self.dialog.close();
                (Notice::success("Product updated successfully"), Some(product))
            }
            Err(e) => {
                tracing::error!("Update error: {}", e);
                (Notice::failure("Failed to update product"), None)
            }
        })
    }

    /// Delete the product selected by the open dialog; `None` if nothing is selected
    pub async fn delete(&mut self) -> Option<Notice> {
        let id = self.dialog.selected()?.id;

        Some(match self.source.delete_product(id).await {
            Ok(()) => {
                tracing::info!(id, "product deleted");
                self.dialog.close();
                Notice::success("Product deleted successfully")
            }
            Err(e) => {
                tracing::error!("Delete error: {}", e);
                Notice::failure("Failed to delete product")
            }
        })
    }
}
