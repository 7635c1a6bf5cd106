//! Admin console: product form, dialog state and CRUD service

mod dialog;
mod form;
mod service;

pub use dialog::AdminDialog;
pub use form::{parse_price, FormError, ProductForm, DEFAULT_CATEGORY_ID, DEFAULT_IMAGE_URL};
pub use service::AdminService;
