//! Table and detail rendering for terminal output

use crate::cart::CartState;
use crate::catalog::Product;
use crate::config::DisplayConfig;
use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Subtotal")]
    subtotal: String,
}

pub fn product_table(products: &[Product], display: &DisplayConfig) -> String {
    if products.is_empty() {
        return "No products found.".to_string();
    }

    let rows = products.iter().map(|p| ProductRow {
        id: p.id,
        title: p.title.clone(),
        price: display.price(p.price),
        category: p.category_name().to_string(),
        description: truncate(&p.description, display.description_width),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn product_detail(product: &Product, display: &DisplayConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", product.title.bold()));
    if !product.description.is_empty() {
        out.push_str(&format!("{}\n", product.description));
    }
    out.push('\n');
    out.push_str(&format!("Price:    {}\n", display.price(product.price).bold()));
    out.push_str(&format!("Category: {}\n", product.category_name()));
    out.push_str(&format!("ID:       {}\n", product.id));

    if product.images.is_empty() {
        out.push_str("Images:   (none)\n");
    } else {
        out.push_str("Images:\n");
        for (index, image) in product.images.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", index + 1, image));
        }
    }
    out
}

pub fn cart_table(cart: &CartState, display: &DisplayConfig) -> String {
    if cart.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let rows = cart.items().iter().map(|item| CartRow {
        id: item.id,
        image: item.image.clone(),
        title: item.title.clone(),
        quantity: item.quantity,
        subtotal: display.price(item.line_total()),
    });

    format!(
        "{}\n{}",
        Table::new(rows).with(Style::rounded()),
        cart_summary(cart, display)
    )
}

/// One-line total, e.g. `Total: $20.00 (2 items)`
pub fn cart_summary(cart: &CartState, display: &DisplayConfig) -> String {
    let noun = if cart.item_count() == 1 { "item" } else { "items" };
    format!(
        "Total: {} ({} {})",
        display.price(cart.total()),
        cart.item_count(),
        noun
    )
}

/// Cut `text` to at most `width` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= width {
        return single_line;
    }
    let kept: String = single_line.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}
