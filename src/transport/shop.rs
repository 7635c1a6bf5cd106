//! Interactive storefront session
//!
//! Reads one command per line, applies it to the session's cart and prints
//! the result. The cart lives only as long as the session.

use super::render;
use crate::cart::{CartAction, CartStore, ProductId};
use crate::catalog::{ApiError, ProductSource};
use crate::config::DisplayConfig;
use crate::notice::Notice;
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Commands:
  list              Show all products
  show <id>         Show product details
  add <id>          Add one unit of a product to the cart
  remove <id>       Remove a product from the cart
  qty <id> <n>      Set the quantity of a cart item
  inc <id>          Increase quantity by one
  dec <id>          Decrease quantity by one
  cart              Show the cart
  clear             Empty the cart
  help              Show this help
  quit              Leave the shop";

#[derive(Debug, Clone, PartialEq)]
pub enum ShopCommand {
    List,
    Show(ProductId),
    Add(ProductId),
    Remove(ProductId),
    Quantity(ProductId, i64),
    Increment(ProductId),
    Decrement(ProductId),
    Cart,
    Clear,
    Help,
    Quit,
}

impl ShopCommand {
    /// Parse one input line; blank lines give `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = parts.collect();

        let command = match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => ShopCommand::List,
            "show" => ShopCommand::Show(id_arg(&args, "show <id>")?),
            "add" => ShopCommand::Add(id_arg(&args, "add <id>")?),
            "remove" | "rm" => ShopCommand::Remove(id_arg(&args, "remove <id>")?),
            "qty" => {
                let id = id_arg(&args, "qty <id> <n>")?;
                let text = args.get(1).ok_or("Usage: qty <id> <n>")?;
                ShopCommand::Quantity(id, coerce_quantity(text))
            }
            "inc" | "+" => ShopCommand::Increment(id_arg(&args, "inc <id>")?),
            "dec" | "-" => ShopCommand::Decrement(id_arg(&args, "dec <id>")?),
            "cart" => ShopCommand::Cart,
            "clear" => ShopCommand::Clear,
            "help" | "?" => ShopCommand::Help,
            "quit" | "exit" | "q" => ShopCommand::Quit,
            other => return Err(format!("Unknown command: {} (try `help`)", other)),
        };

        Ok(Some(command))
    }
}

fn id_arg(args: &[&str], usage: &str) -> Result<ProductId, String> {
    let raw = args.first().ok_or_else(|| format!("Usage: {}", usage))?;
    raw.parse()
        .map_err(|_| format!("Invalid product id: {}", raw))
}

/// Turn free-text quantity input into an integer.
///
/// Reads an optional sign and the leading digits, ignoring whatever follows
/// (`2.5` gives 2, `3abc` gives 3). Input with no leading digits, or a zero,
/// becomes 1. Negative values pass through for the cart to clamp.
pub fn coerce_quantity(text: &str) -> i64 {
    let text = text.trim_start();
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return 1;
    }

    match rest[..end].parse::<i64>().unwrap_or(i64::MAX) {
        0 => 1,
        n => sign * n,
    }
}

pub struct ShopSession<'a, S> {
    catalog: &'a S,
    cart: CartStore,
    display: &'a DisplayConfig,
}

impl<'a, S: ProductSource> ShopSession<'a, S> {
    pub fn new(catalog: &'a S, cart: CartStore, display: &'a DisplayConfig) -> Self {
        Self {
            catalog,
            cart,
            display,
        }
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Read commands from `input` until EOF or `quit`
    pub async fn run<R, W>(&self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "Welcome to the shop. Type `help` for commands.")?;
        let mut lines = input.lines();

        loop {
            write!(out, "shop> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            let command = match ShopCommand::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    writeln!(out, "{}", Notice::failure(message))?;
                    continue;
                }
            };

            if command == ShopCommand::Quit {
                break;
            }

            let output = self.execute(command).await;
            writeln!(out, "{}", output)?;
        }

        let cart = self.cart.snapshot();
        tracing::info!(
            items = cart.items().len(),
            item_count = cart.item_count(),
            "shop session ended, cart discarded"
        );
        writeln!(out, "Goodbye!")?;
        Ok(())
    }

    /// Run one command and return what to print
    pub async fn execute(&self, command: ShopCommand) -> String {
        match command {
            ShopCommand::List => match self.catalog.list_products().await {
                Ok(products) => render::product_table(&products, self.display),
                Err(e) => self.fetch_failed(e),
            },
            ShopCommand::Show(id) => match self.catalog.get_product(id).await {
                Ok(product) => render::product_detail(&product, self.display),
                Err(e) => self.fetch_failed(e),
            },
            ShopCommand::Add(id) => match self.catalog.get_product(id).await {
                Ok(product) => {
                    let cart = self.cart.dispatch(CartAction::Add(product.snapshot()));
                    format!(
                        "{}\n{}",
                        Notice::success(format!("{} has been added to your cart.", product.title)),
                        render::cart_summary(&cart, self.display)
                    )
                }
                Err(e) => self.fetch_failed(e),
            },
            ShopCommand::Remove(id) => {
                if self.cart.snapshot().get(id).is_none() {
                    return Notice::info(format!("Product {} is not in your cart.", id)).to_string();
                }
                let cart = self.cart.dispatch(CartAction::Remove(id));
                render::cart_summary(&cart, self.display)
            }
            ShopCommand::Quantity(id, quantity) => self.set_quantity(id, |_| quantity),
            ShopCommand::Increment(id) => self.set_quantity(id, |current| current + 1),
            ShopCommand::Decrement(id) => match self.cart.snapshot().get(id) {
                Some(item) if item.quantity <= 1 => Notice::info(
                    "Quantity cannot go below 1; use `remove` to take the item out.",
                )
                .to_string(),
                _ => self.set_quantity(id, |current| current - 1),
            },
            ShopCommand::Cart => render::cart_table(&self.cart.snapshot(), self.display),
            ShopCommand::Clear => {
                self.cart.dispatch(CartAction::Clear);
                Notice::info("Cart cleared.").to_string()
            }
            ShopCommand::Help => HELP.to_string(),
            ShopCommand::Quit => String::new(),
        }
    }

    fn set_quantity(&self, id: ProductId, next: impl FnOnce(i64) -> i64) -> String {
        let Some(current) = self.cart.snapshot().get(id).map(|item| item.quantity) else {
            return Notice::info(format!("Product {} is not in your cart.", id)).to_string();
        };

        let cart = self.cart.dispatch(CartAction::SetQuantity {
            id,
            quantity: next(i64::from(current)),
        });
        render::cart_summary(&cart, self.display)
    }

    fn fetch_failed(&self, error: ApiError) -> String {
        if error.is_not_found() {
            return Notice::failure("Product not found").to_string();
        }
        tracing::warn!("catalog request failed: {}", error);
        Notice::failure(format!("Could not reach the product catalog: {}", error)).to_string()
    }
}
