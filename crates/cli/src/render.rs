//! Plain-text rendering of catalog and cart for the terminal.

use std::io::{self, Write};

use cartapp_core::{CartSummary, Product};

use crate::client::LocalCart;

/// Write the catalog as a table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn products(out: &mut impl Write, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products available.");
    }

    writeln!(out, "{:>4}  {:<30} {:>10}", "ID", "Product", "Price")?;
    for product in products {
        writeln!(
            out,
            "{:>4}  {:<30} {:>10}",
            product.id.to_string(),
            product.name,
            product.price.to_string()
        )?;
        if !product.description.is_empty() {
            writeln!(out, "      {}", product.description)?;
        }
    }
    Ok(())
}

/// Write the session's local cart with its recomputed total.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn local_cart(out: &mut impl Write, cart: &LocalCart) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    for line in cart.lines() {
        writeln!(
            out,
            "{:>4}  {:<30} x{:<4} {:>10}",
            line.product.id.to_string(),
            line.product.name,
            line.quantity.to_string(),
            line.subtotal().to_string()
        )?;
    }
    writeln!(out, "Total ({} items): {}", cart.item_count(), cart.total())
}

/// Write a cart summary as returned by `GET /cart`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn summary(out: &mut impl Write, summary: &CartSummary) -> io::Result<()> {
    if summary.products.is_empty() {
        return writeln!(out, "Cart is empty.");
    }

    for line in &summary.products {
        match &line.product {
            Some(product) => writeln!(
                out,
                "{:>4}  {:<30} x{:<4} {:>10}",
                line.product_id.to_string(),
                product.name,
                line.quantity.to_string(),
                product.price.times(line.quantity).to_string()
            )?,
            None => writeln!(
                out,
                "{:>4}  {:<30} x{:<4} {:>10}",
                line.product_id.to_string(),
                "(no longer available)",
                line.quantity.to_string(),
                "-"
            )?,
        }
    }
    writeln!(
        out,
        "Total ({} items): {}",
        summary.item_count(),
        summary.total_price
    )
}

/// Write the shop command reference.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  products | ls        list the catalog")?;
    writeln!(out, "  cart                 show your cart")?;
    writeln!(out, "  add <id>             add one unit of a product")?;
    writeln!(out, "  inc <id> / dec <id>  change a line by one")?;
    writeln!(out, "  set <id> <qty>       set a quantity (0 removes)")?;
    writeln!(out, "  remove <id>          remove a product")?;
    writeln!(out, "  refresh              reload catalog and cart")?;
    writeln!(out, "  quit                 leave the shop")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartapp_core::{CartSummaryLine, Price, ProductId, Quantity};

    use super::*;

    fn mug() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Mug".to_string(),
            price: Price::from_cents(1250).unwrap(),
            description: "Stoneware".to_string(),
        }
    }

    #[test]
    fn test_products_table() {
        let mut out = Vec::new();
        products(&mut out, &[mug()]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Mug"));
        assert!(text.contains("12.50"));
        assert!(text.contains("Stoneware"));
    }

    #[test]
    fn test_local_cart_total() {
        let mut cart = LocalCart::default();
        cart.add_product(&mug());
        cart.add_product(&mug());

        let mut out = Vec::new();
        local_cart(&mut out, &cart).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Total (2 items): 25.00"));
    }

    #[test]
    fn test_summary_marks_missing_products() {
        let summary = CartSummary {
            products: vec![CartSummaryLine {
                product_id: ProductId::new(7),
                quantity: Quantity::ONE,
                product: None,
            }],
            total_price: Price::ZERO,
        };

        let mut out = Vec::new();
        super::summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("(no longer available)"));
        assert!(text.contains("0.00"));
    }
}
