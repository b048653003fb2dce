//! Client-side mirror of the server cart.
//!
//! The shop UI changes this state first and talks to the server second, so
//! the screen updates without waiting on the network. The total is always
//! recomputed from the local lines, never cached.

use cartapp_core::{CartSummary, Price, Product, ProductId, Quantity};

/// One line of the local cart, carrying the full product for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLine {
    pub product: Product,
    pub quantity: Quantity,
}

impl LocalLine {
    /// Price of this line at the product's current price.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Local cart state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalCart {
    lines: Vec<LocalLine>,
}

impl LocalCart {
    /// Build local state from a server summary.
    ///
    /// Lines whose product no longer exists cannot be displayed and are
    /// skipped.
    #[must_use]
    pub fn from_summary(summary: &CartSummary) -> Self {
        let lines = summary
            .products
            .iter()
            .filter_map(|line| {
                line.product.clone().map(|product| LocalLine {
                    product,
                    quantity: line.quantity,
                })
            })
            .collect();
        Self { lines }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LocalLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&LocalLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    /// Add one unit of `product`, merging with an existing line.
    pub fn add_product(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.checked_add(Quantity::ONE).unwrap_or(line.quantity);
            return;
        }
        self.lines.push(LocalLine {
            product: product.clone(),
            quantity: Quantity::ONE,
        });
    }

    /// Set a line's quantity. 0 removes the line. Returns `false` if the
    /// product is not in the cart.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        let Some(index) = self.lines.iter().position(|l| l.product.id == product_id) else {
            return false;
        };

        match (Quantity::new(quantity), self.lines.get_mut(index)) {
            (Ok(quantity), Some(line)) => line.quantity = quantity,
            _ => {
                self.lines.remove(index);
            }
        }
        true
    }

    /// Remove a product's line, if present.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product.id != product_id);
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(LocalLine::subtotal).sum()
    }

    /// Total number of units.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity.get())).sum()
    }
}
