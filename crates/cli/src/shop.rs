//! Interactive terminal shop.
//!
//! A [`ShopSession`] holds the catalog and a [`LocalCart`] for one user.
//! Every action is applied to the local cart first and then sent to the API;
//! if the call fails the local cart is put back the way it was.

use std::io::{self, Write};

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use cartapp_core::api::{AddToCartRequest, RemoveFromCartRequest, UpdateQuantityRequest};
use cartapp_core::{Product, ProductId, UserId};

use crate::client::{ApiClient, ClientError, LocalCart};
use crate::render;

/// A parsed shop command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Add one unit of a product.
    Add(ProductId),
    /// Remove a product's line.
    Remove(ProductId),
    /// Set a product's quantity (0 removes).
    Set(ProductId, u32),
    /// Add one unit to an existing line.
    Increment(ProductId),
    /// Take one unit from an existing line.
    Decrement(ProductId),
    /// Show the cart.
    ShowCart,
    /// Show the catalog.
    ShowProducts,
    /// Re-fetch catalog and cart from the server.
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseActionError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', type 'help' for a list")]
    UnknownCommand(String),

    #[error("'{0}' needs a product id")]
    MissingProductId(&'static str),

    #[error("'set' needs a product id and a quantity")]
    MissingQuantity,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

impl std::str::FromStr for Action {
    type Err = ParseActionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(ParseActionError::Empty)?.to_lowercase();

        match command.as_str() {
            "add" | "a" => Ok(Self::Add(next_number(&mut words, "add")?)),
            "remove" | "rm" => Ok(Self::Remove(next_number(&mut words, "remove")?)),
            "inc" | "+" => Ok(Self::Increment(next_number(&mut words, "inc")?)),
            "dec" | "-" => Ok(Self::Decrement(next_number(&mut words, "dec")?)),
            "set" => {
                let id = next_number(&mut words, "set")?;
                let quantity = next_number(&mut words, "set")
                    .map_err(|e| match e {
                        ParseActionError::MissingProductId(_) => ParseActionError::MissingQuantity,
                        other => other,
                    })?;
                Ok(Self::Set(id, quantity))
            }
            "cart" | "c" => Ok(Self::ShowCart),
            "products" | "p" | "ls" => Ok(Self::ShowProducts),
            "refresh" | "r" => Ok(Self::Refresh),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(ParseActionError::UnknownCommand(other.to_string())),
        }
    }
}

fn next_number<'a, T: std::str::FromStr>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<T, ParseActionError> {
    let word = words
        .next()
        .ok_or(ParseActionError::MissingProductId(command))?;
    word.parse()
        .map_err(|_| ParseActionError::InvalidNumber(word.to_string()))
}

/// What happened when an action was applied.
#[derive(Debug)]
pub enum Outcome {
    /// The change was accepted by the server.
    Saved,
    /// Nothing to send (display actions, no-op changes).
    Unchanged,
    /// The product is not in the catalog or not in the cart.
    UnknownProduct(ProductId),
    /// The server call failed; the local cart was rolled back.
    RolledBack(ClientError),
    Quit,
}

/// One user's shopping session.
#[derive(Debug)]
pub struct ShopSession {
    client: ApiClient,
    user_id: UserId,
    catalog: Vec<Product>,
    cart: LocalCart,
}

impl ShopSession {
    /// Start a session and load the catalog and the user's cart.
    ///
    /// Fetch failures are logged and leave the corresponding state empty.
    pub async fn start(client: ApiClient, user_id: UserId) -> Self {
        let mut session = Self {
            client,
            user_id,
            catalog: Vec::new(),
            cart: LocalCart::default(),
        };
        session.refresh().await;
        session
    }

    /// The catalog as last fetched.
    #[must_use]
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// The local cart.
    #[must_use]
    pub const fn cart(&self) -> &LocalCart {
        &self.cart
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Re-fetch the catalog and cart. On error the previous state is kept.
    pub async fn refresh(&mut self) {
        match self.client.list_products().await {
            Ok(products) => self.catalog = products,
            Err(e) => tracing::error!(error = %e, "Failed to fetch products"),
        }

        match self.client.get_cart(&self.user_id).await {
            Ok(summary) => self.cart = LocalCart::from_summary(&summary),
            Err(e) => tracing::error!(error = %e, user_id = %self.user_id, "Failed to fetch cart"),
        }
    }

    fn product(&self, id: ProductId) -> Option<&Product> {
        self.catalog.iter().find(|p| p.id == id)
    }

    /// Apply an action: change the local cart, then persist it.
    pub async fn apply(&mut self, action: Action) -> Outcome {
        let snapshot = self.cart.clone();

        let result = match action {
            Action::Add(id) => {
                let Some(product) = self.product(id).cloned() else {
                    return Outcome::UnknownProduct(id);
                };
                self.cart.add_product(&product);
                self.client
                    .add_to_cart(&AddToCartRequest {
                        user_id: self.user_id.clone(),
                        product_id: id,
                        quantity: Some(1),
                    })
                    .await
            }
            Action::Remove(id) => {
                if self.cart.line(id).is_none() {
                    return Outcome::UnknownProduct(id);
                }
                self.cart.remove(id);
                self.client
                    .remove_from_cart(&RemoveFromCartRequest {
                        user_id: self.user_id.clone(),
                        product_id: id,
                    })
                    .await
            }
            Action::Set(id, quantity) => self.set_quantity(id, quantity).await,
            Action::Increment(id) | Action::Decrement(id) => {
                let Some(current) = self.cart.line(id).map(|l| l.quantity.get()) else {
                    return Outcome::UnknownProduct(id);
                };
                let quantity = if matches!(action, Action::Increment(_)) {
                    current.saturating_add(1)
                } else {
                    current - 1
                };
                self.set_quantity(id, quantity).await
            }
            Action::Refresh => {
                self.refresh().await;
                return Outcome::Unchanged;
            }
            Action::ShowCart | Action::ShowProducts | Action::Help => return Outcome::Unchanged,
            Action::Quit => return Outcome::Quit,
        };

        match result {
            Ok(cart) => {
                tracing::debug!(user_id = %cart.user_id(), lines = cart.lines().len(), "Cart saved");
                Outcome::Saved
            }
            Err(e) => {
                tracing::error!(error = %e, ?action, "Cart update failed, rolling back");
                self.cart = snapshot;
                Outcome::RolledBack(e)
            }
        }
    }

    async fn set_quantity(
        &mut self,
        id: ProductId,
        quantity: u32,
    ) -> Result<cartapp_core::Cart, ClientError> {
        if !self.cart.update_quantity(id, quantity) {
            // Let the server decide; it answers 404 for a line that is not there.
            tracing::debug!(product_id = %id, "Quantity update for a line not held locally");
        }
        self.client
            .update_quantity(&UpdateQuantityRequest {
                user_id: self.user_id.clone(),
                product_id: id,
                quantity,
            })
            .await
    }

    /// Run the read-eval loop on stdin until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if stdin or stdout fails.
    pub async fn run(mut self) -> io::Result<()> {
        let mut input = BufReader::new(tokio::io::stdin()).lines();

        {
            let mut out = io::stdout().lock();
            writeln!(
                out,
                "Shopping as {} at {}. Type 'help' for commands.",
                self.user_id,
                self.client.base_url()
            )?;
            render::products(&mut out, &self.catalog)?;
            render::local_cart(&mut out, &self.cart)?;
        }

        loop {
            {
                let mut out = io::stdout().lock();
                write!(out, "> ")?;
                out.flush()?;
            }

            let Some(line) = input.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let action = match line.parse::<Action>() {
                Ok(action) => action,
                Err(e) => {
                    writeln!(io::stdout().lock(), "{e}")?;
                    continue;
                }
            };

            let outcome = self.apply(action).await;
            let mut out = io::stdout().lock();
            match (action, outcome) {
                (_, Outcome::Quit) => break,
                (Action::Help, _) => render::help(&mut out)?,
                (Action::ShowProducts | Action::Refresh, _) => {
                    render::products(&mut out, &self.catalog)?;
                }
                (_, Outcome::UnknownProduct(id)) => {
                    writeln!(out, "Product {id} is not available here")?;
                }
                (_, Outcome::RolledBack(e)) => {
                    writeln!(out, "Could not update cart: {e}")?;
                    render::local_cart(&mut out, &self.cart)?;
                }
                _ => render::local_cart(&mut out, &self.cart)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!("add 3".parse(), Ok(Action::Add(ProductId::new(3))));
        assert_eq!("  RM 2 ".parse(), Ok(Action::Remove(ProductId::new(2))));
        assert_eq!("set 1 4".parse(), Ok(Action::Set(ProductId::new(1), 4)));
        assert_eq!("set 1 0".parse(), Ok(Action::Set(ProductId::new(1), 0)));
        assert_eq!("+ 5".parse(), Ok(Action::Increment(ProductId::new(5))));
        assert_eq!("dec 5".parse(), Ok(Action::Decrement(ProductId::new(5))));
        assert_eq!("cart".parse(), Ok(Action::ShowCart));
        assert_eq!("ls".parse(), Ok(Action::ShowProducts));
        assert_eq!("q".parse(), Ok(Action::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Action>(), Err(ParseActionError::Empty));
        assert_eq!(
            "add".parse::<Action>(),
            Err(ParseActionError::MissingProductId("add"))
        );
        assert_eq!(
            "set 1".parse::<Action>(),
            Err(ParseActionError::MissingQuantity)
        );
        assert_eq!(
            "add mug".parse::<Action>(),
            Err(ParseActionError::InvalidNumber("mug".to_string()))
        );
        assert_eq!(
            "set 1 -2".parse::<Action>(),
            Err(ParseActionError::InvalidNumber("-2".to_string()))
        );
        assert!(matches!(
            "buy 1".parse::<Action>(),
            Err(ParseActionError::UnknownCommand(_))
        ));
    }
}
