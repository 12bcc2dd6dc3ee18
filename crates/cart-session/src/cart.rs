//! Session cart keyed by (product name, size).

use crate::{CartError, Result};
use intent_parser::Size;
use serde::{Deserialize, Serialize};
use shop_services::{price_to_cents, CheckoutItem};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub size: Size,
    /// Always positive while the line is in a cart
    pub qty: u32,
    /// Unit price copied from the catalog when the line was created
    pub price: String,
}

impl LineItem {
    pub fn unit_cents(&self) -> u64 {
        price_to_cents(&self.price).unwrap_or(0)
    }

    pub fn subtotal_cents(&self) -> u64 {
        self.unit_cents() * u64::from(self.qty)
    }

    fn is(&self, name: &str, size: Size) -> bool {
        self.name == name && self.size == size
    }
}

/// Outcome of [`Cart::remove_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Decremented { remaining: u32 },
    Removed,
    NotInCart,
}

/// No two lines share a (name, size) pair and no line has a zero quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.qty).sum()
    }

    pub fn total_cents(&self) -> u64 {
        self.items.iter().map(LineItem::subtotal_cents).sum()
    }

    pub fn find(&self, name: &str, size: Size) -> Option<&LineItem> {
        self.items.iter().find(|i| i.is(name, size))
    }

    /// Add `qty` of (name, size), merging into an existing line. Returns the
    /// resulting quantity; adding zero to a missing line creates nothing.
    pub fn upsert(&mut self, name: &str, size: Size, price: &str, qty: u32) -> u32 {
        if let Some(line) = self.items.iter_mut().find(|i| i.is(name, size)) {
            line.qty = line.qty.saturating_add(qty);
            return line.qty;
        }
        if qty == 0 {
            return 0;
        }
        self.items.push(LineItem {
            name: name.to_string(),
            size,
            qty,
            price: price.to_string(),
        });
        qty
    }

    /// Take `qty` off the first line for `name` (and `size`, when given),
    /// dropping the line once nothing is left.
    pub fn remove_quantity(&mut self, name: &str, size: Option<Size>, qty: u32) -> Removal {
        let Some(index) = self
            .items
            .iter()
            .position(|i| i.name == name && size.map_or(true, |s| i.size == s))
        else {
            return Removal::NotInCart;
        };
        let line = &mut self.items[index];
        if line.qty <= qty {
            self.items.remove(index);
            Removal::Removed
        } else {
            line.qty -= qty;
            Removal::Decremented {
                remaining: line.qty,
            }
        }
    }

    /// Change a line's quantity by `delta`, clamping at zero and dropping the
    /// line when it reaches zero. Returns the new quantity.
    pub fn adjust_quantity(&mut self, name: &str, size: Size, delta: i64) -> Result<u32> {
        let index = self.index_of(name, size)?;
        let next = i64::from(self.items[index].qty)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));
        let next = u32::try_from(next).unwrap_or(u32::MAX);
        if next == 0 {
            self.items.remove(index);
        } else {
            self.items[index].qty = next;
        }
        Ok(next)
    }

    /// Move a line to another size, merging into an existing line of that size.
    pub fn change_size(&mut self, name: &str, from: Size, to: Size) -> Result<()> {
        let index = self.index_of(name, from)?;
        if from == to {
            return Ok(());
        }
        if let Some(target) = self.items.iter().position(|i| i.is(name, to)) {
            let moved = self.items[index].qty;
            self.items[target].qty = self.items[target].qty.saturating_add(moved);
            self.items.remove(index);
        } else {
            self.items[index].size = to;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines as sent to the checkout service, named "<name> (<size>)".
    pub fn checkout_items(&self) -> Vec<CheckoutItem> {
        self.items
            .iter()
            .map(|i| CheckoutItem {
                name: format!("{} ({})", i.name, i.size),
                price: i.price.clone(),
                qty: i.qty,
            })
            .collect()
    }

    fn index_of(&self, name: &str, size: Size) -> Result<usize> {
        self.items
            .iter()
            .position(|i| i.is(name, size))
            .ok_or_else(|| CartError::LineNotFound {
                name: name.to_string(),
                size,
            })
    }
}
