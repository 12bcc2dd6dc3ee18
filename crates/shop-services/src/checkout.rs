//! Checkout line preparation shared by every checkout backend.

use crate::{CheckoutError, CheckoutItem};

/// Cents in a display price such as "$78" or "$12.50". Everything except digits
/// and '.' is ignored; non-positive or unparseable prices give `None`.
pub fn price_to_cents(price: &str) -> Option<u64> {
    let digits: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let amount: f64 = digits.parse().ok()?;
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }
    Some((amount * 100.0).round() as u64)
}

/// Drop lines that cannot be charged. Fails when nothing billable is left.
pub fn billable_items(items: &[CheckoutItem]) -> Result<Vec<CheckoutItem>, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let billable: Vec<CheckoutItem> = items
        .iter()
        .filter(|item| item.qty > 0 && price_to_cents(&item.price).is_some())
        .cloned()
        .collect();
    if billable.is_empty() {
        return Err(CheckoutError::Rejected(
            "No valid items to checkout.".to_string(),
        ));
    }
    Ok(billable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: &str, qty: u32) -> CheckoutItem {
        CheckoutItem {
            name: name.to_string(),
            price: price.to_string(),
            qty,
        }
    }

    #[test]
    fn test_price_to_cents() {
        assert_eq!(price_to_cents("$78"), Some(7800));
        assert_eq!(price_to_cents("$12.50"), Some(1250));
        assert_eq!(price_to_cents("USD 9.999"), Some(1000));
        assert_eq!(price_to_cents("$0"), None);
        assert_eq!(price_to_cents("free"), None);
        assert_eq!(price_to_cents("1.2.3"), None);
    }

    #[test]
    fn test_billable_items_filters_invalid_lines() {
        let items = vec![
            item("Stadium Mesh Pants (M)", "$78", 2),
            item("Gift card", "$0", 1),
            item("Velocity Track Jacket (L)", "$96", 0),
        ];
        let billable = billable_items(&items).unwrap();
        assert_eq!(billable, vec![item("Stadium Mesh Pants (M)", "$78", 2)]);
    }

    #[test]
    fn test_billable_items_errors() {
        assert_eq!(billable_items(&[]), Err(CheckoutError::EmptyCart));
        assert_eq!(
            billable_items(&[item("Gift card", "$0", 1)]),
            Err(CheckoutError::Rejected("No valid items to checkout.".into()))
        );
    }
}
