//! Kiosk tab totals and the merchant profile used to charge them.
//!
//! A tab (comanda) is the running list of items an athlete picked up at the
//! point of sale. Paying a tab builds a static code for its total, tagged
//! with the tab number so the merchant can reconcile the transfer.

use crate::amount::Amount;
use crate::payload::PaymentCodeRequest;
use log::debug;

/// Merchant name used when the point of sale has none configured.
pub const DEFAULT_MERCHANT_NAME: &str = "Carlão BT Online";

/// City printed on every code issued by the kiosk.
pub const DEFAULT_MERCHANT_CITY: &str = "PORTO ALEGRE";

/// Prefix of the transaction reference, followed by the tab number.
pub const REFERENCE_PREFIX: &str = "CARD";

/// One line of a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabItem {
    pub quantity: u32,
    pub unit_price: Amount,

    /// Line total as priced by the backend, `None` while still pending.
    pub line_total: Option<Amount>,
}

impl TabItem {
    /// Backend line total, or `unit_price * quantity` while it is pending.
    pub fn total(&self) -> Amount {
        self.line_total
            .unwrap_or_else(|| self.unit_price.times(self.quantity))
    }
}

/// A running tab at a point of sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Human-facing tab number, printed on the physical card.
    pub number: u64,
    pub items: Vec<TabItem>,
}

impl Tab {
    pub fn new(number: u64) -> Self {
        Tab {
            number,
            items: Vec::new(),
        }
    }

    /// Sum of the line totals.
    pub fn total(&self) -> Amount {
        self.items.iter().map(TabItem::total).sum()
    }

    /// Transaction reference for this tab, e.g. `CARD42`.
    pub fn reference(&self) -> String {
        format!("{}{}", REFERENCE_PREFIX, self.number)
    }
}

/// Payment settings of a point of sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantProfile {
    /// Pix key the point of sale receives on; codes are only offered when set.
    pub pix_key: Option<String>,
    pub name: Option<String>,
    pub city: String,
}

impl MerchantProfile {
    pub fn new(pix_key: Option<String>, name: Option<String>) -> Self {
        MerchantProfile {
            pix_key,
            name,
            city: DEFAULT_MERCHANT_CITY.to_string(),
        }
    }

    /// Builds the request to charge `tab`.
    ///
    /// Returns `None` when no usable Pix key is configured.
    pub fn payment_request(&self, tab: &Tab) -> Option<PaymentCodeRequest> {
        let key = self.pix_key.as_deref().map(str::trim).unwrap_or("");
        if key.is_empty() {
            debug!("No Pix key configured, not offering a code for tab {}", tab.number);
            return None;
        }

        let name = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_MERCHANT_NAME);

        Some(PaymentCodeRequest {
            payee_key: key.to_string(),
            amount: tab.total(),
            payee_name: name.to_string(),
            payee_city: self.city.clone(),
            reference: tab.reference(),
        })
    }
}
