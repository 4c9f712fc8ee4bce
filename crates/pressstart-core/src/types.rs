//! # Domain Types
//!
//! Rows and create inputs for every table the back office touches.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Reference data        People               Invoice families           │
//! │  ──────────────        ──────               ────────────────           │
//! │  Store                 Member               SaleInvoice   → SaleItem   │
//! │  ItemType              Employee             TradeInvoice  → TradeItem  │
//! │  Item (inventory)                           RepairInvoice → RepairItem │
//! │  News (offers)                              Reservation   → Res..Item  │
//! │  RepairStatus                                                           │
//! │                                                                         │
//! │  Every row has a database-generated i64 id.                             │
//! │  Every `New*` input is the same row minus its id.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Naming
//! Row fields are named after their columns (`item_name`, `member_email`) so
//! that rows decode straight from `SELECT` output. Monetary columns carry a
//! `_cents` suffix and have a [`Money`] accessor.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Stores
// =============================================================================

/// A physical Press Start location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Store {
    pub store_id: i64,
    pub store_address: String,
    pub store_postal_code: String,
    /// Two-letter province code ("ON", "BC").
    pub store_province: String,
    pub store_phone: String,
}

/// Input for opening a new store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStore {
    pub store_address: String,
    pub store_postal_code: String,
    pub store_province: String,
    pub store_phone: String,
}

// =============================================================================
// Inventory
// =============================================================================

/// A category of stock (console, game, accessory) with its base trade value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ItemType {
    pub item_type_id: i64,
    pub item_type_name: String,
    pub item_type_description: Option<String>,
    pub item_type_value_cents: i64,
}

/// A stocked item at one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    pub item_id: i64,
    pub item_type_id: i64,
    pub store_id: i64,
    /// Grading of box, manual and physical condition.
    pub condition_id: i64,
    pub item_name: String,
    /// What the store paid for the item.
    pub item_cost_cents: i64,
    pub item_sale_price_cents: i64,
    pub item_msrp_cents: i64,
    pub item_stock_quantity: i64,
    pub item_description: Option<String>,
}

/// Input for adding an item to inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub item_type_id: i64,
    pub store_id: i64,
    pub condition_id: i64,
    pub item_name: String,
    pub item_cost_cents: i64,
    pub item_sale_price_cents: i64,
    pub item_msrp_cents: i64,
    pub item_stock_quantity: i64,
    pub item_description: Option<String>,
}

// =============================================================================
// Members
// =============================================================================

/// A loyalty member (customer account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Member {
    pub member_id: i64,
    /// Argon2 PHC string. Never leaves the process.
    #[serde(skip)]
    pub member_password_hash: String,
    pub preferred_store_id: Option<i64>,
    pub member_first_name: String,
    pub member_last_name: String,
    pub member_postal_code: Option<String>,
    pub member_phone: Option<String>,
    pub member_email: String,
    pub member_mailing_list: bool,
}

/// Input for signing up a member. `password` is plaintext and is hashed
/// before it reaches the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    pub preferred_store_id: Option<i64>,
    pub member_first_name: String,
    pub member_last_name: String,
    pub member_postal_code: Option<String>,
    pub member_phone: Option<String>,
    pub member_email: String,
    pub member_mailing_list: bool,
    #[serde(skip_serializing)]
    pub password: String,
}

// =============================================================================
// Employees
// =============================================================================

/// Store staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    pub employee_id: i64,
    #[serde(skip)]
    pub employee_password_hash: String,
    pub employee_first_name: String,
    pub employee_last_name: String,
    pub employee_job_title: String,
    pub employee_phone: Option<String>,
    pub employee_email: String,
    pub employee_address: Option<String>,
    pub employee_postal_code: Option<String>,
    /// Free-form weekly availability ("Mon-Fri evenings").
    pub employee_availability: Option<String>,
    /// Hourly wage.
    pub employee_wage_cents: i64,
    pub employee_manager: bool,
}

impl Employee {
    #[inline]
    pub fn wage(&self) -> Money {
        Money::from_cents(self.employee_wage_cents)
    }
}

/// Input for hiring an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub employee_first_name: String,
    pub employee_last_name: String,
    pub employee_job_title: String,
    pub employee_phone: Option<String>,
    pub employee_email: String,
    pub employee_address: Option<String>,
    pub employee_postal_code: Option<String>,
    pub employee_availability: Option<String>,
    pub employee_wage_cents: i64,
    pub employee_manager: bool,
    #[serde(skip_serializing)]
    pub password: String,
}

// =============================================================================
// News / Offers
// =============================================================================

/// A news article or promotional offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct News {
    pub news_id: i64,
    pub news_title: String,
    pub news_date_added: NaiveDate,
    pub news_article: String,
    /// Shown on the storefront landing page.
    pub news_front_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNews {
    pub news_title: String,
    /// Defaults to today when absent.
    pub news_date_added: Option<NaiveDate>,
    pub news_article: String,
    pub news_front_page: bool,
}

// =============================================================================
// Sales
// =============================================================================

/// A sale invoice header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleInvoice {
    pub invoice_id: i64,
    /// `None` for walk-in customers without a membership.
    pub customer_id: Option<i64>,
    pub employee_id: i64,
    pub store_id: i64,
    pub sale_invoice_date: DateTime<Utc>,
    /// Trade credit applied against this sale.
    pub sale_invoice_trade_value_paid_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSaleInvoice {
    pub customer_id: Option<i64>,
    pub employee_id: i64,
    pub store_id: i64,
    /// Defaults to the time of insert when absent.
    pub sale_invoice_date: Option<DateTime<Utc>>,
    pub sale_invoice_trade_value_paid_cents: i64,
}

/// One line of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub sale_item_id: i64,
    pub invoice_id: i64,
    pub item_id: i64,
    pub sale_item_quantity: i64,
    /// Unit price at time of sale.
    pub sale_item_price_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSaleItem {
    pub item_id: i64,
    pub sale_item_quantity: i64,
    pub sale_item_price_cents: i64,
}

// =============================================================================
// Trades
// =============================================================================

/// How a customer is paid for a trade-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutType {
    Cash,
    StoreCredit,
}

impl PayoutType {
    /// The value stored in `trade_item_payout_type`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PayoutType::Cash => "cash",
            PayoutType::StoreCredit => "store_credit",
        }
    }
}

impl fmt::Display for PayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayoutType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PayoutType::Cash),
            "store_credit" => Ok(PayoutType::StoreCredit),
            other => Err(CoreError::UnknownPayoutType(other.to_string())),
        }
    }
}

impl TryFrom<String> for PayoutType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A trade-in invoice header. Unsigned trades are quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TradeInvoice {
    pub trade_invoice_id: i64,
    pub customer_id: i64,
    pub store_id: i64,
    pub trade_invoice_date: DateTime<Utc>,
    pub trade_invoice_signed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTradeInvoice {
    pub customer_id: i64,
    pub store_id: i64,
    pub trade_invoice_date: Option<DateTime<Utc>>,
    pub trade_invoice_signed: bool,
}

/// One traded-in item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TradeItem {
    pub trade_item_id: i64,
    pub trade_invoice_id: i64,
    pub item_id: i64,
    /// Donated items are accepted without payout.
    pub trade_item_donation: bool,
    pub trade_item_value_offered_cents: i64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub trade_item_payout_type: PayoutType,
    pub trade_item_final_trade_value_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTradeItem {
    pub item_id: i64,
    pub trade_item_donation: bool,
    pub trade_item_value_offered_cents: i64,
    pub trade_item_payout_type: PayoutType,
    pub trade_item_final_trade_value_cents: i64,
}

// =============================================================================
// Repairs
// =============================================================================

/// A stage in the repair workflow ("Received", "In Progress", "Ready").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RepairStatus {
    pub repair_status_id: i64,
    pub repair_status_name: String,
    pub repair_status_description: Option<String>,
}

/// A repair ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RepairInvoice {
    pub repair_invoice_id: i64,
    pub customer_id: i64,
    /// Technician; unassigned tickets have none.
    pub employee_id: Option<i64>,
    pub repair_status_id: i64,
    pub repair_invoice_description: String,
    pub repair_invoice_labour_cost_cents: i64,
}

impl RepairInvoice {
    #[inline]
    pub fn labour_cost(&self) -> Money {
        Money::from_cents(self.repair_invoice_labour_cost_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepairInvoice {
    pub customer_id: i64,
    pub employee_id: Option<i64>,
    pub repair_status_id: i64,
    pub repair_invoice_description: String,
    pub repair_invoice_labour_cost_cents: i64,
}

/// A part used on a repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RepairItem {
    pub repair_item_id: i64,
    pub repair_invoice_id: i64,
    pub repair_part_name: String,
    pub repair_item_part_description: Option<String>,
    pub repair_item_cost_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepairItem {
    pub repair_part_name: String,
    pub repair_item_part_description: Option<String>,
    pub repair_item_cost_cents: i64,
}

// =============================================================================
// Reservations
// =============================================================================

/// Items held at a store for a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Reservation {
    pub reservation_id: i64,
    pub store_id: i64,
    pub customer_id: i64,
    pub reservation_date_reserved: DateTime<Utc>,
    /// Set once the reserved stock has arrived at the store.
    pub reservation_received: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub store_id: i64,
    pub customer_id: i64,
    pub reservation_date_reserved: Option<DateTime<Utc>>,
    pub reservation_received: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReservationItem {
    pub reservation_item_id: i64,
    pub reservation_id: i64,
    pub item_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservationItem {
    pub item_id: i64,
}

// =============================================================================
// Invoice
// =============================================================================

/// A persisted invoice header plus its persisted lines, in insert order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice<P, C> {
    pub invoice: P,
    pub items: Vec<C>,
}

/// The monetary amount a line contributes to its invoice.
pub trait LineAmount {
    fn amount(&self) -> Money;
}

impl LineAmount for SaleItem {
    fn amount(&self) -> Money {
        Money::from_cents(self.sale_item_price_cents).multiply_quantity(self.sale_item_quantity)
    }
}

impl LineAmount for TradeItem {
    /// Donations pay nothing regardless of the recorded value.
    fn amount(&self) -> Money {
        if self.trade_item_donation {
            Money::zero()
        } else {
            Money::from_cents(self.trade_item_final_trade_value_cents)
        }
    }
}

impl LineAmount for RepairItem {
    fn amount(&self) -> Money {
        Money::from_cents(self.repair_item_cost_cents)
    }
}

impl<P, C: LineAmount> Invoice<P, C> {
    /// Sum of all line amounts.
    pub fn lines_total(&self) -> Money {
        self.items.iter().map(LineAmount::amount).sum()
    }
}

impl Invoice<RepairInvoice, RepairItem> {
    /// Parts plus labour.
    pub fn repair_total(&self) -> Money {
        self.lines_total() + self.invoice.labour_cost()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sale_line(qty: i64, price: i64) -> SaleItem {
        SaleItem {
            sale_item_id: 1,
            invoice_id: 1,
            item_id: 1,
            sale_item_quantity: qty,
            sale_item_price_cents: price,
        }
    }

    #[test]
    fn test_payout_type_round_trips_through_column_text() {
        assert_eq!("cash".parse::<PayoutType>().unwrap(), PayoutType::Cash);
        assert_eq!(
            PayoutType::try_from("store_credit".to_string()).unwrap(),
            PayoutType::StoreCredit
        );
        assert_eq!(PayoutType::StoreCredit.as_str(), "store_credit");
    }

    #[test]
    fn test_unknown_payout_type() {
        let err = "cheque".parse::<PayoutType>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownPayoutType(s) if s == "cheque"));
    }

    #[test]
    fn test_sale_invoice_lines_total() {
        let invoice = Invoice {
            invoice: (),
            items: vec![sale_line(2, 5999), sale_line(1, 1000)],
        };
        assert_eq!(invoice.lines_total().cents(), 12998);
    }

    #[test]
    fn test_donated_trade_item_pays_nothing() {
        let item = TradeItem {
            trade_item_id: 1,
            trade_invoice_id: 1,
            item_id: 1,
            trade_item_donation: true,
            trade_item_value_offered_cents: 1500,
            trade_item_payout_type: PayoutType::Cash,
            trade_item_final_trade_value_cents: 1500,
        };
        assert!(item.amount().is_zero());
    }

    #[test]
    fn test_repair_total_includes_labour() {
        let invoice = Invoice {
            invoice: RepairInvoice {
                repair_invoice_id: 1,
                customer_id: 1,
                employee_id: None,
                repair_status_id: 1,
                repair_invoice_description: "Disc drive".into(),
                repair_invoice_labour_cost_cents: 4000,
            },
            items: vec![RepairItem {
                repair_item_id: 1,
                repair_invoice_id: 1,
                repair_part_name: "Laser".into(),
                repair_item_part_description: None,
                repair_item_cost_cents: 2500,
            }],
        };
        assert_eq!(invoice.repair_total().cents(), 6500);
    }

    #[test]
    fn test_member_hash_is_not_serialized() {
        let member = Member {
            member_id: 7,
            member_password_hash: "$argon2id$secret".into(),
            preferred_store_id: Some(1),
            member_first_name: "Samus".into(),
            member_last_name: "Aran".into(),
            member_postal_code: None,
            member_phone: None,
            member_email: "samus@example.com".into(),
            member_mailing_list: true,
        };
        let json = serde_json::to_string(&member).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("samus@example.com"));
    }
}
