//! # Validation Module
//!
//! Input validation for everything the back office writes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (CLI / form)                                          │
//! │  └── Deserialization into New* structs                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (Validate trait)                                 │
//! │  ├── Lengths matching the column sizes                                 │
//! │  ├── Postal code, phone, email, province formats                       │
//! │  └── Money and quantity ranges                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (PostgreSQL)                                        │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign keys (store, member, item exist)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories call [`Validate::validate`] before sending any SQL, so a bad
//! input never opens a connection.

use crate::error::ValidationError;
use crate::types::*;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Provinces and territories a store or member address may be in.
pub const PROVINCES: [&str; 13] = [
    "AB", "BC", "MB", "NB", "NL", "NS", "NT", "NU", "ON", "PE", "QC", "SK", "YT",
];

/// Minimum password length for member and employee logins.
pub const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// Validate Trait
// =============================================================================

/// Implemented by every create/update input.
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field against its column width.
///
/// ## Example
/// ```rust
/// use pressstart_core::validation::validate_text;
///
/// assert!(validate_text("item_name", "Chrono Trigger", 64).is_ok());
/// assert!(validate_text("item_name", "   ", 64).is_err());
/// ```
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an optional text field. `None` is always fine.
pub fn validate_optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        _ => Ok(()),
    }
}

/// Validates a Canadian postal code stored without its space ("K1A0B1").
///
/// ## Rules
/// - Exactly six characters, letter-digit-letter-digit-letter-digit
/// - Case-insensitive
pub fn validate_postal_code(field: &str, code: &str) -> ValidationResult<()> {
    let chars: Vec<char> = code.chars().collect();

    let well_formed = chars.len() == 6
        && chars.iter().enumerate().all(|(i, c)| {
            if i % 2 == 0 {
                c.is_ascii_alphabetic()
            } else {
                c.is_ascii_digit()
            }
        });

    if !well_formed {
        return Err(ValidationError::invalid_format(
            field,
            "expected six characters like K1A0B1",
        ));
    }

    Ok(())
}

/// Validates a ten-digit phone number with no punctuation.
pub fn validate_phone(field: &str, phone: &str) -> ValidationResult<()> {
    if phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(field, "expected 10 digits"));
    }
    Ok(())
}

/// Validates an email address.
///
/// Only the shape is checked: one `@`, a non-empty local part, and a domain
/// containing a dot.
pub fn validate_email(field: &str, email: &str) -> ValidationResult<()> {
    validate_text(field, email, 60)?;

    let valid = match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::invalid_format(field, "expected an email address"));
    }

    Ok(())
}

/// Validates a two-letter province code.
pub fn validate_province(field: &str, province: &str) -> ValidationResult<()> {
    if !PROVINCES.contains(&province) {
        return Err(ValidationError::invalid_format(
            field,
            "expected a two-letter province code like ON",
        ));
    }
    Ok(())
}

/// Validates a plaintext password before hashing.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a database id reference.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id < 1 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates an amount in cents. Zero is allowed (free items, donations).
pub fn validate_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a quantity sold on one line.
///
/// ## Example
/// ```rust
/// use pressstart_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(1000).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_LINE_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

/// Validates an on-hand stock count.
pub fn validate_stock(qty: i64) -> ValidationResult<()> {
    if !(0..=i64::from(i16::MAX)).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "item_stock_quantity".to_string(),
            min: 0,
            max: i64::from(i16::MAX),
        });
    }
    Ok(())
}

// =============================================================================
// Validate Implementations
// =============================================================================

impl Validate for NewStore {
    fn validate(&self) -> ValidationResult<()> {
        validate_text("store_address", &self.store_address, 120)?;
        validate_postal_code("store_postal_code", &self.store_postal_code)?;
        validate_province("store_province", &self.store_province)?;
        validate_phone("store_phone", &self.store_phone)
    }
}

fn validate_item_fields(
    item_type_id: i64,
    store_id: i64,
    condition_id: i64,
    name: &str,
    prices: [(&str, i64); 3],
    stock: i64,
    description: Option<&str>,
) -> ValidationResult<()> {
    validate_id("item_type_id", item_type_id)?;
    validate_id("store_id", store_id)?;
    validate_id("condition_id", condition_id)?;
    validate_text("item_name", name, 64)?;
    for (field, cents) in prices {
        validate_cents(field, cents)?;
    }
    validate_stock(stock)?;
    validate_optional_text("item_description", description, 128)
}

impl Validate for NewItem {
    fn validate(&self) -> ValidationResult<()> {
        validate_item_fields(
            self.item_type_id,
            self.store_id,
            self.condition_id,
            &self.item_name,
            [
                ("item_cost_cents", self.item_cost_cents),
                ("item_sale_price_cents", self.item_sale_price_cents),
                ("item_msrp_cents", self.item_msrp_cents),
            ],
            self.item_stock_quantity,
            self.item_description.as_deref(),
        )
    }
}

impl Validate for Item {
    fn validate(&self) -> ValidationResult<()> {
        validate_id("item_id", self.item_id)?;
        validate_item_fields(
            self.item_type_id,
            self.store_id,
            self.condition_id,
            &self.item_name,
            [
                ("item_cost_cents", self.item_cost_cents),
                ("item_sale_price_cents", self.item_sale_price_cents),
                ("item_msrp_cents", self.item_msrp_cents),
            ],
            self.item_stock_quantity,
            self.item_description.as_deref(),
        )
    }
}

struct PersonFields<'a> {
    prefix: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    postal_code: Option<&'a str>,
}

impl PersonFields<'_> {
    fn validate(&self) -> ValidationResult<()> {
        let p = self.prefix;
        validate_text(&format!("{p}_first_name"), self.first_name, 20)?;
        validate_text(&format!("{p}_last_name"), self.last_name, 30)?;
        validate_email(&format!("{p}_email"), self.email)?;
        if let Some(phone) = self.phone {
            validate_phone(&format!("{p}_phone"), phone)?;
        }
        if let Some(code) = self.postal_code {
            validate_postal_code(&format!("{p}_postal_code"), code)?;
        }
        Ok(())
    }
}

impl Validate for NewMember {
    fn validate(&self) -> ValidationResult<()> {
        PersonFields {
            prefix: "member",
            first_name: &self.member_first_name,
            last_name: &self.member_last_name,
            email: &self.member_email,
            phone: self.member_phone.as_deref(),
            postal_code: self.member_postal_code.as_deref(),
        }
        .validate()?;
        if let Some(store) = self.preferred_store_id {
            validate_id("preferred_store_id", store)?;
        }
        validate_password(&self.password)
    }
}

impl Validate for Member {
    fn validate(&self) -> ValidationResult<()> {
        validate_id("member_id", self.member_id)?;
        PersonFields {
            prefix: "member",
            first_name: &self.member_first_name,
            last_name: &self.member_last_name,
            email: &self.member_email,
            phone: self.member_phone.as_deref(),
            postal_code: self.member_postal_code.as_deref(),
        }
        .validate()?;
        if let Some(store) = self.preferred_store_id {
            validate_id("preferred_store_id", store)?;
        }
        Ok(())
    }
}

fn validate_employee_extras(
    job_title: &str,
    address: Option<&str>,
    wage_cents: i64,
) -> ValidationResult<()> {
    validate_text("employee_job_title", job_title, 40)?;
    validate_optional_text("employee_address", address, 120)?;
    validate_cents("employee_wage_cents", wage_cents)
}

impl Validate for NewEmployee {
    fn validate(&self) -> ValidationResult<()> {
        PersonFields {
            prefix: "employee",
            first_name: &self.employee_first_name,
            last_name: &self.employee_last_name,
            email: &self.employee_email,
            phone: self.employee_phone.as_deref(),
            postal_code: self.employee_postal_code.as_deref(),
        }
        .validate()?;
        validate_employee_extras(
            &self.employee_job_title,
            self.employee_address.as_deref(),
            self.employee_wage_cents,
        )?;
        validate_password(&self.password)
    }
}

impl Validate for Employee {
    fn validate(&self) -> ValidationResult<()> {
        validate_id("employee_id", self.employee_id)?;
        PersonFields {
            prefix: "employee",
            first_name: &self.employee_first_name,
            last_name: &self.employee_last_name,
            email: &self.employee_email,
            phone: self.employee_phone.as_deref(),
            postal_code: self.employee_postal_code.as_deref(),
        }
        .validate()?;
        validate_employee_extras(
            &self.employee_job_title,
            self.employee_address.as_deref(),
            self.employee_wage_cents,
        )
    }
}

impl Validate for NewNews {
    fn validate(&self) -> ValidationResult<()> {
        validate_text("news_title", &self.news_title, 30)?;
        validate_text("news_article", &self.news_article, 10_000)
    }
}

impl Validate for News {
    fn validate(&self) -> ValidationResult<()> {
        validate_id("news_id", self.news_id)?;
        validate_text("news_title", &self.news_title, 30)?;
        validate_text("news_article", &self.news_article, 10_000)
    }
}

impl Validate for NewSaleInvoice {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(customer) = self.customer_id {
            validate_id("customer_id", customer)?;
        }
        validate_id("employee_id", self.employee_id)?;
        validate_id("store_id", self.store_id)?;
        validate_cents(
            "sale_invoice_trade_value_paid_cents",
            self.sale_invoice_trade_value_paid_cents,
        )
    }
}

impl Validate for NewSaleItem {
    fn validate(&self) -> ValidationResult<()> {
        validate_id("item_id", self.item_id)?;
        validate_quantity(self.sale_item_quantity)?;
        validate_cents("sale_item_price_cents", self.sale_item_price_cents)
    }
}

impl Validate for NewTradeInvoice {
    fn validate(&self) -> ValidationResult<()> {
        validate_id("customer_id", self.customer_id)?;
        validate_id("store_id", self.store_id)
    }
}

impl Validate for NewTradeItem {
    fn validate(&self) -> ValidationResult<()> {
        validate_id("item_id", self.item_id)?;
        validate_cents("trade_item_value_offered_cents", self.trade_item_value_offered_cents)?;
        validate_cents(
            "trade_item_final_trade_value_cents",
            self.trade_item_final_trade_value_cents,
        )
    }
}

impl Validate for NewRepairInvoice {
    fn validate(&self) -> ValidationResult<()> {
        validate_id("customer_id", self.customer_id)?;
        if let Some(employee) = self.employee_id {
            validate_id("employee_id", employee)?;
        }
        validate_id("repair_status_id", self.repair_status_id)?;
        validate_text("repair_invoice_description", &self.repair_invoice_description, 120)?;
        validate_cents(
            "repair_invoice_labour_cost_cents",
            self.repair_invoice_labour_cost_cents,
        )
    }
}

impl Validate for NewRepairItem {
    fn validate(&self) -> ValidationResult<()> {
        validate_text("repair_part_name", &self.repair_part_name, 30)?;
        validate_optional_text(
            "repair_item_part_description",
            self.repair_item_part_description.as_deref(),
            120,
        )?;
        validate_cents("repair_item_cost_cents", self.repair_item_cost_cents)
    }
}

impl Validate for NewReservation {
    fn validate(&self) -> ValidationResult<()> {
        validate_id("store_id", self.store_id)?;
        validate_id("customer_id", self.customer_id)
    }
}

impl Validate for NewReservationItem {
    fn validate(&self) -> ValidationResult<()> {
        validate_id("item_id", self.item_id)
    }
}

/// Validates every element, reporting the first failure.
impl<T: Validate> Validate for [T] {
    fn validate(&self) -> ValidationResult<()> {
        self.iter().try_for_each(Validate::validate)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn new_member() -> NewMember {
        NewMember {
            preferred_store_id: Some(1),
            member_first_name: "Link".into(),
            member_last_name: "Hyrule".into(),
            member_postal_code: Some("K1A0B1".into()),
            member_phone: Some("6135550199".into()),
            member_email: "link@example.com".into(),
            member_mailing_list: false,
            password: "triforce!".into(),
        }
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("item_name", "Halo", 64).is_ok());
        assert_eq!(
            validate_text("item_name", "", 64),
            Err(ValidationError::Required {
                field: "item_name".into()
            })
        );
        assert!(matches!(
            validate_text("item_name", &"x".repeat(65), 64),
            Err(ValidationError::TooLong { max: 64, .. })
        ));
    }

    #[test]
    fn test_validate_postal_code() {
        assert!(validate_postal_code("p", "K1A0B1").is_ok());
        assert!(validate_postal_code("p", "k1a0b1").is_ok());
        assert!(validate_postal_code("p", "K1A 0B1").is_err());
        assert!(validate_postal_code("p", "12345").is_err());
        assert!(validate_postal_code("p", "1K1A0B").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("phone", "6135550199").is_ok());
        assert!(validate_phone("phone", "613-555-0199").is_err());
        assert!(validate_phone("phone", "555019").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "mario@mushroom.kingdom").is_ok());
        assert!(validate_email("email", "mario").is_err());
        assert!(validate_email("email", "@example.com").is_err());
        assert!(validate_email("email", "a@b@c.com").is_err());
        assert!(validate_email("email", "a@localhost").is_err());
    }

    #[test]
    fn test_validate_province() {
        assert!(validate_province("p", "ON").is_ok());
        assert!(validate_province("p", "on").is_err());
        assert!(validate_province("p", "XX").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_new_member() {
        assert!(new_member().validate().is_ok());

        let mut short_password = new_member();
        short_password.password = "abc".into();
        assert!(matches!(
            short_password.validate(),
            Err(ValidationError::TooShort { .. })
        ));

        let mut bad_email = new_member();
        bad_email.member_email = "nope".into();
        assert!(matches!(
            bad_email.validate(),
            Err(ValidationError::InvalidFormat { field, .. }) if field == "member_email"
        ));
    }

    #[test]
    fn test_slice_reports_first_failure() {
        let lines = vec![
            NewSaleItem {
                item_id: 1,
                sale_item_quantity: 1,
                sale_item_price_cents: 100,
            },
            NewSaleItem {
                item_id: 2,
                sale_item_quantity: 0,
                sale_item_price_cents: 100,
            },
        ];
        assert!(matches!(
            lines.validate(),
            Err(ValidationError::OutOfRange { field, .. }) if field == "quantity"
        ));
    }

    #[test]
    fn test_new_item_negative_price() {
        let item = NewItem {
            item_type_id: 1,
            store_id: 1,
            condition_id: 1,
            item_name: "GoldenEye 007".into(),
            item_cost_cents: 1000,
            item_sale_price_cents: -1,
            item_msrp_cents: 3999,
            item_stock_quantity: 3,
            item_description: None,
        };
        assert!(matches!(
            item.validate(),
            Err(ValidationError::OutOfRange { field, .. }) if field == "item_sale_price_cents"
        ));
    }
}
