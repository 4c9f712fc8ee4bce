//! The searchable entity families.
//!
//! Each table lists its filters in declared order. That order is the order
//! predicates and placeholders are emitted in.

use super::binding::FieldBinding;
use super::plan::EntitySearch;

const ID: &str = "id";

pub static INVENTORY: EntitySearch = EntitySearch {
    entity: "inventory",
    table: "tbl_items",
    columns: "item_id, item_type_id, store_id, condition_id, item_name, item_cost_cents, \
              item_sale_price_cents, item_msrp_cents, item_stock_quantity, item_description",
    primary_key: FieldBinding::id(ID, "item_id"),
    fields: &[
        FieldBinding::id("storeId", "store_id"),
        FieldBinding::prefix("name", "item_name"),
        FieldBinding::id("itemType", "item_type_id"),
    ],
};

pub static MEMBERS: EntitySearch = EntitySearch {
    entity: "members",
    table: "tbl_members",
    columns: "member_id, member_password_hash, preferred_store_id, member_first_name, \
              member_last_name, member_postal_code, member_phone, member_email, member_mailing_list",
    primary_key: FieldBinding::id(ID, "member_id"),
    fields: &[
        FieldBinding::prefix("email", "member_email"),
        FieldBinding::prefix("firstName", "member_first_name"),
        FieldBinding::prefix("lastName", "member_last_name"),
        FieldBinding::exact_text("phone", "member_phone"),
    ],
};

pub static EMPLOYEES: EntitySearch = EntitySearch {
    entity: "employees",
    table: "tbl_employees",
    columns: "employee_id, employee_password_hash, employee_first_name, employee_last_name, \
              employee_job_title, employee_phone, employee_email, employee_address, \
              employee_postal_code, employee_availability, employee_wage_cents, employee_manager",
    primary_key: FieldBinding::id(ID, "employee_id"),
    fields: &[
        FieldBinding::prefix("email", "employee_email"),
        FieldBinding::prefix("firstName", "employee_first_name"),
        FieldBinding::prefix("lastName", "employee_last_name"),
        FieldBinding::prefix("jobTitle", "employee_job_title"),
    ],
};

pub static TRADES: EntitySearch = EntitySearch {
    entity: "trades",
    table: "tbl_trade_invoices",
    columns: "trade_invoice_id, customer_id, store_id, trade_invoice_date, trade_invoice_signed",
    primary_key: FieldBinding::id(ID, "trade_invoice_id"),
    fields: &[
        FieldBinding::id("customerId", "customer_id"),
        FieldBinding::id("storeId", "store_id"),
        FieldBinding::flag("signed", "trade_invoice_signed"),
    ],
};

pub static REPAIRS: EntitySearch = EntitySearch {
    entity: "repairs",
    table: "tbl_repair_invoices",
    columns: "repair_invoice_id, customer_id, employee_id, repair_status_id, \
              repair_invoice_description, repair_invoice_labour_cost_cents",
    primary_key: FieldBinding::id(ID, "repair_invoice_id"),
    fields: &[
        FieldBinding::id("customerId", "customer_id"),
        FieldBinding::id("employeeId", "employee_id"),
        FieldBinding::id("statusId", "repair_status_id"),
        FieldBinding::prefix("description", "repair_invoice_description"),
    ],
};

pub static RESERVATIONS: EntitySearch = EntitySearch {
    entity: "reservations",
    table: "tbl_reservations",
    columns: "reservation_id, store_id, customer_id, reservation_date_reserved, reservation_received",
    primary_key: FieldBinding::id(ID, "reservation_id"),
    fields: &[
        FieldBinding::id("storeId", "store_id"),
        FieldBinding::id("customerId", "customer_id"),
        FieldBinding::flag("received", "reservation_received"),
    ],
};

pub static SALES: EntitySearch = EntitySearch {
    entity: "sales",
    table: "tbl_sale_invoices",
    columns: "invoice_id, customer_id, employee_id, store_id, sale_invoice_date, \
              sale_invoice_trade_value_paid_cents",
    primary_key: FieldBinding::id(ID, "invoice_id"),
    fields: &[
        FieldBinding::id("customerId", "customer_id"),
        FieldBinding::id("employeeId", "employee_id"),
        FieldBinding::id("storeId", "store_id"),
    ],
};
