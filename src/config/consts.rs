// src/config/consts.rs

// Ticketing system
pub const TICKETING_URL: &str = "https://servicedesk.cenic.org/";
pub const USER_ENV: &str = "PO_RECON_USER";
pub const PASSWORD_ENV: &str = "PO_RECON_PASSWORD";
pub const APPROVALS_FIELD: &str = "customfield_10100";
pub const SHIPPING_JQL: &str = r#"project = "Inventory Control" AND issuetype = "Outbound Shipping" AND status not in (Deleted, New) AND updated > endOfDay(-4) ORDER BY createdDate ASC"#;
pub const SEARCH_PAGE_SIZE: usize = 100;

// Inventory ticket custom fields
pub const ITEMS_FIELD: &str = "customfield_11516";
pub const SITE_NAME_FIELD: &str = "customfield_11507";
pub const TRACKING_FIELD: &str = "customfield_11509";
pub const ARRIVAL_FIELD: &str = "customfield_11505";
pub const DELIVERY_SPEED_FIELD: &str = "customfield_11600";

// Documents
pub const PO_PAGE_URL: &str =
    "https://parc.cenic.org/cenic-parc/printpurchaseorder.cfm?purchaseordersnumber={id}";
pub const PDF_DIR: &str = "purchase_orders";
pub const PDF_STEM: &str = "PO {id}";
pub const PDFTOTEXT: &str = "pdftotext";

// Ticket numbers at or above this are NOC tickets
pub const NOC_THRESHOLD: u32 = 10_000;

// Sink
pub const STORE_DIR: &str = ".store";
pub const ORDERS_TAB: &str = "NewOrders";
pub const PARC_TAB: &str = "PoResults";
pub const SHIPPING_TAB: &str = "OutboundShipping";
pub const SHIP_DATE_TAB: &str = "ShipDate";
pub const KEY_COL: usize = 0;

// Placeholders
pub const NO_RESULT: &str = "No result";
pub const NOT_APPLICABLE: &str = "NA";

// Net
pub const TIMEOUT_SECS: u64 = 15;
pub const MAX_ATTEMPTS: u32 = 3;
pub const INITIAL_DELAY_MS: u64 = 500;
pub const MAX_DELAY_MS: u64 = 8_000;
pub const BACKOFF_MULTIPLIER: u32 = 2;

// Enumeration
pub const MAX_CONSECUTIVE_FAILURES: usize = 3;

// Logging
pub const LOG_FILE: &str = ".store/debug.log";
pub const LOG_FILTER: &str = "po_recon=info";

// Date format written to the sheet
pub const SHEET_DATE: &str = "%m-%d-%Y";

// Options file read when no --config is given
pub const CONFIG_FILE: &str = "po_recon.toml";
