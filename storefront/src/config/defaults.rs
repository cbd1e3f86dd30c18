//! Default configuration values - single source of truth

use rust_decimal::Decimal;

/// Page size used when a request does not name one
pub const PAGE_LIMIT: u32 = 10;

/// Largest page size a request may ask for
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Sort field used when the caller supplies no sort spec
pub const SORT_FIELD: &str = "created_at";

/// Direction of the default sort field (newest first)
pub const SORT_DESCENDING: bool = true;

/// Whether to look up a cursor's boundary record when the cursor lacks sort values
pub const RESOLVE_CURSOR_FIELDS: bool = false;

/// Colombian IVA applied to checkout subtotals
pub const TAX_RATE: Decimal = Decimal::from_parts(19, 0, 0, false, 2);

/// Currency quoted by checkouts
pub const CURRENCY: &str = "COP";
