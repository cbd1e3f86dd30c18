//! Default configuration values - single source of truth

/// Config file looked up in the working directory when none is given
pub const CONFIG_FILE: &str = "storefront";

/// Prefix of environment overrides (`STOREFRONT_DATABASE_URL`, ...)
pub const ENV_PREFIX: &str = "STOREFRONT";

/// Separator between nested keys in environment overrides
/// (`STOREFRONT_PAGINATION__MAX_LIMIT`)
pub const ENV_SEPARATOR: &str = "__";

/// Table holding the product catalog
pub const TABLE: &str = "products";
