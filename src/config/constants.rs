//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Pagination
// =============================================================================

/// Products per page on the public catalog
pub const CATALOG_PAGE_SIZE: u64 = 12;

/// Default number of items per page in admin listings
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Ledger rows per page on the transactions screen
pub const TRANSACTIONS_PAGE_SIZE: u64 = 50;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Highest page number accepted from a query string
pub const MAX_PAGE_NUMBER: u64 = 100_000;

// =============================================================================
// Inventory
// =============================================================================

/// Stock level at or below which a product shows up as "low stock"
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Dashboard counts products strictly below this level as low stock
pub const DASHBOARD_LOW_STOCK_THRESHOLD: i32 = 5;

/// Number of recent products / transactions shown on the dashboard
pub const DASHBOARD_RECENT_LIMIT: u64 = 5;

/// Note attached to the ledger row created with a new product
pub const INITIAL_STOCK_NOTE: &str = "Initial stock";

/// Largest quantity (or adjustment target) a single movement may carry
pub const MAX_MOVEMENT_QUANTITY: i32 = 1_000_000;

/// Largest price accepted for a product or a movement, in cents (€10.000.000,00)
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token and session expiration)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Name of the admin session cookie
pub const SESSION_COOKIE_NAME: &str = "gonzagas_session";

/// Default admin session lifetime in hours
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

// =============================================================================
// User Roles
// =============================================================================

/// Back-office user without checkpoint privileges
pub const ROLE_STAFF: &str = "staff";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_STAFF, ROLE_ADMIN];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default shop name used in page titles
pub const DEFAULT_SITE_NAME: &str = "Gonzaga's Jewelry";

// =============================================================================
// Cache (Redis)
// =============================================================================

/// Default Redis URL (for development)
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Cache key prefix for session data
pub const CACHE_PREFIX_SESSION: &str = "session:";

/// Cache key prefix for rate limiting
pub const CACHE_PREFIX_RATE_LIMIT: &str = "ratelimit:";

// =============================================================================
// Rate Limiting
// =============================================================================

/// Login attempts allowed per client within the window
pub const RATE_LIMIT_LOGIN_ATTEMPTS: u64 = 5;

/// Login rate limit window in seconds (5 minutes)
pub const RATE_LIMIT_LOGIN_WINDOW_SECONDS: u64 = 300;

// =============================================================================
// Media
// =============================================================================

/// Default directory for uploaded and gallery media
pub const DEFAULT_MEDIA_DIR: &str = "media";

/// Sub-directory of the media dir holding product images
pub const PRODUCT_IMAGE_SUBDIR: &str = "products";

/// Sub-directory of the media dir holding the home page gallery
pub const GALLERY_SUBDIR: &str = "gallery";

/// Largest accepted product image upload (10 MB)
pub const MAX_IMAGE_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Extensions accepted for product images
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Extensions shown in the home page gallery
pub const GALLERY_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "mp4"];

// =============================================================================
// Checkpoints
// =============================================================================

/// Default directory for database dump files
pub const DEFAULT_CHECKPOINT_DIR: &str = "checkpoints";

/// Default number of checkpoints kept before the oldest are pruned
pub const DEFAULT_MAX_CHECKPOINTS: usize = 10;

/// Default dump binary
pub const DEFAULT_MYSQLDUMP_BIN: &str = "mysqldump";

/// Default client binary used for restores
pub const DEFAULT_MYSQL_BIN: &str = "mysql";

/// Default timeout for dump and restore runs
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 600;

/// Table excluded from dumps so restores keep the checkpoint history
pub const CHECKPOINT_TABLE: &str = "checkpoints";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: u64 = 1;
