// Constants module - centralized default values for configuration
//
// Every `default_*` function in the config module sources its value from here.

// =============================================================================
// Worker defaults
// =============================================================================

/// Default cache name prefix; the generation name appends `-v{version}`
pub const DEFAULT_CACHE_PREFIX: &str = "utilisasi-warehouse";

/// Default cache version
pub const DEFAULT_CACHE_VERSION: &str = "1.0.0";

/// Default worker scope; the page origin is derived from it
pub const DEFAULT_SCOPE: &str = "https://riep31.github.io/";

// =============================================================================
// Precache defaults
// =============================================================================

/// Assets stored in the current generation during install
pub const DEFAULT_PRECACHE_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./dashboard.html",
    "./offline.html",
    "./manifest.json",
    "./icons/icon-192.png",
    "./icons/icon-512.png",
];

/// Document served when a navigation fails with nothing cached
pub const DEFAULT_OFFLINE_PAGE: &str = "./offline.html";

/// Image served when an image request fails with nothing cached
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "./icons/icon-192.png";

// =============================================================================
// Origin defaults
// =============================================================================

/// Cross-origin prefixes whose traffic is cached
pub const DEFAULT_TRUSTED_ORIGINS: &[&str] = &[
    "https://riep31.github.io",
    "https://cdn.jsdelivr.net",
    "https://cdnjs.cloudflare.com",
    "https://sheets.googleapis.com",
];

/// Host whose responses are never read from or written to the store
pub const DEFAULT_LIVE_DATA_HOST: &str = "sheets.googleapis.com";

// =============================================================================
// Network defaults
// =============================================================================

/// User agent sent by the HTTP fetcher
pub const DEFAULT_USER_AGENT: &str = concat!("offline-shell/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Notification defaults
// =============================================================================

/// Title used when a push payload carries none
pub const DEFAULT_NOTIFICATION_TITLE: &str = "Utilisasi Warehouse";

/// Body used when a push payload carries none
pub const DEFAULT_NOTIFICATION_BODY: &str = "Notifikasi baru";

/// Icon and badge shown with notifications
pub const DEFAULT_NOTIFICATION_ICON: &str = "./icons/icon-192.png";

/// Vibration pattern in milliseconds (vibrate, pause, vibrate)
pub const DEFAULT_VIBRATION_PATTERN: &[u32] = &[200, 100, 200];

/// Page opened when a notification is clicked
pub const DEFAULT_NOTIFICATION_CLICK_URL: &str = "./";

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Synthetic responses
// =============================================================================

/// Body of the offline document used when the offline page is not cached
pub const SYNTHETIC_OFFLINE_HTML: &str = "<!DOCTYPE html>\
<html><head><meta charset=\"utf-8\"><title>Offline</title></head>\
<body><h1>Offline</h1><p>This page is not available offline.</p></body></html>";
