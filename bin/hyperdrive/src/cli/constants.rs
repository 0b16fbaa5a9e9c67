pub const DEFAULT_BEACON_API_ENDPOINT: &str = "http://localhost:5052";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "60";
