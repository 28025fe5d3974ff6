//! Base URLs and per-operation endpoint paths for the Daraja gateway.

/// Base URL of the sandbox environment.
pub const SANDBOX_BASE_URL: &str = "https://sandbox.safaricom.co.ke";

/// Base URL of the production environment.
pub const PRODUCTION_BASE_URL: &str = "https://api.safaricom.co.ke";

/// OAuth token generation (GET, Basic auth).
pub const PATH_OAUTH_GENERATE: &str = "/oauth/v1/generate";

/// The only grant type the token endpoint accepts.
pub const OAUTH_GRANT_TYPE: &str = "client_credentials";

/// STK push payment initiation.
pub const PATH_STK_PUSH_PROCESS_REQUEST: &str = "/mpesa/stkpush/v1/processrequest";

/// STK push status query.
pub const PATH_STK_PUSH_QUERY: &str = "/mpesa/stkpushquery/v1/query";

/// C2B validation/confirmation URL registration.
pub const PATH_C2B_REGISTER_URL: &str = "/mpesa/c2b/v1/registerurl";

/// C2B payment simulation (sandbox only).
pub const PATH_C2B_SIMULATE: &str = "/mpesa/c2b/v1/simulate";

/// B2C disbursement.
pub const PATH_B2C_PAYMENT_REQUEST: &str = "/mpesa/b2c/v1/paymentrequest";

/// Transaction status query.
pub const PATH_TRANSACTION_STATUS_QUERY: &str = "/mpesa/transactionstatus/v1/query";

/// Account balance query.
pub const PATH_ACCOUNT_BALANCE_QUERY: &str = "/mpesa/accountbalance/v1/query";

/// Dynamic QR code generation.
pub const PATH_QRCODE_GENERATE: &str = "/mpesa/qrcode/v1/generate";

/// Transaction reversal.
pub const PATH_REVERSAL_REQUEST: &str = "/mpesa/reversal/v1/request";
