// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

// Collections
pub const USER_COLLECTION: &str = "user";
pub const ATTENDANCE_COLLECTION: &str = "attendance";
pub const LEAVE_COLLECTION: &str = "leaverequest";
pub const PAYROLL_COLLECTION: &str = "payrollitem";
pub const KPI_COLLECTION: &str = "kpi";

/// Field holding the login identity in the user collection
pub const IDENTITY_FIELD: &str = "email";

/// Upper bound on documents returned by list endpoints
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Minimum length of the optional token signing secret
pub const MIN_TOKEN_SECRET_LEN: usize = 32;

// Seeded accounts: (identity, password, name, role)
pub const SEED_ADMIN: (&str, &str, &str, &str) = ("admin", "admin", "Administrator", "admin");
pub const SEED_EMPLOYEE: (&str, &str, &str, &str) = ("karyawan", "karyawan", "Karyawan", "employee");

/// Largest accepted JSON request body
pub const MAX_BODY_BYTES: u64 = 64 * 1024;
