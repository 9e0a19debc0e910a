//! Input hygiene for free-text query parameters.
//!
//! The user directory search (`GET /user`) feeds a caller-supplied string into
//! a dynamically assembled `ILIKE` clause. The value is always bound as a
//! parameter, never interpolated, but it is still screened and stripped here
//! so that junk patterns are rejected early with a `BadRequest` rather than
//! producing surprising matches.

use validator::ValidationError;

pub fn sanitize_input(input: &str) -> String {
    let sanitized = input
        .replace('\'', "''")
        .replace(';', "")
        .replace("--", "")
        .replace("/*", "")
        .replace("*/", "");

    sanitized.trim().to_string()
}

pub fn validate_sql_input(input: &str) -> Result<(), ValidationError> {
    let sql_patterns = [
        "SELECT", "INSERT", "UPDATE", "DELETE", "DROP", "UNION", "ALTER", "EXEC", "EXECUTE",
        "DECLARE", "WAITFOR",
    ];

    let upper = input.to_uppercase();
    for pattern in sql_patterns.iter() {
        if upper.contains(pattern) {
            return Err(ValidationError::new("sql_injection"));
        }
    }

    Ok(())
}
