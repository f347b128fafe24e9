use crate::error::{DbError, Result};

/// The storage-owned period column; report columns may not shadow it.
pub const PERIOD_COLUMN: &str = "period";

/// Validate a metric-set name for use as a table identifier.
pub fn table_ident(name: &str) -> Result<&str> {
    validate(name)?;
    Ok(name)
}

/// Sanitize a remote-supplied column name: strip a namespace prefix such as
/// `ga:`, then validate the remainder as an identifier. Remote names are
/// never trusted as raw SQL.
pub fn column_ident(name: &str) -> Result<String> {
    let stripped = match name.split_once(':') {
        Some((_, rest)) => rest,
        None => name,
    };
    validate(stripped)?;
    if stripped.eq_ignore_ascii_case(PERIOD_COLUMN) {
        return Err(DbError::UnsafeIdentifier(name.to_string()));
    }
    Ok(stripped.to_string())
}

fn validate(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let leading_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if leading_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(DbError::UnsafeIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_ident_strips_namespace_prefix() {
        assert_eq!(column_ident("ga:newUsers").unwrap(), "newUsers");
        assert_eq!(column_ident("sessions").unwrap(), "sessions");
    }

    #[test]
    fn unsafe_identifiers_are_rejected() {
        for name in ["", "1abc", "a-b", "drop table x", "x\"y", "a;b", "ga:", "sum(a)"] {
            assert!(column_ident(name).is_err(), "accepted {name:?}");
        }
        assert!(table_ident("visits_count").is_ok());
        assert!(table_ident("visits count").is_err());
    }

    #[test]
    fn period_column_cannot_be_shadowed() {
        assert!(column_ident("period").is_err());
        assert!(column_ident("ga:PERIOD").is_err());
    }
}
