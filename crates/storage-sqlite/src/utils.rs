//! Helpers shared by the SQLite repositories.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Maximum number of parameters for SQLite IN (...) queries.
///
/// SQLite limits the number of bound parameters per statement (999 on older
/// builds). 500 leaves room for the other parameters of the query.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Chunk a slice into slices of at most `SQLITE_MAX_PARAMS_CHUNK` items.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Money columns are TEXT; this is the one place they are written.
pub fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Parses a TEXT money column, falling back to an f64 parse for values
/// written in scientific notation. Unreadable values become zero.
pub fn parse_decimal(value: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value) {
        Ok(d) => d,
        Err(e_decimal) => match f64::from_str(value).ok().and_then(Decimal::from_f64) {
            Some(d) => d,
            None => {
                log::error!(
                    "Failed to parse {} '{}' as Decimal ({}). Falling back to ZERO.",
                    field_name,
                    value,
                    e_decimal
                );
                Decimal::ZERO
            }
        },
    }
}

/// Parses a stored enum value, logging and falling back when the column holds
/// something the current code does not know.
pub fn parse_enum<T: FromStr>(value: &str, field_name: &str, fallback: T) -> T {
    match T::from_str(value) {
        Ok(v) => v,
        Err(_) => {
            log::error!(
                "Unknown {} '{}' in database, using fallback",
                field_name,
                value
            );
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use septic_core::works::WorkStatus;

    #[test]
    fn chunks_respect_limit() {
        let items: Vec<i32> = (0..1200).collect();
        let chunks: Vec<_> = chunk_for_sqlite(&items).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), SQLITE_MAX_PARAMS_CHUNK);
        assert_eq!(chunks[2].len(), 200);

        let empty: Vec<i32> = vec![];
        assert_eq!(chunk_for_sqlite(&empty).count(), 0);
    }

    #[test]
    fn decimal_text_round_trip() {
        assert_eq!(decimal_to_text(dec!(1250.50)), "1250.5");
        assert_eq!(parse_decimal("1250.5", "amount"), dec!(1250.5));
        assert_eq!(parse_decimal("1.5e3", "amount"), dec!(1500));
        assert_eq!(parse_decimal("garbage", "amount"), Decimal::ZERO);
    }

    #[test]
    fn unknown_enum_uses_fallback() {
        assert_eq!(
            parse_enum("COVERED", "status", WorkStatus::Pending),
            WorkStatus::Covered
        );
        assert_eq!(
            parse_enum("BURIED", "status", WorkStatus::Pending),
            WorkStatus::Pending
        );
    }
}
