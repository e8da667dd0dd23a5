use rust_decimal::Decimal;
use std::str::FromStr;
use crate::types::ZakatError;

/// Trait for converting user-facing numbers into `Decimal`.
///
/// Lets callers pass `i32`, `f64`, `&str`, etc. straight into declaration
/// builders without wrapping them in `dec!()` or `Decimal::from()`.
pub trait IntoZakatDecimal {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError>;
}

impl IntoZakatDecimal for Decimal {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        Ok(self)
    }
}

macro_rules! impl_into_zakat_decimal_int {
    ($($t:ty),*) => {
        $(
            impl IntoZakatDecimal for $t {
                fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
                    Ok(Decimal::from(self))
                }
            }
        )*
    };
}

impl_into_zakat_decimal_int!(i32, u32, i64, u64, isize, usize);

macro_rules! impl_into_zakat_decimal_float {
    ($($t:ty),*) => {
        $(
            impl IntoZakatDecimal for $t {
                fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
                    // Going through the shortest display form keeps 0.1 as 0.1
                    // instead of the exact binary expansion.
                    Decimal::from_str(&self.to_string())
                        .map_err(|_| ZakatError::invalid_input("number", format!("Invalid float value: {}", self)))
                }
            }
        )*
    };
}

impl_into_zakat_decimal_float!(f32, f64);

impl IntoZakatDecimal for &str {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        Decimal::from_str(self.trim())
            .map_err(|e| ZakatError::invalid_input("number", format!("Invalid string format '{}': {}", self, e)))
    }
}

impl IntoZakatDecimal for String {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        self.as_str().into_zakat_decimal()
    }
}

/// Converts and checks that the value is not negative, naming `field` in the error.
pub(crate) fn non_negative(field: &str, value: impl IntoZakatDecimal) -> Result<Decimal, ZakatError> {
    let value = value.into_zakat_decimal().map_err(|e| match e {
        ZakatError::InvalidInput { reason, .. } => ZakatError::invalid_input(field, reason),
        other => other,
    })?;
    if value < Decimal::ZERO {
        return Err(ZakatError::invalid_input(field, "must be non-negative"));
    }
    Ok(value)
}
