pub mod config;
pub mod milestone;
pub mod share;
pub mod simulate;

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Reject negative or non-finite metric arguments.
pub fn non_negative(name: &str, value: f64) -> Result<f64, natcycle_core::ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(natcycle_core::ValidationError::NegativeMetric {
            metric: name.to_string(),
            value,
        })
    }
}
