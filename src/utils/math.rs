use crate::errors::{AppError, AppResult};

/// Mean of the last `window_size` values, or of all of them when fewer exist.
pub fn moving_average(window_size: usize, history: &[f64]) -> AppResult<f64> {
    if history.is_empty() {
        return Err(AppError::InvalidArgument(
            "moving average requested over an empty history".into(),
        ));
    }
    if window_size == 0 {
        return Err(AppError::InvalidArgument("window size must be positive".into()));
    }
    let start = history.len().saturating_sub(window_size);
    let window = &history[start..];
    Ok(window.iter().sum::<f64>() / window.len() as f64)
}

/// Shortest representation that round-trips, always with a decimal point.
pub fn format_average(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_window_uses_most_recent_values() {
        let avg = moving_average(2, &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((avg - 4.5).abs() < 1e-12);
    }

    #[test]
    fn window_equal_to_history_uses_everything() {
        let avg = moving_average(3, &[3.0, 2.0, 1.0]).unwrap();
        assert!((avg - 2.0).abs() < 1e-12);
    }

    #[test]
    fn window_shrinks_to_available_history() {
        let avg = moving_average(2, &[1.0]).unwrap();
        assert!((avg - 1.0).abs() < 1e-12);
        let avg = moving_average(20, &[1.0, 2.0, 6.0]).unwrap();
        assert!((avg - 3.0).abs() < 1e-12);
    }

    #[test]
    fn incremental_sequence() {
        let mut history = Vec::new();
        let mut out = Vec::new();
        for price in [1.0, 2.0, 3.0, 4.0, 5.0] {
            history.push(price);
            out.push(moving_average(2, &history).unwrap());
        }
        assert_eq!(out, vec![1.0, 1.5, 2.5, 3.5, 4.5]);
    }

    #[test]
    fn empty_history_is_an_invalid_argument() {
        assert!(matches!(
            moving_average(3, &[]),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn non_finite_prices_pass_through() {
        let avg = moving_average(2, &[1.0, f64::NAN]).unwrap();
        assert!(avg.is_nan());
    }

    #[test]
    fn averages_render_like_floats() {
        assert_eq!(format_average(1.0), "1.0");
        assert_eq!(format_average(4.5), "4.5");
        assert_eq!(format_average(0.002), "0.002");
    }
}
