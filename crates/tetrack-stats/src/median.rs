use crate::EmptySampleError;

/// Median of unsorted values.
///
/// For an even number of values the two middle values are averaged.
///
/// # Errors
///
/// Returns [`EmptySampleError`] if `values` is empty.
pub fn median<I>(values: I) -> Result<f32, EmptySampleError>
where
    I: IntoIterator<Item = f32>,
{
    let mut values = values.into_iter().collect::<Vec<_>>();
    values.sort_by(f32::total_cmp);
    median_sorted(&values)
}

/// Median of values already sorted in ascending order.
///
/// # Errors
///
/// Returns [`EmptySampleError`] if `sorted_values` is empty.
pub fn median_sorted(sorted_values: &[f32]) -> Result<f32, EmptySampleError> {
    debug_assert!(
        sorted_values.is_sorted_by(|a, b| a <= b),
        "values must be sorted in ascending order"
    );
    let len = sorted_values.len();
    if len == 0 {
        return Err(EmptySampleError);
    }
    let mid = len / 2;
    if len % 2 == 0 {
        Ok(f32::midpoint(sorted_values[mid - 1], sorted_values[mid]))
    } else {
        Ok(sorted_values[mid])
    }
}

/// Median direction of angles given in degrees, in `[0, 360)`.
///
/// Each angle is mapped to the unit circle; the result is the angle of the point
/// made of the median cosine and the median sine.
///
/// # Errors
///
/// Returns [`EmptySampleError`] if `degrees` is empty.
pub fn circular_median_degrees<I>(degrees: I) -> Result<f32, EmptySampleError>
where
    I: IntoIterator<Item = f32>,
{
    let (cos, sin): (Vec<f32>, Vec<f32>) = degrees
        .into_iter()
        .map(|deg| {
            let rad = deg.to_radians();
            (rad.cos(), rad.sin())
        })
        .unzip();
    let cos = median(cos)?;
    let sin = median(sin)?;
    Ok(sin.atan2(cos).to_degrees().rem_euclid(360.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median([5.0, 1.0, 3.0]), Ok(3.0));
        assert_eq!(median([4.0, 1.0, 3.0, 2.0]), Ok(2.5));
        assert_eq!(median([7.0]), Ok(7.0));
    }

    #[test]
    fn test_median_empty_is_error() {
        assert_eq!(median([]), Err(EmptySampleError));
        assert_eq!(circular_median_degrees([]), Err(EmptySampleError));
    }

    #[test]
    fn test_circular_median_wraps_around_zero() {
        let hue = circular_median_degrees([340.0, 350.0, 10.0, 20.0, 0.0]).unwrap();
        assert!(hue < 1e-3 || hue > 360.0 - 1e-3, "hue {hue}");
    }

    #[test]
    fn test_circular_median_of_equal_angles() {
        let hue = circular_median_degrees([217.0; 6]).unwrap();
        assert!((hue - 217.0).abs() < 1e-3, "hue {hue}");
        assert!((0.0..360.0).contains(&hue));
    }
}
