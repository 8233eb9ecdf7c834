use num::Float;

pub fn mean<T: Float>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let sum = values.iter().fold(T::zero(), |acc, &v| acc + v);
    Some(sum / T::from(values.len())?)
}

/// Sample variance (n - 1 denominator).
pub fn variance<T: Float>(values: &[T]) -> Option<T> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss = values.iter().fold(T::zero(), |acc, &v| acc + (v - m) * (v - m));
    Some(ss / T::from(values.len() - 1)?)
}

pub fn pearson<T: Float>(xs: &[T], ys: &[T]) -> Option<T> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let (mut sxy, mut sxx, mut syy) = (T::zero(), T::zero(), T::zero());
    for (&x, &y) in xs.iter().zip(ys) {
        sxy = sxy + (x - mx) * (y - my);
        sxx = sxx + (x - mx) * (x - mx);
        syy = syy + (y - my) * (y - my);
    }
    let denom = (sxx * syy).sqrt();
    if denom == T::zero() {
        return None;
    }
    Some(sxy / denom)
}

pub fn mean_squared_error<T: Float>(actual: &[T], predicted: &[T]) -> Option<T> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return None;
    }
    let errors: Vec<T> = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| (a - p) * (a - p))
        .collect();
    mean(&errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_moments() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&xs), Some(5.0));
        assert!((variance(&xs).unwrap() - 32.0 / 7.0).abs() < 1e-12);
        assert_eq!(variance(&[1.0f64]), None);
        assert_eq!(mean::<f64>(&[]), None);
    }

    #[test]
    fn correlation_of_linear_series_is_one() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [3.0, 5.0, 7.0, 9.0];
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);
        let flat = [1.0, 1.0, 1.0, 1.0];
        assert_eq!(pearson(&xs, &flat), None);
    }

    #[test]
    fn mse_of_perfect_prediction_is_zero() {
        let ys = [1.5f32, 2.5, 3.5];
        assert_eq!(mean_squared_error(&ys, &ys), Some(0.0));
        assert_eq!(mean_squared_error(&ys, &ys[..2]), None);
    }
}
