//! Knot vector utilities for NURBS evaluation and control-net growth.

/// Find the knot span index for parameter `t`.
///
/// Returns `i` such that `knots[i] <= t < knots[i+1]`, clamping queries at
/// or beyond the upper domain bound into the last valid span.
///
/// # Arguments
/// * `degree` - Degree of the basis
/// * `knots` - The knot vector
/// * `n` - Number of control points minus 1
/// * `t` - Parameter value
pub fn find_span(degree: usize, knots: &[f64], n: usize, t: f64) -> usize {
    if t >= knots[n + 1] {
        return n;
    }
    if t <= knots[degree] {
        return degree;
    }

    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;

    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }

    mid
}

/// Compute the `degree + 1` non-vanishing basis function values at `t`
/// via the Cox-de Boor triangular recurrence.
pub fn basis_functions(degree: usize, knots: &[f64], span: usize, t: f64) -> Vec<f64> {
    let mut n = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];

    n[0] = 1.0;

    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;

        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }

        n[j] = saved;
    }

    n
}

/// Open uniform clamped knot vector on [0, 1] for `n_ctrl` control points.
///
/// `degree + 1` repeated knots at each end, interior knots evenly spaced.
pub fn open_uniform_knots(degree: usize, n_ctrl: usize) -> Vec<f64> {
    debug_assert!(n_ctrl > degree, "need at least degree+1 control points");
    let m = n_ctrl + degree + 1;
    let mut knots = vec![0.0; m];

    for i in 0..=degree {
        knots[m - 1 - i] = 1.0;
    }

    let n_interior = n_ctrl - degree - 1;
    for i in 1..=n_interior {
        knots[degree + i] = i as f64 / (n_interior + 1) as f64;
    }

    knots
}

/// Averaged knot vector for global interpolation.
///
/// Interior knot `j + degree` is the mean of `degree` consecutive parameter
/// values starting at `params[j]`; both ends carry `degree + 1` repeats of
/// 0 and 1 (the parameter vector is assumed normalized to [0, 1]).
pub fn averaged_knots(params: &[f64], degree: usize) -> Vec<f64> {
    let n = params.len();
    debug_assert!(n > degree);
    let mut knots = vec![0.0; n + degree + 1];

    for i in 0..=degree {
        knots[n + i] = 1.0;
    }
    for j in 1..n - degree {
        knots[j + degree] = params[j..j + degree].iter().sum::<f64>() / degree as f64;
    }

    knots
}

/// Insert one interior knot while keeping the vector normalized to [0, 1].
///
/// Existing interior knots are rescaled toward zero and the new knot lands
/// just before the trailing clamp, so an open uniform vector stays open
/// uniform and an averaged vector keeps its interior proportions. The knot
/// vector must already be a valid clamped vector (length `n + degree + 1`
/// with `degree + 1` repeats at each end).
pub fn insert_normalized_knot(knots: &mut Vec<f64>, degree: usize) {
    let len = knots.len();
    debug_assert!(len >= 2 * (degree + 1));
    let interior = len - 2 * (degree + 1);
    let scale = (interior as f64 + 1.0) / (interior as f64 + 2.0);

    for k in &mut knots[degree + 1..len - degree - 1] {
        *k *= scale;
    }
    knots.insert(len - degree - 1, scale);
}
