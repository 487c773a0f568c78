//! Shared least-squares polynomial fitting used by the baseline and
//! smoothing stages.

/// Fit `ys` over `xs` with a polynomial of the given degree and evaluate
/// the fit at `eval_xs`.
///
/// The abscissa is rescaled to [-1, 1] before the normal equations are
/// built, which keeps fits over long pixel axes well conditioned. Returns
/// `None` when the system is numerically singular. Callers must ensure
/// `degree < xs.len()`.
pub fn fit_eval(xs: &[f64], ys: &[f64], degree: usize, eval_xs: &[f64]) -> Option<Vec<f64>> {
    debug_assert_eq!(xs.len(), ys.len());
    debug_assert!(degree < xs.len());

    let min = xs.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let scale = |x: f64| {
        if span == 0.0 {
            0.0
        } else {
            2.0 * (x - min) / span - 1.0
        }
    };

    let terms = degree + 1;

    // Normal equations (VᵀV) a = Vᵀy with V[i][j] = t_i^j. VᵀV only needs
    // the power sums Σ t^k for k = 0 .. 2·degree.
    let mut moments = vec![0.0f64; 2 * degree + 1];
    let mut rhs = vec![0.0f64; terms];
    for (&x, &y) in xs.iter().zip(ys) {
        let t = scale(x);
        let mut power = 1.0;
        for (k, moment) in moments.iter_mut().enumerate() {
            *moment += power;
            if k < terms {
                rhs[k] += power * y;
            }
            power *= t;
        }
    }
    let mut matrix = vec![vec![0.0f64; terms]; terms];
    for j in 0..terms {
        for k in 0..terms {
            matrix[j][k] = moments[j + k];
        }
    }

    let coeffs = solve(matrix, rhs)?;
    Some(eval_xs.iter().map(|&x| horner(&coeffs, scale(x))).collect())
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0f64; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in (row + 1)..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }
    Some(x)
}

/// Evaluate ascending-order coefficients at `t` (Horner form).
fn horner(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
}
