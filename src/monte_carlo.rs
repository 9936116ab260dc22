use std::f64::consts::{FRAC_PI_2, PI};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp1, Normal};
use statrs::statistics::Statistics;

use crate::backtester::compound_equity;
use crate::config::SimulationSettings;
use crate::models::{EngineError, MonteCarloReport};

/// Generates N synthetic equity paths under a Gaussian and a Levy
/// alpha-stable return model, both parameterized from the realized
/// return series (mu = mean, sigma = population standard deviation,
/// matching the original simulator's convention). Each path compounds
/// identically to the backtest equity formula. Extreme heavy-tail
/// draws are not filtered; only the -100 equity floor bounds a path.
pub fn simulate(
    returns: &[f64],
    realized_equity: &[f64],
    settings: &SimulationSettings,
) -> Result<MonteCarloReport, EngineError> {
    let mu = returns.iter().mean();
    let sigma = returns.iter().population_std_dev();
    let steps = returns.len();

    let normal = Normal::new(mu, sigma)
        .map_err(|e| EngineError::Computation(format!("invalid Normal({mu}, {sigma}): {e}")))?;

    // One RNG stream per model so a path's draws do not depend on the
    // simulation count of the other model, and path i keeps its values
    // when the count grows.
    let mut normal_rng = seeded_rng(settings.seed, 0);
    let mut stable_rng = seeded_rng(settings.seed, 1);

    let normal_paths: Vec<Vec<f64>> = (0..settings.count)
        .map(|_| {
            let draws: Vec<f64> = (0..steps).map(|_| normal.sample(&mut normal_rng)).collect();
            compound_equity(&draws)
        })
        .collect();

    let stable_paths: Vec<Vec<f64>> = (0..settings.count)
        .map(|_| {
            let draws: Vec<f64> = (0..steps)
                .map(|_| sample_stable(&mut stable_rng, settings.alpha, settings.beta, mu, sigma))
                .collect();
            compound_equity(&draws)
        })
        .collect();

    Ok(MonteCarloReport {
        normal_paths,
        stable_paths,
        realized_equity: realized_equity.to_vec(),
    })
}

fn seeded_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}

/// One draw from the Levy alpha-stable distribution S(alpha, beta)
/// with the given location and scale, via the Chambers-Mallows-Stuck
/// transform in the S1 parameterization (the one SciPy's
/// `levy_stable.rvs` uses).
pub fn sample_stable<R: Rng + ?Sized>(
    rng: &mut R,
    alpha: f64,
    beta: f64,
    location: f64,
    scale: f64,
) -> f64 {
    if scale == 0.0 {
        return location;
    }

    let u: f64 = rng.gen_range(-FRAC_PI_2..FRAC_PI_2);
    let w: f64 = Exp1.sample(rng);

    if (alpha - 1.0).abs() < 1e-12 {
        let t = FRAC_PI_2 + beta * u;
        let x = (2.0 / PI) * (t * u.tan() - beta * ((FRAC_PI_2 * w * u.cos()) / t).ln());
        // The alpha = 1 scale family carries an extra drift term.
        scale * x + location + (2.0 / PI) * beta * scale * scale.ln()
    } else {
        let zeta = beta * (FRAC_PI_2 * alpha).tan();
        let b = zeta.atan() / alpha;
        let s = (1.0 + zeta * zeta).powf(1.0 / (2.0 * alpha));
        let x = s * (alpha * (u + b)).sin() / u.cos().powf(1.0 / alpha)
            * ((u - alpha * (u + b)).cos() / w).powf((1.0 - alpha) / alpha);
        scale * x + location
    }
}
