//! Analysis Orchestrator
//!
//! Drives one benchmark from warm-up to a finished [`MeasurementRecord`]:
//!
//! 1. warm up to estimate the mean execution time
//! 2. plan `sample_size` linearly growing iteration counts
//! 3. time one routine invocation per planned count
//! 4. reject any zero reading
//! 5. fence the per-iteration averages
//! 6. bootstrap mean, standard deviation, median and MAD over the averages,
//!    and the slope over the raw `(iters, times)` pairs
//!
//! Reporters are notified at each phase boundary.

use crate::config::BenchConfig;
use rand::Rng;
use steadybench_core::{BenchError, Bencher, Routine, as_nanos, plan_iterations};
use steadybench_report::{
    BenchmarkId, Distributions, Estimates, MeasurementRecord, Measurements, OutlierCounts,
    Reporter,
};
use steadybench_stats::{Data, Estimate, Sample, Slope, StatsError, tukey};
use tracing::{debug, warn};

/// Measure and analyze one routine
///
/// The caller is responsible for serializing calls; see
/// [`ExecutionGate`](crate::ExecutionGate). `benchmark_start` is expected to
/// have been reported already.
pub fn analyze<F, R>(
    id: &BenchmarkId,
    config: &BenchConfig,
    reporter: &dyn Reporter,
    rng: &mut R,
    f: F,
) -> Result<MeasurementRecord, BenchError>
where
    F: FnMut(&mut Bencher),
    R: Rng + ?Sized,
{
    let mut routine = Routine::new(f);

    reporter.warmup(id, as_nanos(config.warm_up_time));
    let warm_up = routine.warm_up(config.warm_up_time)?;
    // Floored at the timer resolution so the plan stays finite
    let met = warm_up.mean_ns().max(1.0);
    debug!(
        benchmark = %id,
        iters = warm_up.iters,
        elapsed_ns = as_nanos(warm_up.elapsed),
        met_ns = met,
        "warm-up finished"
    );

    let plan = plan_iterations(met, config.sample_size, config.measurement_time);
    if let Some(advisory) = plan.advisory {
        warn!(
            benchmark = %id,
            requested_ns = advisory.requested_ns,
            suggested_ns = advisory.expected_ns,
            "unable to complete {} samples in {:?}; consider increasing the measurement time to {:?}",
            config.sample_size,
            config.measurement_time,
            advisory.suggested()
        );
    }

    reporter.measurement_start(
        id,
        config.sample_size,
        plan.expected_ns as u64,
        plan.total_iters(),
    );
    debug!(benchmark = %id, step = plan.step, "sampling");
    let times = routine.sample(&plan.iters)?;
    drop(routine);

    if let Some(sample) = times.iter().position(|&t| t == 0.0) {
        return Err(BenchError::DegenerateMeasurement {
            sample,
            iters: plan.iters[sample],
        });
    }

    reporter.analysis_started(id);

    let iters: Vec<f64> = plan.iters.iter().map(|&n| n as f64).collect();
    let averages: Vec<f64> = times.iter().zip(&iters).map(|(t, n)| t / n).collect();

    let sample = Sample::new(&averages)?;
    let labeled = tukey(&sample);
    let outliers = OutlierCounts::from(&labeled);
    if outliers.total() > 0 {
        warn!(
            benchmark = %id,
            low_severe = outliers.low_severe,
            low_mild = outliers.low_mild,
            high_mild = outliers.high_mild,
            high_severe = outliers.high_severe,
            "found {} outliers among {} measurements",
            outliers.total(),
            sample.len()
        );
    }

    let (statistics, distributions) = estimate(config, rng, &sample, &iters, &times)?;
    debug!(benchmark = %id, "analysis finished");

    Ok(MeasurementRecord::new(
        id,
        Measurements {
            iters,
            times,
            averages,
            tukey_fences: labeled.fences(),
            outliers,
        },
        statistics,
        distributions,
    ))
}

/// Point estimates and bootstrap distributions of every statistic
fn estimate<R>(
    config: &BenchConfig,
    rng: &mut R,
    averages: &Sample,
    iters: &[f64],
    times: &[f64],
) -> Result<(Estimates, Distributions), StatsError>
where
    R: Rng + ?Sized,
{
    let cl = config.confidence_level;
    let nresamples = config.nresamples;

    let (mean_dist, std_dev_dist, median_dist, mad_dist) =
        averages.bootstrap(nresamples, rng, |s| {
            let mean = s.mean();
            let median = s.median();
            Ok((
                mean,
                s.std_dev(Some(mean))?,
                median,
                s.median_abs_dev(Some(median)),
            ))
        })?;

    let mean = averages.mean();
    let median = averages.median();

    let (slope, r_squared, slope_dist) = if config.regression {
        let data = Data::new(iters, times)?;
        let point = Slope::fit(&data);
        let dist = data.bootstrap(nresamples, rng, |d| Ok(Slope::fit(d).0))?;
        (
            Some(Estimate::new(point.0, &dist, cl)?),
            Some(point.r_squared(&data)),
            Some(dist),
        )
    } else {
        (None, None, None)
    };

    let statistics = Estimates {
        mean: Estimate::new(mean, &mean_dist, cl)?,
        median: Estimate::new(median, &median_dist, cl)?,
        median_abs_dev: Estimate::new(averages.median_abs_dev(Some(median)), &mad_dist, cl)?,
        std_dev: Estimate::new(averages.std_dev(Some(mean))?, &std_dev_dist, cl)?,
        slope,
        r_squared,
    };
    let distributions = Distributions {
        mean: mean_dist,
        median: median_dist,
        median_abs_dev: mad_dist,
        std_dev: std_dev_dist,
        slope: slope_dist,
    };

    Ok((statistics, distributions))
}
