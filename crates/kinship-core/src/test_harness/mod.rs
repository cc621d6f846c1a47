//! Test harness module
//! Seeded family tree simulator and stress runs

pub mod simulator;

pub use simulator::*;

/// Test harness for running stress tests and certification
pub struct TestHarness;

impl TestHarness {
    /// Run a stress test with the specified population cap and iterations
    pub fn run_stress_test(individuals: usize, iterations: usize) -> StressTestReport {
        tracing::info!(individuals, iterations, "running stress test");

        let config = SimulatorConfig {
            seed: 12345,
            total_operations: iterations as u64,
            max_individuals: individuals,
            ..Default::default()
        };

        let report = run_simulator(config);

        StressTestReport {
            individuals,
            iterations,
            violations: report.violations.len(),
            success: report.passed(),
        }
    }

    /// Run the simulator across several seeds
    pub fn run_certification(seeds: u64, operations_per_seed: u64) -> CertificationReport {
        tracing::info!(seeds, operations_per_seed, "running certification");

        let mut all_passed = true;
        let mut total_violations = 0;

        for seed in 0..seeds {
            let config = SimulatorConfig {
                seed,
                total_operations: operations_per_seed,
                ..Default::default()
            };

            let report = run_simulator(config);
            if !report.passed() {
                tracing::warn!(seed, violations = report.violations.len(), "seed failed");
                all_passed = false;
            }
            total_violations += report.violations.len();
        }

        CertificationReport {
            passed: all_passed && total_violations == 0,
            total_violations,
            seeds_tested: seeds,
        }
    }
}

/// Report from a stress test
#[derive(Debug, Clone)]
pub struct StressTestReport {
    /// Population each iteration starts from.
    pub individuals: usize,
    /// Random edits applied per run.
    pub iterations: usize,
    /// Invariant violations seen across all iterations.
    pub violations: usize,
    /// No violations were seen.
    pub success: bool,
}

/// Report from certification
#[derive(Debug, Clone)]
pub struct CertificationReport {
    /// Every seed ran clean.
    pub passed: bool,
    /// Violations summed over all seeds.
    pub total_violations: usize,
    /// Number of seeds run.
    pub seeds_tested: u64,
}
