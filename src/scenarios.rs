//! Parallel evaluation of independent scenarios.
//!
//! Each scenario runs on its own clone of a configured assembly; calculators
//! are shared, ledgers are not. Results come back in scenario order.
use crate::assembly::Assembly;
use crate::error::EngineError;
use crate::store::Parameter;
use rayon::prelude::*;

/// A set of boundary-input overrides.
pub type Scenario = Vec<(String, f64)>;

pub fn run_scenarios(base: &Assembly, scenarios: &[Scenario]) -> Vec<Result<Vec<Parameter>, EngineError>> {
    log::info!("'{}': evaluating {} scenarios", base.name(), scenarios.len());
    scenarios
        .par_iter()
        .map(|overrides| {
            let mut asm = base.clone();
            for (name, value) in overrides {
                asm.set_input(name, *value)?;
            }
            asm.run()
        })
        .collect()
}

/// Runs `base` once per value of the boundary input `param`.
pub fn sweep(base: &Assembly, param: &str, values: &[f64]) -> Vec<Result<Vec<Parameter>, EngineError>> {
    let scenarios: Vec<Scenario> = values.iter().map(|v| vec![(param.to_string(), *v)]).collect();
    run_scenarios(base, &scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{HeatExchangerLoop, Pod};
    use rstest::rstest;

    #[test]
    fn test_parallel_matches_sequential() {
        let base = Assembly::configure(&Pod).unwrap();
        let rows: Vec<f64> = (1..=24).map(f64::from).collect();
        let parallel = sweep(&base, "n_rows", &rows);

        for (n, result) in rows.iter().zip(parallel) {
            let mut asm = base.clone();
            asm.set_input("n_rows", *n).unwrap();
            assert_eq!(result.unwrap(), asm.run().unwrap());
        }
    }

    #[test]
    fn test_base_is_untouched() {
        let base = Assembly::configure(&Pod).unwrap();
        let _ = sweep(&base, "speed_max", &[100.0, 200.0]);
        assert_eq!(base.runs(), 0);
        assert_eq!(base.input("speed_max"), Some(310.0));
    }

    #[rstest]
    #[case("T_hot_out", 250.0)]
    #[case("nope", 1.0)]
    fn test_failures_stay_per_scenario(#[case] param: &str, #[case] bad: f64) {
        let base = Assembly::configure(&HeatExchangerLoop).unwrap();
        let results = sweep(&base, param, &[bad, 360.0]);
        assert!(results[0].is_err());
        if param == "T_hot_out" {
            assert!(results[1].is_ok());
        }
    }
}
