//! Validation tests for occupancy kinetics and parameter resolution.
//!
//! Covers:
//! - Equilibrium seed against the Boltzmann-weighted distribution
//! - Detailed balance and steady-state substrate on-rate
//! - The effective dissociation constant for both mechanism classes
//! - Conservation of total enzyme over many steps at realistic rates
//! - The hand-computed single-step example

use kinase_resistance_sim::{
    kinetics::resolver::{AVOGADRO_PER_MOL, BOLTZMANN_KCAL_PER_K},
    ConfigError, DeltaGBound, EnzymeStateVector, KineticStateEngine, Mechanism, ParameterResolver,
    ParameterTable, RateConstants, SimulationParameters,
};

fn resolver() -> ParameterResolver {
    ParameterResolver::new(&SimulationParameters::default()).unwrap()
}

// ============================================================================
// Parameter Resolution Tests
// ============================================================================

#[test]
fn test_boltzmann_factor_at_body_temperature() {
    let resolver = resolver();
    assert!((resolver.boltzmann_factor(0.0) - 1.0).abs() < 1e-15);

    let expected = (1.0 / AVOGADRO_PER_MOL / (BOLTZMANN_KCAL_PER_K * 310.0)).exp();
    let f = resolver.boltzmann_factor(-1.0);
    assert!(
        (f - expected).abs() < 1e-12,
        "f for -1 kcal/mol should be {}, got {}",
        expected,
        f
    );
    // -1 kcal/mol favours the active conformation roughly fivefold at 310 K
    assert!(f > 4.5 && f < 5.5, "f = {}", f);
}

#[test]
fn test_equilibrium_seed_matches_boltzmann_weights() {
    let params = SimulationParameters::default();
    let resolver = resolver();
    let table = ParameterTable::default();

    for mutant in &table.mutants {
        for drug in &table.drugs {
            let resolved = resolver.resolve(mutant, drug, DeltaGBound::Nominal).unwrap();
            let f = resolved.boltzmann_factor;
            let s_over_km = params.substrate_M / (mutant.km_uM * 1e-6);
            let norm = 1.0 + f + f * s_over_km;
            let seed = resolved.initial_state;

            assert_eq!(seed.inhibited_M, 0.0);
            let total = seed.total_M();
            assert!(
                (total - params.enzyme_total_M).abs() < 1e-12 * params.enzyme_total_M.max(1.0),
                "{}/{}: seed total {}",
                mutant.name,
                drug.name,
                total
            );
            let tol = 1e-9 * params.enzyme_total_M;
            assert!((seed.inactive_unbound_M - params.enzyme_total_M / norm).abs() < tol);
            assert!((seed.active_unbound_M - params.enzyme_total_M * f / norm).abs() < tol);
            assert!(
                (seed.substrate_bound_M - params.enzyme_total_M * f * s_over_km / norm).abs() < tol
            );
        }
    }
}

#[test]
fn test_rate_relations() {
    let resolver = resolver();
    let table = ParameterTable::default();
    let (_, drug) = table.drug("Imatinib").unwrap();
    let (_, mutant) = table.mutant("E255K").unwrap();
    let resolved = resolver.resolve(mutant, drug, DeltaGBound::Nominal).unwrap();
    let r = resolved.rates;

    // Per-minute table values become per-second
    assert!((r.catalysis_per_sec - mutant.kcat_per_min / 60.0).abs() < 1e-12);
    assert!((r.substrate_off_per_sec - mutant.substrate_off_per_min / 60.0).abs() < 1e-12);

    // Detailed balance
    assert!(
        (r.inactive_to_active_per_sec - r.active_to_inactive_per_sec * resolved.boltzmann_factor)
            .abs()
            < 1e-9
    );

    // Steady-state substrate on-rate, KM in M
    let km_M = mutant.km_uM * 1e-6;
    let expected_on = (r.substrate_off_per_sec + r.catalysis_per_sec) / km_M;
    assert!((r.substrate_on_per_M_per_sec - expected_on).abs() / expected_on < 1e-12);

    // kon(I) = koff(I) / RD
    assert!(
        (r.inhibitor_on_per_M_per_sec * resolved.dissociation_constant_M
            - r.inhibitor_off_per_sec)
            .abs()
            < 1e-15
    );
}

#[test]
fn test_dissociation_constant_by_mechanism() {
    let params = SimulationParameters::default();
    let resolver = resolver();
    let table = ParameterTable::default();
    let (_, mutant) = table.mutant("T315I").unwrap();
    let one_plus = 1.0 + params.substrate_M / (mutant.km_uM * 1e-6);

    let (_, imatinib) = table.drug("Imatinib").unwrap();
    let resolved = resolver.resolve(mutant, imatinib, DeltaGBound::Nominal).unwrap();
    let f = resolved.boltzmann_factor;
    let ic50 = mutant.binding("Imatinib").unwrap().ic50_nM * 1e-9;
    let expected = ic50 / (1.0 + f * one_plus);
    assert!((resolved.dissociation_constant_M - expected).abs() / expected < 1e-12);

    let (_, dasatinib) = table.drug("Dasatinib").unwrap();
    let resolved = resolver.resolve(mutant, dasatinib, DeltaGBound::Nominal).unwrap();
    let ic50 = mutant.binding("Dasatinib").unwrap().ic50_nM * 1e-9;
    let expected = ic50 * (1.0 / f) / (1.0 + (1.0 / f) * one_plus);
    assert!((resolved.dissociation_constant_M - expected).abs() / expected < 1e-12);
    assert_eq!(resolved.mechanism, Mechanism::ActiveConformation);
}

#[test]
fn test_delta_g_bounds_bracket_nominal() {
    let resolver = resolver();
    let table = ParameterTable::default();
    let (_, drug) = table.drug("Ponatinib").unwrap();
    let (_, mutant) = table.mutant("G250E").unwrap();

    let f = |bound| resolver.resolve(mutant, drug, bound).unwrap().boltzmann_factor;
    let (lower, nominal, upper) = (
        f(DeltaGBound::Lower),
        f(DeltaGBound::Nominal),
        f(DeltaGBound::Upper),
    );
    // Lower ΔG favours the active conformation more strongly
    assert!(lower > nominal && nominal > upper, "{} {} {}", lower, nominal, upper);
}

#[test]
fn test_corrupt_data_is_a_config_error() {
    let resolver = resolver();
    let table = ParameterTable::default();
    let (_, drug) = table.drug("Imatinib").unwrap();
    let (_, mutant) = table.mutant("Wild type").unwrap();

    let mut bad_km = mutant.clone();
    bad_km.km_uM = 0.0;
    assert!(matches!(
        resolver.resolve(&bad_km, drug, DeltaGBound::Nominal),
        Err(ConfigError::NonPositiveMichaelisConstant { .. })
    ));

    let mut bad_ic50 = mutant.clone();
    bad_ic50.bindings[1].ic50_nM = -5.0;
    assert!(matches!(
        resolver.resolve(&bad_ic50, drug, DeltaGBound::Nominal),
        Err(ConfigError::NonPositiveIc50 { .. })
    ));

    let mut unbound = mutant.clone();
    unbound.bindings.retain(|b| b.drug != "Imatinib");
    assert!(matches!(
        resolver.resolve(&unbound, drug, DeltaGBound::Nominal),
        Err(ConfigError::MissingBinding { .. })
    ));
}

// ============================================================================
// Engine Tests
// ============================================================================

#[test]
fn test_worked_step_example() {
    let rates = RateConstants {
        catalysis_per_sec: 0.05,
        active_to_inactive_per_sec: 0.1,
        inactive_to_active_per_sec: 0.1,
        substrate_on_per_M_per_sec: 0.3,
        substrate_off_per_sec: 0.2,
        inhibitor_on_per_M_per_sec: 0.0,
        inhibitor_off_per_sec: 0.0,
        substrate_M: 1.0,
    };
    let third = 1.0 / 3.0;
    let seed = EnzymeStateVector {
        active_unbound_M: third,
        substrate_bound_M: third,
        inactive_unbound_M: third,
        inhibited_M: 0.0,
    };

    let mut engine = KineticStateEngine::new(seed, rates, Mechanism::InactiveConformation);
    let next = engine.step(0.01, 0.0);
    assert!(
        (next.substrate_bound_M - 0.3335).abs() < 1e-6,
        "substrate-bound should be 0.333500, got {:.6}",
        next.substrate_bound_M
    );
}

#[test]
fn test_conservation_at_realistic_rates() {
    let params = SimulationParameters::default();
    let resolver = resolver();
    let table = ParameterTable::default();

    for drug_name in ["Ponatinib", "Imatinib", "Dasatinib"] {
        let (_, drug) = table.drug(drug_name).unwrap();
        let (_, mutant) = table.mutant("T315I").unwrap();
        let resolved = resolver.resolve(mutant, drug, DeltaGBound::Nominal).unwrap();
        let mut engine =
            KineticStateEngine::new(resolved.initial_state, resolved.rates, resolved.mechanism);

        // Ten simulated seconds under a constant 1 µM inhibitor
        for _ in 0..10_000 {
            let state = engine.step(params.dt_sec, 1e-6);
            assert!(state.is_physical(), "{}: {:?}", drug_name, state);
        }
        let total = engine.state().total_M();
        assert!(
            (total - params.enzyme_total_M).abs() < 1e-9 * params.enzyme_total_M,
            "{}: total drifted to {}",
            drug_name,
            total
        );
        assert!(engine.state().inhibited_M > 0.0);
    }
}

#[test]
fn test_inhibitor_reduces_catalytic_occupancy() {
    let resolver = resolver();
    let table = ParameterTable::default();
    let (_, drug) = table.drug("Imatinib").unwrap();
    let (_, mutant) = table.mutant("Wild type").unwrap();
    let resolved = resolver.resolve(mutant, drug, DeltaGBound::Nominal).unwrap();

    let mut untreated =
        KineticStateEngine::new(resolved.initial_state, resolved.rates, resolved.mechanism);
    let mut treated =
        KineticStateEngine::new(resolved.initial_state, resolved.rates, resolved.mechanism);
    for _ in 0..60_000 {
        untreated.step(0.001, 0.0);
        treated.step(0.001, 2e-6);
    }

    // Without drug the seed is already the equilibrium
    let drift = (untreated.state().substrate_bound_M - resolved.initial_state.substrate_bound_M)
        .abs();
    assert!(drift < 1e-12, "untreated substrate-bound moved by {}", drift);
    assert!(treated.product_rate_M_per_sec() < untreated.product_rate_M_per_sec());
}
