//! Plasma inhibitor concentration under once-daily oral dosing.
//!
//! One-compartment model with first-order absorption (ka) and elimination
//! (ke). A single dose gives
//!
//!   C(t) = γ · (e^(-ke·t) - e^(-ka·t)),   γ = F·D·ka / (V·(ka - ke))
//!
//! and repeated daily doses superpose. Before the switch day the finite
//! sum over elapsed doses is used; from the switch day onward the infinite
//! (steady-state) sum replaces it.
//!
//! References:
//! - Gibaldi M, Perrier D. Pharmacokinetics. 2nd ed. Marcel Dekker, 1982 (Bateman function, multiple dosing)
//! - Rowland M, Tozer TN. Clinical Pharmacokinetics. 4th ed. Chapter 11

mod driver;

pub use driver::{ConcentrationDriver, PharmacokineticProfile, HOURS_PER_DAY, SECONDS_PER_DAY};
