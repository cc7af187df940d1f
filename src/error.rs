//! Configuration errors raised before any integration step is taken.
//!
//! Numerical divergence during a run is not an error; it is reported as
//! [`crate::simulation::RunOutcome::Truncated`].

/// Invalid input data for a run.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Michaelis constant of a mutant is zero, negative or not finite.
    #[error("mutant {mutant}: Michaelis constant must be > 0, got {km_uM} uM")]
    NonPositiveMichaelisConstant {
        /// Mutant name
        mutant: String,
        /// Offending value (uM)
        km_uM: f64,
    },
    /// IC50 of a mutant/drug pair is zero, negative or not finite.
    #[error("mutant {mutant} / drug {drug}: IC50 must be > 0, got {ic50_nM} nM")]
    NonPositiveIc50 {
        /// Mutant name
        mutant: String,
        /// Drug name
        drug: String,
        /// Offending value (nM)
        ic50_nM: f64,
    },
    /// A quantity derived from the input and later used as a divisor is not positive.
    #[error("derived denominator {name} must be > 0, got {value}")]
    NonPositiveDenominator {
        /// Name of the derived quantity
        name: &'static str,
        /// Offending value
        value: f64,
    },
    /// A raw parameter that must be positive (or non-negative) is out of range.
    #[error("parameter {name} is out of range: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },
    /// Absorption and elimination rate coincide, the oral dosing closed form is undefined.
    #[error("drug {drug}: absorption rate equals elimination rate ({rate_per_hour} /h)")]
    DegenerateAbsorption {
        /// Drug name
        drug: String,
        /// Shared rate (/h)
        rate_per_hour: f64,
    },
    /// Requested drug is not in the parameter table.
    #[error("unknown drug {0:?}")]
    UnknownDrug(String),
    /// Requested mutant is not in the parameter table.
    #[error("unknown mutant {0:?}")]
    UnknownMutant(String),
    /// Free-energy bound name is not nominal, lower or upper.
    #[error("unknown free-energy bound {0:?}, expected nominal, lower or upper")]
    UnknownBound(String),
    /// Mutant record lacks IC50/off-rate data for the drug.
    #[error("mutant {mutant} has no binding data for drug {drug}")]
    MissingBinding {
        /// Mutant name
        mutant: String,
        /// Drug name
        drug: String,
    },
}

/// Library result type
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Reject non-finite or non-positive values.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

/// Reject non-finite or negative values.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("x", 2.0), Ok(2.0));
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", f64::NAN).is_err());
    }

    #[test]
    fn test_require_non_negative() {
        assert_eq!(require_non_negative("x", 0.0), Ok(0.0));
        assert!(require_non_negative("x", -1e-12).is_err());
        assert!(require_non_negative("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages_name_the_input() {
        let err = ConfigError::NonPositiveIc50 {
            mutant: "T315I".to_string(),
            drug: "Imatinib".to_string(),
            ic50_nM: 0.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("T315I") && msg.contains("Imatinib"), "got {}", msg);
    }
}
