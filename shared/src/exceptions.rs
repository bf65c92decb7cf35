//! Review-by-exception classification
//!
//! The backend already evaluated `temp_check` and `purity_check`; those
//! booleans decide *whether* an exception exists. The thresholds below only
//! grade severity and build the detail text shown to the reviewer.

use serde::{Deserialize, Serialize};

/// Target process temperature in °C
pub const TEMP_TARGET_C: f64 = 37.0;

/// Half-width of the compliant temperature window in °C
pub const TEMP_TOLERANCE_C: f64 = 0.5;

/// Deviation from target above which a temperature excursion is Critical
pub const TEMP_CRITICAL_DEVIATION_C: f64 = 1.0;

/// Minimum purity in percent
pub const PURITY_MINIMUM_PCT: f64 = 98.0;

/// Purity below which a purity failure is Critical
pub const PURITY_CRITICAL_PCT: f64 = 96.0;

/// Exception severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Major,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Major => "Major",
            Severity::Critical => "Critical",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Severity::Major => "bg-amber-100 text-amber-700",
            Severity::Critical => "bg-red-100 text-red-800",
        }
    }

    /// Highest severity in a list, `None` when empty
    pub fn worst<'a>(exceptions: impl IntoIterator<Item = &'a BatchException>) -> Option<Severity> {
        exceptions.into_iter().map(|e| e.severity).max()
    }
}

/// Kind of deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionKind {
    TemperatureExcursion,
    PurityBelowThreshold,
}

impl ExceptionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ExceptionKind::TemperatureExcursion => "Temperature Excursion",
            ExceptionKind::PurityBelowThreshold => "Purity Below Threshold",
        }
    }
}

/// The measured values and backend verdicts a classification needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub temp_actual: f64,
    pub temp_check: bool,
    pub purity_actual: f64,
    pub purity_check: bool,
}

/// A flagged deviation requiring review before release
#[derive(Debug, Clone, PartialEq)]
pub struct BatchException {
    pub kind: ExceptionKind,
    pub detail: String,
    pub severity: Severity,
}

impl BatchException {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Absolute distance from the temperature target
pub fn temperature_deviation(temp_actual: f64) -> f64 {
    (temp_actual - TEMP_TARGET_C).abs()
}

pub fn temperature_severity(temp_actual: f64) -> Severity {
    if temperature_deviation(temp_actual) > TEMP_CRITICAL_DEVIATION_C {
        Severity::Critical
    } else {
        Severity::Major
    }
}

pub fn purity_severity(purity_actual: f64) -> Severity {
    if purity_actual < PURITY_CRITICAL_PCT {
        Severity::Critical
    } else {
        Severity::Major
    }
}

/// Derive the exception list for a batch, temperature first.
pub fn classify_exceptions(m: &Measurements) -> Vec<BatchException> {
    let mut exceptions = Vec::new();

    if !m.temp_check {
        let deviation = temperature_deviation(m.temp_actual);
        exceptions.push(BatchException {
            kind: ExceptionKind::TemperatureExcursion,
            detail: format!(
                "Recorded {:.1}°C (deviation: ±{:.2}°C from {:.1}°C target). Acceptable range: {:.1}°C–{:.1}°C.",
                m.temp_actual,
                deviation,
                TEMP_TARGET_C,
                TEMP_TARGET_C - TEMP_TOLERANCE_C,
                TEMP_TARGET_C + TEMP_TOLERANCE_C,
            ),
            severity: temperature_severity(m.temp_actual),
        });
    }

    if !m.purity_check {
        exceptions.push(BatchException {
            kind: ExceptionKind::PurityBelowThreshold,
            detail: format!(
                "Measured purity: {:.1}%. Minimum required: {:.1}%.",
                m.purity_actual, PURITY_MINIMUM_PCT,
            ),
            severity: purity_severity(m.purity_actual),
        });
    }

    exceptions
}

/// Caption used next to failed temperature readings
pub fn temperature_target_caption() -> String {
    format!("target: {:.1}°C ± {:.1}°C", TEMP_TARGET_C, TEMP_TOLERANCE_C)
}

/// Caption used next to failed purity readings
pub fn purity_minimum_caption() -> String {
    format!("min: {:.1}%", PURITY_MINIMUM_PCT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements(temp: f64, temp_ok: bool, purity: f64, purity_ok: bool) -> Measurements {
        Measurements {
            temp_actual: temp,
            temp_check: temp_ok,
            purity_actual: purity,
            purity_check: purity_ok,
        }
    }

    #[test]
    fn test_critical_temperature_excursion() {
        let exceptions = classify_exceptions(&measurements(38.6, false, 99.0, true));

        assert_eq!(exceptions.len(), 1);
        assert_eq!(exceptions[0].name(), "Temperature Excursion");
        assert_eq!(exceptions[0].severity, Severity::Critical);
        assert_eq!(
            exceptions[0].detail,
            "Recorded 38.6°C (deviation: ±1.60°C from 37.0°C target). Acceptable range: 36.5°C–37.5°C."
        );
    }

    #[test]
    fn test_major_temperature_excursion_below_target() {
        let exceptions = classify_exceptions(&measurements(36.2, false, 99.0, true));
        assert_eq!(exceptions[0].severity, Severity::Major);
    }

    #[test]
    fn test_temperature_deviation_at_cutoff_is_major() {
        assert_eq!(temperature_severity(38.0), Severity::Major);
        assert_eq!(temperature_severity(35.9), Severity::Critical);
    }

    #[test]
    fn test_critical_purity_failure() {
        let exceptions = classify_exceptions(&measurements(37.0, true, 95.0, false));

        assert_eq!(exceptions.len(), 1);
        assert_eq!(exceptions[0].name(), "Purity Below Threshold");
        assert_eq!(exceptions[0].severity, Severity::Critical);
        assert_eq!(exceptions[0].detail, "Measured purity: 95.0%. Minimum required: 98.0%.");
    }

    #[test]
    fn test_purity_at_critical_limit_is_major() {
        assert_eq!(purity_severity(96.0), Severity::Major);
        assert_eq!(purity_severity(95.99), Severity::Critical);
    }

    #[test]
    fn test_trusts_backend_flags() {
        // Out-of-window reading the backend marked compliant: no exception.
        assert!(classify_exceptions(&measurements(40.0, true, 90.0, true)).is_empty());
        // In-window reading the backend marked non-compliant: still an exception.
        let exceptions = classify_exceptions(&measurements(37.1, false, 99.5, true));
        assert_eq!(exceptions.len(), 1);
        assert_eq!(exceptions[0].severity, Severity::Major);
    }

    #[test]
    fn test_both_exceptions_ordered() {
        let exceptions = classify_exceptions(&measurements(37.8, false, 97.0, false));
        let kinds: Vec<_> = exceptions.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ExceptionKind::TemperatureExcursion, ExceptionKind::PurityBelowThreshold]
        );
        assert_eq!(Severity::worst(&exceptions), Some(Severity::Major));
    }

    #[test]
    fn test_worst_severity() {
        let exceptions = classify_exceptions(&measurements(37.8, false, 94.0, false));
        assert_eq!(Severity::worst(&exceptions), Some(Severity::Critical));
        assert_eq!(Severity::worst(&Vec::new()), None);
    }
}
