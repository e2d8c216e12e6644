//! Lookup tables mapping raw simulator column names to short canonical names
//!
//! OOMMF names are module-qualified (`TimeDriver::Simulationtime`) and must
//! resolve; mumax3 names are plain and pass through when unknown.

use crate::format::Format;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical name of the simulation time column
pub const TIME_COLUMN: &str = "t";

/// OOMMF raw names (braces and spaces removed) to canonical names
const ODT_NAMES: &[(&str, &str)] = &[
    ("RungeKuttaEvolve:evolver:Totalenergy", "E"),
    ("RungeKuttaEvolve:evolver:Energycalccount", "Ecount"),
    ("RungeKuttaEvolve:evolver:Maxdm/dt", "max_dm/dt"),
    ("RungeKuttaEvolve:evolver:dE/dt", "dE/dt"),
    ("RungeKuttaEvolve:evolver:DeltaE", "deltaE"),
    ("RungeKuttaEvolve::Totalenergy", "E"),
    ("RungeKuttaEvolve::Energycalccount", "Ecount"),
    ("RungeKuttaEvolve::Maxdm/dt", "max_dm/dt"),
    ("RungeKuttaEvolve::dE/dt", "dE/dt"),
    ("RungeKuttaEvolve::DeltaE", "deltaE"),
    ("EulerEvolve:evolver:Totalenergy", "E"),
    ("EulerEvolve:evolver:Energycalccount", "Ecount"),
    ("EulerEvolve:evolver:Maxdm/dt", "max_dm/dt"),
    ("EulerEvolve:evolver:dE/dt", "dE/dt"),
    ("EulerEvolve:evolver:DeltaE", "deltaE"),
    ("SpinTEvolve::Totalenergy", "E"),
    ("SpinTEvolve::Energycalccount", "Ecount"),
    ("SpinTEvolve::Maxdm/dt", "max_dm/dt"),
    ("SpinTEvolve::dE/dt", "dE/dt"),
    ("SpinTEvolve::DeltaE", "deltaE"),
    ("SpinTEvolve::averageu", "average_u"),
    ("SpinTEvolve:evolver:Totalenergy", "E"),
    ("SpinTEvolve:evolver:Energycalccount", "Ecount"),
    ("SpinTEvolve:evolver:Maxdm/dt", "max_dm/dt"),
    ("SpinTEvolve:evolver:dE/dt", "dE/dt"),
    ("SpinTEvolve:evolver:DeltaE", "deltaE"),
    ("SpinTEvolve:evolver:averageu", "average_u"),
    ("SpinXferEvolve:evolver:Totalenergy", "E"),
    ("SpinXferEvolve:evolver:Energycalccount", "Ecount"),
    ("SpinXferEvolve:evolver:Maxdm/dt", "max_dm/dt"),
    ("SpinXferEvolve:evolver:dE/dt", "dE/dt"),
    ("SpinXferEvolve:evolver:DeltaE", "deltaE"),
    ("SpinXferEvolve:evolver:averageu", "average_u"),
    ("SpinXferEvolve:evolver:averageJ", "average_J"),
    ("ThetaEvolve:evolver:Totalenergy", "E"),
    ("ThetaEvolve:evolver:Energycalccount", "Ecount"),
    ("ThetaEvolve:evolver:Maxdm/dt", "max_dm/dt"),
    ("ThetaEvolve:evolver:dE/dt", "dE/dt"),
    ("ThetaEvolve:evolver:DeltaE", "deltaE"),
    ("ThetaEvolve:evolver:Temperature", "T"),
    ("ThermHeunEvolve:evolver:Totalenergy", "E"),
    ("ThermHeunEvolve:evolver:Energycalccount", "Ecount"),
    ("ThermHeunEvolve:evolver:Maxdm/dt", "max_dm/dt"),
    ("ThermHeunEvolve:evolver:dE/dt", "dE/dt"),
    ("ThermHeunEvolve:evolver:DeltaE", "deltaE"),
    ("ThermHeunEvolve:evolver:Temperature", "T"),
    ("ThermSpinXferEvolve:evolver:Totalenergy", "E"),
    ("ThermSpinXferEvolve:evolver:Energycalccount", "Ecount"),
    ("ThermSpinXferEvolve:evolver:Maxdm/dt", "max_dm/dt"),
    ("ThermSpinXferEvolve:evolver:dE/dt", "dE/dt"),
    ("ThermSpinXferEvolve:evolver:DeltaE", "deltaE"),
    ("ThermSpinXferEvolve:evolver:Temperature", "T"),
    ("CGEvolve::MaxmxHxm", "max_mxHxm"),
    ("CGEvolve::Totalenergy", "E"),
    ("CGEvolve::DeltaE", "delta_E"),
    ("CGEvolve::Bracketcount", "bracket_count"),
    ("CGEvolve::Linemincount", "line_min_count"),
    ("CGEvolve::Conjugatecyclecount", "conjugate_cycle_count"),
    ("CGEvolve::Cyclecount", "cycle_count"),
    ("CGEvolve::Cyclesubcount", "cycle_sub_count"),
    ("CGEvolve::Energycalccount", "energy_cal_count"),
    ("CGEvolve:evolver:MaxmxHxm", "max_mxHxm"),
    ("CGEvolve:evolver:Totalenergy", "E"),
    ("CGEvolve:evolver:DeltaE", "delta_E"),
    ("CGEvolve:evolver:Bracketcount", "bracket_count"),
    ("CGEvolve:evolver:Linemincount", "line_min_count"),
    ("CGEvolve:evolver:Conjugatecyclecount", "conjugate_cycle_count"),
    ("CGEvolve:evolver:Cyclecount", "cycle_count"),
    ("CGEvolve:evolver:Cyclesubcount", "cycle_sub_count"),
    ("CGEvolve:evolver:Energycalccount", "energy_cal_count"),
    ("TimeDriver::Iteration", "iteration"),
    ("TimeDriver::Stageiteration", "stage_iteration"),
    ("TimeDriver::Stage", "stage"),
    ("TimeDriver::mx", "mx"),
    ("TimeDriver::my", "my"),
    ("TimeDriver::mz", "mz"),
    ("TimeDriver::Lasttimestep", "last_time_step"),
    ("TimeDriver::Simulationtime", TIME_COLUMN),
    ("MinDriver::Iteration", "iteration"),
    ("MinDriver::Stageiteration", "stage_iteration"),
    ("MinDriver::Stage", "stage"),
    ("MinDriver::mx", "mx"),
    ("MinDriver::my", "my"),
    ("MinDriver::mz", "mz"),
    ("UniformExchange::Energy", "E_Exchange"),
    ("UniformExchange::MaxSpinAng", "max_spin_angle"),
    ("UniformExchange::StageMaxSpinAng", "stage_max_spin_angle"),
    ("UniformExchange::RunMaxSpinAng", "run_max_spin_angle"),
    ("Exchange6Ngbr::Energy", "E_Exchange6Ngbr"),
    ("Exchange6Ngbr::MaxSpinAng", "max_spin_angle"),
    ("Exchange6Ngbr::StageMaxSpinAng", "stage_max_spin_angle"),
    ("Exchange6Ngbr::RunMaxSpinAng", "run_max_spin_angle"),
    ("ExchangePtwise::Energy", "E_ExchangePtwise"),
    ("ExchangePtwise::MaxSpinAng", "max_spin_angle"),
    ("ExchangePtwise::StageMaxSpinAng", "stage_max_spin_angle"),
    ("ExchangePtwise::RunMaxSpinAng", "run_max_spin_angle"),
    ("TwoSurfaceExchange::Energy", "E_TwoSurfaceExchange"),
    ("Demag::Energy", "E_Demag"),
    ("FixedZeeman::Energy", "E_Zeeman"),
    ("UZeeman::Energy", "E_UZeeman"),
    ("UZeeman::B", "B"),
    ("UZeeman::Bx", "Bx"),
    ("UZeeman::By", "By"),
    ("UZeeman::Bz", "Bz"),
    ("ScriptUZeeman::Energy", "E_ScriptUZeeman"),
    ("ScriptUZeeman::B", "B"),
    ("ScriptUZeeman::Bx", "Bx"),
    ("ScriptUZeeman::By", "By"),
    ("ScriptUZeeman::Bz", "Bz"),
    ("TransformZeeman::Energy", "E_TransformZeeman"),
    ("DMExchange6Ngbr::Energy", "E_DMI"),
    ("BulkDMI::Energy", "E_BulkDMI"),
    ("DMI_T::Energy", "E_DMI_T"),
    ("DMI_Cnv::Energy", "E_DMI_Cnv"),
    ("DMI_D2d::Energy", "E_DMI_D2d"),
    ("CubicAnisotropy::Energy", "E_CubicAnisotropy"),
    ("UniaxialAnisotropy::Energy", "E_UniaxialAnisotropy"),
    ("UniaxialAnisotropy4::Energy", "E_UniaxialAnisotropy4"),
    ("FixedMEL::Energy", "E_MEL"),
    ("FixedMEL:magnetoelastic:Energy", "E_MEL"),
];

/// mumax3 raw names to canonical names
const MUMAX_NAMES: &[(&str, &str)] = &[
    ("t", TIME_COLUMN),
    ("mx", "mx"),
    ("my", "my"),
    ("mz", "mz"),
    ("E_total", "E"),
    ("E_exch", "E_totalexchange"),
    ("E_demag", "E_demag"),
    ("E_Zeeman", "E_zeeman"),
    ("E_anis", "E_totalanisotropy"),
    ("dt", "dt"),
    ("maxTorque", "maxtorque"),
];

static ODT_LOOKUP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ODT_NAMES.iter().copied().collect());

static MUMAX_LOOKUP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| MUMAX_NAMES.iter().copied().collect());

/// Resolve an OOMMF column name. Returns `None` when the name is unknown.
///
/// A name `Module:instance:Field` absent from the table resolves through
/// `Module::Field`, with `_instance` appended to the canonical name unless
/// it already ends with it:
/// - "UniformExchange:exchange:Energy" -> "E_Exchange_exchange"
/// - "Demag:demag:Energy" -> "E_Demag_demag"
pub fn odt_name(raw: &str) -> Option<Cow<'static, str>> {
    if let Some(name) = ODT_LOOKUP.get(raw) {
        return Some(Cow::Borrowed(*name));
    }

    let parts: Vec<&str> = raw.split(':').collect();
    let [module, instance, field] = parts.as_slice() else {
        return None;
    };
    if module.is_empty() || instance.is_empty() || field.is_empty() {
        return None;
    }

    let base = ODT_LOOKUP.get(format!("{}::{}", module, field).as_str())?;
    if base.ends_with(*instance) {
        Some(Cow::Borrowed(*base))
    } else {
        Some(Cow::Owned(format!("{}_{}", base, instance)))
    }
}

/// Resolve a mumax3 column name, passing unknown names through unchanged.
pub fn mumax_name(raw: &str) -> &str {
    MUMAX_LOOKUP.get(raw).copied().unwrap_or(raw)
}

/// Resolve a raw name for the given format.
///
/// Only odt lookups can fail; mumax lookups always succeed.
pub fn rename_column(format: Format, raw: &str) -> Option<String> {
    match format {
        Format::Odt => odt_name(raw).map(Cow::into_owned),
        Format::Mumax => Some(mumax_name(raw).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odt_exact_lookup() {
        assert_eq!(odt_name("TimeDriver::Simulationtime").as_deref(), Some("t"));
        assert_eq!(odt_name("RungeKuttaEvolve:evolver:Totalenergy").as_deref(), Some("E"));
        assert_eq!(odt_name("MinDriver::mx").as_deref(), Some("mx"));
        assert_eq!(odt_name("Demag::Energy").as_deref(), Some("E_Demag"));
    }

    #[test]
    fn test_odt_instance_lookup() {
        assert_eq!(
            odt_name("UniformExchange:exchange:Energy").as_deref(),
            Some("E_Exchange_exchange")
        );
        assert_eq!(odt_name("UZeeman:zeeman:Bx").as_deref(), Some("Bx_zeeman"));
        // canonical name already carries the instance
        assert_eq!(odt_name("Demag:Demag:Energy").as_deref(), Some("E_Demag"));
    }

    #[test]
    fn test_odt_unknown() {
        assert!(odt_name("Mystery::Energy").is_none());
        assert!(odt_name("Mystery:x:Energy").is_none());
        assert!(odt_name("Demag::").is_none());
        assert!(odt_name("").is_none());
        assert!(rename_column(Format::Odt, "Mystery::Energy").is_none());
    }

    #[test]
    fn test_mumax_lookup_is_lenient() {
        assert_eq!(mumax_name("E_total"), "E");
        assert_eq!(mumax_name("maxTorque"), "maxtorque");
        assert_eq!(mumax_name("B_extx"), "B_extx");
        assert_eq!(rename_column(Format::Mumax, "m.region1x"), Some("m.region1x".to_string()));
    }

    #[test]
    fn test_mumax_rename_is_idempotent() {
        for (raw, _) in MUMAX_NAMES {
            let once = mumax_name(raw);
            assert_eq!(mumax_name(once), once);
        }
    }

    #[test]
    fn test_canonical_odt_names_have_no_separator() {
        for (raw, canonical) in ODT_NAMES {
            assert!(raw.contains(':'));
            assert!(!canonical.contains(':'));
        }
    }
}
