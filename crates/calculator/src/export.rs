//! Flat CSV renderings of the result tables.
//!
//! All writers take any `io::Write` so the CLI can target a file or stdout and
//! tests can target a `Vec<u8>`. Amounts are written with two decimals and no
//! grouping, which keeps the files spreadsheet-friendly in every locale.

use crate::error::CalcError;
use crate::format::to_fixed;
use crate::report::CalculationResult;
use crate::verification::{cost_rows, verification_rows};
use core_types::ScenarioConfig;
use std::io;

/// `Item,EUR,MDL/RON`, one record per verification step.
pub fn verification_csv<W: io::Write>(
    writer: W,
    config: &ScenarioConfig,
    result: &CalculationResult,
) -> Result<(), CalcError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Item", "EUR", "MDL/RON"])?;
    for row in verification_rows(config, result) {
        wtr.write_record([row.label.to_string(), to_fixed(row.eur, 2), row.local_label()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// `Description,Details,EUR`, one record per fee or tax.
pub fn costs_csv<W: io::Write>(
    writer: W,
    config: &ScenarioConfig,
    result: &CalculationResult,
) -> Result<(), CalcError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Description", "Details", "EUR"])?;
    for row in cost_rows(config, result) {
        wtr.write_record([row.description.to_string(), row.details, to_fixed(row.eur, 2)])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Headline figures with their MDL and RON equivalents at the scenario rates.
pub fn summary_csv<W: io::Write>(writer: W, result: &CalculationResult) -> Result<(), CalcError> {
    if let Some(message) = &result.error {
        return Err(CalcError::Export(format!("cannot export a failed calculation: {message}")));
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Item", "EUR", "MDL", "RON"])?;
    let headline = [
        ("Required Sale Price", result.sale_price),
        ("Agent Fee", result.agent_fee),
        ("Income Tax", result.tax),
        ("Lost Rental", result.lost_rental),
        ("Conversion Fee", result.conv_cost),
        ("Net After Conversion", result.net),
        ("Notary Tax", result.notary_tax),
        ("Target With Notary", result.target_with_notary),
    ];
    for (label, eur) in headline {
        wtr.write_record([
            label.to_string(),
            to_fixed(eur, 2),
            to_fixed(eur * result.eur_to_mdl, 2),
            to_fixed(eur * result.eur_to_ron, 2),
        ])?;
    }
    wtr.write_record([
        "Cover %".to_string(),
        to_fixed(result.cover_pct, 2),
        String::new(),
        String::new(),
    ])?;
    wtr.write_record([
        "Return on Investment %".to_string(),
        to_fixed(result.inv_return_pct, 2),
        String::new(),
        String::new(),
    ])?;
    wtr.flush()?;
    Ok(())
}
