//! CSV rendering of a calculator's fields

use crate::error::JsonResult;
use formulaforge_core::Calculator;
use formulaforge_formula::display_formula;
use std::io::Write;

const HEADER: [&str; 6] = ["Type", "Label", "Symbol", "Unit", "Formula", "Formula Display"];

/// Write one row per input and one per output
pub fn write_csv<W: Write>(calculator: &Calculator, writer: W) -> JsonResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(HEADER)?;

    for input in &calculator.inputs {
        csv_writer.write_record([
            "Input",
            input.label.as_str(),
            input.symbol.as_str(),
            input.unit.as_str(),
            "",
            "",
        ])?;
    }

    for output in &calculator.outputs {
        let display = display_formula(output, &calculator.inputs);
        csv_writer.write_record([
            "Output",
            output.label.as_str(),
            output.symbol.as_str(),
            output.unit.as_str(),
            output.formula.as_str(),
            display.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Render the CSV table as a string
pub fn to_csv(calculator: &Calculator) -> JsonResult<String> {
    let mut buffer = Vec::new();
    write_csv(calculator, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
