//! Example: build a calculator, run it and export it

use formulaforge::prelude::*;
use formulaforge::{summary, CalculatorMetadata};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut draft = CalculatorDraft::new();
    draft.update(CalculatorUpdate::Title("Ohm's Law".into()))?;
    draft.update(CalculatorUpdate::Description("Resistance and power from voltage and current".into()))?;
    draft.update(CalculatorUpdate::Category(Some("Electrical".into())))?;

    draft.push_input(InputField::number("v", "Voltage", "V", "V"));
    draft.push_input(InputField::number("i", "Current", "I", "A").with_range(Some(0.0), None));
    draft.push_output(OutputField::new("r", "Resistance", "R", "Ω", "v / i"));
    draft.push_output(OutputField::new("p", "Power", "P", "W", "v * i"));

    let calc = draft.build()?;
    println!("{}", summary(&calc));
    println!("complexity: {}", CalculatorMetadata::from_calculator(&calc).complexity);

    let mut session = CalculationSession::new(&calc);
    session.set_inputs([("v", Some(12.0)), ("i", Some(0.25))])?;
    for output in &calc.outputs {
        println!(
            "{:<12} {:>10} {:<3}  {}",
            output.label,
            session.results()[&output.id],
            output.unit,
            session.notation(&output.id).unwrap_or_default()
        );
    }

    println!("{}", CalculatorWriter::to_string(&calc, &WriteOptions::default())?);
    Ok(())
}
