use super::ui::{self, MoneyFormat};
use crate::core::calculator::Calculator;
use crate::core::error::CalcError;
use crate::core::report::Report;
use anyhow::{Result, bail};
use comfy_table::{Cell, CellAlignment};
use tracing::{debug, info};

impl Report {
    pub fn display_as_table(&self, money: MoneyFormat) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Result"), ui::header_cell("Value")]);

        for figure in &self.details {
            table.add_row(vec![
                Cell::new(&figure.label),
                Cell::new(ui::format_figure(figure, money)).set_alignment(CellAlignment::Right),
            ]);
        }

        let mut output = format!("{}\n\n", ui::style_text(&self.title, ui::StyleType::Title));
        output.push_str(&format!(
            "{}: {}",
            ui::style_text(&self.headline.label, ui::StyleType::TotalLabel),
            ui::style_text(
                &ui::format_figure(&self.headline, money),
                ui::StyleType::TotalValue
            )
        ));
        if !self.details.is_empty() {
            output.push_str("\n\n");
            output.push_str(&table.to_string());
        }
        if let Some(note) = &self.note {
            output.push_str(&format!("\n{}", ui::style_text(note, ui::StyleType::Subtle)));
        }
        output
    }
}

fn guidance_text(err: &CalcError) -> String {
    format!(
        "{}\n{}",
        ui::style_text(&err.to_string(), ui::StyleType::Error),
        err.guidance()
    )
}

/// Evaluates a calculator and renders its report.
///
/// A domain error is part of the answer (the inputs have no finite result)
/// and is rendered as guidance. Invalid inputs fail the command.
pub fn run(calculator: &Calculator, json: bool, money: MoneyFormat) -> Result<String> {
    let info = calculator.kind().info();
    info!("Running calculator {}", info.id);
    debug!("Inputs: {calculator:?}");

    match calculator.evaluate() {
        Ok(report) if json => Ok(serde_json::to_string_pretty(&report)?),
        Ok(report) => Ok(report.display_as_table(money)),
        Err(err) if err.is_domain() => {
            debug!("{} has no result: {err}", info.id);
            if json {
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "tool": info.id,
                    "error": err.to_string(),
                    "guidance": err.guidance(),
                }))?)
            } else {
                Ok(format!(
                    "{}\n\n{}",
                    ui::style_text(info.name, ui::StyleType::Title),
                    guidance_text(&err)
                ))
            }
        }
        Err(err) => bail!("Invalid input for {}: {err}. {}", info.id, err.guidance()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::{DebtPayoffInput, RoiInput, SipInput};
    use crate::core::currency::{CurrencyCode, PRIVACY_MASK};

    const USD: MoneyFormat = MoneyFormat {
        currency: CurrencyCode::USD,
        privacy: false,
    };

    fn sip() -> Calculator {
        Calculator::Sip(SipInput {
            monthly: 5000.0,
            rate: 12.0,
            years: 10.0,
        })
    }

    #[test]
    fn test_report_table() {
        let output = run(&sip(), false, USD).unwrap();
        assert!(output.contains("SIP Wealth"));
        assert!(output.contains("$1,161,695.38"));
        assert!(output.contains("Invested amount"));
        assert!(output.contains("$600,000"));
    }

    #[test]
    fn test_report_respects_privacy() {
        let private = MoneyFormat {
            privacy: true,
            ..USD
        };
        let output = run(&sip(), false, private).unwrap();
        assert!(output.contains(PRIVACY_MASK));
        assert!(!output.contains("1,161,695"));
    }

    #[test]
    fn test_json_output() {
        let output = run(&sip(), true, USD).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["title"], "SIP Wealth");
        assert_eq!(value["headline"]["unit"]["kind"], "money");
        assert_eq!(value["details"][0]["value"], 600000.0);
    }

    #[test]
    fn test_domain_error_is_guidance() {
        let calc = Calculator::DebtPayoff(DebtPayoffInput {
            balance: 5000.0,
            rate: 18.0,
            monthly_payment: 50.0,
        });
        let output = run(&calc, false, USD).unwrap();
        assert!(output.contains("Increase the payment!"));

        let output = run(&calc, true, USD).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["tool"], "debt-payoff");
        assert_eq!(value["guidance"], "Increase the payment!");
    }

    #[test]
    fn test_input_error_fails() {
        let calc = Calculator::Roi(RoiInput {
            invested: f64::NAN,
            returned: 10.0,
        });
        let err = run(&calc, false, USD).unwrap_err();
        assert!(err.to_string().contains("Invalid input for roi"));
    }
}
