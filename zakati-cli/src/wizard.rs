use colored::Colorize;
use inquire::validator::{ErrorMessage, Validation};
use inquire::{Confirm, CustomType, Select};
use rust_decimal::Decimal;
use strum::IntoEnumIterator;
use zakati_core::prelude::*;

use crate::input::HoldingsInput;

/// Everything the wizard collects.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardAnswers {
    pub base: Currency,
    pub output: Currency,
    pub holdings: HoldingsInput,
}

/// Runs the guided Zakat wizard.
pub fn run_wizard_mode(default_base: Currency, default_output: Currency) -> Result<WizardAnswers, Box<dyn std::error::Error>> {
    println!("\n{}", "🧙 GUIDED ZAKAT WIZARD 🧙".bright_cyan().bold());
    println!("{}", "Enter each value in your base currency. Leave a field at 0 if it does not apply.".dimmed());
    println!("{}", "You can press Ctrl+C at any time to exit.".dimmed());
    println!();

    let base = select_currency("Currency of your assets:", default_base)?;
    let output = select_currency("Currency to report results in:", default_output)?;
    let mut holdings = HoldingsInput::default();

    println!("\n{}", "--- Assets ---".bright_green());
    for category in AssetCategory::iter() {
        let amount = amount_prompt(category.label(), None)?;
        holdings.set_amount(category, amount);
    }

    if Confirm::new("Do you possess Gold or Silver (jewelry, bars, coins)?")
        .with_default(false)
        .with_help_message("Weights are recorded with your declaration.")
        .prompt()?
    {
        println!("\n{}", "--- Precious Metals ---".bright_yellow());
        holdings.gold_grams = amount_prompt("Gold (grams)", Some("e.g. 85.0"))?;
        holdings.silver_grams = amount_prompt("Silver (grams)", Some("e.g. 595.0"))?;
    }

    println!("\n{}", "--- Liabilities ---".bright_red());
    holdings.debts = amount_prompt("Outstanding Debts", None)?;

    Ok(WizardAnswers { base, output, holdings })
}

fn select_currency(message: &str, default: Currency) -> Result<Currency, inquire::InquireError> {
    let options: Vec<Currency> = Currency::iter().collect();
    let start = options.iter().position(|c| *c == default).unwrap_or(0);
    Select::new(message, options).with_starting_cursor(start).prompt()
}

fn amount_prompt(label: &str, placeholder: Option<&str>) -> Result<Decimal, inquire::InquireError> {
    let message = format!("{}:", label);
    let mut prompt = CustomType::<Decimal>::new(&message)
        .with_default(Decimal::ZERO)
        .with_error_message("Please enter a valid number")
        .with_validator(non_negative);
    if let Some(placeholder) = placeholder {
        prompt = prompt.with_placeholder(placeholder);
    }
    prompt.prompt()
}

fn non_negative(input: &Decimal) -> Result<Validation, inquire::CustomUserError> {
    if *input < Decimal::ZERO {
        Ok(Validation::Invalid(ErrorMessage::Custom("Value must be non-negative".to_string())))
    } else {
        Ok(Validation::Valid)
    }
}
