//! Income display formatting

use crate::models::{IncomeEntry, Money};

use super::{truncate, DisplayOptions};

/// Format income entries as a table with their total
pub fn format_income_list(entries: &[IncomeEntry], options: &DisplayOptions) -> String {
    if entries.is_empty() {
        return "No income recorded.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<30} {:>14}  {}\n",
        "Date", "Description", "Amount", "ID"
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for entry in entries {
        output.push_str(&format!(
            "{:<12} {:<30} {:>14}  {}\n",
            options.date(entry.date),
            truncate(&entry.description, 30),
            options.money(entry.amount),
            entry.id
        ));
    }

    let total: Money = entries.iter().map(|e| e.amount).sum();
    output.push_str(&"-".repeat(72));
    output.push('\n');
    output.push_str(&format!("{:<43} {:>14}\n", "Total", options.money(total)));

    output
}
