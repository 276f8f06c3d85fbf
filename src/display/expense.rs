//! Expense display formatting

use crate::models::{Category, Expense, ExpenseOrigin, Money};

use super::{truncate, DisplayOptions};

fn category_title(categories: &[Category], expense: &Expense) -> String {
    categories
        .iter()
        .find(|c| c.id == expense.category_id)
        .map(|c| c.title.clone())
        .unwrap_or_else(|| expense.category_id.to_string())
}

/// Format expenses as a register; distributed expenses are marked with `*`
pub fn format_expense_list(
    expenses: &[Expense],
    categories: &[Category],
    options: &DisplayOptions,
) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<28} {:<16} {:>14}  {}\n",
        "Date", "Description", "Category", "Amount", "ID"
    ));
    output.push_str(&"-".repeat(88));
    output.push('\n');

    for expense in expenses {
        let marker = match expense.origin {
            ExpenseOrigin::Manual => " ",
            ExpenseOrigin::Distribution { .. } => "*",
        };
        output.push_str(&format!(
            "{:<12} {:<28} {:<16} {:>14}{} {}\n",
            options.date(expense.date),
            truncate(&expense.description, 28),
            truncate(&category_title(categories, expense), 16),
            options.money(expense.amount),
            marker,
            expense.id
        ));
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&"-".repeat(88));
    output.push('\n');
    output.push_str(&format!("{:<58} {:>14}\n", "Total", options.money(total)));

    output
}

/// Format one expense
pub fn format_expense_details(
    expense: &Expense,
    categories: &[Category],
    options: &DisplayOptions,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense: {}\n", expense.description));
    output.push_str(&format!("  ID:       {}\n", expense.id));
    output.push_str(&format!("  Amount:   {}\n", options.money(expense.amount)));
    output.push_str(&format!("  Date:     {}\n", options.date(expense.date)));
    output.push_str(&format!(
        "  Category: {}\n",
        category_title(categories, expense)
    ));
    if let Some(income_id) = expense.source_income() {
        output.push_str(&format!("  From:     income {}\n", income_id));
    }

    output
}
