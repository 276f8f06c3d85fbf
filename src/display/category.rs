//! Category display formatting

use crate::models::Category;

use super::{truncate, DisplayOptions};

/// Format categories as a table with an allocation footer
pub fn format_category_list(categories: &[Category], allocated: u32) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'budgetcap category create' to add one.\n".to_string();
    }

    let title_width = categories
        .iter()
        .map(|c| c.title.chars().count().min(30))
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {:>5}  {:<8}  {}\n",
        "Category",
        "%",
        "Status",
        "ID",
        width = title_width
    ));
    output.push_str(&format!(
        "{:-<width$}  {:->5}  {:-<8}  {:-<12}\n",
        "",
        "",
        "",
        "",
        width = title_width
    ));

    for category in categories {
        output.push_str(&format!(
            "{:<width$}  {:>5}  {:<8}  {}\n",
            truncate(&category.title, 30),
            category.percentage,
            if category.active { "active" } else { "inactive" },
            category.id,
            width = title_width
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Allocated: {}% of 100% ({}% free)\n",
        allocated,
        100u32.saturating_sub(allocated)
    ));

    output
}

/// Format one category with its spending position
pub fn format_category_details(
    category: &Category,
    spent: crate::models::Money,
    remaining: crate::models::Money,
    options: &DisplayOptions,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.title));
    output.push_str(&format!("  ID:         {}\n", category.id));
    output.push_str(&format!("  Percentage: {}\n", category.percentage));
    output.push_str(&format!(
        "  Active:     {}\n",
        if category.active { "Yes" } else { "No" }
    ));

    if let Some(description) = &category.description {
        output.push_str(&format!("  Notes:      {}\n", description));
    }

    output.push_str(&format!("  Spent:      {}\n", options.money(spent)));
    output.push_str(&format!("  Remaining:  {}\n", options.money(remaining)));

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        category.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        category.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
