use super::ui::{self, MoneyFormat};
use crate::core::ledger::{self, CategoryTotal, LedgerSummary, Transaction};
use comfy_table::{Cell, CellAlignment};

fn category_table(
    title: &str,
    totals: &[CategoryTotal],
    overall: f64,
    money: MoneyFormat,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell(&format!("Total ({})", money.currency)),
        ui::header_cell("Share (%)"),
    ]);
    for total in totals {
        let share = if overall > 0.0 {
            total.total / overall * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new(total.category),
            Cell::new(money.amount(total.total)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{share:.1}%")).set_alignment(CellAlignment::Right),
        ]);
    }
    format!("{}\n{}", ui::style_text(title, ui::StyleType::Title), table)
}

impl LedgerSummary {
    pub fn display_as_table(&self, money: MoneyFormat) -> String {
        let mut overview = ui::new_styled_table();
        overview.set_header(vec![
            ui::header_cell("Income"),
            ui::header_cell("Expense"),
            ui::header_cell("Balance"),
            ui::header_cell("Savings Rate"),
        ]);
        overview.add_row(vec![
            ui::amount_cell(self.income, money),
            ui::amount_cell(-self.expense, money),
            ui::amount_cell(self.balance, money),
            ui::percent_cell(self.savings_rate),
        ]);

        let mut output = format!(
            "{}\n{}",
            ui::style_text(
                &format!("Overview ({} transactions)", self.transaction_count),
                ui::StyleType::Title
            ),
            overview
        );

        if !self.expense_by_category.is_empty() {
            output.push_str("\n\n");
            output.push_str(&category_table(
                "Spending by category",
                &self.expense_by_category,
                self.expense,
                money,
            ));
        }
        if !self.income_by_category.is_empty() {
            output.push_str("\n\n");
            output.push_str(&category_table(
                "Income by category",
                &self.income_by_category,
                self.income,
                money,
            ));
        }

        if !self.monthly.is_empty() {
            let mut monthly = ui::new_styled_table();
            monthly.set_header(vec![
                ui::header_cell("Month"),
                ui::header_cell("Income"),
                ui::header_cell("Expense"),
                ui::header_cell("Net"),
            ]);
            for month in &self.monthly {
                monthly.add_row(vec![
                    Cell::new(&month.month),
                    ui::amount_cell(month.income, money),
                    ui::amount_cell(-month.expense, money),
                    ui::amount_cell(month.income - month.expense, money),
                ]);
            }
            output.push_str(&format!(
                "\n\n{}\n{}",
                ui::style_text("Monthly", ui::StyleType::Title),
                monthly
            ));
        }

        if let Some(top) = self.top_expense_category() {
            output.push_str(&format!(
                "\n\n{} {} is your biggest expense at {}",
                ui::style_text("Spending alert:", ui::StyleType::TotalLabel),
                top.category,
                money.amount(top.total)
            ));
        }
        output
    }
}

pub fn render(transactions: &[Transaction], money: MoneyFormat) -> String {
    if transactions.is_empty() {
        return ui::style_text(
            "No transactions yet. Add one with `moneymaster tx add`.",
            ui::StyleType::Subtle,
        );
    }
    ledger::summarize(transactions).display_as_table(money)
}
