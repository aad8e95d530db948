use ledgerdesk_core::{CostShare, DashboardService, FundSummary, ProfitRow};
use ledgerdesk_domain::{DashboardSeries, FundPosition, MonthlyFigure};

use crate::cli::args::ArgMap;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{block, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::{money, percent};
use crate::cli::ui::table_renderer::{Table, TableColumn};

const USAGE: &str = "dashboard [fund|income|expense|gp|np|profit|cost] [--company ID]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "dashboard",
        "Fund position, monthly results and cost breakdown",
        USAGE,
        cmd_dashboard,
    )
    .with_actions(&["fund", "income", "expense", "gp", "np", "profit", "cost"])]
}

fn cmd_dashboard(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ArgMap::parse(args);
    let company_id = context.company(&args)?;
    let view = args.positional(0).map(str::to_ascii_lowercase);
    match view.as_deref() {
        None => {
            let overview = context.api.dashboard(company_id)?;
            render_funds(&overview.funds, &overview.fund_summary);
            render_profit(&overview.income_vs_expense);
            render_series(DashboardSeries::GrossProfit, &overview.gross_profit);
            render_series(DashboardSeries::NetProfit, &overview.net_profit);
            render_costs(&overview.costs);
        }
        Some("fund") | Some("funds") => {
            let funds = context.api.fund_position(company_id)?;
            render_funds(&funds, &DashboardService::fund_summary(&funds));
        }
        Some("profit") => {
            let income = context.api.monthly_series(company_id, DashboardSeries::Income)?;
            let expense = context.api.monthly_series(company_id, DashboardSeries::Expense)?;
            render_profit(&DashboardService::merge_series(&income, &expense));
        }
        Some("cost") | Some("costs") => {
            let items = context.api.cost_breakdown(company_id)?;
            render_costs(&DashboardService::cost_shares(&items));
        }
        Some(other) => {
            let series = match other {
                "income" => DashboardSeries::Income,
                "expense" => DashboardSeries::Expense,
                "gp" => DashboardSeries::GrossProfit,
                "np" => DashboardSeries::NetProfit,
                _ => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown dashboard view `{}`; usage: {}",
                        other, USAGE
                    )))
                }
            };
            let figures = context.api.monthly_series(company_id, series)?;
            render_series(series, &figures);
        }
    }
    Ok(())
}

fn render_funds(funds: &[FundPosition], summary: &FundSummary) {
    output_section("Fund position");
    if funds.is_empty() {
        io::print_info("No cash or bank balances.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("Account").max(36),
        TableColumn::left("Kind"),
        TableColumn::right("Balance"),
    ]);
    for fund in funds {
        table.push([fund.account.clone(), fund.kind.to_string(), money(fund.balance)]);
    }
    block(&table.render());
    io::print_info(format!(
        "Cash {}  Bank {}  Total {}",
        money(summary.cash),
        money(summary.bank),
        money(summary.total)
    ));
}

fn render_profit(rows: &[ProfitRow]) {
    output_section("Income vs expense");
    if rows.is_empty() {
        io::print_info("No monthly figures yet.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right("Income"),
        TableColumn::right("Expense"),
        TableColumn::right("Profit"),
        TableColumn::right("Margin"),
    ]);
    for row in rows {
        table.push([
            row.month.clone(),
            money(row.revenue),
            money(row.cost),
            money(row.profit),
            percent(row.margin),
        ]);
    }
    block(&table.render());
}

fn render_series(series: DashboardSeries, figures: &[MonthlyFigure]) {
    output_section(series.to_string());
    if figures.is_empty() {
        io::print_info("No monthly figures yet.");
        return;
    }
    let mut table = Table::new(vec![TableColumn::left("Month"), TableColumn::right("Amount")]);
    for figure in figures {
        table.push([figure.month.clone(), money(figure.amount)]);
    }
    block(&table.render());
}

fn render_costs(costs: &[CostShare]) {
    output_section("Cost breakdown");
    if costs.is_empty() {
        io::print_info("No costs recorded.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("Category").max(32),
        TableColumn::right("Amount"),
        TableColumn::right("Share"),
    ]);
    for cost in costs {
        table.push([
            cost.category.clone(),
            money(cost.amount),
            percent(Some(cost.percent)),
        ]);
    }
    block(&table.render());
}
