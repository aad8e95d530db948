use ledgerdesk_domain::{
    CostBreakdownItem, DashboardSeries, EntityId, FundPosition, MonthlyFigure,
};

use super::ErpApi;
use crate::dashboard_service::{CostShare, DashboardService, FundSummary, ProfitRow};
use crate::error::CoreResult;
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport};

/// Everything the dashboard screen shows for one company.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    pub funds: Vec<FundPosition>,
    pub fund_summary: FundSummary,
    pub income_vs_expense: Vec<ProfitRow>,
    pub gross_profit: Vec<MonthlyFigure>,
    pub net_profit: Vec<MonthlyFigure>,
    pub costs: Vec<CostShare>,
}

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    pub fn fund_position(&self, company_id: EntityId) -> CoreResult<Vec<FundPosition>> {
        let request =
            self.scoped_query(ApiRequest::get("/api/dashboard/fundPosition"), company_id, None)?;
        self.fetch(request)
    }

    pub fn monthly_series(
        &self,
        company_id: EntityId,
        series: DashboardSeries,
    ) -> CoreResult<Vec<MonthlyFigure>> {
        let path = format!("/api/dashboard/{}", series.endpoint());
        let request = self.scoped_query(ApiRequest::get(path), company_id, None)?;
        self.fetch(request)
    }

    pub fn cost_breakdown(&self, company_id: EntityId) -> CoreResult<Vec<CostBreakdownItem>> {
        let request =
            self.scoped_query(ApiRequest::get("/api/dashboard/getCostBreakdown"), company_id, None)?;
        self.fetch(request)
    }

    pub fn dashboard(&self, company_id: EntityId) -> CoreResult<DashboardOverview> {
        let funds = self.fund_position(company_id)?;
        let income = self.monthly_series(company_id, DashboardSeries::Income)?;
        let expense = self.monthly_series(company_id, DashboardSeries::Expense)?;
        let gross_profit = self.monthly_series(company_id, DashboardSeries::GrossProfit)?;
        let net_profit = self.monthly_series(company_id, DashboardSeries::NetProfit)?;
        let costs = self.cost_breakdown(company_id)?;
        Ok(DashboardOverview {
            fund_summary: DashboardService::fund_summary(&funds),
            funds,
            income_vs_expense: DashboardService::merge_series(&income, &expense),
            gross_profit,
            net_profit,
            costs: DashboardService::cost_shares(&costs),
        })
    }
}
