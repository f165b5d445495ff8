//! Read-only projections of an analysis result for display.

use shared::protocol::AnalysisResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyAnalysisPanel {
    pub market_position: String,
    pub challenges: Vec<String>,
    pub opportunities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesStrategyPanel {
    pub value_proposition: String,
    pub key_points: Vec<String>,
    pub recommendations: Vec<String>,
}

/// The two independent views a successful analysis renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPanels {
    pub company: CompanyAnalysisPanel,
    pub strategy: SalesStrategyPanel,
}

/// Pure projection: no result means nothing to render, not a placeholder.
/// List order is preserved and empty lists stay present as empty lists.
pub fn panels(result: Option<&AnalysisResult>) -> Option<AnalysisPanels> {
    let result = result?;
    Some(AnalysisPanels {
        company: CompanyAnalysisPanel {
            market_position: result.company_analysis.market_position.clone(),
            challenges: result.company_analysis.challenges.clone(),
            opportunities: result.company_analysis.opportunities.clone(),
        },
        strategy: SalesStrategyPanel {
            value_proposition: result.sales_strategy.value_proposition.clone(),
            key_points: result.sales_strategy.key_points.clone(),
            recommendations: result.sales_strategy.recommendations.clone(),
        },
    })
}
