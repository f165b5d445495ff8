use serde::{Deserialize, Serialize};

/// Analysis returned by a successful `POST /api/analyze` round trip.
/// Immutable once parsed; the renderer projects it, nothing mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub company_analysis: CompanyAnalysis,
    pub sales_strategy: SalesStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAnalysis {
    pub challenges: Vec<String>,
    pub opportunities: Vec<String>,
    pub market_position: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStrategy {
    pub value_proposition: String,
    pub key_points: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Body shape of non-2xx responses from the analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_result_parses_the_documented_wire_shape() {
        let body = r#"{
            "companyAnalysis": {
                "challenges": ["Legacy tooling"],
                "opportunities": ["Mid-market expansion", "Partnerships"],
                "marketPosition": "Challenger"
            },
            "salesStrategy": {
                "valueProposition": "Faster onboarding",
                "keyPoints": ["Time to value"],
                "recommendations": []
            }
        }"#;

        let result: AnalysisResult = serde_json::from_str(body).expect("parse");
        assert_eq!(result.company_analysis.market_position, "Challenger");
        assert_eq!(result.company_analysis.opportunities.len(), 2);
        assert_eq!(result.sales_strategy.value_proposition, "Faster onboarding");
        assert!(result.sales_strategy.recommendations.is_empty());
    }

    #[test]
    fn error_detail_requires_the_detail_field() {
        assert!(serde_json::from_str::<ErrorDetail>(r#"{"detail":"not found"}"#).is_ok());
        assert!(serde_json::from_str::<ErrorDetail>(r#"{"message":"nope"}"#).is_err());
    }
}
