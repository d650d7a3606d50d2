// Per-ticker AI analysis and investor flow series
use std::sync::Arc;

use shared::models::{InvestorFigures, InvestorHistory, StockAnalysis};
use shared::utils::korean_format::{format_eok, to_eok};

use super::backend::GuardianBackend;
use crate::error::{GuardianError, Result};
use crate::session::TokenStore;

pub const NO_ANALYSIS: &str = "분석된 내용이 없습니다.";

// Every n-th history point gets a visible axis label.
const LABEL_STRIDE: usize = 5;

pub struct AnalysisService {
    backend: Arc<dyn GuardianBackend>,
    tokens: Arc<dyn TokenStore>,
}

impl AnalysisService {
    pub fn new(backend: Arc<dyn GuardianBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        AnalysisService { backend, tokens }
    }

    pub async fn fetch(&self, name: &str) -> Result<StockAnalysis> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GuardianError::EmptyInput);
        }
        let token = self.tokens.load().await?.ok_or(GuardianError::Unauthenticated)?;
        let analysis = self
            .backend
            .analysis(&token, name)
            .await
            .map_err(GuardianError::into_fetch_error)?;
        tracing::info!(company = %name, has_metrics = analysis.metrics.is_some(), "Analysis loaded");
        Ok(analysis)
    }
}

/// The AI summary, falling back to the plain analysis text and then to a fixed notice.
pub fn summary(analysis: &StockAnalysis) -> &str {
    [&analysis.gemini_output, &analysis.analysis]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|text| !text.trim().is_empty())
        .unwrap_or(NO_ANALYSIS)
}

/// Daily net buying per investor class, scaled to 억 for charting.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestorFlowSeries {
    /// `MM-DD` on every fifth point, blank elsewhere.
    pub labels: Vec<String>,
    pub personal: Vec<f64>,
    pub foreigner: Vec<f64>,
    pub institution: Vec<f64>,
}

impl InvestorFlowSeries {
    /// `None` when there is no history to plot.
    pub fn from_history(history: &[InvestorHistory]) -> Option<Self> {
        if history.is_empty() {
            return None;
        }
        let labels = history
            .iter()
            .enumerate()
            .map(|(i, point)| {
                if i % LABEL_STRIDE == 0 {
                    point.date.get(5..10).unwrap_or(point.date.as_str()).to_string()
                } else {
                    String::new()
                }
            })
            .collect();
        Some(InvestorFlowSeries {
            labels,
            personal: history.iter().map(|p| to_eok(p.personal)).collect(),
            foreigner: history.iter().map(|p| to_eok(p.foreigner)).collect(),
            institution: history.iter().map(|p| to_eok(p.institution)).collect(),
        })
    }

    pub fn from_analysis(analysis: &StockAnalysis) -> Option<Self> {
        let investors = analysis.metrics.as_ref()?.investors.as_ref()?;
        Self::from_history(&investors.history)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One display row per investor class: `(label, formatted amount)`.
pub fn figure_rows(figures: &InvestorFigures) -> [(&'static str, String); 3] {
    [
        ("개인", format_eok(figures.personal)),
        ("외국인", format_eok(figures.foreigner)),
        ("기관", format_eok(figures.institution)),
    ]
}
