//! Report structures produced by the aggregation services.

use serde::{Deserialize, Serialize};

/// Per-type row of a daily report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub type_id: String,
    pub type_name: String,
    pub color: String,
    pub count: usize,
    pub amount: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub count: usize,
    pub amount: u64,
}

/// Aggregation of one calendar day, grouped by ticket type in catalog order.
/// Types without tickets on that day are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: String,
    pub lines: Vec<ReportLine>,
    pub total: ReportTotals,
}

impl DailyReport {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, type_id: &str) -> Option<&ReportLine> {
        self.lines.iter().find(|line| line.type_id == type_id)
    }
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub total_tickets: usize,
    pub day_tickets: usize,
    pub day_amount: u64,
}
