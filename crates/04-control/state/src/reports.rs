use crate::cx::StateCx;
use command::{Report, ReportKind};

/// Reports a branch has received, in arrival order.
#[derive(Debug, Default)]
pub struct ReportLog {
    reports: Vec<Report>,
}

impl ReportLog {
    /// Stores `report`; returns true when it is the first of its kind.
    pub fn push(&mut self, report: Report) -> bool {
        let first = self.count(report.kind()) == 0;
        self.reports.push(report);
        first
    }

    /// Number of stored reports of `kind`.
    pub fn count(&self, kind: ReportKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Stored reports of `kind`.
    pub fn of_kind(&self, kind: ReportKind) -> impl Iterator<Item = &Report> {
        self.reports.iter().filter(move |r| r.kind() == kind)
    }

    /// Every stored report.
    pub fn iter(&self) -> impl Iterator<Item = &Report> {
        self.reports.iter()
    }

    /// Number of stored reports.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// True when nothing was stored.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Writes the log to the operator, one report per line.
    pub fn print(&self, cx: &StateCx<'_>, owner: &str) {
        if self.reports.is_empty() {
            cx.notice(&format!("{owner}: no reports"));
            return;
        }
        cx.notice(&format!("{owner}: {} reports", self.reports.len()));
        for report in &self.reports {
            cx.notice(&format!("  {report}"));
        }
    }
}
