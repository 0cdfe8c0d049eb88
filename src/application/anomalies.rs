//! Anomaly board: the anomaly page presentation code displays.

use tracing::{info, warn};

use crate::domain::{
    apply_status_update, detection_method_counts, Anomaly, AnomalyId, AnomalyPage,
    AnomalyStatus, PageCursor, StatusFilter,
};
use crate::error::Result;
use crate::port::{AnomalyQuery, DashboardApi, DEFAULT_PAGE_LIMIT};

/// Holds one page of anomalies plus its query.
///
/// Status changes go to the backend first; the local page only changes once
/// the backend accepted them.
#[derive(Debug, Clone)]
pub struct AnomalyBoard {
    query: AnomalyQuery,
    page: AnomalyPage,
}

impl AnomalyBoard {
    /// Empty board for `query`; call [`load`](Self::load) to fill it.
    #[must_use]
    pub fn new(query: AnomalyQuery) -> Self {
        Self {
            query,
            page: AnomalyPage::default(),
        }
    }

    /// Board over an already fetched page.
    #[must_use]
    pub fn with_page(query: AnomalyQuery, page: AnomalyPage) -> Self {
        Self { query, page }
    }

    /// Fetch the page for the current query.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the held page is left as it was.
    pub async fn load(&mut self, api: &dyn DashboardApi) -> Result<()> {
        let page = api.anomalies(&self.query).await?;
        self.page = page;
        Ok(())
    }

    /// Change the status of one anomaly.
    ///
    /// On success only the matching record changes. On failure the page is
    /// untouched and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub async fn update_status(
        &mut self,
        api: &dyn DashboardApi,
        id: &AnomalyId,
        status: AnomalyStatus,
    ) -> Result<()> {
        match api.update_anomaly_status(id, status).await {
            Ok(_) => {
                if apply_status_update(&mut self.page.anomalies, id, status) {
                    info!(id = %id, status = %status, "Anomaly status updated");
                } else {
                    info!(id = %id, status = %status, "Anomaly status updated off-page");
                }
                Ok(())
            }
            Err(e) => {
                warn!(id = %id, status = %status, error = %e, "Anomaly status update failed");
                Err(e)
            }
        }
    }

    /// Anomalies on the page, narrowed by the status filter.
    ///
    /// The backend filters too; this keeps the view consistent after local
    /// status changes.
    #[must_use]
    pub fn visible(&self) -> Vec<&Anomaly> {
        self.page
            .anomalies
            .iter()
            .filter(|a| self.query.status.matches(a.status))
            .collect()
    }

    /// Every anomaly on the page, unfiltered.
    #[must_use]
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.page.anomalies
    }

    /// Per-method counts over the whole page.
    #[must_use]
    pub fn method_counts(&self) -> Vec<(String, usize)> {
        detection_method_counts(&self.page.anomalies)
    }

    /// Position of the held page, clamped to the backend's page count.
    #[must_use]
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.page.page, self.page.pages)
    }

    #[must_use]
    pub const fn query(&self) -> AnomalyQuery {
        self.query
    }

    /// Matching anomalies across all pages, as reported by the backend.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.page.total
    }

    /// Switch filter and go back to the first page.
    pub fn set_filter(&mut self, status: StatusFilter) {
        self.query.status = status;
        self.query.page = 1;
    }
}

impl Default for AnomalyBoard {
    fn default() -> Self {
        Self::new(AnomalyQuery::new(1, DEFAULT_PAGE_LIMIT, StatusFilter::All))
    }
}
