use crate::core::pagination::Paginator;
use crate::core::search::SearchService;
use crate::domain::model::{SearchCriteria, SearchResult};
use crate::domain::ports::CompletionProvider;

/// State behind the search form: criteria, last results, current page and
/// the inline error message.
///
/// `search` takes `&mut self`, so a second search cannot start while one is
/// outstanding.
#[derive(Debug, Clone)]
pub struct SearchSession {
    criteria: SearchCriteria,
    results: Vec<SearchResult>,
    current_page: usize,
    error: Option<String>,
    has_searched: bool,
    paginator: Paginator,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(Paginator::default())
    }
}

impl SearchSession {
    pub fn new(paginator: Paginator) -> Self {
        Self {
            criteria: SearchCriteria::default(),
            results: Vec::new(),
            current_page: 1,
            error: None,
            has_searched: false,
            paginator,
        }
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn set_industry(&mut self, industry: impl Into<String>) {
        self.criteria.industry = industry.into();
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.criteria.state = state.into();
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.results.len())
    }

    pub fn current_page_results(&self) -> &[SearchResult] {
        self.paginator.page(&self.results, self.current_page)
    }

    pub async fn search<P: CompletionProvider>(&mut self, service: &SearchService<P>) {
        if !self.criteria.is_complete() {
            self.error = Some("Please select both industry and state".to_string());
            return;
        }

        self.error = None;
        match service.search(&self.criteria).await {
            Ok(results) => {
                self.results = results;
                self.current_page = 1;
                self.has_searched = true;
            }
            Err(e) => {
                tracing::error!("❌ Search failed: {}", e);
                self.error = Some(e.user_friendly_message());
                self.results.clear();
            }
        }
    }

    pub fn clear(&mut self) {
        self.criteria = SearchCriteria::default();
        self.results.clear();
        self.current_page = 1;
        self.error = None;
        self.has_searched = false;
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.current_page = self.paginator.clamp_page(page, self.results.len());
        self.current_page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> usize {
        self.go_to_page(self.current_page.saturating_sub(1))
    }
}
