//! Properties pane controller

use std::sync::Arc;

use parking_lot::Mutex;

use crate::catalog::{TagRecord, format_timestamp};

use super::state::StateGraph;

/// What the properties pane should draw
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailView {
    #[default]
    Empty,
    Tag {
        title: String,
        rows: Vec<(String, String)>,
    },
}

impl DetailView {
    /// Build the view for a selection
    pub fn from_selection(repository: Option<&str>, tag: Option<&TagRecord>) -> Self {
        let Some(tag) = tag else {
            return DetailView::Empty;
        };

        let mut rows = Vec::with_capacity(5);
        if let Some(repository) = repository {
            rows.push(("repository".to_string(), repository.to_string()));
        }
        rows.push(("tag".to_string(), tag.name.clone()));
        rows.push(("digest".to_string(), tag.digest.clone()));
        rows.push(("created on".to_string(), format_timestamp(tag.created_at)));
        if let Some(updated) = tag.updated_at {
            rows.push(("updated on".to_string(), format_timestamp(updated)));
        }

        DetailView::Tag {
            title: format!("{} @ {}", tag.name, tag.digest),
            rows,
        }
    }
}

/// Keeps the properties view in step with `selected_tag`
#[derive(Debug, Clone)]
pub struct DetailController {
    view: Arc<Mutex<DetailView>>,
}

impl DetailController {
    pub fn new(graph: &StateGraph) -> Self {
        let view = Arc::new(Mutex::new(DetailView::Empty));

        let target = Arc::clone(&view);
        let repository = graph.selected_repository.clone();
        graph
            .selected_tag
            .subscribe(move |tag: &Option<TagRecord>| {
                let next = repository.with(|repo| DetailView::from_selection(repo.as_deref(), tag.as_ref()));
                *target.lock() = next;
                Ok(())
            });

        Self { view }
    }

    pub fn render(&self) -> DetailView {
        self.view.lock().clone()
    }

    pub fn restore(&self, view: DetailView) {
        *self.view.lock() = view;
    }
}
