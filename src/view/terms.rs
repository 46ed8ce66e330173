//! Term views and taxonomy lookups of a post

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::PostView;
use crate::error::ViewResult;
use crate::models::{TermRecord, TermRef, TAXONOMY_CATEGORY, TAXONOMY_TAG};
use crate::text;

/// A taxonomy term as templates see it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermView {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub taxonomy: String,
    pub description: String,
    pub parent_id: i64,
    pub count: i64,
    /// Archive URL
    pub link: String,
}

impl TermView {
    pub fn new(record: TermRecord, link: String) -> Self {
        Self {
            id: record.id,
            name: record.name,
            slug: record.slug,
            taxonomy: record.taxonomy,
            description: record.description,
            parent_id: record.parent_id,
            count: record.count,
            link,
        }
    }

    /// Archive URL as a site-relative path
    pub fn path(&self) -> String {
        text::relative_url(&self.link)
    }
}

impl std::fmt::Display for TermView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Map template-friendly aliases onto taxonomy names
fn canonical_taxonomy(name: &str) -> &str {
    match name {
        "tags" | "tag" => TAXONOMY_TAG,
        "categories" => TAXONOMY_CATEGORY,
        other => other,
    }
}

/// Whether a taxonomy argument asks for every taxonomy of the post type
fn is_every_taxonomy(name: &str) -> bool {
    matches!(name.trim(), "" | "all" | "any")
}

impl PostView {
    /// Terms of one or more taxonomies merged into one list
    ///
    /// `taxonomy` is a taxonomy name, a comma separated list, or `""`/`"all"`/`"any"`
    /// for every taxonomy of the post type. `tags`/`tag` and `categories` are
    /// accepted as aliases. Results are cached per argument string.
    pub async fn terms(&mut self, taxonomy: &str) -> ViewResult<Arc<Vec<TermView>>> {
        if let Some(cached) = self.term_cache.get(taxonomy) {
            debug!("Term cache hit for '{}' on post {}", taxonomy, self.id());
            return Ok(cached.clone());
        }

        let merged: Vec<TermView> = self
            .fetch_terms(taxonomy)
            .await?
            .into_iter()
            .flat_map(|(_, terms)| terms)
            .collect();

        let merged = Arc::new(merged);
        self.term_cache.insert(taxonomy.to_string(), merged.clone());
        Ok(merged)
    }

    /// Like [`PostView::terms`] but keyed by taxonomy
    ///
    /// Taxonomies without terms are left out.
    pub async fn terms_by_taxonomy(
        &mut self,
        taxonomy: &str,
    ) -> ViewResult<Arc<BTreeMap<String, Vec<TermView>>>> {
        if let Some(cached) = self.term_tax_cache.get(taxonomy) {
            return Ok(cached.clone());
        }

        let keyed: BTreeMap<String, Vec<TermView>> = self
            .fetch_terms(taxonomy)
            .await?
            .into_iter()
            .filter(|(_, terms)| !terms.is_empty())
            .collect();

        let keyed = Arc::new(keyed);
        self.term_tax_cache.insert(taxonomy.to_string(), keyed.clone());
        Ok(keyed)
    }

    /// Categories of the post
    pub async fn categories(&mut self) -> ViewResult<Arc<Vec<TermView>>> {
        self.terms(TAXONOMY_CATEGORY).await
    }

    /// First category of the post
    pub async fn category(&mut self) -> ViewResult<Option<TermView>> {
        Ok(self.categories().await?.first().cloned())
    }

    /// Tags of the post
    pub async fn tags(&mut self) -> ViewResult<Arc<Vec<TermView>>> {
        self.terms("tags").await
    }

    /// Whether the post carries a term
    ///
    /// `taxonomy` of `"all"` or `"any"` checks every taxonomy of the post type.
    pub async fn has_term(&self, term: impl Into<TermRef>, taxonomy: &str) -> ViewResult<bool> {
        let Some(record) = self.record() else {
            return Ok(false);
        };
        let term = term.into();

        if taxonomy == "all" || taxonomy == "any" {
            let taxonomies = self.host.terms.object_taxonomies(&record.post_type).await?;
            for tax in taxonomies {
                match self.host.terms.has_term(&term, &tax, record.id).await {
                    Ok(true) => return Ok(true),
                    Ok(false) => {}
                    Err(e) => warn!("Skipping taxonomy '{}' for post {}: {:#}", tax, record.id, e),
                }
            }
            return Ok(false);
        }

        Ok(self
            .host
            .terms
            .has_term(&term, canonical_taxonomy(taxonomy), record.id)
            .await?)
    }

    /// Query every requested taxonomy, skipping the ones the store fails on
    async fn fetch_terms(&self, taxonomy: &str) -> ViewResult<Vec<(String, Vec<TermView>)>> {
        let Some(record) = self.record() else {
            return Ok(Vec::new());
        };

        let requested: Vec<String> = if is_every_taxonomy(taxonomy) {
            self.host.terms.object_taxonomies(&record.post_type).await?
        } else {
            taxonomy
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| canonical_taxonomy(t).to_string())
                .collect()
        };

        let mut found = Vec::with_capacity(requested.len());
        for tax in requested {
            match self.host.terms.post_terms(record.id, &tax).await {
                Ok(records) => {
                    let views = records
                        .into_iter()
                        .map(|r| self.host.factory.term(&self.host, r))
                        .collect();
                    found.push((tax, views));
                }
                Err(e) => {
                    warn!("Skipping taxonomy '{}' for post {}: {:#}", tax, record.id, e);
                }
            }
        }

        Ok(found)
    }
}
