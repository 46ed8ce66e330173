//! Page navigation for posts split with `<!--nextpage-->`

use serde::Serialize;

use super::PostView;

/// One page of a split post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// 1-based page number
    pub index: u32,
    pub name: String,
    pub title: String,
    pub text: String,
    pub link: String,
    pub current: bool,
}

/// Link to the page before or after the current one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjacentPage {
    pub link: String,
}

/// Page navigation of the request's post
///
/// Empty when the request is not for a split post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub pages: Vec<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<AdjacentPage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<AdjacentPage>,
}

impl Pagination {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PostView {
    /// Page links built from the request's paging state
    pub fn pagination(&self) -> Pagination {
        let paging = self.ctx.paging;
        let Some(record) = self.record() else {
            return Pagination::default();
        };
        if !paging.multipage {
            return Pagination::default();
        }

        let _guard = self.ctx.scoped_current(record.clone());
        let links = &self.host.links;

        let pages = (1..=paging.numpages)
            .map(|i| PageLink {
                index: i,
                name: i.to_string(),
                title: i.to_string(),
                text: i.to_string(),
                link: links.page_link(&self.ctx, i),
                current: i == paging.page,
            })
            .collect();

        let prev = (paging.page > 1).then(|| AdjacentPage {
            link: links.page_link(&self.ctx, paging.page - 1),
        });
        let next = (paging.page < paging.numpages).then(|| AdjacentPage {
            link: links.page_link(&self.ctx, paging.page + 1),
        });

        Pagination { pages, prev, next }
    }
}
