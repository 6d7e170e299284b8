//! Paginated catalog pages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination metadata as the front end expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// The "no data" page served when a catalog cannot be fetched.
    pub fn empty(page: u32, per_page: u32) -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta {
                total: 0,
                current_page: page,
                last_page: 1,
                per_page,
            },
        }
    }
}

/// Services disagree on casing, so both are accepted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LooseMeta {
    total: Option<u64>,
    #[serde(alias = "current_page")]
    current_page: Option<u32>,
    #[serde(alias = "last_page")]
    last_page: Option<u32>,
    #[serde(alias = "per_page")]
    per_page: Option<u32>,
}

/// Turn a downstream body into a page. Accepts `{ data, meta }`,
/// `{ data }` and bare arrays; anything else is `None`.
pub fn normalize(body: Value, page: u32, per_page: u32) -> Option<Paginated<Value>> {
    let (data, meta) = match body {
        Value::Array(items) => (items, LooseMeta::default()),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => {
                let meta = map
                    .remove("meta")
                    .and_then(|m| serde_json::from_value::<LooseMeta>(m).ok())
                    .unwrap_or_default();
                (items, meta)
            }
            _ => return None,
        },
        _ => return None,
    };

    let total = meta.total.unwrap_or(data.len() as u64);
    let per_page = meta.per_page.unwrap_or(per_page);
    let last_page = meta.last_page.unwrap_or_else(|| page_count(total, per_page));

    Some(Paginated {
        data,
        meta: PageMeta {
            total,
            current_page: meta.current_page.unwrap_or(page),
            last_page,
            per_page,
        },
    })
}

fn page_count(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(per_page)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
