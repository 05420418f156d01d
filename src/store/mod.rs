//! 请求存储：顺序 id、只追加日志、快照读取
//!
//! id 分配与追加在同一把写锁内完成，因此并发 append 不会重复或倒退；
//! 校验在加锁前完成，失败时不消耗 id。模型调用发生在 append 之前，不持有锁。

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use tokio::sync::RwLock;

use crate::core::{StoreError, ValidationError};
use crate::triage::{Category, TagSet, TriageResult};

pub const DEFAULT_ANONYMOUS_NAME: &str = "Anonymous";

/// 待存储的提交内容（未校验）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub request_text: String,
}

impl NewRequest {
    pub fn new(
        name: Option<&str>,
        address: impl Into<String>,
        request_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.map(String::from),
            address: address.into(),
            request_text: request_text.into(),
        }
    }

    /// address 与 request_text 去空白后不能为空
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.address.trim().is_empty() {
            return Err(ValidationError::empty("address"));
        }
        if self.request_text.trim().is_empty() {
            return Err(ValidationError::empty("request_text"));
        }
        Ok(())
    }
}

/// 已存储的请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRequest {
    pub id: u64,
    pub requester_name: String,
    pub address: String,
    pub request_text: String,
    pub triage: TriageResult,
    pub created_at: DateTime<Utc>,
}

/// 对外 JSON 形状
#[derive(Serialize)]
struct StoredRequestWire<'a> {
    id: u64,
    name: &'a str,
    address: &'a str,
    request_text: &'a str,
    category: Category,
    tags: &'a TagSet,
    priority_score: u8,
    created_at: String,
}

impl Serialize for StoredRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoredRequestWire {
            id: self.id,
            name: &self.requester_name,
            address: &self.address,
            request_text: &self.request_text,
            category: self.triage.category,
            tags: &self.triage.tags,
            priority_score: self.triage.priority,
            created_at: self
                .created_at
                .to_rfc3339_opts(SecondsFormat::Micros, true),
        }
        .serialize(serializer)
    }
}

/// 存储统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub urgent: usize,
}

#[derive(Debug)]
struct StoreInner {
    next_id: u64,
    records: Vec<StoredRequest>,
}

/// 请求存储：进程启动时创建一次，通过 Arc 共享给接入层
#[derive(Debug)]
pub struct RequestStore {
    inner: RwLock<StoreInner>,
    anonymous_name: String,
}

impl Default for RequestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStore {
    pub fn new() -> Self {
        Self::with_anonymous_name(DEFAULT_ANONYMOUS_NAME)
    }

    pub fn with_anonymous_name(anonymous_name: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                next_id: 1,
                records: Vec::new(),
            }),
            anonymous_name: anonymous_name.into(),
        }
    }

    /// 校验并追加，返回带 id 与创建时间的记录
    pub async fn append(
        &self,
        submission: NewRequest,
        triage: TriageResult,
    ) -> Result<StoredRequest, StoreError> {
        submission.validate()?;

        let requester_name = submission
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.anonymous_name.as_str())
            .to_string();
        let address = submission.address.trim().to_string();
        let request_text = submission.request_text.trim().to_string();

        let mut inner = self.inner.write().await;
        let record = StoredRequest {
            id: inner.next_id,
            requester_name,
            address,
            request_text,
            triage,
            created_at: Utc::now(),
        };
        inner.next_id += 1;
        inner.records.push(record.clone());
        drop(inner);

        tracing::info!(
            "Stored request #{} ({}, priority {})",
            record.id,
            record.triage.category,
            record.triage.priority
        );
        Ok(record)
    }

    /// 按追加顺序返回全部记录的快照
    pub async fn list_all(&self) -> Vec<StoredRequest> {
        self.inner.read().await.records.clone()
    }

    pub async fn get(&self, id: u64) -> Option<StoredRequest> {
        let inner = self.inner.read().await;
        // id 从 1 开始连续分配，且只在成功追加时递增
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        inner.records.get(index).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> StoreStats {
        let inner = self.inner.read().await;
        let mut by_category: BTreeMap<Category, usize> =
            Category::ALL.into_iter().map(|c| (c, 0)).collect();
        let mut urgent = 0;
        for record in &inner.records {
            *by_category.entry(record.triage.category).or_default() += 1;
            if record.triage.is_urgent() {
                urgent += 1;
            }
        }
        StoreStats {
            total: inner.records.len(),
            by_category,
            urgent,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    fn triage_for(text: &str) -> TriageResult {
        TriageResult::derived("t", Category::Food, 40, text)
    }

    async fn append_ok(store: &RequestStore, name: Option<&str>, text: &str) -> StoredRequest {
        store
            .append(NewRequest::new(name, "12 Elm St", text), triage_for(text))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let store = RequestStore::new();
        let a = append_ok(&store, Some("Ana"), "need food").await;
        let b = append_ok(&store, None, "need more food").await;
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(b.created_at >= a.created_at);
    }

    #[tokio::test]
    async fn test_fields_are_trimmed_and_name_defaulted() {
        let store = RequestStore::new();
        let record = store
            .append(
                NewRequest::new(Some("   "), "  4 Oak Ave ", "\n  need a tent  \t"),
                triage_for("need a tent"),
            )
            .await
            .unwrap();
        assert_eq!(record.requester_name, "Anonymous");
        assert_eq!(record.address, "4 Oak Ave");
        assert_eq!(record.request_text, "need a tent");

        let record = append_ok(&store, Some(" Bo "), "x").await;
        assert_eq!(record.requester_name, "Bo");
    }

    #[tokio::test]
    async fn test_custom_anonymous_name() {
        let store = RequestStore::with_anonymous_name("Unknown");
        let record = append_ok(&store, None, "water").await;
        assert_eq!(record.requester_name, "Unknown");
    }

    #[tokio::test]
    async fn test_validation_does_not_consume_id() {
        let store = RequestStore::new();
        let err = store
            .append(NewRequest::new(None, " \t ", "need water"), triage_for("need water"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::empty("address")));

        let err = store
            .append(NewRequest::new(None, "1 Main St", "   "), triage_for(""))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Validation(ValidationError::empty("request_text"))
        );

        assert!(store.is_empty().await);
        assert_eq!(append_ok(&store, None, "need water").await.id, 1);
    }

    #[tokio::test]
    async fn test_list_all_is_an_ordered_snapshot() {
        let store = RequestStore::new();
        for i in 0..3 {
            append_ok(&store, None, &format!("request {i}")).await;
        }
        let snapshot = store.list_all().await;
        append_ok(&store, None, "request 3").await;

        assert_eq!(snapshot.len(), 3);
        let ids: Vec<u64> = snapshot.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(snapshot[2].request_text, "request 2");
        assert_eq!(store.list_all().await.len(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_never_collide() {
        const N: u64 = 200;
        let store = Arc::new(RequestStore::new());
        let handles: Vec<_> = (0..N)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .append(
                            NewRequest::new(None, "shelter 7", format!("req {i}")),
                            triage_for("x"),
                        )
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }
        assert_eq!(ids, (1..=N).collect::<HashSet<_>>());

        let listed: Vec<u64> = store.list_all().await.iter().map(|r| r.id).collect();
        assert_eq!(listed, (1..=N).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_get_and_stats() {
        let store = RequestStore::new();
        append_ok(&store, None, "bread").await;
        store
            .append(
                NewRequest::new(None, "2 Pine Rd", "insulin now"),
                TriageResult::derived("Insulin", Category::Medical, 90, "insulin now"),
            )
            .await
            .unwrap();

        assert_eq!(store.get(2).await.unwrap().triage.category, Category::Medical);
        assert!(store.get(0).await.is_none());
        assert!(store.get(3).await.is_none());

        let stats = store.stats().await;
        assert_eq!(stats.total, 2);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.by_category[&Category::Food], 1);
        assert_eq!(stats.by_category[&Category::Medical], 1);
        assert_eq!(stats.by_category[&Category::Water], 0);
    }

    #[tokio::test]
    async fn test_wire_format() {
        let store = RequestStore::new();
        let record = store
            .append(
                NewRequest::new(Some("Ana"), "12 Elm St", "We need water now"),
                TriageResult::derived("Water", Category::Water, 80, "We need water now"),
            )
            .await
            .unwrap();

        let value = serde_json::to_value(&record).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "address",
                "category",
                "created_at",
                "id",
                "name",
                "priority_score",
                "request_text",
                "tags"
            ]
        );
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Ana");
        assert_eq!(value["category"], "water");
        assert_eq!(value["tags"], serde_json::json!(["water", "urgent"]));
        assert_eq!(value["priority_score"], 80);
        let created_at = value["created_at"].as_str().unwrap();
        assert!(created_at.ends_with('Z'));
        assert_eq!(
            DateTime::parse_from_rfc3339(created_at).unwrap().timestamp_micros(),
            record.created_at.timestamp_micros()
        );
    }
}
