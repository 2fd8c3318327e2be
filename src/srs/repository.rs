use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{MIN_EASE, SNAPSHOT_VERSION};
use crate::validation::validate_item;

use super::item::StudyItem;
use super::scheduler;
use super::types::{MasteryLevel, MasteryStats, Quality, SchedulingState};
use super::SrsError;

/// 条目及其调度状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedItem<T> {
    pub item: T,
    pub schedule: SchedulingState,
}

impl<T: StudyItem> TrackedItem<T> {
    pub fn id(&self) -> &str {
        self.item.id()
    }

    pub fn mastery(&self) -> MasteryLevel {
        self.schedule.mastery()
    }
}

/// 扁平、带版本号的仓库快照，原样写入外部键值存储
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySnapshot<T> {
    pub version: u32,
    pub items: Vec<TrackedItem<T>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryEvent {
    Inserted { id: String },
    /// 一次批量导入，只统计新增数量
    Ingested { inserted: usize },
    Reviewed { id: String, quality: Quality },
    Removed { id: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub inserted: usize,
    pub already_present: usize,
    pub rejected: Vec<SrsError>,
}

type ChangeHook<T> = Box<dyn FnMut(&RepositoryEvent, &ItemRepository<T>)>;

/// 内存中的条目仓库（按 ID 排序）。调度状态只能通过 [`ItemRepository::review`] 修改。
pub struct ItemRepository<T> {
    items: BTreeMap<String, TrackedItem<T>>,
    hook: Option<ChangeHook<T>>,
}

impl<T> Default for ItemRepository<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            hook: None,
        }
    }
}

impl<T> fmt::Debug for ItemRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRepository")
            .field("len", &self.items.len())
            .field("has_change_hook", &self.hook.is_some())
            .finish()
    }
}

impl<T: StudyItem> ItemRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册变更回调（序列化、持久化等边界逻辑在此接入）
    pub fn on_change<F>(&mut self, hook: F)
    where
        F: FnMut(&RepositoryEvent, &ItemRepository<T>) + 'static,
    {
        self.hook = Some(Box::new(hook));
    }

    pub fn clear_change_hook(&mut self) {
        self.hook = None;
    }

    fn emit(&mut self, event: RepositoryEvent) {
        if let Some(mut hook) = self.hook.take() {
            hook(&event, self);
            self.hook = Some(hook);
        }
    }

    /// 插入但不触发回调；已存在的 ID 直接返回 `Ok(false)`，不再校验内容
    fn insert(&mut self, item: T, today: NaiveDate) -> Result<bool, SrsError> {
        if self.items.contains_key(item.id()) {
            tracing::debug!(item_id = item.id(), "Item already present, keeping schedule");
            return Ok(false);
        }
        validate_item(&item).map_err(|reason| SrsError::InvalidItem {
            id: item.id().to_string(),
            reason: reason.to_string(),
        })?;

        self.items.insert(
            item.id().to_string(),
            TrackedItem {
                item,
                schedule: SchedulingState::new(today),
            },
        );
        Ok(true)
    }

    /// 添加单个条目。已存在的 ID 不做任何修改并返回 `Ok(false)`。
    pub fn add_item(&mut self, item: T, today: NaiveDate) -> Result<bool, SrsError> {
        let id = item.id().to_string();
        let inserted = self.insert(item, today)?;
        if inserted {
            self.emit(RepositoryEvent::Inserted { id });
        }
        Ok(inserted)
    }

    /// 批量导入，对每个 ID 幂等；非法条目记录在报告里并继续处理其余条目。
    /// 整批只触发一次 `Ingested` 回调（没有新条目时不触发）。
    pub fn add_items<I>(&mut self, items: I, today: NaiveDate) -> IngestReport
    where
        I: IntoIterator<Item = T>,
    {
        let mut report = IngestReport::default();
        for item in items {
            match self.insert(item, today) {
                Ok(true) => report.inserted += 1,
                Ok(false) => report.already_present += 1,
                Err(err) => {
                    tracing::warn!(error = %err, "Rejected item during bulk ingestion");
                    report.rejected.push(err);
                }
            }
        }
        tracing::info!(
            inserted = report.inserted,
            already_present = report.already_present,
            rejected = report.rejected.len(),
            "Bulk ingestion finished"
        );
        if report.inserted > 0 {
            self.emit(RepositoryEvent::Ingested {
                inserted: report.inserted,
            });
        }
        report
    }

    pub fn remove(&mut self, id: &str) -> Option<TrackedItem<T>> {
        let removed = self.items.remove(id)?;
        self.emit(RepositoryEvent::Removed { id: id.to_string() });
        Some(removed)
    }

    /// 对单个条目应用一次复习并写回
    pub fn review(
        &mut self,
        id: &str,
        quality: Quality,
        today: NaiveDate,
    ) -> Result<SchedulingState, SrsError> {
        let Some(tracked) = self.items.get_mut(id) else {
            tracing::warn!(item_id = id, "Review requested for unknown item");
            return Err(SrsError::UnknownItemId(id.to_string()));
        };

        let next = scheduler::review(&tracked.schedule, quality, today);
        tracing::debug!(
            item_id = id,
            quality = quality.value(),
            interval = next.interval,
            repetitions = next.repetitions,
            ease = next.ease,
            "Item reviewed"
        );
        tracked.schedule = next.clone();
        self.emit(RepositoryEvent::Reviewed {
            id: id.to_string(),
            quality,
        });
        Ok(next)
    }

    pub fn get(&self, id: &str) -> Option<&TrackedItem<T>> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 按 ID 升序遍历
    pub fn iter(&self) -> impl Iterator<Item = &TrackedItem<T>> {
        self.items.values()
    }

    /// 到期条目：最早到期的在前，同一天按 ID 排序
    pub fn due(&self, today: NaiveDate) -> Vec<&TrackedItem<T>> {
        let mut due: Vec<&TrackedItem<T>> = self
            .items
            .values()
            .filter(|tracked| tracked.schedule.is_due(today))
            .collect();
        // 稳定排序，保留 BTreeMap 的 ID 顺序作为次序
        due.sort_by_key(|tracked| tracked.schedule.next_review_date);
        due
    }

    pub fn mastery_stats(&self, today: NaiveDate) -> MasteryStats {
        MasteryStats::from_states(self.items.values().map(|t| &t.schedule), today)
    }

    pub fn snapshot(&self) -> RepositorySnapshot<T>
    where
        T: Clone,
    {
        RepositorySnapshot {
            version: SNAPSHOT_VERSION,
            items: self.items.values().cloned().collect(),
        }
    }

    /// 从快照原样恢复；版本不符、ID 重复或状态违反不变量时拒绝
    pub fn from_snapshot(snapshot: RepositorySnapshot<T>) -> Result<Self, SrsError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SrsError::UnsupportedSnapshotVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let mut items = BTreeMap::new();
        for tracked in snapshot.items {
            let id = tracked.id().to_string();
            validate_item(&tracked.item).map_err(|reason| SrsError::InvalidItem {
                id: id.clone(),
                reason: reason.to_string(),
            })?;
            check_schedule(&id, &tracked.schedule)?;
            if items.insert(id.clone(), tracked).is_some() {
                return Err(SrsError::DuplicateItemId(id));
            }
        }

        tracing::info!(items = items.len(), "Repository restored from snapshot");
        Ok(Self { items, hook: None })
    }
}

fn check_schedule(id: &str, schedule: &SchedulingState) -> Result<(), SrsError> {
    let reason = if !schedule.ease.is_finite() || schedule.ease < MIN_EASE {
        "ease below floor"
    } else if schedule.repetitions == 0 && schedule.interval > 1 {
        "interval too long for zero repetitions"
    } else {
        return Ok(());
    };
    Err(SrsError::InvalidItem {
        id: id.to_string(),
        reason: reason.to_string(),
    })
}
