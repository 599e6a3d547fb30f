//! 通用内存表
//!
//! 通用仓库契约（`repository::Record`）的内存实现：
//! `RwLock<Rows<T>>` 上的按 id 自增存储。`BTreeMap` 保证 list 的
//! 自然 id 顺序。`read`/`write` 闭包把一段查改序列收拢到同一把锁内，
//! 对应请求级事务：一次性认领、幂等翻转、批量删除都在单个写临界区
//! 内完成比较与落库。

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::models::Page;
use crate::repository::Record;

/// 表内容：行与下一个自增 id。
pub struct Rows<T: Record> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T: Record> Rows<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// 按主键查找。
    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    /// 返回命中谓词的全部行。
    pub fn find(&self, filter: &T::Filter) -> Vec<T> {
        self.rows
            .values()
            .filter(|row| row.matches(filter))
            .cloned()
            .collect()
    }

    /// 返回命中谓词的第一行；唯一谓词下至多一条。
    pub fn find_one(&self, filter: &T::Filter) -> Option<&T> {
        self.rows.values().find(|row| row.matches(filter))
    }

    /// 分配自增 id 并插入构造出的行。
    pub fn insert(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    /// 原地修改并返回更新后的快照；不存在返回 None。
    pub fn update(&mut self, id: i64, apply: impl FnOnce(&mut T)) -> Option<T> {
        let row = self.rows.get_mut(&id)?;
        apply(row);
        Some(row.clone())
    }

    /// 删除并返回被删行；不存在返回 None。
    pub fn remove(&mut self, id: i64) -> Option<T> {
        self.rows.remove(&id)
    }

    /// 删除同时命中 id 集与 `owned` 谓词的行，返回实际删除条数。
    pub fn remove_owned(&mut self, ids: &[i64], owned: impl Fn(&T) -> bool) -> usize {
        let mut deleted = 0;
        for id in ids {
            if self.rows.get(id).is_some_and(&owned) {
                self.rows.remove(id);
                deleted += 1;
            }
        }
        deleted
    }

    /// 按 id 顺序分页。
    pub fn list(&self, page: Page) -> Vec<T> {
        self.rows
            .values()
            .skip(page.offset.max(0) as usize)
            .take(page.limit.max(0) as usize)
            .cloned()
            .collect()
    }
}

/// 线程安全的通用内存表。
pub struct Table<T: Record> {
    inner: RwLock<Rows<T>>,
}

impl<T: Record> Table<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows::new()),
        }
    }

    /// 在读临界区内执行闭包。
    pub fn read<R>(&self, f: impl FnOnce(&Rows<T>) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// 在写临界区内执行闭包；比较与落库在同一把锁内完成。
    pub fn write<R>(&self, f: impl FnOnce(&mut Rows<T>) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn get(&self, id: i64) -> Option<T> {
        self.read(|rows| rows.get(id).cloned())
    }

    pub fn find(&self, filter: &T::Filter) -> Vec<T> {
        self.read(|rows| rows.find(filter))
    }

    pub fn find_one(&self, filter: &T::Filter) -> Option<T> {
        self.read(|rows| rows.find_one(filter).cloned())
    }

    pub fn insert(&self, build: impl FnOnce(i64) -> T) -> T {
        self.write(|rows| rows.insert(build))
    }

    pub fn update(&self, id: i64, apply: impl FnOnce(&mut T)) -> Option<T> {
        self.write(|rows| rows.update(id, apply))
    }

    pub fn remove(&self, id: i64) -> Option<T> {
        self.write(|rows| rows.remove(id))
    }

    pub fn list(&self, page: Page) -> Vec<T> {
        self.read(|rows| rows.list(page))
    }
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}
