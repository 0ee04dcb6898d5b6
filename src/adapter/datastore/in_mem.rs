use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::AppInMemoryDbCfg;
use crate::error::{AppError, AppErrorCode};

// simple implementation of in-memory data storage, the design here is
// analogous to a document store :
// - a table is a set of rows addressed by caller-maintained key strings,
// - application callers are responsible to maintain the layout of each row,
//   every element of a row is stringified regardless of its original type
//   (integer, decimal number, timestamp ... etc)
pub type AppInMemFetchedSingleRow = Vec<String>;
pub type AppInMemFetchedSingleTable = HashMap<String, AppInMemFetchedSingleRow>;
type AllTable = HashMap<String, AppInMemFetchedSingleTable>;
pub type AppInMemUpdateData = AllTable;
pub type AppInMemDeleteInfo = HashMap<String, Vec<String>>; // list of IDs per table
pub type AppInMemFetchKeys = HashMap<String, Vec<String>>; // list of IDs per table
pub type AppInMemFetchedData = AllTable;

// callers can scan a whole table with a custom key/row predicate, this is
// the only way to address rows without knowing their keys in advance
pub trait AbsDStoreFilterKeyOp: Sync + Send {
    fn filter(&self, key: &String, row: &AppInMemFetchedSingleRow) -> bool;
}

// opaque guard returned by `fetch_acquire()`, callers give it back through
// `save_release()`, so one read-modify-write cycle runs without interleaving
// writes from other tasks
pub struct AppInMemDstoreLock {
    guard: OwnedMutexGuard<AllTable>,
}

#[async_trait]
pub trait AbstInMemoryDStore: Sync + Send {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError>;
    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError>;
    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError>;
    async fn fetch(&self, keys: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError>;
    async fn filter_keys(
        &self,
        table: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError>;
    async fn fetch_acquire(
        &self,
        keys: AppInMemFetchKeys,
    ) -> DefaultResult<(AppInMemFetchedData, AppInMemDstoreLock), AppError>;
    fn save_release(
        &self,
        data: AppInMemUpdateData,
        lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError>;
}

pub struct AppInMemoryDStore {
    max_items_per_table: u32,
    table_map: Arc<Mutex<AllTable>>,
}

impl AppInMemoryDStore {
    pub fn new(cfg: &AppInMemoryDbCfg) -> Self {
        let t_map = HashMap::new();
        let t_map = Arc::new(Mutex::new(t_map));
        Self {
            table_map: t_map,
            max_items_per_table: cfg.max_items,
        }
    }

    fn _check_capacity(&self, _map: &AllTable) -> DefaultResult<(), AppError> {
        let mut invalid = _map
            .iter()
            .filter(|(_, table)| self.max_items_per_table as usize <= table.len());
        if let Some((label, _)) = invalid.next() {
            let msg = format!("{}, {}", module_path!(), label);
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::ExceedingMaxLimit,
            })
        } else {
            Ok(())
        }
    }

    fn _check_table_existence(_map: &AllTable, keys: Vec<&String>) -> DefaultResult<(), AppError> {
        let mut invalid = keys.iter().filter(|label| !_map.contains_key(label.as_str()));
        if let Some(d) = invalid.next() {
            Err(AppError {
                detail: Some(d.to_string()),
                code: AppErrorCode::DataTableNotExist,
            })
        } else {
            Ok(())
        }
    }

    fn _write_rows(&self, _map: &mut AllTable, data: AppInMemUpdateData) -> DefaultResult<usize, AppError> {
        let unchecked_labels = data.keys().collect::<Vec<&String>>();
        Self::_check_table_existence(_map, unchecked_labels)?;
        self._check_capacity(_map)?;
        let tot_cnt = data
            .into_iter()
            .map(|(label, d_grp)| {
                let table = _map.get_mut(label.as_str()).unwrap();
                d_grp
                    .into_iter()
                    .map(|(id, row)| {
                        table.insert(id, row);
                    })
                    .count()
            })
            .sum();
        self._check_capacity(_map)?;
        Ok(tot_cnt)
    }

    fn _read_rows(_map: &AllTable, keys: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError> {
        let unchecked_labels = keys.keys().collect::<Vec<&String>>();
        Self::_check_table_existence(_map, unchecked_labels)?;
        let rs_a = keys
            .iter()
            .map(|(label, ids)| {
                let table = _map.get(label.as_str()).unwrap();
                let rs_t = ids
                    .iter()
                    .filter(|id| table.contains_key(id.as_str()))
                    .map(|id| {
                        let row = table.get(id).unwrap();
                        (id.clone(), row.clone())
                    })
                    .collect::<AppInMemFetchedSingleTable>();
                (label.clone(), rs_t)
            })
            .collect::<Vec<(String, AppInMemFetchedSingleTable)>>();
        let rs_a = HashMap::from_iter(rs_a);
        Ok(rs_a)
    }
} // end of impl AppInMemoryDStore

#[async_trait]
impl AbstInMemoryDStore for AppInMemoryDStore {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError> {
        let mut _map = self.table_map.lock().await;
        if !_map.contains_key(label) {
            let newtable = HashMap::new();
            _map.insert(label.to_string(), newtable);
        }
        Ok(())
    }

    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError> {
        let mut _map = self.table_map.lock().await;
        self._write_rows(&mut _map, data)
    }

    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError> {
        let mut _map = self.table_map.lock().await;
        let unchecked_labels = info.keys().collect::<Vec<&String>>();
        Self::_check_table_existence(&_map, unchecked_labels)?;
        let tot_cnt = info
            .iter()
            .map(|(label, ids)| {
                let table = _map.get_mut(label.as_str()).unwrap();
                ids.iter()
                    .filter(|id| table.remove(id.as_str()).is_some())
                    .count()
            })
            .sum();
        Ok(tot_cnt)
    }

    async fn fetch(&self, keys: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError> {
        let _map = self.table_map.lock().await;
        Self::_read_rows(&_map, keys)
    }

    async fn filter_keys(
        &self,
        table: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError> {
        let _map = self.table_map.lock().await;
        Self::_check_table_existence(&_map, vec![&table])?;
        let inner = _map.get(table.as_str()).unwrap();
        let out = inner
            .iter()
            .filter(|(key, row)| op.filter(key, row))
            .map(|(key, _row)| key.clone())
            .collect();
        Ok(out)
    }

    async fn fetch_acquire(
        &self,
        keys: AppInMemFetchKeys,
    ) -> DefaultResult<(AppInMemFetchedData, AppInMemDstoreLock), AppError> {
        let guard = self.table_map.clone().lock_owned().await;
        let data = Self::_read_rows(&guard, keys)?;
        Ok((data, AppInMemDstoreLock { guard }))
    }

    fn save_release(
        &self,
        data: AppInMemUpdateData,
        lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError> {
        let mut lock = lock;
        let num = self._write_rows(&mut lock.guard, data)?;
        drop(lock); // the table lock is released at here
        Ok(num)
    }
} // end of impl AbstInMemoryDStore for AppInMemoryDStore
