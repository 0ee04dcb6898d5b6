mod in_mem;

use std::boxed::Box;
use std::sync::Arc;

use storefront::datastore::{AbstInMemoryDStore, AppInMemoryDStore};
use storefront::AppInMemoryDbCfg;

pub(crate) fn ut_inmem_dstore(max_items: u32) -> Arc<Box<dyn AbstInMemoryDStore>> {
    let cfg = AppInMemoryDbCfg {
        alias: "unit-test-inmem".to_string(),
        max_items,
    };
    let obj: Box<dyn AbstInMemoryDStore> = Box::new(AppInMemoryDStore::new(&cfg));
    Arc::new(obj)
}
