mod edit_product;
mod manage_order;

use storefront::AppSharedState;

use crate::{ut_setup_share_state, MockConfidential};

pub(crate) fn ut_usecase_shared_state() -> AppSharedState {
    ut_setup_share_state("config_ok.json", Box::new(MockConfidential {}))
}
