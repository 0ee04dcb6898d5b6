mod adapter;
mod config;
mod network;
mod repository;
mod usecase;

use std::boxed::Box;
use std::result::Result as DefaultResult;

use storefront::confidentiality::AbstractConfidentiality;
use storefront::error::AppError;
use storefront::logging::AppLogContext;
use storefront::{AppBasepathCfg, AppConfig, AppSharedState};

pub(crate) const EXAMPLE_REL_PATH: &str = "/tests/unit/examples/";

pub(crate) fn ut_setup_share_state(
    cfg_fname: &str,
    cfdntl: Box<dyn AbstractConfidentiality>,
) -> AppSharedState {
    let service_basepath = env!("CARGO_MANIFEST_DIR").to_string();
    let fullpath = service_basepath.clone() + EXAMPLE_REL_PATH + cfg_fname;
    let cfg = AppConfig {
        api_server: AppConfig::parse_from_file(fullpath).unwrap(),
        basepath: AppBasepathCfg {
            system: service_basepath.clone(),
            service: service_basepath,
        },
    };
    let logctx = AppLogContext::new(&cfg.basepath, &cfg.api_server.logging);
    AppSharedState::new(cfg, logctx, cfdntl)
}

pub(crate) struct MockConfidential {}
impl AbstractConfidentiality for MockConfidential {
    fn try_get_payload(&self, _id: &str) -> DefaultResult<String, AppError> {
        Ok("unit-test".to_string())
    }
}
