use std::collections::HashMap;

use storefront::constant::{
    ENV_VAR_CONFIG_FILE_PATH, ENV_VAR_SERVICE_BASE_PATH, ENV_VAR_SYS_BASE_PATH,
};
use storefront::error::AppErrorCode;
use storefront::{AppConfig, AppDataStoreCfg};

use crate::EXAMPLE_REL_PATH;

fn ut_example_fullpath(cfg_fname: &str) -> String {
    env!("CARGO_MANIFEST_DIR").to_string() + EXAMPLE_REL_PATH + cfg_fname
}

#[test]
fn cfg_extract_arg_ok() {
    let args = [
        (
            ENV_VAR_CONFIG_FILE_PATH.to_string(),
            "relative/to/mycfg.json".to_string(),
        ),
        (ENV_VAR_SYS_BASE_PATH.to_string(), "/path/sys".to_string()),
        (
            ENV_VAR_SERVICE_BASE_PATH.to_string(),
            "/path/service".to_string(),
        ),
    ];
    let args = HashMap::from(args);
    let result = AppConfig::new(args);
    assert!(result.is_err());
    let err = result.err().unwrap();
    // it is normal to get File Not Found error, the paths are not real
    assert_eq!(
        err.code,
        AppErrorCode::IOerror(std::io::ErrorKind::NotFound)
    );
}

#[test]
fn cfg_extract_arg_missing_sys_path() {
    let args = [];
    let args = HashMap::from(args);
    let result = AppConfig::new(args);
    assert!(result.is_err());
    let err = result.err().unwrap();
    assert_eq!(err.code, AppErrorCode::MissingSysBasePath);
}

#[test]
fn cfg_extract_arg_missing_service_path() {
    let args = [(ENV_VAR_SYS_BASE_PATH.to_string(), "/path/sys".to_string())];
    let args = HashMap::from(args);
    let result = AppConfig::new(args);
    assert!(result.is_err());
    let err = result.err().unwrap();
    assert_eq!(err.code, AppErrorCode::MissingAppBasePath);
}

#[test]
fn parse_ext_cfg_file_ok() {
    let result = AppConfig::parse_from_file(ut_example_fullpath("config_ok.json"));
    assert!(result.is_ok());
    let actual = result.unwrap();
    assert!(!actual.listen.api_version.is_empty());
    assert!(!actual.listen.host.is_empty());
    assert!(actual.listen.port > 0);
    assert_eq!(actual.listen.routes.len(), 12);
    assert!(!actual.logging.handlers.is_empty());
    assert!(!actual.logging.loggers.is_empty());
    assert!(actual.stack_sz_kb > 0);
    for route in actual.listen.routes.iter() {
        assert!(!route.path.is_empty());
        assert!(!route.handler.is_empty());
    }
    let num_inmem = actual
        .data_store
        .iter()
        .filter(|d| matches!(d, AppDataStoreCfg::InMemory(_)))
        .count();
    assert_eq!(num_inmem, 1);
}

#[test]
fn parse_ext_cfg_file_missing_logging() {
    let result = AppConfig::parse_from_file(ut_example_fullpath("config_missing_logging.json"));
    assert!(result.is_err());
    let err = result.err().unwrap();
    assert_eq!(err.code, AppErrorCode::InvalidJsonFormat);
}

#[test]
fn parse_ext_cfg_file_no_routes() {
    let result = AppConfig::parse_from_file(ut_example_fullpath("config_no_routes.json"));
    assert!(result.is_err());
    let err = result.err().unwrap();
    assert_eq!(err.code, AppErrorCode::NoRouteApiServerCfg);
}

#[test]
fn parse_ext_cfg_file_dstore_overlimit() {
    let result = AppConfig::parse_from_file(ut_example_fullpath("config_dstore_overlimit.json"));
    assert!(result.is_err());
    let err = result.err().unwrap();
    assert_eq!(err.code, AppErrorCode::ExceedingMaxLimit);
}
