use hyper::Body as HyperBody;

use storefront::api::web::route_table;
use storefront::network::app_web_service;
use storefront::{WebApiListenCfg, WebApiRouteCfg};

use crate::{ut_setup_share_state, MockConfidential};

#[test]
fn web_service_all_routes_applied() {
    let shr_state = ut_setup_share_state("config_ok.json", Box::new(MockConfidential {}));
    let cfg = shr_state.config().clone();
    let rtable = route_table::<HyperBody>();
    let (_service, num_applied) =
        app_web_service::<HyperBody>(&cfg.api_server.listen, rtable, shr_state);
    assert_eq!(num_applied, 12u16);
}

#[test]
fn web_service_skips_unknown_handler_label() {
    let shr_state = ut_setup_share_state("config_ok.json", Box::new(MockConfidential {}));
    let listen = WebApiListenCfg {
        api_version: "0.2.1".to_string(),
        host: "localhost".to_string(),
        port: 8015,
        max_connections: 10,
        cors: "settings/cors.json".to_string(),
        routes: vec![
            WebApiRouteCfg {
                path: "/orders".to_string(),
                handler: "create_new_order".to_string(),
            },
            WebApiRouteCfg {
                path: "/bogus".to_string(),
                handler: "no_such_handler".to_string(),
            },
        ],
    };
    let rtable = route_table::<HyperBody>();
    let (_service, num_applied) = app_web_service::<HyperBody>(&listen, rtable, shr_state);
    assert_eq!(num_applied, 1u16);
}
