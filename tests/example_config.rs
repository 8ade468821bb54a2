//! The shipped example descriptor must load, validate and compile.

use hub_router::config::{parse_config, Interpolator};
use hub_router::middleware::Middleware;
use hub_router::routing::{Entrypoint, RuleTable};

const EXAMPLE: &str = include_str!("../router.example.toml");

fn platform_vars() -> Interpolator {
    Interpolator::default()
        .with_var("PARENT_DNS_DOMAIN", "example.com")
        .with_var(
            "SHARED_APP_HOST_RULE",
            "Host(`hub.example.com`) || Host(`ddns.example.com`)",
        )
        .with_var("SHARED_LAN_APP_HTTP_HOST_RULE", "Host(`lan.example.com`)")
        .with_var("SHARED_LAN_APP_HTTPS_HOST_RULE", "Host(`lan.example.com`)")
        .with_hub_defaults()
}

#[test]
fn example_descriptor_compiles_into_seven_rules() {
    let config = parse_config(EXAMPLE, &platform_vars()).expect("example must validate");
    assert_eq!(config.routes.len(), 7);
    assert_eq!(config.services.len(), 1);

    let table = RuleTable::from_config(&config.routes, &config.middlewares)
        .expect("example must compile");
    assert_eq!(table.rules().len(), 7);

    // Hostname rule, public HTTPS.
    let rule = table
        .find(Entrypoint::Websecure, "www.example.com", "/index.html")
        .unwrap();
    assert_eq!(rule.id, "www-https-public");

    // Shared-path rule on the injected host expression.
    let rule = table
        .find(Entrypoint::Web, "hub.example.com", "/www/index.html")
        .unwrap();
    assert_eq!(rule.id, "www-path-public");
    assert!(matches!(
        rule.middlewares[0],
        Middleware::StripPrefix { ref prefix } if prefix == "/www"
    ));

    // LAN HTTP path rule is distinct from the LAN HTTPS one.
    let rule = table
        .find(Entrypoint::Lanweb, "lan.example.com", "/www/a.css")
        .unwrap();
    assert_eq!(rule.id, "www-path-lan-http");
}

#[test]
fn subdomain_variable_renames_hostname_and_prefix() {
    let interp = Interpolator::default()
        .with_var("PARENT_DNS_DOMAIN", "example.com")
        .with_var("SUBDOMAIN", "site")
        .with_var("SHARED_APP_HOST_RULE", "Host(`hub.example.com`)")
        .with_var("SHARED_LAN_APP_HTTP_HOST_RULE", "Host(`lan.example.com`)")
        .with_var("SHARED_LAN_APP_HTTPS_HOST_RULE", "Host(`lan.example.com`)")
        .with_hub_defaults();

    let config = parse_config(EXAMPLE, &interp).expect("example must validate");
    assert_eq!(
        config.routes[0].host.as_deref(),
        Some("site.example.com"),
        "hostname label must follow SUBDOMAIN"
    );
    let path_rule = config.routes.iter().find(|r| r.id == "www-path-public").unwrap();
    assert_eq!(path_rule.path_prefix.as_deref(), Some("/site"));
}
