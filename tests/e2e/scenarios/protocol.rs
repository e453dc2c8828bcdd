use crate::harness::{actor, storefront};
use shopcheck_core::{
    ActorProfile, HarnessConfig, HarnessError, HttpRequest, HttpTransport, Transport,
};
use std::net::TcpListener;

#[test]
fn test_transport_returns_redirects_untouched() {
    let (_shop, config) = storefront();
    let transport = HttpTransport::new(&config.target).unwrap();
    let exchange = transport.send(&HttpRequest::get("/cart")).unwrap();
    assert_eq!(exchange.status, 302);
    assert_eq!(exchange.header("location"), Some("/loginForm"));
    assert!(exchange.body.is_empty());
}

#[test]
fn test_missing_location_fails_the_step() {
    let (_shop, config) = storefront();
    let mut ctx = actor("primary", &config);
    let err = ctx.fetch("/broken-redirect").unwrap_err();
    match err {
        HarnessError::MissingLocation { status, path, .. } => {
            assert_eq!(status, 302);
            assert_eq!(path, "/broken-redirect");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_only_one_redirect_is_followed() {
    let (shop, config) = storefront();
    let mut ctx = actor("primary", &config);
    let resolved = ctx.fetch("/bounce").unwrap();

    let target = resolved.target.as_ref().expect("first hop resolved");
    assert_eq!(target.status, 302);
    assert_eq!(target.location(), Some("/"));

    let targets: Vec<_> = shop.requests().into_iter().map(|r| r.target).collect();
    assert_eq!(targets, vec!["/bounce", "/bounce-again"]);
}

#[test]
fn test_session_cookie_only_after_login() {
    let (shop, config) = storefront();
    let profile = ActorProfile::generated();
    let mut ctx = actor("primary", &config);
    ctx.fetch("/").unwrap();
    ctx.register_actor(&profile).unwrap();
    ctx.authenticate(&profile.email, &profile.password).unwrap();
    ctx.fetch_protected("/cart").unwrap();
    let token = ctx.session().token().unwrap().as_str().to_string();

    let seen: Vec<_> = shop
        .requests()
        .into_iter()
        .map(|r| (r.method, r.target, r.session))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("GET".to_string(), "/".to_string(), None),
            ("POST".to_string(), "/register".to_string(), None),
            ("POST".to_string(), "/login".to_string(), None),
            // The landing page already carries the new token
            ("GET".to_string(), "/".to_string(), Some(token.clone())),
            ("GET".to_string(), "/cart".to_string(), Some(token)),
        ]
    );
}

#[test]
fn test_connection_refused_is_a_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut config = HarnessConfig::default();
    config.target.base_url = format!("http://127.0.0.1:{}/", port);
    config.target.timeout_ms = 2_000;

    let mut ctx = actor("primary", &config);
    let err = ctx.fetch("/").unwrap_err();
    assert!(matches!(err, HarnessError::Transport { ref path, .. } if path == "/"));
    assert!(err.recovery_suggestion().is_some());
    assert!(ctx.last().is_none());
}

#[test]
fn test_silent_server_times_out() {
    // Accepts connections at the socket level but never answers
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let mut config = HarnessConfig::default();
    config.target.base_url = format!("http://{}/", listener.local_addr().unwrap());
    config.target.timeout_ms = 300;

    let mut ctx = actor("primary", &config);
    let err = ctx.fetch("/").unwrap_err();
    assert!(matches!(err, HarnessError::Transport { .. }), "{err:?}");
    drop(listener);
}

#[test]
fn test_storefront_answers_unknown_routes_with_html_404() {
    let (shop, config) = storefront();
    let transport = HttpTransport::new(&config.target).unwrap();
    let exchange = transport.send(&HttpRequest::get("/checkout")).unwrap();
    assert_eq!(exchange.status, 404);
    assert!(exchange
        .header("content-type")
        .is_some_and(|value| value.starts_with("text/html")));
    assert!(exchange.body.contains("Not Found"));
    assert_eq!(shop.requests()[0].target, "/checkout");
}
