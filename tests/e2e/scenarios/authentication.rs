use crate::harness::{actor, oracle, storefront};
use shopcheck_core::{ActorProfile, ApplicationState, PageFacet, Scenario, WRONG_PASSWORD};

#[test]
fn test_login_after_registration_holds_token() {
    let (shop, config) = storefront();
    let profile = ActorProfile::generated();
    let mut ctx = actor("primary", &config);

    let registered = ctx.register_actor(&profile).unwrap();
    assert!([200, 302].contains(&registered.original.status));
    assert!(shop.is_registered(&profile.email));

    let login = ctx.authenticate(&profile.email, &profile.password).unwrap();
    assert_eq!(login.original.status, 302);
    assert!(login.original.location().is_some());
    assert!(login.was_redirected());

    let token = ctx.session().token().expect("token after login");
    assert!(!token.as_str().is_empty());
    assert_eq!(shop.active_sessions(), 1);

    let landing = ctx.last().unwrap().destination();
    assert_eq!(
        oracle(&config).classify_login_attempt(landing, ctx.session().is_present()),
        ApplicationState::Authenticated
    );
}

#[test]
fn test_wrong_password_is_never_authenticated() {
    let (shop, config) = storefront();
    let profile = ActorProfile::generated();
    let mut ctx = actor("primary", &config);
    ctx.register_actor(&profile).unwrap();

    let login = ctx.authenticate(&profile.email, WRONG_PASSWORD).unwrap();
    assert_eq!(login.original.status, 302);
    let body = &login.destination().body;
    assert!(!(body.contains("Sign Out") && body.contains("Welcome")));

    assert!(!ctx.session().is_present());
    assert_eq!(shop.active_sessions(), 0);

    let oracle = oracle(&config);
    let landing = ctx.last().unwrap().destination();
    assert_eq!(oracle.classify(landing), ApplicationState::AuthenticationFailed);
    assert_eq!(
        oracle.classify_login_attempt(landing, ctx.session().is_present()),
        ApplicationState::AuthenticationFailed
    );
}

#[test]
fn test_unregistered_email_is_rejected() {
    let (_shop, config) = storefront();
    Scenario::new("unregistered")
        .login_as("nobody@example.com", "pw123")
        .assert_original_status(302)
        .assert_no_session()
        .assert_login_failed()
        .run_against(&config)
        .unwrap();
}

#[test]
fn test_profile_visible_after_login() {
    let (_shop, config) = storefront();
    let profile = ActorProfile::generated();
    let mut ctx = actor("primary", &config);
    ctx.register_actor(&profile).unwrap();
    ctx.authenticate(&profile.email, &profile.password).unwrap();

    let resolved = ctx.fetch_protected("/account/profile").unwrap();
    assert_eq!(resolved.original.status, 200);
    assert!(!resolved.was_redirected());

    let oracle = oracle(&config);
    let page = resolved.destination();
    assert!(oracle.shows(PageFacet::ProfileAffordances, page));
    assert_eq!(oracle.classify(page), ApplicationState::Authenticated);
}

#[test]
fn test_logout_drops_session_everywhere() {
    let (shop, config) = storefront();
    let profile = ActorProfile::generated();
    let mut ctx = actor("primary", &config);
    ctx.register_actor(&profile).unwrap();
    ctx.authenticate(&profile.email, &profile.password).unwrap();
    assert!(ctx.session().is_present());

    let logout = ctx.deauthenticate().unwrap();
    assert_eq!(logout.original.status, 302);
    assert!(!ctx.session().is_present());
    assert_eq!(shop.active_sessions(), 0);

    let oracle = oracle(&config);

    // Same actor, now without a token
    let again = ctx.fetch_protected("/account/profile").unwrap();
    assert_eq!(again.original.status, 302);
    assert_ne!(oracle.classify(again.destination()), ApplicationState::Authenticated);

    // A fresh actor never sees the old session
    let mut fresh = actor("fresh", &config);
    let resolved = fresh.fetch_protected("/account/profile").unwrap();
    assert_eq!(resolved.original.status, 302);
    assert_eq!(oracle.classify(resolved.destination()), ApplicationState::Anonymous);
}

#[test]
fn test_home_page_after_logout() {
    let (_shop, config) = storefront();
    Scenario::new("home_after_logout")
        .register()
        .login()
        .fetch("/")
        .assert_shows(PageFacet::UserMenu)
        .logout()
        .fetch("/")
        .assert_shows(PageFacet::SignInAffordance)
        .assert_hides(PageFacet::UserMenu)
        .assert_state(ApplicationState::Anonymous)
        .run_against(&config)
        .expect("home page should be anonymous after logout");
}
