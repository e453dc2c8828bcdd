use crate::harness::{actor, oracle, storefront};
use shopcheck_core::{ActorProfile, ApplicationState, CartAction, PageFacet, Scenario};

#[test]
fn test_concrete_end_to_end() {
    let (shop, config) = storefront();
    let oracle = oracle(&config);
    let profile = ActorProfile::with_credentials("u1@example.com", "pw123");

    let mut ctx = actor("primary", &config);
    ctx.register_actor(&profile).unwrap();
    ctx.authenticate("u1@example.com", "pw123").unwrap();
    assert!(ctx.session().is_present());

    let added = ctx.fetch("/addToCart?productId=1").unwrap();
    assert!(added.destination().body.contains("CART 1"));
    assert_eq!(oracle.cart_state(added.destination()), ApplicationState::CartState(1));
    assert_eq!(shop.cart_quantity("u1@example.com", "1"), 1);

    let removed = ctx.fetch("/removeFromCart?productId=1").unwrap();
    assert!(removed.destination().body.contains("CART 0"));
    assert_eq!(oracle.cart_state(removed.destination()), ApplicationState::CartState(0));

    let mut anonymous = actor("anonymous", &config);
    let cart = anonymous.fetch_protected("/cart").unwrap();
    assert_eq!(cart.original.status, 302);
    assert!(cart.original.location().is_some());
    assert!(oracle.shows(PageFacet::RegistrationAffordance, cart.destination()));
}

#[test]
fn test_concrete_end_to_end_as_scenario() {
    let (_shop, config) = storefront();
    Scenario::new("u1_round_trip")
        .with_profile(ActorProfile::with_credentials("u1@example.com", "pw123"))
        .register()
        .login()
        .assert_session_present()
        .add_to_cart("1")
        .assert_body_contains("CART 1")
        .remove_from_cart("1")
        .assert_body_contains("CART 0")
        .as_actor("anonymous")
        .fetch_protected("/cart")
        .assert_redirected()
        .assert_shows(PageFacet::RegistrationAffordance)
        .run_against(&config)
        .unwrap();
}

#[test]
fn test_cart_count_moves_one_step_at_a_time() {
    let (_shop, config) = storefront();
    let oracle = oracle(&config);
    let profile = ActorProfile::generated();
    let mut ctx = actor("primary", &config);
    ctx.register_actor(&profile).unwrap();
    ctx.authenticate(&profile.email, &profile.password).unwrap();

    let mut counts = Vec::new();
    for action in [
        CartAction::Add,
        CartAction::Add,
        CartAction::Remove,
        CartAction::Remove,
    ] {
        let resolved = ctx.mutate_cart(action, "1").unwrap();
        assert_eq!(resolved.original.status, 302);
        assert_eq!(resolved.destination().status, 200);
        counts.push(oracle.cart_count(resolved.destination()));
    }
    assert_eq!(counts, vec![Some(1), Some(2), Some(1), Some(0)]);

    // Zero is observed, not assumed
    let page = ctx.last().unwrap().destination();
    assert_eq!(oracle.cart_state(page), ApplicationState::CartState(0));
    assert_eq!(oracle.classify(page), ApplicationState::Authenticated);
}

#[test]
fn test_cart_page_totals() {
    let (_shop, config) = storefront();
    Scenario::new("cart_totals")
        .register()
        .login()
        .add_to_cart("7")
        .fetch_protected("/cart")
        .assert_original_status(200)
        .assert_shows(PageFacet::CheckoutAffordance)
        .assert_hides(PageFacet::EmptyCartTotal)
        .remove_from_cart("7")
        .fetch_protected("/cart")
        .assert_shows(PageFacet::EmptyCartTotal)
        .run_against(&config)
        .unwrap();
}

#[test]
fn test_anonymous_cart_mutation_redirects_to_login() {
    let (shop, config) = storefront();
    let mut ctx = actor("anonymous", &config);
    let resolved = ctx.mutate_cart(CartAction::Add, "1").unwrap();
    assert_eq!(resolved.original.location(), Some("/loginForm"));
    assert_eq!(
        oracle(&config).classify(resolved.destination()),
        ApplicationState::Anonymous
    );
    assert_eq!(shop.active_sessions(), 0);
}

#[test]
fn test_carts_are_per_actor() {
    let (_shop, config) = storefront();
    Scenario::new("two_shoppers")
        .register()
        .login()
        .add_to_cart("1")
        .assert_cart_count(1)
        .as_actor("second")
        .register()
        .login()
        .fetch("/")
        .assert_cart_count(0)
        .as_primary()
        .fetch("/")
        .assert_cart_count(1)
        .run_against(&config)
        .unwrap();
}
