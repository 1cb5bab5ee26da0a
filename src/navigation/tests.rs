use super::*;
use crate::app::{self, AppView};
use crate::guard::FnGuard;
use crate::history::{History, MemoryHistory};
use crate::route::RouteDef;
use crate::router::HistoryRouter;
use crate::session::{AuthState, MemoryStore, StoredSessionFlag};
use crate::RouterErrorKind;
use std::rc::Rc;

// =========================================================
// Shared fixtures
// =========================================================

const SESSION_KEY: &str = "isAuthenticated";

const PROTECTED: [&str; 8] = [
    "/bookshelf",
    "/upload",
    "/reader/42",
    "/dictionary/apple",
    "/vocabulary",
    "/review",
    "/user",
    "/search",
];

const PUBLIC: [&str; 6] = [
    "/",
    "/onboarding",
    "/login",
    "/register",
    "/forgot-password",
    "/settings",
];

fn navigator() -> Navigator<AppView> {
    app::navigator(&RouterConfig::default()).unwrap()
}

fn anonymous() -> GuardContext {
    GuardContext::new(AuthState::anonymous())
}

fn signed_in() -> GuardContext {
    GuardContext::new(AuthState::authenticated())
}

fn completed(outcome: NavigationOutcome<AppView>) -> Navigation<AppView> {
    match outcome {
        NavigationOutcome::Completed(navigation) => navigation,
        other => panic!("expected completed navigation, got {other:?}"),
    }
}

/// Router over an in-memory history whose session flag lives in a shared store
fn router_at(initial: &str) -> (HistoryRouter<AppView, MemoryHistory>, Rc<MemoryStore>) {
    let store = Rc::new(MemoryStore::new());
    let session = StoredSessionFlag::new(Rc::clone(&store), SESSION_KEY);
    let router = HistoryRouter::new(navigator(), MemoryHistory::new(initial), Rc::new(session));
    (router, store)
}

// =========================================================
// Guard properties
// =========================================================

#[test]
fn test_protected_routes_redirect_to_login_when_anonymous() {
    let nav = navigator();
    for path in PROTECTED {
        let navigation = completed(nav.navigate(path, None, &anonymous(), false).unwrap());
        assert_eq!(navigation.to.view(), Some(&AppView::Login), "{path}");
        assert_eq!(navigation.to.location().path(), "/login");
        assert_eq!(
            navigation.redirected_from.as_ref().map(Location::path),
            Some(Location::parse(path).unwrap().path())
        );
    }
}

#[test]
fn test_protected_routes_activate_when_signed_in() {
    let nav = navigator();
    for path in PROTECTED {
        let navigation = completed(nav.navigate(path, None, &signed_in(), false).unwrap());
        assert!(!navigation.was_redirected(), "{path}");
        assert!(navigation.to.requires_auth());
        assert_eq!(navigation.to.location().path(), path);
    }
}

#[test]
fn test_public_routes_ignore_session() {
    let nav = navigator();
    for path in PUBLIC {
        for ctx in [anonymous(), signed_in()] {
            let navigation = completed(nav.navigate(path, None, &ctx, false).unwrap());
            assert!(!navigation.was_redirected(), "{path}");
            assert_eq!(navigation.to.location().path(), path);
        }
    }
}

#[test]
fn test_unmatched_paths_redirect_to_root_regardless_of_session() {
    let nav = navigator();
    for path in ["/nope", "/reader", "/dictionary/apple/extra", "/a/b/c?x=1"] {
        for ctx in [anonymous(), signed_in()] {
            let navigation = completed(nav.navigate(path, None, &ctx, false).unwrap());
            assert_eq!(navigation.to.view(), Some(&AppView::Welcome), "{path}");
            assert_eq!(navigation.to.location().full_path(), "/");
            assert!(navigation.was_redirected());
        }
    }
}

#[test]
fn test_params_are_extracted() {
    let nav = navigator();
    let reader = completed(nav.navigate("/reader/42", None, &signed_in(), false).unwrap());
    assert_eq!(reader.to.param("id"), Some("42"));

    let word = completed(nav.navigate("/dictionary/apple", None, &signed_in(), false).unwrap());
    assert_eq!(word.to.param("word"), Some("apple"));
}

#[test]
fn test_repeated_anonymous_navigation_is_idempotent() {
    let nav = navigator();
    for _ in 0..3 {
        let navigation = completed(nav.navigate("/review", None, &anonymous(), false).unwrap());
        assert_eq!(navigation.to.location().path(), "/login");
    }
}

// =========================================================
// Engine behaviour
// =========================================================

#[test]
fn test_duplicate_navigation_is_reported() {
    let nav = navigator();
    let at_login = completed(nav.navigate("/login", None, &anonymous(), false).unwrap()).to;

    let outcome = nav.navigate("/login", Some(&at_login), &anonymous(), false).unwrap();
    assert!(matches!(outcome, NavigationOutcome::Duplicated));

    // redirected back onto the current page
    let outcome = nav.navigate("/bookshelf", Some(&at_login), &anonymous(), false).unwrap();
    assert!(matches!(outcome, NavigationOutcome::Duplicated));

    // forced navigation re-runs the guards
    let outcome = nav.navigate("/login", Some(&at_login), &anonymous(), true).unwrap();
    assert!(outcome.completed().is_some());
}

#[test]
fn test_abort_guard_keeps_current_route() {
    let nav = navigator().with_guard(FnGuard::new(
        "no_uploads",
        |to: &RouteMatch<AppView>, _: Option<&RouteMatch<AppView>>, _: &GuardContext| {
            if to.view() == Some(&AppView::Upload) {
                GuardDecision::Abort
            } else {
                GuardDecision::Proceed
            }
        },
    ));

    let outcome = nav.navigate("/upload", None, &signed_in(), false).unwrap();
    match outcome {
        NavigationOutcome::Aborted { guard } => assert_eq!(guard, "no_uploads"),
        other => panic!("expected abort, got {other:?}"),
    }

    // the auth guard runs first and wins
    let navigation = completed(nav.navigate("/upload", None, &anonymous(), false).unwrap());
    assert_eq!(navigation.to.view(), Some(&AppView::Login));
}

#[test]
fn test_redirect_cycle_is_an_error() {
    let table = RouteTable::builder()
        .route(RouteDef::redirect("/a", "/b"))
        .route(RouteDef::redirect("/b", "/a"))
        .build()
        .map(Arc::new)
        .unwrap();
    let config = RouterConfig {
        max_redirects: 3,
        ..RouterConfig::default()
    };
    let nav: Navigator<AppView> = Navigator::new(table, &config);

    let err = nav.navigate("/a", None, &anonymous(), false).unwrap_err();
    assert_eq!(err.kind(), RouterErrorKind::RedirectLoop);
}

#[test]
fn test_table_without_fallback_reports_no_match() {
    let table = RouteTable::builder()
        .route(RouteDef::view("/", AppView::Welcome))
        .build()
        .map(Arc::new)
        .unwrap();
    let nav = Navigator::new(table, &RouterConfig::default());

    let err = nav.navigate("/missing", None, &anonymous(), false).unwrap_err();
    assert_eq!(err.kind(), RouterErrorKind::NoMatch);

    let err = nav.navigate("relative", None, &anonymous(), false).unwrap_err();
    assert_eq!(err.kind(), RouterErrorKind::InvalidLocation);
}

#[test]
fn test_custom_login_path() {
    let config = RouterConfig {
        login_path: "/register".into(),
        ..RouterConfig::default()
    };
    let nav = app::navigator(&config).unwrap();
    let navigation = completed(nav.navigate("/vocabulary", None, &anonymous(), false).unwrap());
    assert_eq!(navigation.to.view(), Some(&AppView::Register));
}

// =========================================================
// HistoryRouter
// =========================================================

#[test]
fn test_start_resolves_initial_location() {
    let (mut router, _store) = router_at("/upload");
    let navigation = completed(router.start().unwrap());
    assert_eq!(navigation.to.view(), Some(&AppView::Login));
    // redirect replaces the initial entry
    assert_eq!(router.history().entries(), &["/login"]);
    assert_eq!(router.current().and_then(|m| m.view()), Some(&AppView::Login));
}

#[test]
fn test_push_writes_final_location() {
    let (mut router, store) = router_at("/");
    router.start().unwrap();

    router.push("/reader/7").unwrap();
    assert_eq!(router.history().entries(), &["/", "/login"]);

    store.set(SESSION_KEY, "true");
    router.push("/reader/7?page=3").unwrap();
    assert_eq!(router.history().location(), "/reader/7?page=3");
    assert_eq!(router.current().and_then(|m| m.param("id")), Some("7"));
    assert_eq!(
        router.current().and_then(|m| m.location().query("page")),
        Some("3")
    );

    router.replace("/vocabulary").unwrap();
    assert_eq!(router.history().entries(), &["/", "/login", "/vocabulary"]);
}

#[test]
fn test_push_named() {
    let (mut router, store) = router_at("/");
    store.set(SESSION_KEY, "true");
    router.start().unwrap();

    router
        .push_named("DictionaryDetail", &RouteParams::new().with("word", "ice cream"))
        .unwrap();
    assert_eq!(router.history().location(), "/dictionary/ice%20cream");
    assert_eq!(router.current().and_then(|m| m.param("word")), Some("ice cream"));

    let err = router.push_named("Offline", &RouteParams::new()).unwrap_err();
    assert_eq!(err.kind(), RouterErrorKind::UnknownRouteName);
}

#[test]
fn test_duplicate_push_adds_no_entry() {
    let (mut router, _store) = router_at("/settings");
    router.start().unwrap();
    let outcome = router.push("/settings").unwrap();
    assert!(matches!(outcome, NavigationOutcome::Duplicated));
    assert_eq!(router.history().entries(), &["/settings"]);
}

#[test]
fn test_revalidate_after_logout_leaves_protected_page() {
    let (mut router, store) = router_at("/");
    store.set(SESSION_KEY, "true");
    router.start().unwrap();
    router.push("/bookshelf").unwrap();
    assert_eq!(router.history().location(), "/bookshelf");

    store.remove(SESSION_KEY);
    let navigation = completed(router.revalidate().unwrap());
    assert!(navigation.was_redirected());
    assert_eq!(router.history().entries(), &["/", "/login"]);

    // public pages are untouched by a revalidation
    router.push("/settings").unwrap();
    let navigation = completed(router.revalidate().unwrap());
    assert!(!navigation.was_redirected());
    assert_eq!(router.history().entries(), &["/", "/login", "/settings"]);
}

#[test]
fn test_back_to_protected_page_after_logout_is_guarded() {
    let (mut router, store) = router_at("/");
    store.set(SESSION_KEY, "true");
    router.start().unwrap();
    router.push("/review").unwrap();
    router.push("/settings").unwrap();

    store.set(SESSION_KEY, "false");
    assert!(router.history_mut().back());
    let navigation = completed(router.sync_with_history().unwrap());
    assert_eq!(navigation.to.view(), Some(&AppView::Login));
    assert_eq!(router.history().entries(), &["/", "/login", "/settings"]);

    // plain back/forward does not write history
    assert!(router.history_mut().forward());
    completed(router.sync_with_history().unwrap());
    assert_eq!(router.history().entries(), &["/", "/login", "/settings"]);
}

#[test]
fn test_fixed_session_source() {
    let mut router = HistoryRouter::new(
        navigator(),
        MemoryHistory::new("/user"),
        Rc::new(AuthState::authenticated()),
    );
    let navigation = completed(router.start().unwrap());
    assert_eq!(navigation.to.view(), Some(&AppView::UserCenter));
    assert_eq!(router.history().entries(), &["/user"]);
}

#[test]
fn test_back_redirected_onto_current_route_restores_address_bar() {
    let (mut router, store) = router_at("/");
    store.set(SESSION_KEY, "true");
    router.start().unwrap();
    router.push("/bookshelf").unwrap();

    store.remove(SESSION_KEY);
    router.push("/login").unwrap();
    assert_eq!(router.history().entries(), &["/", "/bookshelf", "/login"]);

    // back lands on /bookshelf, the guard sends it to /login where we already are
    assert!(router.history_mut().back());
    let outcome = router.sync_with_history().unwrap();
    assert!(matches!(outcome, NavigationOutcome::Duplicated));
    assert_eq!(router.history().location(), "/login");
    assert_eq!(router.current().and_then(|m| m.view()), Some(&AppView::Login));
}

#[test]
fn test_back_aborted_by_guard_restores_address_bar() {
    // leaving settings is refused, e.g. while there are unsaved changes
    let nav = navigator().with_guard(FnGuard::new(
        "unsaved_settings",
        |_: &RouteMatch<AppView>, from: Option<&RouteMatch<AppView>>, _: &GuardContext| {
            if from.and_then(|m| m.view()) == Some(&AppView::Settings) {
                GuardDecision::Abort
            } else {
                GuardDecision::Proceed
            }
        },
    ));
    let mut router = HistoryRouter::new(
        nav,
        MemoryHistory::new("/"),
        Rc::new(AuthState::authenticated()),
    );
    router.start().unwrap();
    router.push("/upload").unwrap();
    router.push("/settings").unwrap();

    assert!(router.history_mut().back());
    assert_eq!(router.history().location(), "/upload");
    match router.sync_with_history().unwrap() {
        NavigationOutcome::Aborted { guard } => assert_eq!(guard, "unsaved_settings"),
        other => panic!("expected abort, got {other:?}"),
    }
    assert_eq!(router.history().location(), "/settings");
    assert_eq!(router.history().entries(), &["/", "/settings", "/settings"]);
    assert_eq!(router.current().and_then(|m| m.view()), Some(&AppView::Settings));
}
