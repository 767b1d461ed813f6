// tests/url_sync.rs
//
// Route ⇄ criteria synchronisation through the router, without any UI.
//
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use supplier_directory::data::filter::FilterCriteria;
use supplier_directory::data::loader::{Fetch, Payload, SourceFormat};
use supplier_directory::data::query::Route;
use supplier_directory::error::LoadError;
use supplier_directory::router::{Page, Router};
use supplier_directory::state::{ListingStatus, Phase};

const DATA: &str = "\
Industry Type,Company Name,Location,Established Year,Trust Status
Metal,Forge One,\"Austin, TX\",1990,Trusted Seller
Lighting,Lumen,\"Springfield, IL\",,Pending
Metal,Forge Two,\"Boston, MA\",2025,Pending
";

/// In-memory source that counts how often it was fetched.
struct Counted {
    fetches: AtomicUsize,
}

impl Fetch for Counted {
    fn fetch(&self) -> Result<Payload, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Payload {
            bytes: DATA.as_bytes().to_vec(),
            format: SourceFormat::Csv,
        })
    }
    fn describe(&self) -> String {
        "memory.csv".into()
    }
}

fn router_at(target: &str) -> (Router, Arc<Counted>) {
    let fetch = Arc::new(Counted {
        fetches: AtomicUsize::new(0),
    });
    let mut router = Router::new(fetch.clone(), Route::parse(target), Arc::new(|| {}));
    router.wait();
    (router, fetch)
}

fn listing_names(router: &Router) -> Vec<String> {
    match router.page() {
        Page::Suppliers(listing) => listing.visible().map(|r| r.company_name.clone()).collect(),
        Page::Home(_) => panic!("expected the listing"),
    }
}

#[test]
fn deep_link_reads_criteria() {
    let (router, _) = router_at("/suppliers?industry=Metal&location=austin&experience=10");
    assert_eq!(listing_names(&router), ["Forge One"]);
}

#[test]
fn user_edits_write_back_to_route() {
    let (mut router, _) = router_at("/suppliers");
    assert_eq!(router.route().to_string(), "/suppliers");

    router.update_criteria(FilterCriteria {
        location: "Spring".into(),
        ..FilterCriteria::default()
    });
    assert_eq!(router.route().to_string(), "/suppliers?location=Spring");
    assert_eq!(listing_names(&router), ["Lumen"]);

    // Replaying the written route reproduces the same view.
    let (replayed, _) = router_at(&router.route().to_string());
    assert_eq!(listing_names(&replayed), ["Lumen"]);
}

#[test]
fn query_change_on_listing_does_not_refetch() {
    let (mut router, fetch) = router_at("/suppliers");
    router.navigate(Route::parse("/suppliers?industry=Lighting"));
    match router.page() {
        Page::Suppliers(listing) => {
            assert_eq!(listing.phase(), &Phase::Filtered);
            assert_eq!(listing.status(), ListingStatus::Showing(1));
        }
        Page::Home(_) => panic!("expected the listing"),
    }
    assert_eq!(fetch.fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn home_search_navigates_with_criteria() {
    let (mut router, fetch) = router_at("/");
    assert_eq!(router.facets(), ["All", "Metal", "Lighting"]);

    let route = match router.page_mut() {
        Page::Home(home) => {
            home.draft.industry = "Metal".into();
            home.draft.experience = Some(30);
            home.search_route()
        }
        Page::Suppliers(_) => panic!("expected home"),
    };
    router.navigate(route);
    router.wait();

    assert_eq!(router.route().to_string(), "/suppliers?industry=Metal&experience=30");
    assert_eq!(listing_names(&router), ["Forge One"]);
    // Each page loads its own copy.
    assert_eq!(fetch.fetches.load(Ordering::SeqCst), 2);
}

#[test]
fn criteria_updates_ignored_on_home() {
    let (mut router, _) = router_at("/");
    router.update_criteria(FilterCriteria {
        industry: "Metal".into(),
        ..FilterCriteria::default()
    });
    assert_eq!(router.route(), &Route::Home);
}

#[test]
fn switching_source_remounts_current_route() {
    let (mut router, first) = router_at("/suppliers?industry=Lighting");
    let second = Arc::new(Counted {
        fetches: AtomicUsize::new(0),
    });
    router.set_fetch(second.clone());
    router.wait();

    assert_eq!(first.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(second.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(listing_names(&router), ["Lumen"]);
}
