use super::*;
#[cfg(feature = "live-db-tests")]
use crate::services::application::{self, NewApplication};
#[cfg(feature = "live-db-tests")]
use crate::state::test_helpers;

fn new_page(name: &str, slug: &str, route: Option<&str>) -> NewPage {
    NewPage { name: name.into(), slug: slug.into(), route: route.map(str::to_owned) }
}

#[test]
fn route_defaults_to_slug() {
    let page = new_page("Home", " home ", None).validated().unwrap();
    assert_eq!(page.slug, "home");
    assert_eq!(page.route.as_deref(), Some("/home"));

    let page = new_page("Home", "home", Some("  ")).validated().unwrap();
    assert_eq!(page.route.as_deref(), Some("/home"));
}

#[test]
fn explicit_route_is_kept() {
    let page = new_page("Home", "home", Some("/")).validated().unwrap();
    assert_eq!(page.route.as_deref(), Some("/"));
}

#[test]
fn blank_name_or_slug_is_invalid() {
    assert!(matches!(new_page("", "home", None).validated(), Err(PageError::Invalid(_))));
    assert!(matches!(new_page("Home", " ", None).validated(), Err(PageError::Invalid(_))));
}

#[test]
fn import_issues_convert_to_invalid_document() {
    let err = PageError::from(ImportIssue::ComponentsNotArray);
    assert!(matches!(err, PageError::InvalidDocument(ImportIssue::ComponentsNotArray)));
    assert!(err.to_string().starts_with("invalid document"));
}

#[test]
fn row_from_tuple() {
    let id = Uuid::new_v4();
    let app = Uuid::new_v4();
    let row = PageRow::from((id, app, "Home".to_owned(), "home".to_owned(), "/home".to_owned(), serde_json::json!({}), 2, 5, 6));
    assert_eq!(row.id, id);
    assert_eq!(row.application_id, app);
    assert_eq!(row.route, "/home");
    assert_eq!(row.order_index, 2);
}

#[tokio::test]
async fn save_rejects_malformed_document_before_touching_db() {
    // The lazy pool never connects, so reaching the database would error
    // with a connection failure instead of InvalidDocument.
    let state = crate::state::test_helpers::test_app_state();
    let err = save_document(&state.pool, Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), &serde_json::json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, PageError::InvalidDocument(ImportIssue::MissingComponents)), "{err:?}");
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn page_document_round_trip() {
    let pool = test_helpers::integration_pool().await;
    let org = Uuid::new_v4();
    let app = application::create_application(
        &pool,
        org,
        Uuid::new_v4(),
        &NewApplication { name: "Shop".into(), slug: "shop".into(), description: None },
    )
    .await
    .expect("create application");

    let home = create_page(&pool, org, app.id, &new_page("Home", "home", None)).await.expect("create home");
    let about = create_page(&pool, org, app.id, &new_page("About", "about", None)).await.expect("create about");
    assert_eq!((home.order_index, about.order_index), (0, 1));

    let dup = create_page(&pool, org, app.id, &new_page("Home 2", "home", None)).await;
    assert!(matches!(dup, Err(PageError::Conflict(_))));

    let empty = load_document(&pool, org, app.id, home.id).await.expect("load empty");
    assert!(empty.components.is_empty());
    assert_eq!(empty.application_name, "Shop");

    let button = builder::create("button", serde_json::Map::new()).expect("button");
    let saved = save_document(&pool, org, app.id, home.id, &serde_json::json!({"components": [&button]}))
        .await
        .expect("save");
    assert_eq!(saved, 1);

    let loaded = load_document(&pool, org, app.id, home.id).await.expect("load");
    assert_eq!(loaded.components, vec![button]);
    assert_eq!(loaded.application_id, Some(app.id.to_string()));

    let loose = serde_json::json!({"id": "b", "type": "text", "position": {"x": 1}, "props": null});
    save_document(&pool, org, app.id, about.id, &serde_json::json!({"components": [loose]}))
        .await
        .expect("save loose");
    let loaded = load_document(&pool, org, app.id, about.id).await.expect("load loose");
    assert_eq!(loaded.components[0].position, Some(serde_json::json!({"x": 1})));

    let foreign = load_document(&pool, Uuid::new_v4(), app.id, home.id).await;
    assert!(matches!(foreign, Err(PageError::ApplicationNotFound(_))));

    delete_page(&pool, org, app.id, about.id).await.expect("delete");
    let pages = list_pages(&pool, org, app.id).await.expect("list");
    assert_eq!(pages.len(), 1);
}
