//! Integration tests for the staff admin console.

mod common;

use axum::http::StatusCode;
use bookreview_db::repositories::{BookRepo, ReviewRepo};
use common::{
    body_text, book_fields, count_rows, create_book, create_book_in_genre, create_review,
    create_user, flashes, redirect_target, sign_in, spawn_app, TestApp,
};

async fn staff_cookie(app: &TestApp) -> String {
    let staff = create_user(&app.pool, "librarian", true).await;
    sign_in(app, staff.id).await
}

// ---------------------------------------------------------------------------
// Test: Access control
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_users_are_sent_to_login() {
    let app = spawn_app().await;

    let response = app.get("/admin/", None).await;
    assert_eq!(redirect_target(&response), "/login/?next=%2Fadmin%2F");
}

#[tokio::test]
async fn non_staff_users_are_forbidden() {
    let app = spawn_app().await;
    let user = create_user(&app.pool, "reader", false).await;
    let cookie = sign_in(&app, user.id).await;

    for path in ["/admin/", "/admin/books/", "/admin/reviews/"] {
        let response = app.get(path, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{path}");
    }
}

#[tokio::test]
async fn non_staff_cannot_delete_through_admin() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let user = create_user(&app.pool, "reader", false).await;
    let cookie = sign_in(&app, user.id).await;

    let response = app
        .post_form(&format!("/admin/books/{}/delete/", book.id), Some(&cookie), &[])
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(count_rows(&app.pool, "books").await, 1);
}

#[tokio::test]
async fn staff_see_the_index_with_counts() {
    let app = spawn_app().await;
    create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let cookie = staff_cookie(&app).await;

    let response = app.get("/admin/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Site administration"));
}

#[tokio::test]
async fn staff_get_an_admin_nav_link() {
    let app = spawn_app().await;
    let cookie = staff_cookie(&app).await;

    let html = body_text(app.get("/", Some(&cookie)).await).await;
    assert!(html.contains("href=\"/admin/\""));
}

// ---------------------------------------------------------------------------
// Test: Book changelist
// ---------------------------------------------------------------------------

async fn seed_books(app: &TestApp) {
    create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    create_book_in_genre(&app.pool, "Emma", "Jane Austen", "9780141439587", "Classics").await;
    create_book_in_genre(&app.pool, "Persuasion", "Jane Austen", "9780141439686", "Classics").await;
}

#[tokio::test]
async fn book_list_filters_by_genre() {
    let app = spawn_app().await;
    seed_books(&app).await;
    let cookie = staff_cookie(&app).await;

    let html = body_text(app.get("/admin/books/?genre=Classics", Some(&cookie)).await).await;
    assert!(html.contains(r#"<a class="button" href="/book/add/">Add book</a>"#));
    assert!(html.contains("Emma"));
    assert!(html.contains("Persuasion"));
    assert!(!html.contains("Dune"));
}

#[tokio::test]
async fn book_list_searches_title_author_and_isbn() {
    let app = spawn_app().await;
    seed_books(&app).await;
    let cookie = staff_cookie(&app).await;

    let by_author = body_text(app.get("/admin/books/?q=herbert", Some(&cookie)).await).await;
    assert!(by_author.contains("Dune"));
    assert!(!by_author.contains("Emma"));

    let by_isbn = body_text(app.get("/admin/books/?q=439587", Some(&cookie)).await).await;
    assert!(by_isbn.contains("Emma"));
    assert!(!by_isbn.contains("Dune"));
}

#[tokio::test]
async fn book_list_filters_by_dates() {
    let app = spawn_app().await;
    seed_books(&app).await;
    let cookie = staff_cookie(&app).await;

    let created_today =
        body_text(app.get("/admin/books/?created=today", Some(&cookie)).await).await;
    assert!(created_today.contains("Dune"));

    let published_this_year =
        body_text(app.get("/admin/books/?published=this_year", Some(&cookie)).await).await;
    assert!(!published_this_year.contains("Dune"));
    assert!(!published_this_year.contains("Emma"));
}

// ---------------------------------------------------------------------------
// Test: Book change and delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn staff_can_change_a_book() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let cookie = staff_cookie(&app).await;

    let form = app.get(&format!("/admin/books/{}/", book.id), Some(&cookie)).await;
    assert_eq!(form.status(), StatusCode::OK);

    let response = app
        .post_multipart(
            &format!("/admin/books/{}/", book.id),
            Some(&cookie),
            &book_fields("Dune Messiah", "9780441172696"),
            None,
        )
        .await;

    assert_eq!(redirect_target(&response), "/admin/books/");
    assert!(flashes(&response)[0].message.contains("was changed successfully"));
    let updated = BookRepo::find_by_id(&app.pool, book.id).await.unwrap().unwrap();
    assert_eq!(updated.title, "Dune Messiah");
    assert_eq!(updated.isbn, "9780441172696");
}

#[tokio::test]
async fn staff_can_delete_a_book_and_its_reviews() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let reader = create_user(&app.pool, "reader", false).await;
    create_review(&app.pool, book.id, reader.id, 3).await;
    let cookie = staff_cookie(&app).await;

    let confirm = app
        .get(&format!("/admin/books/{}/delete/", book.id), Some(&cookie))
        .await;
    assert!(body_text(confirm).await.contains("Are you sure?"));

    let response = app
        .post_form(&format!("/admin/books/{}/delete/", book.id), Some(&cookie), &[])
        .await;
    assert_eq!(redirect_target(&response), "/admin/books/");
    assert_eq!(count_rows(&app.pool, "books").await, 0);
    assert_eq!(count_rows(&app.pool, "reviews").await, 0);
}

// ---------------------------------------------------------------------------
// Test: Review changelist, change and delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn review_list_filters_by_rating_and_user() {
    let app = spawn_app().await;
    let dune = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let emma = create_book(&app.pool, "Emma", "Jane Austen", "9780141439587").await;
    let alice = create_user(&app.pool, "alice", false).await;
    let bob = create_user(&app.pool, "bob", false).await;
    create_review(&app.pool, dune.id, alice.id, 5).await;
    create_review(&app.pool, emma.id, bob.id, 2).await;
    let cookie = staff_cookie(&app).await;

    let five_star = body_text(app.get("/admin/reviews/?rating=5", Some(&cookie)).await).await;
    assert!(five_star.contains("Dune"));
    assert!(!five_star.contains("Emma"));

    let by_bob = body_text(
        app.get(&format!("/admin/reviews/?user={}", bob.id), Some(&cookie))
            .await,
    )
    .await;
    assert!(by_bob.contains("Emma"));
    assert!(!by_bob.contains("Dune"));
}

#[tokio::test]
async fn review_list_searches_book_title_and_username() {
    let app = spawn_app().await;
    let dune = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let emma = create_book(&app.pool, "Emma", "Jane Austen", "9780141439587").await;
    let alice = create_user(&app.pool, "alice", false).await;
    let bob = create_user(&app.pool, "bob", false).await;
    create_review(&app.pool, dune.id, alice.id, 5).await;
    create_review(&app.pool, emma.id, bob.id, 2).await;
    let cookie = staff_cookie(&app).await;

    let html = body_text(app.get("/admin/reviews/?q=ALICE", Some(&cookie)).await).await;
    assert!(html.contains("Dune"));
    assert!(!html.contains("Emma"));
}

#[tokio::test]
async fn staff_can_view_and_delete_a_review() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let reader = create_user(&app.pool, "reader", false).await;
    let review = create_review(&app.pool, book.id, reader.id, 4).await;
    let cookie = staff_cookie(&app).await;

    let detail = app
        .get(&format!("/admin/reviews/{}/", review.id), Some(&cookie))
        .await;
    assert_eq!(detail.status(), StatusCode::OK);
    assert!(body_text(detail).await.contains("Would read again."));

    let response = app
        .post_form(&format!("/admin/reviews/{}/delete/", review.id), Some(&cookie), &[])
        .await;
    assert_eq!(redirect_target(&response), "/admin/reviews/");
    assert!(ReviewRepo::find_detail(&app.pool, review.id).await.unwrap().is_none());
    assert_eq!(count_rows(&app.pool, "books").await, 1, "the book stays");
}

#[tokio::test]
async fn staff_can_change_a_review() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let reader = create_user(&app.pool, "reader", false).await;
    let review = create_review(&app.pool, book.id, reader.id, 4).await;
    let cookie = staff_cookie(&app).await;
    let uri = format!("/admin/reviews/{}/", review.id);

    let form = body_text(app.get(&uri, Some(&cookie)).await).await;
    assert!(form.contains("Change review"));
    assert!(form.contains("Created at"));
    assert!(form.contains("reader"));

    let invalid = app
        .post_form(&uri, Some(&cookie), &[("rating", "9"), ("review_text", "Changed")])
        .await;
    assert_eq!(invalid.status(), StatusCode::OK);
    assert!(body_text(invalid).await.contains("is not one of the available choices"));

    let response = app
        .post_form(&uri, Some(&cookie), &[("rating", "2"), ("review_text", "Dragged on.")])
        .await;
    assert_eq!(redirect_target(&response), "/admin/reviews/");
    assert!(flashes(&response)[0].message.contains("was changed successfully"));

    let changed = ReviewRepo::find_detail(&app.pool, review.id).await.unwrap().unwrap();
    assert_eq!(changed.rating, 2);
    assert_eq!(changed.review_text, "Dragged on.");
    assert_eq!(changed.book_id, book.id);
    assert_eq!(changed.user_id, reader.id);
    assert!(changed.updated_at >= review.updated_at);
}

#[tokio::test]
async fn non_staff_cannot_change_a_review() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let reader = create_user(&app.pool, "reader", false).await;
    let review = create_review(&app.pool, book.id, reader.id, 4).await;
    let cookie = sign_in(&app, reader.id).await;

    let response = app
        .post_form(
            &format!("/admin/reviews/{}/", review.id),
            Some(&cookie),
            &[("rating", "5"), ("review_text", "Best ever")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let unchanged = ReviewRepo::find_detail(&app.pool, review.id).await.unwrap().unwrap();
    assert_eq!(unchanged.rating, 4);
}

#[tokio::test]
async fn malformed_filter_values_are_ignored() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let reader = create_user(&app.pool, "reader", false).await;
    create_review(&app.pool, book.id, reader.id, 4).await;
    let cookie = staff_cookie(&app).await;

    for uri in [
        "/admin/reviews/?rating=",
        "/admin/reviews/?rating=abc&user=&created=bogus",
        "/admin/books/?created=bogus&published=",
    ] {
        let response = app.get(uri, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(body_text(response).await.contains("Dune"), "{uri}");
    }
}

#[tokio::test]
async fn changing_missing_review_is_404() {
    let app = spawn_app().await;
    let cookie = staff_cookie(&app).await;

    let response = app
        .post_form("/admin/reviews/5/", Some(&cookie), &[("rating", "3"), ("review_text", "x")])
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_missing_review_is_404() {
    let app = spawn_app().await;
    let cookie = staff_cookie(&app).await;

    let response = app.post_form("/admin/reviews/5/delete/", Some(&cookie), &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
