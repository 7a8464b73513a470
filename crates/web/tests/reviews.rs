//! Integration tests for writing reviews.

mod common;

use axum::http::StatusCode;
use bookreview_db::repositories::ReviewRepo;
use bookreview_web::flash::Level;
use common::{
    body_text, count_rows, create_book, create_review, create_user, flashes, redirect_target,
    sign_in, spawn_app,
};

// ---------------------------------------------------------------------------
// Test: Anonymous users must log in first
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_review_redirects_to_login() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;

    let response = app.get(&format!("/book/{}/review/", book.id), None).await;
    assert_eq!(
        redirect_target(&response),
        format!("/login/?next=%2Fbook%2F{}%2Freview%2F", book.id)
    );

    let response = app
        .post_form(
            &format!("/book/{}/review/", book.id),
            None,
            &[("rating", "5"), ("review_text", "Great")],
        )
        .await;
    assert!(redirect_target(&response).starts_with("/login/"));
    assert_eq!(count_rows(&app.pool, "reviews").await, 0);
}

// ---------------------------------------------------------------------------
// Test: Submitting a review
// ---------------------------------------------------------------------------

#[tokio::test]
async fn review_form_lists_rating_choices() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let user = create_user(&app.pool, "alice", false).await;
    let cookie = sign_in(&app, user.id).await;

    let response = app.get(&format!("/book/{}/review/", book.id), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Dune"));
    for value in 1..=5 {
        assert!(html.contains(&format!("value=\"{value}\"")));
    }
}

#[tokio::test]
async fn valid_review_is_saved_for_current_user() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let user = create_user(&app.pool, "alice", false).await;
    let cookie = sign_in(&app, user.id).await;

    let response = app
        .post_form(
            &format!("/book/{}/review/", book.id),
            Some(&cookie),
            &[("rating", "4"), ("review_text", "  A desert epic.  ")],
        )
        .await;

    assert_eq!(redirect_target(&response), format!("/book/{}/", book.id));
    let messages = flashes(&response);
    assert_eq!(messages[0].level, Level::Success);
    assert_eq!(messages[0].message, "Your review has been added!");

    let review = ReviewRepo::find_for_book_and_user(&app.pool, book.id, user.id)
        .await
        .unwrap()
        .expect("review saved");
    assert_eq!(review.rating, 4);
    assert_eq!(review.review_text, "A desert epic.");
}

#[tokio::test]
async fn invalid_rating_rerenders_and_saves_nothing() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let user = create_user(&app.pool, "alice", false).await;
    let cookie = sign_in(&app, user.id).await;

    let response = app
        .post_form(
            &format!("/book/{}/review/", book.id),
            Some(&cookie),
            &[("rating", "7"), ("review_text", "")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Select a valid choice. 7 is not one of the available choices."));
    assert!(html.contains("This field is required."));
    assert_eq!(count_rows(&app.pool, "reviews").await, 0);
}

// ---------------------------------------------------------------------------
// Test: One review per user per book
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_review_form_redirects_with_warning() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let user = create_user(&app.pool, "alice", false).await;
    create_review(&app.pool, book.id, user.id, 5).await;
    let cookie = sign_in(&app, user.id).await;

    let response = app.get(&format!("/book/{}/review/", book.id), Some(&cookie)).await;

    assert_eq!(redirect_target(&response), format!("/book/{}/", book.id));
    let messages = flashes(&response);
    assert_eq!(messages[0].level, Level::Warning);
    assert_eq!(messages[0].message, "You have already reviewed this book.");
}

#[tokio::test]
async fn second_review_submission_is_refused() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let user = create_user(&app.pool, "alice", false).await;
    create_review(&app.pool, book.id, user.id, 5).await;
    let cookie = sign_in(&app, user.id).await;

    let response = app
        .post_form(
            &format!("/book/{}/review/", book.id),
            Some(&cookie),
            &[("rating", "1"), ("review_text", "Changed my mind")],
        )
        .await;

    assert_eq!(redirect_target(&response), format!("/book/{}/", book.id));
    assert_eq!(flashes(&response)[0].level, Level::Warning);
    assert_eq!(count_rows(&app.pool, "reviews").await, 1);
    let review = ReviewRepo::find_for_book_and_user(&app.pool, book.id, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(review.rating, 5, "the first review is untouched");
}

#[tokio::test]
async fn other_users_can_still_review() {
    let app = spawn_app().await;
    let book = create_book(&app.pool, "Dune", "Frank Herbert", "9780441172719").await;
    let alice = create_user(&app.pool, "alice", false).await;
    let bob = create_user(&app.pool, "bob", false).await;
    create_review(&app.pool, book.id, alice.id, 5).await;
    let cookie = sign_in(&app, bob.id).await;

    let response = app
        .post_form(
            &format!("/book/{}/review/", book.id),
            Some(&cookie),
            &[("rating", "2"), ("review_text", "Too much sand.")],
        )
        .await;

    assert_eq!(flashes(&response)[0].level, Level::Success);
    assert_eq!(count_rows(&app.pool, "reviews").await, 2);
}

#[tokio::test]
async fn review_for_missing_book_is_404() {
    let app = spawn_app().await;
    let user = create_user(&app.pool, "alice", false).await;
    let cookie = sign_in(&app, user.id).await;

    let response = app.get("/book/77/review/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
