//! Review rating scale.

/// Lowest rating a review may carry.
pub const MIN_RATING: i64 = 1;
/// Highest rating a review may carry.
pub const MAX_RATING: i64 = 5;

/// The selectable ratings with their display labels, best first.
pub const RATING_CHOICES: [(i64, &str); 5] = [
    (5, "5 - Excellent"),
    (4, "4 - Very Good"),
    (3, "3 - Good"),
    (2, "2 - Fair"),
    (1, "1 - Poor"),
];

/// Whether `rating` is on the scale.
pub fn is_valid_rating(rating: i64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Display label for a rating, e.g. `"4 - Very Good"`.
pub fn rating_label(rating: i64) -> Option<&'static str> {
    RATING_CHOICES
        .iter()
        .find(|(value, _)| *value == rating)
        .map(|(_, label)| *label)
}

/// Render a rating as filled/empty stars, e.g. `"★★★☆☆"`.
pub fn stars(rating: i64) -> String {
    let filled = rating.clamp(0, MAX_RATING) as usize;
    let empty = MAX_RATING as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// Format a mean rating with one decimal, e.g. `"4.3"`.
pub fn format_average(average: f64) -> String {
    format!("{:.1}", (average * 10.0).round() / 10.0)
}
