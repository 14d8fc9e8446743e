pub mod flip;
pub mod groups;
pub mod stream;
pub mod tally;

/// Root route greeting.
pub async fn welcome() -> &'static str {
    "Hello, this is the backend!"
}
