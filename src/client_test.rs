use super::*;

#[test]
fn canvas_url_joins_base_and_book() {
    let client = BookClient::new("http://127.0.0.1:3000");
    assert_eq!(client.canvas_url("moby-dick"), "http://127.0.0.1:3000/books/moby-dick/canvas");
}

#[test]
fn canvas_url_trims_trailing_slashes() {
    let client = BookClient::new("https://reader.example.com/api//");
    assert_eq!(client.canvas_url("42"), "https://reader.example.com/api/books/42/canvas");
}
