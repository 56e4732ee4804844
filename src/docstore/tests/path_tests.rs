//! Tests for document addressing.

use crate::docstore::{CollectionPath, Document};
use serde::Deserialize;
use serde_json::json;

#[test]
fn paths_render_as_slash_separated_segments() {
    let members = CollectionPath::new("boards/main", "members");
    let path = members.doc("user-7");

    assert_eq!(members.to_string(), "boards/main/members");
    assert_eq!(path.to_string(), "boards/main/members/user-7");
    assert_eq!(path.collection(), &members);
    assert_eq!(path.id(), "user-7");
}

#[test]
fn documents_decode_into_typed_bodies() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Marker {
        token: String,
    }

    let document = Document::new("user-7", json!({ "token": "t-1", "extra": true }));

    let marker: Marker = document.decode().expect("decodes");
    assert_eq!(
        marker,
        Marker {
            token: "t-1".to_owned()
        }
    );
}
