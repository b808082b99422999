use jxt::tree::Document;
use serde_json::json;

/// A small book store with a shared price limit at the root.
pub fn book_store() -> Document {
    Document::from(json!({
        "store": {
            "name": "Corner Books",
            "book": [
                {"category": "reference", "author": "Nigel Rees", "title": "Sayings of the Century", "price": 8.95},
                {"category": "fiction", "author": "Evelyn Waugh", "title": "Sword of Honour", "price": 12.99},
                {"category": "fiction", "author": "Herman Melville", "title": "Moby Dick", "isbn": "0-553-21311-3", "price": 8.99},
                {"category": "fiction", "author": "J. R. R. Tolkien", "title": "The Lord of the Rings", "isbn": "0-395-19395-8", "price": 22.99}
            ],
            "bicycle": {"color": "red", "price": 19.95}
        },
        "limit": 10
    }))
}

pub fn items() -> Document {
    Document::from(json!({"items": [{"price": 5}, {"price": 15}]}))
}

pub const ITEMS_TEMPLATES: &str = r#"[
    {"$template": {"$match": "/", "$value": {"$apply-template": {"$select": "/items/*"}}}},
    {"$template": {"$match": "/items/*", "$value": {"$copy-of": {"$select": "."}}}}
]"#;
