//! Parse → serialize → parse stability for representative cards.

use cardframe_model::{parse_card, Element};
use serde_json::{Value, json};

fn sample_card() -> Value {
    json!({
        "type": "AdaptiveCard",
        "version": "1.5",
        "speak": "Order confirmed",
        "body": [
            {"type": "TextBlock", "text": "Order #1234", "size": "large", "weight": "bolder"},
            {
                "type": "Container",
                "style": "emphasis",
                "bleed": true,
                "items": [
                    {"type": "Image", "url": "https://example.com/prod.png", "size": "medium"},
                    {"type": "FactSet", "facts": [
                        {"title": "Status", "value": "Shipped"},
                        {"title": "ETA", "value": "Tomorrow"}
                    ]}
                ]
            },
            {
                "type": "ColumnSet",
                "columns": [
                    {"type": "Column", "width": "auto", "items": [
                        {"type": "TextBlock", "text": "Qty"}
                    ]},
                    {"type": "Column", "width": "stretch", "items": [
                        {"type": "TextBlock", "text": "2", "horizontalAlignment": "right"}
                    ]}
                ]
            },
            {"type": "Input.Text", "id": "note", "placeholder": "Add a note"},
            {"type": "ActionSet", "actions": [
                {"type": "Action.Submit", "title": "Confirm", "data": {"order": 1234}}
            ]}
        ],
        "actions": [
            {"type": "Action.OpenUrl", "title": "Track", "url": "https://example.com/track"},
            {"type": "Action.ShowCard", "title": "Details", "card": {
                "type": "AdaptiveCard",
                "version": "1.5",
                "body": [{"type": "TextBlock", "text": "Nested"}]
            }}
        ]
    })
}

#[test]
fn round_trip_is_structurally_stable() {
    let first = parse_card(&sample_card());
    let card = first.card.expect("sample parses");
    assert!(first.warnings.is_empty(), "clean card: {:?}", first.warnings);

    let serialized = card.to_json();
    let second = parse_card(&serialized);
    let reparsed = second.card.expect("serialized form parses");
    assert!(second.warnings.is_empty());

    assert_eq!(card, reparsed);
    assert_eq!(serialized, reparsed.to_json());
}

#[test]
fn serialization_omits_defaults_everywhere() {
    let parsed = parse_card(&json!({
        "type": "AdaptiveCard",
        "version": "1.0",
        "body": [
            {"type": "TextBlock", "text": "plain", "size": "default", "wrap": false},
            {"type": "Container", "style": "none", "bleed": false, "items": [
                {"type": "TextBlock", "text": "inner"}
            ]}
        ]
    }));
    let card = parsed.card.expect("parses");
    let serialized = card.to_json();

    let body = serialized["body"].as_array().expect("body array");
    assert_eq!(body[0], json!({"type": "TextBlock", "text": "plain"}));
    assert_eq!(
        body[1],
        json!({"type": "Container", "items": [{"type": "TextBlock", "text": "inner"}]})
    );
}

#[test]
fn unknown_elements_survive_the_round_trip() {
    let source = json!({
        "type": "AdaptiveCard",
        "version": "1.0",
        "body": [
            {"type": "RatingBar", "stars": 4, "color": "gold"}
        ]
    });
    let card = parse_card(&source).card.expect("parses");
    let serialized = card.to_json();
    assert_eq!(serialized["body"][0], source["body"][0]);

    let reparsed = parse_card(&serialized).card.expect("reparses");
    match &reparsed.body[0] {
        Element::Unknown(unknown) => assert_eq!(unknown.element_type, "RatingBar"),
        other => panic!("expected Unknown, got {other:?}"),
    }
}

#[test]
fn degraded_values_serialize_as_defaults() {
    // junk enum degrades at parse; the serialized form is then clean
    let card = parse_card(&json!({
        "version": "1.0",
        "body": [{"type": "TextBlock", "text": "x", "size": "galactic"}]
    }))
    .card
    .expect("parses");
    let serialized = card.to_json();
    assert_eq!(serialized["body"][0], json!({"type": "TextBlock", "text": "x"}));

    let second = parse_card(&serialized);
    assert!(second.warnings.is_empty());
}
