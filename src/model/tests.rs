#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use serde_json::json;

fn element(schema: serde_json::Value) -> ElementSchema {
    match ComponentSchema::from_value(ComponentKind::Element, &schema).unwrap() {
        ComponentSchema::Element(e) => e,
        other => panic!("expected element schema, got {other:?}"),
    }
}

#[test]
fn test_component_deserializes_from_stored_record() {
    let raw = json!({
        "id": "c1",
        "type": "element",
        "name": "Blog Post",
        "description": "A post",
        "schema": { "properties": [] },
        "status": "ready",
        "locked": true,
        "position": { "x": 10.0, "y": 20.5 }
    });
    let component: Component = serde_json::from_value(raw).unwrap();
    assert_eq!(component.kind, ComponentKind::Element);
    assert_eq!(component.status, ComponentStatus::Ready);
    assert!(component.locked);
    assert_eq!(component.position, Some(Position { x: 10.0, y: 20.5 }));
}

#[test]
fn test_component_defaults_missing_fields() {
    let component: Component =
        serde_json::from_value(json!({ "id": "c1", "type": "worker", "name": "Mailer" })).unwrap();
    assert_eq!(component.status, ComponentStatus::Draft);
    assert!(!component.locked);
    assert!(component.schema.is_null());
    assert_eq!(component.description(), "");
}

#[test]
fn test_unknown_component_type_is_rejected() {
    let res = serde_json::from_value::<Component>(json!({
        "id": "c1", "type": "gizmo", "name": "X"
    }));
    assert!(res.is_err());
}

#[test]
fn test_kind_from_str() {
    assert_eq!("Manipulator".parse::<ComponentKind>(), Ok(ComponentKind::Manipulator));
    assert!("gizmo".parse::<ComponentKind>().is_err());
    for kind in ComponentKind::ALL {
        assert_eq!(kind.as_str().parse::<ComponentKind>(), Ok(kind));
    }
}

#[test]
fn test_element_properties_keep_order() {
    let schema = element(json!({
        "properties": [
            { "name": "title", "type": "string", "required": true },
            { "name": "views", "type": "integer", "min": 0 },
            { "name": "published", "type": "boolean", "default": false }
        ]
    }));
    let names: Vec<_> = schema.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["title", "views", "published"]);
    assert!(schema.properties[0].is_required());
    assert_eq!(schema.properties[1].min, Some(json!(0)));
    assert_eq!(schema.properties[2].default, Some(json!(false)));
}

#[test]
fn test_element_tolerates_unknown_and_malformed_fields() {
    let schema = element(json!({
        "properties": [
            { "name": "title", "color": "blue" },
            { "type": "string" },
            { "name": "count", "type": 7, "required": "yes" }
        ],
        "somethingElse": 42
    }));
    assert_eq!(schema.properties.len(), 2);
    assert_eq!(schema.properties[0].ty, "string");
    assert_eq!(schema.properties[1].ty, "string");
    assert_eq!(schema.properties[1].required, None);
}

#[test]
fn test_null_schema_reads_as_empty() {
    let schema = ComponentSchema::from_value(ComponentKind::Worker, &serde_json::Value::Null).unwrap();
    assert_eq!(schema, ComponentSchema::empty(ComponentKind::Worker));
}

#[test]
fn test_non_object_schema_degrades_to_empty() {
    let component =
        Component::new("c1", ComponentKind::Element, "Post").with_schema(json!("not a schema"));
    assert!(component.try_typed_schema().is_err());
    assert_eq!(component.typed_schema(), ComponentSchema::empty(ComponentKind::Element));
}

#[test]
fn test_behaviors_accept_list_or_flags() {
    let a = element(json!({ "behaviors": ["timestamps", "softDelete"] }));
    let b = element(json!({ "behaviors": { "timestamps": true, "softDelete": false } }));
    assert!(a.has_behavior("softdelete"));
    assert!(b.has_behavior("timestamps"));
    assert!(!b.has_behavior("softDelete"));
}

#[test]
fn test_relationship_kinds_normalize() {
    let schema = element(json!({
        "relationships": [
            { "type": "hasMany", "target": "Comment" },
            { "kind": "many-to-many", "element": "Tag" },
            { "target": "Author" }
        ]
    }));
    let kinds: Vec<_> = schema.relationships.iter().map(Relationship::relation).collect();
    assert_eq!(
        kinds,
        [RelationKind::HasMany, RelationKind::ManyToMany, RelationKind::BelongsTo]
    );
}

#[test]
fn test_manipulator_link_fields() {
    let schema = ComponentSchema::from_value(
        ComponentKind::Manipulator,
        &json!({
            "linkedElement": "Blog Post",
            "linkedElementId": "c1",
            "operations": ["create", "list"],
            "endpoints": [{ "method": "POST", "path": "/publish", "name": "publish" }]
        }),
    )
    .unwrap();
    let ComponentSchema::Manipulator(m) = schema else {
        panic!("expected manipulator");
    };
    assert_eq!(m.linked_element.as_deref(), Some("Blog Post"));
    assert_eq!(m.linked_element_id.as_deref(), Some("c1"));
    assert_eq!(m.operations, ["create", "list"]);
    assert_eq!(m.endpoints[0].handler.as_deref(), Some("publish"));
}

#[test]
fn test_worker_retry_aliases() {
    let schema = ComponentSchema::from_value(
        ComponentKind::Worker,
        &json!({ "queue": "emails", "retry": { "attempts": 5, "delay": 1000 } }),
    )
    .unwrap();
    let ComponentSchema::Worker(w) = schema else {
        panic!("expected worker");
    };
    let retry = w.retry.unwrap();
    assert_eq!(retry.max_attempts, Some(5));
    assert_eq!(retry.delay_ms, Some(1000));
}

#[test]
fn test_raw_schema_is_untouched_for_non_emitting_kinds() {
    let raw = json!({ "strategy": "jwt", "providers": ["google"], "custom": { "x": 1 } });
    let component = Component::new("a1", ComponentKind::Auth, "Login").with_schema(raw.clone());
    let ComponentSchema::Auth(auth) = component.typed_schema() else {
        panic!("expected auth");
    };
    assert_eq!(auth.strategy.as_deref(), Some("jwt"));
    let back: Component =
        serde_json::from_value(serde_json::to_value(&component).unwrap()).unwrap();
    assert_eq!(back.schema, raw);
}

#[test]
fn test_index_resolves_by_kebab_name_and_id() {
    let components = vec![
        Component::new("e1", ComponentKind::Element, "Blog Post"),
        Component::new("m1", ComponentKind::Manipulator, "BlogPost"),
    ];
    let index = ComponentIndex::new(&components);
    assert_eq!(index.element_named("blog-post").map(|c| c.id.as_str()), Some("e1"));
    assert_eq!(index.named("blogPost").map(|c| c.id.as_str()), Some("e1"));
    assert_eq!(index.by_id("m1").map(|c| c.name.as_str()), Some("BlogPost"));

    let by_id = ManipulatorSchema {
        linked_element_id: Some("e1".into()),
        ..Default::default()
    };
    assert_eq!(index.linked_element(&by_id).map(|c| c.id.as_str()), Some("e1"));

    let wrong_kind = ManipulatorSchema {
        linked_element_id: Some("m1".into()),
        ..Default::default()
    };
    assert!(index.linked_element(&wrong_kind).is_none());
}
