use tsw_core::ir::{
    CompositionMode, HttpMethod, ParameterLocation, PrimitiveType, SchemaKind, SpecVersion,
};
use tsw_core::parse;
use tsw_core::transform;

const PETSTORE_V2: &str = include_str!("fixtures/petstore-v2.json");
const SHOP_V3: &str = include_str!("fixtures/petstore-v3.yaml");

fn find<'a>(
    doc: &'a tsw_core::ir::ApiDocument,
    method: HttpMethod,
    path: &str,
) -> &'a tsw_core::ir::Operation {
    doc.operations
        .iter()
        .find(|op| op.method == method && op.path == path)
        .unwrap_or_else(|| panic!("missing {} {path}", method.as_str()))
}

#[test]
fn transform_swagger_fixture() {
    let spec = parse::from_json(PETSTORE_V2).unwrap();
    let doc = transform::transform(&spec);

    assert_eq!(doc.version, SpecVersion::Swagger2);
    assert_eq!(doc.info.title, "Petstore");
    let names: Vec<&String> = doc.schemas.names().collect();
    assert_eq!(names, vec!["Pet", "User", "Page<Pet>", "Page<User>"]);
    assert_eq!(doc.operations.len(), 7);

    // Verbs follow get, post, ... order within a path.
    assert_eq!(doc.operations[0].method, HttpMethod::Get);
    assert_eq!(doc.operations[1].method, HttpMethod::Post);
}

#[test]
fn swagger_refs_point_at_sanitized_keys() {
    let doc = transform::transform(&parse::from_json(PETSTORE_V2).unwrap());
    let list = find(&doc, HttpMethod::Get, "/v1/pets");
    let Some(SchemaKind::Ref(name)) = list.success_schema().map(|s| &s.kind) else {
        panic!("expected a reference");
    };
    assert!(doc.schemas.contains(name));
    assert_eq!(name, "Page<Pet>");
}

#[test]
fn swagger_path_parameters_are_shared() {
    let doc = transform::transform(&parse::from_json(PETSTORE_V2).unwrap());
    let delete = find(&doc, HttpMethod::Delete, "/v1/pets/{petId}");
    assert!(delete.deprecated);
    assert_eq!(delete.parameters.len(), 1);
    let pet_id = &delete.parameters[0];
    assert_eq!(pet_id.name, "petId");
    assert_eq!(pet_id.location, ParameterLocation::Path);
    assert_eq!(pet_id.description.as_deref(), Some("Pet id"));
    assert_eq!(
        pet_id.schema.kind,
        SchemaKind::Primitive {
            primitive: PrimitiveType::Integer,
            format: Some("int64".into()),
        }
    );
}

#[test]
fn swagger_form_data_and_refs() {
    let doc = transform::transform(&parse::from_json(PETSTORE_V2).unwrap());
    let upload = find(&doc, HttpMethod::Post, "/v1/pets/{petId}/photo");
    assert!(upload.is_multipart());
    assert_eq!(upload.parameters[1].schema.kind, SchemaKind::File);

    let search = find(&doc, HttpMethod::Get, "/v1/users/search");
    assert_eq!(search.parameters.len(), 6);
    assert_eq!(search.parameters[5].name, "sort");
    assert!(matches!(search.parameters[2].schema.kind, SchemaKind::Enum(_)));
    assert_eq!(
        search.responses["default"].description.as_deref(),
        Some("Unexpected error")
    );
}

#[test]
fn transform_openapi_fixture() {
    let doc = transform::transform(&parse::from_yaml(SHOP_V3).unwrap());

    assert_eq!(doc.version, SpecVersion::OpenApi3);
    assert_eq!(doc.schemas.len(), 6);
    assert_eq!(doc.operations.len(), 5);

    let order = doc.schemas.get("Order").unwrap();
    let SchemaKind::Object(object) = &order.kind else {
        panic!("Order should be an object");
    };
    assert!(object.is_required("id"));
    assert!(object.properties["note"].meta.nullable);
    let SchemaKind::Object(meta) = &object.properties["meta"].kind else {
        panic!("meta should be an object");
    };
    assert!(meta.additional_properties.is_some());

    assert!(matches!(
        doc.schemas.get("OrderPatch").unwrap().kind,
        SchemaKind::Composition {
            mode: CompositionMode::AllOf,
            ..
        }
    ));
    assert!(matches!(
        doc.schemas.get("Payment").unwrap().kind,
        SchemaKind::Composition {
            mode: CompositionMode::OneOf,
            ..
        }
    ));
}

#[test]
fn openapi_component_refs_resolve() {
    let doc = transform::transform(&parse::from_yaml(SHOP_V3).unwrap());

    let list = find(&doc, HttpMethod::Get, "/orders");
    assert_eq!(list.parameters[0].name, "status");
    assert_eq!(list.parameters[0].schema.kind, SchemaKind::Ref("OrderStatus".into()));

    let create = find(&doc, HttpMethod::Post, "/orders");
    let body = create.request_body.as_ref().unwrap();
    assert_eq!(body.required, Some(true));
    assert_eq!(body.description.as_deref(), Some("Order to place"));
    assert!(!body.multipart);
    assert_eq!(
        create.responses["200"].description.as_deref(),
        Some("Placed order")
    );
    assert!(create.success_schema().is_some());
}

#[test]
fn openapi_media_type_selection() {
    let doc = transform::transform(&parse::from_yaml(SHOP_V3).unwrap());

    let get = find(&doc, HttpMethod::Get, "/orders/{order_id}");
    assert_eq!(
        get.success_schema().map(|s| &s.kind),
        Some(&SchemaKind::Ref("Order".into()))
    );

    let patch = find(&doc, HttpMethod::Patch, "/orders/{order_id}");
    assert_eq!(patch.parameters[0].name, "order_id");
    assert!(patch.success_schema().is_none());
    assert!(patch.responses["default"].schema.is_some());

    let attach = find(&doc, HttpMethod::Post, "/orders/{order_id}/attachments");
    assert!(attach.request_body.as_ref().unwrap().multipart);
    assert!(attach.is_multipart());
}

#[test]
fn every_generation_run_gets_its_own_document() {
    let spec = parse::from_yaml(SHOP_V3).unwrap();
    let first = transform::transform(&spec);
    let second = transform::transform(&spec);
    assert_eq!(first, second);
}
