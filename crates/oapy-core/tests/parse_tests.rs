use oapy_core::parse;
use oapy_core::parse::parameter::{ParameterLocation, ParameterOrRef};
use oapy_core::parse::schema::{SchemaOrRef, SchemaType};

const CORPORA: &str = include_str!("fixtures/corpora.yaml");
const UPLOADS: &str = include_str!("fixtures/uploads.yaml");

#[test]
fn parse_corpora_yaml() {
    let spec = parse::from_yaml(CORPORA).expect("should parse corpora.yaml");
    assert_eq!(spec.openapi, "3.0.3");
    assert_eq!(spec.info.title, "Corpus Query API");
    assert_eq!(spec.paths.len(), 3);
    assert_eq!(spec.servers[0].url, "https://api.example.com/");
}

#[test]
fn parse_path_level_parameters() {
    let spec = parse::from_yaml(CORPORA).unwrap();
    let item = spec.paths.get("/corpora/{corpusId}").unwrap();
    assert_eq!(item.parameters.len(), 2);
    match &item.parameters[0] {
        ParameterOrRef::Parameter(p) => {
            assert_eq!(p.name.as_deref(), Some("corpusId"));
            assert_eq!(p.location, Some(ParameterLocation::Path));
            assert!(p.required);
        }
        _ => panic!("expected inline parameter"),
    }
}

#[test]
fn parse_parameter_reference() {
    let spec = parse::from_yaml(CORPORA).unwrap();
    let item = spec.paths.get("/search/concordance").unwrap();
    let op = item.get.as_ref().unwrap();
    let has_ref = op.parameters.iter().any(|p| {
        matches!(p, ParameterOrRef::Ref { ref_path } if ref_path == "#/components/parameters/PageSize")
    });
    assert!(has_ref, "should keep the $ref node at parse time");
}

#[test]
fn parse_malformed_parameter_survives() {
    // A declaration with no name must parse (it is dropped later, by the
    // classifier, not by serde).
    let spec = parse::from_yaml(CORPORA).unwrap();
    let op = spec.paths["/search/concordance"].get.as_ref().unwrap();
    let nameless = op.parameters.iter().any(|p| {
        matches!(p, ParameterOrRef::Parameter(param) if param.name.is_none())
    });
    assert!(nameless);
}

#[test]
fn parse_multipart_body_schema_ref() {
    let spec = parse::from_yaml(UPLOADS).unwrap();
    let op = spec.paths["/documents"].post.as_ref().unwrap();
    let body = op.request_body.as_ref().unwrap();
    match body {
        oapy_core::parse::request_body::RequestBodyOrRef::RequestBody(rb) => {
            assert!(rb.required);
            let mt = rb.content.get("multipart/form-data").unwrap();
            assert!(matches!(mt.schema, Some(SchemaOrRef::Ref { .. })));
        }
        _ => panic!("expected inline request body"),
    }
}

#[test]
fn parse_component_schema_properties() {
    let spec = parse::from_yaml(UPLOADS).unwrap();
    let components = spec.components.as_ref().unwrap();
    let upload = components.schemas.get("DocumentUpload").unwrap();
    match upload {
        SchemaOrRef::Schema(s) => {
            assert_eq!(s.schema_type, Some(SchemaType::Object));
            assert_eq!(s.required, vec!["title", "cover"]);
            assert_eq!(s.properties.len(), 4);
            match s.properties.get("attachments").unwrap() {
                SchemaOrRef::Schema(attachments) => {
                    assert_eq!(attachments.schema_type, Some(SchemaType::Array));
                    match attachments.items.as_deref().unwrap() {
                        SchemaOrRef::Schema(items) => assert!(items.is_binary()),
                        _ => panic!("expected inline items schema"),
                    }
                }
                _ => panic!("expected inline property schema"),
            }
        }
        _ => panic!("expected inline schema"),
    }
}

#[test]
fn parse_json_input() {
    let json = r#"{
        "openapi": "3.0.0",
        "info": {"title": "Minimal", "version": "1.0"},
        "paths": {"/ping": {"get": {"summary": "Ping"}}}
    }"#;
    let spec = parse::from_json(json).expect("should parse JSON spec");
    assert_eq!(spec.info.title, "Minimal");
    assert!(spec.paths["/ping"].get.is_some());
}

#[test]
fn parse_invalid_version() {
    let yaml = r#"
openapi: "2.0.0"
info:
  title: Test
  version: "1.0"
paths: {}
"#;
    let result = parse::from_yaml(yaml);
    assert!(matches!(
        result,
        Err(oapy_core::error::ParseError::UnsupportedVersion(_))
    ));
}
