use std::{fs, path::PathBuf, str::FromStr};

use controller_codegen::{
    Crd,
    codegen::compare_resource,
    config::{FlavorConfig, GeneratorConfig},
    model::{ResourceDefinition, ScalarKind, TypeKind},
};
use field_path::FieldPath;
use rstest::rstest;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(path)
}

fn load(input: &str) -> Crd {
    let config = GeneratorConfig::from_file(fixture("generator.yaml"))
        .expect("generator config must load");

    let definition = fs::read_to_string(fixture(&format!("inputs/{input}.yaml")))
        .expect("resource definition must be readable");
    let definition =
        ResourceDefinition::from_yaml_str(&definition).expect("resource definition must parse");

    Crd::from_config(&definition, &config).expect("resource model must build")
}

#[rstest]
#[case("s3_bucket")]
#[case("lambda_code_signing_config")]
#[case("lambda_function")]
fn golden_fragments(#[case] input: &str) {
    let crd = load(input);
    let expected = fs::read_to_string(fixture(&format!("expected/{input}.go")))
        .expect("expected fragment must be readable");

    let fragment = compare_resource(crd.config(), &crd, "delta", "a.ko", "b.ko", 1)
        .expect("fragment must generate");

    assert_eq!(fragment, expected);
}

#[test]
fn ignored_field_is_absent() {
    let crd = load("s3_bucket");
    let acl = FieldPath::from_str("ACL").expect("field path must be valid");

    assert!(crd.is_ignored(&acl));

    let fragment = compare_resource(crd.config(), &crd, "delta", "a.ko", "b.ko", 1)
        .expect("fragment must generate");
    assert!(!fragment.contains("ACL,"));
    assert!(!fragment.contains("Spec.ACL"));
}

#[test]
fn crossplane_flavor_prefixes_every_access() {
    let crd = load("lambda_code_signing_config");
    let ack = fs::read_to_string(fixture("expected/lambda_code_signing_config.go"))
        .expect("expected fragment must be readable");

    let fragment = compare_resource(&FlavorConfig::crossplane(), &crd, "delta", "a.ko", "b.ko", 1)
        .expect("fragment must generate");

    assert_eq!(
        fragment,
        ack.replace(".Spec.", ".Spec.ForProvider.")
            .replace("\"Spec.", "\"Spec.ForProvider.")
    );
}

#[test]
fn wildcard_secret_resolves() {
    let crd = load("mq_broker");
    let password = FieldPath::from_str("Users..Password").expect("field path must be valid");

    let field = crd.resolve(&password).expect("wildcard path must resolve");
    assert_eq!(field.kind(), TypeKind::OptionalScalar(ScalarKind::String));
    assert!(field.is_secret());
    assert!(field.config().is_some_and(|config| config.is_secret));
    assert!(crd.is_secret(&password));

    let username = FieldPath::from_str("Users..Username").expect("field path must be valid");
    assert!(!crd.is_secret(&username));

    let users = crd
        .resolve(&FieldPath::from_str("Users").expect("field path must be valid"))
        .expect("Users must resolve");
    assert_eq!(users.kind(), TypeKind::ListOfStruct);
    assert!(users.children().is_empty());
    assert_eq!(users.element_members().len(), 4);
}

#[test]
fn list_of_struct_members_are_not_traversed() {
    let crd = load("mq_broker");

    let fragment = compare_resource(crd.config(), &crd, "delta", "a.ko", "b.ko", 1)
        .expect("fragment must generate");

    assert!(fragment.contains("\tif !reflect.DeepEqual(a.ko.Spec.Users, b.ko.Spec.Users) {\n"));
    assert!(!fragment.contains("Password"));
    assert_eq!(fragment.matches("delta.Add(\"Spec.Users\"").count(), 1);
}
