//! Edge-case coverage for the obfuscating serializer.
//!
//! These tests focus on absent values, serde attributes that influence the
//! serialized keys, generic and recursive records, custom or partial
//! registries, and the failure modes that must never degrade to pass-through.

use std::{borrow::Cow, collections::VecDeque, marker::PhantomData};

use obfuscation::{
    obfuscate_ip, ConfigurationError, FieldDescriptor, FieldKind, Obfuscatable, Obfuscate,
    ObfuscatedType, ObfuscatingSerializer, ObfuscationError, ObfuscationType, PolicyRegistry,
    Substitution, TextSubstitution, DEFAULT_MAX_DEPTH,
};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize, Obfuscate)]
struct Profile {
    #[obfuscate(UserName)]
    user: Option<String>,
    #[obfuscate(IpAddress)]
    ip: Option<String>,
    #[obfuscate(Authors)]
    authors: Option<String>,
    #[obfuscate(UserKey)]
    key: Option<u32>,
    #[obfuscate(UserNameList)]
    owners: Option<Vec<String>>,
}

fn empty_profile() -> Profile {
    Profile {
        user: None,
        ip: None,
        authors: None,
        key: None,
        owners: None,
    }
}

// ============================================================================
// Absent values
// ============================================================================

#[test]
fn test_absent_values_follow_category_rules() {
    let result = empty_profile().to_obfuscated_value().unwrap();
    assert_eq!(
        result,
        json!({
            "user": "ObfuscatedUserName",
            "ip": null,
            "authors": "",
            "key": -1,
            "owners": []
        })
    );
}

#[test]
fn test_empty_user_name_list_stays_empty() {
    let profile = Profile {
        owners: Some(Vec::new()),
        ..empty_profile()
    };
    let result = profile.to_obfuscated_value().unwrap();
    assert_eq!(result["owners"], json!([]));
}

#[test]
fn test_user_name_list_is_replaced_element_for_element() {
    let profile = Profile {
        owners: Some(vec!["a".into(), "b".into(), "c".into()]),
        ..empty_profile()
    };
    let result = profile.to_obfuscated_value().unwrap();
    assert_eq!(
        result["owners"],
        json!(["ObfuscatedUserName", "ObfuscatedUserName", "ObfuscatedUserName"])
    );
}

#[test]
fn test_absent_element_in_user_name_list_fails() {
    static FIELDS: &[FieldDescriptor] = &[FieldDescriptor::obfuscate(
        "owners",
        ObfuscationType::UserNameList,
        FieldKind::TextCollection,
    )];
    let mut document = json!({ "owners": ["alice", null] });
    let result = ObfuscatingSerializer::standard().obfuscate_document(&mut document, FIELDS);
    assert!(matches!(
        result,
        Err(ObfuscationError::Configuration(
            ConfigurationError::UnexpectedValue {
                field: "owners",
                expected: FieldKind::TextCollection
            }
        ))
    ));
}

// ============================================================================
// IP addresses
// ============================================================================

#[test]
fn test_non_ipv4_values_are_unchanged() {
    for value in ["::1", "fe80::1", "localhost", "", "1.2.3", "256.1.1.1"] {
        assert_eq!(obfuscate_ip(value), value);
    }
}

#[test]
fn test_ipv6_field_passes_through_category() {
    let profile = Profile {
        ip: Some("2001:db8::1".into()),
        ..empty_profile()
    };
    let result = profile.to_obfuscated_value().unwrap();
    assert_eq!(result["ip"], "2001:db8::1");
}

// ============================================================================
// serde attributes
// ============================================================================

#[test]
fn test_serialize_rename_is_followed() {
    #[derive(Serialize, Obfuscate)]
    struct Renamed {
        #[serde(rename(serialize = "Who"))]
        #[obfuscate(UserName)]
        who: String,
        #[serde(rename = "type")]
        kind: String,
    }

    let record = Renamed {
        who: "alice".into(),
        kind: "Delete".into(),
    };
    let result = record.to_obfuscated_value().unwrap();
    assert_eq!(result, json!({ "Who": "ObfuscatedUserName", "type": "Delete" }));
}

#[test]
fn test_raw_identifier_uses_serialized_name() {
    #[derive(Serialize, Obfuscate)]
    struct Raw {
        #[obfuscate(UserName)]
        r#type: String,
    }

    let result = Raw {
        r#type: "alice".into(),
    }
    .to_obfuscated_value()
    .unwrap();
    assert_eq!(result, json!({ "type": "ObfuscatedUserName" }));
}

#[test]
fn test_skipped_fields_are_ignored() {
    #[derive(Serialize, Obfuscate)]
    struct Sparse {
        #[serde(skip_serializing_if = "Option::is_none")]
        #[obfuscate(UserName)]
        user: Option<String>,
        #[serde(skip)]
        #[obfuscate(IpAddress)]
        #[allow(dead_code)]
        ip: String,
        note: String,
    }

    let record = Sparse {
        user: None,
        ip: "10.1.2.3".into(),
        note: "kept".into(),
    };
    let result = record.to_obfuscated_value().unwrap();
    assert_eq!(result, json!({ "note": "kept" }));
}

// ============================================================================
// Field types
// ============================================================================

#[test]
fn test_borrowed_and_boxed_text_fields() {
    #[derive(Serialize, Obfuscate)]
    struct Borrowed<'a> {
        #[obfuscate(UserName)]
        user: &'a str,
        #[obfuscate(IpAddress)]
        ip: Cow<'a, str>,
        #[obfuscate(Authors)]
        authors: Box<String>,
        #[obfuscate(UserNameList)]
        owners: VecDeque<&'a str>,
    }

    let record = Borrowed {
        user: "alice",
        ip: Cow::Borrowed("172.16.9.9"),
        authors: Box::new("alice, bob".to_string()),
        owners: VecDeque::from(["alice", "bob"]),
    };
    let result = record.to_obfuscated_value().unwrap();
    assert_eq!(
        result,
        json!({
            "user": "ObfuscatedUserName",
            "ip": "172.16.9.0",
            "authors": "",
            "owners": ["ObfuscatedUserName", "ObfuscatedUserName"]
        })
    );
}

#[test]
fn test_plain_integer_user_key() {
    #[derive(Serialize, Obfuscate)]
    struct Key {
        #[obfuscate(UserKey)]
        key: u64,
    }

    let result = Key { key: u64::MAX }.to_obfuscated_value().unwrap();
    assert_eq!(result, json!({ "key": -1 }));
}

#[test]
fn test_walk_through_arrays_and_references() {
    #[derive(Serialize, Obfuscate)]
    struct Leaf {
        #[obfuscate(UserName)]
        name: String,
    }

    #[derive(Serialize, Obfuscate)]
    struct Holder<'a> {
        #[obfuscate]
        pair: [Leaf; 2],
        #[obfuscate]
        borrowed: &'a Leaf,
        #[obfuscate]
        queue: VecDeque<Leaf>,
    }

    let borrowed = Leaf { name: "c".into() };
    let holder = Holder {
        pair: [Leaf { name: "a".into() }, Leaf { name: "b".into() }],
        borrowed: &borrowed,
        queue: VecDeque::from([Leaf { name: "d".into() }]),
    };
    let result = holder.to_obfuscated_value().unwrap();
    assert_eq!(
        result,
        json!({
            "pair": [{ "name": "ObfuscatedUserName" }, { "name": "ObfuscatedUserName" }],
            "borrowed": { "name": "ObfuscatedUserName" },
            "queue": [{ "name": "ObfuscatedUserName" }]
        })
    );
}

// ============================================================================
// Generic and recursive records
// ============================================================================

#[derive(Serialize, Obfuscate)]
struct Envelope<T, P> {
    #[obfuscate(UserName)]
    sender: String,
    #[obfuscate]
    body: T,
    payload: P,
}

#[derive(Serialize, Obfuscate)]
struct Contact {
    #[obfuscate(IpAddress)]
    ip: String,
}

#[derive(Serialize, Obfuscate)]
struct Tagged<T> {
    #[obfuscate(UserName)]
    owner: T,
    #[serde(skip)]
    marker: PhantomData<T>,
}

#[test]
fn test_generic_walked_field() {
    let envelope = Envelope {
        sender: "alice".to_string(),
        body: vec![Contact {
            ip: "8.8.4.4".to_string(),
        }],
        payload: 2.5,
    };
    let result = envelope.to_obfuscated_value().unwrap();
    assert_eq!(
        result,
        json!({
            "sender": "ObfuscatedUserName",
            "body": [{ "ip": "8.8.4.0" }],
            "payload": 2.5
        })
    );
}

#[test]
fn test_generic_obfuscated_field() {
    let tagged = Tagged {
        owner: Some("alice".to_string()),
        marker: PhantomData,
    };
    let result = tagged.to_obfuscated_value().unwrap();
    assert_eq!(result, json!({ "owner": "ObfuscatedUserName" }));
}

#[derive(Serialize, Obfuscate)]
struct Folder {
    #[obfuscate(UserName)]
    owner: String,
    #[obfuscate]
    children: Vec<Folder>,
}

fn folder_tree(depth: usize) -> Folder {
    Folder {
        owner: format!("owner{depth}"),
        children: if depth == 0 {
            Vec::new()
        } else {
            vec![folder_tree(depth - 1)]
        },
    }
}

#[test]
fn test_recursive_record_is_obfuscated_at_every_level() {
    let result = folder_tree(2).to_obfuscated_value().unwrap();
    assert_eq!(
        result,
        json!({
            "owner": "ObfuscatedUserName",
            "children": [{
                "owner": "ObfuscatedUserName",
                "children": [{ "owner": "ObfuscatedUserName", "children": [] }]
            }]
        })
    );
}

#[test]
fn test_default_depth_limit() {
    let within = folder_tree(DEFAULT_MAX_DEPTH - 1);
    assert!(within.to_obfuscated_value().is_ok());

    let beyond = folder_tree(DEFAULT_MAX_DEPTH);
    assert!(matches!(
        beyond.to_obfuscated_value(),
        Err(ObfuscationError::DepthExceeded {
            limit: DEFAULT_MAX_DEPTH
        })
    ));
}

// ============================================================================
// Roots
// ============================================================================

#[test]
fn test_absent_root_fails() {
    let root: Option<Contact> = None;
    let err = root.to_obfuscated_string().unwrap_err();
    assert_eq!(err.to_string(), "Cannot obfuscate root value: the root value is absent");
}

#[test]
fn test_present_optional_and_boxed_roots() {
    let root = Some(Contact {
        ip: "1.2.3.4".into(),
    });
    assert_eq!(root.to_obfuscated_value().unwrap(), json!({ "ip": "1.2.3.0" }));

    let boxed = Box::new(Contact {
        ip: "1.2.3.4".into(),
    });
    assert_eq!(boxed.to_obfuscated_value().unwrap(), json!({ "ip": "1.2.3.0" }));
}

#[test]
fn test_scalar_document_fails() {
    let mut document = json!(42);
    let result = ObfuscatingSerializer::standard()
        .obfuscate_document(&mut document, Contact::field_table());
    assert!(matches!(result, Err(ObfuscationError::Construction { .. })));
    assert_eq!(document, json!(42));
}

// ============================================================================
// Registries
// ============================================================================

#[test]
fn test_custom_substitution_is_applied() {
    let registry = PolicyRegistry::builder()
        .register(
            ObfuscationType::UserName,
            Substitution::Text(TextSubstitution::placeholder("[user]")),
        )
        .with_standard_entries()
        .build();
    assert!(registry.is_total());

    let profile = Profile {
        user: Some("alice".into()),
        owners: Some(vec!["bob".into()]),
        ..empty_profile()
    };
    let result = ObfuscatingSerializer::new(&registry)
        .serialize(&profile)
        .unwrap();
    assert_eq!(result["user"], "[user]");
    assert_eq!(result["owners"], json!(["ObfuscatedUserName"]));
}

#[test]
fn test_partial_registry_fails_for_missing_category() {
    let registry = PolicyRegistry::builder()
        .register(
            ObfuscationType::IpAddress,
            Substitution::standard(ObfuscationType::IpAddress),
        )
        .build();
    assert!(!registry.is_total());

    let contact = Contact {
        ip: "4.4.4.4".into(),
    };
    assert!(ObfuscatingSerializer::new(&registry)
        .serialize(&contact)
        .is_ok());

    let err = ObfuscatingSerializer::new(&registry)
        .serialize(&empty_profile())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "No substitution registered for category `UserName`"
    );
}

#[test]
fn test_kind_mismatch_fails() {
    let registry = PolicyRegistry::builder()
        .register(ObfuscationType::IpAddress, Substitution::Sentinel(0))
        .build();
    let contact = Contact {
        ip: "4.4.4.4".into(),
    };
    let result = ObfuscatingSerializer::new(&registry).serialize(&contact);
    assert!(matches!(
        result,
        Err(ObfuscationError::Configuration(
            ConfigurationError::KindMismatch {
                field: "ip",
                category: ObfuscationType::IpAddress,
                kind: FieldKind::Text
            }
        ))
    ));
}

#[test]
fn test_user_key_on_text_field_fails_with_standard_registry() {
    #[derive(Serialize, Obfuscate)]
    struct Misdeclared {
        #[obfuscate(UserKey)]
        key: String,
    }

    let err = Misdeclared { key: "42".into() }
        .to_obfuscated_value()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Category `UserKey` cannot be applied to text field `key`"
    );
}

// ============================================================================
// Debug
// ============================================================================

#[test]
fn test_debug_hides_annotated_fields() {
    #[derive(Serialize, Obfuscate)]
    struct Session {
        id: u32,
        #[obfuscate(UserName)]
        user: String,
        #[obfuscate]
        contact: Contact,
    }

    let session = Session {
        id: 7,
        user: "alice".into(),
        contact: Contact {
            ip: "9.9.9.9".into(),
        },
    };
    let debug = format!("{session:?}");
    assert_eq!(
        debug,
        r#"Session { id: 7, user: "[obfuscated]", contact: "[obfuscated]" }"#
    );
    assert!(!debug.contains("alice"));
    assert!(!debug.contains("9.9.9.9"));
}

#[test]
fn test_skip_debug_allows_custom_impl() {
    #[derive(Serialize, Obfuscate)]
    #[obfuscate(skip_debug)]
    struct Quiet {
        #[obfuscate(UserName)]
        user: String,
    }

    impl std::fmt::Debug for Quiet {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("Quiet")
        }
    }

    let quiet = Quiet {
        user: "alice".into(),
    };
    assert_eq!(format!("{quiet:?}"), "Quiet");
    assert_eq!(
        quiet.to_obfuscated_value().unwrap(),
        json!({ "user": "ObfuscatedUserName" })
    );
}

#[test]
fn test_field_table_describes_declared_fields() {
    let names: Vec<&str> = Profile::field_table()
        .iter()
        .map(FieldDescriptor::name)
        .collect();
    assert_eq!(names, ["user", "ip", "authors", "key", "owners"]);

    let kinds: Vec<FieldKind> = Profile::field_table()
        .iter()
        .map(FieldDescriptor::kind)
        .collect();
    assert_eq!(
        kinds,
        [
            FieldKind::Text,
            FieldKind::Text,
            FieldKind::Text,
            FieldKind::OptionalInteger,
            FieldKind::TextCollection
        ]
    );
    assert_eq!(
        Profile::field_table()[0].category(),
        Some(ObfuscationType::UserName)
    );
}
