//! Unit tests for the identifiers module
//!
//! Tests cover identifier creation, parsing, conversion, and display
//! formatting across the registry identifier types.

use registry_kernel::{PersonId, DraftId, DocumentId, AddressId, SessionId, UserId};
use uuid::Uuid;

mod person_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = PersonId::new();
        let id2 = PersonId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = PersonId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = PersonId::new_v7();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = PersonId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(PersonId::prefix(), "PRS");
    }

    #[test]
    fn test_from_str_with_prefix() {
        let original = PersonId::new();
        let string = original.to_string();
        let parsed: PersonId = string.parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_json_serialization() {
        let id = PersonId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: PersonId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}

mod draft_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = DraftId::new();
        let id2 = DraftId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_display_format() {
        let id = DraftId::new();
        assert!(id.to_string().starts_with("DRF-"));
    }

    #[test]
    fn test_roundtrip() {
        let original = DraftId::new();
        let parsed: DraftId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }
}

mod cross_type_tests {
    use super::*;

    #[test]
    fn test_different_id_types_are_distinct() {
        // Same UUID should create different identifier instances
        // that are type-safe (can't mix PersonId with DraftId)
        let uuid = Uuid::new_v4();
        let person_id = PersonId::from_uuid(uuid);
        let draft_id = DraftId::from_uuid(uuid);

        // They contain the same UUID but are different types
        assert_eq!(*person_id.as_uuid(), *draft_id.as_uuid());
    }

    #[test]
    fn test_id_prefixes_are_unique() {
        let prefixes = vec![
            PersonId::prefix(),
            DraftId::prefix(),
            DocumentId::prefix(),
            AddressId::prefix(),
            SessionId::prefix(),
            UserId::prefix(),
        ];

        let mut unique_prefixes: Vec<&str> = prefixes.clone();
        unique_prefixes.sort();
        unique_prefixes.dedup();

        assert_eq!(
            prefixes.len(),
            unique_prefixes.len(),
            "All identifier prefixes should be unique"
        );
    }

    #[test]
    fn test_nil_uuid() {
        let nil_uuid = Uuid::nil();
        let id = DocumentId::from_uuid(nil_uuid);
        assert!(id.as_uuid().is_nil());
    }
}
