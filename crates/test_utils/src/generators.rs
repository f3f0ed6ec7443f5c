//! Property-based test data generators

use proptest::prelude::*;

use crate::fixtures::IdentityFixtures;

/// Strategy producing checksum-valid national ID numbers
///
/// Birth years are kept in 1940-1999 so the encoded date is always in the
/// past regardless of when the test suite runs; days stop at 28 so every
/// month is valid.
pub fn national_id_strategy() -> impl Strategy<Value = String> {
    (40u32..=99, 1u32..=12, 1u32..=28, 0u32..=9999, 0u32..=99).prop_map(
        |(yy, month, day, sequence, tail)| {
            let prefix = format!("{yy:02}{month:02}{day:02}{sequence:04}{tail:02}");
            IdentityFixtures::complete_checksum(&prefix)
        },
    )
}

/// Strategy producing strings that are not 13 ASCII digits
pub fn malformed_id_strategy() -> impl Strategy<Value = String> {
    "[0-9a-zA-Z]{0,20}".prop_filter("well-formed ids excluded", |s| {
        !(s.len() == 13 && s.chars().all(|c| c.is_ascii_digit()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_identity::national_id;

    proptest! {
        #[test]
        fn generated_ids_always_verify(id in national_id_strategy()) {
            prop_assert!(national_id::validate_checksum(&id));
            prop_assert!(national_id::extract_gender(&id).is_some());
            prop_assert!(national_id::extract_birth_date(&id).is_some());
        }

        #[test]
        fn malformed_ids_never_verify(id in malformed_id_strategy()) {
            prop_assert!(!national_id::validate_checksum(&id));
        }
    }
}
