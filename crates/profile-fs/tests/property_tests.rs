use profile_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalized_path_has_no_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
    }

    #[test]
    fn test_join_then_relative_to_roundtrips(
        base in "/[a-zA-Z0-9 _-]{1,12}(/[a-zA-Z0-9 _-]{1,12}){0,3}",
        sub in "[a-zA-Z0-9 ._-]{1,12}(/[a-zA-Z0-9 ._-]{1,12}){0,3}",
    ) {
        let base = NormalizedPath::new(&base);
        let joined = base.join(&sub);
        prop_assert_eq!(joined.relative_to(&base), Some(sub));
    }
}
