use std::collections::HashMap;

use profile_core::entry::{Entry, ProfileKind};
use profile_core::resolver::{UnresolvedPolicy, resolve};
use proptest::prelude::*;

/// Acyclic batch: entry `i` may only inherit from an entry `j < i`.
fn acyclic_batch() -> impl Strategy<Value = Vec<Entry>> {
    (1usize..40)
        .prop_flat_map(|len| {
            proptest::collection::vec(proptest::option::of(any::<prop::sample::Index>()), len)
        })
        .prop_map(|parents| {
            parents
                .iter()
                .enumerate()
                .map(|(i, parent)| {
                    let entry = Entry::new(
                        format!("p{i:02}"),
                        ProfileKind::Process,
                        format!("process/p{i:02}.json"),
                    );
                    match parent {
                        Some(pick) if i > 0 => entry.inheriting(format!("p{:02}", pick.index(i))),
                        _ => entry,
                    }
                })
                .collect()
        })
}

/// Arbitrary batch over a small name space, so cycles and dangling parents occur.
fn any_batch() -> impl Strategy<Value = Vec<Entry>> {
    let item = (0u8..12, proptest::option::of(0u8..14));
    proptest::collection::vec(item, 0..24).prop_map(|items| {
        let mut seen = std::collections::HashSet::new();
        items
            .into_iter()
            .filter(|(name, _)| seen.insert(*name))
            .map(|(name, parent)| {
                let entry = Entry::new(
                    format!("n{name}"),
                    ProfileKind::Filament,
                    format!("filament/n{name}.json"),
                );
                match parent {
                    Some(p) => entry.inheriting(format!("n{p}")),
                    None => entry,
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn test_parent_precedes_child(entries in acyclic_batch()) {
        let resolution = resolve(&entries, UnresolvedPolicy::AppendAtEnd);
        prop_assert!(resolution.is_complete());
        prop_assert_eq!(resolution.ordered.len(), entries.len());

        let position: HashMap<&str, usize> = resolution
            .ordered
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.as_str(), i))
            .collect();
        for entry in &resolution.ordered {
            if let Some(parent) = entry.inherits.as_deref() {
                prop_assert!(position[parent] < position[entry.name.as_str()]);
            }
        }
    }

    #[test]
    fn test_order_is_independent_of_input_order(
        entries in any_batch(),
        seed in any::<u64>()
    ) {
        let mut shuffled = entries.clone();
        // Deterministic Fisher-Yates driven by the seed
        let mut state = seed;
        for i in (1..shuffled.len()).rev() {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }

        for policy in [UnresolvedPolicy::AppendAtEnd, UnresolvedPolicy::Exclude] {
            let a = resolve(&entries, policy);
            let b = resolve(&shuffled, policy);
            prop_assert_eq!(a.names(), b.names());
            prop_assert_eq!(a.unresolved, b.unresolved);
        }
    }

    #[test]
    fn test_every_entry_accounted_for(entries in any_batch()) {
        let append = resolve(&entries, UnresolvedPolicy::AppendAtEnd);
        prop_assert_eq!(append.ordered.len(), entries.len());

        let exclude = resolve(&entries, UnresolvedPolicy::Exclude);
        prop_assert_eq!(exclude.ordered.len() + exclude.unresolved.len(), entries.len());
        prop_assert_eq!(append.has_cycles(), exclude.has_cycles());
    }
}
