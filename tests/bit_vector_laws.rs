//! Property-based tests for the bit vector and cursor engine.
//!
//! A `BitVector` is checked against a `Vec<bool>` model:
//!
//! 1. **Scan agreement**: `iter_set` / `iter_clear` list exactly the model's
//!    true / false positions, ascending, and partition `0..len`
//! 2. **Count agreement**: `count_ones + count_zeros == len`
//! 3. **Scan bounds**: `next_clear` never reports a position `>= len`
//! 4. **Cursor removal**: removing every visited position flips exactly those
//!    bits, whichever direction the cursor walks

use fixed_key_map::bits::{BitCursor, BitState, BitVector, ElementRemoval, remove_at};
use proptest::prelude::*;
use rstest::rstest;

fn bits_from(model: &[bool]) -> BitVector {
    BitVector::from_set_indices(
        model.len(),
        model
            .iter()
            .enumerate()
            .filter_map(|(index, bit)| bit.then_some(index)),
    )
}

/// Slots that hold a value exactly where the bit is set.
struct Slots {
    presence: BitVector,
    values: Vec<Option<usize>>,
}

impl ElementRemoval for Slots {
    type Removed = usize;
    type Error = std::convert::Infallible;

    fn presence_mut(&mut self) -> &mut BitVector {
        &mut self.presence
    }

    fn remove_element(&mut self, index: usize) -> Result<Option<usize>, Self::Error> {
        Ok(self.values[index].take())
    }
}

proptest! {
    #[test]
    fn prop_scans_match_model(model in prop::collection::vec(any::<bool>(), 0..300)) {
        let bits = bits_from(&model);

        let set: Vec<usize> = bits.iter_set().collect();
        let clear: Vec<usize> = bits.iter_clear().collect();
        let expected_set: Vec<usize> = (0..model.len()).filter(|index| model[*index]).collect();
        let expected_clear: Vec<usize> = (0..model.len()).filter(|index| !model[*index]).collect();

        prop_assert_eq!(&set, &expected_set);
        prop_assert_eq!(&clear, &expected_clear);
        prop_assert_eq!(bits.count_ones(), set.len());
        prop_assert_eq!(bits.count_ones() + bits.count_zeros(), bits.len());
        prop_assert_eq!(bits.all(), clear.is_empty());
        prop_assert_eq!(bits.none(), set.is_empty());
    }

    #[test]
    fn prop_next_scans_stay_in_range(
        model in prop::collection::vec(any::<bool>(), 0..300),
        from in 0usize..400,
    ) {
        let bits = bits_from(&model);
        if let Some(index) = bits.next_clear(from) {
            prop_assert!(index < bits.len());
            prop_assert!(index >= from);
            prop_assert!(!bits.get(index));
        }
        if let Some(index) = bits.next_set(from) {
            prop_assert!(index < bits.len());
            prop_assert!(index >= from);
            prop_assert!(bits.get(index));
        }
    }

    #[test]
    fn prop_full_has_no_clear_bits(len in 0usize..300) {
        let bits = BitVector::full(len);
        prop_assert_eq!(bits.count_ones(), len);
        prop_assert_eq!(bits.next_clear(0), None);
        prop_assert_eq!(bits.iter_clear().count(), 0);
    }

    #[test]
    fn prop_assign_matches_model(
        model in prop::collection::vec(any::<bool>(), 1..200),
        writes in prop::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 0..50),
    ) {
        let mut bits = bits_from(&model);
        let mut model = model;
        for (index, value) in writes {
            let index = index.index(model.len());
            bits.assign(index, value);
            model[index] = value;
        }
        prop_assert_eq!(bits, bits_from(&model));
    }

    #[test]
    fn prop_cursor_removal_over_set_bits(
        model in prop::collection::vec(any::<bool>(), 0..200),
        keep_every in 1usize..5,
    ) {
        let mut slots = Slots {
            presence: bits_from(&model),
            values: model.iter().enumerate().map(|(index, bit)| bit.then_some(index)).collect(),
        };

        let mut cursor = BitCursor::over_set();
        let mut visited = 0;
        let mut removed = Vec::new();
        while let Some(index) = cursor.advance(&slots.presence) {
            visited += 1;
            if visited % keep_every != 0 {
                let Ok(value) = cursor.remove_current(&mut slots);
                prop_assert_eq!(value, Some(index));
                removed.push(index);
            }
        }

        for index in &removed {
            prop_assert!(!slots.presence.get(*index));
            prop_assert_eq!(slots.values[*index], None);
        }
        prop_assert_eq!(slots.presence.count_ones(), visited - removed.len());
        for index in slots.presence.iter_set() {
            prop_assert_eq!(slots.values[index], Some(index));
        }
    }

    #[test]
    fn prop_cursor_over_clear_bits_fills_every_gap(
        model in prop::collection::vec(any::<bool>(), 0..200),
    ) {
        let mut slots = Slots {
            presence: bits_from(&model),
            values: vec![None; model.len()],
        };

        let mut cursor = BitCursor::over_clear();
        while cursor.advance(&slots.presence).is_some() {
            let Ok(_) = cursor.remove_current(&mut slots);
        }

        prop_assert!(slots.presence.all());
    }
}

#[rstest]
#[case(BitState::Set)]
#[case(BitState::Clear)]
fn test_remove_at_twice_leaves_same_bits(#[case] visiting: BitState) {
    let mut slots = Slots {
        presence: BitVector::from_set_indices(4, [1, 3]),
        values: vec![None, Some(1), None, Some(3)],
    };
    let index = slots.presence.next_in_state(0, visiting).unwrap_or(0);

    let Ok(_) = remove_at(&mut slots, index, visiting);
    let after_first = slots.presence.clone();
    let Ok(second) = remove_at(&mut slots, index, visiting);

    assert_eq!(second, None);
    assert_eq!(slots.presence, after_first);
    assert_eq!(slots.presence.get(index), visiting.absent());
}
