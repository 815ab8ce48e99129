//! Splitting board rows by direction of travel.

use serde::Serialize;

use super::display::DisplayTrain;

/// `direction` value for trains heading towards the city terminal.
pub const INBOUND_MARKER: &str = "上り";

/// Board rows split by direction. Each group keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectionalTrains {
    pub inbound: Vec<DisplayTrain>,
    /// Everything that is not exactly [`INBOUND_MARKER`].
    pub outbound: Vec<DisplayTrain>,
}

/// Partition rows into inbound and outbound.
pub fn categorize_by_direction(trains: Vec<DisplayTrain>) -> DirectionalTrains {
    let (inbound, outbound) = trains
        .into_iter()
        .partition(|train| train.direction == INBOUND_MARKER);

    DirectionalTrains { inbound, outbound }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::display::convert_to_display_trains;
    use crate::board::display::tests::{arrival, board};

    fn rows(layout: &[(&str, &str)]) -> Vec<DisplayTrain> {
        let trains = layout
            .iter()
            .map(|(number, direction)| arrival(number, "10:00", "各停", direction))
            .collect();
        convert_to_display_trains(Some(&board(trains)))
    }

    #[test]
    fn empty_input() {
        let split = categorize_by_direction(Vec::new());
        assert!(split.inbound.is_empty());
        assert!(split.outbound.is_empty());
    }

    #[test]
    fn partitions_preserving_order() {
        let split = categorize_by_direction(rows(&[
            ("1", "上り"),
            ("2", "下り"),
            ("3", "上り"),
            ("4", "下り"),
        ]));

        let ids = |v: &[DisplayTrain]| v.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&split.inbound), vec!["1-0", "3-2"]);
        assert_eq!(ids(&split.outbound), vec!["2-1", "4-3"]);
    }

    #[test]
    fn unknown_directions_are_outbound() {
        let split = categorize_by_direction(rows(&[("1", ""), ("2", "上り "), ("3", "inbound")]));
        assert!(split.inbound.is_empty());
        assert_eq!(split.outbound.len(), 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Every row lands in exactly one group
            #[test]
            fn partition_is_complete(dirs in proptest::collection::vec(
                prop_oneof![Just("上り"), Just("下り"), Just("")], 0..40)
            ) {
                let layout: Vec<(String, &str)> = dirs
                    .iter()
                    .enumerate()
                    .map(|(i, d)| (i.to_string(), *d))
                    .collect();
                let layout: Vec<(&str, &str)> = layout.iter().map(|(n, d)| (n.as_str(), *d)).collect();

                let input = rows(&layout);
                let total = input.len();
                let split = categorize_by_direction(input);

                prop_assert_eq!(split.inbound.len() + split.outbound.len(), total);
                prop_assert!(split.inbound.iter().all(|t| t.direction == INBOUND_MARKER));
                prop_assert!(split.outbound.iter().all(|t| t.direction != INBOUND_MARKER));
            }
        }
    }
}
