use crate::codec::pack;
use crate::data::node::RawNodeObservation;
use crate::data::NodeGrouping;
use crate::ids::IdResolver;

/// Resolves observations to ids and groups them per map.
///
/// Observations with an unmapped map or node name are dropped. A repeated
/// location on the same map keeps the node id of the last observation.
pub fn aggregate<I>(observations: I, ids: &IdResolver) -> NodeGrouping
where
    I: IntoIterator<Item = RawNodeObservation>,
{
    let mut grouping = NodeGrouping::new();
    for observation in observations {
        let (Some(map_id), Some(node_id)) = (
            ids.map_id(&observation.map_name),
            ids.node_id(&observation.node_name),
        ) else {
            continue;
        };
        grouping.insert(map_id, pack(observation.x, observation.y), node_id);
    }
    grouping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::NameMapping;

    fn resolver() -> IdResolver {
        IdResolver::new(
            NameMapping::from([
                ("Testland".to_string(), 42),
                ("Otherland".to_string(), 7),
            ]),
            NameMapping::from([("Foo".to_string(), 99), ("Bar".to_string(), 100)]),
        )
    }

    #[test]
    fn drops_unmapped_names() {
        let grouping = aggregate(
            vec![
                RawNodeObservation::new("Nowhere", "Foo", 1.0, 2.0),
                RawNodeObservation::new("Testland", "Unknown", 1.0, 2.0),
                RawNodeObservation::new("Testland", "Foo", 3.0, 4.0),
            ],
            &resolver(),
        );
        assert_eq!(grouping.node_count(), 1);
        assert_eq!(grouping.get(42, pack(3.0, 4.0)), Some(99));
    }

    #[test]
    fn last_write_wins_per_location() {
        let grouping = aggregate(
            vec![
                RawNodeObservation::new("Testland", "Foo", 1.0, 2.0),
                RawNodeObservation::new("Testland", "Bar", 1.0, 2.0),
            ],
            &resolver(),
        );
        assert_eq!(grouping.node_count(), 1);
        assert_eq!(grouping.get(42, pack(1.0, 2.0)), Some(100));
    }

    #[test]
    fn keeps_first_seen_order() {
        let grouping = aggregate(
            vec![
                RawNodeObservation::new("Otherland", "Foo", 5.0, 5.0),
                RawNodeObservation::new("Testland", "Foo", 9.0, 9.0),
                RawNodeObservation::new("Testland", "Foo", 1.0, 1.0),
                RawNodeObservation::new("Otherland", "Bar", 5.0, 5.0),
            ],
            &resolver(),
        );
        let maps: Vec<_> = grouping.maps().map(|(id, _)| *id).collect();
        assert_eq!(maps, vec![7, 42]);

        let (_, testland) = grouping.maps().nth(1).unwrap();
        let coords: Vec<_> = testland.keys().copied().collect();
        assert_eq!(coords, vec![pack(9.0, 9.0), pack(1.0, 1.0)]);
        assert_eq!(grouping.get(7, pack(5.0, 5.0)), Some(100));
    }

    #[test]
    fn empty_input_gives_empty_grouping() {
        let grouping = aggregate(Vec::new(), &IdResolver::default());
        assert!(grouping.is_empty());
    }
}
