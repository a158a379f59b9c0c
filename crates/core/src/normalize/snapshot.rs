use crate::domain::payload::Metric;
use crate::domain::view_model::Snapshot;
use indexmap::IndexMap;

/// `None` means no feature map was received; `Some` of an empty map means one
/// was received without entries. Values are not coerced here.
pub fn build_snapshot(features: Option<&IndexMap<String, Metric>>) -> Option<Snapshot> {
    features.cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payload::RawPayload;
    use serde_json::json;

    #[test]
    fn absent_and_empty_maps_stay_distinct() {
        let absent = RawPayload::from_value(&json!({})).unwrap();
        assert_eq!(build_snapshot(absent.features.as_ref()), None);

        let empty = RawPayload::from_value(&json!({"features": {}})).unwrap();
        assert_eq!(build_snapshot(empty.features.as_ref()), Some(Snapshot::new()));
    }

    #[test]
    fn copies_values_verbatim() {
        let p = RawPayload::from_value(&json!({
            "features": {"INFLATION": 2.9, "cashRatio": null, "note": "n/a"}
        }))
        .unwrap();

        let snapshot = build_snapshot(p.features.as_ref()).unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot["INFLATION"].as_number(), Some(2.9));
        assert_eq!(snapshot["cashRatio"], Metric::null());
        assert_eq!(snapshot["note"], Metric::from(json!("n/a")));
    }
}
