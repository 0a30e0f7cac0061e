use std::collections::BTreeMap;

use crate::snapshot::snapshot_model::{FieldMap, FieldValue, Snapshot, SnapshotMode};

/// Serialize a field mapping into a comparable snapshot.
///
/// Insertion-order mode produces compact JSON identical to what a browser's
/// `JSON.stringify` gives for the same object, e.g.
/// `{"username":"alice","password":""}`. Never fails.
pub fn serialize(fields: &FieldMap, mode: SnapshotMode) -> Snapshot {
    let encoded = match mode {
        SnapshotMode::InsertionOrder => serde_json::to_string(fields),
        SnapshotMode::SortedKeys => {
            let sorted: BTreeMap<&str, &FieldValue> =
                fields.iter().map(|(k, v)| (k.as_str(), v)).collect();
            serde_json::to_string(&sorted)
        }
    };

    match encoded {
        Ok(json) => Snapshot::new(json),
        Err(e) => {
            eprintln!("Warning: failed to serialize form snapshot: {}", e);
            Snapshot::new("{}")
        }
    }
}

/// Hex SHA-1 of the snapshot text. Traces carry this instead of field content.
pub fn fingerprint(snapshot: &Snapshot) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(snapshot.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}
