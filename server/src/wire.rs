//! JSON request/response bodies shared by the server and [`crate::client`].

use serde::{Deserialize, Serialize};

use crate::processing::{Batch, Processed};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Body of `POST /process-single` and `POST /process-concurrent`.
pub struct SortRequest {
    pub to_sort: Batch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Successful sort response.
pub struct SortResponse {
    pub sorted_arrays: Batch,
    /// Processing time in nanoseconds, excluding request decoding and response encoding.
    pub time_ns: u64,
}

impl From<Processed> for SortResponse {
    fn from(value: Processed) -> Self {
        let time_ns = value.time_ns();
        Self {
            sorted_arrays: value.sorted_arrays,
            time_ns,
        }
    }
}

/// Decode a request body; the error message is what clients see on a 400.
pub fn decode_request(body: &[u8]) -> Result<SortRequest, serde_json::Error> {
    serde_json::from_slice(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_are_ignored() {
        let req = decode_request(br#"{"to_sort": [[2, 1]], "extra": true}"#).unwrap();
        assert_eq!(req.to_sort, vec![vec![2, 1]]);
    }

    #[test]
    fn missing_to_sort_is_rejected() {
        let err = decode_request(br#"{"arrays": [[1]]}"#).unwrap_err();
        assert!(err.to_string().contains("to_sort"), "{err}");
    }

    #[test]
    fn non_integer_elements_are_rejected() {
        assert!(decode_request(br#"{"to_sort": [[1.5]]}"#).is_err());
        assert!(decode_request(br#"{"to_sort": [["a"]]}"#).is_err());
        assert!(decode_request(br#"{"to_sort": null}"#).is_err());
    }

    #[test]
    fn response_uses_wire_field_names() {
        let resp = SortResponse {
            sorted_arrays: vec![vec![1, 2]],
            time_ns: 42,
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v, serde_json::json!({ "sorted_arrays": [[1, 2]], "time_ns": 42 }));
    }
}
