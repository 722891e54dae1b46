//! Control-plane request and reply types.
//!
//! Control operations are out-of-band requests, distinct from the read/write
//! data path. They travel as an operation name plus an optional numeric
//! argument and map 1:1 onto buffer/drain actions:
//!
//! | operation     | argument | effect                      |
//! |---------------|----------|-----------------------------|
//! | `clear`       | —        | discard all buffered bytes  |
//! | `get_info`    | —        | capacity/length/available   |
//! | `resize`      | capacity | replace the backing storage |
//! | `start_drain` | —        | start the periodic drain    |
//! | `stop_drain`  | —        | stop and join the drain     |

use bytefifo_buffer::FifoInfo;
use serde::{Deserialize, Serialize};

/// A control request applied to one device instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ControlRequest {
    /// Discard all buffered bytes; capacity is unchanged.
    Clear,
    /// Report the buffer's occupancy. Pure, always succeeds.
    GetInfo,
    /// Replace the backing storage with one of `capacity` bytes,
    /// preserving buffered bytes in order.
    Resize { capacity: usize },
    /// Start the periodic drain task. Idempotent.
    StartDrain,
    /// Stop the periodic drain task and wait for it to finish. Idempotent.
    StopDrain,
}

impl ControlRequest {
    /// Parses a control request from an operation name and optional numeric
    /// argument.
    ///
    /// An unknown operation name, a missing `resize` argument, or an
    /// argument supplied to an operation that takes none is an
    /// [`InvalidArgument`](crate::DeviceError::InvalidArgument) error.
    pub fn parse(op: &str, arg: Option<usize>) -> crate::Result<Self> {
        use crate::DeviceError;

        let request = match op {
            "clear" => ControlRequest::Clear,
            "get_info" => ControlRequest::GetInfo,
            "resize" => match arg {
                Some(capacity) => ControlRequest::Resize { capacity },
                None => {
                    return Err(DeviceError::InvalidArgument(
                        "resize requires a capacity argument".to_string(),
                    ));
                }
            },
            "start_drain" => ControlRequest::StartDrain,
            "stop_drain" => ControlRequest::StopDrain,
            _ => {
                return Err(DeviceError::InvalidArgument(format!(
                    "unknown control operation: {}",
                    op
                )));
            }
        };

        if arg.is_some() && !matches!(request, ControlRequest::Resize { .. }) {
            return Err(DeviceError::InvalidArgument(format!(
                "{} takes no argument",
                op
            )));
        }

        Ok(request)
    }

    /// Returns the operation name string.
    pub fn op(&self) -> &'static str {
        match self {
            ControlRequest::Clear => "clear",
            ControlRequest::GetInfo => "get_info",
            ControlRequest::Resize { .. } => "resize",
            ControlRequest::StartDrain => "start_drain",
            ControlRequest::StopDrain => "stop_drain",
        }
    }
}

/// Buffer occupancy record returned by [`ControlRequest::GetInfo`].
///
/// A wire-level copy of the buffer's [`FifoInfo`] snapshot;
/// `available == capacity - length` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Total capacity in bytes.
    pub capacity: usize,
    /// Bytes currently held.
    pub length: usize,
    /// Bytes that can still be written.
    pub available: usize,
}

impl From<FifoInfo> for DeviceInfo {
    fn from(info: FifoInfo) -> Self {
        Self {
            capacity: info.capacity,
            length: info.length,
            available: info.available,
        }
    }
}

/// Reply to a control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum ControlReply {
    /// The operation completed; no payload.
    Done,
    /// The occupancy record for a `get_info` request.
    Info(DeviceInfo),
}

#[cfg(test)]
mod control_tests {
    use super::*;
    use crate::DeviceError;

    #[test]
    fn test_parse_plain_operations() {
        assert_eq!(
            ControlRequest::parse("clear", None).unwrap(),
            ControlRequest::Clear
        );
        assert_eq!(
            ControlRequest::parse("get_info", None).unwrap(),
            ControlRequest::GetInfo
        );
        assert_eq!(
            ControlRequest::parse("start_drain", None).unwrap(),
            ControlRequest::StartDrain
        );
        assert_eq!(
            ControlRequest::parse("stop_drain", None).unwrap(),
            ControlRequest::StopDrain
        );
    }

    #[test]
    fn test_parse_resize() {
        assert_eq!(
            ControlRequest::parse("resize", Some(64)).unwrap(),
            ControlRequest::Resize { capacity: 64 }
        );
        assert!(matches!(
            ControlRequest::parse("resize", None),
            Err(DeviceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_operation() {
        assert!(matches!(
            ControlRequest::parse("freeze", None),
            Err(DeviceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_rejects_stray_argument() {
        assert!(matches!(
            ControlRequest::parse("clear", Some(1)),
            Err(DeviceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_op_names_roundtrip() {
        for op in ["clear", "get_info", "start_drain", "stop_drain"] {
            assert_eq!(ControlRequest::parse(op, None).unwrap().op(), op);
        }
        assert_eq!(ControlRequest::parse("resize", Some(8)).unwrap().op(), "resize");
    }

    #[test]
    fn test_request_json_roundtrip() {
        let req = ControlRequest::Resize { capacity: 128 };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"op\":\"resize\""));

        let restored: ControlRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, req);
    }

    #[test]
    fn test_info_reply_json() {
        let reply = ControlReply::Info(DeviceInfo {
            capacity: 32,
            length: 10,
            available: 22,
        });
        let json = serde_json::to_string(&reply).unwrap();
        let restored: ControlReply = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, reply);
    }
}
