/// Error taxonomy for the hello sub-protocol.
///
/// Most protocol failure paths deliberately do not produce errors at all:
/// malformed probes, unrecognized senders, and failed validations degrade to
/// "ignore" so liveness detection keeps making progress. These variants
/// cover the remaining genuinely fallible operations (wire codec, signing).
#[derive(Debug, thiserror::Error)]
pub enum HelloProtocolError {
    #[error("invalid name: {reason}")]
    InvalidName { reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("runtime shut down")]
    RuntimeShutDown,
}

impl From<rmp_serde::encode::Error> for HelloProtocolError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        HelloProtocolError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for HelloProtocolError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        HelloProtocolError::Deserialization(e.to_string())
    }
}
