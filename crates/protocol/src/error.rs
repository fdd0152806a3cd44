use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Frame(#[source] serde_json::Error),
    #[error("frame entry {index} is not a message object")]
    NotAMessage { index: usize },
    #[error("bad params for `{method}`: {source}")]
    Params {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode request: {0}")]
    Encode(#[source] serde_json::Error),
}
