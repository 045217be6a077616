use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AdapterError {
    #[error("Device {name} ({category}) can't be used as switch")]
    Incompatible { name: String, category: String },

    #[error("Can't correctly init switch {0}")]
    SchemaInit(String),

    #[error("No device registered for address {0}")]
    UnknownDevice(String),

    #[error("Device command failed: {0}")]
    CommandFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    MqttError(#[from] rumqttc::ClientError),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
